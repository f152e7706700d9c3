//! Continuous difficulty: a pure function of play time and score.
//!
//! Recomputed every tick rather than cached, so speed and gap respond
//! smoothly as the run goes on.

use crate::core::{DifficultyConfig, DifficultyCurve};

/// Everything the spawner, mover and scenery need from the difficulty curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyParams {
    /// Progress through the difficulty horizon, 0.0..=1.0.
    pub progress: f64,
    /// Pipe and ground scroll speed, px/s.
    pub scroll_speed: f64,
    /// Vertical gap between the two halves of a newly spawned pair.
    pub pipe_gap: f64,
    /// Seconds between pair spawns.
    pub spawn_interval: f64,
    /// Amplitude pipes ramp toward; 0 below the score threshold.
    pub oscillation_target: f64,
    /// Near background scroll speed.
    pub background_speed: f64,
    /// Far background scroll speed.
    pub background_long_speed: f64,
}

/// Progress along the configured curve after `elapsed` seconds of play.
pub fn progress(elapsed: f64, config: &DifficultyConfig) -> f64 {
    let linear = (elapsed / config.horizon).max(0.0);
    let shaped = match config.curve {
        DifficultyCurve::Sqrt => linear.sqrt(),
        DifficultyCurve::Linear => linear,
    };
    shaped.clamp(0.0, 1.0)
}

/// Oscillation amplitude target for a given score.
pub fn oscillation_target(score: u32, config: &DifficultyConfig) -> f64 {
    if score < config.oscillation_score_threshold {
        return 0.0;
    }
    // Counting the threshold score itself so oscillation starts visibly.
    let over = (score - config.oscillation_score_threshold + 1) as f64;
    (over * config.oscillation_per_point).min(config.max_oscillation)
}

/// Evaluate the difficulty curve at `elapsed` seconds and `score` points.
pub fn evaluate(elapsed: f64, score: u32, config: &DifficultyConfig) -> DifficultyParams {
    let progress = progress(elapsed, config);
    let scroll_speed = config.base_speed + progress * config.speed_range;
    let pipe_gap = (config.base_gap - progress * config.gap_range).max(config.gap_floor);
    let spawn_interval =
        (config.base_interval - progress * config.interval_range).max(config.interval_floor);

    DifficultyParams {
        progress,
        scroll_speed,
        pipe_gap,
        spawn_interval,
        oscillation_target: oscillation_target(score, config),
        background_speed: scroll_speed / 4.0,
        background_long_speed: scroll_speed / 8.0,
    }
}
