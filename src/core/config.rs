//! Tunable game configuration.
//!
//! Every constant that shapes the simulation lives here so a round can be
//! replayed with different physics in tests, and so players can tweak the
//! feel through `~/.skyflap/config.json`. Missing fields fall back to the
//! defaults below.

use super::constants::{GROUND_LEVEL, PIPE_CENTER_Y};
use serde::{Deserialize, Serialize};

/// Extra clearance the pipe gap keeps above the bird's sprite height.
pub const GAP_SAFETY_MARGIN: f64 = 6.0;

/// Complete configuration for a game.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub pipes: PipeConfig,
    pub difficulty: DifficultyConfig,
    pub effects: EffectsConfig,
    pub round: RoundConfig,
}

/// Bird motion, rotation smoothing and animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in px/s².
    pub gravity: f64,
    /// Velocity a flap replaces the current velocity with (negative = up).
    pub jump_velocity: f64,
    /// Largest downward velocity in px/s.
    pub max_fall_speed: f64,
    /// Seconds between wing animation frames.
    pub flap_period: f64,
    /// Fall speed above which the wings freeze on `falling_frame`.
    pub falling_frame_threshold: f64,
    pub falling_frame: usize,
    /// Degrees of nose-down per px/s of fall speed.
    pub rotation_per_velocity: f64,
    pub max_climb_angle: f64,
    pub max_dive_angle: f64,
    /// Exponential smoothing rate (1/s) when rotating nose-up.
    pub rotate_up_rate: f64,
    /// Exponential smoothing rate (1/s) when rotating nose-down.
    pub rotate_down_rate: f64,
    pub death_angle: f64,
    pub death_rotate_rate: f64,
    /// Menu hover amplitude in px.
    pub hover_amplitude: f64,
    /// Menu hover angular frequency in rad/s.
    pub hover_frequency: f64,
    pub bird_mask_shrink: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 120.0,
            jump_velocity: -32.0,
            max_fall_speed: 60.0,
            flap_period: 0.1,
            falling_frame_threshold: 40.0,
            falling_frame: 1,
            rotation_per_velocity: 1.0,
            max_climb_angle: 25.0,
            max_dive_angle: -70.0,
            rotate_up_rate: 18.0,
            rotate_down_rate: 5.0,
            death_angle: -90.0,
            death_rotate_rate: 12.0,
            hover_amplitude: 2.0,
            hover_frequency: 6.0,
            bird_mask_shrink: 0.92,
        }
    }
}

/// Pipe spawning and oscillation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipeConfig {
    /// Half-height of the band the gap centre is drawn from.
    pub spawn_band: f64,
    pub min_frequency: f64,
    pub max_frequency: f64,
    /// How fast oscillation amplitude moves toward its target, px/s.
    pub amplitude_ramp_rate: f64,
    pub pipe_mask_shrink: f64,
}

impl Default for PipeConfig {
    fn default() -> Self {
        Self {
            spawn_band: 6.0,
            min_frequency: 0.8,
            max_frequency: 1.8,
            amplitude_ramp_rate: 2.0,
            pipe_mask_shrink: 0.98,
        }
    }
}

/// Shape of the progress curve over the difficulty horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyCurve {
    /// Fast early ramp that flattens out.
    Sqrt,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    pub curve: DifficultyCurve,
    /// Seconds of play until progress reaches 1.0.
    pub horizon: f64,
    pub base_speed: f64,
    pub speed_range: f64,
    pub base_gap: f64,
    pub gap_range: f64,
    pub gap_floor: f64,
    pub base_interval: f64,
    pub interval_range: f64,
    pub interval_floor: f64,
    pub oscillation_score_threshold: u32,
    pub oscillation_per_point: f64,
    pub max_oscillation: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            curve: DifficultyCurve::Sqrt,
            horizon: 300.0,
            base_speed: 27.0,
            speed_range: 18.0,
            base_gap: 20.0,
            gap_range: 6.0,
            gap_floor: 11.0,
            base_interval: 1.5,
            interval_range: 0.7,
            interval_floor: 0.4,
            oscillation_score_threshold: 10,
            oscillation_per_point: 0.5,
            max_oscillation: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub shake_intensity: f64,
    pub shake_duration: f64,
    pub flash_alpha: f64,
    /// Alpha units lost per second.
    pub flash_decay: f64,
    pub score_pop_scale: f64,
    pub score_pop_decay: f64,
    pub particle_count: usize,
    pub particle_lifetime: f64,
    pub particle_min_speed: f64,
    pub particle_max_speed: f64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            shake_intensity: 2.0,
            shake_duration: 0.4,
            flash_alpha: 255.0,
            flash_decay: 1500.0,
            score_pop_scale: 1.4,
            score_pop_decay: 2.0,
            particle_count: 24,
            particle_lifetime: 0.6,
            particle_min_speed: 8.0,
            particle_max_speed: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Ticks after game over before a restart press is honored.
    pub restart_debounce_ticks: u32,
    /// Ticks the restart button stays pressed before the reset fires.
    pub restart_hold_ticks: u32,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            restart_debounce_ticks: 20,
            restart_hold_ticks: 10,
        }
    }
}

impl GameConfig {
    /// Clamp values that would break the simulation's invariants.
    ///
    /// `bird_height` is the tallest bird frame in pixels; the pipe gap floor
    /// is raised to clear it by [`GAP_SAFETY_MARGIN`].
    pub fn validated(mut self, bird_height: f64) -> Self {
        let d = &mut self.difficulty;
        let min_floor = bird_height + GAP_SAFETY_MARGIN;
        if d.gap_floor < min_floor {
            tracing::warn!(
                configured = d.gap_floor,
                corrected = min_floor,
                "pipe gap floor too small for the bird, raising it"
            );
            d.gap_floor = min_floor;
        }
        if d.base_gap < d.gap_floor {
            tracing::warn!(base_gap = d.base_gap, "base gap below floor, raising it");
            d.base_gap = d.gap_floor;
        }
        if d.interval_floor <= 0.0 {
            tracing::warn!(
                configured = d.interval_floor,
                "spawn interval floor must be positive, using 0.4"
            );
            d.interval_floor = 0.4;
        }
        if d.horizon <= 0.0 {
            tracing::warn!(
                configured = d.horizon,
                "difficulty horizon must be positive"
            );
            d.horizon = DifficultyConfig::default().horizon;
        }

        let p = &mut self.physics;
        if p.max_fall_speed <= 0.0 {
            tracing::warn!(
                configured = p.max_fall_speed,
                "max fall speed must be positive"
            );
            p.max_fall_speed = PhysicsConfig::default().max_fall_speed;
        }
        if p.flap_period <= 0.0 {
            p.flap_period = PhysicsConfig::default().flap_period;
        }

        let base_gap = self.difficulty.base_gap;
        let pipes = &mut self.pipes;
        let room = PIPE_CENTER_Y.min(GROUND_LEVEL - PIPE_CENTER_Y);
        let max_band = (room - base_gap / 2.0).max(0.0);
        if !(0.0..=max_band).contains(&pipes.spawn_band) {
            let corrected = pipes.spawn_band.abs().min(max_band);
            tracing::warn!(
                configured = pipes.spawn_band,
                corrected,
                "pipe spawn band would push gaps off the playfield, narrowing it"
            );
            pipes.spawn_band = corrected;
        }
        if pipes.min_frequency > pipes.max_frequency {
            std::mem::swap(&mut pipes.min_frequency, &mut pipes.max_frequency);
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_pass_validation_unchanged() {
        let config = GameConfig::default();
        assert_eq!(config.clone().validated(5.0), config);
    }

    #[test]
    fn test_gap_floor_raised_above_bird() {
        let mut config = GameConfig::default();
        config.difficulty.gap_floor = 2.0;
        let config = config.validated(9.0);
        assert!((config.difficulty.gap_floor - 15.0).abs() < f64::EPSILON);
        assert!(config.difficulty.base_gap >= config.difficulty.gap_floor);
    }

    #[test]
    fn test_non_positive_interval_floor_fixed() {
        let mut config = GameConfig::default();
        config.difficulty.interval_floor = 0.0;
        let config = config.validated(5.0);
        assert!(config.difficulty.interval_floor > 0.0);
    }

    #[test]
    fn test_oversized_spawn_band_narrowed() {
        let mut config = GameConfig::default();
        config.pipes.spawn_band = 40.0;
        let config = config.validated(5.0);
        let half_gap = config.difficulty.base_gap / 2.0;
        let band = config.pipes.spawn_band;
        assert!(band >= 0.0);
        assert!(PIPE_CENTER_Y - band - half_gap >= 0.0);
        assert!(PIPE_CENTER_Y + band + half_gap <= GROUND_LEVEL);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{ "physics": { "gravity": 30.0 }, "difficulty": { "curve": "linear" } }"#;
        let config: GameConfig = serde_json::from_str(json).unwrap();
        assert!((config.physics.gravity - 30.0).abs() < f64::EPSILON);
        assert!((config.physics.jump_velocity - (-32.0)).abs() < f64::EPSILON);
        assert_eq!(config.difficulty.curve, DifficultyCurve::Linear);
        assert_eq!(config.round, RoundConfig::default());
    }
}
