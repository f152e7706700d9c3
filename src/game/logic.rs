//! Tick processing for a round: input, round state, bird, pipes, collision,
//! scoring and game-over side effects, then effects, in that order.

use super::difficulty;
use super::effects::Effects;
use super::types::{AudioCue, DeathCause, GameOverState, RoundPhase, Session};
use super::types::{SkyflapGame, SkyflapInput, TickEvent};
use crate::core::{GROUND_LEVEL, MAX_TICK_DT};
use rand::Rng;

/// Record player input; it is consumed by the next tick.
pub fn process_input(game: &mut SkyflapGame, input: SkyflapInput) {
    if input == SkyflapInput::Flap {
        game.flap_queued = true;
    }
}

/// Advance the game by `dt` seconds (clamped to `MAX_TICK_DT`) and return
/// what happened, in order.
pub fn process_tick<R: Rng>(game: &mut SkyflapGame, dt: f64, rng: &mut R) -> Vec<TickEvent> {
    let dt = dt.clamp(0.0, MAX_TICK_DT);
    let flap = std::mem::take(&mut game.flap_queued);
    let mut events = Vec::new();
    game.clock += dt;

    match game.phase {
        RoundPhase::Menu => {
            if flap {
                start_round(game, &mut events);
            }
        }
        RoundPhase::Playing => {
            if flap && game.bird.flap(&game.config.physics) {
                events.push(TickEvent::Audio(AudioCue::Flap));
            }
        }
        RoundPhase::GameOver => {
            if advance_restart(game, flap, &mut events) {
                return events;
            }
        }
    }

    match game.phase {
        RoundPhase::Menu => tick_menu(game, dt),
        RoundPhase::Playing => tick_playing(game, dt, rng, &mut events),
        RoundPhase::GameOver => tick_game_over(game, dt, rng, &mut events),
    }

    game.effects.update(dt, &game.config.effects, rng);
    events
}

/// Menu -> Playing. The press that starts the round is also its first flap.
fn start_round(game: &mut SkyflapGame, events: &mut Vec<TickEvent>) {
    let high_score = game.session.high_score;
    game.session = Session::new(high_score);
    game.pipes.reset();
    game.phase = RoundPhase::Playing;
    game.bird.start();
    tracing::info!(high_score, "round started");

    events.push(TickEvent::RoundStarted);
    events.push(TickEvent::Audio(AudioCue::Swoosh));
    events.push(TickEvent::Audio(AudioCue::MusicStart));
    if game.bird.flap(&game.config.physics) {
        events.push(TickEvent::Audio(AudioCue::Flap));
    }
}

/// Count ticks on the game-over screen and run the restart button. Returns
/// true when the round was reset this tick.
fn advance_restart(game: &mut SkyflapGame, flap: bool, events: &mut Vec<TickEvent>) -> bool {
    let round = &game.config.round;
    let state = &mut game.game_over;
    state.ticks_since = state.ticks_since.saturating_add(1);

    match state.restart_countdown {
        Some(remaining) => state.restart_countdown = Some(remaining.saturating_sub(1)),
        None if flap && state.ticks_since >= round.restart_debounce_ticks => {
            state.restart_countdown = Some(round.restart_hold_ticks);
        }
        None => {}
    }

    if state.restart_countdown == Some(0) {
        reset_round(game);
        events.push(TickEvent::Audio(AudioCue::Swoosh));
        events.push(TickEvent::RoundReset);
        return true;
    }
    false
}

/// GameOver -> Menu. The high score carries over; everything else resets.
fn reset_round(game: &mut SkyflapGame) {
    let high_score = game.session.high_score;
    game.session = Session::new(high_score);
    game.phase = RoundPhase::Menu;
    game.bird.reset();
    game.pipes.reset();
    game.effects = Effects::new();
    game.game_over = GameOverState::default();
    game.difficulty = difficulty::evaluate(0.0, 0, &game.config.difficulty);
    tracing::info!(high_score, "round reset to menu");
}

fn tick_menu(game: &mut SkyflapGame, dt: f64) {
    game.bird.update(dt, &game.config.physics);
    game.difficulty = difficulty::evaluate(0.0, 0, &game.config.difficulty);
    game.scenery.scroll(dt, &game.difficulty);
}

fn tick_playing<R: Rng>(game: &mut SkyflapGame, dt: f64, rng: &mut R, events: &mut Vec<TickEvent>) {
    game.session.elapsed += dt;
    let params = difficulty::evaluate(
        game.session.elapsed,
        game.session.score,
        &game.config.difficulty,
    );
    game.difficulty = params;

    let grounded = game.bird.update(dt, &game.config.physics);

    let spawned = game.pipes.update_spawner(
        dt,
        params.spawn_interval,
        params.pipe_gap,
        &game.config.pipes,
        rng,
    );
    if spawned {
        tracing::debug!(pairs = game.pipes.pairs.len(), "pipe pair spawned");
    }
    game.pipes.scroll(dt, params.scroll_speed);
    game.pipes
        .ramp_oscillation(dt, params.oscillation_target, &game.config.pipes);
    game.scenery.scroll(dt, &params);

    let cause = detect_collision(game, grounded);

    let passed = game.pipes.score_passed(game.bird.left());
    for _ in 0..passed {
        award_point(game, events);
    }

    if let Some(cause) = cause {
        enter_game_over(game, cause, rng, events);
    }
}

/// Gravity keeps acting so the bird drops to the ground; pipes and scenery
/// hold still.
fn tick_game_over<R: Rng>(
    game: &mut SkyflapGame,
    dt: f64,
    rng: &mut R,
    events: &mut Vec<TickEvent>,
) {
    let grounded = game.bird.update(dt, &game.config.physics);
    if let Some(cause) = detect_collision(game, grounded) {
        // Already handled; this is a no-op but keeps the check uniform.
        enter_game_over(game, cause, rng, events);
    }
}

fn detect_collision(game: &mut SkyflapGame, grounded: bool) -> Option<DeathCause> {
    if grounded {
        return Some(DeathCause::Ground);
    }
    if game.bird.top() < 0.0 {
        return Some(DeathCause::Ceiling);
    }
    let time = game.session.elapsed;
    let (frame, pos) = game.bird.pose();
    if game.pipes.collides(&frame.mask, pos, time) {
        return Some(DeathCause::Pipe);
    }
    None
}

fn award_point(game: &mut SkyflapGame, events: &mut Vec<TickEvent>) {
    let session = &mut game.session;
    session.score += 1;
    game.effects.trigger_score_pop(&game.config.effects);
    events.push(TickEvent::Audio(AudioCue::Point));
    events.push(TickEvent::Scored {
        score: session.score,
    });
    tracing::debug!(score = session.score, "pipe passed");

    if !session.new_record && session.score > session.high_score {
        session.new_record = true;
        events.push(TickEvent::NewRecord {
            score: session.score,
        });
        tracing::info!(score = session.score, "new record");
    }
}

/// Playing -> GameOver. Side effects fire once; later calls return early.
fn enter_game_over<R: Rng>(
    game: &mut SkyflapGame,
    cause: DeathCause,
    rng: &mut R,
    events: &mut Vec<TickEvent>,
) {
    if game.game_over.handled {
        return;
    }
    game.game_over = GameOverState {
        handled: true,
        ticks_since: 0,
        restart_countdown: None,
    };
    game.phase = RoundPhase::GameOver;

    let airborne = game.bird.bottom() < GROUND_LEVEL;
    game.bird.die();
    game.effects.trigger_hit(&game.config.effects);
    game.effects
        .burst(game.bird.x, game.bird.y, &game.config.effects, rng);

    if airborne {
        events.push(TickEvent::Audio(AudioCue::Hit));
    }
    if cause == DeathCause::Pipe {
        events.push(TickEvent::Audio(AudioCue::Swoosh));
    }
    events.push(TickEvent::Audio(AudioCue::Die));
    events.push(TickEvent::Audio(AudioCue::MusicStop));

    let score = game.session.score;
    events.push(TickEvent::GameOver { cause, score });
    tracing::info!(?cause, score, "game over");

    if score > game.session.high_score {
        game.session.high_score = score;
        events.push(TickEvent::RecordHighScore { score });
    }
}
