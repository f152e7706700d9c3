//! Integration test: whole rounds driven through the public tick API.
//!
//! Covers the round state machine end to end: start, scoring through real
//! pipes, game over, the high-score write, restart back to the menu, and the
//! spawn schedule as seen from inside a running round.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skyflap::assets::AssetSet;
use skyflap::core::{GameConfig, PIPE_CENTER_Y, TICKS_PER_SECOND};
use skyflap::game::{
    process_input, process_tick, RoundPhase, SkyflapGame, SkyflapInput, TickEvent,
};
use skyflap::utils::{HighScoreStore, MemoryHighScoreStore};

const DT: f64 = 1.0 / TICKS_PER_SECOND as f64;

/// Pipes always centred and never oscillating, so a simple autopilot can
/// thread every gap.
fn steady_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.pipes.spawn_band = 0.0;
    config.difficulty.oscillation_score_threshold = 10_000;
    config
}

fn new_game(config: GameConfig, store: &MemoryHighScoreStore) -> SkyflapGame {
    SkyflapGame::new(AssetSet::builtin().unwrap(), config, store.read())
}

/// Apply the events a real loop would act on to the store.
fn apply(events: &[TickEvent], store: &mut MemoryHighScoreStore) {
    for event in events {
        if let TickEvent::RecordHighScore { score } = event {
            store.write(*score).unwrap();
        }
    }
}

/// One tick with a hold-the-centre-line autopilot.
fn autopilot_tick(game: &mut SkyflapGame, rng: &mut ChaCha8Rng) -> Vec<TickEvent> {
    if game.bird.y > PIPE_CENTER_Y + 2.0 && game.bird.velocity >= 0.0 {
        process_input(game, SkyflapInput::Flap);
    }
    process_tick(game, DT, rng)
}

fn start(game: &mut SkyflapGame, rng: &mut ChaCha8Rng) -> Vec<TickEvent> {
    process_input(game, SkyflapInput::Flap);
    process_tick(game, DT, rng)
}

/// Stop flapping and let the bird hit the ground.
fn crash(game: &mut SkyflapGame, rng: &mut ChaCha8Rng) -> Vec<TickEvent> {
    let mut all = Vec::new();
    for _ in 0..(TICKS_PER_SECOND * 10) {
        all.extend(process_tick(game, DT, rng));
        if game.phase == RoundPhase::GameOver {
            return all;
        }
    }
    panic!("round never ended");
}

fn restart(game: &mut SkyflapGame, rng: &mut ChaCha8Rng) -> Vec<TickEvent> {
    let mut all = Vec::new();
    while !game.can_restart() {
        all.extend(process_tick(game, DT, rng));
    }
    process_input(game, SkyflapInput::Flap);
    while game.phase == RoundPhase::GameOver {
        all.extend(process_tick(game, DT, rng));
    }
    all
}

#[test]
fn test_autopilot_scores_every_pipe() {
    let store = MemoryHighScoreStore::new(0);
    let mut game = new_game(steady_config(), &store);
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    start(&mut game, &mut rng);
    let mut scored_events = 0;
    for _ in 0..(TICKS_PER_SECOND * 15) {
        let events = autopilot_tick(&mut game, &mut rng);
        scored_events += events
            .iter()
            .filter(|e| matches!(e, TickEvent::Scored { .. }))
            .count() as u32;
        assert_eq!(game.phase, RoundPhase::Playing, "autopilot crashed");
    }

    assert!(game.session.score >= 5, "score {}", game.session.score);
    assert_eq!(scored_events, game.session.score);
}

#[test]
fn test_scored_flag_flips_at_most_once_per_pair() {
    let store = MemoryHighScoreStore::new(0);
    let mut game = new_game(steady_config(), &store);
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    start(&mut game, &mut rng);
    let mut total = 0;
    for _ in 0..(TICKS_PER_SECOND * 12) {
        let before = game.pipes.pairs.iter().filter(|p| p.scored).count();
        let events = autopilot_tick(&mut game, &mut rng);
        let newly = events
            .iter()
            .filter(|e| matches!(e, TickEvent::Scored { .. }))
            .count();
        total += newly;

        let bird_left = game.bird.left();
        for pair in &game.pipes.pairs {
            if pair.scored {
                assert!(bird_left > game.pipes.right(pair));
            }
        }
        // Pairs only leave from the left, long after scoring.
        let after = game.pipes.pairs.iter().filter(|p| p.scored).count();
        assert!(after <= before + newly);
    }
    assert_eq!(total as u32, game.session.score);
}

#[test]
fn test_new_record_written_once_then_unchanged() {
    let mut store = MemoryHighScoreStore::new(2);
    let mut game = new_game(steady_config(), &store);
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    start(&mut game, &mut rng);
    let mut records = 0;
    while game.session.score < 4 {
        let events = autopilot_tick(&mut game, &mut rng);
        records += events
            .iter()
            .filter(|e| matches!(e, TickEvent::NewRecord { .. }))
            .count();
        apply(&events, &mut store);
        assert_eq!(game.phase, RoundPhase::Playing);
    }
    assert!(game.session.new_record);
    assert_eq!(records, 1);
    // Nothing is written until the round ends.
    assert_eq!(store.writes, 0);

    let events = crash(&mut game, &mut rng);
    apply(&events, &mut store);
    let final_score = game.session.score;
    assert!(final_score >= 4);
    assert_eq!(store.read(), final_score);
    assert_eq!(store.writes, 1);

    // A worse second round leaves the record alone.
    let events = restart(&mut game, &mut rng);
    assert!(events.contains(&TickEvent::RoundReset));
    assert_eq!(game.phase, RoundPhase::Menu);
    assert_eq!(game.session.score, 0);
    assert!(!game.session.new_record);
    assert_eq!(game.session.high_score, final_score);

    start(&mut game, &mut rng);
    let events = crash(&mut game, &mut rng);
    apply(&events, &mut store);
    assert_eq!(store.read(), final_score);
    assert_eq!(store.writes, 1);
}

#[test]
fn test_game_over_side_effects_fire_once() {
    let store = MemoryHighScoreStore::new(0);
    let mut game = new_game(GameConfig::default(), &store);
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    start(&mut game, &mut rng);
    let events = crash(&mut game, &mut rng);
    let game_overs = events
        .iter()
        .filter(|e| matches!(e, TickEvent::GameOver { .. }))
        .count();
    assert_eq!(game_overs, 1);

    let burst = game.config.effects.particle_count;
    assert_eq!(game.effects.particles.len(), burst);
    for _ in 0..TICKS_PER_SECOND {
        let events = process_tick(&mut game, DT, &mut rng);
        assert!(events.is_empty());
        assert!(game.effects.particles.len() <= burst);
    }
    assert!(game.game_over.handled);
}

#[test]
fn test_spawn_schedule_inside_a_round() {
    let mut config = steady_config();
    config.difficulty.interval_range = 0.0;
    let store = MemoryHighScoreStore::new(0);
    let mut game = new_game(config, &store);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    start(&mut game, &mut rng);
    while game.session.elapsed < 1.48 {
        autopilot_tick(&mut game, &mut rng);
    }
    assert_eq!(game.pipes.pairs.len(), 0);
    while game.session.elapsed < 1.51 {
        autopilot_tick(&mut game, &mut rng);
    }
    assert_eq!(game.pipes.pairs.len(), 1);
    while game.session.elapsed < 3.01 {
        autopilot_tick(&mut game, &mut rng);
    }
    assert_eq!(game.pipes.pairs.len(), 2);
}

#[test]
fn test_same_seed_same_round() {
    let store = MemoryHighScoreStore::new(0);
    let run = || {
        let mut game = new_game(GameConfig::default(), &store);
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        start(&mut game, &mut rng);
        for _ in 0..(TICKS_PER_SECOND * 6) {
            autopilot_tick(&mut game, &mut rng);
        }
        game.pipes
            .pairs
            .iter()
            .map(|p| (p.top.anchor_y, p.phase))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}
