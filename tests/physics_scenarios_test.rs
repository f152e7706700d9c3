//! Integration test: physics, collision and difficulty scenarios.
//!
//! Exercises the bird, masks and the difficulty curve through the public
//! API with the exact numbers a player would feel: one tick of gravity, a
//! flap replacing velocity, pixel-identical overlap, and the tightest gap the
//! curve can ever produce.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use skyflap::assets::{AssetSet, Rgba, Sprite};
use skyflap::collision::{overlaps, Mask};
use skyflap::core::{GameConfig, PhysicsConfig, GAP_SAFETY_MARGIN, GROUND_LEVEL};
use skyflap::game::{
    difficulty, process_input, process_tick, Bird, RoundPhase, SkyflapGame, SkyflapInput,
};

const DT: f64 = 1.0 / 60.0;

fn flying_bird(physics: &PhysicsConfig) -> Bird {
    let mut bird = Bird::new(AssetSet::builtin().unwrap().bird_frames, physics);
    bird.start();
    bird
}

#[test]
fn test_one_tick_of_gravity_from_rest() {
    let physics = PhysicsConfig {
        gravity: 30.0,
        ..PhysicsConfig::default()
    };
    let mut bird = flying_bird(&physics);
    let y0 = bird.y;
    assert_eq!(bird.velocity, 0.0);

    bird.update(DT, &physics);
    assert!((bird.velocity - 0.5).abs() < 1e-12);
    assert!((bird.y - y0 - 0.5 * DT).abs() < 1e-12);
}

#[test]
fn test_flap_replaces_rather_than_adds() {
    let physics = PhysicsConfig {
        gravity: 30.0,
        jump_velocity: -8.0,
        ..PhysicsConfig::default()
    };
    let mut bird = flying_bird(&physics);
    bird.velocity = 10.0;
    bird.flap(&physics);
    assert_eq!(bird.velocity, -8.0);
}

#[test]
fn test_velocity_stays_in_bounds_under_random_play() {
    let mut game = SkyflapGame::new(AssetSet::builtin().unwrap(), GameConfig::default(), 0);
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let mut input_rng = ChaCha8Rng::seed_from_u64(99);
    let jump = game.config.physics.jump_velocity;
    let max_fall = game.config.physics.max_fall_speed;

    for _ in 0..(60 * 60) {
        if input_rng.gen_bool(0.08) {
            process_input(&mut game, SkyflapInput::Flap);
        }
        let dt = input_rng.gen_range(0.0..0.2);
        process_tick(&mut game, dt, &mut rng);

        assert!(game.bird.velocity <= max_fall);
        assert!(game.bird.velocity >= jump);
        if game.phase != RoundPhase::Menu {
            assert!(game.bird.bottom() <= GROUND_LEVEL + 1e-9);
        }
    }
}

#[test]
fn test_identical_opaque_boxes_overlap() {
    let solid = Sprite::filled(7, 5, Rgba::opaque(200, 0, 0));
    let a = Mask::from_sprite(&solid);
    let b = Mask::from_sprite(&Sprite::filled(7, 5, Rgba::opaque(0, 200, 0)));
    assert!(overlaps(&a, (30, 30), &b, (30, 30)));
}

#[test]
fn test_separated_boxes_do_not_overlap() {
    let a = Mask::from_sprite(&Sprite::filled(7, 5, Rgba::opaque(1, 1, 1)));
    let b = Mask::from_sprite(&Sprite::filled(10, 48, Rgba::opaque(1, 1, 1)));
    assert!(!overlaps(&a, (0, 0), &b, (40, 0)));
    // Edge-adjacent is still no overlap.
    assert!(!overlaps(&a, (0, 0), &b, (7, 0)));
}

#[test]
fn test_shrunk_bird_mask_is_fairer() {
    let assets = AssetSet::builtin().unwrap();
    let bird = &assets.bird_frames[0];
    let full = Mask::build(bird, 1.0);
    let shrunk = Mask::build(bird, 0.92);
    assert_eq!(shrunk.width(), full.width());
    assert_eq!(shrunk.height(), full.height());
    assert!(shrunk.count() <= full.count());
    assert!(shrunk.count() > 0);
}

#[test]
fn test_tightest_gap_still_passable() {
    let assets = AssetSet::builtin().unwrap();
    let bird_height = assets.bird_height() as f64;
    let mut config = GameConfig::default();
    // Try to force an impossible gap; validation must raise the floor.
    config.difficulty.gap_range = 500.0;
    config.difficulty.gap_floor = 0.0;
    let game = SkyflapGame::new(assets, config, 0);

    let hardest = difficulty::evaluate(1e9, 1000, &game.config.difficulty);
    assert_eq!(hardest.progress, 1.0);
    assert!(hardest.pipe_gap >= bird_height + GAP_SAFETY_MARGIN);
    assert!(hardest.spawn_interval > 0.0);
}
