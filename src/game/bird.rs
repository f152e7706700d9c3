//! The bird: menu hover, gravity and flaps, then the death spiral.

use crate::assets::Sprite;
use crate::collision::{FrameCache, RotatedFrame};
use crate::core::{PhysicsConfig, BIRD_START_Y, BIRD_X, GROUND_LEVEL};

/// Lifecycle of the bird, driven by the round state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirdState {
    /// Menu: bobbing in place, no gravity.
    Hovering,
    /// Playing: gravity, flaps, smoothed rotation.
    Flying,
    /// Game over: nose-dive, frozen wings. Terminal until reset.
    DeathSpiral,
}

#[derive(Debug, Clone)]
pub struct Bird {
    pub state: BirdState,
    /// Centre of the sprite, real-valued.
    pub x: f64,
    pub y: f64,
    /// Vertical velocity in px/s, positive downward.
    pub velocity: f64,
    /// Rotation in degrees, positive nose-up.
    pub angle: f64,
    pub frame: usize,
    pub anim_timer: f64,
    pub hover_phase: f64,
    frames: FrameCache,
}

/// Exponentially move `current` toward `target` at `rate` per second.
fn smooth_toward(current: f64, target: f64, rate: f64, dt: f64) -> f64 {
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

impl Bird {
    pub fn new(frames: Vec<Sprite>, physics: &PhysicsConfig) -> Self {
        Self {
            state: BirdState::Hovering,
            x: BIRD_X,
            y: BIRD_START_Y,
            velocity: 0.0,
            angle: 0.0,
            frame: 0,
            anim_timer: 0.0,
            hover_phase: 0.0,
            frames: FrameCache::new(frames, physics.bird_mask_shrink),
        }
    }

    /// Back to the menu pose. The frame cache survives.
    pub fn reset(&mut self) {
        self.state = BirdState::Hovering;
        self.x = BIRD_X;
        self.y = BIRD_START_Y;
        self.velocity = 0.0;
        self.angle = 0.0;
        self.frame = 0;
        self.anim_timer = 0.0;
        self.hover_phase = 0.0;
    }

    /// Hovering -> Flying. Ignored in any other state.
    pub fn start(&mut self) {
        if self.state == BirdState::Hovering {
            self.state = BirdState::Flying;
            self.velocity = 0.0;
        }
    }

    /// Replace the current velocity with the jump velocity. Only valid while
    /// flying; returns whether the flap happened.
    pub fn flap(&mut self, physics: &PhysicsConfig) -> bool {
        if self.state != BirdState::Flying {
            return false;
        }
        self.velocity = physics.jump_velocity;
        true
    }

    /// Flying -> DeathSpiral. One-way.
    pub fn die(&mut self) {
        if self.state == BirdState::Flying {
            self.state = BirdState::DeathSpiral;
        }
    }

    /// Advance one tick. Returns true when the bird is resting on the ground
    /// line after this tick.
    pub fn update(&mut self, dt: f64, physics: &PhysicsConfig) -> bool {
        match self.state {
            BirdState::Hovering => {
                self.hover_phase += physics.hover_frequency * dt;
                self.y = BIRD_START_Y + self.hover_phase.sin() * physics.hover_amplitude;
                self.angle = 0.0;
                self.animate(dt, physics);
                false
            }
            BirdState::Flying => {
                let grounded = self.integrate(dt, physics);
                let target = (-self.velocity * physics.rotation_per_velocity)
                    .clamp(physics.max_dive_angle, physics.max_climb_angle);
                let rate = if target > self.angle {
                    physics.rotate_up_rate
                } else {
                    physics.rotate_down_rate
                };
                self.angle = smooth_toward(self.angle, target, rate, dt);
                self.animate(dt, physics);
                grounded
            }
            BirdState::DeathSpiral => {
                let grounded = self.integrate(dt, physics);
                self.angle = smooth_toward(
                    self.angle,
                    physics.death_angle,
                    physics.death_rotate_rate,
                    dt,
                );
                grounded
            }
        }
    }

    /// Gravity, velocity clamp and ground clamp.
    fn integrate(&mut self, dt: f64, physics: &PhysicsConfig) -> bool {
        self.velocity = (self.velocity + physics.gravity * dt).min(physics.max_fall_speed);
        self.y += self.velocity * dt;

        let half_height = self.base_height() / 2.0;
        if self.y + half_height >= GROUND_LEVEL {
            self.y = GROUND_LEVEL - half_height;
            self.velocity = 0.0;
            return true;
        }
        false
    }

    fn animate(&mut self, dt: f64, physics: &PhysicsConfig) {
        if self.state == BirdState::Flying && self.velocity > physics.falling_frame_threshold {
            self.frame = physics.falling_frame % self.frames.frame_count();
            self.anim_timer = 0.0;
            return;
        }
        self.anim_timer += dt;
        if self.anim_timer > physics.flap_period {
            self.anim_timer = 0.0;
            self.frame = (self.frame + 1) % self.frames.frame_count();
        }
    }

    /// Rotation snapped to the whole degree used for cache lookup.
    pub fn angle_key(&self) -> i32 {
        self.angle.round() as i32
    }

    fn base_height(&self) -> f64 {
        self.frames.base_frame(self.frame).height() as f64
    }

    fn base_width(&self) -> f64 {
        self.frames.base_frame(self.frame).width() as f64
    }

    pub fn left(&self) -> f64 {
        self.x - self.base_width() / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.base_width() / 2.0
    }

    pub fn top(&self) -> f64 {
        self.y - self.base_height() / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.base_height() / 2.0
    }

    /// Current rotated frame and the integer top-left it is drawn and
    /// collision-tested at, centred on the bird's position.
    pub fn pose(&mut self) -> (&RotatedFrame, (i32, i32)) {
        let key = self.angle_key();
        let (x, y) = (self.x, self.y);
        let rotated = self.frames.get(self.frame, key);
        let left = (x - rotated.sprite.width() as f64 / 2.0).round() as i32;
        let top = (y - rotated.sprite.height() as f64 / 2.0).round() as i32;
        (rotated, (left, top))
    }

    /// Build every rotated frame the flight range can reach.
    pub fn prewarm(&mut self, physics: &PhysicsConfig) {
        let low = physics.max_dive_angle.min(physics.death_angle).floor() as i32;
        let high = physics.max_climb_angle.ceil() as i32;
        self.frames.prewarm(low, high);
    }

    pub fn cached_frames(&self) -> usize {
        self.frames.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetSet;

    const DT: f64 = 1.0 / 60.0;

    fn bird(physics: &PhysicsConfig) -> Bird {
        Bird::new(AssetSet::builtin().unwrap().bird_frames, physics)
    }

    fn flying(physics: &PhysicsConfig) -> Bird {
        let mut b = bird(physics);
        b.start();
        b
    }

    #[test]
    fn test_gravity_one_tick_from_rest() {
        let physics = PhysicsConfig {
            gravity: 30.0,
            ..PhysicsConfig::default()
        };
        let mut b = flying(&physics);
        let y0 = b.y;
        b.update(DT, &physics);
        assert!((b.velocity - 0.5).abs() < 1e-12);
        assert!((b.y - (y0 + 0.5 * DT)).abs() < 1e-12);
    }

    #[test]
    fn test_flap_replaces_velocity() {
        let physics = PhysicsConfig {
            jump_velocity: -8.0,
            ..PhysicsConfig::default()
        };
        let mut b = flying(&physics);
        b.velocity = 10.0;
        assert!(b.flap(&physics));
        assert_eq!(b.velocity, -8.0);
    }

    #[test]
    fn test_flap_ignored_outside_flight() {
        let physics = PhysicsConfig::default();
        let mut b = bird(&physics);
        assert!(!b.flap(&physics));
        assert_eq!(b.velocity, 0.0);

        b.start();
        b.die();
        b.velocity = 5.0;
        assert!(!b.flap(&physics));
        assert_eq!(b.velocity, 5.0);
    }

    #[test]
    fn test_velocity_never_exceeds_max_fall() {
        let physics = PhysicsConfig::default();
        let mut b = flying(&physics);
        b.y = -500.0;
        for _ in 0..600 {
            b.update(DT, &physics);
            assert!(b.velocity <= physics.max_fall_speed);
            assert!(b.velocity >= physics.jump_velocity);
        }
    }

    #[test]
    fn test_ground_clamp_zeroes_velocity() {
        let physics = PhysicsConfig::default();
        let mut b = flying(&physics);
        b.y = GROUND_LEVEL - 3.0;
        b.velocity = 50.0;
        assert!(b.update(DT, &physics));
        assert_eq!(b.velocity, 0.0);
        assert!((b.bottom() - GROUND_LEVEL).abs() < 1e-9);
    }

    #[test]
    fn test_hover_bobs_without_gravity() {
        let physics = PhysicsConfig::default();
        let mut b = bird(&physics);
        let mut min_y = f64::MAX;
        let mut max_y = f64::MIN;
        for _ in 0..120 {
            assert!(!b.update(DT, &physics));
            min_y = min_y.min(b.y);
            max_y = max_y.max(b.y);
            assert_eq!(b.velocity, 0.0);
            assert_eq!(b.angle, 0.0);
        }
        assert!(max_y - min_y > physics.hover_amplitude);
        assert!(max_y <= BIRD_START_Y + physics.hover_amplitude + 1e-9);
        assert!(min_y >= BIRD_START_Y - physics.hover_amplitude - 1e-9);
    }

    #[test]
    fn test_rotation_smoothed_not_snapped() {
        let physics = PhysicsConfig::default();
        let mut b = flying(&physics);
        b.flap(&physics);
        b.update(DT, &physics);
        assert!(b.angle > 0.0);
        assert!(b.angle < physics.max_climb_angle);
    }

    #[test]
    fn test_rotates_up_faster_than_down() {
        let physics = PhysicsConfig::default();
        let mut up = flying(&physics);
        up.angle = 0.0;
        up.velocity = -20.0; // target +20
        let mut down = flying(&physics);
        down.angle = 0.0;
        down.velocity = 20.0; // target -20 (gravity shifts it slightly further)
        down.y = 10.0;
        up.y = 10.0;

        up.update(DT, &physics);
        down.update(DT, &physics);
        assert!(up.angle.abs() > down.angle.abs());
    }

    #[test]
    fn test_dive_angle_clamped() {
        let physics = PhysicsConfig {
            rotation_per_velocity: 2.0,
            ..PhysicsConfig::default()
        };
        let mut b = flying(&physics);
        b.y = -1000.0;
        for _ in 0..600 {
            b.update(DT, &physics);
        }
        assert!(b.angle >= physics.max_dive_angle - 1e-9);
        assert!(b.angle < physics.max_dive_angle + 1.0);
    }

    #[test]
    fn test_fast_fall_freezes_wings() {
        let physics = PhysicsConfig::default();
        let mut b = flying(&physics);
        b.y = -1000.0;
        b.velocity = physics.falling_frame_threshold + 5.0;
        for _ in 0..30 {
            b.update(DT, &physics);
            assert_eq!(b.frame, physics.falling_frame);
        }
    }

    #[test]
    fn test_wings_cycle_on_timer() {
        let physics = PhysicsConfig::default();
        let mut b = bird(&physics);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..60 {
            b.update(DT, &physics);
            seen.insert(b.frame);
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_death_spiral_dives_and_freezes_frame() {
        let physics = PhysicsConfig::default();
        let mut b = flying(&physics);
        b.frame = 2;
        b.die();
        assert_eq!(b.state, BirdState::DeathSpiral);
        for _ in 0..120 {
            b.update(DT, &physics);
            assert_eq!(b.frame, 2);
        }
        assert!((b.angle - physics.death_angle).abs() < 1.0);
        assert!((b.bottom() - GROUND_LEVEL).abs() < 1e-9);
    }

    #[test]
    fn test_pose_centres_rotated_sprite() {
        let physics = PhysicsConfig::default();
        let mut b = bird(&physics);
        b.x = 20.0;
        b.y = 30.0;
        let (frame, (left, top)) = b.pose();
        assert_eq!((frame.sprite.width(), frame.sprite.height()), (7, 5));
        assert_eq!((left, top), (17, 28));
    }

    #[test]
    fn test_prewarm_fills_cache() {
        let physics = PhysicsConfig::default();
        let mut b = bird(&physics);
        b.prewarm(&physics);
        // -90..=25 for 3 frames.
        assert_eq!(b.cached_frames(), 3 * 116);
    }
}
