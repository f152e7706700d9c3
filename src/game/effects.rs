//! Transient feedback effects: screen shake, hit flash, score pop and the
//! death particle burst.
//!
//! All of these decay on their own timers and never feed back into the
//! simulation.

use crate::core::EffectsConfig;
use rand::Rng;
use std::f64::consts::TAU;

/// A short-lived speck thrown out when the bird dies.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    /// Seconds left to live.
    pub life: f64,
    pub max_life: f64,
}

impl Particle {
    /// Opacity, fading linearly from 255 to 0 over the particle's life.
    pub fn alpha(&self) -> f64 {
        if self.max_life <= 0.0 {
            return 0.0;
        }
        (255.0 * self.life / self.max_life).clamp(0.0, 255.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Effects {
    /// Seconds of shake left.
    pub shake_remaining: f64,
    /// Pixel offset to apply to the composed frame this tick.
    pub shake_offset: (i32, i32),
    pub flash_alpha: f64,
    /// Score text scale, 1.0 at rest.
    pub score_scale: f64,
    pub particles: Vec<Particle>,
}

impl Default for Effects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects {
    pub fn new() -> Self {
        Self {
            shake_remaining: 0.0,
            shake_offset: (0, 0),
            flash_alpha: 0.0,
            score_scale: 1.0,
            particles: Vec::new(),
        }
    }

    /// Start the shake and flash that mark a crash.
    pub fn trigger_hit(&mut self, config: &EffectsConfig) {
        self.shake_remaining = config.shake_duration;
        self.flash_alpha = config.flash_alpha;
    }

    pub fn trigger_score_pop(&mut self, config: &EffectsConfig) {
        self.score_scale = config.score_pop_scale.max(1.0);
    }

    /// Throw `particle_count` specks out from `(x, y)` in random directions.
    pub fn burst<R: Rng>(&mut self, x: f64, y: f64, config: &EffectsConfig, rng: &mut R) {
        let (min_speed, max_speed) = if config.particle_min_speed <= config.particle_max_speed {
            (config.particle_min_speed, config.particle_max_speed)
        } else {
            (config.particle_max_speed, config.particle_min_speed)
        };
        for _ in 0..config.particle_count {
            let angle = rng.gen_range(0.0..TAU);
            let speed = if max_speed > min_speed {
                rng.gen_range(min_speed..max_speed)
            } else {
                min_speed
            };
            self.particles.push(Particle {
                x,
                y,
                vx: angle.cos() * speed,
                vy: angle.sin() * speed,
                life: config.particle_lifetime,
                max_life: config.particle_lifetime,
            });
        }
    }

    /// Advance every effect by `dt` seconds.
    pub fn update<R: Rng>(&mut self, dt: f64, config: &EffectsConfig, rng: &mut R) {
        self.update_shake(dt, config, rng);

        if self.flash_alpha > 0.0 {
            self.flash_alpha = (self.flash_alpha - config.flash_decay * dt).max(0.0);
        }

        if self.score_scale > 1.0 {
            self.score_scale = (self.score_scale - config.score_pop_decay * dt).max(1.0);
        }

        for particle in &mut self.particles {
            particle.x += particle.vx * dt;
            particle.y += particle.vy * dt;
            particle.life -= dt;
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    fn update_shake<R: Rng>(&mut self, dt: f64, config: &EffectsConfig, rng: &mut R) {
        if self.shake_remaining <= 0.0 || config.shake_duration <= 0.0 {
            self.shake_remaining = 0.0;
            self.shake_offset = (0, 0);
            return;
        }

        let fraction = (self.shake_remaining / config.shake_duration).clamp(0.0, 1.0);
        let magnitude = config.shake_intensity * fraction;
        self.shake_remaining = (self.shake_remaining - dt).max(0.0);

        if magnitude > 0.0 {
            let dx = rng.gen_range(-magnitude..=magnitude).round() as i32;
            let dy = rng.gen_range(-magnitude..=magnitude).round() as i32;
            self.shake_offset = (dx, dy);
        } else {
            self.shake_offset = (0, 0);
        }
    }

    /// Whether any effect still has visible output.
    pub fn is_active(&self) -> bool {
        self.shake_remaining > 0.0
            || self.flash_alpha > 0.0
            || self.score_scale > 1.0
            || !self.particles.is_empty()
    }
}
