//! Pipe pairs: timed spawning, scrolling, oscillation, scoring and
//! collision against the bird.

use crate::assets::Sprite;
use crate::collision::{overlaps, Mask};
use crate::core::{PipeConfig, GROUND_LEVEL, PIPE_CENTER_Y, PLAYFIELD_WIDTH};
use rand::Rng;
use std::f64::consts::TAU;

/// Slack on the spawn timer comparison so accumulated float error in dt
/// doesn't push a spawn one tick late.
const SPAWN_EPSILON: f64 = 1e-9;

/// Which way a pipe half is mounted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Hangs down from above the playfield; its bottom edge faces the gap.
    Top,
    /// Rises up from below the ground; its top edge faces the gap.
    Bottom,
}

/// One half of a pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub polarity: Polarity,
    /// Left edge, real-valued so slow speeds don't truncate to zero.
    pub x: f64,
    /// Y of the edge facing the gap when the oscillation offset is zero.
    pub anchor_y: f64,
    /// Current oscillation amplitude; only ever ramps.
    pub amplitude: f64,
}

impl Pipe {
    /// Top edge of the sprite for a given vertical offset.
    pub fn top_y(&self, offset: f64, height: f64) -> f64 {
        match self.polarity {
            Polarity::Top => self.anchor_y + offset - height,
            Polarity::Bottom => self.anchor_y + offset,
        }
    }
}

/// Two halves spawned together, sharing an offset, phase and frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct PipePair {
    pub top: Pipe,
    pub bottom: Pipe,
    pub phase: f64,
    /// Oscillation angular frequency, rad/s.
    pub frequency: f64,
    /// Set once, when the bird's left edge first passes the right edge.
    pub scored: bool,
}

impl PipePair {
    pub fn x(&self) -> f64 {
        self.top.x
    }

    /// Vertical displacement from the anchors at game time `time`.
    pub fn offset(&self, time: f64) -> f64 {
        self.top.amplitude * (time * self.frequency + self.phase).sin()
    }

    /// Gap between the two halves' facing edges.
    pub fn gap(&self) -> f64 {
        self.bottom.anchor_y - self.top.anchor_y
    }
}

/// Owns the live pipe pairs and the spawn timer.
#[derive(Debug, Clone)]
pub struct PipeField {
    pub pairs: Vec<PipePair>,
    pub spawn_timer: f64,
    pipe: Sprite,
    pipe_flipped: Sprite,
    mask: Mask,
    mask_flipped: Mask,
}

impl PipeField {
    /// `pipe` rises from the ground; `pipe_flipped` hangs from the top.
    pub fn new(pipe: Sprite, pipe_flipped: Sprite, config: &PipeConfig) -> Self {
        let mask = Mask::build(&pipe, config.pipe_mask_shrink);
        let mask_flipped = Mask::build(&pipe_flipped, config.pipe_mask_shrink);
        Self {
            pairs: Vec::new(),
            spawn_timer: 0.0,
            pipe,
            pipe_flipped,
            mask,
            mask_flipped,
        }
    }

    pub fn reset(&mut self) {
        self.pairs.clear();
        self.spawn_timer = 0.0;
    }

    pub fn pipe_width(&self) -> f64 {
        self.pipe.width() as f64
    }

    pub fn pipe_height(&self) -> f64 {
        self.pipe.height() as f64
    }

    /// Right (trailing) edge of a pair.
    pub fn right(&self, pair: &PipePair) -> f64 {
        pair.x() + self.pipe_width()
    }

    /// Range of gap centres that keeps the whole gap between the ceiling and
    /// the ground line with both pipe sprites still reaching past them.
    fn center_bounds(&self, gap: f64) -> (f64, f64) {
        let half = gap / 2.0;
        let height = self.pipe_height();
        let lo = half.max(GROUND_LEVEL - height - half);
        let hi = (GROUND_LEVEL - half).min(height + half);
        if lo <= hi {
            (lo, hi)
        } else {
            let mid = (lo + hi) / 2.0;
            (mid, mid)
        }
    }

    /// Add a pair at the right edge with a random gap centre.
    pub fn spawn<R: Rng>(&mut self, gap: f64, config: &PipeConfig, rng: &mut R) {
        let band = config.spawn_band.abs();
        let center = if band > 0.0 {
            PIPE_CENTER_Y + rng.gen_range(-band..=band)
        } else {
            PIPE_CENTER_Y
        };
        let (lo, hi) = self.center_bounds(gap);
        let center = center.max(lo).min(hi);
        let frequency = if config.max_frequency > config.min_frequency {
            rng.gen_range(config.min_frequency..config.max_frequency)
        } else {
            config.min_frequency
        };
        let phase = rng.gen_range(0.0..TAU);
        let x = PLAYFIELD_WIDTH as f64;

        self.pairs.push(PipePair {
            top: Pipe {
                polarity: Polarity::Top,
                x,
                anchor_y: center - gap / 2.0,
                amplitude: 0.0,
            },
            bottom: Pipe {
                polarity: Polarity::Bottom,
                x,
                anchor_y: center + gap / 2.0,
                amplitude: 0.0,
            },
            phase,
            frequency,
            scored: false,
        });
    }

    /// Advance the spawn timer; spawns at most one pair per call. Returns
    /// whether a pair was spawned.
    pub fn update_spawner<R: Rng>(
        &mut self,
        dt: f64,
        interval: f64,
        gap: f64,
        config: &PipeConfig,
        rng: &mut R,
    ) -> bool {
        self.spawn_timer += dt;
        if self.spawn_timer + SPAWN_EPSILON < interval {
            return false;
        }
        self.spawn_timer = (self.spawn_timer - interval).max(0.0);
        self.spawn(gap, config, rng);
        true
    }

    /// Move every pair left by `speed * dt` and drop pairs whose right edge
    /// has passed x = 0.
    pub fn scroll(&mut self, dt: f64, speed: f64) {
        for pair in &mut self.pairs {
            pair.top.x -= speed * dt;
            pair.bottom.x -= speed * dt;
        }
        let width = self.pipe_width();
        self.pairs.retain(|pair| pair.x() + width >= 0.0);
    }

    /// Largest amplitude that keeps the hanging pipe's top edge above the
    /// screen and the rising pipe's bottom edge below the ground line.
    pub fn max_amplitude(&self, pair: &PipePair) -> f64 {
        let height = self.pipe_height();
        let top_room = height - pair.top.anchor_y;
        let bottom_room = pair.bottom.anchor_y + height - GROUND_LEVEL;
        top_room.min(bottom_room).max(0.0)
    }

    /// Ramp each pair's amplitude toward `target` at the configured rate,
    /// never beyond what keeps the pipe edges covered.
    pub fn ramp_oscillation(&mut self, dt: f64, target: f64, config: &PipeConfig) {
        let step = config.amplitude_ramp_rate * dt;
        let limits: Vec<f64> = self.pairs.iter().map(|p| self.max_amplitude(p)).collect();
        for (pair, limit) in self.pairs.iter_mut().zip(limits) {
            let goal = target.max(0.0).min(limit);
            let current = pair.top.amplitude;
            let next = if current < goal {
                (current + step).min(goal)
            } else {
                (current - step).max(goal)
            };
            pair.top.amplitude = next;
            pair.bottom.amplitude = next;
        }
    }

    /// Mark and count pairs whose right edge the bird's left edge has now
    /// passed. Each pair scores at most once.
    pub fn score_passed(&mut self, bird_left: f64) -> u32 {
        let width = self.pipe_width();
        let mut newly_scored = 0;
        for pair in &mut self.pairs {
            if !pair.scored && bird_left > pair.x() + width {
                pair.scored = true;
                newly_scored += 1;
            }
        }
        newly_scored
    }

    /// Integer top-left of each half at game time `time`, with the image to
    /// draw there: hanging half first, then rising half.
    pub fn placements(&self, pair: &PipePair, time: f64) -> [(Polarity, (i32, i32)); 2] {
        let offset = pair.offset(time);
        let height = self.pipe_height();
        let x = pair.x().round() as i32;
        [
            (
                Polarity::Top,
                (x, pair.top.top_y(offset, height).round() as i32),
            ),
            (
                Polarity::Bottom,
                (x, pair.bottom.top_y(offset, height).round() as i32),
            ),
        ]
    }

    pub fn sprite(&self, polarity: Polarity) -> &Sprite {
        match polarity {
            Polarity::Top => &self.pipe_flipped,
            Polarity::Bottom => &self.pipe,
        }
    }

    fn mask(&self, polarity: Polarity) -> &Mask {
        match polarity {
            Polarity::Top => &self.mask_flipped,
            Polarity::Bottom => &self.mask,
        }
    }

    /// Whether the bird mask at `bird_pos` touches any pipe.
    pub fn collides(&self, bird_mask: &Mask, bird_pos: (i32, i32), time: f64) -> bool {
        self.pairs.iter().any(|pair| {
            self.placements(pair, time)
                .iter()
                .any(|(polarity, pos)| overlaps(bird_mask, bird_pos, self.mask(*polarity), *pos))
        })
    }
}
