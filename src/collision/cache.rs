//! Rotated bird images and their masks, keyed by (frame, angle).

use super::mask::Mask;
use crate::assets::Sprite;
use std::collections::HashMap;

/// A bird frame rotated to a whole-degree angle, with its collision mask.
#[derive(Debug, Clone)]
pub struct RotatedFrame {
    pub sprite: Sprite,
    pub mask: Mask,
}

/// Lazily filled table of rotated frames. The key domain (a few frames times
/// a bounded angle range) is small, so entries are never evicted.
#[derive(Debug, Clone)]
pub struct FrameCache {
    frames: Vec<Sprite>,
    shrink: f64,
    entries: HashMap<(usize, i32), RotatedFrame>,
}

impl FrameCache {
    pub fn new(frames: Vec<Sprite>, shrink: f64) -> Self {
        Self {
            frames,
            shrink,
            entries: HashMap::new(),
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Unrotated frame, used for ground clamping and hover layout.
    pub fn base_frame(&self, frame: usize) -> &Sprite {
        &self.frames[frame % self.frames.len()]
    }

    /// Rotated frame for `(frame, angle)`, built on first use.
    pub fn get(&mut self, frame: usize, angle: i32) -> &RotatedFrame {
        let frame = frame % self.frames.len();
        let frames = &self.frames;
        let shrink = self.shrink;
        self.entries.entry((frame, angle)).or_insert_with(|| {
            let sprite = frames[frame].rotated(angle);
            let mask = Mask::build(&sprite, shrink);
            RotatedFrame { sprite, mask }
        })
    }

    /// Build every frame for every angle in `min..=max` up front.
    pub fn prewarm(&mut self, min_angle: i32, max_angle: i32) {
        for frame in 0..self.frames.len() {
            for angle in min_angle..=max_angle {
                self.get(frame, angle);
            }
        }
        tracing::debug!(entries = self.entries.len(), "frame cache prewarmed");
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetSet;

    fn cache() -> FrameCache {
        let assets = AssetSet::builtin().unwrap();
        FrameCache::new(assets.bird_frames, 0.92)
    }

    #[test]
    fn test_entries_built_lazily() {
        let mut cache = cache();
        assert!(cache.is_empty());
        cache.get(0, 0);
        cache.get(0, 0);
        assert_eq!(cache.len(), 1);
        cache.get(1, -30);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_same_key_returns_same_mask() {
        let mut cache = cache();
        let first = cache.get(2, 15).mask.clone();
        let second = cache.get(2, 15).mask.clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rotated_entry_grows_bounds() {
        let mut cache = cache();
        let level = cache.get(0, 0).sprite.width();
        let dive = cache.get(0, -90).sprite.clone();
        assert_eq!(level, 7);
        assert_eq!((dive.width(), dive.height()), (5, 7));
    }

    #[test]
    fn test_prewarm_covers_range() {
        let mut cache = cache();
        cache.prewarm(-10, 10);
        assert_eq!(cache.len(), 3 * 21);
    }

    #[test]
    fn test_frame_index_wraps() {
        let mut cache = cache();
        cache.get(4, 0);
        cache.get(1, 0);
        assert_eq!(cache.len(), 1);
    }
}
