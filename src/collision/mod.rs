//! Pixel-accurate collision: occupancy masks and the rotated-frame cache.

pub mod cache;
pub mod mask;

pub use cache::{FrameCache, RotatedFrame};
pub use mask::{overlaps, Mask};
