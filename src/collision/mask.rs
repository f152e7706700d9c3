//! Pixel occupancy masks and mask-vs-mask overlap.

use crate::assets::Sprite;
use crate::core::MASK_ALPHA_THRESHOLD;

/// Binary occupancy grid with the same bounds as the sprite it came from.
///
/// Masks are never mutated after construction; a new rotation or animation
/// frame always gets a freshly built mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    /// Occupancy of `sprite` with no shrinking.
    pub fn from_sprite(sprite: &Sprite) -> Self {
        let (width, height) = (sprite.width(), sprite.height());
        let mut bits = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                bits.push(sprite.pixel(x, y).a > MASK_ALPHA_THRESHOLD);
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    /// Occupancy of a proportionally shrunk copy of `sprite`, centred in a
    /// grid the size of the original.
    ///
    /// A `shrink` of 1.0 or more, or one that would collapse the sprite to
    /// nothing, uses the unmodified sprite.
    pub fn build(sprite: &Sprite, shrink: f64) -> Self {
        if shrink >= 1.0 {
            return Self::from_sprite(sprite);
        }
        let (width, height) = (sprite.width(), sprite.height());
        let shrunk_w = (width as f64 * shrink) as u32;
        let shrunk_h = (height as f64 * shrink) as u32;
        if shrunk_w == 0 || shrunk_h == 0 {
            return Self::from_sprite(sprite);
        }

        let inner = Self::from_sprite(&sprite.scaled(shrunk_w, shrunk_h));
        let off_x = (width - shrunk_w) / 2;
        let off_y = (height - shrunk_h) / 2;

        let mut bits = vec![false; (width as usize) * (height as usize)];
        for y in 0..shrunk_h {
            for x in 0..shrunk_w {
                if inner.get(x as i32, y as i32) {
                    bits[((y + off_y) * width + x + off_x) as usize] = true;
                }
            }
        }
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the cell at `(x, y)` is occupied. Out of bounds is empty.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Number of occupied cells.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

/// True iff any occupied cell of `a` placed with its top-left at `pos_a`
/// coincides with an occupied cell of `b` placed at `pos_b`.
pub fn overlaps(a: &Mask, pos_a: (i32, i32), b: &Mask, pos_b: (i32, i32)) -> bool {
    // Offset of b's origin in a's frame.
    let dx = pos_b.0 - pos_a.0;
    let dy = pos_b.1 - pos_a.1;

    let x_start = dx.max(0);
    let x_end = (dx + b.width as i32).min(a.width as i32);
    let y_start = dy.max(0);
    let y_end = (dy + b.height as i32).min(a.height as i32);
    if x_start >= x_end || y_start >= y_end {
        return false;
    }

    for y in y_start..y_end {
        for x in x_start..x_end {
            if a.get(x, y) && b.get(x - dx, y - dy) {
                return true;
            }
        }
    }
    false
}
