//! RGBA sprite bitmaps and the image transforms the simulation needs.
//!
//! The game never decodes image files; sprites arrive already decoded from
//! the sheet loader. Transforms always return a new sprite.

/// A single RGBA pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// A decoded image: row-major pixels, `width * height` long.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Sprite {
    /// Build a sprite from row-major pixels. Returns `None` if the pixel
    /// count doesn't match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A fully opaque rectangle of one colour.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, transparent when out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Rgba {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return Rgba::TRANSPARENT;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Mirror top-to-bottom (used for the hanging pipe).
    pub fn flipped_vertical(&self) -> Self {
        let w = self.width as usize;
        let pixels = self
            .pixels
            .chunks(w.max(1))
            .rev()
            .flat_map(|row| row.iter().copied())
            .collect();
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Nearest-neighbour resize. Zero-sized targets give an empty sprite.
    pub fn scaled(&self, width: u32, height: u32) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height.max(1) as u64) as i32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width.max(1) as u64) as i32;
                pixels.push(self.pixel(sx, sy));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Rotate counter-clockwise by `degrees` about the centre.
    ///
    /// The result grows to the rotated bounding box, so a right-facing bird
    /// rotated by a positive angle points nose-up.
    pub fn rotated(&self, degrees: i32) -> Self {
        if degrees.rem_euclid(360) == 0 {
            return self.clone();
        }
        let theta = (degrees as f64).to_radians();
        let (sin, cos) = theta.sin_cos();
        let (w, h) = (self.width as f64, self.height as f64);

        let new_w = (w * cos.abs() + h * sin.abs() - 1e-9).ceil().max(1.0) as u32;
        let new_h = (w * sin.abs() + h * cos.abs() - 1e-9).ceil().max(1.0) as u32;

        let mut pixels = Vec::with_capacity((new_w as usize) * (new_h as usize));
        for y in 0..new_h {
            let dy = y as f64 + 0.5 - new_h as f64 / 2.0;
            for x in 0..new_w {
                let dx = x as f64 + 0.5 - new_w as f64 / 2.0;
                // Inverse rotation back into source space (y axis points down).
                let sx = dx * cos - dy * sin + w / 2.0;
                let sy = dx * sin + dy * cos + h / 2.0;
                pixels.push(self.pixel(sx.floor() as i32, sy.floor() as i32));
            }
        }
        Self {
            width: new_w,
            height: new_h,
            pixels,
        }
    }

    /// Number of pixels with alpha above `threshold`.
    pub fn opaque_count(&self, threshold: u8) -> usize {
        self.pixels.iter().filter(|p| p.a > threshold).count()
    }
}
