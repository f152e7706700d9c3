//! Sprite assets: text-art sheets decoded into [`Sprite`] bitmaps.
//!
//! A sheet is one sprite. Each non-comment line is a pixel row, each
//! character a palette entry. A row may end in ` *N` to repeat it `N` times,
//! which keeps tall pipe bodies readable. Lines starting with `#` are ignored.

pub mod sprite;

pub use sprite::{Rgba, Sprite};

use crate::error::SkyflapError;
use std::fs;
use std::path::Path;

/// Sheet names in load order; `--assets DIR` expects `DIR/<name>.txt`.
pub const BIRD_SHEETS: [&str; 3] = ["bird1", "bird2", "bird3"];
pub const PIPE_SHEET: &str = "pipe";
pub const GROUND_SHEET: &str = "ground";
pub const BACKGROUND_SHEET: &str = "background";
pub const BACKGROUND_LONG_SHEET: &str = "background_long";

const BUILTIN: [(&str, &str); 7] = [
    ("bird1", include_str!("../../assets/bird1.txt")),
    ("bird2", include_str!("../../assets/bird2.txt")),
    ("bird3", include_str!("../../assets/bird3.txt")),
    ("pipe", include_str!("../../assets/pipe.txt")),
    ("ground", include_str!("../../assets/ground.txt")),
    ("background", include_str!("../../assets/background.txt")),
    (
        "background_long",
        include_str!("../../assets/background_long.txt"),
    ),
];

/// Map a palette character to a colour. `None` means the character is not
/// part of the palette.
pub fn palette(c: char) -> Option<Rgba> {
    let color = match c {
        '.' => Rgba::TRANSPARENT,
        // Drop shadows: drawn, but too faint to count as solid.
        ':' => Rgba::new(0, 0, 0, 90),
        'K' => Rgba::opaque(30, 30, 30),
        'W' => Rgba::opaque(250, 250, 250),
        'w' => Rgba::opaque(250, 235, 180),
        'Y' => Rgba::opaque(250, 200, 40),
        'O' => Rgba::opaque(240, 120, 30),
        'G' => Rgba::opaque(90, 180, 60),
        'L' => Rgba::opaque(150, 220, 90),
        'g' => Rgba::opaque(40, 110, 40),
        'b' => Rgba::opaque(120, 80, 40),
        'S' => Rgba::opaque(220, 200, 140),
        's' => Rgba::opaque(190, 170, 110),
        'c' => Rgba::opaque(110, 150, 170),
        'C' => Rgba::opaque(80, 115, 135),
        'y' => Rgba::opaque(250, 230, 140),
        'M' => Rgba::opaque(240, 245, 250),
        'm' => Rgba::opaque(210, 225, 235),
        _ => return None,
    };
    Some(color)
}

/// Decode one sheet. `name` is only used in error messages.
pub fn parse_sheet(name: &str, text: &str) -> Result<Sprite, SkyflapError> {
    let malformed = |line: usize, reason: String| SkyflapError::AssetMalformed {
        name: name.to_string(),
        line,
        reason,
    };

    let mut width: Option<usize> = None;
    let mut rows = 0usize;
    let mut pixels = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (row, repeat) = match line.split_once(" *") {
            Some((row, count)) => {
                let n = count
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| malformed(line_no, format!("bad repeat '{count}'")))?;
                if n == 0 {
                    return Err(malformed(line_no, "repeat count must be at least 1".into()));
                }
                (row, n)
            }
            None => (line, 1),
        };

        let decoded = row
            .chars()
            .map(|c| {
                palette(c)
                    .ok_or_else(|| malformed(line_no, format!("unknown palette char '{c}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        match width {
            None => width = Some(decoded.len()),
            Some(w) if w != decoded.len() => {
                return Err(malformed(
                    line_no,
                    format!("ragged row: expected {w} pixels, found {}", decoded.len()),
                ));
            }
            Some(_) => {}
        }

        for _ in 0..repeat {
            pixels.extend_from_slice(&decoded);
        }
        rows += repeat;
    }

    let width = width.ok_or_else(|| malformed(0, "sheet has no pixel rows".into()))?;
    Sprite::from_pixels(width as u32, rows as u32, pixels)
        .ok_or_else(|| malformed(0, "pixel count mismatch".into()))
}

/// Every image the game needs, decoded once at startup.
#[derive(Debug, Clone)]
pub struct AssetSet {
    pub bird_frames: Vec<Sprite>,
    /// Bottom-mounted pipe, cap on top.
    pub pipe: Sprite,
    /// Top-mounted pipe, the mirror of `pipe`.
    pub pipe_flipped: Sprite,
    pub ground: Sprite,
    pub background: Sprite,
    pub background_long: Sprite,
}

impl AssetSet {
    /// The sheets compiled into the binary.
    pub fn builtin() -> Result<Self, SkyflapError> {
        Self::assemble(|name| {
            let text = BUILTIN
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, text)| *text)
                .ok_or_else(|| SkyflapError::AssetMissing { path: name.into() })?;
            parse_sheet(name, text)
        })
    }

    /// Load every sheet from `dir/<name>.txt`. Any missing or malformed
    /// sheet is an error; there is no partial fallback to built-ins.
    pub fn load_dir(dir: &Path) -> Result<Self, SkyflapError> {
        tracing::info!(dir = %dir.display(), "loading sprite sheets");
        Self::assemble(|name| {
            let path = dir.join(format!("{name}.txt"));
            let text = fs::read_to_string(&path).map_err(|err| {
                if err.kind() == std::io::ErrorKind::NotFound {
                    SkyflapError::AssetMissing { path: path.clone() }
                } else {
                    SkyflapError::Io(err)
                }
            })?;
            parse_sheet(name, &text)
        })
    }

    fn assemble<F>(mut load: F) -> Result<Self, SkyflapError>
    where
        F: FnMut(&str) -> Result<Sprite, SkyflapError>,
    {
        let bird_frames = BIRD_SHEETS
            .iter()
            .map(|name| load(*name))
            .collect::<Result<Vec<_>, _>>()?;
        let pipe = load(PIPE_SHEET)?;
        let pipe_flipped = pipe.flipped_vertical();

        Ok(Self {
            bird_frames,
            pipe,
            pipe_flipped,
            ground: load(GROUND_SHEET)?,
            background: load(BACKGROUND_SHEET)?,
            background_long: load(BACKGROUND_LONG_SHEET)?,
        })
    }

    /// Tallest bird frame, which bounds the smallest fair pipe gap.
    pub fn bird_height(&self) -> u32 {
        self.bird_frames.iter().map(Sprite::height).max().unwrap_or(0)
    }
}
