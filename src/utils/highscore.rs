//! High-score storage: a single integer, stored as plain text.

use crate::core::HIGH_SCORE_FILE;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where the best score lives between runs.
pub trait HighScoreStore {
    /// Stored score; anything missing or unreadable is 0.
    fn read(&self) -> u32;

    fn write(&mut self, score: u32) -> io::Result<()>;
}

/// Parse stored text. Surrounding whitespace is allowed; anything else
/// that isn't a non-negative integer is 0.
pub fn parse_high_score(text: &str) -> u32 {
    text.trim().parse().unwrap_or(0)
}

/// `~/.skyflap/highscore.txt`, or any path given explicitly.
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store in the user's data directory.
    pub fn in_data_dir() -> io::Result<Self> {
        Ok(Self::new(super::persistence::data_path(HIGH_SCORE_FILE)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn read(&self) -> u32 {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let score = parse_high_score(&text);
                if score == 0 && !text.trim().is_empty() && text.trim() != "0" {
                    tracing::debug!(path = %self.path.display(), "unreadable high score, using 0");
                }
                score
            }
            Err(err) => {
                tracing::debug!(path = %self.path.display(), %err, "no high score file, using 0");
                0
            }
        }
    }

    fn write(&mut self, score: u32) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, score.to_string())
    }
}

/// In-memory store for tests and runs without a writable home directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryHighScoreStore {
    pub score: u32,
    /// How many times `write` was called.
    pub writes: u32,
}

impl MemoryHighScoreStore {
    pub fn new(score: u32) -> Self {
        Self { score, writes: 0 }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn read(&self) -> u32 {
        self.score
    }

    fn write(&mut self, score: u32) -> io::Result<()> {
        self.score = score;
        self.writes += 1;
        Ok(())
    }
}
