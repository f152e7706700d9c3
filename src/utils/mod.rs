//! Utility modules: build info, data directory persistence, high scores.

pub mod build_info;
pub mod highscore;
pub mod persistence;

pub use highscore::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
