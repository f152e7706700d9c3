//! Playfield constants and tunable configuration.

pub mod config;
pub mod constants;

pub use config::*;
pub use constants::*;
