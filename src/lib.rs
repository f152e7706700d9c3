//! Skyflap - terminal flappy bird.
//!
//! The library holds the whole simulation (assets, collision, physics,
//! pipes, difficulty, effects and the round state machine) so it can be
//! tested without a terminal. Rendering, input and audio live in the binary.

pub mod assets;
pub mod collision;
pub mod core;
pub mod error;
pub mod game;
pub mod utils;

pub use error::SkyflapError;
