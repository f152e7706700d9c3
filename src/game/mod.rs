//! The simulation core: bird physics, pipes, difficulty, effects and the
//! round state machine that ties them together.

pub mod bird;
pub mod difficulty;
pub mod effects;
pub mod logic;
pub mod pipes;
pub mod types;

pub use bird::{Bird, BirdState};
pub use difficulty::DifficultyParams;
pub use effects::{Effects, Particle};
pub use logic::*;
pub use pipes::{Pipe, PipeField, PipePair, Polarity};
pub use types::*;
