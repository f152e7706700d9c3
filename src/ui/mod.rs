//! Terminal rendering for the game screen.

pub mod scene;

pub use scene::{render_game, SceneryImages};
