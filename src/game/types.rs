//! Round state: phases, session counters, the events a tick emits, and the
//! top-level game struct that owns every simulated part.

use super::bird::Bird;
use super::difficulty::{self, DifficultyParams};
use super::effects::Effects;
use super::pipes::PipeField;
use crate::assets::AssetSet;
use crate::core::GameConfig;

/// Top-level round phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    Menu,
    Playing,
    GameOver,
}

/// Named sound triggers for whatever plays audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    Flap,
    Point,
    Hit,
    Die,
    Swoosh,
    MusicStart,
    MusicStop,
}

impl AudioCue {
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Flap => "flap",
            AudioCue::Point => "point",
            AudioCue::Hit => "hit",
            AudioCue::Die => "die",
            AudioCue::Swoosh => "swoosh",
            AudioCue::MusicStart => "music-start",
            AudioCue::MusicStop => "music-stop",
        }
    }
}

/// What ended the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    Ground,
    Ceiling,
    Pipe,
}

/// Everything observable that happened during one tick, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickEvent {
    Audio(AudioCue),
    RoundStarted,
    /// A pair was passed; carries the new score.
    Scored { score: u32 },
    /// Score first exceeded the high score this round.
    NewRecord { score: u32 },
    GameOver { cause: DeathCause, score: u32 },
    /// The finished round beat the stored high score; persist it.
    RecordHighScore { score: u32 },
    /// GameOver -> Menu.
    RoundReset,
}

/// The player's single action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyflapInput {
    /// Start, flap or restart depending on the phase.
    Flap,
    Other,
}

/// Per-round counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub score: u32,
    /// Seconds spent in `Playing` this round. Drives difficulty and pipe
    /// oscillation, so it freezes once the round ends.
    pub elapsed: f64,
    /// Best score known when the round started; raised at game over.
    pub high_score: u32,
    /// Set the first time `score` passes `high_score`, cleared on reset.
    pub new_record: bool,
}

impl Session {
    pub fn new(high_score: u32) -> Self {
        Self {
            score: 0,
            elapsed: 0.0,
            high_score,
            new_record: false,
        }
    }
}

/// Bookkeeping for the game-over screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameOverState {
    /// One-time side effects already fired.
    pub handled: bool,
    /// Ticks spent in `GameOver` since it was entered.
    pub ticks_since: u32,
    /// Button hold countdown once a restart press has been honoured.
    pub restart_countdown: Option<u32>,
}

/// Scroll offsets for the ground tile and the two background layers, each
/// wrapping at its image width.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenery {
    pub ground_offset: f64,
    pub background_offset: f64,
    pub background_long_offset: f64,
    ground_width: f64,
    background_width: f64,
    background_long_width: f64,
}

fn wrap(offset: f64, width: f64) -> f64 {
    if width <= 0.0 {
        0.0
    } else {
        offset.rem_euclid(width)
    }
}

impl Scenery {
    pub fn new(ground_width: u32, background_width: u32, background_long_width: u32) -> Self {
        Self {
            ground_offset: 0.0,
            background_offset: 0.0,
            background_long_offset: 0.0,
            ground_width: ground_width as f64,
            background_width: background_width as f64,
            background_long_width: background_long_width as f64,
        }
    }

    /// Ground moves with the pipes; backgrounds use their slower rates.
    pub fn scroll(&mut self, dt: f64, params: &DifficultyParams) {
        self.ground_offset = wrap(
            self.ground_offset + params.scroll_speed * dt,
            self.ground_width,
        );
        self.background_offset = wrap(
            self.background_offset + params.background_speed * dt,
            self.background_width,
        );
        self.background_long_offset = wrap(
            self.background_long_offset + params.background_long_speed * dt,
            self.background_long_width,
        );
    }
}

/// Main game state. Owns every simulated part; only `logic` mutates it.
#[derive(Debug, Clone)]
pub struct SkyflapGame {
    pub config: GameConfig,
    pub phase: RoundPhase,
    pub session: Session,
    pub bird: Bird,
    pub pipes: PipeField,
    pub effects: Effects,
    pub scenery: Scenery,
    pub game_over: GameOverState,
    /// Difficulty as evaluated on the last tick.
    pub difficulty: DifficultyParams,
    /// Seconds simulated since the game was created.
    pub clock: f64,
    /// Flap pressed since the last tick; presses within a tick collapse.
    pub flap_queued: bool,
}

impl SkyflapGame {
    /// Build a game on the menu. `config` is corrected against the bird's
    /// size before use.
    pub fn new(assets: AssetSet, config: GameConfig, high_score: u32) -> Self {
        let config = config.validated(assets.bird_height() as f64);
        let scenery = Scenery::new(
            assets.ground.width(),
            assets.background.width(),
            assets.background_long.width(),
        );
        let bird = Bird::new(assets.bird_frames, &config.physics);
        let pipes = PipeField::new(assets.pipe, assets.pipe_flipped, &config.pipes);
        let difficulty = difficulty::evaluate(0.0, 0, &config.difficulty);

        Self {
            phase: RoundPhase::Menu,
            session: Session::new(high_score),
            bird,
            pipes,
            effects: Effects::new(),
            scenery,
            game_over: GameOverState::default(),
            difficulty,
            clock: 0.0,
            flap_queued: false,
            config,
        }
    }

    /// Whether a restart press would be honoured right now.
    pub fn can_restart(&self) -> bool {
        self.phase == RoundPhase::GameOver
            && self.game_over.restart_countdown.is_none()
            && self.game_over.ticks_since >= self.config.round.restart_debounce_ticks
    }

    /// Best score to display: the running score once it is a new record.
    pub fn best_score(&self) -> u32 {
        self.session.high_score.max(self.session.score)
    }
}
