// Playfield (sprite pixels; one pixel = one half-block terminal cell)
pub const PLAYFIELD_WIDTH: u32 = 96;
pub const PLAYFIELD_HEIGHT: u32 = 64;
pub const GROUND_LEVEL: f64 = 52.0;
pub const BIRD_X: f64 = 20.0;
/// Where the bird hovers on the menu and restarts from.
pub const BIRD_START_Y: f64 = 28.0;
/// Vertical line pipe gaps are centred on before the random offset.
pub const PIPE_CENTER_Y: f64 = 28.0;

// Tick and timing
pub const TICKS_PER_SECOND: u32 = 60;
pub const TICK_INTERVAL_MS: u64 = 1000 / TICKS_PER_SECOND as u64;
/// Largest dt a single tick may advance by (frame hitches, debugger pauses).
pub const MAX_TICK_DT: f64 = 0.1;

// Collision
/// Alpha values strictly above this count as solid in a mask.
pub const MASK_ALPHA_THRESHOLD: u8 = 127;

// Persistence
pub const DATA_DIR_NAME: &str = ".skyflap";
pub const HIGH_SCORE_FILE: &str = "highscore.txt";
pub const CONFIG_FILE: &str = "config.json";
pub const LOG_FILE: &str = "skyflap.log";
