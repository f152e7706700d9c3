mod audio;
mod input;
mod ui;

use audio::TerminalAudio;
use crossterm::event::{self, Event};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use input::{map_key, InputAction};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use skyflap::assets::AssetSet;
use skyflap::core::{GameConfig, CONFIG_FILE, LOG_FILE, TICK_INTERVAL_MS};
use skyflap::game::{process_input, process_tick, SkyflapGame, SkyflapInput, TickEvent};
use skyflap::utils::build_info;
use skyflap::utils::persistence::{data_path, load_json_or_default, save_json};
use skyflap::utils::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use ui::SceneryImages;

/// Options for a normal run.
#[derive(Debug, Default, PartialEq)]
struct RunOptions {
    assets: Option<PathBuf>,
    seed: Option<u64>,
    mute: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
    WriteConfig,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut options = RunOptions::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-v" => return Ok(Command::Version),
            "--write-config" => return Ok(Command::WriteConfig),
            "--mute" => options.mute = true,
            "--assets" => {
                let dir = iter.next().ok_or("--assets needs a directory")?;
                options.assets = Some(PathBuf::from(dir));
            }
            "--seed" => {
                let value = iter.next().ok_or("--seed needs a number")?;
                let seed = value
                    .parse()
                    .map_err(|_| format!("invalid seed: {}", value))?;
                options.seed = Some(seed);
            }
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }
    Ok(Command::Run(options))
}

fn print_help() {
    println!("Skyflap - terminal flappy bird\n");
    println!("Usage: skyflap [options]\n");
    println!("Options:");
    println!("  --assets DIR    Load sprite sheets from DIR/<name>.txt");
    println!("  --seed N        Seed the pipe and particle RNG");
    println!("  --mute          Never ring the terminal bell");
    println!("  --write-config  Write the default config to ~/.skyflap/config.json");
    println!("  --version       Show version information");
    println!("  --help          Show this help message");
}

/// Log to ~/.skyflap/skyflap.log. If the file can't be opened, run without logs.
fn init_logging() {
    let Ok(path) = data_path(LOG_FILE) else {
        return;
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(path) else {
        return;
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let options = match parse_args(&args) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            print_help();
            return Ok(());
        }
        Ok(Command::Version) => {
            println!("{}", build_info::version_line());
            return Ok(());
        }
        Ok(Command::WriteConfig) => {
            save_json(CONFIG_FILE, &GameConfig::default())?;
            println!("Wrote {}", data_path(CONFIG_FILE)?.display());
            return Ok(());
        }
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'skyflap --help' for usage.");
            std::process::exit(2);
        }
    };

    init_logging();
    tracing::info!(version = %build_info::version_line(), "starting");

    // Fail before touching the terminal if any sprite is unusable.
    let loaded = match &options.assets {
        Some(dir) => AssetSet::load_dir(dir),
        None => AssetSet::builtin(),
    };
    let assets = loaded.map_err(|err| {
        tracing::error!(%err, "asset load failed");
        eprintln!("skyflap: {}", err);
        io::Error::from(err)
    })?;

    let config: GameConfig = load_json_or_default(CONFIG_FILE);
    let mut store: Box<dyn HighScoreStore> = match FileHighScoreStore::in_data_dir() {
        Ok(store) => {
            tracing::info!(path = %store.path().display(), "high score store opened");
            Box::new(store)
        }
        Err(err) => {
            tracing::warn!(%err, "no data directory, high score will not persist");
            Box::new(MemoryHighScoreStore::default())
        }
    };
    let high_score = store.read();

    let images = SceneryImages {
        far: assets.background_long.clone(),
        near: assets.background.clone(),
        ground: assets.ground.clone(),
    };
    let mut game = SkyflapGame::new(assets, config, high_score);
    game.bird.prewarm(&game.config.physics);

    let mut rng = match options.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut audio = TerminalAudio::new(!options.mute);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(
        &mut terminal,
        &mut game,
        &images,
        store.as_mut(),
        &mut audio,
        &mut rng,
    );

    // Cleanup terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!(high_score = game.session.high_score, "exiting");
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    game: &mut SkyflapGame,
    images: &SceneryImages,
    store: &mut dyn HighScoreStore,
    audio: &mut TerminalAudio,
    rng: &mut ChaCha8Rng,
) -> io::Result<()> {
    let tick = Duration::from_millis(TICK_INTERVAL_MS);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| {
            let area = f.size();
            ui::render_game(f, area, game, images);
        })?;

        // Drain input until the next tick is due.
        let deadline = last_tick + tick;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                match map_key(key) {
                    InputAction::Quit => return Ok(()),
                    InputAction::Flap => process_input(game, SkyflapInput::Flap),
                    InputAction::Ignore => {}
                }
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_tick).as_secs_f64();
        last_tick = now;

        for event in process_tick(game, dt, rng) {
            handle_event(event, store, audio);
        }
    }
}

fn handle_event(event: TickEvent, store: &mut dyn HighScoreStore, audio: &mut TerminalAudio) {
    match event {
        TickEvent::Audio(cue) => audio.play(cue),
        TickEvent::RecordHighScore { score } => {
            if let Err(err) = store.write(score) {
                tracing::warn!(%err, score, "failed to save high score");
            }
        }
        other => tracing::trace!(?other, "tick event"),
    }
}
