mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use wave_shooter::compute::{init_state, tick, toggle_pause};
use wave_shooter::config::GameConfig;
use wave_shooter::entities::GameState;
use wave_shooter::input::{InputEvent, KeyTracker};
use wave_shooter::templates::{Content, DEFAULT_CONTENT};
use wave_shooter::textures::{TextureTable, DEFAULT_MANIFEST};

#[derive(Parser)]
#[command(author, version, about = "Top-down arcade shooter with scripted enemy waves", long_about = None)]
struct Cli {
    /// Game tunables (TOML); built-in defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Bullet/enemy templates and waves (TOML); built-in content when omitted
    #[arg(long)]
    content: Option<PathBuf>,
    /// Texture manifest (TOML); built-in glyphs when omitted
    #[arg(long)]
    textures: Option<PathBuf>,
    /// Log destination; the terminal itself is busy drawing the game
    #[arg(long, default_value = "wave_shooter.log")]
    log_file: PathBuf,
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

// ── Run context ───────────────────────────────────────────────────────────────

/// Everything the frame loop needs that is not game state: created once at
/// startup, torn down once at exit.
struct RunContext<W: Write> {
    out: W,
    textures: TextureTable,
    config: GameConfig,
    rx: mpsc::Receiver<Event>,
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => GameConfig::load(path),
        None => Ok(GameConfig::default()),
    }
}

/// Texture and content problems are not fatal: the game runs with whatever
/// could be loaded.
fn load_textures(path: Option<&Path>) -> TextureTable {
    let loaded = match path {
        Some(path) => TextureTable::load_manifest(path),
        None => TextureTable::from_manifest_str(DEFAULT_MANIFEST).context("built-in textures"),
    };
    loaded.unwrap_or_else(|err| {
        error!("{err:#}");
        TextureTable::new()
    })
}

fn load_content(path: Option<&Path>) -> Content {
    let loaded = match path {
        Some(path) => Content::load(path),
        None => Content::from_toml_str(DEFAULT_CONTENT).context("built-in content"),
    };
    loaded.unwrap_or_else(|err| {
        error!("{err:#}");
        Content::default()
    })
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until a quit event.  Each frame: drain input, simulate (skipped
/// while paused), present, then sleep out the rest of the frame.
fn game_loop<W: Write>(ctx: &mut RunContext<W>, mut state: GameState) -> std::io::Result<GameState> {
    let frame = Duration::from_millis(ctx.config.frame_ms);
    let mut keys = KeyTracker::new();
    let mut quit = false;

    while !quit {
        let frame_start = Instant::now();
        keys.begin_frame();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = ctx.rx.try_recv() {
            let Event::Key(key) = ev else {
                continue;
            };
            match keys.handle(&key) {
                Some(InputEvent::Quit) => quit = true,
                Some(InputEvent::TogglePause) => state = toggle_pause(&state),
                None => {}
            }
        }

        state = tick(&state, &keys.snapshot(), &ctx.config);

        display::render(&mut ctx.out, &state, &ctx.textures, &ctx.config)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
    Ok(state)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let config = load_config(cli.config.as_deref()).map_err(|err| {
        error!("{err:#}");
        err
    })?;
    let textures = load_textures(cli.textures.as_deref());
    let waves = load_content(cli.content.as_deref()).build_waves(&textures);
    let state = init_state(&config, waves, &textures, &mut thread_rng());

    let mut out = BufWriter::new(stdout());
    if let Err(err) = enter_terminal(&mut out) {
        error!(%err, "terminal init failed");
        restore_terminal(&mut out, false);
        return Err(err).context("terminal init");
    }
    info!(
        width = config.screen_width,
        height = config.screen_height,
        frame_ms = config.frame_ms,
        "started"
    );

    // Release events let held keys drop at once; without them keys expire
    // after the tracker's hold window.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads happen here; the frame loop only polls the channel.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // frame loop is gone
                }
            }
            Err(_) => break,
        }
    });

    let mut ctx = RunContext {
        out,
        textures,
        config,
        rx,
    };
    let result = game_loop(&mut ctx, state);

    // Restore the terminal whatever the loop returned.
    restore_terminal(&mut ctx.out, keyboard_enhanced);

    let state = result.context("frame loop")?;
    info!(
        score = state.score,
        kills = state.kills,
        deaths = state.player.life.deaths,
        waves_cleared = state.waves.retired(),
        "gameplay stats"
    );
    Ok(())
}

fn enter_terminal<W: Write>(out: &mut W) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    Ok(())
}

/// Undo `enter_terminal` and any pushed keyboard flags.  Safe after a partial
/// setup: each step is attempted and failures are ignored.
fn restore_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}
