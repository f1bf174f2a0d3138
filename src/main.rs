mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

use galaga::config::Settings;
use galaga::entities::GameStatus;
use galaga::error::Result;
use galaga::game_loop::GameLoop;
use galaga::input::{HoldWindow, Key};

use display::Viewport;

#[derive(PartialEq)]
enum Flow {
    Continue,
    Quit,
}

// ── Key mapping ───────────────────────────────────────────────────────────────

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Key::Right),
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Char('p') | KeyCode::Char('P') => Some(Key::Pause),
        _ => None,
    }
}

fn handle_key<R: Rng>(
    game: &mut GameLoop<R>,
    held: &mut HoldWindow,
    event: KeyEvent,
    now: f64,
) -> Flow {
    let KeyEvent {
        code,
        kind,
        modifiers,
        ..
    } = event;

    match kind {
        KeyEventKind::Press => {
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Flow::Quit,
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Flow::Quit;
                }
                KeyCode::Enter => {
                    game.start(now);
                }
                KeyCode::Char('r') | KeyCode::Char('R')
                    if matches!(game.status(), GameStatus::GameOver | GameStatus::Paused) =>
                {
                    game.restart(now);
                }
                _ => {}
            }
            if let Some(key) = map_key(code) {
                held.seen(key, now);
                game.key_down(key, now);
            }
        }
        // Repeat: refresh timestamp so the key stays held
        KeyEventKind::Repeat => {
            if let Some(key) = map_key(code) {
                held.seen(key, now);
            }
        }
        KeyEventKind::Release => {
            if let Some(key) = map_key(code) {
                held.forget(key);
                game.key_up(key);
            }
        }
    }
    Flow::Continue
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Drives the game until the player quits.
///
/// While a frame is pending the loop paces itself to the configured frame
/// rate and hands the request back to the driver.  Otherwise (menu, pause,
/// game over) it blocks on input for up to one frame interval.
fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, settings: &Settings) -> Result<()> {
    let rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut game = GameLoop::new(rng, settings.loop_config());
    let frame = settings.frame_interval();

    let clock = Instant::now();
    let now_ms = || clock.elapsed().as_secs_f64() * 1000.0;

    // Release events end a hold early where the terminal reports them;
    // everywhere else a key lapses once it stops repeating.
    let mut held = HoldWindow::default();

    loop {
        let frame_start = Instant::now();

        let first = if game.pending_frame().is_some() {
            rx.try_recv().ok()
        } else {
            rx.recv_timeout(frame).ok()
        };
        let events = first
            .into_iter()
            .chain(std::iter::from_fn(|| rx.try_recv().ok()));
        for ev in events {
            if let Event::Key(key_event) = ev {
                if handle_key(&mut game, &mut held, key_event, now_ms()) == Flow::Quit {
                    info!(score = game.state().score, "player quit");
                    return Ok(());
                }
            }
        }

        for key in held.expire(now_ms()) {
            game.key_up(key);
        }

        let (width, height) = terminal::size()?;
        let view = Viewport { width, height };

        match game.pending_frame() {
            Some(request) => {
                let elapsed = frame_start.elapsed();
                if elapsed < frame {
                    thread::sleep(frame - elapsed);
                }
                if let Some(snapshot) = game.on_frame(request, now_ms()) {
                    display::render(out, &snapshot, view)?;
                }
            }
            None => display::render(out, &game.snapshot(), view)?,
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(settings: &Settings) -> anyhow::Result<()> {
    // The terminal is in raw mode while playing, so logs only go to a file.
    let Some(path) = &settings.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_ascii_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::parse();
    settings.validate().context("invalid settings")?;
    init_logging(&settings)?;
    info!(
        fps = settings.fps,
        max_delta_ms = settings.max_delta_ms,
        seed = ?settings.seed,
        "starting"
    );

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals honour this; the hold window covers the rest.
    // Writing the request succeeds either way, so this only records whether
    // the flags need popping on exit.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &settings);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("game loop failed")
}
