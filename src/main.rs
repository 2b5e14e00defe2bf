mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::Path;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use space_shooter::compute::{advance_clock, init_state, tick};
use space_shooter::config::{Cli, GameConfig};
use space_shooter::entities::GameSession;
use space_shooter::events::GameEvent;
use space_shooter::game::{handle_input, HeldKeys, InputEvent, MoveKey};
use space_shooter::render::snapshot;
use space_shooter::storage::{load_description, ScoreStore};

use display::Viewport;

const FRAME: Duration = Duration::from_millis(25); // 40 FPS

// ── Held-key tracking ─────────────────────────────────────────────────────────

/// A key counts as held if its last press/repeat event arrived within this
/// many frames.  Terminals without release events only send repeats, and
/// the OS repeat rate refreshes a 6-frame (150 ms) window before it lapses.
const HOLD_WINDOW: u64 = 6;

fn move_key(code: KeyCode) -> Option<MoveKey> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(MoveKey::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(MoveKey::Right),
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(MoveKey::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(MoveKey::Down),
        _ => None,
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the game, so logs only go anywhere when a file
/// is given.  `RUST_LOG` overrides the default `info` level.
fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Everything the loop needs besides the terminal.
struct Session<'a> {
    store: &'a ScoreStore,
    description: &'a [String],
    rng: StdRng,
}

/// Input model: `HeldKeys` records when each movement key was pressed and
/// last seen, and re-sends every held key once per frame.
///
/// Works on both keyboard-enhancement terminals (real `Release` events) and
/// classic ones (repeated `Press` only, keys expire after `HOLD_WINDOW`).
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    session: &mut Session<'_>,
    mut state: GameSession,
) -> anyhow::Result<()> {
    let mut held = HeldKeys::new(HOLD_WINDOW);
    let mut frame: u64 = 0;
    let started = Instant::now();
    let mut clock_ms: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let view = Viewport::new(terminal::size()?, state.world.width, state.world.height);
        let mut inputs: Vec<InputEvent> = Vec::new();

        // ── Drain all pending terminal events (non-blocking) ──────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(());
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(());
                            }
                            KeyCode::Char(' ') => inputs.push(InputEvent::TogglePause),
                            _ => {}
                        }
                        if let Some(key) = move_key(code) {
                            held.press(key, frame);
                        }
                    }
                    KeyEventKind::Repeat => {
                        if let Some(key) = move_key(code) {
                            held.press(key, frame);
                        }
                    }
                    KeyEventKind::Release => {
                        if let Some(key) = move_key(code) {
                            held.release(key);
                        }
                    }
                },
                Event::Mouse(MouseEvent {
                    kind, column, row, ..
                }) => {
                    let (x, y) = view.to_world(column, row);
                    match kind {
                        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                            inputs.push(InputEvent::MouseMove { x, y });
                        }
                        MouseEventKind::Down(MouseButton::Left) => {
                            inputs.push(InputEvent::MouseMove { x, y });
                            inputs.push(InputEvent::Click { x, y });
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        // ── Held keys ─────────────────────────────────────────────────────────
        inputs.extend(held.inputs(frame));

        for input in inputs {
            state = handle_input(&state, input);
        }

        // ── Simulation step and timers ────────────────────────────────────────
        state = tick(&state, &mut session.rng);
        let elapsed_ms = started.elapsed().as_millis() as u64;
        state = advance_clock(&state, elapsed_ms.saturating_sub(clock_ms));
        clock_ms = elapsed_ms;

        for event in state.drain_events() {
            on_game_event(session.store, event);
        }

        display::render(out, &snapshot(&state), &view, session.description)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

fn on_game_event(store: &ScoreStore, event: GameEvent) {
    match event {
        GameEvent::BestScoreChanged(best) => {
            if let Err(err) = store.save(best) {
                warn!("could not persist best score: {err}");
            }
        }
        GameEvent::GameOver { score } => info!(score, "game over"),
        GameEvent::PlayerHit { lives_left } => info!(lives_left, "player hit"),
        other => debug!(event = ?other, "game event"),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config: GameConfig = cli.game_config();
    let store = ScoreStore::new(&cli.score_file);
    let description = load_description(&cli.description_file);
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let state = init_state(&config, store.load());
    info!(
        width = config.world.width,
        height = config.world.height,
        mode = ?config.game_mode,
        "starting"
    );

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("failed to enable raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let mut session = Session {
        store: &store,
        description: &description,
        rng,
    };
    let result = game_loop(&mut out, &rx, &mut session, state);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        warn!("exiting with error: {err:#}");
    }
    result
}
