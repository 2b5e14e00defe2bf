/// Top-level mode machine and input dispatch.
///
/// Input is a plain `(state, event) -> state` function so the whole flow
/// from menu to game-over can be driven in tests without a terminal.
///
///   Menu ──start──▶ Playing ◀──space──▶ Paused ──exit──▶ Menu
///    │ ▲               │
///   info back      last life
///    ▼ │               ▼
///   About           GameOver ──click──▶ Playing

use std::collections::HashMap;

use tracing::{debug, info};

use crate::collision::Aabb;
use crate::compute::{fire_bullet, reset_in_place};
use crate::config::GameMode;
use crate::entities::{GameSession, Mode, World};
use crate::events::GameEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveKey {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(MoveKey),
    KeyUp(MoveKey),
    TogglePause,
    /// Pointer position in world coordinates.
    MouseMove { x: f32, y: f32 },
    /// Primary click in world coordinates.
    Click { x: f32, y: f32 },
}

// ── Held keys ─────────────────────────────────────────────────────────────────

/// Tracks which movement keys are down and turns that into inputs once per
/// frame.
///
/// Every held key is re-sent as `KeyDown` each frame, so velocity comes back
/// after a respawn or reset zeroes it while the key stays down. Presses are
/// emitted oldest first, which leaves the most recent press in charge when
/// opposite directions are both held.
#[derive(Clone, Debug, Default)]
pub struct HeldKeys {
    hold_window: u64,
    /// key -> (frame it became held, frame it was last seen)
    keys: HashMap<MoveKey, (u64, u64)>,
    released: Vec<MoveKey>,
}

impl HeldKeys {
    /// A key lapses when no press or repeat arrives for `hold_window` frames.
    pub fn new(hold_window: u64) -> Self {
        Self {
            hold_window,
            ..Self::default()
        }
    }

    /// Record a press or repeat seen on `frame`.
    pub fn press(&mut self, key: MoveKey, frame: u64) {
        self.keys
            .entry(key)
            .and_modify(|(_, last)| *last = frame)
            .or_insert((frame, frame));
    }

    /// Record an explicit release.
    pub fn release(&mut self, key: MoveKey) {
        if self.keys.remove(&key).is_some() {
            self.released.push(key);
        }
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.keys.contains_key(&key)
    }

    /// Inputs for `frame`: releases and lapsed keys first, then a `KeyDown`
    /// for every key still held, ordered by press frame.
    pub fn inputs(&mut self, frame: u64) -> Vec<InputEvent> {
        let window = self.hold_window;
        let mut released = std::mem::take(&mut self.released);
        self.keys.retain(|key, (_, last)| {
            let fresh = frame.saturating_sub(*last) <= window;
            if !fresh {
                released.push(*key);
            }
            fresh
        });
        released.sort();

        let mut held: Vec<(u64, MoveKey)> = self
            .keys
            .iter()
            .map(|(key, (since, _))| (*since, *key))
            .collect();
        held.sort();

        released
            .into_iter()
            .map(InputEvent::KeyUp)
            .chain(held.into_iter().map(|(_, key)| InputEvent::KeyDown(key)))
            .collect()
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

/// Clickable regions of every screen, in world coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub start: Aabb,
    pub classic: Aabb,
    pub hardcore: Aabb,
    pub reset_score: Aabb,
    pub info: Aabb,
    pub about_panel: Aabb,
    pub about_back: Aabb,
    pub pause_panel: Aabb,
    pub pause_exit: Aabb,
}

impl Layout {
    pub fn new(world: &World) -> Self {
        let cx = (world.width / 2.0).floor();
        let cy = (world.height / 2.0).floor();
        let button_w = 160.0;
        let button_h = 40.0;
        let gap = 20.0;
        // The whole menu block sits a little above centre.
        let lift = -110.0;

        let start = Aabb::new(cx - 150.0, cy - 50.0, cx + 150.0, cy + 50.0).shifted(lift);

        let mode_y = cy + 80.0;
        let classic = Aabb::new(cx - button_w - gap / 2.0, mode_y, cx - gap / 2.0, mode_y + button_h)
            .shifted(lift);
        let hardcore = Aabb::new(cx + gap / 2.0, mode_y, cx + button_w, mode_y + button_h)
            .shifted(lift);

        let row_y = cy + 170.0;
        let reset_score = Aabb::new(cx - button_w - gap / 2.0, row_y, cx - gap / 2.0, row_y + button_h)
            .shifted(lift);
        let info = Aabb::new(cx + gap / 2.0, row_y, cx + button_w, row_y + button_h).shifted(lift);

        let panel_w = world.width * 0.6;
        let panel_h = world.height * 0.6;
        let panel_x = ((world.width - panel_w) / 2.0).floor();
        let panel_y = ((world.height - panel_h) / 2.0).floor();
        let about_panel = Aabb::new(panel_x, panel_y, panel_x + panel_w, panel_y + panel_h);
        let (about_cx, _) = about_panel.center();
        let back_x = about_cx.floor() - 100.0;
        let back_bottom = about_panel.max_y - 40.0;
        let about_back = Aabb::new(back_x, back_bottom - 40.0, back_x + 200.0, back_bottom);

        let pause_panel = Aabb::new(
            (world.width / 4.0).floor(),
            cy - 80.0,
            (3.0 * world.width / 4.0).floor(),
            cy + 100.0,
        );
        let (pause_cx, _) = pause_panel.center();
        let exit_x = pause_cx.floor() - 130.0;
        let exit_y = pause_panel.min_y + 130.0;
        let pause_exit = Aabb::new(exit_x, exit_y, exit_x + 260.0, exit_y + 40.0);

        Self {
            start,
            classic,
            hardcore,
            reset_score,
            info,
            about_panel,
            about_back,
            pause_panel,
            pause_exit,
        }
    }
}

// ── Mode transitions ─────────────────────────────────────────────────────────

/// Start (or restart) a run: everything back to the start line, playing.
pub fn start_game(state: &GameSession) -> GameSession {
    let mut next = state.clone();
    begin_play(&mut next);
    next
}

/// Reset the run without changing the mode.
pub fn reset_game(state: &GameSession) -> GameSession {
    let mut next = state.clone();
    reset_in_place(&mut next);
    next
}

fn begin_play(state: &mut GameSession) {
    reset_in_place(state);
    state.mode = Mode::Playing;
    state.events.push(GameEvent::GameStarted {
        game_mode: state.game_mode,
    });
    info!(mode = ?state.game_mode, lives = state.lives, "run started");
}

// ── Input dispatch ───────────────────────────────────────────────────────────

pub fn handle_input(state: &GameSession, event: InputEvent) -> GameSession {
    match event {
        InputEvent::KeyDown(key) => {
            let mut next = state.clone();
            let speed = next.player.speed;
            match key {
                MoveKey::Left => next.player.vx = -speed,
                MoveKey::Right => next.player.vx = speed,
                MoveKey::Up => next.player.vy = -speed,
                MoveKey::Down => next.player.vy = speed,
            }
            next
        }
        InputEvent::KeyUp(key) => {
            let mut next = state.clone();
            match key {
                MoveKey::Left | MoveKey::Right => next.player.vx = 0.0,
                MoveKey::Up | MoveKey::Down => next.player.vy = 0.0,
            }
            next
        }
        InputEvent::TogglePause => toggle_pause(state),
        InputEvent::MouseMove { x, y } => aim(state, x, y),
        InputEvent::Click { x, y } => click(state, x, y),
    }
}

fn toggle_pause(state: &GameSession) -> GameSession {
    let mut next = state.clone();
    match next.mode {
        Mode::Playing => {
            next.mode = Mode::Paused;
            next.crosshair_active = false;
        }
        Mode::Paused => next.mode = Mode::Playing,
        Mode::Menu | Mode::About | Mode::GameOver => return next,
    }
    debug!(mode = ?next.mode, "pause toggled");
    next
}

/// The crosshair follows the pointer only while playing and below the
/// divider; anywhere else it is switched off.
fn aim(state: &GameSession, x: f32, y: f32) -> GameSession {
    let mut next = state.clone();
    if next.mode != Mode::Playing || y < next.world.line_y() {
        next.crosshair_active = false;
        return next;
    }
    next.crosshair_active = true;
    next.crosshair_x = x;
    next.crosshair_y = y;
    next
}

fn click(state: &GameSession, x: f32, y: f32) -> GameSession {
    let layout = Layout::new(&state.world);
    let mut next = state.clone();

    match next.mode {
        Mode::Menu => {
            if layout.start.contains(x, y) {
                begin_play(&mut next);
            } else if layout.classic.contains(x, y) {
                next.game_mode = GameMode::Classic;
            } else if layout.hardcore.contains(x, y) {
                next.game_mode = GameMode::Hardcore;
            } else if layout.reset_score.contains(x, y) {
                next.best_score = 0;
                next.events.push(GameEvent::BestScoreChanged(0));
            } else if layout.info.contains(x, y) {
                next.mode = Mode::About;
                debug!("about screen opened");
            }
            next
        }
        Mode::About => {
            if layout.about_back.contains(x, y) {
                next.mode = Mode::Menu;
            }
            next
        }
        Mode::Playing => fire_bullet(state),
        Mode::Paused => {
            if layout.pause_exit.contains(x, y) {
                reset_in_place(&mut next);
                next.mode = Mode::Menu;
                info!("run abandoned from pause menu");
            }
            next
        }
        Mode::GameOver => {
            begin_play(&mut next);
            next
        }
    }
}
