/// Rendering layer. All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable render
/// snapshot.  No game logic is performed; this module only translates the
/// snapshot into terminal commands, scaling world coordinates onto
/// whatever size the terminal currently has.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use space_shooter::collision::Aabb;
use space_shooter::entities::ProjectileColor;
use space_shooter::render::{
    Button, EnemyLook, EnemySprite, FieldView, Frame, Hud, Overlay, PlayerSprite, Scene,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_TITLE: Color = Color::Cyan;
const C_BUTTON: Color = Color::Yellow;
const C_BUTTON_SELECTED: Color = Color::Green;
const C_DIVIDER: Color = Color::DarkBlue;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::DarkYellow;
const C_PLAYER: Color = Color::White;
const C_SHIELD: Color = Color::Cyan;
const C_ENEMY_BASIC: Color = Color::Green;
const C_ENEMY_ZIGZAG: Color = Color::Magenta;
const C_ENEMY_CHASER: Color = Color::Red;
const C_BULLET: Color = Color::Cyan;
const C_CROSSHAIR: Color = Color::Red;
const C_AIM_GUIDE: Color = Color::DarkYellow;
const C_COOLDOWN: Color = Color::DarkYellow;
const C_READY: Color = Color::Green;
const C_HINT: Color = Color::DarkGrey;

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Maps the logical world onto terminal cells and back.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    world_width: f32,
    world_height: f32,
}

impl Viewport {
    pub fn new((cols, rows): (u16, u16), world_width: f32, world_height: f32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            world_width,
            world_height,
        }
    }

    /// Cell covering a world point, or `None` when the point is off-screen.
    pub fn to_cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.world_width || y >= self.world_height {
            return None;
        }
        let col = (x / self.world_width * self.cols as f32) as u16;
        let row = (y / self.world_height * self.rows as f32) as u16;
        Some((col.min(self.cols - 1), row.min(self.rows - 1)))
    }

    /// World point at the centre of a cell.
    pub fn to_world(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.world_width / self.cols as f32,
            (row as f32 + 0.5) * self.world_height / self.rows as f32,
        )
    }

    fn row_of(&self, y: f32) -> u16 {
        let row = (y.max(0.0) / self.world_height * self.rows as f32) as u16;
        row.min(self.rows - 1)
    }

    fn col_of(&self, x: f32) -> u16 {
        let col = (x.max(0.0) / self.world_width * self.cols as f32) as u16;
        col.min(self.cols - 1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(
    out: &mut W,
    frame: &Frame,
    view: &Viewport,
    description: &[String],
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    match &frame.scene {
        Scene::Menu {
            buttons,
            best_score,
        } => draw_menu(out, view, buttons, *best_score)?,
        Scene::About { panel, back_button } => {
            draw_about(out, view, *panel, back_button, description)?
        }
        Scene::Field(field) => draw_field(out, view, field)?,
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, view.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Shared helpers ────────────────────────────────────────────────────────────

fn put<W: Write>(out: &mut W, col: u16, row: u16, color: Color, text: &str) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

/// Text centred on a world point, clipped to the screen.
fn put_centered<W: Write>(
    out: &mut W,
    view: &Viewport,
    x: f32,
    y: f32,
    color: Color,
    text: &str,
) -> std::io::Result<()> {
    let half = text.chars().count() as u16 / 2;
    let col = view.col_of(x).saturating_sub(half);
    put(out, col, view.row_of(y), color, text)
}

fn put_at_world<W: Write>(
    out: &mut W,
    view: &Viewport,
    x: f32,
    y: f32,
    color: Color,
    glyph: &str,
) -> std::io::Result<()> {
    match view.to_cell(x, y) {
        Some((col, row)) => put(out, col, row, color, glyph),
        None => Ok(()),
    }
}

fn draw_box<W: Write>(out: &mut W, view: &Viewport, rect: Aabb, color: Color) -> std::io::Result<()> {
    let left = view.col_of(rect.min_x);
    let right = view.col_of(rect.max_x).max(left + 1);
    let top = view.row_of(rect.min_y);
    let bottom = view.row_of(rect.max_y).max(top + 1);
    let inner = (right - left).saturating_sub(1) as usize;

    put(out, left, top, color, &format!("┌{}┐", "─".repeat(inner)))?;
    for row in top + 1..bottom {
        put(out, left, row, color, &format!("│{}│", " ".repeat(inner)))?;
    }
    put(out, left, bottom, color, &format!("└{}┘", "─".repeat(inner)))?;
    Ok(())
}

fn draw_button<W: Write>(out: &mut W, view: &Viewport, button: &Button) -> std::io::Result<()> {
    let color = if button.selected {
        C_BUTTON_SELECTED
    } else {
        C_BUTTON
    };
    draw_box(out, view, button.rect, color)?;
    let (cx, cy) = button.rect.center();
    put_centered(out, view, cx, cy, Color::White, button.label)
}

// ── Menu & about ──────────────────────────────────────────────────────────────

fn draw_menu<W: Write>(
    out: &mut W,
    view: &Viewport,
    buttons: &[Button],
    best_score: u32,
) -> std::io::Result<()> {
    let top = buttons
        .iter()
        .map(|b| b.rect.min_y)
        .fold(f32::MAX, f32::min);
    let (world_cx, _) = view.to_world(view.cols / 2, 0);
    put_centered(out, view, world_cx, top - 60.0, C_TITLE, "★  SPACE  SHOOTER  ★")?;

    for button in buttons {
        draw_button(out, view, button)?;
    }

    if let Some(reset) = buttons.iter().find(|b| b.label == "RESET") {
        put_centered(
            out,
            view,
            world_cx,
            reset.rect.min_y - 25.0,
            C_HUD_SCORE,
            &format!("Best Score: {}", best_score),
        )?;
    }

    put(
        out,
        1,
        view.rows.saturating_sub(1),
        C_HINT,
        "Click a button   Q : Quit",
    )?;
    Ok(())
}

fn draw_about<W: Write>(
    out: &mut W,
    view: &Viewport,
    panel: Aabb,
    back: &Button,
    description: &[String],
) -> std::io::Result<()> {
    draw_box(out, view, panel, C_BUTTON)?;
    let (cx, _) = panel.center();
    put_centered(out, view, cx, panel.min_y + 40.0, Color::White, "ABOUT")?;

    let left = view.col_of(panel.min_x) + 2;
    let first_row = view.row_of(panel.min_y + 80.0);
    let last_row = view.row_of(back.rect.min_y).saturating_sub(1);
    let width = view
        .col_of(panel.max_x)
        .saturating_sub(left + 1) as usize;
    for (line, row) in description.iter().zip(first_row..last_row) {
        let clipped: String = line.chars().take(width).collect();
        put(out, left, row, Color::White, &clipped)?;
    }

    draw_button(out, view, back)
}

// ── Play field ────────────────────────────────────────────────────────────────

fn draw_field<W: Write>(out: &mut W, view: &Viewport, field: &FieldView) -> std::io::Result<()> {
    draw_hud(out, view, field.line_y, &field.hud)?;

    for shield in &field.shields {
        put_at_world(out, view, shield.x, shield.y, C_SHIELD, "◎")?;
    }
    if field.aim_guide {
        if let Some((cx, cy)) = field.crosshair {
            draw_aim_guide(out, view, &field.player, cx, cy)?;
        }
    }
    draw_player(out, view, &field.player)?;
    draw_cooldown_bar(out, view, &field.player, &field.hud)?;

    for enemy in &field.enemies {
        draw_enemy(out, view, enemy)?;
    }
    for projectile in &field.projectiles {
        let color = match projectile.color {
            ProjectileColor::Ice => Color::Blue,
            ProjectileColor::Violet => Color::Magenta,
            ProjectileColor::Crimson => Color::Red,
        };
        put_at_world(out, view, projectile.x, projectile.y, color, "•")?;
    }
    for bullet in &field.bullets {
        let glyph = if bullet.age % 4 < 2 { "✦" } else { "✧" };
        put_at_world(out, view, bullet.x, bullet.y, C_BULLET, glyph)?;
    }
    for flash in &field.flashes {
        let color = if flash.step % 2 == 0 {
            Color::Yellow
        } else {
            Color::DarkYellow
        };
        put_at_world(out, view, flash.x, flash.y, color, "✺")?;
    }

    if let Some((cx, cy)) = field.crosshair {
        put_at_world(out, view, cx, cy, C_CROSSHAIR, "┼")?;
    }

    match &field.overlay {
        Some(Overlay::Paused { panel, exit_button }) => draw_paused(out, view, *panel, *exit_button)?,
        Some(Overlay::GameOver { score }) => draw_game_over(out, view, *score)?,
        None => {}
    }
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, view: &Viewport, line_y: f32, hud: &Hud) -> std::io::Result<()> {
    let divider = view.row_of(line_y);
    let hud_row = divider.saturating_sub(1);

    put(
        out,
        1,
        0,
        C_TITLE,
        "SPACE SHOOTER   SPACE : Pause   ←↑→↓ / WASD : Move   Click : Fire   Q : Quit",
    )?;

    let hearts = "♥".repeat(hud.lives as usize);
    put(out, 1, hud_row, C_HUD_LIVES, &format!("Lives: {}", hearts))?;

    let score = format!("Score: {:>5}   Best: {:>5}", hud.score, hud.best_score);
    put(out, 16 + hud.lives as u16, hud_row, C_HUD_SCORE, &score)?;

    let level = format!("[ LEVEL {} ]", hud.level);
    let lx = (view.cols / 2).saturating_sub(level.len() as u16 / 2);
    put(out, lx.max(50), hud_row, C_HUD_LEVEL, &level)?;

    if hud.has_shield {
        let col = view.cols.saturating_sub(12);
        put(out, col, hud_row, C_SHIELD, "◎ SHIELD")?;
    }

    put(out, 0, divider, C_DIVIDER, &"═".repeat(view.cols as usize))?;
    Ok(())
}

fn heading_glyph(angle: f32) -> &'static str {
    // Screen y grows downward, so 90° points down.
    const GLYPHS: [&str; 8] = ["→", "↘", "↓", "↙", "←", "↖", "↑", "↗"];
    let octant = ((angle.rem_euclid(360.0) + 22.5) / 45.0) as usize % 8;
    GLYPHS[octant]
}

fn draw_player<W: Write>(out: &mut W, view: &Viewport, player: &PlayerSprite) -> std::io::Result<()> {
    if !player.visible {
        return Ok(());
    }
    let Some((col, row)) = view.to_cell(player.x, player.y) else {
        return Ok(());
    };
    if player.shielded {
        put(out, col.saturating_sub(1), row, C_SHIELD, "(")?;
        put(out, col + 1, row, C_SHIELD, ")")?;
    }
    put(out, col, row, C_PLAYER, heading_glyph(player.angle))
}

fn draw_cooldown_bar<W: Write>(
    out: &mut W,
    view: &Viewport,
    player: &PlayerSprite,
    hud: &Hud,
) -> std::io::Result<()> {
    const BAR_CELLS: usize = 6;
    let Some((col, row)) = view.to_cell(player.x, player.y) else {
        return Ok(());
    };
    let row = row + 1;
    if row >= view.rows {
        return Ok(());
    }
    let left = col.saturating_sub(BAR_CELLS as u16 / 2);
    if hud.fire_cooldown == 0 {
        return put(out, left, row, C_READY, &"▮".repeat(BAR_CELLS));
    }
    let filled = (hud.fire_cooldown_ratio * BAR_CELLS as f32).ceil() as usize;
    let bar = format!(
        "{}{}",
        "▮".repeat(filled.min(BAR_CELLS)),
        "▯".repeat(BAR_CELLS.saturating_sub(filled))
    );
    put(out, left, row, C_COOLDOWN, &bar)
}

fn draw_aim_guide<W: Write>(
    out: &mut W,
    view: &Viewport,
    player: &PlayerSprite,
    target_x: f32,
    target_y: f32,
) -> std::io::Result<()> {
    const DOTS: usize = 12;
    for i in 1..DOTS {
        let t = i as f32 / DOTS as f32;
        let x = player.x + (target_x - player.x) * t;
        let y = player.y + (target_y - player.y) * t;
        put_at_world(out, view, x, y, C_AIM_GUIDE, "·")?;
    }
    Ok(())
}

fn draw_enemy<W: Write>(out: &mut W, view: &Viewport, enemy: &EnemySprite) -> std::io::Result<()> {
    let Some((col, row)) = view.to_cell(enemy.x, enemy.y) else {
        return Ok(());
    };
    let left = col.saturating_sub(1);

    if let Some(timer) = enemy.dying {
        let color = if timer % 2 == 0 {
            Color::Yellow
        } else {
            Color::DarkYellow
        };
        return put(out, left, row, color, "*#*");
    }

    let (sprite, color) = match enemy.look {
        EnemyLook::Basic => ("<▼>", C_ENEMY_BASIC),
        EnemyLook::Zigzag => ("≈◆≈", C_ENEMY_ZIGZAG),
        EnemyLook::Chaser => ("(◉)", C_ENEMY_CHASER),
    };
    put(out, left, row, color, sprite)?;

    // Exhaust flicker behind armed enemies.
    if enemy.armed && row > 0 && (enemy.age / 3) % 2 == 0 {
        put(out, col, row - 1, Color::DarkRed, "^")?;
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_paused<W: Write>(
    out: &mut W,
    view: &Viewport,
    panel: Aabb,
    exit_button: Aabb,
) -> std::io::Result<()> {
    draw_box(out, view, panel, Color::Red)?;
    let (cx, _) = panel.center();
    put_centered(out, view, cx, panel.min_y + 50.0, Color::White, "PAUSED")?;
    put_centered(out, view, cx, panel.min_y + 90.0, Color::Yellow, "Press SPACE to resume")?;
    draw_button(
        out,
        view,
        &Button {
            rect: exit_button,
            label: "QUIT TO MENU",
            selected: false,
        },
    )
}

fn draw_game_over<W: Write>(out: &mut W, view: &Viewport, score: u32) -> std::io::Result<()> {
    let score_line = format!("Final Score: {}", score);
    let lines: &[(&str, Color)] = &[
        ("╔══════════════════╗", Color::Red),
        ("║    GAME  OVER    ║", Color::Red),
        ("╚══════════════════╝", Color::Red),
        (score_line.as_str(),    Color::Yellow),
        ("Click - Play Again  Q - Quit", Color::White),
    ];

    let cx = view.cols / 2;
    let start_row = (view.rows / 2).saturating_sub(lines.len() as u16 / 2);

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        put(out, col, row, *color, msg)?;
    }

    Ok(())
}
