/// Read-only view of a session for drawing.
///
/// `snapshot` is the only thing a renderer needs: it never hands out the
/// session itself, and every sprite carries the stable id of the entity it
/// was taken from so renderers can keep per-entity drawables.

use crate::collision::Aabb;
use crate::config::GameMode;
use crate::entities::{EnemyKind, EntityId, GameSession, Mode, ProjectileColor};
use crate::game::Layout;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyLook {
    Basic,
    Zigzag,
    Chaser,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSprite {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub visible: bool,
    pub shielded: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnemySprite {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub look: EnemyLook,
    pub armed: bool,
    /// Remaining death ticks while the enemy is going down.
    pub dying: Option<u32>,
    pub age: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileSprite {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: ProjectileColor,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BulletSprite {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    /// Direction of travel in degrees.
    pub angle: f32,
    pub age: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShieldSprite {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlashSprite {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub step: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub best_score: u32,
    pub lives: u32,
    pub level: u32,
    pub fire_cooldown: u32,
    /// 0.0 when ready to fire, 1.0 right after a shot.
    pub fire_cooldown_ratio: f32,
    pub has_shield: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Overlay {
    Paused { panel: Aabb, exit_button: Aabb },
    GameOver { score: u32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Button {
    pub rect: Aabb,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldView {
    pub line_y: f32,
    pub player: PlayerSprite,
    pub enemies: Vec<EnemySprite>,
    pub projectiles: Vec<ProjectileSprite>,
    pub bullets: Vec<BulletSprite>,
    pub shields: Vec<ShieldSprite>,
    pub flashes: Vec<FlashSprite>,
    pub crosshair: Option<(f32, f32)>,
    /// Dashed guide from ship to crosshair, classic mode only.
    pub aim_guide: bool,
    pub hud: Hud,
    pub overlay: Option<Overlay>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Scene {
    Menu {
        buttons: Vec<Button>,
        best_score: u32,
    },
    About {
        panel: Aabb,
        back_button: Button,
    },
    Field(FieldView),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    pub scene: Scene,
}

pub fn snapshot(state: &GameSession) -> Frame {
    let layout = Layout::new(&state.world);
    let scene = match state.mode {
        Mode::Menu => Scene::Menu {
            buttons: menu_buttons(state.game_mode, &layout),
            best_score: state.best_score,
        },
        Mode::About => Scene::About {
            panel: layout.about_panel,
            back_button: Button {
                rect: layout.about_back,
                label: "BACK",
                selected: false,
            },
        },
        Mode::Playing | Mode::Paused | Mode::GameOver => Scene::Field(field_view(state, &layout)),
    };
    Frame {
        width: state.world.width,
        height: state.world.height,
        scene,
    }
}

fn menu_buttons(game_mode: GameMode, layout: &Layout) -> Vec<Button> {
    vec![
        Button {
            rect: layout.start,
            label: "START",
            selected: false,
        },
        Button {
            rect: layout.classic,
            label: "CLASSIC",
            selected: game_mode == GameMode::Classic,
        },
        Button {
            rect: layout.hardcore,
            label: "HARDCORE",
            selected: game_mode == GameMode::Hardcore,
        },
        Button {
            rect: layout.reset_score,
            label: "RESET",
            selected: false,
        },
        Button {
            rect: layout.info,
            label: "INFO",
            selected: false,
        },
    ]
}

fn field_view(state: &GameSession, layout: &Layout) -> FieldView {
    let player = &state.player;

    let enemies = state
        .enemies
        .iter()
        .map(|enemy| EnemySprite {
            id: enemy.id,
            x: enemy.x,
            y: enemy.y,
            look: match enemy.kind {
                EnemyKind::Basic => EnemyLook::Basic,
                EnemyKind::Zigzag(_) => EnemyLook::Zigzag,
                EnemyKind::Chaser => EnemyLook::Chaser,
            },
            armed: enemy.can_shoot,
            dying: enemy.is_dying.then_some(enemy.death_timer),
            age: enemy.age,
        })
        .collect();

    let projectiles = state
        .projectiles
        .iter()
        .map(|p| ProjectileSprite {
            id: p.id,
            x: p.x,
            y: p.y,
            vx: p.vx,
            vy: p.vy,
            color: p.color,
        })
        .collect();

    let bullets = state
        .bullets
        .iter()
        .map(|b| BulletSprite {
            id: b.id,
            x: b.x,
            y: b.y,
            angle: b.vy.atan2(b.vx).to_degrees(),
            age: b.age,
        })
        .collect();

    let shields = state
        .shields
        .iter()
        .map(|s| ShieldSprite {
            id: s.id,
            x: s.x,
            y: s.y,
        })
        .collect();

    let flashes = state
        .flashes
        .iter()
        .map(|f| FlashSprite {
            id: f.id,
            x: f.x,
            y: f.y,
            step: f.step,
        })
        .collect();

    let fire_cooldown_ratio = if state.max_fire_cooldown > 0 {
        state.fire_cooldown as f32 / state.max_fire_cooldown as f32
    } else {
        0.0
    };

    let overlay = match state.mode {
        Mode::Paused => Some(Overlay::Paused {
            panel: layout.pause_panel,
            exit_button: layout.pause_exit,
        }),
        Mode::GameOver => Some(Overlay::GameOver { score: state.score }),
        _ => None,
    };

    let aiming = state.mode == Mode::Playing && state.crosshair_active;

    FieldView {
        line_y: state.world.line_y(),
        player: PlayerSprite {
            x: player.x,
            y: player.y,
            angle: player.angle,
            visible: player.visible,
            shielded: state.has_shield,
        },
        enemies,
        projectiles,
        bullets,
        shields,
        flashes,
        crosshair: aiming.then_some((state.crosshair_x, state.crosshair_y)),
        aim_guide: aiming && state.game_mode != GameMode::Hardcore,
        hud: Hud {
            score: state.score,
            best_score: state.best_score,
            lives: state.lives,
            level: state.level,
            fire_cooldown: state.fire_cooldown,
            fire_cooldown_ratio,
            has_shield: state.has_shield,
        },
        overlay,
    }
}
