/// All game entity types plus the per-entity kinematics the tick drives.
///
/// Nothing in here knows about terminals or sprites: an entity is position,
/// velocity and a bounding box.  Renderers key their own drawables off the
/// stable `EntityId` each entity carries.

use std::f32::consts::TAU;

use rand::Rng;

use crate::collision::Aabb;
use crate::config::GameMode;
use crate::events::GameEvent;
use crate::schedule::Scheduler;

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const PLAYER_SPEED: f32 = 6.0;
/// 60×60 ship sprite.
pub const PLAYER_HALF_EXTENT: f32 = 30.0;
/// 60×60 enemy sprite.
pub const ENEMY_HALF_EXTENT: f32 = 30.0;
pub const PROJECTILE_HALF_EXTENT: f32 = 8.0;
pub const BULLET_HALF_EXTENT: f32 = 10.0;
/// 50×50 pickup sprite.
pub const SHIELD_HALF_EXTENT: f32 = 25.0;

/// Ticks an enemy spends in its death animation before removal.
pub const DEATH_TICKS: u32 = 10;
/// Frames of lookahead used by lead-prediction aim.
const LEAD_FRAMES: f32 = 15.0;
/// Muzzle speed before the per-kind multiplier: `6 + level * 0.3`.
const PROJECTILE_BASE_SPEED: f32 = 6.0;
const PROJECTILE_LEVEL_SPEED: f32 = 0.3;
/// Chaser pursuit speed: `4 + level * 0.3`.
const CHASER_BASE_SPEED: f32 = 4.0;
const CHASER_LEVEL_SPEED: f32 = 0.3;

/// Alive enemies are dropped once this far outside the world.
pub const ENEMY_PRUNE_MARGIN: f32 = 40.0;
/// Projectiles and bullets are dropped once this far outside the world.
pub const SHOT_PRUNE_MARGIN: f32 = 50.0;

// ── World ─────────────────────────────────────────────────────────────────────

/// Logical playfield size.  The HUD occupies the top quarter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct World {
    pub width: f32,
    pub height: f32,
}

impl World {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The HUD / play-field divider.
    pub fn line_y(&self) -> f32 {
        (self.height / 4.0).floor()
    }

    /// Where the ship sits at the start of a run and after every hit.
    pub fn player_start(&self) -> (f32, f32) {
        ((self.width / 2.0).floor(), self.height - 50.0)
    }

    pub fn is_outside(&self, x: f32, y: f32, margin: f32) -> bool {
        x < -margin || x > self.width + margin || y < -margin || y > self.height + margin
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Menu,
    About,
    Playing,
    Paused,
    GameOver,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub speed: f32,
    /// Facing in degrees, purely cosmetic.
    pub angle: f32,
    pub half_width: f32,
    pub half_height: f32,
    /// Toggled by the post-hit blink.
    pub visible: bool,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
            speed: PLAYER_SPEED,
            angle: 0.0,
            half_width: PLAYER_HALF_EXTENT,
            half_height: PLAYER_HALF_EXTENT,
            visible: true,
        }
    }

    /// Apply velocity, then clamp into the play field below the divider.
    pub fn update(&mut self, world: &World) {
        self.x += self.vx;
        self.y += self.vy;

        self.x = self
            .x
            .max(self.half_width)
            .min(world.width - self.half_width);

        let min_y = world.line_y() + self.half_height;
        self.y = self.y.max(min_y).min(world.height - self.half_height);
    }

    /// Turn the ship toward an aim point.  A zero offset keeps the old angle.
    pub fn face(&mut self, target_x: f32, target_y: f32) {
        let dx = target_x - self.x;
        let dy = target_y - self.y;
        if dx != 0.0 || dy != 0.0 {
            self.angle = dy.atan2(dx).to_degrees();
        }
    }

    /// Teleport to `(x, y)` and stop.
    pub fn respawn_at(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.vx = 0.0;
        self.vy = 0.0;
    }

    pub fn bbox(&self) -> Aabb {
        Aabb::centered(self.x, self.y, self.half_width, self.half_height)
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

/// Sinusoidal sway parameters rolled once at spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZigzagMotion {
    pub phase: f32,
    pub amplitude: f32,
    pub speed: f32,
    pub base_x: f32,
}

impl ZigzagMotion {
    pub fn roll(base_x: f32, rng: &mut impl Rng) -> Self {
        Self {
            phase: rng.gen_range(0.0..TAU),
            amplitude: rng.gen_range(40..=120) as f32,
            speed: rng.gen_range(0.03..0.07),
            base_x,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnemyKind {
    /// Straight line along its velocity.
    Basic,
    /// Falls while swaying around a fixed column.
    Zigzag(ZigzagMotion),
    /// Homes in on the player and never shoots.
    Chaser,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileColor {
    Ice,
    Violet,
    Crimson,
}

impl EnemyKind {
    /// Projectile colour and speed multiplier for this kind.
    pub fn projectile_style(&self) -> (ProjectileColor, f32) {
        match self {
            EnemyKind::Basic => (ProjectileColor::Ice, 1.0),
            EnemyKind::Zigzag(_) => (ProjectileColor::Violet, 0.6),
            EnemyKind::Chaser => (ProjectileColor::Crimson, 1.0),
        }
    }

    pub fn is_chaser(&self) -> bool {
        matches!(self, EnemyKind::Chaser)
    }
}

/// Parameters of a shot an enemy wants spawned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSpawn {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: ProjectileColor,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub kind: EnemyKind,
    pub can_shoot: bool,
    /// Ticks until the next shot; meaningless while `can_shoot` is false.
    pub shoot_cooldown: i32,
    pub is_dying: bool,
    pub death_timer: u32,
    pub projectile_color: ProjectileColor,
    pub projectile_speed_mult: f32,
    pub half_width: f32,
    pub half_height: f32,
    /// Ticks since spawn; drives the exhaust animation.
    pub age: u32,
}

impl Enemy {
    pub fn new(
        id: EntityId,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
        kind: EnemyKind,
        can_shoot: bool,
        rng: &mut impl Rng,
    ) -> Self {
        let (projectile_color, projectile_speed_mult) = kind.projectile_style();
        Self {
            id,
            x,
            y,
            vx,
            vy,
            kind,
            can_shoot,
            shoot_cooldown: if can_shoot { rng.gen_range(5..=20) } else { -1 },
            is_dying: false,
            death_timer: 0,
            projectile_color,
            projectile_speed_mult,
            half_width: ENEMY_HALF_EXTENT,
            half_height: ENEMY_HALF_EXTENT,
            age: 0,
        }
    }

    /// Enter the death animation.  Irreversible; repeated calls do nothing.
    pub fn start_dying(&mut self) {
        if self.is_dying {
            return;
        }
        self.is_dying = true;
        self.death_timer = DEATH_TICKS;
        self.can_shoot = false;
        self.vx *= 0.5;
        self.vy *= 0.5;
    }

    /// Count the death animation down by one tick.  Returns `true` on the
    /// tick the counter reaches zero, i.e. when the enemy must be removed.
    pub fn tick_death(&mut self) -> bool {
        self.death_timer = self.death_timer.saturating_sub(1);
        self.death_timer == 0
    }

    /// Move one tick and maybe fire.  Shots go out through `spawn_projectile`.
    pub fn update(
        &mut self,
        world: &World,
        player: Option<&Player>,
        level: u32,
        rng: &mut impl Rng,
        mut spawn_projectile: impl FnMut(ProjectileSpawn),
    ) {
        let level = level as f32;

        match (&mut self.kind, player) {
            (EnemyKind::Chaser, Some(player)) if !self.is_dying => {
                let dx = player.x - self.x;
                let dy = player.y - self.y;
                let length = non_zero(dx.hypot(dy));
                let speed = CHASER_BASE_SPEED + level * CHASER_LEVEL_SPEED;
                self.x += dx / length * speed;
                self.y += dy / length * speed;
            }
            (EnemyKind::Zigzag(motion), _) => {
                self.y += self.vy;
                motion.phase += motion.speed;
                self.x = motion.base_x + motion.phase.sin() * motion.amplitude;
            }
            _ => {
                self.y += self.vy;
                self.x += self.vx;
            }
        }

        self.age = self.age.wrapping_add(1);

        if !self.can_shoot || self.kind.is_chaser() || self.is_dying || self.y <= world.line_y()
        {
            return;
        }

        self.shoot_cooldown -= 1;
        if self.shoot_cooldown > 0 {
            return;
        }
        self.shoot_cooldown = rng.gen_range(30..=50);

        let speed =
            (PROJECTILE_BASE_SPEED + level * PROJECTILE_LEVEL_SPEED) * self.projectile_speed_mult;
        let muzzle_y = self.y + self.half_height;

        let (vx, vy) = match player {
            Some(player) => {
                let target_x = player.x + player.vx * LEAD_FRAMES;
                let target_y = player.y + player.vy * LEAD_FRAMES;
                let dx = target_x - self.x;
                let dy = target_y - muzzle_y;
                let length = non_zero(dx.hypot(dy));
                (
                    dx / length * speed + rng.gen_range(-1.0..=1.0),
                    dy / length * speed + rng.gen_range(-0.5..=0.5),
                )
            }
            None => (rng.gen_range(-1.5..=1.5), speed),
        };

        spawn_projectile(ProjectileSpawn {
            x: self.x,
            y: muzzle_y,
            vx,
            vy,
            color: self.projectile_color,
        });
    }

    /// Alive enemies leave through the bottom or either side; the top stays
    /// open because top-entry spawns start above the screen.
    pub fn is_out_of_bounds(&self, world: &World) -> bool {
        self.y > world.height + ENEMY_PRUNE_MARGIN
            || self.x < -ENEMY_PRUNE_MARGIN
            || self.x > world.width + ENEMY_PRUNE_MARGIN
    }

    pub fn bbox(&self) -> Aabb {
        Aabb::centered(self.x, self.y, self.half_width, self.half_height)
    }
}

fn non_zero(length: f32) -> f32 {
    if length == 0.0 {
        1.0
    } else {
        length
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// An enemy shot.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub color: ProjectileColor,
    pub half_extent: f32,
}

impl Projectile {
    pub fn new(id: EntityId, spawn: ProjectileSpawn) -> Self {
        Self {
            id,
            x: spawn.x,
            y: spawn.y,
            vx: spawn.vx,
            vy: spawn.vy,
            color: spawn.color,
            half_extent: PROJECTILE_HALF_EXTENT,
        }
    }

    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    pub fn bbox(&self) -> Aabb {
        Aabb::centered(self.x, self.y, self.half_extent, self.half_extent)
    }
}

/// A laser bolt fired by the player toward the crosshair.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerBullet {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub half_extent: f32,
    pub age: u32,
}

impl PlayerBullet {
    pub fn new(id: EntityId, x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self {
            id,
            x,
            y,
            vx,
            vy,
            half_extent: BULLET_HALF_EXTENT,
            age: 0,
        }
    }

    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.age = self.age.wrapping_add(1);
    }

    pub fn bbox(&self) -> Aabb {
        Aabb::centered(self.x, self.y, self.half_extent, self.half_extent)
    }
}

// ── Pickups & effects ─────────────────────────────────────────────────────────

/// A shield pickup lying on the field.
#[derive(Clone, Debug, PartialEq)]
pub struct Shield {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub half_width: f32,
    pub half_height: f32,
}

impl Shield {
    pub fn new(id: EntityId, x: f32, y: f32) -> Self {
        Self {
            id,
            x,
            y,
            half_width: SHIELD_HALF_EXTENT,
            half_height: SHIELD_HALF_EXTENT,
        }
    }

    pub fn bbox(&self) -> Aabb {
        Aabb::centered(self.x, self.y, self.half_width, self.half_height)
    }
}

/// Short burst drawn where an enemy was shot.  Advanced by scheduled tasks,
/// not by the tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Flash {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub step: u32,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire session.  Cloneable so the pure update functions can return a
/// new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub world: World,
    pub mode: Mode,
    pub game_mode: GameMode,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    /// Enemy shots.
    pub projectiles: Vec<Projectile>,
    /// Player shots.
    pub bullets: Vec<PlayerBullet>,
    pub shields: Vec<Shield>,
    pub flashes: Vec<Flash>,
    pub score: u32,
    pub best_score: u32,
    pub level: u32,
    pub lives: u32,
    /// Lives granted by a classic-mode reset.
    pub max_lives: u32,
    /// A carried shield charge absorbs one projectile.
    pub has_shield: bool,
    pub invincible: bool,
    /// Visibility toggles left in the post-hit blink.
    pub blink_count: u32,
    pub fire_cooldown: u32,
    pub max_fire_cooldown: u32,
    pub spawn_timer: i32,
    pub shield_spawn_timer: i32,
    pub crosshair_x: f32,
    pub crosshair_y: f32,
    pub crosshair_active: bool,
    pub frame: u64,
    /// Bumped on every reset; scheduled tasks from older generations are
    /// ignored.
    pub generation: u64,
    pub scheduler: Scheduler,
    pub next_id: u64,
    /// Outbox drained by the frontend after each transition.
    pub events: Vec<GameEvent>,
}

impl GameSession {
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
