/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameSession` (and, where needed, an RNG handle) and returns a brand-new
/// `GameSession`.  Side effects are limited to the injected RNG and the
/// session's event outbox.

use rand::Rng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entities::{
    EntityId, Flash, GameSession, Mode, Player, PlayerBullet, Projectile, SHOT_PRUNE_MARGIN,
};
use crate::events::GameEvent;
use crate::schedule::{Scheduler, TaskKind};
use crate::spawner::{self, MAX_SHIELDS};

// ── Tuning ───────────────────────────────────────────────────────────────────

pub const MAX_FIRE_COOLDOWN: u32 = 20;
pub const BULLET_SPEED: f32 = 20.0;
/// Visibility toggles in the post-hit blink.
pub const BLINK_TOGGLES: u32 = 10;
pub const BLINK_INTERVAL_MS: u64 = 100;
pub const FLASH_STEPS: u32 = 6;
pub const FLASH_INTERVAL_MS: u64 = 50;
/// Shield timer on a fresh session; resets use `SHIELD_TIMER_AFTER_RESET`.
pub const INITIAL_SHIELD_TIMER: i32 = 400;
pub const SHIELD_TIMER_AFTER_RESET: i32 = 100;

pub fn level_for_score(score: u32) -> u32 {
    1 + score / 10
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build a fresh session sitting on the main menu.
pub fn init_state(config: &GameConfig, best_score: u32) -> GameSession {
    let world = config.world;
    let (start_x, start_y) = world.player_start();
    GameSession {
        world,
        mode: Mode::Menu,
        game_mode: config.game_mode,
        player: Player::new(start_x, start_y),
        enemies: Vec::new(),
        projectiles: Vec::new(),
        bullets: Vec::new(),
        shields: Vec::new(),
        flashes: Vec::new(),
        score: 0,
        best_score,
        level: 1,
        lives: config.game_mode.starting_lives(config.max_lives),
        max_lives: config.max_lives,
        has_shield: false,
        invincible: false,
        blink_count: 0,
        fire_cooldown: 0,
        max_fire_cooldown: MAX_FIRE_COOLDOWN,
        spawn_timer: 0,
        shield_spawn_timer: INITIAL_SHIELD_TIMER,
        crosshair_x: (world.width / 2.0).floor(),
        crosshair_y: (world.height / 2.0).floor(),
        crosshair_active: true,
        frame: 0,
        generation: 0,
        scheduler: Scheduler::new(),
        next_id: 0,
        events: Vec::new(),
    }
}

/// Clear the run back to its starting condition without touching the mode.
/// Pending blink/flash tasks are invalidated by bumping the generation.
pub(crate) fn reset_in_place(state: &mut GameSession) {
    state.enemies.clear();
    state.projectiles.clear();
    state.bullets.clear();
    state.shields.clear();
    state.flashes.clear();
    state.has_shield = false;
    state.shield_spawn_timer = SHIELD_TIMER_AFTER_RESET;
    state.spawn_timer = 0;

    state.score = 0;
    state.level = 1;
    let (start_x, start_y) = state.world.player_start();
    state.player.respawn_at(start_x, start_y);
    state.player.visible = true;
    state.lives = state.game_mode.starting_lives(state.max_lives);
    state.invincible = false;
    state.blink_count = 0;
    state.fire_cooldown = 0;

    state.generation += 1;
    state.scheduler.cancel_before(state.generation);
    debug!(generation = state.generation, "session reset");
}

// ── Player actions ───────────────────────────────────────────────────────────

/// Fire a bolt from the ship toward the crosshair.  Dropped silently while
/// the crosshair is inactive, the gun is cooling down, or the crosshair sits
/// exactly on the ship.
pub fn fire_bullet(state: &GameSession) -> GameSession {
    if !state.crosshair_active || state.fire_cooldown > 0 {
        return state.clone();
    }
    let dx = state.crosshair_x - state.player.x;
    let dy = state.crosshair_y - state.player.y;
    if dx == 0.0 && dy == 0.0 {
        return state.clone();
    }

    let length = dx.hypot(dy);
    let mut next = state.clone();
    let id = next.allocate_id();
    next.bullets.push(PlayerBullet::new(
        id,
        next.player.x,
        next.player.y,
        dx / length * BULLET_SPEED,
        dy / length * BULLET_SPEED,
    ));
    next.fire_cooldown = next.max_fire_cooldown;
    next
}

// ── Per-frame tick (RNG is injected) ────────────────────────────────────────

/// Advance the simulation by one frame.  Does nothing unless the session is
/// actively playing.  All randomness comes through `rng` so callers control
/// determinism (useful for tests with a seeded RNG).
pub fn tick(state: &GameSession, rng: &mut impl Rng) -> GameSession {
    let mut next = state.clone();
    if next.mode != Mode::Playing {
        return next;
    }
    next.frame += 1;

    // ── 1. Difficulty ────────────────────────────────────────────────────────
    next.level = level_for_score(next.score);

    // ── 2. Gun cooldown ──────────────────────────────────────────────────────
    next.fire_cooldown = next.fire_cooldown.saturating_sub(1);

    // ── 3. Player motion and facing ──────────────────────────────────────────
    let world = next.world;
    next.player.update(&world);
    let (aim_x, aim_y) = (next.crosshair_x, next.crosshair_y);
    next.player.face(aim_x, aim_y);

    // ── 4. Shield pickups ────────────────────────────────────────────────────
    if next.shields.len() < MAX_SHIELDS {
        next.shield_spawn_timer -= 1;
        if next.shield_spawn_timer <= 0 {
            let id = next.allocate_id();
            next.shields.push(spawner::spawn_shield(id, &world, rng));
            next.shield_spawn_timer = spawner::shield_respawn_delay(rng);
        }
    }

    // ── 5. Enemy spawns ──────────────────────────────────────────────────────
    next.spawn_timer -= 1;
    if next.spawn_timer <= 0 {
        let id = next.allocate_id();
        next.enemies.push(spawner::spawn_enemy(id, next.level, &world, rng));
        next.spawn_timer = spawner::enemy_spawn_interval(next.level);
    }

    // ── 6. Enemies ───────────────────────────────────────────────────────────
    advance_enemies(&mut next, rng);

    // ── 7. Shots ─────────────────────────────────────────────────────────────
    for projectile in &mut next.projectiles {
        projectile.update();
    }
    next.projectiles
        .retain(|p| !world.is_outside(p.x, p.y, SHOT_PRUNE_MARGIN));
    for bullet in &mut next.bullets {
        bullet.update();
    }
    next.bullets
        .retain(|b| !world.is_outside(b.x, b.y, SHOT_PRUNE_MARGIN));

    // ── 8. Collision: player bullets ↔ enemies ───────────────────────────────
    resolve_bullet_hits(&mut next);

    // ── 9. Collision: player ↔ shield pickups ────────────────────────────────
    resolve_shield_pickup(&mut next);

    // ── 10. Collision: player ↔ enemies, then player ↔ projectiles ───────────
    if !next.invincible {
        resolve_player_hits(&mut next);
    }

    next
}

fn advance_enemies(state: &mut GameSession, rng: &mut impl Rng) {
    let world = state.world;
    let level = state.level;
    let mut fired = Vec::new();
    let mut kept = Vec::with_capacity(state.enemies.len());

    for mut enemy in std::mem::take(&mut state.enemies) {
        enemy.update(&world, Some(&state.player), level, rng, |shot| fired.push(shot));

        if enemy.is_dying {
            if !enemy.tick_death() {
                kept.push(enemy);
            }
            continue;
        }
        if !enemy.is_out_of_bounds(&world) {
            kept.push(enemy);
        }
    }

    state.enemies = kept;
    for shot in fired {
        let id = state.allocate_id();
        state.projectiles.push(Projectile::new(id, shot));
    }
}

/// Each bullet takes out at most one live enemy; dying enemies are skipped.
fn resolve_bullet_hits(state: &mut GameSession) {
    let mut survivors = Vec::with_capacity(state.bullets.len());

    for bullet in std::mem::take(&mut state.bullets) {
        let bbox = bullet.bbox();
        let target = state
            .enemies
            .iter_mut()
            .find(|enemy| !enemy.is_dying && bbox.intersects(&enemy.bbox()));

        match target {
            Some(enemy) => {
                enemy.start_dying();
                let (id, x, y) = (enemy.id, enemy.x, enemy.y);
                state.score += 1;
                state.events.push(GameEvent::EnemyDestroyed { id, x, y });
                start_flash(state, x, y);
            }
            None => survivors.push(bullet),
        }
    }

    state.bullets = survivors;
}

/// Only one charge can be carried; touching another pickup while carrying
/// leaves it on the field.
fn resolve_shield_pickup(state: &mut GameSession) {
    if state.has_shield {
        return;
    }
    let player_box = state.player.bbox();
    if let Some(index) = state
        .shields
        .iter()
        .position(|shield| player_box.intersects(&shield.bbox()))
    {
        state.shields.remove(index);
        state.has_shield = true;
        state.events.push(GameEvent::ShieldCollected);
    }
}

/// Enemy contact is checked before projectiles; the first fatal hit ends the
/// tick.
fn resolve_player_hits(state: &mut GameSession) {
    let player_box = state.player.bbox();

    if state
        .enemies
        .iter()
        .any(|enemy| !enemy.is_dying && player_box.intersects(&enemy.bbox()))
    {
        hit_player(state);
        return;
    }

    let mut index = 0;
    while index < state.projectiles.len() {
        if !player_box.intersects(&state.projectiles[index].bbox()) {
            index += 1;
            continue;
        }
        if !state.has_shield {
            hit_player(state);
            return;
        }
        state.has_shield = false;
        state.projectiles.remove(index);
        state.events.push(GameEvent::ShieldAbsorbed);
    }
}

// ── Hit consequences ─────────────────────────────────────────────────────────

fn hit_player(state: &mut GameSession) {
    state.has_shield = false;
    state.lives = state.lives.saturating_sub(1);
    state.events.push(GameEvent::PlayerHit {
        lives_left: state.lives,
    });
    debug!(lives = state.lives, score = state.score, "player hit");

    if state.lives == 0 {
        end_game(state);
        return;
    }

    let (start_x, start_y) = state.world.player_start();
    state.player.respawn_at(start_x, start_y);
    state.projectiles.clear();

    state.invincible = true;
    state.blink_count = BLINK_TOGGLES;
    state.player.visible = true;
    let now = state.scheduler.now_ms();
    blink_step(state, now);
}

fn end_game(state: &mut GameSession) {
    state.mode = Mode::GameOver;
    state.events.push(GameEvent::GameOver { score: state.score });
    if state.score > state.best_score {
        state.best_score = state.score;
        state.events.push(GameEvent::BestScoreChanged(state.best_score));
    }
    info!(score = state.score, best = state.best_score, "game over");
}

// ── Deferred effects ─────────────────────────────────────────────────────────

/// Move the session clock forward and run every task that fell due, oldest
/// first.  Tasks from an earlier generation are discarded unrun.
pub fn advance_clock(state: &GameSession, elapsed_ms: u64) -> GameSession {
    let mut next = state.clone();
    next.scheduler.advance(elapsed_ms);

    while let Some(task) = next.scheduler.pop_due() {
        if task.generation != next.generation {
            continue;
        }
        match task.kind {
            TaskKind::BlinkPlayer => blink_step(&mut next, task.due_ms),
            TaskKind::AdvanceFlash(id) => flash_step(&mut next, id, task.due_ms),
        }
    }

    next
}

/// One blink toggle at time `at_ms`; the last one leaves the ship visible
/// and vulnerable.
fn blink_step(state: &mut GameSession, at_ms: u64) {
    state.player.visible = !state.player.visible;
    state.blink_count = state.blink_count.saturating_sub(1);

    if state.blink_count > 0 {
        state.scheduler.schedule_at(
            at_ms + BLINK_INTERVAL_MS,
            state.generation,
            TaskKind::BlinkPlayer,
        );
    } else {
        state.player.visible = true;
        state.invincible = false;
    }
}

fn start_flash(state: &mut GameSession, x: f32, y: f32) {
    let id = state.allocate_id();
    state.flashes.push(Flash { id, x, y, step: 0 });
    state
        .scheduler
        .schedule_in(FLASH_INTERVAL_MS, state.generation, TaskKind::AdvanceFlash(id));
}

fn flash_step(state: &mut GameSession, id: EntityId, at_ms: u64) {
    let Some(index) = state.flashes.iter().position(|flash| flash.id == id) else {
        return;
    };
    state.flashes[index].step += 1;
    if state.flashes[index].step >= FLASH_STEPS {
        state.flashes.remove(index);
        return;
    }
    state.scheduler.schedule_at(
        at_ms + FLASH_INTERVAL_MS,
        state.generation,
        TaskKind::AdvanceFlash(id),
    );
}
