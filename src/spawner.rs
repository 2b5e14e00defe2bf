/// Decides where, when and what kind of enemy or shield appears.
///
/// All randomness comes through the injected `rng` so a seeded generator
/// reproduces a run exactly.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::entities::{Enemy, EnemyKind, EntityId, Shield, World, ZigzagMotion};

// ── Difficulty tables ────────────────────────────────────────────────────────

/// At most this many shield pickups lie on the field at once.
pub const MAX_SHIELDS: usize = 5;

const SIDE_ENTRY_CHANCE: f64 = 0.2;

/// Chance that a freshly spawned enemy can shoot.
pub fn shoot_chance(level: u32) -> f64 {
    (0.5 + level as f64 * 0.05).min(0.8)
}

/// Ticks until the next enemy spawn.
pub fn enemy_spawn_interval(level: u32) -> i32 {
    (50 - level as i32 * 5).max(25)
}

/// Ticks until the next shield spawn.
pub fn shield_respawn_delay(rng: &mut impl Rng) -> i32 {
    rng.gen_range(100..=300)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindTag {
    Basic,
    Zigzag,
    Chaser,
}

/// Weights for basic, zigzag and chaser, or `None` while only basic
/// enemies appear.
pub fn kind_weights(level: u32) -> Option<[f64; 3]> {
    match level {
        0..=2 => None,
        3..=4 => Some([0.4, 0.35, 0.25]),
        _ => Some([0.25, 0.4, 0.35]),
    }
}

pub fn roll_kind(level: u32, rng: &mut impl Rng) -> KindTag {
    const KINDS: [KindTag; 3] = [KindTag::Basic, KindTag::Zigzag, KindTag::Chaser];
    kind_weights(level)
        .and_then(|weights| WeightedIndex::new(weights).ok())
        .map_or(KindTag::Basic, |dist| KINDS[dist.sample(rng)])
}

// ── Spawns ───────────────────────────────────────────────────────────────────

/// Create the next enemy: one in five slides in from a side edge, the rest
/// drop in from above the screen.
pub fn spawn_enemy(id: EntityId, level: u32, world: &World, rng: &mut impl Rng) -> Enemy {
    let line_y = world.line_y() as i32;

    let (x, y, vx, vy) = if rng.gen_bool(SIDE_ENTRY_CHANCE) {
        let y = rng.gen_range(line_y + 50..=world.height as i32 - 50) as f32;
        let speed = rng.gen_range(3..=6) as f32;
        if rng.gen_bool(0.5) {
            (-40.0, y, speed, 0.0)
        } else {
            (world.width + 40.0, y, -speed, 0.0)
        }
    } else {
        let x = rng.gen_range(30..=world.width as i32 - 30) as f32;
        let vy = rng.gen_range(2..=3 + level as i32) as f32;
        (x, -20.0, 0.0, vy)
    };

    let mut can_shoot = rng.gen_bool(shoot_chance(level));

    let kind = match roll_kind(level, rng) {
        KindTag::Basic => EnemyKind::Basic,
        KindTag::Zigzag => EnemyKind::Zigzag(ZigzagMotion::roll(x, rng)),
        KindTag::Chaser => {
            can_shoot = false;
            EnemyKind::Chaser
        }
    };

    Enemy::new(id, x, y, vx, vy, kind, can_shoot, rng)
}

/// Drop a shield pickup somewhere below the divider.
pub fn spawn_shield(id: EntityId, world: &World, rng: &mut impl Rng) -> Shield {
    let line_y = world.line_y() as i32;
    let x = rng.gen_range(50..=world.width as i32 - 50) as f32;
    let y = rng.gen_range(line_y + 50..=world.height as i32 - 80) as f32;
    Shield::new(id, x, y)
}
