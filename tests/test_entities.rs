use space_shooter::entities::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn world() -> World {
    World::new(1280.0, 720.0)
}

fn enemy(kind: EnemyKind, x: f32, y: f32, vx: f32, vy: f32, can_shoot: bool) -> Enemy {
    Enemy::new(EntityId(1), x, y, vx, vy, kind, can_shoot, &mut seeded_rng())
}

/// Run one enemy update and collect whatever it fired.
fn step(e: &mut Enemy, player: Option<&Player>, level: u32, rng: &mut StdRng) -> Vec<ProjectileSpawn> {
    let mut shots = Vec::new();
    e.update(&world(), player, level, rng, |shot| shots.push(shot));
    shots
}

// ── World ─────────────────────────────────────────────────────────────────────

#[test]
fn world_divider_and_start() {
    let w = world();
    assert_eq!(w.line_y(), 180.0);
    assert_eq!(w.player_start(), (640.0, 670.0));
    assert_eq!(World::new(1000.0, 601.0).line_y(), 150.0); // floored
}

#[test]
fn world_outside_uses_margin() {
    let w = world();
    assert!(!w.is_outside(-50.0, 0.0, 50.0));
    assert!(w.is_outside(-50.5, 0.0, 50.0));
    assert!(w.is_outside(640.0, 771.0, 50.0));
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_moves_by_velocity() {
    let mut p = Player::new(640.0, 500.0);
    p.vx = 6.0;
    p.vy = -6.0;
    p.update(&world());
    assert_eq!((p.x, p.y), (646.0, 494.0));
}

#[test]
fn player_clamped_to_field() {
    let w = world();
    let mut p = Player::new(1275.0, 715.0);
    p.update(&w);
    assert_eq!((p.x, p.y), (1250.0, 690.0));

    let mut p = Player::new(0.0, 0.0);
    p.update(&w);
    assert_eq!((p.x, p.y), (30.0, 210.0));
}

#[test]
fn player_faces_target() {
    let mut p = Player::new(100.0, 100.0);
    p.face(200.0, 100.0);
    assert!(p.angle.abs() < 1e-4);
    p.face(100.0, 200.0);
    assert!((p.angle - 90.0).abs() < 1e-4); // y grows downward
}

#[test]
fn player_face_zero_offset_keeps_angle() {
    let mut p = Player::new(100.0, 100.0);
    p.face(100.0, 0.0);
    let before = p.angle;
    p.face(100.0, 100.0);
    assert_eq!(p.angle, before);
}

#[test]
fn player_respawn_stops_motion() {
    let mut p = Player::new(100.0, 300.0);
    p.vx = 6.0;
    p.vy = 6.0;
    p.respawn_at(640.0, 670.0);
    assert_eq!((p.x, p.y, p.vx, p.vy), (640.0, 670.0, 0.0, 0.0));
}

// ── Enemy construction & death ────────────────────────────────────────────────

#[test]
fn enemy_projectile_style_by_kind() {
    let zig = ZigzagMotion::roll(100.0, &mut seeded_rng());
    assert_eq!(EnemyKind::Basic.projectile_style(), (ProjectileColor::Ice, 1.0));
    assert_eq!(EnemyKind::Zigzag(zig).projectile_style(), (ProjectileColor::Violet, 0.6));
    assert_eq!(EnemyKind::Chaser.projectile_style(), (ProjectileColor::Crimson, 1.0));
}

#[test]
fn enemy_initial_cooldown_range() {
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let e = Enemy::new(EntityId(0), 0.0, 0.0, 0.0, 0.0, EnemyKind::Basic, true, &mut rng);
        assert!((5..=20).contains(&e.shoot_cooldown));
    }
    let unarmed = enemy(EnemyKind::Basic, 0.0, 0.0, 0.0, 0.0, false);
    assert_eq!(unarmed.shoot_cooldown, -1);
}

#[test]
fn start_dying_halves_velocity_and_disarms() {
    let mut e = enemy(EnemyKind::Basic, 100.0, 300.0, 4.0, 2.0, true);
    e.start_dying();
    assert!(e.is_dying);
    assert!(!e.can_shoot);
    assert_eq!(e.death_timer, DEATH_TICKS);
    assert_eq!((e.vx, e.vy), (2.0, 1.0));
}

#[test]
fn start_dying_is_idempotent() {
    let mut e = enemy(EnemyKind::Basic, 100.0, 300.0, 4.0, 2.0, true);
    e.start_dying();
    e.tick_death();
    e.start_dying();
    assert_eq!((e.vx, e.vy), (2.0, 1.0));
    assert_eq!(e.death_timer, DEATH_TICKS - 1);
}

#[test]
fn tick_death_reports_zero_once() {
    let mut e = enemy(EnemyKind::Basic, 0.0, 0.0, 0.0, 0.0, false);
    e.start_dying();
    for _ in 0..DEATH_TICKS - 1 {
        assert!(!e.tick_death());
    }
    assert!(e.tick_death());
}

#[test]
fn enemy_bounds_leave_top_open() {
    let w = world();
    assert!(!enemy(EnemyKind::Basic, 640.0, -500.0, 0.0, 0.0, false).is_out_of_bounds(&w));
    assert!(enemy(EnemyKind::Basic, 640.0, 761.0, 0.0, 0.0, false).is_out_of_bounds(&w));
    assert!(enemy(EnemyKind::Basic, -41.0, 400.0, 0.0, 0.0, false).is_out_of_bounds(&w));
    assert!(enemy(EnemyKind::Basic, 1321.0, 400.0, 0.0, 0.0, false).is_out_of_bounds(&w));
    assert!(!enemy(EnemyKind::Basic, -40.0, 400.0, 0.0, 0.0, false).is_out_of_bounds(&w));
}

// ── Enemy movement ────────────────────────────────────────────────────────────

#[test]
fn basic_enemy_moves_linearly() {
    let mut e = enemy(EnemyKind::Basic, 100.0, 100.0, 3.0, 2.0, false);
    step(&mut e, None, 1, &mut seeded_rng());
    assert_eq!((e.x, e.y), (103.0, 102.0));
    assert_eq!(e.age, 1);
}

#[test]
fn chaser_homes_at_level_speed() {
    let mut e = enemy(EnemyKind::Chaser, 100.0, 300.0, 0.0, 0.0, false);
    let player = Player::new(400.0, 700.0); // 3-4-5 triangle, distance 500
    step(&mut e, Some(&player), 2, &mut seeded_rng());

    let speed = 4.0 + 2.0 * 0.3;
    assert!((e.x - (100.0 + 0.6 * speed)).abs() < 1e-4);
    assert!((e.y - (300.0 + 0.8 * speed)).abs() < 1e-4);
}

#[test]
fn chaser_on_top_of_player_does_not_move() {
    let mut e = enemy(EnemyKind::Chaser, 400.0, 500.0, 0.0, 0.0, false);
    let player = Player::new(400.0, 500.0);
    step(&mut e, Some(&player), 1, &mut seeded_rng());
    assert_eq!((e.x, e.y), (400.0, 500.0));
}

#[test]
fn dying_chaser_drifts_instead_of_homing() {
    let mut e = enemy(EnemyKind::Chaser, 100.0, 300.0, 4.0, 4.0, false);
    e.start_dying();
    let player = Player::new(1000.0, 300.0);
    step(&mut e, Some(&player), 1, &mut seeded_rng());
    assert_eq!((e.x, e.y), (102.0, 302.0));
}

#[test]
fn chaser_without_player_moves_linearly() {
    let mut e = enemy(EnemyKind::Chaser, 100.0, 300.0, 1.0, 2.0, false);
    step(&mut e, None, 1, &mut seeded_rng());
    assert_eq!((e.x, e.y), (101.0, 302.0));
}

#[test]
fn zigzag_sways_around_base_column() {
    let motion = ZigzagMotion {
        phase: 0.0,
        amplitude: 100.0,
        speed: 0.05,
        base_x: 500.0,
    };
    let mut e = enemy(EnemyKind::Zigzag(motion), 500.0, 50.0, 0.0, 3.0, false);
    step(&mut e, None, 1, &mut seeded_rng());

    assert_eq!(e.y, 53.0);
    assert!((e.x - (500.0 + 0.05f32.sin() * 100.0)).abs() < 1e-3);
    match e.kind {
        EnemyKind::Zigzag(m) => assert!((m.phase - 0.05).abs() < 1e-6),
        other => panic!("kind changed to {:?}", other),
    }
}

#[test]
fn zigzag_roll_ranges() {
    let mut rng = seeded_rng();
    for _ in 0..200 {
        let m = ZigzagMotion::roll(300.0, &mut rng);
        assert!((0.0..std::f32::consts::TAU).contains(&m.phase));
        assert!((40.0..=120.0).contains(&m.amplitude));
        assert!((0.03..0.07).contains(&m.speed));
        assert_eq!(m.base_x, 300.0);
    }
}

// ── Enemy shooting ────────────────────────────────────────────────────────────

#[test]
fn enemy_fires_when_cooldown_expires() {
    let mut rng = seeded_rng();
    let mut e = enemy(EnemyKind::Basic, 640.0, 400.0, 0.0, 0.0, true);
    e.shoot_cooldown = 1;
    let player = Player::new(640.0, 670.0);

    let shots = step(&mut e, Some(&player), 1, &mut rng);
    assert_eq!(shots.len(), 1);
    assert_eq!((shots[0].x, shots[0].y), (640.0, 430.0)); // muzzle at bottom edge
    assert_eq!(shots[0].color, ProjectileColor::Ice);
    assert!(shots[0].vy > 0.0);
    assert!((30..=50).contains(&e.shoot_cooldown));
}

#[test]
fn enemy_holds_fire_while_cooling_down() {
    let mut e = enemy(EnemyKind::Basic, 640.0, 400.0, 0.0, 0.0, true);
    e.shoot_cooldown = 3;
    let shots = step(&mut e, None, 1, &mut seeded_rng());
    assert!(shots.is_empty());
    assert_eq!(e.shoot_cooldown, 2);
}

#[test]
fn enemy_above_divider_never_fires() {
    let mut rng = seeded_rng();
    let mut e = enemy(EnemyKind::Basic, 640.0, 180.0, 0.0, 0.0, true);
    e.shoot_cooldown = 1;
    for _ in 0..100 {
        assert!(step(&mut e, None, 1, &mut rng).is_empty());
    }
    assert_eq!(e.shoot_cooldown, 1);
}

#[test]
fn dying_enemy_never_fires() {
    let mut rng = seeded_rng();
    let mut e = enemy(EnemyKind::Basic, 640.0, 400.0, 0.0, 0.0, true);
    e.shoot_cooldown = 1;
    e.start_dying();
    for _ in 0..DEATH_TICKS {
        assert!(step(&mut e, None, 1, &mut rng).is_empty());
    }
}

#[test]
fn armed_chaser_never_fires() {
    let mut rng = seeded_rng();
    let mut e = enemy(EnemyKind::Chaser, 640.0, 400.0, 0.0, 0.0, true);
    e.shoot_cooldown = 1;
    let player = Player::new(640.0, 670.0);
    for _ in 0..100 {
        assert!(step(&mut e, Some(&player), 1, &mut rng).is_empty());
    }
}

#[test]
fn shot_without_player_falls_straight_down() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let mut e = enemy(EnemyKind::Basic, 640.0, 400.0, 0.0, 0.0, true);
        e.shoot_cooldown = 1;
        let shots = step(&mut e, None, 4, &mut rng);
        assert_eq!(shots.len(), 1);
        assert!((shots[0].vy - (6.0 + 4.0 * 0.3)).abs() < 1e-4);
        assert!((-1.5..=1.5).contains(&shots[0].vx));
    }
}

#[test]
fn zigzag_shots_are_slower_and_violet() {
    let motion = ZigzagMotion {
        phase: 0.0,
        amplitude: 0.0,
        speed: 0.0,
        base_x: 640.0,
    };
    let mut e = enemy(EnemyKind::Zigzag(motion), 640.0, 400.0, 0.0, 0.0, true);
    e.shoot_cooldown = 1;
    let shots = step(&mut e, None, 0, &mut seeded_rng());
    assert_eq!(shots[0].color, ProjectileColor::Violet);
    assert!((shots[0].vy - 6.0 * 0.6).abs() < 1e-4);
}

#[test]
fn shot_leads_a_moving_player() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let mut e = enemy(EnemyKind::Basic, 640.0, 400.0, 0.0, 0.0, true);
        e.shoot_cooldown = 1;
        let mut player = Player::new(640.0, 670.0);
        player.vx = 6.0; // aim point 90 px to the right
        let shots = step(&mut e, Some(&player), 1, &mut rng);
        assert!(shots[0].vx > 1.0);
    }
}

// ── Session helpers ───────────────────────────────────────────────────────────

#[test]
fn entity_ids_are_unique_and_increasing() {
    let mut s = space_shooter::compute::init_state(&Default::default(), 0);
    let a = s.allocate_id();
    let b = s.allocate_id();
    assert!(b > a);
}

#[test]
fn game_state_clone_is_independent() {
    let original = space_shooter::compute::init_state(&Default::default(), 0);
    let mut cloned = original.clone();

    cloned.player.x = 99.0;
    cloned.score = 999;
    cloned.shields.push(Shield::new(EntityId(9), 5.0, 5.0));

    assert_eq!(original.player.x, 640.0);
    assert_eq!(original.score, 0);
    assert!(original.shields.is_empty());
}
