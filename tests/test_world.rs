use robo_patrol::entities::*;
use robo_patrol::world::*;

const TICK: u64 = 16;

fn input() -> Input {
    Input::default()
}

// ── World construction ────────────────────────────────────────────────────────

#[test]
fn world_builds_fixed_level() {
    let world = World::new(0);
    assert_eq!(world.barrier.boxes.len(), 8);
    assert_eq!(world.enemies.len(), 4);
    assert!(world.projectiles.projectiles.is_empty());
    assert_eq!(world.player.rect, Rect { x: 10, y: 380, w: 20, h: 20 });
    assert_eq!(world.player.life, 1);
    assert_eq!(world.fire_facing, Facing::Right);
}

#[test]
fn enemies_spawn_airborne_at_their_columns() {
    let world = World::new(0);
    let columns: Vec<i32> = world.enemies.iter().map(|e| e.rect.x).collect();
    assert_eq!(columns, vec![920, 750, 550, 350]);
    assert!(world.enemies.iter().all(|e| e.rect.y == 0 && e.fall_armed));
    assert!(world.enemies.iter().all(|e| e.life == 30 && e.max_life == 30));
}

#[test]
fn enemies_settle_onto_ground_below_spawn() {
    let mut world = World::new(0);
    let mut now = 0;
    for _ in 0..600 {
        now += TICK;
        world.step(&input(), now);
    }
    // Everyone has landed: supported, inside the playfield, not buried.
    for e in &world.enemies {
        assert!(e.rect.y > 0);
        assert!(e.rect.y <= PLAYFIELD_H - e.rect.h);
        assert!(!world.barrier.collides(&e.rect));
    }
}

// ── Fire latch & projectile spawning ──────────────────────────────────────────

#[test]
fn fire_latch_defaults_right() {
    let mut world = World::new(0);
    world.step(&Input { fire: true, ..input() }, TICK);
    let p = &world.projectiles.projectiles[0];
    assert_eq!(p.facing, Facing::Right);
    // Right edge of the player, mid-height minus one
    assert_eq!(p.rect, Rect { x: 30, y: 389, w: 2, h: 2 });
}

#[test]
fn fire_latch_remembers_last_direction() {
    let mut world = World::new(0);
    // Hold left for one tick, release, then fire with nothing held.
    world.step(&Input { left: true, ..input() }, TICK);
    assert_eq!(world.fire_facing, Facing::Left);
    world.step(&Input { fire: true, ..input() }, 2 * TICK);

    let p = &world.projectiles.projectiles[0];
    assert_eq!(p.facing, Facing::Left);
    // Player walked 2 px left on the first tick: left edge 8, spawn at 6.
    assert_eq!(p.rect, Rect { x: 6, y: 389, w: 2, h: 2 });
}

#[test]
fn right_wins_when_both_directions_held() {
    let mut world = World::new(0);
    world.step(&Input { left: true, right: true, ..input() }, TICK);
    assert_eq!(world.fire_facing, Facing::Right);
}

// ── Projectile vs enemy ───────────────────────────────────────────────────────

#[test]
fn fired_projectile_is_inert_until_next_tick() {
    let mut world = World::new(0);
    // Park an enemy overlapping the spawn point of a rightward shot.
    world.enemies[0].rect = Rect { x: 31, y: 380, w: 20, h: 20 };

    world.step(&Input { fire: true, ..input() }, TICK);
    assert_eq!(world.projectiles.projectiles.len(), 1);
    assert_eq!(world.enemies[0].life, 30); // spawned after the advance pass

    world.step(&input(), 2 * TICK);
    assert_eq!(world.enemies[0].life, 29); // one hit, one life point
    assert!(world.projectiles.projectiles.is_empty()); // destroyed on contact
}

#[test]
fn projectile_hits_distant_enemy_exactly_once() {
    let mut world = World::new(0);
    world.enemies[0].rect = Rect { x: 100, y: 380, w: 20, h: 20 };

    let mut now = TICK;
    world.step(&Input { fire: true, ..input() }, now);

    for _ in 0..60 {
        now += TICK;
        world.step(&input(), now);
        if world.enemies[0].life < 30 {
            break;
        }
    }
    assert_eq!(world.enemies[0].life, 29);
    assert!(world.projectiles.projectiles.is_empty());
}

#[test]
fn wall_hit_removes_projectile_without_damage() {
    let mut world = World::new(0);
    // Leftward shot from the spawn corner reaches the playfield edge
    // in a couple of ticks; the edge is the lifetime bound.
    world.step(&Input { left: true, ..input() }, TICK);
    world.step(&Input { fire: true, ..input() }, 2 * TICK);
    assert_eq!(world.projectiles.projectiles.len(), 1);

    let mut now = 2 * TICK;
    for _ in 0..10 {
        now += TICK;
        world.step(&input(), now);
        if world.projectiles.projectiles.is_empty() {
            break;
        }
    }
    assert!(world.projectiles.projectiles.is_empty());
    assert!(world.enemies.iter().all(|e| e.life == 30));
}

#[test]
fn killed_enemy_leaves_world_same_tick() {
    let mut world = World::new(0);
    world.enemies[0].rect = Rect { x: 31, y: 380, w: 20, h: 20 };
    world.enemies[0].life = 1;

    world.step(&Input { fire: true, ..input() }, TICK);
    world.step(&input(), 2 * TICK);
    assert_eq!(world.enemies.len(), 3); // pruned, gone from the field
    assert!(world.projectiles.projectiles.is_empty());
}

// ── Player contact ────────────────────────────────────────────────────────────

#[test]
fn enemy_contact_costs_both_sides_a_life_point() {
    let mut world = World::new(0);
    world.enemies[0].rect = Rect { x: 15, y: 380, w: 20, h: 20 };

    world.step(&input(), TICK);
    assert_eq!(world.player.life, 0);
    assert_eq!(world.enemies[0].life, 29);
    assert!(world.player_dead());
}

// ── Session state machine ─────────────────────────────────────────────────────

#[test]
fn session_initializes_then_plays() {
    let mut session = Session::new(0);
    assert_eq!(session.status, SessionStatus::Initializing);
    session.step(&input(), TICK);
    assert_eq!(session.status, SessionStatus::Playing);
    assert_eq!(session.world.enemies.len(), 4);
}

#[test]
fn session_victory_when_no_enemies_remain() {
    let mut session = Session::new(0);
    session.step(&input(), TICK);
    session.world.enemies.clear();
    session.step(&input(), 2 * TICK);
    assert_eq!(session.status, SessionStatus::Victory);
}

#[test]
fn session_game_over_when_player_dies() {
    let mut session = Session::new(0);
    session.step(&input(), TICK);
    session.world.player.life = 0;
    session.step(&input(), 2 * TICK);
    assert_eq!(session.status, SessionStatus::GameOver);
}

#[test]
fn defeat_wins_over_victory_on_the_same_tick() {
    let mut session = Session::new(0);
    session.step(&input(), TICK);
    session.world.player.life = 0;
    session.world.enemies.clear();
    session.step(&input(), 2 * TICK);
    assert_eq!(session.status, SessionStatus::GameOver);
}

#[test]
fn terminal_state_waits_for_confirm() {
    let mut session = Session::new(0);
    session.step(&input(), TICK);
    session.world.player.life = 0;
    session.step(&input(), 2 * TICK);
    assert_eq!(session.status, SessionStatus::GameOver);

    // Ticks without the confirm edge change nothing.
    session.step(&input(), 3 * TICK);
    session.step(&input(), 4 * TICK);
    assert_eq!(session.status, SessionStatus::GameOver);

    session.step(&Input { confirm: true, ..input() }, 5 * TICK);
    assert_eq!(session.status, SessionStatus::Initializing);
}

#[test]
fn restart_rebuilds_a_fresh_world() {
    let mut session = Session::new(0);
    session.step(&input(), TICK);
    session.world.enemies.clear();
    session.world.player.rect.x = 500;
    session.step(&input(), 2 * TICK); // → Victory
    session.step(&Input { confirm: true, ..input() }, 3 * TICK);
    session.step(&input(), 4 * TICK); // Initializing → Playing

    assert_eq!(session.status, SessionStatus::Playing);
    assert_eq!(session.world.enemies.len(), 4);
    assert_eq!(session.world.player.rect.x, 10);
    assert_eq!(session.world.player.life, 1);
}
