/// World construction and per-tick orchestration.
///
/// `World` owns every entity and advances them in a fixed order each
/// tick; `Session` wraps it in the playing / game-over / victory state
/// machine.  All timing comes in through explicit `now_ms` arguments.

use crate::entities::{Facing, Input, MotionBody, Rect, SessionStatus, VerticalState};
use crate::physics::{apply_damage, step_patrol, step_player, BarrierField};

pub const PLAYFIELD_W: i32 = 960;
pub const PLAYFIELD_H: i32 = 400;

const PLAYER_SIZE: i32 = 20;
const PLAYER_SPEED: i32 = 100;
const PLAYER_JUMP_SPEED: i32 = 500;
const PLAYER_SPAWN_X: i32 = 10;

const ENEMY_SIZE: i32 = 20;
const ENEMY_SPEED: i32 = 50;
const ENEMY_LIFE: i32 = 30;

const PROJECTILE_SIZE: i32 = 2;
const PROJECTILE_SPEED: i32 = 400;

/// Fixed level layout: (w, h, x, y) of each static box.
const LEVEL_BOXES: [(i32, i32, i32, i32); 8] = [
    (200, 15, 140, 385),
    (200, 100, 550, 300),
    (100, 50, 780, 350),
    (50, 50, 470, 350),
    (10, 15, 570, 285),
    (10, 15, 730, 285),
    (10, 70, 760, 330),
    (10, 70, 890, 330),
];

/// Enemy spawn columns; enemies drop in from the top of the playfield.
const ENEMY_SPAWN_X: [i32; 4] = [920, 750, 550, 350];

// ── Constructors ──────────────────────────────────────────────────────────────

pub fn new_player(now_ms: u64) -> MotionBody {
    MotionBody {
        rect: Rect {
            x: PLAYER_SPAWN_X,
            y: PLAYFIELD_H - PLAYER_SIZE,
            w: PLAYER_SIZE,
            h: PLAYER_SIZE,
        },
        speed: PLAYER_SPEED,
        jump_speed: PLAYER_JUMP_SPEED,
        last_step_ms: now_ms,
        vertical: VerticalState::Idle,
        vertical_start_ms: 0,
        jump_queued: false,
        fall_armed: false,
        life: 1,
        max_life: 1,
        pending_removal: false,
        can_jump: true,
        has_gravity: true,
        bounce_on_wall: false,
        facing: Facing::Right,
    }
}

/// Enemies spawn airborne at the top of their column with the fall
/// already armed, so they settle onto whatever ground lies below.
pub fn new_enemy(x: i32, now_ms: u64) -> MotionBody {
    MotionBody {
        rect: Rect {
            x,
            y: 0,
            w: ENEMY_SIZE,
            h: ENEMY_SIZE,
        },
        speed: ENEMY_SPEED,
        jump_speed: 0,
        last_step_ms: now_ms,
        vertical: VerticalState::Idle,
        vertical_start_ms: 0,
        jump_queued: false,
        fall_armed: true,
        life: ENEMY_LIFE,
        max_life: ENEMY_LIFE,
        pending_removal: false,
        can_jump: false,
        has_gravity: true,
        bounce_on_wall: true,
        facing: Facing::Left,
    }
}

fn new_projectile(rect: Rect, facing: Facing, now_ms: u64) -> MotionBody {
    MotionBody {
        rect,
        speed: PROJECTILE_SPEED,
        jump_speed: 0,
        last_step_ms: now_ms,
        vertical: VerticalState::Idle,
        vertical_start_ms: 0,
        jump_queued: false,
        fall_armed: false,
        life: 1,
        max_life: 1,
        pending_removal: false,
        can_jump: false,
        has_gravity: false,
        bounce_on_wall: false,
        facing,
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// Owns the live projectiles fired by the player.
#[derive(Clone, Debug, Default)]
pub struct ProjectileSet {
    pub projectiles: Vec<MotionBody>,
}

impl ProjectileSet {
    /// Spawn one projectile at the shooter's firing edge, mid-height.
    /// Travel direction is fixed at creation from the fire latch.
    pub fn spawn(&mut self, shooter: &Rect, facing: Facing, now_ms: u64) {
        let x = match facing {
            Facing::Left => shooter.x - PROJECTILE_SIZE,
            Facing::Right => shooter.x + shooter.w,
        };
        let y = shooter.y + shooter.h / 2 - 1;
        let rect = Rect {
            x,
            y,
            w: PROJECTILE_SIZE,
            h: PROJECTILE_SIZE,
        };
        self.projectiles.push(new_projectile(rect, facing, now_ms));
    }

    /// Advance every projectile at constant speed (no gravity, no step
    /// cap), then flag it for removal on the first contact: either a
    /// static barrier — the playfield edge doubles as the lifetime
    /// bound — or a damaging enemy hit.  Wall hits short-circuit, so a
    /// projectile buried in a barrier deals no damage.
    pub fn advance(&mut self, field: &BarrierField, enemies: &mut [MotionBody], now_ms: u64) {
        for p in &mut self.projectiles {
            let elapsed = now_ms.saturating_sub(p.last_step_ms);
            let pixels = (p.speed as f64 * elapsed as f64 / 1000.0).round() as i32;
            match p.facing {
                Facing::Left => p.rect.x -= pixels,
                Facing::Right => p.rect.x += pixels,
            }
            if field.collides(&p.rect) || apply_damage(enemies, &p.rect).hit_any {
                p.pending_removal = true;
            }
            p.last_step_ms = now_ms;
        }
    }

    /// Drop everything flagged during this tick.  Mark-and-compact:
    /// nothing is removed while the set is being iterated.
    pub fn prune(&mut self) {
        self.projectiles.retain(|p| !p.pending_removal);
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// The complete playing-state world: barrier field, player, enemies
/// and projectiles, plus the sticky fire-direction latch.
#[derive(Clone, Debug)]
pub struct World {
    pub barrier: BarrierField,
    pub player: MotionBody,
    pub enemies: Vec<MotionBody>,
    pub projectiles: ProjectileSet,
    /// Last left/right direction seen, independent of current hold
    /// state; aims projectiles fired with no direction key held.
    pub fire_facing: Facing,
}

impl World {
    /// Build the fixed level: static boxes, enemy spawns, player at
    /// the spawn point.
    pub fn new(now_ms: u64) -> Self {
        let mut barrier = BarrierField::new(PLAYFIELD_W, PLAYFIELD_H);
        for (w, h, x, y) in LEVEL_BOXES {
            barrier.add_box(Rect { x, y, w, h });
        }
        let enemies = ENEMY_SPAWN_X
            .iter()
            .map(|&x| new_enemy(x, now_ms))
            .collect();
        World {
            barrier,
            player: new_player(now_ms),
            enemies,
            projectiles: ProjectileSet::default(),
            fire_facing: Facing::Right,
        }
    }

    /// Advance the world by one tick.
    ///
    /// Strict order: projectiles → player (a fired projectile first
    /// acts next tick) → player-enemy contact damage → enemies →
    /// prune.  Damage is applied at most once per attacker per tick.
    pub fn step(&mut self, input: &Input, now_ms: u64) {
        if input.left {
            self.fire_facing = Facing::Left;
        }
        if input.right {
            self.fire_facing = Facing::Right;
        }

        self.projectiles
            .advance(&self.barrier, &mut self.enemies, now_ms);

        step_player(
            &mut self.player,
            input.left,
            input.right,
            input.jump,
            &self.barrier,
            now_ms,
        );
        if input.fire {
            self.projectiles
                .spawn(&self.player.rect, self.fire_facing, now_ms);
        }

        // Touching an enemy costs both sides one life point.
        let contact = apply_damage(&mut self.enemies, &self.player.rect);
        if contact.hit_any {
            self.player.life -= 1;
        }

        for enemy in &mut self.enemies {
            if !enemy.pending_removal {
                step_patrol(enemy, &self.barrier, now_ms);
            }
        }

        self.projectiles.prune();
        self.enemies.retain(|e| !e.pending_removal);
    }

    pub fn player_dead(&self) -> bool {
        self.player.life <= 0
    }

    pub fn cleared(&self) -> bool {
        self.enemies.is_empty()
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// The initializing / playing / game-over / victory state machine.
/// Terminal states wait for the edge-triggered confirm key, then loop
/// back through `Initializing`, which rebuilds the world from scratch.
#[derive(Clone, Debug)]
pub struct Session {
    pub status: SessionStatus,
    pub world: World,
}

impl Session {
    pub fn new(now_ms: u64) -> Self {
        Session {
            status: SessionStatus::Initializing,
            world: World::new(now_ms),
        }
    }

    pub fn step(&mut self, input: &Input, now_ms: u64) {
        match self.status {
            SessionStatus::Initializing => {
                self.world = World::new(now_ms);
                self.status = SessionStatus::Playing;
            }
            SessionStatus::Playing => {
                self.world.step(input, now_ms);
                // Defeat wins over victory if both land on one tick.
                if self.world.player_dead() {
                    self.status = SessionStatus::GameOver;
                } else if self.world.cleared() {
                    self.status = SessionStatus::Victory;
                }
            }
            SessionStatus::GameOver | SessionStatus::Victory => {
                if input.confirm {
                    self.status = SessionStatus::Initializing;
                }
            }
        }
    }
}
