/// Collision and motion core.
///
/// Every function here is pure with respect to I/O: callers pass the
/// current timestamp in milliseconds along with the barrier field, and
/// body state is mutated in place.  No clocks are read and nothing is
/// drawn, so tests can drive the whole core with synthetic time.

use crate::entities::{Facing, MotionBody, Rect, VerticalState};

/// Vertical speed lost per elapsed millisecond, in px/s.
pub const GRAVITY_DECAY: f64 = 1.81;

/// Per-step safety cap on horizontal travel (px).  Fixed, independent
/// of a body's `speed`: a high speed combined with a slow frame is
/// down-clamped rather than tunnelling.
pub const HORIZONTAL_STEP_CAP: i32 = 5;

/// Per-step safety cap on vertical travel (px), both directions.
pub const VERTICAL_STEP_CAP: i32 = 10;

/// Strict AABB overlap — touching edges do not count.
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Direction of a corrected displacement.  There is no `Up`: ceiling
/// hits end the jump and resolve downwards (see `jump_phase`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dir {
    Left,
    Right,
    Down,
}

// ── Barrier field ─────────────────────────────────────────────────────────────

/// The static world: solid boxes plus the playfield bounds, which act
/// as an implicit outer barrier.  Boxes are append-only after setup.
#[derive(Clone, Debug)]
pub struct BarrierField {
    pub boxes: Vec<Rect>,
    pub width: i32,
    pub height: i32,
}

impl BarrierField {
    pub fn new(width: i32, height: i32) -> Self {
        BarrierField {
            boxes: Vec::new(),
            width,
            height,
        }
    }

    pub fn add_box(&mut self, r: Rect) {
        self.boxes.push(r);
    }

    /// True if `r` leaves the playfield or overlaps any static box.
    /// Enemies are not considered here; see `apply_damage`.
    pub fn collides(&self, r: &Rect) -> bool {
        if r.x < 0 || r.y < 0 || r.x > self.width - r.w || r.y > self.height - r.h {
            return true;
        }
        self.boxes.iter().any(|b| overlaps(r, b))
    }

    /// Largest displacement (px, non-negative) that leaves `r` flush
    /// against the nearest obstacle in `dir`.
    ///
    /// Candidate boxes are those the naive `requested`-px move would
    /// overlap; the most restrictive (smallest) gap wins.  With no
    /// candidate the result degrades to the playfield-edge distance.
    /// The result never exceeds `requested`, so this is a correction
    /// step, not a general sweep — callers invoke it only after
    /// `collides` rejected the naive target.
    pub fn max_legal_displacement(&self, r: &Rect, requested: i32, dir: Dir) -> i32 {
        let requested = requested.max(0);

        let mut best = match dir {
            Dir::Left => r.x,
            Dir::Right => self.width - r.x - r.w,
            Dir::Down => self.height - r.y - r.h,
        };

        let target = match dir {
            Dir::Left => Rect {
                x: r.x - requested,
                ..*r
            },
            Dir::Right => Rect {
                x: r.x + requested,
                ..*r
            },
            Dir::Down => Rect {
                y: r.y + requested,
                ..*r
            },
        };

        for b in &self.boxes {
            if !overlaps(&target, b) {
                continue;
            }
            let gap = match dir {
                Dir::Left => r.x - (b.x + b.w),
                Dir::Right => b.x - (r.x + r.w),
                Dir::Down => b.y - (r.y + r.h),
            };
            if gap < best {
                best = gap;
            }
        }

        best.clamp(0, requested)
    }
}

// ── Damage ────────────────────────────────────────────────────────────────────

/// Outcome of one damage application.
#[derive(Clone, Debug, Default)]
pub struct DamageResult {
    pub hit_any: bool,
    /// Indices of enemies whose life reached zero on this call.
    pub killed: Vec<usize>,
}

/// Pure overlap test against living enemies.  Touches no life — use
/// `apply_damage` to actually deal damage.
pub fn overlaps_any_enemy(enemies: &[MotionBody], r: &Rect) -> bool {
    enemies
        .iter()
        .any(|e| !e.pending_removal && overlaps(r, &e.rect))
}

/// Deal one point of damage to every living enemy overlapping
/// `attacker`, flagging enemies that reach zero life for removal.
///
/// Contract: at most one call per attacker per tick, otherwise a
/// single contact deals double damage.
pub fn apply_damage(enemies: &mut [MotionBody], attacker: &Rect) -> DamageResult {
    let mut result = DamageResult::default();
    for (i, enemy) in enemies.iter_mut().enumerate() {
        if enemy.pending_removal {
            continue;
        }
        if overlaps(attacker, &enemy.rect) {
            enemy.life -= 1;
            result.hit_any = true;
            if enemy.life <= 0 {
                enemy.pending_removal = true;
                result.killed.push(i);
            }
        }
    }
    result
}

// ── Motion stepping ───────────────────────────────────────────────────────────

/// Pixels of horizontal travel for this step: `speed` integrated over
/// the time since the body's previous step, capped at
/// `HORIZONTAL_STEP_CAP`.
fn horizontal_pixels(body: &MotionBody, now_ms: u64) -> i32 {
    let elapsed = now_ms.saturating_sub(body.last_step_ms);
    let px = (body.speed as f64 * elapsed as f64 / 1000.0).round() as i32;
    px.min(HORIZONTAL_STEP_CAP)
}

/// Pixels of vertical travel for this step at instantaneous speed
/// `speed` px/s (negative = downwards), clamped to the vertical cap.
fn vertical_pixels(body: &MotionBody, speed: f64, now_ms: u64) -> i32 {
    let elapsed = now_ms.saturating_sub(body.last_step_ms);
    let px = (speed * elapsed as f64 / 1000.0).round() as i32;
    px.clamp(-VERTICAL_STEP_CAP, VERTICAL_STEP_CAP)
}

/// Horizontal step with snap-to-barrier.  Returns true when the naive
/// move was blocked and the corrected displacement was used instead.
pub fn move_horizontal(body: &mut MotionBody, dir: Facing, field: &BarrierField, now_ms: u64) -> bool {
    let pixels = horizontal_pixels(body, now_ms);
    let (naive, corrected_dir) = match dir {
        Facing::Left => (
            Rect {
                x: body.rect.x - pixels,
                ..body.rect
            },
            Dir::Left,
        ),
        Facing::Right => (
            Rect {
                x: body.rect.x + pixels,
                ..body.rect
            },
            Dir::Right,
        ),
    };

    if !field.collides(&naive) {
        body.rect.x = naive.x;
        return false;
    }

    let corrected = field.max_legal_displacement(&body.rect, pixels, corrected_dir);
    match dir {
        Facing::Left => body.rect.x -= corrected,
        Facing::Right => body.rect.x += corrected,
    }
    true
}

/// Jump half of the vertical state machine.
///
/// A queued intent starts the jump (cancelling a fall — entering
/// `Jumping` is what makes the two states exclusive).  While jumping,
/// the instantaneous speed is the initial speed minus a linear decay
/// over the jump's absolute duration; the arc ends on the first
/// collision, ascending or descending, with a downward snap.
fn jump_phase(body: &mut MotionBody, field: &BarrierField, now_ms: u64) {
    if !body.can_jump {
        return;
    }
    if body.vertical != VerticalState::Jumping {
        if !body.jump_queued {
            return;
        }
        body.vertical = VerticalState::Jumping;
        body.vertical_start_ms = now_ms;
    }

    let air_ms = now_ms.saturating_sub(body.vertical_start_ms);
    let speed = body.jump_speed as f64 - air_ms as f64 * GRAVITY_DECAY;
    let pixels = vertical_pixels(body, speed, now_ms);

    let naive = Rect {
        y: body.rect.y - pixels,
        ..body.rect
    };
    if !field.collides(&naive) {
        body.rect.y = naive.y;
    } else {
        body.vertical = VerticalState::Idle;
        let corrected = field.max_legal_displacement(&body.rect, pixels.abs(), Dir::Down);
        body.rect.y += corrected;
    }
    body.jump_queued = false;
}

/// Fall half of the vertical state machine.  Skipped entirely while
/// jumping.  The one-pixel probe, arming, start and first move all
/// happen within a single step.
fn fall_phase(body: &mut MotionBody, field: &BarrierField, now_ms: u64) {
    if !body.has_gravity || body.vertical == VerticalState::Jumping {
        return;
    }

    if body.vertical != VerticalState::Falling && !body.fall_armed {
        let probe = Rect {
            y: body.rect.y + 1,
            ..body.rect
        };
        if !field.collides(&probe) {
            body.fall_armed = true;
        }
    }

    if body.vertical != VerticalState::Falling && body.fall_armed {
        body.vertical = VerticalState::Falling;
        body.vertical_start_ms = now_ms;
    }

    if body.vertical == VerticalState::Falling {
        let air_ms = now_ms.saturating_sub(body.vertical_start_ms);
        let speed = -(air_ms as f64 * GRAVITY_DECAY);
        let pixels = vertical_pixels(body, speed, now_ms); // <= 0

        let naive = Rect {
            y: body.rect.y - pixels,
            ..body.rect
        };
        if !field.collides(&naive) {
            body.rect.y = naive.y;
        } else {
            body.vertical = VerticalState::Idle;
            let corrected = field.max_legal_displacement(&body.rect, pixels.abs(), Dir::Down);
            body.rect.y += corrected;
        }
        body.fall_armed = false;
    }
}

/// Run the full vertical state machine for one step.
pub fn advance_vertical(body: &mut MotionBody, field: &BarrierField, now_ms: u64) {
    jump_phase(body, field, now_ms);
    fall_phase(body, field, now_ms);
}

/// Input-driven step for the player body: horizontal movement from the
/// held directions, jump intent, then the vertical state machine.
/// Horizontal and vertical deltas both use the elapsed time since the
/// previous step; the step timestamp is committed once at the end.
pub fn step_player(
    body: &mut MotionBody,
    left: bool,
    right: bool,
    jump: bool,
    field: &BarrierField,
    now_ms: u64,
) {
    if left {
        move_horizontal(body, Facing::Left, field, now_ms);
    }
    if right {
        move_horizontal(body, Facing::Right, field, now_ms);
    }
    if jump {
        body.jump_queued = true;
    }
    advance_vertical(body, field, now_ms);
    body.last_step_ms = now_ms;
}

/// One full step for a patrolling body: horizontal move in the current
/// facing, flipping on a wall hit, then gravity.
pub fn step_patrol(body: &mut MotionBody, field: &BarrierField, now_ms: u64) {
    let blocked = move_horizontal(body, body.facing, field, now_ms);
    if blocked && body.bounce_on_wall {
        body.facing = match body.facing {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        };
    }
    advance_vertical(body, field, now_ms);
    body.last_step_ms = now_ms;
}
