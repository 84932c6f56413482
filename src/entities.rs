/// All game entity types — pure data, no logic.

/// Axis-aligned box in playfield pixel coordinates. `w` and `h` are
/// always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// Vertical motion state. A single enum, so a body can never be
/// jumping and falling at the same time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalState {
    Idle,
    Jumping,
    Falling,
}

/// One moving entity.  The player, the enemies and the projectiles all
/// share this shape; the capability flags select which stepping rules
/// apply to a given body.
#[derive(Clone, Debug)]
pub struct MotionBody {
    pub rect: Rect,
    /// Horizontal speed in px/s.
    pub speed: i32,
    /// Initial upward speed of a jump in px/s.
    pub jump_speed: i32,
    /// Timestamp (ms) of this body's previous step.  Per-step pixel
    /// deltas are derived from the time elapsed since it.
    pub last_step_ms: u64,
    pub vertical: VerticalState,
    /// When the current jump or fall began (ms).  Instantaneous
    /// vertical speed is derived from the time elapsed since it.
    pub vertical_start_ms: u64,
    /// Jump intent, latched until the next vertical step consumes it.
    pub jump_queued: bool,
    /// Set when the one-pixel ground probe found no support below.
    pub fall_armed: bool,
    pub life: i32,
    pub max_life: i32,
    pub pending_removal: bool,
    pub can_jump: bool,
    pub has_gravity: bool,
    /// Patrol bodies flip direction instead of stopping at walls.
    pub bounce_on_wall: bool,
    /// Patrol direction, or the travel direction of a projectile.
    pub facing: Facing,
}

/// Per-tick snapshot of the player's intent, assembled by the input
/// layer from held keys and key edges.
#[derive(Clone, Copy, Debug, Default)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub fire: bool,
    /// Edge-triggered: true only on the tick Enter was pressed.
    pub confirm: bool,
}

/// Game-level state.  Exactly one is active at a time; `Playing`
/// implies a fully constructed world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Initializing,
    Playing,
    GameOver,
    Victory,
}
