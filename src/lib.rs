//! Retro Platformer - a side-scrolling platformer simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, entity state machines)
//! - `game`: Fixed-timestep session driver
//! - `level`: Level layouts consumed by the world
//! - `platform`: Input sources
//! - `renderer`: Snapshot consumers
//! - `audio`: Sound trigger sinks
//! - `tuning`: Data-driven movement tuning

pub mod audio;
pub mod error;
pub mod game;
pub mod level;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, SimError};
pub use game::{Game, SessionEvent, SessionPhase};
pub use level::LevelLayout;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Longest wall-clock frame fed into the accumulator (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.25;

    /// Downward acceleration for enemies and items (pixels/s²)
    pub const GRAVITY: f32 = 1500.0;

    /// Player landing band above a block top
    pub const LANDING_TOLERANCE: f32 = 20.0;
    /// Inset of the block underside that counts as a head bump
    pub const BUMP_MARGIN: f32 = 5.0;
    /// How far the player's head may sit inside the block for a bump
    pub const BUMP_TOLERANCE: f32 = 10.0;
    /// Depth below the ground line that still snaps back onto it
    pub const GROUND_SNAP_DEPTH: f32 = 48.0;

    /// Vertical velocity given to the player after a stomp
    pub const STOMP_BOUNCE: f32 = -300.0;
    /// Vertical velocity of the death hop
    pub const DEATH_HOP: f32 = -500.0;
    /// Invulnerability after shrinking (seconds)
    pub const INVULNERABLE_SECS: f32 = 2.0;
    /// Extra fall below the viewport before a dead player ends the session
    pub const DEATH_FALL_MARGIN: f32 = 100.0;

    /// Ground enemy box
    pub const GROUND_ENEMY_SIZE: f32 = 40.0;
    /// Squashed ground enemy height
    pub const SQUASHED_HEIGHT: f32 = 16.0;
    /// Time a squashed enemy stays in the world
    pub const SQUASH_SECS: f32 = 0.5;
    /// Patrol turn-around margin from the right viewport edge
    pub const PATROL_MARGIN: f32 = 50.0;

    /// Shelled enemy box (walking)
    pub const SHELLED_WIDTH: f32 = 40.0;
    pub const SHELLED_HEIGHT: f32 = 55.0;
    /// Shell height once stomped
    pub const SHELL_HEIGHT: f32 = 32.0;
    /// Positional nudge applied when a shell is launched
    pub const SHELL_NUDGE: f32 = 10.0;

    /// Ambush enemy box
    pub const AMBUSH_WIDTH: f32 = 32.0;
    pub const AMBUSH_HEIGHT: f32 = 48.0;
    /// Exposed/hidden toggle period (seconds)
    pub const AMBUSH_PERIOD: f32 = 2.0;

    /// Blocks and items share one grid unit
    pub const BLOCK_SIZE: f32 = 32.0;
    /// Bump animation speed (pixels/s)
    pub const BUMP_SPEED: f32 = 100.0;
    /// Bump animation half-duration (seconds)
    pub const BUMP_HALF_SECS: f32 = 0.1;

    /// Run cycle frame rate
    pub const RUN_ANIM_FPS: f32 = 10.0;
}
