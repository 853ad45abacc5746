//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (player, blocks, items, enemies; insertion order within each)
//! - No rendering, audio or platform dependencies

pub mod block;
pub mod body;
pub mod collision;
pub mod enemy;
pub mod item;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use block::Block;
pub use body::Body;
pub use collision::{Aabb, BlockContact, Contact, classify_block_contact, classify_contact};
pub use enemy::{AmbushEnemy, Enemy, GroundEnemy, ShellState, ShelledEnemy};
pub use item::{Item, ItemKind, ItemPhase};
pub use player::{DamageOutcome, Facing, Player, PowerState};
pub use snapshot::{EntitySnapshot, FrameSnapshot, VisualTag};
pub use state::{Actor, Entity, GameEvent, LevelBounds, Pit, StepContext, World};
pub use tick::{StepOutcome, TickInput, tick};
