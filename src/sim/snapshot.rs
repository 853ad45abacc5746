//! Read-only per-step view of the world for renderers

use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::enemy::ShellState;
use super::item::ItemKind;
use super::player::{Facing, PowerState};
use super::state::Pit;

/// What the renderer should draw for an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VisualTag {
    Player {
        power: PowerState,
        dead: bool,
        /// Blink while set
        invulnerable: bool,
        /// Run-cycle frame (0 idle, 1-3 running, 3 airborne)
        frame: u8,
    },
    GroundEnemy {
        squashed: bool,
        /// 1.0 opaque, fades to 0.0 while squashed
        fade: f32,
    },
    ShelledEnemy {
        state: ShellState,
    },
    AmbushEnemy {
        exposed: bool,
    },
    Block {
        active: bool,
    },
    Item {
        kind: ItemKind,
        spawning: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: u32,
    pub bounds: Aabb,
    pub facing: Facing,
    /// Visual-only vertical offset (block bump)
    pub draw_offset_y: f32,
    pub tag: VisualTag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub camera_x: f32,
    pub ground_y: f32,
    pub goal_x: f32,
    pub pits: Vec<Pit>,
    /// Player first, then blocks, items and enemies
    pub entities: Vec<EntitySnapshot>,
}

impl FrameSnapshot {
    /// Entities whose box intersects the camera view
    pub fn visible(&self, view_width: f32) -> impl Iterator<Item = &EntitySnapshot> {
        let left = self.camera_x;
        let right = self.camera_x + view_width;
        self.entities
            .iter()
            .filter(move |e| e.bounds.right() > left && e.bounds.left() < right)
    }
}
