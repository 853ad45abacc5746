//! World container and the shared entity capability set
//!
//! The world exclusively owns every entity. Entities never reach back into
//! it; each update receives a [`StepContext`] holding exactly the
//! collaborators it may touch.

use serde::{Deserialize, Serialize};

use super::block::Block;
use super::body::Body;
use super::collision::{self, Aabb};
use super::enemy::Enemy;
use super::item::{Item, ItemKind};
use super::player::Player;
use super::snapshot::{EntitySnapshot, FrameSnapshot};
use crate::consts::{DEATH_FALL_MARGIN, GROUND_SNAP_DEPTH, PATROL_MARGIN};
use crate::level::LevelLayout;
use crate::tuning::Tuning;

/// Semantic events raised during a step (audio cues, HUD, logging)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    EnemyStomped { id: u32 },
    ShellKicked { id: u32 },
    BlockBumped { id: u32 },
    ItemSpawned { block_id: u32, kind: ItemKind },
    ItemCollected { id: u32, kind: ItemKind },
    PlayerGrew,
    PlayerShrunk,
    PlayerDied,
}

/// A gap in the ground plane, `start..end` in world x
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pit {
    pub start: f32,
    pub end: f32,
}

/// Static geometry of the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelBounds {
    pub ground_y: f32,
    pub goal_x: f32,
    pub map_width: f32,
    pub view_width: f32,
    pub view_height: f32,
    pub pits: Vec<Pit>,
}

impl LevelBounds {
    /// False when the box lies entirely over a pit
    pub fn has_ground_under(&self, aabb: &Aabb) -> bool {
        !self
            .pits
            .iter()
            .any(|pit| aabb.left() >= pit.start && aabb.right() <= pit.end)
    }

    /// Snap a body onto the ground plane when it is above solid ground
    pub fn land_on_ground(&self, body: &mut Body) -> bool {
        self.has_ground_under(&body.aabb())
            && collision::land_on_ground(body, self.ground_y, GROUND_SNAP_DEPTH)
    }

    /// Lowest visible y; anything below has fallen out of the world
    pub fn world_bottom(&self) -> f32 {
        self.view_height
    }

    /// Where a dead player's fall ends the session
    pub fn kill_y(&self) -> f32 {
        self.view_height + DEATH_FALL_MARGIN
    }

    /// Right turn-around point of ground-enemy patrols
    pub fn patrol_right(&self) -> f32 {
        self.view_width - PATROL_MARGIN
    }
}

/// Capabilities every entity exposes
pub trait Entity {
    fn id(&self) -> u32;

    /// Short name used in logs and fault reports
    fn kind_name(&self) -> &'static str;

    fn body(&self) -> &Body;

    fn is_alive(&self) -> bool;

    fn snapshot(&self) -> EntitySnapshot;

    fn bounding_box(&self) -> Aabb {
        self.body().aabb()
    }
}

/// An entity driven by the world step
pub trait Actor: Entity {
    fn update(&mut self, ctx: &mut StepContext<'_>);
}

/// Collaborators handed to an actor's update
pub struct StepContext<'a> {
    pub dt: f32,
    pub bounds: &'a LevelBounds,
    pub tuning: &'a Tuning,
    /// Block boxes as of the start of the step
    pub platforms: &'a [Aabb],
    pub player: &'a mut Player,
    /// Items created this step; appended to the world before items update
    pub spawned: &'a mut Vec<Item>,
    pub events: &'a mut Vec<GameEvent>,
}

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct World {
    pub bounds: LevelBounds,
    pub tuning: Tuning,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub blocks: Vec<Block>,
    pub items: Vec<Item>,
    /// Left edge of the followed view
    pub camera_x: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: u32,
}

impl World {
    /// Empty world with only a player
    pub fn new(bounds: LevelBounds, tuning: Tuning, player_x: f32, player_y: f32) -> Self {
        Self {
            player: Player::new(player_x, player_y, tuning.player),
            bounds,
            tuning,
            enemies: Vec::new(),
            blocks: Vec::new(),
            items: Vec::new(),
            camera_x: 0.0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Build the initial world from a level layout
    pub fn from_layout(layout: &LevelLayout, tuning: &Tuning) -> Self {
        let mut world = Self::new(
            layout.bounds(),
            *tuning,
            layout.player_spawn.0,
            layout.player_spawn.1,
        );
        for spawn in &layout.enemies {
            let id = world.next_entity_id();
            world.enemies.push(Enemy::spawn(id, spawn, tuning));
        }
        for spawn in &layout.blocks {
            let id = world.next_entity_id();
            world.blocks.push(Block::new(id, spawn.x, spawn.y, spawn.item));
        }
        log::info!(
            "World built: {} enemies, {} blocks, goal at x={}",
            world.enemies.len(),
            world.blocks.len(),
            world.bounds.goal_x
        );
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an item, assigning it a fresh id
    pub fn add_item(&mut self, mut item: Item) -> u32 {
        let id = self.next_entity_id();
        item.id = id;
        self.items.push(item);
        id
    }

    pub fn add_enemy(&mut self, enemy: Enemy) {
        self.enemies.push(enemy);
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Sweep entities that flagged themselves dead during the step
    pub fn prune(&mut self) {
        self.enemies.retain(|e| e.is_alive());
        self.items.retain(|i| i.is_alive());
    }

    /// Center the view on the player, clamped to the map
    pub fn follow_camera(&mut self) {
        let max_x = (self.bounds.map_width - self.bounds.view_width).max(0.0);
        self.camera_x =
            (self.player.body.center_x() - self.bounds.view_width / 2.0).clamp(0.0, max_x);
    }

    /// Every entity, player first
    pub fn entities(&self) -> impl Iterator<Item = &dyn Entity> {
        std::iter::once(&self.player as &dyn Entity)
            .chain(self.blocks.iter().map(|b| b as &dyn Entity))
            .chain(self.items.iter().map(|i| i as &dyn Entity))
            .chain(self.enemies.iter().map(|e| e as &dyn Entity))
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            tick: self.time_ticks,
            camera_x: self.camera_x,
            ground_y: self.bounds.ground_y,
            goal_x: self.bounds.goal_x,
            pits: self.bounds.pits.clone(),
            entities: self.entities().map(|e| e.snapshot()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{AmbushEnemy, GroundEnemy};

    fn bounds() -> LevelBounds {
        LevelBounds {
            ground_y: 400.0,
            goal_x: 3000.0,
            map_width: 3200.0,
            view_width: 800.0,
            view_height: 480.0,
            pits: vec![Pit {
                start: 600.0,
                end: 700.0,
            }],
        }
    }

    #[test]
    fn test_pit_removes_ground() {
        let bounds = bounds();
        assert!(!bounds.has_ground_under(&Aabb::from_xywh(620.0, 0.0, 40.0, 40.0)));
        // Straddling the edge still stands on ground
        assert!(bounds.has_ground_under(&Aabb::from_xywh(580.0, 0.0, 40.0, 40.0)));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut world = World::new(bounds(), Tuning::default(), 100.0, 100.0);
        let a = world.next_entity_id();
        let b = world.add_item(Item::new(0, 0.0, 0.0, ItemKind::Mushroom, &Tuning::default()));
        assert_ne!(a, b);
        assert_eq!(world.items[0].id, b);
    }

    #[test]
    fn test_prune_removes_only_dead() {
        let mut world = World::new(bounds(), Tuning::default(), 100.0, 100.0);
        let mut dead = GroundEnemy::new(1, 0.0, 360.0, 50.0);
        dead.alive = false;
        world.add_enemy(Enemy::Ground(dead));
        world.add_enemy(Enemy::Ambush(AmbushEnemy::new(2, 300.0, 352.0)));
        world.prune();
        assert_eq!(world.enemies.len(), 1);
        assert_eq!(world.enemies[0].id(), 2);
    }

    #[test]
    fn test_camera_clamps_to_map() {
        let mut world = World::new(bounds(), Tuning::default(), 100.0, 100.0);
        world.follow_camera();
        assert_eq!(world.camera_x, 0.0);

        world.player.body.pos.x = 1000.0;
        world.follow_camera();
        assert_eq!(world.camera_x, 620.0);

        world.player.body.pos.x = 3150.0;
        world.follow_camera();
        assert_eq!(world.camera_x, 2400.0);
    }

    #[test]
    fn test_snapshot_lists_player_first() {
        let mut world = World::new(bounds(), Tuning::default(), 100.0, 100.0);
        world.add_enemy(Enemy::Ambush(AmbushEnemy::new(7, 300.0, 352.0)));
        let snapshot = world.snapshot();
        assert_eq!(snapshot.entities.len(), 2);
        assert_eq!(snapshot.entities[0].id, crate::sim::player::PLAYER_ID);
        assert_eq!(snapshot.entities[1].id, 7);
    }
}
