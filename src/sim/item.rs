//! Power-up items spawned from blocks

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::player::Facing;
use super::snapshot::{EntitySnapshot, VisualTag};
use super::state::{Actor, Entity, GameEvent, StepContext};
use crate::consts::{BLOCK_SIZE, GRAVITY, LANDING_TOLERANCE};
use crate::tuning::Tuning;

/// Item types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Growth power-up; drifts sideways once out of its block
    Mushroom,
    /// Stationary pickup with no power effect
    Flower,
}

impl ItemKind {
    pub fn grants_growth(self) -> bool {
        matches!(self, ItemKind::Mushroom)
    }

    pub fn drifts(self) -> bool {
        matches!(self, ItemKind::Mushroom)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemPhase {
    /// Rising out of the block toward `target_y`
    Spawning { target_y: f32 },
    Active,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub body: Body,
    pub kind: ItemKind,
    pub phase: ItemPhase,
    rise_speed: f32,
    pub alive: bool,
}

impl Item {
    /// New item emerging at a block position
    pub fn new(id: u32, x: f32, y: f32, kind: ItemKind, tuning: &Tuning) -> Self {
        let mut body = Body::new(x, y, BLOCK_SIZE, BLOCK_SIZE);
        if kind.drifts() {
            body.vel.x = tuning.item_drift_speed;
        }
        Self {
            id,
            body,
            kind,
            phase: ItemPhase::Spawning {
                target_y: y - BLOCK_SIZE,
            },
            rise_speed: tuning.item_rise_speed,
            alive: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == ItemPhase::Active
    }

    fn rise(&mut self, target_y: f32, dt: f32) {
        self.body.pos.y -= self.rise_speed * dt;
        if self.body.pos.y <= target_y {
            self.body.pos.y = target_y;
            self.body.vel.y = 0.0;
            self.phase = ItemPhase::Active;
        }
    }

    fn settle(&mut self, ctx: &StepContext<'_>) {
        self.body.apply_gravity(GRAVITY, ctx.dt);
        self.body.integrate(ctx.dt);
        ctx.bounds.land_on_ground(&mut self.body);
        for platform in ctx.platforms {
            super::collision::land_on_platform(&mut self.body, platform, LANDING_TOLERANCE);
        }

        let max_x = ctx.bounds.map_width - self.body.size.x;
        if self.body.pos.x < 0.0 {
            self.body.pos.x = 0.0;
            self.body.vel.x = self.body.vel.x.abs();
        } else if self.body.pos.x > max_x {
            self.body.pos.x = max_x;
            self.body.vel.x = -self.body.vel.x.abs();
        }

        if self.body.pos.y > ctx.bounds.world_bottom() {
            self.alive = false;
        }
    }
}

impl Actor for Item {
    fn update(&mut self, ctx: &mut StepContext<'_>) {
        if !self.alive {
            return;
        }
        if let ItemPhase::Spawning { target_y } = self.phase {
            self.rise(target_y, ctx.dt);
            return;
        }

        self.settle(ctx);
        if !self.alive || ctx.player.dead {
            return;
        }

        // Only active items can be collected
        if self.is_active() && ctx.player.body.aabb().overlaps(&self.body.aabb()) {
            self.alive = false;
            ctx.events.push(GameEvent::ItemCollected {
                id: self.id,
                kind: self.kind,
            });
            if self.kind.grants_growth() {
                ctx.player.grow(ctx.events);
            }
        }
    }
}

impl Entity for Item {
    fn id(&self) -> u32 {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "item"
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            bounds: self.body.aabb(),
            facing: if self.body.vel.x < 0.0 {
                Facing::Left
            } else {
                Facing::Right
            },
            draw_offset_y: 0.0,
            tag: VisualTag::Item {
                kind: self.kind,
                spawning: !self.is_active(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::collision::Aabb;
    use crate::sim::player::{Player, PowerState};
    use crate::sim::state::LevelBounds;
    use crate::tuning::PlayerTuning;

    fn bounds() -> LevelBounds {
        LevelBounds {
            ground_y: 400.0,
            goal_x: 10_000.0,
            map_width: 20_000.0,
            view_width: 800.0,
            view_height: 480.0,
            pits: Vec::new(),
        }
    }

    fn step(item: &mut Item, player: &mut Player, platforms: &[Aabb], events: &mut Vec<GameEvent>) {
        let bounds = bounds();
        let tuning = Tuning::default();
        let mut spawned = Vec::new();
        let mut ctx = StepContext {
            dt: SIM_DT,
            bounds: &bounds,
            tuning: &tuning,
            platforms,
            player,
            spawned: &mut spawned,
            events,
        };
        item.update(&mut ctx);
    }

    #[test]
    fn test_rises_one_block_then_falls() {
        let tuning = Tuning::default();
        let mut item = Item::new(1, 300.0, 200.0, ItemKind::Mushroom, &tuning);
        let mut player = Player::new(5000.0, 360.0, PlayerTuning::default());
        let mut events = Vec::new();

        let mut steps = 0;
        while !item.is_active() {
            step(&mut item, &mut player, &[], &mut events);
            steps += 1;
            assert!(item.body.pos.y >= 168.0);
            assert!(steps < 60, "item never finished rising");
        }
        assert_eq!(item.body.pos.y, 168.0);
        assert_eq!(item.body.vel.y, 0.0);

        for _ in 0..5 {
            step(&mut item, &mut player, &[], &mut events);
        }
        assert!(item.body.vel.y > 0.0);
        assert!(item.body.pos.y > 168.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_rests_on_its_block() {
        let tuning = Tuning::default();
        let block = Aabb::from_xywh(300.0, 200.0, 32.0, 32.0);
        let mut item = Item::new(1, 300.0, 200.0, ItemKind::Flower, &tuning);
        let mut player = Player::new(5000.0, 360.0, PlayerTuning::default());
        let mut events = Vec::new();
        for _ in 0..120 {
            step(&mut item, &mut player, &[block], &mut events);
        }
        assert!(item.is_active());
        assert_eq!(item.body.pos, glam::Vec2::new(300.0, 168.0));
    }

    #[test]
    fn test_spawning_item_cannot_be_collected() {
        let tuning = Tuning::default();
        let mut item = Item::new(1, 300.0, 200.0, ItemKind::Mushroom, &tuning);
        let mut player = Player::new(300.0, 180.0, PlayerTuning::default());
        let mut events = Vec::new();
        step(&mut item, &mut player, &[], &mut events);
        assert!(item.alive);
        assert_eq!(player.power, PowerState::Small);
    }

    #[test]
    fn test_pickup_grows_player_and_removes_item() {
        let tuning = Tuning::default();
        let mut item = Item::new(1, 300.0, 368.0, ItemKind::Mushroom, &tuning);
        item.phase = ItemPhase::Active;
        let mut player = Player::new(290.0, 360.0, PlayerTuning::default());
        let mut events = Vec::new();
        step(&mut item, &mut player, &[], &mut events);
        assert!(!item.alive);
        assert_eq!(player.power, PowerState::Big);
        assert_eq!(
            events,
            vec![
                GameEvent::ItemCollected {
                    id: 1,
                    kind: ItemKind::Mushroom
                },
                GameEvent::PlayerGrew
            ]
        );

        // Removed items never trigger again
        step(&mut item, &mut player, &[], &mut events);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_flower_stays_put_and_grants_nothing() {
        let tuning = Tuning::default();
        let mut item = Item::new(1, 300.0, 368.0, ItemKind::Flower, &tuning);
        item.phase = ItemPhase::Active;
        let mut player = Player::new(5000.0, 360.0, PlayerTuning::default());
        let mut events = Vec::new();
        for _ in 0..30 {
            step(&mut item, &mut player, &[], &mut events);
        }
        assert_eq!(item.body.pos.x, 300.0);

        player.body.pos.x = 290.0;
        step(&mut item, &mut player, &[], &mut events);
        assert!(!item.alive);
        assert_eq!(player.power, PowerState::Small);
    }

    #[test]
    fn test_mushroom_bounces_off_map_edge() {
        let tuning = Tuning::default();
        let mut item = Item::new(1, 19_960.0, 368.0, ItemKind::Mushroom, &tuning);
        item.phase = ItemPhase::Active;
        let mut player = Player::new(100.0, 360.0, PlayerTuning::default());
        let mut events = Vec::new();
        for _ in 0..60 {
            step(&mut item, &mut player, &[], &mut events);
        }
        assert!(item.body.vel.x < 0.0);
        assert!(item.body.pos.x <= 20_000.0 - 32.0);
    }
}
