//! Bonus blocks: bumped from below, emit at most one item

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::collision::{BlockContact, classify_block_contact};
use super::item::{Item, ItemKind};
use super::player::Facing;
use super::snapshot::{EntitySnapshot, VisualTag};
use super::state::{Actor, Entity, GameEvent, StepContext};
use crate::consts::{BLOCK_SIZE, BUMP_HALF_SECS, BUMP_SPEED};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub body: Body,
    /// Item released by the first hit
    pub item: Option<ItemKind>,
    /// True until the first successful hit
    pub active: bool,
    /// Visual-only vertical offset of the bump animation
    pub bump_offset: f32,
    /// Time into the bump animation (0 = idle)
    pub bump_timer: f32,
}

impl Block {
    pub fn new(id: u32, x: f32, y: f32, item: Option<ItemKind>) -> Self {
        Self {
            id,
            body: Body::new(x, y, BLOCK_SIZE, BLOCK_SIZE),
            item,
            active: true,
            bump_offset: 0.0,
            bump_timer: 0.0,
        }
    }

    /// Hit from below. Only the first call has any effect: it starts the bump
    /// animation and returns the item to spawn, if the block holds one.
    pub fn hit(&mut self, tuning: &Tuning) -> Option<Item> {
        if !self.active {
            return None;
        }
        self.active = false;
        // Any positive value starts the animation
        self.bump_timer = f32::EPSILON;
        self.bump_offset = 0.0;
        self.item
            .map(|kind| Item::new(0, self.body.pos.x, self.body.pos.y, kind, tuning))
    }

    fn animate(&mut self, dt: f32) {
        if self.bump_timer <= 0.0 {
            return;
        }
        self.bump_timer += dt;
        if self.bump_timer < BUMP_HALF_SECS {
            self.bump_offset -= BUMP_SPEED * dt;
        } else if self.bump_timer < BUMP_HALF_SECS * 2.0 {
            self.bump_offset += BUMP_SPEED * dt;
        } else {
            self.bump_timer = 0.0;
            self.bump_offset = 0.0;
        }
    }
}

impl Actor for Block {
    fn update(&mut self, ctx: &mut StepContext<'_>) {
        self.animate(ctx.dt);

        if ctx.player.dead {
            return;
        }
        let block = self.body.aabb();
        // Tops and margins are solid ground through the player's own landing
        let contact = classify_block_contact(&ctx.player.body.aabb(), ctx.player.body.vel.y, &block);
        if contact != BlockContact::Bump {
            return;
        }
        // Used blocks still stop the player's head
        ctx.player.head_bump(block.bottom());
        let was_active = self.active;
        if let Some(item) = self.hit(ctx.tuning) {
            ctx.events.push(GameEvent::ItemSpawned {
                block_id: self.id,
                kind: item.kind,
            });
            ctx.spawned.push(item);
        }
        if was_active {
            ctx.events.push(GameEvent::BlockBumped { id: self.id });
        }
    }
}

impl Entity for Block {
    fn id(&self) -> u32 {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "block"
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn is_alive(&self) -> bool {
        true
    }

    fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            bounds: self.body.aabb(),
            facing: Facing::Right,
            draw_offset_y: self.bump_offset,
            tag: VisualTag::Block {
                active: self.active,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::collision::Aabb;
    use crate::sim::player::Player;
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

    fn step(
        block: &mut Block,
        player: &mut Player,
        spawned: &mut Vec<Item>,
        events: &mut Vec<GameEvent>,
    ) {
        let bounds = bounds();
        let tuning = Tuning::default();
        let platforms: [Aabb; 0] = [];
        let mut ctx = StepContext {
            dt: SIM_DT,
            bounds: &bounds,
            tuning: &tuning,
            platforms: &platforms,
            player,
            spawned,
            events,
        };
        block.update(&mut ctx);
    }

    /// Player rising with its head just inside the block underside
    fn rising_player() -> Player {
        let mut player = Player::new(96.0, 228.0, PlayerTuning::default());
        player.body.vel.y = -400.0;
        player
    }

    #[test]
    fn test_bump_spawns_item_once() {
        let mut block = Block::new(3, 100.0, 200.0, Some(ItemKind::Mushroom));
        let mut spawned = Vec::new();
        let mut events = Vec::new();

        for hit in 0..4 {
            let mut player = rising_player();
            step(&mut block, &mut player, &mut spawned, &mut events);
            assert_eq!(player.body.vel.y, 0.0);
            assert_eq!(player.body.pos.y, 232.0);
            if hit == 0 {
                assert!(block.bump_timer > 0.0);
            }
        }

        assert!(!block.active);
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].body.pos, glam::Vec2::new(100.0, 200.0));
        assert_eq!(
            events,
            vec![
                GameEvent::ItemSpawned {
                    block_id: 3,
                    kind: ItemKind::Mushroom
                },
                GameEvent::BlockBumped { id: 3 }
            ]
        );
    }

    #[test]
    fn test_later_hits_do_not_restart_bump() {
        let mut block = Block::new(3, 100.0, 200.0, None);
        let mut spawned = Vec::new();
        let mut events = Vec::new();
        let mut player = rising_player();
        step(&mut block, &mut player, &mut spawned, &mut events);
        let first = block.bump_timer;
        assert!(first > 0.0);

        let mut player = rising_player();
        step(&mut block, &mut player, &mut spawned, &mut events);
        assert!(block.bump_timer > first);
        assert!(spawned.is_empty());
    }

    #[test]
    fn test_bump_animation_returns_to_rest() {
        let mut block = Block::new(3, 100.0, 200.0, None);
        assert!(block.hit(&Tuning::default()).is_none());
        let mut lowest: f32 = 0.0;
        for _ in 0..15 {
            block.animate(SIM_DT);
            lowest = lowest.min(block.bump_offset);
        }
        assert!(lowest < -5.0);
        assert_eq!(block.bump_offset, 0.0);
        assert_eq!(block.bump_timer, 0.0);
        // Box never moves
        assert_eq!(block.body.pos.y, 200.0);
    }

    #[test]
    fn test_margin_contact_never_bumps() {
        let mut block = Block::new(3, 100.0, 200.0, Some(ItemKind::Mushroom));
        let mut spawned = Vec::new();
        let mut events = Vec::new();
        // Rising into the underside with only 3px of overlap on the left margin
        let mut player = Player::new(63.0, 228.0, PlayerTuning::default());
        player.body.vel.y = -400.0;
        step(&mut block, &mut player, &mut spawned, &mut events);
        assert_eq!(player.body.vel.y, -400.0);
        assert!(block.active);
        assert!(spawned.is_empty());
        assert!(events.is_empty());
    }
}
