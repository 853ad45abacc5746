//! Fixed timestep simulation tick
//!
//! Advances the world by one step. Processing order:
//!   1. Bookkeeping (tick counter, camera follow)
//!   2. Player
//!   3. Blocks (may spawn items)
//!   4. Items, including ones spawned this step
//!   5. Enemies
//!   6. Sweep dead entities
//!   7. Invariant check
//!   8. Win / lose check
//!
//! Later categories see the post-update positions of earlier ones.

use serde::{Deserialize, Serialize};

use super::body::Steer;
use super::collision::Aabb;
use super::state::{Actor, Entity, GameEvent, StepContext, World};
use crate::error::SimError;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

impl TickInput {
    /// Commanded direction; left wins when both are held
    pub fn steer(&self) -> Steer {
        if self.left {
            Steer::Left
        } else if self.right {
            Steer::Right
        } else {
            Steer::None
        }
    }
}

/// Level-level result of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// Player crossed the goal line
    Won,
    /// Player died and fell off screen, or fell out of the world
    Lost,
}

/// Advance the world by one fixed timestep, appending raised events.
///
/// An `Err` means the world may be half-updated and must not be stepped again.
pub fn tick(
    world: &mut World,
    input: &TickInput,
    dt: f32,
    events: &mut Vec<GameEvent>,
) -> Result<StepOutcome, SimError> {
    if !(dt.is_finite() && dt > 0.0) {
        return Err(SimError::InvalidTimestep(dt));
    }

    world.time_ticks += 1;
    world.follow_camera();

    let platforms: Vec<Aabb> = world.blocks.iter().map(|b| b.bounding_box()).collect();

    world
        .player
        .update(input, &world.bounds, &platforms, dt, events);

    let mut spawned = Vec::new();
    {
        let mut ctx = StepContext {
            dt,
            bounds: &world.bounds,
            tuning: &world.tuning,
            platforms: &platforms,
            player: &mut world.player,
            spawned: &mut spawned,
            events: &mut *events,
        };
        for block in &mut world.blocks {
            block.update(&mut ctx);
        }
    }

    for item in spawned {
        let id = world.add_item(item);
        log::debug!("Item #{id} spawned");
    }

    // Items and enemies never spawn anything
    let mut unused = Vec::new();
    {
        let mut ctx = StepContext {
            dt,
            bounds: &world.bounds,
            tuning: &world.tuning,
            platforms: &platforms,
            player: &mut world.player,
            spawned: &mut unused,
            events,
        };
        for item in &mut world.items {
            item.update(&mut ctx);
        }
        for enemy in &mut world.enemies {
            enemy.update(&mut ctx);
        }
    }

    world.prune();
    validate(world)?;

    Ok(evaluate_outcome(world))
}

/// Post-step invariants: finite state, non-negative boxes
fn validate(world: &World) -> Result<(), SimError> {
    for entity in world.entities() {
        let body = entity.body();
        if !body.is_finite() {
            return Err(SimError::NonFiniteState {
                kind: entity.kind_name(),
                id: entity.id(),
            });
        }
        if body.size.x < 0.0 || body.size.y < 0.0 {
            return Err(SimError::NegativeSize {
                kind: entity.kind_name(),
                id: entity.id(),
            });
        }
    }
    Ok(())
}

fn evaluate_outcome(world: &World) -> StepOutcome {
    let player = &world.player;
    if !player.dead && player.body.pos.x >= world.bounds.goal_x {
        StepOutcome::Won
    } else if player.has_fallen_out(&world.bounds) {
        StepOutcome::Lost
    } else {
        StepOutcome::Continue
    }
}
