//! Enemy kinds and their state machines
//!
//! - [`GroundEnemy`]: patrols, dies to a stomp, lingers squashed for 0.5s
//! - [`ShelledEnemy`]: walking -> shell still -> shell moving -> shell still ...
//! - [`AmbushEnemy`]: fixed in a socket, harmful only while exposed

use serde::{Deserialize, Serialize};

use super::body::Body;
use super::collision::{Contact, classify_contact};
use super::player::{Facing, Player};
use super::snapshot::{EntitySnapshot, VisualTag};
use super::state::{Actor, Entity, GameEvent, LevelBounds, StepContext};
use crate::consts::*;
use crate::level::{EnemyKind, EnemySpawn};
use crate::tuning::Tuning;

/// Simple patrolling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroundEnemy {
    pub id: u32,
    pub body: Body,
    pub speed: f32,
    pub squashed: bool,
    /// Seconds since squashed
    pub death_timer: f32,
    pub alive: bool,
}

impl GroundEnemy {
    pub fn new(id: u32, x: f32, y: f32, speed: f32) -> Self {
        let mut body = Body::new(x, y, GROUND_ENEMY_SIZE, GROUND_ENEMY_SIZE);
        body.vel.x = speed;
        Self {
            id,
            body,
            speed,
            squashed: false,
            death_timer: 0.0,
            alive: true,
        }
    }

    /// Flatten in place and stop; removal follows after [`SQUASH_SECS`]
    pub fn squash(&mut self) {
        if self.squashed {
            return;
        }
        self.squashed = true;
        self.death_timer = 0.0;
        self.body.vel.x = 0.0;
        self.body.set_height_keep_bottom(SQUASHED_HEIGHT);
    }

    fn patrol(&mut self, bounds: &LevelBounds) {
        if self.body.pos.x > bounds.patrol_right() {
            self.body.vel.x = -self.speed;
        }
        if self.body.pos.x < 0.0 {
            self.body.vel.x = self.speed;
        }
    }
}

impl Actor for GroundEnemy {
    fn update(&mut self, ctx: &mut StepContext<'_>) {
        if self.squashed {
            self.death_timer += ctx.dt;
            if self.death_timer > SQUASH_SECS {
                self.alive = false;
            }
            return;
        }

        self.body.apply_gravity(GRAVITY, ctx.dt);
        self.body.integrate(ctx.dt);
        ctx.bounds.land_on_ground(&mut self.body);
        self.patrol(ctx.bounds);

        if self.body.pos.y > ctx.bounds.world_bottom() {
            self.alive = false;
            return;
        }

        if ctx.player.dead {
            return;
        }
        match classify_contact(&ctx.player.body.aabb(), ctx.player.body.vel.y, &self.body.aabb()) {
            Contact::Stomp => {
                self.squash();
                ctx.player.bounce_off(self.body.pos.y);
                ctx.events.push(GameEvent::EnemyStomped { id: self.id });
            }
            Contact::Side => {
                ctx.player.take_damage(ctx.events);
            }
            Contact::None => {}
        }
    }
}

impl Entity for GroundEnemy {
    fn id(&self) -> u32 {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "ground enemy"
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
            facing: facing_of(self.body.vel.x),
            draw_offset_y: 0.0,
            tag: VisualTag::GroundEnemy {
                squashed: self.squashed,
                fade: if self.squashed {
                    (1.0 - self.death_timer * 2.0).max(0.0)
                } else {
                    1.0
                },
            },
        }
    }
}

/// Shell cycle of a shelled enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShellState {
    #[default]
    Walking,
    /// Inert obstacle, kicked by any non-stomp touch
    ShellStill,
    /// Fast projectile
    ShellMoving,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelledEnemy {
    pub id: u32,
    pub body: Body,
    pub state: ShellState,
    pub kick_speed: f32,
    pub alive: bool,
}

impl ShelledEnemy {
    pub fn new(id: u32, x: f32, y: f32, walk_speed: f32, kick_speed: f32) -> Self {
        let mut body = Body::new(x, y, SHELLED_WIDTH, SHELLED_HEIGHT);
        body.vel.x = -walk_speed;
        Self {
            id,
            body,
            state: ShellState::Walking,
            kick_speed,
            alive: true,
        }
    }

    /// Send the shell away from the player with a nudge out of contact
    fn launch_from(&mut self, player: &Player) {
        self.state = ShellState::ShellMoving;
        let dir = if player.body.pos.x < self.body.pos.x {
            1.0
        } else {
            -1.0
        };
        self.body.vel.x = self.kick_speed * dir;
        self.body.pos.x += SHELL_NUDGE * dir;
    }

    /// Apply one player contact to the shell cycle
    pub fn interact(&mut self, contact: Contact, player: &mut Player, events: &mut Vec<GameEvent>) {
        match contact {
            Contact::None => {}
            Contact::Stomp => {
                match self.state {
                    ShellState::Walking => {
                        self.state = ShellState::ShellStill;
                        self.body.set_height_keep_bottom(SHELL_HEIGHT);
                        self.body.vel.x = 0.0;
                    }
                    ShellState::ShellStill => self.launch_from(player),
                    ShellState::ShellMoving => {
                        self.state = ShellState::ShellStill;
                        self.body.vel.x = 0.0;
                    }
                }
                player.bounce_off(self.body.pos.y);
                events.push(GameEvent::EnemyStomped { id: self.id });
            }
            Contact::Side => match self.state {
                ShellState::ShellStill => {
                    self.launch_from(player);
                    events.push(GameEvent::ShellKicked { id: self.id });
                }
                ShellState::Walking | ShellState::ShellMoving => {
                    player.take_damage(events);
                }
            },
        }
    }
}

impl Actor for ShelledEnemy {
    fn update(&mut self, ctx: &mut StepContext<'_>) {
        let dt = ctx.dt;
        self.body.apply_gravity(GRAVITY, dt);
        self.body.integrate_y(dt);
        ctx.bounds.land_on_ground(&mut self.body);

        match self.state {
            ShellState::Walking => {
                self.body.pos.x += self.body.vel.x * dt;
                let max_x = ctx.bounds.map_width - self.body.size.x;
                if self.body.pos.x < 0.0 || self.body.pos.x > max_x {
                    self.body.vel.x = -self.body.vel.x;
                }
            }
            ShellState::ShellMoving => {
                self.body.pos.x += self.body.vel.x * dt;
                if self.body.pos.x + self.body.size.x < 0.0
                    || self.body.pos.x > ctx.bounds.map_width
                {
                    log::debug!("Shell #{} left the map", self.id);
                    self.alive = false;
                    return;
                }
            }
            ShellState::ShellStill => {}
        }

        if self.body.pos.y > ctx.bounds.world_bottom() {
            self.alive = false;
            return;
        }

        if ctx.player.dead {
            return;
        }
        let contact =
            classify_contact(&ctx.player.body.aabb(), ctx.player.body.vel.y, &self.body.aabb());
        self.interact(contact, ctx.player, ctx.events);
    }
}

impl Entity for ShelledEnemy {
    fn id(&self) -> u32 {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "shelled enemy"
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
            facing: facing_of(self.body.vel.x),
            draw_offset_y: 0.0,
            tag: VisualTag::ShelledEnemy { state: self.state },
        }
    }
}

/// Socket enemy that pops up and hides on a fixed period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmbushEnemy {
    pub id: u32,
    pub body: Body,
    pub exposed: bool,
    pub timer: f32,
}

impl AmbushEnemy {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            body: Body::new(x, y, AMBUSH_WIDTH, AMBUSH_HEIGHT),
            exposed: true,
            timer: 0.0,
        }
    }
}

impl Actor for AmbushEnemy {
    fn update(&mut self, ctx: &mut StepContext<'_>) {
        self.timer += ctx.dt;
        if self.timer > AMBUSH_PERIOD {
            self.timer = 0.0;
            self.exposed = !self.exposed;
        }

        // Hidden in the socket: no collision at all
        if !self.exposed || ctx.player.dead {
            return;
        }
        if ctx.player.body.aabb().overlaps(&self.body.aabb()) {
            ctx.player.take_damage(ctx.events);
        }
    }
}

impl Entity for AmbushEnemy {
    fn id(&self) -> u32 {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "ambush enemy"
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
            facing: Facing::Left,
            draw_offset_y: 0.0,
            tag: VisualTag::AmbushEnemy {
                exposed: self.exposed,
            },
        }
    }
}

/// Any enemy in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Enemy {
    Ground(GroundEnemy),
    Shelled(ShelledEnemy),
    Ambush(AmbushEnemy),
}

impl Enemy {
    pub fn spawn(id: u32, spawn: &EnemySpawn, tuning: &Tuning) -> Self {
        match spawn.kind {
            EnemyKind::Ground => {
                Enemy::Ground(GroundEnemy::new(id, spawn.x, spawn.y, tuning.ground_enemy_speed))
            }
            EnemyKind::Shelled => Enemy::Shelled(ShelledEnemy::new(
                id,
                spawn.x,
                spawn.y,
                tuning.shelled_walk_speed,
                tuning.shell_kick_speed,
            )),
            EnemyKind::Ambush => Enemy::Ambush(AmbushEnemy::new(id, spawn.x, spawn.y)),
        }
    }

    fn inner(&self) -> &dyn Entity {
        match self {
            Enemy::Ground(e) => e,
            Enemy::Shelled(e) => e,
            Enemy::Ambush(e) => e,
        }
    }
}

impl Actor for Enemy {
    fn update(&mut self, ctx: &mut StepContext<'_>) {
        match self {
            Enemy::Ground(e) => e.update(ctx),
            Enemy::Shelled(e) => e.update(ctx),
            Enemy::Ambush(e) => e.update(ctx),
        }
    }
}

impl Entity for Enemy {
    fn id(&self) -> u32 {
        self.inner().id()
    }

    fn kind_name(&self) -> &'static str {
        self.inner().kind_name()
    }

    fn body(&self) -> &Body {
        self.inner().body()
    }

    fn is_alive(&self) -> bool {
        self.inner().is_alive()
    }

    fn snapshot(&self) -> EntitySnapshot {
        self.inner().snapshot()
    }
}

fn facing_of(vel_x: f32) -> Facing {
    if vel_x > 0.0 {
        Facing::Right
    } else {
        Facing::Left
    }
}
