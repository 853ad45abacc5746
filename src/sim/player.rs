//! The player: movement, power state, invulnerability and death

use serde::{Deserialize, Serialize};

use super::body::{self, Body};
use super::collision::{self, Aabb};
use super::snapshot::{EntitySnapshot, VisualTag};
use super::state::{Entity, GameEvent, LevelBounds};
use super::tick::TickInput;
use crate::consts::{DEATH_HOP, INVULNERABLE_SECS, LANDING_TOLERANCE, RUN_ANIM_FPS, STOMP_BOUNCE};
use crate::tuning::PlayerTuning;

/// Snapshot id reserved for the player
pub const PLAYER_ID: u32 = 0;

/// Last run-cycle frame; also the airborne frame
const LAST_FRAME: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PowerState {
    #[default]
    Small,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// What a damage event did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invulnerable or already dead
    Ignored,
    Shrunk,
    Died,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub tuning: PlayerTuning,
    pub grounded: bool,
    pub facing: Facing,
    pub power: PowerState,
    /// Seconds of invulnerability left (0 = vulnerable)
    pub invulnerable_timer: f32,
    pub dead: bool,
    /// Seconds since death
    pub death_timer: f32,
    /// Current run-cycle frame for the renderer
    pub anim_frame: u8,
    anim_timer: f32,
}

impl Player {
    pub fn new(x: f32, y: f32, tuning: PlayerTuning) -> Self {
        Self {
            body: Body::new(x, y, tuning.width, tuning.height),
            tuning,
            grounded: false,
            facing: Facing::Right,
            power: PowerState::Small,
            invulnerable_timer: 0.0,
            dead: false,
            death_timer: 0.0,
            anim_frame: 0,
            anim_timer: 0.0,
        }
    }

    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }

    /// Small -> Big. Returns false when nothing changed.
    pub fn grow(&mut self, events: &mut Vec<GameEvent>) -> bool {
        if self.dead || self.power == PowerState::Big {
            return false;
        }
        self.power = PowerState::Big;
        events.push(GameEvent::PlayerGrew);
        true
    }

    /// Big -> Small with invulnerability, Small -> dead.
    ///
    /// No-op while invulnerable or dead.
    pub fn take_damage(&mut self, events: &mut Vec<GameEvent>) -> DamageOutcome {
        if self.dead || self.is_invulnerable() {
            return DamageOutcome::Ignored;
        }
        match self.power {
            PowerState::Big => {
                self.power = PowerState::Small;
                self.invulnerable_timer = INVULNERABLE_SECS;
                events.push(GameEvent::PlayerShrunk);
                DamageOutcome::Shrunk
            }
            PowerState::Small => {
                self.die(events);
                DamageOutcome::Died
            }
        }
    }

    fn die(&mut self, events: &mut Vec<GameEvent>) {
        self.dead = true;
        self.death_timer = 0.0;
        self.grounded = false;
        self.body.vel.y = DEATH_HOP;
        events.push(GameEvent::PlayerDied);
        log::info!("Player died at x={:.1}", self.body.pos.x);
    }

    /// Stomp rebound: rest on `top` and bounce upward
    pub fn bounce_off(&mut self, top: f32) {
        self.body.pos.y = top - self.body.size.y;
        self.body.vel.y = STOMP_BOUNCE;
        self.grounded = false;
    }

    /// Head hit a ceiling at `ceiling`: stop rising and sit just below it
    pub fn head_bump(&mut self, ceiling: f32) {
        self.body.vel.y = 0.0;
        self.body.pos.y = ceiling;
    }

    /// Land on a platform with the given band; sets `grounded` on success
    pub fn land_on(&mut self, platform: &Aabb, tolerance: f32) -> bool {
        let landed = collision::land_on_platform(&mut self.body, platform, tolerance);
        if landed {
            self.grounded = true;
        }
        landed
    }

    /// True once the player has left the world for good
    pub fn has_fallen_out(&self, bounds: &LevelBounds) -> bool {
        if self.dead {
            self.body.pos.y > bounds.kill_y()
        } else {
            self.body.pos.y > bounds.world_bottom()
        }
    }

    /// Advance one step
    pub fn update(
        &mut self,
        input: &TickInput,
        bounds: &LevelBounds,
        platforms: &[Aabb],
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        if self.invulnerable_timer > 0.0 {
            self.invulnerable_timer = (self.invulnerable_timer - dt).max(0.0);
        }

        if self.dead {
            // Death arc: gravity only, no input, no collision
            self.death_timer += dt;
            self.body.apply_gravity(self.tuning.gravity, dt);
            self.body.integrate_y(dt);
            return;
        }

        let steer = input.steer();
        self.body.vel.x = body::steer(self.body.vel.x, steer, &self.tuning, dt);
        match steer {
            body::Steer::Left => self.facing = Facing::Left,
            body::Steer::Right => self.facing = Facing::Right,
            body::Steer::None => {}
        }

        if input.jump {
            if self.grounded {
                self.body.vel.y = self.tuning.jump_impulse;
                self.grounded = false;
                events.push(GameEvent::Jumped);
            }
        } else if !self.grounded && self.body.vel.y < -self.tuning.jump_cut_threshold {
            // Released early: damp the rise for a short hop
            self.body.vel.y *= self.tuning.jump_cut_factor;
        }

        self.body.apply_gravity(self.tuning.gravity, dt);
        self.body.integrate(dt);
        self.clamp_to_map(bounds);

        self.grounded = false;
        if bounds.land_on_ground(&mut self.body) {
            self.grounded = true;
        }
        for platform in platforms {
            self.land_on(platform, LANDING_TOLERANCE);
        }

        self.animate(dt);
    }

    fn clamp_to_map(&mut self, bounds: &LevelBounds) {
        let max_x = (bounds.map_width - self.body.size.x).max(0.0);
        if self.body.pos.x < 0.0 {
            self.body.pos.x = 0.0;
            self.body.vel.x = self.body.vel.x.max(0.0);
        } else if self.body.pos.x > max_x {
            self.body.pos.x = max_x;
            self.body.vel.x = self.body.vel.x.min(0.0);
        }
    }

    fn animate(&mut self, dt: f32) {
        if self.body.vel.x.abs() > self.tuning.stop_epsilon {
            self.anim_timer += dt;
            if self.anim_timer > 1.0 / RUN_ANIM_FPS {
                self.anim_timer = 0.0;
                self.anim_frame += 1;
                if self.anim_frame > LAST_FRAME {
                    self.anim_frame = 1;
                }
            }
        } else {
            self.anim_frame = 0;
        }
        if !self.grounded {
            self.anim_frame = LAST_FRAME;
        }
    }
}

impl Entity for Player {
    fn id(&self) -> u32 {
        PLAYER_ID
    }

    fn kind_name(&self) -> &'static str {
        "player"
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn is_alive(&self) -> bool {
        !self.dead
    }

    fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: PLAYER_ID,
            bounds: self.body.aabb(),
            facing: self.facing,
            draw_offset_y: 0.0,
            tag: VisualTag::Player {
                power: self.power,
                dead: self.dead,
                invulnerable: self.is_invulnerable(),
                frame: self.anim_frame,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn open_level() -> LevelBounds {
        LevelBounds {
            ground_y: 400.0,
            goal_x: 10_000.0,
            map_width: 20_000.0,
            view_width: 800.0,
            view_height: 480.0,
            pits: Vec::new(),
        }
    }

    fn grounded_player(x: f32) -> Player {
        let mut player = Player::new(x, 360.0, PlayerTuning::default());
        player.grounded = true;
        player
    }

    #[test]
    fn test_run_right_for_two_seconds() {
        let bounds = open_level();
        let mut player = grounded_player(90.0);
        let mut events = Vec::new();
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..120 {
            player.update(&input, &bounds, &[], SIM_DT, &mut events);
        }
        let max_speed = player.tuning.max_speed;
        // Ramp to max speed takes 250/800 s and costs ~39px versus full speed
        let ideal = 90.0 + max_speed * 2.0;
        assert_eq!(player.body.vel.x, max_speed);
        assert!(player.body.pos.x < ideal);
        assert!(ideal - player.body.pos.x < 50.0, "x = {}", player.body.pos.x);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_resting_on_ground_is_stable() {
        let bounds = open_level();
        let mut player = grounded_player(100.0);
        let mut events = Vec::new();
        for _ in 0..30 {
            player.update(&TickInput::default(), &bounds, &[], SIM_DT, &mut events);
            assert_eq!(player.body.pos.y, 360.0);
            assert!(player.grounded);
        }
        assert!(events.is_empty());
    }

    #[test]
    fn test_tap_jump_is_lower_than_held_jump() {
        let bounds = open_level();
        let hold = TickInput {
            jump: true,
            ..Default::default()
        };

        let apex = |held_steps: usize| {
            let mut player = grounded_player(100.0);
            let mut events = Vec::new();
            let mut min_y = player.body.pos.y;
            for step in 0..90 {
                let input = if step < held_steps {
                    hold
                } else {
                    TickInput::default()
                };
                player.update(&input, &bounds, &[], SIM_DT, &mut events);
                min_y = min_y.min(player.body.pos.y);
            }
            assert_eq!(events.first(), Some(&GameEvent::Jumped));
            360.0 - min_y
        };

        let short = apex(2);
        let full = apex(40);
        assert!(short > 0.0);
        assert!(full > short * 2.0, "short {short}, full {full}");
    }

    #[test]
    fn test_power_transitions() {
        let mut player = grounded_player(100.0);
        let mut events = Vec::new();

        assert!(player.grow(&mut events));
        assert_eq!(player.power, PowerState::Big);
        assert!(!player.grow(&mut events));

        assert_eq!(player.take_damage(&mut events), DamageOutcome::Shrunk);
        assert_eq!(player.power, PowerState::Small);
        assert!(player.is_invulnerable());
        assert_eq!(player.take_damage(&mut events), DamageOutcome::Ignored);

        player.invulnerable_timer = 0.0;
        assert_eq!(player.take_damage(&mut events), DamageOutcome::Died);
        assert!(player.dead);
        assert_eq!(player.body.vel.y, DEATH_HOP);

        // Dead is terminal
        assert_eq!(player.take_damage(&mut events), DamageOutcome::Ignored);
        assert!(!player.grow(&mut events));
        assert_eq!(player.power, PowerState::Small);
        assert_eq!(
            events,
            vec![
                GameEvent::PlayerGrew,
                GameEvent::PlayerShrunk,
                GameEvent::PlayerDied
            ]
        );
    }

    #[test]
    fn test_invulnerability_wears_off() {
        let bounds = open_level();
        let mut player = grounded_player(100.0);
        let mut events = Vec::new();
        player.power = PowerState::Big;
        player.take_damage(&mut events);
        for _ in 0..121 {
            player.update(&TickInput::default(), &bounds, &[], SIM_DT, &mut events);
        }
        assert!(!player.is_invulnerable());
    }

    #[test]
    fn test_dead_player_ignores_input_and_falls_out() {
        let bounds = open_level();
        let mut player = grounded_player(100.0);
        let mut events = Vec::new();
        player.take_damage(&mut events);

        let input = TickInput {
            right: true,
            jump: true,
            ..Default::default()
        };
        let x = player.body.pos.x;
        let mut steps = 0;
        while !player.has_fallen_out(&bounds) {
            player.update(&input, &bounds, &[], SIM_DT, &mut events);
            steps += 1;
            assert!(steps < 600, "dead player never left the screen");
        }
        assert_eq!(player.body.pos.x, x);
        // Passed through the ground line without landing
        assert!(player.body.pos.y > bounds.kill_y());
        assert_eq!(events, vec![GameEvent::PlayerDied]);
    }

    #[test]
    fn test_lands_on_block_top() {
        let bounds = open_level();
        let block = Aabb::from_xywh(100.0, 250.0, 32.0, 32.0);
        let mut player = Player::new(100.0, 200.0, PlayerTuning::default());
        let mut events = Vec::new();
        for _ in 0..30 {
            player.update(&TickInput::default(), &bounds, &[block], SIM_DT, &mut events);
        }
        assert!(player.grounded);
        assert_eq!(player.body.bottom(), 250.0);
    }

    #[test]
    fn test_walking_off_a_block_clears_grounded() {
        let bounds = open_level();
        let block = Aabb::from_xywh(100.0, 250.0, 32.0, 32.0);
        let mut player = Player::new(100.0, 210.0, PlayerTuning::default());
        player.grounded = true;
        let mut events = Vec::new();
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..20 {
            player.update(&input, &bounds, &[block], SIM_DT, &mut events);
        }
        assert!(player.body.pos.x > block.right());
        assert!(!player.grounded);
    }

    #[test]
    fn test_run_animation_cycles() {
        let bounds = open_level();
        let mut player = grounded_player(100.0);
        let mut events = Vec::new();
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        let mut seen = [false; 4];
        for _ in 0..60 {
            player.update(&input, &bounds, &[], SIM_DT, &mut events);
            seen[player.anim_frame as usize] = true;
        }
        assert!(seen[1] && seen[2] && seen[3]);

        player.body.vel.x = 0.0;
        player.update(&TickInput::default(), &bounds, &[], SIM_DT, &mut events);
        assert_eq!(player.anim_frame, 0);
    }
}
