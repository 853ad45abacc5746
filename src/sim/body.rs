//! Kinematic body shared by every moving entity
//!
//! Position is the top-left corner, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::PlayerTuning;

/// Position, velocity and a fixed-size box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(width >= 0.0 && height >= 0.0, "negative body size");
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// `vel.y += gravity * dt`
    pub fn apply_gravity(&mut self, gravity: f32, dt: f32) {
        debug_assert!(dt.is_finite() && dt > 0.0, "invalid dt {dt}");
        self.vel.y += gravity * dt;
    }

    /// `pos += vel * dt`
    pub fn integrate(&mut self, dt: f32) {
        debug_assert!(dt.is_finite() && dt > 0.0, "invalid dt {dt}");
        self.pos += self.vel * dt;
    }

    /// Vertical-only integration (entities whose x is driven elsewhere)
    pub fn integrate_y(&mut self, dt: f32) {
        debug_assert!(dt.is_finite() && dt > 0.0, "invalid dt {dt}");
        self.pos.y += self.vel.y * dt;
    }

    /// Change height while keeping the bottom edge in place
    pub fn set_height_keep_bottom(&mut self, height: f32) {
        debug_assert!(height >= 0.0, "negative height");
        let bottom = self.bottom();
        self.size.y = height;
        self.pos.y = bottom - height;
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite() && self.size.is_finite()
    }
}

/// Commanded horizontal direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Steer {
    Left,
    Right,
    #[default]
    None,
}

/// Advance horizontal velocity one step toward the commanded direction.
///
/// Holding a direction accelerates (with double-friction braking when the
/// current velocity points the other way); releasing decays toward zero and
/// snaps to exactly zero under `stop_epsilon`. The result is clamped to
/// `max_speed`.
pub fn steer(vel_x: f32, steer: Steer, tuning: &PlayerTuning, dt: f32) -> f32 {
    debug_assert!(dt.is_finite() && dt > 0.0, "invalid dt {dt}");
    let mut vel_x = vel_x;
    match steer {
        Steer::Left => {
            if vel_x > 0.0 {
                vel_x -= tuning.friction * 2.0 * dt;
            }
            vel_x -= tuning.acceleration * dt;
        }
        Steer::Right => {
            if vel_x < 0.0 {
                vel_x += tuning.friction * 2.0 * dt;
            }
            vel_x += tuning.acceleration * dt;
        }
        Steer::None => {
            if vel_x.abs() > tuning.stop_epsilon {
                vel_x -= vel_x.signum() * tuning.friction * dt;
            } else {
                vel_x = 0.0;
            }
        }
    }
    vel_x.clamp(-tuning.max_speed, tuning.max_speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_gravity_then_integrate() {
        let mut body = Body::new(0.0, 0.0, 10.0, 10.0);
        body.vel.x = 60.0;
        body.apply_gravity(1500.0, SIM_DT);
        body.integrate(SIM_DT);
        assert!((body.vel.y - 25.0).abs() < 1e-4);
        assert!((body.pos.x - 1.0).abs() < 1e-4);
        assert!((body.pos.y - 25.0 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_steer_clamps_to_max_speed() {
        let tuning = PlayerTuning::default();
        let mut vel = 0.0;
        for _ in 0..120 {
            vel = steer(vel, Steer::Right, &tuning, SIM_DT);
        }
        assert_eq!(vel, tuning.max_speed);
    }

    #[test]
    fn test_quick_turn_brakes_harder() {
        let tuning = PlayerTuning::default();
        let plain = steer(100.0, Steer::None, &tuning, SIM_DT);
        let turn = steer(100.0, Steer::Left, &tuning, SIM_DT);
        // friction 10 vs 2*friction + acceleration = 33.3
        assert!((100.0 - plain - 10.0).abs() < 1e-3);
        assert!((100.0 - turn - 2000.0 / 60.0).abs() < 1e-3);
    }

    #[test]
    fn test_friction_snaps_to_zero() {
        let tuning = PlayerTuning::default();
        assert_eq!(steer(9.0, Steer::None, &tuning, SIM_DT), 0.0);
        assert_eq!(steer(-9.0, Steer::None, &tuning, SIM_DT), 0.0);
        let mut vel = 200.0;
        for _ in 0..60 {
            vel = steer(vel, Steer::None, &tuning, SIM_DT);
        }
        assert_eq!(vel, 0.0);
    }

    #[test]
    fn test_set_height_keeps_bottom() {
        let mut body = Body::new(0.0, 345.0, 40.0, 55.0);
        body.set_height_keep_bottom(32.0);
        assert_eq!(body.bottom(), 400.0);
        assert_eq!(body.pos.y, 368.0);
    }
}
