//! Axis-aligned collision detection and response
//!
//! Everything here is discrete: boxes are tested where they are after a step,
//! never swept. A body falling faster than a landing band per step can pass
//! through a thin platform.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::consts::{BUMP_MARGIN, BUMP_TOLERANCE};

/// Axis-aligned bounding box (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        debug_assert!(size.x >= 0.0 && size.y >= 0.0, "malformed box {size:?}");
        Self { pos, size }
    }

    pub fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self::new(Vec2::new(x, y), Vec2::new(w, h))
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    /// Strict overlap: boxes sharing only an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        overlaps(self, other)
    }
}

/// True iff the boxes intersect with positive area
#[inline]
pub fn overlaps(a: &Aabb, b: &Aabb) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Strict horizontal overlap only
#[inline]
pub fn overlaps_x(a: &Aabb, b: &Aabb) -> bool {
    a.left() < b.right() && a.right() > b.left()
}

/// Snap a falling body onto a platform top.
///
/// Applies when the body is not rising, overlaps the platform horizontally and
/// its bottom edge lies within `tolerance` below the platform top. Returns
/// true when the body landed (bottom == top, `vel.y == 0`).
pub fn land_on_platform(body: &mut Body, platform: &Aabb, tolerance: f32) -> bool {
    if body.vel.y < 0.0 || !overlaps_x(&body.aabb(), platform) {
        return false;
    }
    let bottom = body.bottom();
    if bottom >= platform.top() && bottom <= platform.top() + tolerance {
        body.pos.y = platform.top() - body.size.y;
        body.vel.y = 0.0;
        return true;
    }
    false
}

/// Snap a body that sank below a ground line back onto it.
///
/// `depth` bounds how far below the line a body may be and still be caught;
/// anything deeper has already fallen past the ground (through a pit).
pub fn land_on_ground(body: &mut Body, ground_y: f32, depth: f32) -> bool {
    let bottom = body.bottom();
    if bottom > ground_y && bottom <= ground_y + depth {
        body.pos.y = ground_y - body.size.y;
        body.vel.y = 0.0;
        return true;
    }
    false
}

/// How a rising mover meets a block from underneath
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockContact {
    /// No overlap
    None,
    /// Rising head hit within the underside midsection
    Bump,
    /// Overlap within the midsection that is not a bump
    Midsection,
    /// Overlap at the left/right margins (top or side contact)
    Margin,
}

/// Classify an overlap between a mover and a block
pub fn classify_block_contact(mover: &Aabb, vel_y: f32, block: &Aabb) -> BlockContact {
    if !overlaps(mover, block) {
        return BlockContact::None;
    }
    let in_midsection =
        mover.right() > block.left() + BUMP_MARGIN && mover.left() < block.right() - BUMP_MARGIN;
    if !in_midsection {
        return BlockContact::Margin;
    }
    if vel_y < 0.0 && mover.top() > block.bottom() - BUMP_TOLERANCE {
        BlockContact::Bump
    } else {
        BlockContact::Midsection
    }
}

/// Player-versus-enemy contact kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    None,
    /// Player falling onto the enemy's upper half
    Stomp,
    /// Any other overlap
    Side,
}

/// Classify player/enemy contact.
///
/// A stomp needs the player moving down with its bottom edge above the enemy's
/// mid-height. One rule for every enemy kind keeps tie-breaks consistent.
pub fn classify_contact(player: &Aabb, player_vel_y: f32, enemy: &Aabb) -> Contact {
    if !overlaps(player, enemy) {
        return Contact::None;
    }
    if player_vel_y > 0.0 && player.bottom() < enemy.top() + enemy.size.y * 0.5 {
        Contact::Stomp
    } else {
        Contact::Side
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        let right = Aabb::from_xywh(10.0, 0.0, 10.0, 10.0);
        let below = Aabb::from_xywh(0.0, 10.0, 10.0, 10.0);
        assert!(!overlaps(&a, &right));
        assert!(!overlaps(&a, &below));
        assert!(overlaps(&a, &Aabb::from_xywh(9.9, 9.9, 5.0, 5.0)));
    }

    #[test]
    fn test_landing_within_band() {
        let platform = Aabb::from_xywh(100.0, 200.0, 32.0, 32.0);
        let mut body = Body::new(100.0, 165.0, 40.0, 40.0);
        body.vel.y = 120.0;
        assert!(land_on_platform(&mut body, &platform, 20.0));
        assert_eq!(body.bottom(), 200.0);
        assert_eq!(body.vel.y, 0.0);
    }

    #[test]
    fn test_landing_ignores_rising_and_deep_bodies() {
        let platform = Aabb::from_xywh(100.0, 200.0, 32.0, 32.0);

        let mut rising = Body::new(100.0, 165.0, 40.0, 40.0);
        rising.vel.y = -50.0;
        assert!(!land_on_platform(&mut rising, &platform, 20.0));

        let mut deep = Body::new(100.0, 190.0, 40.0, 40.0);
        deep.vel.y = 50.0;
        assert!(!land_on_platform(&mut deep, &platform, 20.0));
    }

    #[test]
    fn test_landing_is_idempotent_at_rest() {
        let platform = Aabb::from_xywh(0.0, 200.0, 64.0, 32.0);
        let mut body = Body::new(10.0, 160.0, 40.0, 40.0);
        for _ in 0..10 {
            body.apply_gravity(1500.0, crate::consts::SIM_DT);
            body.integrate(crate::consts::SIM_DT);
            assert!(land_on_platform(&mut body, &platform, 20.0));
            assert_eq!(body.pos.y, 160.0);
        }
    }

    #[test]
    fn test_ground_depth_limit() {
        let mut body = Body::new(0.0, 365.0, 40.0, 40.0);
        assert!(land_on_ground(&mut body, 400.0, 48.0));
        assert_eq!(body.pos.y, 360.0);

        let mut fallen = Body::new(0.0, 420.0, 40.0, 40.0);
        assert!(!land_on_ground(&mut fallen, 400.0, 48.0));
    }

    #[test]
    fn test_block_contact_zones() {
        let block = Aabb::from_xywh(100.0, 200.0, 32.0, 32.0);
        let head = Aabb::from_xywh(96.0, 225.0, 40.0, 40.0);
        assert_eq!(classify_block_contact(&head, -300.0, &block), BlockContact::Bump);
        assert_eq!(classify_block_contact(&head, 10.0, &block), BlockContact::Midsection);

        // Only 3px of horizontal overlap: inside the margin
        let edge = Aabb::from_xywh(63.0, 225.0, 40.0, 40.0);
        assert_eq!(classify_block_contact(&edge, -300.0, &block), BlockContact::Margin);

        let apart = Aabb::from_xywh(0.0, 0.0, 10.0, 10.0);
        assert_eq!(classify_block_contact(&apart, -300.0, &block), BlockContact::None);
    }

    #[test]
    fn test_classify_contact() {
        let enemy = Aabb::from_xywh(100.0, 360.0, 40.0, 40.0);

        let above = Aabb::from_xywh(100.0, 325.0, 40.0, 40.0);
        assert_eq!(classify_contact(&above, 200.0, &enemy), Contact::Stomp);
        // Same overlap but rising: side hit
        assert_eq!(classify_contact(&above, -200.0, &enemy), Contact::Side);

        let beside = Aabb::from_xywh(70.0, 360.0, 40.0, 40.0);
        assert_eq!(classify_contact(&beside, 200.0, &enemy), Contact::Side);

        let apart = Aabb::from_xywh(0.0, 0.0, 40.0, 40.0);
        assert_eq!(classify_contact(&apart, 200.0, &enemy), Contact::None);
    }
}
