//! Overlap tests between circular and axis-aligned bounding volumes
//!
//! Entities are treated as circles in the arcade profile and as centered
//! boxes in the isometric one. Both live behind [`overlaps`] so the combat
//! code never cares which is in use.

use glam::Vec2;

use crate::tuning::CollisionShape;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box centered on `center` with the given half extents
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Strict overlap (touching edges do not count)
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Two circles overlap when their centers are closer than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Overlap test for two bodies given by center and radius (half extent)
pub fn overlaps(shape: CollisionShape, a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    match shape {
        CollisionShape::Circle => circles_overlap(a, ra, b, rb),
        CollisionShape::Box => {
            Aabb::from_center(a, Vec2::splat(ra)).intersects(&Aabb::from_center(b, Vec2::splat(rb)))
        }
    }
}

/// Unit direction from `from` toward `to`, or `None` when they coincide
pub fn direction(from: Vec2, to: Vec2, epsilon: f32) -> Option<(Vec2, f32)> {
    let delta = to - from;
    let dist = delta.length();
    if !dist.is_finite() || dist <= epsilon {
        return None;
    }
    Some((delta / dist, dist))
}
