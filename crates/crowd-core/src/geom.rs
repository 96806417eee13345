//! Oriented lines and small segment geometry helpers.

use crate::vec2::{det, Vec2};

/// An oriented line given by a point on it and a unit direction.
///
/// A `Line` doubles as a half-plane constraint: the permitted region is the
/// closed left half-plane, `{ v : det(direction, v - point) >= 0 }`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Line {
    /// A point on the line.
    pub point: Vec2,
    /// Unit direction of the line.
    pub direction: Vec2,
}

impl Line {
    /// Signed margin of `v` against the half-plane.  Non-negative means `v`
    /// is permitted.
    #[inline]
    pub fn margin(&self, v: Vec2) -> f32 {
        det(self.direction, v - self.point)
    }
}

/// Squared distance from point `c` to the segment from `a` to `b`.
pub fn dist_sq_point_segment(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    let r = (c - a).dot(b - a) / (b - a).abs_sq();

    if r < 0.0 {
        (c - a).abs_sq()
    } else if r > 1.0 {
        (c - b).abs_sq()
    } else {
        (c - (a + (b - a) * r)).abs_sq()
    }
}
