//! Two-dimensional vector algebra.
//!
//! `Vec2` uses `f32` components.  Single precision halves memory traffic in
//! the hot per-agent loops and matches the accuracy the geometric predicates
//! actually need; [`EPSILON`] is the threshold below which quantities are
//! treated as zero.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Threshold for "effectively zero" in geometric predicates.
pub const EPSILON: f32 = 1.0e-5;

/// An immutable two-dimensional point or vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Dot product with `other`.
    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Euclidean length.
    #[inline]
    pub fn abs(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Squared length.  Cheaper than [`abs`](Self::abs); prefer it whenever
    /// only comparisons are needed.
    #[inline]
    pub fn abs_sq(self) -> f32 {
        self.dot(self)
    }

    /// Unit vector in the direction of `self`.
    ///
    /// Must only be called on vectors known to be non-zero; a zero input
    /// yields non-finite components.
    #[inline]
    pub fn normalize(self) -> Vec2 {
        self / self.abs()
    }
}

/// Determinant of the 2x2 matrix with columns `a` and `b`.
#[inline]
pub fn det(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Signed twice-area of the triangle `abc`.
///
/// Positive when `c` lies to the left of the directed line from `a` to `b`.
#[inline]
pub fn left_of(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    det(a - c, b - a)
}

// ── Operators ─────────────────────────────────────────────────────────────────

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        *self = *self + rhs;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for f32 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs * self
    }
}

impl Div<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn div(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x / rhs, self.y / rhs)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
