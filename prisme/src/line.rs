use core::f64::consts::FRAC_PI_2;

use nalgebra::{ComplexField, Rotation2, Vector2};

use super::Point;

/// Half-width of the tolerance band used by [`is_within_segment`], in pixels.
pub const SEGMENT_EPSILON: f64 = 1.;

/// An infinite, non-vertical line, stored as the affine function `y = slope * x + intercept`.
///
/// Vertical lines can't be represented: their slope is infinite. Every line built by the
/// tracer comes from the fixed prism geometry, which never needs one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

impl Line {
    #[inline]
    #[must_use]
    pub const fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// The line passing through `p1` and `p2`.
    ///
    /// If `p1.x == p2.x` the slope is infinite (or NaN if the points are equal),
    /// and so is everything computed from the returned line.
    #[inline]
    #[must_use]
    pub fn through(p1: &Point, p2: &Point) -> Self {
        Self::from_slope_and_point(p1, (p2.y - p1.y) / (p2.x - p1.x))
    }

    #[inline]
    #[must_use]
    pub fn from_slope_and_point(p: &Point, slope: f64) -> Self {
        Self {
            slope,
            intercept: p.y - slope * p.x,
        }
    }

    /// The line through `p`, perpendicular to `self`.
    ///
    /// Undefined (infinite slope) if `self` is horizontal.
    #[inline]
    #[must_use]
    pub fn perpendicular_through(&self, p: &Point) -> Self {
        Self::from_slope_and_point(p, -1. / self.slope)
    }

    #[inline]
    #[must_use]
    pub fn at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// The point where `self` and `other` cross.
    ///
    /// Parallel (or identical) lines have no single intersection: both coordinates of the
    /// returned point are then NaN. Callers must treat such a point as "no intersection",
    /// which [`is_within_segment`] does, since NaN fails every comparison.
    #[inline]
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Point {
        if self.slope == other.slope {
            return Point::new(f64::NAN, f64::NAN);
        }

        let x = (other.intercept - self.intercept) / (self.slope - other.slope);
        Point::new(x, self.at(x))
    }

    /// `atan((m1 - m2) / (1 + m1 * m2))`, the signed angle between `self` and `other`.
    #[inline]
    #[must_use]
    pub fn angle_between(&self, other: &Self) -> f64 {
        let (m1, m2) = (self.slope, other.slope);
        ComplexField::atan((m1 - m2) / (1. + m1 * m2))
    }

    /// The angle between `self` and the normal of `other`.
    ///
    /// The sign tells which side of the normal `self` approaches from:
    /// a positive raw angle `a` maps to `π/2 - a`, anything else to `-π/2 - a`.
    #[inline]
    #[must_use]
    pub fn normal_angle_between(&self, other: &Self) -> f64 {
        let angle = self.angle_between(other);

        if angle > 0. {
            FRAC_PI_2 - angle
        } else {
            -FRAC_PI_2 - angle
        }
    }
}

/// Whether `p` lies inside the axis-aligned bounding box of the segment `[a, b]`,
/// widened by [`SEGMENT_EPSILON`] on every side.
///
/// This is not a true on-segment test: it only holds as one for points already known to lie
/// on the segment's supporting line, which is the case for every intersection it is used on.
#[inline]
#[must_use]
pub fn is_within_segment(p: &Point, a: &Point, b: &Point) -> bool {
    let within = |v: f64, lo: f64, hi: f64| {
        lo.min(hi) - SEGMENT_EPSILON <= v && v <= lo.max(hi) + SEGMENT_EPSILON
    };

    within(p.x, a.x, b.x) && within(p.y, a.y, b.y)
}

/// Rotate `v` by `angle` radians around the origin.
#[inline]
#[must_use]
pub fn rotate(v: &Vector2<f64>, angle: f64) -> Vector2<f64> {
    Rotation2::new(angle) * v
}
