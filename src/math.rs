//! Mathematical structs and functions.

use cgmath::{Point2, Vector2};
use std::f64::consts::TAU;

/// A 2D point
pub type Point2d = Point2<f64>;

/// A 2D vector
pub type Vector2d = Vector2<f64>;

/// Rotates a vector 90 degrees anti-clockwise.
pub fn rot90(vec: Vector2d) -> Vector2d {
    Vector2d::new(-vec.y, vec.x)
}

/// Wraps an angle in radians into `[0, 2π)`.
pub fn normalize_angle(angle: f64) -> f64 {
    let angle = angle.rem_euclid(TAU);
    // `rem_euclid` rounds tiny negative inputs up to exactly 2π.
    if angle >= TAU {
        0.0
    } else {
        angle
    }
}

/// Computes the forward angular distance from `from` to `to`, in `(0, 2π]`.
/// Coincident angles are a full turn apart.
pub fn forward_angle(from: f64, to: f64) -> f64 {
    let diff = to - from;
    if diff <= 0.0 {
        diff + TAU
    } else {
        diff
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn wraps_angles() {
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_approx_eq!(normalize_angle(TAU + 0.5), 0.5);
        assert_approx_eq!(normalize_angle(-0.5), TAU - 0.5);
        assert_eq!(normalize_angle(TAU), 0.0);
        assert!(normalize_angle(-1e-18) < TAU);
    }

    #[test]
    fn forward_angles() {
        assert_approx_eq!(forward_angle(1.0, 1.5), 0.5);
        assert_approx_eq!(forward_angle(6.0, 0.2), 0.2 + TAU - 6.0);
        assert_approx_eq!(forward_angle(2.0, 2.0), TAU);
    }

    #[test]
    fn rotates() {
        let v = rot90(Vector2d::new(1.0, 0.0));
        assert_approx_eq!(v.x, 0.0);
        assert_approx_eq!(v.y, 1.0);
    }
}
