//! Small 2D helpers shared by the rotation builder, face tracer and query.
//!
//! Angles are radians normalized into [0, 2π); distances are squared so the
//! hot comparison loops never take a square root.

use nalgebra::Vector2;
use std::f64::consts::TAU;

/// Squared Euclidean distance between `a` and `b`.
#[inline]
pub fn distance_sq(a: Vector2<f64>, b: Vector2<f64>) -> f64 {
    (b - a).norm_squared()
}

/// Closest point to `c` on the closed segment `[a, b]`.
///
/// The projection parameter is clamped: below 0 returns `a`, above 1 returns `b`.
/// A zero-length segment returns `a`.
pub fn nearest_point_on_segment(a: Vector2<f64>, b: Vector2<f64>, c: Vector2<f64>) -> Vector2<f64> {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ab.dot(&(c - a)) / len_sq;
    if t < 0.0 {
        return a;
    }
    if t > 1.0 {
        return b;
    }
    a + ab * t
}

/// Fold an angle into [0, 2π) by whole turns. Non-finite input is returned as is.
#[inline]
pub fn normalize_angle(mut theta: f64) -> f64 {
    if !theta.is_finite() {
        return theta;
    }
    while theta < 0.0 {
        theta += TAU;
    }
    while theta >= TAU {
        theta -= TAU;
    }
    theta
}

/// Normalized angle of the direction `from → to`.
#[inline]
pub fn direction_angle(from: Vector2<f64>, to: Vector2<f64>) -> f64 {
    let d = to - from;
    normalize_angle(d.y.atan2(d.x))
}

/// `i + 1`, wrapping to 0 past the end.
#[inline]
pub fn next_index(i: usize, len: usize) -> usize {
    if i + 1 >= len {
        0
    } else {
        i + 1
    }
}

/// `i - 1`, wrapping to `len - 1` before the start.
#[inline]
pub fn prev_index(i: usize, len: usize) -> usize {
    if i == 0 {
        len.saturating_sub(1)
    } else {
        i - 1
    }
}
