//! Nearest-point lookup behind a small trait so a spatial index can replace
//! the linear scan without touching face tracing.

use nalgebra::Vector2;

use crate::geom::distance_sq;

pub trait NodeLocator {
    /// Index of the stored point closest to `p` and its squared distance.
    /// Ties resolve to the lowest index. `None` when empty or every distance is NaN;
    /// an overflowing distance is `+inf` and still counts.
    fn nearest(&self, p: Vector2<f64>) -> Option<(usize, f64)>;
}

/// Brute-force scan over a point list.
#[derive(Clone, Debug, Default)]
pub struct LinearScan {
    points: Vec<Vector2<f64>>,
}

impl LinearScan {
    pub fn new(points: Vec<Vector2<f64>>) -> Self {
        Self { points }
    }

    #[inline]
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points
    }
}

impl NodeLocator for LinearScan {
    fn nearest(&self, p: Vector2<f64>) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (k, &q) in self.points.iter().enumerate() {
            let d = distance_sq(p, q);
            if best.map_or(!d.is_nan(), |(_, bd)| d < bd) {
                best = Some((k, d));
            }
        }
        best
    }
}
