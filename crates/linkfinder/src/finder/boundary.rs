//! Outer boundary of the embedding and the even-odd containment test.
//!
//! The face seen from the rightmost node at angle 0 is the unbounded face for
//! any well-formed embedding, so one trace at construction yields the outer
//! boundary. Coordinates are flattened into parallel arrays for the ray cast.

use nalgebra::Vector2;

use super::face::{trace_face, WalkError};
use super::nearest::{LinearScan, NodeLocator};
use super::rotation::RotationSystem;
use super::types::{NodeIx, Segment};
use crate::geom::{next_index, prev_index};

/// Cached outer face: node sequence plus its coordinates.
#[derive(Clone, Debug)]
pub struct BoundaryPolygon {
    nodes: Vec<NodeIx>,
    xs: Vec<f64>,
    ys: Vec<f64>,
    scan: LinearScan,
}

/// Node with the largest x; the first one enumerated wins ties.
pub(crate) fn rightmost(positions: &[Vector2<f64>]) -> Option<NodeIx> {
    let mut best: Option<(usize, f64)> = None;
    for (k, p) in positions.iter().enumerate() {
        if best.map_or(true, |(_, bx)| p.x > bx) {
            best = Some((k, p.x));
        }
    }
    best.map(|(k, _)| NodeIx(k))
}

impl BoundaryPolygon {
    pub(crate) fn build(
        positions: &[Vector2<f64>],
        rot: &RotationSystem,
        start: NodeIx,
    ) -> Result<Self, WalkError> {
        let nodes = trace_face(rot, start, 0.0)?;
        let pts: Vec<Vector2<f64>> = nodes.iter().map(|n| positions[n.0]).collect();
        Ok(Self {
            xs: pts.iter().map(|p| p.x).collect(),
            ys: pts.iter().map(|p| p.y).collect(),
            scan: LinearScan::new(pts),
            nodes,
        })
    }

    /// Boundary nodes in walk order (leaves and cut vertices may repeat).
    #[inline]
    pub fn nodes(&self) -> &[NodeIx] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Even-odd ray cast. Points exactly on an edge follow the half-open
    /// `ys[i] <= y < ys[j]` crossing rule, i.e. the result there is arbitrary.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (xs, ys) = (&self.xs, &self.ys);
        let n = xs.len();
        if n == 0 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let straddles = (ys[i] <= y && y < ys[j]) || (ys[j] <= y && y < ys[i]);
            if straddles && x > (xs[j] - xs[i]) * (y - ys[i]) / (ys[j] - ys[i]) + xs[i] {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Position in the boundary sequence of the node closest to `p`.
    pub fn nearest(&self, p: Vector2<f64>) -> Option<usize> {
        self.scan.nearest(p).map(|(k, _)| k)
    }

    /// Boundary segments around position `k`: `steps` times one segment forward
    /// then one backward, each walk advancing circularly.
    pub fn segments_around(&self, k: usize, steps: usize) -> Vec<Segment> {
        let len = self.nodes.len();
        let mut out = Vec::with_capacity(2 * steps);
        if len == 0 {
            return out;
        }
        let (mut up, mut down) = (k, k);
        for _ in 0..steps {
            let a = self.nodes[up];
            up = next_index(up, len);
            out.push(Segment {
                a,
                b: self.nodes[up],
            });
            let a = self.nodes[down];
            down = prev_index(down, len);
            out.push(Segment {
                a,
                b: self.nodes[down],
            });
        }
        out
    }
}
