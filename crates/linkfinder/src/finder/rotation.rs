//! Rotation system: per-node neighbor lists sorted by angle.

use nalgebra::Vector2;

use super::types::{NodeIx, RotEntry};
use crate::geom::direction_angle;

/// Angle-sorted neighbor lists for every node, plus a deduplicated view for walking.
///
/// Invariants:
/// - `by_angle[n]` has one entry per raw incident link, angles in [0, 2π),
///   sorted ascending (stable, so ties keep link order).
/// - `unique[n]` is `by_angle[n]` with repeated neighbors dropped (first kept).
#[derive(Clone, Debug, Default)]
pub struct RotationSystem {
    by_angle: Vec<Vec<RotEntry>>,
    unique: Vec<Vec<RotEntry>>,
}

impl RotationSystem {
    /// `neighbors[n]` lists the far endpoint of each link of node `n`, in link order.
    pub fn build(positions: &[Vector2<f64>], neighbors: &[Vec<NodeIx>]) -> Self {
        let mut by_angle = Vec::with_capacity(neighbors.len());
        let mut unique = Vec::with_capacity(neighbors.len());
        for (n, nbrs) in neighbors.iter().enumerate() {
            let here = positions[n];
            let mut links: Vec<RotEntry> = nbrs
                .iter()
                .map(|&to| RotEntry {
                    to,
                    angle: direction_angle(here, positions[to.0]),
                })
                .collect();
            links.sort_by(|a, b| {
                a.angle
                    .partial_cmp(&b.angle)
                    .unwrap_or(std::cmp::Ordering::Equal)
            });
            let mut dedup: Vec<RotEntry> = Vec::with_capacity(links.len());
            for e in &links {
                if !dedup.iter().any(|d| d.to == e.to) {
                    dedup.push(*e);
                }
            }
            by_angle.push(links);
            unique.push(dedup);
        }
        Self { by_angle, unique }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_angle.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_angle.is_empty()
    }

    /// All entries of `n`, one per raw link.
    #[inline]
    pub fn links_by_angle(&self, n: NodeIx) -> &[RotEntry] {
        &self.by_angle[n.0]
    }

    /// Entries of `n` with parallel links collapsed.
    #[inline]
    pub fn unique_links(&self, n: NodeIx) -> &[RotEntry] {
        &self.unique[n.0]
    }

    /// Number of directed edges after collapsing parallels; bounds any face walk.
    pub fn directed_edge_count(&self) -> usize {
        self.unique.iter().map(Vec::len).sum()
    }

    /// First entry `from → to` whose reverse `to → from` is missing.
    pub fn find_asymmetric(&self) -> Option<(NodeIx, NodeIx)> {
        for (n, links) in self.unique.iter().enumerate() {
            let from = NodeIx(n);
            for e in links {
                if !self.unique[e.to.0].iter().any(|r| r.to == from) {
                    return Some((from, e.to));
                }
            }
        }
        None
    }
}
