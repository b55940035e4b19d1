//! `Finder`: index construction and the nearest-link query.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use nalgebra::Vector2;

use super::boundary::{rightmost, BoundaryPolygon};
use super::face::{trace_face, WalkError};
use super::nearest::{LinearScan, NodeLocator};
use super::rotation::RotationSystem;
use super::types::{FinderCfg, LinkMatch, NodeIx, QueryMode, RotEntry, Segment};
use crate::error::{show, FinderError};
use crate::geom::{direction_angle, distance_sq, nearest_point_on_segment};
use crate::graph::PlanarGraph;

/// Point-location index over a planar embedding.
///
/// Owns everything it derives (ids, positions, rotation system, boundary); the
/// source graph is only read during [`Finder::new`].
#[derive(Clone, Debug)]
pub struct Finder<Id> {
    cfg: FinderCfg,
    ids: Vec<Id>,
    index: HashMap<Id, NodeIx>,
    nodes: LinearScan,
    rot: RotationSystem,
    boundary: Option<BoundaryPolygon>,
}

impl<Id: Clone + Eq + Hash + Debug> Finder<Id> {
    /// Build the rotation system and, if enabled, the outer boundary.
    ///
    /// Pre: the embedding is planar and connected. Violations that can be
    /// detected locally (isolated nodes, self loops, dangling or one-sided
    /// links, non-finite coordinates) are reported as errors.
    pub fn new<G>(graph: &G, cfg: FinderCfg) -> Result<Self, FinderError>
    where
        G: PlanarGraph<Id = Id>,
    {
        cfg.validate()?;

        let mut ids: Vec<Id> = Vec::new();
        graph.for_each_node(|id| ids.push(id.clone()));
        if ids.is_empty() {
            return Err(FinderError::EmptyGraph);
        }
        let index: HashMap<Id, NodeIx> = ids
            .iter()
            .enumerate()
            .map(|(k, id)| (id.clone(), NodeIx(k)))
            .collect();

        let mut positions = Vec::with_capacity(ids.len());
        for id in &ids {
            let p = graph
                .position(id)
                .ok_or_else(|| FinderError::UnknownNode { node: show(id) })?;
            if !(p.x.is_finite() && p.y.is_finite()) {
                return Err(FinderError::NonFiniteCoordinate { node: show(id) });
            }
            positions.push(p);
        }

        let mut neighbors: Vec<Vec<NodeIx>> = Vec::with_capacity(ids.len());
        for id in &ids {
            let links = graph.links(id);
            if links.is_empty() {
                return Err(FinderError::IsolatedNode { node: show(id) });
            }
            let mut out = Vec::with_capacity(links.len());
            for link in links {
                let other = link.other(id);
                if other == id {
                    return Err(FinderError::SelfLoop { node: show(id) });
                }
                let &to = index
                    .get(other)
                    .ok_or_else(|| FinderError::UnknownNode { node: show(other) })?;
                out.push(to);
            }
            neighbors.push(out);
        }

        let rot = RotationSystem::build(&positions, &neighbors);
        if let Some((from, to)) = rot.find_asymmetric() {
            return Err(FinderError::AsymmetricLink {
                from: show(&ids[from.0]),
                to: show(&ids[to.0]),
            });
        }
        tracing::debug!(
            nodes = rot.len(),
            directed_edges = rot.directed_edge_count(),
            "rotation system built"
        );

        let mut finder = Self {
            cfg,
            ids,
            index,
            nodes: LinearScan::new(positions),
            rot,
            boundary: None,
        };
        if cfg.build_external_polygon {
            finder.boundary = Some(finder.build_boundary()?);
        }
        Ok(finder)
    }

    fn build_boundary(&self) -> Result<BoundaryPolygon, FinderError> {
        let start = rightmost(self.nodes.points()).ok_or(FinderError::EmptyGraph)?;
        let b = BoundaryPolygon::build(self.nodes.points(), &self.rot, start)
            .map_err(|e| self.walk_error(e))?;
        tracing::debug!(
            rightmost = ?self.ids[start.0],
            len = b.len(),
            "boundary polygon built"
        );
        Ok(b)
    }

    fn walk_error(&self, e: WalkError) -> FinderError {
        match e {
            WalkError::Isolated { node } => FinderError::IsolatedNode {
                node: show(&self.ids[node.0]),
            },
            WalkError::MissingReverse { from, to } => FinderError::AsymmetricLink {
                from: show(&self.ids[from.0]),
                to: show(&self.ids[to.0]),
            },
            WalkError::Diverged { start, steps } => FinderError::FaceWalkDiverged {
                start: show(&self.ids[start.0]),
                steps,
            },
        }
    }

    /// Closest segment of the embedding to `position`.
    ///
    /// Inside the boundary (or with the boundary disabled) the candidates are
    /// the edges of the face around the nearest node in the direction of
    /// `position`; outside, a window of boundary edges around the nearest
    /// boundary node. Ties keep the first candidate.
    pub fn find_link(&self, position: Vector2<f64>) -> Result<LinkMatch<Id>, FinderError> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(FinderError::NonFinitePosition);
        }
        let (mode, segments) = match &self.boundary {
            Some(b) if !b.contains(position.x, position.y) => {
                let k = b.nearest(position).ok_or(FinderError::NonFinitePosition)?;
                (
                    QueryMode::External,
                    b.segments_around(k, self.cfg.external_steps()),
                )
            }
            _ => {
                let node = self.find_nearest_point(position)?;
                let angle = direction_angle(self.position(node), position);
                let polygon = self.get_polygon(node, angle)?;
                (QueryMode::Internal, self.polygon_to_segments(&polygon))
            }
        };
        tracing::trace!(?mode, segments = segments.len(), "find_link");

        let mut best: Option<(Segment, Vector2<f64>, f64)> = None;
        for s in segments {
            let p = nearest_point_on_segment(self.position(s.a), self.position(s.b), position);
            let d = distance_sq(position, p);
            if best.map_or(true, |(_, _, bd)| d < bd) {
                best = Some((s, p, d));
            }
        }
        let (s, nearest_point, squared_distance) = best.ok_or(FinderError::EmptyGraph)?;
        Ok(LinkMatch {
            node_a: self.ids[s.a.0].clone(),
            node_b: self.ids[s.b.0].clone(),
            nearest_point,
            squared_distance,
            mode,
        })
    }

    /// Node closest to `position` over the whole graph (first enumerated wins ties).
    pub fn find_nearest_point(&self, position: Vector2<f64>) -> Result<NodeIx, FinderError> {
        if !(position.x.is_finite() && position.y.is_finite()) {
            return Err(FinderError::NonFinitePosition);
        }
        self.nodes
            .nearest(position)
            .map(|(k, _)| NodeIx(k))
            .ok_or(FinderError::NonFinitePosition)
    }

    /// Even-odd test against the outer boundary; always false when it was not built.
    pub fn is_inside_graph(&self, x: f64, y: f64) -> bool {
        self.boundary.as_ref().is_some_and(|b| b.contains(x, y))
    }

    /// Nodes bounding the face that the ray from `start` at `start_angle`
    /// (radians, any range) points into. The last element is `start`.
    pub fn get_polygon(&self, start: NodeIx, start_angle: f64) -> Result<Vec<NodeIx>, FinderError> {
        if start.0 >= self.node_count() {
            return Err(FinderError::NodeOutOfRange {
                index: start.0,
                len: self.node_count(),
            });
        }
        trace_face(&self.rot, start, start_angle).map_err(|e| self.walk_error(e))
    }

    /// Consecutive pairs plus the closing pair `last → first`.
    pub fn polygon_to_segments(&self, polygon: &[NodeIx]) -> Vec<Segment> {
        let n = polygon.len();
        (0..n)
            .map(|i| Segment {
                a: polygon[i],
                b: polygon[(i + 1) % n],
            })
            .collect()
    }

    #[inline]
    pub fn cfg(&self) -> FinderCfg {
        self.cfg
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.ids.len()
    }

    /// Id of node `n`.
    ///
    /// # Panics
    /// If `n` is not below [`Finder::node_count`].
    #[inline]
    pub fn node_id(&self, n: NodeIx) -> &Id {
        &self.ids[n.0]
    }

    #[inline]
    pub fn index_of(&self, id: &Id) -> Option<NodeIx> {
        self.index.get(id).copied()
    }

    /// Coordinates of node `n`.
    ///
    /// # Panics
    /// If `n` is not below [`Finder::node_count`].
    #[inline]
    pub fn position(&self, n: NodeIx) -> Vector2<f64> {
        self.nodes.points()[n.0]
    }

    /// Rotation list of `n`, one entry per incident link.
    ///
    /// # Panics
    /// If `n` is not below [`Finder::node_count`].
    #[inline]
    pub fn links_by_angle(&self, n: NodeIx) -> &[RotEntry] {
        self.rot.links_by_angle(n)
    }

    #[inline]
    pub fn boundary(&self) -> Option<&BoundaryPolygon> {
        self.boundary.as_ref()
    }
}
