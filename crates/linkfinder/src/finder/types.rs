//! Data types shared by the finder submodules.
//!
//! Kept small and explicit so `rotation`, `face`, `boundary` and `locate`
//! stay easy to read.

use nalgebra::Vector2;

use crate::error::FinderError;

/// Dense node index assigned at construction, in graph iteration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIx(pub usize);

/// One rotation-system entry: neighbor and normalized angle in [0, 2π).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotEntry {
    pub to: NodeIx,
    pub angle: f64,
}

/// Directed pair of consecutive polygon nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment {
    pub a: NodeIx,
    pub b: NodeIx,
}

/// Which search produced a [`LinkMatch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryMode {
    /// Query inside the boundary (or boundary disabled): face around the nearest node.
    Internal,
    /// Query outside the boundary: local window of boundary segments.
    External,
}

/// Winning segment of a `find_link` query.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkMatch<Id> {
    pub node_a: Id,
    pub node_b: Id,
    pub nearest_point: Vector2<f64>,
    pub squared_distance: f64,
    pub mode: QueryMode,
}

/// Finder options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinderCfg {
    /// Boundary segments sampled around the nearest boundary node for outside
    /// queries: `max_external_points / 2` forward and as many backward.
    pub max_external_points: usize,
    /// Trace the outer boundary at construction. Without it every query is internal.
    pub build_external_polygon: bool,
}

impl Default for FinderCfg {
    fn default() -> Self {
        Self {
            max_external_points: 10,
            build_external_polygon: true,
        }
    }
}

impl FinderCfg {
    pub fn validate(&self) -> Result<(), FinderError> {
        if self.max_external_points < 2 {
            return Err(FinderError::InvalidConfig(format!(
                "max_external_points must be >= 2, got {}",
                self.max_external_points
            )));
        }
        Ok(())
    }

    /// Forward/backward steps taken around the nearest boundary node.
    #[inline]
    pub fn external_steps(&self) -> usize {
        self.max_external_points / 2
    }
}
