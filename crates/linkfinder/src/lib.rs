//! Snap a query point to the nearest edge of a planar embedded graph.
//!
//! The index is built once from a read-only graph and then answers queries
//! through `&self`:
//! - `Finder::find_link`: closest segment, its endpoints and the nearest point.
//! - `Finder::is_inside_graph`: even-odd test against the outer boundary.
//! - `Finder::get_polygon` / `Finder::polygon_to_segments`: face tracing.
//!
//! Inputs are assumed to be a connected planar embedding with finite
//! coordinates; see `FinderError` for what is checked.

pub mod error;
pub mod finder;
pub mod geom;
pub mod graph;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::FinderError;
pub use finder::{Finder, FinderCfg, LinkMatch, NodeIx, QueryMode, Segment};
pub use graph::{AdjacencyGraph, Link, PlanarGraph};
pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::finder::{
        BoundaryPolygon, Finder, FinderCfg, LinearScan, LinkMatch, NodeIx, NodeLocator, QueryMode,
        RotEntry, Segment,
    };
    pub use crate::graph::rand::{draw_grid_graph, GridCfg, ReplayToken};
    pub use crate::graph::{AdjacencyGraph, Link, PlanarGraph};
    pub use crate::FinderError;
    pub use nalgebra::Vector2 as Vec2;
}
