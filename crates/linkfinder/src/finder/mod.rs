//! Nearest-link point location on a planar embedding.
//!
//! Purpose
//! - Answer "which edge is closest to this point?" without materializing a
//!   planar subdivision. Faces are traced on demand from the rotation system
//!   (neighbors sorted by angle around each node).
//!
//! Pipeline
//! - Construction: rotation system (`rotation`) → outer boundary from the
//!   rightmost node (`boundary`, optional).
//! - Query: containment test → either the face around the nearest node
//!   (`face`) or a window of boundary edges → clamped segment distances.
//!
//! Layout
//! - `types.rs` (data types), `rotation.rs`, `face.rs`, `boundary.rs`,
//!   `nearest.rs` (node lookup trait), `locate.rs` (`Finder`).

mod boundary;
mod face;
mod locate;
mod nearest;
mod rotation;
mod types;

pub use boundary::BoundaryPolygon;
pub use locate::Finder;
pub use nearest::{LinearScan, NodeLocator};
pub use types::{FinderCfg, LinkMatch, NodeIx, QueryMode, RotEntry, Segment};

#[cfg(test)]
mod tests;
