use thiserror::Error;

/// Errors raised while building a [`crate::Finder`] or answering a query.
///
/// Node ids are rendered with their `Debug` form so the error type stays
/// independent of the graph's id type.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum FinderError {
    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("node {node} has no links")]
    IsolatedNode { node: String },

    #[error("unknown node {node}")]
    UnknownNode { node: String },

    #[error("node {node} links to itself")]
    SelfLoop { node: String },

    #[error("node {node} has a non-finite coordinate")]
    NonFiniteCoordinate { node: String },

    #[error("link {from} -> {to} has no reverse entry")]
    AsymmetricLink { from: String, to: String },

    #[error("face walk from {start} did not close after {steps} steps")]
    FaceWalkDiverged { start: String, steps: usize },

    #[error("node index {index} out of range for {len} nodes")]
    NodeOutOfRange { index: usize, len: usize },

    #[error("query position is not finite")]
    NonFinitePosition,

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub(crate) fn show<T: std::fmt::Debug>(id: &T) -> String {
    format!("{id:?}")
}
