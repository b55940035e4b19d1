//! Graph collaborator: the read-only view the finder consumes, plus a small
//! insertion-ordered store implementing it.
//!
//! Purpose
//! - Keep the finder independent of any particular graph library. Anything that
//!   can enumerate its nodes, report a node position, and list a node's
//!   incident links can be indexed.
//! - `AdjacencyGraph` is the store used by the CLI, tests and benchmarks.
//!
//! Conventions
//! - Links are undirected: a link `from → to` is reported by both endpoints and
//!   traversed from either side.
//! - Node iteration order is significant: ties in nearest/rightmost lookups
//!   resolve to the node enumerated first.

pub mod rand;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use nalgebra::Vector2;

use crate::error::{show, FinderError};

/// Undirected edge reference by endpoint ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Link<Id> {
    pub from: Id,
    pub to: Id,
}

impl<Id: PartialEq> Link<Id> {
    #[inline]
    pub fn new(from: Id, to: Id) -> Self {
        Self { from, to }
    }

    /// Endpoint opposite to `id` (the `to` end when `id` is neither endpoint).
    #[inline]
    pub fn other(&self, id: &Id) -> &Id {
        if self.to == *id {
            &self.from
        } else {
            &self.to
        }
    }
}

/// Read-only planar embedding consumed by [`crate::Finder`].
pub trait PlanarGraph {
    type Id: Clone + Eq + Hash + Debug;

    /// Visit every node id once, in a stable order.
    fn for_each_node<F: FnMut(&Self::Id)>(&self, f: F);

    /// Coordinates of node `id`, `None` if unknown.
    fn position(&self, id: &Self::Id) -> Option<Vector2<f64>>;

    /// Links incident to `id` (empty if unknown).
    fn links(&self, id: &Self::Id) -> &[Link<Self::Id>];
}

#[derive(Clone, Debug)]
struct NodeRec<Id> {
    id: Id,
    xy: Vector2<f64>,
    links: Vec<Link<Id>>,
}

/// Insertion-ordered adjacency store.
#[derive(Clone, Debug)]
pub struct AdjacencyGraph<Id> {
    nodes: Vec<NodeRec<Id>>,
    index: HashMap<Id, usize>,
}

impl<Id: Clone + Eq + Hash + Debug> Default for AdjacencyGraph<Id> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<Id: Clone + Eq + Hash + Debug> AdjacencyGraph<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node. Returns `false` (and leaves the graph unchanged) if `id` exists.
    pub fn add_node(&mut self, id: Id, xy: Vector2<f64>) -> bool {
        if self.index.contains_key(&id) {
            return false;
        }
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(NodeRec {
            id,
            xy,
            links: Vec::new(),
        });
        true
    }

    /// Record an undirected link on both endpoints.
    pub fn add_link(&mut self, from: Id, to: Id) -> Result<(), FinderError> {
        let &a = self
            .index
            .get(&from)
            .ok_or_else(|| FinderError::UnknownNode { node: show(&from) })?;
        let &b = self
            .index
            .get(&to)
            .ok_or_else(|| FinderError::UnknownNode { node: show(&to) })?;
        let link = Link::new(from, to);
        self.nodes[a].links.push(link.clone());
        if a != b {
            self.nodes[b].links.push(link);
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total number of links (each undirected link counted once).
    pub fn link_count(&self) -> usize {
        let ends: usize = self.nodes.iter().map(|n| n.links.len()).sum();
        let loops = self
            .nodes
            .iter()
            .flat_map(|n| n.links.iter())
            .filter(|l| l.from == l.to)
            .count();
        (ends + loops) / 2
    }

    /// Nodes with their positions, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = (&Id, Vector2<f64>)> + '_ {
        self.nodes.iter().map(|n| (&n.id, n.xy))
    }

    /// Every link once, in the order it was added from its `from` side.
    pub fn unique_links(&self) -> impl Iterator<Item = &Link<Id>> + '_ {
        self.nodes
            .iter()
            .flat_map(|n| n.links.iter().filter(move |l| l.from == n.id))
    }
}

impl<Id: Clone + Eq + Hash + Debug> PlanarGraph for AdjacencyGraph<Id> {
    type Id = Id;

    fn for_each_node<F: FnMut(&Id)>(&self, mut f: F) {
        for n in &self.nodes {
            f(&n.id);
        }
    }

    fn position(&self, id: &Id) -> Option<Vector2<f64>> {
        self.index.get(id).map(|&k| self.nodes[k].xy)
    }

    fn links(&self, id: &Id) -> &[Link<Id>] {
        match self.index.get(id) {
            Some(&k) => self.nodes[k].links.as_slice(),
            None => &[],
        }
    }
}
