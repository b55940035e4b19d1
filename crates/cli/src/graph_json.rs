//! Node/link JSON documents: `{"nodes":[{"id","data":{"xy":[x,y]}}],"links":[{"fromId","toId"}]}`.
//!
//! Ids may be JSON strings or integers; both are normalized to strings. Extra
//! fields (e.g. per-link `data`) are ignored.

use anyhow::{bail, Context, Result};
use linkfinder::{AdjacencyGraph, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum NodeKey {
    Str(String),
    Int(i64),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Str(s) => f.write_str(s),
            NodeKey::Int(k) => write!(f, "{k}"),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NodeData {
    pub xy: [f64; 2],
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NodeDoc {
    pub id: NodeKey,
    pub data: NodeData,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDoc {
    pub from_id: NodeKey,
    pub to_id: NodeKey,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GraphDoc {
    pub nodes: Vec<NodeDoc>,
    #[serde(default)]
    pub links: Vec<LinkDoc>,
}

impl GraphDoc {
    pub fn into_graph(self) -> Result<AdjacencyGraph<String>> {
        let mut g = AdjacencyGraph::new();
        for n in self.nodes {
            let id = n.id.to_string();
            if !g.add_node(id.clone(), Vec2::new(n.data.xy[0], n.data.xy[1])) {
                bail!("duplicate node id {id}");
            }
        }
        for l in self.links {
            g.add_link(l.from_id.to_string(), l.to_id.to_string())?;
        }
        Ok(g)
    }

    pub fn from_graph(g: &AdjacencyGraph<usize>) -> Self {
        let nodes = g
            .nodes()
            .map(|(id, xy)| NodeDoc {
                id: NodeKey::Str(id.to_string()),
                data: NodeData { xy: [xy.x, xy.y] },
            })
            .collect();
        let links = g
            .unique_links()
            .map(|l| LinkDoc {
                from_id: NodeKey::Str(l.from.to_string()),
                to_id: NodeKey::Str(l.to.to_string()),
            })
            .collect();
        Self { nodes, links }
    }
}

pub fn load_graph(path: &Path) -> Result<AdjacencyGraph<String>> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let doc: GraphDoc = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing graph {}", path.display()))?;
    doc.into_graph()
        .with_context(|| format!("building graph {}", path.display()))
}
