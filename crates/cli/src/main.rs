mod graph_json;
mod provenance;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use linkfinder::graph::rand::{draw_grid_graph, GridCfg, ReplayToken};
use linkfinder::{Finder, FinderCfg, LinkMatch, QueryMode, Vec2};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::graph_json::{load_graph, GraphDoc};
use crate::provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "linkfinder")]
#[command(about = "Snap points to the nearest edge of a planar graph")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Find the nearest link to a single point and print it as JSON
    Locate {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        #[command(flatten)]
        cfg: CfgArgs,
    },
    /// Resolve a JSON array of [x, y] points and write the matches to a file
    Batch {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        queries: PathBuf,
        #[arg(long)]
        out: PathBuf,
        #[command(flatten)]
        cfg: CfgArgs,
    },
    /// Print the outer boundary polygon as a JSON array of node ids
    Boundary {
        #[arg(long)]
        graph: PathBuf,
    },
    /// Write a random planar grid graph in the node/link format
    Generate {
        #[arg(long, default_value_t = 6)]
        rows: usize,
        #[arg(long, default_value_t = 6)]
        cols: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 0)]
        index: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

#[derive(Args, Clone, Copy, Debug)]
struct CfgArgs {
    /// Boundary segments sampled around the nearest boundary node for outside points
    #[arg(long, default_value_t = 10)]
    max_external_points: usize,
    /// Skip the outer boundary; every query searches the face around its nearest node
    #[arg(long)]
    no_external_polygon: bool,
}

impl From<CfgArgs> for FinderCfg {
    fn from(a: CfgArgs) -> Self {
        FinderCfg {
            max_external_points: a.max_external_points,
            build_external_polygon: !a.no_external_polygon,
        }
    }
}

/// JSON shape of a query result.
#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct MatchOut {
    query: [f64; 2],
    node_a: String,
    node_b: String,
    nearest_point: [f64; 2],
    squared_distance: f64,
    inside: bool,
}

impl MatchOut {
    fn new(query: Vec2<f64>, m: LinkMatch<String>) -> Self {
        Self {
            query: [query.x, query.y],
            node_a: m.node_a,
            node_b: m.node_b,
            nearest_point: [m.nearest_point.x, m.nearest_point.y],
            squared_distance: m.squared_distance,
            inside: m.mode == QueryMode::Internal,
        }
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Locate { graph, x, y, cfg } => {
            let m = locate(&graph, Vec2::new(x, y), cfg.into())?;
            println!("{}", serde_json::to_string_pretty(&m)?);
            Ok(())
        }
        Action::Batch {
            graph,
            queries,
            out,
            cfg,
        } => batch(&graph, &queries, &out, cfg.into()).map(|_| ()),
        Action::Boundary { graph } => boundary(&graph),
        Action::Generate {
            rows,
            cols,
            seed,
            index,
            out,
        } => generate(rows, cols, ReplayToken { seed, index }, &out),
        Action::Report => report(),
    }
}

fn build_finder(graph: &Path, cfg: FinderCfg) -> Result<Finder<String>> {
    let g = load_graph(graph)?;
    let finder = Finder::new(&g, cfg).with_context(|| format!("indexing {}", graph.display()))?;
    tracing::info!(
        graph = %graph.display(),
        nodes = finder.node_count(),
        boundary = ?finder.boundary().map(|b| b.len()),
        "index built"
    );
    Ok(finder)
}

fn locate(graph: &Path, p: Vec2<f64>, cfg: FinderCfg) -> Result<MatchOut> {
    let finder = build_finder(graph, cfg)?;
    let m = finder.find_link(p)?;
    tracing::info!(x = p.x, y = p.y, a = %m.node_a, b = %m.node_b, "locate");
    Ok(MatchOut::new(p, m))
}

fn batch(graph: &Path, queries: &Path, out: &Path, cfg: FinderCfg) -> Result<Vec<MatchOut>> {
    let finder = build_finder(graph, cfg)?;
    let bytes =
        std::fs::read(queries).with_context(|| format!("reading {}", queries.display()))?;
    let points: Vec<[f64; 2]> = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing queries {}", queries.display()))?;
    let mut matches = Vec::with_capacity(points.len());
    for [x, y] in points {
        let p = Vec2::new(x, y);
        let m = finder
            .find_link(p)
            .with_context(|| format!("query ({x}, {y})"))?;
        matches.push(MatchOut::new(p, m));
    }
    tracing::info!(queries = matches.len(), out = %out.display(), "batch");

    write_json(out, &matches)?;
    let params = serde_json::json!({
        "graph": graph.to_string_lossy(),
        "queries": queries.to_string_lossy(),
        "max_external_points": cfg.max_external_points,
        "build_external_polygon": cfg.build_external_polygon,
    });
    write_sidecar(out, Payload::new("batch", params))?;
    Ok(matches)
}

fn boundary(graph: &Path) -> Result<()> {
    let finder = build_finder(graph, FinderCfg::default())?;
    let ids: Vec<&String> = finder
        .boundary()
        .map(|b| b.nodes().iter().map(|&n| finder.node_id(n)).collect())
        .unwrap_or_default();
    println!("{}", serde_json::to_string(&ids)?);
    Ok(())
}

fn generate(rows: usize, cols: usize, tok: ReplayToken, out: &Path) -> Result<()> {
    let cfg = GridCfg {
        rows,
        cols,
        ..GridCfg::default()
    };
    let g = draw_grid_graph(cfg, tok);
    tracing::info!(rows, cols, seed = tok.seed, index = tok.index, nodes = g.len(), "generate");
    write_json(out, &GraphDoc::from_graph(&g))?;
    let params = serde_json::json!({
        "rows": rows,
        "cols": cols,
        "seed": tok.seed,
        "index": tok.index,
    });
    write_sidecar(out, Payload::new("generate", params))?;
    Ok(())
}

fn write_json<T: Serialize>(out: &Path, value: &T) -> Result<()> {
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", out.display()))
}

fn report() -> Result<()> {
    let obj = serde_json::json!({
        "code_rev": provenance::current_git_rev(),
        "version": linkfinder::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
