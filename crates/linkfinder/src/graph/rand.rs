//! Random planar graphs (jittered grid + diagonals + leaves, replay tokens).
//!
//! Model
//! - Lay out `rows × cols` nodes on a square grid, jitter each coordinate by a
//!   bounded fraction of the spacing, and link horizontal/vertical neighbors.
//! - Each cell gets at most one diagonal, so no two edges cross.
//! - Nodes on the last column may grow a dangling leaf to the right, which
//!   exercises the bounce rule of the face walk.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::AdjacencyGraph;

/// Grid sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct GridCfg {
    /// Clamped to at least 2.
    pub rows: usize,
    /// Clamped to at least 2.
    pub cols: usize,
    pub spacing: f64,
    /// Per-axis jitter as a fraction of `spacing`. Clamped to [0, 0.15] so cells stay convex.
    pub jitter_frac: f64,
    /// Probability that a cell gets a diagonal.
    pub diagonal_prob: f64,
    /// Probability that a last-column node gets a dangling leaf.
    pub leaf_prob: f64,
}

impl Default for GridCfg {
    fn default() -> Self {
        Self {
            rows: 6,
            cols: 6,
            spacing: 100.0,
            jitter_frac: 0.1,
            diagonal_prob: 0.5,
            leaf_prob: 0.25,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        // SplitMix64-style mixing.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw a connected planar graph. Node ids are `row * cols + col`; leaves follow.
pub fn draw_grid_graph(cfg: GridCfg, tok: ReplayToken) -> AdjacencyGraph<usize> {
    let mut rng = tok.to_std_rng();
    let rows = cfg.rows.max(2);
    let cols = cfg.cols.max(2);
    let s = if cfg.spacing.is_finite() && cfg.spacing > 0.0 {
        cfg.spacing
    } else {
        1.0
    };
    let j = cfg.jitter_frac.clamp(0.0, 0.15) * s;
    let p_diag = cfg.diagonal_prob.clamp(0.0, 1.0);
    let p_leaf = cfg.leaf_prob.clamp(0.0, 1.0);
    let id = |r: usize, c: usize| r * cols + c;

    let mut g = AdjacencyGraph::new();
    let mut pos = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        for c in 0..cols {
            let jx = (rng.gen::<f64>() * 2.0 - 1.0) * j;
            let jy = (rng.gen::<f64>() * 2.0 - 1.0) * j;
            let xy = Vector2::new(c as f64 * s + jx, r as f64 * s + jy);
            pos.push(xy);
            g.add_node(id(r, c), xy);
        }
    }
    // Ids come from the loop above, so links never miss an endpoint.
    let link = |g: &mut AdjacencyGraph<usize>, a: usize, b: usize| {
        let _ = g.add_link(a, b);
    };
    for r in 0..rows {
        for c in 0..cols {
            if c + 1 < cols {
                link(&mut g, id(r, c), id(r, c + 1));
            }
            if r + 1 < rows {
                link(&mut g, id(r, c), id(r + 1, c));
            }
            if r + 1 < rows && c + 1 < cols && rng.gen_bool(p_diag) {
                if rng.gen_bool(0.5) {
                    link(&mut g, id(r, c), id(r + 1, c + 1));
                } else {
                    link(&mut g, id(r, c + 1), id(r + 1, c));
                }
            }
        }
    }
    let mut next_id = rows * cols;
    for r in 0..rows {
        let parent = id(r, cols - 1);
        if rng.gen_bool(p_leaf) {
            let xy = pos[parent] + Vector2::new(0.5 * s, 0.0);
            g.add_node(next_id, xy);
            link(&mut g, parent, next_id);
            next_id += 1;
        }
    }
    g
}
