//! Finder tests: a hand-checked 10-node route network plus property tests on
//! random grid graphs.

use super::*;
use crate::graph::rand::{draw_grid_graph, GridCfg, ReplayToken};
use crate::graph::{AdjacencyGraph, Link, PlanarGraph};
use crate::FinderError;
use nalgebra::{vector, Vector2};
use proptest::prelude::*;
use std::f64::consts::TAU;

const FIXTURE_NODES: [(&str, f64, f64); 10] = [
    ("0", 160.0, 112.0),
    ("1", 312.0, 59.0),
    ("2", 466.0, 113.0),
    ("3", 598.0, 194.0),
    ("4", 521.0, 290.0),
    ("5", 406.0, 293.0),
    ("6", 201.0, 289.0),
    ("7", 370.0, 136.0),
    ("8", 337.0, 230.0),
    ("9", 248.0, 158.0),
];

const FIXTURE_LINKS: [(&str, &str); 15] = [
    ("0", "1"),
    ("1", "2"),
    ("2", "3"),
    ("3", "5"),
    ("5", "4"),
    ("5", "2"),
    ("5", "6"),
    ("6", "0"),
    ("7", "9"),
    ("8", "7"),
    ("8", "9"),
    ("9", "6"),
    ("7", "2"),
    ("8", "2"),
    ("8", "6"),
];

fn fixture() -> AdjacencyGraph<&'static str> {
    let mut g = AdjacencyGraph::new();
    for (id, x, y) in FIXTURE_NODES {
        g.add_node(id, vector![x, y]);
    }
    for (a, b) in FIXTURE_LINKS {
        g.add_link(a, b).unwrap();
    }
    g
}

fn fixture_finder(cfg: FinderCfg) -> Finder<&'static str> {
    Finder::new(&fixture(), cfg).unwrap()
}

fn fixed2(p: Vector2<f64>) -> (String, String) {
    (format!("{:.2}", p.x), format!("{:.2}", p.y))
}

fn ids<Id: Clone + Eq + std::hash::Hash + std::fmt::Debug>(
    f: &Finder<Id>,
    poly: &[NodeIx],
) -> Vec<Id> {
    poly.iter().map(|&n| f.node_id(n).clone()).collect()
}

#[test]
fn boundary_is_the_outer_face() {
    let f = fixture_finder(FinderCfg::default());
    let b = f.boundary().expect("boundary enabled by default");
    assert_eq!(
        ids(&f, b.nodes()),
        vec!["5", "4", "5", "6", "0", "1", "2", "3"]
    );
}

#[test]
fn containment_of_reference_points() {
    let f = fixture_finder(FinderCfg::default());
    for (x, y, inside) in [
        (492.0, 325.0, false),
        (543.0, 204.0, true),
        (269.0, 220.0, true),
        (330.0, 170.0, true),
        (563.0, 288.0, false),
    ] {
        assert_eq!(f.is_inside_graph(x, y), inside, "({x}, {y})");
    }
}

#[test]
fn nearest_node_of_outside_point() {
    let f = fixture_finder(FinderCfg::default());
    let n = f.find_nearest_point(vector![492.0, 325.0]).unwrap();
    assert_eq!(*f.node_id(n), "4");
}

#[test]
fn inside_query_uses_the_enclosing_face() {
    let f = fixture_finder(FinderCfg::default());
    let m = f.find_link(vector![543.0, 204.0]).unwrap();
    assert_eq!((m.node_a, m.node_b), ("5", "3"));
    assert_eq!(fixed2(m.nearest_point), ("550.48".into(), "218.50".into()));
    assert_eq!(m.mode, QueryMode::Internal);

    let m = f.find_link(vector![269.0, 220.0]).unwrap();
    assert_eq!((m.node_a, m.node_b), ("8", "9"));
    assert_eq!(fixed2(m.nearest_point), ("291.01".into(), "192.79".into()));

    let m = f.find_link(vector![330.0, 170.0]).unwrap();
    assert_eq!((m.node_a, m.node_b), ("7", "9"));
    assert_eq!(fixed2(m.nearest_point), ("325.32".into(), "144.06".into()));
}

#[test]
fn outside_query_scans_boundary_window() {
    let f = fixture_finder(FinderCfg::default());
    let m = f.find_link(vector![492.0, 325.0]).unwrap();
    assert_eq!((m.node_a, m.node_b), ("4", "5"));
    assert_eq!(fixed2(m.nearest_point), ("491.11".into(), "290.78".into()));
    assert_eq!(m.mode, QueryMode::External);
}

#[test]
fn outside_query_clamps_to_endpoint() {
    let f = fixture_finder(FinderCfg::default());
    let m = f.find_link(vector![563.0, 288.0]).unwrap();
    assert_eq!((m.node_a, m.node_b), ("4", "5"));
    let four = f.position(f.index_of(&"4").unwrap());
    assert_eq!(m.nearest_point, four);
    assert_eq!(m.squared_distance, 1768.0);
}

#[test]
fn boundary_window_ties_keep_forward_segment() {
    let cfg = FinderCfg {
        max_external_points: 2,
        ..FinderCfg::default()
    };
    let f = fixture_finder(cfg);
    // Both sampled segments end at node 3, which is the closest point.
    let m = f.find_link(vector![700.0, 100.0]).unwrap();
    assert_eq!((m.node_a, m.node_b), ("3", "5"));
    assert_eq!(m.nearest_point, vector![598.0, 194.0]);
    assert_eq!(m.squared_distance, 19240.0);
}

#[test]
fn disabled_boundary_treats_every_query_as_internal() {
    let cfg = FinderCfg {
        build_external_polygon: false,
        ..FinderCfg::default()
    };
    let f = fixture_finder(cfg);
    assert!(f.boundary().is_none());
    for (x, y) in [(492.0, 325.0), (543.0, 204.0), (269.0, 220.0)] {
        assert!(!f.is_inside_graph(x, y));
    }
    // The outer face around node 4 is walked the other way round.
    let m = f.find_link(vector![492.0, 325.0]).unwrap();
    assert_eq!((m.node_a, m.node_b), ("5", "4"));
    assert_eq!(fixed2(m.nearest_point), ("491.11".into(), "290.78".into()));
    assert_eq!(m.mode, QueryMode::Internal);
}

#[test]
fn query_on_a_node_has_zero_distance() {
    let f = fixture_finder(FinderCfg::default());
    let p = vector![337.0, 230.0];
    let n = f.find_nearest_point(p).unwrap();
    assert_eq!(*f.node_id(n), "8");
    let m = f.find_link(p).unwrap();
    assert_eq!(m.squared_distance, 0.0);
    assert_eq!(m.nearest_point, p);
}

#[test]
fn repeated_queries_are_identical() {
    let f = fixture_finder(FinderCfg::default());
    for p in [vector![543.0, 204.0], vector![492.0, 325.0], vector![10.0, -40.0]] {
        let a = f.find_link(p).unwrap();
        let b = f.find_link(p).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.squared_distance.to_bits(), b.squared_distance.to_bits());
    }
}

#[test]
fn faces_around_node_two() {
    let f = fixture_finder(FinderCfg::default());
    let two = f.index_of(&"2").unwrap();
    let poly = f.get_polygon(two, std::f64::consts::FRAC_PI_4).unwrap();
    assert_eq!(ids(&f, &poly), vec!["5", "3", "2"]);
    let segs = f.polygon_to_segments(&poly);
    assert_eq!(segs.len(), 3);
    assert_eq!(segs[2], Segment { a: two, b: poly[0] });
}

#[test]
fn polygon_to_segments_of_empty_is_empty() {
    let f = fixture_finder(FinderCfg::default());
    assert!(f.polygon_to_segments(&[]).is_empty());
}

#[test]
fn downward_direction_picks_lower_face() {
    // Square with its right side split at node 4 and a chord 3-4.
    let mut g = AdjacencyGraph::new();
    for (id, x, y) in [
        (0u8, 0.0, 0.0),
        (1, 10.0, 0.0),
        (2, 10.0, 10.0),
        (3, 0.0, 10.0),
        (4, 10.0, 8.0),
    ] {
        g.add_node(id, vector![x, y]);
    }
    for (a, b) in [(0, 1), (1, 4), (4, 2), (2, 3), (3, 0), (3, 4)] {
        g.add_link(a, b).unwrap();
    }
    let f = Finder::new(&g, FinderCfg::default()).unwrap();
    assert_eq!(ids(&f, f.boundary().unwrap().nodes()), vec![4, 2, 3, 0, 1]);
    let m = f.find_link(vector![2.0, 8.0]).unwrap();
    assert_eq!((m.node_a, m.node_b), (3, 4));
    assert_eq!(m.mode, QueryMode::Internal);
}

#[test]
fn rejects_empty_graph() {
    let g: AdjacencyGraph<u32> = AdjacencyGraph::new();
    assert_eq!(
        Finder::new(&g, FinderCfg::default()).unwrap_err(),
        FinderError::EmptyGraph
    );
}

#[test]
fn rejects_isolated_node() {
    let mut g = fixture();
    g.add_node("lonely", vector![0.0, 0.0]);
    assert_eq!(
        Finder::new(&g, FinderCfg::default()).unwrap_err(),
        FinderError::IsolatedNode {
            node: "\"lonely\"".into()
        }
    );
}

#[test]
fn rejects_self_loop() {
    let mut g = fixture();
    g.add_link("3", "3").unwrap();
    assert!(matches!(
        Finder::new(&g, FinderCfg::default()),
        Err(FinderError::SelfLoop { .. })
    ));
}

#[test]
fn rejects_non_finite_coordinates() {
    let mut g = AdjacencyGraph::new();
    g.add_node(0, vector![0.0, 0.0]);
    g.add_node(1, vector![f64::NAN, 1.0]);
    g.add_link(0, 1).unwrap();
    assert_eq!(
        Finder::new(&g, FinderCfg::default()).unwrap_err(),
        FinderError::NonFiniteCoordinate { node: "1".into() }
    );
}

#[test]
fn rejects_tiny_external_window() {
    let cfg = FinderCfg {
        max_external_points: 1,
        ..FinderCfg::default()
    };
    assert!(matches!(
        Finder::new(&fixture(), cfg),
        Err(FinderError::InvalidConfig(_))
    ));
}

#[test]
fn rejects_non_finite_query() {
    let f = fixture_finder(FinderCfg::default());
    assert_eq!(
        f.find_link(vector![f64::NAN, 1.0]).unwrap_err(),
        FinderError::NonFinitePosition
    );
    assert!(f.find_nearest_point(vector![0.0, f64::INFINITY]).is_err());
}

#[test]
fn far_finite_query_still_resolves() {
    for cfg in [
        FinderCfg::default(),
        FinderCfg {
            build_external_polygon: false,
            ..FinderCfg::default()
        },
    ] {
        let f = fixture_finder(cfg);
        let m = f.find_link(vector![1e160, 0.0]).unwrap();
        assert!(m.squared_distance.is_infinite());
        let link = (m.node_a, m.node_b);
        assert!(FIXTURE_LINKS.contains(&link) || FIXTURE_LINKS.contains(&(link.1, link.0)));
        let expected = if cfg.build_external_polygon {
            QueryMode::External
        } else {
            QueryMode::Internal
        };
        assert_eq!(m.mode, expected);
    }
}

#[test]
fn out_of_range_start_node_is_an_error() {
    let f = fixture_finder(FinderCfg::default());
    assert_eq!(
        f.get_polygon(NodeIx(99), 0.0).unwrap_err(),
        FinderError::NodeOutOfRange { index: 99, len: 10 }
    );
}

/// Graph whose links are only reported by one endpoint.
struct OneSided {
    pos: Vec<Vector2<f64>>,
    links: Vec<Vec<Link<usize>>>,
}

impl PlanarGraph for OneSided {
    type Id = usize;

    fn for_each_node<F: FnMut(&usize)>(&self, mut f: F) {
        for k in 0..self.pos.len() {
            f(&k);
        }
    }

    fn position(&self, id: &usize) -> Option<Vector2<f64>> {
        self.pos.get(*id).copied()
    }

    fn links(&self, id: &usize) -> &[Link<usize>] {
        match self.links.get(*id) {
            Some(v) => v.as_slice(),
            None => &[],
        }
    }
}

#[test]
fn rejects_one_sided_links() {
    let g = OneSided {
        pos: vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![0.0, 1.0]],
        links: vec![
            vec![Link::new(0, 1), Link::new(0, 2)],
            vec![Link::new(0, 1)],
            vec![Link::new(2, 1)],
        ],
    };
    assert_eq!(
        Finder::new(&g, FinderCfg::default()).unwrap_err(),
        FinderError::AsymmetricLink {
            from: "0".into(),
            to: "2".into()
        }
    );
}

#[test]
fn rejects_dangling_link() {
    let g = OneSided {
        pos: vec![vector![0.0, 0.0], vector![1.0, 0.0]],
        links: vec![vec![Link::new(0, 1)], vec![Link::new(1, 7)]],
    };
    assert_eq!(
        Finder::new(&g, FinderCfg::default()).unwrap_err(),
        FinderError::UnknownNode { node: "7".into() }
    );
}

fn grid(seed: u64, rows: usize, cols: usize) -> AdjacencyGraph<usize> {
    let cfg = GridCfg {
        rows,
        cols,
        ..GridCfg::default()
    };
    draw_grid_graph(cfg, ReplayToken { seed, index: 0 })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn rotation_lists_sorted_in_one_turn(seed in any::<u64>(), rows in 2usize..6, cols in 2usize..6) {
        let g = grid(seed, rows, cols);
        let f = Finder::new(&g, FinderCfg::default()).unwrap();
        for k in 0..f.node_count() {
            let n = NodeIx(k);
            let links = f.links_by_angle(n);
            prop_assert_eq!(links.len(), g.links(f.node_id(n)).len());
            for e in links {
                prop_assert!((0.0..TAU).contains(&e.angle));
            }
            for w in links.windows(2) {
                prop_assert!(w[0].angle <= w[1].angle);
            }
        }
    }

    #[test]
    fn faces_are_closed_walks(
        seed in any::<u64>(),
        rows in 2usize..6,
        cols in 2usize..6,
        angle in -TAU..TAU,
    ) {
        let g = grid(seed, rows, cols);
        let f = Finder::new(&g, FinderCfg::default()).unwrap();
        for k in 0..f.node_count() {
            let start = NodeIx(k);
            let poly = f.get_polygon(start, angle).unwrap();
            prop_assert!(!poly.is_empty());
            prop_assert_eq!(*poly.last().unwrap(), start);
            let segs = f.polygon_to_segments(&poly);
            prop_assert_eq!(segs.len(), poly.len());
            prop_assert_eq!(segs.last().unwrap().b, poly[0]);
            for s in &segs {
                let adjacent = f.links_by_angle(s.a).iter().any(|e| e.to == s.b);
                prop_assert!(adjacent, "{:?} -> {:?} is not an edge", s.a, s.b);
            }
        }
    }

    #[test]
    fn queries_are_stable_and_no_worse_than_nearest_node(
        seed in any::<u64>(),
        x in -80.0f64..480.0,
        y in -80.0f64..480.0,
    ) {
        let g = grid(seed, 4, 4);
        let f = Finder::new(&g, FinderCfg::default()).unwrap();
        let p = vector![x, y];
        let a = f.find_link(p).unwrap();
        let b = f.find_link(p).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.mode == QueryMode::Internal, f.is_inside_graph(x, y));
        if a.mode == QueryMode::Internal {
            let n = f.find_nearest_point(p).unwrap();
            let d_node = (f.position(n) - p).norm_squared();
            prop_assert!(a.squared_distance <= d_node + 1e-9);
        }
    }

    #[test]
    fn disabled_boundary_is_never_inside(seed in any::<u64>(), x in -80.0f64..480.0, y in -80.0f64..480.0) {
        let g = grid(seed, 3, 3);
        let cfg = FinderCfg { build_external_polygon: false, ..FinderCfg::default() };
        let f = Finder::new(&g, cfg).unwrap();
        prop_assert!(!f.is_inside_graph(x, y));
        prop_assert_eq!(f.find_link(vector![x, y]).unwrap().mode, QueryMode::Internal);
    }

    #[test]
    fn node_coordinates_snap_to_themselves(seed in any::<u64>()) {
        let g = grid(seed, 3, 4);
        let f = Finder::new(&g, FinderCfg::default()).unwrap();
        for (id, xy) in g.nodes() {
            let n = f.find_nearest_point(xy).unwrap();
            prop_assert_eq!(f.node_id(n), id);
        }
    }
}
