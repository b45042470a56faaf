//! Cross-module integration tests for the §8-style properties this crate's
//! unit tests don't already exercise end-to-end: tour-basis feasibility
//! with chords present, pivot-back idempotence, pivot monotonicity, and
//! row/column-indexing consistency between `HyperGraph` and `ExternalCuts`.

use tsp_core::instance::distance::Distance;
use tsp_core::instance::node::Node;
use tsp_engine::config::EngineConfig;
use tsp_engine::graph::{CoreGraph, GraphEdge};
use tsp_engine::hypergraph::{CutSense, HyperGraph};
use tsp_engine::lp::core_lp::CoreLP;
use tsp_engine::lp::reference::DenseLp;
use tsp_engine::lp::{LpOracle, PivType, EPSILON};
use tsp_engine::sep::default_pipeline;
use tsp_engine::solver::cutting_loop;
use tsp_engine::tour::TourBank;

/// A complete graph on `n` nodes with the identity order as the starting
/// tour, every chord also present as an LP column.
fn complete_graph_with_tour(n: usize, edge_len: impl Fn(usize, usize) -> i32) -> CoreLP<DenseLp> {
    let mut g = CoreGraph::new(n);
    for u in 0..n {
        for v in (u + 1)..n {
            g.add_edge(GraphEdge::new(Node(u), Node(v), Distance(edge_len(u, v))));
        }
    }
    let tour_nodes: Vec<Node> = (0..n).map(Node).collect();
    let tour = TourBank::from_node_order(&g, tour_nodes).unwrap();
    CoreLP::new(DenseLp::new(), g, tour).unwrap()
}

#[test]
fn tour_basis_feasible_with_chords_present() {
    // A pentagon with every chord also an LP column (spec §4.1's invariant
    // must hold before any pivot happens, regardless of how many
    // non-tour columns exist).
    let core_lp = complete_graph_with_tour(5, |u, v| 10 + ((u * 7 + v * 3) % 5) as i32);

    assert_eq!(core_lp.num_rows(), 5);
    assert!(
        (core_lp.oracle().get_objval() - core_lp.tour().min_tour_value().0 as f64).abs() < EPSILON
    );
    let lp_edges = core_lp.oracle().lp_vec();
    for (i, &on) in core_lp.tour().tour_edges().iter().enumerate() {
        let expected = if on { 1.0 } else { 0.0 };
        assert!((lp_edges[i] - expected).abs() < EPSILON);
    }
}

#[test]
fn pivot_back_restores_the_tour_basis() {
    let mut core_lp = complete_graph_with_tour(6, |u, v| 10 + ((u + v) % 4) as i32);
    let tour_edges = core_lp.tour().tour_edges().to_vec();
    let objval_before = core_lp.oracle().get_objval();

    let _ = core_lp.primal_pivot().unwrap();
    core_lp.pivot_back().unwrap();

    assert!((core_lp.oracle().get_objval() - objval_before).abs() < 1e-6);
    let lp_edges = core_lp.oracle().lp_vec();
    for (i, &on) in tour_edges.iter().enumerate() {
        let expected = if on { 1.0 } else { 0.0 };
        assert!((lp_edges[i] - expected).abs() < EPSILON);
    }
}

#[test]
fn primal_pivot_never_worsens_the_incumbent_objective() {
    // Non-Euclidean weights so the hexagon tour isn't trivially forced
    // optimal by the triangle inequality alone.
    let mut core_lp = complete_graph_with_tour(6, |u, v| {
        if (u + 1) % 6 == v || (v + 1) % 6 == u {
            20
        } else {
            1 + ((u * 3 + v) % 7) as i32
        }
    });

    let before = core_lp.tour().min_tour_value().0 as f64;
    let low_limit = before - EPSILON;
    let piv = core_lp.primal_pivot().unwrap();
    let obj = core_lp.oracle().get_objval();

    // spec §8 "Pivot monotonicity": a pivot is bounded below by
    // `min_tour_value - eps` and never increases the objective from the
    // starting tour-basic point.
    assert!(obj >= low_limit - 1e-6);
    assert!(obj <= before + 1e-6);
    match piv {
        PivType::Tour => assert!(obj < before - 1e-9),
        PivType::Frac => assert!(obj < before + EPSILON),
        PivType::FathomedTour | PivType::Subtour => {}
    }
}

#[test]
fn cutting_loop_improves_or_certifies_the_starting_tour() {
    let mut core_lp = complete_graph_with_tour(6, |u, v| {
        if (u + 1) % 6 == v || (v + 1) % 6 == u {
            20
        } else {
            1 + ((u * 3 + v) % 7) as i32
        }
    });
    let initial_value = core_lp.tour().min_tour_value();
    let config = EngineConfig::default();
    let mut pipeline = default_pipeline();

    let (piv, stats) = cutting_loop(&mut core_lp, &mut pipeline, &config).unwrap();

    assert!(matches!(piv, PivType::Tour | PivType::FathomedTour));
    // Augmentation law: the incumbent never gets worse across the call.
    assert!(core_lp.tour().min_tour_value() <= initial_value);
    if stats.rounds > 0 {
        assert!((0.0..=1.0).contains(&stats.max_ratio));
    }
}

#[test]
fn new_cuts_coefficient_lookup_matches_external_cuts_get_col() {
    let mut core_lp = complete_graph_with_tour(5, |u, v| 10 + ((u + v) % 3) as i32);

    let cut = HyperGraph::new_standard(
        CutSense::Greater,
        2.0,
        vec![vec![Node(0), Node(1)]],
        core_lp.clique_bank(),
    );
    // `get_coeff` computed directly from the handle must match what
    // `ExternalCuts::get_col` reports once the cut is live (spec §8
    // "Column indexing").
    let mut direct = Vec::new();
    for edge in core_lp.core_graph().edges() {
        let c = cut.get_coeff(edge.ends[0], edge.ends[1]);
        if c != 0.0 {
            direct.push(c);
        }
    }

    core_lp.add_cuts(vec![cut]).unwrap();
    for edge in core_lp.core_graph().edges().to_vec() {
        let col = core_lp.ext_cuts().get_col(edge.ends[0], edge.ends[1]);
        let expected = core_lp.ext_cuts().cut(0).get_coeff(edge.ends[0], edge.ends[1]);
        if expected != 0.0 {
            assert_eq!(col, vec![(0, expected)]);
        } else {
            assert!(col.is_empty());
        }
    }
    assert!(!direct.is_empty());
}

#[test]
fn clique_bank_refcount_drops_to_zero_when_owning_cut_is_dropped() {
    let core_lp = complete_graph_with_tour(5, |u, v| 10 + ((u + v) % 3) as i32);
    let bank = core_lp.clique_bank().clone();

    let clq = tsp_engine::clique::Clique::from_nodes(&[Node(0), Node(1)], core_lp.tour().perm());
    assert_eq!(bank.borrow().refcount(&clq), 0);

    let cut = HyperGraph::new_standard(CutSense::Greater, 2.0, vec![vec![Node(0), Node(1)]], &bank);
    assert_eq!(bank.borrow().refcount(&clq), 1);
    drop(cut);
    assert_eq!(bank.borrow().refcount(&clq), 0);
}
