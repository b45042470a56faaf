use criterion::{criterion_group, criterion_main, Criterion};
use tsp_core::instance::{distance::Distance, node::Node};
use tsp_engine::config::EngineConfig;
use tsp_engine::graph::{CoreGraph, GraphEdge};
use tsp_engine::lp::core_lp::CoreLP;
use tsp_engine::lp::reference::DenseLp;
use tsp_engine::sep::default_pipeline;
use tsp_engine::solver::cutting_loop;
use tsp_engine::tour::TourBank;

/// Points on a circle, so the nearest-neighbor tour (visiting in angular
/// order) is already optimal and every chord is a candidate LP column.
fn circle_instance(n: usize) -> CoreGraph {
    let points: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let theta = 2.0 * std::f64::consts::PI * i as f64 / n as f64;
            (theta.cos() * 1000.0, theta.sin() * 1000.0)
        })
        .collect();

    let mut g = CoreGraph::new(n);
    for u in 0..n {
        for v in (u + 1)..n {
            let (ux, uy) = points[u];
            let (vx, vy) = points[v];
            let len = ((ux - vx).powi(2) + (uy - vy).powi(2)).sqrt().round() as i32;
            g.add_edge(GraphEdge::new(Node(u), Node(v), Distance(len)));
        }
    }
    g
}

fn build_core_lp(n: usize) -> CoreLP<DenseLp> {
    let core_graph = circle_instance(n);
    let tour_nodes: Vec<Node> = (0..n).map(Node).collect();
    let tour = TourBank::from_node_order(&core_graph, tour_nodes).unwrap();
    CoreLP::new(DenseLp::new(), core_graph, tour).unwrap()
}

fn pivot_loop_small(c: &mut Criterion) {
    let config = EngineConfig::default();
    c.bench_function("cutting_loop: circle(8)", |b| {
        b.iter(|| {
            let mut core_lp = build_core_lp(8);
            let mut pipeline = default_pipeline();
            cutting_loop(&mut core_lp, &mut pipeline, &config).unwrap()
        })
    });
}

fn pivot_loop_medium(c: &mut Criterion) {
    let config = EngineConfig::default();
    c.bench_function("cutting_loop: circle(16)", |b| {
        b.iter(|| {
            let mut core_lp = build_core_lp(16);
            let mut pipeline = default_pipeline();
            cutting_loop(&mut core_lp, &mut pipeline, &config).unwrap()
        })
    });
}

criterion_group! {
    name = pivot_bench;
    config = Criterion::default().sample_size(10);
    targets = pivot_loop_small, pivot_loop_medium
}
criterion_main!(pivot_bench);
