use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use orthoroute::{
    BundleEdge, ConnectorEndpoint, ForceEdgeBundling, ForceNode, Rect, RouteOptions, Side, route,
};
use std::hint::black_box;

fn spaced_pair(gap: f32) -> RouteOptions {
    RouteOptions {
        source: ConnectorEndpoint {
            shape: Rect::new(0.0, 0.0, 40.0, 40.0),
            side: Side::Right,
            distance: 0.5,
        },
        target: ConnectorEndpoint {
            shape: Rect::new(40.0 + gap, gap / 2.0, 40.0, 40.0),
            side: Side::Top,
            distance: 0.5,
        },
        shape_margin: 10.0,
        global_bounds_margin: 20.0,
        global_bounds: Rect::new(-500.0, -500.0, 2000.0, 2000.0),
    }
}

fn star_edges(nodes: usize) -> (Vec<ForceNode>, Vec<BundleEdge>) {
    let mut force_nodes = vec![ForceNode::at(0.0, 0.0, 0.0)];
    let mut edges = Vec::new();
    for i in 1..nodes {
        let angle = i as f32 / nodes as f32 * std::f32::consts::TAU;
        force_nodes.push(ForceNode::at(200.0 * angle.cos(), 200.0 * angle.sin(), 0.0));
        edges.push(BundleEdge {
            source: 0,
            target: i,
        });
    }
    (force_nodes, edges)
}

fn bench_route(c: &mut Criterion) {
    let mut group = c.benchmark_group("route");
    for gap in [80.0f32, 240.0, 640.0] {
        group.bench_with_input(BenchmarkId::from_parameter(gap), &gap, |b, &gap| {
            let options = spaced_pair(gap);
            b.iter(|| route(black_box(&options)).unwrap());
        });
    }
    group.finish();
}

fn bench_bundling(c: &mut Criterion) {
    let mut group = c.benchmark_group("bundling");
    for size in [8usize, 24] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let (nodes, edges) = star_edges(size);
            let bundling = ForceEdgeBundling::new().nodes(&nodes).edges(edges);
            b.iter(|| black_box(&bundling).run());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_route, bench_bundling);
criterion_main!(benches);
