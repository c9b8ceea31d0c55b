use archsim_engine::{analyze_topology, compute_metrics, tick};
use archsim_model::{GraphStore, NodeConfig};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Client fanning out to `width` parallel service tiers of `depth` nodes
fn layered(width: usize, depth: usize) -> GraphStore {
    let mut store = GraphStore::new();
    let client = store.add_node("web-client", "Client");
    let lb = store.add_node("load-balancer", "LB");
    let db = store.add_node("postgres", "DB");
    store.connect(client, lb).unwrap();
    for w in 0..width {
        let mut prev = lb;
        for d in 0..depth {
            let id = store
                .add_node_with("microservice", NodeConfig::new(format!("svc-{w}-{d}")))
                .unwrap();
            store.connect(prev, id).unwrap();
            prev = id;
        }
        store.connect(prev, db).unwrap();
    }
    store
}

/// Client feeding `depth` layers of `width` services, each layer fully
/// connected to the next, draining into one database
fn meshed(width: usize, depth: usize) -> GraphStore {
    let mut store = GraphStore::new();
    let client = store.add_node("web-client", "Client");
    let mut prev = vec![client];
    for d in 0..depth {
        let layer: Vec<_> = (0..width)
            .map(|w| store.add_node("microservice", format!("svc-{d}-{w}")))
            .collect();
        for &from in &prev {
            for &to in &layer {
                store.connect(from, to).unwrap();
            }
        }
        prev = layer;
    }
    let db = store.add_node("postgres", "DB");
    for &from in &prev {
        store.connect(from, db).unwrap();
    }
    store
}

fn bench_topology(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_topology");
    for (width, depth) in [(4, 4), (8, 6), (16, 8)] {
        let store = layered(width, depth);
        group.bench_with_input(
            BenchmarkId::from_parameter(store.node_count()),
            &store,
            |b, store| b.iter(|| analyze_topology(store.catalog(), black_box(store.nodes()), store.edges())),
        );
    }
    group.finish();

    let mut group = c.benchmark_group("analyze_topology_mesh");
    for depth in [4, 8, 12, 24] {
        let store = meshed(5, depth);
        group.bench_with_input(BenchmarkId::new("5_wide", depth), &store, |b, store| {
            b.iter(|| analyze_topology(store.catalog(), black_box(store.nodes()), store.edges()))
        });
    }
    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let store = layered(8, 6);
    c.bench_function("metrics_8x6", |b| {
        b.iter(|| compute_metrics(store.catalog(), store.nodes(), store.edges(), black_box(5000.0)));
    });
    c.bench_function("tick_8x6", |b| {
        b.iter(|| tick(store.catalog(), store.nodes(), store.edges(), black_box(5000.0), &[]));
    });
    let mesh = meshed(5, 12);
    c.bench_function("tick_mesh_5x12", |b| {
        b.iter(|| tick(mesh.catalog(), mesh.nodes(), mesh.edges(), black_box(5000.0), &[]));
    });
}

criterion_group!(benches, bench_topology, bench_tick);
criterion_main!(benches);
