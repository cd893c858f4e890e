use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use velo_optimizer::{
    problem::{
        station::{StationBuilder, StationId},
        station_graph::{Edge, StationGraph},
    },
    qubo::qubo_builder,
};

fn ring_graph(num_stations: i64) -> StationGraph {
    let stations = (0..num_stations)
        .map(|id| {
            let mut builder = StationBuilder::default();
            builder.set_id(StationId::Number(id));
            if id % 3 == 0 {
                builder.set_supply(4);
            } else if id == num_stations - 1 {
                builder.set_demand(8);
            }
            builder.build().unwrap()
        })
        .collect();

    let edges = (0..num_stations)
        .map(|id| {
            Edge::new(
                StationId::Number(id),
                StationId::Number((id + 1) % num_stations),
                (id % 7 + 1) as f64,
            )
        })
        .collect();

    StationGraph::new(stations, edges).unwrap()
}

fn qubo_benchmark(c: &mut Criterion) {
    for num_stations in [8, 16, 32] {
        let graph = ring_graph(num_stations);
        let lagrange = graph.suggested_lagrange();

        c.bench_function(&format!("build tour qubo ({num_stations} stations)"), |b| {
            b.iter(|| qubo_builder::build(black_box(&graph), black_box(lagrange)))
        });
    }
}

fn graph_benchmark(c: &mut Criterion) {
    c.bench_function("shortest paths on a 64 station ring", |b| {
        b.iter(|| ring_graph(black_box(64)))
    });
}

criterion_group!(benches, qubo_benchmark, graph_benchmark);
criterion_main!(benches);
