#[macro_use]
extern crate criterion;

use criterion::{black_box, Criterion};
use qnet_core::network::NetworkBuilder;
use qnet_core::node::{Capacity, TimeRange};
use qnet_simulator::SimulationEngine;

/// Throughput of one run over a two-station network with branching routes.
fn benchmark_simulation_throughput(c: &mut Criterion) {
    let mut b = NetworkBuilder::new();
    b.add_station(
        "Q1",
        2,
        Capacity::Finite(4),
        Some(TimeRange::new(1.0, 3.0)),
        TimeRange::new(2.0, 4.0),
    )
    .unwrap();
    b.add_station("Q2", 1, Capacity::Unbounded, None, TimeRange::new(1.0, 2.0))
        .unwrap();
    b.add_route("Q1", "Q2", 0.7).unwrap();
    b.add_route("Q1", "S", 0.3).unwrap();
    b.add_route("Q2", "S", 1.0).unwrap();
    b.add_first_arrival("Q1", 1.0).seeds([42]).random_budget(100_000);
    let definition = b.build().unwrap();

    c.bench_function("simulation_throughput", |bench| {
        let mut engine = SimulationEngine::new(&definition);
        bench.iter(|| black_box(engine.run(black_box(42))))
    });
}

criterion_group!(benches, benchmark_simulation_throughput);
criterion_main!(benches);
