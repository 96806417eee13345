//! Whole-step and kd-tree benchmarks over ring scenarios of growing size.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};

use crowd_benches::{aim_at_goals, ring_simulator};
use crowd_core::{AgentId, Vec2};
use crowd_spatial::{AgentKdTree, NeighborList};

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for &count in &[50usize, 250, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("ring_{count}"), |b| {
            b.iter_batched(
                || {
                    let (mut sim, goals) = ring_simulator(count, count as f32);
                    aim_at_goals(&mut sim, &goals);
                    sim
                },
                |mut sim| {
                    sim.step();
                    black_box(sim.global_time())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_agent_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("agent_tree");

    for &count in &[250usize, 1000] {
        let positions: Vec<Vec2> = (0..count)
            .map(|i| {
                let i = i as f32;
                Vec2::new((i * 0.37).sin() * 100.0, (i * 0.73).cos() * 100.0)
            })
            .collect();

        group.bench_function(format!("build_{count}"), |b| {
            let mut tree = AgentKdTree::new();
            b.iter(|| tree.build(black_box(&positions)));
        });

        group.bench_function(format!("query_{count}"), |b| {
            let mut tree = AgentKdTree::new();
            tree.build(&positions);
            let mut neighbors = NeighborList::new();
            b.iter(|| {
                neighbors.reset(10, 15.0 * 15.0);
                tree.query(&positions, AgentId(0), &mut neighbors);
                black_box(neighbors.len())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_step, bench_agent_tree);
criterion_main!(benches);
