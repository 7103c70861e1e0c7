//! Benchmarks for the two expensive stages of the ensemble analysis: the
//! adaptive integration of each member and the pairwise distance sweep.
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ensemble_analyzer::{
    core::{dynamical_systems::lorenz_dynamics, ode_solvers::{dopri5_simulate_sampled, AdaptiveStepOptions}},
    ensemble::{distance::pairwise_distances, integrator::{integrate_ensemble, uniform_time_grid}},
};
use nalgebra::Vector3;

fn initial_conditions(count: usize) -> Vec<Vector3<f64>> {
    (0..count)
        .map(|i| Vector3::new(2.0 + 1e-9 * (i as f64), 3.0, -14.0))
        .collect()
}

fn benchmark(c: &mut Criterion) {
    let options = AdaptiveStepOptions::default();
    let time_grid = uniform_time_grid(0.0, 35.0, 2000);

    c.bench_function("dopri5_lorenz_single_member", |b| {
        b.iter(|| {
            dopri5_simulate_sampled(
                black_box(&time_grid),
                Vector3::new(2.0, 3.0, -14.0),
                &lorenz_dynamics,
                &options,
            )
        });
    });

    let mut group = c.benchmark_group("ensemble");
    group.sample_size(10);
    let members = initial_conditions(10);
    for &parallel in &[false, true] {
        group.bench_function(format!("integrate_10_members_parallel_{}", parallel), |b| {
            b.iter(|| integrate_ensemble(black_box(&members), 0.0, 35.0, 2000, &options, parallel));
        });
    }

    let ensemble = integrate_ensemble(&initial_conditions(40), 0.0, 35.0, 2000, &options, true)
        .expect("benchmark ensemble should integrate");
    group.bench_function("pairwise_distances_40_members", |b| {
        b.iter(|| pairwise_distances(black_box(&ensemble.trajectories)));
    });
    group.finish();
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
