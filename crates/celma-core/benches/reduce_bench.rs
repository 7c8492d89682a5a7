// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Poloidal Reduction Benchmark
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

use celma_core::reduce::{ensure_time_axis, fluctuation, pol_avg, time_avg};
use celma_types::state::Field4;
use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::{Array1, Array3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::hint::black_box;

fn synthetic_field(nt: usize, nx: usize, ny: usize, nz: usize) -> Field4 {
    let mut rng = StdRng::seed_from_u64(42);
    let normal = Normal::new(0.0, 1.0).expect("unit normal is valid");
    Field4::from_shape_fn((nt, nx, ny, nz), |(_, x, _, _)| {
        (-(x as f64) / nx as f64).exp() + 0.1 * normal.sample(&mut rng)
    })
}

fn bench_poloidal(c: &mut Criterion) {
    let mut group = c.benchmark_group("poloidal_reduction");
    group.sample_size(20);

    for nz in [64usize, 256usize] {
        let field = synthetic_field(10, 32, 16, nz);
        group.bench_function(format!("pol_avg_nz{nz}"), |b| {
            b.iter(|| black_box(pol_avg(black_box(&field)).expect("non-empty planes")))
        });
        group.bench_function(format!("fluctuation_nz{nz}"), |b| {
            b.iter(|| black_box(fluctuation(black_box(&field)).expect("non-empty planes")))
        });
    }

    group.finish();
}

fn bench_time(c: &mut Criterion) {
    let field = synthetic_field(50, 32, 16, 64);
    let t = Array1::linspace(0.0, 49.0, 50);
    c.bench_function("time_avg_50", |b| {
        b.iter(|| black_box(time_avg(black_box(&field), &t).expect("matching time axis")))
    });

    let single = Array3::<f64>::ones((32, 16, 64)).into_dyn();
    c.bench_function("ensure_time_axis_50", |b| {
        b.iter(|| black_box(ensure_time_axis(single.clone(), 50).expect("3-D field")))
    });
}

criterion_group!(benches, bench_poloidal, bench_time);
criterion_main!(benches);
