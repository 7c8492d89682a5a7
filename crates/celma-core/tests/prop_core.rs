// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Property-Based Tests (proptest) for celma-core
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for celma-core using proptest.
//!
//! Covers: slice resolution, mesh bracketing, poloidal reduction,
//! time-axis broadcast, unit round-trips.

use celma_core::index::IndexResolver;
use celma_core::mesh::Mesh;
use celma_core::reduce::{ensure_time_axis, fluctuation, pol_avg};
use celma_core::store::{Dataset, MemoryStore};
use celma_core::units::UnitsConverter;
use celma_types::state::{Dimension, Field4, IndexRange, NormalizationConstants, SliceSpec};
use ndarray::{s, Array1, Array3, Axis};
use proptest::prelude::*;

const PATH: &str = "scan/prop";

fn store_with_time(nt: usize, nx: usize, ny: usize, dx: f64, dy: f64) -> MemoryStore {
    let mut ds = Dataset::cylinder(nx, ny, 9, 2, 1, dx, dy, 0.25);
    ds.set_time((0..nt).map(|i| i as f64 * 0.5).collect());
    let mut store = MemoryStore::new();
    store.insert(PATH, ds);
    store
}

// ── Slice Resolution Properties ──────────────────────────────────────

proptest! {
    /// -1 resolves to L - 2 for every length.
    #[test]
    fn minus_one_is_second_to_last(nt in 2usize..200) {
        let store = store_with_time(nt, 4, 4, 1.0, 1.0);
        let r = IndexResolver::new(&store, PATH);
        let neg = r.resolve(SliceSpec::Index(-1), Dimension::T, false).unwrap();
        let pos = r.resolve(SliceSpec::Index(nt as i64 - 2), Dimension::T, false).unwrap();
        prop_assert_eq!(neg, pos);
    }

    /// Any non-underflowing negative bound maps to L + bound - 1.
    #[test]
    fn negative_bound_rule(nt in 2usize..200, frac in 0.0f64..1.0) {
        let store = store_with_time(nt, 4, 4, 1.0, 1.0);
        let r = IndexResolver::new(&store, PATH);
        let bound = -1 - ((nt as f64 - 2.0) * frac) as i64;
        let resolved = r.resolve(SliceSpec::Index(bound), Dimension::T, false).unwrap();
        let expected = (nt as i64 + bound - 1) as usize;
        prop_assert_eq!(resolved, Some(IndexRange::single(expected)));
    }

    /// Bounds past -L + 1 underflow.
    #[test]
    fn underflow_is_rejected(nt in 2usize..100, extra in 0i64..50) {
        let store = store_with_time(nt, 4, 4, 1.0, 1.0);
        let r = IndexResolver::new(&store, PATH);
        let bound = -(nt as i64) - extra;
        prop_assert!(r.resolve(SliceSpec::Index(bound), Dimension::T, false).is_err());
    }

    /// slice(start, None) resolves to [start, L - 1].
    #[test]
    fn open_stop_reaches_last_point(nx in 2usize..64, frac in 0.0f64..1.0, guards: bool) {
        let store = store_with_time(3, nx, 4, 1.0, 1.0);
        let r = IndexResolver::new(&store, PATH);
        // One guard point per side, although MXG = 2
        let len = if guards { nx + 2 } else { nx };
        let start = ((len - 1) as f64 * frac) as usize;
        let resolved = r.resolve(SliceSpec::open(start as i64), Dimension::X, guards).unwrap();
        prop_assert_eq!(resolved, Some(IndexRange::new(start, len - 1)));
    }
}

// ── Mesh Properties ──────────────────────────────────────────────────

proptest! {
    /// Guards add exactly two points at -0.5 d and last + d.
    #[test]
    fn ghost_bracketing(nx in 1usize..60, ny in 1usize..60, dx in 0.01f64..5.0, dy in 0.01f64..5.0) {
        let store = store_with_time(2, nx, ny, dx, dy);
        let plain = Mesh::build(&store, PATH, false, false).unwrap();
        let guarded = Mesh::build(&store, PATH, true, true).unwrap();

        prop_assert_eq!(plain.rho.len(), nx);
        prop_assert_eq!(guarded.rho.len(), nx + 2);
        prop_assert!((guarded.rho[0] + 0.5 * dx).abs() < 1e-12);
        prop_assert!((guarded.rho[nx + 1] - (plain.rho[nx - 1] + dx)).abs() < 1e-9);

        prop_assert_eq!(guarded.z.len(), ny + 2);
        prop_assert!((guarded.z[0] + 0.5 * dy).abs() < 1e-12);
        prop_assert!((guarded.z[ny + 1] - (plain.z[ny - 1] + dy)).abs() < 1e-9);
    }
}

// ── Reduction Properties ─────────────────────────────────────────────

fn field_strategy() -> impl Strategy<Value = Field4> {
    (1usize..4, 1usize..5, 1usize..4, 2usize..12).prop_flat_map(|(nt, nx, ny, nz)| {
        proptest::collection::vec(-10.0f64..10.0, nt * nx * ny * nz).prop_map(move |v| {
            Field4::from_shape_vec((nt, nx, ny, nz), v).expect("length matches shape")
        })
    })
}

proptest! {
    /// Averaging an average changes nothing.
    #[test]
    fn pol_avg_is_idempotent(field in field_strategy()) {
        let once = pol_avg(&field).unwrap();
        let twice = pol_avg(&once).unwrap();
        for (a, b) in once.iter().zip(twice.iter()) {
            prop_assert!((a - b).abs() < 1e-12);
        }
    }

    /// Fluctuations average to zero over θ.
    #[test]
    fn fluctuation_zero_mean(field in field_strategy()) {
        let fluct = fluctuation(&field).unwrap();
        let mean = fluct.mean_axis(Axis(3)).unwrap();
        prop_assert!(mean.iter().all(|v| v.abs() < 1e-10));
    }

    /// A single-save field is replicated identically along t.
    #[test]
    fn broadcast_replicates(nt in 1usize..8, nx in 1usize..6, ny in 1usize..6, nz in 1usize..6) {
        let single = Array3::from_shape_fn((nx, ny, nz), |(x, y, z)| (x * 37 + y * 11 + z) as f64);
        let field = ensure_time_axis(single.clone().into_dyn(), nt).unwrap();
        prop_assert_eq!(field.shape(), &[nt, nx, ny, nz]);
        for t in 0..nt {
            prop_assert_eq!(field.slice(s![t, .., .., ..]), single.view());
        }
    }
}

// ── Unit Properties ──────────────────────────────────────────────────

proptest! {
    /// n and rho convert back by dividing by n0 and rho_s.
    #[test]
    fn unit_round_trip(n0 in 1e10f64..1e20, rho_s in 1e-4f64..1e-1, values in proptest::collection::vec(0.0f64..5.0, 1..20)) {
        let conv = UnitsConverter::physical(NormalizationConstants {
            om_ci: 1.0e7,
            rho_s,
            n0,
            te0: 1.0e-18,
        });
        let original = Array1::from(values);
        let n_back = conv.to_physical(original.clone(), "n") / n0;
        let rho_back = conv.to_physical(original.clone(), "rho") / rho_s;
        for ((a, b), c) in n_back.iter().zip(rho_back.iter()).zip(original.iter()) {
            prop_assert!((a - c).abs() <= 1e-12 * c.abs().max(1.0));
            prop_assert!((b - c).abs() <= 1e-12 * c.abs().max(1.0));
        }
    }
}
