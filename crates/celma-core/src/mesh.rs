// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Cylindrical Mesh
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Cylindrical (ρ, θ, z) coordinates rebuilt from the grid metadata of a dump.
//!
//! ρ and z are cell centres `d·(0.5, 1.5, …)`. With guards, one point is
//! prepended at `−0.5·d` and one appended at `last + d`. θ runs over the
//! `MZ − 1` stored planes from 0 in steps of `dz`, unwrapped and in radians.

use crate::input::evaluate_expression;
use crate::store::DataStore;
use celma_types::constants::{GEOM_SECTION, OFFSET_KEY};
use celma_types::error::{CelmaError, CelmaResult};
use celma_types::state::{Dimension, Field4};
use ndarray::{concatenate, s, Array1, Array2, Axis};

/// Coordinates of one dump folder. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Radial cell centres.
    pub rho: Array1<f64>,
    /// Poloidal angle in radians, `MZ − 1` points.
    pub theta: Array1<f64>,
    /// Axial cell centres.
    pub z: Array1<f64>,
    pub xguards: bool,
    pub yguards: bool,
    /// Poloidal spacing.
    pub dz: f64,
}

/// Required grid scalar; a store miss becomes [`CelmaError::MissingMetadata`].
fn grid_scalar(store: &dyn DataStore, key: &str, path: &str) -> CelmaResult<f64> {
    store.query_scalar(key, path).map_err(|e| {
        if e.is_not_found() {
            CelmaError::MissingMetadata {
                key: key.to_string(),
                path: path.to_string(),
            }
        } else {
            e
        }
    })
}

/// Cell centres over `inner` points, optionally shifted and bracketed.
fn cell_centres(spacing: f64, inner: usize, offset: f64, guards: bool) -> Array1<f64> {
    let centres = Array1::from_iter((0..inner).map(|i| offset + spacing * (i as f64 + 0.5)));
    if !guards {
        return centres;
    }
    let mut bracketed = Vec::with_capacity(inner + 2);
    bracketed.push(-0.5 * spacing);
    bracketed.extend(centres.iter().copied());
    // Empty grids still get a last point one spacing past the first guard
    let last = bracketed.last().copied().unwrap_or(-0.5 * spacing);
    bracketed.push(last + spacing);
    Array1::from(bracketed)
}

/// θ in degrees; the mesh itself keeps radians.
pub fn degrees(theta: &Array1<f64>) -> Array1<f64> {
    theta.mapv(f64::to_degrees)
}

/// Cartesian `(X, Y)` grids of a ρ-θ plane, shaped `[rho, theta]`.
pub fn perp_grid(rho: &Array1<f64>, theta: &Array1<f64>) -> (Array2<f64>, Array2<f64>) {
    let shape = (rho.len(), theta.len());
    let x = Array2::from_shape_fn(shape, |(i, j)| rho[i] * theta[j].cos());
    let y = Array2::from_shape_fn(shape, |(i, j)| rho[i] * theta[j].sin());
    (x, y)
}

impl Mesh {
    pub fn build(
        store: &dyn DataStore,
        path: &str,
        xguards: bool,
        yguards: bool,
    ) -> CelmaResult<Mesh> {
        let dx = grid_scalar(store, "dx", path)?;
        let dy = grid_scalar(store, "dy", path)?;
        let dz = grid_scalar(store, "dz", path)?;
        // Guard counts are read so that their absence fails the build early
        grid_scalar(store, "MXG", path)?;
        grid_scalar(store, "MYG", path)?;
        let mz = grid_scalar(store, "MZ", path)?;

        // Physical cells only; guard points are added back by bracketing
        let nx = store.query_length(path, Dimension::X, false)?;
        let ny = store.query_length(path, Dimension::Y, false)?;

        let offset = match store.query_input_option(path, GEOM_SECTION, OFFSET_KEY)? {
            Some(expr) => {
                let offset = evaluate_expression(&expr)?;
                log::warn!("'offset' = {offset} found in input file of {path}, running as annulus");
                offset
            }
            None => 0.0,
        };

        let rho = cell_centres(dx, nx, offset, xguards);
        let z = cell_centres(dy, ny, 0.0, yguards);

        // The last plane duplicates the first
        let inner_planes = (mz.max(1.0) as usize) - 1;
        let theta = Array1::from_iter((0..inner_planes).map(|k| dz * k as f64));

        log::debug!(
            "mesh for {path}: {} rho, {} theta, {} z points",
            rho.len(),
            theta.len(),
            z.len()
        );

        Ok(Mesh {
            rho,
            theta,
            z,
            xguards,
            yguards,
            dz,
        })
    }

    /// θ with one extra plane at `last + dz`, closing the ring.
    pub fn closed_theta(&self) -> Array1<f64> {
        let next = self.theta.last().map_or(0.0, |&last| last + self.dz);
        let mut closed = self.theta.to_vec();
        closed.push(next);
        Array1::from(closed)
    }

    /// Append the first θ plane of `field` as its last.
    pub fn close_theta_ring(field: &Field4) -> CelmaResult<Field4> {
        if field.len_of(Axis(3)) == 0 {
            return Err(CelmaError::ShapeMismatch(
                "cannot close the theta ring of a field without planes".into(),
            ));
        }
        let first = field.slice(s![.., .., .., 0..1]);
        concatenate(Axis(3), &[field.view(), first])
            .map_err(|e| CelmaError::ShapeMismatch(e.to_string()))
    }
}
