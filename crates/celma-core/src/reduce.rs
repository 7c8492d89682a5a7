// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Poloidal And Time Reduction
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Averages over θ and t for fields laid out `[t, x, y, z]`.

use celma_types::error::{CelmaError, CelmaResult};
use celma_types::state::{Dimension, Field4};
use ndarray::{Array1, ArrayD, Axis, Ix4};

/// Mean over θ, broadcast back to the shape of `field`.
pub fn pol_avg(field: &Field4) -> CelmaResult<Field4> {
    let axis = Axis(Dimension::Z.axis());
    let mean = field.mean_axis(axis).ok_or_else(|| {
        CelmaError::ShapeMismatch("poloidal average of a field without planes".into())
    })?;
    let mean = mean.insert_axis(axis);
    let broadcast = mean.broadcast(field.raw_dim()).ok_or_else(|| {
        CelmaError::ShapeMismatch(format!(
            "cannot broadcast {:?} to {:?}",
            mean.shape(),
            field.shape()
        ))
    })?;
    Ok(broadcast.to_owned())
}

/// `field − <field>_θ`.
pub fn fluctuation(field: &Field4) -> CelmaResult<Field4> {
    Ok(field - &pol_avg(field)?)
}

/// Unweighted mean over t.
///
/// Returns the averaged field, keeping a t axis of length 1, together with
/// the mean of `t`.
pub fn time_avg(field: &Field4, t: &Array1<f64>) -> CelmaResult<(Field4, f64)> {
    let axis = Axis(Dimension::T.axis());
    if field.len_of(axis) != t.len() {
        return Err(CelmaError::ShapeMismatch(format!(
            "field has {} time points but t has {}",
            field.len_of(axis),
            t.len()
        )));
    }
    let avg = field
        .mean_axis(axis)
        .ok_or_else(|| CelmaError::ShapeMismatch("time average over zero time points".into()))?;
    let t_mean = t
        .mean()
        .ok_or_else(|| CelmaError::ShapeMismatch("empty time array".into()))?;
    Ok((avg.insert_axis(axis), t_mean))
}

/// Gives every collected field a t axis.
///
/// Quantities saved once arrive `[x, y, z]` and are replicated `n_t` times;
/// `[t, x, y, z]` passes through untouched.
pub fn ensure_time_axis(field: ArrayD<f64>, n_t: usize) -> CelmaResult<Field4> {
    match field.ndim() {
        4 => field
            .into_dimensionality::<Ix4>()
            .map_err(|e| CelmaError::ShapeMismatch(e.to_string())),
        3 => {
            let shape = field.shape();
            let target = [n_t, shape[0], shape[1], shape[2]];
            let expanded = field.view().insert_axis(Axis(0));
            let replicated = expanded
                .broadcast(target.as_slice())
                .ok_or_else(|| CelmaError::ShapeMismatch(format!("cannot broadcast to {target:?}")))?
                .to_owned();
            replicated
                .into_dimensionality::<Ix4>()
                .map_err(|e| CelmaError::ShapeMismatch(e.to_string()))
        }
        n => Err(CelmaError::ShapeMismatch(format!(
            "expected a 3-D or 4-D field, got {n}-D"
        ))),
    }
}
