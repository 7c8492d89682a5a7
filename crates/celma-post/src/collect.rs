// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Collect And Calculate Drivers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Collects one variable from a dump folder and reduces it to the profile or
//! plane requested by an [`AnalysisConfig`].
//!
//! Every path runs the same pipeline: mesh, units, slice resolution,
//! collection, time-axis normalization, processing, time stride, unit
//! conversion.

use celma_core::index::IndexResolver;
use celma_core::mesh::Mesh;
use celma_core::reduce::{ensure_time_axis, fluctuation, pol_avg, time_avg};
use celma_core::store::DataStore;
use celma_core::units::UnitsConverter;
use celma_types::config::{AnalysisConfig, Processing};
use celma_types::constants::T_ARRAY;
use celma_types::error::{CelmaError, CelmaResult};
use celma_types::state::{CollectRequest, Dimension, Field4, IndexRange};
use ndarray::{concatenate, s, Array1, Array2, Array3, Axis, Ix1, Slice};

/// Time trace of a dump folder, restricted to `t`.
pub fn collect_time(
    store: &dyn DataStore,
    path: &str,
    t: Option<IndexRange>,
) -> CelmaResult<Array1<f64>> {
    let request = CollectRequest {
        t,
        ..Default::default()
    };
    store
        .query_array(T_ARRAY, path, &request)?
        .into_dimensionality::<Ix1>()
        .map_err(|e| CelmaError::ShapeMismatch(format!("{T_ARRAY} in {path}: {e}")))
}

/// Resolved selection of all four dimensions.
#[derive(Debug, Clone, Copy)]
struct Selection {
    x: Option<IndexRange>,
    y: Option<IndexRange>,
    z: Option<IndexRange>,
    t: Option<IndexRange>,
}

impl Selection {
    fn resolve(store: &dyn DataStore, path: &str, config: &AnalysisConfig) -> CelmaResult<Self> {
        let r = IndexResolver::new(store, path);
        Ok(Selection {
            x: r.resolve(config.slice(Dimension::X), Dimension::X, config.xguards)?,
            y: r.resolve(config.slice(Dimension::Y), Dimension::Y, config.yguards)?,
            z: r.resolve(config.slice(Dimension::Z), Dimension::Z, false)?,
            t: r.resolve(config.slice(Dimension::T), Dimension::T, false)?,
        })
    }

    fn get(&self, dim: Dimension) -> Option<IndexRange> {
        match dim {
            Dimension::X => self.x,
            Dimension::Y => self.y,
            Dimension::Z => self.z,
            Dimension::T => self.t,
        }
    }

    fn request(&self, config: &AnalysisConfig) -> CollectRequest {
        CollectRequest {
            x: self.x,
            y: self.y,
            z: self.z,
            t: self.t,
            xguards: config.xguards,
            yguards: config.yguards,
        }
    }

    /// θ plane shown when z is not averaged; plane 0 when unspecified.
    fn theta_index(&self) -> usize {
        self.z.map_or(0, |r| r.start)
    }
}

fn fixed_index(range: Option<IndexRange>, dim: Dimension, what: &str) -> CelmaResult<usize> {
    let range = range.ok_or_else(|| {
        CelmaError::ConfigError(format!("{what} needs a fixed {dim} index"))
    })?;
    if !range.is_single() {
        log::debug!(
            "{what}: {dim} range of {} points fixed at {}",
            range.count(),
            range.start
        );
    }
    Ok(range.start)
}

fn coordinate_window(
    coords: &Array1<f64>,
    range: Option<IndexRange>,
    dim: Dimension,
) -> CelmaResult<Array1<f64>> {
    match range {
        None => Ok(coords.clone()),
        Some(r) if r.stop < coords.len() => Ok(coords.slice(s![r.start..=r.stop]).to_owned()),
        Some(r) => Err(CelmaError::IndexOutOfRange {
            dimension: dim,
            index: r.stop as i64,
            length: coords.len(),
        }),
    }
}

fn coordinate_at(coords: &Array1<f64>, index: usize, dim: Dimension) -> CelmaResult<f64> {
    coords
        .get(index)
        .copied()
        .ok_or(CelmaError::IndexOutOfRange {
            dimension: dim,
            index: index as i64,
            length: coords.len(),
        })
}

fn check_plane(field: &Field4, plane: usize) -> CelmaResult<()> {
    let nz = field.len_of(Axis(3));
    if plane >= nz {
        return Err(CelmaError::IndexOutOfRange {
            dimension: Dimension::Z,
            index: plane as i64,
            length: nz,
        });
    }
    Ok(())
}

fn check_axis_len(coords: &Array1<f64>, len: usize, dim: Dimension) -> CelmaResult<()> {
    if coords.len() != len {
        return Err(CelmaError::ShapeMismatch(format!(
            "{dim} coordinates have {} points, collected data has {len}",
            coords.len()
        )));
    }
    Ok(())
}

/// Time stride of a stepped t slice. Non-positive steps are ignored.
fn time_stride(config: &AnalysisConfig) -> Option<usize> {
    match config.t_slice.step() {
        Some(step) if step > 1 => Some(step as usize),
        Some(step) if step < 1 => {
            log::warn!("t slice step {step} is not positive, ignoring it");
            None
        }
        _ => None,
    }
}

fn apply_stride(field: Field4, time: Array1<f64>, stride: Option<usize>) -> (Field4, Array1<f64>) {
    match stride {
        Some(step) => {
            let slice = Slice::new(0, None, step as isize);
            (
                field.slice_axis(Axis(0), slice).to_owned(),
                time.slice_axis(Axis(0), slice).to_owned(),
            )
        }
        None => (field, time),
    }
}

/// Applies a processing mode. Time-averaged results carry the mean time,
/// except fluctuations about the time average, which keep every sample.
fn apply_processing(
    field: Field4,
    time: Array1<f64>,
    processing: Processing,
) -> CelmaResult<(Field4, Array1<f64>)> {
    match processing {
        Processing::PolAvg => Ok((pol_avg(&field)?, time)),
        Processing::PolAvgFluct => Ok((fluctuation(&field)?, time)),
        Processing::PolAndTimeAvg => {
            let (avg, t_mean) = time_avg(&pol_avg(&field)?, &time)?;
            Ok((avg, Array1::from(vec![t_mean])))
        }
        Processing::PolAndTimeAvgFluct => {
            let (avg, _) = time_avg(&pol_avg(&field)?, &time)?;
            Ok((&field - &avg, time))
        }
    }
}

/// Direction of a 1-D profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDirection {
    /// Along ρ at fixed z.
    Radial,
    /// Along z at fixed ρ.
    Parallel,
}

/// Profile of one variable over time.
#[derive(Debug, Clone)]
pub struct Field1D {
    pub var_name: String,
    pub mode: LineDirection,
    pub processing: Option<Processing>,
    /// `[t, s]`, `s` running along the abscissa.
    pub values: Array2<f64>,
    pub abscissa: Array1<f64>,
    pub time: Array1<f64>,
    pub rho_pos: Option<f64>,
    pub z_pos: Option<f64>,
    /// `None` when θ has been averaged away.
    pub theta_pos: Option<f64>,
    pub units: UnitsConverter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields1DCollector {
    pub mode: LineDirection,
    pub processing: Option<Processing>,
}

impl Fields1DCollector {
    pub fn new(mode: LineDirection, processing: Option<Processing>) -> Self {
        Fields1DCollector { mode, processing }
    }

    pub fn collect(
        &self,
        store: &dyn DataStore,
        path: &str,
        config: &AnalysisConfig,
    ) -> CelmaResult<Field1D> {
        config.validate()?;
        let mesh = Mesh::build(store, path, config.xguards, config.yguards)?;
        let units = UnitsConverter::from_store(store, path, config.convert_to_physical)?;
        let sel = Selection::resolve(store, path, config)?;

        let (along, fixed, what) = match self.mode {
            LineDirection::Radial => (Dimension::X, Dimension::Y, "radial profile"),
            LineDirection::Parallel => (Dimension::Y, Dimension::X, "parallel profile"),
        };
        let fixed_at = fixed_index(sel.get(fixed), fixed, what)?;
        let theta_index = sel.theta_index();

        let mut request = sel.request(config);
        request.set_range(fixed, Some(IndexRange::single(fixed_at)));
        // Poloidal processing needs every plane
        request.z = match self.processing {
            Some(_) => None,
            None => Some(IndexRange::single(theta_index)),
        };

        let time = collect_time(store, path, sel.t)?;
        let raw = store.query_array(&config.var_name, path, &request)?;
        let field = ensure_time_axis(raw, time.len())?;

        let (field, time, plane) = match self.processing {
            Some(p) => {
                let (field, time) = apply_processing(field, time, p)?;
                let plane = if p.is_fluctuation() { theta_index } else { 0 };
                (field, time, plane)
            }
            None => (field, time, 0),
        };
        check_plane(&field, plane)?;

        let stride = match self.processing {
            Some(p) if p.is_time_averaged() && !p.is_fluctuation() => None,
            _ => time_stride(config),
        };
        let (field, time) = apply_stride(field, time, stride);

        let values = match self.mode {
            LineDirection::Radial => field.slice(s![.., .., 0, plane]).to_owned(),
            LineDirection::Parallel => field.slice(s![.., 0, .., plane]).to_owned(),
        };

        let (along_coords, fixed_coords) = match self.mode {
            LineDirection::Radial => (&mesh.rho, &mesh.z),
            LineDirection::Parallel => (&mesh.z, &mesh.rho),
        };
        let abscissa = coordinate_window(along_coords, sel.get(along), along)?;
        check_axis_len(&abscissa, values.len_of(Axis(1)), along)?;
        let fixed_pos = coordinate_at(fixed_coords, fixed_at, fixed)?;

        let theta_pos = match self.processing {
            Some(p) if !p.is_fluctuation() => None,
            _ => Some(coordinate_at(&mesh.theta, theta_index, Dimension::Z)?),
        };

        let (along_name, fixed_name) = match self.mode {
            LineDirection::Radial => ("rho", "z"),
            LineDirection::Parallel => ("z", "rho"),
        };
        let fixed_pos = units.scalar_to_physical(fixed_pos, fixed_name);
        let (rho_pos, z_pos) = match self.mode {
            LineDirection::Radial => (None, Some(fixed_pos)),
            LineDirection::Parallel => (Some(fixed_pos), None),
        };

        log::debug!(
            "collected {} {what} from {path}: {:?}",
            config.var_name,
            values.shape()
        );

        Ok(Field1D {
            var_name: config.var_name.clone(),
            mode: self.mode,
            processing: self.processing,
            values: units.to_physical(values, &config.var_name),
            abscissa: units.to_physical(abscissa, along_name),
            time: units.to_physical(time, "t"),
            rho_pos,
            z_pos,
            theta_pos,
            units,
        })
    }
}

/// Plane of a 2-D field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    /// ρ-θ at fixed z, ring closed.
    Perp,
    /// ρ-z through the axis: θ and the opposite plane, ρ negative on the
    /// opposite side.
    Par,
    /// θ-z at fixed ρ, ring closed.
    Pol,
}

/// Plane of one variable over time.
#[derive(Debug, Clone)]
pub struct Field2D {
    pub var_name: String,
    pub plane: Plane,
    pub fluct: bool,
    /// `[t, a, b]`.
    pub values: Array3<f64>,
    /// Coordinates along `a`: ρ for perp and par planes, θ for the pol plane.
    pub first: Array1<f64>,
    /// Coordinates along `b`: θ for the perp plane, z otherwise.
    pub second: Array1<f64>,
    pub time: Array1<f64>,
    pub rho_pos: Option<f64>,
    pub theta_pos: Option<f64>,
    pub z_pos: Option<f64>,
    pub units: UnitsConverter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields2DCollector {
    pub plane: Plane,
    /// Subtract the poloidal average.
    pub fluct: bool,
}

impl Fields2DCollector {
    pub fn new(plane: Plane, fluct: bool) -> Self {
        Fields2DCollector { plane, fluct }
    }

    pub fn collect(
        &self,
        store: &dyn DataStore,
        path: &str,
        config: &AnalysisConfig,
    ) -> CelmaResult<Field2D> {
        config.validate()?;
        if config.processing.is_some() {
            log::warn!("2-D collection ignores the processing mode, use the fluct flag");
        }
        let mesh = Mesh::build(store, path, config.xguards, config.yguards)?;
        let units = UnitsConverter::from_store(store, path, config.convert_to_physical)?;
        let sel = Selection::resolve(store, path, config)?;

        let mut request = sel.request(config);
        // Fluctuations and closed rings need every plane
        request.z = None;
        let mut fixed_rho = None;
        let mut fixed_z = None;
        match self.plane {
            Plane::Perp => {
                let y = fixed_index(sel.y, Dimension::Y, "perpendicular plane")?;
                request.y = Some(IndexRange::single(y));
                fixed_z = Some(y);
            }
            Plane::Pol => {
                let x = fixed_index(sel.x, Dimension::X, "poloidal plane")?;
                request.x = Some(IndexRange::single(x));
                fixed_rho = Some(x);
            }
            Plane::Par => {}
        }

        let time = collect_time(store, path, sel.t)?;
        let raw = store.query_array(&config.var_name, path, &request)?;
        let mut field = ensure_time_axis(raw, time.len())?;
        if self.fluct {
            field = fluctuation(&field)?;
        }
        let (field, time) = apply_stride(field, time, time_stride(config));

        let rho = coordinate_window(&mesh.rho, sel.x, Dimension::X)?;
        let z = coordinate_window(&mesh.z, sel.y, Dimension::Y)?;
        let theta_index = sel.theta_index();

        let (values, first, second, theta_pos) = match self.plane {
            Plane::Perp => {
                let closed = Mesh::close_theta_ring(&field)?;
                let values = closed.slice(s![.., .., 0, ..]).to_owned();
                (values, rho, mesh.closed_theta(), None)
            }
            Plane::Pol => {
                let closed = Mesh::close_theta_ring(&field)?;
                let values = closed
                    .slice(s![.., 0, .., ..])
                    .permuted_axes([0, 2, 1])
                    .as_standard_layout()
                    .to_owned();
                (values, mesh.closed_theta(), z, None)
            }
            Plane::Par => {
                check_plane(&field, theta_index)?;
                let nz = field.len_of(Axis(3));
                let opposite = (theta_index + nz / 2) % nz;
                let here = field.slice(s![.., .., .., theta_index]);
                let there = field.slice(s![.., ..;-1, .., opposite]);
                let values = concatenate(Axis(1), &[there, here])
                    .map_err(|e| CelmaError::ShapeMismatch(e.to_string()))?;
                let mut signed: Vec<f64> = rho.iter().rev().map(|r| -r).collect();
                signed.extend(rho.iter().copied());
                let theta = coordinate_at(&mesh.theta, theta_index, Dimension::Z)?;
                (values, Array1::from(signed), z, Some(theta))
            }
        };
        check_axis_len(&first, values.len_of(Axis(1)), Dimension::X)?;
        check_axis_len(&second, values.len_of(Axis(2)), Dimension::Y)?;

        let rho_pos = match fixed_rho {
            Some(x) => Some(units.scalar_to_physical(coordinate_at(&mesh.rho, x, Dimension::X)?, "rho")),
            None => None,
        };
        let z_pos = match fixed_z {
            Some(y) => Some(units.scalar_to_physical(coordinate_at(&mesh.z, y, Dimension::Y)?, "z")),
            None => None,
        };

        let (first, second) = match self.plane {
            Plane::Perp => (units.to_physical(first, "rho"), second),
            Plane::Pol => (first, units.to_physical(second, "z")),
            Plane::Par => (units.to_physical(first, "rho"), units.to_physical(second, "z")),
        };

        log::debug!(
            "collected {} {:?} plane from {path}: {:?}",
            config.var_name,
            self.plane,
            values.shape()
        );

        Ok(Field2D {
            var_name: config.var_name.clone(),
            plane: self.plane,
            fluct: self.fluct,
            values: units.to_physical(values, &config.var_name),
            first,
            second,
            time: units.to_physical(time, "t"),
            rho_pos,
            theta_pos,
            z_pos,
            units,
        })
    }
}
