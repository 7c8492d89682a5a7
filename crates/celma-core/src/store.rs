// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Data Store Access
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Read-only access to dump folders.
//!
//! Everything above this module talks to a [`DataStore`]; the dump format
//! itself stays behind the trait. Two implementations are provided:
//! [`MemoryStore`] for data already held in memory, and [`DirectoryStore`]
//! reading one `.npy` file per variable plus the folder's `BOUT.inp`.
//!
//! Stored arrays always include guard cells. Layouts by rank:
//! 1-D `[t]`, 2-D `[x, y]`, 3-D `[x, y, z]`, 4-D `[t, x, y, z]`.
//!
//! Requesting guards returns the innermost guard layer only, one point per
//! side, whatever `MXG`/`MYG` are. Lengths with guards count the same way,
//! so indices, collected data and the bracketed mesh line up.

use crate::input::InputOptions;
use celma_types::constants::{INPUT_FILE, T_ARRAY};
use celma_types::error::{CelmaError, CelmaResult};
use celma_types::state::{CollectRequest, Dimension, IndexRange};
use ndarray::{Array1, ArrayD, Axis, Slice};
use std::collections::HashMap;
use std::path::PathBuf;

pub trait DataStore: Send + Sync {
    /// Number of points along `dim`. Guards only affect x and y.
    fn query_length(&self, path: &str, dim: Dimension, include_guards: bool) -> CelmaResult<usize>;

    /// Collect `name`, restricted per dimension by `request`.
    ///
    /// Returns 3-D for quantities saved once and 4-D for quantities saved
    /// every output step.
    fn query_array(&self, name: &str, path: &str, request: &CollectRequest)
        -> CelmaResult<ArrayD<f64>>;

    fn query_scalar(&self, name: &str, path: &str) -> CelmaResult<f64>;

    /// Raw option string from the input file, `None` if absent.
    fn query_input_option(&self, path: &str, section: &str, key: &str)
        -> CelmaResult<Option<String>>;

    /// Like [`DataStore::query_scalar`] but maps a store-level miss to `None`.
    fn query_scalar_opt(&self, name: &str, path: &str) -> CelmaResult<Option<f64>> {
        match self.query_scalar(name, path) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Dimensions carried by each axis of a stored array, by rank.
fn axis_layout(ndim: usize) -> CelmaResult<&'static [Dimension]> {
    match ndim {
        0 => Ok(&[]),
        1 => Ok(&[Dimension::T]),
        2 => Ok(&[Dimension::X, Dimension::Y]),
        3 => Ok(&[Dimension::X, Dimension::Y, Dimension::Z]),
        4 => Ok(&[Dimension::T, Dimension::X, Dimension::Y, Dimension::Z]),
        _ => Err(CelmaError::ShapeMismatch(format!(
            "stored arrays have rank 0..=4, got {ndim}"
        ))),
    }
}

/// Strip guards down to what was requested, then apply the inclusive
/// index ranges.
pub(crate) fn select(
    raw: &ArrayD<f64>,
    request: &CollectRequest,
    mxg: usize,
    myg: usize,
) -> CelmaResult<ArrayD<f64>> {
    let layout = axis_layout(raw.ndim())?;
    let mut view = raw.view();

    for (axis, &dim) in layout.iter().enumerate() {
        let ng = match dim {
            Dimension::X => mxg,
            Dimension::Y => myg,
            _ => 0,
        };
        if ng > 0 {
            let len = view.len_of(Axis(axis));
            if len < 2 * ng {
                return Err(CelmaError::ShapeMismatch(format!(
                    "{dim} has {len} points, fewer than 2 x {ng} guards"
                )));
            }
            let strip = if request.guards(dim) { ng - 1 } else { ng };
            if strip > 0 {
                view.slice_axis_inplace(Axis(axis), Slice::from(strip..len - strip));
            }
        }
        if let Some(range) = request.range(dim) {
            let len = view.len_of(Axis(axis));
            check_range(dim, range, len)?;
            view.slice_axis_inplace(Axis(axis), Slice::from(range.start..range.stop + 1));
        }
    }

    Ok(view.to_owned())
}

fn check_range(dim: Dimension, range: IndexRange, len: usize) -> CelmaResult<()> {
    if range.start > range.stop {
        return Err(CelmaError::ShapeMismatch(format!(
            "{dim} range start {} exceeds stop {}",
            range.start, range.stop
        )));
    }
    if range.stop >= len {
        return Err(CelmaError::IndexOutOfRange {
            dimension: dim,
            index: range.stop as i64,
            length: len,
        });
    }
    Ok(())
}

fn not_found(name: &str, path: &str) -> CelmaError {
    CelmaError::NotFound {
        name: name.to_string(),
        path: path.to_string(),
    }
}

fn guard_count(store: &dyn DataStore, key: &str, path: &str) -> CelmaResult<usize> {
    Ok(store.query_scalar(key, path)?.max(0.0) as usize)
}

/// Points along x or y: `inner`, plus the innermost guard layer if asked.
fn guarded_length(inner: usize, ng: usize, include_guards: bool) -> usize {
    if include_guards {
        inner + 2 * ng.min(1)
    } else {
        inner
    }
}

/// One dump folder held in memory.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// Radial points without guards.
    pub nx: usize,
    /// Axial points without guards.
    pub ny: usize,
    scalars: HashMap<String, f64>,
    arrays: HashMap<String, ArrayD<f64>>,
    options: InputOptions,
}

impl Dataset {
    /// Cylinder dump with the grid metadata every CELMA run writes.
    #[allow(clippy::too_many_arguments)]
    pub fn cylinder(
        nx: usize,
        ny: usize,
        mz: usize,
        mxg: usize,
        myg: usize,
        dx: f64,
        dy: f64,
        dz: f64,
    ) -> Self {
        let mut ds = Dataset {
            nx,
            ny,
            ..Default::default()
        };
        ds.set_scalar("dx", dx)
            .set_scalar("dy", dy)
            .set_scalar("dz", dz)
            .set_scalar("MXG", mxg as f64)
            .set_scalar("MYG", myg as f64)
            .set_scalar("MZ", mz as f64);
        ds
    }

    pub fn set_scalar(&mut self, name: &str, value: f64) -> &mut Self {
        self.scalars.insert(name.to_string(), value);
        self
    }

    pub fn remove_scalar(&mut self, name: &str) -> &mut Self {
        self.scalars.remove(name);
        self
    }

    /// Store an array including guard cells.
    pub fn set_array(&mut self, name: &str, values: ArrayD<f64>) -> &mut Self {
        self.arrays.insert(name.to_string(), values);
        self
    }

    pub fn set_time(&mut self, t: Vec<f64>) -> &mut Self {
        self.arrays
            .insert(T_ARRAY.to_string(), Array1::from(t).into_dyn());
        self
    }

    pub fn set_option(&mut self, section: &str, key: &str, value: &str) -> &mut Self {
        self.options.set(section, key, value);
        self
    }
}

/// In-memory store keyed by dump path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    datasets: HashMap<String, Dataset>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: &str, dataset: Dataset) {
        self.datasets.insert(path.to_string(), dataset);
    }

    pub fn dataset_mut(&mut self, path: &str) -> Option<&mut Dataset> {
        self.datasets.get_mut(path)
    }

    fn dataset(&self, path: &str) -> CelmaResult<&Dataset> {
        self.datasets.get(path).ok_or_else(|| {
            CelmaError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no dataset at '{path}'"),
            ))
        })
    }
}

impl DataStore for MemoryStore {
    fn query_length(&self, path: &str, dim: Dimension, include_guards: bool) -> CelmaResult<usize> {
        let ds = self.dataset(path)?;
        match dim {
            Dimension::X => {
                let mxg = guard_count(self, "MXG", path)?;
                Ok(guarded_length(ds.nx, mxg, include_guards))
            }
            Dimension::Y => {
                let myg = guard_count(self, "MYG", path)?;
                Ok(guarded_length(ds.ny, myg, include_guards))
            }
            // The last plane duplicates the first and is not stored
            Dimension::Z => Ok((self.query_scalar("MZ", path)? as usize).saturating_sub(1)),
            Dimension::T => ds
                .arrays
                .get(T_ARRAY)
                .map(|t| t.len())
                .ok_or_else(|| not_found(T_ARRAY, path)),
        }
    }

    fn query_array(
        &self,
        name: &str,
        path: &str,
        request: &CollectRequest,
    ) -> CelmaResult<ArrayD<f64>> {
        let ds = self.dataset(path)?;
        let raw = ds.arrays.get(name).ok_or_else(|| not_found(name, path))?;
        let mxg = guard_count(self, "MXG", path)?;
        let myg = guard_count(self, "MYG", path)?;
        select(raw, request, mxg, myg)
    }

    fn query_scalar(&self, name: &str, path: &str) -> CelmaResult<f64> {
        let ds = self.dataset(path)?;
        ds.scalars
            .get(name)
            .copied()
            .ok_or_else(|| not_found(name, path))
    }

    fn query_input_option(
        &self,
        path: &str,
        section: &str,
        key: &str,
    ) -> CelmaResult<Option<String>> {
        let ds = self.dataset(path)?;
        Ok(ds.options.get(section, key).map(str::to_string))
    }
}

/// Dump folders on disk: `<path>/<name>.npy` plus `<path>/BOUT.inp`.
///
/// `dx` and `dy` are 2-D `[x, y]` arrays including guards, so their shape
/// gives the radial and axial lengths.
#[derive(Debug, Clone, Default)]
pub struct DirectoryStore {
    root: Option<PathBuf>,
}

impl DirectoryStore {
    /// Paths are used as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths are resolved relative to `root`.
    pub fn with_root(root: &str) -> Self {
        DirectoryStore {
            root: Some(PathBuf::from(root)),
        }
    }

    fn folder(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }

    fn read(&self, name: &str, path: &str) -> CelmaResult<ArrayD<f64>> {
        let file = self.folder(path).join(format!("{name}.npy"));
        if !file.is_file() {
            return Err(not_found(name, path));
        }
        log::debug!("reading {}", file.display());
        Ok(ndarray_npy::read_npy::<_, ArrayD<f64>>(&file)?)
    }
}

impl DataStore for DirectoryStore {
    fn query_length(&self, path: &str, dim: Dimension, include_guards: bool) -> CelmaResult<usize> {
        match dim {
            Dimension::X | Dimension::Y => {
                let (key, guard_key, axis) = if dim == Dimension::X {
                    ("dx", "MXG", 0)
                } else {
                    ("dy", "MYG", 1)
                };
                let spacing = self.read(key, path)?;
                if spacing.ndim() != 2 {
                    return Err(CelmaError::ShapeMismatch(format!(
                        "'{key}' must be 2-D [x, y], got shape {:?}",
                        spacing.shape()
                    )));
                }
                let total = spacing.len_of(Axis(axis));
                let ng = guard_count(self, guard_key, path)?;
                Ok(guarded_length(total.saturating_sub(2 * ng), ng, include_guards))
            }
            Dimension::Z => Ok((self.query_scalar("MZ", path)? as usize).saturating_sub(1)),
            Dimension::T => Ok(self.read(T_ARRAY, path)?.len()),
        }
    }

    fn query_array(
        &self,
        name: &str,
        path: &str,
        request: &CollectRequest,
    ) -> CelmaResult<ArrayD<f64>> {
        let raw = self.read(name, path)?;
        let mxg = guard_count(self, "MXG", path)?;
        let myg = guard_count(self, "MYG", path)?;
        select(&raw, request, mxg, myg)
    }

    /// Scalars may be stored 0-D or as any array; the first element is used,
    /// as for the constant spacing arrays.
    fn query_scalar(&self, name: &str, path: &str) -> CelmaResult<f64> {
        let arr = self.read(name, path)?;
        arr.iter().next().copied().ok_or_else(|| {
            CelmaError::ShapeMismatch(format!("'{name}' in {path} is empty"))
        })
    }

    fn query_input_option(
        &self,
        path: &str,
        section: &str,
        key: &str,
    ) -> CelmaResult<Option<String>> {
        let file = self.folder(path).join(INPUT_FILE);
        if !file.is_file() {
            return Ok(None);
        }
        let opts = InputOptions::from_file(&file.to_string_lossy())?;
        Ok(opts.get(section, key).map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array4, IxDyn};

    const PATH: &str = "run/a";

    /// 4 radial, 3 axial, MZ = 5, one guard each side in x and y.
    fn store() -> MemoryStore {
        let mut ds = Dataset::cylinder(4, 3, 5, 1, 1, 0.1, 0.2, 0.3);
        ds.set_time(vec![0.0, 1.0, 2.0]);
        // Value encodes its raw index: 1000 t + 100 x + 10 y + z
        let field = Array4::from_shape_fn((3, 6, 5, 4), |(t, x, y, z)| {
            (1000 * t + 100 * x + 10 * y + z) as f64
        });
        ds.set_array("n", field.into_dyn());
        let mut store = MemoryStore::new();
        store.insert(PATH, ds);
        store
    }

    #[test]
    fn test_lengths_respect_guards() {
        let s = store();
        assert_eq!(s.query_length(PATH, Dimension::X, false).unwrap(), 4);
        assert_eq!(s.query_length(PATH, Dimension::X, true).unwrap(), 6);
        assert_eq!(s.query_length(PATH, Dimension::Y, false).unwrap(), 3);
        assert_eq!(s.query_length(PATH, Dimension::Y, true).unwrap(), 5);
        assert_eq!(s.query_length(PATH, Dimension::Z, true).unwrap(), 4);
        assert_eq!(s.query_length(PATH, Dimension::T, false).unwrap(), 3);
    }

    #[test]
    fn test_full_collect_strips_guards() {
        let s = store();
        let arr = s.query_array("n", PATH, &CollectRequest::default()).unwrap();
        assert_eq!(arr.shape(), &[3, 4, 3, 4]);
        // First interior point is raw (x=1, y=1)
        assert_eq!(arr[IxDyn(&[0, 0, 0, 0])], 110.0);
    }

    #[test]
    fn test_collect_with_guards_and_ranges() {
        let s = store();
        let req = CollectRequest {
            x: Some(IndexRange::single(0)),
            t: Some(IndexRange::new(1, 2)),
            xguards: true,
            ..Default::default()
        };
        let arr = s.query_array("n", PATH, &req).unwrap();
        assert_eq!(arr.shape(), &[2, 1, 3, 4]);
        // Guard point x=0 kept, y guards stripped
        assert_eq!(arr[IxDyn(&[0, 0, 0, 2])], 1000.0 + 10.0 + 2.0);
    }

    #[test]
    fn test_wide_guards_keep_innermost_layer() {
        // MXG = 3: raw x runs 0..10, inner points 3..=6
        let mut ds = Dataset::cylinder(4, 3, 5, 3, 1, 0.1, 0.2, 0.3);
        ds.set_time(vec![0.0]);
        let field = Array4::from_shape_fn((1, 10, 5, 4), |(_, x, y, z)| (100 * x + 10 * y + z) as f64);
        ds.set_array("n", field.into_dyn());
        let mut s = MemoryStore::new();
        s.insert(PATH, ds);

        assert_eq!(s.query_length(PATH, Dimension::X, true).unwrap(), 6);
        let req = CollectRequest {
            xguards: true,
            ..Default::default()
        };
        let arr = s.query_array("n", PATH, &req).unwrap();
        assert_eq!(arr.shape(), &[1, 6, 3, 4]);
        assert_eq!(arr[IxDyn(&[0, 0, 0, 0])], 210.0);
        assert_eq!(arr[IxDyn(&[0, 5, 0, 0])], 710.0);

        // A range indexes the guarded frame: 0 is the guard point
        let req = CollectRequest {
            x: Some(IndexRange::new(0, 1)),
            xguards: true,
            ..Default::default()
        };
        let arr = s.query_array("n", PATH, &req).unwrap();
        assert_eq!(arr.shape(), &[1, 2, 3, 4]);
        assert_eq!(arr[IxDyn(&[0, 1, 0, 0])], 310.0);
    }

    #[test]
    fn test_collect_out_of_range() {
        let s = store();
        let req = CollectRequest {
            z: Some(IndexRange::new(0, 4)),
            ..Default::default()
        };
        let err = s.query_array("n", PATH, &req).unwrap_err();
        assert!(matches!(
            err,
            CelmaError::IndexOutOfRange {
                dimension: Dimension::Z,
                length: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_names() {
        let s = store();
        let err = s.query_scalar("Te0", PATH).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(s.query_scalar_opt("Te0", PATH).unwrap(), None);
        assert_eq!(s.query_scalar_opt("dx", PATH).unwrap(), Some(0.1));
        assert!(s.query_array("phi", PATH, &CollectRequest::default()).is_err());
        // Unknown dataset is an IO failure, not an optional miss
        assert!(!s.query_scalar("dx", "nowhere").unwrap_err().is_not_found());
    }

    #[test]
    fn test_time_array_collect() {
        let s = store();
        let req = CollectRequest {
            t: Some(IndexRange::new(1, 2)),
            ..Default::default()
        };
        let t = s.query_array(T_ARRAY, PATH, &req).unwrap();
        assert_eq!(t.as_slice().unwrap(), &[1.0, 2.0]);
    }

    #[test]
    fn test_input_option_lookup() {
        let mut s = store();
        assert_eq!(s.query_input_option(PATH, "geom", "offset").unwrap(), None);
        s.dataset_mut(PATH)
            .unwrap()
            .set_option("geom", "offset", "2*0.5");
        assert_eq!(
            s.query_input_option(PATH, "geom", "offset").unwrap().as_deref(),
            Some("2*0.5")
        );
    }

    #[test]
    fn test_directory_store_missing_file_is_not_found() {
        let dir = std::env::temp_dir().join("celma_store_missing");
        let _ = std::fs::create_dir_all(&dir);
        let s = DirectoryStore::new();
        let err = s.query_scalar("omCI", &dir.to_string_lossy()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            s.query_input_option(&dir.to_string_lossy(), "geom", "offset")
                .unwrap(),
            None
        );
    }
}
