// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Slice To Index Resolution
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Turns a [`SliceSpec`] into the inclusive `[start, stop]` pair the store
//! collects with.
//!
//! Negative bounds are remapped as `length + bound - 1`, so `-1` selects the
//! second-to-last point. Every collection script of the CELMA runs uses
//! this convention and plots depend on it; it is kept as is.

use crate::store::DataStore;
use celma_types::error::{CelmaError, CelmaResult};
use celma_types::state::{Dimension, IndexRange, SliceSpec};

/// Resolves slices against one dump folder.
pub struct IndexResolver<'a> {
    store: &'a dyn DataStore,
    path: &'a str,
}

impl<'a> IndexResolver<'a> {
    pub fn new(store: &'a dyn DataStore, path: &'a str) -> Self {
        IndexResolver { store, path }
    }

    /// `None` means "do not restrict this dimension".
    ///
    /// The store is queried for the dimension length at most once, and only
    /// when a bound is negative or the stop is open.
    pub fn resolve(
        &self,
        spec: SliceSpec,
        dim: Dimension,
        guards_included: bool,
    ) -> CelmaResult<Option<IndexRange>> {
        let mut length: Option<usize> = None;
        let mut dim_len = || -> CelmaResult<usize> {
            if let Some(len) = length {
                return Ok(len);
            }
            let len = self.store.query_length(self.path, dim, guards_included)?;
            length = Some(len);
            Ok(len)
        };

        let (start, stop) = match spec {
            SliceSpec::Unspecified => return Ok(None),
            SliceSpec::Index(i) => (i, i),
            SliceSpec::Range { start, stop, step } => {
                match step {
                    // Strided by the collectors after collection
                    Some(step) if dim == Dimension::T => {
                        log::debug!("t slice step {step} left to the collector");
                    }
                    Some(step) => {
                        log::warn!("{dim} slice step {step} not implemented, ignoring it");
                    }
                    None => {}
                }
                let start = start.unwrap_or(0);
                let stop = match stop {
                    Some(stop) => stop,
                    // Indices count from 0
                    None => dim_len()? as i64 - 1,
                };
                (start, stop)
            }
        };

        let start = remap_negative(start, dim, &mut dim_len)?;
        let stop = remap_negative(stop, dim, &mut dim_len)?;

        if stop < start {
            return Err(CelmaError::InvalidSlice {
                dimension: dim,
                message: format!("stop {stop} precedes start {start}"),
            });
        }

        Ok(Some(IndexRange::new(start, stop)))
    }
}

fn remap_negative(
    index: i64,
    dim: Dimension,
    dim_len: &mut impl FnMut() -> CelmaResult<usize>,
) -> CelmaResult<usize> {
    if index >= 0 {
        return Ok(index as usize);
    }
    let length = dim_len()?;
    let real = length as i64 + index - 1;
    if real < 0 {
        return Err(CelmaError::IndexOutOfRange {
            dimension: dim,
            index,
            length,
        });
    }
    Ok(real as usize)
}
