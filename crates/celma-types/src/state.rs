// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use ndarray::Array4;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field laid out as [t, x, y, z] (time, radial, axial, poloidal angle).
pub type Field4 = Array4<f64>;

/// Dump dimension. x is radial, y axial, z the poloidal angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    X,
    Y,
    Z,
    T,
}

impl Dimension {
    /// Axis of this dimension in the [t, x, y, z] field layout.
    pub fn axis(self) -> usize {
        match self {
            Dimension::T => 0,
            Dimension::X => 1,
            Dimension::Y => 2,
            Dimension::Z => 3,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::X => "x",
            Dimension::Y => "y",
            Dimension::Z => "z",
            Dimension::T => "t",
        };
        f.write_str(name)
    }
}

/// User-supplied selection for one dimension.
///
/// JSON form: `null`, an integer, or `{"start": .., "stop": .., "step": ..}`
/// with every key optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SliceSpec {
    #[default]
    Unspecified,
    Index(i64),
    Range {
        #[serde(default)]
        start: Option<i64>,
        #[serde(default)]
        stop: Option<i64>,
        #[serde(default)]
        step: Option<i64>,
    },
}

impl SliceSpec {
    /// `start..` with no stop and no step.
    pub fn open(start: i64) -> Self {
        SliceSpec::Range {
            start: Some(start),
            stop: None,
            step: None,
        }
    }

    /// `start..=stop` in store convention.
    pub fn range(start: i64, stop: i64) -> Self {
        SliceSpec::Range {
            start: Some(start),
            stop: Some(stop),
            step: None,
        }
    }

    /// The whole dimension, spelled as an explicit range.
    pub fn full() -> Self {
        SliceSpec::open(0)
    }

    pub fn step(&self) -> Option<i64> {
        match self {
            SliceSpec::Range { step, .. } => *step,
            _ => None,
        }
    }
}

/// Resolved selection. Both bounds are inclusive, as the store expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexRange {
    pub start: usize,
    pub stop: usize,
}

impl IndexRange {
    pub fn new(start: usize, stop: usize) -> Self {
        IndexRange { start, stop }
    }

    pub fn single(index: usize) -> Self {
        IndexRange {
            start: index,
            stop: index,
        }
    }

    /// Number of points selected.
    pub fn count(&self) -> usize {
        self.stop.saturating_sub(self.start) + 1
    }

    pub fn is_single(&self) -> bool {
        self.start == self.stop
    }
}

/// Independent optional restriction per dimension, passed to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CollectRequest {
    pub x: Option<IndexRange>,
    pub y: Option<IndexRange>,
    pub z: Option<IndexRange>,
    pub t: Option<IndexRange>,
    pub xguards: bool,
    pub yguards: bool,
}

impl CollectRequest {
    pub fn range(&self, dim: Dimension) -> Option<IndexRange> {
        match dim {
            Dimension::X => self.x,
            Dimension::Y => self.y,
            Dimension::Z => self.z,
            Dimension::T => self.t,
        }
    }

    pub fn set_range(&mut self, dim: Dimension, range: Option<IndexRange>) {
        match dim {
            Dimension::X => self.x = range,
            Dimension::Y => self.y = range,
            Dimension::Z => self.z = range,
            Dimension::T => self.t = range,
        }
    }

    pub fn guards(&self, dim: Dimension) -> bool {
        match dim {
            Dimension::X => self.xguards,
            Dimension::Y => self.yguards,
            _ => false,
        }
    }
}

/// Characteristic plasma quantities used to leave normalized units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizationConstants {
    /// Ion cyclotron frequency ω_ci [s⁻¹].
    pub om_ci: f64,
    /// Ion sound gyro-radius ρ_s [m].
    pub rho_s: f64,
    /// Reference density n_0 [m⁻³].
    pub n0: f64,
    /// Reference electron temperature T_e0 [J].
    pub te0: f64,
}

impl NormalizationConstants {
    /// Ion sound speed c_s = ρ_s ω_ci [m s⁻¹].
    pub fn sound_speed(&self) -> f64 {
        self.rho_s * self.om_ci
    }
}
