// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Normalized And Physical Units
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Conversion between the normalized units of the solver and SI units.
//!
//! The normalization uses ω_ci for time, ρ_s for lengths, n_0 for densities
//! and T_e0 for the potential. Label and unit strings are LaTeX without the
//! surrounding `$`.

use crate::store::DataStore;
use celma_types::constants::{M_ELECTRON, M_PROTON, NORMALIZERS, Q_ELECTRON};
use celma_types::error::CelmaResult;
use celma_types::state::NormalizationConstants;
use ndarray::{Array, Dimension};

/// Class of a named quantity in the conversion table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Density,
    Vorticity,
    VorticityDensity,
    Potential,
    ParallelCurrent,
    MomentumDensity,
    Velocity,
    Source,
    Time,
    Length,
    /// Electron energy integrals, stored without the mass.
    ElectronEnergy,
    /// Ion energy integrals, stored without the mass.
    IonEnergy,
    Unrecognized,
}

impl Quantity {
    /// Exact names first, then the "EE" and "EI" substrings.
    pub fn classify(name: &str) -> Quantity {
        match name {
            "n" => Quantity::Density,
            "vort" => Quantity::Vorticity,
            "vortD" => Quantity::VorticityDensity,
            "phi" => Quantity::Potential,
            "jPar" => Quantity::ParallelCurrent,
            "momDensPar" => Quantity::MomentumDensity,
            "uIPar" | "uEPar" | "u" => Quantity::Velocity,
            "S" => Quantity::Source,
            "t" => Quantity::Time,
            "rho" | "z" => Quantity::Length,
            _ if name.contains("EE") => Quantity::ElectronEnergy,
            _ if name.contains("EI") => Quantity::IonEnergy,
            _ => Quantity::Unrecognized,
        }
    }

    /// Multiplicative factor taking normalized values to SI.
    pub fn physical_factor(self, c: &NormalizationConstants) -> f64 {
        let cs = c.sound_speed();
        match self {
            Quantity::Density => c.n0,
            Quantity::Vorticity => c.om_ci,
            Quantity::VorticityDensity | Quantity::Source => c.om_ci * c.n0,
            Quantity::Potential => c.te0 / Q_ELECTRON,
            Quantity::ParallelCurrent => Q_ELECTRON * cs * c.n0,
            // momDensPar is stored divided by the ion mass
            Quantity::MomentumDensity => M_PROTON * cs * c.n0,
            Quantity::Velocity => cs,
            Quantity::Time => 1.0 / c.om_ci,
            Quantity::Length => c.rho_s,
            Quantity::ElectronEnergy => M_ELECTRON * c.n0 * cs.powi(2) * c.rho_s.powi(3),
            Quantity::IonEnergy => M_PROTON * c.n0 * cs.powi(2) * c.rho_s.powi(3),
            Quantity::Unrecognized => 1.0,
        }
    }

    /// Factor applied when staying in normalized units.
    pub fn normalized_factor(self) -> f64 {
        match self {
            Quantity::ElectronEnergy => M_ELECTRON / M_PROTON,
            _ => 1.0,
        }
    }

    pub fn units(self) -> &'static str {
        match self {
            Quantity::Density => r"\mathrm{m}^{-3}",
            Quantity::Vorticity => r"\mathrm{s}^{-1}",
            Quantity::VorticityDensity | Quantity::Source => r"\mathrm{m}^{-3}\mathrm{s}^{-1}",
            Quantity::Potential => r"\mathrm{J}\mathrm{C}^{-1}",
            Quantity::ParallelCurrent => r"\mathrm{C}\mathrm{s}^{-1}",
            Quantity::MomentumDensity => r"\mathrm{kg }\mathrm{m}^{-2}\mathrm{s}^{-1}",
            Quantity::Velocity => r"\mathrm{ms}^{-1}",
            Quantity::Time => r"\mathrm{s}",
            Quantity::Length => r"\mathrm{m}",
            Quantity::ElectronEnergy | Quantity::IonEnergy => r"\mathrm{kgm}^2\mathrm{s}^{-2}",
            Quantity::Unrecognized => " ",
        }
    }

    pub fn normalization(self) -> &'static str {
        match self {
            Quantity::Density => "/n_0",
            Quantity::Vorticity => r"/\omega_{ci}",
            Quantity::VorticityDensity | Quantity::Source => r"/\omega_{ci}n_0",
            Quantity::Potential => " q/T_{e,0}",
            Quantity::ParallelCurrent => "/n_0c_sq",
            Quantity::MomentumDensity => "/m_in_0c_s",
            Quantity::Velocity => "/c_s",
            Quantity::Time => r"\omega_{ci}",
            Quantity::Length => r"/\rho_s",
            Quantity::ElectronEnergy | Quantity::IonEnergy => r"/m_in_0c_s^2\rho_s^3",
            Quantity::Unrecognized => " ",
        }
    }
}

/// `(normalization, units)` for display. Exactly one of them is empty:
/// physical labels carry units, normalized labels carry the normalization.
pub fn normalization_label(name: &str, physical: bool) -> (&'static str, &'static str) {
    let q = Quantity::classify(name);
    if physical {
        ("", q.units())
    } else {
        (q.normalization(), "")
    }
}

/// Per-dataset converter holding the normalization constants read once.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitsConverter {
    constants: Option<NormalizationConstants>,
}

impl UnitsConverter {
    /// Stay in normalized units.
    pub fn normalized() -> Self {
        UnitsConverter { constants: None }
    }

    pub fn physical(constants: NormalizationConstants) -> Self {
        UnitsConverter {
            constants: Some(constants),
        }
    }

    /// Reads `omCI`, `rhoS`, `n0` and `Te0` from `path`.
    ///
    /// If any of them is missing the converter falls back to normalized
    /// units for every quantity and warns once. Other store failures
    /// propagate.
    pub fn from_store(
        store: &dyn DataStore,
        path: &str,
        convert_to_physical: bool,
    ) -> CelmaResult<Self> {
        if !convert_to_physical {
            return Ok(Self::normalized());
        }

        let mut values = [0.0; 4];
        let mut missing = Vec::new();
        for (slot, name) in values.iter_mut().zip(NORMALIZERS) {
            match store.query_scalar_opt(name, path)? {
                Some(v) => *slot = v,
                None => missing.push(name),
            }
        }

        if !missing.is_empty() {
            log::warn!(
                "normalization constants {} not found in {path}, quantities stay normalized",
                missing.join(", ")
            );
            return Ok(Self::normalized());
        }

        let [om_ci, rho_s, n0, te0] = values;
        Ok(Self::physical(NormalizationConstants {
            om_ci,
            rho_s,
            n0,
            te0,
        }))
    }

    pub fn is_physical(&self) -> bool {
        self.constants.is_some()
    }

    pub fn constants(&self) -> Option<&NormalizationConstants> {
        self.constants.as_ref()
    }

    /// Factor applied to values of `name` by [`UnitsConverter::to_physical`].
    pub fn factor(&self, name: &str) -> f64 {
        let q = Quantity::classify(name);
        match &self.constants {
            Some(c) => q.physical_factor(c),
            None => q.normalized_factor(),
        }
    }

    /// Values of `name` as they are displayed: SI when physical, otherwise
    /// normalized (with the mass-ratio correction of electron energies).
    pub fn to_physical<D: Dimension>(&self, values: Array<f64, D>, name: &str) -> Array<f64, D> {
        let factor = self.factor(name);
        if factor == 1.0 {
            return values;
        }
        values * factor
    }

    pub fn scalar_to_physical(&self, value: f64, name: &str) -> f64 {
        value * self.factor(name)
    }

    /// Normalization string, empty in physical mode.
    pub fn normalization(&self, name: &str) -> &'static str {
        normalization_label(name, self.is_physical()).0
    }

    /// Units string, empty in normalized mode.
    pub fn units(&self, name: &str) -> &'static str {
        normalization_label(name, self.is_physical()).1
    }
}
