// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Axis Labels
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! LaTeX labels and titles for the coordinates and variables of a dataset.

use celma_core::units::UnitsConverter;
use celma_types::config::PlotConfig;

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// `%g`-style number with `precision` significant digits, wrapped in `$`.
/// Large and small magnitudes are written as `m\cdot 10^{e}`.
pub fn format_number(value: f64, precision: usize) -> String {
    let precision = precision.max(1);
    if value == 0.0 {
        return "$0$".to_string();
    }
    if !value.is_finite() {
        return format!("${value}$");
    }
    let sci = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exponent)) = sci.split_once('e') else {
        return format!("${sci}$");
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent < -4 || exponent >= precision as i32 {
        format!(r"${}\cdot 10^{{{}}}$", trim_zeros(mantissa), exponent)
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        let fixed = format!("{:.*}", decimals, value);
        format!("${}$", trim_zeros(&fixed))
    }
}

/// Text pieces for one coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisText {
    pub normalization: &'static str,
    pub units: &'static str,
    /// Symbol with its normalization, e.g. `$\rho/\rho_s$`.
    pub txt: String,
    /// Axis label; carries the units in physical mode.
    pub label: String,
    physical: bool,
}

impl AxisText {
    fn new(symbol: &str, name: &str, converter: &UnitsConverter) -> Self {
        let physical = converter.is_physical();
        let normalization = converter.normalization(name);
        let units = converter.units(name);
        let txt = format!("${symbol}{normalization}$");
        let label = if physical {
            format!("{txt} $[{units}]$")
        } else {
            txt.clone()
        };
        AxisText {
            normalization,
            units,
            txt,
            label,
            physical,
        }
    }

    /// Title fragment for a fixed coordinate value.
    pub fn constant(&self, value: f64, precision: usize) -> String {
        let value = format_number(value, precision);
        if self.physical {
            format!("{} $=$ {} ${}$", self.txt, value, self.units)
        } else {
            format!("{} $=$ {}", self.txt, value)
        }
    }
}

/// Label set of one dataset, built from its units converter.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabels {
    pub rho: AxisText,
    pub z: AxisText,
    pub t: AxisText,
    physical: bool,
}

impl AxisLabels {
    pub fn new(converter: &UnitsConverter) -> Self {
        AxisLabels {
            rho: AxisText::new(r"\rho", "rho", converter),
            z: AxisText::new("z", "z", converter),
            t: AxisText::new("t", "t", converter),
            physical: converter.is_physical(),
        }
    }

    pub fn is_physical(&self) -> bool {
        self.physical
    }

    /// θ label in degrees.
    pub fn theta_label(&self) -> String {
        r"$\theta$ $[^{\circ}]$".to_string()
    }

    /// Fixed θ, given in radians and shown in whole degrees.
    pub fn theta_constant(&self, theta: f64) -> String {
        format!(r"$\theta={}^{{\circ}}$", theta.to_degrees().round() as i64)
    }

    /// Label of a variable, e.g. `$n/n_0$` or `$n$ $[\mathrm{m}^{-3}]$`.
    pub fn var_label(&self, var: &str, converter: &UnitsConverter, config: &PlotConfig) -> String {
        self.quantity_label(config.var_plot_name(var), var, converter)
    }

    /// Like [`AxisLabels::var_label`] with the display name already chosen.
    pub fn quantity_label(&self, display: &str, var: &str, converter: &UnitsConverter) -> String {
        if self.physical {
            format!("${display}$ $[{}]$", converter.units(var))
        } else {
            format!("${display}{}$", converter.normalization(var))
        }
    }
}
