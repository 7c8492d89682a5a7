// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{CelmaError, CelmaResult};
use crate::state::{Dimension, SliceSpec};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Post-processing applied to a collected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Processing {
    /// <f>_θ
    PolAvg,
    /// <<f>_θ>_t
    PolAndTimeAvg,
    /// f - <f>_θ
    PolAvgFluct,
    /// f - <<f>_θ>_t
    PolAndTimeAvgFluct,
}

impl Processing {
    pub fn is_time_averaged(self) -> bool {
        matches!(
            self,
            Processing::PolAndTimeAvg | Processing::PolAndTimeAvgFluct
        )
    }

    pub fn is_fluctuation(self) -> bool {
        matches!(
            self,
            Processing::PolAvgFluct | Processing::PolAndTimeAvgFluct
        )
    }
}

/// One analysis request against a single dump folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Variable to collect, e.g. "n" or "jPar".
    pub var_name: String,
    #[serde(default)]
    pub xguards: bool,
    #[serde(default)]
    pub yguards: bool,
    #[serde(default)]
    pub convert_to_physical: bool,
    #[serde(default)]
    pub x_slice: SliceSpec,
    #[serde(default)]
    pub y_slice: SliceSpec,
    #[serde(default)]
    pub z_slice: SliceSpec,
    #[serde(default)]
    pub t_slice: SliceSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing: Option<Processing>,
}

impl AnalysisConfig {
    pub fn new(var_name: &str) -> Self {
        AnalysisConfig {
            var_name: var_name.to_string(),
            xguards: false,
            yguards: false,
            convert_to_physical: false,
            x_slice: SliceSpec::Unspecified,
            y_slice: SliceSpec::Unspecified,
            z_slice: SliceSpec::Unspecified,
            t_slice: SliceSpec::Unspecified,
            processing: None,
        }
    }

    /// Load from a JSON file.
    pub fn from_file(path: &str) -> CelmaResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CelmaResult<()> {
        if self.var_name.trim().is_empty() {
            return Err(CelmaError::ConfigError(
                "analysis requires a non-empty varName".into(),
            ));
        }
        Ok(())
    }

    pub fn slice(&self, dim: Dimension) -> SliceSpec {
        match dim {
            Dimension::X => self.x_slice,
            Dimension::Y => self.y_slice,
            Dimension::Z => self.z_slice,
            Dimension::T => self.t_slice,
        }
    }
}

/// Presentation settings handed to the plot layer.
///
/// Replaces the shared class-level table of display names with a value
/// that is built once and passed by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotConfig {
    /// LaTeX display name per variable, without surrounding `$`.
    #[serde(default = "default_var_plot_names")]
    pub var_plot_names: BTreeMap<String, String>,
    /// Significant digits used when a coordinate value enters a title.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    3
}

fn default_var_plot_names() -> BTreeMap<String, String> {
    let table: [(&str, &str); 24] = [
        ("lnN", r"\ln(n)"),
        ("n", "n"),
        ("jPar", r"j_{\parallel}"),
        ("phi", r"\phi"),
        ("vort", r"\Omega"),
        ("vortD", r"\Omega^D"),
        ("momDensPar", r"nu_{i,\parallel}"),
        ("uIPar", r"u_{i,\parallel}"),
        ("uEPar", r"u_{e,\parallel}"),
        ("S", "S"),
        ("ddt(lnN)", r"\partial_t \ln(n)"),
        ("ddt(jPar)", r"\partial_t j_{\parallel}"),
        ("ddt(vortD)", r"\partial_t \Omega^D"),
        ("ddt(vort)", r"\partial_t \Omega"),
        ("ddt(momDensPar)", r"\partial_t (nu_{i,\parallel})"),
        ("lnNAdv", r"-\frac{1}{JB}\{\phi,\ln(n)\}"),
        ("gradUEPar", r"-\partial_{\parallel}u_{e,\parallel}"),
        ("srcN", r"\frac{S}{n}"),
        ("jParRes", r"-0.51\nu_{ei}j_\parallel"),
        ("elField", r"-\mu n \partial_{\parallel}\phi"),
        ("vortNeutral", r"-\nu_{in}n\Omega"),
        ("divParCur", r"\partial_{\parallel}j_{\parallel}"),
        ("B0", "B_0"),
        ("nn", "n_n"),
    ];
    table
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            var_plot_names: default_var_plot_names(),
            precision: default_precision(),
        }
    }
}

impl PlotConfig {
    pub fn from_file(path: &str) -> CelmaResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Display name of a variable; unknown names are shown verbatim.
    pub fn var_plot_name<'a>(&'a self, var: &'a str) -> &'a str {
        self.var_plot_names
            .get(var)
            .map(String::as_str)
            .unwrap_or(var)
    }
}
