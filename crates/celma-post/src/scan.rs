// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Scan Path Templating
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Scan folders encode their parameters as `name_value` tokens, e.g.
//! `scan/geom_Lx_7.86_len_10/B0_0.06`. [`ScanPath`] parses those tokens so
//! that values can be read and replaced by name.
//!
//! Values containing `_` cannot be represented.

use celma_types::error::{CelmaError, CelmaResult};

/// Location of one value token.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Slot {
    key: String,
    segment: usize,
    token: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPath {
    /// `/`-separated segments, each split on `_`.
    segments: Vec<Vec<String>>,
    slots: Vec<Slot>,
}

impl ScanPath {
    /// Parse `path`, locating every occurrence of each of `keys`.
    ///
    /// A key is a token directly followed by its value token. Every key must
    /// occur at least once.
    pub fn parse(path: &str, keys: &[&str]) -> CelmaResult<Self> {
        let segments: Vec<Vec<String>> = path
            .split('/')
            .map(|seg| seg.split('_').map(str::to_string).collect())
            .collect();

        let mut slots = Vec::new();
        for key in keys {
            let before = slots.len();
            for (s, tokens) in segments.iter().enumerate() {
                for (t, pair) in tokens.windows(2).enumerate() {
                    if pair[0] == *key {
                        slots.push(Slot {
                            key: key.to_string(),
                            segment: s,
                            token: t + 1,
                        });
                    }
                }
            }
            if slots.len() == before {
                return Err(CelmaError::ConfigError(format!(
                    "scan parameter '{key}' not found in '{path}'"
                )));
            }
        }

        Ok(ScanPath { segments, slots })
    }

    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for slot in &self.slots {
            if !keys.contains(&slot.key.as_str()) {
                keys.push(&slot.key);
            }
        }
        keys
    }

    /// Value at the first occurrence of `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|slot| slot.key == key)
            .map(|slot| self.segments[slot.segment][slot.token].as_str())
    }

    /// Replace every occurrence of `key` with `value`.
    pub fn set(&mut self, key: &str, value: &str) -> CelmaResult<()> {
        if value.contains('_') || value.contains('/') {
            return Err(CelmaError::ConfigError(format!(
                "scan value '{value}' for '{key}' contains a separator"
            )));
        }
        let mut found = false;
        for slot in self.slots.iter().filter(|slot| slot.key == key) {
            self.segments[slot.segment][slot.token] = value.to_string();
            found = true;
        }
        if !found {
            return Err(CelmaError::ConfigError(format!(
                "unknown scan parameter '{key}'"
            )));
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        self.segments
            .iter()
            .map(|tokens| tokens.join("_"))
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Path of the run to restart from: `template` (any folder of a previous
/// scan) with the scan values of `dump_folder` filled in.
pub fn restart_from(dump_folder: &str, template: &str, scan_parameters: &[&str]) -> CelmaResult<String> {
    let current = ScanPath::parse(dump_folder, scan_parameters)?;
    let mut target = ScanPath::parse(template, scan_parameters)?;
    for key in scan_parameters {
        let value = current.value(key).ok_or_else(|| {
            CelmaError::ConfigError(format!("scan parameter '{key}' has no value"))
        })?;
        target.set(key, value)?;
    }
    let restart = target.render();
    log::info!("restarting {dump_folder} from {restart}");
    Ok(restart)
}
