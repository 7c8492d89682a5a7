// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
/// Elementary charge (C), CODATA 2018 exact.
pub const Q_ELECTRON: f64 = 1.602176634e-19;

/// Proton mass (kg), CODATA 2018.
pub const M_PROTON: f64 = 1.67262192369e-27;

/// Electron mass (kg), CODATA 2018.
pub const M_ELECTRON: f64 = 9.1093837015e-31;

/// Store names of the four normalization constants, in lookup order.
pub const NORMALIZERS: [&str; 4] = ["omCI", "rhoS", "n0", "Te0"];

/// Name of the stored time trace.
pub const T_ARRAY: &str = "t_array";

/// Input-file section and key of the optional annulus offset.
pub const GEOM_SECTION: &str = "geom";
pub const OFFSET_KEY: &str = "offset";

/// Name of the solver input file inside a dump folder.
pub const INPUT_FILE: &str = "BOUT.inp";
