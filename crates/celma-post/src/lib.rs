// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Post-Processing
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Collect-and-calculate drivers and plot preparation on top of celma-core.

pub mod collect;
pub mod labels;
pub mod plot;
pub mod scan;
