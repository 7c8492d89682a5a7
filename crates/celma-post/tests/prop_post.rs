// ─────────────────────────────────────────────────────────────────────
// CELMA Analysis — Property-Based Tests (proptest) for celma-post
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for celma-post using proptest.

use celma_post::labels::format_number;
use celma_post::scan::ScanPath;
use proptest::prelude::*;

proptest! {
    /// Substituted scan values read back after re-parsing the rendered path.
    #[test]
    fn scan_values_survive_render(
        b0 in "[0-9]{1,3}\\.[0-9]{1,3}",
        lx in "[0-9]{1,2}e[0-9]{1,2}",
    ) {
        let keys = ["B0", "Lx"];
        let mut path = ScanPath::parse("scan/B0_0.1_Lx_7.86/run_B0_0.1", &keys).unwrap();
        path.set("B0", &b0).unwrap();
        path.set("Lx", &lx).unwrap();

        let reparsed = ScanPath::parse(&path.render(), &keys).unwrap();
        prop_assert_eq!(reparsed.value("B0"), Some(b0.as_str()));
        prop_assert_eq!(reparsed.value("Lx"), Some(lx.as_str()));
        prop_assert_eq!(reparsed.render(), path.render());
    }

    /// Moderate magnitudes print in fixed notation close to the value.
    #[test]
    fn fixed_notation_is_accurate(value in 1.0e-3f64..1.0e3, negative in any::<bool>()) {
        let value = if negative { -value } else { value };
        let text = format_number(value, 6);
        prop_assert!(text.starts_with('$') && text.ends_with('$'));
        prop_assert!(!text.contains("cdot"));
        let parsed: f64 = text.trim_matches('$').parse().unwrap();
        prop_assert!(((parsed - value) / value).abs() < 1e-5, "{} -> {}", value, text);
    }

    /// Large magnitudes switch to a power of ten.
    #[test]
    fn large_values_use_scientific(value in 1.0e5f64..1.0e12) {
        let text = format_number(value, 3);
        prop_assert!(text.contains(r"\cdot 10^{"), "{}", text);
    }
}
