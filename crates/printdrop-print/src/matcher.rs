// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer selection by name substring.

use printdrop_core::error::{PrintdropError, Result};
use printdrop_core::types::PrinterRecord;

/// Picks the target printer from an enumeration.
///
/// A printer matches when its display name contains the pattern, compared
/// case-insensitively.  There is no scoring: the first match in enumeration
/// order wins, and enumeration order is whatever the OS reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterMatcher {
    pattern: String,
    needle: String,
}

impl PrinterMatcher {
    /// Create a matcher for `pattern`. An empty pattern would match every
    /// printer and is rejected.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(PrintdropError::Config("printer pattern must not be empty".into()));
        }
        let needle = pattern.to_uppercase();
        Ok(Self { pattern, needle })
    }

    /// The pattern as configured.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn matches(&self, display_name: &str) -> bool {
        display_name.to_uppercase().contains(&self.needle)
    }

    /// First printer whose name contains the pattern.
    pub fn select<'a>(&self, printers: &'a [PrinterRecord]) -> Option<&'a PrinterRecord> {
        printers.iter().find(|p| self.matches(&p.display_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(names: &[&str]) -> Vec<PrinterRecord> {
        names.iter().copied().map(PrinterRecord::new).collect()
    }

    #[test]
    fn single_match_ignores_case() {
        let matcher = PrinterMatcher::new("HP LASERJET P1007").unwrap();
        let printers = records(&["Microsoft XPS", "HP LaserJet P1007 Series"]);
        assert_eq!(
            matcher.select(&printers).map(|p| p.display_name.as_str()),
            Some("HP LaserJet P1007 Series")
        );
    }

    #[test]
    fn first_of_several_matches_wins() {
        let matcher = PrinterMatcher::new("hp laserjet p1007").unwrap();
        let printers = records(&["HP LaserJet P1007 (1)", "HP LaserJet P1007 (2)"]);
        for _ in 0..3 {
            assert_eq!(
                matcher.select(&printers).unwrap().display_name,
                "HP LaserJet P1007 (1)"
            );
        }

        let reversed = records(&["HP LaserJet P1007 (2)", "HP LaserJet P1007 (1)"]);
        assert_eq!(
            matcher.select(&reversed).unwrap().display_name,
            "HP LaserJet P1007 (2)"
        );
    }

    #[test]
    fn substring_anywhere_in_the_name() {
        let matcher = PrinterMatcher::new("LaserJet P1007").unwrap();
        assert!(matcher.matches("\\\\print-server\\HP LaserJet P1007 on LPT1"));
        assert!(!matcher.matches("HP LaserJet P1008"));
    }

    #[test]
    fn no_match_yields_none() {
        let matcher = PrinterMatcher::new("HP LaserJet P1007").unwrap();
        assert!(matcher.select(&records(&["Microsoft XPS", "Fax"])).is_none());
        assert!(matcher.select(&[]).is_none());
    }

    #[test]
    fn empty_pattern_is_rejected() {
        assert!(PrinterMatcher::new("").is_err());
        assert!(PrinterMatcher::new("   ").is_err());
    }
}
