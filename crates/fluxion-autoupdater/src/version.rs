// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Version comparison module

/// Returns true if the published version differs from the running one.
///
/// This is a plain string comparison, not semver ordering: "1.0" and "1.0.0"
/// count as different versions, and an older published version is still
/// reported as an update.
///
/// Manifest values are trimmed when parsed, so whitespace around a published
/// `<version>` never counts as a difference. `current` is compared as given.
pub fn update_available(current: &str, resolved: &str) -> bool {
    current != resolved
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_available() {
        assert!(update_available("1.0", "2.0"));
        // Same version
        assert!(!update_available("2.0", "2.0"));
        // Downgrade is still "available"
        assert!(update_available("2.0", "1.0"));
    }

    #[test]
    fn test_no_semver_normalisation() {
        assert!(update_available("1.0", "1.0.0"));
        assert!(update_available("v1.0", "1.0"));
        assert!(update_available("1.0", "1.0 "));
    }
}
