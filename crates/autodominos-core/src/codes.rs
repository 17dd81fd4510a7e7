//! Candidate promotional codes.
//!
//! The code list is a newline-delimited text file. Loading it normalizes the
//! file in place (lower-cased, trimmed, deduplicated, sorted) and then
//! expands every code into its lower- and upper-case variants, since the
//! remote acceptance check is not reliably case-insensitive.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use crate::ConfigError;

/// Normalizes the code file in place and returns the normalized codes.
///
/// Running it on an already-normalized file leaves the bytes untouched.
///
/// # Errors
///
/// Returns [`ConfigError::FileIo`] if the file cannot be read or rewritten.
pub fn normalize_codes_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let io_err = |source| ConfigError::FileIo {
        path: path.display().to_string(),
        source,
    };

    let raw = std::fs::read_to_string(path).map_err(io_err)?;
    let codes = normalize_codes(&raw);
    let rendered = codes.join("\n");

    if rendered != raw {
        std::fs::write(path, &rendered).map_err(io_err)?;
        tracing::info!(
            path = %path.display(),
            codes = codes.len(),
            "rewrote candidate code file in normalized form"
        );
    }

    Ok(codes)
}

fn normalize_codes(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim().to_lowercase())
        .filter(|line| !line.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Expands each code into its lower- and upper-case form, keeping first-seen
/// order and dropping duplicates (e.g. purely numeric codes).
#[must_use]
pub fn expand_case_variants(codes: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut expanded = Vec::with_capacity(codes.len() * 2);
    for code in codes {
        for variant in [code.to_lowercase(), code.to_uppercase()] {
            if seen.insert(variant.clone()) {
                expanded.push(variant);
            }
        }
    }
    expanded
}

/// Normalizes the code file and returns the case-expanded candidate set.
///
/// # Errors
///
/// Returns [`ConfigError::FileIo`] if the file cannot be read or rewritten.
pub fn load_candidate_codes(path: &Path) -> Result<Vec<String>, ConfigError> {
    let codes = normalize_codes_file(path)?;
    Ok(expand_case_variants(&codes))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn temp_codes(content: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        std::fs::write(file.path(), content).expect("write codes");
        file
    }

    #[test]
    fn normalize_lowercases_trims_dedupes_and_sorts() {
        let file = temp_codes("  SAVE10\npizza2x1\n\nsave10 \nBOGO\n");
        let codes = normalize_codes_file(file.path()).unwrap();
        assert_eq!(codes, vec!["bogo", "pizza2x1", "save10"]);
        assert_eq!(
            std::fs::read_to_string(file.path()).unwrap(),
            "bogo\npizza2x1\nsave10"
        );
    }

    #[test]
    fn normalize_is_idempotent() {
        let file = temp_codes("Zeta\nalpha\nALPHA\n  beta\n");
        normalize_codes_file(file.path()).unwrap();
        let first = std::fs::read(file.path()).unwrap();
        normalize_codes_file(file.path()).unwrap();
        let second = std::fs::read(file.path()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn normalize_empty_file_stays_empty() {
        let file = temp_codes("");
        let codes = normalize_codes_file(file.path()).unwrap();
        assert!(codes.is_empty());
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "");
    }

    #[test]
    fn expanded_set_has_both_cases_without_duplicates() {
        let file = temp_codes("save10\nBOGO\n2024\n");
        let expanded = load_candidate_codes(file.path()).unwrap();

        let unique: HashSet<&String> = expanded.iter().collect();
        assert_eq!(unique.len(), expanded.len(), "no duplicates: {expanded:?}");

        for code in ["bogo", "save10"] {
            assert!(expanded.contains(&code.to_owned()));
            assert!(expanded.contains(&code.to_uppercase()));
        }
        assert_eq!(expanded.iter().filter(|c| *c == "2024").count(), 1);
        assert_eq!(expanded, vec!["2024", "bogo", "BOGO", "save10", "SAVE10"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = normalize_codes_file(Path::new("/nonexistent/codes.txt"));
        assert!(matches!(result, Err(ConfigError::FileIo { .. })));
    }
}
