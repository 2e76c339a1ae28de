//! Regular expression compilability checks.

use regex::Regex;

use crate::error::ValidationError;

/// Validates that a single pattern compiles.
pub fn validate_pattern(field: &'static str, pattern: &str) -> Result<(), ValidationError> {
    Regex::new(pattern)
        .map(|_| ())
        .map_err(|e| ValidationError::InvalidPattern {
            field,
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Validates every pattern in a list, failing on the first that does not compile.
pub fn validate_patterns(field: &'static str, patterns: &[String]) -> Result<(), ValidationError> {
    patterns
        .iter()
        .try_for_each(|pattern| validate_pattern(field, pattern))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_patterns_pass() {
        let patterns = vec![r"sample\.mp4$".to_string(), r"(?i)/trailers/".to_string()];
        assert!(validate_patterns("video exclusion pattern", &patterns).is_ok());
    }

    #[test]
    fn invalid_pattern_echoes_offender() {
        let patterns = vec!["ok".to_string(), "broken[".to_string()];
        let err = validate_patterns("video exclusion pattern", &patterns).unwrap_err();

        match &err {
            ValidationError::InvalidPattern { pattern, .. } => assert_eq!(pattern, "broken["),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().starts_with("video exclusion pattern 'broken[' invalid"));
    }
}
