//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use chrono::{DateTime, Utc};

/// Maximum length of a user or role identifier.
pub const MAX_IDENTIFIER_LENGTH: usize = 256;

/// Validate a `--now` override.
///
/// Accepts RFC 3339 timestamps with any offset and normalizes them to UTC.
///
/// Examples: `2024-03-10T12:00:00Z`, `2024-03-10T14:00:00+02:00`
pub fn validate_now(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("Invalid timestamp '{}': {}. Expected RFC 3339", s, e))
}

/// Validate a user or role identifier.
///
/// Identifiers are opaque, but must be non-empty, single-line and at most
/// MAX_IDENTIFIER_LENGTH characters.
pub fn validate_identifier(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Identifier cannot be empty".to_string());
    }

    if s.len() > MAX_IDENTIFIER_LENGTH {
        return Err(format!(
            "Identifier cannot exceed {} characters, got {} characters",
            MAX_IDENTIFIER_LENGTH,
            s.len()
        ));
    }

    if s.chars().any(char::is_control) {
        return Err("Identifier cannot contain control characters".to_string());
    }

    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case::utc("2024-03-10T12:00:00Z")]
    #[case::offset("2024-03-10T14:00:00+02:00")]
    #[case::fractional("2024-03-10T12:00:00.000Z")]
    #[case::padded("  2024-03-10T12:00:00Z  ")]
    fn test_validate_now_valid(#[case] input: &str) {
        let parsed = validate_now(input).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap());
    }

    #[rstest]
    #[case::date_only("2024-03-10")]
    #[case::words("yesterday")]
    #[case::empty("")]
    fn test_validate_now_invalid(#[case] input: &str) {
        let err = validate_now(input).unwrap_err();
        assert!(err.contains("RFC 3339"), "{err}");
    }

    #[rstest]
    #[case::uuid("9f0b3c4e-3c3a-4f43-9a3e-8c1f1e2b7a10", "9f0b3c4e-3c3a-4f43-9a3e-8c1f1e2b7a10")]
    #[case::trimmed("  admin ", "admin")]
    fn test_validate_identifier_valid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(validate_identifier(input).unwrap(), expected);
    }

    #[rstest]
    #[case::empty("", "empty")]
    #[case::whitespace("   ", "empty")]
    #[case::too_long("x".repeat(257), "cannot exceed")]
    #[case::newline("a\nb", "control")]
    fn test_validate_identifier_invalid(#[case] input: impl AsRef<str>, #[case] expected: &str) {
        let err = validate_identifier(input.as_ref()).unwrap_err();
        assert!(
            err.to_lowercase().contains(expected),
            "Expected error to contain '{}', got: '{}'",
            expected,
            err
        );
    }
}
