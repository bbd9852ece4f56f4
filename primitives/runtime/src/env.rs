//! Parsers for values that arrive as flags or environment variables.

use std::time::Duration;

/// Parse a duration such as `10s`, `500ms`, `1m30s` or `1h`.
///
/// Accepts humantime's syntax, plus a bare number read as seconds. Used as a
/// clap value parser.
pub fn parse_duration(value: &str) -> Result<Duration, humantime::DurationError> {
    let value = value.trim();
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        return humantime::parse_duration(&format!("{value}s"));
    }
    humantime::parse_duration(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_units() {
        assert_eq!(parse_duration("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration(" 3 ").unwrap(), Duration::from_secs(3));
    }

    #[test]
    fn test_parse_duration_compound() {
        assert_eq!(parse_duration("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_duration("1h 5m").unwrap(), Duration::from_secs(3900));
        assert_eq!(parse_duration("2s500ms").unwrap(), Duration::from_millis(2500));
    }

    #[test]
    fn test_parse_duration_overflow_is_an_error() {
        assert!(parse_duration("400000000000000000m").is_err());
        assert!(parse_duration("99999999999999999999999").is_err());
    }

    #[test]
    fn test_parse_duration_rejects_garbage() {
        assert!(parse_duration("").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("10 parsecs").is_err());
        assert!(parse_duration("-1s").is_err());
    }
}
