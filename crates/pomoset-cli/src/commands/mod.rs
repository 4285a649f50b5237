pub mod config;
pub mod plan;
pub mod run;
pub mod simulate;
pub mod window;

use chrono::{Local, NaiveDateTime};

const AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a `--at` value such as `2024-05-06 10:00:00`.
pub fn parse_at(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, AT_FORMAT)
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM:SS\": {e}"))
}

/// `--at` if given, otherwise the local wall-clock time.
pub fn at_or_now(at: Option<NaiveDateTime>) -> NaiveDateTime {
    at.unwrap_or_else(|| Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_at_accepts_the_documented_format() {
        let at = parse_at("2024-05-06 10:00:00").unwrap();
        assert_eq!(at.to_string(), "2024-05-06 10:00:00");
    }

    #[test]
    fn parse_at_rejects_other_formats() {
        assert!(parse_at("10:00").is_err());
        assert!(parse_at("2024-05-06T10:00:00").is_err());
    }
}
