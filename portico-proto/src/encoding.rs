//! Scalar encodings used on the wire.
//!
//! Amounts travel as fixed-point decimal strings with two fractional digits,
//! booleans as single-character `Y`/`N` tokens, and report timestamps as UTC
//! ISO-8601 strings.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Format used for report date ranges.
pub const UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.00Z";

/// Encodes an amount as a two-digit fixed-point string (`10` → `"10.00"`).
#[must_use]
pub fn amount(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Encodes a boolean as `Y` or `N`.
#[must_use]
pub const fn flag(value: bool) -> &'static str {
    if value { "Y" } else { "N" }
}

/// Decodes a `Y`/`N` token. Anything else yields `None`.
#[must_use]
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim() {
        "Y" | "y" => Some(true),
        "N" | "n" => Some(false),
        _ => None,
    }
}

/// Encodes a UTC timestamp for report requests.
#[must_use]
pub fn utc(value: DateTime<Utc>) -> String {
    value.format(UTC_FORMAT).to_string()
}

/// Decodes a reply timestamp.
///
/// Accepts RFC 3339 strings as well as naive timestamps with or without
/// fractional seconds, which the gateway emits for older services.
#[must_use]
pub fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value.trim_end_matches('Z'), fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Decodes a decimal amount.
#[must_use]
pub fn parse_amount(value: &str) -> Option<Decimal> {
    Decimal::from_str(value.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_is_fixed_point() {
        assert_eq!(amount(dec!(10)), "10.00");
        assert_eq!(amount(dec!(10.5)), "10.50");
        assert_eq!(amount(dec!(0.005)), "0.01");
        assert_eq!(amount(dec!(1234567.891)), "1234567.89");
    }

    #[test]
    fn test_flags() {
        assert_eq!(flag(true), "Y");
        assert_eq!(flag(false), "N");
        assert_eq!(parse_flag("Y"), Some(true));
        assert_eq!(parse_flag("true"), None);
    }

    #[test]
    fn test_utc_roundtrip() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(utc(dt), "2024-03-01T12:30:00.00Z");
        assert_eq!(parse_utc(&utc(dt)), Some(dt));
    }

    #[test]
    fn test_parse_utc_variants() {
        assert!(parse_utc("2016-04-26T21:29:39.557Z").is_some());
        assert!(parse_utc("2016-04-26T21:29:39").is_some());
        assert!(parse_utc("yesterday").is_none());
    }
}
