//! Duration and timestamp formatting
//!
//! YouTube reports video lengths as ISO-8601 durations (`PT4M13S`) and
//! timestamps as RFC 3339 strings. Both are turned into display-ready
//! strings here; neither function ever fails.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use regex::Regex;

/// Rendered when a duration cannot be parsed
pub const ZERO_DURATION: &str = "00:00";

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
        .expect("duration pattern is valid")
});

/// Formats an ISO-8601 duration as `MM:SS`
///
/// Hours, days and weeks are folded into the minute count, so a two hour
/// video renders as `120:00`. Calendar units (years, months), fractional
/// values and malformed input all yield `00:00`.
///
/// # Example
/// ```
/// use ytrelay_core::format_duration;
/// assert_eq!(format_duration("PT4M13S"), "04:13");
/// assert_eq!(format_duration("PT1H2M3S"), "62:03");
/// assert_eq!(format_duration("garbage"), "00:00");
/// ```
pub fn format_duration(iso: &str) -> String {
    match parse_duration_secs(iso) {
        Some(total) => format!("{:02}:{:02}", total / 60, total % 60),
        None => ZERO_DURATION.to_string(),
    }
}

/// Parses an ISO-8601 duration into total seconds
///
/// Returns `None` for anything outside the `P[nW][nD][T[nH][nM][nS]]` subset.
pub fn parse_duration_secs(iso: &str) -> Option<u64> {
    let iso = iso.trim();
    // "P" alone and a dangling "T" are not valid durations
    if iso == "P" || iso.ends_with('T') {
        return None;
    }

    let caps = DURATION_RE.captures(iso)?;
    const UNIT_SECS: [u64; 5] = [604_800, 86_400, 3_600, 60, 1];

    let mut total: u64 = 0;
    for (index, unit) in UNIT_SECS.iter().enumerate() {
        if let Some(value) = caps.get(index + 1) {
            let value: u64 = value.as_str().parse().ok()?;
            total = total.checked_add(value.checked_mul(*unit)?)?;
        }
    }
    Some(total)
}

/// Normalizes a YouTube timestamp to RFC 3339 UTC with second precision
///
/// Input that does not parse is returned unchanged.
///
/// # Example
/// ```
/// use ytrelay_core::normalize_timestamp;
/// assert_eq!(normalize_timestamp("2023-10-26T14:00:00.123Z"), "2023-10-26T14:00:00Z");
/// assert_eq!(normalize_timestamp("yesterday"), "yesterday");
/// ```
pub fn normalize_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(parsed) => parsed
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        Err(e) => {
            if !raw.is_empty() {
                tracing::warn!("Could not parse timestamp {:?}: {}", raw, e);
            }
            raw.to_string()
        }
    }
}

/// Parses a caller-supplied `published_after` filter
///
/// Accepts a full RFC 3339 timestamp or a bare `YYYY-MM-DD` date (taken as
/// midnight UTC) and returns it in the form the search endpoint expects.
pub fn parse_published_after(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(
            parsed
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        );
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
    Some(midnight.to_rfc3339_opts(SecondsFormat::Secs, true))
}
