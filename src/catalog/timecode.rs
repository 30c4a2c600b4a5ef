//! Conversions between the registry's textual timestamps and
//! millisecond counts, and between durations and display strings.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TIMESTAMP_RE: Regex = Regex::new(r"^(\d{2}):(\d{2}):(\d{2})\.(\d{3})$")
        .expect("Invalid Regex, this should be fixed at runtime.");
}

/// Parse a `HH:MM:SS.mmm` timestamp into milliseconds.
///
/// Only the exact shape is accepted (two-digit fields, three-digit
/// milliseconds, literal dot). Anything else yields `None`, which
/// callers treat as "unknown", not as an error.
pub fn parse_timestamp(text: &str) -> Option<i64> {
    let caps = TIMESTAMP_RE.captures(text)?;
    let hours: i64 = caps[1].parse().ok()?;
    let minutes: i64 = caps[2].parse().ok()?;
    let seconds: i64 = caps[3].parse().ok()?;
    let millis: i64 = caps[4].parse().ok()?;
    Some(((hours * 60 + minutes) * 60 + seconds) * 1000 + millis)
}

/// Round a millisecond count to whole seconds, half up.
fn round_to_seconds(ms: i64) -> i64 {
    (ms + 500).div_euclid(1000)
}

/// Format a duration as `m:ss`. Minutes are unpadded and unbounded,
/// seconds are zero-padded.
pub fn format_duration_short(ms: i64) -> String {
    let total = round_to_seconds(ms);
    format!("{}:{:02}", total.div_euclid(60), total.rem_euclid(60))
}

/// Format an offset as `hh:mm:ss` with all fields zero-padded to at
/// least two digits. Hours are unbounded.
pub fn format_timecode(ms: i64) -> String {
    let total = round_to_seconds(ms);
    format!(
        "{:02}:{:02}:{:02}",
        total.div_euclid(3600),
        total.div_euclid(60).rem_euclid(60),
        total.rem_euclid(60)
    )
}
