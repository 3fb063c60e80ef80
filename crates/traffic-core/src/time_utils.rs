use chrono::{DateTime, NaiveDateTime, TimeDelta};
use tracing::trace;

// ── Sampling interval ─────────────────────────────────────────────────────────

/// Width of one counting slot in minutes.
pub const SLOT_MINUTES: i64 = 30;

/// The fixed spacing between two consecutive counting slots.
pub fn slot_interval() -> TimeDelta {
    TimeDelta::minutes(SLOT_MINUTES)
}

/// Returns `true` when `next` falls exactly one slot after `prev`.
///
/// Any other spacing (a missing slot, a duplicate timestamp, a step backwards
/// or an irregular step) counts as a gap.
pub fn is_next_slot(prev: NaiveDateTime, next: NaiveDateTime) -> bool {
    next - prev == slot_interval()
}

/// Human-readable duration of `slots` consecutive slots, e.g. `"1.5h"`.
///
/// Falls back to a plain slot count when the duration does not fit in
/// minutes.
pub fn window_duration_label(slots: usize) -> String {
    let Some(minutes) = i64::try_from(slots)
        .ok()
        .and_then(|s| s.checked_mul(SLOT_MINUTES))
    else {
        return format!("{} slots", slots);
    };
    if minutes % 60 == 0 {
        format!("{}h", minutes / 60)
    } else if minutes > 60 {
        format!("{}h", minutes as f64 / 60.0)
    } else {
        format!("{}m", minutes)
    }
}

// ── Timestamp parsing ─────────────────────────────────────────────────────────

/// Accepted timestamp layouts. `%.f` also matches an absent fraction.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Offset-bearing layouts that RFC 3339 parsing does not cover.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M:%S%.f%z"];

/// Parse an offset-bearing token, keeping the wall-clock time as written.
fn parse_with_offset(token: &str) -> Option<NaiveDateTime> {
    let normalised = match token.strip_suffix(['Z', 'z']) {
        Some(base) => format!("{}+00:00", base),
        None => token.to_string(),
    };
    DateTime::parse_from_rfc3339(&normalised)
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|fmt| DateTime::parse_from_str(&normalised, fmt).ok())
        })
        .map(|dt| dt.naive_local())
}

/// Parse an ISO-8601 style `date T time` token into a naive date-time.
///
/// A trailing UTC offset (`Z`, `+01:00`) is accepted and dropped: the result
/// is the local time as written, so day keys and slot spacing follow the
/// text of the input. Returns `None` when the token matches none of the
/// accepted layouts.
pub fn parse_timestamp(token: &str) -> Option<NaiveDateTime> {
    let parsed = TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(token, fmt).ok())
        .or_else(|| parse_with_offset(token));
    if parsed.is_none() {
        trace!("could not parse timestamp \"{}\"", token);
    }
    parsed
}

/// Calendar-day key of a timestamp in `YYYY-MM-DD` form.
pub fn day_key(ts: NaiveDateTime) -> String {
    ts.date().format("%Y-%m-%d").to_string()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
