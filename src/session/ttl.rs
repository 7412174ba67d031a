//! Token lifetime parsing.

/// Milliseconds in one day.
pub const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Parse a day-count lifetime such as `"7d"` into milliseconds.
///
/// Only the leading run of ASCII digits is read; anything after it is
/// ignored. Returns `None` when there are no leading digits.
pub fn parse_ttl_millis(ttl: &str) -> Option<i64> {
    let ttl = ttl.trim();
    let digits_end = ttl
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(ttl.len());

    if digits_end == 0 {
        return None;
    }

    // Only fails on overflow; treat as the longest representable lifetime.
    let days: i64 = ttl[..digits_end].parse().unwrap_or(i64::MAX);
    Some(days.saturating_mul(DAY_MILLIS))
}
