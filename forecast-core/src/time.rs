use chrono::NaiveDateTime;

const WALL_CLOCK: &str = "%Y-%m-%dT%H:%M:%S";

/// Restamps the wall-clock fields of `2023-01-05T14:30:00-08:00` as UTC,
/// giving `2023-01-05T14:30:00Z`. The offset is discarded, not applied.
pub fn utc_stamp(start_time: &str) -> Option<String> {
    let fields = start_time.get(..19)?;
    let naive = NaiveDateTime::parse_from_str(fields, WALL_CLOCK).ok()?;
    Some(naive.and_utc().format("%Y-%m-%dT%H:%M:%SZ").to_string())
}
