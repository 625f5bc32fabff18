//! Time utilities for trainee-progress.
//!
//! Stored timestamps are Unix epoch microseconds (u64). Token expiry uses
//! whole seconds.

/// Return the current time as microseconds since Unix epoch.
///
/// A clock set before the epoch reads as 0.
pub fn now_micros() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

/// Return the current time as whole seconds since Unix epoch.
pub fn now_secs() -> u64 {
    now_micros() / 1_000_000
}

fn micros_to_datetime(micros: u64) -> chrono::DateTime<chrono::Utc> {
    let secs = (micros / 1_000_000) as i64;
    let nsecs = ((micros % 1_000_000) * 1000) as u32;
    chrono::DateTime::from_timestamp(secs, nsecs).unwrap_or(chrono::DateTime::UNIX_EPOCH)
}

/// Convert microseconds to an RFC 3339 string.
pub fn micros_to_rfc3339(micros: u64) -> String {
    micros_to_datetime(micros).to_rfc3339()
}

/// Format microseconds with a `strftime`-style pattern in UTC.
pub fn format_micros(micros: u64, pattern: &str) -> String {
    micros_to_datetime(micros).format(pattern).to_string()
}
