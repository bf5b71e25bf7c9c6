use chrono::DateTime;
use chrono_tz::Tz;

pub const NEVER: &str = "Never";

const CTIME_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Renders unix seconds as a ctime-style string, e.g. `Sun Oct 19 10:59:00 2026`.
pub fn readable_time(unix_seconds: i64, timezone: Tz) -> String {
    match DateTime::from_timestamp(unix_seconds, 0) {
        Some(utc) => utc
            .with_timezone(&timezone)
            .format(CTIME_FORMAT)
            .to_string(),
        None => unix_seconds.to_string(),
    }
}

/// Like [`readable_time`], but renders an unset timestamp as `"Never"`.
pub fn readable_or_never(unix_seconds: Option<i64>, timezone: Tz) -> String {
    match unix_seconds {
        Some(t) => readable_time(t, timezone),
        None => NEVER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_ctime_layout() {
        // 2025-01-05T09:03:07Z
        assert_eq!(readable_time(1_736_067_787, Tz::UTC), "Sun Jan  5 09:03:07 2025");
    }

    #[test]
    fn renders_in_requested_timezone() {
        assert_eq!(
            readable_time(1_736_067_787, Tz::Asia__Tokyo),
            "Sun Jan  5 18:03:07 2025"
        );
    }

    #[test]
    fn unset_renders_never() {
        assert_eq!(readable_or_never(None, Tz::UTC), "Never");
        assert_ne!(readable_or_never(Some(0), Tz::UTC), "Never");
    }
}
