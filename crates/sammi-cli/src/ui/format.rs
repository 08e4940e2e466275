//! Formatting utilities.

use std::time::Duration;

/// Format a duration for build output.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sammi_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// assert_eq!(format_duration(Duration::from_secs(120)), "2m");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        return format!("{total_ms}ms");
    }

    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        return format!("{secs:.2}s");
    }

    let mut mins = (secs / 60.0).floor() as u64;
    let mut rest = (secs % 60.0).round() as u64;
    if rest == 60 {
        mins += 1;
        rest = 0;
    }

    if rest == 0 {
        format!("{mins}m")
    } else {
        format!("{mins}m {rest}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_second_durations_use_millis() {
        assert_eq!(format_duration(Duration::ZERO), "0ms");
        assert_eq!(format_duration(Duration::from_millis(999)), "999ms");
    }

    #[test]
    fn seconds_have_two_decimals() {
        assert_eq!(format_duration(Duration::from_millis(1000)), "1.00s");
        assert_eq!(format_duration(Duration::from_millis(59_994)), "59.99s");
    }

    #[test]
    fn rounding_up_to_a_full_minute() {
        assert_eq!(format_duration(Duration::from_millis(119_600)), "2m");
    }
}
