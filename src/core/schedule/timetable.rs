//! Lesson-period to wall-clock timetable
//!
//! A fixed finite map from the period-group strings the backend emits to
//! start/end times of day. Unknown groups are not an error: they map to
//! `None` and [`time_range_label`] passes the raw group through unchanged so
//! callers can still display something.

/// Wall-clock start/end for a known period group.
#[must_use]
pub fn period_times(group: &str) -> Option<(&'static str, &'static str)> {
    match group {
        "1,2,3" => Some(("07:00", "09:25")),
        "4,5,6" => Some(("09:35", "12:00")),
        "7,8,9" => Some(("12:30", "14:55")),
        "10,11,12" => Some(("15:05", "17:30")),
        "13,14,15,16" => Some(("18:00", "20:30")),
        "1,2,3,4" => Some(("07:00", "09:35")),
        _ => None,
    }
}

/// Human-readable time range for a period group, e.g. "07:00 - 09:25".
///
/// Unknown groups are passed through unchanged.
#[must_use]
pub fn time_range_label(group: &str) -> String {
    period_times(group).map_or_else(|| group.to_string(), |(start, end)| format!("{start} - {end}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_groups_map_to_times() {
        assert_eq!(period_times("1,2,3"), Some(("07:00", "09:25")));
        assert_eq!(period_times("4,5,6"), Some(("09:35", "12:00")));
        assert_eq!(period_times("7,8,9"), Some(("12:30", "14:55")));
        assert_eq!(period_times("10,11,12"), Some(("15:05", "17:30")));
        assert_eq!(period_times("13,14,15,16"), Some(("18:00", "20:30")));
        assert_eq!(period_times("1,2,3,4"), Some(("07:00", "09:35")));
    }

    #[test]
    fn test_unknown_group_is_sentinel() {
        assert_eq!(period_times("2,3,4"), None);
        assert_eq!(period_times(""), None);
    }

    #[test]
    fn test_label_passes_unknown_groups_through() {
        assert_eq!(time_range_label("1,2,3"), "07:00 - 09:25");
        assert_eq!(time_range_label("9,10,11,12"), "9,10,11,12");
    }
}
