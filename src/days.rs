//! Short weekday labels for forecast columns

use chrono::{DateTime, Datelike, Duration, Local, TimeZone};

/// Labels indexed by days from Sunday. The two-letter forms are what the
/// panel layout expects.
const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tu", "Wed", "Th", "Fr", "Sat"];

/// Label for the local weekday `offset_days` days from now
pub fn day_name(offset_days: i64) -> &'static str {
    day_name_from(Local::now(), offset_days)
}

/// Label for the weekday `offset_days` whole days (86 400 s each) after `now`
///
/// The weekday is taken in `now`'s time zone after the shift. Offsets that
/// overflow the calendar fall back to plain modular arithmetic on the weekday.
pub fn day_name_from<Tz: TimeZone>(now: DateTime<Tz>, offset_days: i64) -> &'static str {
    let today = now.weekday().num_days_from_sunday() as i64;

    let index = Duration::try_days(offset_days)
        .and_then(|shift| now.checked_add_signed(shift))
        .map(|target| target.weekday().num_days_from_sunday() as i64)
        .unwrap_or_else(|| (today + offset_days.rem_euclid(7)).rem_euclid(7));

    DAY_LABELS[index as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_day_name_on_known_date() {
        // 2024-07-15 was a Monday
        let monday = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();

        assert_eq!(day_name_from(monday, 0), "Mon");
        assert_eq!(day_name_from(monday, 1), "Tu");
        assert_eq!(day_name_from(monday, 2), "Wed");
        assert_eq!(day_name_from(monday, 3), "Th");
        assert_eq!(day_name_from(monday, 4), "Fr");
        assert_eq!(day_name_from(monday, 5), "Sat");
        assert_eq!(day_name_from(monday, 6), "Sun");
        assert_eq!(day_name_from(monday, -1), "Sun");
    }

    #[test]
    fn test_day_name_repeats_every_week() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();

        for offset in -7..7 {
            assert_eq!(day_name_from(now, offset), day_name_from(now, offset + 7));
        }
    }

    #[test]
    fn test_day_name_uses_time_zone_of_now() {
        // 23:30 UTC on a Monday is already Tuesday at UTC+2
        let utc = Utc.with_ymd_and_hms(2024, 7, 15, 23, 30, 0).unwrap();
        let warsaw = utc.with_timezone(&FixedOffset::east_opt(2 * 3600).unwrap());

        assert_eq!(day_name_from(utc, 0), "Mon");
        assert_eq!(day_name_from(warsaw, 0), "Tu");
    }

    #[test]
    fn test_day_name_huge_offset_does_not_panic() {
        let monday = Utc.with_ymd_and_hms(2024, 7, 15, 12, 0, 0).unwrap();

        assert_eq!(day_name_from(monday, i64::MAX - (i64::MAX % 7)), "Mon");
        assert!(DAY_LABELS.contains(&day_name_from(monday, i64::MIN)));
    }

    #[test]
    fn test_day_name_local_is_a_label() {
        assert!(DAY_LABELS.contains(&day_name(0)));
    }
}
