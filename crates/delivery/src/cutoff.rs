use time::{Date, Duration, Weekday};

use crate::{Cadence, is_delivery_day};

/// Length of the modification window past its first day.
pub const MODIFICATION_HORIZON_DAYS: i64 = 13;

/// Production lead time before the next delivery that can still be
/// modified, by the current weekday.
fn lead_days(weekday: Weekday) -> i64 {
    match weekday {
        Weekday::Sunday | Weekday::Monday | Weekday::Tuesday => 4,
        _ => 5,
    }
}

pub fn first_modifiable_date(today: Date) -> Date {
    today + Duration::days(lead_days(today.weekday()))
}

pub fn last_modifiable_date(today: Date) -> Date {
    first_modifiable_date(today) + Duration::days(MODIFICATION_HORIZON_DAYS)
}

/// Inclusive span of dates a client may still skip, restore, or reroute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModificationWindow {
    pub first: Date,
    pub last: Date,
}

impl ModificationWindow {
    pub fn from_today(today: Date) -> Self {
        Self {
            first: first_modifiable_date(today),
            last: last_modifiable_date(today),
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        self.first <= date && date <= self.last
    }
}

/// A date can still be modified when it sits inside the window, is a
/// delivery day for the plan, and lies strictly in the future.
pub fn is_modifiable(date: Date, cadence: Cadence, today: Date) -> bool {
    date > today
        && is_delivery_day(date, cadence)
        && ModificationWindow::from_today(today).contains(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_lead_time_per_weekday() {
        let cases = [
            // (today, expected first modifiable date)
            (date!(2026 - 01 - 04), date!(2026 - 01 - 08)), // Sun -> Thu
            (date!(2026 - 01 - 05), date!(2026 - 01 - 09)), // Mon -> Fri
            (date!(2026 - 01 - 06), date!(2026 - 01 - 10)), // Tue -> Sat
            (date!(2026 - 01 - 07), date!(2026 - 01 - 12)), // Wed -> Mon
            (date!(2026 - 01 - 08), date!(2026 - 01 - 13)), // Thu -> Tue
            (date!(2026 - 01 - 09), date!(2026 - 01 - 14)), // Fri -> Wed
            (date!(2026 - 01 - 10), date!(2026 - 01 - 15)), // Sat -> Thu
        ];

        for (today, expected) in cases {
            assert_eq!(first_modifiable_date(today), expected, "today {today}");
        }
    }

    #[test]
    fn test_window_spans_two_weeks() {
        let window = ModificationWindow::from_today(date!(2026 - 01 - 05));

        assert_eq!(window.first, date!(2026 - 01 - 09));
        assert_eq!(window.last, date!(2026 - 01 - 22));
        assert!(window.contains(window.first));
        assert!(window.contains(window.last));
        assert!(!window.contains(date!(2026 - 01 - 08)));
        assert!(!window.contains(date!(2026 - 01 - 23)));
    }

    #[test]
    fn test_modifiable_requires_delivery_day() {
        let today = date!(2026 - 01 - 05);

        // Sunday inside the window is still not modifiable
        assert!(!is_modifiable(date!(2026 - 01 - 11), Cadence::SixDay, today));
        // Saturday inside the window depends on the plan
        assert!(is_modifiable(date!(2026 - 01 - 10), Cadence::SixDay, today));
        assert!(!is_modifiable(date!(2026 - 01 - 10), Cadence::FiveDay, today));
    }

    #[test]
    fn test_modifiable_rejects_past_and_present() {
        let today = date!(2026 - 01 - 05);

        assert!(!is_modifiable(today, Cadence::FiveDay, today));
        assert!(!is_modifiable(date!(2026 - 01 - 02), Cadence::FiveDay, today));
        assert!(is_modifiable(date!(2026 - 01 - 12), Cadence::FiveDay, today));
    }
}
