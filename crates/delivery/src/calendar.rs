use time::{Date, Weekday};

/// Weekly delivery pattern of a subscription. Immutable for the life of
/// an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Cadence {
    #[strum(serialize = "5-day")]
    FiveDay,
    #[strum(serialize = "6-day")]
    SixDay,
}

impl Cadence {
    pub fn from_days(days: i64) -> Option<Self> {
        match days {
            5 => Some(Self::FiveDay),
            6 => Some(Self::SixDay),
            _ => None,
        }
    }

    pub fn days_per_week(self) -> i64 {
        match self {
            Self::FiveDay => 5,
            Self::SixDay => 6,
        }
    }

    /// Most dates a single cancel call may carry. Capped below the full
    /// day count of the two-week modification window.
    pub fn max_batch_cancel(self) -> usize {
        match self {
            Self::FiveDay => 10,
            Self::SixDay => 12,
        }
    }
}

/// Sunday never sees a delivery; Saturday only on the 6-day plan.
pub fn is_delivery_day(date: Date, cadence: Cadence) -> bool {
    match date.weekday() {
        Weekday::Sunday => false,
        Weekday::Saturday => cadence == Cadence::SixDay,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration;
    use time::macros::date;

    #[test]
    fn test_five_day_week() {
        // 2026-01-05 is a Monday
        let monday = date!(2026 - 01 - 05);

        for offset in 0..5 {
            assert!(is_delivery_day(
                monday + Duration::days(offset),
                Cadence::FiveDay
            ));
        }
        assert!(!is_delivery_day(date!(2026 - 01 - 10), Cadence::FiveDay));
        assert!(!is_delivery_day(date!(2026 - 01 - 11), Cadence::FiveDay));
    }

    #[test]
    fn test_six_day_week() {
        let monday = date!(2026 - 01 - 05);

        for offset in 0..6 {
            assert!(is_delivery_day(
                monday + Duration::days(offset),
                Cadence::SixDay
            ));
        }
        assert!(!is_delivery_day(date!(2026 - 01 - 11), Cadence::SixDay));
    }

    #[test]
    fn test_sunday_is_never_deliverable() {
        let mut sunday = date!(2026 - 01 - 04);

        for _ in 0..52 {
            assert!(!is_delivery_day(sunday, Cadence::FiveDay));
            assert!(!is_delivery_day(sunday, Cadence::SixDay));
            sunday += Duration::weeks(1);
        }
    }

    #[test]
    fn test_batch_caps() {
        assert_eq!(Cadence::FiveDay.max_batch_cancel(), 10);
        assert_eq!(Cadence::SixDay.max_batch_cancel(), 12);
    }
}
