use time::{Date, Duration};

use crate::{Cadence, Order, is_delivery_day};

/// Returns `date` unchanged when it is already a delivery day, otherwise
/// the next one. Terminates within 7 iterations.
pub fn next_delivery_day(mut date: Date, cadence: Cadence) -> Date {
    while !is_delivery_day(date, cadence) {
        date += Duration::days(1);
    }

    date
}

/// Walks the calendar from `start`, counting only delivery days, and
/// returns the `days_count`-th one. The 5- and 6-day cadences are not
/// simple moduli once Sunday exclusion meets cadence-dependent Saturday
/// inclusion, so this scans day by day rather than computing a closed
/// form. `days_count` of zero yields the snapped start date.
pub fn calculate_end_date(start: Date, cadence: Cadence, days_count: u32) -> Date {
    let mut date = next_delivery_day(start, cadence);
    let mut counted = 1u32;

    while counted < days_count {
        date += Duration::days(1);

        if is_delivery_day(date, cadence) {
            counted += 1;
        }
    }

    date
}

/// Pushes an end date forward by `days_to_add` delivery days. Always moves
/// strictly forward from the current end date, never from "today", so
/// repeated extensions compose.
pub fn extend_end_date(end: Date, cadence: Cadence, days_to_add: u32) -> Date {
    let mut date = end;

    for _ in 0..days_to_add {
        date += Duration::days(1);
        date = next_delivery_day(date, cadence);
    }

    date
}

/// Inverse of [`extend_end_date`]: pulls an end date back by
/// `days_to_remove` delivery days.
pub fn retract_end_date(end: Date, cadence: Cadence, days_to_remove: u32) -> Date {
    let mut date = end;

    for _ in 0..days_to_remove {
        date -= Duration::days(1);

        while !is_delivery_day(date, cadence) {
            date -= Duration::days(1);
        }
    }

    date
}

/// The stored end date when present, otherwise recomputed from the order's
/// start, day count and accrued credit days. Legacy orders never persisted
/// an end date; every consumer must go through this fallback or it will
/// treat them as already expired.
pub fn resolve_end_date(order: &Order) -> Date {
    if let Some(end) = order.end_date {
        return end;
    }

    let end = calculate_end_date(order.start_date, order.cadence, order.days_count);

    if order.credit_days > 0 {
        extend_end_date(end, order.cadence, order.credit_days)
    } else {
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::OrderStatus;
    use time::macros::date;

    fn delivery_days_between(from: Date, to: Date, cadence: Cadence) -> u32 {
        let mut count = 0;
        let mut date = from;

        while date <= to {
            if is_delivery_day(date, cadence) {
                count += 1;
            }
            date += Duration::days(1);
        }

        count
    }

    fn order(cadence: Cadence, days_count: u32) -> Order {
        Order {
            id: "order-1".to_owned(),
            client_id: "client-1".to_owned(),
            client_name: "Ada".to_owned(),
            start_date: date!(2026 - 01 - 05),
            cadence,
            days_count,
            end_date: None,
            credit_days: 0,
            status: OrderStatus::Approved,
        }
    }

    #[test]
    fn test_next_delivery_day_keeps_valid_date() {
        let monday = date!(2026 - 01 - 05);
        assert_eq!(next_delivery_day(monday, Cadence::FiveDay), monday);
    }

    #[test]
    fn test_next_delivery_day_skips_weekend() {
        let saturday = date!(2026 - 01 - 10);

        assert_eq!(
            next_delivery_day(saturday, Cadence::FiveDay),
            date!(2026 - 01 - 12)
        );
        assert_eq!(next_delivery_day(saturday, Cadence::SixDay), saturday);
        assert_eq!(
            next_delivery_day(date!(2026 - 01 - 11), Cadence::SixDay),
            date!(2026 - 01 - 12)
        );
    }

    #[test]
    fn test_twenty_weekdays_span_four_weeks() {
        // Monday start, 20 deliveries Mon-Fri -> Friday four weeks later
        let end = calculate_end_date(date!(2026 - 01 - 05), Cadence::FiveDay, 20);
        assert_eq!(end, date!(2026 - 01 - 30));
    }

    #[test]
    fn test_twenty_four_days_on_six_day_plan() {
        let end = calculate_end_date(date!(2026 - 01 - 05), Cadence::SixDay, 24);
        assert_eq!(end, date!(2026 - 01 - 31));
    }

    #[test]
    fn test_start_date_snaps_forward() {
        // Saturday start on a 5-day plan begins the following Monday
        let end = calculate_end_date(date!(2026 - 01 - 10), Cadence::FiveDay, 1);
        assert_eq!(end, date!(2026 - 01 - 12));
    }

    #[test]
    fn test_end_date_counts_exactly_days_count() {
        for cadence in [Cadence::FiveDay, Cadence::SixDay] {
            for days_count in 1..=60 {
                let start = next_delivery_day(date!(2026 - 01 - 05), cadence);
                let end = calculate_end_date(start, cadence, days_count);

                assert_eq!(
                    delivery_days_between(start, end, cadence),
                    days_count,
                    "{cadence} plan, {days_count} days"
                );
            }
        }
    }

    #[test]
    fn test_extend_over_weekend() {
        // Friday + 1 delivery day lands on Monday
        let end = extend_end_date(date!(2026 - 01 - 30), Cadence::FiveDay, 1);
        assert_eq!(end, date!(2026 - 02 - 02));

        let end = extend_end_date(date!(2026 - 01 - 30), Cadence::SixDay, 1);
        assert_eq!(end, date!(2026 - 01 - 31));
    }

    #[test]
    fn test_extend_composes() {
        let start = date!(2026 - 01 - 30);

        for cadence in [Cadence::FiveDay, Cadence::SixDay] {
            for a in 0..10 {
                for b in 0..10 {
                    assert_eq!(
                        extend_end_date(extend_end_date(start, cadence, a), cadence, b),
                        extend_end_date(start, cadence, a + b),
                    );
                }
            }
        }
    }

    #[test]
    fn test_retract_inverts_extend() {
        let end = date!(2026 - 01 - 30);

        for cadence in [Cadence::FiveDay, Cadence::SixDay] {
            for days in 1..15 {
                assert_eq!(
                    retract_end_date(extend_end_date(end, cadence, days), cadence, days),
                    end
                );
            }
        }
    }

    #[test]
    fn test_resolve_prefers_stored_end_date() {
        let mut order = order(Cadence::FiveDay, 20);
        order.end_date = Some(date!(2026 - 03 - 02));

        assert_eq!(resolve_end_date(&order), date!(2026 - 03 - 02));
    }

    #[test]
    fn test_resolve_recomputes_for_legacy_orders() {
        let order = order(Cadence::FiveDay, 20);
        assert_eq!(resolve_end_date(&order), date!(2026 - 01 - 30));
    }

    #[test]
    fn test_resolve_applies_credit_days() {
        let mut order = order(Cadence::FiveDay, 20);
        order.credit_days = 2;

        assert_eq!(resolve_end_date(&order), date!(2026 - 02 - 03));
    }
}
