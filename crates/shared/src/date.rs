use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use time_tz::{ToTimezone, timezones};

/// Canonical boundary format for calendar dates.
pub const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Legacy order-update format still accepted at the admin boundary.
pub const LEGACY_DATE: &[BorrowedFormatItem<'static>] = format_description!("[day].[month].[year]");

pub fn parse_iso(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, ISO_DATE)
}

pub fn parse_legacy(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, LEGACY_DATE)
}

/// Accepts either boundary format, normalizing to the canonical `Date`.
pub fn parse_client_date(value: &str) -> Result<Date, time::error::Parse> {
    parse_iso(value).or_else(|_| parse_legacy(value))
}

pub fn format_iso(date: Date) -> String {
    date.to_string()
}

/// Returns the current calendar day in the given IANA timezone,
/// falling back to UTC when the name is unknown.
pub fn today_in(tz: impl Into<String>) -> Date {
    let tz = tz.into();
    let mut now = OffsetDateTime::now_utc();

    if let Some(tz) = timezones::get_by_name(&tz) {
        now = now.to_timezone(tz);
    }

    now.date()
}

pub fn is_known_timezone(tz: &str) -> bool {
    timezones::get_by_name(tz).is_some()
}

/// Inclusive span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: Date,
    pub to: Date,
}

impl DateRange {
    pub fn new(from: Date, to: Date) -> Self {
        Self { from, to }
    }

    /// Iterates every calendar day in the span. Empty when `from > to`.
    pub fn days(self) -> impl Iterator<Item = Date> {
        std::iter::successors(Some(self.from), |day| day.next_day())
            .take_while(move |day| *day <= self.to)
    }
}
