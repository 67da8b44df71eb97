use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};
use time_tz::{ToTimezone, timezones};

use crate::MealPeriod;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Current time in the named IANA timezone, or UTC when the name is unknown.
pub fn now(tz: impl Into<String>) -> OffsetDateTime {
    let tz = tz.into();
    let now = OffsetDateTime::now_utc();

    match timezones::get_by_name(&tz) {
        Some(tz) => now.to_timezone(tz),
        None => now,
    }
}

pub fn today(tz: impl Into<String>) -> Date {
    now(tz).date()
}

pub fn current_meal_period(tz: impl Into<String>) -> MealPeriod {
    MealPeriod::at_hour(now(tz).hour())
}

pub fn is_known_timezone(tz: &str) -> bool {
    timezones::get_by_name(tz).is_some()
}

/// Parses a `YYYY-MM-DD` menu date.
pub fn parse_date(raw: &str) -> crate::Result<Date> {
    match Date::parse(raw.trim(), DATE_FORMAT) {
        Ok(date) => Ok(date),
        Err(_) => crate::bail!("invalid date '{raw}', expected YYYY-MM-DD"),
    }
}
