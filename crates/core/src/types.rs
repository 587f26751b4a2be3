use chrono::{Months, NaiveDate};

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

const SECS_PER_DAY: i64 = 86_400;

/// Whole days from `now` until midnight (UTC) of `date`, floored.
///
/// A date earlier today counts as -1: midnight has already passed.
pub fn days_until(date: NaiveDate, now: Timestamp) -> i64 {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc();
    (midnight - now).num_seconds().div_euclid(SECS_PER_DAY)
}

/// Whether midnight (UTC) of `date` lies strictly before `now`.
pub fn is_before(date: NaiveDate, now: Timestamp) -> bool {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc() < now
}

/// The calendar date `months` months after `now`, clamped to the end of
/// shorter months (31 Jan + 1 month = 28/29 Feb).
pub fn add_months(now: Timestamp, months: u32) -> NaiveDate {
    now.date_naive()
        .checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}
