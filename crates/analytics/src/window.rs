//! Reporting windows in Moscow time.
//!
//! "Today" and "this month" are always computed at a fixed UTC+3 offset
//! (no DST), then carried as UTC instants. Windows are half-open.

use chrono::{
    DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, SubsecRound,
    TimeZone, Utc,
};
use common::TimeWindow;

pub use common::to_wire;

/// Fixed local offset for all day/month computations.
pub const MSK_OFFSET_SECS: i64 = 3 * 3600;

fn offset() -> Duration {
    Duration::seconds(MSK_OFFSET_SECS)
}

/// Wall-clock time in Moscow for a UTC instant. Saturates at the edge of
/// the representable range.
pub fn to_local(instant: DateTime<Utc>) -> NaiveDateTime {
    instant
        .naive_utc()
        .checked_add_signed(offset())
        .unwrap_or(NaiveDateTime::MAX)
}

/// UTC instant for a Moscow wall-clock time. Saturates like `to_local`.
pub fn from_local(local: NaiveDateTime) -> DateTime<Utc> {
    let utc = local
        .checked_sub_signed(offset())
        .unwrap_or(NaiveDateTime::MIN);
    Utc.from_utc_datetime(&utc)
}

fn add_saturating(instant: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    instant
        .checked_add_signed(delta)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    from_local(date.and_time(NaiveTime::MIN))
}

/// Today in Moscow: `[00:00, 00:00 + 24h)`.
pub fn day_window(now: DateTime<Utc>) -> TimeWindow {
    let today = to_local(now).date();
    let start = local_midnight(today);

    TimeWindow {
        start,
        end: add_saturating(start, Duration::hours(24)),
        label: today.format("%d.%m.%Y").to_string(),
    }
}

/// Current month in Moscow: day 1 at 00:00 up to `now`, clipped to the end
/// of the month.
pub fn month_window(now: DateTime<Utc>) -> TimeWindow {
    let today = to_local(now).date();
    let first_day = today - Duration::days(i64::from(today.day0()));
    let next_first = first_day
        .checked_add_months(Months::new(1))
        .unwrap_or(NaiveDate::MAX);

    let start = local_midnight(first_day);
    let month_end = local_midnight(next_first);

    let mut end = now.trunc_subsecs(0).min(month_end);
    if end <= start {
        end = add_saturating(start, Duration::seconds(1));
    }

    let last_shown = to_local(end - Duration::seconds(1)).date();
    TimeWindow {
        start,
        end,
        label: format!(
            "{} - {}",
            first_day.format("%d.%m.%Y"),
            last_shown.format("%d.%m.%Y")
        ),
    }
}
