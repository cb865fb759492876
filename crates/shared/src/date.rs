use std::{fmt, str::FromStr};

use serde::{Serialize, Serializer};
use time::{
    Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, format_description::BorrowedFormatItem,
    macros::{date, format_description, time},
};
use time_tz::{ToTimezone, timezones};

use crate::{Error, Result};

pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Storage value of an instance that has not been given a real day yet.
pub const DRAFT_DATE: Date = date!(1970 - 01 - 01);

time::serde::format_description!(
    pub visit_time,
    PrimitiveDateTime,
    "[year]-[month]-[day]T[hour]:[minute]:[second]"
);

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// Parses the `YYYY-MM-DD` prefix of `value`, so both plain dates and
/// timestamps (`2026-02-18T00:00:00.000Z`) resolve to the same day.
pub fn parse_date(value: &str) -> Result<Date> {
    let value = value.trim();
    let prefix = value.get(..10).unwrap_or(value);

    Date::parse(prefix, DATE_FORMAT).map_err(|_| Error::Invalid(format!("invalid date `{value}`")))
}

/// Parses a visit timestamp as sent by the edit form (`2026-02-12T10:00:00`
/// or `2026-02-12T10:00`). A space separator is accepted too.
pub fn parse_visit_start(value: &str) -> Result<PrimitiveDateTime> {
    let value = value.trim().replacen(' ', "T", 1);
    let full = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
    let short = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    let stamp = value.get(..19).unwrap_or(&value);

    PrimitiveDateTime::parse(stamp, full)
        .or_else(|_| PrimitiveDateTime::parse(value.get(..16).unwrap_or(&value), short))
        .map_err(|_| Error::Invalid(format!("invalid visit_start `{value}`")))
}

/// Storage form of a visit timestamp (`2026-02-12 10:00:00`).
pub fn format_visit_start(value: PrimitiveDateTime) -> String {
    value
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .unwrap_or_else(|_| value.to_string())
}

/// Day of week with 0 = Sunday .. 6 = Saturday.
///
/// The day is pinned to midday before the weekday is read so that no
/// timezone shift can roll it over to a neighbour day.
pub fn weekday_index(date: Date) -> u8 {
    PrimitiveDateTime::new(date, time!(12:00))
        .assume_utc()
        .weekday()
        .number_days_from_sunday()
}

/// The 7 consecutive days starting at `anchor` (anchor included).
pub fn week_from(anchor: Date) -> Result<[Date; 7]> {
    let mut days = [anchor; 7];
    for (i, day) in days.iter_mut().enumerate() {
        *day = anchor
            .checked_add(Duration::days(i as i64))
            .ok_or_else(|| Error::Invalid(format!("date out of range: {anchor} + {i} days")))?;
    }

    Ok(days)
}

/// Sunday on or before `date`, the first column of the weekly board.
pub fn week_start(date: Date) -> Date {
    date.saturating_sub(Duration::days(weekday_index(date) as i64))
}

/// First and last day of the month `value` (`YYYY-MM`) points at.
pub fn month_bounds(value: &str) -> Result<(Date, Date)> {
    let invalid = || Error::Invalid(format!("invalid month `{value}`, expected YYYY-MM"));
    let (year, month) = value.trim().split_once('-').ok_or_else(invalid)?;
    let year = year.parse::<i32>().map_err(|_| invalid())?;
    let month = month
        .parse::<u8>()
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(invalid)?;

    let start = Date::from_calendar_date(year, month, 1)?;
    let end = Date::from_calendar_date(year, month, month.length(year))?;

    Ok((start, end))
}

pub fn month_bounds_of(date: Date) -> (Date, Date) {
    let start = date.replace_day(1).unwrap_or(date);
    let end = date
        .replace_day(date.month().length(date.year()))
        .unwrap_or(date);

    (start, end)
}

/// Today's date in the given IANA timezone, UTC when the name is unknown.
pub fn today(tz: &str) -> Date {
    let mut now = OffsetDateTime::now_utc();

    if let Some(tz) = timezones::get_by_name(tz) {
        now = now.to_timezone(tz);
    }

    now.date()
}

/// Where an instance sits on the weekly board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Unscheduled,
    Day(Date),
}

impl Slot {
    pub fn from_date(date: Date) -> Self {
        if date == DRAFT_DATE {
            Self::Unscheduled
        } else {
            Self::Day(date)
        }
    }

    /// The date persisted for this slot, the draft sentinel for unscheduled.
    pub fn stored_date(&self) -> Date {
        match self {
            Self::Unscheduled => DRAFT_DATE,
            Self::Day(date) => *date,
        }
    }

    pub fn day(&self) -> Option<Date> {
        match self {
            Self::Unscheduled => None,
            Self::Day(date) => Some(*date),
        }
    }

    pub fn is_unscheduled(&self) -> bool {
        matches!(self, Self::Unscheduled)
    }
}

impl From<Date> for Slot {
    fn from(value: Date) -> Self {
        Self::from_date(value)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_date(self.stored_date()))
    }
}

impl FromStr for Slot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_date(s).map(Self::from_date)
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl sqlx::Type<sqlx::Sqlite> for Slot {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Slot {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> std::result::Result<Self, sqlx::error::BoxDynError> {
        let value = <&str as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;

        Ok(value.parse::<Slot>()?)
    }
}
