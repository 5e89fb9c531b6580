//! Calendar-day arithmetic and the two textual date forms used at the edges.
//!
//! Storage round-trips dates in the long form (`2023-08-04T00:00:00`), calendar
//! highlighting compares short keys (`2023-08-04`). Everything in between works
//! on `NaiveDate`.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};

const KEY_FORMAT: &str = "%Y-%m-%d";
const LONG_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised date: {0:?}")]
pub struct DateParseError(pub String);

/// Whole calendar days from `from` to `to`. Negative if `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Saturates at [`NaiveDate::MIN`] / [`NaiveDate::MAX`].
pub fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    checked_add_days(date, days).unwrap_or(if days < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

pub fn sub_days(date: NaiveDate, days: i64) -> NaiveDate {
    match days.checked_neg() {
        Some(back) => add_days(date, back),
        None => NaiveDate::MAX,
    }
}

fn checked_add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let magnitude = Days::new(days.unsigned_abs());
    if days < 0 {
        date.checked_sub_days(magnitude)
    } else {
        date.checked_add_days(magnitude)
    }
}

pub fn start_of_day(moment: NaiveDateTime) -> NaiveDate {
    moment.date()
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    start_of_month(date)
        .checked_add_months(Months::new(1))
        .map_or(date, |next| sub_days(next, 1))
}

/// Calendar month arithmetic; the day is clamped to the target month's length.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

pub fn sub_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

/// `len` consecutive days beginning at `start`, cut short at the end of the
/// representable calendar.
pub fn date_range(start: NaiveDate, len: i64) -> Vec<NaiveDate> {
    (0..len.max(0))
        .map_while(|offset| checked_add_days(start, offset))
        .collect()
}

/// Short calendar key, `YYYY-MM-DD`.
pub fn to_key(date: NaiveDate) -> String {
    date.format(KEY_FORMAT).to_string()
}

pub fn to_keys(dates: &[NaiveDate]) -> Vec<String> {
    dates.iter().copied().map(to_key).collect()
}

pub fn parse_key(key: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(key.trim(), KEY_FORMAT).map_err(|_| DateParseError(key.to_string()))
}

/// Canonical long form: local midnight of the day.
pub fn to_long_form(date: NaiveDate) -> String {
    date.and_time(NaiveTime::MIN).format(LONG_FORMAT).to_string()
}

/// Accepts the long form, any RFC 3339 timestamp, or a short key.
/// Timestamps are truncated to their calendar day.
pub fn parse_date(text: &str) -> Result<NaiveDate, DateParseError> {
    let text = text.trim();
    if let Ok(moment) = NaiveDateTime::parse_from_str(text, LONG_FORMAT) {
        return Ok(start_of_day(moment));
    }
    if let Ok(moment) = DateTime::parse_from_rfc3339(text) {
        return Ok(start_of_day(moment.naive_local()));
    }
    parse_key(text)
}

/// Serde adapter writing `NaiveDate` in the long form.
pub mod long_form {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_long_form(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_date(&text).map_err(serde::de::Error::custom)
    }
}
