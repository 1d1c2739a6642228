//! Date normalization at the persistence boundary.
//!
//! Stored dates arrive either as native `NaiveDate` values or as ISO-8601
//! text. Everything past this module works on `NaiveDate` only.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CycleError;

const DATE_FORMAT: &str = "%Y-%m-%d";
const NAIVE_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A date as it was stored: already typed, or still text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Native(NaiveDate),
    Text(String),
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        DateValue::Native(date)
    }
}

impl From<&str> for DateValue {
    fn from(text: &str) -> Self {
        DateValue::Text(text.to_owned())
    }
}

impl From<String> for DateValue {
    fn from(text: String) -> Self {
        DateValue::Text(text)
    }
}

/// Anything the engine accepts where a calendar date is expected.
pub trait IntoCycleDate {
    fn into_cycle_date(self) -> Result<NaiveDate, CycleError>;
}

impl IntoCycleDate for NaiveDate {
    fn into_cycle_date(self) -> Result<NaiveDate, CycleError> {
        Ok(self)
    }
}

impl IntoCycleDate for NaiveDateTime {
    fn into_cycle_date(self) -> Result<NaiveDate, CycleError> {
        Ok(self.date())
    }
}

impl<Tz: TimeZone> IntoCycleDate for DateTime<Tz> {
    fn into_cycle_date(self) -> Result<NaiveDate, CycleError> {
        Ok(self.date_naive())
    }
}

impl IntoCycleDate for &str {
    fn into_cycle_date(self) -> Result<NaiveDate, CycleError> {
        parse_date(self)
    }
}

impl IntoCycleDate for String {
    fn into_cycle_date(self) -> Result<NaiveDate, CycleError> {
        parse_date(&self)
    }
}

impl IntoCycleDate for &DateValue {
    fn into_cycle_date(self) -> Result<NaiveDate, CycleError> {
        match self {
            DateValue::Native(date) => Ok(*date),
            DateValue::Text(text) => parse_date(text),
        }
    }
}

impl IntoCycleDate for DateValue {
    fn into_cycle_date(self) -> Result<NaiveDate, CycleError> {
        (&self).into_cycle_date()
    }
}

/// Parse `YYYY-MM-DD`, an RFC 3339 timestamp, or a naive ISO datetime.
/// Time of day is dropped; timestamps keep the calendar date of their own offset.
pub fn parse_date(input: &str) -> Result<NaiveDate, CycleError> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(trimmed, NAIVE_DATETIME_FORMAT)
        .map(|datetime| datetime.date())
        .map_err(|e| CycleError::InvalidDate {
            input: input.to_owned(),
            reason: e.to_string(),
        })
}

/// Move a date by `days`, saturating at the ends of the supported calendar.
pub(crate) fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(if days < 0 {
            NaiveDate::MIN
        } else {
            NaiveDate::MAX
        })
}

/// Field deserializer that turns a value of the wrong shape into `None`
/// instead of rejecting the whole document.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match T::deserialize(value.clone()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            tracing::debug!(%value, error = %e, "ignoring malformed field");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_plain_dates() {
        assert_eq!(parse_date("2025-07-01").unwrap(), ymd(2025, 7, 1));
        assert_eq!(parse_date(" 2025-07-01 ").unwrap(), ymd(2025, 7, 1));
    }

    #[test]
    fn parses_timestamps_in_their_own_offset() {
        assert_eq!(
            parse_date("2025-07-01T23:30:00-05:00").unwrap(),
            ymd(2025, 7, 1)
        );
        assert_eq!(parse_date("2025-07-01T00:00:00Z").unwrap(), ymd(2025, 7, 1));
        assert_eq!(
            parse_date("2025-07-01T08:15:30.250").unwrap(),
            ymd(2025, 7, 1)
        );
        assert_eq!(parse_date("2025-07-01T08:15:30").unwrap(), ymd(2025, 7, 1));
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_date("next tuesday").unwrap_err();
        assert!(matches!(err, CycleError::InvalidDate { .. }));
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn native_and_text_inputs_agree() {
        let native = ymd(2025, 1, 2).into_cycle_date().unwrap();
        let text = "2025-01-02".into_cycle_date().unwrap();
        let owned = String::from("2025-01-02T12:00:00Z").into_cycle_date().unwrap();
        let stamp = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2025, 1, 2, 0, 30, 0)
            .unwrap()
            .into_cycle_date()
            .unwrap();
        assert_eq!(native, text);
        assert_eq!(native, owned);
        assert_eq!(native, stamp);

        let utc = Utc.with_ymd_and_hms(2025, 1, 2, 22, 0, 0).unwrap();
        assert_eq!(utc.into_cycle_date().unwrap(), native);
    }

    #[test]
    fn date_value_deserializes_both_shapes() {
        let native: DateValue = serde_json::from_str("\"2025-07-01\"").unwrap();
        assert_eq!(native, DateValue::Native(ymd(2025, 7, 1)));

        let text: DateValue = serde_json::from_str("\"2025-07-01T10:00:00Z\"").unwrap();
        assert!(matches!(text, DateValue::Text(_)));
        assert_eq!(text.into_cycle_date().unwrap(), ymd(2025, 7, 1));
    }

    #[test]
    fn shift_saturates() {
        assert_eq!(shift_days(ymd(2024, 12, 15), 28), ymd(2025, 1, 12));
        assert_eq!(shift_days(ymd(2025, 3, 1), -1), ymd(2025, 2, 28));
        assert_eq!(shift_days(NaiveDate::MAX, 5), NaiveDate::MAX);
        assert_eq!(shift_days(NaiveDate::MIN, -5), NaiveDate::MIN);
    }
}
