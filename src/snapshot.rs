//! The engine's view of what the persistence layer hands over: the active
//! cycle, the recorded history and display settings.
//!
//! Callers should pass an immutable snapshot; nothing here writes back.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cycle;
use crate::date::{self, shift_days, DateValue, IntoCycleDate};
use crate::error::CycleError;
use crate::history;
use crate::models::*;
use crate::phase;
use crate::prediction;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSnapshot {
    #[serde(default)]
    pub start_date: Option<DateValue>,
    #[serde(default, deserialize_with = "date::lenient")]
    pub cycle_length: Option<CycleLength>,
    #[serde(default)]
    pub history: Vec<CycleHistoryRecord>,
    #[serde(default)]
    pub settings: Settings,
}

impl CycleSnapshot {
    pub fn new(start_date: impl Into<DateValue>, cycle_length: CycleLength) -> Self {
        Self {
            start_date: Some(start_date.into()),
            cycle_length: Some(cycle_length),
            ..Default::default()
        }
    }

    pub fn with_history(mut self, history: Vec<CycleHistoryRecord>) -> Self {
        self.history = history;
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn from_json(json: &str) -> Result<Self, CycleError> {
        let snapshot: CycleSnapshot = serde_json::from_str(json)?;
        tracing::debug!(
            history = snapshot.history.len(),
            has_start = snapshot.start_date.is_some(),
            "loaded cycle snapshot"
        );
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, CycleError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Start date and length of the active cycle. A missing start date is an
    /// error rather than a silent fallback to some fixed date.
    pub fn active_cycle(&self) -> Result<(NaiveDate, CycleLength), CycleError> {
        let start = self
            .start_date
            .as_ref()
            .ok_or(CycleError::MissingStartDate)?
            .into_cycle_date()?;
        let length = self
            .cycle_length
            .unwrap_or(self.settings.default_cycle_length);
        Ok((start, length))
    }

    pub fn status(&self, query: impl IntoCycleDate) -> Result<CycleStatus, CycleError> {
        let (start, length) = self.active_cycle()?;
        Ok(cycle::cycle_status(start, query.into_cycle_date()?, length))
    }

    pub fn navigation(&self) -> Result<NavigationInfo, CycleError> {
        let (start, length) = self.active_cycle()?;
        Ok(prediction::period_navigation_info(start, length, &self.history))
    }

    pub fn calendar(&self) -> Result<CalendarPredictions, CycleError> {
        let (start, length) = self.active_cycle()?;
        Ok(prediction::calendar_predictions(start, length, &self.history))
    }

    pub fn stats(&self) -> CycleStats {
        history::cycle_stats(&self.history)
    }

    /// Per-day grid for one calendar month plus the current predictions.
    pub fn month_view(&self, year: i32, month: u32) -> Result<MonthData, CycleError> {
        let (start, length) = self.active_cycle()?;
        let (first_day, last_day) = month_bounds(year, month)?;
        let predictions = prediction::calendar_predictions(start, length, &self.history);

        let days = first_day
            .iter_days()
            .take_while(|date| *date <= last_day)
            .map(|date| {
                let day = cycle::day_in_cycle(start, date, length);
                let (fertility_level, fertility_percentage) = if self.settings.show_fertility {
                    (
                        Some(phase::fertility_level(day, length)),
                        Some(phase::fertility_percentage(day, length)),
                    )
                } else {
                    (None, None)
                };
                DayStatus {
                    date,
                    day_in_cycle: day,
                    phase: phase::phase(day, length),
                    band: phase::band(day, length),
                    fertility_level,
                    fertility_percentage,
                    is_predicted_period_start: date == predictions.next_period.date,
                    is_predicted_ovulation: date == predictions.ovulation.date,
                }
            })
            .collect();

        Ok(MonthData {
            year,
            month,
            days,
            predictions,
            stats: self.stats(),
        })
    }
}

fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), CycleError> {
    let invalid = || CycleError::InvalidMonth { year, month };
    let first_day = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    Ok((first_day, shift_days(next_month, -1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn loads_stored_json() {
        let json = r#"{
            "startDate": "2025-02-01T08:00:00Z",
            "cycleLength": 28,
            "history": [
                {"startDate": "2024-12-01", "cycleLength": 30, "notes": "travel"},
                {"startDate": "2025-01-02", "cycleLength": 30},
                {"startDate": "not a date"},
                {"cycleLength": null}
            ]
        }"#;
        let snapshot = CycleSnapshot::from_json(json).unwrap();
        assert_eq!(snapshot.history.len(), 4);
        assert_eq!(
            snapshot.active_cycle().unwrap(),
            (ymd(2025, 2, 1), CycleLength::new(28))
        );

        let nav = snapshot.navigation().unwrap();
        assert_eq!(nav.previous.date, ymd(2025, 1, 2));
        assert!(!nav.previous.is_predicted);
        assert_eq!(nav.next.date, ymd(2025, 3, 3));
    }

    #[test]
    fn missing_start_date_is_an_error() {
        let snapshot = CycleSnapshot::from_json(r#"{"cycleLength": 28}"#).unwrap();
        assert!(matches!(
            snapshot.active_cycle(),
            Err(CycleError::MissingStartDate)
        ));
        assert!(snapshot.calendar().is_err());
    }

    #[test]
    fn unparseable_start_date_is_an_error() {
        let snapshot = CycleSnapshot::new("01/07/2025", CycleLength::new(28));
        assert!(matches!(
            snapshot.status(ymd(2025, 7, 2)),
            Err(CycleError::InvalidDate { .. })
        ));
    }

    #[test]
    fn missing_length_uses_settings_default() {
        let snapshot = CycleSnapshot::from_json(
            r#"{"startDate": "2025-07-01", "settings": {"defaultCycleLength": 30}}"#,
        )
        .unwrap();
        let (_, length) = snapshot.active_cycle().unwrap();
        assert_eq!(length.days(), 30);
        assert!(!snapshot.settings.show_fertility);
    }

    #[test]
    fn malformed_length_falls_back_to_settings_default() {
        let snapshot =
            CycleSnapshot::from_json(r#"{"startDate": "2025-07-01", "cycleLength": "30"}"#)
                .unwrap();
        assert_eq!(snapshot.cycle_length, None);
        assert_eq!(
            snapshot.active_cycle().unwrap(),
            (ymd(2025, 7, 1), CycleLength::DEFAULT)
        );

        let snapshot =
            CycleSnapshot::from_json(r#"{"startDate": "2025-07-01", "cycleLength": 40}"#)
                .unwrap();
        assert_eq!(snapshot.cycle_length, Some(CycleLength::new(35)));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            CycleSnapshot::from_json("{"),
            Err(CycleError::Serialization(_))
        ));
    }

    #[test]
    fn status_accepts_text_query() {
        let snapshot = CycleSnapshot::new(ymd(2025, 7, 1), CycleLength::new(28));
        let status = snapshot.status("2025-07-30").unwrap();
        assert_eq!(status.day_in_cycle, 2);
        assert_eq!(status.phase, Phase::Menstrual);
    }

    #[test]
    fn json_round_trip_keeps_history() {
        let snapshot = CycleSnapshot::new(ymd(2025, 7, 1), CycleLength::new(29))
            .with_history(vec![CycleHistoryRecord::new(ymd(2025, 6, 2), 29)]);
        let json = snapshot.to_json().unwrap();
        assert!(json.contains("\"startDate\": \"2025-07-01\""));
        assert_eq!(CycleSnapshot::from_json(&json).unwrap(), snapshot);
    }

    #[test]
    fn month_view_marks_predictions() {
        let snapshot = CycleSnapshot::new(ymd(2025, 7, 1), CycleLength::new(28));
        let month = snapshot.month_view(2025, 7).unwrap();

        assert_eq!(month.days.len(), 31);
        assert_eq!(month.days[0].date, ymd(2025, 7, 1));
        assert_eq!(month.days[0].day_in_cycle, 1);
        assert_eq!(month.days[30].date, ymd(2025, 7, 31));

        let flagged: Vec<NaiveDate> = month
            .days
            .iter()
            .filter(|d| d.is_predicted_period_start || d.is_predicted_ovulation)
            .map(|d| d.date)
            .collect();
        assert_eq!(flagged, vec![ymd(2025, 7, 14), ymd(2025, 7, 29)]);
        assert!(month.days.iter().all(|d| d.fertility_level.is_none()));
        assert_eq!(month.days[28].day_in_cycle, 1);
    }

    #[test]
    fn month_view_includes_fertility_when_enabled() {
        let snapshot = CycleSnapshot::new(ymd(2025, 1, 1), CycleLength::new(21)).with_settings(
            Settings {
                show_fertility: true,
                ..Default::default()
            },
        );
        let month = snapshot.month_view(2025, 2).unwrap();
        assert_eq!(month.days.len(), 28);
        // Feb 1 is day 11 of the cycle that began Jan 22
        assert_eq!(month.days[0].day_in_cycle, 11);
        assert_eq!(month.days[0].phase, Phase::Luteal);
        assert!(month.days.iter().all(|d| d.fertility_percentage.is_some()));
    }

    #[test]
    fn month_view_handles_december_and_bad_months() {
        let snapshot = CycleSnapshot::new(ymd(2024, 12, 15), CycleLength::new(28));
        let december = snapshot.month_view(2024, 12).unwrap();
        assert_eq!(december.days.len(), 31);
        assert!(matches!(
            snapshot.month_view(2024, 13),
            Err(CycleError::InvalidMonth { year: 2024, month: 13 })
        ));
    }
}
