use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date::{self, DateValue, IntoCycleDate};

/// Length of one cycle in days, always within `[MIN, MAX]`.
///
/// The only way to build one is through clamping, so every length the
/// engine sees is already in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u32")]
pub struct CycleLength(u32);

impl CycleLength {
    pub const MIN: u32 = 21;
    pub const MAX: u32 = 35;
    pub const DEFAULT: CycleLength = CycleLength(28);

    pub fn new(days: i64) -> Self {
        let length = Self::clamped(days);
        if i64::from(length.0) != days {
            tracing::warn!(requested = days, clamped = length.0, "cycle length out of range");
        }
        length
    }

    /// Clamp without logging. Stored records are re-read on every
    /// computation, so their lengths take this path.
    fn clamped(days: i64) -> Self {
        CycleLength(days.clamp(i64::from(Self::MIN), i64::from(Self::MAX)) as u32)
    }

    pub fn days(self) -> u32 {
        self.0
    }

    /// Day index of ovulation: 14 days before the next cycle begins.
    pub fn ovulation_day(self) -> u32 {
        self.0 - crate::phase::LUTEAL_PHASE_DAYS
    }
}

impl Default for CycleLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<i64> for CycleLength {
    fn from(days: i64) -> Self {
        CycleLength::new(days)
    }
}

impl From<CycleLength> for u32 {
    fn from(length: CycleLength) -> Self {
        length.0
    }
}

/// Canonical phase of a cycle day. Recomputed on every call, never advanced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

/// Display bands. Luteal is split by the number of days left in the cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PhaseBand {
    Menstrual,
    Follicular,
    Ovulation,
    EarlyLuteal,
    LateLuteal,
    VeryLateLuteal,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FertilityLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PredictionType {
    Ovulation,
    Period,
}

/// One past cycle as stored by the persistence layer.
///
/// Fields are optional so a damaged record can still be loaded; the engine
/// skips whatever it cannot use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleHistoryRecord {
    #[serde(default, deserialize_with = "date::lenient")]
    pub start_date: Option<DateValue>,
    #[serde(default, deserialize_with = "date::lenient")]
    pub cycle_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CycleHistoryRecord {
    pub fn new(start_date: NaiveDate, cycle_length: u32) -> Self {
        Self {
            start_date: Some(DateValue::Native(start_date)),
            cycle_length: Some(i64::from(cycle_length)),
            notes: None,
        }
    }

    /// Start date, if present and parseable.
    pub fn start(&self) -> Option<NaiveDate> {
        self.start_date
            .as_ref()
            .and_then(|value| value.into_cycle_date().ok())
    }

    /// Observed length, clamped into range.
    pub fn length(&self) -> Option<CycleLength> {
        self.cycle_length.map(CycleLength::clamped)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub date: NaiveDate,
    pub confidence: Confidence,
    #[serde(rename = "type")]
    pub prediction_type: PredictionType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarPredictions {
    pub ovulation: PredictionResult,
    pub next_period: PredictionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    pub date: NaiveDate,
    pub is_predicted: bool,
    pub based_on_history: bool,
    pub cycle_length: CycleLength,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationInfo {
    pub next: NavigationEvent,
    pub previous: NavigationEvent,
}

/// Everything the UI shows for a single day of the active cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleStatus {
    pub day_in_cycle: u32,
    pub days_remaining: u32,
    pub phase: Phase,
    pub band: PhaseBand,
    pub fertility_level: FertilityLevel,
    pub fertility_percentage: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleStats {
    pub total_records: usize,
    pub usable_records: usize,
    pub average_cycle_length: Option<f32>,
    pub std_deviation: Option<f32>,
    pub shortest_cycle: Option<u32>,
    pub longest_cycle: Option<u32>,
    pub last_period_start: Option<NaiveDate>,
    pub regularity_score: Option<f32>,
    pub confidence: Confidence,
}

/// One cell of a month grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayStatus {
    pub date: NaiveDate,
    pub day_in_cycle: u32,
    pub phase: Phase,
    pub band: PhaseBand,
    pub fertility_level: Option<FertilityLevel>,
    pub fertility_percentage: Option<u8>,
    pub is_predicted_period_start: bool,
    pub is_predicted_ovulation: bool,
}

/// Data returned to the frontend for a month view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthData {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayStatus>,
    pub predictions: CalendarPredictions,
    pub stats: CycleStats,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub show_fertility: bool,
    #[serde(default)]
    pub default_cycle_length: CycleLength,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fertility: false,
            default_cycle_length: CycleLength::DEFAULT,
        }
    }
}
