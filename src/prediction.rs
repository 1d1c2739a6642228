use chrono::NaiveDate;

use crate::date::shift_days;
use crate::history::{average_cycle_length, regularity};
use crate::models::{
    CalendarPredictions, CycleHistoryRecord, CycleLength, NavigationEvent, NavigationInfo,
    PredictionResult, PredictionType,
};

/// History average whenever any history is recorded, otherwise the current
/// length. A history whose records all lack a length averages to the default.
pub fn effective_cycle_length(
    current_length: CycleLength,
    history: &[CycleHistoryRecord],
) -> CycleLength {
    if !history.is_empty() {
        average_cycle_length(history)
    } else {
        current_length
    }
}

pub fn next_period_date(
    current_start: NaiveDate,
    current_length: CycleLength,
    history: &[CycleHistoryRecord],
) -> NaiveDate {
    let length = effective_cycle_length(current_length, history);
    shift_days(current_start, i64::from(length.days()))
}

/// Most recent recorded start strictly before `current_start`.
fn previous_observed_start(
    current_start: NaiveDate,
    history: &[CycleHistoryRecord],
) -> Option<NaiveDate> {
    history
        .iter()
        .filter_map(CycleHistoryRecord::start)
        .filter(|start| *start < current_start)
        .max()
}

/// The previous period start: a recorded one when history has it,
/// otherwise projected one cycle back.
pub fn previous_period_date(
    current_start: NaiveDate,
    current_length: CycleLength,
    history: &[CycleHistoryRecord],
) -> NaiveDate {
    previous_observed_start(current_start, history)
        .unwrap_or_else(|| project_back(current_start, current_length, history))
}

fn project_back(
    current_start: NaiveDate,
    current_length: CycleLength,
    history: &[CycleHistoryRecord],
) -> NaiveDate {
    let length = effective_cycle_length(current_length, history);
    tracing::debug!(%current_start, length = length.days(), "projecting previous period");
    shift_days(current_start, -i64::from(length.days()))
}

/// Date of the ovulation day (`length - 14`) of the cycle starting on `start`.
pub fn predicted_ovulation_date(start: NaiveDate, length: CycleLength) -> NaiveDate {
    shift_days(start, i64::from(length.ovulation_day()) - 1)
}

/// Previous and next period starts, tagged with where each came from.
pub fn period_navigation_info(
    current_start: NaiveDate,
    current_length: CycleLength,
    history: &[CycleHistoryRecord],
) -> NavigationInfo {
    let based_on_history = !history.is_empty();
    let cycle_length = effective_cycle_length(current_length, history);

    let next = NavigationEvent {
        date: next_period_date(current_start, current_length, history),
        is_predicted: true,
        based_on_history,
        cycle_length,
    };

    let previous = match previous_observed_start(current_start, history) {
        Some(date) => NavigationEvent {
            date,
            is_predicted: false,
            based_on_history,
            cycle_length,
        },
        None => NavigationEvent {
            date: project_back(current_start, current_length, history),
            is_predicted: true,
            based_on_history,
            cycle_length,
        },
    };

    NavigationInfo { next, previous }
}

/// Ovulation and next-period predictions for calendar highlighting.
/// Both carry the same confidence, derived once from history.
pub fn calendar_predictions(
    cycle_start: NaiveDate,
    cycle_length: CycleLength,
    history: &[CycleHistoryRecord],
) -> CalendarPredictions {
    let confidence = regularity(history);
    let length = effective_cycle_length(cycle_length, history);

    CalendarPredictions {
        ovulation: PredictionResult {
            date: predicted_ovulation_date(cycle_start, length),
            confidence,
            prediction_type: PredictionType::Ovulation,
        },
        next_period: PredictionResult {
            date: next_period_date(cycle_start, cycle_length, history),
            confidence,
            prediction_type: PredictionType::Period,
        },
    }
}
