use chrono::NaiveDate;

use crate::models::{Confidence, CycleHistoryRecord, CycleLength, CycleStats};

/// Number of most recent cycles used for averages and regularity.
pub const HISTORY_WINDOW: usize = 6;
pub const MIN_RECORDS_FOR_REGULARITY: usize = 3;
pub const HIGH_CONFIDENCE_MAX_STD_DEV: f64 = 2.0;
pub const LOW_CONFIDENCE_MIN_STD_DEV: f64 = 4.0;

/// Records that carry a length, oldest first. Undated records sort before
/// dated ones and keep their insertion order.
fn usable(history: &[CycleHistoryRecord]) -> Vec<(Option<NaiveDate>, CycleLength)> {
    let mut usable: Vec<(Option<NaiveDate>, CycleLength)> = history
        .iter()
        .enumerate()
        .filter_map(|(index, record)| match (record.cycle_length, record.length()) {
            (Some(raw), Some(length)) => {
                if raw != i64::from(length.days()) {
                    tracing::debug!(
                        index,
                        raw,
                        clamped = length.days(),
                        "clamping recorded cycle length"
                    );
                }
                Some((record.start(), length))
            }
            _ => {
                tracing::debug!(index, "skipping history record without cycle length");
                None
            }
        })
        .collect();
    usable.sort_by_key(|(start, _)| *start);
    usable
}

/// Lengths of the most recent `HISTORY_WINDOW` usable records.
fn recent_lengths(history: &[CycleHistoryRecord]) -> Vec<f64> {
    let usable = usable(history);
    let skip = usable.len().saturating_sub(HISTORY_WINDOW);
    usable
        .iter()
        .skip(skip)
        .map(|(_, length)| f64::from(length.days()))
        .collect()
}

/// Rounded mean of the recent window, or the 28-day default without usable history.
pub fn average_cycle_length(history: &[CycleHistoryRecord]) -> CycleLength {
    match mean(&recent_lengths(history)) {
        Some(avg) => CycleLength::new(avg.round() as i64),
        None => CycleLength::DEFAULT,
    }
}

/// Confidence from the spread of recent cycle lengths.
pub fn regularity(history: &[CycleHistoryRecord]) -> Confidence {
    classify(&recent_lengths(history))
}

fn classify(lengths: &[f64]) -> Confidence {
    let Some(avg) = mean(lengths) else {
        return Confidence::Low;
    };
    match lengths.len() {
        n if n < MIN_RECORDS_FOR_REGULARITY => Confidence::Medium,
        _ => {
            let std_dev = spread(lengths, avg);
            if std_dev < HIGH_CONFIDENCE_MAX_STD_DEV {
                Confidence::High
            } else if std_dev > LOW_CONFIDENCE_MIN_STD_DEV {
                Confidence::Low
            } else {
                Confidence::Medium
            }
        }
    }
}

/// Summary of the history. Average, spread and regularity cover the same
/// recent window as `average_cycle_length`; counts, extremes and the last
/// start cover every record.
pub fn cycle_stats(history: &[CycleHistoryRecord]) -> CycleStats {
    let usable = usable(history);
    let recent = recent_lengths(history);

    let average = mean(&recent);
    let std_dev = average.filter(|_| recent.len() >= 2).map(|avg| spread(&recent, avg));
    let regularity_score = match (average, std_dev) {
        (Some(avg), Some(sd)) if recent.len() >= MIN_RECORDS_FOR_REGULARITY => {
            Some((1.0 - (sd / avg) as f32).clamp(0.1, 0.95))
        }
        _ => None,
    };

    CycleStats {
        total_records: history.len(),
        usable_records: usable.len(),
        average_cycle_length: average.map(|avg| avg as f32),
        std_deviation: std_dev.map(|sd| sd as f32),
        shortest_cycle: usable.iter().map(|(_, length)| length.days()).min(),
        longest_cycle: usable.iter().map(|(_, length)| length.days()).max(),
        last_period_start: history.iter().filter_map(CycleHistoryRecord::start).max(),
        regularity_score,
        confidence: classify(&recent),
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation around `avg`.
fn spread(values: &[f64], avg: f64) -> f64 {
    let squared: f64 = values.iter().map(|v| (v - avg) * (v - avg)).sum();
    (squared / values.len() as f64).sqrt()
}
