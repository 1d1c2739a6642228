use chrono::NaiveDate;

use crate::models::{CycleLength, CycleStatus};
use crate::phase;

/// 1-based day of the cycle that `query` falls on, for a cycle starting on
/// `start` and repeating every `length` days.
///
/// Start dates after `query` fold back into earlier cycles, so the result is
/// always in `[1, length]`.
pub fn day_in_cycle(start: NaiveDate, query: NaiveDate, length: CycleLength) -> u32 {
    let elapsed = (query - start).num_days();
    elapsed.rem_euclid(i64::from(length.days())) as u32 + 1
}

/// Day index, phase, band and fertility for `query`.
pub fn cycle_status(start: NaiveDate, query: NaiveDate, length: CycleLength) -> CycleStatus {
    let day = day_in_cycle(start, query, length);
    CycleStatus {
        day_in_cycle: day,
        days_remaining: length.days() - day,
        phase: phase::phase(day, length),
        band: phase::band(day, length),
        fertility_level: phase::fertility_level(day, length),
        fertility_percentage: phase::fertility_percentage(day, length),
    }
}
