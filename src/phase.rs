//! Phase and fertility classification of a single cycle day.
//!
//! Ovulation is anchored to the end of the cycle (`length - 14`), so the
//! fertile window moves with the cycle length instead of sitting on day 14.

use crate::models::{CycleLength, FertilityLevel, Phase, PhaseBand};

pub const LUTEAL_PHASE_DAYS: u32 = 14;
pub const MENSTRUAL_DAYS: u32 = 5;
/// Ovulation window spans the ovulation day plus this many following days.
pub const OVULATION_WINDOW_TAIL: u32 = 2;
/// Days before ovulation rated `High`.
pub const PRE_OVULATION_DAYS: u32 = 3;
/// Final days of the cycle rated `Low`.
pub const LATE_CYCLE_LOW_DAYS: u32 = 2;

const LATE_LUTEAL_DAYS: u32 = 7;
const VERY_LATE_LUTEAL_DAYS: u32 = 3;

fn clamp_day(day: u32, length: CycleLength) -> u32 {
    day.clamp(1, length.days())
}

fn in_ovulation_window(day: u32, length: CycleLength) -> bool {
    let ovulation = length.ovulation_day();
    day >= ovulation && day <= ovulation + OVULATION_WINDOW_TAIL
}

/// Canonical phase for `day` (1-based) of a cycle of `length` days.
/// Days outside `[1, length]` are clamped into it.
pub fn phase(day: u32, length: CycleLength) -> Phase {
    let day = clamp_day(day, length);

    if day <= MENSTRUAL_DAYS {
        Phase::Menstrual
    } else if in_ovulation_window(day, length) {
        Phase::Ovulation
    } else if day < length.ovulation_day() {
        Phase::Follicular
    } else {
        Phase::Luteal
    }
}

pub fn fertility_level(day: u32, length: CycleLength) -> FertilityLevel {
    let day = clamp_day(day, length);
    let ovulation = length.ovulation_day();

    if day <= MENSTRUAL_DAYS {
        FertilityLevel::VeryLow
    } else if in_ovulation_window(day, length) {
        FertilityLevel::VeryHigh
    } else if day + PRE_OVULATION_DAYS >= ovulation && day < ovulation {
        FertilityLevel::High
    } else if day == 6 || day == 7 || day + LATE_CYCLE_LOW_DAYS >= length.days() {
        FertilityLevel::Low
    } else {
        FertilityLevel::Medium
    }
}

/// Banded 0-100 score. Rises towards the ovulation day, falls after it,
/// and always lands inside the range of the matching `FertilityLevel`:
/// VeryLow <10, Low 10-24, Medium 25-59, High 60-84, VeryHigh 85-100.
pub fn fertility_percentage(day: u32, length: CycleLength) -> u8 {
    let day = clamp_day(day, length);
    let ovulation = length.ovulation_day();

    let score = match fertility_level(day, length) {
        FertilityLevel::VeryLow => 2 * day - 1,
        FertilityLevel::VeryHigh => 100 - 5 * (day - ovulation),
        FertilityLevel::High => 80 - 10 * (ovulation - 1 - day),
        FertilityLevel::Low if day < ovulation => 10 + 5 * (day - 6),
        FertilityLevel::Low => 24 - 5 * (day + LATE_CYCLE_LOW_DAYS - length.days()),
        FertilityLevel::Medium if day < ovulation => 25 + 3 * (day - 8),
        FertilityLevel::Medium => {
            55 - 3 * (day - (ovulation + OVULATION_WINDOW_TAIL + 1))
        }
    };
    score.min(100) as u8
}

/// Display band, splitting `Luteal` by days left before the next cycle.
pub fn band(day: u32, length: CycleLength) -> PhaseBand {
    let day = clamp_day(day, length);
    match phase(day, length) {
        Phase::Menstrual => PhaseBand::Menstrual,
        Phase::Follicular => PhaseBand::Follicular,
        Phase::Ovulation => PhaseBand::Ovulation,
        Phase::Luteal => {
            let remaining = length.days() - day;
            if remaining <= VERY_LATE_LUTEAL_DAYS {
                PhaseBand::VeryLateLuteal
            } else if remaining <= LATE_LUTEAL_DAYS {
                PhaseBand::LateLuteal
            } else {
                PhaseBand::EarlyLuteal
            }
        }
    }
}
