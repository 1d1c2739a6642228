//! Cycle phase, fertility and period prediction engine.
//!
//! Every function here is pure: dates go in, classifications and predicted
//! dates come out. Nothing reads the clock, so "today" is always a parameter.
//! Phase is not a state machine either; it is recomputed from
//! `(day_in_cycle, cycle_length)` on every call.
//!
//! Layers, leaves first:
//!
//! - [`cycle`]: day-within-cycle indexing with wraparound
//! - [`phase`]: phase, fertility level and percentage, display bands
//! - [`history`]: windowed average length and regularity
//! - [`prediction`]: next/previous period, ovulation, navigation, calendar
//! - [`snapshot`]: the persistence boundary, with date normalization from [`date`]

pub mod cycle;
pub mod date;
pub mod error;
pub mod history;
pub mod models;
pub mod phase;
pub mod prediction;
pub mod snapshot;

pub use cycle::{cycle_status, day_in_cycle};
pub use date::{parse_date, DateValue, IntoCycleDate};
pub use error::CycleError;
pub use history::{average_cycle_length, cycle_stats, regularity};
pub use models::*;
pub use phase::{band, fertility_level, fertility_percentage, phase};
pub use prediction::{
    calendar_predictions, effective_cycle_length, next_period_date, period_navigation_info,
    predicted_ovulation_date, previous_period_date,
};
pub use snapshot::CycleSnapshot;
