#![allow(dead_code)]

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

/// Route engine logs to the test output. Filter with `CYKEL_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("CYKEL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
