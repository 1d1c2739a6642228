#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("invalid date {input:?}: {reason}")]
    InvalidDate { input: String, reason: String },
    #[error("active cycle has no start date")]
    MissingStartDate,
    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
