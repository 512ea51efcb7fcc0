use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to (de)serialize JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Malformed plate appearance {pa_id}: {reason}")]
    MalformedPlateAppearance { pa_id: i64, reason: String },
    #[error("Plate appearance {pa_id} on {game_date} is out of order (previous: {previous_pa_id} on {previous_date})")]
    OutOfOrder {
        pa_id: i64,
        game_date: NaiveDate,
        previous_pa_id: i64,
        previous_date: NaiveDate
    },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid snapshot record: {0}")]
    InvalidSnapshot(String)
}
