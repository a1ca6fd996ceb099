use thiserror::Error;

#[derive(Error, Debug)]
pub enum SalesTrackerError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Invalid date range: end date {to} is before start date {from}")]
    InvalidDateRange {
        from: chrono::NaiveDate,
        to: chrono::NaiveDate,
    },

    #[error("Unknown customer: {0}")]
    CustomerNotFound(String),

    #[error("Document export unavailable: {0}")]
    ExportUnavailable(String),

    #[error("Document rendering failed: {0}")]
    DocumentRender(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SalesTrackerError>;
