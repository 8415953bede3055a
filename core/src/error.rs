use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Rider directory lookup failed: {reason}")]
    DirectoryLookup { reason: String },

    #[error("Directory batch of {size} ids exceeds the limit of {limit}")]
    BatchTooLarge { size: usize, limit: usize },

    #[error("Unknown report window '{label}'")]
    InvalidWindow { label: String },

    #[error("Report '{report_id}' not found")]
    ReportNotFound { report_id: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type ReportResult<T> = Result<T, ReportError>;
