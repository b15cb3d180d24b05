use thiserror::Error;

/// Document-level failures. Row-level misses never surface here; they are
/// counted in the parse report instead.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("unsupported statement format: expected a Google Pay or HDFC Bank statement")]
    UnsupportedFormat,

    #[error("document contains no text")]
    EmptyDocument,

    #[error("failed to read page {page}: {message}")]
    Source { page: usize, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid token dump: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
