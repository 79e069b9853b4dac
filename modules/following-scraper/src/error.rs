use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScraperError>;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Malformed node: expected a JSON object, got {0}")]
    MalformedNode(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
