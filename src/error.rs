use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned by ingestion functions.
///
/// A single enum shared by the manifest loader, the sources, the CSV decoder and the worker
/// supervision in the coordinator.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON decoding error (manifest or options).
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "http")]
    /// HTTP transport error (feature-gated behind `http`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The CSV headers do not contain every column of the expected schema.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// The manifest could not be fetched or does not list any files.
    #[error("manifest error: {message}")]
    Manifest { message: String },

    /// The worker thread for a file panicked before reporting a terminal event.
    #[error("worker for '{file}' panicked: {message}")]
    WorkerPanicked { file: String, message: String },

    /// The worker thread for a file went away without reporting a terminal event.
    #[error("worker for '{file}' exited without completing")]
    WorkerDisconnected { file: String },
}

impl IngestionError {
    pub(crate) fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest {
            message: message.into(),
        }
    }
}
