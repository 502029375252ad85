//! Ingestion: from a manifest of CSV files to batches of typed rows.
//!
//! - [`manifest`]: the JSON index of available files
//! - [`source`]: where bytes come from (local directory, or HTTP with the `http` feature)
//! - [`csv`]: the record decoder
//! - [`worker`]: decodes one file on its own thread and sends batches of [`crate::types::Row`]s
//! - [`coordinator`]: runs the workers one after another and tracks [`LoadingStatus`]
//! - [`observability`]: observer hooks for progress, failures and alerts

pub mod coordinator;
pub mod csv;
pub mod manifest;
pub mod observability;
pub mod source;
pub mod worker;

pub use coordinator::{
    Coordinator, CoordinatorOptions, FileError, LoadingStatus, SessionEvent, Wait,
};
pub use manifest::{FileRef, Manifest};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity,
    IngestionStats, TracingObserver, severity_for_error,
};
#[cfg(feature = "http")]
pub use source::HttpSource;
pub use source::{LocalDirSource, Source, SourceReader};
pub use worker::{DEFAULT_BATCH_SIZE, WorkerEvent, WorkerHandle, WorkerOptions};
