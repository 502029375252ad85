use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Deserialize;

use crate::error::IngestionError;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub enum IngestionSeverity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal).
    Warning,
    /// Error-level event (one file failed).
    Error,
    /// Critical error (I/O, transport, or a crashed worker).
    Critical,
}

/// Context about the file currently being ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionContext {
    /// Manifest label of the file.
    pub label: String,
    /// Resolved location the worker opened.
    pub location: String,
    /// Zero-based position of the file in the session.
    pub position: usize,
    /// Number of files in the session.
    pub files_total: usize,
}

/// Minimal stats reported when a file completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    /// Number of rows ingested from the file.
    pub rows: usize,
}

/// Observer interface for ingestion progress and outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts. Every method defaults to a no-op.
pub trait IngestionObserver: Send + Sync {
    /// Called when the worker for a file is started.
    fn on_file_started(&self, _ctx: &IngestionContext) {}

    /// Called for every batch of rows received from the worker.
    fn on_batch(&self, _ctx: &IngestionContext, _rows: usize) {}

    /// Called when a file completes.
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    /// Called when a file fails.
    fn on_failure(
        &self,
        _ctx: &IngestionContext,
        _severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
    }

    /// Called when a file failure meets an alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        self.on_failure(ctx, severity, error)
    }
}

/// Severity assigned to a file-level failure.
pub fn severity_for_error(e: &IngestionError) -> IngestionSeverity {
    match e {
        IngestionError::Io(_) => IngestionSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => IngestionSeverity::Critical,
            _ => IngestionSeverity::Error,
        },
        #[cfg(feature = "http")]
        IngestionError::Http(_) => IngestionSeverity::Critical,
        IngestionError::WorkerPanicked { .. } | IngestionError::WorkerDisconnected { .. } => {
            IngestionSeverity::Critical
        }
        IngestionError::Json(err) if err.is_io() => IngestionSeverity::Critical,
        IngestionError::Json(_) => IngestionSeverity::Error,
        IngestionError::SchemaMismatch { .. } | IngestionError::Manifest { .. } => {
            IngestionSeverity::Error
        }
    }
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_file_started(&self, ctx: &IngestionContext) {
        for o in &self.observers {
            o.on_file_started(ctx);
        }
    }

    fn on_batch(&self, ctx: &IngestionContext, rows: usize) {
        for o in &self.observers {
            o.on_batch(ctx, rows);
        }
    }

    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_failure(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Forwards ingestion events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl IngestionObserver for TracingObserver {
    fn on_file_started(&self, ctx: &IngestionContext) {
        tracing::debug!(
            file = %ctx.label,
            position = ctx.position,
            of = ctx.files_total,
            "file started"
        );
    }

    fn on_batch(&self, ctx: &IngestionContext, rows: usize) {
        tracing::trace!(file = %ctx.label, rows, "batch received");
    }

    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        tracing::info!(file = %ctx.label, rows = stats.rows, "file loaded");
    }

    fn on_failure(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        tracing::warn!(file = %ctx.label, ?severity, %error, "file failed");
    }

    fn on_alert(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        tracing::error!(
            file = %ctx.label,
            location = %ctx.location,
            ?severity,
            %error,
            "ingestion alert"
        );
    }
}

/// Appends completion and failure events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append_line(&format!(
            "{} ok file={} location={} rows={}",
            unix_ts(),
            ctx.label,
            ctx.location,
            stats.rows
        ));
    }

    fn on_failure(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        self.append_line(&format!(
            "{} fail severity={:?} file={} location={} err={}",
            unix_ts(),
            severity,
            ctx.label,
            ctx.location,
            error
        ));
    }

    fn on_alert(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        error: &IngestionError,
    ) {
        self.append_line(&format!(
            "{} ALERT severity={:?} file={} location={} err={}",
            unix_ts(),
            severity,
            ctx.label,
            ctx.location,
            error
        ));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
