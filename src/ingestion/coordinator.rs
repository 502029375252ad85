//! Sequential multi-file ingestion.
//!
//! The [`Coordinator`] ingests the manifest's files strictly one at a time, in manifest order:
//! the worker for file N+1 is spawned only after file N delivered its terminal event and its
//! thread was joined. This bounds peak memory to one in-flight file and keeps progress
//! accounting simple. A failing (or crashing) file is recorded in [`LoadingStatus::errors`] and
//! the session moves on; nothing is retried.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::error::IngestionError;
use crate::types::Row;

use super::manifest::FileRef;
use super::observability::{
    IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, severity_for_error,
};
use super::source::Source;
use super::worker::{WorkerEvent, WorkerHandle, WorkerOptions, WorkerPoll};

/// How long a call may wait for the next event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wait {
    /// Wait until an event arrives.
    Block,
    /// Return immediately if nothing is ready.
    Poll,
    /// Wait at most the given duration.
    Timeout(Duration),
}

/// One failed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    pub label: String,
    pub message: String,
}

/// Progress of a loading session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingStatus {
    pub files_total: usize,
    /// Files that reached a terminal event, successful or not.
    pub files_completed: usize,
    pub rows_loaded: usize,
    /// Failed files, in the order they failed.
    pub errors: Vec<FileError>,
    /// Session-fatal error (e.g. the manifest could not be loaded).
    pub fatal: Option<String>,
}

impl LoadingStatus {
    /// A fresh status for a session over `files_total` files.
    pub fn new(files_total: usize) -> Self {
        Self {
            files_total,
            ..Default::default()
        }
    }

    /// A status for a session that could not start.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            fatal: Some(message.into()),
            ..Default::default()
        }
    }

    /// Every file reached its terminal event (or the session never started).
    pub fn is_done(&self) -> bool {
        self.fatal.is_some() || self.files_completed >= self.files_total
    }
}

/// Events republished by the coordinator, in delivery order.
#[derive(Debug)]
pub enum SessionEvent {
    /// Rows from `file`.
    Rows { file: String, rows: Vec<Row> },
    /// `file` finished with `total` rows.
    FileCompleted { file: String, total: usize },
    /// `file` failed; rows it already delivered stay loaded.
    FileFailed { file: String, error: IngestionError },
}

/// Coordinator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoordinatorOptions {
    /// Options passed to every worker.
    pub worker: WorkerOptions,
    /// Failures at or above this severity are also reported through `on_alert`.
    pub alert_at_or_above: IngestionSeverity,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            worker: WorkerOptions::default(),
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

struct ActiveFile {
    handle: WorkerHandle,
    ctx: IngestionContext,
}

/// Drives one worker at a time across the session's files.
pub struct Coordinator {
    source: Arc<dyn Source>,
    pending: VecDeque<FileRef>,
    active: Option<ActiveFile>,
    started: usize,
    status: LoadingStatus,
    opts: CoordinatorOptions,
    observer: Option<Arc<dyn IngestionObserver>>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("pending", &self.pending.len())
            .field("active", &self.active.as_ref().map(|a| &a.ctx.label))
            .field("status", &self.status)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl Coordinator {
    /// Create a coordinator over `files`. Nothing starts until the first
    /// [`Coordinator::next_event`] call.
    pub fn new(source: Arc<dyn Source>, files: Vec<FileRef>, opts: CoordinatorOptions) -> Self {
        let status = LoadingStatus::new(files.len());
        Self {
            source,
            pending: files.into(),
            active: None,
            started: 0,
            status,
            opts,
            observer: None,
        }
    }

    /// Attach an observer for per-file progress and failures.
    pub fn with_observer(mut self, observer: Arc<dyn IngestionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Current progress.
    pub fn status(&self) -> &LoadingStatus {
        &self.status
    }

    /// Label of the file currently being ingested.
    pub fn active_file(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.ctx.label.as_str())
    }

    /// No file is running and none is left.
    pub fn is_finished(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }

    /// Return the next session event, starting the next file's worker when needed.
    ///
    /// Returns `None` when nothing arrived within `wait`, or when the session is finished
    /// (check [`Coordinator::is_finished`]).
    pub fn next_event(&mut self, wait: Wait) -> Option<SessionEvent> {
        if self.active.is_none() {
            let file = self.pending.pop_front()?;
            if let Err((ctx, e)) = self.start(file) {
                return Some(self.fail(&ctx, e));
            }
        }

        let active = self.active.as_ref()?;
        match active.handle.poll(wait) {
            WorkerPoll::Pending => None,
            WorkerPoll::Event(WorkerEvent::Rows(rows)) => {
                self.status.rows_loaded += rows.len();
                if let Some(obs) = &self.observer {
                    obs.on_batch(&active.ctx, rows.len());
                }
                Some(SessionEvent::Rows {
                    file: active.ctx.label.clone(),
                    rows,
                })
            }
            WorkerPoll::Event(WorkerEvent::Complete { total }) => {
                let ctx = self.retire()?;
                self.status.files_completed += 1;
                tracing::debug!(file = %ctx.label, total, "file complete");
                if let Some(obs) = &self.observer {
                    obs.on_success(&ctx, IngestionStats { rows: total });
                }
                Some(SessionEvent::FileCompleted {
                    file: ctx.label,
                    total,
                })
            }
            WorkerPoll::Event(WorkerEvent::Error(e)) => {
                let ctx = self.retire()?;
                Some(self.fail(&ctx, e))
            }
            WorkerPoll::Closed => {
                let Some(ActiveFile { handle, ctx }) = self.active.take() else {
                    return None;
                };
                let err = handle.finish().unwrap_or_else(|| IngestionError::WorkerDisconnected {
                    file: ctx.label.clone(),
                });
                Some(self.fail(&ctx, err))
            }
        }
    }

    /// Drain the whole session, handing every event to `on_event`.
    pub fn run<F>(&mut self, mut on_event: F)
    where
        F: FnMut(SessionEvent),
    {
        while !self.is_finished() {
            if let Some(ev) = self.next_event(Wait::Block) {
                on_event(ev);
            }
        }
    }

    fn context_for(&self, file: &FileRef) -> IngestionContext {
        IngestionContext {
            label: file.label.clone(),
            location: file.location.clone(),
            position: self.started,
            files_total: self.status.files_total,
        }
    }

    fn start(&mut self, file: FileRef) -> Result<(), (IngestionContext, IngestionError)> {
        let ctx = self.context_for(&file);
        self.started += 1;
        tracing::debug!(file = %ctx.label, position = ctx.position, "starting worker");
        let handle = match WorkerHandle::spawn(Arc::clone(&self.source), file, self.opts.worker) {
            Ok(handle) => handle,
            Err(e) => return Err((ctx, e)),
        };
        if let Some(obs) = &self.observer {
            obs.on_file_started(&ctx);
        }
        self.active = Some(ActiveFile { handle, ctx });
        Ok(())
    }

    // Joins the finished worker. A panic after the terminal event is only logged: the file's
    // outcome was already delivered.
    fn retire(&mut self) -> Option<IngestionContext> {
        let ActiveFile { handle, ctx } = self.active.take()?;
        if let Some(err) = handle.finish() {
            tracing::warn!(file = %ctx.label, %err, "worker panicked after its terminal event");
        }
        Some(ctx)
    }

    fn fail(&mut self, ctx: &IngestionContext, error: IngestionError) -> SessionEvent {
        self.status.files_completed += 1;
        self.status.errors.push(FileError {
            label: ctx.label.clone(),
            message: error.to_string(),
        });

        let severity = severity_for_error(&error);
        tracing::warn!(file = %ctx.label, ?severity, %error, "file failed to load");
        if let Some(obs) = &self.observer {
            obs.on_failure(ctx, severity, &error);
            if severity >= self.opts.alert_at_or_above {
                obs.on_alert(ctx, severity, &error);
            }
        }

        SessionEvent::FileFailed {
            file: ctx.label.clone(),
            error,
        }
    }
}
