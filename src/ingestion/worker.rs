//! Per-file ingestion worker.
//!
//! A worker decodes one CSV file on its own thread, projects every record into a [`Row`] tagged
//! with the file's label, and sends rows back in batches over a bounded channel. Each worker
//! emits any number of [`WorkerEvent::Rows`] followed by exactly one terminal event
//! ([`WorkerEvent::Complete`] or [`WorkerEvent::Error`]). If the thread dies before sending the
//! terminal event, [`WorkerHandle::finish`] reports the crash as an error instead.

use std::any::Any;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::thread::{self, JoinHandle};

use serde::Deserialize;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{Row, RowProjection, Schema};

use super::coordinator::Wait;
use super::csv::decode_csv_chunks;
use super::manifest::FileRef;
use super::source::Source;

/// Default number of rows per [`WorkerEvent::Rows`] batch.
pub const DEFAULT_BATCH_SIZE: usize = 4_000;

/// Options for a single ingestion worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WorkerOptions {
    /// Rows buffered before a batch is sent. `0` is treated as `1`.
    pub batch_size: usize,
    /// Records handed from the decoder to the worker buffer at a time.
    pub decode_chunk_size: usize,
    /// Batches that may sit in the channel before the worker blocks.
    pub channel_capacity: usize,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            decode_chunk_size: 1_024,
            channel_capacity: 4,
        }
    }
}

/// Events sent from a worker to the coordinator, in emission order.
#[derive(Debug)]
pub enum WorkerEvent {
    /// A batch of decoded rows.
    Rows(Vec<Row>),
    /// The file was fully decoded; `total` rows were sent.
    Complete { total: usize },
    /// Decoding failed. Rows already sent are kept.
    Error(IngestionError),
}

impl WorkerEvent {
    /// Whether this is the last event of the file.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, WorkerEvent::Rows(_))
    }
}

/// Outcome of waiting on a worker's channel.
#[derive(Debug)]
pub enum WorkerPoll {
    /// The next event.
    Event(WorkerEvent),
    /// Nothing arrived within the wait.
    Pending,
    /// The worker dropped its sender; no more events will come.
    Closed,
}

/// Handle to a running worker thread.
#[derive(Debug)]
pub struct WorkerHandle {
    file: FileRef,
    rx: Receiver<WorkerEvent>,
    join: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    /// Start decoding `file` from `source` on a new thread.
    pub fn spawn(
        source: Arc<dyn Source>,
        file: FileRef,
        opts: WorkerOptions,
    ) -> IngestionResult<Self> {
        let (tx, rx) = mpsc::sync_channel(opts.channel_capacity.max(1));
        let worker_file = file.clone();
        let join = thread::Builder::new()
            .name(thread_name(&file.label))
            .spawn(move || run_worker(source.as_ref(), &worker_file, opts, &tx))?;
        Ok(Self {
            file,
            rx,
            join: Some(join),
        })
    }

    /// The file this worker is ingesting.
    pub fn file(&self) -> &FileRef {
        &self.file
    }

    /// Wait for the next event.
    pub fn poll(&self, wait: Wait) -> WorkerPoll {
        match wait {
            Wait::Block => match self.rx.recv() {
                Ok(ev) => WorkerPoll::Event(ev),
                Err(_) => WorkerPoll::Closed,
            },
            Wait::Poll => match self.rx.try_recv() {
                Ok(ev) => WorkerPoll::Event(ev),
                Err(TryRecvError::Empty) => WorkerPoll::Pending,
                Err(TryRecvError::Disconnected) => WorkerPoll::Closed,
            },
            Wait::Timeout(d) => match self.rx.recv_timeout(d) {
                Ok(ev) => WorkerPoll::Event(ev),
                Err(RecvTimeoutError::Timeout) => WorkerPoll::Pending,
                Err(RecvTimeoutError::Disconnected) => WorkerPoll::Closed,
            },
        }
    }

    /// Join the worker thread.
    ///
    /// Returns an error if the thread panicked. Only call this after the terminal event was
    /// received or the channel closed, otherwise it blocks until the worker is done.
    pub fn finish(mut self) -> Option<IngestionError> {
        let join = self.join.take()?;
        match join.join() {
            Ok(()) => None,
            Err(payload) => Some(IngestionError::WorkerPanicked {
                file: self.file.label.clone(),
                message: panic_message(payload.as_ref()),
            }),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// Thread names may not contain NUL; std panics on them instead of returning an error.
fn thread_name(label: &str) -> String {
    format!("ingest-{}", label.replace('\0', "\u{fffd}"))
}

fn run_worker(
    source: &dyn Source,
    file: &FileRef,
    opts: WorkerOptions,
    tx: &SyncSender<WorkerEvent>,
) {
    let terminal = match ingest_file(source, file, opts, tx) {
        Ok(total) => WorkerEvent::Complete { total },
        Err(e) => WorkerEvent::Error(e),
    };
    // The receiver may already be gone; there is no one left to tell.
    let _ = tx.send(terminal);
}

fn ingest_file(
    source: &dyn Source,
    file: &FileRef,
    opts: WorkerOptions,
    tx: &SyncSender<WorkerEvent>,
) -> IngestionResult<usize> {
    let schema = Schema::ewas();
    let projection = RowProjection::new(&schema)?;
    let reader = source.open(&file.location)?;

    let mut buffer = RowBuffer::new(opts.batch_size);
    let mut disconnected = false;
    let total = decode_csv_chunks(reader, &schema, opts.decode_chunk_size, |chunk| {
        if disconnected {
            return;
        }
        buffer.extend(chunk.iter().map(|record| projection.project(record, &file.label)));
        while let Some(batch) = buffer.take_full() {
            if tx.send(WorkerEvent::Rows(batch)).is_err() {
                disconnected = true;
                return;
            }
        }
    })?;

    if let Some(rest) = buffer.take_rest() {
        // Ignored like above: a gone receiver also drops the terminal event.
        let _ = tx.send(WorkerEvent::Rows(rest));
    }
    Ok(total)
}

/// Accumulates rows and hands them out in batches of exactly `batch_size`.
#[derive(Debug)]
struct RowBuffer {
    batch_size: usize,
    rows: Vec<Row>,
}

impl RowBuffer {
    fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            rows: Vec::new(),
        }
    }

    fn extend(&mut self, rows: impl IntoIterator<Item = Row>) {
        self.rows.extend(rows);
    }

    fn take_full(&mut self) -> Option<Vec<Row>> {
        if self.rows.len() < self.batch_size {
            return None;
        }
        let rest = self.rows.split_off(self.batch_size);
        Some(std::mem::replace(&mut self.rows, rest))
    }

    fn take_rest(&mut self) -> Option<Vec<Row>> {
        if self.rows.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.rows))
        }
    }
}
