#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::Path;
use std::sync::{Arc, Mutex};

use ewas_explorer::IngestionError;
use ewas_explorer::ingestion::{
    IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, LocalDirSource, Source,
};

pub const HEADER: &str = "Phenotype,Tissue,Type,Method,N,CpG,Location,Gene,Beta,P";

/// A CSV body with `rows` generated records. Row `i` has CpG `cg{i}` and P `(i + 1) * 1e-6`.
pub fn ewas_csv(phenotype: &str, tissue: &str, rows: usize) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for i in 0..rows {
        let _ = writeln!(
            out,
            "{phenotype},{tissue},Survival,Beta,{n},cg{i},chr1:{pos},GENE{g},{beta},{p:e}",
            n = 100 + i,
            pos = 1000 + i,
            g = i % 7,
            beta = (i % 10) as f64 / 100.0,
            p = (i + 1) as f64 * 1e-6,
        );
    }
    out
}

pub fn write_manifest(dir: &Path, files: &[&str]) {
    let list: Vec<String> = files.iter().map(|f| format!("\"{f}\"")).collect();
    std::fs::write(dir.join("index.json"), format!("{{\"files\": [{}]}}", list.join(", ")))
        .unwrap();
}

pub fn source(dir: &Path) -> Arc<dyn Source> {
    Arc::new(LocalDirSource::new(dir))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seen {
    Started(String),
    Success(String, usize),
    Failure(String, IngestionSeverity),
    Alert(String, IngestionSeverity),
}

/// Records every callback except batches.
#[derive(Default)]
pub struct RecordingObserver {
    pub seen: Mutex<Vec<Seen>>,
    pub batches: Mutex<usize>,
}

impl RecordingObserver {
    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

impl IngestionObserver for RecordingObserver {
    fn on_file_started(&self, ctx: &IngestionContext) {
        self.seen.lock().unwrap().push(Seen::Started(ctx.label.clone()));
    }

    fn on_batch(&self, _ctx: &IngestionContext, _rows: usize) {
        *self.batches.lock().unwrap() += 1;
    }

    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.seen.lock().unwrap().push(Seen::Success(ctx.label.clone(), stats.rows));
    }

    fn on_failure(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
        self.seen.lock().unwrap().push(Seen::Failure(ctx.label.clone(), severity));
    }

    fn on_alert(
        &self,
        ctx: &IngestionContext,
        severity: IngestionSeverity,
        _error: &IngestionError,
    ) {
        self.seen.lock().unwrap().push(Seen::Alert(ctx.label.clone(), severity));
    }
}
