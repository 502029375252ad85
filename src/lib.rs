//! `ewas-explorer` loads epigenome-wide association study (EWAS) summary tables from a set of CSV
//! files and serves them as a filterable, sortable, paginated table.
//!
//! A loading session reads a JSON manifest (`{"files": [...]}`), then ingests the listed CSV
//! files one at a time on a background worker thread. Rows arrive in batches and become visible
//! while later files are still loading. A file that fails to load is reported and skipped; rows
//! it already delivered stay loaded.
//!
//! ## Columns
//!
//! Every file must carry the columns `Phenotype`, `Tissue`, `Type`, `Method`, `N`, `CpG`,
//! `Location`, `Gene`, `Beta` and `P` (extra columns are ignored). Each ingested
//! [`types::Row`] also records the manifest entry it came from.
//!
//! Empty or non-numeric `Beta`/`P` cells become NaN: the row is kept, displays blank, and sorts
//! after every number.
//!
//! ## Quick example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use ewas_explorer::explorer::{Explorer, ExplorerOptions};
//! use ewas_explorer::ingestion::LocalDirSource;
//! use ewas_explorer::processing::{FilterCriteria, SortKey};
//!
//! // `data/index.json` lists the CSV files under `data/`.
//! let source = Arc::new(LocalDirSource::new("data"));
//! let mut explorer = Explorer::start(source, ExplorerOptions::default());
//! explorer.run_to_completion();
//!
//! explorer.set_criteria(FilterCriteria::default().with_tissue("Blood").with_query("APOE"));
//! explorer.toggle_sort(SortKey::Beta);
//! println!("{}", explorer.surface().text());
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: manifest, sources, CSV decoding, the worker and the coordinator
//! - [`processing`]: filtering, sorting and pagination over the loaded rows
//! - [`render`]: frame projection, surfaces and repaint throttling
//! - [`explorer`]: the session wiring them together
//! - [`catalog`]: the download listing built from the same manifest

pub mod catalog;
pub mod error;
pub mod explorer;
pub mod ingestion;
pub mod processing;
pub mod render;
pub mod types;

pub use error::{IngestionError, IngestionResult};
