//! In-memory view over ingested rows.
//!
//! The processing layer works on the [`crate::types::Row`]s produced by ingestion:
//!
//! - [`filter`]: [`FilterCriteria`] and the (parallel for large datasets) rescan
//! - [`sort`]: single-key stable sort with missing numbers last
//! - [`paginate`]: clamped fixed-size paging
//! - [`options`]: distinct values for filter controls
//! - [`view`]: the [`ViewModel`] tying them together
//!
//! ## Example
//!
//! ```rust
//! use ewas_explorer::processing::{FilterCriteria, SortKey, ViewModel, ViewOptions};
//! use ewas_explorer::types::Row;
//!
//! let row = |cpg: &str, p: f64| Row {
//!     phenotype: "AD".to_string(),
//!     tissue: "Blood".to_string(),
//!     r#type: "Survival".to_string(),
//!     method: "Beta".to_string(),
//!     n: Some(100),
//!     cpg: cpg.to_string(),
//!     location: "chr19:44908684".to_string(),
//!     gene: "APOE".to_string(),
//!     beta: 0.02,
//!     p,
//!     source: "AD_Survival_Beta.csv".to_string(),
//! };
//!
//! let mut vm = ViewModel::new(ViewOptions::default());
//! vm.append_rows(vec![row("cg2", 0.01), row("cg1", 1e-9)]);
//! vm.set_criteria(FilterCriteria::default().with_query("CG"));
//!
//! // Sorted by P ascending by default.
//! let cpgs: Vec<&str> = vm.page_rows().iter().map(|r| r.cpg.as_str()).collect();
//! assert_eq!(cpgs, vec!["cg1", "cg2"]);
//!
//! vm.toggle_sort(SortKey::P);
//! assert_eq!(vm.page_rows()[0].cpg, "cg2");
//! ```

pub mod filter;
pub mod options;
pub mod paginate;
pub mod sort;
pub mod view;

pub use filter::{FilterCriteria, RowMatcher, filter_indices};
pub use options::FilterOptions;
pub use paginate::{DEFAULT_PAGE_SIZE, Pagination};
pub use sort::{SortDirection, SortKey, SortState, sort_indices};
pub use view::{ViewModel, ViewOptions};
