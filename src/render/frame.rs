//! Pure projection of the view model and loading status into displayable text.

use crate::ingestion::LoadingStatus;
use crate::processing::{FilterOptions, SortDirection, SortKey, ViewModel};
use crate::types::Row;

use super::format::{format_count, format_number};

/// One column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: SortKey,
    /// Set on the active sort column.
    pub indicator: Option<SortDirection>,
}

impl HeaderCell {
    /// Column name followed by `▲`/`▼` when this is the sort column.
    pub fn label(&self) -> String {
        match self.indicator {
            Some(SortDirection::Ascending) => format!("{} ▲", self.key.column_name()),
            Some(SortDirection::Descending) => format!("{} ▼", self.key.column_name()),
            None => self.key.column_name().to_string(),
        }
    }
}

/// Loading progress as shown under the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    /// `"{label}: {message}"` per failed file.
    pub errors: Vec<String>,
    pub loading: bool,
}

impl StatusLine {
    pub fn from_status(status: &LoadingStatus) -> Self {
        Self {
            text: format!(
                "Loaded {}/{} files · {} rows",
                status.files_completed, status.files_total, status.rows_loaded
            ),
            errors: status
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.label, e.message))
                .collect(),
            loading: !status.is_done(),
        }
    }
}

/// A page of results.
#[derive(Debug, Clone, PartialEq)]
pub struct TableFrame {
    pub headers: Vec<HeaderCell>,
    /// Display cells in [`SortKey::ALL`] order.
    pub rows: Vec<Vec<String>>,
    pub row_count: String,
    pub page_info: String,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub filter_options: FilterOptions,
    pub status: StatusLine,
}

/// What a surface shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    Table(TableFrame),
    /// The session could not start; a single message replaces the table and paging is off.
    Diagnostic { message: String, status: StatusLine },
}

impl Frame {
    /// Project the current state. Never mutates anything.
    pub fn project(view: &ViewModel, status: &LoadingStatus) -> Self {
        if let Some(fatal) = &status.fatal {
            return Frame::Diagnostic {
                message: format!("Failed to load manifest: {fatal}"),
                status: StatusLine::from_status(status),
            };
        }

        let sort = view.sort_state();
        let headers = SortKey::ALL
            .into_iter()
            .map(|key| HeaderCell {
                key,
                indicator: sort.filter(|s| s.key == key).map(|s| s.direction),
            })
            .collect();

        Frame::Table(TableFrame {
            headers,
            rows: view.page_rows().into_iter().map(display_cells).collect(),
            row_count: format!("{} rows", view.filtered_len()),
            page_info: format!("Page {} / {}", view.page(), view.total_pages()),
            prev_enabled: view.has_prev(),
            next_enabled: view.has_next(),
            filter_options: view.filter_options().clone(),
            status: StatusLine::from_status(status),
        })
    }

    pub fn status(&self) -> &StatusLine {
        match self {
            Frame::Table(t) => &t.status,
            Frame::Diagnostic { status, .. } => status,
        }
    }
}

/// Display strings for one row, in [`SortKey::ALL`] order.
pub fn display_cells(row: &Row) -> Vec<String> {
    vec![
        row.phenotype.clone(),
        row.tissue.clone(),
        row.r#type.clone(),
        row.method.clone(),
        format_count(row.n),
        row.cpg.clone(),
        row.location.clone(),
        row.gene.clone(),
        format_number(row.beta),
        format_number(row.p),
    ]
}
