//! Single-key stable sorting.
//!
//! Numeric keys (N, Beta, P) compare numerically; every other key compares by byte-wise string
//! order, so the comparison is case-sensitive. Missing numbers (`NaN`, or an unknown N) always
//! sort after every present number, in both directions, and keep their relative order.

use std::cmp::Ordering;

use rayon::prelude::*;
use serde::Deserialize;

use crate::types::Row;

use super::filter::PARALLEL_SCAN_MIN_ROWS;

/// Sortable columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum SortKey {
    Phenotype,
    Tissue,
    Type,
    Method,
    N,
    CpG,
    Location,
    Gene,
    Beta,
    P,
}

impl SortKey {
    /// Every key, in display column order.
    pub const ALL: [SortKey; 10] = [
        SortKey::Phenotype,
        SortKey::Tissue,
        SortKey::Type,
        SortKey::Method,
        SortKey::N,
        SortKey::CpG,
        SortKey::Location,
        SortKey::Gene,
        SortKey::Beta,
        SortKey::P,
    ];

    /// The CSV/display column name.
    pub fn column_name(self) -> &'static str {
        match self {
            SortKey::Phenotype => "Phenotype",
            SortKey::Tissue => "Tissue",
            SortKey::Type => "Type",
            SortKey::Method => "Method",
            SortKey::N => "N",
            SortKey::CpG => "CpG",
            SortKey::Location => "Location",
            SortKey::Gene => "Gene",
            SortKey::Beta => "Beta",
            SortKey::P => "P",
        }
    }

    /// Parse a column name (exact match).
    pub fn from_column_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.column_name() == name)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, SortKey::N | SortKey::Beta | SortKey::P)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortState {
    pub fn ascending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(key: SortKey) -> Self {
        Self {
            key,
            direction: SortDirection::Descending,
        }
    }

    /// State after a click on `key`'s header: flip if `key` is active, else `key` ascending.
    pub fn toggled(self, key: SortKey) -> Self {
        if self.key == key {
            Self {
                key,
                direction: self.direction.flipped(),
            }
        } else {
            Self::ascending(key)
        }
    }

    /// Compare two rows under this state.
    pub fn compare(&self, a: &Row, b: &Row) -> Ordering {
        if self.key.is_numeric() {
            compare_numbers(numeric_value(a, self.key), numeric_value(b, self.key), self.direction)
        } else {
            let ord = text_value(a, self.key).cmp(text_value(b, self.key));
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}

fn numeric_value(row: &Row, key: SortKey) -> f64 {
    match key {
        SortKey::N => row.n.map_or(f64::NAN, |n| n as f64),
        SortKey::Beta => row.beta,
        SortKey::P => row.p,
        _ => f64::NAN,
    }
}

fn text_value(row: &Row, key: SortKey) -> &str {
    match key {
        SortKey::Phenotype => &row.phenotype,
        SortKey::Tissue => &row.tissue,
        SortKey::Type => &row.r#type,
        SortKey::Method => &row.method,
        SortKey::CpG => &row.cpg,
        SortKey::Location => &row.location,
        SortKey::Gene => &row.gene,
        SortKey::N | SortKey::Beta | SortKey::P => "",
    }
}

// NaN goes last regardless of direction.
fn compare_numbers(a: f64, b: f64, direction: SortDirection) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ord = a.total_cmp(&b);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
    }
}

/// Stable-sort `indices` (positions into `rows`) by `state`.
pub fn sort_indices(rows: &[Row], indices: &mut [usize], state: SortState) {
    let cmp = |a: &usize, b: &usize| state.compare(&rows[*a], &rows[*b]);
    if indices.len() >= PARALLEL_SCAN_MIN_ROWS {
        indices.par_sort_by(cmp);
    } else {
        indices.sort_by(cmp);
    }
}
