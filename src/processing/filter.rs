//! Row filtering.

use rayon::prelude::*;

use crate::types::Row;

/// Datasets at least this large are scanned in parallel.
pub const PARALLEL_SCAN_MIN_ROWS: usize = 16_384;

/// Equality constraints plus a free-text query.
///
/// A `None` (or blank) constraint matches every row. The query matches rows whose CpG, location
/// or gene contains it, ignoring case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub phenotype: Option<String>,
    pub tissue: Option<String>,
    pub r#type: Option<String>,
    pub method: Option<String>,
    pub query: Option<String>,
}

impl FilterCriteria {
    pub fn with_phenotype(mut self, v: impl Into<String>) -> Self {
        self.phenotype = Some(v.into());
        self
    }

    pub fn with_tissue(mut self, v: impl Into<String>) -> Self {
        self.tissue = Some(v.into());
        self
    }

    pub fn with_type(mut self, v: impl Into<String>) -> Self {
        self.r#type = Some(v.into());
        self
    }

    pub fn with_method(mut self, v: impl Into<String>) -> Self {
        self.method = Some(v.into());
        self
    }

    pub fn with_query(mut self, v: impl Into<String>) -> Self {
        self.query = Some(v.into());
        self
    }

    /// True when no constraint is set, i.e. every row matches.
    pub fn is_empty(&self) -> bool {
        [
            &self.phenotype,
            &self.tissue,
            &self.r#type,
            &self.method,
            &self.query,
        ]
        .iter()
        .all(|c| active(c).is_none())
    }

    /// Compile the criteria for repeated matching.
    pub fn matcher(&self) -> RowMatcher<'_> {
        RowMatcher {
            phenotype: active(&self.phenotype),
            tissue: active(&self.tissue),
            r#type: active(&self.r#type),
            method: active(&self.method),
            query: active(&self.query).map(|q| q.trim().to_lowercase()),
        }
    }
}

fn active(c: &Option<String>) -> Option<&str> {
    c.as_deref().filter(|v| !v.trim().is_empty())
}

/// Compiled [`FilterCriteria`].
#[derive(Debug, Clone)]
pub struct RowMatcher<'a> {
    phenotype: Option<&'a str>,
    tissue: Option<&'a str>,
    r#type: Option<&'a str>,
    method: Option<&'a str>,
    query: Option<String>,
}

impl RowMatcher<'_> {
    pub fn matches(&self, row: &Row) -> bool {
        eq(self.phenotype, &row.phenotype)
            && eq(self.tissue, &row.tissue)
            && eq(self.r#type, &row.r#type)
            && eq(self.method, &row.method)
            && self.query.as_deref().is_none_or(|q| {
                [&row.cpg, &row.location, &row.gene]
                    .iter()
                    .any(|field| field.to_lowercase().contains(q))
            })
    }
}

fn eq(want: Option<&str>, got: &str) -> bool {
    want.is_none_or(|w| w == got)
}

/// Indices of the rows matching `criteria`, in dataset order.
pub fn filter_indices(rows: &[Row], criteria: &FilterCriteria) -> Vec<usize> {
    if criteria.is_empty() {
        return (0..rows.len()).collect();
    }
    let matcher = criteria.matcher();
    if rows.len() >= PARALLEL_SCAN_MIN_ROWS {
        rows.par_iter()
            .enumerate()
            .filter(|(_, row)| matcher.matches(row))
            .map(|(i, _)| i)
            .collect()
    } else {
        rows.iter()
            .enumerate()
            .filter(|(_, row)| matcher.matches(row))
            .map(|(i, _)| i)
            .collect()
    }
}
