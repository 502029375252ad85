//! Download catalog: the manifest's CSV files with metadata parsed from their names.
//!
//! File names follow `Phenotype_Type_Method.csv` (e.g. `AD_Survival_Beta.csv`). Missing parts
//! are left empty.

use std::collections::BTreeSet;

use crate::ingestion::{Manifest, Source};

/// One downloadable file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    /// Location resolved against the source.
    pub location: String,
    pub phenotype: String,
    pub r#type: String,
    pub method: String,
    /// Size in bytes, once known.
    pub size_bytes: Option<u64>,
}

impl CatalogEntry {
    /// Build an entry for `name`, splitting its stem on `_`.
    pub fn from_name(name: &str, location: impl Into<String>) -> Self {
        let stem = strip_csv_suffix(name);
        let mut parts = stem.split('_');
        let mut next = || parts.next().unwrap_or_default().to_string();
        let phenotype = next();
        let r#type = next();
        let method = next();
        Self {
            name: name.to_string(),
            location: location.into(),
            phenotype,
            r#type,
            method,
            size_bytes: None,
        }
    }

    /// Human-readable size, blank when unknown.
    pub fn display_size(&self) -> String {
        self.size_bytes.map(human_size).unwrap_or_default()
    }
}

fn strip_csv_suffix(name: &str) -> &str {
    let cut = name.len().saturating_sub(4);
    match name.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(".csv") => &name[..cut],
        _ => name,
    }
}

/// Constraints for [`Catalog::filter`]. Unset or blank fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub phenotype: Option<String>,
    pub r#type: Option<String>,
    pub method: Option<String>,
    /// Case-insensitive substring of the file name.
    pub query: Option<String>,
}

impl CatalogFilter {
    fn matches(&self, entry: &CatalogEntry, query: Option<&str>) -> bool {
        field_matches(self.phenotype.as_deref(), &entry.phenotype)
            && field_matches(self.r#type.as_deref(), &entry.r#type)
            && field_matches(self.method.as_deref(), &entry.method)
            && query.is_none_or(|q| entry.name.to_lowercase().contains(q))
    }
}

fn field_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted {
        Some(w) if !w.is_empty() => w == actual,
        _ => true,
    }
}

/// The list of downloadable files, in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Entries for every `.csv` file in `manifest`, resolved against `source`.
    pub fn from_manifest(manifest: &Manifest, source: &dyn Source) -> Self {
        let entries = manifest
            .file_refs(source)
            .into_iter()
            .map(|f| CatalogEntry::from_name(&f.label, f.location))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up each file's size, one request at a time. Unknown sizes stay `None`.
    pub fn enrich_sizes(&mut self, source: &dyn Source) {
        for entry in &mut self.entries {
            entry.size_bytes = source.content_length(&entry.location);
            if entry.size_bytes.is_none() {
                tracing::debug!(file = %entry.name, "size unavailable");
            }
        }
    }

    /// Entries matching `filter`, in catalog order.
    pub fn filter(&self, filter: &CatalogFilter) -> Vec<&CatalogEntry> {
        let query = filter
            .query
            .as_deref()
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());
        self.entries
            .iter()
            .filter(|e| filter.matches(e, query.as_deref()))
            .collect()
    }

    /// Distinct non-empty phenotypes, sorted.
    pub fn phenotypes(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| !e.phenotype.is_empty())
            .map(|e| e.phenotype.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Format a byte count: `"2.00 GB"`, `"1.50 MB"`, otherwise whole kilobytes (at least `"1 KB"`).
pub fn human_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    let gb = mb / 1024.0;
    if gb >= 1.0 {
        format!("{gb:.2} GB")
    } else if mb >= 1.0 {
        format!("{mb:.2} MB")
    } else {
        format!("{} KB", kb.round().max(1.0) as u64)
    }
}
