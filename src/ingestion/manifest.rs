//! The manifest: a small JSON index listing the CSV files available under a base location.
//!
//! ```json
//! { "files": ["AD_Survival_Beta.csv", "BMI_Linear_M.csv"] }
//! ```

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, IngestionResult};

use super::source::Source;

/// Parsed manifest. Entries keep their manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub files: Vec<String>,
}

/// A file to ingest: a display label plus the location its source opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    /// Label stamped on every row read from this file (the manifest entry).
    pub label: String,
    /// Resolved location passed to [`Source::open`].
    pub location: String,
}

impl Manifest {
    /// Parse manifest JSON.
    ///
    /// The document must be an object with a `files` array; non-string entries are ignored.
    pub fn from_json_str(input: &str) -> IngestionResult<Self> {
        let v: serde_json::Value = serde_json::from_str(input)
            .map_err(|e| IngestionError::manifest(format!("invalid json: {e}")))?;
        let files = v
            .get("files")
            .and_then(|f| f.as_array())
            .ok_or_else(|| {
                IngestionError::manifest("manifest must be a JSON object with a \"files\" array")
            })?;
        Ok(Self {
            files: files
                .iter()
                .filter_map(|f| f.as_str().map(str::to_owned))
                .collect(),
        })
    }

    /// Fetch and parse the manifest at `location` from `source`.
    pub fn load(source: &dyn Source, location: &str) -> IngestionResult<Self> {
        let mut text = String::new();
        source
            .open(location)
            .and_then(|mut r| r.read_to_string(&mut text).map_err(IngestionError::from))
            .map_err(|e| IngestionError::manifest(format!("failed to load {location}: {e}")))?;
        Self::from_json_str(&text)
    }

    /// Build a manifest from the `*.csv` files (case-insensitive) directly inside `dir`,
    /// sorted by name.
    pub fn discover(dir: impl AsRef<Path>) -> IngestionResult<Self> {
        let dir = dir.as_ref();
        let pattern = format!("{}/*.csv", glob::Pattern::escape(&dir.to_string_lossy()));
        let opts = glob::MatchOptions {
            case_sensitive: false,
            ..Default::default()
        };
        let paths = glob::glob_with(&pattern, opts)
            .map_err(|e| IngestionError::manifest(format!("bad directory pattern: {e}")))?;

        let mut files = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| IngestionError::Io(e.into_error()))?;
            if !path.is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_owned());
            }
        }
        files.sort();
        Ok(Self { files })
    }

    /// Serialize as pretty JSON (the format [`Manifest::from_json_str`] reads).
    pub fn to_json_string(&self) -> IngestionResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Entries ending in `.csv` (case-insensitive), in manifest order.
    pub fn csv_files(&self) -> impl Iterator<Item = &str> {
        self.files
            .iter()
            .map(String::as_str)
            .filter(|name| is_csv_name(name))
    }

    /// Resolve every CSV entry against `source`.
    pub fn file_refs(&self, source: &dyn Source) -> Vec<FileRef> {
        self.csv_files()
            .map(|name| FileRef {
                label: name.to_owned(),
                location: source.resolve(name),
            })
            .collect()
    }
}

fn is_csv_name(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".csv")
}

#[cfg(test)]
mod tests {
    use super::Manifest;
    use crate::ingestion::source::LocalDirSource;

    #[test]
    fn parses_files_and_drops_non_csv() {
        let m = Manifest::from_json_str(r#"{"files":["A.csv","notes.txt","B.CSV",3]}"#).unwrap();
        assert_eq!(m.files, vec!["A.csv", "notes.txt", "B.CSV"]);
        assert_eq!(m.csv_files().collect::<Vec<_>>(), vec!["A.csv", "B.CSV"]);
    }

    #[test]
    fn missing_files_array_is_manifest_error() {
        let err = Manifest::from_json_str(r#"{"items":[]}"#).unwrap_err();
        assert!(err.to_string().contains("\"files\" array"));
        let err = Manifest::from_json_str("not json").unwrap_err();
        assert!(err.to_string().starts_with("manifest error: invalid json"));
    }

    #[test]
    fn load_reports_unreachable_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalDirSource::new(dir.path());
        let loc = dir.path().join("index.json");
        let err = Manifest::load(&source, &loc.to_string_lossy()).unwrap_err();
        assert!(err.to_string().contains("failed to load"));
    }

    #[test]
    fn discover_lists_csv_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.csv", "A.CSV", "readme.md"] {
            std::fs::write(dir.path().join(name), "x").unwrap();
        }
        let m = Manifest::discover(dir.path()).unwrap();
        assert_eq!(m.files, vec!["A.CSV", "b.csv"]);

        let round = Manifest::from_json_str(&m.to_json_string().unwrap()).unwrap();
        assert_eq!(round, m);
    }

    #[test]
    fn file_refs_resolve_against_source() {
        let source = LocalDirSource::new("/data/downloads");
        let m = Manifest::from_json_str(r#"{"files":["A.csv"]}"#).unwrap();
        let refs = m.file_refs(&source);
        assert_eq!(refs[0].label, "A.csv");
        assert!(refs[0].location.ends_with("A.csv"));
        assert!(refs[0].location.starts_with("/data/downloads"));
    }
}
