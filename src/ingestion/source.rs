//! Where manifest and CSV bytes come from.
//!
//! A [`Source`] resolves manifest entries against a fixed base location and opens streaming
//! readers for them. [`LocalDirSource`] serves files from a directory; `HttpSource` (feature
//! `http`) fetches them from a base URL.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::IngestionResult;

/// Streaming reader handed to the CSV decoder on a worker thread.
pub type SourceReader = Box<dyn Read + Send>;

/// Resolves and opens manifest/CSV resources.
pub trait Source: Send + Sync {
    /// Resolve a manifest entry (a bare file name) to a location this source can open.
    fn resolve(&self, name: &str) -> String;

    /// Open `location` for streaming reads.
    fn open(&self, location: &str) -> IngestionResult<SourceReader>;

    /// Size of the resource in bytes, if cheaply known. Failures are reported as `None`.
    fn content_length(&self, _location: &str) -> Option<u64> {
        None
    }
}

/// Serves files from a local directory.
#[derive(Debug, Clone)]
pub struct LocalDirSource {
    base: PathBuf,
}

impl LocalDirSource {
    /// Create a source rooted at `base`.
    pub fn new(base: impl AsRef<Path>) -> Self {
        Self {
            base: base.as_ref().to_path_buf(),
        }
    }

    /// The directory entries are resolved against.
    pub fn base(&self) -> &Path {
        &self.base
    }
}

impl Source for LocalDirSource {
    fn resolve(&self, name: &str) -> String {
        self.base.join(name).to_string_lossy().into_owned()
    }

    fn open(&self, location: &str) -> IngestionResult<SourceReader> {
        let file = File::open(location)?;
        Ok(Box::new(BufReader::new(file)))
    }

    fn content_length(&self, location: &str) -> Option<u64> {
        std::fs::metadata(location).ok().map(|m| m.len())
    }
}

#[cfg(feature = "http")]
pub use http::HttpSource;

#[cfg(feature = "http")]
mod http {
    use reqwest::blocking::Client;

    use super::{Source, SourceReader};
    use crate::error::IngestionResult;

    /// Fetches files relative to a base URL with a blocking HTTP client.
    #[derive(Debug, Clone)]
    pub struct HttpSource {
        base: String,
        client: Client,
    }

    impl HttpSource {
        /// Create a source rooted at `base` (e.g. `https://host/site/data/downloads`).
        pub fn new(base: impl Into<String>) -> Self {
            Self::with_client(base, Client::new())
        }

        /// Create a source that reuses an existing client.
        pub fn with_client(base: impl Into<String>, client: Client) -> Self {
            let mut base = base.into();
            while base.ends_with('/') {
                base.pop();
            }
            Self { base, client }
        }
    }

    impl Source for HttpSource {
        fn resolve(&self, name: &str) -> String {
            format!("{}/{}", self.base, name.trim_start_matches('/'))
        }

        fn open(&self, location: &str) -> IngestionResult<SourceReader> {
            let resp = self.client.get(location).send()?.error_for_status()?;
            Ok(Box::new(resp))
        }

        fn content_length(&self, location: &str) -> Option<u64> {
            let resp = self.client.head(location).send().ok()?;
            if !resp.status().is_success() {
                return None;
            }
            resp.headers()
                .get(reqwest::header::CONTENT_LENGTH)?
                .to_str()
                .ok()?
                .parse()
                .ok()
        }
    }
}
