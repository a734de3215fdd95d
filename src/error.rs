//! Error types for dataset loading
//!
//! Only whole-file failures are errors. A single malformed record inside an
//! otherwise readable file is a data-integrity problem: the record is dropped
//! and counted, and the load succeeds (see [`crate::data::Loaded`]).

use thiserror::Error;

/// Failure to load one of the static source files.
///
/// Each source file (`reviews.json`, `labels.json`, `end_date.txt`) carries
/// its own `Result`, so a broken labels file still leaves the histogram
/// renderable and vice versa. No retry: the files are local and static, a
/// second read will not do better.
#[derive(Error, Debug)]
pub enum LoadError {
    /// File could not be read at all
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File was read but is not the expected JSON shape
    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn json(path: &std::path::Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.display().to_string(),
            source,
        }
    }
}
