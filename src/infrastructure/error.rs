// Error types for the JSON layout store

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the layout file.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The layout file exists but could not be read.
    #[error("Failed to read layout store: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The layout file is not valid JSON for the store format.
    #[error("Invalid layout store at {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The store could not be serialized.
    #[error("Failed to serialize layout store")]
    Serialize(#[from] serde_json::Error),

    /// Writing or syncing the temporary file failed.
    #[error("Failed to write layout store: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The temporary file could not be moved over the store.
    #[error("Failed to replace {path} with {temp_path}")]
    Rename {
        path: PathBuf,
        temp_path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
