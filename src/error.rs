// Error types for the library side. The binaries stay on anyhow.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest {location}: {source}")]
    Manifest {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("remote content needs the `remote` feature: {0}")]
    RemoteDisabled(String),

    #[cfg(feature = "remote")]
    #[error("http request for {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no media loaded")]
    NotLoaded,

    #[error("playback rejected: {0}")]
    Rejected(String),

    #[error("could not decode {uri}: {reason}")]
    Decode { uri: String, reason: String },

    #[error("seek failed: {0}")]
    Seek(String),

    #[error("audio output unavailable: {0}")]
    Output(String),
}
