use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while synchronizing or reading the local dataset.
#[derive(Error, Debug)]
pub enum Error {
    /// The current user's home directory could not be determined
    #[error("could not determine the home directory")]
    HomeDirUnavailable,

    #[error("could not create directory {path:?}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration file {path:?}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not serialize TOML")]
    Serialize(#[from] toml::ser::Error),

    /// Timeouts, DNS failures, connection resets
    #[error("request failed")]
    Http(#[from] reqwest::Error),

    #[error("error downloading, url: {url} - status: {status}")]
    UnexpectedStatus { url: String, status: u16 },

    /// The archive stream could not be decompressed or decoded
    #[error("invalid archive")]
    Archive(#[source] std::io::Error),

    #[error("could not extract {path:?}")]
    Extract {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An archive entry resolves outside the extraction directory
    #[error("archive entry {path:?} escapes the destination directory")]
    UnsafeEntry { path: PathBuf },

    #[error("{path:?} not found, the dataset has not been synchronized")]
    MissingFile { path: PathBuf },

    #[error("could not parse {path:?}")]
    Deserialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("library not found: {0}")]
    LibraryNotFound(String),

    #[error("invalid library name: {0:?}")]
    InvalidLibraryName(String),

    #[error("I/O error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Returns `true` for the "unknown library" condition, which callers may
    /// treat as an empty result rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::LibraryNotFound(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
