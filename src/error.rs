use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the zonage engine.
#[derive(Debug, Error)]
pub enum ZonageError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Cadastre(#[from] CadastreError),
}

/// Errors related to persisting zone documents.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write zone document {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize zone document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors related to loading the cadastral source.
#[derive(Debug, Error)]
pub enum CadastreError {
    #[error("failed to read cadastre source {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed cadastre source: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience type alias for results using [`ZonageError`].
pub type Result<T> = std::result::Result<T, ZonageError>;
