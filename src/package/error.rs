use std::path::PathBuf;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum ConfigRead {
    #[error("manifest does not exist: {0}")]
    FileNotFound(PathBuf),
    #[error("failed to read '{path}'")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse JSON manifest")]
    Json(#[from] serde_json::Error),
    #[error("'{path}' has no `{field}` field")]
    MissingAliases { path: PathBuf, field: &'static str },
    #[error("invalid alias name {0:?}")]
    InvalidAlias(String),
}

#[derive(Debug, ThisError)]
pub enum ConfigWrite {
    #[error("failed to write to '{path}'")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to serialize to JSON")]
    Json(#[from] serde_json::Error),
}
