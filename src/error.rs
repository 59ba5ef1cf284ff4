use std::{io, path::PathBuf};

use thiserror::Error as ThisError;

use crate::package::error::ConfigWrite;

#[derive(Debug, ThisError)]
pub enum LinkError {
    #[error("failed to {action} '{path}' for alias '{alias}'")]
    Io {
        alias: String,
        action: &'static str,
        path: PathBuf,
        source: io::Error,
    },
    #[error("refusing to unlink invalid alias {0:?}")]
    InvalidAlias(String),
    #[error("failed to write proxy manifest for alias '{alias}'")]
    ProxyManifest { alias: String, source: ConfigWrite },
    #[error("failed to inspect dependency directory '{path}'")]
    DependencyRoot { path: PathBuf, source: io::Error },
    #[error("no relative path from '{base}' to '{path}'")]
    RelativePath { path: PathBuf, base: PathBuf },
    #[error("failed to read dependency directory")]
    Walkdir(#[from] walkdir::Error),
}

impl LinkError {
    /// Returns a closure that wraps an [`io::Error`] into [`LinkError::Io`], for use with
    /// [`Result::map_err`].
    pub(crate) fn io<P: Into<PathBuf>>(
        alias: &str,
        action: &'static str,
        path: P,
    ) -> impl FnOnce(io::Error) -> Self {
        let alias = alias.to_string();
        let path = path.into();
        move |source| Self::Io {
            alias,
            action,
            path,
            source,
        }
    }
}
