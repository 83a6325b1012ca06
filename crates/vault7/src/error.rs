//! Store errors

use std::path::PathBuf;
use thiserror::Error;

use crate::entry::Category;

/// Failures of the category stores.
///
/// These never cross the vault's public operations; the vault logs them
/// and reports a boolean, count or no-op instead.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("{found} entry handed to the {expected} store")]
    WrongCategory { expected: Category, found: Category },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
