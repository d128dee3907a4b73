//! Error types for the reconciliation and edit engines.
//!
//! Expected outcomes (cache misses, absent or corrupt cache files) are modelled
//! as `Option` by their owners and never show up here.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while applying text edits to a buffer.
///
/// Always scoped to a single file: the caller skips that file's
/// transformation and nothing is written.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("edit '{id}' range {start}..{end} is out of bounds for buffer of length {len}")]
    OutOfBounds {
        id: String,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("edit '{id}' has an inverted range {start}..{end}")]
    InvertedRange { id: String, start: usize, end: usize },

    #[error("edit '{id}' offset {offset} is not on a character boundary")]
    NotCharBoundary { id: String, offset: usize },

    #[error("edit plan is invalid ({}): {}", ids.join(", "), reasons.join("; "))]
    InvalidPlan {
        ids: Vec<String>,
        reasons: Vec<String>,
    },
}

impl EditError {
    /// Ids of the edits responsible for this error.
    pub fn edit_ids(&self) -> Vec<String> {
        match self {
            EditError::OutOfBounds { id, .. }
            | EditError::InvertedRange { id, .. }
            | EditError::NotCharBoundary { id, .. } => vec![id.clone()],
            EditError::InvalidPlan { ids, .. } => ids.clone(),
        }
    }
}

/// Errors raised by a reconciliation run.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error(
        "locales directory '{}' does not exist.\n\
         Hint: check the 'localesDir' setting in .keysyncrc.json.",
        .0.display()
    )]
    MissingLocalesDir(PathBuf),

    #[error("failed to parse locale file '{}': {source}", path.display())]
    LocaleParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to serialize '{}': {source}", path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to edit '{}': {source}", path.display())]
    Edit { path: PathBuf, source: EditError },
}

impl SyncError {
    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SyncError::Write {
            path: path.into(),
            source,
        }
    }

    /// Whether the error aborts the whole run.
    ///
    /// Edit errors only abort the transformation of one file.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, SyncError::Edit { .. })
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
