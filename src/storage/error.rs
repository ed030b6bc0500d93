use std::path::PathBuf;
use tantivy::TantivyError;
use tantivy::directory::error::OpenDirectoryError;
use thiserror::Error;

/// Errors from record store operations.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Tantivy error: {0}")]
    Tantivy(#[from] TantivyError),

    #[error("Directory error: {0}")]
    Directory(#[from] OpenDirectoryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Attribute serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Id '{id}' already belongs to '{existing}'; document ids must be unique")]
    IdConflict { id: String, existing: PathBuf },

    #[error("Stored record is missing field '{0}'")]
    MissingField(&'static str),
}

pub type StorageResult<T> = Result<T, StorageError>;
