use thiserror::Error;

use crate::auth::AccessDenied;
use crate::database::DatabaseError;

/// Why an export produced no file. There is no partial-success variant.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0}")]
    Unauthorized(#[from] AccessDenied),

    #[error("Record source failed: {0}")]
    Source(#[from] DatabaseError),

    #[error("No data to export")]
    EmptyResult,

    #[error("Export matches more than {cap} records; narrow the filters and try again")]
    RecordCapExceeded { cap: usize },

    #[error("Export cancelled after {records} records")]
    Cancelled { records: usize },
}

impl ExportError {
    pub fn kind(&self) -> &'static str {
        match self {
            ExportError::Unauthorized(_) => "unauthorized",
            ExportError::Source(_) => "source_error",
            ExportError::EmptyResult => "empty_result",
            ExportError::RecordCapExceeded { .. } => "record_cap_exceeded",
            ExportError::Cancelled { .. } => "cancelled",
        }
    }
}
