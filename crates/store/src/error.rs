//! Error types for dowell-store.

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the persistence gateway and grid sessions.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying SQLite failure.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Grid invariant violation surfaced through a session.
    #[error(transparent)]
    Grid(#[from] dowell_engine::error::Error),

    /// No workbook with the given id.
    #[error("workbook {0} not found")]
    WorkbookNotFound(i64),

    /// No worksheet with the given id.
    #[error("worksheet {0} not found")]
    WorksheetNotFound(i64),

    /// No persisted cell with the given id.
    #[error("cell {0} not found")]
    CellNotFound(i64),

    /// No format template with the given id.
    #[error("format template {0} not found")]
    TemplateNotFound(i64),

    /// No user with the given username.
    #[error("user '{0}' not found")]
    UserNotFound(String),

    /// Deleting the only worksheet would leave the workbook empty.
    #[error("cannot delete the last worksheet of a workbook")]
    LastWorksheet,
}
