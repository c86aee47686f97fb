//! Error types for dowell-engine.

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from in-memory grid operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Removing the only remaining row would leave an empty grid.
    #[error("cannot remove the last row")]
    LastRow,

    /// Removing the only remaining column would leave an empty grid.
    #[error("cannot remove the last column")]
    LastColumn,

    /// A cell address outside the grid's current bounds.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}
