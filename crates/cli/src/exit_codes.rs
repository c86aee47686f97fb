//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Codes
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Success                                               |
//! | 1    | General error (database failure, file I/O)            |
//! | 2    | Usage error (bad arguments, malformed cell reference) |
//! | 3    | Not found (workbook, worksheet, cell, template, user) |
//! | 4    | Invariant violation (last row/column/worksheet,       |
//! |      | out-of-range position)                                |
//! | 5    | Format error on import/export (bad extension,         |
//! |      | malformed document)                                   |

use dowell_engine::error::Error as GridError;
use dowell_io::error::Error as IoError;
use dowell_store::error::Error as StoreError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - database or file system failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, malformed cell reference.
/// clap uses this code for its own argument errors too.
pub const EXIT_USAGE: u8 = 2;

/// A named or numbered thing does not exist.
pub const EXIT_NOT_FOUND: u8 = 3;

/// The operation would break a structural invariant.
pub const EXIT_INVARIANT: u8 = 4;

/// The interchange document or its file extension is unusable.
pub const EXIT_FORMAT: u8 = 5;

/// Map a grid error to its exit code.
pub fn grid_exit_code(err: &GridError) -> u8 {
    match err {
        GridError::LastRow | GridError::LastColumn | GridError::OutOfBounds { .. } => {
            EXIT_INVARIANT
        }
    }
}

/// Map a store error to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::Sqlite(_) => EXIT_ERROR,
        StoreError::Grid(err) => grid_exit_code(err),
        StoreError::WorkbookNotFound(_)
        | StoreError::WorksheetNotFound(_)
        | StoreError::CellNotFound(_)
        | StoreError::TemplateNotFound(_)
        | StoreError::UserNotFound(_) => EXIT_NOT_FOUND,
        StoreError::LastWorksheet => EXIT_INVARIANT,
    }
}

/// Map an interchange error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Io(_) => EXIT_ERROR,
        IoError::Parse(_) | IoError::UnknownExtension(_) => EXIT_FORMAT,
        IoError::Store(err) => store_exit_code(err),
    }
}
