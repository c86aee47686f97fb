pub mod cell;
pub mod error;
pub mod find;
pub mod grid;
pub mod palette;
pub mod refs;
pub mod template;
pub mod user;
pub mod workbook;
pub mod worksheet;
