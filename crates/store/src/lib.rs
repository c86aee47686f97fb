//! SQLite persistence for DoWell: the schema, the `Store` gateway, seed
//! content and grid editing sessions.

pub mod error;
mod seed;
pub mod session;
pub mod store;
