//! The `.dwl` interchange codec: JSON document types and the export /
//! import pipeline.

pub mod codec;
pub mod document;
pub mod error;
