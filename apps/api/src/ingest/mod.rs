//! CV ingestion: document bytes → text → `StructuredResume`.
//!
//! Stages: `document` (extraction), `normalize` (cleanup and header
//! injection), `parser` + `extractors` (section parsing), `builder` (defaults).

pub mod builder;
pub mod document;
pub mod extractors;
pub mod handlers;
pub mod normalize;
pub mod parser;
pub mod pdf;
pub mod sections;
pub mod word;
