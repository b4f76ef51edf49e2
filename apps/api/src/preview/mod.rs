//! Editable preview: typed edits and Markdown export.

pub mod handlers;
pub mod markdown;
