pub mod edit;
pub mod resume;
