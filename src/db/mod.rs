//! Database access layer

pub mod queries;
pub mod seed;

pub use queries::*;
