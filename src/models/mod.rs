//! Persisted application models

pub mod quote;

pub use quote::{NewQuote, Quote};
