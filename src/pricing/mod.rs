//! Quote pricing module for the livery booking service.
//!
//! Turns a requested trip (vehicle class, service type, route, hours) into
//! a fully itemized, tax-correct quote. The math lives in pure calculator
//! functions and the [`engine::PricingEngine`]; database access and the
//! directions provider stay at the edges.

pub mod calculators;
pub mod directions;
pub mod engine;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{round_money, PricingMode};
pub use directions::{DirectionsClient, ProviderError};
pub use engine::{PricingEngine, QuoteSnapshot, RowTotal};
pub use routes::router;
