pub mod cache;
pub mod db;
pub mod error;
pub mod models;
pub mod pricing;

use sqlx::PgPool;

use cache::AppCache;
use pricing::DirectionsClient;

/// Shared application state for route handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub directions: DirectionsClient,
}
