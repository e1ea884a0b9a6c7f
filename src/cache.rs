//! In-memory caching using moka
//!
//! Provides application-level caching for the rate catalog. Catalog rows
//! change rarely (an operator edits a rate card a few times a season), so
//! short TTLs keep quotes honest without hammering the database on every
//! booking form keystroke.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::pricing::models::{LineItem, SalesTax, Service, Vehicle};
use crate::pricing::queries;

/// Application cache holding the rate catalog collections
#[derive(Clone)]
pub struct AppCache {
    /// Active vehicles (singleton entry)
    pub vehicles: Cache<String, Arc<Vec<Vehicle>>>,
    /// Active services (singleton entry)
    pub services: Cache<String, Arc<Vec<Service>>>,
    /// Active line items (singleton entry)
    pub line_items: Cache<String, Arc<Vec<LineItem>>>,
    /// Sales taxes, active and retired (singleton entry)
    pub sales_taxes: Cache<String, Arc<Vec<SalesTax>>>,
}

impl AppCache {
    /// Singleton key under which each catalog collection is stored.
    pub const CATALOG_KEY: &'static str = "catalog";

    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Vehicles: 10 min TTL; rate card edits should show up quickly
            vehicles: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),

            // Services: 30 min TTL (rarely changes)
            services: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),

            // Line items: 10 min TTL; surcharges are edited seasonally
            line_items: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),

            // Sales taxes: 30 min TTL
            sales_taxes: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(30 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            vehicles_cached: self.vehicles.entry_count() > 0,
            services_cached: self.services.entry_count() > 0,
            line_items_cached: self.line_items.entry_count() > 0,
            sales_taxes_cached: self.sales_taxes.entry_count() > 0,
        }
    }

    /// Invalidate the whole catalog, e.g. after an operator edit
    pub fn invalidate_catalog(&self) {
        self.vehicles.invalidate_all();
        self.services.invalidate_all();
        self.line_items.invalidate_all();
        self.sales_taxes.invalidate_all();
        info!("Rate catalog caches invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub vehicles_cached: bool,
    pub services_cached: bool,
    pub line_items_cached: bool,
    pub sales_taxes_cached: bool,
}

/// Start background cache warmer
///
/// Warms the catalog on startup and refreshes every 5 minutes so the first
/// quote after a quiet period never pays the database round-trips.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    // Initial warm-up
    warm_cache(&cache, &db).await;

    // Periodic refresh
    let mut interval = interval(Duration::from_secs(5 * 60));
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with the full rate catalog
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting catalog cache warm-up...");

    match queries::get_active_vehicles(db).await {
        Ok(vehicles) => {
            cache
                .vehicles
                .insert(AppCache::CATALOG_KEY.to_string(), Arc::new(vehicles))
                .await;
        }
        Err(e) => warn!("Failed to warm vehicle cache: {}", e),
    }

    match queries::get_active_services(db).await {
        Ok(services) => {
            cache
                .services
                .insert(AppCache::CATALOG_KEY.to_string(), Arc::new(services))
                .await;
        }
        Err(e) => warn!("Failed to warm service cache: {}", e),
    }

    match queries::get_active_line_items(db).await {
        Ok(items) => {
            cache
                .line_items
                .insert(AppCache::CATALOG_KEY.to_string(), Arc::new(items))
                .await;
        }
        Err(e) => warn!("Failed to warm line item cache: {}", e),
    }

    match queries::get_sales_taxes(db).await {
        Ok(taxes) => {
            cache
                .sales_taxes
                .insert(AppCache::CATALOG_KEY.to_string(), Arc::new(taxes))
                .await;
        }
        Err(e) => warn!("Failed to warm sales tax cache: {}", e),
    }

    info!("Catalog warm-up complete. Stats: {:?}", cache.stats());
}
