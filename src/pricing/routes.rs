//! Quote and catalog route handlers

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::cache::CacheStats;
use crate::db;
use crate::error::Result;
use crate::AppState;

use super::models::{LineItem, SalesTax, Service, Vehicle};
use super::requests::CreateQuoteRequest;
use super::responses::QuoteResponse;
use super::services;

/// Assemble the pricing API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/quotes", post(create_quote))
        .route("/api/quotes/:quote_number", get(get_quote))
        .route("/api/quotes/:quote_number/open", get(get_open_quote))
        .route("/api/quotes/:quote_number/book", post(book_quote))
        .route("/api/catalog/vehicles", get(list_vehicles))
        .route("/api/catalog/services", get(list_services))
        .route("/api/catalog/line-items", get(list_line_items))
        .route("/api/catalog/sales-taxes", get(list_sales_taxes))
        .route("/api/health", get(health))
}

/// Compute, persist, and return a quote for a booking request.
pub async fn create_quote(
    State(state): State<AppState>,
    Json(request): Json<CreateQuoteRequest>,
) -> Result<Json<QuoteResponse>> {
    let quote =
        services::create_quote(&state.db, &state.cache, &state.directions, request).await?;
    Ok(Json(quote.into()))
}

/// Fetch a previously issued quote by its number.
pub async fn get_quote(
    State(state): State<AppState>,
    Path(quote_number): Path<i32>,
) -> Result<Json<QuoteResponse>> {
    let quote = db::get_quote(&state.db, quote_number).await?;
    Ok(Json(quote.into()))
}

/// Fetch a quote only while it is still open: issued within the last seven
/// days and not yet booked. Used when a customer follows a quote link.
pub async fn get_open_quote(
    State(state): State<AppState>,
    Path(quote_number): Path<i32>,
) -> Result<Json<QuoteResponse>> {
    let quote = db::find_recent_unbooked(&state.db, quote_number)
        .await?
        .ok_or(crate::error::AppError::NotFound)?;
    Ok(Json(quote.into()))
}

/// Mark a quote as booked once the payment collaborator confirms it.
pub async fn book_quote(
    State(state): State<AppState>,
    Path(quote_number): Path<i32>,
) -> Result<Json<QuoteResponse>> {
    db::mark_booked(&state.db, quote_number).await?;
    let quote = db::get_quote(&state.db, quote_number).await?;
    Ok(Json(quote.into()))
}

/// Active vehicles for the booking form.
pub async fn list_vehicles(State(state): State<AppState>) -> Result<Json<Vec<Vehicle>>> {
    let vehicles = services::cached_vehicles(&state.db, &state.cache).await?;
    Ok(Json(vehicles))
}

/// Active services for the booking form.
pub async fn list_services(State(state): State<AppState>) -> Result<Json<Vec<Service>>> {
    let services = services::cached_services(&state.db, &state.cache).await?;
    Ok(Json(services))
}

/// Active line items for quote preview display.
pub async fn list_line_items(State(state): State<AppState>) -> Result<Json<Vec<LineItem>>> {
    let items = services::cached_line_items(&state.db, &state.cache).await?;
    Ok(Json(items))
}

/// Sales taxes, including retired rates for historical views.
pub async fn list_sales_taxes(State(state): State<AppState>) -> Result<Json<Vec<SalesTax>>> {
    let taxes = services::cached_sales_taxes(&state.db, &state.cache).await?;
    Ok(Json(taxes))
}

/// Liveness probe with cache statistics.
pub async fn health(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}
