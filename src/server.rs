// 🌐 REST API with Axum
// Read-only: catalog and engine are shared behind Arc, no locking

use crate::catalog::CatalogStore;
use crate::pricing::{PriceQuote, PricingEngine};
use crate::rules::MultiplierTable;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogStore>,
    pub engine: Arc<PricingEngine>,
}

impl AppState {
    pub fn new(catalog: CatalogStore, engine: PricingEngine) -> Self {
        Self {
            catalog: Arc::new(catalog),
            engine: Arc::new(engine),
        }
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    parts: usize,
    catalog_loaded_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    term: String,
    suggestions: Vec<String>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "OK",
        parts: state.catalog.len(),
        catalog_loaded_at: state.catalog.loaded_at(),
    }))
}

/// GET /api/search?q=term&limit=n - Suggestions for a partial code
async fn search_codes(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let suggestions = state
        .catalog
        .search_limited(&params.q, limit)
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(ApiResponse::ok(SearchResponse {
        term: params.q,
        suggestions,
    }))
}

/// GET /api/quote/:code - Price breakdown for one part
///
/// Unknown codes still answer 200 with a zeroed breakdown and `found: false`.
async fn get_quote(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    // Path already percent-decodes the segment
    let record = state.catalog.get(&code);
    if record.is_none() {
        tracing::warn!(code = %code, "quote requested for unknown code");
    }

    let quote: PriceQuote = state.engine.quote(&code, record);
    (StatusCode::OK, Json(ApiResponse::ok(quote)))
}

/// GET /api/pricing - Active multiplier table
async fn get_pricing(State(state): State<AppState>) -> impl IntoResponse {
    let table: MultiplierTable = state.engine.table().clone();
    Json(ApiResponse::ok(table))
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/search", get(search_codes))
        .route("/quote/:code", get(get_quote))
        .route("/pricing", get(get_pricing))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}
