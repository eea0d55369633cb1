//! API Handlers
//!
//! HTTP request handlers for each order service endpoint. Every handler that
//! may reach the store runs under a per-request deadline derived from the
//! server's root context.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::context::Context;
use crate::error::Result;
use crate::models::{CreatedResponse, HealthResponse, Order, OrderResponse, StatsResponse};
use crate::service::OrderService;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrderService>,
    /// Parent of every request context; cancelled at shutdown
    pub root: Context,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(service: Arc<OrderService>, request_timeout: Duration) -> Self {
        Self::with_root(service, Context::background(), request_timeout)
    }

    pub fn with_root(service: Arc<OrderService>, root: Context, request_timeout: Duration) -> Self {
        Self {
            service,
            root,
            request_timeout,
        }
    }

    fn request_context(&self) -> Context {
        self.root.child_with_timeout(self.request_timeout)
    }
}

/// Handler for GET /order/:uid
///
/// Returns the public projection of one order.
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<OrderResponse>> {
    let ctx = state.request_context();
    let order = state.service.get_order_response(&ctx, &uid).await?;

    Ok(Json(order))
}

/// Handler for POST /order
///
/// Validates, persists and caches a complete order.
pub async fn create_order_handler(
    State(state): State<AppState>,
    Json(order): Json<Order>,
) -> Result<(StatusCode, Json<CreatedResponse>)> {
    let ctx = state.request_context();
    let order = state.service.create_order(&ctx, order).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse::new(order.order_uid.clone())),
    ))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.service.cache_stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
