//! API Module
//!
//! HTTP handlers and routing for the order service REST API.
//!
//! # Endpoints
//! - `GET /order/:uid` - Retrieve an order by identifier
//! - `POST /order` - Store a complete order
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
