//! Order Cache - order lookup service with a cache-aside layer
//!
//! Ingests orders, persists them durably and serves point lookups from a
//! bounded LRU cache (optionally with idle-time expiry) kept consistent with
//! the store.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod ingest;
pub mod models;
pub mod repository;
pub mod service;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use context::{CancelHandle, Context};
pub use error::{ServiceError, StoreError, ValidationError};
pub use ingest::{IngestStats, MessageProcessor, OrderConsumer};
pub use repository::{JsonFileRepository, MemoryRepository, OrderRepository};
pub use service::OrderService;
