//! API Module
//!
//! HTTP gateway exposing the virtual files and data ingestion.
//!
//! # Endpoints
//! - `PUT /data` - Store a data record, returns its key
//! - `GET /stat/*path` - File metadata
//! - `GET /files/*path?offset=N` - File content
//! - `PUT|DELETE /files/*path`, `GET /dirs/*path` - Always 405
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
