//! Request and Response models for the HTTP gateway
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{PutDataRequest, ReadQuery};
pub use responses::{HealthResponse, PutDataResponse, StatsResponse, StoreStats};
