//! API Module
//!
//! Operational HTTP surface of the refill worker.
//!
//! # Endpoints
//! - `POST /refill/:key` - Run one refill for a key on demand
//! - `GET /stats` - Get refill counters
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
