//! API Module
//!
//! HTTP handlers and routing for the campus REST API.
//!
//! # Endpoints
//! - `GET /health`, `GET /stats`
//! - `/members`, `/members/:id`, `/members/:id/schedule`
//! - `/courses`
//! - `/lectures`, `/lectures/:id`

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
