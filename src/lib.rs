//! Campus Cache - session-scoped caching and scheduling core
//!
//! Pages university members, courses and lectures out of TTL-expiring caches,
//! tracks member types in a bounded LRU map and keeps teachers from being
//! double-booked.

pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod service;

pub use api::AppState;
pub use config::Config;
pub use error::{CoreError, Result};
pub use service::CampusService;
