//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lifetime in seconds of member and course page caches
    pub page_ttl: u64,
    /// Lifetime in seconds of lecture page caches
    pub lecture_page_ttl: u64,
    /// Number of entries rendered per page
    pub items_per_page: usize,
    /// Capacity of the shared member type tracker
    pub tracker_capacity: usize,
    /// Most sessions held at once; the least recently used is dropped first
    pub session_capacity: usize,
    /// Seconds a session may stay unused before it is dropped
    pub session_idle_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Optional JSON file with university seed data
    pub seed_file: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PAGE_TTL` - Member/course page cache lifetime in seconds (default: 60)
    /// - `LECTURE_PAGE_TTL` - Lecture page cache lifetime in seconds (default: 120)
    /// - `ITEMS_PER_PAGE` - Entries per page (default: 10)
    /// - `TRACKER_CAPACITY` - Member type tracker capacity (default: 512)
    /// - `SESSION_CAPACITY` - Sessions held at once (default: 1024)
    /// - `SESSION_IDLE_TTL` - Idle session lifetime in seconds (default: 1800)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SEED_FILE` - JSON seed data loaded at startup (default: none)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            page_ttl: env_or("PAGE_TTL", defaults.page_ttl),
            lecture_page_ttl: env_or("LECTURE_PAGE_TTL", defaults.lecture_page_ttl),
            items_per_page: env_or("ITEMS_PER_PAGE", defaults.items_per_page),
            tracker_capacity: env_or("TRACKER_CAPACITY", defaults.tracker_capacity),
            session_capacity: env_or("SESSION_CAPACITY", defaults.session_capacity),
            session_idle_ttl: env_or("SESSION_IDLE_TTL", defaults.session_idle_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            seed_file: env::var("SEED_FILE").ok().filter(|path| !path.is_empty()),
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_ttl: 60,
            lecture_page_ttl: 120,
            items_per_page: 10,
            tracker_capacity: 512,
            session_capacity: 1024,
            session_idle_ttl: 1800,
            server_port: 3000,
            seed_file: None,
        }
    }
}
