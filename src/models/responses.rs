//! Response DTOs for the campus API
//!
//! Defines the structure of outgoing HTTP response bodies. Entities and pages
//! are serialized directly; these cover the remaining endpoints.

use serde::Serialize;

use crate::cache::PaginatorStats;
use crate::domain::{Lecture, LectureSchedule, MemberTracker, ScheduleRange};
use crate::service::SessionStats;

/// Counters of one paginator, with the derived hit rate.
#[derive(Debug, Clone, Serialize)]
pub struct PaginatorStatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub refreshes: u64,
    pub invalidations: u64,
    pub cached_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<&PaginatorStats> for PaginatorStatsResponse {
    fn from(stats: &PaginatorStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            refreshes: stats.refreshes,
            invalidations: stats.invalidations,
            cached_entries: stats.cached_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackerStatsResponse {
    pub tracked: usize,
    pub capacity: usize,
    pub evictions: u64,
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub session: String,
    pub members: PaginatorStatsResponse,
    pub courses: PaginatorStatsResponse,
    pub lectures: PaginatorStatsResponse,
    pub tracker: TrackerStatsResponse,
}

impl StatsResponse {
    pub fn new(session: impl Into<String>, stats: &SessionStats, tracker: &MemberTracker) -> Self {
        Self {
            session: session.into(),
            members: (&stats.members).into(),
            courses: (&stats.courses).into(),
            lectures: (&stats.lectures).into(),
            tracker: TrackerStatsResponse {
                tracked: tracker.len(),
                capacity: tracker.capacity(),
                evictions: tracker.evictions(),
            },
        }
    }
}

/// Response body for GET /members/:id/schedule
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    pub member_id: u32,
    pub range: ScheduleRange,
    pub lectures: Vec<Lecture>,
}

impl ScheduleResponse {
    pub fn new(member_id: u32, range: ScheduleRange, schedule: LectureSchedule) -> Self {
        Self {
            member_id,
            range,
            lectures: schedule.into_iter().collect(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member_tracker;

    #[test]
    fn test_paginator_stats_hit_rate() {
        let stats = PaginatorStats {
            hits: 8,
            misses: 2,
            ..PaginatorStats::default()
        };
        let resp = PaginatorStatsResponse::from(&stats);
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
    }

    #[test]
    fn test_stats_response_serialize() {
        let resp = StatsResponse::new("anonymous", &SessionStats::default(), &member_tracker(16));
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["session"], "anonymous");
        assert_eq!(json["members"]["hit_rate"], 0.0);
        assert_eq!(json["tracker"]["capacity"], 16);
    }

    #[test]
    fn test_schedule_response_serialize() {
        let resp = ScheduleResponse::new(4, ScheduleRange::Daily, LectureSchedule::new());
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains(r#""range":"daily""#));
        assert!(json.contains(r#""lectures":[]"#));
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("Something went wrong"));
    }
}
