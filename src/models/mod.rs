//! Request and Response models for the campus API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{CourseRequest, LectureRequest, MemberRequest, PageQuery, ScheduleQuery};
pub use responses::{
    ErrorResponse, HealthResponse, PaginatorStatsResponse, ScheduleResponse, StatsResponse,
    TrackerStatsResponse,
};
