//! API Handlers
//!
//! HTTP request handlers for each campus endpoint. The caller's session is
//! named by the `x-session-id` header.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::cache::Page;
use crate::config::Config;
use crate::domain::{validate_id, Course, Lecture, Member};
use crate::error::{CoreError, Result};
use crate::models::{
    CourseRequest, HealthResponse, LectureRequest, MemberRequest, PageQuery, ScheduleQuery,
    ScheduleResponse, StatsResponse,
};
use crate::service::{CampusService, ANONYMOUS_SESSION};

/// Header carrying the caller's session id.
pub const SESSION_HEADER: &str = "x-session-id";

/// Application state shared across all handlers.
///
/// Every request goes through the single lock around the service.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RwLock<CampusService>>,
}

impl AppState {
    pub fn new(service: CampusService) -> Self {
        Self {
            service: Arc::new(RwLock::new(service)),
        }
    }

    /// Creates an AppState over an empty university.
    pub fn from_config(config: &Config) -> Self {
        Self::new(CampusService::new(config.clone()))
    }
}

fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or(ANONYMOUS_SESSION)
        .to_string()
}

/// Path ids must be positive and fit an entity id.
fn entity_id(id: i64) -> Result<u32> {
    validate_id(id)?;
    u32::try_from(id).map_err(|_| CoreError::NotFound(format!("id {}", id)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /stats
///
/// Returns paginator statistics for the caller's session and the shared
/// tracker's occupancy.
pub async fn stats_handler(State(state): State<AppState>, headers: HeaderMap) -> Json<StatsResponse> {
    let session = session_id(&headers);
    let service = state.service.read().await;
    let stats = service.stats(&session);

    Json(StatsResponse::new(session, &stats, service.tracker()))
}

/// Handler for DELETE /session
///
/// Drops the caller's session and its page caches.
pub async fn end_session_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode> {
    let session = session_id(&headers);
    let mut service = state.service.write().await;

    if service.end_session(&session) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound(format!("session {}", session)))
    }
}

// == Members ==

/// Handler for GET /members?page&kind&fetch
pub async fn list_members_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Member>>> {
    let mut service = state.service.write().await;
    let page = service.member_page(
        &session_id(&headers),
        query.page_number(),
        &query.kinds(),
        query.refresh(),
    )?;

    Ok(Json(page))
}

/// Handler for POST /members
pub async fn create_member_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<MemberRequest>,
) -> Result<(StatusCode, Json<Member>)> {
    let mut service = state.service.write().await;
    let member = service.create_member(&session_id(&headers), req.into_member(None))?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// Handler for GET /members/:id
pub async fn get_member_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Member>> {
    let id = entity_id(id)?;
    // Write lock needed: lookups track the member type
    let mut service = state.service.write().await;
    let member = service.member(&session_id(&headers), id)?;

    Ok(Json(member))
}

/// Handler for PUT /members/:id
pub async fn update_member_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(req): Json<MemberRequest>,
) -> Result<Json<Member>> {
    let id = entity_id(id)?;
    let mut service = state.service.write().await;
    let member = service.update_member(&session_id(&headers), req.into_member(Some(id)))?;

    Ok(Json(member))
}

/// Handler for DELETE /members/:id
pub async fn delete_member_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Member>> {
    let id = entity_id(id)?;
    let mut service = state.service.write().await;
    let member = service.delete_member(&session_id(&headers), id)?;

    Ok(Json(member))
}

/// Handler for GET /members/:id/schedule?range=daily|monthly
pub async fn member_schedule_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<ScheduleResponse>> {
    let id = entity_id(id)?;
    let range = query.range.unwrap_or_default();

    let service = state.service.read().await;
    let schedule = service.member_schedule(id, range)?;

    Ok(Json(ScheduleResponse::new(id, range, schedule)))
}

// == Courses ==

/// Handler for GET /courses?page&fetch
pub async fn list_courses_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Course>>> {
    let mut service = state.service.write().await;
    let page = service.course_page(&session_id(&headers), query.page_number(), query.refresh())?;

    Ok(Json(page))
}

/// Handler for POST /courses
pub async fn create_course_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CourseRequest>,
) -> Result<(StatusCode, Json<Course>)> {
    let mut service = state.service.write().await;
    let course = service.create_course(&session_id(&headers), req.into())?;

    Ok((StatusCode::CREATED, Json(course)))
}

// == Lectures ==

/// Handler for GET /lectures?page&fetch
pub async fn list_lectures_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Lecture>>> {
    let mut service = state.service.write().await;
    let page = service.lecture_page(&session_id(&headers), query.page_number(), query.refresh())?;

    Ok(Json(page))
}

/// Handler for POST /lectures
///
/// Rejects invalid lectures with 422 and teacher double-booking with 409.
pub async fn schedule_lecture_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LectureRequest>,
) -> Result<(StatusCode, Json<Lecture>)> {
    let mut service = state.service.write().await;
    let lecture =
        service.resolve_lecture(req.date, req.course_id, req.teacher_id, &req.student_ids)?;
    let scheduled = service.schedule_lecture(&session_id(&headers), lecture)?;

    Ok((StatusCode::CREATED, Json(scheduled)))
}

/// Handler for DELETE /lectures/:id
pub async fn cancel_lecture_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Lecture>> {
    let id = entity_id(id)?;
    let mut service = state.service.write().await;
    let lecture = service.cancel_lecture(&session_id(&headers), id)?;

    Ok(Json(lecture))
}
