//! API Routes
//!
//! Configures the Axum router with all campus endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cancel_lecture_handler, create_course_handler, create_member_handler, delete_member_handler,
    end_session_handler, get_member_handler, health_handler, list_courses_handler,
    list_lectures_handler, list_members_handler, member_schedule_handler,
    schedule_lecture_handler, stats_handler, update_member_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Session cache and tracker statistics
/// - `DELETE /session` - End the caller's session
/// - `GET|POST /members` - Member page / create member
/// - `GET|PUT|DELETE /members/:id` - Read, update, remove a member
/// - `GET /members/:id/schedule` - Daily or monthly lectures of a member
/// - `GET|POST /courses` - Course page / create course
/// - `GET|POST /lectures` - Lecture page / schedule lecture
/// - `DELETE /lectures/:id` - Cancel a lecture
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/session", delete(end_session_handler))
        .route(
            "/members",
            get(list_members_handler).post(create_member_handler),
        )
        .route(
            "/members/:id",
            get(get_member_handler)
                .put(update_member_handler)
                .delete(delete_member_handler),
        )
        .route("/members/:id/schedule", get(member_schedule_handler))
        .route(
            "/courses",
            get(list_courses_handler).post(create_course_handler),
        )
        .route(
            "/lectures",
            get(list_lectures_handler).post(schedule_lecture_handler),
        )
        .route("/lectures/:id", delete(cancel_lecture_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::from_config(&Config::default()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_members_endpoint_on_empty_university() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/members?page=3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_member_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/members")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"kind":"student","first_name":"Alan","last_name":"Turing"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_get_member_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/members/77")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
