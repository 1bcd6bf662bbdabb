//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycles against a seeded university.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use campus_cache::{
    api::create_router,
    domain::{Course, Member, UniversityData},
    AppState, CampusService, Config,
};
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn seed() -> UniversityData {
    UniversityData {
        teachers: vec![
            Member::teacher("Ada", "Lovelace").with_id(1),
            Member::teacher("Edsger", "Dijkstra").with_id(2),
        ],
        students: vec![
            Member::student("Alan", "Turing").with_id(3),
            Member::student("Grace", "Hopper").with_id(4),
            Member::student("Barbara", "Liskov").with_id(5),
        ],
        courses: vec![Course::new("Math", "Analysis").with_id(6)],
        lectures: Vec::new(),
    }
}

fn create_test_app() -> Router {
    let config = Config {
        items_per_page: 2,
        ..Config::default()
    };
    create_router(AppState::new(CampusService::from_data(config, seed())))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-session-id", "integration")
        .body(Body::empty())
        .unwrap()
}

fn with_body(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-session-id", "integration")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("x-session-id", "integration")
        .body(Body::empty())
        .unwrap()
}

const LECTURE_10_15: &str =
    r#"{"date":"2026-10-05T10:15:00","course_id":6,"teacher_id":1,"student_ids":[3,4]}"#;

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Member Endpoint Tests ==

#[tokio::test]
async fn test_member_pages_clamp() {
    let app = create_test_app();

    let (status, first) = send(&app, get("/members?page=-100")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["page_number"], 1);
    assert_eq!(first["page_count"], 3);

    let (_, last) = send(&app, get("/members?page=2147483647")).await;
    assert_eq!(last["page_number"], 3);
    assert_eq!(last["content"].as_array().unwrap().len(), 1);

    let (status, beyond) = send(&app, get("/members?page=99999999999")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(beyond["page_number"], 3);

    let (status, below) = send(&app, get("/courses?page=-99999999999")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(below["page_number"], 1);
}

#[tokio::test]
async fn test_member_pages_by_kind() {
    let app = create_test_app();

    let (_, teachers) = send(&app, get("/members?kind=teacher")).await;
    let content = teachers["content"].as_array().unwrap();

    assert_eq!(teachers["page_count"], 1);
    assert_eq!(content.len(), 2);
    assert!(content.iter().all(|m| m["kind"] == "teacher"));
}

#[tokio::test]
async fn test_create_member_then_list() {
    let app = create_test_app();

    let (status, created) = send(
        &app,
        with_body(
            "POST",
            "/members",
            r#"{"kind":"student","first_name":"Niklaus","last_name":"Wirth"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 7);

    let (_, page) = send(&app, get("/members?kind=student&page=2")).await;
    let ids: Vec<&Value> = page["content"].as_array().unwrap().iter().map(|m| &m["id"]).collect();
    assert_eq!(ids, vec![&Value::from(5), &Value::from(7)]);
}

#[tokio::test]
async fn test_create_member_validation_error() {
    let app = create_test_app();

    let (status, json) = send(&app, with_body("POST", "/members", r#"{"first_name":"Nobody"}"#)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("has valid type set"));
}

#[tokio::test]
async fn test_get_member() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/members/3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["last_name"], "Turing");

    let (status, _) = send(&app, get("/members/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/members/0")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_type_change_rejected_for_scheduled_member() {
    let app = create_test_app();

    let (status, _) = send(&app, with_body("POST", "/lectures", LECTURE_10_15)).await;
    assert_eq!(status, StatusCode::CREATED);
    send(&app, get("/members")).await;

    let (status, json) = send(
        &app,
        with_body(
            "PUT",
            "/members/3",
            r#"{"kind":"teacher","first_name":"Alan","last_name":"Turing"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("cannot be altered"));

    let (status, json) = send(
        &app,
        with_body(
            "PUT",
            "/members/5",
            r#"{"kind":"teacher","first_name":"Barbara","last_name":"Liskov"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["kind"], "teacher");
}

#[tokio::test]
async fn test_delete_member() {
    let app = create_test_app();
    send(&app, with_body("POST", "/lectures", LECTURE_10_15)).await;

    let (status, _) = send(&app, delete("/members/1")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, json) = send(&app, delete("/members/4")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["first_name"], "Grace");

    let (status, _) = send(&app, get("/members/4")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Lecture Endpoint Tests ==

#[tokio::test]
async fn test_schedule_conflicts() {
    let app = create_test_app();

    let (status, _) = send(&app, with_body("POST", "/lectures", LECTURE_10_15)).await;
    assert_eq!(status, StatusCode::CREATED);

    // Identical lecture conflicts with itself
    let (status, _) = send(&app, with_body("POST", "/lectures", LECTURE_10_15)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Same teacher, same clock hour
    let (status, _) = send(
        &app,
        with_body(
            "POST",
            "/lectures",
            r#"{"date":"2026-10-05T10:45:00","course_id":6,"teacher_id":1,"student_ids":[5]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Next hour is free
    let (status, _) = send(
        &app,
        with_body(
            "POST",
            "/lectures",
            r#"{"date":"2026-10-05T11:00:00","course_id":6,"teacher_id":1,"student_ids":[5]}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, page) = send(&app, get("/lectures")).await;
    assert_eq!(page["content"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_schedule_invalid_lecture() {
    let app = create_test_app();

    let (status, json) = send(
        &app,
        with_body("POST", "/lectures", r#"{"course_id":6,"teacher_id":3,"student_ids":[]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("has date set"));

    let (status, _) = send(
        &app,
        with_body("POST", "/lectures", r#"{"course_id":60,"teacher_id":1,"student_ids":[3]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_lecture() {
    let app = create_test_app();

    let (_, lecture) = send(&app, with_body("POST", "/lectures", LECTURE_10_15)).await;
    let uri = format!("/lectures/{}", lecture["id"]);

    let (status, cancelled) = send(&app, delete(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["date"], "2026-10-05T10:15:00");

    let (status, _) = send(&app, delete(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, page) = send(&app, get("/lectures?fetch=true")).await;
    assert_eq!(page["page_count"], 0);
}

#[tokio::test]
async fn test_cancel_lecture_after_students_removed() {
    let app = create_test_app();

    let (_, lecture) = send(&app, with_body("POST", "/lectures", LECTURE_10_15)).await;
    let uri = format!("/lectures/{}", lecture["id"]);
    send(&app, delete("/members/3")).await;
    send(&app, delete("/members/4")).await;

    let (status, cancelled) = send(&app, delete(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["students"], Value::Array(Vec::new()));

    let (status, _) = send(&app, delete("/members/1")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_member_schedule_range() {
    let app = create_test_app();

    let (status, json) = send(&app, get("/members/3/schedule?range=daily")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["range"], "daily");
    assert_eq!(json["lectures"], Value::Array(Vec::new()));

    let (_, json) = send(&app, get("/members/3/schedule")).await;
    assert_eq!(json["range"], "monthly");

    let (status, _) = send(&app, get("/members/42/schedule")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == Course Endpoint Tests ==

#[tokio::test]
async fn test_courses() {
    let app = create_test_app();

    let (status, created) = send(
        &app,
        with_body("POST", "/courses", r#"{"subject":"Physics","description":"Optics"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["subject"], "Physics");

    let (_, page) = send(&app, get("/courses")).await;
    assert_eq!(page["content"].as_array().unwrap().len(), 2);

    let (status, _) = send(&app, with_body("POST", "/courses", r#"{"subject":"Art"}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_follow_session() {
    let app = create_test_app();

    send(&app, get("/members")).await;
    send(&app, get("/members?page=2")).await;

    let (status, json) = send(&app, get("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session"], "integration");
    assert_eq!(json["members"]["hits"], 2);
    assert_eq!(json["members"]["refreshes"], 1);
    assert_eq!(json["members"]["cached_entries"], 5);
    assert_eq!(json["tracker"]["tracked"], 5);

    // Another session starts from zero
    let (_, other) = send(
        &app,
        Request::builder()
            .uri("/stats")
            .header("x-session-id", "someone-else")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(other["members"]["hits"], 0);
}

#[tokio::test]
async fn test_end_session() {
    let app = create_test_app();
    send(&app, get("/members")).await;

    let response = app.clone().oneshot(delete("/session")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, json) = send(&app, delete("/session")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("integration"));

    let (_, stats) = send(&app, get("/stats")).await;
    assert_eq!(stats["members"]["hits"], 0);
}

#[tokio::test]
async fn test_invalid_json_body() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/members")
                .header("content-type", "application/json")
                .body(Body::from("not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}
