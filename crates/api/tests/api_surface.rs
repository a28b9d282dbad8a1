//! HTTP-level tests: the actor contract, admin guards, error envelopes, and
//! the structured conflict/proximity responses.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;
use sqlx::PgPool;

use common::{build_test_app, send_request};

const ADMIN: Option<(i64, &str)> = Some((1, "admin"));

// ---------------------------------------------------------------------------
// Health and identity
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_ok(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, body) = send_request(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_identity_headers_are_unauthorized(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, body) = send_request(&app, Method::GET, "/api/v1/sites", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn field_role_cannot_create_sites(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, body) = send_request(
        &app,
        Method::POST,
        "/api/v1/sites",
        Some((7, "field")),
        Some(json!({ "name": "Palm Court", "longitude": 29.0, "latitude": 41.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
}

// ---------------------------------------------------------------------------
// CRUD and validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn admin_creates_and_lists_sites(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, body) = send_request(
        &app,
        Method::POST,
        "/api/v1/sites",
        ADMIN,
        Some(json!({
            "name": "Palm Court",
            "address": "12 Palm Street",
            "longitude": 29.0253,
            "latitude": 41.0422
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["name"], "Palm Court");

    let (status, body) = send_request(&app, Method::GET, "/api/v1/sites", ADMIN, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_ids_return_structured_not_found(pool: PgPool) {
    let app = build_test_app(pool);

    let (status, body) = send_request(&app, Method::GET, "/api/v1/sites/42", ADMIN, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

async fn create_fixture(app: &axum::Router) -> (i64, i64) {
    let (_, site) = send_request(
        app,
        Method::POST,
        "/api/v1/sites",
        ADMIN,
        Some(json!({ "name": "Palm Court", "longitude": 29.0253, "latitude": 41.0422 })),
    )
    .await;
    let (_, staff) = send_request(
        app,
        Method::POST,
        "/api/v1/staff",
        ADMIN,
        Some(json!({ "name": "Ali Demir", "phone": "905551111111" })),
    )
    .await;
    (
        staff["data"]["id"].as_i64().unwrap(),
        site["data"]["id"].as_i64().unwrap(),
    )
}

#[sqlx::test(migrations = "../db/migrations")]
async fn empty_weekday_set_is_a_validation_error(pool: PgPool) {
    let app = build_test_app(pool);
    let (staff_id, site_id) = create_fixture(&app).await;

    let (status, body) = send_request(
        &app,
        Method::POST,
        "/api/v1/assignments",
        ADMIN,
        Some(json!({
            "staff_id": staff_id,
            "site_id": site_id,
            "duty_type": "garbage",
            "scheduled_days": [],
            "schedule_start": "19:00",
            "schedule_end": "20:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn inverted_window_is_a_validation_error(pool: PgPool) {
    let app = build_test_app(pool);
    let (staff_id, site_id) = create_fixture(&app).await;

    let (status, body) = send_request(
        &app,
        Method::POST,
        "/api/v1/assignments",
        ADMIN,
        Some(json!({
            "staff_id": staff_id,
            "site_id": site_id,
            "duty_type": "garbage",
            "scheduled_days": ["MON"],
            "schedule_start": "20:00",
            "schedule_end": "19:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// ---------------------------------------------------------------------------
// Structured conflict and proximity responses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn overlapping_assignment_returns_the_conflicting_id(pool: PgPool) {
    let app = build_test_app(pool);
    let (staff_id, site_id) = create_fixture(&app).await;

    let (status, first) = send_request(
        &app,
        Method::POST,
        "/api/v1/assignments",
        ADMIN,
        Some(json!({
            "staff_id": staff_id,
            "site_id": site_id,
            "duty_type": "garbage",
            "scheduled_days": ["MON"],
            "schedule_start": "19:00",
            "schedule_end": "20:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let first_id = first["data"]["id"].as_i64().unwrap();

    let (status, body) = send_request(
        &app,
        Method::POST,
        "/api/v1/assignments",
        ADMIN,
        Some(json!({
            "staff_id": staff_id,
            "site_id": site_id,
            "duty_type": "cleaning",
            "scheduled_days": ["MON", "WED"],
            "schedule_start": "19:30",
            "schedule_end": "20:30"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "SCHEDULE_CONFLICT");
    assert_eq!(body["conflicting_assignment_id"].as_i64().unwrap(), first_id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn out_of_range_start_returns_distance_and_radius(pool: PgPool) {
    let app = build_test_app(pool);
    let (staff_id, site_id) = create_fixture(&app).await;

    let (_, assignment) = send_request(
        &app,
        Method::POST,
        "/api/v1/assignments",
        ADMIN,
        Some(json!({
            "staff_id": staff_id,
            "site_id": site_id,
            "duty_type": "garbage",
            "scheduled_days": ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"],
            "schedule_start": "00:01",
            "schedule_end": "23:59"
        })),
    )
    .await;
    let assignment_id = assignment["data"]["id"].as_i64().unwrap();

    // ~500 m north of the site.
    let (status, body) = send_request(
        &app,
        Method::POST,
        &format!("/api/v1/assignments/{assignment_id}/start"),
        Some((staff_id, "field")),
        Some(json!({ "longitude": 29.0253, "latitude": 41.0467 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "PROXIMITY_DENIED");
    assert_eq!(body["radius_meters"].as_f64().unwrap(), 20.0);
    let distance = body["distance_meters"].as_f64().unwrap();
    assert!((distance - 500.0).abs() < 10.0, "got {distance}");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn start_then_second_start_via_http_conflicts(pool: PgPool) {
    let app = build_test_app(pool);
    let (staff_id, site_id) = create_fixture(&app).await;

    let (_, assignment) = send_request(
        &app,
        Method::POST,
        "/api/v1/assignments",
        ADMIN,
        Some(json!({
            "staff_id": staff_id,
            "site_id": site_id,
            "duty_type": "garbage",
            "scheduled_days": ["MON", "TUE", "WED", "THU", "FRI", "SAT", "SUN"],
            "schedule_start": "00:01",
            "schedule_end": "23:59"
        })),
    )
    .await;
    let assignment_id = assignment["data"]["id"].as_i64().unwrap();
    let start_uri = format!("/api/v1/assignments/{assignment_id}/start");
    let at_site = json!({ "longitude": 29.0253, "latitude": 41.0422 });

    let (status, body) = send_request(
        &app,
        Method::POST,
        &start_uri,
        Some((staff_id, "field")),
        Some(at_site.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["record"]["status"], "IN_PROGRESS");
    assert_eq!(body["data"]["is_late"], false);

    let (status, body) = send_request(
        &app,
        Method::POST,
        &start_uri,
        Some((staff_id, "field")),
        Some(at_site),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}
