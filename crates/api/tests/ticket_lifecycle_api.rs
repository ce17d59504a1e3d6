//! HTTP-level integration tests for ticket submission, transitions, and
//! ticket queries.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, get_auth, post_auth, post_json_auth, spawn_app, Delivery, TestApp, HQ,
};
use maintdesk_core::roles::Role;
use serde_json::json;

fn delivery(owner: &str, event_type: &str, ticket_id: i64) -> Delivery {
    Delivery {
        owner: owner.to_string(),
        event_type: event_type.to_string(),
        ticket_id: Some(ticket_id),
    }
}

/// Submit a plain ticket as `u-pune` and return its id.
async fn submit_pune_ticket(app: &TestApp) -> i64 {
    let token = app.token("u-pune", Role::NormalUser, "Pune");
    let response = post_json_auth(
        app.app(),
        "/api/v1/tickets",
        json!({ "category": "Breakdown", "description": "Lift stuck on floor 3" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Full lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_pune_ticket_full_lifecycle() {
    let app = spawn_app();
    for subject in ["u-pune", "t-pune", "p-pune", "t-chennai"] {
        app.subscribe(subject, &format!("https://push.example/{subject}"))
            .await;
    }

    let raiser = app.token("u-pune", Role::NormalUser, "Pune");
    let planner = app.token("p-pune", Role::Planner, "Pune");
    let tech = app.token("t-pune", Role::Technician, "Pune");
    let outsider = app.token("t-chennai", Role::Technician, "Chennai");

    // Submit a facility ticket using the "Facility" alias.
    let response = post_json_auth(
        app.app(),
        "/api/v1/tickets",
        json!({
            "category": "Facility",
            "description": "Water leak near pantry",
            "building_no": "B7",
            "area_code": "A1",
            "sub_area": "Pantry",
            "keyword": "plumbing"
        }),
        &raiser,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["status"], "Open");
    assert_eq!(json["data"]["category"], "FacilityService");
    assert_eq!(json["data"]["location"], "Pune");
    assert_eq!(json["data"]["raised_by"], "u-pune");

    // Assign.
    let response = post_json_auth(
        app.app(),
        &format!("/api/v1/tickets/{id}/assign"),
        json!({ "technician_id": "t-pune" }),
        &planner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "Assigned");
    assert_eq!(json["data"]["assigned_to"], "t-pune");
    assert_eq!(json["data"]["planner_id"], "p-pune");

    // A technician elsewhere cannot touch it.
    let response = post_auth(app.app(), &format!("/api/v1/tickets/{id}/start"), &outsider).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");

    // Start.
    let response = post_auth(app.app(), &format!("/api/v1/tickets/{id}/start"), &tech).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "InProgress");

    let response = post_json_auth(
        app.app(),
        &format!("/api/v1/tickets/{id}/complete"),
        json!({ "note": "late" }),
        &outsider,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Complete.
    let response = post_json_auth(
        app.app(),
        &format!("/api/v1/tickets/{id}/complete"),
        json!({ "note": "Replaced the washer" }),
        &tech,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "Completed");
    assert_eq!(json["data"]["completion_note"], "Replaced the washer");
    assert_eq!(json["data"]["location"], "Pune");
    assert!(json["data"]["completed_at"].is_string());

    assert_eq!(
        app.deliveries().await,
        vec![
            delivery("t-pune", "ticket.assigned", id),
            delivery("u-pune", "ticket.completed", id),
            delivery("u-pune", "ticket.started", id),
            delivery("u-pune", "ticket.submitted", id),
        ]
    );
}

#[tokio::test]
async fn test_complete_without_body() {
    let app = spawn_app();
    let id = submit_pune_ticket(&app).await;
    let planner = app.token("p-pune", Role::Planner, "Pune");

    let response = post_json_auth(
        app.app(),
        &format!("/api/v1/tickets/{id}/assign"),
        json!({ "technician_id": "t-pune" }),
        &planner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Planners may drive the worker transitions too.
    let response = post_auth(app.app(), &format!("/api/v1/tickets/{id}/start"), &planner).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = post_auth(app.app(), &format!("/api/v1/tickets/{id}/complete"), &planner).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "Completed");
    assert!(json["data"]["completion_note"].is_null());
}

// ---------------------------------------------------------------------------
// Validation and authorization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_facility_ticket_with_blank_fields_is_rejected() {
    let app = spawn_app();
    let token = app.token("u-pune", Role::NormalUser, "Pune");

    let response = post_json_auth(
        app.app(),
        "/api/v1/tickets",
        json!({
            "category": "facilityservice",
            "description": "Broken window",
            "building_no": "B2",
            "area_code": "  ",
            "sub_area": "Lobby"
        }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("area_code"));
    assert!(message.contains("keyword"));
    assert_eq!(app.store.ticket_count(), 0);
    assert!(app.deliveries().await.is_empty());
}

#[tokio::test]
async fn test_unknown_category_falls_back_to_other() {
    let app = spawn_app();
    let token = app.token("u-pune", Role::NormalUser, "Pune");

    let response = post_json_auth(
        app.app(),
        "/api/v1/tickets",
        json!({ "category": "Plumbing??", "description": "Dripping tap" }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["category"], "Other");
}

#[tokio::test]
async fn test_normal_user_cannot_transition() {
    let app = spawn_app();
    let id = submit_pune_ticket(&app).await;
    let raiser = app.token("u-pune", Role::NormalUser, "Pune");

    let response = post_json_auth(
        app.app(),
        &format!("/api/v1/tickets/{id}/assign"),
        json!({ "technician_id": "t-pune" }),
        &raiser,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["code"], "FORBIDDEN");

    for action in ["start", "complete"] {
        let response =
            post_auth(app.app(), &format!("/api/v1/tickets/{id}/{action}"), &raiser).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN, "{action}");
    }
}

#[tokio::test]
async fn test_hq_admin_assigns_in_any_location() {
    let app = spawn_app();
    let id = submit_pune_ticket(&app).await;

    let hq_admin = app.token("a-hq", Role::Admin, HQ);
    let response = post_json_auth(
        app.app(),
        &format!("/api/v1/tickets/{id}/assign"),
        json!({ "technician_id": "t-pune" }),
        &hq_admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_non_hq_admin_gets_not_found_elsewhere() {
    let app = spawn_app();
    let id = submit_pune_ticket(&app).await;

    let chennai_admin = app.token("a-chennai", Role::Admin, "Chennai");
    let response = post_json_auth(
        app.app(),
        &format!("/api/v1/tickets/{id}/assign"),
        json!({ "technician_id": "t-pune" }),
        &chennai_admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assignee_must_be_a_local_technician() {
    let app = spawn_app();
    let id = submit_pune_ticket(&app).await;
    let planner = app.token("p-pune", Role::Planner, "Pune");

    for assignee in ["t-chennai", "u2-pune", "nobody"] {
        let response = post_json_auth(
            app.app(),
            &format!("/api/v1/tickets/{id}/assign"),
            json!({ "technician_id": assignee }),
            &planner,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{assignee}");
    }

    // Legacy role names on the user row still count.
    let response = post_json_auth(
        app.app(),
        &format!("/api/v1/tickets/{id}/assign"),
        json!({ "technician_id": "legacy-pune" }),
        &planner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_pre_state_is_not_found() {
    let app = spawn_app();
    let id = submit_pune_ticket(&app).await;
    let tech = app.token("t-pune", Role::Technician, "Pune");

    let response = post_auth(app.app(), &format!("/api/v1/tickets/{id}/start"), &tech).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert!(!json["error"].as_str().unwrap().contains("Open"));

    let response = post_auth(app.app(), &format!("/api/v1/tickets/{id}/complete"), &tech).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_second_start_loses_with_not_found() {
    let app = spawn_app();
    let id = submit_pune_ticket(&app).await;
    let planner = app.token("p-pune", Role::Planner, "Pune");
    let tech = app.token("t-pune", Role::Technician, "Pune");

    let response = post_json_auth(
        app.app(),
        &format!("/api/v1/tickets/{id}/assign"),
        json!({ "technician_id": "t-pune" }),
        &planner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let first = post_auth(app.app(), &format!("/api/v1/tickets/{id}/start"), &tech).await;
    assert_eq!(first.status(), StatusCode::OK);
    let second = post_auth(app.app(), &format!("/api/v1/tickets/{id}/start"), &planner).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_ticket_is_not_found() {
    let app = spawn_app();
    let planner = app.token("p-pune", Role::Planner, "Pune");

    let response = post_json_auth(
        app.app(),
        "/api/v1/tickets/424242/assign",
        json!({ "technician_id": "t-pune" }),
        &planner,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_ticket_visibility() {
    let app = spawn_app();
    let id = submit_pune_ticket(&app).await;
    let uri = format!("/api/v1/tickets/{id}");

    let visible = [
        app.token("u-pune", Role::NormalUser, "Pune"),
        app.token("p-pune", Role::Planner, "Pune"),
        app.token("a-pune", Role::Admin, "Pune"),
        app.token("a-hq", Role::Admin, HQ),
    ];
    for token in &visible {
        let response = get_auth(app.app(), &uri, token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let hidden = [
        app.token("u2-pune", Role::NormalUser, "Pune"),
        app.token("t-pune", Role::Technician, "Pune"),
        app.token("p-chennai", Role::Planner, "Chennai"),
    ];
    for token in &hidden {
        let response = get_auth(app.app(), &uri, token).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_listing_is_scoped() {
    let app = spawn_app();
    submit_pune_ticket(&app).await;

    let chennai_user = app.token("u-chennai", Role::NormalUser, "Chennai");
    let response = post_json_auth(
        app.app(),
        "/api/v1/tickets",
        json!({ "description": "AC not cooling" }),
        &chennai_user,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let count = |token: String| {
        let router = app.app();
        async move {
            let response = get_auth(router, "/api/v1/tickets", &token).await;
            assert_eq!(response.status(), StatusCode::OK);
            body_json(response).await["data"].as_array().unwrap().len()
        }
    };

    assert_eq!(count(app.token("u-pune", Role::NormalUser, "Pune")).await, 1);
    assert_eq!(count(app.token("u2-pune", Role::NormalUser, "Pune")).await, 0);
    assert_eq!(count(app.token("p-pune", Role::Planner, "Pune")).await, 1);
    assert_eq!(count(app.token("p-chennai", Role::Planner, "Chennai")).await, 1);
    assert_eq!(count(app.token("a-hq", Role::Admin, HQ)).await, 2);
}
