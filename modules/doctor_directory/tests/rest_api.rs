//! REST layer exercised through the real routes on an in-memory database.

mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Local};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use doctor_directory::api::rest::routes::register_routes;
use doctor_directory::infra::accounts::LocalAccounts;

use common::{create_seeded_db, service_on};

async fn app() -> Router {
    let db = create_seeded_db().await;
    let svc = service_on(&db, Arc::new(LocalAccounts::new(db.clone())));
    register_routes(Router::new(), svc)
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let ct = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, ct, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn search_with_filters_and_alias() {
    let app = app().await;

    let (status, _, body) = send(&app, get("/doctors?region=north&sort=fee-high")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["sort"], "fee-high");
    assert_eq!(body["doctors"][0]["name"], "Dr. Robert Taylor");

    let (_, _, body) = send(&app, get("/doctors?disease=cardio&region=all")).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["doctors"][0]["clinic_name"], "Heart Care Clinic");

    // Search text is not trimmed, same as the in-process query.
    let (_, _, body) = send(&app, get("/doctors?q=%20cardio")).await;
    assert_eq!(body["total"], 0);

    let (_, _, body) = send(&app, get("/doctors?sort=whatever")).await;
    assert_eq!(body["sort"], "rating");
    assert_eq!(body["total"], 6);
}

#[tokio::test]
async fn get_doctor_and_not_found_problem() {
    let app = app().await;
    let (_, _, list) = send(&app, get("/doctors?q=chen")).await;
    let id = list["doctors"][0]["id"].as_str().unwrap().to_string();

    let (status, _, body) = send(&app, get(&format!("/doctors/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["specialty"], "Dermatology");

    let missing = Uuid::new_v4();
    let (status, ct, body) = send(&app, get(&format!("/doctors/{missing}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(ct.as_deref(), Some("application/problem+json"));
    assert_eq!(body["code"], "doctor_directory.doctor.not_found.v1");
    assert_eq!(body["instance"], format!("/doctors/{missing}"));
}

#[tokio::test]
async fn register_then_conflict_then_validation() {
    let app = app().await;
    let form = json!({
        "name": "Ana Ruiz",
        "email": "ana@clinic.test",
        "specialty": "Endocrinology",
        "experience": "9",
        "clinic_name": "Hormone Health",
        "region": "pune",
        "consultation_fee": 65,
        "password": "correct-horse",
        "confirm_password": "correct-horse"
    });

    let (status, _, body) = send(&app, post("/doctors/register", form.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "Dr. Ana Ruiz");
    assert_eq!(body["consultation_fee"], 65);
    assert_eq!(body["rating"], 4.0);

    let (status, _, body) = send(&app, post("/doctors/register", form.clone())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "doctor_directory.account.email_conflict.v1");

    let mut short = form;
    short["email"] = json!("other@clinic.test");
    short["password"] = json!("short");
    short["confirm_password"] = json!("short");
    let (status, _, body) = send(&app, post("/doctors/register", short)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Password must be at least 8 characters");
    assert_eq!(body["errors"][0]["pointer"], "/password");
}

#[tokio::test]
async fn book_and_fetch_appointment() {
    let app = app().await;
    let (_, _, list) = send(&app, get("/doctors?q=pediatrics")).await;
    let doctor_id = list["doctors"][0]["id"].as_str().unwrap().to_string();
    let date = (Local::now().date_naive() + Duration::days(2)).to_string();

    let (status, _, body) = send(
        &app,
        post(
            &format!("/doctors/{doctor_id}/appointments"),
            json!({
                "patient_id": Uuid::new_v4(),
                "appointment_date": date,
                "appointment_time": "10:30 AM",
                "reason": "Vaccination"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["appointment_time"], "10:30");
    assert_eq!(body["time_label"], "10:30 AM");

    let id = body["id"].as_str().unwrap().to_string();
    let (status, _, fetched) = send(&app, get(&format!("/appointments/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["reason"], "Vaccination");

    let (status, _, body) = send(
        &app,
        post(
            &format!("/doctors/{doctor_id}/appointments"),
            json!({ "patient_id": Uuid::new_v4(), "appointment_date": date }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Please select a time slot");
    assert_eq!(body["errors"][0]["pointer"], "/appointment_time");
}

#[tokio::test]
async fn time_slots_are_listed() {
    let app = app().await;
    let (status, _, body) = send(&app, get("/time-slots")).await;
    assert_eq!(status, StatusCode::OK);
    let slots = body.as_array().unwrap();
    assert_eq!(slots.len(), 13);
    assert_eq!(slots[0], json!({ "value": "09:00", "label": "09:00 AM" }));
}
