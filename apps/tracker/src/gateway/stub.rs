//! In-process stand-in for the Applications API, used to exercise `HttpGateway`
//! over real HTTP.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};

use super::*;
use crate::models::ApplicationForm;

const DUPLICATE_EMAIL: &str = "taken@example.com";

#[derive(Debug, Default)]
struct Received {
    email_queries: Vec<Option<String>>,
    patches: Vec<(i64, Value)>,
    parts: Vec<(String, Option<String>, Vec<u8>)>,
}

#[derive(Clone)]
struct StubState {
    received: Arc<Mutex<Received>>,
    total_body: &'static str,
}

fn sample(id: i64, email: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": "Asha Rao",
        "emailId": email,
        "mobileNumber": "9876543210",
        "experienceRange": "3-5 years",
        "jobRole": "Backend Engineer",
        "jobLink": "https://jobs.example.com/42",
        "status": status,
        "applicationTimestamp": "2024-05-01T09:30:00",
        "resumeFilename": "a1b2_resume.pdf"
    })
}

async fn list(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let email = params.get("email").cloned();
    state.received.lock().unwrap().email_queries.push(email.clone());
    match email {
        Some(e) if e == "nobody@example.com" => Json(json!([])),
        Some(e) if e == "malformed@example.com" => Json(json!({ "oops": 1 })),
        Some(e) => Json(json!([sample(1001, &e, "Applied")])),
        None => Json(json!([
            sample(1001, "asha@example.com", "Interview"),
            sample(1002, "ben@example.com", "Offer")
        ])),
    }
}

async fn get_one(Path(id): Path<i64>) -> Response {
    if id == 1001 {
        Json(sample(1001, "asha@example.com", "Interview")).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

async fn total(State(state): State<StubState>) -> &'static str {
    state.total_body
}

async fn by_status() -> Json<Value> {
    Json(json!({ "Selected": 3, "Offer": 2, "Rejected": 1 }))
}

async fn patch_status(
    State(state): State<StubState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> StatusCode {
    state.received.lock().unwrap().patches.push((id, body));
    if id == 404 {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

async fn create(State(state): State<StubState>, mut multipart: Multipart) -> Response {
    let mut application = Value::Null;
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        if name == "application" {
            application = serde_json::from_slice(&data).unwrap();
        }
        state
            .received
            .lock()
            .unwrap()
            .parts
            .push((name, content_type, data));
    }

    let email = application["emailId"].as_str().unwrap_or_default().to_string();
    if email == DUPLICATE_EMAIL {
        return StatusCode::CONFLICT.into_response();
    }
    if application["name"].as_str().unwrap_or_default().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "name": "Candidate name is required.",
                "general": "Please correct the errors in the form before submitting."
            })),
        )
            .into_response();
    }
    if email == "boom@example.com" {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    (StatusCode::CREATED, Json(sample(2001, &email, "Applied"))).into_response()
}

struct Stub {
    gateway: HttpGateway,
    received: Arc<Mutex<Received>>,
}

async fn spawn_stub(total_body: &'static str) -> Stub {
    let received = Arc::new(Mutex::new(Received::default()));
    let state = StubState {
        received: received.clone(),
        total_body,
    };

    let app = Router::new()
        .route("/api/applications", get(list).post(create))
        .route("/api/applications/statistics/total", get(total))
        .route("/api/applications/statistics/byStatus", get(by_status))
        .route("/api/applications/:id", get(get_one))
        .route("/api/applications/:id/status", patch(patch_status))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let gateway = HttpGateway::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap();
    Stub { gateway, received }
}

fn valid_form(email: &str) -> ApplicationForm {
    ApplicationForm {
        name: "Asha Rao".into(),
        email_id: email.into(),
        mobile_number: "9876543210".into(),
        experience_range: "3-5 years".into(),
        job_role: "Backend Engineer".into(),
        job_link: "https://jobs.example.com/42".into(),
        notes: String::new(),
        resume: Some(ResumeFile::new("cv.pdf", b"%PDF-1.4".to_vec())),
    }
}

#[tokio::test]
async fn test_list_unfiltered_and_filtered() {
    let stub = spawn_stub("2").await;

    let all = stub.gateway.list_applications(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[1].known_status(), Some(Status::Offer));

    let mine = stub
        .gateway
        .list_applications(Some("a+b@example.com"))
        .await
        .unwrap();
    assert_eq!(mine[0].email_id.as_deref(), Some("a+b@example.com"));

    let none = stub
        .gateway
        .list_applications(Some("nobody@example.com"))
        .await
        .unwrap();
    assert!(none.is_empty());

    let queries = &stub.received.lock().unwrap().email_queries;
    assert_eq!(
        queries,
        &vec![
            None,
            Some("a+b@example.com".to_string()),
            Some("nobody@example.com".to_string())
        ]
    );
}

#[tokio::test]
async fn test_list_with_wrong_shape_is_a_decode_error() {
    let stub = spawn_stub("0").await;
    let err = stub
        .gateway
        .list_applications(Some("malformed@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn test_statistics_endpoints() {
    let stub = spawn_stub("10").await;
    assert_eq!(stub.gateway.get_total_count().await.unwrap(), 10);

    let counts = stub.gateway.get_status_counts().await.unwrap();
    assert_eq!(counts.selected(), 5);
    assert_eq!(counts.rejected(), 1);
}

#[tokio::test]
async fn test_non_numeric_total_reads_as_zero() {
    let stub = spawn_stub("").await;
    assert_eq!(stub.gateway.get_total_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_get_application_maps_404_to_none() {
    let stub = spawn_stub("0").await;
    assert!(stub.gateway.get_application(1001).await.unwrap().is_some());
    assert!(stub.gateway.get_application(9).await.unwrap().is_none());
}

#[tokio::test]
async fn test_update_status_sends_json_body() {
    let stub = spawn_stub("0").await;
    stub.gateway.update_status(1001, Status::Offer).await.unwrap();

    let err = stub
        .gateway
        .update_status(404, Status::Rejected)
        .await
        .unwrap_err();
    assert!(matches!(err, GatewayError::Server { status: 404, .. }));
    assert!(!matches!(err, GatewayError::Network(_)));

    let patches = &stub.received.lock().unwrap().patches;
    assert_eq!(patches[0], (1001, json!({ "status": "Offer" })));
}

#[tokio::test]
async fn test_submit_sends_two_parts_and_maps_statuses() {
    let stub = spawn_stub("0").await;

    let form = valid_form("new@example.com");
    let resume = form.resume.clone().unwrap();
    let outcome = stub
        .gateway
        .submit_application(&form.payload(), &resume)
        .await
        .unwrap();
    match outcome {
        SubmitOutcome::Created(Some(app)) => assert_eq!(app.id, 2001),
        other => panic!("expected Created, got {other:?}"),
    }

    {
        let received = stub.received.lock().unwrap();
        let (name, content_type, _) = &received.parts[0];
        assert_eq!(name, "application");
        assert_eq!(content_type.as_deref(), Some("application/json"));
        let (name, content_type, data) = &received.parts[1];
        assert_eq!(name, "resume");
        assert_eq!(content_type.as_deref(), Some("application/pdf"));
        assert_eq!(data.as_slice(), b"%PDF-1.4");
    }

    let dupe = valid_form(DUPLICATE_EMAIL);
    let outcome = stub
        .gateway
        .submit_application(&dupe.payload(), &resume)
        .await
        .unwrap();
    assert_eq!(outcome, SubmitOutcome::Conflict);

    let mut nameless = valid_form("x@example.com");
    nameless.name.clear();
    match stub
        .gateway
        .submit_application(&nameless.payload(), &resume)
        .await
        .unwrap()
    {
        SubmitOutcome::Validation(fields) => {
            assert_eq!(fields["name"], "Candidate name is required.");
            assert!(fields.contains_key("general"));
        }
        other => panic!("expected Validation, got {other:?}"),
    }

    let failing = valid_form("boom@example.com");
    let outcome = stub
        .gateway
        .submit_application(&failing.payload(), &resume)
        .await
        .unwrap();
    assert_eq!(outcome, SubmitOutcome::Failed { status: 500 });
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let gateway = HttpGateway::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();
    let err = gateway.list_applications(None).await.unwrap_err();
    assert!(matches!(err, GatewayError::Network(_)), "got {err:?}");
}
