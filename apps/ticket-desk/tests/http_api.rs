//! End-to-end tests of the ticket desk HTTP API.
//!
//! Every test builds its own store, so tests never see each other's tickets.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use axum_test::TestServer;
use desk_web::CORRELATION_ID_HEADER;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use ticket_desk::{
    handlers::{AppState, ListTicketsResponse},
    new_store,
    router::ticket_router,
    Ticket, TicketId, TicketStatus, TicketStore,
};
use tower::ServiceExt;

fn app_with(store: Arc<TicketStore>, reply_timeout: Duration) -> Router {
    ticket_router(AppState::new(store, reply_timeout))
}

fn app() -> Router {
    app_with(Arc::new(new_store()), Duration::from_secs(5))
}

fn server() -> TestServer {
    TestServer::new(app()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_raw(body: &'static str, content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri("/tickets");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn fresh_service_lists_no_tickets() {
    let server = server();

    let response = server.get("/tickets").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "tickets": [] }));
}

#[tokio::test]
async fn create_returns_201_with_first_ticket() {
    let server = server();

    let response = server
        .post("/tickets")
        .json(&json!({ "subject": "Broken pump", "description": "Pump #4 stopped" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.assert_json(&json!({
        "id": 1,
        "subject": "Broken pump",
        "description": "Pump #4 stopped",
        "status": "Open",
    }));
}

#[tokio::test]
async fn created_tickets_are_listed_in_order() {
    let server = server();

    for (subject, description) in [("A", "first"), ("B", "second"), ("C", "third")] {
        server
            .post("/tickets")
            .json(&json!({ "subject": subject, "description": description }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let list: ListTicketsResponse = server.get("/tickets").await.json();
    let summary: Vec<(u64, &str)> = list
        .tickets
        .iter()
        .map(|t| (t.id.get(), t.subject.as_str()))
        .collect();
    assert_eq!(summary, vec![(1, "A"), (2, "B"), (3, "C")]);
    assert!(list.tickets.iter().all(|t| t.status == TicketStatus::Open));
}

#[tokio::test]
async fn created_ticket_matches_listed_ticket() {
    let server = server();

    let created: Ticket = server
        .post("/tickets")
        .json(&json!({ "subject": "  keep  spacing ", "description": "line 1\nline 2" }))
        .await
        .json();

    let list: ListTicketsResponse = server.get("/tickets").await.json();
    assert_eq!(list.tickets, vec![created.clone()]);
    assert_eq!(created.subject, "  keep  spacing ");
}

#[tokio::test]
async fn missing_field_is_400_and_stores_nothing() {
    let server = server();

    let response = server
        .post("/tickets")
        .json(&json!({ "subject": "No description" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error: Value = response.json();
    assert_eq!(error["code"], "BAD_REQUEST");
    assert_eq!(error["message"], "'description' is required");

    let list: ListTicketsResponse = server.get("/tickets").await.json();
    assert!(list.tickets.is_empty());
}

#[tokio::test]
async fn empty_subject_is_accepted_verbatim() {
    let server = server();

    let response = server
        .post("/tickets")
        .json(&json!({ "subject": "", "description": "Pump #4 stopped" }))
        .await;

    response.assert_status(StatusCode::CREATED);
    response.assert_json(&json!({
        "id": 1,
        "subject": "",
        "description": "Pump #4 stopped",
        "status": "Open",
    }));

    let created: Ticket = server
        .post("/tickets")
        .json(&json!({ "subject": "   ", "description": "" }))
        .await
        .json();
    assert_eq!(created.id, TicketId::new(2));
    assert_eq!(created.subject, "   ");
}

#[tokio::test]
async fn rejected_create_does_not_consume_an_id() {
    let server = server();

    server
        .post("/tickets")
        .json(&json!({ "description": "no subject" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let created: Ticket = server
        .post("/tickets")
        .json(&json!({ "subject": "Real", "description": "after a rejection" }))
        .await
        .json();
    assert_eq!(created.id, TicketId::new(1));
}

#[tokio::test]
async fn wrongly_typed_field_is_400() {
    let server = server();

    server
        .post("/tickets")
        .json(&json!({ "subject": 42, "description": "numeric subject" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/tickets")
        .json(&json!(["not", "an", "object"]))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_bodies_are_400_not_500() {
    let cases = [
        ("{not json", Some("application/json")),
        ("", Some("application/json")),
        ("null", Some("application/json")),
        (r#"{"subject":"s","description":"d"}"#, None),
        (r#"{"subject":"s","description":"d"}"#, Some("text/plain")),
    ];

    for (body, content_type) in cases {
        let store = Arc::new(new_store());
        let response = app_with(Arc::clone(&store), Duration::from_secs(5))
            .oneshot(post_raw(body, content_type))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "body {body:?} with content type {content_type:?}"
        );
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
        assert_eq!(store.state(|s| s.count()).await, 0);
    }
}

/// Fires `requests` creates at once and checks every caller got a 201 with
/// its own ticket, and that the store holds exactly ids `1..=requests`.
async fn create_concurrently(requests: u64) {
    let store = Arc::new(new_store());
    let app = app_with(Arc::clone(&store), Duration::from_secs(5));

    let handles: Vec<_> = (0..requests)
        .map(|n| {
            let app = app.clone();
            tokio::spawn(async move {
                let request = Request::builder()
                    .method(Method::POST)
                    .uri("/tickets")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "subject": format!("ticket {n}"), "description": "load" })
                            .to_string(),
                    ))
                    .unwrap();
                let response = app.oneshot(request).await.unwrap();
                assert_eq!(response.status(), StatusCode::CREATED, "request {n}");
                let ticket: Ticket =
                    serde_json::from_value(body_json(response).await).unwrap();
                (n, ticket)
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let (n, ticket) = handle.await.unwrap();
        // Each caller gets its own ticket back, not a neighbour's
        assert_eq!(ticket.subject, format!("ticket {n}"));
        assert!(ids.insert(ticket.id.get()), "duplicate id {}", ticket.id);
    }

    let expected: HashSet<u64> = (1..=requests).collect();
    assert_eq!(ids, expected);

    let listed: Vec<u64> = store
        .state(|s| s.tickets.iter().map(|t| t.id.get()).collect())
        .await;
    assert_eq!(listed, (1..=requests).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_distinct_sequential_ids() {
    create_concurrently(50).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn burst_of_creates_all_get_201() {
    create_concurrently(500).await;
}

#[tokio::test]
async fn search_route_is_not_served() {
    let server = server();

    server
        .get("/tickets/search")
        .add_query_param("q", "pump")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_method_is_405() {
    let server = server();

    server
        .delete("/tickets")
        .await
        .assert_status(StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn health_reports_ok() {
    let server = server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("ok");
}

#[tokio::test]
async fn responses_allow_any_origin() {
    let request = Request::builder()
        .uri("/tickets")
        .header(header::ORIGIN, "http://frontend.example")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .expect("CORS header should be present"),
        "*"
    );
}

#[tokio::test]
async fn cors_preflight_is_answered() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/tickets")
        .header(header::ORIGIN, "http://frontend.example")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .expect("CORS header should be present"),
        "*"
    );
}

#[tokio::test]
async fn correlation_id_is_echoed() {
    let correlation_id = uuid::Uuid::new_v4().to_string();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/tickets")
        .header(header::CONTENT_TYPE, "application/json")
        .header(CORRELATION_ID_HEADER, &correlation_id)
        .body(Body::from(r#"{"subject":"s","description":"d"}"#))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers().get(CORRELATION_ID_HEADER).unwrap(),
        correlation_id.as_str()
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn reused_correlation_id_does_not_mix_up_outcomes() {
    let app = app();
    let shared = uuid::Uuid::new_v4().to_string();

    let handles: Vec<_> = (1..=8_u64)
        .map(|n| {
            let app = app.clone();
            let shared = shared.clone();
            tokio::spawn(async move {
                let request = Request::builder()
                    .method(Method::POST)
                    .uri("/tickets")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(CORRELATION_ID_HEADER, &shared)
                    .body(Body::from(
                        json!({ "subject": format!("s{n}"), "description": "d" }).to_string(),
                    ))
                    .unwrap();
                let response = app.oneshot(request).await.unwrap();
                assert_eq!(response.status(), StatusCode::CREATED);
                let ticket: Ticket =
                    serde_json::from_value(body_json(response).await).unwrap();
                (n, ticket)
            })
        })
        .collect();

    for handle in handles {
        let (n, ticket) = handle.await.unwrap();
        assert_eq!(ticket.subject, format!("s{n}"));
    }
}

#[tokio::test]
async fn separate_services_do_not_share_tickets() {
    let first = server();
    let second = server();

    first
        .post("/tickets")
        .json(&json!({ "subject": "only here", "description": "d" }))
        .await
        .assert_status(StatusCode::CREATED);

    let list: ListTicketsResponse = second.get("/tickets").await.json();
    assert!(list.tickets.is_empty());

    let created: Ticket = second
        .post("/tickets")
        .json(&json!({ "subject": "first in second", "description": "d" }))
        .await
        .json();
    assert_eq!(created.id, TicketId::new(1));
}
