use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use multi_timer::{
    create_router,
    services::AlarmGenerator,
    state::{AppState, BoardSettings, TimerBoard},
};

fn app() -> (Router, Arc<TimerBoard>) {
    let board = TimerBoard::new(BoardSettings::default(), AlarmGenerator::with_factory(|| None));
    let state = Arc::new(AppState::new(Arc::clone(&board), 0, "127.0.0.1".to_string()));
    (create_router(state), board)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test(start_paused = true)]
async fn health_reports_ok() {
    let (app, _) = app();
    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test(start_paused = true)]
async fn add_timer_with_and_without_duration() {
    let (app, _) = app();

    let (status, body) = send_json(&app, Method::POST, "/timers", Some(json!({"default_minutes": 3}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "applied");
    assert_eq!(body["board"]["timers"][0]["default_duration_ms"], 180_000);
    assert_eq!(body["board"]["timers"][0]["display"], "00:03:00");

    let (status, body) = send_json(&app, Method::POST, "/timers", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["board"]["timers"][1]["id"], 2);
    assert_eq!(body["board"]["timers"][1]["default_duration_ms"], 120_000);
}

#[tokio::test(start_paused = true)]
async fn countdown_alarm_and_acknowledge() {
    let (app, _) = app();
    send_json(&app, Method::POST, "/timers", Some(json!({"default_minutes": 1}))).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/timers/1/duration",
        Some(json!({"hours": "0", "minutes": "", "seconds": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["board"]["timers"][0]["configured_duration_ms"], 1_000);

    let (_, body) = send_json(&app, Method::POST, "/timers/1/toggle", None).await;
    assert_eq!(body["status"], "applied");
    assert_eq!(body["board"]["timers"][0]["phase"], "running");
    assert_eq!(body["board"]["timers"][0]["start_pause_label"], "Pause");

    tokio::time::sleep(Duration::from_millis(1_100)).await;

    let (_, card) = send_json(&app, Method::GET, "/timers/1", None).await;
    assert_eq!(card["phase"], "alarming");
    assert_eq!(card["display"], "00:00:00");
    assert_eq!(card["alarm_visible"], true);
    assert_eq!(card["start_pause_disabled"], true);
    assert_eq!(card["alarm_pulses"], 1);

    let (_, body) = send_json(&app, Method::POST, "/timers/1/start", None).await;
    assert_eq!(body["status"], "ignored");

    let (_, body) = send_json(&app, Method::POST, "/timers/1/acknowledge", None).await;
    assert_eq!(body["status"], "applied");
    let card = &body["board"]["timers"][0];
    assert_eq!(card["phase"], "idle");
    assert_eq!(card["remaining_ms"], 1_000);
    assert_eq!(card["alarm_visible"], false);
}

#[tokio::test(start_paused = true)]
async fn reset_default_restores_creation_duration() {
    let (app, _) = app();
    send_json(&app, Method::POST, "/timers", Some(json!({"default_minutes": 5}))).await;
    send_json(
        &app,
        Method::PUT,
        "/timers/1/duration",
        Some(json!({"hours": 1, "minutes": 0, "seconds": 0})),
    )
    .await;

    let (_, body) = send_json(&app, Method::POST, "/timers/1/reset-default", None).await;
    let card = &body["board"]["timers"][0];
    assert_eq!(card["configured_duration_ms"], 300_000);
    assert_eq!(card["remaining_ms"], 300_000);
    assert_eq!(card["duration"]["minutes"], 5);
}

#[tokio::test(start_paused = true)]
async fn duration_changes_are_ignored_while_running() {
    let (app, _) = app();
    send_json(&app, Method::POST, "/timers", None).await;
    send_json(&app, Method::POST, "/timers/1/start", None).await;

    let (status, body) = send_json(
        &app,
        Method::PUT,
        "/timers/1/duration",
        Some(json!({"minutes": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ignored");
    assert_eq!(body["board"]["timers"][0]["configured_duration_ms"], 120_000);
}

#[tokio::test(start_paused = true)]
async fn garbage_duration_becomes_zero_and_cannot_start() {
    let (app, _) = app();
    send_json(&app, Method::POST, "/timers", None).await;
    send_json(
        &app,
        Method::PUT,
        "/timers/1/duration",
        Some(json!({"hours": "abc", "minutes": null, "seconds": "x"})),
    )
    .await;

    let (_, body) = send_json(&app, Method::POST, "/timers/1/start", None).await;
    assert_eq!(body["status"], "ignored");
    let card = &body["board"]["timers"][0];
    assert_eq!(card["phase"], "expired");
    assert_eq!(card["progress_percent"], 0.0);
}

#[tokio::test(start_paused = true)]
async fn unknown_timers_are_not_found() {
    let (app, _) = app();
    let (status, _) = send(&app, Method::POST, "/timers/9/start", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, "/timers/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, "/timers/9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn removing_running_timer_cancels_its_callbacks() {
    let (app, board) = app();
    send_json(&app, Method::POST, "/timers", None).await;
    send_json(&app, Method::POST, "/timers/1/start", None).await;
    assert_eq!(board.active_callbacks().unwrap(), (1, 0));

    let (status, body) = send_json(&app, Method::DELETE, "/timers/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["board"]["timers"].as_array().unwrap().len(), 0);
    assert_eq!(board.active_callbacks().unwrap(), (0, 0));

    tokio::time::sleep(Duration::from_secs(3)).await;
    let (status, _) = send(&app, Method::GET, "/timers/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn names_are_stored_and_escaped_in_cards() {
    let (app, _) = app();
    send_json(&app, Method::POST, "/timers", None).await;
    let (_, body) = send_json(&app, Method::PUT, "/timers/1/name", Some(json!({"name": "<tea>"}))).await;
    assert_eq!(body["board"]["timers"][0]["name"], "<tea>");

    let (status, html) = send(&app, Method::GET, "/cards", None).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(html).unwrap();
    assert!(html.contains("&lt;tea&gt;"));
    assert!(!html.contains("<tea>"));
}

#[tokio::test(start_paused = true)]
async fn cards_carry_board_revision() {
    let (app, _) = app();
    send_json(&app, Method::POST, "/timers", None).await;

    let request = Request::builder().uri("/cards").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let first = response.headers()["x-board-revision"].to_str().unwrap().to_string();

    send_json(&app, Method::POST, "/timers/1/reset", None).await;
    let request = Request::builder().uri("/cards").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let second = response.headers()["x-board-revision"].to_str().unwrap().to_string();

    assert_ne!(first, second);
}

#[tokio::test(start_paused = true)]
async fn page_and_tone_are_served() {
    let (app, _) = app();
    send_json(&app, Method::POST, "/timers", None).await;

    let (status, page) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let page = String::from_utf8(page).unwrap();
    assert!(page.contains("<!DOCTYPE html>"));
    assert!(page.contains(r#"data-id="1""#));

    let request = Request::builder().uri("/alarm.wav").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.headers()[header::CONTENT_TYPE], "audio/wav");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[0..4], b"RIFF");
}

#[tokio::test(start_paused = true)]
async fn status_counts_timers() {
    let (app, _) = app();
    send_json(&app, Method::POST, "/timers", None).await;
    send_json(&app, Method::POST, "/timers", None).await;
    send_json(&app, Method::POST, "/timers/2/start", None).await;

    let (status, body) = send_json(&app, Method::GET, "/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timers"], 2);
    assert_eq!(body["running"], 1);
    assert_eq!(body["alarming"], 0);
    assert_eq!(body["alarm_output_ready"], true);
    assert_eq!(body["last_action"], "start 2");
}
