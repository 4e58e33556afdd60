//! HTTP API module
//! 
//! This module contains the page, the JSON endpoints that carry the card
//! controls, and their request/response structures.

pub mod handlers;
pub mod requests;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/cards", get(cards_handler))
        .route("/timers", get(list_handler).post(create_handler))
        .route("/timers/:id", get(timer_handler).delete(remove_handler))
        .route("/timers/:id/start", post(start_handler))
        .route("/timers/:id/pause", post(pause_handler))
        .route("/timers/:id/toggle", post(toggle_handler))
        .route("/timers/:id/reset", post(reset_handler))
        .route("/timers/:id/reset-default", post(reset_default_handler))
        .route("/timers/:id/acknowledge", post(acknowledge_handler))
        .route("/timers/:id/duration", put(duration_handler))
        .route("/timers/:id/name", put(name_handler))
        .route("/alarm.wav", get(alarm_tone_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
