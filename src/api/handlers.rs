//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
};
use tracing::{debug, error, warn};

use crate::{
    services::SAMPLE_RATE,
    state::{AppState, Outcome, TimerId},
    view::{self, html, BoardView, CardView},
};
use super::{
    requests::{CreateTimerRequest, DurationRequest, NameRequest},
    responses::{ApiResponse, HealthResponse, StatusResponse},
};

fn board_view(state: &AppState) -> Result<BoardView, StatusCode> {
    state
        .board
        .snapshot()
        .map(|(revision, records)| view::render(revision, &records))
        .map_err(|e| {
            error!("Failed to read timer board: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// Turn the outcome of a timer action into a response
fn respond(
    state: &AppState,
    action: &str,
    id: TimerId,
    result: Result<Outcome, String>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let outcome = result.map_err(|e| {
        error!("Failed to {} timer {}: {}", action, id, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    match outcome {
        Outcome::Applied => {
            state.record_action(&format!("{} {}", action, id));
            Ok(Json(ApiResponse::applied(
                format!("Timer {}: {}", id, action),
                board_view(state)?,
            )))
        }
        Outcome::Ignored => Ok(Json(ApiResponse::ignored(
            format!("Timer {}: {} does not apply in its current state", id, action),
            board_view(state)?,
        ))),
        Outcome::NotFound => {
            warn!("{} requested for unknown timer {}", action, id);
            Err(StatusCode::NOT_FOUND)
        }
    }
}

/// Handle GET / - The timer page
pub async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, StatusCode> {
    let view = board_view(&state)?;
    Ok(Html(html::render_page(&view)))
}

/// Handle GET /cards - Card markup, tagged with the board revision
pub async fn cards_handler(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, StatusCode> {
    let view = board_view(&state)?;
    Ok((
        [
            ("x-board-revision", view.revision.to_string()),
            ("cache-control", "no-store".to_string()),
        ],
        Html(html::render_cards(&view)),
    ))
}

/// Handle GET /timers - All cards as JSON
pub async fn list_handler(State(state): State<Arc<AppState>>) -> Result<Json<BoardView>, StatusCode> {
    board_view(&state).map(Json)
}

/// Handle GET /timers/:id - One card as JSON
pub async fn timer_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<CardView>, StatusCode> {
    match state.board.get(id) {
        Ok(Some(record)) => Ok(Json(view::render_card(&record))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Failed to read timer {}: {}", id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /timers - Add a timer
pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    body: Option<Json<CreateTimerRequest>>,
) -> Result<(StatusCode, Json<ApiResponse>), StatusCode> {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let result = match request.default_minutes {
        Some(minutes) => state.board.create_timer(minutes.saturating_mul(60_000)),
        None => state.board.create_default_timer(),
    };

    match result {
        Ok(id) => {
            state.record_action(&format!("create {}", id));
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::applied(
                    format!("Timer {} created", id),
                    board_view(&state)?,
                )),
            ))
        }
        Err(e) => {
            error!("Failed to create timer: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle DELETE /timers/:id - Remove a timer
pub async fn remove_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(&state, "remove", id, state.board.remove(id))
}

/// Handle POST /timers/:id/start
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(&state, "start", id, state.board.start(id))
}

/// Handle POST /timers/:id/pause
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(&state, "pause", id, state.board.pause(id))
}

/// Handle POST /timers/:id/toggle - The start/pause button
pub async fn toggle_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(&state, "toggle", id, state.board.toggle(id))
}

/// Handle POST /timers/:id/reset - Back to the configured duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(&state, "reset", id, state.board.reset(id))
}

/// Handle POST /timers/:id/reset-default - Back to the creation duration
pub async fn reset_default_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(&state, "reset-default", id, state.board.reset_to_default(id))
}

/// Handle POST /timers/:id/acknowledge - Silence the alarm
pub async fn acknowledge_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(&state, "acknowledge", id, state.board.acknowledge_alarm(id))
}

/// Handle PUT /timers/:id/duration
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
    Json(request): Json<DurationRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let (hours, minutes, seconds) = request.fields();
    respond(
        &state,
        "set-duration",
        id,
        state.board.reconfigure_duration(id, hours, minutes, seconds),
    )
}

/// Handle PUT /timers/:id/name
pub async fn name_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TimerId>,
    Json(request): Json<NameRequest>,
) -> Result<Json<ApiResponse>, StatusCode> {
    respond(&state, "rename", id, state.board.rename(id, request.name))
}

/// Handle GET /alarm.wav - The alarm tone for the browser to play
pub async fn alarm_tone_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let wav = state.board.alarm().tone().to_wav(SAMPLE_RATE);
    (
        [
            (header::CONTENT_TYPE, "audio/wav"),
            (header::CACHE_CONTROL, "max-age=3600"),
        ],
        wav,
    )
}

/// Handle GET /status - Return current service status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let (_, records) = match state.board.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!("Failed to read timer board: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();
    debug!("Status requested: {} timers", records.len());

    Ok(Json(StatusResponse {
        timers: records.len(),
        running: records.iter().filter(|r| r.is_running()).count(),
        alarming: records.iter().filter(|r| r.is_alarming()).count(),
        alarm_output_ready: state.board.alarm().is_primed(),
        alarm_pulses: state.board.alarm().pulses_emitted(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
