//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::view::BoardView;

/// API response structure for timer actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub board: BoardView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, board: BoardView) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            board,
        }
    }

    /// The action changed the timer
    pub fn applied(message: String, board: BoardView) -> Self {
        Self::new("applied".to_string(), message, board)
    }

    /// The timer was not in a state the action applies to
    pub fn ignored(message: String, board: BoardView) -> Self {
        Self::new("ignored".to_string(), message, board)
    }
}

/// Service status with timer counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timers: usize,
    pub running: usize,
    pub alarming: usize,
    pub alarm_output_ready: bool,
    pub alarm_pulses: u64,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
