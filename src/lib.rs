//! Multi Timer - A browser-served set of independent countdown timers
//! 
//! This library provides the timer records and their countdown/alarm state
//! machine, the board that owns them and schedules their callbacks, the
//! alarm tone, and the HTTP surface that renders and drives the timers.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerBoard};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
