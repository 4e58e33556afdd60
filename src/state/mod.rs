//! State management module
//! 
//! This module contains the timer records, the board that owns them and the
//! application state wrapped around the board.

pub mod app_state;
pub mod timer_board;
pub mod timer_record;

// Re-export main types
pub use app_state::AppState;
pub use timer_board::{BoardSettings, TimerBoard};
pub use timer_record::{Outcome, TickOutcome, TimerId, TimerPhase, TimerRecord};
