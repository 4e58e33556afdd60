//! Utility functions module
//! 
//! This module contains utility functions used throughout the application.

pub mod duration;
pub mod signals;

// Re-export main functions
pub use duration::{format_ms, from_ms, parse_field, to_ms, Hms};
pub use signals::shutdown_signal;
