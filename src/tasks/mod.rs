//! Background tasks module
//! 
//! This module contains the periodic callbacks owned by timer records.

pub mod alarm_pulse;
pub mod countdown;

// Re-export main functions
pub use alarm_pulse::spawn_alarm_task;
pub use countdown::spawn_tick_task;
