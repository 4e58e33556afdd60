//! Presentation layer
//!
//! [`render`] projects timer records into a [`BoardView`], a plain value the
//! HTTP layer serves as JSON or turns into HTML with [`html`]. Nothing here
//! holds state of its own.

pub mod assets;
pub mod html;

use serde::{Deserialize, Serialize};

use crate::{
    state::{TimerId, TimerPhase, TimerRecord},
    utils::{duration::signed, format_ms, from_ms, Hms},
};

pub const START_LABEL: &str = "Start";
pub const PAUSE_LABEL: &str = "Pause";
pub const SILENCE_LABEL: &str = "Time is up - Silent alarm";

/// Everything a card shows for one timer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub id: TimerId,
    pub name: String,
    pub phase: TimerPhase,
    /// Remaining time as `HH:MM:SS`
    pub display: String,
    pub remaining_ms: u64,
    pub configured_duration_ms: u64,
    pub default_duration_ms: u64,
    /// Values of the hours/minutes/seconds fields
    pub duration: Hms,
    /// Width of the progress bar, 0 to 100
    pub progress_percent: f64,
    pub running: bool,
    pub inputs_disabled: bool,
    pub start_pause_label: String,
    pub start_pause_disabled: bool,
    pub reset_disabled: bool,
    /// Whether the silence-alarm control is shown
    pub alarm_visible: bool,
    pub alarm_pulses: u64,
}

/// All cards, in creation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    /// Changes whenever any record changes
    pub revision: u64,
    pub timers: Vec<CardView>,
}

pub fn render(revision: u64, records: &[TimerRecord]) -> BoardView {
    BoardView {
        revision,
        timers: records.iter().map(render_card).collect(),
    }
}

pub fn render_card(record: &TimerRecord) -> CardView {
    let running = record.is_running();
    let alarming = record.is_alarming();
    let remaining = record.remaining_ms();

    CardView {
        id: record.id(),
        name: record.name().to_string(),
        phase: record.phase(),
        display: format_ms(signed(remaining)),
        remaining_ms: remaining,
        configured_duration_ms: record.configured_duration_ms(),
        default_duration_ms: record.default_duration_ms(),
        duration: from_ms(signed(record.configured_duration_ms())),
        progress_percent: progress_percent(remaining, record.configured_duration_ms()),
        running,
        inputs_disabled: running,
        start_pause_label: if running { PAUSE_LABEL } else { START_LABEL }.to_string(),
        // An expired timer has to be acknowledged or reconfigured before it can run again
        start_pause_disabled: alarming || (!running && remaining == 0),
        reset_disabled: running,
        alarm_visible: alarming,
        alarm_pulses: record.alarm_pulses(),
    }
}

/// `remaining / configured` as a percentage in `[0, 100]`; 0 when nothing is configured
pub fn progress_percent(remaining_ms: u64, configured_ms: u64) -> f64 {
    if configured_ms == 0 {
        return 0.0;
    }
    (remaining_ms as f64 / configured_ms as f64 * 100.0).clamp(0.0, 100.0)
}
