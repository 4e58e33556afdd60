//! Timer record and its countdown/alarm state machine
//!
//! ```text
//!            start                  remaining hits 0
//!   Idle ───────────► Running ───────────────────────► Alarming
//!    ▲                │    ▲                               │
//!    │          pause │    │ start                         │ acknowledge
//!    │                ▼    │                               │ reset
//!    │               Paused                                │
//!    └─────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition takes the current time as an argument, so the record
//! itself never reads a clock. Scheduling the callbacks a state calls for is
//! the board's job; the record only says whether it is running or alarming.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::utils::to_ms;

/// Identifier of a timer record, unique per board
pub type TimerId = u64;

/// Observable state of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
    Alarming,
    /// Remaining is zero without an alarm, e.g. after configuring `00:00:00`
    Expired,
}

impl TimerPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Alarming => "alarming",
            TimerPhase::Expired => "expired",
        }
    }
}

/// Result of a state machine operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The transition happened
    Applied,
    /// The record was not in a valid source state; nothing changed
    Ignored,
    /// No record with that id
    NotFound,
}

impl Outcome {
    pub fn from_applied(applied: bool) -> Self {
        if applied { Outcome::Applied } else { Outcome::Ignored }
    }

    pub fn is_applied(self) -> bool {
        self == Outcome::Applied
    }
}

/// What a tick did to a running record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Still counting down
    Continue,
    /// Remaining reached zero; the record is now alarming
    Expired,
    /// The record was not running
    Ignored,
}

/// State of one user-created timer
#[derive(Debug, Clone)]
pub struct TimerRecord {
    id: TimerId,
    name: String,
    default_duration_ms: u64,
    configured_duration_ms: u64,
    remaining_ms: u64,
    running: bool,
    alarming: bool,
    last_tick: Option<Instant>,
    alarm_pulses: u64,
}

impl TimerRecord {
    /// Create an idle timer armed with `default_duration_ms`
    pub fn new(id: TimerId, default_duration_ms: u64) -> Self {
        Self {
            id,
            name: String::new(),
            default_duration_ms,
            configured_duration_ms: default_duration_ms,
            remaining_ms: default_duration_ms,
            running: false,
            alarming: false,
            last_tick: None,
            alarm_pulses: 0,
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_duration_ms(&self) -> u64 {
        self.default_duration_ms
    }

    pub fn configured_duration_ms(&self) -> u64 {
        self.configured_duration_ms
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_alarming(&self) -> bool {
        self.alarming
    }

    /// Pulses emitted since the current alarm started
    pub fn alarm_pulses(&self) -> u64 {
        self.alarm_pulses
    }

    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.alarming {
            TimerPhase::Alarming
        } else if self.remaining_ms == 0 {
            TimerPhase::Expired
        } else if self.remaining_ms < self.configured_duration_ms {
            TimerPhase::Paused
        } else {
            TimerPhase::Idle
        }
    }

    /// Begin counting down from the current remaining time
    pub fn start(&mut self, now: Instant) -> bool {
        if self.running || self.alarming || self.remaining_ms == 0 {
            return false;
        }
        self.running = true;
        self.last_tick = Some(now);
        true
    }

    /// Account for the time elapsed since the last tick
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }
        self.consume_elapsed(now);
        if self.remaining_ms == 0 {
            self.running = false;
            self.last_tick = None;
            self.begin_alarm();
            TickOutcome::Expired
        } else {
            TickOutcome::Continue
        }
    }

    /// Stop counting down, keeping what is left
    pub fn pause(&mut self, now: Instant) -> bool {
        if !self.running {
            return false;
        }
        self.consume_elapsed(now);
        self.running = false;
        self.last_tick = None;
        true
    }

    /// The start/pause button: pause when running, start otherwise
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.running {
            self.pause(now)
        } else {
            self.start(now)
        }
    }

    /// Stop everything and rewind to the configured duration
    pub fn reset(&mut self) {
        self.halt();
        self.remaining_ms = self.configured_duration_ms;
    }

    /// Stop everything and restore the duration the timer was created with
    pub fn reset_to_default(&mut self) {
        self.halt();
        self.configured_duration_ms = self.default_duration_ms;
        self.remaining_ms = self.default_duration_ms;
    }

    /// Silence the alarm and re-arm at the configured duration
    pub fn acknowledge_alarm(&mut self) -> bool {
        if !self.alarming {
            return false;
        }
        self.end_alarm();
        self.remaining_ms = self.configured_duration_ms;
        true
    }

    /// Set a new configured duration; rejected while running
    pub fn reconfigure_duration(&mut self, hours: i64, minutes: i64, seconds: i64) -> bool {
        if self.running {
            return false;
        }
        self.end_alarm();
        let ms = to_ms(hours, minutes, seconds);
        self.configured_duration_ms = ms;
        self.remaining_ms = ms;
        true
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Count one alarm pulse; false when the alarm is no longer active
    pub fn record_pulse(&mut self) -> bool {
        if !self.alarming {
            return false;
        }
        self.alarm_pulses += 1;
        true
    }

    fn consume_elapsed(&mut self, now: Instant) {
        let elapsed = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
        // Only advance by whole milliseconds so fractions carry into the next tick
        if let Some(last) = self.last_tick.as_mut() {
            *last += Duration::from_millis(elapsed_ms);
        }
    }

    fn begin_alarm(&mut self) {
        self.alarming = true;
        self.alarm_pulses = 0;
    }

    fn end_alarm(&mut self) {
        self.alarming = false;
        self.alarm_pulses = 0;
    }

    fn halt(&mut self) {
        self.running = false;
        self.last_tick = None;
        self.end_alarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: u64 = 60_000;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn new_record_is_idle_at_default() {
        let record = TimerRecord::new(1, MINUTE);
        assert_eq!(record.phase(), TimerPhase::Idle);
        assert_eq!(record.configured_duration_ms(), MINUTE);
        assert_eq!(record.remaining_ms(), MINUTE);
        assert_eq!(record.name(), "");
    }

    #[test]
    fn start_with_nothing_remaining_is_noop() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, MINUTE);
        assert!(record.reconfigure_duration(0, 0, 0));
        assert_eq!(record.phase(), TimerPhase::Expired);

        assert!(!record.start(t0));
        assert!(!record.is_running());
        assert_eq!(record.remaining_ms(), 0);
    }

    #[test]
    fn start_twice_is_noop() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, MINUTE);
        assert!(record.start(t0));
        assert!(!record.start(t0 + ms(500)));
        assert_eq!(record.tick(t0 + ms(1_000)), TickOutcome::Continue);
        assert_eq!(record.remaining_ms(), MINUTE - 1_000);
    }

    #[test]
    fn toggle_flips_between_running_and_paused() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, MINUTE);
        assert!(record.toggle(t0));
        assert!(record.is_running());
        assert!(record.toggle(t0 + ms(2_000)));
        assert_eq!(record.phase(), TimerPhase::Paused);
        assert_eq!(record.remaining_ms(), MINUTE - 2_000);
    }

    #[test]
    fn toggle_while_alarming_is_noop() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, 1_000);
        assert!(record.start(t0));
        assert_eq!(record.tick(t0 + ms(1_000)), TickOutcome::Expired);

        assert!(!record.toggle(t0 + ms(1_200)));
        assert!(record.is_alarming());
        assert!(!record.is_running());
    }

    #[test]
    fn tick_counts_down_from_last_tick() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, MINUTE);
        record.start(t0);
        assert_eq!(record.tick(t0 + ms(200)), TickOutcome::Continue);
        assert_eq!(record.tick(t0 + ms(400)), TickOutcome::Continue);
        assert_eq!(record.remaining_ms(), MINUTE - 400);
        assert_eq!(record.phase(), TimerPhase::Running);
    }

    #[test]
    fn expiry_clamps_to_zero_and_alarms_once() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, 1_000);
        record.start(t0);

        assert_eq!(record.tick(t0 + ms(1_300)), TickOutcome::Expired);
        assert_eq!(record.remaining_ms(), 0);
        assert!(!record.is_running());
        assert!(record.is_alarming());
        assert_eq!(record.phase(), TimerPhase::Alarming);

        assert_eq!(record.tick(t0 + ms(1_500)), TickOutcome::Ignored);
        assert!(!record.start(t0 + ms(1_600)));
    }

    #[test]
    fn time_spent_paused_does_not_count() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, MINUTE);
        record.start(t0);
        record.tick(t0 + ms(200));
        assert!(record.pause(t0 + ms(350)));
        assert_eq!(record.phase(), TimerPhase::Paused);

        assert!(record.start(t0 + ms(30_000)));
        record.tick(t0 + ms(30_100));
        assert_eq!(record.remaining_ms(), MINUTE - 450);
    }

    #[test]
    fn pause_when_not_running_is_noop() {
        let mut record = TimerRecord::new(1, MINUTE);
        assert!(!record.pause(Instant::now()));
        assert_eq!(record.phase(), TimerPhase::Idle);
    }

    #[test]
    fn acknowledge_rearms_at_configured_duration() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, MINUTE);
        record.reconfigure_duration(0, 0, 2);
        record.start(t0);
        record.tick(t0 + ms(2_000));
        assert!(record.record_pulse());
        assert_eq!(record.alarm_pulses(), 1);

        assert!(record.acknowledge_alarm());
        assert!(!record.is_alarming());
        assert_eq!(record.remaining_ms(), 2_000);
        assert_eq!(record.alarm_pulses(), 0);
        assert!(!record.record_pulse());
        assert!(!record.acknowledge_alarm());
    }

    #[test]
    fn reconfigure_rejected_while_running() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, MINUTE);
        record.start(t0);
        assert!(!record.reconfigure_duration(1, 0, 0));
        assert_eq!(record.configured_duration_ms(), MINUTE);
    }

    #[test]
    fn reconfigure_silences_alarm() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, 1_000);
        record.start(t0);
        record.tick(t0 + ms(1_000));
        assert!(record.is_alarming());

        assert!(record.reconfigure_duration(0, 5, 0));
        assert!(!record.is_alarming());
        assert_eq!(record.remaining_ms(), 5 * MINUTE);
        assert_eq!(record.phase(), TimerPhase::Idle);
    }

    #[test]
    fn reset_to_default_undoes_manual_edit() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, 2 * MINUTE);
        record.reconfigure_duration(0, 10, 0);
        record.start(t0);
        record.tick(t0 + ms(5_000));

        record.reset_to_default();
        assert_eq!(record.configured_duration_ms(), 2 * MINUTE);
        assert_eq!(record.remaining_ms(), 2 * MINUTE);
        assert!(!record.is_running());
    }

    #[test]
    fn reset_returns_to_configured_from_any_state() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, MINUTE);
        record.reconfigure_duration(0, 0, 3);
        record.start(t0);
        record.tick(t0 + ms(1_000));
        record.reset();
        assert_eq!(record.remaining_ms(), 3_000);
        assert!(!record.is_running());

        record.start(t0 + ms(2_000));
        record.tick(t0 + ms(5_000));
        assert!(record.is_alarming());
        record.reset();
        assert!(!record.is_alarming());
        assert_eq!(record.phase(), TimerPhase::Idle);
    }

    #[test]
    fn sub_millisecond_remainders_carry_over() {
        let t0 = Instant::now();
        let mut record = TimerRecord::new(1, MINUTE);
        record.start(t0);
        record.tick(t0 + Duration::from_micros(1_500));
        record.tick(t0 + Duration::from_micros(3_000));
        assert_eq!(record.remaining_ms(), MINUTE - 3);
    }
}
