//! Timer board: the owned collection of timer records and their callbacks

use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, Weak},
    time::Duration,
};
use tokio::{task::AbortHandle, time::Instant};
use tracing::{debug, info};

use super::timer_record::{Outcome, TickOutcome, TimerId, TimerRecord};
use crate::{
    services::AlarmGenerator,
    tasks::{spawn_alarm_task, spawn_tick_task},
};

/// Scheduling parameters shared by every timer on a board
#[derive(Debug, Clone)]
pub struct BoardSettings {
    /// How often a running timer recomputes its remaining time
    pub tick_interval: Duration,
    /// How often an alarming timer emits a tone
    pub alarm_interval: Duration,
    /// Default duration of timers added without an explicit one
    pub new_timer_duration_ms: u64,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(200),
            alarm_interval: Duration::from_millis(1200),
            new_timer_duration_ms: 2 * 60 * 1000,
        }
    }
}

/// A record plus the handles of the periodic callbacks it owns
#[derive(Debug)]
struct TimerEntry {
    record: TimerRecord,
    tick_task: Option<AbortHandle>,
    alarm_task: Option<AbortHandle>,
}

impl TimerEntry {
    fn cancel_callbacks(&mut self) {
        if let Some(handle) = self.tick_task.take() {
            handle.abort();
        }
        if let Some(handle) = self.alarm_task.take() {
            handle.abort();
        }
    }
}

#[derive(Debug)]
struct Entries {
    next_id: TimerId,
    revision: u64,
    timers: BTreeMap<TimerId, TimerEntry>,
}

/// Owns every timer record and drives their countdown and alarm callbacks.
///
/// Callbacks are tokio tasks, so every method that can start one must be
/// called from within a tokio runtime.
#[derive(Debug)]
pub struct TimerBoard {
    entries: Mutex<Entries>,
    alarm: AlarmGenerator,
    settings: BoardSettings,
    this: Weak<TimerBoard>,
}

impl TimerBoard {
    pub fn new(settings: BoardSettings, alarm: AlarmGenerator) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            entries: Mutex::new(Entries {
                next_id: 1,
                revision: 0,
                timers: BTreeMap::new(),
            }),
            alarm,
            settings,
            this: this.clone(),
        })
    }

    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    pub fn alarm(&self) -> &AlarmGenerator {
        &self.alarm
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>, String> {
        self.entries
            .lock()
            .map_err(|e| format!("Failed to lock timer board: {}", e))
    }

    /// Add an idle timer armed with `default_duration_ms`
    pub fn create_timer(&self, default_duration_ms: u64) -> Result<TimerId, String> {
        let mut entries = self.lock()?;
        let id = entries.next_id;
        entries.next_id += 1;
        entries.revision += 1;
        entries.timers.insert(
            id,
            TimerEntry {
                record: TimerRecord::new(id, default_duration_ms),
                tick_task: None,
                alarm_task: None,
            },
        );
        info!("Created timer {} with default duration {}ms", id, default_duration_ms);
        Ok(id)
    }

    /// Add a timer with the board's default duration
    pub fn create_default_timer(&self) -> Result<TimerId, String> {
        self.create_timer(self.settings.new_timer_duration_ms)
    }

    /// Destroy a timer, cancelling its callbacks first
    pub fn remove(&self, id: TimerId) -> Result<Outcome, String> {
        let mut entries = self.lock()?;
        let Some(mut entry) = entries.timers.remove(&id) else {
            return Ok(Outcome::NotFound);
        };
        entry.cancel_callbacks();
        entries.revision += 1;
        info!("Removed timer {}", id);
        Ok(Outcome::Applied)
    }

    /// Start counting down. Starting is a user action, so it also primes the
    /// alarm output.
    pub fn start(&self, id: TimerId) -> Result<Outcome, String> {
        self.alarm.prime();
        let outcome = self.apply(id, |record, now| record.start(now))?;
        if outcome.is_applied() {
            info!("Started timer {}", id);
        }
        Ok(outcome)
    }

    pub fn pause(&self, id: TimerId) -> Result<Outcome, String> {
        let outcome = self.apply(id, |record, now| record.pause(now))?;
        if outcome.is_applied() {
            info!("Paused timer {}", id);
        }
        Ok(outcome)
    }

    /// Pause a running timer, start any other. The running check and the
    /// transition happen under one lock, so a tick landing in between
    /// cannot turn a pause into a start.
    pub fn toggle(&self, id: TimerId) -> Result<Outcome, String> {
        self.alarm.prime();
        let mut running = false;
        let outcome = self.apply(id, |record, now| {
            let applied = record.toggle(now);
            running = record.is_running();
            applied
        })?;
        if outcome.is_applied() {
            info!("{} timer {}", if running { "Started" } else { "Paused" }, id);
        }
        Ok(outcome)
    }

    pub fn reset(&self, id: TimerId) -> Result<Outcome, String> {
        let outcome = self.apply(id, |record, _| {
            record.reset();
            true
        })?;
        if outcome.is_applied() {
            info!("Reset timer {}", id);
        }
        Ok(outcome)
    }

    pub fn reset_to_default(&self, id: TimerId) -> Result<Outcome, String> {
        let outcome = self.apply(id, |record, _| {
            record.reset_to_default();
            true
        })?;
        if outcome.is_applied() {
            info!("Reset timer {} to its default duration", id);
        }
        Ok(outcome)
    }

    pub fn acknowledge_alarm(&self, id: TimerId) -> Result<Outcome, String> {
        let outcome = self.apply(id, |record, _| record.acknowledge_alarm())?;
        if outcome.is_applied() {
            info!("Alarm of timer {} acknowledged", id);
        }
        Ok(outcome)
    }

    pub fn reconfigure_duration(
        &self,
        id: TimerId,
        hours: i64,
        minutes: i64,
        seconds: i64,
    ) -> Result<Outcome, String> {
        let outcome = self.apply(id, |record, _| {
            record.reconfigure_duration(hours, minutes, seconds)
        })?;
        if outcome.is_applied() {
            info!("Timer {} set to {}h {}m {}s", id, hours, minutes, seconds);
        }
        Ok(outcome)
    }

    pub fn rename(&self, id: TimerId, name: String) -> Result<Outcome, String> {
        self.apply(id, move |record, _| {
            record.rename(name);
            true
        })
    }

    /// Recompute the remaining time of a running timer.
    ///
    /// Returns whether the tick callback should keep firing.
    pub fn tick(&self, id: TimerId, now: Instant) -> Result<bool, String> {
        let mut entries = self.lock()?;
        let Entries { revision, timers, .. } = &mut *entries;
        let Some(entry) = timers.get_mut(&id) else {
            return Ok(false);
        };

        let outcome = entry.record.tick(now);
        match outcome {
            TickOutcome::Continue => {
                *revision += 1;
            }
            TickOutcome::Expired => {
                *revision += 1;
                info!("Timer {} expired, sounding alarm", id);
            }
            TickOutcome::Ignored => {}
        }
        self.sync_callbacks(id, entry);
        Ok(outcome == TickOutcome::Continue)
    }

    /// Emit one alarm pulse for an alarming timer.
    ///
    /// Returns whether the alarm callback should keep firing.
    pub fn pulse(&self, id: TimerId) -> Result<bool, String> {
        {
            let mut entries = self.lock()?;
            let Entries { revision, timers, .. } = &mut *entries;
            let Some(entry) = timers.get_mut(&id) else {
                return Ok(false);
            };
            if !entry.record.record_pulse() {
                return Ok(false);
            }
            *revision += 1;
        }
        self.alarm.pulse(id);
        Ok(true)
    }

    /// Copy of one record
    pub fn get(&self, id: TimerId) -> Result<Option<TimerRecord>, String> {
        let entries = self.lock()?;
        Ok(entries.timers.get(&id).map(|entry| entry.record.clone()))
    }

    /// Copy of every record in creation order, with the board revision
    pub fn snapshot(&self) -> Result<(u64, Vec<TimerRecord>), String> {
        let entries = self.lock()?;
        let records = entries
            .timers
            .values()
            .map(|entry| entry.record.clone())
            .collect();
        Ok((entries.revision, records))
    }

    /// Number of tick and alarm callbacks currently scheduled
    pub fn active_callbacks(&self) -> Result<(usize, usize), String> {
        let entries = self.lock()?;
        let ticking = entries
            .timers
            .values()
            .filter(|entry| entry.tick_task.is_some())
            .count();
        let alarming = entries
            .timers
            .values()
            .filter(|entry| entry.alarm_task.is_some())
            .count();
        Ok((ticking, alarming))
    }

    /// Cancel every callback, leaving the records in place
    pub fn shutdown(&self) -> Result<(), String> {
        let mut entries = self.lock()?;
        for entry in entries.timers.values_mut() {
            entry.cancel_callbacks();
        }
        info!("Timer board callbacks cancelled");
        Ok(())
    }

    fn apply<F>(&self, id: TimerId, transition: F) -> Result<Outcome, String>
    where
        F: FnOnce(&mut TimerRecord, Instant) -> bool,
    {
        let mut entries = self.lock()?;
        let Entries { revision, timers, .. } = &mut *entries;
        let Some(entry) = timers.get_mut(&id) else {
            debug!("Ignoring action for unknown timer {}", id);
            return Ok(Outcome::NotFound);
        };

        let applied = transition(&mut entry.record, Instant::now());
        if applied {
            *revision += 1;
        } else {
            debug!("Action ignored by timer {} in phase {:?}", id, entry.record.phase());
        }
        self.sync_callbacks(id, entry);
        Ok(Outcome::from_applied(applied))
    }

    /// Bring the entry's callbacks in line with its record: one tick task
    /// while running, one alarm task while alarming, nothing otherwise.
    fn sync_callbacks(&self, id: TimerId, entry: &mut TimerEntry) {
        match (entry.record.is_running(), entry.tick_task.take()) {
            (true, Some(handle)) => entry.tick_task = Some(handle),
            (true, None) => {
                entry.tick_task = Some(spawn_tick_task(
                    self.this.clone(),
                    id,
                    self.settings.tick_interval,
                ));
            }
            (false, Some(handle)) => handle.abort(),
            (false, None) => {}
        }

        match (entry.record.is_alarming(), entry.alarm_task.take()) {
            (true, Some(handle)) => entry.alarm_task = Some(handle),
            (true, None) => {
                entry.alarm_task = Some(spawn_alarm_task(
                    self.this.clone(),
                    id,
                    self.settings.alarm_interval,
                ));
            }
            (false, Some(handle)) => handle.abort(),
            (false, None) => {}
        }
    }
}

impl Drop for TimerBoard {
    fn drop(&mut self) {
        if let Ok(entries) = self.entries.get_mut() {
            for entry in entries.timers.values_mut() {
                entry.cancel_callbacks();
            }
        }
    }
}
