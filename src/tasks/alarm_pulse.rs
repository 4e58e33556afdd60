//! Alarm pulse background task

use std::{sync::Weak, time::Duration};
use tokio::{
    task::AbortHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{debug, error};

use crate::state::{TimerBoard, TimerId};

/// Spawn the periodic callback that sounds an alarming timer: one tone right
/// away, then one per `period` until the alarm is no longer active.
pub fn spawn_alarm_task(board: Weak<TimerBoard>, id: TimerId, period: Duration) -> AbortHandle {
    debug!("Starting alarm task for timer {} every {:?}", id, period);

    tokio::spawn(async move {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;

            let Some(board) = board.upgrade() else {
                break;
            };
            match board.pulse(id) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    error!("Failed to pulse alarm of timer {}: {}", id, e);
                    break;
                }
            }
        }

        debug!("Alarm task for timer {} finished", id);
    })
    .abort_handle()
}
