//! Countdown tick background task

use std::{sync::Weak, time::Duration};
use tokio::{
    task::AbortHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error};

use crate::state::{TimerBoard, TimerId};

/// Spawn the periodic callback that keeps a running timer's remaining time
/// current. The task ends on its own once the timer stops running or the
/// board is gone.
pub fn spawn_tick_task(board: Weak<TimerBoard>, id: TimerId, period: Duration) -> AbortHandle {
    debug!("Starting tick task for timer {} every {:?}", id, period);

    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;

            let Some(board) = board.upgrade() else {
                break;
            };
            match board.tick(id, Instant::now()) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    error!("Failed to tick timer {}: {}", id, e);
                    break;
                }
            }
        }

        debug!("Tick task for timer {} finished", id);
    })
    .abort_handle()
}
