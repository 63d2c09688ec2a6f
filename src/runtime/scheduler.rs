//! Wall-clock scheduling on tokio.

use crate::effects::{offset_from, Scheduler, TimerEvent};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

/// Scheduler that sleeps on the tokio timer and then posts the event to
/// the actor's timer channel.
///
/// Timestamps are the wall-clock time at construction moved forward by the
/// tokio clock, so they stay consistent with dispense delays when time is
/// paused. Must be used from inside a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    timers: mpsc::UnboundedSender<TimerEvent>,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl TokioScheduler {
    pub fn new(timers: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self {
            timers,
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&mut self, delay: Duration, event: TimerEvent) {
        let timers = self.timers.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if timers.send(event).is_err() {
                debug!(?event, "actor gone before timer fired");
            }
        });
    }

    fn timestamp(&self) -> DateTime<Utc> {
        offset_from(self.started_at, self.started.elapsed())
    }
}
