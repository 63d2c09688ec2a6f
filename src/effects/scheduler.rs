//! Deferred events and the schedulers that deliver them.
//!
//! The controller never sleeps. When a dispense starts it hands a
//! `TimerEvent` to its `Scheduler`, and whoever drives the machine feeds
//! that event back through `VendingMachine::handle_timer` once the delay
//! has passed. Tests use `ManualScheduler` to move time by hand; the tokio
//! runtime uses `runtime::TokioScheduler`. The scheduler is also the
//! machine's clock, so history timestamps agree with dispense timing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Internal event delivered after a scheduled delay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    /// The dispense identified by `receipt` has finished.
    DispenseComplete { receipt: Uuid },
}

/// Something that can deliver a `TimerEvent` after a delay.
///
/// Scheduled events cannot be cancelled.
pub trait Scheduler {
    fn schedule(&mut self, delay: Duration, event: TimerEvent);

    /// Current time on this scheduler's clock.
    ///
    /// Default implementation reads the wall clock.
    fn timestamp(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// `epoch` moved forward by `elapsed`, saturating at `epoch` if the sum
/// is out of range.
pub(crate) fn offset_from(epoch: DateTime<Utc>, elapsed: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(elapsed)
        .ok()
        .and_then(|elapsed| epoch.checked_add_signed(elapsed))
        .unwrap_or(epoch)
}

#[derive(Clone, Debug)]
struct Pending {
    due: Duration,
    seq: u64,
    event: TimerEvent,
}

/// Virtual-time scheduler for deterministic tests and simulations.
///
/// Time only moves when `advance` is called. Timestamps count from a fixed
/// epoch (the Unix epoch unless [`ManualScheduler::with_epoch`] is used), so
/// runs are reproducible.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use uuid::Uuid;
/// use vendsim::effects::{ManualScheduler, Scheduler, TimerEvent};
///
/// let mut scheduler = ManualScheduler::new();
/// let event = TimerEvent::DispenseComplete { receipt: Uuid::new_v4() };
/// scheduler.schedule(Duration::from_millis(3000), event);
///
/// assert!(scheduler.advance(Duration::from_millis(2999)).is_empty());
/// assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![event]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    epoch: DateTime<Utc>,
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the virtual clock at `epoch` instead of the Unix epoch.
    pub fn with_epoch(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch,
            ..Self::default()
        }
    }

    /// Virtual time elapsed since creation.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of events not yet delivered.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Move virtual time forward and return every event that became due,
    /// ordered by deadline and then by scheduling order.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerEvent> {
        self.now = self.now.saturating_add(by);
        let now = self.now;

        let (mut due, rest): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;

        due.sort_by_key(|p| (p.due, p.seq));
        due.into_iter().map(|p| p.event).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration, event: TimerEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Pending {
            due: self.now.saturating_add(delay),
            seq,
            event,
        });
    }

    fn timestamp(&self) -> DateTime<Utc> {
        offset_from(self.epoch, self.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event() -> TimerEvent {
        TimerEvent::DispenseComplete {
            receipt: Uuid::new_v4(),
        }
    }

    #[test]
    fn nothing_fires_before_deadline() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule(Duration::from_secs(3), event());

        assert!(scheduler.advance(Duration::from_secs(2)).is_empty());
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.now(), Duration::from_secs(2));
    }

    #[test]
    fn due_events_fire_once() {
        let mut scheduler = ManualScheduler::new();
        let first = event();
        scheduler.schedule(Duration::from_secs(3), first);

        assert_eq!(scheduler.advance(Duration::from_secs(3)), vec![first]);
        assert!(scheduler.advance(Duration::from_secs(10)).is_empty());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn events_fire_in_deadline_order() {
        let mut scheduler = ManualScheduler::new();
        let late = event();
        let early = event();
        let tie = event();
        scheduler.schedule(Duration::from_secs(5), late);
        scheduler.schedule(Duration::from_secs(1), early);
        scheduler.schedule(Duration::from_secs(5), tie);

        assert_eq!(scheduler.next_deadline(), Some(Duration::from_secs(1)));
        assert_eq!(
            scheduler.advance(Duration::from_secs(6)),
            vec![early, late, tie]
        );
    }

    #[test]
    fn deadlines_are_relative_to_current_time() {
        let mut scheduler = ManualScheduler::new();
        scheduler.advance(Duration::from_secs(10));
        scheduler.schedule(Duration::from_secs(3), event());

        assert_eq!(scheduler.next_deadline(), Some(Duration::from_secs(13)));
    }

    #[test]
    fn timestamp_follows_virtual_time() {
        let epoch = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut scheduler = ManualScheduler::with_epoch(epoch);
        assert_eq!(scheduler.timestamp(), epoch);

        scheduler.advance(Duration::from_millis(3000));
        assert_eq!(scheduler.timestamp(), epoch + chrono::Duration::seconds(3));
    }

    #[test]
    fn default_clock_starts_at_unix_epoch() {
        let scheduler = ManualScheduler::new();
        assert_eq!(scheduler.timestamp(), DateTime::<Utc>::UNIX_EPOCH);
    }
}
