//! Drives update cycles, either once or forever with a fixed pause in between.

use std::{future::Future, time::Duration};

use log::{debug, trace};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Pause between two update cycles when none is configured
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(125);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Schedule {
    /// Run a single cycle, then stop
    Once,
    /// Run cycles forever, sleeping for the given duration after each one
    Every(Duration),
}

pub struct Scheduler {
    schedule: Schedule,
    cancel: CancellationToken,
}

impl Scheduler {
    pub fn new(schedule: Schedule, cancel: CancellationToken) -> Self {
        Scheduler { schedule, cancel }
    }

    /// Run `cycle` according to the schedule until it completes or the token is cancelled.
    ///
    /// Cycles never overlap: the pause only starts once the previous cycle has finished.
    /// A running cycle is not interrupted by cancellation.
    /// Returns the output of the last cycle that ran, if any.
    pub async fn run<F, Fut, T>(&self, mut cycle: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut last = None;
        let mut count: u64 = 0;
        while !self.cancel.is_cancelled() {
            count += 1;
            trace!("Starting cycle {}", count);
            last = Some(cycle().await);

            let Schedule::Every(interval) = self.schedule else {
                break;
            };
            debug!("Next cycle in {}s", interval.as_secs());
            tokio::select! {
                () = self.cancel.cancelled() => {
                    debug!("Cancelled after {} cycles", count);
                }
                () = sleep(interval) => {}
            }
        }
        last
    }
}
