use std::ops::ControlFlow;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Repeating timer driving the launch countdown
///
/// Fires once per `period`, starting one period after spawn, until the
/// callback breaks. Cancelled on `cancel()` or drop.
pub struct CountdownTimer {
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            // A late tick is delivered once, never in a burst
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if on_tick().is_break() {
                    break;
                }
            }

            debug!("Countdown timer finished");
        });

        Self { handle }
    }

    pub fn cancel(&self) {
        if !self.handle.is_finished() {
            debug!("Cancelling countdown timer");
            self.handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
