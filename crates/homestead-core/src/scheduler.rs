//! The idle production loop.
//!
//! One background task fires a tick every period. Each tick draws a fresh
//! seed and hands it to a [`ProductionSource`], which runs the whole tick in
//! one transaction. A failed tick is logged and the loop keeps going; the
//! next tick starts from whatever state was committed.
//!
//! Shutdown is raced against both the wait for the next tick and the tick in
//! flight. An interrupted tick has its future dropped, which rolls back its
//! transaction, so a half-applied tick is never observed.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};

use crate::production::ProductionSource;

/// Errors from stopping the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    /// The scheduler task panicked or was aborted.
    #[error("scheduler task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Counters accumulated over the scheduler's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerSummary {
    /// Ticks that committed.
    pub ticks_run: u64,
    /// Ticks whose source returned an error.
    pub ticks_failed: u64,
    /// Ticks cut short by shutdown and rolled back.
    pub ticks_interrupted: u64,
    /// Animal productions across all committed ticks.
    pub animals_produced: u64,
}

/// A running scheduler.
#[derive(Debug)]
pub struct SchedulerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<SchedulerSummary>,
}

impl SchedulerHandle {
    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(self) -> Result<SchedulerSummary, SchedulerError> {
        // The task may already be gone; joining reports why.
        let _ = self.shutdown.send(true);
        Ok(self.task.await?)
    }

    /// Whether the scheduler task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Start the production loop on the current tokio runtime.
///
/// The first tick fires one `period` after the call.
pub fn spawn_scheduler<S: ProductionSource>(source: S, period: Duration) -> SchedulerHandle {
    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(run(source, period, shutdown_rx));
    SchedulerHandle { shutdown, task }
}

async fn run<S: ProductionSource>(
    source: S,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) -> SchedulerSummary {
    let start = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
    let mut interval = tokio::time::interval_at(start, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut summary = SchedulerSummary::default();
    let mut tick: u64 = 0;

    info!(period_secs = period.as_secs(), "production scheduler started");

    loop {
        tokio::select! {
            biased;
            _ = shutdown.changed() => break,
            _ = interval.tick() => {}
        }

        tick = tick.saturating_add(1);
        let seed = rand::random::<u64>();

        let result = tokio::select! {
            biased;
            _ = shutdown.changed() => {
                summary.ticks_interrupted = summary.ticks_interrupted.saturating_add(1);
                warn!(tick, "shutdown interrupted a production tick, rolled back");
                break;
            }
            result = source.produce(tick, seed) => result,
        };

        match result {
            Ok(report) => {
                summary.ticks_run = summary.ticks_run.saturating_add(1);
                summary.animals_produced = summary
                    .animals_produced
                    .saturating_add(u64::try_from(report.produced).unwrap_or(u64::MAX));
                if report.produced > 0 {
                    info!(
                        tick,
                        seed,
                        candidates = report.candidates,
                        produced = report.produced,
                        units = report.units,
                        plots_at_capacity = report.plots_at_capacity,
                        "Animals produced"
                    );
                } else {
                    info!(
                        tick,
                        candidates = report.candidates,
                        plots_at_capacity = report.plots_at_capacity,
                        "No animals produced anything this tick"
                    );
                }
            }
            Err(e) => {
                summary.ticks_failed = summary.ticks_failed.saturating_add(1);
                warn!(tick, error = %e, "production tick failed, nothing committed");
            }
        }
    }

    info!(
        ticks_run = summary.ticks_run,
        ticks_failed = summary.ticks_failed,
        ticks_interrupted = summary.ticks_interrupted,
        animals_produced = summary.animals_produced,
        "production scheduler stopped"
    );
    summary
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;

    use super::*;
    use crate::production::{ProductionError, TickReport};

    const PERIOD: Duration = Duration::from_secs(60);

    /// Produces one animal per tick, failing on the ticks listed.
    #[derive(Default)]
    struct ScriptedSource {
        fail_on: Vec<u64>,
    }

    impl ProductionSource for ScriptedSource {
        fn produce(
            &self,
            tick: u64,
            tick_seed: u64,
        ) -> impl Future<Output = Result<TickReport, ProductionError>> + Send {
            let result = if self.fail_on.contains(&tick) {
                Err(ProductionError::Store {
                    message: "serialization failure".to_owned(),
                })
            } else {
                Ok(TickReport {
                    tick,
                    seed: tick_seed,
                    candidates: 2,
                    produced: 1,
                    units: 1,
                    plots_at_capacity: 0,
                })
            };
            async move { result }
        }
    }

    /// Starts a tick and never finishes it.
    struct StalledSource;

    impl ProductionSource for StalledSource {
        fn produce(
            &self,
            _tick: u64,
            _tick_seed: u64,
        ) -> impl Future<Output = Result<TickReport, ProductionError>> + Send {
            std::future::pending()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period() {
        let handle = spawn_scheduler(ScriptedSource::default(), PERIOD);
        tokio::time::sleep(Duration::from_secs(190)).await;

        let summary = handle.shutdown().await.unwrap();
        assert_eq!(summary.ticks_run, 3);
        assert_eq!(summary.animals_produced, 3);
        assert_eq!(summary.ticks_failed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_before_first_period() {
        let handle = spawn_scheduler(ScriptedSource::default(), PERIOD);
        tokio::time::sleep(Duration::from_secs(59)).await;

        let summary = handle.shutdown().await.unwrap();
        assert_eq!(summary, SchedulerSummary::default());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_tick_does_not_stop_the_loop() {
        let source = ScriptedSource { fail_on: vec![2] };
        let handle = spawn_scheduler(source, PERIOD);
        tokio::time::sleep(Duration::from_secs(190)).await;

        let summary = handle.shutdown().await.unwrap();
        assert_eq!(summary.ticks_failed, 1);
        assert_eq!(summary.ticks_run, 2);
        assert_eq!(summary.animals_produced, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_interrupts_tick_in_flight() {
        let handle = spawn_scheduler(StalledSource, PERIOD);
        tokio::time::sleep(Duration::from_secs(61)).await;

        let summary = handle.shutdown().await.unwrap();
        assert_eq!(summary.ticks_interrupted, 1);
        assert_eq!(summary.ticks_run, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_while_idle_exits_promptly() {
        let handle = spawn_scheduler(ScriptedSource::default(), Duration::from_secs(3_600));
        tokio::task::yield_now().await;
        assert!(!handle.is_finished());

        let summary = handle.shutdown().await.unwrap();
        assert_eq!(summary.ticks_run, 0);
    }
}
