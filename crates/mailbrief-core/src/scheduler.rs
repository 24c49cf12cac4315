//! Scheduler: runs one job on a fixed interval for the life of the process.
//!
//! The loop idles in short ticks and fires the job once the next-due instant
//! has passed; the next run is due one interval after the previous run
//! *finished*. Runs never overlap. A failing or panicking job is logged and
//! the loop carries on.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, error, info};

// ─────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────

/// Default interval: 10 minutes.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Default idle granularity: 1 second.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

// ─────────────────────────────────────────────
// Callback type
// ─────────────────────────────────────────────

/// The scheduled job. Invoked once per trigger.
pub type JobFn = Arc<
    dyn Fn() -> Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>> + Send + Sync,
>;

// ─────────────────────────────────────────────
// Scheduler
// ─────────────────────────────────────────────

/// Fixed-interval job loop.
pub struct Scheduler {
    job: JobFn,
    interval: Duration,
    tick: Duration,
    shutdown: Arc<Notify>,
}

impl Scheduler {
    /// Create a scheduler. `None` picks the 10-minute / 1-second defaults.
    pub fn new(job: JobFn, interval: Option<Duration>, tick: Option<Duration>) -> Self {
        let interval = interval.unwrap_or(DEFAULT_INTERVAL);
        // Ticks never exceed the interval.
        let tick = tick.unwrap_or(DEFAULT_TICK).min(interval).max(Duration::from_millis(1));

        Self {
            job,
            interval,
            tick,
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run the loop until [`stop`](Self::stop) is called.
    pub async fn run(&self) {
        info!(
            interval_s = self.interval.as_secs(),
            tick_ms = u64::try_from(self.tick.as_millis()).unwrap_or(u64::MAX),
            "scheduler started"
        );

        let mut next_due = due_after(self.interval);

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.tick) => {
                    if Instant::now() >= next_due {
                        self.run_job().await;
                        next_due = due_after(self.interval);
                        debug!(in_s = self.interval.as_secs(), "next run scheduled");
                    }
                }
                _ = self.shutdown.notified() => {
                    info!("scheduler shutting down");
                    return;
                }
            }
        }
    }

    /// Stop the loop. Takes effect at the next tick if a job is running.
    pub fn stop(&self) {
        info!("stopping scheduler");
        self.shutdown.notify_one();
    }

    /// Run the job once, containing any error or panic.
    async fn run_job(&self) {
        let fut = (self.job)();
        match tokio::spawn(fut).await {
            Ok(Ok(())) => debug!("scheduled job finished"),
            Ok(Err(e)) => error!(error = %e, "Error in scheduled job"),
            Err(e) if e.is_panic() => error!("scheduled job panicked"),
            Err(e) => error!(error = %e, "scheduled job was cancelled"),
        }
    }
}

/// `now + interval`, saturating at a far-future instant.
fn due_after(interval: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(interval)
        .unwrap_or_else(|| now + Duration::from_secs(86_400 * 365 * 30))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_job(counter: Arc<AtomicUsize>) -> JobFn {
        Arc::new(move || {
            let counter = counter.clone();
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        })
    }

    async fn run_for(scheduler: Arc<Scheduler>, span: Duration) {
        let svc = scheduler.clone();
        let handle = tokio::spawn(async move { svc.run().await });
        tokio::time::sleep(span).await;
        scheduler.stop();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_runs_in_twenty_five_minutes() {
        let counter = Arc::new(AtomicUsize::new(0));
        let scheduler = Arc::new(Scheduler::new(
            counting_job(counter.clone()),
            Some(Duration::from_secs(600)),
            Some(Duration::from_secs(1)),
        ));

        run_for(scheduler, Duration::from_secs(25 * 60)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_run_before_first_interval() {
        let counter = Arc::new(AtomicUsize::new(0));
        let scheduler = Arc::new(Scheduler::new(
            counting_job(counter.clone()),
            Some(Duration::from_secs(600)),
            Some(Duration::from_secs(1)),
        ));

        run_for(scheduler, Duration::from_secs(9 * 60 + 30)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_job_does_not_stop_loop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let job: JobFn = Arc::new(move || {
            let c = c.clone();
            Box::pin(async move {
                c.fetch_add(1, Ordering::SeqCst);
                anyhow::bail!("mail provider unreachable")
            })
        });
        let scheduler = Arc::new(Scheduler::new(
            job,
            Some(Duration::from_secs(60)),
            Some(Duration::from_secs(1)),
        ));

        run_for(scheduler, Duration::from_secs(3 * 60 + 30)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_job_does_not_stop_loop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        let job: JobFn = Arc::new(move || {
            let c = c.clone();
            Box::pin(async move {
                let n = c.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    panic!("first run blows up");
                }
                Ok(())
            })
        });
        let scheduler = Arc::new(Scheduler::new(
            job,
            Some(Duration::from_secs(60)),
            Some(Duration::from_secs(1)),
        ));

        run_for(scheduler, Duration::from_secs(2 * 60 + 30)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_run_counts_from_job_completion() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = counter.clone();
        // Each run takes 5 minutes: runs start at 10m and 25m, not 20m.
        let job: JobFn = Arc::new(move || {
            let c = c.clone();
            Box::pin(async move {
                c.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_secs(5 * 60)).await;
                Ok(())
            })
        });
        let scheduler = Arc::new(Scheduler::new(
            job,
            Some(Duration::from_secs(600)),
            Some(Duration::from_secs(1)),
        ));

        run_for(scheduler, Duration::from_secs(24 * 60)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_stop_exits_loop() {
        let counter = Arc::new(AtomicUsize::new(0));
        let scheduler = Arc::new(Scheduler::new(
            counting_job(counter.clone()),
            Some(Duration::from_secs(3600)),
            Some(Duration::from_millis(10)),
        ));

        run_for(scheduler, Duration::from_millis(100)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_huge_interval_and_tick_do_not_overflow() {
        let counter = Arc::new(AtomicUsize::new(0));
        let scheduler = Arc::new(Scheduler::new(
            counting_job(counter.clone()),
            Some(Duration::MAX),
            Some(Duration::MAX),
        ));
        assert_eq!(scheduler.tick, Duration::MAX);

        run_for(scheduler, Duration::from_secs(60)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_tick_clamped_to_interval() {
        let job = counting_job(Arc::new(AtomicUsize::new(0)));
        let scheduler = Scheduler::new(
            job,
            Some(Duration::from_secs(5)),
            Some(Duration::from_secs(60)),
        );
        assert_eq!(scheduler.tick, Duration::from_secs(5));
        assert_eq!(scheduler.interval(), Duration::from_secs(5));
    }
}
