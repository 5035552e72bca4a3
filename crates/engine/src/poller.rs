//! Fixed-cadence status polling with a wall-clock budget.
//!
//! [`watch_batch`] drives a batch of accepted jobs to a terminal state:
//! `Pending → Polling → {Complete, Failed, TimedOut}` (plus `Cancelled`
//! when the owning view is torn down). Each tick issues one fresh
//! status read per still-pending job; ticks never resubmit. Timeout and
//! cancellation are structural -- the loop selects on the deadline and
//! the [`CancellationToken`], so no stray polls can fire after a
//! terminal state.

use std::time::Duration;

use futures::future::join_all;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::job::{Job, JobStatus};
use crate::probe::JobProbe;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default gap between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Default wall-clock budget for a batch.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(300);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tunable polling parameters.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Gap between poll ticks.
    pub interval: Duration,
    /// Wall-clock budget; elapsing it with pending jobs is a timeout,
    /// reported distinctly from failure.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// Terminal state of one watched batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Every job's requested artifacts were observed.
    Completed,
    /// A status read failed; polling stopped for the whole batch.
    Failed {
        /// Generic, user-readable message (the underlying error is
        /// logged, not shown).
        message: String,
    },
    /// The wall-clock budget elapsed with jobs still pending.
    TimedOut,
    /// The owning view cancelled the watch.
    Cancelled,
}

// ---------------------------------------------------------------------------
// Watch loop
// ---------------------------------------------------------------------------

/// Poll the given jobs until the batch reaches a terminal state.
///
/// Job statuses are updated in place: jobs whose artifacts appear move
/// to `Complete`; on failure or timeout the still-pending jobs are
/// marked accordingly. Polls within one tick run together, so the whole
/// batch advances in lock-step at the configured interval.
pub async fn watch_batch(
    probe: &dyn JobProbe,
    jobs: &mut [Job],
    config: &PollConfig,
    cancel: &CancellationToken,
) -> PollOutcome {
    if jobs.iter().all(|job| !job.is_pending()) {
        return PollOutcome::Completed;
    }

    let deadline = tokio::time::Instant::now() + config.timeout;
    let mut ticker = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick fires immediately; consume it so the
    // first status read happens one full interval after submission.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Batch watch cancelled");
                return PollOutcome::Cancelled;
            }
            _ = tokio::time::sleep_until(deadline) => {
                let remaining = mark_pending(jobs, JobStatus::TimedOut);
                tracing::warn!(remaining, "Polling budget elapsed with jobs pending");
                return PollOutcome::TimedOut;
            }
            _ = ticker.tick() => {
                let pending: Vec<usize> = jobs
                    .iter()
                    .enumerate()
                    .filter(|(_, job)| job.is_pending())
                    .map(|(index, _)| index)
                    .collect();

                let reads =
                    join_all(pending.iter().map(|&index| probe.is_complete(&jobs[index]))).await;

                for (&index, read) in pending.iter().zip(reads) {
                    match read {
                        Ok(true) => {
                            tracing::debug!(
                                target_id = jobs[index].target_id,
                                "Job complete",
                            );
                            jobs[index].status = JobStatus::Complete;
                        }
                        Ok(false) => {}
                        Err(e) => {
                            tracing::error!(
                                target_id = jobs[index].target_id,
                                error = %e,
                                "Status read failed, stopping batch",
                            );
                            mark_pending(jobs, JobStatus::Failed);
                            return PollOutcome::Failed {
                                message: "Generation status check failed".to_string(),
                            };
                        }
                    }
                }

                if jobs.iter().all(|job| !job.is_pending()) {
                    tracing::info!(jobs = jobs.len(), "Batch complete");
                    return PollOutcome::Completed;
                }
            }
        }
    }
}

/// Move every still-pending job to `status`; returns how many moved.
fn mark_pending(jobs: &mut [Job], status: JobStatus) -> usize {
    let mut moved = 0;
    for job in jobs.iter_mut().filter(|job| job.is_pending()) {
        job.status = status;
        moved += 1;
    }
    moved
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
