//! Due-post executor: the scan-and-fire pass and the background sweeper.
//!
//! A post is due when `status == scheduled` and its target time has passed.
//! Each sweep executes due posts one at a time, in list order; a failing
//! post is logged and the pass moves on. A successful execution flips the
//! local record optimistically instead of waiting for the next refresh.
//!
//! Two triggers exist: immediately after every successful refresh, and a
//! fixed wall-clock interval owned by [`SweeperHandle`]. The handle is an
//! explicit object; dropping or stopping it cancels the loop.

use std::sync::Arc;

use chrono::Utc;
use postwire_core::PostBackend;
use postwire_core::error::{PostwireError, Result};
use postwire_core::types::ExecuteOutcome;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;

use crate::alerts::AlertReporter;
use crate::store::PostStore;

/// Outcome of one sweep pass.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Posts fired this pass, in execution order.
    pub executed: Vec<(String, ExecuteOutcome)>,
    /// Posts whose execution failed; they stay scheduled and are retried
    /// on a later pass.
    pub failed: Vec<(String, PostwireError)>,
}

impl SweepReport {
    pub fn is_empty(&self) -> bool {
        self.executed.is_empty() && self.failed.is_empty()
    }
}

/// One scan-and-fire pass over the store.
///
/// The due set is snapshotted up front, so every due post gets exactly one
/// execution call per pass regardless of how the store mutates mid-pass.
pub async fn sweep(store: &mut PostStore, backend: &dyn PostBackend) -> SweepReport {
    let due = store.due_ids(Utc::now());
    let mut report = SweepReport::default();

    if due.is_empty() {
        return report;
    }
    tracing::info!("Found {} past-due posts, auto-executing", due.len());

    for id in due {
        match backend.execute(&id).await {
            Ok(outcome) => {
                store.mark_completed(&id);
                tracing::info!("Auto-executed post {id}");
                report.executed.push((id, outcome));
            }
            Err(e) => {
                // Stays scheduled; manual retry or the next sweep picks it up.
                tracing::warn!("Failed to auto-execute post {id}: {e}");
                report.failed.push((id, e));
            }
        }
    }
    report
}

/// Refresh the store and, when the refresh succeeded, run a sweep.
///
/// Returns the refresh result and the sweep report (`None` when the
/// refresh failed and no sweep ran).
pub async fn refresh_and_sweep(
    store: &mut PostStore,
    backend: &dyn PostBackend,
) -> (Result<usize>, Option<SweepReport>) {
    match store.refresh(backend).await {
        Ok(count) => {
            let report = sweep(store, backend).await;
            (Ok(count), Some(report))
        }
        Err(e) => (Err(e), None),
    }
}

/// Owned handle to the background sweep loop. The loop runs until the
/// handle is stopped or dropped.
pub struct SweeperHandle {
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Signal the loop to stop and wait for it to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Spawn the periodic refresh-and-sweep loop.
///
/// Every `interval_secs` the loop refreshes the store and fires whatever
/// became due. A failed refresh degrades to a warning on the reporter and
/// the cached list stays visible.
pub fn spawn_sweeper(
    store: Arc<Mutex<PostStore>>,
    backend: Arc<dyn PostBackend>,
    reporter: Arc<Mutex<AlertReporter>>,
    interval_secs: u64,
) -> SweeperHandle {
    let (shutdown, mut stopped) = watch::channel(false);

    let task = tokio::spawn(async move {
        tracing::info!("Due-post sweeper started (every {interval_secs}s)");
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_secs));
        // The first tick fires immediately; that doubles as the on-start refresh.
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                _ = stopped.changed() => {
                    tracing::info!("Due-post sweeper stopped");
                    return;
                }
            }

            let (refresh, report) = {
                let mut store = store.lock().await;
                refresh_and_sweep(&mut store, backend.as_ref()).await
            };

            if refresh.is_err() {
                let mut reporter = reporter.lock().await;
                reporter.warning("Could not load scheduled posts. Using local data.");
            }
            if let Some(report) = report {
                for (id, _) in &report.executed {
                    tracing::debug!("Sweep executed {id}");
                }
                for (id, e) in &report.failed {
                    tracing::debug!("Sweep failed for {id}: {e}");
                }
            }
        }
    });

    SweeperHandle {
        shutdown,
        task: Some(task),
    }
}
