//! Background audit worker
//!
//! Drains queued audits through the orchestrator, keeping at most
//! `max-concurrent-audits` pipelines in flight.

use crate::pipeline::Orchestrator;
use crate::state::AuditStatus;
use crate::{AuditError, Result};
use std::sync::Arc;
use tokio::task::JoinSet;

/// Outcome counts for one pass over the queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    pub completed: usize,
    pub failed: usize,
    /// Audits another runner started first
    pub rejected: usize,
}

pub struct Worker {
    orchestrator: Arc<Orchestrator>,
    max_concurrent: usize,
}

impl Worker {
    pub fn new(orchestrator: Arc<Orchestrator>, max_concurrent: usize) -> Self {
        Self {
            orchestrator,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Runs every currently queued audit, oldest first
    ///
    /// Audits queued while the pass is running are left for the next pass.
    pub async fn run_pending(&self) -> Result<WorkerReport> {
        let queued = self
            .orchestrator
            .store()
            .list_audits_by_status(AuditStatus::Queued, usize::MAX)?;

        tracing::info!(
            "Worker picked up {} queued audits (max {} concurrent)",
            queued.len(),
            self.max_concurrent
        );

        let mut pending = queued.into_iter().map(|audit| audit.id);
        let mut in_flight = JoinSet::new();
        let mut report = WorkerReport::default();

        loop {
            // Top up in-flight audits
            while in_flight.len() < self.max_concurrent {
                let Some(id) = pending.next() else {
                    break;
                };
                let orchestrator = Arc::clone(&self.orchestrator);
                in_flight.spawn(async move { (id, orchestrator.start(id).await) });
            }

            // Reap one finished audit
            let Some(joined) = in_flight.join_next().await else {
                break;
            };

            match joined {
                Ok((_, Ok(AuditStatus::Complete))) => report.completed += 1,
                Ok((_, Ok(_))) => report.failed += 1,
                Ok((id, Err(AuditError::NotStartable { status, .. }))) => {
                    tracing::debug!("Audit {} skipped: already {}", id, status);
                    report.rejected += 1;
                }
                Ok((id, Err(e))) => {
                    tracing::error!("Audit {} could not be run: {}", id, e);
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::error!("Audit task aborted: {}", e);
                    report.failed += 1;
                }
            }
        }

        tracing::info!(
            "Worker pass done: {} complete, {} failed, {} skipped",
            report.completed,
            report.failed,
            report.rejected
        );

        Ok(report)
    }
}
