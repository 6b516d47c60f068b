//! Concurrent workers that hammer the target until their deadline.
mod worker;


use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::error::AppResult;
use crate::http::RequestExecutor;
use crate::metrics::MetricsAggregator;
use crate::shutdown::{ShutdownReceiver, ShutdownSender, shutdown_requested};

use worker::{WorkerContext, run_worker};

/// Why a worker left its loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Deadline,
    Cancelled,
}

/// What one worker did over its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub index: usize,
    /// Outcomes this worker recorded into the aggregator.
    pub issued: u64,
    pub stop: StopReason,
}

#[derive(Debug, Clone, Default)]
pub struct PoolReport {
    pub workers: Vec<WorkerReport>,
    /// A shutdown reached the pool before every requested worker was spawned.
    pub interrupted: bool,
}

impl PoolReport {
    #[must_use]
    pub fn total_issued(&self) -> u64 {
        self.workers
            .iter()
            .fold(0u64, |total, worker| total.saturating_add(worker.issued))
    }

    #[must_use]
    pub fn cancelled(&self) -> bool {
        self.interrupted
            || self
                .workers
                .iter()
                .any(|worker| worker.stop == StopReason::Cancelled)
    }
}

/// Owns the spawned workers. The pool only grows; each worker exits on its
/// own when it observes its deadline or a shutdown signal.
///
/// The pool listens for shutdown from the moment it is created, so a signal
/// sent before a later `grow_to` stops that growth instead of being missed by
/// workers that subscribe afterwards.
pub struct WorkerPool {
    executor: Arc<dyn RequestExecutor>,
    aggregator: Arc<MetricsAggregator>,
    request_delay: Duration,
    shutdown_tx: ShutdownSender,
    shutdown_rx: ShutdownReceiver,
    shutdown_seen: bool,
    workers: Vec<JoinHandle<WorkerReport>>,
}

impl WorkerPool {
    #[must_use]
    pub fn new(
        executor: Arc<dyn RequestExecutor>,
        aggregator: Arc<MetricsAggregator>,
        request_delay: Duration,
        shutdown_tx: &ShutdownSender,
    ) -> Self {
        Self {
            executor,
            aggregator,
            request_delay,
            shutdown_tx: shutdown_tx.clone(),
            shutdown_rx: shutdown_tx.subscribe(),
            shutdown_seen: false,
            workers: Vec::new(),
        }
    }

    #[must_use]
    pub fn live_workers(&self) -> usize {
        self.workers.len()
    }

    /// Whether a shutdown was sent since the pool was created.
    pub fn shutdown_seen(&mut self) -> bool {
        if !self.shutdown_seen && shutdown_requested(&mut self.shutdown_rx) {
            self.shutdown_seen = true;
        }
        self.shutdown_seen
    }

    /// Spawns workers until `target` are running; never shrinks. Returns how
    /// many were added, which is fewer than requested once shutdown was seen.
    pub fn grow_to(&mut self, target: usize, deadline: Instant) -> usize {
        let current = self.workers.len();
        for index in current..target {
            // Subscribe before checking: a later send reaches the worker, an
            // earlier one is already queued for the pool.
            let shutdown_rx = self.shutdown_tx.subscribe();
            if self.shutdown_seen() {
                debug!("Shutdown seen; not spawning worker {}", index);
                break;
            }
            let context = WorkerContext {
                index,
                executor: Arc::clone(&self.executor),
                aggregator: Arc::clone(&self.aggregator),
                request_delay: self.request_delay,
                deadline,
            };
            self.workers
                .push(tokio::spawn(run_worker(context, shutdown_rx)));
        }
        let added = self.workers.len().saturating_sub(current);
        if added > 0 {
            debug!(
                "Worker pool grew from {} to {} workers",
                current,
                self.workers.len()
            );
        }
        added
    }

    /// Waits for every spawned worker to exit.
    ///
    /// # Errors
    ///
    /// Returns an error when a worker task panicked or was aborted.
    pub async fn join(mut self) -> AppResult<PoolReport> {
        let interrupted = self.shutdown_seen();
        let mut report = PoolReport {
            workers: Vec::with_capacity(self.workers.len()),
            interrupted,
        };
        for handle in self.workers {
            report.workers.push(handle.await?);
        }
        debug!(
            "Worker pool joined: {} workers, {} requests",
            report.workers.len(),
            report.total_issued()
        );
        Ok(report)
    }

    /// Starts `concurrency` workers that run until `deadline`, then joins them.
    ///
    /// # Errors
    ///
    /// Returns an error when a worker task panicked or was aborted.
    pub async fn run(mut self, concurrency: usize, deadline: Instant) -> AppResult<PoolReport> {
        self.grow_to(concurrency, deadline);
        self.join().await
    }
}
