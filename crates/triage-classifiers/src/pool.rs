//! Bounded worker pool for classification units
//!
//! Each unit is a synchronous closure run on tokio's blocking thread pool.
//! At most `size` units execute at once; the rest wait for a worker. A
//! unit's timeout starts when it gets a worker, not when it is submitted.
//!
//! A unit that exceeds its timeout is abandoned: its result is discarded
//! whenever it eventually finishes, but it keeps its worker until then.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::warn;
use triage_core::{Error, Result};

/// Fixed-size pool shared by every unit of a batch
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    /// Create a pool with `size` workers. A size of zero is raised to one.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Workers not currently running a unit
    pub fn available_workers(&self) -> usize {
        self.permits.available_permits()
    }

    /// Submit a unit of work with a deadline.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit<T, F>(&self, limit: Duration, work: F) -> UnitHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let permits = self.permits.clone();

        let handle = tokio::spawn(async move {
            let permit = permits
                .acquire_owned()
                .await
                .map_err(|_| Error::internal("worker pool closed"))?;

            // The permit moves into the blocking task so the worker stays
            // occupied until the work really returns, even after a timeout.
            let blocking = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                work()
            });

            match tokio::time::timeout(limit, blocking).await {
                Ok(Ok(result)) => result,
                Ok(Err(join_error)) => Err(Error::unit_failure(join_error.to_string())),
                Err(_) => {
                    warn!(timeout_ms = limit.as_millis() as u64, "Unit timed out");
                    Err(Error::Timeout)
                }
            }
        });

        UnitHandle { handle }
    }
}

/// Handle to a submitted unit
#[derive(Debug)]
pub struct UnitHandle<T> {
    handle: JoinHandle<Result<T>>,
}

impl<T> UnitHandle<T> {
    /// Wait for the unit's result, its timeout, or its failure
    pub async fn join(self) -> Result<T> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(Error::unit_failure("unit cancelled")),
            Err(e) => Err(Error::unit_failure(e.to_string())),
        }
    }

    /// Stop waiting on the unit. Work already running on a worker is not
    /// interrupted, only abandoned.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
