//! Bounded worker pool for blocking connection handlers.
//!
//! At most `size` jobs run at once, each on its own blocking thread. Jobs
//! submitted while the pool is saturated wait in FIFO order; submission
//! itself never blocks the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Notify, Semaphore};

struct Shared {
    permits: Semaphore,
    /// Jobs submitted and not yet finished
    pending: AtomicUsize,
    finished: Notify,
}

#[derive(Clone)]
pub struct WorkerPool {
    shared: Arc<Shared>,
    size: usize,
}

impl WorkerPool {
    /// Creates a pool of `size` workers; zero is treated as one.
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            shared: Arc::new(Shared {
                permits: Semaphore::new(size),
                pending: AtomicUsize::new(0),
                finished: Notify::new(),
            }),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Jobs queued or running.
    pub fn pending(&self) -> usize {
        self.shared.pending.load(Ordering::Acquire)
    }

    /// Queues `job` to run on the next free worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.pending.fetch_add(1, Ordering::AcqRel);
        let shared = Arc::clone(&self.shared);

        tokio::spawn(async move {
            match shared.permits.acquire().await {
                Ok(permit) => {
                    let outcome = tokio::task::spawn_blocking(job).await;
                    drop(permit);
                    if let Err(e) = outcome {
                        tracing::error!(error = %e, "Worker job panicked");
                    }
                }
                Err(_) => tracing::warn!("Worker pool closed, dropping job"),
            }

            if shared.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
                shared.finished.notify_waiters();
            }
        });
    }

    /// Waits until every job submitted so far has finished.
    pub async fn drain(&self) {
        loop {
            let notified = self.shared.finished.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}
