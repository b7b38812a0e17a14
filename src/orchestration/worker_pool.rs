//! Fixed-width worker pool
//!
//! `width` workers pull jobs from one bounded queue. A worker takes the next
//! job only after finishing the previous one, so at most `width` jobs run at
//! any time. Producers block on a full queue. Each job runs in its own task;
//! a panicking job loses only its own result.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;

/// Pool of `width` workers draining a bounded queue
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    width: usize,
}

impl Default for WorkerPool {
    fn default() -> Self {
        Self::new(crate::core::config::default_workers())
    }
}

impl WorkerPool {
    /// Create a pool; a width of 0 is raised to 1
    pub fn new(width: usize) -> Self {
        Self {
            width: width.max(1),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Bounded queue sized for this pool
    pub fn queue<T>(&self) -> (mpsc::Sender<T>, mpsc::Receiver<T>) {
        mpsc::channel(self.width)
    }

    /// Run `handler` on every job received from `queue` until it closes
    ///
    /// Results are returned in completion order, grouped per worker.
    pub async fn run<T, R, F, Fut>(&self, queue: mpsc::Receiver<T>, handler: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let queue = Arc::new(Mutex::new(queue));
        let handler = Arc::new(handler);
        let mut workers = JoinSet::new();

        for worker_id in 0..self.width {
            let queue = Arc::clone(&queue);
            let handler = Arc::clone(&handler);

            workers.spawn(async move {
                let mut results = Vec::new();
                loop {
                    let next = queue.lock().await.recv().await;
                    let Some(job) = next else { break };
                    match tokio::spawn((*handler)(job)).await {
                        Ok(result) => results.push(result),
                        Err(e) => tracing::error!(worker_id, error = %e, "job aborted"),
                    }
                }
                tracing::trace!(worker_id, processed = results.len(), "worker finished");
                results
            });
        }

        let mut collected = Vec::new();
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(mut results) => collected.append(&mut results),
                Err(e) => tracing::error!(error = %e, "worker task aborted"),
            }
        }
        collected
    }

    /// Feed `jobs` through the pool and wait for all of them
    pub async fn run_all<I, T, R, F, Fut>(&self, jobs: I, handler: F) -> Vec<R>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'static,
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        let (sender, receiver) = self.queue();
        let jobs = jobs.into_iter();

        let feeder = tokio::spawn(async move {
            for job in jobs {
                if sender.send(job).await.is_err() {
                    break;
                }
            }
        });

        let results = self.run(receiver, handler).await;
        if let Err(e) = feeder.await {
            tracing::error!(error = %e, "job feeder aborted");
        }
        results
    }
}
