use std::{future::Future, pin::Pin};

use tokio::{sync::mpsc, task::JoinSet};
use tracing::{error, info, warn};

type BoxedJob = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'static>>;

struct Job {
    name: &'static str,
    future: BoxedJob,
}

/// Handle for fire-and-forget work that must outlive the request that
/// submitted it. Jobs run on a supervising worker which logs failures and
/// panics; submitters never observe the outcome.
#[derive(Clone)]
pub struct BackgroundTasks {
    tx: mpsc::UnboundedSender<Job>,
}

/// Receiving side of [`BackgroundTasks`]. [`TaskWorker::run`] returns once
/// every handle is dropped and all accepted jobs have finished.
pub struct TaskWorker {
    rx: mpsc::UnboundedReceiver<Job>,
}

impl BackgroundTasks {
    pub fn channel() -> (Self, TaskWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, TaskWorker { rx })
    }

    /// Starts the worker on the current runtime.
    pub fn spawn() -> (Self, tokio::task::JoinHandle<()>) {
        let (tasks, worker) = Self::channel();
        (tasks, tokio::spawn(worker.run()))
    }

    pub fn submit<F>(&self, name: &'static str, future: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let job = Job {
            name,
            future: Box::pin(future),
        };
        if self.tx.send(job).is_err() {
            warn!(job = name, "background worker stopped; job dropped");
        }
    }
}

impl TaskWorker {
    pub async fn run(mut self) {
        let mut running = JoinSet::new();

        loop {
            tokio::select! {
                next = self.rx.recv() => match next {
                    Some(job) => {
                        running.spawn(async move { (job.name, job.future.await) });
                    }
                    None => break,
                },
                Some(finished) = running.join_next(), if !running.is_empty() => {
                    report(finished);
                }
            }
        }

        while let Some(finished) = running.join_next().await {
            report(finished);
        }
        info!("background worker drained");
    }
}

fn report(finished: Result<(&'static str, anyhow::Result<()>), tokio::task::JoinError>) {
    match finished {
        Ok((_, Ok(()))) => {}
        Ok((name, Err(err))) => error!(job = name, error = %err, "background job failed"),
        Err(err) if err.is_panic() => error!(error = %err, "background job panicked"),
        Err(err) => warn!(error = %err, "background job cancelled"),
    }
}
