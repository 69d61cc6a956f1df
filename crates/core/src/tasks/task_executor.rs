use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use thiserror::Error;

use crate::pipeline::replace_background_use_case::ReplaceBackgroundUseCase;
use crate::shared::error::ErrorKind;
use crate::shared::settings::ExecutorSettings;

use super::domain::task::{TaskId, TaskRequest, TaskResult, TaskStatus};
use super::domain::task_store::TaskStore;

/// Builds a fresh, single-use pipeline for each task.
pub trait PipelineFactory: Send + Sync {
    fn build(
        &self,
        task_id: &TaskId,
        store: Arc<dyn TaskStore>,
        cancelled: Arc<AtomicBool>,
    ) -> ReplaceBackgroundUseCase;
}

#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("task {0} already exists")]
    DuplicateTask(TaskId),
    #[error("executor is saturated ({capacity} tasks queued)")]
    Saturated { capacity: usize },
    #[error("executor is shut down")]
    ShutDown,
}

struct Job {
    request: TaskRequest,
    cancelled: Arc<AtomicBool>,
}

type CancelFlags = Arc<Mutex<HashMap<TaskId, Arc<AtomicBool>>>>;

/// Runs background-replacement tasks on a fixed pool of worker threads.
///
/// `start` only validates and enqueues; the caller follows the task through
/// the shared `TaskStore`. A full queue rejects new work instead of
/// spawning more threads.
pub struct TaskExecutor {
    store: Arc<dyn TaskStore>,
    queue: Option<Sender<Job>>,
    queue_capacity: usize,
    workers: Vec<JoinHandle<()>>,
    /// Flags of queued and running tasks. Also serializes submissions.
    cancel_flags: CancelFlags,
}

impl TaskExecutor {
    pub fn new(
        settings: &ExecutorSettings,
        store: Arc<dyn TaskStore>,
        factory: Arc<dyn PipelineFactory>,
    ) -> Self {
        let worker_count = settings.workers.max(1);
        let queue_capacity = settings.queue_capacity.max(1);
        let (tx, rx) = crossbeam_channel::bounded::<Job>(queue_capacity);
        let cancel_flags: CancelFlags = Arc::new(Mutex::new(HashMap::new()));

        let workers = (0..worker_count)
            .map(|n| {
                spawn_worker(
                    n,
                    rx.clone(),
                    store.clone(),
                    factory.clone(),
                    cancel_flags.clone(),
                )
            })
            .collect();

        log::debug!("Task executor started: {worker_count} workers, queue {queue_capacity}");

        Self {
            store,
            queue: Some(tx),
            queue_capacity,
            workers,
            cancel_flags,
        }
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Queues a task and returns immediately.
    pub fn start(&self, request: TaskRequest) -> Result<(), SubmitError> {
        request.validate().map_err(SubmitError::InvalidRequest)?;
        let queue = self.queue.as_ref().ok_or(SubmitError::ShutDown)?;

        let mut flags = self
            .cancel_flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = request.task_id.clone();
        if flags.contains_key(&id) || self.store.status(&id) != TaskStatus::Unknown {
            return Err(SubmitError::DuplicateTask(id));
        }

        let cancelled = Arc::new(AtomicBool::new(false));
        let job = Job {
            request,
            cancelled: cancelled.clone(),
        };
        match queue.try_send(job) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                return Err(SubmitError::Saturated {
                    capacity: self.queue_capacity,
                })
            }
            Err(TrySendError::Disconnected(_)) => return Err(SubmitError::ShutDown),
        }

        self.store.register(&id);
        flags.insert(id.clone(), cancelled);
        log::info!("Task {id} queued");
        Ok(())
    }

    /// Asks a queued or running task to stop. Returns `false` if the task is
    /// unknown or already finished.
    pub fn cancel(&self, id: &TaskId) -> bool {
        let flags = self
            .cancel_flags
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match flags.get(id) {
            Some(flag) => {
                flag.store(true, Ordering::Relaxed);
                log::info!("Task {id} cancellation requested");
                true
            }
            None => false,
        }
    }

    /// Stops accepting work, lets queued and running tasks finish, and joins
    /// the workers. Safe to call more than once.
    pub fn shutdown(&mut self) {
        if self.queue.take().is_none() {
            return;
        }
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::error!("Task worker panicked outside a task");
            }
        }
        log::debug!("Task executor stopped");
    }
}

impl Drop for TaskExecutor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_worker(
    n: usize,
    jobs: Receiver<Job>,
    store: Arc<dyn TaskStore>,
    factory: Arc<dyn PipelineFactory>,
    cancel_flags: CancelFlags,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for job in jobs {
            log::debug!("Worker {n} picked up task {}", job.request.task_id);
            run_job(&job, &store, factory.as_ref());
            cancel_flags
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&job.request.task_id);
        }
    })
}

fn run_job(job: &Job, store: &Arc<dyn TaskStore>, factory: &dyn PipelineFactory) {
    let id = &job.request.task_id;

    if job.cancelled.load(Ordering::Relaxed) {
        log::info!("Task {id} cancelled before it started");
        store.set_result(id, TaskResult::Cancelled);
        return;
    }

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        factory
            .build(id, store.clone(), job.cancelled.clone())
            .execute(&job.request)
    }));

    if outcome.is_err() {
        log::error!("Task {id}: pipeline panicked");
        store.set_result(
            id,
            TaskResult::Failure {
                kind: ErrorKind::Processing,
                description: "pipeline panicked".into(),
            },
        );
    }
}
