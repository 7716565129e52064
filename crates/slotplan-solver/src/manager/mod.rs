//! Background solve jobs.
//!
//! [`SolverManager`] owns a validated [`SolverConfig`] and runs each
//! submitted schedule on its own thread. Every new best solution is sent to
//! the caller over an unbounded channel, and a job can be stopped early
//! through its id.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slotplan_config::SolverConfig;
use slotplan_core::{Schedule, SlotPlanError};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{info, warn};

use crate::solver::{SolveResult, Solver};
use crate::SearchScore;

#[cfg(test)]
mod tests;

/// Identifier of a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Solving,
    Completed,
    /// Stopped through [`SolverManager::terminate_early`].
    TerminatedEarly,
    Failed,
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        !matches!(self, JobStatus::Solving)
    }
}

/// A new best solution of a running job.
#[derive(Debug, Clone)]
pub struct BestSolutionUpdate {
    pub job_id: JobId,
    pub schedule: Schedule,
    pub score: SearchScore,
    pub elapsed: Duration,
}

struct Job {
    terminate: Arc<AtomicBool>,
    status: Arc<Mutex<JobStatus>>,
    handle: JoinHandle<Result<SolveResult, SlotPlanError>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs solves in the background.
///
/// ```
/// use slotplan_config::SolverConfig;
/// use slotplan_solver::SolverManager;
/// use slotplan_test::scenarios;
///
/// let manager = SolverManager::new(SolverConfig::default_preset(1)).unwrap();
/// let (id, mut updates) = manager.solve(scenarios::over_subscribed_day()).unwrap();
///
/// let result = manager.join(id).unwrap();
/// assert_eq!(result.unassigned, 0);
/// assert_eq!(manager.status(id), None);
/// assert_eq!(manager.job_count(), 0);
/// assert!(updates.try_recv().is_ok());
/// ```
pub struct SolverManager {
    config: SolverConfig,
    seeds: Mutex<Option<ChaCha8Rng>>,
    jobs: Mutex<HashMap<JobId, Job>>,
    next_id: AtomicU64,
}

impl fmt::Debug for SolverManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolverManager")
            .field("config", &self.config)
            .field("jobs", &lock(&self.jobs).len())
            .finish()
    }
}

impl SolverManager {
    /// Creates a manager for `config`.
    ///
    /// With a configured random seed, each job gets its own seed drawn from
    /// a generator seeded with it, so a sequence of jobs is reproducible.
    pub fn new(config: SolverConfig) -> Result<Self, SlotPlanError> {
        config
            .validate()
            .map_err(|e| SlotPlanError::Config(e.to_string()))?;
        let seeds = config.random_seed.map(ChaCha8Rng::seed_from_u64);
        Ok(Self {
            config,
            seeds: Mutex::new(seeds),
            jobs: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Starts solving `schedule` on a new thread.
    ///
    /// Returns the job id and a receiver of best solution updates. The
    /// channel closes when the job finishes.
    pub fn solve(
        &self,
        schedule: Schedule,
    ) -> Result<(JobId, UnboundedReceiver<BestSolutionUpdate>), SlotPlanError> {
        let job_id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut solver = Solver::from_config(&self.config)?;
        if let Some(seeds) = lock(&self.seeds).as_mut() {
            solver = solver.with_random_seed(seeds.next_u64());
        }

        let terminate = Arc::new(AtomicBool::new(false));
        let status = Arc::new(Mutex::new(JobStatus::Solving));
        let (sender, receiver) = unbounded_channel();

        let solver = solver
            .with_terminate_early_flag(Arc::clone(&terminate))
            .with_best_solution_listener(move |event| {
                // A dropped receiver only means nobody is listening.
                let _ = sender.send(BestSolutionUpdate {
                    job_id,
                    schedule: event.schedule.clone(),
                    score: event.score,
                    elapsed: event.elapsed,
                });
            });

        let job_status = Arc::clone(&status);
        let handle = std::thread::Builder::new()
            .name(format!("slotplan-{job_id}"))
            .spawn(move || {
                info!(event = "job_start", job = %job_id);
                let result = solver.solve(schedule);
                let finished = match &result {
                    Ok(r) if r.terminated_early => JobStatus::TerminatedEarly,
                    Ok(_) => JobStatus::Completed,
                    Err(_) => JobStatus::Failed,
                };
                *lock(&job_status) = finished;
                match &result {
                    Ok(r) => info!(event = "job_end", job = %job_id, status = ?finished, score = %r.score),
                    Err(e) => warn!(event = "job_end", job = %job_id, status = ?finished, error = %e),
                }
                result
            })
            .map_err(|e| SlotPlanError::Internal(format!("failed to spawn {job_id}: {e}")))?;

        lock(&self.jobs).insert(
            job_id,
            Job {
                terminate,
                status,
                handle,
            },
        );
        Ok((job_id, receiver))
    }

    /// Asks a job to stop at its next check.
    ///
    /// Returns false for unknown or finished jobs.
    pub fn terminate_early(&self, job_id: JobId) -> bool {
        let jobs = lock(&self.jobs);
        match jobs.get(&job_id) {
            Some(job) if !lock(&job.status).is_finished() => {
                job.terminate.store(true, Ordering::SeqCst);
                true
            }
            _ => false,
        }
    }

    pub fn status(&self, job_id: JobId) -> Option<JobStatus> {
        lock(&self.jobs).get(&job_id).map(|job| *lock(&job.status))
    }

    /// Jobs not yet joined, finished or not.
    pub fn job_count(&self) -> usize {
        lock(&self.jobs).len()
    }

    /// Jobs still solving.
    pub fn active_job_count(&self) -> usize {
        lock(&self.jobs)
            .values()
            .filter(|job| !lock(&job.status).is_finished())
            .count()
    }

    /// Waits for a job and returns its result.
    ///
    /// A job can be joined once. Joining forgets it, so its status is no
    /// longer reported afterwards.
    pub fn join(&self, job_id: JobId) -> Result<SolveResult, SlotPlanError> {
        let job = lock(&self.jobs).remove(&job_id).ok_or_else(|| {
            SlotPlanError::InvalidState(format!("{job_id} is unknown or already joined"))
        })?;

        match job.handle.join() {
            Ok(result) => result,
            Err(_) => Err(SlotPlanError::Internal(format!("{job_id} panicked"))),
        }
    }
}
