//! Batch job tracking.
//!
//! A batch is created synchronously before its remote call is issued and
//! settled in a single `reconcile` call once the call returns, so observers
//! never see a half-settled batch.

use std::collections::HashMap;

use thiserror::Error;

pub type JobId = u64;
pub type BatchId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JobFailure {
    /// The remote operation reported this item as failed.
    #[error("{0}")]
    Item(String),
    /// The response did not mention this item.
    #[error("missing from response")]
    MissingOutcome,
    /// The whole request failed before any per-item result was known.
    #[error("{0}")]
    Batch(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    Failure(JobFailure),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: JobId,
    pub batch: BatchId,
    pub label: String,
    pub identity: String,
    pub state: JobState,
    pub outcome: Option<JobOutcome>,
}

/// A work item handed to `submit_batch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem {
    pub identity: String,
    pub label: String,
}

impl BatchItem {
    pub fn new(identity: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            label: label.into(),
        }
    }
}

/// Per-item result returned by a remote batch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub identity: String,
    pub result: Result<(), String>,
}

impl ItemOutcome {
    pub fn success(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            result: Ok(()),
        }
    }

    pub fn failure(identity: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            result: Err(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl Progress {
    /// Rounded percentage; an empty set is 0%.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let pct = (self.done as f64 / self.total as f64 * 100.0).round();
        pct.clamp(0.0, 100.0) as u8
    }
}

/// Counts of what a reconcile call did to its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReconcileReport {
    pub succeeded: usize,
    pub failed: usize,
    pub missing: usize,
}

/// Append-only job history shared by every batch action until cleared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JobQueue {
    jobs: Vec<Job>,
    next_job_id: JobId,
    next_batch_id: BatchId,
}

impl JobQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn batch_jobs(&self, batch: BatchId) -> impl Iterator<Item = &Job> {
        self.jobs.iter().filter(move |job| job.batch == batch)
    }

    /// Creates one pending job per item, in order, and returns the batch id.
    pub fn submit_batch(&mut self, items: impl IntoIterator<Item = BatchItem>) -> BatchId {
        self.next_batch_id += 1;
        let batch = self.next_batch_id;
        for item in items {
            self.next_job_id += 1;
            self.jobs.push(Job {
                id: self.next_job_id,
                batch,
                label: item.label,
                identity: item.identity,
                state: JobState::Pending,
                outcome: None,
            });
        }
        batch
    }

    /// Settles every pending job of `batch`.
    ///
    /// `Ok` outcomes are matched to jobs by exact identity; jobs with no
    /// outcome fail with [`JobFailure::MissingOutcome`]. `Err` fails the
    /// whole batch with the carried detail. Unknown or already-settled
    /// batches are left alone.
    pub fn reconcile(
        &mut self,
        batch: BatchId,
        response: Result<Vec<ItemOutcome>, String>,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        match response {
            Ok(outcomes) => {
                let mut by_identity: HashMap<&str, &Result<(), String>> =
                    HashMap::with_capacity(outcomes.len());
                for outcome in &outcomes {
                    by_identity
                        .entry(outcome.identity.as_str())
                        .or_insert(&outcome.result);
                }
                for job in self.pending_in(batch) {
                    let outcome = match by_identity.get(job.identity.as_str()) {
                        Some(Ok(())) => {
                            report.succeeded += 1;
                            JobOutcome::Success
                        }
                        Some(Err(reason)) => {
                            report.failed += 1;
                            JobOutcome::Failure(JobFailure::Item(reason.clone()))
                        }
                        None => {
                            report.missing += 1;
                            JobOutcome::Failure(JobFailure::MissingOutcome)
                        }
                    };
                    job.state = JobState::Done;
                    job.outcome = Some(outcome);
                }
            }
            Err(detail) => {
                for job in self.pending_in(batch) {
                    report.failed += 1;
                    job.state = JobState::Done;
                    job.outcome = Some(JobOutcome::Failure(JobFailure::Batch(detail.clone())));
                }
            }
        }
        report
    }

    /// Settles a batch whose remote call reports a single result for all
    /// of its items.
    pub fn complete(&mut self, batch: BatchId, result: Result<(), String>) -> ReconcileReport {
        let response = result.map(|()| {
            self.batch_jobs(batch)
                .map(|job| ItemOutcome::success(job.identity.clone()))
                .collect()
        });
        self.reconcile(batch, response)
    }

    pub fn progress(&self, batch: BatchId) -> Progress {
        Self::count(self.batch_jobs(batch))
    }

    pub fn overall_progress(&self) -> Progress {
        Self::count(self.jobs.iter())
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
    }

    fn pending_in(&mut self, batch: BatchId) -> impl Iterator<Item = &mut Job> {
        self.jobs
            .iter_mut()
            .filter(move |job| job.batch == batch && job.state == JobState::Pending)
    }

    fn count<'a>(jobs: impl Iterator<Item = &'a Job>) -> Progress {
        jobs.fold(Progress::default(), |mut progress, job| {
            progress.total += 1;
            if job.state == JobState::Done {
                progress.done += 1;
            }
            progress
        })
    }
}
