//! Batch grader.
//!
//! Grades every submission of an assignment set against its peers with
//! bounded parallelism. Evaluation is CPU-bound, so each one runs on a
//! blocking worker.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::config::GradewiseConfig;
use crate::engine::{EngineConfig, Evaluator};
use crate::error::SubmissionError;
use crate::model::{AssignmentSet, PeerScope, Submission};
use crate::report::{AssignmentSummary, BatchReport};
use crate::results::{GradedSubmission, SubmissionFailure};
use crate::statistics::compute_aggregate_stats;

/// Configuration for the batch grader.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub engine: EngineConfig,
    /// Maximum concurrent evaluations.
    pub parallelism: usize,
    pub peer_scope: PeerScope,
    /// Risk percentage at or above which a submission is flagged.
    pub risk_threshold: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            parallelism: 4,
            peer_scope: PeerScope::default(),
            risk_threshold: 50,
        }
    }
}

impl From<&GradewiseConfig> for BatchConfig {
    fn from(config: &GradewiseConfig) -> Self {
        Self {
            engine: config.engine(),
            parallelism: config.parallelism,
            peer_scope: config.peer_scope,
            risk_threshold: config.risk_threshold,
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_submission_start(&self, submission_id: &str, student: &str);
    fn on_submission_complete(&self, graded: &GradedSubmission);
    fn on_submission_error(&self, submission_id: &str, error: &str);
    fn on_batch_complete(&self, total: usize, graded: usize, rejected: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_submission_start(&self, _: &str, _: &str) {}
    fn on_submission_complete(&self, _: &GradedSubmission) {}
    fn on_submission_error(&self, _: &str, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// Check a submission the way it would have been checked on hand-in.
///
/// Whitespace-only content is accepted; the rubric scores it low.
pub fn check_submission(
    submission: &Submission,
    assignment_id: &str,
) -> std::result::Result<(), SubmissionError> {
    if submission.content.is_empty() {
        return Err(SubmissionError::EmptyContent {
            id: submission.id.clone(),
        });
    }
    if submission.student.trim().is_empty() {
        return Err(SubmissionError::MissingStudent {
            id: submission.id.clone(),
        });
    }
    if let Some(found) = &submission.assignment_id {
        if found != assignment_id {
            return Err(SubmissionError::AssignmentMismatch {
                id: submission.id.clone(),
                expected: assignment_id.to_string(),
                found: found.clone(),
            });
        }
    }
    Ok(())
}

/// Grades whole assignment sets.
pub struct BatchGrader {
    config: BatchConfig,
}

impl BatchGrader {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Grade every submission of `set`.
    ///
    /// Rejected submissions are recorded as failures and are never used as
    /// peers. Results come back in submission order.
    pub async fn run(
        &self,
        set: &AssignmentSet,
        progress: &dyn ProgressReporter,
    ) -> Result<BatchReport> {
        let start = Instant::now();
        let report_id = Uuid::new_v4();
        let assignment = &set.assignment;
        let semaphore = Arc::new(Semaphore::new(self.config.parallelism.max(1)));
        let evaluator = Evaluator::new(self.config.engine);
        let description: Arc<str> = Arc::from(assignment.description.as_str());
        // One shared copy of the submissions; tasks carry only peer indices.
        let submissions: Arc<[Submission]> = Arc::from(set.submissions.as_slice());

        tracing::info!(
            assignment = %assignment.id,
            submissions = set.submissions.len(),
            peer_scope = %self.config.peer_scope,
            "grading batch"
        );

        let checks: Vec<_> = set
            .submissions
            .iter()
            .map(|s| check_submission(s, &assignment.id))
            .collect();

        let mut failures = Vec::new();
        let mut futures = FuturesUnordered::new();

        for (index, (submission, check)) in set.submissions.iter().zip(&checks).enumerate() {
            if let Err(e) = check {
                tracing::error!("rejected {}: {e}", e.submission_id());
                progress.on_submission_error(e.submission_id(), &e.to_string());
                failures.push(SubmissionFailure {
                    submission_id: e.submission_id().to_string(),
                    error: e.to_string(),
                });
                continue;
            }

            let peer_indices: Vec<usize> = set
                .peers_of(index, self.config.peer_scope)
                .into_iter()
                .filter(|&i| checks[i].is_ok())
                .collect();

            let submissions = Arc::clone(&submissions);
            let description = Arc::clone(&description);
            let semaphore = Arc::clone(&semaphore);
            let max_score = assignment.max_score;
            let risk_threshold = self.config.risk_threshold;

            progress.on_submission_start(&submission.id, &submission.student);

            futures.push(async move {
                let ctx_id = submissions[index].id.clone();
                let inner = async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|_| anyhow::anyhow!("semaphore closed"))?;

                    tokio::task::spawn_blocking(move || {
                        grade_one(
                            &submissions,
                            index,
                            &peer_indices,
                            evaluator,
                            &description,
                            max_score,
                            risk_threshold,
                        )
                    })
                    .await
                    .map_err(|e| anyhow::anyhow!("evaluation task failed: {e}"))
                };
                (index, ctx_id, inner.await)
            });
        }

        let mut graded: Vec<(usize, GradedSubmission)> = Vec::new();
        while let Some((index, submission_id, result)) = futures.next().await {
            match result {
                Ok(g) => {
                    progress.on_submission_complete(&g);
                    graded.push((index, g));
                }
                Err(e) => {
                    tracing::error!("evaluation failed for {submission_id}: {e:#}");
                    progress.on_submission_error(&submission_id, &e.to_string());
                    failures.push(SubmissionFailure {
                        submission_id,
                        error: e.to_string(),
                    });
                }
            }
        }

        graded.sort_by_key(|(index, _)| *index);
        let results: Vec<GradedSubmission> = graded.into_iter().map(|(_, g)| g).collect();

        let elapsed = start.elapsed();
        progress.on_batch_complete(
            set.submissions.len(),
            results.len(),
            failures.len(),
            elapsed,
        );

        let aggregate = compute_aggregate_stats(&results, assignment.max_score);

        tracing::info!(
            assignment = %assignment.id,
            graded = results.len(),
            rejected = failures.len(),
            flagged = aggregate.flagged,
            elapsed_ms = elapsed.as_millis() as u64,
            "batch complete"
        );

        Ok(BatchReport {
            id: report_id,
            created_at: chrono::Utc::now(),
            assignment: AssignmentSummary {
                id: assignment.id.clone(),
                title: assignment.title.clone(),
                max_score: assignment.max_score,
                submission_count: set.submissions.len(),
            },
            peer_scope: self.config.peer_scope,
            risk_threshold: self.config.risk_threshold,
            results,
            failures,
            aggregate,
            duration_ms: elapsed.as_millis() as u64,
        })
    }
}

/// Evaluate `submissions[index]` against the submissions at `peer_indices`.
fn grade_one(
    submissions: &[Submission],
    index: usize,
    peer_indices: &[usize],
    evaluator: Evaluator,
    description: &str,
    max_score: u32,
    risk_threshold: u32,
) -> GradedSubmission {
    let submission = &submissions[index];
    let peers: Vec<&str> = peer_indices
        .iter()
        .map(|&i| submissions[i].content.as_str())
        .collect();

    let evaluation =
        evaluator.evaluate_detailed(&submission.content, &peers, description, max_score);

    let closest_peer = evaluation
        .strongest_match
        .filter(|m| m.similarity > 0.0)
        .and_then(|m| peer_indices.get(m.index))
        .map(|&i| submissions[i].id.clone());
    let flagged = evaluation.result.plagiarism_risk.percent() >= risk_threshold;

    GradedSubmission {
        submission_id: submission.id.clone(),
        student: submission.student.clone(),
        file_name: submission.file_name.clone(),
        word_count: evaluation.scorecard.word_count,
        findings: evaluation.scorecard.findings,
        result: evaluation.result,
        closest_peer,
        peers_compared: peer_indices.len(),
        flagged,
    }
}
