//! Evaluation result types.

use serde::{Deserialize, Serialize};

use crate::risk::PlagiarismRisk;

/// The record returned for one evaluated submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Rubric score in `[0, max_score]`.
    pub score: u32,
    /// Highest similarity to any peer, e.g. `"42%"`.
    pub plagiarism_risk: PlagiarismRisk,
    /// The single most important piece of feedback.
    pub feedback_summary: String,
    /// Every message that fired, followed by the word count and score.
    pub feedback_detail: String,
}

/// A submission graded as part of a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradedSubmission {
    pub submission_id: String,
    pub student: String,
    #[serde(default)]
    pub file_name: Option<String>,
    /// The engine's result.
    pub result: EvaluationResult,
    pub word_count: usize,
    /// Rubric rule ids that fired, in rubric order.
    #[serde(default)]
    pub findings: Vec<String>,
    /// Id of the most similar peer, if any peer shared vocabulary.
    #[serde(default)]
    pub closest_peer: Option<String>,
    /// Number of non-empty peers compared against.
    pub peers_compared: usize,
    /// Risk reached the configured threshold.
    pub flagged: bool,
}

/// A submission that was rejected before evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionFailure {
    pub submission_id: String,
    pub error: String,
}
