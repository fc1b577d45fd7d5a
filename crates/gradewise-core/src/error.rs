//! Submission error types.
//!
//! The evaluation engine itself never fails. These errors describe
//! submissions that the batch grader refuses to evaluate because they would
//! not have been accepted in the first place.

use thiserror::Error;

/// Reasons a submission is rejected before evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// The submission has no text.
    #[error("submission {id} has empty content")]
    EmptyContent { id: String },

    /// The submission does not name a student.
    #[error("submission {id} has no student")]
    MissingStudent { id: String },

    /// The submission answers a different assignment.
    #[error("submission {id} targets assignment '{found}', expected '{expected}'")]
    AssignmentMismatch {
        id: String,
        expected: String,
        found: String,
    },
}

impl SubmissionError {
    /// Id of the offending submission.
    pub fn submission_id(&self) -> &str {
        match self {
            SubmissionError::EmptyContent { id }
            | SubmissionError::MissingStudent { id }
            | SubmissionError::AssignmentMismatch { id, .. } => id,
        }
    }
}
