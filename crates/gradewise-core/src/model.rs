//! Assignment and submission data model.
//!
//! These are the inputs the batch grader hands to the evaluation engine:
//! an assignment prompt plus the submissions received for it.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An assignment that submissions are graded against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique identifier.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// The grading prompt. Its vocabulary drives the prompt-overlap rule.
    pub description: String,
    /// Score ceiling.
    #[serde(default = "default_max_score")]
    pub max_score: u32,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

pub(crate) fn default_max_score() -> u32 {
    100
}

/// One student's plain-text submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    /// Unique identifier within its assignment set.
    pub id: String,
    /// Assignment this submission claims to answer. Defaults to the
    /// enclosing set's assignment when omitted.
    #[serde(default)]
    pub assignment_id: Option<String>,
    /// Student identifier or name.
    pub student: String,
    /// Extracted text of the submission.
    pub content: String,
    /// Original file the text was extracted from.
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

/// An assignment together with the submissions received for it, in
/// arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentSet {
    pub assignment: Assignment,
    #[serde(default)]
    pub submissions: Vec<Submission>,
}

/// Which other submissions a submission is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerScope {
    /// Only submissions that arrived earlier, as when each submission is
    /// graded the moment it is handed in.
    #[default]
    Prior,
    /// Every other submission of the assignment.
    All,
}

impl fmt::Display for PeerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerScope::Prior => write!(f, "prior"),
            PeerScope::All => write!(f, "all"),
        }
    }
}

impl FromStr for PeerScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "prior" | "earlier" => Ok(PeerScope::Prior),
            "all" => Ok(PeerScope::All),
            other => Err(format!("unknown peer scope: {other}")),
        }
    }
}

impl AssignmentSet {
    /// Indices of the peers of the submission at `index`. Empty contents
    /// are skipped.
    pub fn peers_of(&self, index: usize, scope: PeerScope) -> Vec<usize> {
        let end = match scope {
            PeerScope::Prior => index.min(self.submissions.len()),
            PeerScope::All => self.submissions.len(),
        };
        (0..end)
            .filter(|&i| i != index && !self.submissions[i].content.trim().is_empty())
            .collect()
    }
}
