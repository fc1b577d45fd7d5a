//! TOML assignment set parser.
//!
//! Loads assignment sets (an assignment plus its submissions) from TOML files
//! and directories, and validates them.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::{default_max_score, Assignment, AssignmentSet, Submission};

/// Longest accepted assignment title, in characters.
pub const MAX_TITLE_LEN: usize = 200;

/// Highest accepted assignment score ceiling.
pub const MAX_SCORE_CEILING: u32 = 100;

/// Intermediate TOML structure for parsing assignment set files.
#[derive(Debug, Deserialize)]
struct TomlAssignmentFile {
    assignment: TomlAssignment,
    #[serde(default)]
    submissions: Vec<TomlSubmission>,
}

#[derive(Debug, Deserialize)]
struct TomlAssignment {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_max_score")]
    max_score: u32,
    #[serde(default)]
    due_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TomlSubmission {
    id: String,
    #[serde(default)]
    assignment_id: Option<String>,
    #[serde(default)]
    student: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    file_name: Option<String>,
    #[serde(default)]
    submitted_at: Option<String>,
}

fn parse_timestamp(value: Option<String>, field: &str) -> Result<Option<DateTime<Utc>>> {
    value
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .with_context(|| format!("invalid {field} timestamp: {raw}"))
        })
        .transpose()
}

/// Parse a single TOML file into an `AssignmentSet`.
pub fn parse_assignment_set(path: &Path) -> Result<AssignmentSet> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read assignment set file: {}", path.display()))?;

    parse_assignment_set_str(&content, path)
}

/// Parse a TOML string into an `AssignmentSet` (useful for testing).
pub fn parse_assignment_set_str(content: &str, source_path: &Path) -> Result<AssignmentSet> {
    let parsed: TomlAssignmentFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let assignment = Assignment {
        id: parsed.assignment.id,
        title: parsed.assignment.title,
        description: parsed.assignment.description,
        max_score: parsed.assignment.max_score,
        due_date: parse_timestamp(parsed.assignment.due_date, "due_date")?,
    };

    let submissions = parsed
        .submissions
        .into_iter()
        .map(|s| {
            let submitted_at = parse_timestamp(s.submitted_at, "submitted_at")
                .with_context(|| format!("submission {}", s.id))?;
            Ok(Submission {
                id: s.id,
                assignment_id: s.assignment_id,
                student: s.student,
                content: s.content,
                file_name: s.file_name,
                submitted_at,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AssignmentSet {
        assignment,
        submissions,
    })
}

/// Recursively load all `.toml` assignment set files from a directory.
pub fn load_assignment_directory(dir: &Path) -> Result<Vec<AssignmentSet>> {
    let mut sets = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            sets.extend(load_assignment_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_assignment_set(&path) {
                Ok(set) => sets.push(set),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(sets)
}

/// Load a single file, or every assignment set under a directory.
pub fn load_assignment_sets(path: &Path) -> Result<Vec<AssignmentSet>> {
    if path.is_dir() {
        load_assignment_directory(path)
    } else {
        Ok(vec![parse_assignment_set(path)?])
    }
}

/// A warning from assignment set validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The submission ID (if applicable).
    pub submission_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn assignment(message: impl Into<String>) -> Self {
        Self {
            submission_id: None,
            message: message.into(),
        }
    }

    fn submission(id: &str, message: impl Into<String>) -> Self {
        Self {
            submission_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Validate an assignment set for common issues.
pub fn validate_assignment_set(set: &AssignmentSet) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let assignment = &set.assignment;

    if assignment.title.trim().is_empty() {
        warnings.push(ValidationWarning::assignment("title is empty"));
    } else if assignment.title.chars().count() > MAX_TITLE_LEN {
        warnings.push(ValidationWarning::assignment(format!(
            "title is longer than {MAX_TITLE_LEN} characters"
        )));
    }

    if assignment.description.trim().is_empty() {
        warnings.push(ValidationWarning::assignment(
            "description is empty; the prompt-overlap rule will never fire",
        ));
    }

    if assignment.max_score > MAX_SCORE_CEILING {
        warnings.push(ValidationWarning::assignment(format!(
            "max_score {} exceeds {MAX_SCORE_CEILING}",
            assignment.max_score
        )));
    }

    // Check for duplicate submission IDs
    let mut seen_ids = std::collections::HashSet::new();
    for submission in &set.submissions {
        if !seen_ids.insert(&submission.id) {
            warnings.push(ValidationWarning::submission(
                &submission.id,
                format!("duplicate submission ID: {}", submission.id),
            ));
        }
    }

    for submission in &set.submissions {
        if submission.content.trim().is_empty() {
            warnings.push(ValidationWarning::submission(
                &submission.id,
                "content is empty",
            ));
        }
        if submission.student.trim().is_empty() {
            warnings.push(ValidationWarning::submission(
                &submission.id,
                "student is empty",
            ));
        }
        if let Some(target) = &submission.assignment_id {
            if target != &assignment.id {
                warnings.push(ValidationWarning::submission(
                    &submission.id,
                    format!(
                        "assignment_id '{target}' does not match assignment '{}'",
                        assignment.id
                    ),
                ));
            }
        }
    }

    warnings
}
