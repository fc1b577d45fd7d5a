//! Batch report types with JSON persistence and a markdown summary.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::PeerScope;
use crate::results::{GradedSubmission, SubmissionFailure};
use crate::statistics::AggregateStats;

/// A complete grading report for one assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the assignment.
    pub assignment: AssignmentSummary,
    /// Peer scope the batch was graded with.
    pub peer_scope: PeerScope,
    /// Risk percentage at or above which submissions were flagged.
    pub risk_threshold: u32,
    /// Graded submissions, in submission order.
    pub results: Vec<GradedSubmission>,
    /// Submissions rejected before evaluation.
    #[serde(default)]
    pub failures: Vec<SubmissionFailure>,
    /// Aggregate statistics.
    pub aggregate: AggregateStats,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: u64,
}

/// Summary of an assignment (without its submissions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentSummary {
    pub id: String,
    pub title: String,
    pub max_score: u32,
    pub submission_count: usize,
}

impl BatchReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: BatchReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Submissions flagged for plagiarism review, highest risk first.
    pub fn flagged(&self) -> Vec<&GradedSubmission> {
        let mut flagged: Vec<&GradedSubmission> =
            self.results.iter().filter(|r| r.flagged).collect();
        flagged.sort_by(|a, b| b.result.plagiarism_risk.cmp(&a.result.plagiarism_risk));
        flagged
    }

    /// Format the report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();
        let agg = &self.aggregate;

        md.push_str(&format!("## {}\n\n", self.assignment.title));
        md.push_str(&format!(
            "**Summary:** {} graded, {} rejected, {} flagged (risk >= {}%)\n\n",
            agg.count,
            self.failures.len(),
            agg.flagged,
            self.risk_threshold
        ));
        md.push_str(&format!(
            "Mean score {:.1}/{} (median {:.1}, range {}-{}), mean risk {:.1}%, max risk {}%\n\n",
            agg.mean_score,
            self.assignment.max_score,
            agg.median_score,
            agg.min_score,
            agg.max_score,
            agg.mean_risk_percent,
            agg.max_risk_percent
        ));

        if !self.results.is_empty() {
            md.push_str("### Submissions\n\n");
            md.push_str("| Submission | Student | Score | Risk | Closest peer | Summary |\n");
            md.push_str("|------------|---------|-------|------|--------------|---------|\n");
            for r in &self.results {
                md.push_str(&format!(
                    "| {}{} | {} | {}/{} | {} | {} | {} |\n",
                    md_cell(&r.submission_id),
                    if r.flagged { " ⚠" } else { "" },
                    md_cell(&r.student),
                    r.result.score,
                    self.assignment.max_score,
                    r.result.plagiarism_risk,
                    md_cell(r.closest_peer.as_deref().unwrap_or("-")),
                    md_cell(&r.result.feedback_summary)
                ));
            }
            md.push('\n');
        }

        if !agg.rule_counts.is_empty() {
            md.push_str("### Rubric findings\n\n");
            md.push_str("| Rule | Submissions |\n");
            md.push_str("|------|-------------|\n");
            for (rule, count) in &agg.rule_counts {
                md.push_str(&format!("| {} | {count} |\n", md_cell(rule)));
            }
            md.push('\n');
        }

        if !self.failures.is_empty() {
            md.push_str("### Rejected\n\n");
            for f in &self.failures {
                md.push_str(&format!("- {}: {}\n", f.submission_id, f.error));
            }
        }

        md
    }
}

/// Make `s` safe inside a markdown table cell.
fn md_cell(s: &str) -> String {
    s.replace('|', "\\|").replace(['\r', '\n'], " ")
}
