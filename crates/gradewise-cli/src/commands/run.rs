//! The `gradewise run` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use gradewise_core::batch::{BatchConfig, BatchGrader, ProgressReporter};
use gradewise_core::config::load_config_from;
use gradewise_core::model::PeerScope;
use gradewise_core::parser;
use gradewise_core::report::BatchReport;
use gradewise_core::results::GradedSubmission;
use gradewise_report::html::write_html_report;

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_submission_start(&self, submission_id: &str, student: &str) {
        eprintln!("  Grading: {submission_id} ({student})");
    }

    fn on_submission_complete(&self, graded: &GradedSubmission) {
        eprintln!(
            "  Done: {} score {} risk {}{}",
            graded.submission_id,
            graded.result.score,
            graded.result.plagiarism_risk,
            if graded.flagged { " FLAGGED" } else { "" },
        );
    }

    fn on_submission_error(&self, submission_id: &str, error: &str) {
        eprintln!("  REJECTED: {submission_id}: {error}");
    }

    fn on_batch_complete(&self, total: usize, graded: usize, rejected: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {graded}/{total} graded, {rejected} rejected ({:.1}s)",
            elapsed.as_secs_f64()
        );
    }
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    assignment_set_path: PathBuf,
    output: Option<PathBuf>,
    format: String,
    parallelism: Option<usize>,
    peer_scope: Option<String>,
    risk_threshold: Option<u32>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut batch_config = BatchConfig::from(&config);
    if let Some(p) = parallelism {
        anyhow::ensure!(p >= 1, "parallelism must be at least 1");
        batch_config.parallelism = p;
    }
    if let Some(scope) = &peer_scope {
        batch_config.peer_scope = scope.parse::<PeerScope>().map_err(anyhow::Error::msg)?;
    }
    if let Some(threshold) = risk_threshold {
        anyhow::ensure!(threshold <= 100, "risk threshold must be between 0 and 100");
        batch_config.risk_threshold = threshold;
    }
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    let formats: Vec<&str> = if format == "all" {
        vec!["json", "html", "markdown"]
    } else {
        format.split(',').map(str::trim).collect()
    };
    for fmt in &formats {
        anyhow::ensure!(
            matches!(*fmt, "json" | "html" | "markdown"),
            "unknown format '{fmt}', expected json, html, markdown or all"
        );
    }

    let sets = parser::load_assignment_sets(&assignment_set_path)?;
    anyhow::ensure!(
        !sets.is_empty(),
        "no assignment sets found in {}",
        assignment_set_path.display()
    );
    tracing::debug!(
        "loaded {} assignment set(s) from {}",
        sets.len(),
        assignment_set_path.display()
    );

    let grader = BatchGrader::new(batch_config);
    let reporter = ConsoleReporter;

    for set in &sets {
        eprintln!(
            "gradewise v{}: grading {} submissions for '{}' (peers: {})",
            env!("CARGO_PKG_VERSION"),
            set.submissions.len(),
            set.assignment.title,
            grader.config().peer_scope
        );
        eprintln!();

        let report = grader.run(set, &reporter).await?;

        print_summary(&report);

        // Save outputs
        std::fs::create_dir_all(&output)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
        let stem = format!("{}-{timestamp}", set.assignment.id);

        for fmt in &formats {
            match *fmt {
                "json" => {
                    let path = output.join(format!("{stem}.json"));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("{stem}.html"));
                    write_html_report(&report, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                "markdown" => {
                    let path = output.join(format!("{stem}.md"));
                    std::fs::write(&path, report.to_markdown())?;
                    eprintln!("Markdown report: {}", path.display());
                }
                other => eprintln!("Unknown format: {other}"),
            }
        }
    }

    Ok(())
}

fn print_summary(report: &BatchReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Submission",
        "Student",
        "Score",
        "Risk",
        "Closest peer",
        "Summary",
    ]);

    for r in &report.results {
        let risk = if r.flagged {
            format!("{} !", r.result.plagiarism_risk)
        } else {
            r.result.plagiarism_risk.to_string()
        };
        table.add_row(vec![
            Cell::new(&r.submission_id),
            Cell::new(&r.student),
            Cell::new(format!("{}/{}", r.result.score, report.assignment.max_score)),
            Cell::new(risk),
            Cell::new(r.closest_peer.as_deref().unwrap_or("-")),
            Cell::new(&r.result.feedback_summary),
        ]);
    }

    eprintln!("\n{table}");

    let agg = &report.aggregate;
    eprintln!(
        "Mean score {:.1}/{} | median {:.1} | mean risk {:.1}% | flagged {} | rejected {}",
        agg.mean_score,
        report.assignment.max_score,
        agg.median_score,
        agg.mean_risk_percent,
        agg.flagged,
        report.failures.len()
    );
}
