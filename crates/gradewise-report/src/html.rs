//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use gradewise_core::report::BatchReport;
use gradewise_core::results::GradedSubmission;

/// Number of bars in the score distribution chart.
const SCORE_BANDS: usize = 10;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a batch report.
pub fn generate_html(report: &BatchReport) -> String {
    let mut html = String::new();
    let agg = &report.aggregate;
    let max_score = report.assignment.max_score;

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>gradewise report: {}</title>\n",
        html_escape(&report.assignment.title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>gradewise report</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">Assignment: <strong>{}</strong> | {} submissions | peers: {} | {}</p>\n",
        html_escape(&report.assignment.title),
        report.assignment.submission_count,
        report.peer_scope,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Graded</th><th>Rejected</th><th>Mean score</th><th>Median</th><th>Range</th><th>Mean risk</th><th>Max risk</th><th>Flagged</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    html.push_str(&format!(
        "<tr><td>{}</td><td>{}</td><td>{:.1}/{}</td><td>{:.1}</td><td>{}-{}</td><td>{:.1}%</td><td>{}%</td><td>{} (risk &gt;= {}%)</td></tr>\n",
        agg.count,
        report.failures.len(),
        agg.mean_score,
        max_score,
        agg.median_score,
        agg.min_score,
        agg.max_score,
        agg.mean_risk_percent,
        agg.max_risk_percent,
        agg.flagged,
        report.risk_threshold,
    ));
    html.push_str("</tbody></table>\n");

    if !report.results.is_empty() {
        html.push_str("<h3>Score distribution</h3>\n");
        html.push_str(&generate_bar_chart(&report.results, max_score));
    }

    if !agg.rule_counts.is_empty() {
        html.push_str("<h3>Rubric findings</h3>\n");
        html.push_str("<table class=\"rules\">\n");
        html.push_str("<thead><tr><th>Rule</th><th>Submissions</th></tr></thead>\n<tbody>\n");
        for (rule, count) in &agg.rule_counts {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                html_escape(rule),
                count
            ));
        }
        html.push_str("</tbody></table>\n");
    }

    html.push_str("</section>\n");

    // Per-submission results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Submissions</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Submission</th><th onclick=\"sortTable(1)\">Student</th><th onclick=\"sortTable(2)\">Score</th><th onclick=\"sortTable(3)\">Risk</th><th onclick=\"sortTable(4)\">Closest peer</th><th onclick=\"sortTable(5)\">Words</th><th>Feedback</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for r in &report.results {
        let row_class = if r.flagged { "flagged" } else { "clean" };
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td data-value=\"{}\">{}/{}</td><td data-value=\"{}\">{}</td><td>{}</td><td data-value=\"{}\">{}</td><td title=\"{}\">{}</td></tr>\n",
            row_class,
            html_escape(&r.submission_id),
            html_escape(&r.student),
            r.result.score,
            r.result.score,
            max_score,
            r.result.plagiarism_risk.percent(),
            r.result.plagiarism_risk,
            html_escape(r.closest_peer.as_deref().unwrap_or("-")),
            r.word_count,
            r.word_count,
            html_escape(&r.result.feedback_detail),
            html_escape(&r.result.feedback_summary),
        ));
    }

    html.push_str("</tbody></table>\n");

    if !report.failures.is_empty() {
        html.push_str("<h3>Rejected</h3>\n<ul class=\"failures\">\n");
        for f in &report.failures {
            html.push_str(&format!(
                "<li><strong>{}</strong>: {}</li>\n",
                html_escape(&f.submission_id),
                html_escape(&f.error)
            ));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &BatchReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

/// Count scores into equal-width bands of the score ceiling. A perfect score
/// lands in the top band.
fn score_bands(results: &[GradedSubmission], max_score: u32) -> [usize; SCORE_BANDS] {
    let mut bands = [0usize; SCORE_BANDS];
    for r in results {
        let ratio = if max_score == 0 {
            0.0
        } else {
            f64::from(r.result.score) / f64::from(max_score)
        };
        let band = ((ratio * SCORE_BANDS as f64) as usize).min(SCORE_BANDS - 1);
        bands[band] += 1;
    }
    bands
}

fn generate_bar_chart(results: &[GradedSubmission], max_score: u32) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 120;

    let bands = score_bands(results, max_score);
    let tallest = bands.iter().copied().max().unwrap_or(0).max(1);
    let total_height = SCORE_BANDS * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    // Highest band on top.
    for (row, band) in (0..SCORE_BANDS).rev().enumerate() {
        let count = bands[band];
        let y = row * (bar_height + padding) + padding;
        let width = count * max_width / tallest;
        let low = band * 100 / SCORE_BANDS;
        let high = (band + 1) * 100 / SCORE_BANDS;

        let color = if band >= 8 {
            "#22c55e"
        } else if band >= 5 {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"13\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}-{}%</text>\n",
            label_width - 10,
            y + bar_height / 2,
            low,
            high
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            count
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --clean: #dcfce7; --flagged: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --clean: #064e3b; --flagged: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.clean { background: var(--clean); }
.flagged { background: var(--flagged); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function cellValue(row, col) {
  const cell = row.cells[col];
  return cell.dataset.value !== undefined ? Number(cell.dataset.value) : cell.textContent;
}
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = cellValue(a, col);
    const vb = cellValue(b, col);
    const cmp = typeof va === 'number' ? va - vb : String(va).localeCompare(String(vb));
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use gradewise_core::model::PeerScope;
    use gradewise_core::report::*;
    use gradewise_core::results::*;
    use gradewise_core::risk::PlagiarismRisk;
    use gradewise_core::statistics::compute_aggregate_stats;

    fn graded(id: &str, score: u32, risk: f64, flagged: bool) -> GradedSubmission {
        GradedSubmission {
            submission_id: id.into(),
            student: format!("student <{id}>"),
            file_name: None,
            result: EvaluationResult {
                score,
                plagiarism_risk: PlagiarismRisk::from_similarity(risk),
                feedback_summary: "Submission is too short for the assignment.".into(),
                feedback_detail: "Word count: 30. Score: 70/100.".into(),
            },
            word_count: 30,
            findings: vec!["too-short".into(), "off-prompt".into()],
            closest_peer: Some("s0".into()),
            peers_compared: 1,
            flagged,
        }
    }

    fn make_test_report() -> BatchReport {
        let results = vec![graded("s1", 70, 0.2, false), graded("s2", 100, 0.9, true)];
        let aggregate = compute_aggregate_stats(&results, 100);
        BatchReport {
            id: uuid::Uuid::nil(),
            created_at: chrono::Utc::now(),
            assignment: AssignmentSummary {
                id: "data-structures".into(),
                title: "Explain Data Structures".into(),
                max_score: 100,
                submission_count: 3,
            },
            peer_scope: PeerScope::Prior,
            risk_threshold: 50,
            results,
            failures: vec![SubmissionFailure {
                submission_id: "s3".into(),
                error: "submission s3 has empty content".into(),
            }],
            aggregate,
            duration_ms: 12,
        }
    }

    #[test]
    fn html_report_contains_required_elements() {
        let report = make_test_report();
        let html = generate_html(&report);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Explain Data Structures"));
        assert!(html.contains("<svg"));
        assert!(html.contains("class=\"flagged\""));
        assert!(html.contains("90%"));
        assert!(html.contains("too-short"));
        assert!(html.contains("submission s3 has empty content"));
    }

    #[test]
    fn html_escapes_user_text() {
        let html = generate_html(&make_test_report());
        assert!(html.contains("student &lt;s1&gt;"));
        assert!(!html.contains("student <s1>"));
    }

    #[test]
    fn perfect_score_lands_in_top_band() {
        let report = make_test_report();
        let bands = score_bands(&report.results, 100);
        assert_eq!(bands[9], 1);
        assert_eq!(bands[7], 1);
        assert_eq!(bands.iter().sum::<usize>(), 2);
        assert_eq!(score_bands(&report.results, 0)[0], 2);
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
