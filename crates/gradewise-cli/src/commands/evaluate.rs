//! The `gradewise evaluate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use gradewise_core::config::load_config_from;
use gradewise_core::engine::Evaluator;

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Expand peer arguments into peer texts. A directory contributes every
/// `.txt` and `.md` file directly inside it, in name order.
fn load_peers(paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut peers = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut files = std::fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?
                .collect::<std::io::Result<Vec<_>>>()?
                .into_iter()
                .map(|e| e.path())
                .filter(|p| {
                    p.is_file()
                        && p.extension()
                            .is_some_and(|ext| ext == "txt" || ext == "md")
                })
                .collect::<Vec<_>>();
            files.sort();
            for file in &files {
                peers.push(read_text(file)?);
            }
        } else {
            peers.push(read_text(path)?);
        }
    }
    Ok(peers)
}

pub fn execute(
    content_path: PathBuf,
    description_path: PathBuf,
    peer_paths: Vec<PathBuf>,
    max_score: Option<u32>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        format == "text" || format == "json",
        "unknown format '{format}', expected text or json"
    );

    let config = load_config_from(config_path.as_deref())?;
    let content = read_text(&content_path)?;
    let description = read_text(&description_path)?;
    let peers = load_peers(&peer_paths)?;
    let max_score = max_score.unwrap_or(config.default_max_score);

    let evaluator = Evaluator::new(config.engine());
    let result = evaluator.evaluate(&content, &peers, &description, max_score);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Score: {}/{}", result.score, max_score);
        println!("Plagiarism risk: {} ({} peers)", result.plagiarism_risk, peers.len());
        println!("Summary: {}", result.feedback_summary);
        println!("Detail: {}", result.feedback_detail);
    }

    Ok(())
}
