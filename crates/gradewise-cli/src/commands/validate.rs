//! The `gradewise validate` command.

use std::path::PathBuf;

use anyhow::Result;

use gradewise_core::parser;

pub fn execute(assignment_set_path: PathBuf) -> Result<()> {
    let sets = parser::load_assignment_sets(&assignment_set_path)?;
    anyhow::ensure!(
        !sets.is_empty(),
        "no assignment sets found in {}",
        assignment_set_path.display()
    );

    let mut total_warnings = 0;

    for set in &sets {
        println!(
            "Assignment: {} ({} submissions)",
            set.assignment.title,
            set.submissions.len()
        );

        let warnings = parser::validate_assignment_set(set);
        for w in &warnings {
            let prefix = w
                .submission_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All assignment sets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
