//! The `gradewise init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create gradewise.toml
    if std::path::Path::new("gradewise.toml").exists() {
        println!("gradewise.toml already exists, skipping.");
    } else {
        std::fs::write("gradewise.toml", SAMPLE_CONFIG)?;
        println!("Created gradewise.toml");
    }

    // Create example assignment set
    std::fs::create_dir_all("assignments")?;
    let example_path = std::path::Path::new("assignments/example.toml");
    if example_path.exists() {
        println!("assignments/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_ASSIGNMENT_SET)?;
        println!("Created assignments/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit gradewise.toml to tune grading");
    println!("  2. Run: gradewise validate --assignment-set assignments/example.toml");
    println!("  3. Run: gradewise run --assignment-set assignments/example.toml --format all");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# gradewise configuration

# IDF weighting for term vectors: "smoothed" or "raw"
idf = "smoothed"

# Peers each submission is compared against: "prior" (earlier hand-ins) or "all"
peer_scope = "prior"

# Flag submissions whose plagiarism risk reaches this percentage
risk_threshold = 50

parallelism = 4
default_max_score = 100
output_dir = "./gradewise-results"
"#;

const EXAMPLE_ASSIGNMENT_SET: &str = r#"[assignment]
id = "data-structures"
title = "Explain Data Structures"
description = """
Write a short essay explaining the difference between a stack and a queue. \
Include at least one example of each. Use clear sections and explain with depth.
"""
max_score = 100
due_date = "2025-03-01T23:59:00Z"

[[submissions]]
id = "alice-1"
student = "alice"
file_name = "alice.md"
submitted_at = "2025-02-27T10:15:00Z"
content = """
1. Stacks
A stack is a last in first out structure because elements are pushed and popped at the \
same end. For example, the undo history of an editor is a stack: the most recent change \
is the first one reverted.

2. Queues
A queue is a first in first out structure. Elements join at the back and leave from the \
front, for example a print queue sends documents to the printer in arrival order.

3. Difference
The difference between a stack and a queue is which element leaves next. A stack serves \
the newest element, a queue serves the oldest.
"""

[[submissions]]
id = "bob-1"
student = "bob"
submitted_at = "2025-02-28T09:00:00Z"
content = "Stacks and queues both store things."

[[submissions]]
id = "carol-1"
student = "carol"
submitted_at = "2025-03-01T20:30:00Z"
content = """
1. Stacks
A stack is a last in first out structure because elements are pushed and popped at the \
same end. For example, the undo history of an editor is a stack: the most recent change \
is the first one reverted.

2. Queues
A queue is a first in first out structure. Elements join at the back and leave from the \
front, for example a print queue sends documents to the printer in arrival order.
"""
"#;
