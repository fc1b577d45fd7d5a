//! gradewise-report: Report rendering for graded batches.
//!
//! JSON and markdown output live on [`gradewise_core::report::BatchReport`];
//! this crate adds the self-contained HTML report.

pub mod html;
