//! gradewise-core: Submission evaluation engine, batch grading and scoring.
//!
//! The engine scores a text submission against a rule-based rubric and
//! estimates plagiarism risk as its highest TF-IDF cosine similarity to any
//! peer submission. Everything else in gradewise builds on this crate.

pub mod batch;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod results;
pub mod risk;
pub mod rubric;
pub mod similarity;
pub mod statistics;
pub mod text;
pub mod vector;

pub use engine::{evaluate, EngineConfig, Evaluator};
pub use results::EvaluationResult;
pub use risk::{compute_risk, PlagiarismRisk};
pub use similarity::cosine_similarity;
