//! Evaluation orchestrator.
//!
//! Composes plagiarism risk and rubric scoring into a single
//! [`EvaluationResult`]. Both halves are computed independently from the
//! inputs alone; nothing is retained between calls.

use serde::{Deserialize, Serialize};

use crate::results::EvaluationResult;
use crate::risk::{strongest_match, PeerMatch, PlagiarismRisk};
use crate::rubric::{self, Scorecard};
use crate::vector::IdfWeighting;

/// Tunables for the evaluation engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// IDF variant used when building term vectors.
    #[serde(default)]
    pub idf: IdfWeighting,
}

/// Full output of one evaluation, before it is reduced to the public record.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub result: EvaluationResult,
    pub scorecard: Scorecard,
    /// The most similar non-empty peer, if there was one.
    pub strongest_match: Option<PeerMatch>,
}

/// Stateless evaluator. Holds only immutable configuration, so a single
/// instance can be shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    config: EngineConfig,
}

impl Evaluator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Evaluate one submission against its peers and the assignment prompt.
    pub fn evaluate<S: AsRef<str>>(
        &self,
        content: &str,
        peers: &[S],
        description: &str,
        max_score: u32,
    ) -> EvaluationResult {
        self.evaluate_detailed(content, peers, description, max_score)
            .result
    }

    /// Like [`Evaluator::evaluate`], also returning the rubric findings and
    /// the closest peer.
    pub fn evaluate_detailed<S: AsRef<str>>(
        &self,
        content: &str,
        peers: &[S],
        description: &str,
        max_score: u32,
    ) -> Evaluation {
        let strongest = strongest_match(content, peers, self.config.idf);
        let plagiarism_risk = strongest
            .map(|m| m.risk())
            .unwrap_or(PlagiarismRisk::NONE);
        let scorecard = rubric::score(content, description, max_score);

        tracing::debug!(
            word_count = scorecard.word_count,
            peers = peers.len(),
            risk = %plagiarism_risk,
            score = scorecard.score,
            max_score,
            "evaluated submission"
        );

        Evaluation {
            result: EvaluationResult {
                score: scorecard.score,
                plagiarism_risk,
                feedback_summary: scorecard.feedback_summary.clone(),
                feedback_detail: scorecard.feedback_detail.clone(),
            },
            scorecard,
            strongest_match: strongest,
        }
    }
}

/// Evaluate a submission with the default engine configuration.
pub fn evaluate<S: AsRef<str>>(
    content: &str,
    peers: &[S],
    description: &str,
    max_score: u32,
) -> EvaluationResult {
    Evaluator::default().evaluate(content, peers, description, max_score)
}
