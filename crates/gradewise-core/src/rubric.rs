//! Rule-based rubric scoring.
//!
//! The rubric is an ordered table of [`Rule`]s evaluated against [`Signals`]
//! extracted once from the submission and the assignment description. Every
//! rule that applies contributes its deduction; order only decides which
//! message becomes the feedback summary.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text::{tokenize, vocabulary};

/// Terms whose presence signals explanatory depth.
pub const DEPTH_TERMS: [&str; 7] = [
    "because",
    "therefore",
    "however",
    "example",
    "explain",
    "reason",
    "detail",
];

/// Summary used when no rule fired at all.
pub const DEFAULT_SUMMARY: &str = "Submission meets basic requirements.";

static NUMBERED_OR_BULLETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)[0-9]+[.)]\s|^\s*[-*]\s").expect("valid structure regex")
});

/// Whether a rule deducts points or only adds praise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Issue,
    Positive,
}

/// Measurements a rule predicate can look at.
#[derive(Debug, Clone, PartialEq)]
pub struct Signals {
    /// Number of tokens in the submission.
    pub word_count: usize,
    /// Distinct tokens of the assignment description.
    pub description_vocabulary: usize,
    /// Share of the description vocabulary that also appears in the submission.
    pub overlap_ratio: f64,
    /// Numbered lists, bullets, or section wording.
    pub has_structure: bool,
    /// Tokens loosely matching one of [`DEPTH_TERMS`].
    pub depth_count: usize,
}

impl Signals {
    pub fn extract(content: &str, description: &str) -> Self {
        let words = tokenize(content);
        let content_vocab: HashSet<&str> = words.iter().map(String::as_str).collect();
        let description_vocab = vocabulary(description);

        let overlap = description_vocab
            .iter()
            .filter(|w| content_vocab.contains(w.as_str()))
            .count();
        let overlap_ratio = if description_vocab.is_empty() {
            0.0
        } else {
            overlap as f64 / description_vocab.len() as f64
        };

        Signals {
            word_count: words.len(),
            description_vocabulary: description_vocab.len(),
            overlap_ratio,
            has_structure: has_structure(content),
            depth_count: words.iter().filter(|w| is_depth_term(w)).count(),
        }
    }
}

/// Numbered items (`1. ` / `2) `), lines opening with `-` or `*`, or the
/// words "section", "first", "second" anywhere in the text.
pub fn has_structure(content: &str) -> bool {
    if NUMBERED_OR_BULLETED.is_match(content) {
        return true;
    }
    let lowered = content.to_lowercase();
    ["section", "first", "second"]
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Two-way substring match against [`DEPTH_TERMS`].
///
/// NOTE: the reverse direction also counts short tokens that merely occur
/// inside a depth term ("the", "on", "so", "be"), which inflates the count
/// for almost any prose. Likely an over-match, but the intended rule is
/// unknown so the behavior is left unchanged.
pub fn is_depth_term(token: &str) -> bool {
    DEPTH_TERMS
        .iter()
        .any(|term| token.contains(term) || term.contains(token))
}

/// One heuristic in the rubric table.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Stable identifier, used for statistics.
    pub id: &'static str,
    pub kind: RuleKind,
    /// Points removed when the rule applies. Always 0 for positives.
    pub deduction: u32,
    pub message: &'static str,
    pub applies: fn(&Signals) -> bool,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("deduction", &self.deduction)
            .finish()
    }
}

/// The rubric, in evaluation order.
pub const RULES: &[Rule] = &[
    Rule {
        id: "too-short",
        kind: RuleKind::Issue,
        deduction: 20,
        message: "The submission is too short; consider expanding your explanation.",
        applies: |s| s.word_count < 50,
    },
    Rule {
        id: "needs-detail",
        kind: RuleKind::Issue,
        deduction: 10,
        message: "The explanation could be more detailed in places.",
        applies: |s| (50..100).contains(&s.word_count),
    },
    Rule {
        id: "good-length",
        kind: RuleKind::Positive,
        deduction: 0,
        message: "Good length and development.",
        applies: |s| s.word_count >= 150,
    },
    Rule {
        id: "off-prompt",
        kind: RuleKind::Issue,
        deduction: 10,
        message: "The response could better address the assignment prompt.",
        applies: |s| s.description_vocabulary > 5 && s.overlap_ratio < 0.2,
    },
    Rule {
        id: "unstructured",
        kind: RuleKind::Issue,
        deduction: 5,
        message: "Adding clear sections or bullet points would improve clarity.",
        applies: |s| !s.has_structure && s.word_count > 80,
    },
    Rule {
        id: "structured",
        kind: RuleKind::Positive,
        deduction: 0,
        message: "Clear structure with sections or bullets.",
        applies: |s| s.has_structure,
    },
    Rule {
        id: "shallow",
        kind: RuleKind::Issue,
        deduction: 10,
        message: "The explanation lacks depth in some sections.",
        applies: |s| s.depth_count < 2 && s.word_count > 60,
    },
];

/// Look up a rule by its identifier.
pub fn rule(id: &str) -> Option<&'static Rule> {
    RULES.iter().find(|r| r.id == id)
}

/// Outcome of scoring one submission against the rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// Final score in `[0, max_score]`.
    pub score: u32,
    pub max_score: u32,
    pub feedback_summary: String,
    pub feedback_detail: String,
    pub word_count: usize,
    /// Ids of the rules that fired, in rubric order.
    pub findings: Vec<String>,
}

/// Score `content` against the fixed rubric.
pub fn score(content: &str, description: &str, max_score: u32) -> Scorecard {
    let signals = Signals::extract(content, description);
    score_signals(&signals, RULES, max_score)
}

/// Apply `rules` in order to precomputed signals.
pub fn score_signals(signals: &Signals, rules: &[Rule], max_score: u32) -> Scorecard {
    let fired: Vec<&Rule> = rules.iter().filter(|r| (r.applies)(signals)).collect();

    let deductions: i64 = fired.iter().map(|r| i64::from(r.deduction)).sum();
    let score = (i64::from(max_score) - deductions).clamp(0, i64::from(max_score)) as u32;

    let messages_of = |kind: RuleKind| -> Vec<&'static str> {
        fired
            .iter()
            .filter(|r| r.kind == kind)
            .map(|r| r.message)
            .collect()
    };
    let issues = messages_of(RuleKind::Issue);
    let positives = messages_of(RuleKind::Positive);

    let feedback_summary = issues
        .first()
        .or_else(|| positives.first())
        .copied()
        .unwrap_or(DEFAULT_SUMMARY)
        .to_string();

    let tally = format!(
        "Word count: {}. Score: {score}/{max_score}.",
        signals.word_count
    );
    let mut parts: Vec<&str> = positives.iter().chain(issues.iter()).copied().collect();
    parts.push(&tally);
    let feedback_detail = parts.join(" ");

    Scorecard {
        score,
        max_score,
        feedback_summary,
        feedback_detail,
        word_count: signals.word_count,
        findings: fired.iter().map(|r| r.id.to_string()).collect(),
    }
}
