//! Plagiarism risk: the strongest similarity between a submission and any peer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::similarity::cosine_similarity_with;
use crate::vector::IdfWeighting;

/// Plagiarism risk as a whole percentage, rendered as `"NN%"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PlagiarismRisk(u32);

impl PlagiarismRisk {
    pub const NONE: PlagiarismRisk = PlagiarismRisk(0);

    /// Risk for a similarity in `[0, 1]`, rounded to the nearest percent.
    pub fn from_similarity(similarity: f64) -> Self {
        let pct = (similarity.clamp(0.0, 1.0) * 100.0).round();
        PlagiarismRisk(pct as u32)
    }

    pub fn percent(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlagiarismRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl FromStr for PlagiarismRisk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_suffix('%')
            .ok_or_else(|| format!("risk must end with '%': {s}"))?;
        let pct: u32 = digits
            .parse()
            .map_err(|_| format!("invalid risk percentage: {s}"))?;
        if pct > 100 {
            return Err(format!("risk percentage out of range: {s}"));
        }
        Ok(PlagiarismRisk(pct))
    }
}

impl From<PlagiarismRisk> for String {
    fn from(risk: PlagiarismRisk) -> Self {
        risk.to_string()
    }
}

impl TryFrom<String> for PlagiarismRisk {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// The single most similar peer found for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeerMatch {
    /// Position of the peer in the slice that was searched.
    pub index: usize,
    /// Cosine similarity in `[0, 1]`.
    pub similarity: f64,
}

impl PeerMatch {
    pub fn risk(&self) -> PlagiarismRisk {
        PlagiarismRisk::from_similarity(self.similarity)
    }
}

/// Find the most similar non-empty peer. Ties keep the earliest peer.
///
/// Returns `None` when there is no non-empty peer to compare against.
pub fn strongest_match<S: AsRef<str>>(
    submission: &str,
    peers: &[S],
    weighting: IdfWeighting,
) -> Option<PeerMatch> {
    let mut best: Option<PeerMatch> = None;
    for (index, peer) in peers.iter().enumerate() {
        let peer = peer.as_ref();
        if peer.is_empty() {
            continue;
        }
        let similarity = cosine_similarity_with(submission, peer, weighting);
        if best.is_none_or(|b| similarity > b.similarity) {
            best = Some(PeerMatch { index, similarity });
        }
    }
    best
}

/// Plagiarism risk of `submission` against `peers` with smoothed IDF.
pub fn compute_risk<S: AsRef<str>>(submission: &str, peers: &[S]) -> PlagiarismRisk {
    compute_risk_with(submission, peers, IdfWeighting::default())
}

/// Plagiarism risk of `submission` against `peers`.
///
/// Only the worst match is reported; `"0%"` when no non-empty peer exists.
pub fn compute_risk_with<S: AsRef<str>>(
    submission: &str,
    peers: &[S],
    weighting: IdfWeighting,
) -> PlagiarismRisk {
    strongest_match(submission, peers, weighting)
        .map(|m| m.risk())
        .unwrap_or(PlagiarismRisk::NONE)
}
