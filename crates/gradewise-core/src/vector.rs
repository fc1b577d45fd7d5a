//! TF-IDF term vectors over an explicit two-document set.
//!
//! Document frequencies are recomputed for every comparison pair instead of
//! being kept in a corpus-wide index, so building vectors for one pair never
//! depends on which other submissions exist or the order they arrived in.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::text::tokenize;

/// Number of documents in a comparison pair.
const PAIR_SIZE: f64 = 2.0;

/// How inverse document frequency is derived from a term's document count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfWeighting {
    /// `1 + ln(N / (1 + df))`. Terms shared by both documents keep a
    /// positive weight, so identical texts compare as identical.
    #[default]
    Smoothed,
    /// `ln(N / df)`. Every term present in both documents weighs zero.
    Raw,
}

impl IdfWeighting {
    /// IDF for a term found in `df` of the two documents.
    pub fn idf(self, df: u32) -> f64 {
        let df = f64::from(df);
        match self {
            IdfWeighting::Smoothed => 1.0 + (PAIR_SIZE / (1.0 + df)).ln(),
            IdfWeighting::Raw => (PAIR_SIZE / df).ln(),
        }
    }
}

impl fmt::Display for IdfWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdfWeighting::Smoothed => write!(f, "smoothed"),
            IdfWeighting::Raw => write!(f, "raw"),
        }
    }
}

impl FromStr for IdfWeighting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "smoothed" | "smooth" => Ok(IdfWeighting::Smoothed),
            "raw" => Ok(IdfWeighting::Raw),
            other => Err(format!("unknown idf weighting: {other}")),
        }
    }
}

/// Term → TF-IDF weight for one document of a comparison pair.
///
/// Ordered by term so that sums over a vector are reproducible bit for bit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermVector {
    weights: BTreeMap<String, f64>,
}

impl TermVector {
    /// Weight of `term`, or 0 when the document does not contain it.
    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(t, w)| (t.as_str(), *w))
    }

    /// Euclidean norm of the weights.
    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }
}

fn term_frequencies(text: &str) -> BTreeMap<String, u32> {
    let mut tf = BTreeMap::new();
    for term in tokenize(text) {
        *tf.entry(term).or_insert(0) += 1;
    }
    tf
}

/// Build TF-IDF vectors for `text_a` and `text_b` using smoothed IDF.
pub fn build_vectors(text_a: &str, text_b: &str) -> (TermVector, TermVector) {
    build_vectors_with(text_a, text_b, IdfWeighting::default())
}

/// Build TF-IDF vectors for the pair `{text_a, text_b}`.
///
/// Term frequency is the raw occurrence count; document frequency is 1 or 2
/// depending on whether the other text also contains the term.
pub fn build_vectors_with(
    text_a: &str,
    text_b: &str,
    weighting: IdfWeighting,
) -> (TermVector, TermVector) {
    let tf_a = term_frequencies(text_a);
    let tf_b = term_frequencies(text_b);

    let weigh = |own: &BTreeMap<String, u32>, other: &BTreeMap<String, u32>| TermVector {
        weights: own
            .iter()
            .map(|(term, &count)| {
                let df = if other.contains_key(term) { 2 } else { 1 };
                (term.clone(), f64::from(count) * weighting.idf(df))
            })
            .collect(),
    };

    (weigh(&tf_a, &tf_b), weigh(&tf_b, &tf_a))
}
