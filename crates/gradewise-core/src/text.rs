//! Text normalization shared by the similarity and rubric subsystems.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Anything but ASCII word characters and whitespace. Non-ASCII letters are
/// stripped, so accented words split apart.
static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z_\s]").expect("valid non-word regex"));

/// Normalize raw text into an ordered sequence of comparable terms.
///
/// Lowercases, replaces every character that is neither an ASCII word
/// character (`[0-9A-Za-z_]`) nor whitespace with a space, splits on whitespace runs and drops terms of a
/// single character. Never fails: empty or all-punctuation input yields an
/// empty vector.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    NON_WORD
        .replace_all(&lowered, " ")
        .split_whitespace()
        .filter(|w| w.chars().count() > 1)
        .map(str::to_string)
        .collect()
}

/// Distinct terms of `text`.
pub fn vocabulary(text: &str) -> HashSet<String> {
    tokenize(text).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(
            tokenize("Hello, World! It's a stack-based queue."),
            vec!["hello", "world", "it", "stack", "based", "queue"]
        );
    }

    #[test]
    fn drops_single_character_terms() {
        assert_eq!(tokenize("a b cd e fg"), vec!["cd", "fg"]);
    }

    #[test]
    fn keeps_digits_and_underscores() {
        assert_eq!(tokenize("step_2 of 10"), vec!["step_2", "of", "10"]);
    }

    #[test]
    fn empty_and_punctuation_only_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
        assert!(tokenize("!!! ... ??? -- ;;").is_empty());
    }

    #[test]
    fn non_ascii_letters_are_separators() {
        assert_eq!(tokenize("naïve café"), vec!["na", "ve", "caf"]);
        assert!(tokenize("é").is_empty());
        assert!(tokenize("Η στοίβα είναι δομή δεδομένων").is_empty());
    }

    #[test]
    fn unicode_whitespace_still_splits() {
        assert_eq!(tokenize("stack\u{00A0}queue\u{2003}heap"), vec!["stack", "queue", "heap"]);
    }

    #[test]
    fn vocabulary_deduplicates() {
        let vocab = vocabulary("Queue queue QUEUE stack");
        assert_eq!(vocab.len(), 2);
        assert!(vocab.contains("queue"));
        assert!(vocab.contains("stack"));
    }
}
