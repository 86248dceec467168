//! Word frequencies and per-label word contributions.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::types::{MatchedToken, SentimentLabel, Token};

/// Count occurrences of each token unit.
///
/// Sorted by count descending, then word ascending.
pub fn word_counts<'a, I>(tokens: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a Token>,
{
    let mut counts: FxHashMap<&str, u64> = FxHashMap::default();
    for token in tokens {
        *counts.entry(token.unit.as_str()).or_default() += 1;
    }

    let mut sorted: Vec<(String, u64)> = counts
        .into_iter()
        .map(|(word, count)| (word.to_string(), count))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

/// How many matches one word contributed to one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub label: SentimentLabel,
    pub word: String,
    pub count: u64,
}

/// Per-label word contributions.
///
/// Sorted by label, then count descending, then word.
pub fn label_contributions<'a, I>(matches: I) -> Vec<Contribution>
where
    I: IntoIterator<Item = &'a MatchedToken>,
{
    let mut counts: FxHashMap<(&SentimentLabel, &str), u64> = FxHashMap::default();
    for m in matches {
        *counts.entry((&m.label, m.word())).or_default() += 1;
    }

    let mut out: Vec<Contribution> = counts
        .into_iter()
        .map(|((label, word), count)| Contribution {
            label: label.clone(),
            word: word.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| {
        a.label
            .cmp(&b.label)
            .then_with(|| b.count.cmp(&a.count))
            .then_with(|| a.word.cmp(&b.word))
    });
    out
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::Granularity;

    fn word(unit: &str) -> Token {
        Token::new("d", 1, unit, Granularity::Word)
    }

    #[test]
    fn test_word_counts_sorted() {
        let tokens = vec![word("rain"), word("sun"), word("rain"), word("cloud"), word("sun")];
        let counts = word_counts(&tokens);

        assert_eq!(
            counts,
            vec![
                ("rain".to_string(), 2),
                ("sun".to_string(), 2),
                ("cloud".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_label_contributions() {
        let good = Arc::new(word("good"));
        let bad = Arc::new(word("bad"));
        let matches = vec![
            MatchedToken::new(Arc::clone(&good), SentimentLabel::positive()),
            MatchedToken::new(Arc::clone(&bad), SentimentLabel::negative()),
            MatchedToken::new(Arc::clone(&good), SentimentLabel::positive()),
            MatchedToken::new(Arc::clone(&good), SentimentLabel::new("trust")),
        ];

        let contributions = label_contributions(&matches);
        let flat: Vec<(&str, &str, u64)> = contributions
            .iter()
            .map(|c| (c.label.as_str(), c.word.as_str(), c.count))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("negative", "bad", 1),
                ("positive", "good", 2),
                ("trust", "good", 1)
            ]
        );
    }

    #[test]
    fn test_empty() {
        assert!(word_counts(&Vec::<Token>::new()).is_empty());
        assert!(label_contributions(&Vec::<MatchedToken>::new()).is_empty());
    }
}
