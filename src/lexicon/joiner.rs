//! Token / lexicon inner join
//!
//! Each token is looked up in the lexicon. Unmatched tokens are dropped; a
//! token whose word carries k labels expands into k [`MatchedToken`]s that
//! share one `Arc<Token>`.

use std::sync::Arc;

use super::Lexicon;
use crate::types::{MatchedToken, SentimentLabel, Token};

/// Joins tokens against a borrowed lexicon.
#[derive(Debug, Clone, Copy)]
pub struct LexiconJoiner<'l> {
    lexicon: &'l Lexicon,
}

impl<'l> LexiconJoiner<'l> {
    pub fn new(lexicon: &'l Lexicon) -> Self {
        Self { lexicon }
    }

    /// Lazily join `tokens`, preserving token order. Labels of one token
    /// come out in lexicon insertion order.
    pub fn join<I>(&self, tokens: I) -> Join<'l, I::IntoIter>
    where
        I: IntoIterator<Item = Token>,
    {
        Join {
            lexicon: self.lexicon,
            tokens: tokens.into_iter(),
            current: None,
        }
    }
}

/// Iterator returned by [`LexiconJoiner::join`].
pub struct Join<'l, I> {
    lexicon: &'l Lexicon,
    tokens: I,
    current: Option<(Arc<Token>, std::slice::Iter<'l, SentimentLabel>)>,
}

impl<'l, I> Iterator for Join<'l, I>
where
    I: Iterator<Item = Token>,
{
    type Item = MatchedToken;

    fn next(&mut self) -> Option<MatchedToken> {
        loop {
            if let Some((token, labels)) = &mut self.current {
                if let Some(label) = labels.next() {
                    return Some(MatchedToken::new(Arc::clone(token), label.clone()));
                }
                self.current = None;
            }

            let token = self.tokens.next()?;
            if let Some(labels) = self.lexicon.labels(&token.unit) {
                self.current = Some((Arc::new(token), labels.iter()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Granularity;

    fn words(units: &[&str]) -> Vec<Token> {
        units
            .iter()
            .enumerate()
            .map(|(i, u)| Token::new("doc", i + 1, *u, Granularity::Word))
            .collect()
    }

    fn nrc_like() -> Lexicon {
        Lexicon::from_pairs([
            ("good", "positive"),
            ("good", "trust"),
            ("good", "joy"),
            ("bad", "negative"),
            ("love", "positive"),
        ])
    }

    #[test]
    fn test_inner_join_drops_unmatched() {
        let lexicon = nrc_like();
        let matches: Vec<_> = LexiconJoiner::new(&lexicon)
            .join(words(&["the", "bad", "weather"]))
            .collect();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].word(), "bad");
        assert!(matches[0].label.is_negative());
        assert_eq!(matches[0].token.ordinal, 2);
    }

    #[test]
    fn test_multi_label_word_expands_once_per_label() {
        let lexicon = nrc_like();
        let matches: Vec<_> = LexiconJoiner::new(&lexicon).join(words(&["good"])).collect();

        assert_eq!(matches.len(), 3);
        let labels: Vec<&str> = matches.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["positive", "trust", "joy"]);
        // All three share the same token.
        assert!(Arc::ptr_eq(&matches[0].token, &matches[2].token));
    }

    #[test]
    fn test_match_count_is_sum_of_label_counts() {
        let lexicon = nrc_like();
        let input = words(&["good", "bad", "love", "good", "meh"]);
        let expected: usize = input
            .iter()
            .map(|t| lexicon.labels(&t.unit).map_or(0, <[_]>::len))
            .sum();

        let count = LexiconJoiner::new(&lexicon).join(input).count();
        assert_eq!(count, expected);
        assert_eq!(count, 3 + 1 + 1 + 3);
    }

    #[test]
    fn test_join_preserves_token_order() {
        let lexicon = nrc_like();
        let ordinals: Vec<usize> = LexiconJoiner::new(&lexicon)
            .join(words(&["love", "x", "bad", "love"]))
            .map(|m| m.token.ordinal)
            .collect();
        assert_eq!(ordinals, vec![1, 3, 4]);
    }

    #[test]
    fn test_join_is_case_insensitive_without_stemming() {
        let lexicon = nrc_like();
        let tokens = vec![
            Token::new("doc", 1, "LOVE", Granularity::Word),
            Token::new("doc", 2, "loved", Granularity::Word),
        ];
        let matches: Vec<_> = LexiconJoiner::new(&lexicon).join(tokens).collect();

        assert_eq!(matches.len(), 1);
        // The token itself is not rewritten by the join.
        assert_eq!(matches[0].word(), "LOVE");
    }

    #[test]
    fn test_empty_input() {
        let lexicon = nrc_like();
        assert_eq!(LexiconJoiner::new(&lexicon).join(Vec::<Token>::new()).count(), 0);
    }
}
