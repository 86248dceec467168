//! Stage trait definitions for the pipeline.
//!
//! Each trait represents one processing stage boundary. Implementations are
//! statically dispatched by [`super::runner::Pipeline`]; trait objects work
//! too for dynamic composition.

use crate::types::{Document, Token};

// ============================================================================
// Segmenter: document -> tokens (stage 1)
// ============================================================================

/// Turns one document into an ordered run of tokens.
///
/// # Contract
///
/// - Tokens are appended to `out` in document order.
/// - The document is only read.
/// - Implementations are `Sync` so a corpus can be segmented on a thread
///   pool; they must not depend on which thread handles which document.
pub trait Segmenter: Sync {
    fn segment_into(&self, document: &Document, out: &mut Vec<Token>);
}

// ============================================================================
// TokenFilter: optional token exclusion (stage 2)
// ============================================================================

/// Predicate deciding which tokens reach the lexicon join.
///
/// # Contract
///
/// - **Pure**: the answer depends only on the token.
/// - **Non-mutating**: tokens are selected or excluded, never rewritten.
/// - **Idempotent**: filtering a filtered sequence changes nothing.
pub trait TokenFilter: Sync {
    fn keep(&self, token: &Token) -> bool;
}

/// Keeps every token. The default filter for pipelines without stopwords.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFilter;

impl TokenFilter for NoopFilter {
    #[inline]
    fn keep(&self, _token: &Token) -> bool {
        true
    }
}

impl<F: TokenFilter + ?Sized> TokenFilter for Box<F> {
    fn keep(&self, token: &Token) -> bool {
        (**self).keep(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Granularity;

    fn sample_tokens() -> Vec<Token> {
        vec![
            Token::new("d", 1, "an", Granularity::Word),
            Token::new("d", 2, "excellent", Granularity::Word),
            Token::new("d", 3, "day", Granularity::Word),
        ]
    }

    #[test]
    fn test_noop_filter_keeps_everything() {
        let tokens = sample_tokens();
        let kept: Vec<_> = tokens.iter().filter(|t| NoopFilter.keep(t)).cloned().collect();
        assert_eq!(kept, tokens);
    }

    /// A custom filter dropping short words.
    struct MinLength(usize);

    impl TokenFilter for MinLength {
        fn keep(&self, token: &Token) -> bool {
            token.unit.chars().count() >= self.0
        }
    }

    #[test]
    fn test_custom_filter_is_idempotent() {
        let filter = MinLength(3);
        let once: Vec<_> = sample_tokens().into_iter().filter(|t| filter.keep(t)).collect();
        let twice: Vec<_> = once.iter().filter(|t| filter.keep(t)).cloned().collect();

        assert_eq!(once.len(), 2);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_filter_as_trait_object() {
        let filter: Box<dyn TokenFilter> = Box::new(MinLength(4));
        let kept = sample_tokens().iter().filter(|t| filter.keep(t)).count();
        assert_eq!(kept, 1);
    }

    #[test]
    fn test_segmenter_as_trait_object() {
        struct WholeDocument;
        impl Segmenter for WholeDocument {
            fn segment_into(&self, document: &Document, out: &mut Vec<Token>) {
                out.push(Token::new(
                    document.id.clone(),
                    1,
                    document.text.clone(),
                    Granularity::Paragraph,
                ));
            }
        }

        let segmenter: &dyn Segmenter = &WholeDocument;
        let mut out = Vec::new();
        segmenter.segment_into(&Document::new("x", "all of it"), &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].unit, "all of it");
    }
}
