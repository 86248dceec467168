//! # rapid-sentiment
//!
//! Tokenization and lexicon-based sentiment scoring for text corpora.
//!
//! The crate is a pure, single-pass pipeline over in-memory documents:
//!
//! - **Tokenize**: split documents into words, sentences or paragraphs,
//!   optionally nested (words carrying their paragraph number)
//! - **Filter**: drop stopwords
//! - **Join**: expand each word into one match per lexicon label
//! - **Aggregate**: count labels per group and compute a smoothed
//!   positivity score `(pos - neg) / (pos + neg + 1)`
//!
//! Fetching text (HTTP, OAuth, paging) is left to the caller; the
//! [`corpus`] loaders accept what that step hands over.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rapid_sentiment::prelude::*;
//!
//! let lexicon = Lexicon::from_pairs([("good", "positive"), ("bad", "negative")]);
//! let pipeline = Pipeline::builder()
//!     .nested(NestedTokenizer::words_by_paragraph(ParagraphPolicy::default()))
//!     .filter(StopwordFilter::for_language("en")?)
//!     .build(lexicon);
//!
//! let output = pipeline.score(Corpus::from_lines(text).documents());
//! for (paragraph, score) in output.scores.most_positive(3) {
//!     println!("{paragraph:?}: {:.3}", score.positivity);
//! }
//! ```

pub mod corpus;
pub mod error;
pub mod lexicon;
pub mod nlp;
pub mod pipeline;
pub mod scoring;
pub mod types;

pub use corpus::Corpus;
pub use error::{Result, SentimentError};
pub use lexicon::{Lexicon, LexiconJoiner, LexiconRecord};
pub use nlp::stopwords::StopwordFilter;
pub use nlp::tokenizer::{NestedTokenizer, ParagraphPolicy, Tokenizer};
pub use pipeline::runner::{Pipeline, PipelineBuilder};
pub use pipeline::spec::PipelineSpec;
pub use scoring::{aggregate, aggregate_by, positivity, GroupBy, GroupKey, ScoreTable, UnitScore};
pub use types::{Document, DocumentMeta, Granularity, MatchedToken, SentimentLabel, Token};

/// Common imports.
pub mod prelude {
    pub use crate::corpus::Corpus;
    pub use crate::error::{Result, SentimentError};
    pub use crate::lexicon::{Lexicon, LexiconJoiner, LexiconRecord};
    pub use crate::nlp::stopwords::StopwordFilter;
    pub use crate::nlp::tokenizer::{NestedTokenizer, ParagraphPolicy, Tokenizer};
    pub use crate::pipeline::observer::{NoopObserver, PipelineObserver, TimingObserver};
    pub use crate::pipeline::runner::Pipeline;
    pub use crate::pipeline::spec::PipelineSpec;
    pub use crate::pipeline::traits::TokenFilter;
    pub use crate::scoring::{aggregate, GroupBy, GroupKey, Order};
    pub use crate::types::{Document, Granularity, Token};
}
