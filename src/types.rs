//! Core data types shared across pipeline stages.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SentimentError;

/// Optional provenance attached to a document by the corpus source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A unit of source text (a line, a page, a tweet).
///
/// Documents are immutable once built; downstream stages only borrow them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Opaque identifier, shared by every token cut from this document.
    pub id: Arc<str>,
    /// Raw text. Empty when the source had nothing, never absent.
    pub text: String,
    #[serde(default)]
    pub meta: DocumentMeta,
}

impl Document {
    pub fn new(id: impl Into<Arc<str>>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            meta: DocumentMeta::default(),
        }
    }

    pub fn with_meta(mut self, meta: DocumentMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Level at which text is segmented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Word,
    Sentence,
    Paragraph,
}

impl Granularity {
    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
        }
    }

    /// Whether units at `self` are strictly larger than units at `other`.
    pub fn is_coarser_than(&self, other: Granularity) -> bool {
        *self > other
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = SentimentError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "word" | "words" => Ok(Self::Word),
            "sentence" | "sentences" => Ok(Self::Sentence),
            "paragraph" | "paragraphs" => Ok(Self::Paragraph),
            other => Err(SentimentError::invalid_config(format!(
                "unknown granularity \"{other}\" (expected word, sentence or paragraph)"
            ))),
        }
    }
}

/// A segment of a document tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Id of the source document (shared, not owned).
    pub document_id: Arc<str>,
    /// 1-based position: word/sentence/paragraph number, or the ordinal
    /// inherited from an outer unit when tokenizing nested.
    pub ordinal: usize,
    /// The text fragment.
    pub unit: String,
    pub granularity: Granularity,
}

impl Token {
    pub fn new(
        document_id: impl Into<Arc<str>>,
        ordinal: usize,
        unit: impl Into<String>,
        granularity: Granularity,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            ordinal,
            unit: unit.into(),
            granularity,
        }
    }
}

/// A sentiment category defined by the lexicon.
///
/// The set is open; only `positive` and `negative` carry meaning for the
/// positivity score.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SentimentLabel(Arc<str>);

impl SentimentLabel {
    pub const POSITIVE: &'static str = "positive";
    pub const NEGATIVE: &'static str = "negative";

    /// Labels are stored lower-cased and trimmed.
    pub fn new(label: &str) -> Self {
        Self(Arc::from(label.trim().to_lowercase()))
    }

    pub fn positive() -> Self {
        Self(Arc::from(Self::POSITIVE))
    }

    pub fn negative() -> Self {
        Self(Arc::from(Self::NEGATIVE))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_positive(&self) -> bool {
        &*self.0 == Self::POSITIVE
    }

    pub fn is_negative(&self) -> bool {
        &*self.0 == Self::NEGATIVE
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SentimentLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

/// One (token, label) pair produced by the lexicon join.
///
/// A word carrying k labels yields k of these, all sharing the same token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedToken {
    pub token: Arc<Token>,
    pub label: SentimentLabel,
}

impl MatchedToken {
    pub fn new(token: Arc<Token>, label: SentimentLabel) -> Self {
        Self { token, label }
    }

    pub fn word(&self) -> &str {
        &self.token.unit
    }
}
