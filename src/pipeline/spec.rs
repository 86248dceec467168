//! Pipeline specification types.
//!
//! A [`PipelineSpec`] describes how to segment text, which stopwords to drop,
//! which sub-lexicon to join against and how to group the matches. These
//! types are the input to the [`super::validation::ValidationEngine`] and to
//! [`super::runner::Pipeline::from_spec`].
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "v": 1,
//!   "tokenize": { "granularity": "word", "within": "paragraph", "exclude_trailing": 1 },
//!   "stopwords": { "language": "en", "words": ["miss"] },
//!   "lexicon": { "name": "bing" },
//!   "group_by": "ordinal",
//!   "parallel": false,
//!   "strict": false
//! }
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};
use crate::scoring::GroupBy;
use crate::types::Granularity;

/// Top-level pipeline specification (v1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSpec {
    /// Spec version (currently `1`).
    pub v: u32,

    #[serde(default)]
    pub tokenize: TokenizeSpec,

    /// Omitted means no stopword filtering.
    #[serde(default)]
    pub stopwords: Option<StopwordSpec>,

    #[serde(default)]
    pub lexicon: LexiconSpec,

    #[serde(default)]
    pub group_by: GroupBy,

    /// Tokenize documents on the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,

    /// If `true`, unrecognized fields are errors; if `false`, warnings.
    #[serde(default)]
    pub strict: bool,

    /// Captures any fields not recognized by the schema.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

impl Default for PipelineSpec {
    fn default() -> Self {
        Self {
            v: 1,
            tokenize: TokenizeSpec::default(),
            stopwords: None,
            lexicon: LexiconSpec::default(),
            group_by: GroupBy::default(),
            parallel: false,
            strict: false,
            unknown_fields: HashMap::new(),
        }
    }
}

impl PipelineSpec {
    /// Parse a spec from JSON.
    ///
    /// Values that are well-formed JSON but not valid settings (an unknown
    /// granularity, a negative count) are reported as
    /// [`SentimentError::InvalidConfiguration`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            if e.is_data() {
                SentimentError::invalid_config(e.to_string())
            } else {
                SentimentError::Json(e)
            }
        })
    }

    /// The granularity tokens reach the filter and join stages at.
    pub fn token_granularity(&self) -> Granularity {
        self.tokenize.granularity
    }

    /// Whether paragraph segmentation happens at either level.
    pub fn splits_paragraphs(&self) -> bool {
        self.tokenize.granularity == Granularity::Paragraph
            || self.tokenize.within == Some(Granularity::Paragraph)
    }
}

/// Segmentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenizeSpec {
    #[serde(default = "default_granularity")]
    pub granularity: Granularity,

    /// Outer unit for nested tokenization: split into `within` units first,
    /// then into `granularity` units that inherit the outer ordinal.
    #[serde(default)]
    pub within: Option<Granularity>,

    /// Number of final paragraphs to drop (caller-declared trailing block).
    #[serde(default)]
    pub exclude_trailing: usize,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

fn default_granularity() -> Granularity {
    Granularity::Word
}

impl Default for TokenizeSpec {
    fn default() -> Self {
        Self {
            granularity: default_granularity(),
            within: None,
            exclude_trailing: 0,
            unknown_fields: HashMap::new(),
        }
    }
}

/// Stopword settings: a built-in language list, extra words, or both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopwordSpec {
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub words: Vec<String>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

/// Lexicon selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconSpec {
    /// Sub-lexicon tag to select from a bundle; `None` uses every row.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_spec_defaults() {
        let spec = PipelineSpec::from_json(r#"{ "v": 1 }"#).unwrap();
        assert_eq!(spec.v, 1);
        assert_eq!(spec.tokenize.granularity, Granularity::Word);
        assert_eq!(spec.tokenize.within, None);
        assert!(spec.stopwords.is_none());
        assert_eq!(spec.lexicon.name, None);
        assert_eq!(spec.group_by, GroupBy::Ordinal);
        assert!(!spec.parallel);
        assert!(spec.unknown_fields.is_empty());
    }

    #[test]
    fn test_full_spec() {
        let json = r#"{
            "v": 1,
            "tokenize": { "granularity": "word", "within": "paragraph", "exclude_trailing": 1 },
            "stopwords": { "language": "en", "words": ["miss"] },
            "lexicon": { "name": "bing" },
            "group_by": "document_ordinal",
            "parallel": true
        }"#;
        let spec = PipelineSpec::from_json(json).unwrap();

        assert_eq!(spec.tokenize.within, Some(Granularity::Paragraph));
        assert_eq!(spec.tokenize.exclude_trailing, 1);
        assert!(spec.splits_paragraphs());
        let stop = spec.stopwords.as_ref().unwrap();
        assert_eq!(stop.language.as_deref(), Some("en"));
        assert_eq!(stop.words, vec!["miss"]);
        assert_eq!(spec.lexicon.name.as_deref(), Some("bing"));
        assert_eq!(spec.group_by, GroupBy::DocumentOrdinal);
        assert!(spec.parallel);
    }

    #[test]
    fn test_unknown_granularity_is_invalid_configuration() {
        let err = PipelineSpec::from_json(r#"{ "v": 1, "tokenize": { "granularity": "chapter" } }"#)
            .unwrap_err();
        assert!(matches!(err, SentimentError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_syntax_error_is_json_error() {
        let err = PipelineSpec::from_json("{ \"v\": ").unwrap_err();
        assert!(matches!(err, SentimentError::Json(_)));
    }

    #[test]
    fn test_unknown_fields_captured() {
        let spec = PipelineSpec::from_json(
            r#"{ "v": 1, "colour": "red", "tokenize": { "granularty": "word" } }"#,
        )
        .unwrap();
        assert!(spec.unknown_fields.contains_key("colour"));
        assert!(spec.tokenize.unknown_fields.contains_key("granularty"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = r#"{ "v": 1, "tokenize": { "granularity": "sentence" }, "group_by": "document" }"#;
        let spec = PipelineSpec::from_json(json).unwrap();
        let back = serde_json::to_value(&spec).unwrap();
        assert_eq!(back["tokenize"]["granularity"], "sentence");
        assert_eq!(back["group_by"], "document");
    }
}
