//! Sentiment lexicons
//!
//! A [`Lexicon`] maps case-normalised words to one or more
//! [`SentimentLabel`]s. Lexicons are loaded once from a bundle of
//! `{ word, sentiment, lexicon }` records, optionally narrowed to one named
//! sub-lexicon, and are immutable afterwards.

pub mod joiner;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentimentError};
use crate::types::SentimentLabel;

pub use joiner::LexiconJoiner;

/// One row of a lexicon bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexiconRecord {
    pub word: String,
    pub sentiment: String,
    /// Name of the lexicon this row belongs to, when several are bundled.
    #[serde(default)]
    pub lexicon: Option<String>,
}

impl LexiconRecord {
    pub fn new(word: impl Into<String>, sentiment: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            sentiment: sentiment.into(),
            lexicon: None,
        }
    }

    pub fn in_lexicon(mut self, name: impl Into<String>) -> Self {
        self.lexicon = Some(name.into());
        self
    }
}

/// Word -> labels lookup table.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    name: Option<String>,
    entries: FxHashMap<String, Vec<SentimentLabel>>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(word, label)` pairs.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut lexicon = Self::new();
        for (word, label) in pairs {
            lexicon.insert(word, SentimentLabel::new(label));
        }
        lexicon
    }

    /// Build from bundle records.
    ///
    /// With `name = Some(..)`, only rows tagged with that lexicon are kept
    /// (tags compare case-insensitively). Asking for a tag no row carries
    /// is an error rather than an empty lexicon.
    pub fn from_records<I>(records: I, name: Option<&str>) -> Result<Self>
    where
        I: IntoIterator<Item = LexiconRecord>,
    {
        let wanted = name.map(|n| n.trim().to_lowercase());
        let mut lexicon = Self {
            name: wanted.clone(),
            entries: FxHashMap::default(),
        };

        let mut seen_tag = false;
        for record in records {
            if let Some(wanted) = &wanted {
                let tag = record.lexicon.as_deref().map(|t| t.trim().to_lowercase());
                if tag.as_deref() != Some(wanted.as_str()) {
                    continue;
                }
                seen_tag = true;
            }
            lexicon.insert(&record.word, SentimentLabel::new(&record.sentiment));
        }

        match wanted {
            Some(wanted) if !seen_tag => Err(SentimentError::UnknownLexicon(wanted)),
            _ => {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    lexicon = lexicon.name.as_deref().unwrap_or("<all>"),
                    words = lexicon.len(),
                    "loaded lexicon"
                );
                Ok(lexicon)
            }
        }
    }

    /// Parse a JSON array of [`LexiconRecord`]s.
    pub fn from_json_str(json: &str, name: Option<&str>) -> Result<Self> {
        let records: Vec<LexiconRecord> = serde_json::from_str(json)?;
        Self::from_records(records, name)
    }

    pub fn from_reader<R: Read>(reader: R, name: Option<&str>) -> Result<Self> {
        let records: Vec<LexiconRecord> = serde_json::from_reader(reader)?;
        Self::from_records(records, name)
    }

    pub fn from_path(path: impl AsRef<Path>, name: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SentimentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), name)
    }

    /// Add a label to a word. Duplicate labels for one word are ignored.
    pub fn insert(&mut self, word: &str, label: SentimentLabel) {
        let labels = self.entries.entry(normalize(word)).or_default();
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    /// Labels for a word, in insertion order. Case-insensitive, exact match.
    pub fn labels(&self, word: &str) -> Option<&[SentimentLabel]> {
        self.entries.get(&normalize(word)).map(Vec::as_slice)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(&normalize(word))
    }

    /// The sub-lexicon tag this lexicon was selected by, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every distinct label, sorted.
    pub fn label_set(&self) -> Vec<SentimentLabel> {
        let mut labels: Vec<SentimentLabel> = self.entries.values().flatten().cloned().collect();
        labels.sort();
        labels.dedup();
        labels
    }
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}
