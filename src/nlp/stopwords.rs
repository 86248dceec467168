//! Stopword filtering
//!
//! Stopword sets come from the `stop-words` crate or from caller-supplied
//! lists. The filter only ever removes word-level tokens; sentence and
//! paragraph tokens pass through untouched.

use rustc_hash::FxHashSet;
use stop_words::{get, LANGUAGE};

use crate::error::{Result, SentimentError};
use crate::pipeline::traits::TokenFilter;
use crate::types::{Granularity, Token};

/// A fixed set of words to drop before the lexicon join.
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    /// Lower-cased stopwords
    stopwords: FxHashSet<String>,
}

impl StopwordFilter {
    /// Built-in list for a language code or name (`"en"`, `"english"`, ...).
    pub fn for_language(language: &str) -> Result<Self> {
        let lang = Self::parse_language(language)?;
        Ok(Self {
            stopwords: get(lang).iter().map(|s| s.to_lowercase()).collect(),
        })
    }

    /// An empty filter: keeps everything.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a custom list
    pub fn from_list<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    pub fn add_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.stopwords.insert(word.as_ref().to_lowercase());
        }
    }

    pub fn remove_stopwords<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.stopwords.remove(&word.as_ref().to_lowercase());
        }
    }

    /// Case-insensitive membership test
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }

    /// Drop stopword tokens, preserving the order of everything else.
    pub fn filter<'a, I>(&'a self, tokens: I) -> impl Iterator<Item = Token> + 'a
    where
        I: IntoIterator<Item = Token>,
        I::IntoIter: 'a,
    {
        tokens.into_iter().filter(move |t| self.keep(t))
    }

    fn parse_language(language: &str) -> Result<LANGUAGE> {
        let lang = match language.trim().to_lowercase().as_str() {
            "en" | "english" => LANGUAGE::English,
            "de" | "german" => LANGUAGE::German,
            "fr" | "french" => LANGUAGE::French,
            "es" | "spanish" => LANGUAGE::Spanish,
            "it" | "italian" => LANGUAGE::Italian,
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "nl" | "dutch" => LANGUAGE::Dutch,
            "ru" | "russian" => LANGUAGE::Russian,
            "sv" | "swedish" => LANGUAGE::Swedish,
            "no" | "norwegian" => LANGUAGE::Norwegian,
            "da" | "danish" => LANGUAGE::Danish,
            "fi" | "finnish" => LANGUAGE::Finnish,
            "hu" | "hungarian" => LANGUAGE::Hungarian,
            "tr" | "turkish" => LANGUAGE::Turkish,
            "pl" | "polish" => LANGUAGE::Polish,
            "ar" | "arabic" => LANGUAGE::Arabic,
            other => {
                return Err(SentimentError::invalid_config(format!(
                    "no built-in stopword list for language \"{other}\""
                )))
            }
        };
        Ok(lang)
    }
}

impl TokenFilter for StopwordFilter {
    fn keep(&self, token: &Token) -> bool {
        token.granularity != Granularity::Word || !self.is_stopword(&token.unit)
    }
}
