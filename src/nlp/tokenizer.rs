//! Text segmentation
//!
//! Splits documents into word, sentence or paragraph tokens. Word splitting
//! follows Unicode word boundaries (UAX #29); sentence splitting is plain
//! punctuation-based; paragraph splitting is on blank lines.
//!
//! Segmentation composes: paragraph-tokenize first, then word-tokenize each
//! paragraph with [`Tokenizer::tokenize_unit`] and every word keeps the
//! paragraph's ordinal. [`NestedTokenizer`] packages that pattern.

use std::sync::Arc;

use rayon::prelude::*;
use unicode_segmentation::{UnicodeSegmentation, UnicodeWords};

use crate::error::Result;
use crate::pipeline::traits::Segmenter;
use crate::types::{Document, Granularity, Token};

/// Caller-declared handling of paragraphs at the end of a document.
///
/// Whitespace-only paragraphs are always skipped and never consume an
/// ordinal. Anything beyond that (a known malformed trailing block, e.g. a
/// license footer) must be excluded explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParagraphPolicy {
    /// Number of final non-empty paragraphs to drop.
    pub exclude_trailing: usize,
}

impl ParagraphPolicy {
    pub fn exclude_trailing(n: usize) -> Self {
        Self { exclude_trailing: n }
    }
}

/// Splits text at a fixed granularity.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    granularity: Granularity,
    paragraph_policy: ParagraphPolicy,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(Granularity::Word)
    }
}

impl Tokenizer {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            paragraph_policy: ParagraphPolicy::default(),
        }
    }

    /// Build from a granularity name; unknown names are rejected.
    pub fn from_name(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn with_paragraph_policy(mut self, policy: ParagraphPolicy) -> Self {
        self.paragraph_policy = policy;
        self
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Tokenize a document. Ordinals start at 1.
    pub fn tokenize<'a>(&self, document: &'a Document) -> Tokens<'a> {
        Tokens {
            document_id: Arc::clone(&document.id),
            granularity: self.granularity,
            segments: self.segments(&document.text),
            position: 0,
            inherited: None,
        }
    }

    /// Re-tokenize the text of an earlier token.
    ///
    /// Every emitted token carries the outer token's document id and ordinal.
    pub fn tokenize_unit<'a>(&self, outer: &'a Token) -> Tokens<'a> {
        Tokens {
            document_id: Arc::clone(&outer.document_id),
            granularity: self.granularity,
            segments: self.segments(&outer.unit),
            position: 0,
            inherited: Some(outer.ordinal),
        }
    }

    fn segments<'a>(&self, text: &'a str) -> Segments<'a> {
        match self.granularity {
            Granularity::Word => Segments::Words(text.unicode_words()),
            Granularity::Sentence => Segments::Sentences(SentenceSplit { rest: text }),
            Granularity::Paragraph => {
                let mut paragraphs = split_paragraphs(text);
                let keep = paragraphs
                    .len()
                    .saturating_sub(self.paragraph_policy.exclude_trailing);
                paragraphs.truncate(keep);
                Segments::Paragraphs(paragraphs.into_iter())
            }
        }
    }
}

impl Segmenter for Tokenizer {
    fn segment_into(&self, document: &Document, out: &mut Vec<Token>) {
        out.extend(self.tokenize(document));
    }
}

/// Two-level tokenizer: split into `outer` units, then split each unit
/// again at `inner` granularity, carrying the outer ordinal forward.
#[derive(Debug, Clone)]
pub struct NestedTokenizer {
    outer: Tokenizer,
    inner: Tokenizer,
}

impl NestedTokenizer {
    pub fn new(outer: Tokenizer, inner: Tokenizer) -> Self {
        Self { outer, inner }
    }

    /// The common case: word tokens grouped by paragraph number.
    pub fn words_by_paragraph(policy: ParagraphPolicy) -> Self {
        Self::new(
            Tokenizer::new(Granularity::Paragraph).with_paragraph_policy(policy),
            Tokenizer::new(Granularity::Word),
        )
    }

    pub fn tokenize<'a>(&'a self, document: &'a Document) -> impl Iterator<Item = Token> + 'a {
        self.outer
            .tokenize(document)
            .flat_map(move |unit| self.inner.tokenize_unit(&unit).collect::<Vec<_>>())
    }
}

impl Segmenter for NestedTokenizer {
    fn segment_into(&self, document: &Document, out: &mut Vec<Token>) {
        out.extend(self.tokenize(document));
    }
}

/// Tokenize a whole corpus, optionally spreading documents across threads.
///
/// Output order is always document order, then token order within each
/// document, regardless of `parallel`.
pub fn tokenize_corpus<S>(segmenter: &S, documents: &[Document], parallel: bool) -> Vec<Token>
where
    S: Segmenter + ?Sized,
{
    if !parallel {
        let mut out = Vec::new();
        for document in documents {
            segmenter.segment_into(document, &mut out);
        }
        return out;
    }

    let per_document: Vec<Vec<Token>> = documents
        .par_iter()
        .map(|document| {
            let mut tokens = Vec::new();
            segmenter.segment_into(document, &mut tokens);
            tokens
        })
        .collect();

    per_document.into_iter().flatten().collect()
}

/// Lazy token sequence for one document (or one outer unit).
pub struct Tokens<'a> {
    document_id: Arc<str>,
    granularity: Granularity,
    segments: Segments<'a>,
    position: usize,
    inherited: Option<usize>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let segment = self.segments.next()?;
        self.position += 1;

        let unit = match self.granularity {
            Granularity::Word => segment.to_lowercase(),
            Granularity::Sentence | Granularity::Paragraph => segment.to_string(),
        };

        Some(Token {
            document_id: Arc::clone(&self.document_id),
            ordinal: self.inherited.unwrap_or(self.position),
            unit,
            granularity: self.granularity,
        })
    }
}

enum Segments<'a> {
    Words(UnicodeWords<'a>),
    Sentences(SentenceSplit<'a>),
    Paragraphs(std::vec::IntoIter<&'a str>),
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        match self {
            Segments::Words(it) => it.next(),
            Segments::Sentences(it) => it.next(),
            Segments::Paragraphs(it) => it.next(),
        }
    }
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201D}' | '\u{2019}')
}

/// Punctuation-based sentence splitter.
///
/// A sentence ends after a run of `.`, `!` or `?` (plus any closing quotes
/// or brackets) that is followed by whitespace or the end of the text.
/// Abbreviations such as "Mr." therefore end a sentence too.
struct SentenceSplit<'a> {
    rest: &'a str,
}

impl<'a> Iterator for SentenceSplit<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let text = self.rest.trim_start();
        if text.is_empty() {
            self.rest = "";
            return None;
        }

        let mut end = text.len();
        let mut chars = text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if !is_terminator(c) {
                continue;
            }
            let mut stop = i + c.len_utf8();
            while let Some(&(j, d)) = chars.peek() {
                if is_terminator(d) || is_closer(d) {
                    stop = j + d.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            match chars.peek() {
                None => {
                    end = stop;
                    break;
                }
                Some(&(_, d)) if d.is_whitespace() => {
                    end = stop;
                    break;
                }
                _ => {}
            }
        }

        self.rest = &text[end..];
        Some(text[..end].trim_end())
    }
}

/// Split on blank lines, returning trimmed non-empty paragraphs.
fn split_paragraphs(text: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;
    let mut offset = 0;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if line.trim().is_empty() {
            if let Some(s) = start.take() {
                paragraphs.push(text[s..end].trim());
            }
        } else {
            if start.is_none() {
                start = Some(line_start);
            }
            end = offset;
        }
    }
    if let Some(s) = start {
        paragraphs.push(text[s..end].trim());
    }

    paragraphs
}
