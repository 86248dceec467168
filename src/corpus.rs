//! Corpus loading
//!
//! The pipeline consumes an ordered, in-memory list of [`Document`]s.
//! Fetching (HTTP, OAuth, paging) happens elsewhere; these loaders only
//! cover the shapes that fetch step hands over: plain text with one
//! document per line, or a JSON array of flattened records.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::error::{Result, SentimentError};
use crate::types::{Document, DocumentMeta};

/// An ordered collection of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    documents: Vec<Document>,
}

/// Wire shape of one JSON record.
#[derive(Debug, Deserialize)]
struct DocumentRecord {
    #[serde(deserialize_with = "id_as_string")]
    id: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    author: Option<String>,
    #[serde(default, alias = "created_at")]
    timestamp: Option<String>,
}

/// Ids arrive as strings or numbers depending on the source API.
fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "document id must be a string or number, got {other}"
        ))),
    }
}

impl From<DocumentRecord> for Document {
    fn from(record: DocumentRecord) -> Self {
        Document::new(record.id, record.text.unwrap_or_default()).with_meta(DocumentMeta {
            author: record.author,
            timestamp: record.timestamp,
        })
    }
}

impl Corpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// One document per string; ids are 1-based positions.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let documents = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| Document::new((i + 1).to_string(), text))
            .collect();
        Self { documents }
    }

    /// One document per line; ids are 1-based line numbers. Blank lines
    /// become empty documents so that numbering matches the source.
    pub fn from_lines(text: &str) -> Self {
        Self::from_texts(text.lines())
    }

    /// Parse a JSON array of `{ id, text, author?, timestamp? }` records.
    ///
    /// A missing or `null` text yields an empty document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let records: Vec<DocumentRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let records: Vec<DocumentRecord> = serde_json::from_reader(reader)?;
        Ok(Self::from_records(records))
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SentimentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    fn from_records(records: Vec<DocumentRecord>) -> Self {
        let documents: Vec<Document> = records.into_iter().map(Document::from).collect();
        #[cfg(feature = "tracing")]
        tracing::debug!(documents = documents.len(), "loaded corpus");
        Self { documents }
    }

    pub fn push(&mut self, document: Document) {
        self.documents.push(document);
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| &*d.id == id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    /// Ids in corpus order.
    pub fn ids(&self) -> impl Iterator<Item = &Arc<str>> {
        self.documents.iter().map(|d| &d.id)
    }
}

impl From<Vec<Document>> for Corpus {
    fn from(documents: Vec<Document>) -> Self {
        Self::new(documents)
    }
}

impl FromIterator<Document> for Corpus {
    fn from_iter<T: IntoIterator<Item = Document>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lines_numbers_lines() {
        let corpus = Corpus::from_lines("first line\n\nthird line");

        assert_eq!(corpus.len(), 3);
        let ids: Vec<&str> = corpus.ids().map(|id| &**id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert!(corpus.get("2").unwrap().is_empty());
        assert_eq!(corpus.get("3").unwrap().text, "third line");
    }

    #[test]
    fn test_from_json_records() {
        let json = r#"[
            { "id": 1001, "text": "Loving the rain", "author": "ana", "created_at": "2016-04-21" },
            { "id": "x-2", "text": null },
            { "id": 7 }
        ]"#;
        let corpus = Corpus::from_json_str(json).unwrap();

        assert_eq!(corpus.len(), 3);
        let first = &corpus.documents()[0];
        assert_eq!(&*first.id, "1001");
        assert_eq!(first.meta.author.as_deref(), Some("ana"));
        assert_eq!(first.meta.timestamp.as_deref(), Some("2016-04-21"));

        assert_eq!(corpus.get("x-2").unwrap().text, "");
        assert_eq!(corpus.get("7").unwrap().text, "");
    }

    #[test]
    fn test_bad_id_is_rejected() {
        let err = Corpus::from_json_str(r#"[{ "id": [1], "text": "a" }]"#).unwrap_err();
        assert!(matches!(err, SentimentError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Corpus::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SentimentError::Io { .. }));
    }

    #[test]
    fn test_collect_and_iterate_in_order() {
        let corpus: Corpus = vec![Document::new("b", "x"), Document::new("a", "y")]
            .into_iter()
            .collect();
        let ids: Vec<&str> = (&corpus).into_iter().map(|d| &*d.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
