//! Aggregation and positivity scoring
//!
//! Matched tokens are grouped by a key (paragraph ordinal, document, ...)
//! and counted per label. Counts live in a dense `(group, label)` table
//! that is zero-initialised for every label seen anywhere in the run, so
//! every [`UnitScore`] exposes the same label keys.

pub mod frequency;

use std::collections::BTreeMap;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::types::{MatchedToken, SentimentLabel, Token};

/// Smoothed sentiment balance: `(p - n) / (p + n + 1)`.
///
/// The `+ 1` keeps the denominator positive and pulls low-evidence groups
/// toward zero. The result lies in (-1, 1) and is 0 when `p == n`.
pub fn positivity(positive: u64, negative: u64) -> f64 {
    (positive as f64 - negative as f64) / (positive as f64 + negative as f64 + 1.0)
}

/// Built-in grouping strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// Token ordinal alone. Equal ordinals from different documents merge.
    #[default]
    Ordinal,
    /// Source document id.
    Document,
    /// `(document, ordinal)`, keeping documents apart.
    DocumentOrdinal,
    /// Everything in one group.
    Corpus,
}

impl GroupBy {
    pub fn key(&self, token: &Token) -> GroupKey {
        match self {
            Self::Ordinal => GroupKey::Ordinal(token.ordinal),
            Self::Document => GroupKey::Document(Arc::clone(&token.document_id)),
            Self::DocumentOrdinal => {
                GroupKey::DocumentOrdinal(Arc::clone(&token.document_id), token.ordinal)
            }
            Self::Corpus => GroupKey::Corpus,
        }
    }
}

/// Key produced by [`GroupBy`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Ordinal(usize),
    Document(Arc<str>),
    DocumentOrdinal(Arc<str>, usize),
    Corpus,
}

/// Aggregated sentiment for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitScore {
    /// Count per label, including zeros for labels absent from this group.
    pub counts: BTreeMap<SentimentLabel, u64>,
    pub positivity: f64,
}

impl UnitScore {
    pub fn count(&self, label: &str) -> u64 {
        self.counts
            .iter()
            .find(|(l, _)| l.as_str() == label)
            .map_or(0, |(_, c)| *c)
    }

    pub fn positive(&self) -> u64 {
        self.count(SentimentLabel::POSITIVE)
    }

    pub fn negative(&self) -> u64 {
        self.count(SentimentLabel::NEGATIVE)
    }

    /// Total matches in the group across all labels.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }
}

/// Sort direction for [`ScoreTable::ranked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// One group of a [`ScoreTable`], flattened for serialization.
#[derive(Debug, Serialize)]
pub struct ScoreRow<'a, K> {
    pub key: &'a K,
    #[serde(flatten)]
    pub score: &'a UnitScore,
}

/// Result of one aggregation run.
#[derive(Debug, Clone)]
pub struct ScoreTable<K: Ord> {
    /// Every label observed in the run, sorted.
    labels: Vec<SentimentLabel>,
    /// Groups in ascending key order.
    rows: BTreeMap<K, UnitScore>,
}

impl<K: Ord> ScoreTable<K> {
    pub fn labels(&self) -> &[SentimentLabel] {
        &self.labels
    }

    pub fn get(&self, key: &K) -> Option<&UnitScore> {
        self.rows.get(key)
    }

    /// Groups in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &UnitScore)> {
        self.rows.iter()
    }

    /// Rows as a serializable list; keys need not be strings.
    pub fn rows(&self) -> Vec<ScoreRow<'_, K>> {
        self.rows
            .iter()
            .map(|(key, score)| ScoreRow { key, score })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Groups ordered by positivity. The sort is stable over key order, so
    /// ties stay in ascending key order in both directions.
    pub fn ranked(&self, order: Order) -> Vec<(&K, &UnitScore)> {
        let mut ranked: Vec<_> = self.rows.iter().collect();
        match order {
            Order::Ascending => ranked.sort_by(|a, b| a.1.positivity.total_cmp(&b.1.positivity)),
            Order::Descending => ranked.sort_by(|a, b| b.1.positivity.total_cmp(&a.1.positivity)),
        }
        ranked
    }

    pub fn most_positive(&self, n: usize) -> Vec<(&K, &UnitScore)> {
        let mut ranked = self.ranked(Order::Descending);
        ranked.truncate(n);
        ranked
    }

    pub fn most_negative(&self, n: usize) -> Vec<(&K, &UnitScore)> {
        let mut ranked = self.ranked(Order::Ascending);
        ranked.truncate(n);
        ranked
    }

    pub fn into_rows(self) -> BTreeMap<K, UnitScore> {
        self.rows
    }
}

/// Aggregate with one of the built-in [`GroupBy`] strategies.
pub fn aggregate<I>(matches: I, group_by: GroupBy) -> ScoreTable<GroupKey>
where
    I: IntoIterator<Item = MatchedToken>,
{
    aggregate_by(matches, |m| group_by.key(&m.token))
}

/// Aggregate with a caller-chosen key.
///
/// Keys are trusted as given: matches that map to the same key are counted
/// together whatever document they came from.
pub fn aggregate_by<I, K, F>(matches: I, mut key_fn: F) -> ScoreTable<K>
where
    I: IntoIterator<Item = MatchedToken>,
    K: Ord + Clone,
    F: FnMut(&MatchedToken) -> K,
{
    // First pass: intern groups and labels, remembering (group, label) per match.
    let mut group_index: BTreeMap<K, usize> = BTreeMap::new();
    let mut label_index: FxHashMap<SentimentLabel, usize> = FxHashMap::default();
    let mut hits: Vec<(usize, usize)> = Vec::new();

    for m in matches {
        let key = key_fn(&m);
        let next_group = group_index.len();
        let g = *group_index.entry(key).or_insert(next_group);
        let next_label = label_index.len();
        let l = *label_index.entry(m.label).or_insert(next_label);
        hits.push((g, l));
    }

    // Dense count table, zero for every (group, label) cell.
    let num_labels = label_index.len();
    let mut table = vec![0u64; group_index.len() * num_labels];
    for (g, l) in hits {
        table[g * num_labels + l] += 1;
    }

    let mut labels: Vec<(SentimentLabel, usize)> = label_index.into_iter().collect();
    labels.sort_by(|a, b| a.0.cmp(&b.0));

    let rows = group_index
        .into_iter()
        .map(|(key, g)| {
            let row = &table[g * num_labels..(g + 1) * num_labels];
            let counts: BTreeMap<SentimentLabel, u64> = labels
                .iter()
                .map(|(label, l)| (label.clone(), row[*l]))
                .collect();
            let positive = labels
                .iter()
                .find(|(label, _)| label.is_positive())
                .map_or(0, |(_, l)| row[*l]);
            let negative = labels
                .iter()
                .find(|(label, _)| label.is_negative())
                .map_or(0, |(_, l)| row[*l]);
            let score = UnitScore {
                counts,
                positivity: positivity(positive, negative),
            };
            (key, score)
        })
        .collect();

    ScoreTable {
        labels: labels.into_iter().map(|(label, _)| label).collect(),
        rows,
    }
}
