//! Pipeline artifacts.
//!
//! [`PipelineOutput`] bundles what the stages produced so callers can go
//! back from a group score to the tokens and matches behind it.

use crate::scoring::frequency::{label_contributions, word_counts, Contribution};
use crate::scoring::{GroupKey, ScoreTable};
use crate::types::{MatchedToken, Token};

/// Everything one [`super::runner::Pipeline::run`] call produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Tokens emitted by segmentation, before filtering.
    pub tokens_segmented: usize,
    /// Tokens that survived the filter, in corpus order.
    pub tokens: Vec<Token>,
    /// Lexicon matches, in token order.
    pub matches: Vec<MatchedToken>,
    /// Per-group scores.
    pub scores: ScoreTable<GroupKey>,
}

impl PipelineOutput {
    /// Tokens removed by the filter stage.
    pub fn tokens_filtered(&self) -> usize {
        self.tokens_segmented - self.tokens.len()
    }

    /// Frequency of each surviving token unit.
    pub fn word_counts(&self) -> Vec<(String, u64)> {
        word_counts(&self.tokens)
    }

    /// Which words drove each label.
    pub fn contributions(&self) -> Vec<Contribution> {
        label_contributions(&self.matches)
    }
}
