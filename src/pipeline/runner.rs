//! Pipeline runner: orchestrates stage execution and artifact flow.
//!
//! The [`Pipeline`] struct holds a statically-composed set of stages.
//! Calling [`Pipeline::run`] executes them in order, threading artifacts
//! between stages and notifying a [`PipelineObserver`] at each boundary:
//!
//! 1. Tokenize (segment every document, optionally in parallel)
//! 2. Filter (drop stopwords)
//! 3. Join (expand tokens into lexicon matches)
//! 4. Aggregate (count labels per group, score positivity)
//!
//! Build a pipeline programmatically with [`PipelineBuilder`] or from a JSON
//! [`PipelineSpec`] with [`Pipeline::from_spec`].

use crate::corpus::Corpus;
use crate::error::{Result, SentimentError};
use crate::lexicon::{Lexicon, LexiconJoiner, LexiconRecord};
use crate::nlp::stopwords::StopwordFilter;
use crate::nlp::tokenizer::{tokenize_corpus, NestedTokenizer, ParagraphPolicy, Tokenizer};
use crate::pipeline::artifacts::PipelineOutput;
use crate::pipeline::observer::{
    NoopObserver, PipelineObserver, StageClock, StageReport, STAGE_AGGREGATE, STAGE_FILTER,
    STAGE_JOIN, STAGE_TOKENIZE,
};
use crate::pipeline::spec::{PipelineSpec, StopwordSpec};
use crate::pipeline::traits::{NoopFilter, Segmenter, TokenFilter};
use crate::pipeline::validation::ValidationEngine;
use crate::scoring::{aggregate, GroupBy};
use crate::types::{Document, Granularity, MatchedToken, Token};

// ---------------------------------------------------------------------------
// Conditional tracing support
// ---------------------------------------------------------------------------

/// Enter a tracing span for a pipeline stage (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_stage {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("pipeline_stage", stage = $name).entered();
    };
}

/// Emit a debug event with a stage's record counts.
macro_rules! trace_counts {
    ($name:expr, $report:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            stage = $name,
            items_in = $report.items_in,
            items_out = $report.items_out,
            elapsed_us = $report.elapsed.as_micros() as u64,
            "stage complete"
        );
    };
}

// ============================================================================
// Segmentation: flat or nested tokenization
// ============================================================================

/// How documents are cut into tokens.
#[derive(Debug, Clone)]
pub enum Segmentation {
    Flat(Tokenizer),
    Nested(NestedTokenizer),
}

impl Default for Segmentation {
    fn default() -> Self {
        Self::Flat(Tokenizer::default())
    }
}

impl Segmenter for Segmentation {
    fn segment_into(&self, document: &Document, out: &mut Vec<Token>) {
        match self {
            Self::Flat(t) => t.segment_into(document, out),
            Self::Nested(t) => t.segment_into(document, out),
        }
    }
}

// ============================================================================
// Pipeline: statically-composed stage container
// ============================================================================

/// A sentiment pipeline. `F` is the token filter stage.
#[derive(Debug, Clone)]
pub struct Pipeline<F = NoopFilter> {
    pub segmentation: Segmentation,
    pub filter: F,
    pub lexicon: Lexicon,
    pub group_by: GroupBy,
    pub parallel: bool,
}

impl Pipeline<NoopFilter> {
    pub fn builder() -> PipelineBuilder<NoopFilter> {
        PipelineBuilder::new()
    }
}

impl Pipeline<StopwordFilter> {
    /// Build a pipeline from a spec and a lexicon bundle.
    ///
    /// The spec is validated first; any error-level diagnostic aborts with
    /// [`SentimentError::InvalidSpec`] carrying the full report. Warnings are
    /// logged and otherwise ignored. The sub-lexicon named in the spec is
    /// selected from `lexicon_records`.
    pub fn from_spec<I>(spec: &PipelineSpec, lexicon_records: I) -> Result<Self>
    where
        I: IntoIterator<Item = LexiconRecord>,
    {
        let report = ValidationEngine::with_defaults().validate(spec);
        #[cfg(feature = "tracing")]
        for warning in report.warnings() {
            tracing::warn!(%warning, "pipeline spec warning");
        }
        if report.has_errors() {
            return Err(SentimentError::InvalidSpec(report));
        }

        let filter = match &spec.stopwords {
            Some(stopwords) => stopword_filter(stopwords)?,
            None => StopwordFilter::empty(),
        };
        let lexicon = Lexicon::from_records(lexicon_records, spec.lexicon.name.as_deref())?;

        let policy = ParagraphPolicy::exclude_trailing(spec.tokenize.exclude_trailing);
        let inner = Tokenizer::new(spec.tokenize.granularity);
        let segmentation = match spec.tokenize.within {
            Some(outer) => Segmentation::Nested(NestedTokenizer::new(
                Tokenizer::new(outer).with_paragraph_policy(policy),
                inner,
            )),
            None => Segmentation::Flat(inner.with_paragraph_policy(policy)),
        };

        Ok(Pipeline {
            segmentation,
            filter,
            lexicon,
            group_by: spec.group_by,
            parallel: spec.parallel,
        })
    }
}

fn stopword_filter(spec: &StopwordSpec) -> Result<StopwordFilter> {
    let mut filter = match &spec.language {
        Some(language) => StopwordFilter::for_language(language)?,
        None => StopwordFilter::empty(),
    };
    filter.add_stopwords(&spec.words);
    Ok(filter)
}

// ============================================================================
// Pipeline::run: execute stages in order
// ============================================================================

impl<F: TokenFilter> Pipeline<F> {
    /// Execute the pipeline over `documents`.
    ///
    /// The `observer` receives callbacks at each stage boundary. Pass
    /// [`NoopObserver`] (or call [`Pipeline::score`]) when not needed.
    pub fn run(
        &self,
        documents: &[Document],
        observer: &mut impl PipelineObserver,
    ) -> PipelineOutput {
        // Stage 1: Tokenize
        observer.on_stage_start(STAGE_TOKENIZE);
        let clock = StageClock::start();
        let tokens = {
            trace_stage!(STAGE_TOKENIZE);
            tokenize_corpus(&self.segmentation, documents, self.parallel)
        };
        let report = StageReport::new(clock.elapsed(), documents.len(), tokens.len());
        trace_counts!(STAGE_TOKENIZE, report);
        observer.on_stage_end(STAGE_TOKENIZE, &report);
        observer.on_tokens(&tokens);

        // Stage 2: Filter
        observer.on_stage_start(STAGE_FILTER);
        let clock = StageClock::start();
        let tokens_segmented = tokens.len();
        let kept: Vec<Token> = {
            trace_stage!(STAGE_FILTER);
            tokens.into_iter().filter(|t| self.filter.keep(t)).collect()
        };
        let report = StageReport::new(clock.elapsed(), tokens_segmented, kept.len());
        trace_counts!(STAGE_FILTER, report);
        observer.on_stage_end(STAGE_FILTER, &report);

        // Stage 3: Join
        observer.on_stage_start(STAGE_JOIN);
        let clock = StageClock::start();
        let matches: Vec<MatchedToken> = {
            trace_stage!(STAGE_JOIN);
            LexiconJoiner::new(&self.lexicon)
                .join(kept.iter().cloned())
                .collect()
        };
        let report = StageReport::new(clock.elapsed(), kept.len(), matches.len());
        trace_counts!(STAGE_JOIN, report);
        observer.on_stage_end(STAGE_JOIN, &report);
        observer.on_matches(&matches);

        // Stage 4: Aggregate
        observer.on_stage_start(STAGE_AGGREGATE);
        let clock = StageClock::start();
        let scores = {
            trace_stage!(STAGE_AGGREGATE);
            aggregate(matches.iter().cloned(), self.group_by)
        };
        let report = StageReport::new(clock.elapsed(), matches.len(), scores.len());
        trace_counts!(STAGE_AGGREGATE, report);
        observer.on_stage_end(STAGE_AGGREGATE, &report);

        PipelineOutput {
            tokens_segmented,
            tokens: kept,
            matches,
            scores,
        }
    }

    /// Run without an observer.
    pub fn score(&self, documents: &[Document]) -> PipelineOutput {
        self.run(documents, &mut NoopObserver)
    }

    pub fn run_corpus(
        &self,
        corpus: &Corpus,
        observer: &mut impl PipelineObserver,
    ) -> PipelineOutput {
        self.run(corpus.documents(), observer)
    }
}

// ============================================================================
// PipelineBuilder
// ============================================================================

/// Incremental builder for [`Pipeline`]. Swapping the filter changes the
/// builder's type.
#[derive(Debug, Clone)]
pub struct PipelineBuilder<F> {
    segmentation: Segmentation,
    filter: F,
    group_by: GroupBy,
    parallel: bool,
}

impl PipelineBuilder<NoopFilter> {
    /// Word tokens, no filter, grouped by ordinal, sequential.
    pub fn new() -> Self {
        Self {
            segmentation: Segmentation::default(),
            filter: NoopFilter,
            group_by: GroupBy::default(),
            parallel: false,
        }
    }
}

impl Default for PipelineBuilder<NoopFilter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F> PipelineBuilder<F> {
    pub fn granularity(mut self, granularity: Granularity) -> Self {
        self.segmentation = Segmentation::Flat(Tokenizer::new(granularity));
        self
    }

    pub fn tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.segmentation = Segmentation::Flat(tokenizer);
        self
    }

    pub fn nested(mut self, tokenizer: NestedTokenizer) -> Self {
        self.segmentation = Segmentation::Nested(tokenizer);
        self
    }

    /// Override the filter stage.
    pub fn filter<G: TokenFilter>(self, filter: G) -> PipelineBuilder<G> {
        PipelineBuilder {
            segmentation: self.segmentation,
            filter,
            group_by: self.group_by,
            parallel: self.parallel,
        }
    }

    pub fn group_by(mut self, group_by: GroupBy) -> Self {
        self.group_by = group_by;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Consume the builder and produce a [`Pipeline`].
    pub fn build(self, lexicon: Lexicon) -> Pipeline<F> {
        Pipeline {
            segmentation: self.segmentation,
            filter: self.filter,
            lexicon,
            group_by: self.group_by,
            parallel: self.parallel,
        }
    }
}
