//! Pipeline observer: hooks for logging, profiling, and debugging.
//!
//! Observers receive notifications at stage boundaries without coupling to
//! stage logic: timing stages, capturing intermediate artifacts, emitting
//! structured telemetry.

use std::time::{Duration, Instant};

use crate::types::{MatchedToken, Token};

pub const STAGE_TOKENIZE: &str = "tokenize";
pub const STAGE_FILTER: &str = "filter";
pub const STAGE_JOIN: &str = "join";
pub const STAGE_AGGREGATE: &str = "aggregate";

/// Stages in execution order.
pub const STAGES: [&str; 4] = [STAGE_TOKENIZE, STAGE_FILTER, STAGE_JOIN, STAGE_AGGREGATE];

/// Wall-clock timer for one stage.
#[derive(Debug, Clone, Copy)]
pub struct StageClock(Instant);

impl StageClock {
    pub fn start() -> Self {
        Self(Instant::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// What a stage did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub elapsed: Duration,
    /// Records the stage consumed.
    pub items_in: usize,
    /// Records the stage produced.
    pub items_out: usize,
}

impl StageReport {
    pub fn new(elapsed: Duration, items_in: usize, items_out: usize) -> Self {
        Self {
            elapsed,
            items_in,
            items_out,
        }
    }
}

/// Callbacks fired by [`super::runner::Pipeline::run`]. Every method has an
/// empty default, so implementors override only what they need.
pub trait PipelineObserver {
    fn on_stage_start(&mut self, _stage: &'static str) {}

    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// Tokens after segmentation, before filtering.
    fn on_tokens(&mut self, _tokens: &[Token]) {}

    fn on_matches(&mut self, _matches: &[MatchedToken]) {}
}

/// Ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Records the report of every stage in order.
#[derive(Debug, Clone, Default)]
pub struct TimingObserver {
    pub reports: Vec<(&'static str, StageReport)>,
}

impl TimingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> Duration {
        self.reports.iter().map(|(_, r)| r.elapsed).sum()
    }

    pub fn report(&self, stage: &str) -> Option<&StageReport> {
        self.reports
            .iter()
            .find(|(name, _)| *name == stage)
            .map(|(_, r)| r)
    }
}

impl PipelineObserver for TimingObserver {
    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.reports.push((stage, *report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_observer_records_in_order() {
        let mut observer = TimingObserver::new();
        for (i, &stage) in STAGES.iter().enumerate() {
            observer.on_stage_start(stage);
            observer.on_stage_end(stage, &StageReport::new(Duration::from_millis(i as u64), i, i));
        }

        let names: Vec<&str> = observer.reports.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, STAGES.to_vec());
        assert_eq!(observer.total(), Duration::from_millis(6));
        assert_eq!(observer.report(STAGE_JOIN).unwrap().items_out, 2);
        assert!(observer.report("nope").is_none());
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = StageClock::start();
        let a = clock.elapsed();
        let b = clock.elapsed();
        assert!(b >= a);
    }
}
