//! Validation engine for pipeline specifications.
//!
//! The engine runs all registered [`ValidationRule`]s against a
//! [`PipelineSpec`](super::spec::PipelineSpec) and collects every diagnostic
//! into a [`ValidationReport`]. It never short-circuits on the first error,
//! so users see all problems at once.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use rapid_sentiment::pipeline::validation::ValidationEngine;
//!
//! let engine = ValidationEngine::with_defaults();
//! let report = engine.validate(&spec);
//! if report.has_errors() {
//!     for err in report.errors() {
//!         eprintln!("{err}");
//!     }
//! }
//! ```

use std::collections::HashMap;

use serde::Serialize;

use super::errors::{ErrorCode, PipelineSpecError};
use super::spec::PipelineSpec;
use crate::nlp::stopwords::StopwordFilter;
use crate::types::Granularity;

// ─── Severity ───────────────────────────────────────────────────────────────

/// Whether a diagnostic is a hard error or a soft warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

// ─── Diagnostic ─────────────────────────────────────────────────────────────

/// A single validation finding.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub error: PipelineSpecError,
}

impl ValidationDiagnostic {
    pub fn error(err: PipelineSpecError) -> Self {
        Self {
            severity: Severity::Error,
            error: err,
        }
    }

    pub fn warning(err: PipelineSpecError) -> Self {
        Self {
            severity: Severity::Warning,
            error: err,
        }
    }
}

// ─── Report ─────────────────────────────────────────────────────────────────

/// Collected diagnostics from running all validation rules.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| &d.error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &PipelineSpecError> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .map(|d| &d.error)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Returns `true` if there are no errors (warnings are acceptable).
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

// ─── Rule trait ─────────────────────────────────────────────────────────────

/// A single validation rule that inspects a [`PipelineSpec`] and returns
/// zero or more diagnostics.
pub trait ValidationRule: Send + Sync {
    /// Short, stable identifier for this rule (e.g., `"nesting_order"`).
    fn name(&self) -> &str;

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic>;
}

// ─── Engine ─────────────────────────────────────────────────────────────────

/// Runs a set of [`ValidationRule`]s against a [`PipelineSpec`].
pub struct ValidationEngine {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl ValidationEngine {
    /// Create an empty engine with no rules.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Create an engine pre-loaded with the default rule set.
    pub fn with_defaults() -> Self {
        let mut engine = Self::new();
        engine.add_rule(Box::new(VersionRule));
        engine.add_rule(Box::new(NestingOrderRule));
        engine.add_rule(Box::new(StopwordScopeRule));
        engine.add_rule(Box::new(TrailingExclusionRule));
        engine.add_rule(Box::new(UnknownFieldsRule));
        engine
    }

    pub fn add_rule(&mut self, rule: Box<dyn ValidationRule>) {
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules against `spec` and return the collected report.
    pub fn validate(&self, spec: &PipelineSpec) -> ValidationReport {
        let mut report = ValidationReport::default();
        for rule in &self.rules {
            report.diagnostics.extend(rule.validate(spec));
        }
        report
    }
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Concrete rules
// ═══════════════════════════════════════════════════════════════════════════

// ─── 1. Only v1 is understood ───────────────────────────────────────────────

struct VersionRule;

impl ValidationRule for VersionRule {
    fn name(&self) -> &str {
        "version"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        if spec.v == 1 {
            return vec![];
        }
        vec![ValidationDiagnostic::error(
            PipelineSpecError::new(
                ErrorCode::UnsupportedVersion,
                "/v",
                format!("unsupported spec version {}", spec.v),
            )
            .with_hint("Set \"v\": 1"),
        )]
    }
}

// ─── 2. Outer unit must be coarser than the token unit ──────────────────────

struct NestingOrderRule;

impl ValidationRule for NestingOrderRule {
    fn name(&self) -> &str {
        "nesting_order"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        let inner = spec.tokenize.granularity;
        match spec.tokenize.within {
            Some(outer) if !outer.is_coarser_than(inner) => {
                vec![ValidationDiagnostic::error(
                    PipelineSpecError::new(
                        ErrorCode::InvalidCombo,
                        "/tokenize/within",
                        format!("cannot split {inner} tokens within {outer} units"),
                    )
                    .with_hint("\"within\" must be a larger unit than \"granularity\""),
                )]
            }
            _ => vec![],
        }
    }
}

// ─── 3. Stopwords only affect word tokens; languages must exist ─────────────

struct StopwordScopeRule;

impl ValidationRule for StopwordScopeRule {
    fn name(&self) -> &str {
        "stopword_scope"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        let Some(stopwords) = &spec.stopwords else {
            return vec![];
        };
        let mut out = Vec::new();

        if let Some(language) = &stopwords.language {
            if StopwordFilter::for_language(language).is_err() {
                out.push(ValidationDiagnostic::error(
                    PipelineSpecError::new(
                        ErrorCode::InvalidValue,
                        "/stopwords/language",
                        format!("no built-in stopword list for \"{language}\""),
                    )
                    .with_hint("Use a language code such as \"en\", or list words explicitly"),
                ));
            }
        } else if stopwords.words.is_empty() {
            out.push(ValidationDiagnostic::warning(
                PipelineSpecError::new(
                    ErrorCode::NoEffect,
                    "/stopwords",
                    "stopwords section names no language and no words",
                )
                .with_hint("Remove the section or add \"language\" / \"words\""),
            ));
        }

        if spec.token_granularity() != Granularity::Word {
            out.push(ValidationDiagnostic::warning(
                PipelineSpecError::new(
                    ErrorCode::NoEffect,
                    "/stopwords",
                    format!(
                        "stopwords are ignored for {} tokens",
                        spec.token_granularity()
                    ),
                )
                .with_hint("Tokenize by word to filter stopwords"),
            ));
        }

        out
    }
}

// ─── 4. Trailing exclusion needs paragraph segmentation ─────────────────────

struct TrailingExclusionRule;

impl ValidationRule for TrailingExclusionRule {
    fn name(&self) -> &str {
        "trailing_exclusion"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        if spec.tokenize.exclude_trailing == 0 || spec.splits_paragraphs() {
            return vec![];
        }
        vec![ValidationDiagnostic::warning(
            PipelineSpecError::new(
                ErrorCode::NoEffect,
                "/tokenize/exclude_trailing",
                "exclude_trailing only applies to paragraph segmentation",
            )
            .with_hint("Set granularity or within to \"paragraph\""),
        )]
    }
}

// ─── 5. Unknown fields (strict → error, non-strict → warning) ──────────────

struct UnknownFieldsRule;

impl UnknownFieldsRule {
    /// Collect unknown-field diagnostics at the given JSON pointer `path`.
    fn check_unknowns(
        path: &str,
        unknowns: &HashMap<String, serde_json::Value>,
        strict: bool,
    ) -> Vec<ValidationDiagnostic> {
        let mut keys: Vec<&String> = unknowns.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| {
                let diag_fn = if strict {
                    ValidationDiagnostic::error
                } else {
                    ValidationDiagnostic::warning
                };
                diag_fn(
                    PipelineSpecError::new(
                        ErrorCode::UnknownField,
                        format!("{path}/{key}"),
                        format!("unrecognized field \"{key}\""),
                    )
                    .with_hint("Check spelling or remove this field"),
                )
            })
            .collect()
    }
}

impl ValidationRule for UnknownFieldsRule {
    fn name(&self) -> &str {
        "unknown_fields"
    }

    fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
        let mut out = Vec::new();
        out.extend(Self::check_unknowns("", &spec.unknown_fields, spec.strict));
        out.extend(Self::check_unknowns(
            "/tokenize",
            &spec.tokenize.unknown_fields,
            spec.strict,
        ));
        if let Some(stopwords) = &spec.stopwords {
            out.extend(Self::check_unknowns(
                "/stopwords",
                &stopwords.unknown_fields,
                spec.strict,
            ));
        }
        out.extend(Self::check_unknowns(
            "/lexicon",
            &spec.lexicon.unknown_fields,
            spec.strict,
        ));
        out
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(json: &str) -> PipelineSpec {
        PipelineSpec::from_json(json).unwrap()
    }

    fn engine() -> ValidationEngine {
        ValidationEngine::with_defaults()
    }

    fn codes(report: &ValidationReport) -> Vec<(Severity, ErrorCode, String)> {
        report
            .diagnostics
            .iter()
            .map(|d| (d.severity, d.error.code, d.error.path.clone()))
            .collect()
    }

    // ─── Valid specs ────────────────────────────────────────────────────

    #[test]
    fn test_minimal_spec_is_valid() {
        let report = engine().validate(&spec(r#"{ "v": 1 }"#));
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn test_words_within_paragraphs_is_valid() {
        let report = engine().validate(&spec(
            r#"{
                "v": 1,
                "tokenize": { "granularity": "word", "within": "paragraph", "exclude_trailing": 2 },
                "stopwords": { "language": "en" },
                "lexicon": { "name": "nrc" }
            }"#,
        ));
        assert!(report.is_empty(), "{:?}", report.diagnostics);
    }

    // ─── Errors ─────────────────────────────────────────────────────────

    #[test]
    fn test_unsupported_version() {
        let report = engine().validate(&spec(r#"{ "v": 2 }"#));
        assert!(report.has_errors());
        assert_eq!(report.errors().next().unwrap().code, ErrorCode::UnsupportedVersion);
    }

    #[test]
    fn test_within_must_be_coarser() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "tokenize": { "granularity": "paragraph", "within": "sentence" } }"#,
        ));
        let err = report.errors().next().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidCombo);
        assert_eq!(err.path, "/tokenize/within");
        assert!(err.message.contains("paragraph"));

        let same = engine().validate(&spec(
            r#"{ "v": 1, "tokenize": { "granularity": "word", "within": "word" } }"#,
        ));
        assert!(same.has_errors());
    }

    #[test]
    fn test_unknown_stopword_language() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "stopwords": { "language": "elvish" } }"#,
        ));
        let err = report.errors().next().unwrap();
        assert_eq!(err.code, ErrorCode::InvalidValue);
        assert_eq!(err.path, "/stopwords/language");
    }

    #[test]
    fn test_all_errors_are_collected() {
        let report = engine().validate(&spec(
            r#"{
                "v": 3,
                "tokenize": { "granularity": "sentence", "within": "word" },
                "stopwords": { "language": "elvish" },
                "strict": true,
                "extra": 1
            }"#,
        ));
        let error_codes: Vec<ErrorCode> = report.errors().map(|e| e.code).collect();
        assert_eq!(
            error_codes,
            vec![
                ErrorCode::UnsupportedVersion,
                ErrorCode::InvalidCombo,
                ErrorCode::InvalidValue,
                ErrorCode::UnknownField
            ]
        );
        // Stopwords on sentence tokens is still reported as a warning.
        assert_eq!(report.warnings().count(), 1);
    }

    // ─── Warnings ───────────────────────────────────────────────────────

    #[test]
    fn test_stopwords_on_sentences_warns() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "tokenize": { "granularity": "sentence" }, "stopwords": { "words": ["a"] } }"#,
        ));
        assert!(report.is_valid());
        assert_eq!(
            codes(&report),
            vec![(Severity::Warning, ErrorCode::NoEffect, "/stopwords".to_string())]
        );
    }

    #[test]
    fn test_empty_stopword_section_warns() {
        let report = engine().validate(&spec(r#"{ "v": 1, "stopwords": {} }"#));
        assert!(report.is_valid());
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_exclude_trailing_without_paragraphs_warns() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "tokenize": { "granularity": "sentence", "exclude_trailing": 1 } }"#,
        ));
        assert!(report.is_valid());
        assert_eq!(
            codes(&report),
            vec![(
                Severity::Warning,
                ErrorCode::NoEffect,
                "/tokenize/exclude_trailing".to_string()
            )]
        );
    }

    #[test]
    fn test_unknown_fields_non_strict_warn() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "foo": 1, "lexicon": { "nmae": "nrc" } }"#,
        ));
        assert!(report.is_valid());
        let paths: Vec<&str> = report.warnings().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["/foo", "/lexicon/nmae"]);
    }

    #[test]
    fn test_unknown_fields_strict_error() {
        let report = engine().validate(&spec(
            r#"{ "v": 1, "strict": true, "tokenize": { "lowercase": true } }"#,
        ));
        assert!(report.has_errors());
        assert_eq!(report.errors().next().unwrap().path, "/tokenize/lowercase");
    }

    // ─── Engine ─────────────────────────────────────────────────────────

    #[test]
    fn test_custom_rule() {
        struct NoParallel;
        impl ValidationRule for NoParallel {
            fn name(&self) -> &str {
                "no_parallel"
            }
            fn validate(&self, spec: &PipelineSpec) -> Vec<ValidationDiagnostic> {
                if spec.parallel {
                    vec![ValidationDiagnostic::error(PipelineSpecError::new(
                        ErrorCode::InvalidValue,
                        "/parallel",
                        "parallel disabled here",
                    ))]
                } else {
                    vec![]
                }
            }
        }

        let mut engine = ValidationEngine::new();
        engine.add_rule(Box::new(NoParallel));
        assert_eq!(engine.rule_names(), vec!["no_parallel"]);
        assert!(engine
            .validate(&spec(r#"{ "v": 1, "parallel": true }"#))
            .has_errors());
    }

    #[test]
    fn test_report_serializes() {
        let report = engine().validate(&spec(r#"{ "v": 9 }"#));
        let json = serde_json::to_value(&report).unwrap();
        let first = &json["diagnostics"][0];
        assert_eq!(first["severity"], "error");
        assert_eq!(first["code"], "unsupported_version");
        assert_eq!(first["path"], "/v");
    }
}
