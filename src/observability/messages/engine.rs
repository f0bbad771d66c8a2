// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for normalization runs.
//!
//! This module contains message types for logging events related to:
//! * Classification and rendering of single sentences
//! * Per-sentence failures and pass-through
//! * Batch lifecycle (start, completion)

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A sentence was segmented into tokens.
///
/// # Log Level
/// `debug!` - Per-sentence detail
pub struct SentenceClassified {
    pub tokens: usize,
    pub weight: f32,
}

impl Display for SentenceClassified {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Classified into {} tokens (weight {})", self.tokens, self.weight)
    }
}

impl StructuredLog for SentenceClassified {
    fn log(&self) {
        tracing::debug!(tokens = self.tokens, weight = self.weight, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("classified", span_name = name, tokens = self.tokens)
    }
}

/// No verbalizer accepted a classified token. This points at a tagger and
/// verbalizer that disagree on field layout.
///
/// # Log Level
/// `warn!` - Grammar mismatch, surfaced to the caller
///
/// # Example
/// ```
/// use semiotic_wfst::observability::messages::engine::RenderFailed;
///
/// let msg = RenderFailed {
///     token: r#"tokens { date { year: "1402" } }"#,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct RenderFailed<'a> {
    pub token: &'a str,
}

impl Display for RenderFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "No verbalizer accepts {}", self.token)
    }
}

impl StructuredLog for RenderFailed<'_> {
    fn log(&self) {
        tracing::warn!(token = self.token, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!("render_failed", span_name = name)
    }
}

/// A sentence could not be normalized.
///
/// # Log Level
/// `warn!` - The item fails but the run continues
///
/// # Example
/// ```
/// use semiotic_wfst::observability::messages::engine::NormalizationFailed;
///
/// let msg = NormalizationFailed {
///     input: "25:99",
///     error: "no parse",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct NormalizationFailed<'a> {
    pub input: &'a str,
    pub error: &'a str,
}

impl Display for NormalizationFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Normalization of {:?} failed: {}", self.input, self.error)
    }
}

impl StructuredLog for NormalizationFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            input_len = self.input.len(),
            error = self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "normalization_failed",
            span_name = name,
            error = self.error,
        )
    }
}

/// A failed sentence was passed through unchanged.
///
/// # Log Level
/// `debug!` - Expected under the best-effort strategy
pub struct PassedThrough<'a> {
    pub input: &'a str,
}

impl Display for PassedThrough<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Passing {:?} through unchanged", self.input)
    }
}

impl StructuredLog for PassedThrough<'_> {
    fn log(&self) {
        tracing::debug!(input_len = self.input.len(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("passed_through", span_name = name)
    }
}

/// Batch normalization started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use semiotic_wfst::observability::messages::engine::BatchStarted;
///
/// let msg = BatchStarted {
///     direction: "itn",
///     items: 128,
///     max_concurrency: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct BatchStarted<'a> {
    pub direction: &'a str,
    pub items: usize,
    pub max_concurrency: usize,
}

impl Display for BatchStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting {} batch: {} items, max_concurrency={}",
            self.direction, self.items, self.max_concurrency
        )
    }
}

impl StructuredLog for BatchStarted<'_> {
    fn log(&self) {
        tracing::info!(
            direction = self.direction,
            items = self.items,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "batch",
            span_name = name,
            direction = self.direction,
            items = self.items,
            max_concurrency = self.max_concurrency,
        )
    }
}

/// Batch normalization completed.
///
/// # Log Level
/// `info!` - Important operational event
pub struct BatchCompleted {
    pub items: usize,
    pub failures: usize,
    pub duration: std::time::Duration,
}

impl Display for BatchCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Batch completed: {} items, {} failures in {:?}",
            self.items, self.failures, self.duration
        )
    }
}

impl StructuredLog for BatchCompleted {
    fn log(&self) {
        tracing::info!(
            items = self.items,
            failures = self.failures,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "batch_completed",
            span_name = name,
            items = self.items,
            failures = self.failures,
        )
    }
}
