// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for grammar compilation events.
//!
//! This module contains message types for logging events related to:
//! * Per-grammar compilation results
//! * Dependency level computation
//! * Classifier and verbalizer assembly

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A single grammar finished compiling.
///
/// # Log Level
/// `debug!` - Detailed build information
///
/// # Example
/// ```
/// use semiotic_wfst::observability::messages::grammar::GrammarCompiled;
/// use std::time::Duration;
///
/// let msg = GrammarCompiled {
///     name: "time",
///     kind: "verbalize",
///     states: 42,
///     transitions: 97,
///     duration: Duration::from_millis(1),
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct GrammarCompiled<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub states: usize,
    pub transitions: usize,
    pub duration: Duration,
}

impl Display for GrammarCompiled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Compiled {} grammar '{}': {} states, {} transitions in {:?}",
            self.kind, self.name, self.states, self.transitions, self.duration
        )
    }
}

impl StructuredLog for GrammarCompiled<'_> {
    fn log(&self) {
        tracing::debug!(
            grammar = self.name,
            kind = self.kind,
            states = self.states,
            transitions = self.transitions,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "grammar_compiled",
            span_name = name,
            grammar = self.name,
            kind = self.kind,
            states = self.states,
        )
    }
}

/// Grammar dependency levels computed.
///
/// # Log Level
/// `debug!` - Detailed build information
pub struct GrammarLevelsComputed {
    pub level_count: usize,
    pub grammar_count: usize,
}

impl Display for GrammarLevelsComputed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Computed {} compilation levels for {} grammars",
            self.level_count, self.grammar_count
        )
    }
}

impl StructuredLog for GrammarLevelsComputed {
    fn log(&self) {
        tracing::debug!(
            level_count = self.level_count,
            grammar_count = self.grammar_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "grammar_levels",
            span_name = name,
            level_count = self.level_count,
            grammar_count = self.grammar_count,
        )
    }
}

/// Classifier and verbalizer assembled from the compiled grammars.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use semiotic_wfst::observability::messages::grammar::RegistryComposed;
/// use std::time::Duration;
///
/// let msg = RegistryComposed {
///     language: "fa",
///     direction: "tn",
///     grammar_count: 20,
///     classifier_states: 9000,
///     verbalizer_states: 4000,
///     duration: Duration::from_secs(2),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct RegistryComposed<'a> {
    pub language: &'a str,
    pub direction: &'a str,
    pub grammar_count: usize,
    pub classifier_states: usize,
    pub verbalizer_states: usize,
    pub duration: Duration,
}

impl Display for RegistryComposed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Composed {}/{} grammars ({} grammars): classifier {} states, verbalizer {} states in {:?}",
            self.language,
            self.direction,
            self.grammar_count,
            self.classifier_states,
            self.verbalizer_states,
            self.duration
        )
    }
}

impl StructuredLog for RegistryComposed<'_> {
    fn log(&self) {
        tracing::info!(
            language = self.language,
            direction = self.direction,
            grammar_count = self.grammar_count,
            classifier_states = self.classifier_states,
            verbalizer_states = self.verbalizer_states,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "registry_composed",
            span_name = name,
            language = self.language,
            direction = self.direction,
        )
    }
}

/// A compiled automaton exceeded the configured state bound.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct StateLimitExceeded<'a> {
    pub name: &'a str,
    pub states: usize,
    pub limit: usize,
}

impl Display for StateLimitExceeded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Grammar '{}' has {} states, over the limit of {}",
            self.name, self.states, self.limit
        )
    }
}

impl StructuredLog for StateLimitExceeded<'_> {
    fn log(&self) {
        tracing::error!(
            grammar = self.name,
            states = self.states,
            limit = self.limit,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "state_limit_exceeded",
            span_name = name,
            grammar = self.name,
            states = self.states,
        )
    }
}
