// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for configuration and lexicon validation.
//!
//! This module contains message types for logging events related to:
//! * Grammar dependency validation
//! * Configuration errors collected before a build
//! * Lexicon tables replaced from disk

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use tracing::Span;

/// Cyclic dependency detected between grammars.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use semiotic_wfst::observability::messages::validation::CyclicDependencyDetected;
///
/// let cycle = vec!["fraction", "ordinal", "fraction"];
/// let msg = CyclicDependencyDetected {
///     cycle: &cycle,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct CyclicDependencyDetected<'a> {
    pub cycle: &'a [&'a str],
}

impl Display for CyclicDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic dependency detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicDependencyDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "cyclic_dependency",
            name = name,
            cycle = self.cycle.join(" -> "),
        )
    }
}

/// Configuration rejected during validation.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ConfigRejected<'a> {
    pub error_count: usize,
    pub first_error: &'a str,
}

impl Display for ConfigRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Configuration rejected with {} error(s), first: {}",
            self.error_count, self.first_error
        )
    }
}

impl StructuredLog for ConfigRejected<'_> {
    fn log(&self) {
        tracing::error!(
            error_count = self.error_count,
            first_error = self.first_error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "config_rejected",
            span_name = name,
            error_count = self.error_count,
        )
    }
}

/// A built-in lexicon table was replaced by a file.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use semiotic_wfst::observability::messages::validation::LexiconOverrideLoaded;
/// use std::path::Path;
///
/// let msg = LexiconOverrideLoaded {
///     table: "currency_words",
///     path: Path::new("/etc/semiotic/currency_words.tsv"),
///     entries: 4,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct LexiconOverrideLoaded<'a> {
    pub table: &'a str,
    pub path: &'a Path,
    pub entries: usize,
}

impl Display for LexiconOverrideLoaded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Lexicon table '{}' loaded from {} ({} entries)",
            self.table,
            self.path.display(),
            self.entries
        )
    }
}

impl StructuredLog for LexiconOverrideLoaded<'_> {
    fn log(&self) {
        tracing::info!(
            table = self.table,
            path = %self.path.display(),
            entries = self.entries,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "lexicon_override",
            span_name = name,
            table = self.table,
            path = %self.path.display(),
        )
    }
}
