// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! # Organization
//!
//! * `grammar` - grammar compilation and registry assembly
//! * `engine` - classification, verbalization and batch runs
//! * `validation` - configuration and lexicon validation
//!
//! # Usage Pattern
//!
//! ```rust
//! use semiotic_wfst::observability::messages::grammar::GrammarCompiled;
//! use std::time::Duration;
//!
//! let msg = GrammarCompiled {
//!     name: "cardinal",
//!     kind: "classify",
//!     states: 120,
//!     transitions: 480,
//!     duration: Duration::from_millis(3),
//! };
//!
//! tracing::debug!("{}", msg);
//! ```

use tracing::Span;

pub mod engine;
pub mod grammar;
pub mod validation;

/// A message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emits the message as a tracing event at its documented level.
    fn log(&self);

    /// Opens a span carrying the message fields.
    fn span(&self, name: &str) -> Span;
}
