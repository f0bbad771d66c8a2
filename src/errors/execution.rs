// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::Deserialize;
use thiserror::Error;

/// Per-sentence runtime failures. These never abort a batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NormalizeError {
    /// No accepting path covers the whole input.
    #[error("No parse covers the input {input:?}")]
    NoParse { input: String },

    /// A structured token could not be rendered by any verbalizer.
    #[error("No rendering for token {token:?}")]
    NoRender { token: String },

    /// The structured token stream could not be read back.
    #[error("Malformed token stream at byte {offset}: {reason}")]
    MalformedTokens { offset: usize, reason: String },

    /// A worker failed outside normalization itself, e.g. a panicked task.
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// What the orchestrator does with a sentence that failed to normalize.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    /// Report the failure for that item and keep going.
    #[default]
    ContinueOnError,
    /// Pass the input through unchanged, as if it were a single word.
    BestEffort,
}
