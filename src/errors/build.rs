// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::{AlgebraError, ConfigError};
use thiserror::Error;

/// Structural failures while assembling a grammar registry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    /// The compiled automaton grew past the configured safety bound.
    #[error("Automaton '{name}' has {states} states, exceeding the bound of {limit}")]
    StateLimitExceeded {
        name: String,
        states: usize,
        limit: usize,
    },

    #[error("Duplicate {kind} grammar: '{name}'")]
    DuplicateGrammar { kind: String, name: String },

    #[error("Grammar '{grammar}' depends on '{missing}' which does not exist")]
    UnresolvedDependency { grammar: String, missing: String },

    #[error("Cyclic grammar dependency detected: {}", cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("Grammar '{grammar}' does not export '{export}'")]
    MissingExport { grammar: String, export: String },

    #[error("No {0} grammar registered")]
    MissingGrammar(&'static str),
}

/// Any failure that stops grammar compilation.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error(transparent)]
    Algebra(#[from] AlgebraError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Build(#[from] BuildError),
}
