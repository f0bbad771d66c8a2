// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Bad configuration or lexical-table input. Fatal at build time.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Same key mapped to different values without explicit weights to rank them.
    #[error("Lexical table '{table}' maps key {key:?} to conflicting values {first:?} and {second:?}")]
    ConflictingEntry {
        table: String,
        key: String,
        first: String,
        second: String,
    },

    #[error("Lexical table '{table}' line {line}: {reason}")]
    MalformedRow {
        table: String,
        line: usize,
        reason: String,
    },

    #[error("Lexical table '{0}' is not loaded")]
    MissingTable(String),

    #[error("Lexical table '{table}' has no entry for {key:?}")]
    MissingEntry { table: String, key: String },

    #[error("Marker '{0}' is missing from the markers table")]
    MissingMarker(String),

    #[error("Invalid priority for '{class}': {reason}")]
    InvalidPriority { class: String, reason: String },

    #[error("Invalid limit '{name}': {reason}")]
    InvalidLimit { name: &'static str, reason: String },

    #[error("Unknown lexical table override '{0}'")]
    UnknownTable(String),

    /// Every problem found by validation, in the order checked.
    #[error(
        "Configuration rejected with {} error(s): {}",
        .0.len(),
        .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    )]
    Rejected(Vec<ConfigError>),
}
