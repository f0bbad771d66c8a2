// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    default_max_concurrency, DEFAULT_MAX_CANDIDATES, DEFAULT_MAX_EXPANSIONS, DEFAULT_MAX_STATES,
};
use crate::errors::{ConfigError, FailureStrategy};
use crate::grammar::Direction;
use crate::lexicon::Language;
use crate::observability::messages::validation::ConfigRejected;
use crate::observability::messages::StructuredLog;
use crate::token::SemioticClass;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one normalizer, typically loaded from YAML.
///
/// Every field is optional; an empty document gives a deterministic
/// Persian text normalizer.
///
/// # Example
/// ```yaml
/// language: fa
/// direction: itn
/// deterministic: false
/// failure_strategy: best_effort
/// limits:
///   max_candidates: 8
/// priorities:
///   time: 0.9
/// lexicon:
///   currency_words: tables/currency_words.tsv
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default = "enabled")]
    pub deterministic: bool,
    #[serde(default)]
    pub failure_strategy: FailureStrategy,
    /// Canonicalize field order between classification and verbalization.
    #[serde(default = "enabled")]
    pub reorder_fields: bool,
    #[serde(default)]
    pub limits: Limits,
    /// Per-class weight overrides. Lower is preferred.
    #[serde(default)]
    pub priorities: HashMap<SemioticClass, f32>,
    /// Lexical table name to a TSV file replacing the built-in table.
    /// Relative paths are resolved against the config file's directory.
    #[serde(default)]
    pub lexicon: HashMap<String, PathBuf>,
}

fn enabled() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: Language::default(),
            direction: Direction::default(),
            deterministic: true,
            failure_strategy: FailureStrategy::default(),
            reorder_fields: true,
            limits: Limits::default(),
            priorities: HashMap::new(),
            lexicon: HashMap::new(),
        }
    }
}

/// Resource bounds. Missing fields take the defaults from
/// [`consts`](crate::config::consts).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_states: usize,
    pub max_candidates: usize,
    pub max_expansions: usize,
    pub max_concurrency: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_states: DEFAULT_MAX_STATES,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            max_concurrency: default_max_concurrency(),
        }
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut cfg: Config = serde_yaml::from_str(&content)?;

    if let Some(base) = path.parent() {
        for table in cfg.lexicon.values_mut() {
            if table.is_relative() {
                *table = base.join(&*table);
            }
        }
    }
    Ok(cfg)
}

/// Load and validate a config from a YAML file
///
/// Every validation problem is reported at once inside
/// [`ConfigError::Rejected`].
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;

    if let Err(errors) = crate::config::validate_config(&cfg) {
        let first = errors.first().map(ToString::to_string).unwrap_or_default();
        ConfigRejected {
            error_count: errors.len(),
            first_error: &first,
        }
        .log();
        return Err(ConfigError::Rejected(errors));
    }

    Ok(cfg)
}
