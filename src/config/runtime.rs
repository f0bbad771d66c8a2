// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{load_and_validate_config, Config};
use crate::engine::{Normalizer, NormalizerOptions};
use crate::errors::FailureStrategy;
use crate::grammar::{PriorityTable, RegistryOptions};
use crate::grammars::compile;
use crate::lexicon::Lexicon;
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;

/// Turns a configuration into a ready [`Normalizer`].
///
/// Loads the built-in lexicon for the configured language, applies table
/// overrides, compiles the grammar set and wires the engine options.
/// Compilation is the expensive step; build once and share the result.
///
/// # Examples
///
/// ```no_run
/// use semiotic_wfst::config::{Config, RuntimeBuilder};
/// use semiotic_wfst::errors::FailureStrategy;
///
/// let (normalizer, failure_strategy) = RuntimeBuilder::from_config(&Config::default()).unwrap();
///
/// assert_eq!(failure_strategy, FailureStrategy::ContinueOnError);
/// assert_eq!(normalizer.normalize("123").unwrap(), "صد و بیست و سه");
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build a normalizer from an already validated configuration.
    pub fn from_config(cfg: &Config) -> anyhow::Result<(Normalizer, FailureStrategy)> {
        let lexicon = Lexicon::builtin(cfg.language)
            .with_context(|| format!("loading built-in lexicon for '{}'", cfg.language))?
            .with_overrides(&cfg.lexicon)
            .context("applying lexicon overrides")?;
        let policy = PriorityTable::default()
            .with_overrides(&cfg.priorities)
            .context("applying priority overrides")?;

        let options = RegistryOptions {
            deterministic: cfg.deterministic,
            max_states: cfg.limits.max_states,
            max_concurrency: cfg.limits.max_concurrency,
            ..RegistryOptions::default()
        };
        let registry = compile(&lexicon, cfg.direction, &policy, &options)
            .with_context(|| format!("compiling {} grammars", cfg.direction))?;

        let normalizer = Normalizer::new(
            Arc::new(registry),
            NormalizerOptions {
                failure_strategy: cfg.failure_strategy,
                reorder_fields: cfg.reorder_fields,
                max_candidates: cfg.limits.max_candidates,
                max_expansions: cfg.limits.max_expansions,
                max_concurrency: cfg.limits.max_concurrency,
            },
        );
        Ok((normalizer, cfg.failure_strategy))
    }

    /// Load, validate and build in one step.
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<(Normalizer, FailureStrategy)> {
        let path = path.as_ref();
        let cfg = load_and_validate_config(path)
            .with_context(|| format!("loading config from {}", path.display()))?;
        Self::from_config(&cfg)
    }
}
