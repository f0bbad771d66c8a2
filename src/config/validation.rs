// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration checks.
//!
//! All checks run and every problem is returned, so a user fixing a config
//! file sees the full list at once:
//!
//! 1. **Priorities**: each override is finite and non-negative
//! 2. **Word fallback**: after overrides, `word` still has the largest
//!    weight, otherwise plain words would beat the semiotic grammars
//! 3. **Limits**: every limit is non-zero
//!
//! # Examples
//!
//! ```rust
//! use semiotic_wfst::config::{validate_config, Config};
//! use semiotic_wfst::token::SemioticClass;
//!
//! let mut config = Config::default();
//! config.priorities.insert(SemioticClass::Cardinal, f32::NAN);
//! config.limits.max_states = 0;
//!
//! let errors = validate_config(&config).unwrap_err();
//! assert_eq!(errors.len(), 2);
//! ```

use crate::config::Config;
use crate::errors::ConfigError;
use crate::grammar::{PriorityPolicy, PriorityTable};
use crate::token::SemioticClass;

/// Validates a configuration, returning every problem found.
pub fn validate_config(config: &Config) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_priorities(config, &mut errors);
    validate_word_fallback(config, &mut errors);
    validate_limits(config, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_priorities(config: &Config, errors: &mut Vec<ConfigError>) {
    let mut overrides: Vec<_> = config.priorities.iter().collect();
    overrides.sort_by_key(|(class, _)| **class);
    for (class, value) in overrides {
        if !value.is_finite() || *value < 0.0 {
            errors.push(ConfigError::InvalidPriority {
                class: class.to_string(),
                reason: format!("{} is not a finite, non-negative weight", value),
            });
        }
    }
}

fn validate_word_fallback(config: &Config, errors: &mut Vec<ConfigError>) {
    let defaults = PriorityTable::default();
    let effective = |class: SemioticClass| {
        config
            .priorities
            .get(&class)
            .copied()
            .unwrap_or_else(|| defaults.weight(class).value())
    };

    let word = effective(SemioticClass::Word);
    if !word.is_finite() {
        return;
    }
    for class in SemioticClass::ALL {
        if class == SemioticClass::Word {
            continue;
        }
        let weight = effective(class);
        if weight.is_finite() && weight >= word {
            errors.push(ConfigError::InvalidPriority {
                class: SemioticClass::Word.to_string(),
                reason: format!("{} must exceed '{}' ({})", word, class, weight),
            });
        }
    }
}

fn validate_limits(config: &Config, errors: &mut Vec<ConfigError>) {
    let limits = &config.limits;
    for (name, value) in [
        ("max_states", limits.max_states),
        ("max_candidates", limits.max_candidates),
        ("max_expansions", limits.max_expansions),
        ("max_concurrency", limits.max_concurrency),
    ] {
        if value == 0 {
            errors.push(ConfigError::InvalidLimit {
                name,
                reason: "must be greater than zero".to_string(),
            });
        }
    }
}
