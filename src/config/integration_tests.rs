// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::{load_and_validate_config, load_config, RuntimeBuilder};
use crate::errors::{ConfigError, FailureStrategy};
use crate::grammar::Direction;
use crate::token::SemioticClass;
use std::fs;

/// Shipped configuration files parse and validate
#[test]
fn test_shipped_configs_load() {
    let tn = load_and_validate_config("configs/fa-tn.yaml").unwrap();
    assert_eq!(tn.direction, Direction::Tn);
    assert!(tn.deterministic);
    assert_eq!(tn.failure_strategy, FailureStrategy::ContinueOnError);
    assert_eq!(tn.limits.max_concurrency, 4);

    let itn = load_and_validate_config("configs/fa-itn.yaml").unwrap();
    assert_eq!(itn.direction, Direction::Itn);
    assert!(!itn.deterministic);
    assert_eq!(itn.failure_strategy, FailureStrategy::BestEffort);
    assert_eq!(itn.limits.max_candidates, 8);
    assert_eq!(itn.priorities[&SemioticClass::Money], 0.9);
}

#[test]
fn test_load_failures() {
    let dir = tempfile::tempdir().unwrap();

    let missing = load_config(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));

    let broken = dir.path().join("broken.yaml");
    fs::write(&broken, "limits: [1, 2").unwrap();
    assert!(matches!(load_config(&broken).unwrap_err(), ConfigError::Yaml(_)));

    let invalid = dir.path().join("invalid.yaml");
    fs::write(
        &invalid,
        "priorities:\n  word: 0.5\nlimits:\n  max_expansions: 0\n",
    )
    .unwrap();
    match load_and_validate_config(&invalid).unwrap_err() {
        ConfigError::Rejected(errors) => {
            assert!(errors
                .iter()
                .any(|e| matches!(e, ConfigError::InvalidLimit { name: "max_expansions", .. })));
            assert!(errors
                .iter()
                .any(|e| matches!(e, ConfigError::InvalidPriority { .. })));
        }
        other => panic!("expected rejection, got {}", other),
    }
}

#[test]
fn test_relative_lexicon_paths_follow_the_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "lexicon:\n  currency_words: tables/words.tsv\n  digit: /abs/digit.tsv\n",
    )
    .unwrap();

    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg.lexicon["currency_words"], dir.path().join("tables/words.tsv"));
    assert_eq!(cfg.lexicon["digit"], std::path::PathBuf::from("/abs/digit.tsv"));
}

#[test]
fn test_runtime_from_path_with_lexicon_override() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("words.tsv"),
        "# currencies read after the amount\nتومان\tتومان\nریال\tریال\nدرهم\tدرهم\n",
    )
    .unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(
        &path,
        "direction: itn\nlexicon:\n  currency_words: words.tsv\n",
    )
    .unwrap();

    let (normalizer, failure_strategy) = RuntimeBuilder::from_path(&path).unwrap();

    assert_eq!(failure_strategy, FailureStrategy::ContinueOnError);
    assert_eq!(normalizer.normalize("صد درهم").unwrap(), "100 درهم");
    assert_eq!(normalizer.normalize("هزار تومان").unwrap(), "1000 تومان");
}

#[test]
fn test_runtime_reports_unknown_override_table() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("x.tsv"), "a\tb\n").unwrap();
    let path = dir.path().join("config.yaml");
    fs::write(&path, "lexicon:\n  no_such_table: x.tsv\n").unwrap();

    let err = RuntimeBuilder::from_path(&path).unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.contains("applying lexicon overrides"), "{}", chain);
    assert!(chain.contains("no_such_table"), "{}", chain);
}
