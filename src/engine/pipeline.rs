// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Classify, rewrite, verbalize.
//!
//! A [`Normalizer`] owns one compiled registry and runs each sentence
//! through `Start -> Classifying -> Classified -> Verbalizing -> Done`. A
//! failure in either working stage ends the run in `Failed`. Nothing is
//! retried; what happens next is up to the [`FailureStrategy`].
//!
//! ## Concurrency
//! The registry is immutable and shared through an `Arc`, so any number of
//! sentences can run at once. [`Normalizer::normalize_batch`] runs one
//! blocking task per sentence under a `tokio::sync::Semaphore`.

use super::classifier::Classifier;
use super::reorder::{FieldOrderPass, TokenPass};
use super::verbalizer::{Rendering, Verbalizer};
use crate::config::consts::{default_max_concurrency, DEFAULT_MAX_CANDIDATES, DEFAULT_MAX_EXPANSIONS};
use crate::errors::{FailureStrategy, NormalizeError};
use crate::grammar::Registry;
use crate::observability::messages::engine::{
    BatchCompleted, BatchStarted, NormalizationFailed, PassedThrough,
};
use crate::observability::messages::StructuredLog;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::Instrument;

/// Where a run currently is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Classifying,
    Classified,
    Verbalizing,
    Done,
    Failed(Step),
}

/// The working stage a failed run stopped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Classifying,
    Verbalizing,
}

/// Result of one run, with the stage it ended in.
#[derive(Debug)]
pub struct Run {
    pub stage: Stage,
    pub result: Result<String, NormalizeError>,
}

impl Run {
    fn start() -> Self {
        Self {
            stage: Stage::Start,
            result: Ok(String::new()),
        }
    }

    fn advance(&mut self, to: Stage) {
        tracing::trace!(from = ?self.stage, to = ?to, "Stage transition");
        self.stage = to;
    }

    fn fail(mut self, step: Step, error: NormalizeError) -> Self {
        self.advance(Stage::Failed(step));
        self.result = Err(error);
        self
    }
}

/// Chooses among candidate renderings using knowledge the grammars lack,
/// such as a language model or acoustic scores.
#[async_trait]
pub trait Rescorer: Send + Sync {
    /// Index into `candidates` of the preferred rendering. `None` keeps the
    /// lowest-weight one.
    async fn choose(&self, input: &str, candidates: &[Rendering]) -> Option<usize>;
}

#[derive(Debug, Clone, Copy)]
pub struct NormalizerOptions {
    pub failure_strategy: FailureStrategy,
    pub reorder_fields: bool,
    pub max_candidates: usize,
    pub max_expansions: usize,
    pub max_concurrency: usize,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            failure_strategy: FailureStrategy::default(),
            reorder_fields: true,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            max_concurrency: default_max_concurrency(),
        }
    }
}

#[derive(Clone)]
pub struct Normalizer {
    classifier: Classifier,
    verbalizer: Verbalizer,
    passes: Vec<Arc<dyn TokenPass>>,
    options: NormalizerOptions,
}

impl std::fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Normalizer")
            .field("classifier", &self.classifier)
            .field("passes", &self.passes.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}

impl Normalizer {
    pub fn new(registry: Arc<Registry>, options: NormalizerOptions) -> Self {
        let mut passes: Vec<Arc<dyn TokenPass>> = Vec::new();
        if options.reorder_fields {
            passes.push(Arc::new(FieldOrderPass));
        }
        Self {
            classifier: Classifier::new(registry.clone(), options.max_expansions),
            verbalizer: Verbalizer::new(registry, options.max_expansions),
            passes,
            options,
        }
    }

    /// Appends a rewrite that runs after the built-in passes.
    pub fn with_pass(mut self, pass: Arc<dyn TokenPass>) -> Self {
        self.passes.push(pass);
        self
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn verbalizer(&self) -> &Verbalizer {
        &self.verbalizer
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Runs one sentence and reports the stage it ended in. The failure
    /// strategy is not applied.
    pub fn run(&self, input: &str) -> Run {
        let mut run = Run::start();
        if input.trim().is_empty() {
            run.advance(Stage::Done);
            return run;
        }

        run.advance(Stage::Classifying);
        let mut parse = match self.classifier.classify(input) {
            Ok(parse) => parse,
            Err(e) => return run.fail(Step::Classifying, e),
        };
        run.advance(Stage::Classified);
        for pass in &self.passes {
            pass.apply(&mut parse);
        }

        run.advance(Stage::Verbalizing);
        match self.verbalizer.verbalize(&parse) {
            Ok(text) => {
                run.result = Ok(text);
                run.advance(Stage::Done);
                run
            }
            Err(e) => run.fail(Step::Verbalizing, e),
        }
    }

    pub fn normalize(&self, input: &str) -> Result<String, NormalizeError> {
        let run = self.run(input);
        self.settle(input, run.result)
    }

    /// Up to `n` distinct normalizations, lowest weight first. Parses
    /// whose tokens cannot be rendered are skipped; if none renders the
    /// first error is returned.
    pub fn normalize_candidates(
        &self,
        input: &str,
        n: usize,
    ) -> Result<Vec<Rendering>, NormalizeError> {
        if input.trim().is_empty() {
            return Ok(vec![Rendering {
                text: String::new(),
                weight: crate::fst::Weight::ONE,
            }]);
        }

        let candidates = self.classifier.candidates(input)?;
        let mut renderings: Vec<Rendering> = Vec::new();
        let mut first_error = None;
        for parse in candidates.iter().take(n) {
            let mut parse = match parse {
                Ok(parse) => parse,
                Err(e) => {
                    first_error = first_error.or(Some(e));
                    continue;
                }
            };
            for pass in &self.passes {
                pass.apply(&mut parse);
            }
            match self.verbalizer.candidates(&parse, n) {
                Ok(found) => renderings.extend(found),
                Err(e) => first_error = first_error.or(Some(e)),
            }
        }

        if renderings.is_empty() {
            return Err(first_error.unwrap_or(NormalizeError::NoParse {
                input: input.to_string(),
            }));
        }
        renderings.sort_by(|a, b| a.weight.value().total_cmp(&b.weight.value()));
        let mut seen = std::collections::HashSet::new();
        renderings.retain(|r| seen.insert(r.text.clone()));
        renderings.truncate(n);
        Ok(renderings)
    }

    /// Lets `rescorer` pick among the top candidates.
    pub async fn normalize_rescored(
        &self,
        input: &str,
        rescorer: &dyn Rescorer,
    ) -> Result<String, NormalizeError> {
        let mut candidates = match self.normalize_candidates(input, self.options.max_candidates) {
            Ok(candidates) => candidates,
            Err(e) => return self.settle(input, Err(e)),
        };
        let index = rescorer
            .choose(input, &candidates)
            .await
            .filter(|i| *i < candidates.len())
            .unwrap_or(0);
        Ok(candidates.swap_remove(index).text)
    }

    /// Normalizes every input concurrently. Results come back in input
    /// order; one failing sentence does not affect the others.
    pub async fn normalize_batch(&self, inputs: Vec<String>) -> Vec<Result<String, NormalizeError>> {
        let started = Instant::now();
        let items = inputs.len();
        let direction = self.classifier.registry().direction().to_string();
        let batch_started = BatchStarted {
            direction: &direction,
            items,
            max_concurrency: self.options.max_concurrency,
        };
        batch_started.log();
        let span = batch_started.span("normalize_batch");

        let semaphore = Arc::new(Semaphore::new(self.options.max_concurrency.max(1)));
        let mut tasks = Vec::with_capacity(items);
        for input in inputs {
            let semaphore = semaphore.clone();
            let normalizer = self.clone();
            tasks.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return Err(NormalizeError::Internal {
                            message: format!("Failed to acquire semaphore permit: {}", e),
                        })
                    }
                };
                let span = tracing::Span::current();
                let blocking = move || span.in_scope(|| normalizer.normalize(&input));
                match tokio::task::spawn_blocking(blocking).await {
                    Ok(result) => result,
                    Err(e) => Err(NormalizeError::Internal {
                        message: format!("Normalization task failed: {}", e),
                    }),
                }
            }
            .instrument(span.clone())));
        }

        let mut results = Vec::with_capacity(items);
        for task in tasks {
            let result = task.await.unwrap_or_else(|e| {
                Err(NormalizeError::Internal {
                    message: format!("Batch task failed: {}", e),
                })
            });
            results.push(result);
        }

        span.in_scope(|| {
            BatchCompleted {
                items,
                failures: results.iter().filter(|r| r.is_err()).count(),
                duration: started.elapsed(),
            }
            .log()
        });
        results
    }

    fn settle(
        &self,
        input: &str,
        result: Result<String, NormalizeError>,
    ) -> Result<String, NormalizeError> {
        match result {
            Ok(text) => Ok(text),
            Err(e) => match self.options.failure_strategy {
                FailureStrategy::BestEffort => {
                    PassedThrough { input }.log();
                    Ok(input.to_string())
                }
                FailureStrategy::ContinueOnError => {
                    let error = e.to_string();
                    NormalizationFailed {
                        input,
                        error: &error,
                    }
                    .log();
                    Err(e)
                }
            },
        }
    }
}
