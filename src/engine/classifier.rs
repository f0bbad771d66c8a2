// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Sentence to token sequence.
//!
//! The classifier automaton writes a flat `tokens { ... }` stream. Token
//! spans come from the search alignment: the input offset reached just
//! before a token's opening marker is written is where that token starts,
//! so whitespace between two tokens belongs to the first. Spans always
//! tile the input exactly.
//!
//! Per-token weights are recovered by charging each path step to the token
//! whose output it extends; steps outside any token (joins, the final
//! weight) go to the join weight. Optimization may move weight along a
//! path, so per-token weights are indicative only. Their sum, and hence
//! [`Parse::weight`], is exact.

use crate::errors::NormalizeError;
use crate::fst::{Hypothesis, Lattice, Weight};
use crate::grammar::Registry;
use crate::observability::messages::engine::SentenceClassified;
use crate::observability::messages::StructuredLog;
use crate::token::parser::parse_stream;
use crate::token::Parse;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Classifier {
    registry: Arc<Registry>,
    max_expansions: usize,
}

impl Classifier {
    pub fn new(registry: Arc<Registry>, max_expansions: usize) -> Self {
        Self {
            registry,
            max_expansions,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Lowest-weight parse covering the whole input.
    pub fn classify(&self, input: &str) -> Result<Parse, NormalizeError> {
        let parse = self.candidates(input)?.best()?;
        SentenceClassified {
            tokens: parse.tokens.len(),
            weight: parse.weight.value(),
        }
        .log();
        Ok(parse)
    }

    /// All parses of the input, lazily and in weight order.
    pub fn candidates(&self, input: &str) -> Result<Candidates, NormalizeError> {
        let lattice = Lattice::build(self.registry.classifier(), input).ok_or_else(|| {
            NormalizeError::NoParse {
                input: input.to_string(),
            }
        })?;
        Ok(Candidates {
            lattice,
            input: input.to_string(),
            max_expansions: self.max_expansions,
        })
    }
}

/// Parses of one input. Every call to [`iter`](Candidates::iter) starts
/// from the best parse again.
#[derive(Debug)]
pub struct Candidates {
    lattice: Lattice,
    input: String,
    max_expansions: usize,
}

impl Candidates {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn best(&self) -> Result<Parse, NormalizeError> {
        let best = self
            .lattice
            .best_path()
            .ok_or_else(|| NormalizeError::NoParse {
                input: self.input.clone(),
            })?;
        to_parse(&self.input, &best)
    }

    /// Distinct classifier outputs in non-decreasing weight order. Stops
    /// early once the search budget is spent.
    pub fn iter(&self) -> impl Iterator<Item = Result<Parse, NormalizeError>> + '_ {
        self.lattice
            .paths(self.max_expansions)
            .map(move |hypothesis| to_parse(&self.input, &hypothesis))
    }
}

fn to_parse(input: &str, hypothesis: &Hypothesis) -> Result<Parse, NormalizeError> {
    let parsed = parse_stream(&hypothesis.output)?;

    let mut boundaries = Vec::with_capacity(parsed.len() + 1);
    boundaries.push(0);
    for token in parsed.iter().skip(1) {
        let open = token.output.start;
        let reached = hypothesis
            .alignment
            .iter()
            .take_while(|step| step.output_end <= open)
            .last()
            .map_or(0, |step| step.input_end);
        let previous = boundaries.last().copied().unwrap_or(0);
        boundaries.push(reached.clamp(previous, input.len()));
    }
    boundaries.push(input.len());

    let mut weights = vec![Weight::ONE; parsed.len()];
    let mut join = Weight::ONE;
    let mut out_start = 0;
    for step in &hypothesis.alignment {
        match parsed.iter().position(|p| p.output.contains(&out_start)) {
            Some(index) => weights[index] = weights[index].times(step.weight),
            None => join = join.times(step.weight),
        }
        out_start = step.output_end;
    }

    let tokens = parsed
        .into_iter()
        .zip(weights)
        .enumerate()
        .map(|(index, (parsed, weight))| {
            let mut token = parsed.token;
            token.span = boundaries[index]..boundaries[index + 1];
            token.weight = weight;
            token
        })
        .collect();
    Ok(Parse::new(tokens, join, Some(input.to_string())))
}
