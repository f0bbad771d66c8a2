// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Token sequence to surface text.
//!
//! Each token is rendered on its own against the verbalizer automaton, then
//! the pieces are joined. A space separates two pieces when the source had
//! whitespace between the tokens, so `ab,` stays glued while `1   ab` gets a
//! single space.

use crate::errors::NormalizeError;
use crate::fst::{Lattice, Weight};
use crate::grammar::Registry;
use crate::observability::messages::engine::RenderFailed;
use crate::observability::messages::StructuredLog;
use crate::token::{Parse, Token};
use std::sync::Arc;

/// One rendering with its weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendering {
    pub text: String,
    pub weight: Weight,
}

#[derive(Debug, Clone)]
pub struct Verbalizer {
    registry: Arc<Registry>,
    max_expansions: usize,
}

impl Verbalizer {
    pub fn new(registry: Arc<Registry>, max_expansions: usize) -> Self {
        Self {
            registry,
            max_expansions,
        }
    }

    fn lattice(&self, token: &Token) -> Result<Lattice, NormalizeError> {
        let structured = token.to_structured();
        Lattice::build(self.registry.verbalizer(), &structured).ok_or_else(|| {
            RenderFailed { token: &structured }.log();
            NormalizeError::NoRender {
                token: structured.clone(),
            }
        })
    }

    /// Lowest-weight rendering of one token.
    pub fn verbalize_token(&self, token: &Token) -> Result<Rendering, NormalizeError> {
        let lattice = self.lattice(token)?;
        let best = lattice
            .best_path()
            .ok_or_else(|| NormalizeError::NoRender {
                token: token.to_structured(),
            })?;
        Ok(Rendering {
            text: best.output,
            weight: best.weight,
        })
    }

    /// Up to `n` distinct renderings of one token, best first.
    pub fn token_candidates(&self, token: &Token, n: usize) -> Result<Vec<Rendering>, NormalizeError> {
        let lattice = self.lattice(token)?;
        Ok(lattice
            .paths(self.max_expansions)
            .take(n)
            .map(|h| Rendering {
                text: h.output,
                weight: h.weight,
            })
            .collect())
    }

    pub fn verbalize(&self, parse: &Parse) -> Result<String, NormalizeError> {
        let pieces = parse
            .tokens
            .iter()
            .map(|token| self.verbalize_token(token).map(|r| r.text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(join(parse, &pieces))
    }

    /// Up to `n` sentence renderings of `parse`, best first. Weights include
    /// the parse's own weight so renderings of different parses compare.
    pub fn candidates(&self, parse: &Parse, n: usize) -> Result<Vec<Rendering>, NormalizeError> {
        let mut beam: Vec<(Vec<String>, Weight)> = vec![(Vec::new(), parse.weight)];
        for token in &parse.tokens {
            let options = self.token_candidates(token, n)?;
            let mut next = Vec::with_capacity(beam.len() * options.len());
            for (pieces, weight) in &beam {
                for option in &options {
                    let mut extended = pieces.clone();
                    extended.push(option.text.clone());
                    next.push((extended, weight.times(option.weight)));
                }
            }
            next.sort_by(|a, b| a.1.value().total_cmp(&b.1.value()));
            next.truncate(n);
            beam = next;
        }
        Ok(beam
            .into_iter()
            .map(|(pieces, weight)| Rendering {
                text: join(parse, &pieces),
                weight,
            })
            .collect())
    }

    /// Renders a structured token stream that did not come from this crate's
    /// classifier.
    pub fn verbalize_structured(&self, stream: &str) -> Result<String, NormalizeError> {
        self.verbalize(&Parse::from_structured(stream)?)
    }
}

fn join(parse: &Parse, pieces: &[String]) -> String {
    let mut out = String::new();
    for (index, piece) in pieces.iter().enumerate() {
        if index > 0 && parse.space_after(index - 1) && !out.is_empty() && !piece.is_empty() {
            out.push(' ');
        }
        out.push_str(piece);
    }
    out
}
