// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{negative_sign, spoken_negative};
use crate::errors::GrammarError;
use crate::fst::{concat, Fst};
use crate::grammar::markup::{add_tokens, delete_tokens, field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::{native, NumberGraphs};
use crate::token::SemioticClass;

grammar!(
    /// `-123` to `cardinal { negative: "true" integer: "صد و بیست و سه" }`.
    /// Exports the shared number graphs for the other taggers.
    CardinalTagger: Classify Cardinal "cardinal"
);

impl CardinalTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::build(ctx.lexicon, !ctx.deterministic)?;
        let integer = native(ctx.charset, &numbers.cardinal)?;
        let body = concat(&negative_sign()?, &field("integer", &integer)?)?;
        let graph = add_tokens(SemioticClass::Cardinal, &body)?;
        Ok(numbers.export(CompiledGraph::new(graph)))
    }
}

grammar!(CardinalVerbalizer: Verbalize Cardinal "cardinal");

/// Fields of a spoken cardinal, also nested inside measures.
pub(super) fn cardinal_body(ctx: &BuildContext<'_>) -> Result<Fst, GrammarError> {
    Ok(concat(
        &spoken_negative(ctx.lexicon, ctx.charset)?,
        &take_field(ctx.charset, "integer")?,
    )?)
}

impl CardinalVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let graph = delete_tokens(ctx.charset, SemioticClass::Cardinal, &cardinal_body(ctx)?)?;
        Ok(CompiledGraph::new(graph))
    }
}
