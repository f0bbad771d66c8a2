// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{negative_word, written_negative};
use crate::errors::GrammarError;
use crate::fst::{concat, invert, Fst};
use crate::grammar::markup::{add_tokens, delete_tokens, field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::NumberGraphs;
use crate::token::SemioticClass;

grammar!(
    /// `منفی صد و بیست و سه` to `cardinal { negative: "-" integer: "123" }`.
    /// Both `هزار` and `یک هزار` read as 1000. Exports the forward number
    /// graphs for the other taggers to invert.
    CardinalTagger: Classify Cardinal "cardinal"
);

impl CardinalTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::build(ctx.lexicon, true)?;
        let body = concat(
            &negative_word(ctx.lexicon)?,
            &field("integer", &invert(&numbers.cardinal))?,
        )?;
        let graph = add_tokens(SemioticClass::Cardinal, &body)?;
        Ok(numbers.export(CompiledGraph::new(graph)))
    }
}

grammar!(CardinalVerbalizer: Verbalize Cardinal "cardinal");

/// `-123`, also nested inside measures.
pub(super) fn cardinal_body(ctx: &BuildContext<'_>) -> Result<Fst, GrammarError> {
    Ok(concat(
        &written_negative(ctx.charset)?,
        &take_field(ctx.charset, "integer")?,
    )?)
}

impl CardinalVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let graph = delete_tokens(ctx.charset, SemioticClass::Cardinal, &cardinal_body(ctx)?)?;
        Ok(CompiledGraph::new(graph))
    }
}
