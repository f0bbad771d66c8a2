// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{negative_word, written_negative};
use crate::errors::GrammarError;
use crate::fst::{concat_all, delete, insert, invert, optimize, union, Fst};
use crate::grammar::markup::{add_tokens, delete_tokens, field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::{fractional_places, NumberGraphs};
use crate::token::SemioticClass;

const MAX_PLACES: usize = 3;

grammar!(
    /// `سه ممیز چهارده صدم` to `decimal { integer_part: "3" fractional_part: "14" }`.
    /// Exports the fields without the class wrapper as `decimal`.
    DecimalTagger: Classify Decimal "decimal" depends ["cardinal"]
);

impl DecimalTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let separator = ctx.lexicon.marker("decimal_separator")?;
        let places = (1..=MAX_PLACES)
            .map(|n| fractional_places(ctx.lexicon, &numbers, n))
            .collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&Fst> = places.iter().collect();

        let body = optimize(&concat_all(&[
            &negative_word(ctx.lexicon)?,
            &field("integer_part", &invert(&numbers.cardinal))?,
            &delete(&format!(" {} ", separator))?,
            &insert(" ")?,
            &field("fractional_part", &invert(&union(&refs)?))?,
        ])?);
        let graph = add_tokens(SemioticClass::Decimal, &body)?;
        Ok(CompiledGraph::new(graph).with_export("decimal", body))
    }
}

grammar!(DecimalVerbalizer: Verbalize Decimal "decimal");

/// `-3.14`, also nested inside measures.
pub(super) fn decimal_body(ctx: &BuildContext<'_>) -> Result<Fst, GrammarError> {
    Ok(concat_all(&[
        &written_negative(ctx.charset)?,
        &take_field(ctx.charset, "integer_part")?,
        &ctx.charset.delete_space,
        &insert(".")?,
        &take_field(ctx.charset, "fractional_part")?,
    ])?)
}

impl DecimalVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let graph = delete_tokens(ctx.charset, SemioticClass::Decimal, &decimal_body(ctx)?)?;
        Ok(CompiledGraph::new(graph))
    }
}
