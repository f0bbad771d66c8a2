// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{negative_sign, spoken_negative};
use crate::errors::GrammarError;
use crate::fst::charset::one_of;
use crate::fst::{compose, concat_all, delete_fst, insert, optimize, union, Fst};
use crate::grammar::markup::{add_tokens, delete_tokens, field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::{digits, entry, fractional_places, native, NumberGraphs};
use crate::token::SemioticClass;

/// Longest fractional part with a place name (`هزارم`).
const MAX_PLACES: usize = 3;
/// Written decimal separators.
const SEPARATORS: &str = ".٫";

grammar!(
    /// `3.14` to `decimal { integer_part: "سه" fractional_part: "چهارده صدم" }`.
    /// A missing integer part (`.5`) is read as zero. Exports the fields
    /// without the class wrapper as `decimal`.
    DecimalTagger: Classify Decimal "decimal" depends ["cardinal"]
);

impl DecimalTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let zero = entry(ctx.lexicon, "zero", "0")?;

        let integer = union(&[
            &field("integer_part", &native(ctx.charset, &numbers.cardinal)?)?,
            &field("integer_part", &insert(zero)?)?,
        ])?;

        let places = (1..=MAX_PLACES)
            .map(|n| fractional_places(ctx.lexicon, &numbers, n))
            .collect::<Result<Vec<_>, _>>()?;
        let refs: Vec<&Fst> = places.iter().collect();
        let fractional = compose(
            &digits(ctx.charset, 1, Some(MAX_PLACES as u32))?,
            &union(&refs)?,
        )?;

        let body = optimize(&concat_all(&[
            &negative_sign()?,
            &integer,
            &insert(" ")?,
            &delete_fst(&one_of(SEPARATORS)?),
            &field("fractional_part", &fractional)?,
        ])?);
        let graph = add_tokens(SemioticClass::Decimal, &body)?;
        Ok(CompiledGraph::new(graph).with_export("decimal", body))
    }
}

grammar!(DecimalVerbalizer: Verbalize Decimal "decimal");

/// `[منفی ]<integer> ممیز <fraction>`, also nested inside measures.
pub(super) fn decimal_body(ctx: &BuildContext<'_>) -> Result<Fst, GrammarError> {
    let separator = ctx.lexicon.marker("decimal_separator")?;
    Ok(concat_all(&[
        &spoken_negative(ctx.lexicon, ctx.charset)?,
        &take_field(ctx.charset, "integer_part")?,
        &ctx.charset.delete_space,
        &insert(&format!(" {} ", separator))?,
        &take_field(ctx.charset, "fractional_part")?,
    ])?)
}

impl DecimalVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let graph = delete_tokens(ctx.charset, SemioticClass::Decimal, &decimal_body(ctx)?)?;
        Ok(CompiledGraph::new(graph))
    }
}
