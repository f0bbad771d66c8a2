// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{negative_word, written_negative};
use crate::errors::GrammarError;
use crate::fst::{concat_all, delete, insert, invert, optional, weighted};
use crate::grammar::markup::{add_tokens, delete_tokens, field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::NumberGraphs;
use crate::token::SemioticClass;

/// Extra cost of splitting off a whole part, so `بیست و یک دوم` is 21/2.
const WHOLE_PART_WEIGHT: f32 = 0.1;

grammar!(
    /// `دو و یک سوم` to `fraction { integer_part: "2" numerator: "1" denominator: "3" }`.
    FractionTagger: Classify Fraction "fraction" depends ["cardinal", "ordinal"]
);

impl FractionTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let ordinal = ctx.export("ordinal", "ordinal")?;
        let conjunction = ctx.lexicon.marker("conjunction")?;
        let integer = invert(&numbers.cardinal);

        let whole = optional(&weighted(
            &concat_all(&[
                &field("integer_part", &integer)?,
                &delete(&format!(" {} ", conjunction))?,
                &insert(" ")?,
            ])?,
            WHOLE_PART_WEIGHT,
        )?)?;
        let body = concat_all(&[
            &negative_word(ctx.lexicon)?,
            &whole,
            &field("numerator", &integer)?,
            &delete(" ")?,
            &insert(" ")?,
            &field("denominator", &invert(&ordinal))?,
        ])?;
        Ok(CompiledGraph::new(add_tokens(SemioticClass::Fraction, &body)?))
    }
}

grammar!(
    /// `2 1/3`.
    FractionVerbalizer: Verbalize Fraction "fraction"
);

impl FractionVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let whole = optional(&concat_all(&[
            &take_field(cs, "integer_part")?,
            &cs.delete_space,
            &insert(" ")?,
        ])?)?;
        let body = concat_all(&[
            &written_negative(cs)?,
            &whole,
            &take_field(cs, "numerator")?,
            &cs.delete_space,
            &insert("/")?,
            &take_field(cs, "denominator")?,
        ])?;
        Ok(CompiledGraph::new(delete_tokens(cs, SemioticClass::Fraction, &body)?))
    }
}
