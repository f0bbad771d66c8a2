// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{negative_sign, spoken_negative};
use crate::errors::GrammarError;
use crate::fst::{closure, concat_all, delete, delete_fst, insert, optional};
use crate::grammar::markup::{add_tokens, delete_tokens, field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::{native, NumberGraphs};
use crate::token::SemioticClass;

grammar!(
    /// `2 1/3` to `fraction { integer_part: "دو" numerator: "یک" denominator: "سوم" }`.
    FractionTagger: Classify Fraction "fraction" depends ["cardinal", "ordinal"]
);

impl FractionTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let ordinal = ctx.export("ordinal", "ordinal")?;
        let integer = native(ctx.charset, &numbers.cardinal)?;

        let whole = optional(&concat_all(&[
            &field("integer_part", &integer)?,
            &delete_fst(&closure(&ctx.charset.whitespace, 1, None)?),
            &insert(" ")?,
        ])?)?;
        let body = concat_all(&[
            &negative_sign()?,
            &whole,
            &field("numerator", &integer)?,
            &insert(" ")?,
            &delete("/")?,
            &field("denominator", &native(ctx.charset, &ordinal)?)?,
        ])?;
        Ok(CompiledGraph::new(add_tokens(SemioticClass::Fraction, &body)?))
    }
}

grammar!(FractionVerbalizer: Verbalize Fraction "fraction");

impl FractionVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let conjunction = ctx.lexicon.marker("conjunction")?;
        let cs = ctx.charset;
        let whole = optional(&concat_all(&[
            &take_field(cs, "integer_part")?,
            &cs.delete_space,
            &insert(&format!(" {} ", conjunction))?,
        ])?)?;
        let body = concat_all(&[
            &spoken_negative(ctx.lexicon, cs)?,
            &whole,
            &take_field(cs, "numerator")?,
            &cs.delete_space,
            &insert(" ")?,
            &take_field(cs, "denominator")?,
        ])?;
        Ok(CompiledGraph::new(delete_tokens(cs, SemioticClass::Fraction, &body)?))
    }
}
