// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::cardinal::cardinal_body;
use super::decimal::decimal_body;
use super::negative_word;
use crate::errors::GrammarError;
use crate::fst::{closure, concat, concat_all, delete, difference, insert, invert, optimize, union};
use crate::grammar::markup::{
    add_message, add_tokens, delete_tokens, field, map_field, take_message,
};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::NumberGraphs;
use crate::token::SemioticClass;

grammar!(
    /// `پنجاه درصد` to `measure { cardinal { integer: "50" } units: "%" }`.
    MeasureTagger: Classify Measure "measure" depends ["cardinal", "decimal"]
);

impl MeasureTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let cardinal = add_message(
            "cardinal",
            &concat(
                &negative_word(ctx.lexicon)?,
                &field("integer", &invert(&numbers.cardinal))?,
            )?,
        )?;
        let decimal = add_message("decimal", &ctx.export("decimal", "decimal")?)?;
        let units = ctx.lexicon.table("measurements")?.inverse().to_fst()?;

        let body = concat_all(&[
            &union(&[&cardinal, &decimal])?,
            &delete(" ")?,
            &insert(" ")?,
            &field("units", &units)?,
        ])?;
        Ok(CompiledGraph::new(optimize(&add_tokens(SemioticClass::Measure, &body)?)))
    }
}

grammar!(
    /// `50%` for units written against the number, `100 kg` otherwise.
    MeasureVerbalizer: Verbalize Measure "measure"
);

impl MeasureVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let unspaced = ctx.lexicon.table("units_unspaced")?.keys_fst()?;
        let spaced = difference(&closure(&cs.not_quote, 1, None)?, &unspaced)?;

        let number = union(&[
            &take_message(cs, "cardinal", &cardinal_body(ctx)?)?,
            &take_message(cs, "decimal", &decimal_body(ctx)?)?,
        ])?;
        let units = union(&[
            &concat(&cs.delete_space, &map_field(cs, "units", &unspaced)?)?,
            &concat_all(&[&cs.delete_space, &insert(" ")?, &map_field(cs, "units", &spaced)?])?,
        ])?;
        let body = concat(&number, &units)?;
        Ok(CompiledGraph::new(delete_tokens(cs, SemioticClass::Measure, &body)?))
    }
}
