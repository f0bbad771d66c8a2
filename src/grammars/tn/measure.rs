// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::cardinal::cardinal_body;
use super::decimal::decimal_body;
use super::negative_sign;
use crate::errors::GrammarError;
use crate::fst::{concat, concat_all, delete, insert, optimize, union, weighted, Fst};
use crate::grammar::markup::{
    add_message, add_tokens, delete_tokens, field, map_field, take_field, take_message,
};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::{native, NumberGraphs};
use crate::token::SemioticClass;

/// Extra cost of a unit written before the number, and of reading it first.
const UNIT_FIRST_WEIGHT: f32 = 0.1;

grammar!(
    /// `5 kg` to `measure { cardinal { integer: "پنج" } units: "کیلوگرم" }`,
    /// and `2.5 km` with a nested `decimal { ... }`.
    MeasureTagger: Classify Measure "measure" depends ["cardinal", "decimal"]
);

impl MeasureTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let cardinal = add_message(
            "cardinal",
            &concat(
                &negative_sign()?,
                &field("integer", &native(cs, &numbers.cardinal)?)?,
            )?,
        )?;
        let decimal = add_message("decimal", &ctx.export("decimal", "decimal")?)?;
        let number = union(&[&cardinal, &decimal])?;

        let units = ctx.lexicon.table("measurements")?;
        let number_first = concat_all(&[
            &number,
            &cs.delete_space,
            &insert(" ")?,
            &field("units", &units.to_fst()?)?,
        ])?;

        let mut unit_first = Vec::new();
        for entry in units.entries() {
            unit_first.push(concat_all(&[
                &delete(&entry.key)?,
                &cs.delete_space,
                &number,
                &insert(" ")?,
                &field("units", &insert(&entry.value)?)?,
            ])?);
        }
        let refs: Vec<&Fst> = unit_first.iter().collect();
        let graph = union(&[&number_first, &weighted(&union(&refs)?, UNIT_FIRST_WEIGHT)?])?;
        Ok(CompiledGraph::new(optimize(&add_tokens(SemioticClass::Measure, &graph)?)))
    }
}

grammar!(
    /// `پنج کیلوگرم`, with the units-first reading as a costlier alternative.
    MeasureVerbalizer: Verbalize Measure "measure"
);

impl MeasureVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let number = union(&[
            &take_message(cs, "cardinal", &cardinal_body(ctx)?)?,
            &take_message(cs, "decimal", &decimal_body(ctx)?)?,
        ])?;
        let number_first = concat_all(&[
            &number,
            &cs.delete_space,
            &insert(" ")?,
            &take_field(cs, "units")?,
        ])?;

        let mut unit_first = Vec::new();
        for entry in ctx.lexicon.table("measurements")?.entries() {
            unit_first.push(concat_all(&[
                &insert(&format!("{} ", entry.value))?,
                &number,
                &cs.delete_space,
                &map_field(cs, "units", &delete(&entry.value)?)?,
            ])?);
        }
        let refs: Vec<&Fst> = unit_first.iter().collect();
        let body = union(&[&number_first, &weighted(&union(&refs)?, UNIT_FIRST_WEIGHT)?])?;
        Ok(CompiledGraph::new(delete_tokens(cs, SemioticClass::Measure, &body)?))
    }
}
