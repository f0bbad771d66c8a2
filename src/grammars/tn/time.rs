// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::GrammarError;
use crate::fst::{
    closure, compose, concat, concat_all, delete, delete_fst, difference, insert, literal,
    optimize, optional, project_output, union, weighted, Fst,
};
use crate::grammar::markup::{add_tokens, delete_tokens, field, map_field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::{digits, fixed_width, NumberGraphs};
use crate::token::SemioticClass;

/// Extra cost of reading `:30` as `نیم` rather than `سی دقیقه`.
const SPECIAL_MINUTE_WEIGHT: f32 = 0.5;

grammar!(
    /// `3:30 pm` to `time { hours: "سه" minutes: "سی" suffix: "بعد از ظهر" }`.
    /// Whole hours (`:00`) carry no minutes; `5 pm` needs the suffix.
    TimeTagger: Classify Time "time" depends ["cardinal"]
);

impl TimeTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let numbers = NumberGraphs::import(ctx, "cardinal")?;

        let hours = compose(
            &digits(cs, 1, Some(2))?,
            &numbers.within(&numbers.padded, 0, 23, Some(2))?,
        )?;
        let two_digits = digits(cs, 2, Some(2))?;
        let minutes = compose(
            &two_digits,
            &compose(&fixed_width(1, 59, 2)?, &numbers.padded)?,
        )?;

        let whole_hour = concat(&delete(":")?, &delete_fst(&compose(&two_digits, &literal("00")?)?))?;
        let mut minute_forms = vec![
            whole_hour,
            concat_all(&[&delete(":")?, &insert(" ")?, &field("minutes", &minutes)?])?,
        ];
        if !ctx.deterministic {
            let specials = compose(&two_digits, &ctx.lexicon.table("minute_specials")?.to_fst()?)?;
            minute_forms.push(weighted(
                &concat_all(&[&delete(":")?, &insert(" ")?, &field("minutes", &specials)?])?,
                SPECIAL_MINUTE_WEIGHT,
            )?);
        }
        let minute_refs: Vec<&Fst> = minute_forms.iter().collect();

        let suffix = concat_all(&[
            &cs.delete_space,
            &insert(" ")?,
            &field("suffix", &ctx.lexicon.table("time_suffix")?.to_fst()?)?,
        ])?;
        let hours = field("hours", &hours)?;
        let clock = concat_all(&[&hours, &union(&minute_refs)?, &optional(&suffix)?])?;
        let hour_and_suffix = concat_all(&[&hours, &suffix])?;

        let graph = add_tokens(SemioticClass::Time, &union(&[&clock, &hour_and_suffix])?)?;
        Ok(CompiledGraph::new(optimize(&graph)))
    }
}

grammar!(
    /// `ساعت سه و سی دقیقه بعد از ظهر`. Special minutes such as `نیم` are
    /// read without `دقیقه`.
    TimeVerbalizer: Verbalize Time "time"
);

impl TimeVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let prefix = ctx.lexicon.marker("time_prefix")?;
        let conjunction = ctx.lexicon.marker("conjunction")?;
        let minute = ctx.lexicon.marker("minute")?;
        let specials = project_output(&ctx.lexicon.table("minute_specials")?.to_fst()?);
        let counted = difference(&closure(&cs.not_quote, 1, None)?, &specials)?;

        let joined = insert(&format!(" {} ", conjunction))?;
        let minutes = union(&[
            &concat_all(&[
                &cs.delete_space,
                &joined,
                &map_field(cs, "minutes", &counted)?,
                &insert(&format!(" {}", minute))?,
            ])?,
            &concat_all(&[&cs.delete_space, &joined, &map_field(cs, "minutes", &specials)?])?,
        ])?;
        let suffix = concat_all(&[&cs.delete_space, &insert(" ")?, &take_field(cs, "suffix")?])?;

        let body = concat_all(&[
            &insert(&format!("{} ", prefix))?,
            &take_field(cs, "hours")?,
            &optional(&minutes)?,
            &optional(&suffix)?,
        ])?;
        Ok(CompiledGraph::new(delete_tokens(cs, SemioticClass::Time, &body)?))
    }
}
