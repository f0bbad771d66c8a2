// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::GrammarError;
use crate::fst::{compose, concat, concat_all, delete, insert, invert, optimize, optional, union};
use crate::grammar::markup::{add_tokens, delete_tokens, field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::{fixed_width, NumberGraphs};
use crate::token::SemioticClass;

grammar!(
    /// `ساعت سه و سی دقیقه` to `time { hours: "3" minutes: "30" }`. `نیم`
    /// and `ربع` stand for 30 and 15 minutes.
    TimeTagger: Classify Time "time" depends ["cardinal"]
);

impl TimeTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let prefix = ctx.lexicon.marker("time_prefix")?;
        let conjunction = ctx.lexicon.marker("conjunction")?;
        let minute = ctx.lexicon.marker("minute")?;

        let hours = invert(&numbers.within(&numbers.cardinal, 0, 23, None)?);
        let counted = invert(&compose(&fixed_width(1, 59, 2)?, &numbers.padded)?);
        let specials = invert(&ctx.lexicon.table("minute_specials")?.to_fst()?);
        let minutes = concat_all(&[
            &delete(&format!(" {} ", conjunction))?,
            &insert(" ")?,
            &union(&[
                &concat(
                    &field("minutes", &counted)?,
                    &optional(&delete(&format!(" {}", minute))?)?,
                )?,
                &field("minutes", &specials)?,
            ])?,
        ])?;
        let suffix = concat_all(&[
            &delete(" ")?,
            &insert(" ")?,
            &field("suffix", &ctx.lexicon.table("time_suffix")?.inverse().to_fst()?)?,
        ])?;

        let body = concat_all(&[
            &delete(&format!("{} ", prefix))?,
            &field("hours", &hours)?,
            &optional(&minutes)?,
            &optional(&suffix)?,
        ])?;
        Ok(CompiledGraph::new(optimize(&add_tokens(SemioticClass::Time, &body)?)))
    }
}

grammar!(
    /// `3:30`, `12:00` when minutes are absent, and `5:00 pm` with a suffix.
    TimeVerbalizer: Verbalize Time "time"
);

impl TimeVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let minutes = union(&[
            &concat_all(&[&cs.delete_space, &insert(":")?, &take_field(cs, "minutes")?])?,
            &insert(":00")?,
        ])?;
        let suffix = concat_all(&[&cs.delete_space, &insert(" ")?, &take_field(cs, "suffix")?])?;
        let body = concat_all(&[&take_field(cs, "hours")?, &minutes, &optional(&suffix)?])?;
        Ok(CompiledGraph::new(delete_tokens(cs, SemioticClass::Time, &body)?))
    }
}
