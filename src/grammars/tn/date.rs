// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::GrammarError;
use crate::fst::{
    compose, concat, concat_all, delete, insert, optimize, optional, union, weighted, Fst,
};
use crate::grammar::markup::{add_tokens, delete_tokens, drop_field, field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::{digits, range, NumberGraphs};
use crate::lexicon::LexicalTable;
use crate::token::SemioticClass;

/// Extra cost of the day-first reading.
const DAY_FIRST_WEIGHT: f32 = 0.1;

/// Month number, optionally zero-padded, to month name.
fn month_names(ctx: &BuildContext<'_>, table: &LexicalTable) -> Result<Fst, GrammarError> {
    let names = table.to_fst()?;
    let padded = concat(&delete("0")?, &compose(&range(1, 9, None)?, &names)?)?;
    Ok(compose(&digits(ctx.charset, 1, Some(2))?, &union(&[&names, &padded])?)?)
}

/// `y<sep>m<sep>d`, plus `d<sep>m<sep>y` at a small extra cost.
fn calendar(
    day: &Fst,
    month: &Fst,
    year: &Fst,
    separator: &str,
    tail: &Fst,
) -> Result<Fst, GrammarError> {
    let sep = concat(&delete(separator)?, &insert(" ")?)?;
    let year_first = concat_all(&[year, &sep, month, &sep, day, tail])?;
    let day_first = concat_all(&[day, &sep, month, &sep, year, tail])?;
    Ok(union(&[&year_first, &weighted(&day_first, DAY_FIRST_WEIGHT)?])?)
}

grammar!(
    /// `1402/05/12` to `date { year: "هزار و چهارصد و دو" month: "مرداد" day: "دوازدهم" }`.
    /// Dashed dates are Gregorian and carry `calendar: "gregorian"`. Year-first
    /// dates come out in reading order and rely on field reordering before
    /// verbalization.
    DateTagger: Classify Date "date" depends ["cardinal", "ordinal"]
);

impl DateTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let ordinal = ctx.export("ordinal", "ordinal")?;

        let day = compose(
            &digits(cs, 1, Some(2))?,
            &compose(&range(1, 31, Some(2))?, &concat(&optional(&delete("0")?)?, &ordinal)?)?,
        )?;
        let day = field("day", &day)?;
        let year = field("year", &compose(&digits(cs, 4, Some(4))?, &numbers.positive)?)?;
        let jalali = field("month", &month_names(ctx, ctx.lexicon.table("months_jalali")?)?)?;
        let gregorian = field("month", &month_names(ctx, ctx.lexicon.table("months_gregorian")?)?)?;

        let no_tail = insert("")?;
        let gregorian_tail = concat(&insert(" ")?, &field("calendar", &insert("gregorian")?)?)?;
        let graph = union(&[
            &calendar(&day, &jalali, &year, "/", &no_tail)?,
            &calendar(&day, &gregorian, &year, "-", &gregorian_tail)?,
        ])?;
        Ok(CompiledGraph::new(optimize(&add_tokens(SemioticClass::Date, &graph)?)))
    }
}

grammar!(
    /// `دوازدهم مرداد هزار و چهارصد و دو`. Expects fields in canonical order.
    DateVerbalizer: Verbalize Date "date"
);

impl DateVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let gap = concat(&cs.delete_space, &insert(" ")?)?;
        let body = concat_all(&[
            &take_field(cs, "day")?,
            &gap,
            &take_field(cs, "month")?,
            &gap,
            &take_field(cs, "year")?,
            &optional(&concat(&cs.delete_space, &drop_field(cs, "calendar")?)?)?,
        ])?;
        Ok(CompiledGraph::new(delete_tokens(cs, SemioticClass::Date, &body)?))
    }
}
