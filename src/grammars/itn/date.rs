// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::GrammarError;
use crate::fst::{
    compose, concat, concat_all, delete, insert, invert, optimize, string_map, union, Fst, Weight,
};
use crate::grammar::markup::{add_tokens, delete_tokens, field, map_field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::{range, NumberGraphs};
use crate::lexicon::LexicalTable;
use crate::token::SemioticClass;

/// Month name to its two-digit number.
fn month_numbers(table: &LexicalTable) -> Result<Fst, GrammarError> {
    let padded: Vec<(String, String)> = table
        .entries()
        .iter()
        .map(|e| (e.value.clone(), format!("{:0>2}", e.key)))
        .collect();
    Ok(optimize(&string_map(
        padded.iter().map(|(name, number)| (name.as_str(), number.as_str(), Weight::ONE)),
    )?))
}

grammar!(
    /// `پانزدهم مرداد هزار و چهارصد و دو` to
    /// `date { day: "15" month: "05" year: "1402" }`. Gregorian month names
    /// add `calendar: "gregorian"`.
    DateTagger: Classify Date "date" depends ["cardinal", "ordinal"]
);

impl DateTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let ordinal = ctx.export("ordinal", "ordinal")?;

        let day = field("day", &invert(&compose(&range(1, 31, None)?, &ordinal)?))?;
        let year = field("year", &invert(&numbers.positive))?;
        let gap = concat(&delete(" ")?, &insert(" ")?)?;

        let jalali = concat_all(&[
            &day,
            &gap,
            &field("month", &month_numbers(ctx.lexicon.table("months_jalali")?)?)?,
            &gap,
            &year,
        ])?;
        let gregorian = concat_all(&[
            &day,
            &gap,
            &field("month", &month_numbers(ctx.lexicon.table("months_gregorian")?)?)?,
            &gap,
            &year,
            &insert(" ")?,
            &field("calendar", &insert("gregorian")?)?,
        ])?;
        let graph = add_tokens(SemioticClass::Date, &union(&[&jalali, &gregorian])?)?;
        Ok(CompiledGraph::new(optimize(&graph)))
    }
}

grammar!(
    /// `15/05/1402`, or `25-12-2023` for Gregorian dates.
    DateVerbalizer: Verbalize Date "date"
);

impl DateVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let dated = |separator: &str| -> Result<Fst, GrammarError> {
            let sep = concat(&cs.delete_space, &insert(separator)?)?;
            Ok(concat_all(&[
                &take_field(cs, "day")?,
                &sep,
                &take_field(cs, "month")?,
                &sep,
                &take_field(cs, "year")?,
            ])?)
        };
        let gregorian = concat_all(&[
            &dated("-")?,
            &cs.delete_space,
            &map_field(cs, "calendar", &delete("gregorian")?)?,
        ])?;
        let body = union(&[&dated("/")?, &gregorian])?;
        Ok(CompiledGraph::new(delete_tokens(cs, SemioticClass::Date, &body)?))
    }
}
