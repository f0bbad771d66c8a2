// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::GrammarError;
use crate::fst::charset::one_of;
use crate::fst::{
    closure, compose, concat, concat_all, delete, delete_fst, insert, optimize, optional, union,
    weighted, Fst,
};
use crate::grammar::markup::{add_tokens, delete_tokens, field, map_field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::{digits, NumberGraphs};
use crate::token::SemioticClass;

/// Written thousands separators.
const GROUP_SEPARATORS: &str = ",٬،";
const DECIMAL_SEPARATORS: &str = ".٫";
/// Extra cost of naming the currency before the amount.
const CURRENCY_FIRST_WEIGHT: f32 = 0.1;

grammar!(
    /// `$100`, `100$` and `1,000 تومان` to
    /// `money { integer_part: "صد" currency: "دلار" }`. Cents after a decimal
    /// separator become `fractional_part`.
    MoneyTagger: Classify Money "money" depends ["cardinal"]
);

impl MoneyTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let numbers = NumberGraphs::import(ctx, "cardinal")?;

        let grouped = concat(
            &digits(cs, 1, Some(3))?,
            &closure(
                &concat(&delete_fst(&one_of(GROUP_SEPARATORS)?), &digits(cs, 3, Some(3))?)?,
                1,
                None,
            )?,
        )?;
        let written = union(&[&digits(cs, 1, None)?, &grouped])?;
        let integer = field("integer_part", &compose(&written, &numbers.cardinal)?)?;
        let cents = concat_all(&[
            &insert(" ")?,
            &delete_fst(&one_of(DECIMAL_SEPARATORS)?),
            &field("fractional_part", &compose(&digits(cs, 2, Some(2))?, &numbers.padded)?)?,
        ])?;
        let amount = optimize(&concat(&integer, &optional(&cents)?)?);

        let symbols = ctx.lexicon.table("currency_symbols")?;
        let words = ctx.lexicon.table("currency_words")?;
        let gap = concat(&cs.delete_space, &insert(" ")?)?;

        let mut forms = Vec::new();
        for entry in symbols.entries() {
            forms.push(concat_all(&[
                &delete(&entry.key)?,
                &cs.delete_space,
                &amount,
                &insert(" ")?,
                &field("currency", &insert(&entry.value)?)?,
            ])?);
        }
        forms.push(concat_all(&[&amount, &gap, &field("currency", &symbols.to_fst()?)?])?);
        forms.push(concat_all(&[&amount, &gap, &field("currency", &words.to_fst()?)?])?);

        let refs: Vec<&Fst> = forms.iter().collect();
        let graph = add_tokens(SemioticClass::Money, &union(&refs)?)?;
        Ok(CompiledGraph::new(optimize(&graph)))
    }
}

grammar!(
    /// `صد و پنجاه دلار`: amount, then currency. Non-deterministic builds also
    /// offer the currency first.
    MoneyVerbalizer: Verbalize Money "money"
);

impl MoneyVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let conjunction = ctx.lexicon.marker("conjunction")?;
        let amount = concat(
            &take_field(cs, "integer_part")?,
            &optional(&concat_all(&[
                &cs.delete_space,
                &insert(&format!(" {} ", conjunction))?,
                &take_field(cs, "fractional_part")?,
            ])?)?,
        )?;
        let amount_first = concat_all(&[
            &amount,
            &cs.delete_space,
            &insert(" ")?,
            &take_field(cs, "currency")?,
        ])?;

        let mut forms = vec![amount_first];
        if !ctx.deterministic {
            let symbols = ctx.lexicon.table("currency_symbols")?;
            let words = ctx.lexicon.table("currency_words")?;
            for entry in symbols.entries().iter().chain(words.entries()) {
                let currency = &entry.value;
                forms.push(weighted(
                    &concat_all(&[
                        &insert(&format!("{} ", currency))?,
                        &amount,
                        &cs.delete_space,
                        &map_field(cs, "currency", &delete(currency)?)?,
                    ])?,
                    CURRENCY_FIRST_WEIGHT,
                )?);
            }
        }
        let refs: Vec<&Fst> = forms.iter().collect();
        Ok(CompiledGraph::new(delete_tokens(cs, SemioticClass::Money, &union(&refs)?)?))
    }
}
