// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::GrammarError;
use crate::fst::charset::one_of;
use crate::fst::{
    closure, compose, concat, concat_all, delete, insert, invert, optimize, optional, union,
    weighted, Fst,
};
use crate::grammar::markup::{add_tokens, delete_tokens, field, map_field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::NumberGraphs;
use crate::token::SemioticClass;

/// Extra cost of reading `<amount> و <cents>`, so `صد و پنجاه دلار` stays 150.
const CENTS_WEIGHT: f32 = 0.1;

grammar!(
    /// `صد دلار` to `money { integer_part: "100" currency: "$" }` and
    /// `هزار تومان` to `money { integer_part: "1000" currency: "تومان" }`.
    /// `یک و پنجاه دلار` also fills `fractional_part: "50"`.
    MoneyTagger: Classify Money "money" depends ["cardinal"]
);

impl MoneyTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let symbols = ctx.lexicon.table("currency_symbols")?.inverse().to_fst()?;
        let words = ctx.lexicon.table("currency_words")?.inverse().to_fst()?;
        let conjunction = ctx.lexicon.marker("conjunction")?;

        let two_digits = closure(&one_of("0123456789")?, 2, Some(2))?;
        let cents = weighted(
            &concat_all(&[
                &delete(&format!(" {} ", conjunction))?,
                &insert(" ")?,
                &field("fractional_part", &invert(&compose(&two_digits, &numbers.padded)?))?,
            ])?,
            CENTS_WEIGHT,
        )?;
        let body = concat_all(&[
            &field("integer_part", &invert(&numbers.cardinal))?,
            &optional(&cents)?,
            &delete(" ")?,
            &insert(" ")?,
            &field("currency", &union(&[&symbols, &words])?)?,
        ])?;
        Ok(CompiledGraph::new(optimize(&add_tokens(SemioticClass::Money, &body)?)))
    }
}

grammar!(
    /// Symbol currencies go before the amount with no space (`$100`), word
    /// currencies after it (`1000 تومان`).
    MoneyVerbalizer: Verbalize Money "money"
);

impl MoneyVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let cs = ctx.charset;
        let amount = concat(
            &take_field(cs, "integer_part")?,
            &optional(&concat_all(&[
                &cs.delete_space,
                &insert(".")?,
                &take_field(cs, "fractional_part")?,
            ])?)?,
        )?;

        let mut forms = Vec::new();
        for entry in ctx.lexicon.table("currency_symbols")?.entries() {
            forms.push(concat_all(&[
                &insert(&entry.key)?,
                &amount,
                &cs.delete_space,
                &map_field(cs, "currency", &delete(&entry.key)?)?,
            ])?);
        }
        forms.push(concat_all(&[
            &amount,
            &cs.delete_space,
            &insert(" ")?,
            &map_field(cs, "currency", &ctx.lexicon.table("currency_words")?.keys_fst()?)?,
        ])?);

        let refs: Vec<&Fst> = forms.iter().collect();
        Ok(CompiledGraph::new(delete_tokens(cs, SemioticClass::Money, &union(&refs)?)?))
    }
}
