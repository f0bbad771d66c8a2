// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::GrammarError;
use crate::fst::{compose, concat, delete_fst, optimize};
use crate::grammar::markup::{add_tokens, delete_tokens, field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::any_of;
use crate::grammars::numbers::{native, to_ordinal, NumberGraphs};
use crate::token::SemioticClass;

/// Written ordinal suffixes, removed from the input.
const SUFFIXES: &[&str] = &["ام", "م", "st", "nd", "rd", "th", "ST", "ND", "RD", "TH"];

grammar!(
    /// `3rd` or `۳ام` to `ordinal { integer: "سوم" }`. Exports the spoken
    /// ordinal of every positive number as `ordinal`.
    OrdinalTagger: Classify Ordinal "ordinal" depends ["cardinal"]
);

impl OrdinalTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let ordinal = optimize(&compose(&numbers.positive, &to_ordinal(ctx.lexicon, ctx.charset)?)?);
        let written = concat(&native(ctx.charset, &ordinal)?, &delete_fst(&any_of(SUFFIXES)?))?;
        let graph = add_tokens(SemioticClass::Ordinal, &field("integer", &written)?)?;
        Ok(CompiledGraph::new(graph).with_export("ordinal", ordinal))
    }
}

grammar!(OrdinalVerbalizer: Verbalize Ordinal "ordinal");

impl OrdinalVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let graph = delete_tokens(ctx.charset, SemioticClass::Ordinal, &take_field(ctx.charset, "integer")?)?;
        Ok(CompiledGraph::new(graph))
    }
}
