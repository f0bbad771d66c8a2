// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::GrammarError;
use crate::fst::{compose, concat, insert, invert, optimize};
use crate::grammar::markup::{add_tokens, delete_tokens, field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::grammars::numbers::{to_ordinal, NumberGraphs};
use crate::token::SemioticClass;

grammar!(
    /// `بیست و سوم` to `ordinal { integer: "23" }`. Exports the forward
    /// ordinal graph as `ordinal`.
    OrdinalTagger: Classify Ordinal "ordinal" depends ["cardinal"]
);

impl OrdinalTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let numbers = NumberGraphs::import(ctx, "cardinal")?;
        let ordinal = optimize(&compose(&numbers.positive, &to_ordinal(ctx.lexicon, ctx.charset)?)?);
        let graph = add_tokens(SemioticClass::Ordinal, &field("integer", &invert(&ordinal))?)?;
        Ok(CompiledGraph::new(graph).with_export("ordinal", ordinal))
    }
}

grammar!(
    /// `23م`.
    OrdinalVerbalizer: Verbalize Ordinal "ordinal"
);

impl OrdinalVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        let suffix = ctx.lexicon.marker("ordinal_suffix")?;
        let body = concat(&take_field(ctx.charset, "integer")?, &insert(suffix)?)?;
        Ok(CompiledGraph::new(delete_tokens(ctx.charset, SemioticClass::Ordinal, &body)?))
    }
}
