// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Word and punctuation grammars shared by every rule set.

use crate::errors::GrammarError;
use crate::fst::{closure, concat_all, difference, literal, union, Charset, Fst};
use crate::grammar::markup::{field, take_field};
use crate::grammar::{BuildContext, CompiledGraph};

/// Catch-all for a run of non-space characters. Punctuation may appear
/// inside a word but never at its edges, so trailing punctuation becomes
/// its own token. Digits are excluded unless `allow_digits`.
pub(super) fn word(charset: &Charset, allow_digits: bool) -> Result<Fst, GrammarError> {
    let mut inner = difference(&charset.not_space, &literal("\"")?)?;
    if !allow_digits {
        inner = difference(&inner, &union(&[&charset.digit, &charset.native_digit])?)?;
    }
    let edge = difference(&inner, &charset.punct)?;
    let body = union(&[
        &edge,
        &concat_all(&[&edge, &closure(&inner, 0, None)?, &edge])?,
    ])?;
    Ok(field("name", &body)?)
}

grammar!(
    /// A single punctuation mark.
    PunctTagger: Classify Punct "punct"
);

impl PunctTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        Ok(CompiledGraph::new(field("name", &ctx.charset.punct)?))
    }
}

grammar!(
    /// Renders `name: "..."` tokens, words and punctuation alike, verbatim.
    PlainVerbalizer: Verbalize Word "word"
);

impl PlainVerbalizer {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        Ok(CompiledGraph::new(take_field(ctx.charset, "name")?))
    }
}
