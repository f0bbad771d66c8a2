// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Persian text normalization: written forms in, spoken forms out.
//!
//! Taggers read digits in ASCII, Persian or Arabic-Indic script and write
//! spoken Persian into the token fields, so verbalizers mostly strip markup
//! and add connecting words such as `ممیز` or `ساعت`.

mod cardinal;
mod date;
mod decimal;
mod fraction;
mod measure;
mod money;
mod ordinal;
mod time;

use crate::errors::GrammarError;
use crate::fst::{concat, concat_all, cross, insert, optional, union, Charset, Fst};
use crate::grammar::markup::{field, map_field};
use crate::grammar::{BuildContext, CompiledGraph, GrammarBuilder};
use crate::grammars::common::{word, PlainVerbalizer, PunctTagger};
use crate::lexicon::Lexicon;

pub use cardinal::{CardinalTagger, CardinalVerbalizer};
pub use date::{DateTagger, DateVerbalizer};
pub use decimal::{DecimalTagger, DecimalVerbalizer};
pub use fraction::{FractionTagger, FractionVerbalizer};
pub use measure::{MeasureTagger, MeasureVerbalizer};
pub use money::{MoneyTagger, MoneyVerbalizer};
pub use ordinal::{OrdinalTagger, OrdinalVerbalizer};
pub use time::{TimeTagger, TimeVerbalizer};

grammar!(
    /// Any non-space run without digits.
    WordTagger: Classify Word "word"
);

impl WordTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        Ok(CompiledGraph::new(word(ctx.charset, false)?))
    }
}

pub(crate) fn builders() -> Vec<Box<dyn GrammarBuilder>> {
    vec![
        Box::new(CardinalTagger),
        Box::new(OrdinalTagger),
        Box::new(DecimalTagger),
        Box::new(FractionTagger),
        Box::new(TimeTagger),
        Box::new(DateTagger),
        Box::new(MoneyTagger),
        Box::new(MeasureTagger),
        Box::new(WordTagger),
        Box::new(PunctTagger),
        Box::new(CardinalVerbalizer),
        Box::new(OrdinalVerbalizer),
        Box::new(DecimalVerbalizer),
        Box::new(FractionVerbalizer),
        Box::new(TimeVerbalizer),
        Box::new(DateVerbalizer),
        Box::new(MoneyVerbalizer),
        Box::new(MeasureVerbalizer),
        Box::new(PlainVerbalizer),
    ]
}

/// `negative: "true" ` for a leading minus sign, or nothing.
fn negative_sign() -> Result<Fst, GrammarError> {
    let sign = union(&[&cross("-", "true")?, &cross("\u{2212}", "true")?])?;
    Ok(optional(&concat(&field("negative", &sign)?, &insert(" ")?)?)?)
}

/// Reads an optional `negative: "true"` and speaks it.
fn spoken_negative(lexicon: &Lexicon, charset: &Charset) -> Result<Fst, GrammarError> {
    let marker = lexicon.marker("negative")?;
    Ok(optional(&concat_all(&[
        &map_field(charset, "negative", &cross("true", marker)?)?,
        &charset.delete_space,
        &insert(" ")?,
    ])?)?)
}
