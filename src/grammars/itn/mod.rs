// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Persian inverse text normalization: spoken forms in, written forms out.
//!
//! Taggers are the text normalization number graphs run backwards with
//! [`invert`](crate::fst::invert); verbalizers lay the written values out
//! with separators such as `:` and `/`.

mod cardinal;
mod date;
mod decimal;
mod fraction;
mod measure;
mod money;
mod ordinal;
mod time;

use crate::errors::GrammarError;
use crate::fst::{concat, concat_all, cross, delete, insert, literal, optional, Charset, Fst};
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
    /// Any non-space run; spoken text may already contain digits.
    WordTagger: Classify Word "word"
);

impl WordTagger {
    fn graph(ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError> {
        Ok(CompiledGraph::new(word(ctx.charset, true)?))
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

/// Spoken `منفی ` to `negative: "-" `, or nothing.
fn negative_word(lexicon: &Lexicon) -> Result<Fst, GrammarError> {
    let marker = lexicon.marker("negative")?;
    Ok(optional(&concat_all(&[
        &field("negative", &cross(marker, "-")?)?,
        &delete(" ")?,
        &insert(" ")?,
    ])?)?)
}

/// Reads an optional `negative: "-"` and writes the sign.
fn written_negative(charset: &Charset) -> Result<Fst, GrammarError> {
    Ok(optional(&concat(
        &map_field(charset, "negative", &literal("-")?)?,
        &charset.delete_space,
    )?)?)
}
