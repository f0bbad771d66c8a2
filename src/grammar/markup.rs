// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Building blocks for writing and reading the structured token markup.
//!
//! Classify grammars wrap values with [`field`] and [`add_tokens`];
//! verbalize grammars strip the same markup with [`take_field`],
//! [`map_field`] and [`delete_tokens`].

use crate::errors::AlgebraError;
use crate::fst::{closure, concat_all, delete, insert, Charset, Fst};
use crate::token::SemioticClass;

/// `name: "<value>"`, with the value produced by `value`.
pub fn field(name: &str, value: &Fst) -> Result<Fst, AlgebraError> {
    concat_all(&[&insert(&format!("{}: \"", name))?, value, &insert("\"")?])
}

/// `<class> { <body> }`.
pub fn add_tokens(class: SemioticClass, body: &Fst) -> Result<Fst, AlgebraError> {
    concat_all(&[&insert(&format!("{} {{ ", class.name()))?, body, &insert(" }")?])
}

/// `<name> { <body> }` nested inside another message.
pub fn add_message(name: &str, body: &Fst) -> Result<Fst, AlgebraError> {
    concat_all(&[&insert(&format!("{} {{ ", name))?, body, &insert(" }")?])
}

/// Reads `name: "<v>"` and writes whatever `value` writes for `<v>`.
pub fn map_field(charset: &Charset, name: &str, value: &Fst) -> Result<Fst, AlgebraError> {
    concat_all(&[
        &delete(name)?,
        &charset.delete_space,
        &delete(":")?,
        &charset.delete_space,
        &delete("\"")?,
        value,
        &delete("\"")?,
    ])
}

/// Reads `name: "<v>"` and writes `<v>` unchanged.
pub fn take_field(charset: &Charset, name: &str) -> Result<Fst, AlgebraError> {
    map_field(charset, name, &closure(&charset.not_quote, 1, None)?)
}

/// Reads `name: "<v>"` and writes nothing.
pub fn drop_field(charset: &Charset, name: &str) -> Result<Fst, AlgebraError> {
    map_field(
        charset,
        name,
        &crate::fst::delete_fst(&closure(&charset.not_quote, 1, None)?),
    )
}

/// Reads `<name> { <body> }` where `body` consumes the nested fields.
pub fn take_message(charset: &Charset, name: &str, body: &Fst) -> Result<Fst, AlgebraError> {
    concat_all(&[
        &delete(name)?,
        &charset.delete_space,
        &delete("{")?,
        &charset.delete_space,
        body,
        &charset.delete_space,
        &delete("}")?,
    ])
}

/// Reads `<class> { <body> }`.
pub fn delete_tokens(
    charset: &Charset,
    class: SemioticClass,
    body: &Fst,
) -> Result<Fst, AlgebraError> {
    take_message(charset, class.name(), body)
}
