// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Rule sets for each supported language and direction.
//!
//! A rule set is just a list of [`GrammarBuilder`]s. [`compile`] hands the
//! list for a lexicon's language to [`Registry::build`].

use crate::errors::GrammarError;
use crate::fst::{optimize, string_map, Fst, Weight};
use crate::grammar::{Direction, GrammarBuilder, GrammarKind, PriorityPolicy, Registry, RegistryOptions};
use crate::lexicon::{Language, Lexicon};

/// Declares a unit struct implementing [`GrammarBuilder`] whose `build`
/// calls the struct's own `graph` function.
macro_rules! grammar {
    ($(#[$meta:meta])* $ty:ident: $kind:ident $class:ident $name:literal $(depends [$($dep:literal),*])?) => {
        $(#[$meta])*
        #[derive(Debug, Default, Clone, Copy)]
        pub struct $ty;

        impl $crate::grammar::GrammarBuilder for $ty {
            fn name(&self) -> &'static str {
                $name
            }

            fn kind(&self) -> $crate::grammar::GrammarKind {
                $crate::grammar::GrammarKind::$kind
            }

            fn class(&self) -> $crate::token::SemioticClass {
                $crate::token::SemioticClass::$class
            }

            fn depends_on(&self) -> &'static [&'static str] {
                &[$($($dep),*)?]
            }

            fn build(
                &self,
                ctx: &$crate::grammar::BuildContext<'_>,
            ) -> Result<$crate::grammar::CompiledGraph, $crate::errors::GrammarError> {
                Self::graph(ctx)
            }
        }
    };
}

mod common;
pub mod itn;
mod numbers;
pub mod tn;

/// Builders for `language` in `direction`.
pub fn builders(language: Language, direction: Direction) -> Vec<Box<dyn GrammarBuilder>> {
    match (language, direction) {
        (Language::Persian, Direction::Tn) => tn::builders(),
        (Language::Persian, Direction::Itn) => itn::builders(),
    }
}

/// `(kind, name)` of every grammar in a rule set, in build order.
pub fn list_available_grammars(
    language: Language,
    direction: Direction,
) -> Vec<(GrammarKind, &'static str)> {
    builders(language, direction)
        .iter()
        .map(|b| (b.kind(), b.name()))
        .collect()
}

/// Compiles the rule set matching the lexicon's language.
pub fn compile(
    lexicon: &Lexicon,
    direction: Direction,
    policy: &dyn PriorityPolicy,
    options: &RegistryOptions,
) -> Result<Registry, GrammarError> {
    tracing::info!(
        language = %lexicon.language(),
        direction = %direction,
        deterministic = options.deterministic,
        "Compiling grammars"
    );
    Registry::build(
        lexicon,
        direction,
        builders(lexicon.language(), direction),
        policy,
        options,
    )
}

/// Acceptor for exactly the given strings.
pub(crate) fn any_of(words: &[&str]) -> Result<Fst, GrammarError> {
    Ok(optimize(&string_map(
        words.iter().map(|w| (*w, *w, Weight::ONE)),
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_sets_cover_every_class_in_both_kinds() {
        use crate::token::SemioticClass;

        for direction in [Direction::Tn, Direction::Itn] {
            let builders = builders(Language::Persian, direction);
            for class in SemioticClass::ALL {
                assert!(
                    builders
                        .iter()
                        .any(|b| b.kind() == GrammarKind::Classify && b.class() == class),
                    "{} has no {} classifier",
                    direction,
                    class
                );
            }
            assert!(builders
                .iter()
                .any(|b| b.kind() == GrammarKind::Verbalize && b.class().is_plain()));
        }
    }

    #[test]
    fn test_list_available_grammars() {
        let names = list_available_grammars(Language::Persian, Direction::Tn);
        assert!(names.contains(&(GrammarKind::Classify, "cardinal")));
        assert!(names.contains(&(GrammarKind::Verbalize, "money")));
        let cardinal = names
            .iter()
            .position(|n| *n == (GrammarKind::Classify, "cardinal"));
        let ordinal = names
            .iter()
            .position(|n| *n == (GrammarKind::Classify, "ordinal"));
        assert!(cardinal < ordinal);
    }
}
