// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while constructing automata.
//!
//! Every variant is fatal at build time: a grammar that asks for an invalid
//! construction cannot be compiled and registry initialization stops.

use crate::fst::Alphabet;
use thiserror::Error;

/// Malformed automaton construction request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgebraError {
    /// `closure` called with `min > max`.
    #[error("Invalid closure bounds: min {min} exceeds max {max}")]
    InvalidClosureBounds { min: u32, max: u32 },

    /// Unbounded `closure` over an operand that accepts the empty input.
    #[error("Unbounded closure over an operand that accepts the empty input")]
    UnboundedClosure,

    /// Two operands disagree on the alphabet of the tape being joined.
    #[error("Alphabet mismatch in {operation}: {left:?} vs {right:?}")]
    AlphabetMismatch {
        operation: &'static str,
        left: Alphabet,
        right: Alphabet,
    },

    /// Literal strings may not contain the symbol reserved for epsilon.
    #[error("Literal {0:?} contains the reserved epsilon symbol (NUL)")]
    ReservedSymbol(String),

    /// Weights must be finite and non-negative in the tropical semiring used here.
    #[error("Invalid weight {0}: weights must be finite and non-negative")]
    InvalidWeight(f32),

    /// Weighted determinization exceeded its state budget.
    #[error("Determinization exceeded {limit} states")]
    DeterminizationLimit { limit: usize },

    /// The requested character class cannot be enumerated on this alphabet.
    #[error("Character class '{class}' is not available on the {alphabet:?} alphabet")]
    UnsupportedCharClass {
        class: &'static str,
        alphabet: Alphabet,
    },
}
