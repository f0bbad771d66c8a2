// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Weighted finite-state transducers over the tropical semiring.
//!
//! Automata are immutable once built: every operation in [`algebra`],
//! [`compose`] and [`optimize`] reads its operands and returns a fresh
//! [`Fst`]. Internally an `Fst` is reference counted, so cloning one to
//! share it across grammars or threads is cheap.
//!
//! Decoding lives in [`search`]: an input string is expanded against an
//! automaton into a lattice, from which the single best path or a lazy,
//! weight-ordered sequence of distinct outputs can be read.

pub mod algebra;
mod automaton;
pub mod charset;
pub mod compose;
pub mod optimize;
pub mod search;
mod symbol;
mod weight;

pub use algebra::{
    closure, concat, concat_all, cross, delete, delete_fst, insert, insert_fst, invert, literal,
    optional, project_input, project_output, string_map, union, weighted,
};
pub use automaton::{Fst, FstBuilder, StateId, Transition};
pub use charset::Charset;
pub use compose::{compose, difference};
pub use optimize::{connect, optimize, rm_epsilon};
pub use search::{Alignment, Hypothesis, Lattice};
pub use symbol::{Alphabet, Label, EPSILON};
pub use weight::Weight;
