// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Named sub-grammars and the registry that merges them.
//!
//! A grammar is produced by a [`GrammarBuilder`]: a small object that knows
//! its name, its [`GrammarKind`], the semiotic class it handles and which
//! other grammars of the same kind it reuses. Builders read lexical tables
//! and previously compiled grammars through a [`BuildContext`] and return a
//! [`CompiledGraph`], the main automaton plus any named sub-automata other
//! builders may import.
//!
//! The [`Registry`] compiles a builder set in dependency order and merges
//! the classify grammars into one classifier and the verbalize grammars into
//! one verbalizer.

pub mod markup;
mod priority;
mod registry;

pub use priority::{PriorityPolicy, PriorityTable};
pub use registry::{Registry, RegistryOptions};

use crate::errors::{BuildError, GrammarError};
use crate::fst::{Charset, Fst, Weight};
use crate::lexicon::Lexicon;
use crate::token::SemioticClass;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Which side of the token stream a grammar works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GrammarKind {
    /// Raw text in, structured tokens out.
    Classify,
    /// One structured token in, surface text out.
    Verbalize,
}

impl fmt::Display for GrammarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarKind::Classify => write!(f, "classify"),
            GrammarKind::Verbalize => write!(f, "verbalize"),
        }
    }
}

/// Written to spoken (`Tn`) or spoken to written (`Itn`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Tn,
    Itn,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Tn => write!(f, "tn"),
            Direction::Itn => write!(f, "itn"),
        }
    }
}

/// Output of a builder before the registry optimizes and weights it.
#[derive(Debug, Clone)]
pub struct CompiledGraph {
    pub fst: Fst,
    pub exports: BTreeMap<String, Fst>,
}

impl CompiledGraph {
    pub fn new(fst: Fst) -> Self {
        Self {
            fst,
            exports: BTreeMap::new(),
        }
    }

    /// Makes `fst` available to dependent builders under `name`.
    pub fn with_export(mut self, name: &str, fst: Fst) -> Self {
        self.exports.insert(name.to_string(), fst);
        self
    }
}

/// An immutable compiled sub-grammar.
#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    kind: GrammarKind,
    class: SemioticClass,
    deterministic: bool,
    weight: Weight,
    fst: Fst,
    exports: BTreeMap<String, Fst>,
}

impl Grammar {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> GrammarKind {
        self.kind
    }

    pub fn class(&self) -> SemioticClass {
        self.class
    }

    pub fn deterministic(&self) -> bool {
        self.deterministic
    }

    /// Priority weight added when the grammar joins the classifier union.
    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn fst(&self) -> &Fst {
        &self.fst
    }

    pub fn export(&self, name: &str) -> Option<&Fst> {
        self.exports.get(name)
    }
}

/// Builds one sub-grammar.
pub trait GrammarBuilder: Send + Sync {
    /// Unique among builders of the same kind.
    fn name(&self) -> &'static str;

    fn kind(&self) -> GrammarKind;

    fn class(&self) -> SemioticClass;

    /// Names of same-kind grammars whose exports this builder reads.
    fn depends_on(&self) -> &'static [&'static str] {
        &[]
    }

    fn build(&self, ctx: &BuildContext<'_>) -> Result<CompiledGraph, GrammarError>;
}

/// Read-only inputs available to a builder.
pub struct BuildContext<'a> {
    pub lexicon: &'a Lexicon,
    pub charset: &'a Charset,
    pub deterministic: bool,
    kind: GrammarKind,
    built: &'a HashMap<(GrammarKind, String), Grammar>,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(
        lexicon: &'a Lexicon,
        charset: &'a Charset,
        deterministic: bool,
        kind: GrammarKind,
        built: &'a HashMap<(GrammarKind, String), Grammar>,
    ) -> Self {
        Self {
            lexicon,
            charset,
            deterministic,
            kind,
            built,
        }
    }

    /// A named sub-automaton exported by an already compiled grammar of the
    /// same kind.
    pub fn export(&self, grammar: &str, name: &str) -> Result<Fst, BuildError> {
        self.built
            .get(&(self.kind, grammar.to_string()))
            .and_then(|g| g.export(name))
            .cloned()
            .ok_or_else(|| BuildError::MissingExport {
                grammar: grammar.to_string(),
                export: name.to_string(),
            })
    }
}
