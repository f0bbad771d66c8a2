// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::AlgebraError;
use crate::fst::Weight;
use crate::token::SemioticClass;
use std::collections::HashMap;
use std::fmt::Debug;

/// Decides how strongly each class is preferred when several grammars
/// accept the same span. Lower weight wins.
pub trait PriorityPolicy: Send + Sync + Debug {
    fn weight(&self, class: SemioticClass) -> Weight;
}

/// Fixed weight per class.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityTable {
    weights: HashMap<SemioticClass, Weight>,
}

impl PriorityTable {
    /// Replaces the weights of the given classes.
    pub fn with_overrides(
        mut self,
        overrides: &HashMap<SemioticClass, f32>,
    ) -> Result<Self, AlgebraError> {
        for (class, value) in overrides {
            self.weights.insert(*class, Weight::new(*value)?);
        }
        Ok(self)
    }
}

impl Default for PriorityTable {
    fn default() -> Self {
        use SemioticClass::*;
        let weights = [
            (Time, 1.0),
            (Date, 1.0),
            (Money, 1.0),
            (Measure, 1.0),
            (Ordinal, 1.05),
            (Fraction, 1.05),
            (Decimal, 1.1),
            (Cardinal, 1.1),
            (Punct, 1.1),
            (Word, 100.0),
        ]
        .into_iter()
        .map(|(class, w)| (class, Weight::raw(w)))
        .collect();
        Self { weights }
    }
}

impl PriorityPolicy for PriorityTable {
    fn weight(&self, class: SemioticClass) -> Weight {
        self.weights.get(&class).copied().unwrap_or(Weight::ONE)
    }
}
