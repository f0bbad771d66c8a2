// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::AlgebraError;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Resolution used when weights are compared or hashed.
const QUANTUM: f32 = 1.0 / 4096.0;

/// Tropical semiring weight: `plus` is min, `times` is addition.
///
/// Lower is better. [`Weight::ONE`] (0.0) is the identity for `times`,
/// [`Weight::ZERO`] (+inf) marks "no path" and is the identity for `plus`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weight(f32);

impl Weight {
    pub const ONE: Weight = Weight(0.0);
    pub const ZERO: Weight = Weight(f32::INFINITY);

    /// Checked constructor for user-supplied weights.
    pub fn new(value: f32) -> Result<Self, AlgebraError> {
        if value.is_finite() && value >= 0.0 {
            Ok(Weight(value))
        } else {
            Err(AlgebraError::InvalidWeight(value))
        }
    }

    /// For weights produced by arithmetic on already valid weights.
    pub(crate) fn raw(value: f32) -> Self {
        Weight(value)
    }

    pub fn value(self) -> f32 {
        self.0
    }

    pub fn plus(self, other: Weight) -> Weight {
        if other.0 < self.0 {
            other
        } else {
            self
        }
    }

    pub fn times(self, other: Weight) -> Weight {
        Weight(self.0 + other.0)
    }

    /// Residual `self - other`, clamped at zero against rounding noise.
    pub(crate) fn divide(self, other: Weight) -> Weight {
        if self.is_zero() {
            return Weight::ZERO;
        }
        Weight((self.0 - other.0).max(0.0))
    }

    pub fn is_zero(self) -> bool {
        self.0.is_infinite()
    }

    /// Integer key for hashing states whose identity includes a weight.
    pub(crate) fn quantize(self) -> i64 {
        if self.is_zero() {
            i64::MAX
        } else {
            (self.0 / QUANTUM).round() as i64
        }
    }

    pub fn approx_eq(self, other: Weight) -> bool {
        self.quantize() == other.quantize()
    }
}

impl Default for Weight {
    fn default() -> Self {
        Weight::ONE
    }
}

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            write!(f, "inf")
        } else {
            write!(f, "{:.3}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semiring_identities() {
        let w = Weight::new(1.5).unwrap();
        assert_eq!(w.times(Weight::ONE), w);
        assert_eq!(w.plus(Weight::ZERO), w);
        assert!(w.times(Weight::ZERO).is_zero());
        assert_eq!(w.plus(Weight::new(0.5).unwrap()).value(), 0.5);
    }

    #[test]
    fn test_rejects_invalid_weights() {
        for value in [-1.0, f32::NAN, f32::INFINITY] {
            assert!(Weight::new(value).is_err(), "{} should be rejected", value);
        }
    }

    #[test]
    fn test_ordering_prefers_lower() {
        let mut weights = vec![Weight::ZERO, Weight::new(2.0).unwrap(), Weight::ONE];
        weights.sort();
        assert_eq!(weights[0], Weight::ONE);
        assert!(weights[2].is_zero());
    }
}
