// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of token classes a grammar can produce.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SemioticClass {
    Cardinal,
    Decimal,
    Fraction,
    Ordinal,
    Date,
    Time,
    Money,
    Measure,
    Word,
    Punct,
}

impl SemioticClass {
    pub const ALL: [SemioticClass; 10] = [
        SemioticClass::Cardinal,
        SemioticClass::Decimal,
        SemioticClass::Fraction,
        SemioticClass::Ordinal,
        SemioticClass::Date,
        SemioticClass::Time,
        SemioticClass::Money,
        SemioticClass::Measure,
        SemioticClass::Word,
        SemioticClass::Punct,
    ];

    /// Name used in the structured token stream.
    pub fn name(&self) -> &'static str {
        match self {
            SemioticClass::Cardinal => "cardinal",
            SemioticClass::Decimal => "decimal",
            SemioticClass::Fraction => "fraction",
            SemioticClass::Ordinal => "ordinal",
            SemioticClass::Date => "date",
            SemioticClass::Time => "time",
            SemioticClass::Money => "money",
            SemioticClass::Measure => "measure",
            SemioticClass::Word => "word",
            SemioticClass::Punct => "punct",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Fields in canonical order. Verbalizers expect this order.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            SemioticClass::Cardinal => &["negative", "integer"],
            SemioticClass::Decimal => &["negative", "integer_part", "fractional_part"],
            SemioticClass::Fraction => &["negative", "integer_part", "numerator", "denominator"],
            SemioticClass::Ordinal => &["integer"],
            SemioticClass::Date => &["day", "month", "year", "calendar"],
            SemioticClass::Time => &["hours", "minutes", "suffix"],
            SemioticClass::Money => &["integer_part", "fractional_part", "currency"],
            SemioticClass::Measure => &["cardinal", "decimal", "units"],
            SemioticClass::Word | SemioticClass::Punct => &["name"],
        }
    }

    /// Word and punctuation tokens carry a bare `name` field without a class wrapper.
    pub fn is_plain(&self) -> bool {
        matches!(self, SemioticClass::Word | SemioticClass::Punct)
    }
}

impl fmt::Display for SemioticClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for class in SemioticClass::ALL {
            assert_eq!(SemioticClass::from_name(class.name()), Some(class));
        }
        assert_eq!(SemioticClass::from_name("telephone"), None);
    }

    #[test]
    fn test_measure_nests_number_messages() {
        let fields = SemioticClass::Measure.field_names();
        assert!(fields.contains(&"cardinal") && fields.contains(&"decimal"));
        for nested in ["cardinal", "decimal"] {
            assert!(SemioticClass::from_name(nested).is_some());
        }
    }
}
