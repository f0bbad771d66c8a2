// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured tokens exchanged between classification and verbalization.
//!
//! On the wire a token is `tokens { <class> { field: "value" ... } }`, or
//! `tokens { name: "..." }` for words and punctuation. [`parser`] reads a
//! stream of those back into [`Token`]s; [`Token::to_structured`] writes one.

mod class;
pub mod parser;

pub use class::SemioticClass;

use crate::errors::NormalizeError;
use crate::fst::Weight;
use serde::Serialize;
use std::ops::Range;

/// Value of one field: a quoted string or a nested message such as the
/// `cardinal { ... }` inside a measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Message(Vec<Field>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub name: String,
    pub value: FieldValue,
}

impl Field {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: FieldValue::Text(value.to_string()),
        }
    }

    pub fn message(name: &str, fields: Vec<Field>) -> Self {
        Self {
            name: name.to_string(),
            value: FieldValue::Message(fields),
        }
    }

    fn write(&self, out: &mut String) {
        match &self.value {
            FieldValue::Text(value) => {
                out.push_str(&self.name);
                out.push_str(": \"");
                out.push_str(value);
                out.push('"');
            }
            FieldValue::Message(fields) => {
                out.push_str(&self.name);
                out.push_str(" {");
                for field in fields {
                    out.push(' ');
                    field.write(out);
                }
                out.push_str(" }");
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub class: SemioticClass,
    pub fields: Vec<Field>,
    /// Byte range of the source text this token covers.
    pub span: Range<usize>,
    pub weight: Weight,
}

impl Token {
    pub fn new(class: SemioticClass, fields: Vec<Field>) -> Self {
        Self {
            class,
            fields,
            span: 0..0,
            weight: Weight::ONE,
        }
    }

    /// A plain word token, as used when a span is passed through unchanged.
    pub fn word(text: &str) -> Self {
        Self::new(SemioticClass::Word, vec![Field::text("name", text)])
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Text of a top-level string field.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.field(name)? {
            FieldValue::Text(s) => Some(s),
            FieldValue::Message(_) => None,
        }
    }

    /// Source text covered by this token, without surrounding whitespace.
    pub fn surface<'a>(&self, source: &'a str) -> &'a str {
        source.get(self.span.clone()).unwrap_or("").trim()
    }

    pub fn to_structured(&self) -> String {
        let mut out = String::from("tokens { ");
        if self.class.is_plain() {
            for field in &self.fields {
                field.write(&mut out);
            }
        } else {
            Field::message(self.class.name(), self.fields.clone()).write(&mut out);
        }
        out.push_str(" }");
        out
    }
}

/// A full segmentation of one input sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parse {
    pub tokens: Vec<Token>,
    /// Token weights plus join weight.
    pub weight: Weight,
    /// Weight spent between tokens.
    pub join_weight: Weight,
    #[serde(skip)]
    source: Option<String>,
}

impl Parse {
    pub fn new(tokens: Vec<Token>, join_weight: Weight, source: Option<String>) -> Self {
        let weight = tokens
            .iter()
            .fold(join_weight, |acc, t| acc.times(t.weight));
        Self {
            tokens,
            weight,
            join_weight,
            source,
        }
    }

    /// Reads a structured token stream that did not come from a classifier.
    /// Tokens have empty spans and are joined by single spaces when rendered.
    pub fn from_structured(stream: &str) -> Result<Self, NormalizeError> {
        let tokens = parser::parse_stream(stream)?
            .into_iter()
            .map(|parsed| parsed.token)
            .collect();
        Ok(Self::new(tokens, Weight::ONE, None))
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn to_structured(&self) -> String {
        self.tokens
            .iter()
            .map(Token::to_structured)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether the source had whitespace between token `index` and the next.
    /// Without a source, tokens are assumed to be space separated.
    pub fn space_after(&self, index: usize) -> bool {
        let Some(source) = &self.source else {
            return true;
        };
        let ends_blank = self
            .tokens
            .get(index)
            .and_then(|t| source.get(t.span.clone()))
            .and_then(|s| s.chars().last())
            .is_some_and(char::is_whitespace);
        let next_starts_blank = self
            .tokens
            .get(index + 1)
            .and_then(|t| source.get(t.span.clone()))
            .and_then(|s| s.chars().next())
            .is_some_and(char::is_whitespace);
        ends_blank || next_starts_blank
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_structured_shapes() {
        struct TestCase {
            name: &'static str,
            token: Token,
            expected: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "class token",
                token: Token::new(
                    SemioticClass::Time,
                    vec![Field::text("hours", "3"), Field::text("minutes", "30")],
                ),
                expected: r#"tokens { time { hours: "3" minutes: "30" } }"#,
            },
            TestCase {
                name: "word",
                token: Token::word("سلام"),
                expected: r#"tokens { name: "سلام" }"#,
            },
            TestCase {
                name: "nested message",
                token: Token::new(
                    SemioticClass::Measure,
                    vec![
                        Field::message("cardinal", vec![Field::text("integer", "50")]),
                        Field::text("units", "%"),
                    ],
                ),
                expected: r#"tokens { measure { cardinal { integer: "50" } units: "%" } }"#,
            },
        ];

        for case in test_cases {
            assert_eq!(case.token.to_structured(), case.expected, "case '{}'", case.name);
        }
    }

    #[test]
    fn test_json_shape() {
        let mut token = Token::new(
            SemioticClass::Measure,
            vec![
                Field::message("cardinal", vec![Field::text("integer", "50")]),
                Field::text("units", "%"),
            ],
        );
        token.span = 0..3;

        let value = serde_json::to_value(&token).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "class": "measure",
                "fields": [
                    { "name": "cardinal", "value": [{ "name": "integer", "value": "50" }] },
                    { "name": "units", "value": "%" }
                ],
                "span": { "start": 0, "end": 3 },
                "weight": 0.0
            })
        );
    }

    #[test]
    fn test_parse_weight_sums_tokens_and_joins() {
        let mut a = Token::word("a");
        a.weight = Weight::new(1.0).unwrap();
        let mut b = Token::word("b");
        b.weight = Weight::new(2.0).unwrap();
        let parse = Parse::new(vec![a, b], Weight::new(0.5).unwrap(), None);
        assert_eq!(parse.weight.value(), 3.5);
    }

    #[test]
    fn test_space_after_follows_source() {
        let source = "a b,".to_string();
        let mut a = Token::word("a");
        a.span = 0..2;
        let mut b = Token::word("b");
        b.span = 2..3;
        let mut comma = Token::new(SemioticClass::Punct, vec![Field::text("name", ",")]);
        comma.span = 3..4;
        let parse = Parse::new(vec![a, b, comma], Weight::ONE, Some(source));
        assert!(parse.space_after(0));
        assert!(!parse.space_after(1));
        assert_eq!(parse.tokens[0].surface(parse.source().unwrap()), "a");
    }
}
