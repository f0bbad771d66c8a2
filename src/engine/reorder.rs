// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::token::{Field, FieldValue, Parse, SemioticClass, Token};

/// A rewrite applied to a parse between classification and verbalization.
pub trait TokenPass: Send + Sync {
    fn name(&self) -> &'static str;
    fn apply(&self, parse: &mut Parse);
}

/// Puts every token's fields into its class's canonical order, the order
/// the verbalizers read them in. Nested messages named after a class
/// (`cardinal { ... }` inside a measure) are ordered by that class.
/// Fields the class does not list keep their relative order at the end.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldOrderPass;

impl TokenPass for FieldOrderPass {
    fn name(&self) -> &'static str {
        "field_order"
    }

    fn apply(&self, parse: &mut Parse) {
        for token in &mut parse.tokens {
            reorder_token(token);
        }
    }
}

fn reorder_token(token: &mut Token) {
    reorder_fields(token.class.field_names(), &mut token.fields);
}

fn reorder_fields(order: &[&str], fields: &mut [Field]) {
    let rank = |name: &str| order.iter().position(|n| *n == name).unwrap_or(order.len());
    // stable, so unknown fields keep their order
    fields.sort_by_key(|f| rank(&f.name));

    for field in fields.iter_mut() {
        if let FieldValue::Message(inner) = &mut field.value {
            let nested = SemioticClass::ALL
                .iter()
                .find(|class| class.name() == field.name)
                .map_or(&[][..], |class| class.field_names());
            reorder_fields(nested, inner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::Weight;

    fn names(fields: &[Field]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_field_order() {
        struct TestCase {
            name: &'static str,
            token: Token,
            expected: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "year first date",
                token: Token::new(
                    SemioticClass::Date,
                    vec![
                        Field::text("year", "1402"),
                        Field::text("month", "مرداد"),
                        Field::text("day", "پانزده"),
                    ],
                ),
                expected: vec!["day", "month", "year"],
            },
            TestCase {
                name: "already canonical",
                token: Token::new(
                    SemioticClass::Time,
                    vec![Field::text("hours", "3"), Field::text("minutes", "30")],
                ),
                expected: vec!["hours", "minutes"],
            },
            TestCase {
                name: "unknown field moves last",
                token: Token::new(
                    SemioticClass::Money,
                    vec![
                        Field::text("style", "x"),
                        Field::text("currency", "$"),
                        Field::text("integer_part", "5"),
                    ],
                ),
                expected: vec!["integer_part", "currency", "style"],
            },
        ];

        for test_case in test_cases {
            let mut parse = Parse::new(vec![test_case.token], Weight::ONE, None);
            FieldOrderPass.apply(&mut parse);
            assert_eq!(
                names(&parse.tokens[0].fields),
                test_case.expected,
                "Test '{}' failed",
                test_case.name
            );
        }
    }

    #[test]
    fn test_nested_message_is_ordered_by_its_class() {
        let token = Token::new(
            SemioticClass::Measure,
            vec![
                Field::text("units", "%"),
                Field::message(
                    "cardinal",
                    vec![Field::text("integer", "50"), Field::text("negative", "-")],
                ),
            ],
        );
        let mut parse = Parse::new(vec![token], Weight::ONE, None);
        FieldOrderPass.apply(&mut parse);

        let token = &parse.tokens[0];
        assert_eq!(names(&token.fields), vec!["cardinal", "units"]);
        match &token.fields[0].value {
            FieldValue::Message(inner) => assert_eq!(names(inner), vec!["negative", "integer"]),
            FieldValue::Text(_) => panic!("expected nested message"),
        }
    }
}
