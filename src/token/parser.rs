// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Recursive-descent reader for `tokens { ... }` streams.

use super::{Field, FieldValue, SemioticClass, Token};
use crate::errors::NormalizeError;
use crate::fst::charset::is_punctuation;
use std::ops::Range;

/// A token together with the byte range it occupied in the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedToken {
    pub token: Token,
    pub output: Range<usize>,
}

/// Parses a whitespace-separated sequence of tokens.
pub fn parse_stream(stream: &str) -> Result<Vec<ParsedToken>, NormalizeError> {
    let mut cursor = Cursor { text: stream, pos: 0 };
    let mut tokens = Vec::new();
    cursor.skip_space();
    while !cursor.at_end() {
        let start = cursor.pos;
        let token = cursor.token()?;
        tokens.push(ParsedToken {
            token,
            output: start..cursor.pos,
        });
        cursor.skip_space();
    }
    Ok(tokens)
}

/// Parses exactly one token.
pub fn parse_token(text: &str) -> Result<Token, NormalizeError> {
    let mut tokens = parse_stream(text)?;
    match tokens.len() {
        1 => Ok(tokens.remove(0).token),
        n => Err(NormalizeError::MalformedTokens {
            offset: 0,
            reason: format!("expected one token, found {}", n),
        }),
    }
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn error(&self, reason: impl Into<String>) -> NormalizeError {
        NormalizeError::MalformedTokens {
            offset: self.pos,
            reason: reason.into(),
        }
    }

    fn skip_space(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn expect(&mut self, literal: &str) -> Result<(), NormalizeError> {
        self.skip_space();
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            Ok(())
        } else {
            Err(self.error(format!("expected {:?}", literal)))
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.skip_space();
        self.rest().chars().next()
    }

    fn ident(&mut self) -> Result<&'a str, NormalizeError> {
        self.skip_space();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected identifier"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn quoted(&mut self) -> Result<&'a str, NormalizeError> {
        self.expect("\"")?;
        let rest = self.rest();
        match rest.find('"') {
            Some(end) => {
                self.pos += end + 1;
                Ok(&rest[..end])
            }
            None => Err(self.error("unterminated string")),
        }
    }

    fn token(&mut self) -> Result<Token, NormalizeError> {
        self.expect("tokens")?;
        self.expect("{")?;
        let body_at = self.pos;
        let name = self.ident()?;
        let token = if self.peek() == Some(':') {
            if name != "name" {
                return Err(self.error(format!("unexpected bare field {:?}", name)));
            }
            self.expect(":")?;
            let value = self.quoted()?;
            let class = if !value.is_empty() && value.chars().all(is_punctuation) {
                SemioticClass::Punct
            } else {
                SemioticClass::Word
            };
            Token::new(class, vec![Field::text("name", value)])
        } else {
            let class = SemioticClass::from_name(name)
                .filter(|c| !c.is_plain())
                .ok_or_else(|| NormalizeError::MalformedTokens {
                    offset: body_at,
                    reason: format!("unknown class {:?}", name),
                })?;
            self.expect("{")?;
            let fields = self.fields(class)?;
            if fields.is_empty() {
                return Err(self.error(format!("{} token has no fields", class)));
            }
            Token::new(class, fields)
        };
        self.expect("}")?;
        Ok(token)
    }

    /// Reads fields up to and including the closing brace of a message.
    fn fields(&mut self, class: SemioticClass) -> Result<Vec<Field>, NormalizeError> {
        let mut fields: Vec<Field> = Vec::new();
        loop {
            match self.peek() {
                Some('}') => {
                    self.pos += 1;
                    return Ok(fields);
                }
                None => return Err(self.error("unexpected end of stream")),
                Some(_) => {}
            }
            let at = self.pos;
            let name = self.ident()?;
            if !class.field_names().contains(&name) {
                return Err(NormalizeError::MalformedTokens {
                    offset: at,
                    reason: format!("{} has no field {:?}", class, name),
                });
            }
            if fields.iter().any(|f| f.name == name) {
                return Err(NormalizeError::MalformedTokens {
                    offset: at,
                    reason: format!("duplicate field {:?}", name),
                });
            }
            let value = match self.peek() {
                Some(':') => {
                    self.pos += 1;
                    FieldValue::Text(self.quoted()?.to_string())
                }
                Some('{') => {
                    let nested = SemioticClass::from_name(name)
                        .filter(|_| class == SemioticClass::Measure)
                        .ok_or_else(|| self.error(format!("field {:?} cannot hold a message", name)))?;
                    self.pos += 1;
                    FieldValue::Message(self.fields(nested)?)
                }
                _ => return Err(self.error("expected ':' or '{'")),
            };
            fields.push(Field {
                name: name.to_string(),
                value,
            });
        }
    }
}
