// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Character classes over the UTF-8 byte alphabet.

use crate::errors::AlgebraError;
use crate::fst::{
    closure, concat, cross, delete_fst, difference, insert, literal, optimize, union, Alphabet,
    Fst, FstBuilder, Label, StateId, Transition, Weight,
};

const ASCII_PUNCTUATION: &str = "!#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";
const PERSIAN_PUNCTUATION: &str = "،؛؟«»٪…";
const WHITESPACE: &str = " \t\n\r\u{a0}";
const PERSIAN_DIGITS: &str = "۰۱۲۳۴۵۶۷۸۹";
const ARABIC_INDIC_DIGITS: &str = "٠١٢٣٤٥٦٧٨٩";

fn byte_range(builder: &mut FstBuilder, from: StateId, to: StateId, lo: u8, hi: u8) {
    for b in lo..=hi {
        let label = Label::from(b);
        builder.add_transition(from, Transition::new(label, label, Weight::ONE, to));
    }
}

/// Whether `c` belongs to the punctuation class accepted by [`Charset::punct`].
pub fn is_punctuation(c: char) -> bool {
    ASCII_PUNCTUATION.contains(c) || PERSIAN_PUNCTUATION.contains(c)
}

/// Acceptor for exactly one well-formed UTF-8 encoded character other than NUL.
pub fn any_char(alphabet: Alphabet) -> Result<Fst, AlgebraError> {
    if alphabet != Alphabet::Bytes {
        return Err(AlgebraError::UnsupportedCharClass {
            class: "any_char",
            alphabet,
        });
    }
    let mut b = FstBuilder::new(Alphabet::Bytes, Alphabet::Bytes);
    let start = b.add_state();
    let done = b.add_state();
    let tail1 = b.add_state();
    let tail2 = b.add_state();
    let tail3 = b.add_state();
    let after_e0 = b.add_state();
    let after_ed = b.add_state();
    let after_f0 = b.add_state();
    let after_f4 = b.add_state();
    b.set_start(start);
    b.set_final(done, Weight::ONE);

    byte_range(&mut b, start, done, 0x01, 0x7F);
    byte_range(&mut b, start, tail1, 0xC2, 0xDF);
    byte_range(&mut b, start, after_e0, 0xE0, 0xE0);
    byte_range(&mut b, start, tail2, 0xE1, 0xEC);
    byte_range(&mut b, start, after_ed, 0xED, 0xED);
    byte_range(&mut b, start, tail2, 0xEE, 0xEF);
    byte_range(&mut b, start, after_f0, 0xF0, 0xF0);
    byte_range(&mut b, start, tail3, 0xF1, 0xF3);
    byte_range(&mut b, start, after_f4, 0xF4, 0xF4);

    byte_range(&mut b, after_e0, tail1, 0xA0, 0xBF);
    byte_range(&mut b, after_ed, tail1, 0x80, 0x9F);
    byte_range(&mut b, after_f0, tail2, 0x90, 0xBF);
    byte_range(&mut b, after_f4, tail2, 0x80, 0x8F);
    byte_range(&mut b, tail3, tail2, 0x80, 0xBF);
    byte_range(&mut b, tail2, tail1, 0x80, 0xBF);
    byte_range(&mut b, tail1, done, 0x80, 0xBF);
    Ok(b.finish())
}

/// Acceptor for any single character of `chars`.
pub fn one_of(chars: &str) -> Result<Fst, AlgebraError> {
    let mut buf = [0u8; 4];
    let literals = chars
        .chars()
        .map(|c| literal(c.encode_utf8(&mut buf)))
        .collect::<Result<Vec<_>, _>>()?;
    let refs: Vec<&Fst> = literals.iter().collect();
    Ok(optimize(&union(&refs)?))
}

/// Shared character classes and whitespace handling used by every grammar.
#[derive(Clone, Debug)]
pub struct Charset {
    pub any_char: Fst,
    /// ASCII `0-9`.
    pub digit: Fst,
    /// Persian and Arabic-Indic digits.
    pub native_digit: Fst,
    /// Maps native digits to ASCII, passes ASCII digits through.
    pub to_ascii_digit: Fst,
    pub whitespace: Fst,
    pub not_space: Fst,
    pub not_quote: Fst,
    pub punct: Fst,
    /// Any string, including the empty one.
    pub sigma: Fst,
    /// Deletes zero or more whitespace characters.
    pub delete_space: Fst,
    /// Collapses one or more whitespace characters to a single space.
    pub delete_extra_space: Fst,
    pub insert_space: Fst,
}

impl Charset {
    pub fn new() -> Result<Self, AlgebraError> {
        let any_char = any_char(Alphabet::Bytes)?;
        let digit = one_of("0123456789")?;
        let native_digit = one_of(&format!("{}{}", PERSIAN_DIGITS, ARABIC_INDIC_DIGITS))?;
        let whitespace = one_of(WHITESPACE)?;
        let not_space = optimize(&difference(&any_char, &whitespace)?);
        let not_quote = optimize(&difference(&any_char, &literal("\"")?)?);
        let punct = one_of(&format!("{}{}", ASCII_PUNCTUATION, PERSIAN_PUNCTUATION))?;
        let sigma = optimize(&closure(&any_char, 0, None)?);

        let mut native_to_ascii = Vec::new();
        for digits in [PERSIAN_DIGITS, ARABIC_INDIC_DIGITS] {
            for (value, c) in digits.chars().enumerate() {
                native_to_ascii.push(cross(&c.to_string(), &value.to_string())?);
            }
        }
        let mut refs: Vec<&Fst> = native_to_ascii.iter().collect();
        refs.push(&digit);
        let to_ascii_digit = optimize(&union(&refs)?);

        let delete_space = optimize(&delete_fst(&closure(&whitespace, 0, None)?));
        let delete_extra_space = optimize(&concat(
            &delete_fst(&closure(&whitespace, 1, None)?),
            &insert(" ")?,
        )?);
        let insert_space = insert(" ")?;

        Ok(Self {
            any_char,
            digit,
            native_digit,
            to_ascii_digit,
            whitespace,
            not_space,
            not_quote,
            punct,
            sigma,
            delete_space,
            delete_extra_space,
            insert_space,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::search::Lattice;

    fn accepts(fst: &Fst, input: &str) -> bool {
        Lattice::build(fst, input).is_some()
    }

    #[test]
    fn test_any_char_accepts_single_characters() {
        let fst = any_char(Alphabet::Bytes).unwrap();
        for c in ["a", "س", "€", "😀", "\u{a0}"] {
            assert!(accepts(&fst, c), "should accept {:?}", c);
        }
        for s in ["", "ab", "سس"] {
            assert!(!accepts(&fst, s), "should reject {:?}", s);
        }
    }

    #[test]
    fn test_any_char_unavailable_on_code_points() {
        assert!(matches!(
            any_char(Alphabet::CodePoints),
            Err(AlgebraError::UnsupportedCharClass { .. })
        ));
    }

    #[test]
    fn test_classes() {
        let charset = Charset::new().unwrap();
        assert!(accepts(&charset.digit, "7"));
        assert!(!accepts(&charset.digit, "۷"));
        assert!(accepts(&charset.native_digit, "۷"));
        assert!(accepts(&charset.not_space, "x"));
        assert!(!accepts(&charset.not_space, " "));
        assert!(!accepts(&charset.not_quote, "\""));
        assert!(accepts(&charset.punct, "،"));
        assert!(accepts(&charset.sigma, ""));
    }

    #[test]
    fn test_whitespace_collapsing() {
        let charset = Charset::new().unwrap();
        let out = Lattice::build(&charset.delete_extra_space, " \t  ")
            .and_then(|l| l.best_path())
            .map(|h| h.output);
        assert_eq!(out.as_deref(), Some(" "));
        let ascii = Lattice::build(&charset.to_ascii_digit, "۳")
            .and_then(|l| l.best_path())
            .map(|h| h.output);
        assert_eq!(ascii.as_deref(), Some("3"));
    }
}
