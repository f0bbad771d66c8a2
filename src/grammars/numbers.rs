// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Written digits to spoken Persian numbers.
//!
//! Every graph here reads ASCII digits and writes words. Grammars that accept
//! Persian or Arabic-Indic digits compose with [`digits`] first; inverse
//! grammars [`invert`](crate::fst::invert) the same graphs.
//!
//! Numbers are read in groups of three digits. The top group names its
//! scale (`هزار`, `میلیون`, `میلیارد`) and lower groups are joined with the
//! conjunction, skipping all-zero groups. Exactly one of a scale uses the
//! `scale_single` table, so `1000` is `هزار` and `1000000` is `یک میلیون`.

use crate::errors::{BuildError, ConfigError, GrammarError};
use crate::fst::charset::one_of;
use crate::fst::{
    closure, compose, concat, concat_all, cross, delete, difference, insert, literal, optimize,
    optional, string_map, union, weighted, Charset, Fst, Weight,
};
use crate::grammar::{BuildContext, CompiledGraph};
use crate::lexicon::Lexicon;

/// Number of three-digit groups above the units group.
const SCALES: usize = 3;
/// Extra cost of spelling out the implicit "one" of a scale.
const EXPLICIT_ONE_WEIGHT: f32 = 0.1;

const ZERO: &str = "zero";
const POSITIVE: &str = "positive";
const CARDINAL: &str = "cardinal";
const PADDED: &str = "padded";

/// Looks up one row of a lexical table.
pub(crate) fn entry<'a>(lexicon: &'a Lexicon, table: &str, key: &str) -> Result<&'a str, ConfigError> {
    lexicon
        .table(table)?
        .get(key)
        .ok_or_else(|| ConfigError::MissingEntry {
            table: table.to_string(),
            key: key.to_string(),
        })
}

/// Digit strings of length `min..=max` in any supported script, written out
/// as ASCII.
pub(crate) fn digits(charset: &Charset, min: u32, max: Option<u32>) -> Result<Fst, GrammarError> {
    Ok(optimize(&closure(&charset.to_ascii_digit, min, max)?))
}

/// `fst` applied to digits in any supported script.
pub(crate) fn native(charset: &Charset, fst: &Fst) -> Result<Fst, GrammarError> {
    Ok(compose(&digits(charset, 1, None)?, fst)?)
}

/// Acceptor for the decimal numbers `lo..=hi`, also in zero-padded form up
/// to `width` digits when `width` is given.
pub(crate) fn range(lo: u32, hi: u32, width: Option<usize>) -> Result<Fst, GrammarError> {
    let mut forms = Vec::new();
    for n in lo..=hi {
        let plain = n.to_string();
        if let Some(width) = width {
            for w in plain.len() + 1..=width {
                forms.push(format!("{:0>w$}", n, w = w));
            }
        }
        forms.push(plain);
    }
    Ok(optimize(&string_map(
        forms.iter().map(|f| (f.as_str(), f.as_str(), Weight::ONE)),
    )?))
}

/// Acceptor for `lo..=hi` written with exactly `width` digits.
pub(crate) fn fixed_width(lo: u32, hi: u32, width: usize) -> Result<Fst, GrammarError> {
    let forms: Vec<String> = (lo..=hi)
        .map(|n| format!("{:0>w$}", n, w = width))
        .filter(|f| f.len() == width)
        .collect();
    Ok(optimize(&string_map(
        forms.iter().map(|f| (f.as_str(), f.as_str(), Weight::ONE)),
    )?))
}

/// Spoken cardinal to spoken ordinal: the last word takes `م` unless the
/// `ordinal_exceptions` table rewrites it.
pub(crate) fn to_ordinal(lexicon: &Lexicon, charset: &Charset) -> Result<Fst, GrammarError> {
    let exceptions = lexicon.table("ordinal_exceptions")?;
    let suffix = lexicon.marker("ordinal_suffix")?;
    let prefix = optional(&concat(&charset.sigma, &literal(" ")?)?)?;
    let exceptional = concat(&prefix, &exceptions.to_fst()?)?;
    let ends_exceptional = concat(&prefix, &exceptions.keys_fst()?)?;
    let regular = concat(
        &difference(&closure(&charset.any_char, 1, None)?, &ends_exceptional)?,
        &insert(suffix)?,
    )?;
    Ok(optimize(&union(&[&exceptional, &regular])?))
}

/// The digit-to-word graphs shared by every number-bearing grammar.
#[derive(Debug, Clone)]
pub(crate) struct NumberGraphs {
    /// `0`.
    pub zero: Fst,
    /// `1` up to twelve digits, no leading zeros.
    pub positive: Fst,
    /// `zero | positive`.
    pub cardinal: Fst,
    /// `cardinal` with any number of leading zeros.
    pub padded: Fst,
}

impl NumberGraphs {
    /// `alternates` adds the explicit "one" reading of scales whose single
    /// form leaves it implicit (`یک هزار`) at a small extra cost.
    pub fn build(lexicon: &Lexicon, alternates: bool) -> Result<Self, GrammarError> {
        let conjunction = insert(&format!(" {} ", lexicon.marker("conjunction")?))?;
        let digit = lexicon.table("digit")?.to_fst()?;
        let zero = lexicon.table("zero")?.to_fst()?;
        let teens = concat(&delete("1")?, &lexicon.table("teens")?.to_fst()?)?;
        let tens = lexicon.table("tens")?.to_fst()?;
        let hundreds = lexicon.table("hundreds")?.to_fst()?;

        // 10-99
        let tens_and_units = concat(
            &tens,
            &union(&[&delete("0")?, &concat(&conjunction, &digit)?])?,
        )?;
        let two = union(&[&teens, &tens_and_units])?;
        // 01-99
        let padded_two = union(&[&concat(&delete("0")?, &digit)?, &two])?;
        // 100-999
        let three = concat(
            &hundreds,
            &union(&[&delete("00")?, &concat(&conjunction, &padded_two)?])?,
        )?;
        // 1-999
        let group = optimize(&union(&[&digit, &two, &three])?);
        // 001-999
        let padded_group = optimize(&union(&[
            &concat(&delete("00")?, &digit)?,
            &concat(&delete("0")?, &two)?,
            &three,
        ])?);

        let one = literal("1")?;
        let padded_one = literal("001")?;
        let units = union(&[&delete("000")?, &concat(&conjunction, &padded_group)?])?;

        let mut lower = units;
        let mut forms = vec![group.clone()];
        for k in 1..=SCALES {
            let key = k.to_string();
            let scale = entry(lexicon, "scale", &key)?;
            let single = entry(lexicon, "scale_single", &key)?;
            let named = insert(&format!(" {}", scale))?;

            let mut top_forms = vec![
                concat(&difference(&group, &one)?, &named)?,
                cross("1", single)?,
            ];
            let explicit = format!("{} {}", entry(lexicon, "digit", "1")?, scale);
            if alternates && explicit != single {
                top_forms.push(weighted(&cross("1", &explicit)?, EXPLICIT_ONE_WEIGHT)?);
            }
            let top_refs: Vec<&Fst> = top_forms.iter().collect();
            forms.push(concat(&union(&top_refs)?, &lower)?);

            // The group just named becomes a lower group for the next scale.
            let nonzero = union(&[
                &concat(&difference(&padded_group, &padded_one)?, &named)?,
                &cross("001", single)?,
            ])?;
            let this_group = union(&[&delete("000")?, &concat(&conjunction, &nonzero)?])?;
            lower = optimize(&concat(&this_group, &lower)?);
        }

        let refs: Vec<&Fst> = forms.iter().collect();
        let positive = optimize(&union(&refs)?);
        let cardinal = optimize(&union(&[&zero, &positive])?);
        let padded = optimize(&concat(&closure(&delete("0")?, 0, None)?, &cardinal)?);
        Ok(Self {
            zero,
            positive,
            cardinal,
            padded,
        })
    }

    /// Makes the graphs available to dependent grammars.
    pub fn export(self, graph: CompiledGraph) -> CompiledGraph {
        graph
            .with_export(ZERO, self.zero)
            .with_export(POSITIVE, self.positive)
            .with_export(CARDINAL, self.cardinal)
            .with_export(PADDED, self.padded)
    }

    /// Reads the graphs back from a compiled grammar's exports.
    pub fn import(ctx: &BuildContext<'_>, grammar: &str) -> Result<Self, BuildError> {
        Ok(Self {
            zero: ctx.export(grammar, ZERO)?,
            positive: ctx.export(grammar, POSITIVE)?,
            cardinal: ctx.export(grammar, CARDINAL)?,
            padded: ctx.export(grammar, PADDED)?,
        })
    }

    /// `fst` restricted to the inputs `lo..=hi` (optionally zero-padded).
    pub fn within(&self, fst: &Fst, lo: u32, hi: u32, width: Option<usize>) -> Result<Fst, GrammarError> {
        Ok(optimize(&compose(&range(lo, hi, width)?, fst)?))
    }
}

/// Exactly `n` digits followed by the decimal place name, e.g. `14` with
/// two places is `چهارده صدم`.
pub(crate) fn fractional_places(
    lexicon: &Lexicon,
    numbers: &NumberGraphs,
    places: usize,
) -> Result<Fst, GrammarError> {
    let name = entry(lexicon, "decimal_places", &places.to_string())?;
    let width = places as u32;
    let exact = closure(&one_of("0123456789")?, width, Some(width))?;
    let spoken = compose(&exact, &numbers.padded)?;
    Ok(optimize(&concat_all(&[&spoken, &insert(&format!(" {}", name))?])?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::{invert, search::Lattice};
    use crate::lexicon::Language;

    fn run(fst: &Fst, input: &str) -> Option<String> {
        Lattice::build(fst, input)
            .and_then(|l| l.best_path())
            .map(|h| h.output)
    }

    fn graphs() -> NumberGraphs {
        let lexicon = Lexicon::builtin(Language::Persian).unwrap();
        NumberGraphs::build(&lexicon, false).unwrap()
    }

    #[test]
    fn test_cardinal_readings() {
        let numbers = graphs();

        struct TestCase {
            name: &'static str,
            input: &'static str,
            expected: Option<&'static str>,
        }

        let test_cases = vec![
            TestCase { name: "zero", input: "0", expected: Some("صفر") },
            TestCase { name: "digit", input: "7", expected: Some("هفت") },
            TestCase { name: "teen", input: "13", expected: Some("سیزده") },
            TestCase { name: "round ten", input: "40", expected: Some("چهل") },
            TestCase { name: "hundreds", input: "123", expected: Some("صد و بیست و سه") },
            TestCase { name: "hundreds with gap", input: "805", expected: Some("هشتصد و پنج") },
            TestCase { name: "implicit thousand", input: "1000", expected: Some("هزار") },
            TestCase { name: "thousands", input: "2019", expected: Some("دو هزار و نوزده") },
            TestCase {
                name: "million",
                input: "1000000",
                expected: Some("یک میلیون"),
            },
            TestCase {
                name: "million and thousand",
                input: "1001000",
                expected: Some("یک میلیون و هزار"),
            },
            TestCase {
                name: "mixed groups",
                input: "3040506",
                expected: Some("سه میلیون و چهل هزار و پانصد و شش"),
            },
            TestCase {
                name: "billions",
                input: "999999999999",
                expected: Some(
                    "نهصد و نود و نه میلیارد و نهصد و نود و نه میلیون و نهصد و نود و نه هزار و نهصد و نود و نه",
                ),
            },
            TestCase { name: "thirteen digits", input: "1000000000000", expected: None },
            TestCase { name: "leading zero", input: "012", expected: None },
        ];

        for case in test_cases {
            assert_eq!(
                run(&numbers.cardinal, case.input).as_deref(),
                case.expected,
                "case '{}'",
                case.name
            );
        }
    }

    #[test]
    fn test_padded_and_native_digits() {
        let numbers = graphs();
        assert_eq!(run(&numbers.padded, "007").as_deref(), Some("هفت"));
        assert_eq!(run(&numbers.padded, "00").as_deref(), Some("صفر"));

        let charset = Charset::new().unwrap();
        let persian = native(&charset, &numbers.cardinal).unwrap();
        assert_eq!(run(&persian, "۱۲").as_deref(), Some("دوازده"));
        assert_eq!(run(&persian, "٣").as_deref(), Some("سه"));
    }

    #[test]
    fn test_inverse_reads_spoken_numbers() {
        let numbers = graphs();
        let spoken = invert(&numbers.cardinal);
        assert_eq!(run(&spoken, "صد و بیست و سه").as_deref(), Some("123"));
        assert_eq!(run(&spoken, "یک میلیون و هزار").as_deref(), Some("1001000"));
        assert_eq!(run(&spoken, "یک هزار"), None);

        let lexicon = Lexicon::builtin(Language::Persian).unwrap();
        let with_alternates = NumberGraphs::build(&lexicon, true).unwrap();
        assert_eq!(
            run(&invert(&with_alternates.cardinal), "یک هزار").as_deref(),
            Some("1000")
        );
    }

    #[test]
    fn test_ordinal_suffix_rules() {
        let lexicon = Lexicon::builtin(Language::Persian).unwrap();
        let charset = Charset::new().unwrap();
        let ordinal = to_ordinal(&lexicon, &charset).unwrap();

        for (cardinal, expected) in [
            ("یک", "یکم"),
            ("سه", "سوم"),
            ("سی", "سی‌ام"),
            ("بیست و سه", "بیست و سوم"),
            ("سیصد", "سیصدم"),
        ] {
            assert_eq!(run(&ordinal, cardinal).as_deref(), Some(expected), "{}", cardinal);
        }
    }

    #[test]
    fn test_ranges_and_fractional_places() {
        let hours = range(0, 23, Some(2)).unwrap();
        assert!(run(&hours, "07").is_some());
        assert!(run(&hours, "7").is_some());
        assert!(run(&hours, "24").is_none());
        assert!(run(&hours, "007").is_none());

        let lexicon = Lexicon::builtin(Language::Persian).unwrap();
        let numbers = graphs();
        let two = fractional_places(&lexicon, &numbers, 2).unwrap();
        assert_eq!(run(&two, "14").as_deref(), Some("چهارده صدم"));
        assert_eq!(run(&two, "05").as_deref(), Some("پنج صدم"));
        assert_eq!(run(&two, "5"), None);
    }
}
