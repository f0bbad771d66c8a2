// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Rational operations: literals, substitutions, union, concatenation,
//! closure and weighting, plus the tape manipulations (invert, projection,
//! insert/delete) grammars use to build field markup.
//!
//! Operations never collapse ambiguity. A union of two grammars that
//! accept the same input keeps both paths; ranking happens at decode time.

use crate::errors::AlgebraError;
use crate::fst::{Alphabet, Fst, FstBuilder, Label, Transition, Weight, EPSILON};

fn check_alphabets(operation: &'static str, a: &Fst, b: &Fst) -> Result<(), AlgebraError> {
    if a.input_alphabet() != b.input_alphabet() {
        return Err(AlgebraError::AlphabetMismatch {
            operation,
            left: a.input_alphabet(),
            right: b.input_alphabet(),
        });
    }
    if a.output_alphabet() != b.output_alphabet() {
        return Err(AlgebraError::AlphabetMismatch {
            operation,
            left: a.output_alphabet(),
            right: b.output_alphabet(),
        });
    }
    Ok(())
}

/// Adds a path from `from` reading `input` and writing `output`, aligned
/// symbol by symbol and padded with epsilons. Returns the last state.
fn add_path(
    builder: &mut FstBuilder,
    from: u32,
    input: &[Label],
    output: &[Label],
) -> u32 {
    let mut current = from;
    for k in 0..input.len().max(output.len()) {
        let next = builder.add_state();
        let ilabel = input.get(k).copied().unwrap_or(EPSILON);
        let olabel = output.get(k).copied().unwrap_or(EPSILON);
        builder.add_transition(current, Transition::new(ilabel, olabel, Weight::ONE, next));
        current = next;
    }
    current
}

fn map_transitions<F>(fst: &Fst, input: Alphabet, output: Alphabet, f: F) -> Fst
where
    F: Fn(&Transition) -> Transition,
{
    let mut builder = FstBuilder::new(input, output);
    for state in fst.states() {
        let s = builder.add_state();
        builder.set_final(s, fst.final_weight(state));
    }
    for state in fst.states() {
        for t in fst.transitions(state) {
            builder.add_transition(state, f(t));
        }
    }
    builder.set_start(fst.start());
    builder.finish()
}

/// Accepts exactly `s` on the byte alphabet.
pub fn literal(s: &str) -> Result<Fst, AlgebraError> {
    literal_in(Alphabet::Bytes, s)
}

pub fn literal_in(alphabet: Alphabet, s: &str) -> Result<Fst, AlgebraError> {
    cross_in(alphabet, s, s)
}

/// Reads `input`, writes `output`.
pub fn cross(input: &str, output: &str) -> Result<Fst, AlgebraError> {
    cross_in(Alphabet::Bytes, input, output)
}

pub fn cross_in(alphabet: Alphabet, input: &str, output: &str) -> Result<Fst, AlgebraError> {
    let ilabels = alphabet.encode(input)?;
    let olabels = alphabet.encode(output)?;
    let mut builder = FstBuilder::new(alphabet, alphabet);
    let start = builder.add_state();
    builder.set_start(start);
    let last = add_path(&mut builder, start, &ilabels, &olabels);
    builder.set_final(last, Weight::ONE);
    Ok(builder.finish())
}

/// Writes `s` without reading anything.
pub fn insert(s: &str) -> Result<Fst, AlgebraError> {
    cross("", s)
}

/// Reads `s` and writes nothing.
pub fn delete(s: &str) -> Result<Fst, AlgebraError> {
    cross(s, "")
}

/// Reads whatever `fst` reads and writes nothing.
pub fn delete_fst(fst: &Fst) -> Fst {
    let alphabet = fst.input_alphabet();
    map_transitions(fst, alphabet, alphabet, |t| Transition {
        olabel: EPSILON,
        ..*t
    })
}

/// Writes whatever `fst` writes without reading anything.
pub fn insert_fst(fst: &Fst) -> Fst {
    let alphabet = fst.output_alphabet();
    map_transitions(fst, alphabet, alphabet, |t| Transition {
        ilabel: EPSILON,
        ..*t
    })
}

/// Swaps the input and output tape of every arc.
pub fn invert(fst: &Fst) -> Fst {
    map_transitions(fst, fst.output_alphabet(), fst.input_alphabet(), |t| {
        Transition {
            ilabel: t.olabel,
            olabel: t.ilabel,
            ..*t
        }
    })
}

pub fn project_input(fst: &Fst) -> Fst {
    let alphabet = fst.input_alphabet();
    map_transitions(fst, alphabet, alphabet, |t| Transition {
        olabel: t.ilabel,
        ..*t
    })
}

pub fn project_output(fst: &Fst) -> Fst {
    let alphabet = fst.output_alphabet();
    map_transitions(fst, alphabet, alphabet, |t| Transition {
        ilabel: t.olabel,
        ..*t
    })
}

/// Alternation. All operands must share both alphabets.
pub fn union(fsts: &[&Fst]) -> Result<Fst, AlgebraError> {
    let Some(first) = fsts.first() else {
        return Ok(Fst::empty(Alphabet::default()));
    };
    for other in &fsts[1..] {
        check_alphabets("union", first, other)?;
    }
    let mut builder = FstBuilder::new(first.input_alphabet(), first.output_alphabet());
    let start = builder.add_state();
    builder.set_start(start);
    for fst in fsts {
        let offset = builder.append(fst);
        builder.add_transition(start, Transition::epsilon(Weight::ONE, fst.start() + offset));
    }
    Ok(builder.finish())
}

pub fn concat(a: &Fst, b: &Fst) -> Result<Fst, AlgebraError> {
    check_alphabets("concat", a, b)?;
    let mut builder = FstBuilder::new(a.input_alphabet(), a.output_alphabet());
    let a_offset = builder.append(a);
    let a_finals = builder.finals();
    let b_offset = builder.append(b);
    for (state, weight) in a_finals {
        builder.set_final(state, Weight::ZERO);
        builder.add_transition(state, Transition::epsilon(weight, b.start() + b_offset));
    }
    builder.set_start(a.start() + a_offset);
    Ok(builder.finish())
}

/// Left-to-right concatenation of every operand.
pub fn concat_all(fsts: &[&Fst]) -> Result<Fst, AlgebraError> {
    let Some((first, rest)) = fsts.split_first() else {
        return Ok(Fst::epsilon(Alphabet::default()));
    };
    rest.iter()
        .try_fold((*first).clone(), |acc, next| concat(&acc, next))
}

fn star(fst: &Fst) -> Fst {
    let mut builder = FstBuilder::new(fst.input_alphabet(), fst.output_alphabet());
    let start = builder.add_state();
    builder.set_start(start);
    builder.set_final(start, Weight::ONE);
    let offset = builder.append(fst);
    for (state, weight) in builder.finals() {
        if state == start {
            continue;
        }
        builder.set_final(state, Weight::ZERO);
        builder.add_transition(state, Transition::epsilon(weight, start));
    }
    builder.add_transition(start, Transition::epsilon(Weight::ONE, fst.start() + offset));
    builder.finish()
}

/// True when some path from the start reaches a final state without
/// consuming input.
fn accepts_empty_input(fst: &Fst) -> bool {
    let mut seen = vec![false; fst.num_states()];
    let mut stack = vec![fst.start()];
    while let Some(state) = stack.pop() {
        let index = state as usize;
        if index >= seen.len() || seen[index] {
            continue;
        }
        seen[index] = true;
        if fst.is_final(state) {
            return true;
        }
        stack.extend(
            fst.transitions(state)
                .iter()
                .filter(|t| t.ilabel == EPSILON)
                .map(|t| t.nextstate),
        );
    }
    false
}

/// `fst` repeated between `min` and `max` times; `max = None` is unbounded.
///
/// An unbounded closure over an operand that accepts the empty input would
/// loop without reading anything, so it is rejected.
pub fn closure(fst: &Fst, min: u32, max: Option<u32>) -> Result<Fst, AlgebraError> {
    match max {
        Some(max) if min > max => {
            return Err(AlgebraError::InvalidClosureBounds { min, max });
        }
        None if accepts_empty_input(fst) => {
            return Err(AlgebraError::UnboundedClosure);
        }
        _ => {}
    }
    let epsilon = || {
        let mut builder = FstBuilder::new(fst.input_alphabet(), fst.output_alphabet());
        let s = builder.add_state();
        builder.set_final(s, Weight::ONE);
        builder.finish()
    };

    let mut result = epsilon();
    for _ in 0..min {
        result = concat(&result, fst)?;
    }
    let tail = match max {
        None => star(fst),
        Some(max) => {
            let mut tail = epsilon();
            for _ in min..max {
                let more = concat(fst, &tail)?;
                tail = union(&[&epsilon(), &more])?;
            }
            tail
        }
    };
    concat(&result, &tail)
}

pub fn optional(fst: &Fst) -> Result<Fst, AlgebraError> {
    closure(fst, 0, Some(1))
}

/// Adds `weight` to every accepting path.
pub fn weighted(fst: &Fst, weight: f32) -> Result<Fst, AlgebraError> {
    let weight = Weight::new(weight)?;
    let mut builder = FstBuilder::new(fst.input_alphabet(), fst.output_alphabet());
    builder.append(fst);
    for (state, w) in builder.finals() {
        builder.set_final(state, w.times(weight));
    }
    builder.set_start(fst.start());
    Ok(builder.finish())
}

/// One path per `(input, output, weight)` entry, all sharing the start state.
pub fn string_map<'a, I>(entries: I) -> Result<Fst, AlgebraError>
where
    I: IntoIterator<Item = (&'a str, &'a str, Weight)>,
{
    let alphabet = Alphabet::Bytes;
    let mut builder = FstBuilder::new(alphabet, alphabet);
    let start = builder.add_state();
    builder.set_start(start);
    for (input, output, weight) in entries {
        let ilabels = alphabet.encode(input)?;
        let olabels = alphabet.encode(output)?;
        let last = add_path(&mut builder, start, &ilabels, &olabels);
        let existing = builder.final_weight(last);
        builder.set_final(last, existing.plus(weight));
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::search::Lattice;

    fn outputs(fst: &Fst, input: &str) -> Vec<(String, f32)> {
        match Lattice::build(fst, input) {
            Some(lattice) => lattice
                .paths(100_000)
                .map(|h| (h.output, h.weight.value()))
                .collect(),
            None => Vec::new(),
        }
    }

    fn best(fst: &Fst, input: &str) -> Option<String> {
        outputs(fst, input).into_iter().next().map(|(s, _)| s)
    }

    #[test]
    fn test_literal_and_cross() {
        struct TestCase {
            name: &'static str,
            fst: Fst,
            input: &'static str,
            expected: Option<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "literal accepts itself",
                fst: literal("abc").unwrap(),
                input: "abc",
                expected: Some("abc"),
            },
            TestCase {
                name: "literal rejects prefix",
                fst: literal("abc").unwrap(),
                input: "ab",
                expected: None,
            },
            TestCase {
                name: "cross rewrites",
                fst: cross("3", "سه").unwrap(),
                input: "3",
                expected: Some("سه"),
            },
            TestCase {
                name: "insert reads nothing",
                fst: insert("x").unwrap(),
                input: "",
                expected: Some("x"),
            },
            TestCase {
                name: "delete writes nothing",
                fst: delete("abc").unwrap(),
                input: "abc",
                expected: Some(""),
            },
        ];

        for case in test_cases {
            assert_eq!(
                best(&case.fst, case.input).as_deref(),
                case.expected,
                "case '{}'",
                case.name
            );
        }
    }

    #[test]
    fn test_union_keeps_all_alternatives() {
        let a = cross("a", "x").unwrap();
        let b = weighted(&cross("a", "y").unwrap(), 1.0).unwrap();
        let both = union(&[&a, &b]).unwrap();
        let got = outputs(&both, "a");
        assert_eq!(got, vec![("x".to_string(), 0.0), ("y".to_string(), 1.0)]);
    }

    #[test]
    fn test_concat_and_closure_bounds() {
        let ab = concat(&literal("a").unwrap(), &literal("b").unwrap()).unwrap();
        assert_eq!(best(&ab, "ab").as_deref(), Some("ab"));

        let a = literal("a").unwrap();
        let two_to_three = closure(&a, 2, Some(3)).unwrap();
        assert!(best(&two_to_three, "a").is_none());
        assert!(best(&two_to_three, "aa").is_some());
        assert!(best(&two_to_three, "aaa").is_some());
        assert!(best(&two_to_three, "aaaa").is_none());

        let plus = closure(&a, 1, None).unwrap();
        assert!(best(&plus, "").is_none());
        assert!(best(&plus, "aaaaaaa").is_some());
    }

    #[test]
    fn test_closure_rejects_inverted_bounds() {
        let a = literal("a").unwrap();
        assert_eq!(
            closure(&a, 3, Some(1)).unwrap_err(),
            AlgebraError::InvalidClosureBounds { min: 3, max: 1 }
        );
    }

    #[test]
    fn test_unbounded_closure_needs_input() {
        struct TestCase {
            name: &'static str,
            fst: Fst,
            max: Option<u32>,
            rejected: bool,
        }

        let test_cases = vec![
            TestCase {
                name: "insert loops on nothing",
                fst: insert("x").unwrap(),
                max: None,
                rejected: true,
            },
            TestCase {
                name: "optional operand",
                fst: optional(&literal("a").unwrap()).unwrap(),
                max: None,
                rejected: true,
            },
            TestCase {
                name: "bounded insert is finite",
                fst: insert("x").unwrap(),
                max: Some(3),
                rejected: false,
            },
            TestCase {
                name: "operand reads a symbol",
                fst: concat(&insert("x").unwrap(), &literal("a").unwrap()).unwrap(),
                max: None,
                rejected: false,
            },
        ];

        for case in test_cases {
            let result = closure(&case.fst, 0, case.max);
            assert_eq!(
                matches!(result, Err(AlgebraError::UnboundedClosure)),
                case.rejected,
                "case '{}'",
                case.name
            );
        }

        let bounded = closure(&insert("x").unwrap(), 0, Some(3)).unwrap();
        let lattice = Lattice::build(&bounded, "").unwrap();
        assert_eq!(lattice.paths(usize::MAX).count(), 4);
    }

    #[test]
    fn test_weighted_rejects_negative() {
        let a = literal("a").unwrap();
        assert!(weighted(&a, -0.5).is_err());
        let w = weighted(&a, 0.5).unwrap();
        assert_eq!(outputs(&w, "a"), vec![("a".to_string(), 0.5)]);
    }

    #[test]
    fn test_invert_swaps_tapes() {
        let fst = cross("3", "سه").unwrap();
        assert_eq!(best(&invert(&fst), "سه").as_deref(), Some("3"));
    }

    #[test]
    fn test_union_rejects_mixed_alphabets() {
        let bytes = literal("a").unwrap();
        let chars = literal_in(Alphabet::CodePoints, "a").unwrap();
        assert!(matches!(
            union(&[&bytes, &chars]),
            Err(AlgebraError::AlphabetMismatch { .. })
        ));
    }

    #[test]
    fn test_string_map() {
        let map = string_map([
            ("1", "یک", Weight::ONE),
            ("2", "دو", Weight::ONE),
        ])
        .unwrap();
        assert_eq!(best(&map, "2").as_deref(), Some("دو"));
        assert!(best(&map, "3").is_none());
    }
}
