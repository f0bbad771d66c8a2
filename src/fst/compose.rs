// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Composition and difference.
//!
//! Both build the reachable part of a product automaton breadth-first and
//! finish with [`connect`] so dead branches never leak into grammars.

use crate::errors::AlgebraError;
use crate::fst::optimize::{connect, rm_epsilon};
use crate::fst::{Fst, FstBuilder, Label, StateId, Transition, EPSILON};
use std::collections::{BTreeSet, HashMap, VecDeque};

/// Bound on subsets explored when determinizing the subtrahend of a difference.
const DIFFERENCE_SUBSET_LIMIT: usize = 200_000;

/// Epsilon filter state. After `a` moves alone, `b` may not move alone until
/// the next matched symbol, so each interleaving of epsilon moves is built once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Filter {
    Free,
    AMoved,
}

/// Applies `b` to the output of `a`.
pub fn compose(a: &Fst, b: &Fst) -> Result<Fst, AlgebraError> {
    if a.output_alphabet() != b.input_alphabet() {
        return Err(AlgebraError::AlphabetMismatch {
            operation: "compose",
            left: a.output_alphabet(),
            right: b.input_alphabet(),
        });
    }

    let mut builder = FstBuilder::new(a.input_alphabet(), b.output_alphabet());
    let mut ids: HashMap<(StateId, StateId, Filter), StateId> = HashMap::new();
    let mut queue = VecDeque::new();

    let start_key = (a.start(), b.start(), Filter::Free);
    let start = builder.add_state();
    builder.set_start(start);
    ids.insert(start_key, start);
    queue.push_back(start_key);

    let mut state_for = |key: (StateId, StateId, Filter),
                         builder: &mut FstBuilder,
                         queue: &mut VecDeque<(StateId, StateId, Filter)>|
     -> StateId {
        *ids.entry(key).or_insert_with(|| {
            queue.push_back(key);
            builder.add_state()
        })
    };

    while let Some(key @ (qa, qb, filter)) = queue.pop_front() {
        let id = state_for(key, &mut builder, &mut queue);
        builder.set_final(id, a.final_weight(qa).times(b.final_weight(qb)));

        for ta in a.transitions(qa) {
            if ta.olabel == EPSILON {
                let next = state_for((ta.nextstate, qb, Filter::AMoved), &mut builder, &mut queue);
                builder.add_transition(id, Transition::new(ta.ilabel, EPSILON, ta.weight, next));
                continue;
            }
            for tb in b.transitions_on(qb, ta.olabel) {
                let next = state_for(
                    (ta.nextstate, tb.nextstate, Filter::Free),
                    &mut builder,
                    &mut queue,
                );
                builder.add_transition(
                    id,
                    Transition::new(ta.ilabel, tb.olabel, ta.weight.times(tb.weight), next),
                );
            }
        }

        if filter == Filter::Free {
            for tb in b.transitions_on(qb, EPSILON) {
                let next = state_for((qa, tb.nextstate, Filter::Free), &mut builder, &mut queue);
                builder.add_transition(id, Transition::new(EPSILON, tb.olabel, tb.weight, next));
            }
        }
    }

    Ok(connect(&builder.finish()))
}

/// Lazily determinized, unweighted view of an automaton's input language.
struct SubsetAutomaton {
    fst: Fst,
    subsets: Vec<Vec<StateId>>,
    ids: HashMap<Vec<StateId>, usize>,
    accepting: Vec<bool>,
    moves: HashMap<(usize, Label), usize>,
}

impl SubsetAutomaton {
    fn new(fst: &Fst) -> Self {
        // rm_epsilon keeps input-epsilon arcs that write output; the input
        // projection turns those into true epsilons, so run it first.
        let fst = rm_epsilon(&crate::fst::project_input(fst));
        let mut subsets = SubsetAutomaton {
            fst,
            subsets: Vec::new(),
            ids: HashMap::new(),
            accepting: Vec::new(),
            moves: HashMap::new(),
        };
        let start = vec![subsets.fst.start()];
        subsets.intern(start);
        subsets
    }

    fn intern(&mut self, subset: Vec<StateId>) -> usize {
        if let Some(&id) = self.ids.get(&subset) {
            return id;
        }
        let id = self.subsets.len();
        self.accepting
            .push(subset.iter().any(|&q| self.fst.is_final(q)));
        self.ids.insert(subset.clone(), id);
        self.subsets.push(subset);
        id
    }

    fn step(&mut self, subset: usize, label: Label) -> Result<usize, AlgebraError> {
        if let Some(&next) = self.moves.get(&(subset, label)) {
            return Ok(next);
        }
        let targets: BTreeSet<StateId> = self.subsets[subset]
            .iter()
            .flat_map(|&q| self.fst.transitions_on(q, label))
            .map(|t| t.nextstate)
            .collect();
        let next = self.intern(targets.into_iter().collect());
        if self.subsets.len() > DIFFERENCE_SUBSET_LIMIT {
            return Err(AlgebraError::DeterminizationLimit {
                limit: DIFFERENCE_SUBSET_LIMIT,
            });
        }
        self.moves.insert((subset, label), next);
        Ok(next)
    }
}

/// Paths of `a` whose input is not accepted by `b`. Weights and outputs of
/// `a` are kept; `b` is only consulted on its input side.
pub fn difference(a: &Fst, b: &Fst) -> Result<Fst, AlgebraError> {
    if a.input_alphabet() != b.input_alphabet() {
        return Err(AlgebraError::AlphabetMismatch {
            operation: "difference",
            left: a.input_alphabet(),
            right: b.input_alphabet(),
        });
    }

    let mut dfa = SubsetAutomaton::new(b);
    let mut builder = FstBuilder::new(a.input_alphabet(), a.output_alphabet());
    let mut ids: HashMap<(StateId, usize), StateId> = HashMap::new();
    let mut queue = VecDeque::new();

    let start_key = (a.start(), 0usize);
    let start = builder.add_state();
    builder.set_start(start);
    ids.insert(start_key, start);
    queue.push_back(start_key);

    while let Some((qa, d)) = queue.pop_front() {
        let id = ids[&(qa, d)];
        if !dfa.accepting[d] {
            builder.set_final(id, a.final_weight(qa));
        }
        for ta in a.transitions(qa) {
            let next_d = if ta.ilabel == EPSILON {
                d
            } else {
                dfa.step(d, ta.ilabel)?
            };
            let key = (ta.nextstate, next_d);
            let next = *ids.entry(key).or_insert_with(|| {
                queue.push_back(key);
                builder.add_state()
            });
            builder.add_transition(id, Transition { nextstate: next, ..*ta });
        }
    }

    Ok(connect(&builder.finish()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::Weight;
    use crate::fst::{closure, cross, literal, union, weighted, Charset};

    fn best_weight(fst: &Fst, input: &str) -> Option<Weight> {
        crate::fst::search::Lattice::build(fst, input).map(|l| l.best_weight())
    }

    fn best(fst: &Fst, input: &str) -> Option<String> {
        crate::fst::search::Lattice::build(fst, input)
            .and_then(|l| l.best_path())
            .map(|h| h.output)
    }

    #[test]
    fn test_compose_chains_rewrites() {
        let a = cross("1", "one").unwrap();
        let b = cross("one", "یک").unwrap();
        let ab = compose(&a, &b).unwrap();
        assert_eq!(best(&ab, "1").as_deref(), Some("یک"));
        assert!(best(&ab, "2").is_none());
    }

    #[test]
    fn test_compose_with_insertions_and_deletions() {
        // a inserts a prefix, b deletes it again and rewrites the rest.
        let a = crate::fst::concat(&crate::fst::insert("<").unwrap(), &literal("x").unwrap())
            .unwrap();
        let b = crate::fst::concat(&crate::fst::delete("<").unwrap(), &cross("x", "y").unwrap())
            .unwrap();
        let ab = compose(&a, &b).unwrap();
        assert_eq!(best(&ab, "x").as_deref(), Some("y"));
    }

    #[test]
    fn test_compose_adds_weights() {
        let a = weighted(&cross("a", "b").unwrap(), 1.0).unwrap();
        let b = weighted(&cross("b", "c").unwrap(), 2.0).unwrap();
        let ab = compose(&a, &b).unwrap();
        assert_eq!(best_weight(&ab, "a").map(|w| w.value()), Some(3.0));
    }

    #[test]
    fn test_compose_builds_each_epsilon_interleaving_once() {
        let a = crate::fst::concat(&cross("a", "").unwrap(), &literal("b").unwrap()).unwrap();
        let b = crate::fst::concat(&crate::fst::insert("x").unwrap(), &literal("b").unwrap())
            .unwrap();
        let ab = compose(&a, &b).unwrap();
        let lattice = crate::fst::search::Lattice::build(&ab, "ab").unwrap();
        assert_eq!(lattice.path_count(), 1);
    }

    #[test]
    fn test_difference_excludes_subtrahend_inputs() {
        let charset = Charset::new().unwrap();
        let words = closure(&charset.not_space, 1, None).unwrap();
        let digits = closure(&charset.digit, 1, None).unwrap();
        let with_digit = crate::fst::concat_all(&[&charset.sigma, &charset.digit, &charset.sigma])
            .unwrap();
        let no_digits = difference(&words, &with_digit).unwrap();

        assert_eq!(best(&no_digits, "سلام").as_deref(), Some("سلام"));
        assert!(best(&no_digits, "a1b").is_none());
        assert!(best(&no_digits, "12").is_none());
        assert!(best(&difference(&words, &digits).unwrap(), "a1b").is_some());
    }

    #[test]
    fn test_difference_keeps_transducer_outputs() {
        let a = union(&[&cross("a", "x").unwrap(), &cross("b", "y").unwrap()]).unwrap();
        let d = difference(&a, &literal("a").unwrap()).unwrap();
        assert!(best(&d, "a").is_none());
        assert_eq!(best(&d, "b").as_deref(), Some("y"));
    }
}
