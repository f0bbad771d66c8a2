// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structural optimization.
//!
//! [`optimize`] runs epsilon removal, weighted determinization on
//! `(input, output)` label pairs, and partition-refinement minimization, then
//! renumbers states breadth-first from the start. The weighted relation is
//! unchanged: every `(input, output)` pair keeps its best weight.
//!
//! Determinization can blow up on automata without the twins property, so it
//! runs under a state budget. When the budget is exhausted the automaton is
//! minimized without determinizing, which is still equivalent, only larger.

use crate::errors::AlgebraError;
use crate::fst::{Fst, FstBuilder, Label, StateId, Transition, Weight};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, HashMap, VecDeque};

/// Minimum determinization budget, in states.
const DETERMINIZE_FLOOR: usize = 50_000;
/// Budget growth per input state.
const DETERMINIZE_FACTOR: usize = 8;

fn empty_like(fst: &Fst) -> Fst {
    let mut builder = FstBuilder::new(fst.input_alphabet(), fst.output_alphabet());
    let start = builder.add_state();
    builder.set_start(start);
    builder.finish()
}

/// Removes states that are unreachable from the start or cannot reach a
/// final state, numbering survivors in breadth-first order.
pub fn connect(fst: &Fst) -> Fst {
    let n = fst.num_states();
    let mut reverse: Vec<Vec<StateId>> = vec![Vec::new(); n];
    for state in fst.states() {
        for t in fst.transitions(state) {
            reverse[t.nextstate as usize].push(state);
        }
    }

    let mut coaccessible = vec![false; n];
    let mut stack: Vec<StateId> = fst.states().filter(|&s| fst.is_final(s)).collect();
    for &s in &stack {
        coaccessible[s as usize] = true;
    }
    while let Some(s) = stack.pop() {
        for &p in &reverse[s as usize] {
            if !coaccessible[p as usize] {
                coaccessible[p as usize] = true;
                stack.push(p);
            }
        }
    }

    if !coaccessible[fst.start() as usize] {
        return empty_like(fst);
    }

    let mut ids: Vec<Option<StateId>> = vec![None; n];
    let mut order = Vec::new();
    let mut queue = VecDeque::from([fst.start()]);
    ids[fst.start() as usize] = Some(0);
    while let Some(s) = queue.pop_front() {
        order.push(s);
        for t in fst.transitions(s) {
            let next = t.nextstate as usize;
            if coaccessible[next] && ids[next].is_none() {
                ids[next] = Some((order.len() + queue.len()) as StateId);
                queue.push_back(t.nextstate);
            }
        }
    }

    let mut builder = FstBuilder::new(fst.input_alphabet(), fst.output_alphabet());
    for &s in &order {
        let id = builder.add_state();
        builder.set_final(id, fst.final_weight(s));
    }
    for (id, &s) in order.iter().enumerate() {
        for t in fst.transitions(s) {
            if let Some(next) = ids[t.nextstate as usize] {
                builder.add_transition(id as StateId, Transition { nextstate: next, ..*t });
            }
        }
    }
    builder.set_start(0);
    builder.finish()
}

/// Shortest epsilon distances from `source` over `eps:eps` arcs.
fn epsilon_closure(fst: &Fst, source: StateId) -> Vec<(StateId, Weight)> {
    let mut best: HashMap<StateId, Weight> = HashMap::from([(source, Weight::ONE)]);
    let mut heap = BinaryHeap::from([Reverse((Weight::ONE, source))]);
    let mut settled = Vec::new();
    while let Some(Reverse((w, s))) = heap.pop() {
        if best.get(&s).is_some_and(|&b| b < w) {
            continue;
        }
        settled.push((s, w));
        for t in fst.transitions(s).iter().filter(|t| t.is_epsilon()) {
            let candidate = w.times(t.weight);
            let known = best.get(&t.nextstate).copied().unwrap_or(Weight::ZERO);
            if candidate < known {
                best.insert(t.nextstate, candidate);
                heap.push(Reverse((candidate, t.nextstate)));
            }
        }
    }
    settled
}

/// Removes every `eps:eps` arc. Arcs with one epsilon side are kept.
pub fn rm_epsilon(fst: &Fst) -> Fst {
    let mut builder = FstBuilder::new(fst.input_alphabet(), fst.output_alphabet());
    for _ in fst.states() {
        builder.add_state();
    }
    for state in fst.states() {
        let mut final_weight = Weight::ZERO;
        let mut arcs: BTreeMap<(u32, u32, StateId), Weight> = BTreeMap::new();
        for (p, d) in epsilon_closure(fst, state) {
            final_weight = final_weight.plus(d.times(fst.final_weight(p)));
            for t in fst.transitions(p).iter().filter(|t| !t.is_epsilon()) {
                let w = d.times(t.weight);
                arcs.entry((t.ilabel, t.olabel, t.nextstate))
                    .and_modify(|e| *e = e.plus(w))
                    .or_insert(w);
            }
        }
        builder.set_final(state, final_weight);
        for ((ilabel, olabel, nextstate), weight) in arcs {
            builder.add_transition(state, Transition::new(ilabel, olabel, weight, nextstate));
        }
    }
    builder.set_start(fst.start());
    connect(&builder.finish())
}

type Subset = Vec<(StateId, Weight)>;

fn subset_key(subset: &Subset) -> Vec<(StateId, i64)> {
    subset.iter().map(|&(s, w)| (s, w.quantize())).collect()
}

/// Weighted subset construction over `(ilabel, olabel)` pairs. The input must
/// be free of `eps:eps` arcs.
fn determinize(fst: &Fst, budget: usize) -> Result<Fst, AlgebraError> {
    let mut builder = FstBuilder::new(fst.input_alphabet(), fst.output_alphabet());
    let mut ids: HashMap<Vec<(StateId, i64)>, StateId> = HashMap::new();
    let mut queue: VecDeque<(StateId, Subset)> = VecDeque::new();

    let start_subset = vec![(fst.start(), Weight::ONE)];
    let start = builder.add_state();
    builder.set_start(start);
    ids.insert(subset_key(&start_subset), start);
    queue.push_back((start, start_subset));

    while let Some((id, subset)) = queue.pop_front() {
        let final_weight = subset
            .iter()
            .fold(Weight::ZERO, |acc, &(q, r)| acc.plus(r.times(fst.final_weight(q))));
        builder.set_final(id, final_weight);

        let mut groups: BTreeMap<(Label, Label), BTreeMap<StateId, Weight>> = BTreeMap::new();
        for &(q, r) in &subset {
            for t in fst.transitions(q) {
                let w = r.times(t.weight);
                groups
                    .entry((t.ilabel, t.olabel))
                    .or_default()
                    .entry(t.nextstate)
                    .and_modify(|e| *e = e.plus(w))
                    .or_insert(w);
            }
        }

        for ((ilabel, olabel), targets) in groups {
            let arc_weight = targets.values().fold(Weight::ZERO, |acc, &w| acc.plus(w));
            let next_subset: Subset = targets
                .into_iter()
                .map(|(s, w)| (s, w.divide(arc_weight)))
                .collect();
            let key = subset_key(&next_subset);
            let next = match ids.get(&key) {
                Some(&next) => next,
                None => {
                    if builder.num_states() >= budget {
                        return Err(AlgebraError::DeterminizationLimit { limit: budget });
                    }
                    let next = builder.add_state();
                    ids.insert(key, next);
                    queue.push_back((next, next_subset));
                    next
                }
            };
            builder.add_transition(id, Transition::new(ilabel, olabel, arc_weight, next));
        }
    }
    Ok(builder.finish())
}

/// Merges bisimilar states: same final weight and the same labelled,
/// weighted arcs into the same classes.
fn minimize(fst: &Fst) -> Fst {
    let n = fst.num_states();
    let mut class: Vec<usize> = vec![0; n];
    let mut class_count = 0;

    loop {
        let mut signatures: HashMap<(usize, i64, Vec<(Label, Label, i64, usize)>), usize> =
            HashMap::new();
        let mut next_class = vec![0; n];
        for state in fst.states() {
            let mut arcs: Vec<(Label, Label, i64, usize)> = fst
                .transitions(state)
                .iter()
                .map(|t| (t.ilabel, t.olabel, t.weight.quantize(), class[t.nextstate as usize]))
                .collect();
            arcs.sort_unstable();
            arcs.dedup();
            let signature = (class[state as usize], fst.final_weight(state).quantize(), arcs);
            let fresh = signatures.len();
            next_class[state as usize] = *signatures.entry(signature).or_insert(fresh);
        }
        let count = signatures.len();
        class = next_class;
        if count == class_count {
            break;
        }
        class_count = count;
    }

    let mut representative: Vec<Option<StateId>> = vec![None; class_count];
    for state in fst.states() {
        representative[class[state as usize]].get_or_insert(state);
    }

    let mut builder = FstBuilder::new(fst.input_alphabet(), fst.output_alphabet());
    for _ in 0..class_count {
        builder.add_state();
    }
    for (c, rep) in representative.iter().enumerate() {
        let Some(rep) = *rep else { continue };
        builder.set_final(c as StateId, fst.final_weight(rep));
        let mut seen = std::collections::HashSet::new();
        for t in fst.transitions(rep) {
            let target = class[t.nextstate as usize] as StateId;
            if seen.insert((t.ilabel, t.olabel, t.weight.quantize(), target)) {
                builder.add_transition(c as StateId, Transition { nextstate: target, ..*t });
            }
        }
    }
    builder.set_start(class[fst.start() as usize] as StateId);
    builder.finish()
}

/// Canonical, equivalent form of `fst`.
pub fn optimize(fst: &Fst) -> Fst {
    let epsilon_free = rm_epsilon(fst);
    let budget = (epsilon_free.num_states() * DETERMINIZE_FACTOR).max(DETERMINIZE_FLOOR);
    let structured = match determinize(&epsilon_free, budget) {
        Ok(deterministic) => deterministic,
        Err(e) => {
            tracing::debug!(states = epsilon_free.num_states(), "skipping determinization: {}", e);
            epsilon_free
        }
    };
    connect(&minimize(&structured))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::search::Lattice;
    use crate::fst::{closure, cross, literal, union, weighted};

    /// Every distinct output with its best weight, for each input.
    fn relation(fst: &Fst, inputs: &[&str]) -> Vec<Vec<(String, i64)>> {
        inputs
            .iter()
            .map(|p| match Lattice::build(fst, p) {
                Some(lattice) => {
                    let mut pairs: Vec<(String, i64)> = lattice
                        .paths(10_000)
                        .map(|h| (h.output, h.weight.quantize()))
                        .collect();
                    pairs.sort_by(|a, b| (a.1, &a.0).cmp(&(b.1, &b.0)));
                    pairs
                }
                None => Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_optimize_preserves_weighted_relation() {
        let a = union(&[
            &cross("ab", "x").unwrap(),
            &weighted(&cross("ab", "y").unwrap(), 0.5).unwrap(),
            &weighted(&cross("ab", "x").unwrap(), 2.0).unwrap(),
            &cross("ac", "z").unwrap(),
        ])
        .unwrap();
        let repeated = closure(&a, 0, Some(2)).unwrap();
        let inputs = ["", "ab", "ac", "abab", "abac", "acac", "ababab", "a", "b"];
        let optimized = optimize(&repeated);

        assert_eq!(relation(&repeated, &inputs), relation(&optimized, &inputs));
        assert!(optimized.num_states() <= repeated.num_states());
    }

    #[test]
    fn test_optimize_merges_equivalent_branches() {
        let words: Vec<Fst> = ["cat", "bat", "hat", "mat"]
            .iter()
            .map(|w| literal(w).unwrap())
            .collect();
        let refs: Vec<&Fst> = words.iter().collect();
        let optimized = optimize(&union(&refs).unwrap());
        // start, then one state after the first letter shared by all, "a", "t".
        assert_eq!(optimized.num_states(), 4);
    }

    #[test]
    fn test_optimize_is_deterministic_in_construction() {
        let a = closure(&union(&[&literal("a").unwrap(), &cross("b", "c").unwrap()]).unwrap(), 1, None)
            .unwrap();
        let first = optimize(&a);
        let second = optimize(&a);
        assert_eq!(first.num_states(), second.num_states());
        assert_eq!(first.num_transitions(), second.num_transitions());
    }

    #[test]
    fn test_connect_trims_dead_states() {
        let mut builder = FstBuilder::new(Default::default(), Default::default());
        let s0 = builder.add_state();
        let s1 = builder.add_state();
        let dead = builder.add_state();
        builder.add_transition(s0, Transition::new(97, 97, Weight::ONE, s1));
        builder.add_transition(s0, Transition::new(98, 98, Weight::ONE, dead));
        builder.set_final(s1, Weight::ONE);
        let trimmed = connect(&builder.finish());
        assert_eq!(trimmed.num_states(), 2);
        assert_eq!(trimmed.num_transitions(), 1);
    }

    #[test]
    fn test_rm_epsilon_pushes_weights_forward() {
        let a = crate::fst::concat(
            &weighted(&literal("a").unwrap(), 1.0).unwrap(),
            &literal("b").unwrap(),
        )
        .unwrap();
        let free = rm_epsilon(&a);
        assert!(free
            .states()
            .flat_map(|s| free.transitions(s))
            .all(|t| !t.is_epsilon()));
        assert_eq!(relation(&a, &["ab"]), relation(&free, &["ab"]));
    }
}
