// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::fst::{Alphabet, Label, Weight, EPSILON};
use std::fmt;
use std::sync::Arc;

pub type StateId = u32;

/// One arc of a transducer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: Weight,
    pub nextstate: StateId,
}

impl Transition {
    pub fn new(ilabel: Label, olabel: Label, weight: Weight, nextstate: StateId) -> Self {
        Self {
            ilabel,
            olabel,
            weight,
            nextstate,
        }
    }

    pub fn epsilon(weight: Weight, nextstate: StateId) -> Self {
        Self::new(EPSILON, EPSILON, weight, nextstate)
    }

    pub fn is_epsilon(&self) -> bool {
        self.ilabel == EPSILON && self.olabel == EPSILON
    }
}

#[derive(Debug, Clone)]
struct State {
    transitions: Vec<Transition>,
    final_weight: Weight,
}

impl State {
    fn new() -> Self {
        Self {
            transitions: Vec::new(),
            final_weight: Weight::ZERO,
        }
    }
}

#[derive(Debug)]
struct FstData {
    states: Vec<State>,
    start: StateId,
    input_alphabet: Alphabet,
    output_alphabet: Alphabet,
}

/// Immutable weighted transducer.
///
/// There is always a start state; the empty language is a lone non-final
/// start state. Transitions of every state are sorted by `(ilabel, olabel)`,
/// which lets matching code binary-search on input labels.
#[derive(Clone)]
pub struct Fst {
    inner: Arc<FstData>,
}

impl Fst {
    /// Automaton accepting nothing.
    pub fn empty(alphabet: Alphabet) -> Fst {
        let mut builder = FstBuilder::new(alphabet, alphabet);
        let start = builder.add_state();
        builder.set_start(start);
        builder.finish()
    }

    /// Automaton accepting only the empty string.
    pub fn epsilon(alphabet: Alphabet) -> Fst {
        let mut builder = FstBuilder::new(alphabet, alphabet);
        let start = builder.add_state();
        builder.set_start(start);
        builder.set_final(start, Weight::ONE);
        builder.finish()
    }

    pub fn start(&self) -> StateId {
        self.inner.start
    }

    pub fn num_states(&self) -> usize {
        self.inner.states.len()
    }

    pub fn num_transitions(&self) -> usize {
        self.inner.states.iter().map(|s| s.transitions.len()).sum()
    }

    pub fn states(&self) -> std::ops::Range<StateId> {
        0..self.inner.states.len() as StateId
    }

    pub fn transitions(&self, state: StateId) -> &[Transition] {
        &self.inner.states[state as usize].transitions
    }

    /// Transitions of `state` whose input label equals `label`.
    pub fn transitions_on(&self, state: StateId, label: Label) -> &[Transition] {
        let all = self.transitions(state);
        let lo = all.partition_point(|t| t.ilabel < label);
        let hi = all.partition_point(|t| t.ilabel <= label);
        &all[lo..hi]
    }

    pub fn final_weight(&self, state: StateId) -> Weight {
        self.inner.states[state as usize].final_weight
    }

    pub fn is_final(&self, state: StateId) -> bool {
        !self.final_weight(state).is_zero()
    }

    pub fn input_alphabet(&self) -> Alphabet {
        self.inner.input_alphabet
    }

    pub fn output_alphabet(&self) -> Alphabet {
        self.inner.output_alphabet
    }

    /// True when no state is final. Only exact after [`crate::fst::connect`].
    pub fn is_empty(&self) -> bool {
        !self.states().any(|s| self.is_final(s))
    }

    /// True when every arc maps a label to itself.
    pub fn is_acceptor(&self) -> bool {
        self.states()
            .flat_map(|s| self.transitions(s))
            .all(|t| t.ilabel == t.olabel)
    }
}

impl fmt::Debug for Fst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fst")
            .field("states", &self.num_states())
            .field("transitions", &self.num_transitions())
            .field("input", &self.input_alphabet())
            .field("output", &self.output_alphabet())
            .finish()
    }
}

/// Mutable staging area for a new [`Fst`].
pub struct FstBuilder {
    states: Vec<State>,
    start: StateId,
    input_alphabet: Alphabet,
    output_alphabet: Alphabet,
}

impl FstBuilder {
    pub fn new(input_alphabet: Alphabet, output_alphabet: Alphabet) -> Self {
        Self {
            states: Vec::new(),
            start: 0,
            input_alphabet,
            output_alphabet,
        }
    }

    pub fn add_state(&mut self) -> StateId {
        self.states.push(State::new());
        (self.states.len() - 1) as StateId
    }

    pub fn set_start(&mut self, state: StateId) {
        self.start = state;
    }

    pub fn set_final(&mut self, state: StateId, weight: Weight) {
        self.states[state as usize].final_weight = weight;
    }

    pub fn final_weight(&self, state: StateId) -> Weight {
        self.states[state as usize].final_weight
    }

    pub fn add_transition(&mut self, state: StateId, transition: Transition) {
        self.states[state as usize].transitions.push(transition);
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    /// Copies every state of `fst`, returning the offset added to its ids.
    /// Final weights are copied too; callers rewire them as needed.
    pub fn append(&mut self, fst: &Fst) -> StateId {
        let offset = self.states.len() as StateId;
        for state in fst.states() {
            let transitions = fst
                .transitions(state)
                .iter()
                .map(|t| Transition {
                    nextstate: t.nextstate + offset,
                    ..*t
                })
                .collect();
            self.states.push(State {
                transitions,
                final_weight: fst.final_weight(state),
            });
        }
        offset
    }

    /// Final states together with their weights.
    pub fn finals(&self) -> Vec<(StateId, Weight)> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.final_weight.is_zero())
            .map(|(i, s)| (i as StateId, s.final_weight))
            .collect()
    }

    pub fn finish(mut self) -> Fst {
        if self.states.is_empty() {
            self.states.push(State::new());
            self.start = 0;
        }
        for state in &mut self.states {
            state.transitions.sort_by(|a, b| {
                (a.ilabel, a.olabel, a.nextstate)
                    .cmp(&(b.ilabel, b.olabel, b.nextstate))
                    .then(a.weight.cmp(&b.weight))
            });
        }
        Fst {
            inner: Arc::new(FstData {
                states: self.states,
                start: self.start,
                input_alphabet: self.input_alphabet,
                output_alphabet: self.output_alphabet,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_are_sorted_by_input_label() {
        let mut builder = FstBuilder::new(Alphabet::Bytes, Alphabet::Bytes);
        let s0 = builder.add_state();
        let s1 = builder.add_state();
        builder.add_transition(s0, Transition::new(b'c' as Label, b'c' as Label, Weight::ONE, s1));
        builder.add_transition(s0, Transition::new(b'a' as Label, b'x' as Label, Weight::ONE, s1));
        builder.add_transition(s0, Transition::new(b'a' as Label, b'a' as Label, Weight::ONE, s1));
        builder.set_final(s1, Weight::ONE);
        let fst = builder.finish();

        let labels: Vec<Label> = fst.transitions(s0).iter().map(|t| t.ilabel).collect();
        assert_eq!(labels, vec![b'a' as Label, b'a' as Label, b'c' as Label]);
        assert_eq!(fst.transitions_on(s0, b'a' as Label).len(), 2);
        assert!(fst.transitions_on(s0, b'b' as Label).is_empty());
    }

    #[test]
    fn test_empty_and_epsilon() {
        let empty = Fst::empty(Alphabet::Bytes);
        assert!(empty.is_empty());
        assert_eq!(empty.num_states(), 1);

        let eps = Fst::epsilon(Alphabet::Bytes);
        assert!(eps.is_final(eps.start()));
    }
}
