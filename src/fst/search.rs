// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Decoding an input string against a transducer.
//!
//! [`Lattice::build`] expands the input (a linear acceptor) against the
//! automaton, keeping only nodes `(position, state)` that can still reach the
//! end of the input in a final state. The exact remaining cost of every node
//! is then known, so [`Lattice::paths`] can run A* with a perfect heuristic:
//! complete paths come out in non-decreasing weight order, and each distinct
//! output string is reported once, with its best weight.
//!
//! Enumeration is lazy and restartable. Each call to `paths` starts over
//! and yields the same sequence.

use crate::fst::{Alphabet, Fst, Label, StateId, Weight, EPSILON};
use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

const NO_LINK: u32 = u32::MAX;
const SINK: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct Arc {
    olabel: Label,
    weight: Weight,
    target: u32,
}

/// Where one step of a path sits on the input and output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Alignment {
    /// Byte offset in the input after this step.
    pub input_end: usize,
    /// Byte offset in the output after this step.
    pub output_end: usize,
    pub weight: Weight,
}

/// One decoded path.
#[derive(Debug, Clone, PartialEq)]
pub struct Hypothesis {
    pub output: String,
    pub weight: Weight,
    pub alignment: Vec<Alignment>,
}

/// Input string expanded against an automaton.
#[derive(Debug)]
pub struct Lattice {
    output_alphabet: Alphabet,
    offsets: Vec<usize>,
    positions: Vec<usize>,
    arcs: Vec<Vec<Arc>>,
    finals: Vec<Weight>,
    to_final: Vec<Weight>,
}

impl Lattice {
    /// Returns `None` when no accepting path reads the whole input.
    pub fn build(fst: &Fst, input: &str) -> Option<Lattice> {
        let alphabet = fst.input_alphabet();
        let labels = alphabet.encode(input).ok()?;
        let n = labels.len();

        let mut ids: HashMap<(usize, StateId), u32> = HashMap::new();
        let mut positions = Vec::new();
        let mut states = Vec::new();
        let mut arcs: Vec<Vec<Arc>> = Vec::new();
        let mut finals = Vec::new();
        let mut queue = VecDeque::new();

        let mut node_for = |key: (usize, StateId),
                            positions: &mut Vec<usize>,
                            states: &mut Vec<StateId>,
                            queue: &mut VecDeque<u32>|
         -> u32 {
            *ids.entry(key).or_insert_with(|| {
                let id = positions.len() as u32;
                positions.push(key.0);
                states.push(key.1);
                queue.push_back(id);
                id
            })
        };

        node_for((0, fst.start()), &mut positions, &mut states, &mut queue);
        while let Some(node) = queue.pop_front() {
            let (pos, q) = (positions[node as usize], states[node as usize]);
            let mut out = Vec::new();
            for t in fst.transitions_on(q, EPSILON) {
                let target = node_for((pos, t.nextstate), &mut positions, &mut states, &mut queue);
                out.push(Arc {
                    olabel: t.olabel,
                    weight: t.weight,
                    target,
                });
            }
            if pos < n {
                for t in fst.transitions_on(q, labels[pos]) {
                    let target =
                        node_for((pos + 1, t.nextstate), &mut positions, &mut states, &mut queue);
                    out.push(Arc {
                        olabel: t.olabel,
                        weight: t.weight,
                        target,
                    });
                }
            }
            if arcs.len() <= node as usize {
                arcs.resize_with(node as usize + 1, Vec::new);
                finals.resize(node as usize + 1, Weight::ZERO);
            }
            arcs[node as usize] = out;
            finals[node as usize] = if pos == n {
                fst.final_weight(q)
            } else {
                Weight::ZERO
            };
        }
        arcs.resize_with(positions.len(), Vec::new);
        finals.resize(positions.len(), Weight::ZERO);

        let to_final = Self::distances_to_final(&arcs, &finals);
        if to_final[0].is_zero() {
            return None;
        }
        Some(Lattice {
            output_alphabet: fst.output_alphabet(),
            offsets: alphabet.offsets(input),
            positions,
            arcs,
            finals,
            to_final,
        })
    }

    fn distances_to_final(arcs: &[Vec<Arc>], finals: &[Weight]) -> Vec<Weight> {
        let mut reverse: Vec<Vec<(u32, Weight)>> = vec![Vec::new(); arcs.len()];
        for (source, out) in arcs.iter().enumerate() {
            for arc in out {
                reverse[arc.target as usize].push((source as u32, arc.weight));
            }
        }
        let mut dist = finals.to_vec();
        let mut heap: BinaryHeap<Reverse<(Weight, u32)>> = dist
            .iter()
            .enumerate()
            .filter(|(_, w)| !w.is_zero())
            .map(|(i, &w)| Reverse((w, i as u32)))
            .collect();
        while let Some(Reverse((w, node))) = heap.pop() {
            if dist[node as usize] < w {
                continue;
            }
            for &(source, arc_weight) in &reverse[node as usize] {
                let candidate = w.times(arc_weight);
                if candidate < dist[source as usize] {
                    dist[source as usize] = candidate;
                    heap.push(Reverse((candidate, source)));
                }
            }
        }
        dist
    }

    pub fn num_nodes(&self) -> usize {
        self.positions.len()
    }

    /// Weight of the best accepting path.
    pub fn best_weight(&self) -> Weight {
        self.to_final[0]
    }

    pub fn best_path(&self) -> Option<Hypothesis> {
        self.paths(usize::MAX).next()
    }

    /// Distinct outputs in non-decreasing weight order. Enumeration stops
    /// after `max_expansions` search steps.
    pub fn paths(&self, max_expansions: usize) -> Paths<'_> {
        let mut heap = BinaryHeap::new();
        heap.push(Reverse(Entry {
            f: self.to_final[0],
            depth: 0,
            g: Weight::ONE,
            node: 0,
            link: NO_LINK,
        }));
        Paths {
            lattice: self,
            heap,
            links: Vec::new(),
            seen: HashSet::new(),
            expansions: 0,
            max_expansions,
        }
    }

    /// Number of distinct accepting paths, assuming the lattice is acyclic.
    #[cfg(test)]
    pub(crate) fn path_count(&self) -> usize {
        fn count(lattice: &Lattice, node: usize, memo: &mut Vec<Option<usize>>) -> usize {
            if let Some(c) = memo[node] {
                return c;
            }
            let mut total = usize::from(!lattice.finals[node].is_zero());
            for arc in &lattice.arcs[node] {
                total += count(lattice, arc.target as usize, memo);
            }
            memo[node] = Some(total);
            total
        }
        let mut memo = vec![None; self.num_nodes()];
        count(self, 0, &mut memo)
    }
}

#[derive(Debug, Clone, Copy)]
struct Link {
    prev: u32,
    node: u32,
    olabel: Label,
    weight: Weight,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    f: Weight,
    depth: u32,
    g: Weight,
    node: u32,
    link: u32,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    // Shallower entries first among equal costs, so zero-weight cycles
    // cannot starve a finished path.
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .cmp(&other.f)
            .then(self.depth.cmp(&other.depth))
            .then(self.link.cmp(&other.link))
            .then(self.node.cmp(&other.node))
    }
}

/// Lazy iterator over the distinct outputs of a [`Lattice`].
pub struct Paths<'a> {
    lattice: &'a Lattice,
    heap: BinaryHeap<Reverse<Entry>>,
    links: Vec<Link>,
    seen: HashSet<String>,
    expansions: usize,
    max_expansions: usize,
}

impl Paths<'_> {
    fn push_link(&mut self, link: Link) -> u32 {
        self.links.push(link);
        (self.links.len() - 1) as u32
    }

    fn hypothesis(&self, mut link: u32, weight: Weight) -> Hypothesis {
        let mut steps = Vec::new();
        while link != NO_LINK {
            let l = self.links[link as usize];
            steps.push(l);
            link = l.prev;
        }
        steps.reverse();

        let mut bytes = Vec::new();
        let mut alignment = Vec::with_capacity(steps.len());
        for step in steps {
            if step.olabel != EPSILON {
                self.lattice.output_alphabet.push_label(step.olabel, &mut bytes);
            }
            let position = if step.node == SINK {
                self.lattice.offsets.len() - 1
            } else {
                self.lattice.positions[step.node as usize]
            };
            alignment.push(Alignment {
                input_end: self.lattice.offsets[position],
                output_end: bytes.len(),
                weight: step.weight,
            });
        }
        let output = String::from_utf8(bytes)
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned());
        Hypothesis {
            output,
            weight,
            alignment,
        }
    }
}

impl Iterator for Paths<'_> {
    type Item = Hypothesis;

    fn next(&mut self) -> Option<Hypothesis> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            self.expansions += 1;
            if self.expansions > self.max_expansions {
                self.heap.clear();
                return None;
            }

            if entry.node == SINK {
                let hypothesis = self.hypothesis(entry.link, entry.g);
                if self.seen.insert(hypothesis.output.clone()) {
                    return Some(hypothesis);
                }
                continue;
            }

            let node = entry.node as usize;
            let final_weight = self.lattice.finals[node];
            if !final_weight.is_zero() {
                let g = entry.g.times(final_weight);
                let link = self.push_link(Link {
                    prev: entry.link,
                    node: SINK,
                    olabel: EPSILON,
                    weight: final_weight,
                });
                self.heap.push(Reverse(Entry {
                    f: g,
                    depth: entry.depth + 1,
                    g,
                    node: SINK,
                    link,
                }));
            }
            for i in 0..self.lattice.arcs[node].len() {
                let arc = self.lattice.arcs[node][i];
                let h = self.lattice.to_final[arc.target as usize];
                if h.is_zero() {
                    continue;
                }
                let g = entry.g.times(arc.weight);
                let link = self.push_link(Link {
                    prev: entry.link,
                    node: arc.target,
                    olabel: arc.olabel,
                    weight: arc.weight,
                });
                self.heap.push(Reverse(Entry {
                    f: g.times(h),
                    depth: entry.depth + 1,
                    g,
                    node: arc.target,
                    link,
                }));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::{closure, concat, cross, literal, union, weighted};

    #[test]
    fn test_best_path_is_minimum_weight() {
        let fst = union(&[
            &weighted(&cross("a", "x").unwrap(), 3.0).unwrap(),
            &weighted(&cross("a", "y").unwrap(), 1.0).unwrap(),
            &weighted(&cross("a", "z").unwrap(), 2.0).unwrap(),
        ])
        .unwrap();
        let lattice = Lattice::build(&fst, "a").unwrap();
        let best = lattice.best_path().unwrap();
        assert_eq!(best.output, "y");
        assert_eq!(best.weight.value(), 1.0);
        assert_eq!(lattice.best_weight().value(), 1.0);
    }

    #[test]
    fn test_paths_are_ordered_distinct_and_restartable() {
        let fst = union(&[
            &weighted(&cross("a", "x").unwrap(), 3.0).unwrap(),
            &weighted(&cross("a", "y").unwrap(), 1.0).unwrap(),
            &weighted(&cross("a", "y").unwrap(), 2.0).unwrap(),
        ])
        .unwrap();
        let lattice = Lattice::build(&fst, "a").unwrap();
        let first: Vec<(String, f32)> = lattice
            .paths(1000)
            .map(|h| (h.output, h.weight.value()))
            .collect();
        assert_eq!(first, vec![("y".to_string(), 1.0), ("x".to_string(), 3.0)]);
        let second: Vec<(String, f32)> = lattice
            .paths(1000)
            .map(|h| (h.output, h.weight.value()))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_partial_matches() {
        let fst = literal("abc").unwrap();
        assert!(Lattice::build(&fst, "ab").is_none());
        assert!(Lattice::build(&fst, "abcd").is_none());
    }

    #[test]
    fn test_alignment_tracks_offsets() {
        let fst = concat(&cross("a", "xyz").unwrap(), &cross("bc", "").unwrap()).unwrap();
        let best = Lattice::build(&fst, "abc").unwrap().best_path().unwrap();
        assert_eq!(best.output, "xyz");
        let last = best.alignment.last().unwrap();
        assert_eq!(last.input_end, 3);
        assert_eq!(last.output_end, 3);
        assert!(best
            .alignment
            .windows(2)
            .all(|w| w[0].input_end <= w[1].input_end && w[0].output_end <= w[1].output_end));
    }

    #[test]
    fn test_expansion_limit_bounds_enumeration() {
        let a = union(&[&literal("a").unwrap(), &cross("a", "b").unwrap()]).unwrap();
        let many = closure(&a, 0, None).unwrap();
        let lattice = Lattice::build(&many, "aaaaaaaaaa").unwrap();
        assert_eq!(lattice.paths(usize::MAX).take(5).count(), 5);
        assert!(lattice.paths(3).count() < 5);
    }
}
