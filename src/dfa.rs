//! Complete deterministic automata over an explicit alphabet.
//!
//! A [`Dfa`] always has a transition for every (state, symbol) pair; words
//! containing a symbol outside the alphabet are rejected. States are plain
//! `usize` indices, numbered in breadth-first order from the initial state by
//! every construction in this module, which makes all derived strings (and
//! hence the test sets built from them) deterministic.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::ops::Range;

use log::debug;
use num_bigint::BigUint;

use crate::nfa::Nfa;
use crate::types::{Symbol, EPSILON};

pub type StateId = usize;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Dfa {
    alphabet: Vec<Symbol>,
    /// `transitions[state][i]` is the successor of `state` on `alphabet[i]`.
    transitions: Vec<Vec<StateId>>,
    accepting: Vec<bool>,
    initial: StateId,
}

impl Dfa {
    /// Subset construction. Epsilon is dropped from `alphabet`; the empty
    /// subset becomes an explicit sink state.
    pub fn from_nfa(nfa: &Nfa, alphabet: &[Symbol]) -> Self {
        let alphabet: Vec<Symbol> = alphabet.iter().copied().filter(|&c| c != EPSILON).collect();

        let start = nfa.start_set();
        let mut index: HashMap<BTreeSet<usize>, StateId> = HashMap::from([(start.clone(), 0)]);
        let mut subsets = vec![start.clone()];
        let mut queue = VecDeque::from([start]);
        let mut transitions = Vec::new();

        while let Some(set) = queue.pop_front() {
            let mut row = Vec::with_capacity(alphabet.len());
            for &c in &alphabet {
                let next = nfa.step(&set, c);
                let id = match index.get(&next) {
                    Some(&id) => id,
                    None => {
                        let id = subsets.len();
                        index.insert(next.clone(), id);
                        subsets.push(next.clone());
                        queue.push_back(next);
                        id
                    }
                };
                row.push(id);
            }
            transitions.push(row);
        }

        let accepting = subsets.iter().map(|s| nfa.is_accepting(s)).collect();
        debug!("from_nfa: {} NFA states -> {} DFA states", nfa.num_states(), subsets.len());
        Dfa {
            alphabet,
            transitions,
            accepting,
            initial: 0,
        }
    }

    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    pub fn states(&self) -> Range<StateId> {
        0..self.num_states()
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn is_accepting(&self, state: StateId) -> bool {
        self.accepting[state]
    }

    /// Successor of `state` on `symbol`, or `None` if the symbol is not in the alphabet.
    pub fn next(&self, state: StateId, symbol: Symbol) -> Option<StateId> {
        let i = self.alphabet.iter().position(|&c| c == symbol)?;
        Some(self.transitions[state][i])
    }

    pub fn accepts(&self, word: &str) -> bool {
        let mut state = self.initial;
        for c in word.chars() {
            match self.next(state, c) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.is_accepting(state)
    }

    /// Same automaton with `state` as its only accepting state.
    pub fn with_sole_accepting(&self, state: StateId) -> Dfa {
        let mut dfa = self.clone();
        dfa.accepting = self.states().map(|s| s == state).collect();
        dfa
    }

    /// Same automaton started from `state`.
    pub fn with_initial(&self, state: StateId) -> Dfa {
        assert!(state < self.num_states(), "no state {}", state);
        let mut dfa = self.clone();
        dfa.initial = state;
        dfa
    }

    /// Product automaton accepting `L(self) \ L(other)`.
    pub fn difference(&self, other: &Dfa) -> Dfa {
        assert_eq!(self.alphabet, other.alphabet, "difference of automata over different alphabets");

        let start = (self.initial, other.initial);
        let mut index: HashMap<(StateId, StateId), StateId> = HashMap::from([(start, 0)]);
        let mut pairs = vec![start];
        let mut transitions = Vec::new();
        let mut i = 0;

        while i < pairs.len() {
            let (p, q) = pairs[i];
            let row: Vec<StateId> = (0..self.alphabet.len())
                .map(|k| {
                    let next = (self.transitions[p][k], other.transitions[q][k]);
                    *index.entry(next).or_insert_with(|| {
                        pairs.push(next);
                        pairs.len() - 1
                    })
                })
                .collect();
            transitions.push(row);
            i += 1;
        }

        let accepting = pairs
            .iter()
            .map(|&(p, q)| self.accepting[p] && !other.accepting[q])
            .collect();
        Dfa {
            alphabet: self.alphabet.clone(),
            transitions,
            accepting,
            initial: 0,
        }
    }

    /// Shortest accepted word; among words of equal length, the first in
    /// breadth-first order over the alphabet. `None` if the language is empty.
    pub fn shortest_accepted(&self) -> Option<String> {
        let mut parent: Vec<Option<(StateId, Symbol)>> = vec![None; self.num_states()];
        let mut visited = vec![false; self.num_states()];
        let mut queue = VecDeque::from([self.initial]);
        visited[self.initial] = true;

        while let Some(state) = queue.pop_front() {
            if self.accepting[state] {
                let mut word = Vec::new();
                let mut current = state;
                while let Some((prev, c)) = parent[current] {
                    word.push(c);
                    current = prev;
                }
                return Some(word.into_iter().rev().collect());
            }
            for (k, &next) in self.transitions[state].iter().enumerate() {
                if !visited[next] {
                    visited[next] = true;
                    parent[next] = Some((state, self.alphabet[k]));
                    queue.push_back(next);
                }
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.shortest_accepted().is_none()
    }

    /// States reachable from the initial one, in breadth-first order.
    fn reachable(&self) -> Vec<StateId> {
        let mut visited = vec![false; self.num_states()];
        let mut order = vec![self.initial];
        visited[self.initial] = true;
        let mut i = 0;
        while i < order.len() {
            for &next in &self.transitions[order[i]] {
                if !visited[next] {
                    visited[next] = true;
                    order.push(next);
                }
            }
            i += 1;
        }
        order
    }

    /// Minimal equivalent automaton (Moore partition refinement over the
    /// reachable states). The initial state of the result is 0.
    pub fn minimize(&self) -> Dfa {
        let order = self.reachable();

        let mut class = vec![usize::MAX; self.num_states()];
        let mut num_classes = 0;
        let mut seen: HashMap<bool, usize> = HashMap::new();
        for &s in &order {
            class[s] = *seen.entry(self.accepting[s]).or_insert_with(|| {
                num_classes += 1;
                num_classes - 1
            });
        }

        loop {
            let mut signatures: HashMap<(usize, Vec<usize>), usize> = HashMap::new();
            let mut refined = vec![usize::MAX; self.num_states()];
            for &s in &order {
                let signature = (class[s], self.transitions[s].iter().map(|&t| class[t]).collect());
                let next_id = signatures.len();
                refined[s] = *signatures.entry(signature).or_insert(next_id);
            }
            let count = signatures.len();
            class = refined;
            if count == num_classes {
                break;
            }
            num_classes = count;
        }

        // Classes are numbered by first appearance in `order`.
        let mut transitions: Vec<Vec<StateId>> = Vec::with_capacity(num_classes);
        let mut accepting = Vec::with_capacity(num_classes);
        for &s in &order {
            if class[s] == transitions.len() {
                transitions.push(self.transitions[s].iter().map(|&t| class[t]).collect());
                accepting.push(self.accepting[s]);
            }
        }

        debug!("minimize: {} -> {} states", self.num_states(), num_classes);
        Dfa {
            alphabet: self.alphabet.clone(),
            transitions,
            accepting,
            initial: class[self.initial],
        }
    }

    /// Exact number of accepted words of length `len`.
    pub fn count_words(&self, len: usize) -> BigUint {
        let mut counts = vec![BigUint::ZERO; self.num_states()];
        counts[self.initial] = BigUint::from(1u32);
        for _ in 0..len {
            let mut next = vec![BigUint::ZERO; self.num_states()];
            for (state, count) in counts.iter().enumerate() {
                if *count == BigUint::ZERO {
                    continue;
                }
                for &t in &self.transitions[state] {
                    next[t] += count;
                }
            }
            counts = next;
        }
        counts
            .into_iter()
            .enumerate()
            .filter(|&(s, _)| self.accepting[s])
            .map(|(_, c)| c)
            .sum()
    }
}
