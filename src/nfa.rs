//! Thompson construction: converts a [`Tree`] into an epsilon-NFA.
//!
//! Each node compiles to a fragment with one entry and one exit state:
//!
//! ```text
//! Literal(c):       s --c--> e
//! Literal(ε):       s --ε--> e
//! Concatenation:    s --ε--> [x1] --ε--> [x2] ... --ε--> e
//! Disjunction:      s --ε--> [xi] --ε--> e       (for each alternative)
//! Star:             s --ε--> [x] --ε--> e,  s --ε--> e,  [x].exit --ε--> [x].entry
//! ```
//!
//! A disjunction without alternatives has no path from entry to exit.

use std::collections::BTreeSet;

use crate::node::Node;
use crate::tree::Tree;
use crate::types::{NodeId, Symbol};

#[derive(Debug, Clone, Default)]
struct State {
    transitions: Vec<(Symbol, usize)>,
    epsilon: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct Nfa {
    states: Vec<State>,
    start: usize,
    accept: usize,
}

impl Nfa {
    pub fn from_tree(tree: &Tree) -> Self {
        let mut nfa = Nfa {
            states: Vec::new(),
            start: 0,
            accept: 0,
        };
        let (start, accept) = nfa.build(tree, tree.root());
        nfa.start = start;
        nfa.accept = accept;
        nfa
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    fn add_state(&mut self) -> usize {
        self.states.push(State::default());
        self.states.len() - 1
    }

    fn add_epsilon(&mut self, from: usize, to: usize) {
        self.states[from].epsilon.push(to);
    }

    fn build(&mut self, tree: &Tree, id: NodeId) -> (usize, usize) {
        let s = self.add_state();
        let e = self.add_state();
        match tree.node(id) {
            node if node.is_epsilon() => {
                self.add_epsilon(s, e);
            }
            Node::Literal(c) => {
                self.states[s].transitions.push((*c, e));
            }
            Node::Concatenation(children) => {
                let mut last = s;
                for &child in children {
                    let (cs, ce) = self.build(tree, child);
                    self.add_epsilon(last, cs);
                    last = ce;
                }
                self.add_epsilon(last, e);
            }
            Node::Disjunction(children) => {
                for &child in children {
                    let (cs, ce) = self.build(tree, child);
                    self.add_epsilon(s, cs);
                    self.add_epsilon(ce, e);
                }
            }
            Node::Star(child) => {
                let (cs, ce) = self.build(tree, *child);
                self.add_epsilon(s, cs);
                self.add_epsilon(ce, e);
                self.add_epsilon(s, e);
                self.add_epsilon(ce, cs);
            }
        }
        (s, e)
    }

    /// Extends `set` with every state reachable through epsilon moves.
    pub fn epsilon_closure(&self, set: &mut BTreeSet<usize>) {
        let mut stack: Vec<usize> = set.iter().copied().collect();
        while let Some(q) = stack.pop() {
            for &next in &self.states[q].epsilon {
                if set.insert(next) {
                    stack.push(next);
                }
            }
        }
    }

    pub fn start_set(&self) -> BTreeSet<usize> {
        let mut set = BTreeSet::from([self.start]);
        self.epsilon_closure(&mut set);
        set
    }

    /// States reachable from `set` by reading `symbol`, epsilon-closed.
    pub fn step(&self, set: &BTreeSet<usize>, symbol: Symbol) -> BTreeSet<usize> {
        let mut next = BTreeSet::new();
        for &q in set {
            for &(c, to) in &self.states[q].transitions {
                if c == symbol {
                    next.insert(to);
                }
            }
        }
        self.epsilon_closure(&mut next);
        next
    }

    pub fn is_accepting(&self, set: &BTreeSet<usize>) -> bool {
        set.contains(&self.accept)
    }

    pub fn accepts(&self, word: &str) -> bool {
        let mut current = self.start_set();
        for c in word.chars() {
            if current.is_empty() {
                return false;
            }
            current = self.step(&current, c);
        }
        self.is_accepting(&current)
    }
}
