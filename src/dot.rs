//! DFA and syntax tree to DOT (Graphviz) conversion.
//!
//! # DOT Format
//!
//! Automata are rendered as directed graphs:
//! - **States** are circles labeled with their index; accepting states use a double circle
//! - **Edges** between the same pair of states are merged, with the symbols joined by commas
//! - **Sink states** (non-accepting states with only self-loops) are omitted unless requested
//! - An invisible `start` node points at the initial state
//!
//! Trees are rendered top-down, one box per node, labeled with the node kind or symbol.
//!
//! # Examples
//!
//! ```
//! use regex_repair::oracle::Oracle;
//!
//! let oracle = Oracle::new("ab".chars());
//! let dfa = oracle.compile("a*b").unwrap();
//! let dot = dfa.to_dot().unwrap();
//! assert!(dot.starts_with("digraph {"));
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::dfa::{Dfa, StateId};
use crate::node::Node;
use crate::tree::Tree;
use crate::types::EPSILON;

/// Configuration options for DOT output generation.
///
/// Use `DotConfig::default()` for standard settings.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for ordinary states (default: "circle")
    pub state_shape: &'static str,
    /// Shape for accepting states (default: "doublecircle")
    pub accepting_shape: &'static str,
    /// Shape for tree nodes (default: "box")
    pub tree_node_shape: &'static str,
    /// Whether to draw the sink state of an automaton (default: false)
    pub show_sink: bool,
    /// Left-to-right layout for automata (default: true)
    pub horizontal: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            state_shape: "circle",
            accepting_shape: "doublecircle",
            tree_node_shape: "box",
            show_sink: false,
            horizontal: true,
        }
    }
}

impl Dfa {
    /// Converts the automaton to DOT format with the default configuration.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    fn is_sink(&self, state: StateId) -> bool {
        !self.is_accepting(state) && self.alphabet().iter().all(|&c| self.next(state, c) == Some(state))
    }

    /// Converts the automaton to DOT format with custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use regex_repair::dot::DotConfig;
    /// use regex_repair::oracle::Oracle;
    ///
    /// let dfa = Oracle::new("a".chars()).compile("a").unwrap();
    /// let config = DotConfig {
    ///     show_sink: true,
    ///     ..DotConfig::default()
    /// };
    /// let dot = dfa.to_dot_with_config(&config).unwrap();
    /// assert!(dot.contains("doublecircle"));
    /// ```
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        if config.horizontal {
            writeln!(dot, "rankdir=LR;")?;
        }
        writeln!(dot, "node [shape={}];", config.state_shape)?;
        writeln!(dot, "start [shape=point, style=invis];")?;

        let visible = |s: StateId| config.show_sink || !self.is_sink(s);

        for s in self.states().filter(|&s| visible(s)) {
            let shape = if self.is_accepting(s) {
                config.accepting_shape
            } else {
                config.state_shape
            };
            writeln!(dot, "{} [shape={}, label=\"{}\"];", s, shape, s)?;
        }
        writeln!(dot, "start -> {};", self.initial())?;

        for s in self.states().filter(|&s| visible(s)) {
            // Merge parallel edges, keyed by target.
            let mut edges = BTreeMap::<StateId, Vec<String>>::new();
            for &c in self.alphabet() {
                if let Some(t) = self.next(s, c) {
                    if visible(t) {
                        edges.entry(t).or_default().push(c.to_string());
                    }
                }
            }
            for (t, labels) in edges {
                writeln!(dot, "{} -> {} [label=\"{}\"];", s, t, labels.join(","))?;
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

impl Tree {
    /// Converts the syntax tree to DOT format.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "digraph {{")?;
        writeln!(dot, "node [shape={}];", config.tree_node_shape)?;

        for id in self.preorder() {
            let label = match self.node(id) {
                node if node.is_epsilon() => EPSILON.to_string(),
                Node::Literal(c) => c.to_string(),
                Node::Concatenation(_) => "·".to_string(),
                Node::Disjunction(_) => "|".to_string(),
                Node::Star(_) => "*".to_string(),
            };
            writeln!(dot, "{} [label=\"{}\"];", id.index(), label)?;
            for child in self.children(id) {
                writeln!(dot, "{} -> {};", id.index(), child.index())?;
            }
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}
