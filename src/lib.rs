//! # regex-repair: minimum-edit repair of regular expressions
//!
//! **`regex-repair`** searches for the smallest structural edit of a *seed* regular expression
//! that makes it denote exactly the same language as a *target* regular expression.
//!
//! ## How it works
//!
//! A regex is kept as a syntax tree ([`tree::Tree`]) over four node kinds: literals
//! (including the empty string `ε`), concatenation, disjunction and Kleene star.
//! The edit engine ([`regex::Regex`]) produces every tree one atomic edit away:
//!
//! - **substitute** a literal, or fill a fresh slot in a concatenation,
//! - **repeat** a subtree under a star,
//! - **extend** a disjunction with a new literal alternative,
//! - **prune** an alternative or unwrap a star, once a candidate accepts every known positive string.
//!
//! The search driver ([`enumerator::Enumerator`]) explores candidates breadth-first, so the
//! first answer is at minimum distance among the trees reachable through these edits.
//! Each candidate is first checked against a set of test strings ([`witness::TestSuite`]),
//! seeded from the Myhill–Nerode classes of the target's minimal automaton.
//! Candidates that pass are checked exactly by the [`oracle::Oracle`], which compares
//! minimal DFAs and returns a shortest counterexample on failure. Counterexamples
//! become new test strings.
//!
//! ## Pattern syntax
//!
//! `|` is alternation, `*` is Kleene star, parentheses group, and `ε` (or an empty group)
//! is the empty string. Every other character is a literal symbol.
//!
//! ## Basic Usage
//!
//! ```rust
//! use regex_repair::enumerator::{Enumerator, SearchConfig};
//!
//! // Repair "a" so that it also accepts any number of b's.
//! let mut search = Enumerator::new("a", "(a|b)*")
//!     .unwrap()
//!     .with_config(SearchConfig::default().with_max_distance(3));
//!
//! let answer = search.next_validated().unwrap();
//! assert_eq!(answer.render(), "(a|b)*");
//! assert_eq!(answer.distance(), 2);
//! ```
//!
//! ## Core Components
//!
//! - **[`regex`]**: The edit engine and its successor generation.
//! - **[`enumerator`]**: The breadth-first search driver.
//! - **[`oracle`]**, **[`dfa`]**, **[`nfa`]**: Automata and the exact equivalence check.
//! - **[`witness`]**: Test strings for the cheap syntactic filter.
//! - **[`dot`]**: Graphviz export of automata and trees.

pub mod dfa;
pub mod dot;
pub mod enumerator;
pub mod nfa;
pub mod node;
pub mod oracle;
pub mod parser;
pub mod regex;
pub mod tree;
pub mod types;
pub mod witness;
