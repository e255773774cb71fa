//! Language equivalence oracle.
//!
//! The [`Oracle`] compiles patterns and trees into minimal [`Dfa`]s over a
//! fixed alphabet and decides equivalence, producing a shortest
//! counterexample word when two languages differ.

use log::debug;

use crate::dfa::Dfa;
use crate::nfa::Nfa;
use crate::parser::{parse, ParseError};
use crate::tree::Tree;
use crate::types::{Symbol, EPSILON};

/// Outcome of comparing a candidate against the target language.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Verdict {
    Equivalent,
    /// A word the target accepts and the candidate rejects.
    Missing(String),
    /// A word the candidate accepts and the target rejects.
    Extra(String),
}

impl Verdict {
    pub fn is_equivalent(&self) -> bool {
        matches!(self, Verdict::Equivalent)
    }
}

#[derive(Debug, Clone)]
pub struct Oracle {
    alphabet: Vec<Symbol>,
}

impl Oracle {
    /// Creates an oracle over `symbols`, ignoring epsilon and duplicates.
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let mut alphabet = Vec::new();
        for c in symbols {
            if c != EPSILON && !alphabet.contains(&c) {
                alphabet.push(c);
            }
        }
        Oracle { alphabet }
    }

    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    pub fn compile(&self, pattern: &str) -> Result<Dfa, ParseError> {
        Ok(self.compile_tree(&parse(pattern)?))
    }

    /// Minimal DFA for the language of `tree`.
    pub fn compile_tree(&self, tree: &Tree) -> Dfa {
        Dfa::from_nfa(&Nfa::from_tree(tree), &self.alphabet).minimize()
    }

    /// Compares `candidate` against `target`. Missing words are reported
    /// before extra ones.
    pub fn check(&self, target: &Dfa, candidate: &Dfa) -> Verdict {
        if let Some(word) = target.difference(candidate).shortest_accepted() {
            debug!("check: missing {:?}", word);
            return Verdict::Missing(word);
        }
        if let Some(word) = candidate.difference(target).shortest_accepted() {
            debug!("check: extra {:?}", word);
            return Verdict::Extra(word);
        }
        Verdict::Equivalent
    }

    pub fn equivalent(&self, a: &Dfa, b: &Dfa) -> bool {
        self.check(a, b).is_equivalent()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn oracle() -> Oracle {
        Oracle::new("ab".chars())
    }

    #[test]
    fn test_alphabet() {
        let o = Oracle::new(['ε', 'b', 'a', 'b']);
        assert_eq!(o.alphabet(), &['b', 'a']);
    }

    #[test]
    fn test_check_missing() {
        let o = oracle();
        let a = o.compile("a").unwrap();
        let b = o.compile("b").unwrap();
        assert_eq!(o.check(&a, &b), Verdict::Missing("a".to_string()));

        let ab = o.compile("a|b").unwrap();
        assert_eq!(o.check(&ab, &a), Verdict::Missing("b".to_string()));
    }

    #[test]
    fn test_check_extra() {
        let o = oracle();
        let a = o.compile("a").unwrap();
        let ab = o.compile("a|b").unwrap();
        assert_eq!(o.check(&a, &ab), Verdict::Extra("b".to_string()));

        let star = o.compile("a*").unwrap();
        let plus = o.compile("aa*").unwrap();
        assert_eq!(o.check(&plus, &star), Verdict::Extra("".to_string()));
    }

    #[test]
    fn test_equivalent() {
        let o = oracle();
        for (x, y) in [
            ("(a|b)*", "(a*b*)*"),
            ("a|b", "b|a"),
            ("aε", "a"),
            ("(a*)*", "a*"),
            ("ab|aa", "a(b|a)"),
        ] {
            let x = o.compile(x).unwrap();
            let y = o.compile(y).unwrap();
            assert!(o.equivalent(&x, &y));
        }
    }

    #[test]
    fn test_render_preserves_language() {
        let o = oracle();
        for pattern in ["(ab)*|b", "a(b|ε)*", "((a|b)a)*b", "ε"] {
            let tree = parse(pattern).unwrap();
            let reparsed = parse(&tree.render()).unwrap();
            assert!(o.equivalent(&o.compile_tree(&tree), &o.compile_tree(&reparsed)), "{}", pattern);
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(oracle().compile("(a").is_err());
    }
}
