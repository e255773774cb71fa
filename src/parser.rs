//! Pattern parser: converts a pattern string into a flattened [`Tree`].
//!
//! Grammar:
//!
//! ```text
//! Regex         ::= Disjunction
//! Disjunction   ::= Concatenation ('|' Concatenation)*
//! Concatenation ::= Repetition*
//! Repetition    ::= Atom '*'*
//! Atom          ::= symbol | '(' Regex ')'
//! ```
//!
//! An empty concatenation (as in `()`, `a|` or the empty pattern) is read as
//! [`EPSILON`], which can also be written directly.

use std::fmt::{Display, Formatter};

use crate::node::Node;
use crate::tree::Tree;
use crate::types::{is_symbol, NodeId, ALTERNATION, CLOSE_GROUP, EPSILON, OPEN_GROUP, STAR};

/// Error type for malformed patterns. Positions are character offsets.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum ParseError {
    /// An opening parenthesis that is never closed.
    UnclosedGroup { position: usize },
    /// A closing parenthesis without a matching opening one.
    UnmatchedClose { position: usize },
    /// A `*` with nothing to repeat.
    DanglingStar { position: usize },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnclosedGroup { position } => {
                write!(f, "Unclosed '(' at position {}", position)
            }
            ParseError::UnmatchedClose { position } => {
                write!(f, "Unmatched ')' at position {}", position)
            }
            ParseError::DanglingStar { position } => {
                write!(f, "Nothing to repeat before '*' at position {}", position)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Parses `pattern` and applies the flattening normalization.
pub fn parse(pattern: &str) -> Result<Tree, ParseError> {
    let mut parser = Parser::new(pattern);
    let root = parser.parse_disjunction()?;
    if let Some(c) = parser.peek() {
        debug_assert_eq!(c, CLOSE_GROUP);
        return Err(ParseError::UnmatchedClose { position: parser.pos });
    }

    let mut tree = parser.tree;
    tree.set_root(root);
    tree.flatten();
    let (tree, _) = tree.compact();
    Ok(tree)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    tree: Tree,
}

impl Parser {
    fn new(pattern: &str) -> Self {
        Parser {
            chars: pattern.chars().collect(),
            pos: 0,
            tree: Tree::empty(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek();
        if ch.is_some() {
            self.pos += 1;
        }
        ch
    }

    /// Parse alternation: `a|b|c`
    fn parse_disjunction(&mut self) -> Result<NodeId, ParseError> {
        let mut branches = vec![self.parse_concatenation()?];
        while self.peek() == Some(ALTERNATION) {
            self.advance();
            branches.push(self.parse_concatenation()?);
        }
        if branches.len() == 1 {
            Ok(branches[0])
        } else {
            Ok(self.tree.alloc(Node::Disjunction(branches), None))
        }
    }

    /// Parse concatenation: `abc`
    fn parse_concatenation(&mut self) -> Result<NodeId, ParseError> {
        let mut items = Vec::new();
        while let Some(ch) = self.peek() {
            if ch == CLOSE_GROUP || ch == ALTERNATION {
                break;
            }
            items.push(self.parse_repetition()?);
        }
        match items.len() {
            0 => Ok(self.tree.alloc(Node::Literal(EPSILON), None)),
            1 => Ok(items[0]),
            _ => Ok(self.tree.alloc(Node::Concatenation(items), None)),
        }
    }

    /// Parse an atom followed by any number of stars.
    fn parse_repetition(&mut self) -> Result<NodeId, ParseError> {
        let mut node = self.parse_atom()?;
        while self.peek() == Some(STAR) {
            self.advance();
            node = self.tree.alloc(Node::Star(node), None);
        }
        Ok(node)
    }

    fn parse_atom(&mut self) -> Result<NodeId, ParseError> {
        let position = self.pos;
        match self.advance() {
            Some(ch) if is_symbol(ch) => Ok(self.tree.alloc(Node::Literal(ch), None)),
            Some(OPEN_GROUP) => {
                let inner = self.parse_disjunction()?;
                match self.advance() {
                    Some(CLOSE_GROUP) => Ok(inner),
                    _ => Err(ParseError::UnclosedGroup { position }),
                }
            }
            Some(STAR) => Err(ParseError::DanglingStar { position }),
            Some(ch) => unreachable!("{:?} ends a concatenation before reaching an atom", ch),
            None => unreachable!("parse_atom is only called with input remaining"),
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::node::Kind;

    #[test]
    fn test_literals() {
        assert_eq!(parse("a").unwrap().render(), "a");
        assert_eq!(parse("abc").unwrap().render(), "abc");
        assert_eq!(parse("").unwrap().render(), "ε");
        assert_eq!(parse("()").unwrap().render(), "ε");
        assert_eq!(parse("aε").unwrap().render(), "aε");
    }

    #[test]
    fn test_precedence() {
        let tree = parse("ab|c*").unwrap();
        assert_eq!(tree.kind(tree.root()), Kind::Disjunction);
        assert_eq!(tree.render(), "ab|c*");

        let tree = parse("(ab)*c").unwrap();
        assert_eq!(tree.kind(tree.root()), Kind::Concatenation);
        assert_eq!(tree.render(), "(ab)*c");

        assert_eq!(parse("a(b|c)").unwrap().render(), "a(b|c)");
        assert_eq!(parse("a|").unwrap().render(), "a|ε");
    }

    #[test]
    fn test_flattening_on_parse() {
        assert_eq!(parse("(a|b)|c").unwrap().render(), "a|b|c");
        assert_eq!(parse("(ab)c").unwrap().render(), "abc");
        assert_eq!(parse("a**").unwrap().render(), "a*");
        assert_eq!(parse("((a)*)*").unwrap().render(), "a*");

        let tree = parse("a(bc)d").unwrap();
        assert_eq!(tree.breadth(tree.root()), 4);
        assert_eq!(tree.capacity(), tree.size());
    }

    #[test]
    fn test_any_non_operator_is_a_literal() {
        for c in ['z', '.', ' ', '+', '?', '[', EPSILON] {
            assert!(is_symbol(c));
            let tree = parse(&c.to_string()).unwrap();
            assert_eq!(tree.symbol(tree.root()), Some(c));
        }
        assert_eq!(parse("a.b").unwrap().symbols(), vec!['a', '.', 'b']);
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse("(ab").err(), Some(ParseError::UnclosedGroup { position: 0 }));
        assert_eq!(parse("a(b(c)").err(), Some(ParseError::UnclosedGroup { position: 1 }));
        assert_eq!(parse("ab)").err(), Some(ParseError::UnmatchedClose { position: 2 }));
        assert_eq!(parse("*a").err(), Some(ParseError::DanglingStar { position: 0 }));
        assert_eq!(parse("a|*").err(), Some(ParseError::DanglingStar { position: 2 }));
    }

    #[test]
    fn test_error_display() {
        let err = parse("(a").unwrap_err();
        assert_eq!(err.to_string(), "Unclosed '(' at position 0");
    }
}
