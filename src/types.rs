//! Type-safe wrappers for tree nodes and alphabet symbols.
//!
//! This module provides the newtype index used to address nodes inside a
//! [`Tree`][crate::tree::Tree] arena, and the reserved symbols shared by the
//! parser, the renderer and the automaton layer.
use std::fmt;

/// An alphabet symbol.
pub type Symbol = char;

/// The reserved epsilon sentinel.
///
/// A `Literal(EPSILON)` matches the empty word. The sentinel can be written
/// directly in input patterns.
pub const EPSILON: Symbol = 'ε';

pub const ALTERNATION: char = '|';
pub const STAR: char = '*';
pub const OPEN_GROUP: char = '(';
pub const CLOSE_GROUP: char = ')';

/// Characters with syntactic meaning, which can never be alphabet symbols.
pub const OPERATORS: [char; 4] = [ALTERNATION, STAR, OPEN_GROUP, CLOSE_GROUP];

/// Returns `true` if `c` may appear as a literal symbol (epsilon included).
pub fn is_symbol(c: char) -> bool {
    !OPERATORS.contains(&c)
}

/// An index into a [`Tree`][crate::tree::Tree] arena (0-indexed).
///
/// Node IDs are stable for the lifetime of one tree: cloning a tree keeps
/// every ID, and only [`Tree::compact`][crate::tree::Tree::compact] renumbers
/// them (returning the old-to-new mapping).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Creates a node ID from a raw arena index.
    pub const fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Returns the raw arena index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0
    }
}
