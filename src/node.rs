use crate::types::{NodeId, Symbol, EPSILON};

/// A node of the edit tree.
///
/// Children are addressed by [`NodeId`] inside the owning
/// [`Tree`][crate::tree::Tree]; a node never appears under two parents.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Node {
    /// A single symbol, or [`EPSILON`].
    Literal(Symbol),
    /// Juxtaposition of the children, in order.
    Concatenation(Vec<NodeId>),
    /// Alternation between the children. No children denotes the empty language.
    Disjunction(Vec<NodeId>),
    /// Kleene star of the single child.
    Star(NodeId),
}

/// Discriminant of [`Node`], used when an edit wraps a node in a fresh parent.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kind {
    Literal,
    Concatenation,
    Disjunction,
    Star,
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Node::Literal(_) => Kind::Literal,
            Node::Concatenation(_) => Kind::Concatenation,
            Node::Disjunction(_) => Kind::Disjunction,
            Node::Star(_) => Kind::Star,
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Node::Literal(c) if *c == EPSILON)
    }

    /// Child count for `Concatenation`/`Disjunction`, 0 otherwise.
    ///
    /// Only decides parenthesization; this is not a size metric.
    pub fn breadth(&self) -> usize {
        match self {
            Node::Literal(_) | Node::Star(_) => 0,
            Node::Concatenation(children) | Node::Disjunction(children) => children.len(),
        }
    }

    /// Ordered children (the `Star` child as a one-element slice).
    pub fn children(&self) -> &[NodeId] {
        match self {
            Node::Literal(_) => &[],
            Node::Concatenation(children) | Node::Disjunction(children) => children,
            Node::Star(child) => std::slice::from_ref(child),
        }
    }

    pub(crate) fn children_mut(&mut self) -> &mut [NodeId] {
        match self {
            Node::Literal(_) => &mut [],
            Node::Concatenation(children) | Node::Disjunction(children) => children,
            Node::Star(child) => std::slice::from_mut(child),
        }
    }
}
