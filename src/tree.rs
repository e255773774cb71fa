//! Arena-backed edit tree.
//!
//! A [`Tree`] owns all of its nodes in a single vector and addresses them with
//! [`NodeId`] indices. Every slot stores the node together with a back-reference
//! to its parent, which is used only for upward walks during edit bookkeeping.
//!
//! Edits never free slots: a node detached by an edit stays in the arena until
//! [`Tree::compact`] rebuilds the tree from the root, returning the old-to-new
//! index map so that callers can carry their own cursors across.

use std::fmt::{Display, Formatter};

use crate::node::{Kind, Node};
use crate::types::{NodeId, Symbol, ALTERNATION, CLOSE_GROUP, EPSILON, OPEN_GROUP, STAR};

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct Tree {
    slots: Vec<Slot>,
    root: NodeId,
}

impl Tree {
    /// Creates an empty arena whose root is set by the first [`Tree::alloc`]
    /// followed by [`Tree::set_root`].
    pub(crate) fn empty() -> Self {
        Self {
            slots: Vec::new(),
            root: NodeId::new(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        self.root = id;
        self.slots[id.index()].parent = None;
    }

    /// Number of arena slots, detached ones included.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.slots[id.index()].node
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.slots[id.index()].node
    }

    pub fn kind(&self, id: NodeId) -> Kind {
        self.node(id).kind()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    pub fn breadth(&self, id: NodeId) -> usize {
        self.node(id).breadth()
    }

    pub fn symbol(&self, id: NodeId) -> Option<Symbol> {
        match self.node(id) {
            Node::Literal(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns `true` if the parent of `id` exists and has the given kind.
    pub fn parent_is(&self, id: NodeId, kind: Kind) -> bool {
        self.parent(id).is_some_and(|p| self.kind(p) == kind)
    }

    /// Allocates a new slot and adopts the children of `node`.
    pub fn alloc(&mut self, node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId::new(self.slots.len());
        let children = node.children().to_vec();
        self.slots.push(Slot { node, parent });
        for child in children {
            self.set_parent(child, Some(id));
        }
        id
    }

    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.slots[id.index()].parent = parent;
    }

    pub fn set_symbol(&mut self, id: NodeId, symbol: Symbol) {
        match self.node_mut(id) {
            Node::Literal(c) => *c = symbol,
            other => panic!("set_symbol on non-literal node {:?}", other.kind()),
        }
    }

    /// Replaces the child pointer `old` of `parent` with `new`.
    ///
    /// The new child's parent back-reference is set to `parent`; `old` is left
    /// with its back-reference untouched.
    pub fn splice_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        let slot = self
            .node_mut(parent)
            .children_mut()
            .iter_mut()
            .find(|c| **c == old)
            .unwrap_or_else(|| panic!("{} is not a child of {}", old, parent));
        *slot = new;
        self.set_parent(new, Some(parent));
    }

    /// Puts `new` in the place of `old`, which may be the root.
    pub fn replace(&mut self, old: NodeId, new: NodeId) {
        match self.parent(old) {
            Some(parent) => self.splice_child(parent, old, new),
            None => self.set_root(new),
        }
    }

    /// Wraps `id` in a fresh parent of the given kind and returns the wrapper.
    ///
    /// The wrapper takes the place of `id` under its former parent.
    pub fn wrap(&mut self, id: NodeId, kind: Kind) -> NodeId {
        let parent = self.parent(id);
        let node = match kind {
            Kind::Concatenation => Node::Concatenation(vec![id]),
            Kind::Disjunction => Node::Disjunction(vec![id]),
            Kind::Star => Node::Star(id),
            Kind::Literal => panic!("a literal cannot wrap {}", id),
        };
        let wrapper = self.alloc(node, parent);
        match parent {
            Some(parent) => self.splice_child(parent, id, wrapper),
            None => self.set_root(wrapper),
        }
        wrapper
    }

    /// Inserts a new child at `index` of a `Concatenation` or `Disjunction`.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, node: Node) -> NodeId {
        let id = self.alloc(node, Some(parent));
        match self.node_mut(parent) {
            Node::Concatenation(children) | Node::Disjunction(children) => children.insert(index, id),
            other => panic!("cannot insert into {:?}", other.kind()),
        }
        id
    }

    /// Appends a new child to a `Concatenation` or `Disjunction`.
    pub fn push_child(&mut self, parent: NodeId, node: Node) -> NodeId {
        let index = self.breadth(parent);
        self.insert_child(parent, index, node)
    }

    /// Detaches the child at `index` and returns it.
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> NodeId {
        let removed = match self.node_mut(parent) {
            Node::Concatenation(children) | Node::Disjunction(children) => children.remove(index),
            other => panic!("cannot remove from {:?}", other.kind()),
        };
        self.set_parent(removed, None);
        removed
    }

    /// Position, among the children of `ancestor`, of the child whose subtree
    /// contains `descendant`.
    ///
    /// Returns `None` when `descendant` is `ancestor` itself or lies outside
    /// its subtree.
    pub fn child_position(&self, ancestor: NodeId, descendant: NodeId) -> Option<usize> {
        let mut child = descendant;
        loop {
            let parent = self.parent(child)?;
            if parent == ancestor {
                return self.children(ancestor).iter().position(|&c| c == child);
            }
            child = parent;
        }
    }

    /// All nodes reachable from the root, parents before children, siblings
    /// left to right.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }

    /// Distinct literal symbols in order of first appearance.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols = Vec::new();
        for id in self.preorder() {
            if let Some(c) = self.symbol(id) {
                if !symbols.contains(&c) {
                    symbols.push(c);
                }
            }
        }
        symbols
    }

    /// Number of nodes reachable from the root.
    pub fn size(&self) -> usize {
        self.preorder().len()
    }

    /// Associativity normalization: splices a `Disjunction` child of a
    /// `Disjunction` (and a `Concatenation` child of a `Concatenation`) into
    /// its parent, and collapses `Star` directly over `Star`.
    ///
    /// Spliced-out nodes stay in the arena as detached slots.
    pub fn flatten(&mut self) {
        self.flatten_at(self.root);
    }

    fn flatten_at(&mut self, id: NodeId) {
        for child in self.children(id).to_vec() {
            self.flatten_at(child);
        }
        let kind = self.kind(id);
        match kind {
            Kind::Concatenation | Kind::Disjunction => {
                let mut flat = Vec::new();
                for child in self.children(id).to_vec() {
                    if self.kind(child) == kind {
                        for grandchild in self.children(child).to_vec() {
                            self.set_parent(grandchild, Some(id));
                            flat.push(grandchild);
                        }
                        self.set_parent(child, None);
                    } else {
                        flat.push(child);
                    }
                }
                match self.node_mut(id) {
                    Node::Concatenation(children) | Node::Disjunction(children) => *children = flat,
                    _ => unreachable!(),
                }
            }
            Kind::Star => {
                let child = self.children(id)[0];
                if let Node::Star(grandchild) = *self.node(child) {
                    *self.node_mut(id) = Node::Star(grandchild);
                    self.set_parent(grandchild, Some(id));
                    self.set_parent(child, None);
                }
            }
            Kind::Literal => {}
        }
    }

    /// Rebuilds the arena with only the nodes reachable from the root,
    /// numbered in preorder.
    ///
    /// Returns the new tree and the map from old indices to new ones
    /// (`None` for detached slots).
    pub fn compact(&self) -> (Tree, Vec<Option<NodeId>>) {
        let order = self.preorder();
        let mut map = vec![None; self.slots.len()];
        for (i, old) in order.iter().enumerate() {
            map[old.index()] = Some(NodeId::new(i));
        }
        let slots = order
            .iter()
            .map(|old| {
                let slot = &self.slots[old.index()];
                let mut node = slot.node.clone();
                for child in node.children_mut() {
                    *child = map[child.index()].expect("children of reachable nodes are reachable");
                }
                Slot {
                    node,
                    parent: slot.parent.and_then(|p| map[p.index()]),
                }
            })
            .collect();
        let tree = Tree {
            slots,
            root: NodeId::new(0),
        };
        (tree, map)
    }

    /// Canonical rendering, with epsilon shown as [`EPSILON`].
    pub fn render(&self) -> String {
        let mut buf = [0u8; 4];
        self.render_with(EPSILON.encode_utf8(&mut buf))
    }

    /// Canonical rendering, with epsilon shown as the given text.
    pub fn render_with(&self, epsilon: &str) -> String {
        let mut out = String::new();
        self.write_node(self.root, epsilon, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, epsilon: &str, out: &mut String) {
        match self.node(id) {
            node if node.is_epsilon() => out.push_str(epsilon),
            Node::Literal(c) => out.push(*c),
            Node::Disjunction(children) => {
                for (i, &child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push(ALTERNATION);
                    }
                    self.write_node(child, epsilon, out);
                }
            }
            Node::Concatenation(children) => {
                for &child in children {
                    self.write_grouped(child, epsilon, out);
                }
            }
            Node::Star(child) => {
                self.write_grouped(*child, epsilon, out);
                out.push(STAR);
            }
        }
    }

    fn write_grouped(&self, id: NodeId, epsilon: &str, out: &mut String) {
        if self.breadth(id) > 1 {
            out.push(OPEN_GROUP);
            self.write_node(id, epsilon, out);
            out.push(CLOSE_GROUP);
        } else {
            self.write_node(id, epsilon, out);
        }
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn concat_ab() -> Tree {
        let mut tree = Tree::empty();
        let a = tree.alloc(Node::Literal('a'), None);
        let b = tree.alloc(Node::Literal('b'), None);
        let root = tree.alloc(Node::Concatenation(vec![a, b]), None);
        tree.set_root(root);
        tree
    }

    #[test]
    fn test_alloc_adopts_children() {
        let tree = concat_ab();
        let root = tree.root();
        for &child in tree.children(root) {
            assert_eq!(tree.parent(child), Some(root));
        }
        assert_eq!(tree.render(), "ab");
    }

    #[test]
    fn test_render_parenthesization() {
        let mut tree = concat_ab();
        let ab = tree.root();
        let star = tree.wrap(ab, Kind::Star);
        assert_eq!(tree.root(), star);
        assert_eq!(tree.render(), "(ab)*");

        let alt = tree.wrap(star, Kind::Disjunction);
        tree.push_child(alt, Node::Literal('c'));
        assert_eq!(tree.render(), "(ab)*|c");

        let cat = tree.wrap(alt, Kind::Concatenation);
        tree.push_child(cat, Node::Literal(EPSILON));
        assert_eq!(tree.render(), "((ab)*|c)ε");
        assert_eq!(tree.render_with("()"), "((ab)*|c)()");
    }

    #[test]
    fn test_wrap_keeps_parent_links() {
        let mut tree = concat_ab();
        let b = tree.children(tree.root())[1];
        let star = tree.wrap(b, Kind::Star);
        assert_eq!(tree.parent(star), Some(tree.root()));
        assert_eq!(tree.parent(b), Some(star));
        assert_eq!(tree.children(tree.root())[1], star);
        assert_eq!(tree.render(), "ab*");
    }

    #[test]
    fn test_splice_child() {
        let mut tree = concat_ab();
        let root = tree.root();
        let a = tree.children(root)[0];
        let c = tree.alloc(Node::Literal('c'), None);
        tree.splice_child(root, a, c);
        assert_eq!(tree.parent(c), Some(root));
        assert_eq!(tree.render(), "cb");
    }

    #[test]
    fn test_remove_and_compact() {
        let mut tree = concat_ab();
        let root = tree.root();
        let alt = tree.wrap(root, Kind::Disjunction);
        tree.push_child(alt, Node::Literal('c'));
        tree.push_child(alt, Node::Literal('d'));
        assert_eq!(tree.render(), "ab|c|d");

        let removed = tree.remove_child(alt, 1);
        assert_eq!(tree.parent(removed), None);
        assert_eq!(tree.render(), "ab|d");

        let (compact, map) = tree.compact();
        assert_eq!(compact.render(), "ab|d");
        assert_eq!(compact.capacity(), compact.size());
        assert_eq!(map[removed.index()], None);
        assert_eq!(map[alt.index()], Some(compact.root()));
        for id in compact.preorder() {
            for &child in compact.children(id) {
                assert_eq!(compact.parent(child), Some(id));
            }
        }
    }

    #[test]
    fn test_child_position() {
        let mut tree = concat_ab();
        let root = tree.root();
        let b = tree.children(root)[1];
        let star = tree.wrap(b, Kind::Star);
        assert_eq!(tree.child_position(root, b), Some(1));
        assert_eq!(tree.child_position(root, star), Some(1));
        assert_eq!(tree.child_position(root, root), None);
        assert_eq!(tree.child_position(star, tree.children(root)[0]), None);
    }

    #[test]
    fn test_flatten() {
        // ((a|b)|c) . (d . e) under a double star
        let mut tree = Tree::empty();
        let a = tree.alloc(Node::Literal('a'), None);
        let b = tree.alloc(Node::Literal('b'), None);
        let ab = tree.alloc(Node::Disjunction(vec![a, b]), None);
        let c = tree.alloc(Node::Literal('c'), None);
        let abc = tree.alloc(Node::Disjunction(vec![ab, c]), None);
        let d = tree.alloc(Node::Literal('d'), None);
        let e = tree.alloc(Node::Literal('e'), None);
        let de = tree.alloc(Node::Concatenation(vec![d, e]), None);
        let cat = tree.alloc(Node::Concatenation(vec![abc, de]), None);
        let star = tree.alloc(Node::Star(cat), None);
        let star2 = tree.alloc(Node::Star(star), None);
        tree.set_root(star2);

        tree.flatten();
        assert_eq!(tree.children(abc), &[a, b, c]);
        assert_eq!(tree.children(cat), &[abc, d, e]);
        assert_eq!(tree.children(star2), &[cat]);
        assert_eq!(tree.parent(a), Some(abc));
        assert_eq!(tree.parent(d), Some(cat));
        assert_eq!(tree.parent(cat), Some(star2));
        assert_eq!(tree.render(), "((a|b|c)de)*");
    }

    #[test]
    fn test_symbols_in_order() {
        let mut tree = concat_ab();
        let alt = tree.wrap(tree.root(), Kind::Disjunction);
        tree.push_child(alt, Node::Literal('a'));
        tree.push_child(alt, Node::Literal('c'));
        assert_eq!(tree.symbols(), vec!['a', 'b', 'c']);
    }
}
