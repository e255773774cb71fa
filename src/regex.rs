//! Edit engine: a regex tree together with the cursors that make successor
//! generation non-redundant.
//!
//! # Edit families
//!
//! Every successor returned by [`Regex::generate_successors`] is one atomic
//! edit away from its predecessor:
//!
//! - **substitute** (narrowing): change a literal to another alphabet symbol,
//!   or fill a fresh epsilon slot inserted into a concatenation. A node whose
//!   parent is not a concatenation is first wrapped in one so that slots next to
//!   it exist.
//! - **repeat**: wrap a node in a star, unless it already sits directly under
//!   one.
//! - **extend** (broadening): append one alternative literal per alphabet
//!   symbol to a disjunction. A node whose parent is not a disjunction is first
//!   wrapped in one.
//! - **prune** (shrink-only): remove one alternative of a disjunction, or
//!   replace a star with its child.
//!
//! # Cursors
//!
//! - `change_node`: where the last narrowing edit happened.
//! - `exp_change_node`: where the last broadening edit happened.
//! - `change_root`: root of the subtree currently being walked.
//! - `mod_range_root`: root of the region open to narrowing edits; it moves to
//!   each alternative added by an extend edit.
//!
//! A walk over the children of `change_root` resumes at the child containing
//! the relevant cursor, so that a given shape is not produced twice through
//! different sibling orders. Cursors are plain [`NodeId`]s; cloning a tree keeps
//! every id, and [`Tree::compact`] hands back the index map used to carry them
//! into a compacted successor.

use std::fmt::{Display, Formatter};

use log::debug;

use crate::node::{Kind, Node};
use crate::parser::{parse, ParseError};
use crate::tree::Tree;
use crate::types::{NodeId, Symbol, EPSILON};

#[derive(Debug, Clone)]
pub struct Regex {
    tree: Tree,
    alphabet: Vec<Symbol>,
    distance: usize,
    change_node: NodeId,
    exp_change_node: NodeId,
    change_root: NodeId,
    mod_range_root: NodeId,
    ready_to_refine: bool,
    refining_started: bool,
}

impl Regex {
    /// Parses a seed pattern.
    pub fn new(pattern: &str) -> Result<Self, ParseError> {
        Ok(Self::from_tree(parse(pattern)?))
    }

    /// Wraps an already parsed and flattened tree.
    ///
    /// The alphabet is epsilon followed by the tree's symbols in order of first
    /// appearance.
    pub fn from_tree(tree: Tree) -> Self {
        let mut alphabet = vec![EPSILON];
        alphabet.extend(tree.symbols().into_iter().filter(|&c| c != EPSILON));
        let root = tree.root();
        Self {
            tree,
            alphabet,
            distance: 0,
            change_node: root,
            exp_change_node: root,
            change_root: root,
            mod_range_root: root,
            ready_to_refine: false,
            refining_started: false,
        }
    }

    /// Appends the given symbols to the alphabet, skipping those already present.
    pub fn with_alphabet(mut self, symbols: impl IntoIterator<Item = Symbol>) -> Self {
        for c in symbols {
            if !self.alphabet.contains(&c) {
                self.alphabet.push(c);
            }
        }
        self
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn alphabet(&self) -> &[Symbol] {
        &self.alphabet
    }

    /// Number of edits applied since the seed.
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// Whether this candidate satisfied every positive test when last filtered.
    pub fn is_ready_to_refine(&self) -> bool {
        self.ready_to_refine
    }

    /// Whether this candidate's lineage has entered the prune-only phase.
    pub fn is_refining_started(&self) -> bool {
        self.refining_started
    }

    pub fn set_ready_to_refine(&mut self, ready: bool) {
        self.ready_to_refine = ready;
    }

    pub fn render(&self) -> String {
        self.tree.render()
    }

    /// All regexes one edit away from this one, in deterministic visit order.
    ///
    /// A candidate that has started refining only prunes, and produces nothing
    /// once it stops satisfying the positive tests.
    pub fn generate_successors(&self) -> Vec<Regex> {
        let mut base = self.clone();
        base.distance += 1;
        let root = base.tree.root();

        let mut successors = Vec::new();
        if !base.refining_started {
            if base.ready_to_refine {
                base.refining_started = true;
                base.change_root = root;
                successors.extend(base.prune());
                base.refining_started = false;
            }
            base.change_root = base.mod_range_root;
            successors.extend(base.substitute());
            successors.extend(base.repeat());

            base.change_root = root;
            successors.extend(base.extend());
        } else if base.ready_to_refine {
            base.change_root = root;
            successors.extend(base.prune());
        }

        debug!(
            "generate_successors({}, distance = {}) -> {} successors",
            self,
            self.distance,
            successors.len()
        );
        successors.into_iter().map(Regex::compacted).collect()
    }

    /// Rebuilds the arena, carrying every cursor through the index map.
    /// Cursors left on detached nodes fall back to the root.
    fn compacted(self) -> Regex {
        let (tree, map) = self.tree.compact();
        let root = tree.root();
        let remap = |id: NodeId| map[id.index()].unwrap_or(root);
        Regex {
            change_node: remap(self.change_node),
            exp_change_node: remap(self.exp_change_node),
            change_root: remap(self.change_root),
            mod_range_root: remap(self.mod_range_root),
            tree,
            ..self
        }
    }

    /// Points every cursor that referenced `old` at `new`.
    fn retarget(&mut self, old: NodeId, new: NodeId) {
        for cursor in [
            &mut self.change_node,
            &mut self.exp_change_node,
            &mut self.change_root,
            &mut self.mod_range_root,
        ] {
            if *cursor == old {
                *cursor = new;
            }
        }
    }

    /// Wraps `change_root` in a fresh node of the given kind and returns the
    /// wrapped (former change root) node.
    fn wrap_change_root(&mut self, kind: Kind) -> NodeId {
        let old = self.change_root;
        let wrapper = self.tree.wrap(old, kind);
        self.retarget(old, wrapper);
        old
    }

    /// Where a walk over the children of `change_root` resumes, given the
    /// cursor of the last edit of this family.
    ///
    /// `None` means the subtree was never walked (the cursor is the change root
    /// itself): the walk starts at 0 and every child counts as fresh.
    fn resume_position(&self, cursor: NodeId) -> Option<usize> {
        if self.change_root == cursor {
            None
        } else {
            Some(self.tree.child_position(self.change_root, cursor).unwrap_or(0))
        }
    }

    fn children(&self) -> Vec<NodeId> {
        self.tree.children(self.change_root).to_vec()
    }

    // ---- substitute ------------------------------------------------------

    fn substitute(&self) -> Vec<Regex> {
        match self.tree.kind(self.change_root) {
            Kind::Disjunction => self.substitute_disjunction(),
            Kind::Concatenation => self.substitute_concatenation(None),
            Kind::Star => self.substitute_star(),
            Kind::Literal => self.substitute_literal(),
        }
    }

    fn substitute_disjunction(&self) -> Vec<Regex> {
        let mut result = Vec::new();
        let resume = self.resume_position(self.change_node);
        let start = resume.unwrap_or(0);

        for (i, child) in self.children().into_iter().enumerate().skip(start) {
            if child != self.change_node {
                let mut temp = self.clone();
                temp.change_root = child;
                if i > start || resume.is_none() {
                    temp.change_node = child;
                }
                result.extend(temp.substitute());
            }
        }

        result.extend(self.substitute_in_new_concatenation());
        result
    }

    /// `enumerated` is the child whose own edits were already produced by the
    /// caller (the node that was just wrapped).
    fn substitute_concatenation(&self, enumerated: Option<NodeId>) -> Vec<Regex> {
        let mut result = Vec::new();
        let resume = self.resume_position(self.change_node);
        let start = resume.unwrap_or(0);

        // Never walked before: the slot in front of the first child comes first.
        if resume.is_none() {
            result.extend(self.substitute_inserted(0));
        }

        for (i, child) in self.children().into_iter().enumerate().skip(start) {
            if Some(child) != enumerated && child != self.change_node {
                let mut temp = self.clone();
                temp.change_root = child;
                if i != start || resume.is_none() {
                    temp.change_node = child;
                }
                result.extend(temp.substitute());
            }
            result.extend(self.substitute_inserted(i + 1));
        }

        result
    }

    fn substitute_star(&self) -> Vec<Regex> {
        let mut result = Vec::new();
        let child = self.children()[0];

        if child != self.change_node {
            let mut temp = self.clone();
            temp.change_root = child;
            if self.change_root == self.change_node {
                temp.change_node = child;
            }
            result.extend(temp.substitute());
        }

        result.extend(self.substitute_in_new_concatenation());
        result
    }

    fn substitute_literal(&self) -> Vec<Regex> {
        let mut result = Vec::new();
        let Node::Literal(current) = *self.tree.node(self.change_root) else {
            unreachable!("substitute_literal on {:?}", self.tree.kind(self.change_root));
        };

        for &c in &self.alphabet {
            if c != current {
                let mut temp = self.clone();
                temp.tree.set_symbol(temp.change_root, c);
                temp.change_node = temp.change_root;
                result.push(temp);
            }
        }

        result.extend(self.substitute_in_new_concatenation());
        result
    }

    /// Inserts an epsilon slot at `index` of the change root (a concatenation)
    /// and substitutes it.
    fn substitute_inserted(&self, index: usize) -> Vec<Regex> {
        let mut temp = self.clone();
        let slot = temp.tree.insert_child(temp.change_root, index, Node::Literal(EPSILON));
        temp.change_root = slot;
        temp.change_node = slot;
        temp.substitute_literal()
    }

    fn substitute_in_new_concatenation(&self) -> Vec<Regex> {
        if self.tree.parent_is(self.change_root, Kind::Concatenation) {
            return Vec::new();
        }
        let mut temp = self.clone();
        let wrapped = temp.wrap_change_root(Kind::Concatenation);
        temp.substitute_concatenation(Some(wrapped))
    }

    // ---- repeat ----------------------------------------------------------

    fn repeat(&self) -> Vec<Regex> {
        match self.tree.node(self.change_root) {
            Node::Disjunction(_) | Node::Concatenation(_) => self.repeat_children(),
            Node::Star(_) => Vec::new(),
            // Epsilon is its own star.
            node if node.is_epsilon() => Vec::new(),
            Node::Literal(_) => self.repeat_in_new_star().into_iter().collect(),
        }
    }

    fn repeat_children(&self) -> Vec<Regex> {
        let mut result = Vec::new();
        let resume = self.resume_position(self.change_node);
        let start = resume.unwrap_or(0);

        for (i, child) in self.children().into_iter().enumerate().skip(start) {
            let mut temp = self.clone();
            temp.change_root = child;
            if i != start || resume.is_none() {
                temp.change_node = child;
            }
            result.extend(temp.repeat());
        }

        result.extend(self.repeat_in_new_star());
        result
    }

    fn repeat_in_new_star(&self) -> Option<Regex> {
        if self.tree.parent_is(self.change_root, Kind::Star) {
            return None;
        }
        let mut temp = self.clone();
        temp.wrap_change_root(Kind::Star);
        Some(temp)
    }

    // ---- extend ----------------------------------------------------------

    fn extend(&self) -> Vec<Regex> {
        match self.tree.kind(self.change_root) {
            Kind::Disjunction => self.extend_disjunction(None),
            Kind::Concatenation => self.extend_concatenation(),
            Kind::Star => self.extend_star(),
            Kind::Literal => self.extend_in_new_disjunction(),
        }
    }

    fn extend_disjunction(&self, enumerated: Option<NodeId>) -> Vec<Regex> {
        let mut result = Vec::new();
        let resume = self.resume_position(self.exp_change_node);
        let start = resume.unwrap_or(0);

        for (i, child) in self.children().into_iter().enumerate().skip(start) {
            if Some(child) != enumerated {
                let mut temp = self.clone();
                temp.change_root = child;
                if i != start || resume.is_none() {
                    temp.exp_change_node = child;
                }
                result.extend(temp.extend());
            }
        }

        for &c in &self.alphabet {
            let mut temp = self.clone();
            let alternative = temp.tree.push_child(temp.change_root, Node::Literal(c));
            temp.mod_range_root = alternative;
            temp.change_node = alternative;
            temp.exp_change_node = alternative;
            result.push(temp);
        }

        result
    }

    fn extend_concatenation(&self) -> Vec<Regex> {
        let mut result = Vec::new();
        let resume = self.resume_position(self.exp_change_node);
        let start = resume.unwrap_or(0);

        for (i, child) in self.children().into_iter().enumerate().skip(start) {
            let mut temp = self.clone();
            temp.change_root = child;
            if i != start || resume.is_none() {
                temp.exp_change_node = child;
            }
            result.extend(temp.extend());
        }

        result.extend(self.extend_in_new_disjunction());
        result
    }

    fn extend_star(&self) -> Vec<Regex> {
        let mut result = Vec::new();
        let child = self.children()[0];

        let mut temp = self.clone();
        temp.change_root = child;
        if self.change_root == self.exp_change_node {
            temp.exp_change_node = child;
        }
        result.extend(temp.extend());

        result.extend(self.extend_in_new_disjunction());
        result
    }

    fn extend_in_new_disjunction(&self) -> Vec<Regex> {
        if self.tree.parent_is(self.change_root, Kind::Disjunction) {
            return Vec::new();
        }
        let mut temp = self.clone();
        let wrapped = temp.wrap_change_root(Kind::Disjunction);
        temp.extend_disjunction(Some(wrapped))
    }

    // ---- prune -----------------------------------------------------------

    fn prune(&self) -> Vec<Regex> {
        let mut result = Vec::new();
        match self.tree.kind(self.change_root) {
            Kind::Disjunction => {
                // Each removal starts from a fresh copy, so later indices are
                // unaffected by earlier removals.
                for (i, alternative) in self.children().into_iter().enumerate() {
                    let mut temp = self.clone();
                    temp.change_root = alternative;
                    result.extend(temp.prune());
                    temp.tree.remove_child(self.change_root, i);
                    result.push(temp);
                }
            }
            Kind::Concatenation => {
                for child in self.children() {
                    let mut temp = self.clone();
                    temp.change_root = child;
                    result.extend(temp.prune());
                }
            }
            Kind::Star => {
                let child = self.children()[0];

                let mut temp = self.clone();
                temp.change_root = child;
                result.extend(temp.prune());

                let mut temp = self.clone();
                temp.tree.replace(self.change_root, child);
                temp.retarget(self.change_root, child);
                result.push(temp);
            }
            Kind::Literal => {}
        }
        result
    }
}

impl Display for Regex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tree)
    }
}
