/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! The tree engine.
//!
//! This module contains the tree structure itself and the structural
//! primitives (linking, rotation, propagation update) shared by all write
//! paths. The write paths are split into sub-modules by concern:
//!
//! - [`insert`]: insertion and red-violation repair
//! - [`erase`]: detachment and black-deficiency repair
//! - [`find`]: ordered search, bounds, and order statistics
//! - [`split_join`]: whole-tree split and join
//! - [`splice`]: moving single nodes between trees
//! - [`invariants`]: the structural self-check used as a test oracle

mod erase;
mod find;
mod insert;
mod invariants;
mod splice;
mod split_join;

use crate::aggregate::{Aggregate, NodeContext};
use crate::arena::{NodeArena, NodeKey};
use crate::cursor::Cursor;
use crate::filter::FilterNode;
use crate::node::{LEFT, Link, Node, RIGHT, Side};

/// An ordered map on a self-balancing binary search tree, augmented with
/// caller-defined per-node aggregates.
///
/// Balance is maintained with the red-black discipline: no red node has a
/// red parent, and every path from the root to a missing child passes the
/// same number of black nodes. Both are restored after every mutation with
/// a bounded number of rotations and recolorings, and the black-height is
/// tracked incrementally because the join algorithm needs it.
///
/// # Storage
///
/// All nodes live in a generational arena owned by the tree; links between
/// nodes are tagged indices rather than pointers, and "no child" / "end" are
/// link tags rather than sentinel allocations. A [`Cursor`] wraps such an
/// index: it stays valid until its element is erased or moved to another
/// tree, after which use is detected by the generation check and panics.
///
/// # Duplicate keys
///
/// Whether equal keys may coexist is chosen at construction time. In a
/// multi-key tree, inserting an equal key places it after all existing
/// equals.
#[derive(Debug, Clone)]
pub struct RedBlackTree<K, V = (), A = ()> {
    pub(crate) nodes: NodeArena<Node<K, V, A>>,
    pub(crate) root: Link,
    /// Cached minimum node, or `End` when empty.
    pub(crate) min: Link,
    /// Cached maximum node, or `End` when empty.
    pub(crate) max: Link,
    pub(crate) size: usize,
    /// Number of black nodes on any root-to-leaf path, excluding the leaf.
    pub(crate) black_height: u32,
    pub(crate) multiple_keys: bool,
}

impl<K, V, A> RedBlackTree<K, V, A> {
    /// Create an empty tree.
    ///
    /// If `multiple_keys` is true, equal keys may coexist; otherwise an
    /// insertion with an existing key returns the existing element.
    pub const fn new(multiple_keys: bool) -> Self {
        Self {
            nodes: NodeArena::new(),
            root: Link::Bottom,
            min: Link::End,
            max: Link::End,
            size: 0,
            black_height: 0,
            multiple_keys,
        }
    }

    /// Number of elements in the tree.
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Whether the tree has no elements.
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Whether equal keys may coexist in this tree.
    pub const fn multiple_keys(&self) -> bool {
        self.multiple_keys
    }

    /// The tracked black-height: the number of black nodes on any path from
    /// the root to a missing child, excluding the missing-child position.
    pub const fn black_height(&self) -> u32 {
        self.black_height
    }

    /// The number of nodes on the longest root-to-leaf path.
    ///
    /// Never exceeds twice the black-height, so it is O(log n).
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = Vec::new();
        if let Link::Node(root) = self.root {
            stack.push((root, 1));
        }
        while let Some((key, depth)) = stack.pop() {
            height = height.max(depth);
            for side in [LEFT, RIGHT] {
                if let Link::Node(child) = self.nodes[key].child(side) {
                    stack.push((child, depth + 1));
                }
            }
        }
        height
    }

    /// Cursor to the smallest element, or [`Self::end`] when empty.
    pub const fn begin(&self) -> Cursor {
        Cursor(self.min)
    }

    /// Cursor to the one-past-the-last position.
    pub const fn end(&self) -> Cursor {
        Cursor::END
    }

    /// Cursor to the greatest element, or [`Self::end`] when empty.
    pub const fn last(&self) -> Cursor {
        Cursor(self.max)
    }

    /// The key of the element under `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end position or no longer valid.
    #[track_caller]
    pub fn key(&self, cursor: Cursor) -> &K {
        &self.nodes[cursor.expect_node()].key
    }

    /// The value of the element under `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end position or no longer valid.
    #[track_caller]
    pub fn value(&self, cursor: Cursor) -> &V {
        &self.nodes[cursor.expect_node()].value
    }

    /// Mutable access to the value of the element under `cursor`.
    ///
    /// Values do not participate in the ordering, so mutating one cannot
    /// break the tree. It can however stale a value-derived
    /// [`Aggregate`](crate::Aggregate); trees using such aggregates should
    /// erase and re-insert instead.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end position or no longer valid.
    #[track_caller]
    pub fn value_mut(&mut self, cursor: Cursor) -> &mut V {
        &mut self.nodes[cursor.expect_node()].value
    }

    /// The aggregate of the subtree rooted at `cursor`.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end position or no longer valid.
    #[track_caller]
    pub fn aggregate(&self, cursor: Cursor) -> &A {
        &self.nodes[cursor.expect_node()].aggregate
    }

    /// Number of elements in the subtree rooted at `cursor`; the tree size
    /// for the end position.
    pub fn subtree_size(&self, cursor: Cursor) -> usize {
        match cursor.node() {
            Some(key) => self.nodes[key].size,
            None => self.size,
        }
    }

    /// Key and value under `cursor`, or `None` at the end position.
    pub fn entry(&self, cursor: Cursor) -> Option<(&K, &V)> {
        let key = cursor.node()?;
        let node = &self.nodes[key];
        Some((&node.key, &node.value))
    }

    /// Remove all elements.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = Link::Bottom;
        self.min = Link::End;
        self.max = Link::End;
        self.size = 0;
        self.black_height = 0;
    }

    /// Exchange the contents of two trees in O(1).
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    pub(crate) fn filter_node(&self, key: NodeKey) -> FilterNode<'_, K, V, A> {
        let node = &self.nodes[key];
        FilterNode {
            key: &node.key,
            value: &node.value,
            aggregate: &node.aggregate,
        }
    }

    /// Replace the `End` links at the ordered ends with plain missing-child
    /// links, so structural surgery can treat all missing children
    /// uniformly. [`Self::refresh_extremes`] undoes this.
    pub(crate) fn sanitize_extremes(&mut self) {
        if let Link::Node(min) = self.min {
            self.nodes[min].set_child(LEFT, Link::Bottom);
        }
        if let Link::Node(max) = self.max {
            self.nodes[max].set_child(RIGHT, Link::Bottom);
        }
    }

    /// Recompute the cached extremes from the root and restore the `End`
    /// links that anchor the ordered ends.
    pub(crate) fn refresh_extremes(&mut self) {
        let Link::Node(root) = self.root else {
            self.min = Link::End;
            self.max = Link::End;
            return;
        };
        let mut min = root;
        while let Link::Node(child) = self.nodes[min].child(LEFT) {
            min = child;
        }
        let mut max = root;
        while let Link::Node(child) = self.nodes[max].child(RIGHT) {
            max = child;
        }
        self.min = Link::Node(min);
        self.max = Link::Node(max);
        self.nodes[min].set_child(LEFT, Link::End);
        self.nodes[max].set_child(RIGHT, Link::End);
    }
}

impl<K: Ord, V, A: Aggregate<K, V>> RedBlackTree<K, V, A> {
    /// Re-validate the full tree invariants when the `unittest` feature is
    /// enabled. Called at the end of every mutating operation.
    #[inline]
    pub(crate) fn debug_check(&self) {
        #[cfg(feature = "unittest")]
        self.check_tree_invariants();
    }
}

impl<K, V, A> Default for RedBlackTree<K, V, A> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<K: Ord, V, A: Aggregate<K, V>> FromIterator<(K, V)> for RedBlackTree<K, V, A> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new(false);
        tree.extend(iter);
        tree
    }
}

impl<K: Ord, V, A: Aggregate<K, V>> Extend<(K, V)> for RedBlackTree<K, V, A> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Whether the link refers to a red node. Sentinels are black.
pub(crate) fn is_red<K, V, A>(nodes: &NodeArena<Node<K, V, A>>, link: Link) -> bool {
    matches!(link, Link::Node(key) if nodes[key].red)
}

/// Size of the subtree behind a link. Sentinels are empty.
pub(crate) fn link_size<K, V, A>(nodes: &NodeArena<Node<K, V, A>>, link: Link) -> usize {
    match link {
        Link::Node(key) => nodes[key].size,
        Link::Bottom | Link::End => 0,
    }
}

/// Which child slot of `parent` holds `node`. Arbitrary for a sentinel
/// parent, where [`link`] targets the root slot instead.
pub(crate) fn side_of<K, V, A>(
    nodes: &NodeArena<Node<K, V, A>>,
    parent: Link,
    node: NodeKey,
) -> Side {
    match parent {
        Link::Node(p) => nodes[p].child(RIGHT) == Link::Node(node),
        Link::Bottom | Link::End => RIGHT,
    }
}

/// Make `child` the `side` child of `parent`, maintaining the back link.
///
/// A sentinel parent means `child` becomes the root of the tree (or tree
/// fragment) whose root slot is `root`.
pub(crate) fn link<K, V, A>(
    nodes: &mut NodeArena<Node<K, V, A>>,
    root: &mut Link,
    parent: Link,
    child: Link,
    side: Side,
) {
    match parent {
        Link::Node(p) => nodes[p].set_child(side, child),
        Link::Bottom | Link::End => *root = child,
    }
    if let Link::Node(c) = child {
        nodes[c].parent = parent;
    }
}

/// Rotate the subtree rooted at `node` toward `side`, promoting the
/// opposite child into `node`'s position. Preserves the in-order sequence.
///
/// Colors are not touched and propagation is not recomputed; callers
/// recolor and call [`update`] explicitly.
///
/// # Panics
///
/// Panics if the child to promote is missing.
pub(crate) fn rotate<K, V, A>(
    nodes: &mut NodeArena<Node<K, V, A>>,
    root: &mut Link,
    node: NodeKey,
    side: Side,
) -> NodeKey {
    let parent = nodes[node].parent;
    let promoted = nodes[node].child(!side).expect_node();
    let inner = nodes[promoted].child(side);
    let node_side = side_of(nodes, parent, node);

    link(nodes, root, parent, Link::Node(promoted), node_side);
    link(nodes, root, Link::Node(node), inner, !side);
    link(nodes, root, Link::Node(promoted), Link::Node(node), side);

    promoted
}

/// Recompute the propagation data (subtree size and aggregate) of a node
/// from its children, which must themselves be up to date.
pub(crate) fn update<K, V, A: Aggregate<K, V>>(nodes: &mut NodeArena<Node<K, V, A>>, key: NodeKey) {
    let identity = A::default();
    let node = &nodes[key];
    let (left, right) = (node.child(LEFT), node.child(RIGHT));
    let size = link_size(nodes, left) + 1 + link_size(nodes, right);
    let left_aggregate = match left {
        Link::Node(c) => &nodes[c].aggregate,
        Link::Bottom | Link::End => &identity,
    };
    let right_aggregate = match right {
        Link::Node(c) => &nodes[c].aggregate,
        Link::Bottom | Link::End => &identity,
    };
    let aggregate = A::combine(
        left_aggregate,
        right_aggregate,
        NodeContext {
            key: &node.key,
            value: &node.value,
            black: !node.red,
        },
    );

    let node = &mut nodes[key];
    node.size = size;
    node.aggregate = aggregate;
}

/// Recompute propagation data from `from` up to the root, children first.
pub(crate) fn update_to_root<K, V, A: Aggregate<K, V>>(
    nodes: &mut NodeArena<Node<K, V, A>>,
    from: Link,
) {
    let mut current = from;
    while let Link::Node(key) = current {
        update(nodes, key);
        current = nodes[key].parent;
    }
}
