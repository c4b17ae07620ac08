/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Write path: detachment and black-deficiency repair.
//!
//! Erasing reduces to detaching a node with at most one child: a node with
//! two children first trades places with its in-order successor, which can
//! have at most one. Splicing the remaining child into the detached node's
//! position breaks nothing if the detached node was red; if it was black,
//! one subtree is left a black node short, and [`rebalance_black_loss`]
//! walks the deficiency toward the root until a rotation or recoloring
//! absorbs it.

use std::cmp::Ordering;

use super::{RedBlackTree, is_red, link, rotate, side_of, update, update_to_root};
use crate::aggregate::Aggregate;
use crate::arena::{NodeArena, NodeKey};
use crate::cursor::Cursor;
use crate::node::{LEFT, Link, Node, RIGHT, Side};

impl<K: Ord, V, A: Aggregate<K, V>> RedBlackTree<K, V, A> {
    /// Erase the element under `cursor` and return the cursor to its
    /// successor.
    ///
    /// Erasing the end position is a no-op returning the end position, so
    /// `tree.erase(tree.find(&key))` works whether or not the key exists.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` refers to an element that was already erased or
    /// moved to another tree.
    pub fn erase(&mut self, cursor: Cursor) -> Cursor {
        let Some(key) = cursor.node() else {
            return Cursor::END;
        };
        assert!(
            self.nodes.contains(key),
            "stale or foreign cursor passed to erase"
        );
        let successor = self.detach(key);
        self.nodes.remove(key);
        self.size -= 1;
        self.debug_check();
        Cursor(successor)
    }

    /// Erase every element with a key equal to `key`.
    ///
    /// Returns the number of elements erased; zero (and no mutation) if the
    /// key is absent.
    pub fn erase_key(&mut self, key: &K) -> usize {
        let mut erased = 0;
        let mut cursor = self.lower_bound(key);
        while let Some(node) = cursor.node() {
            if self.nodes[node].key.cmp(key) != Ordering::Equal {
                break;
            }
            cursor = self.erase(cursor);
            erased += 1;
        }
        erased
    }

    /// Unlink the node from the tree structure and restore the invariants,
    /// leaving the node itself in the arena. Returns the successor link.
    ///
    /// Shared by erase (which frees the node afterwards) and splice (which
    /// re-attaches it elsewhere).
    pub(crate) fn detach(&mut self, key: NodeKey) -> Link {
        let successor = self.next_link(Link::Node(key));
        if self.min == Link::Node(key) {
            self.min = successor;
        }
        if self.max == Link::Node(key) {
            self.max = self.prev_link(Link::Node(key));
        }

        let left = self.nodes[key].child(LEFT);
        let right = self.nodes[key].child(RIGHT);
        let two_children = !left.is_sentinel() && !right.is_sentinel();

        // the node actually unlinked from its position: the node itself,
        // or its successor, which then takes the node's place
        let moved = if two_children {
            successor.expect_node()
        } else {
            key
        };
        debug_assert!(
            self.nodes[moved].child(LEFT).is_sentinel()
                || self.nodes[moved].child(RIGHT).is_sentinel()
        );

        let moved_parent = self.nodes[moved].parent;
        let moved_side = side_of(&self.nodes, moved_parent, moved);
        let child = {
            let right = self.nodes[moved].child(RIGHT);
            let left = self.nodes[moved].child(LEFT);
            if !right.is_sentinel() {
                right
            } else if !left.is_sentinel() {
                left
            } else {
                Link::Bottom
            }
        };
        let moved_was_root = Link::Node(moved) == self.root;
        let moved_was_red = self.nodes[moved].red;

        // splice the remaining child into the unlinked position
        link(
            &mut self.nodes,
            &mut self.root,
            moved_parent,
            child,
            moved_side,
        );

        if two_children {
            // the successor takes over the node's children, position, and
            // color; note the node's right child is re-read because the
            // unlink above may have replaced it
            let node_left = self.nodes[key].child(LEFT);
            let node_right = self.nodes[key].child(RIGHT);
            link(
                &mut self.nodes,
                &mut self.root,
                Link::Node(moved),
                node_left,
                LEFT,
            );
            link(
                &mut self.nodes,
                &mut self.root,
                Link::Node(moved),
                node_right,
                RIGHT,
            );
            let node_parent = self.nodes[key].parent;
            let node_side = side_of(&self.nodes, node_parent, key);
            link(
                &mut self.nodes,
                &mut self.root,
                node_parent,
                Link::Node(moved),
                node_side,
            );
            self.nodes[moved].red = self.nodes[key].red;
        }

        // restore the ordered-end links
        if let Link::Node(min) = self.min {
            self.nodes[min].set_child(LEFT, Link::End);
        }
        if let Link::Node(max) = self.max {
            self.nodes[max].set_child(RIGHT, Link::End);
        }

        if moved_was_root {
            if is_red(&self.nodes, child) {
                self.nodes[child.expect_node()].red = false;
            } else {
                // a black root was removed without replacement
                self.black_height -= 1;
            }
            if self.root.is_sentinel() {
                self.root = Link::Bottom;
            }
            update_to_root(&mut self.nodes, child);
            return successor;
        }

        // where the spliced child now hangs; the successor holds that spot
        // when it just replaced the erased node as the child's parent
        let new_parent = if moved_parent == Link::Node(key) {
            successor
        } else {
            moved_parent
        };

        if moved_was_red {
            // detaching a red node breaks neither invariant
            update_to_root(&mut self.nodes, new_parent);
            return successor;
        }

        if is_red(&self.nodes, child) {
            // recoloring the red child black restores the lost black unit
            self.nodes[child.expect_node()].red = false;
            update_to_root(&mut self.nodes, child);
            return successor;
        }

        rebalance_black_loss(
            &mut self.nodes,
            &mut self.root,
            &mut self.black_height,
            new_parent,
            moved_side,
        );
        successor
    }
}

/// Repair a black deficiency: every path into the `side` subtree of
/// `parent` is one black node short of the other paths.
///
/// Walks toward the root. All cases resolve the deficiency with at most two
/// rotations except two: a black sibling with two black children pushes the
/// deficiency one level up, and a red sibling rotates once to reduce to the
/// black-sibling cases. Propagation data is recomputed for every node
/// touched and then up to the root.
pub(crate) fn rebalance_black_loss<K, V, A: Aggregate<K, V>>(
    nodes: &mut NodeArena<Node<K, V, A>>,
    root: &mut Link,
    black_height: &mut u32,
    parent: Link,
    side: Side,
) {
    let mut parent = parent;
    let mut side = side;
    while let Link::Node(p) = parent {
        // the deficient child; possibly a sentinel
        let node = nodes[p].child(side);
        if is_red(nodes, node) {
            // recoloring it black restores the missing black unit
            let n = node.expect_node();
            nodes[n].red = false;
            update(nodes, n);
            break;
        }

        let mut sibling = nodes[p].child(!side);
        if is_red(nodes, sibling) {
            // reduce to a black-sibling case; the children of `p` stay
            // unbalanced but the propagation below `p` is still valid
            let s = sibling.expect_node();
            rotate(nodes, root, p, side);
            nodes[s].red = false;
            nodes[p].red = true;
            sibling = nodes[p].child(!side);
        }
        debug_assert!(!is_red(nodes, sibling));

        let next_parent = nodes[p].parent;
        let next_side = side_of(nodes, next_parent, p);

        let Link::Node(s) = sibling else {
            // no sibling subtree to borrow from: push the deficiency up
            update(nodes, p);
            parent = next_parent;
            side = next_side;
            continue;
        };

        let near = nodes[s].child(side);
        if is_red(nodes, near) {
            // red nephew toward the deficient side: two rotations move it
            // into the parent's position
            let a = near.expect_node();
            rotate(nodes, root, s, !side);
            rotate(nodes, root, p, side);
            nodes[a].red = nodes[p].red;
            nodes[p].red = false;
            update(nodes, p);
            update(nodes, s);
            parent = Link::Node(a);
            break;
        }

        if nodes[p].red {
            // the red parent absorbs the deficiency under the black
            // sibling; no recoloring needed
            rotate(nodes, root, p, side);
            update(nodes, p);
            parent = sibling;
            break;
        }

        let far = nodes[s].child(!side);
        if !is_red(nodes, far) {
            // everything local is black: removing the sibling's black unit
            // equalizes the subtrees and moves the deficiency up
            nodes[s].red = true;
            if Link::Node(p) == *root {
                *black_height -= 1;
            }
            update(nodes, s);
            update(nodes, p);
            parent = next_parent;
            side = next_side;
            continue;
        }

        // red nephew away from the deficient side: one rotation
        let b = far.expect_node();
        rotate(nodes, root, p, side);
        nodes[b].red = false;
        update(nodes, p);
        update(nodes, s);
        parent = sibling;
        break;
    }

    update_to_root(nodes, parent);
}
