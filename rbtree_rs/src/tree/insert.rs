/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Write path: insertion and red-violation repair.
//!
//! A new element is always attached as a red leaf at the position found by
//! the key descent; attaching a red node cannot change any path's black
//! count, so the only invariant possibly broken afterwards is a red node
//! with a red parent. [`rebalance_red_violation`] repairs that on the walk
//! back toward the root. The repair is also the finishing step of the join
//! algorithm, which grafts its pivot exactly like an insertion.

use std::cmp::Ordering;

use super::{RedBlackTree, is_red, link, rotate, update, update_to_root};
use crate::aggregate::Aggregate;
use crate::arena::{NodeArena, NodeKey};
use crate::cursor::Cursor;
use crate::node::{LEFT, Link, Node, RIGHT, Side};

impl<K: Ord, V, A: Aggregate<K, V>> RedBlackTree<K, V, A> {
    /// Insert an element.
    ///
    /// Returns the element's cursor and whether a new element was created.
    /// In a unique-key tree an insertion with an existing key is a no-op
    /// that returns the existing element and `false`. In a multi-key tree
    /// an equal key is placed after all existing equals and the result is
    /// always `true`.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        let mut parent = Link::End;
        let mut side = LEFT;
        let mut current = self.root;
        while let Link::Node(node) = current {
            match key.cmp(&self.nodes[node].key) {
                Ordering::Less => {
                    parent = current;
                    side = LEFT;
                }
                Ordering::Greater => {
                    parent = current;
                    side = RIGHT;
                }
                Ordering::Equal => {
                    if !self.multiple_keys {
                        return (Cursor(current), false);
                    }
                    // equal keys append after the existing run
                    parent = current;
                    side = RIGHT;
                }
            }
            current = self.nodes[parent.expect_node()].child(side);
        }

        let new = self.nodes.insert(Node::new(key, value, A::default()));
        self.attach(new, parent, side);
        self.size += 1;
        self.debug_check();
        (Cursor(Link::Node(new)), true)
    }

    /// Attach the detached node `new` as the `side` child of `parent` and
    /// restore the invariants. Shared by insertion and splice.
    pub(crate) fn attach(&mut self, new: NodeKey, parent: Link, side: Side) {
        link(&mut self.nodes, &mut self.root, parent, Link::Node(new), side);

        if self.min.is_sentinel() {
            // the tree was empty
            self.min = Link::Node(new);
            self.max = Link::Node(new);
            self.nodes[new].set_child(LEFT, Link::End);
            self.nodes[new].set_child(RIGHT, Link::End);
        } else {
            if parent == self.min && side == LEFT {
                self.min = Link::Node(new);
                self.nodes[new].set_child(LEFT, Link::End);
            }
            if parent == self.max && side == RIGHT {
                self.max = Link::Node(new);
                self.nodes[new].set_child(RIGHT, Link::End);
            }
        }

        update(&mut self.nodes, new);
        let from = rebalance_red_violation(
            &mut self.nodes,
            &mut self.root,
            &mut self.black_height,
            new,
        );
        update_to_root(&mut self.nodes, from);
    }
}

/// Repair a red-on-red violation at `node`, which must be red with valid
/// propagation data in its subtree.
///
/// Walks toward the root; every case resolves the violation locally in O(1)
/// rotations except the red-uncle case, which pushes the violation two
/// levels up. The root is forced black at the end, which is where the
/// black-height grows.
///
/// Returns the position from which the caller must recompute propagation
/// data upward; everything below it has already been updated. Deferring
/// that walk lets split amortize several repairs into one update pass.
pub(crate) fn rebalance_red_violation<K, V, A: Aggregate<K, V>>(
    nodes: &mut NodeArena<Node<K, V, A>>,
    root: &mut Link,
    black_height: &mut u32,
    node: NodeKey,
) -> Link {
    let mut node = node;
    let mut parent;
    loop {
        debug_assert!(nodes[node].red);

        parent = nodes[node].parent;
        let Link::Node(p) = parent else {
            // the node is the root; the final recolor below settles it
            break;
        };
        if !nodes[p].red {
            break;
        }

        let grand = nodes[p].parent;
        let Link::Node(g) = grand else {
            // the red parent is the root: recoloring it black adds one
            // black node to every path
            nodes[p].red = false;
            *black_height += 1;
            break;
        };

        let parent_side = nodes[g].child(RIGHT) == Link::Node(p);
        let uncle = nodes[g].child(!parent_side);

        if !is_red(nodes, uncle) {
            let mut node = node;
            let mut p = p;
            let node_side = nodes[p].child(RIGHT) == Link::Node(node);
            if node_side != parent_side {
                // grandparent-parent-node form a turn: reduce it to a
                // chain so the next rotation can resolve the violation
                rotate(nodes, root, p, !node_side);
                update(nodes, p);
                update(nodes, node);
                std::mem::swap(&mut node, &mut p);
            }

            rotate(nodes, root, g, !parent_side);
            nodes[p].red = false;
            nodes[g].red = true;
            update(nodes, g);

            parent = Link::Node(p);
            break;
        }

        // red uncle: recolor and push the violation to the grandparent
        let u = uncle.expect_node();
        nodes[p].red = false;
        nodes[u].red = false;
        nodes[g].red = true;
        update(nodes, p);
        update(nodes, u);
        update(nodes, g);

        node = g;
    }

    // the root is kept black, although that is not part of the red-black
    // invariants proper
    if let Link::Node(r) = *root
        && nodes[r].red
    {
        nodes[r].red = false;
        *black_height += 1;
        update(nodes, r);
    }

    parent
}
