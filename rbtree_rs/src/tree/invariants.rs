/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Structural invariant checks.
//!
//! [`RedBlackTree::check_tree_invariants`] independently re-derives every
//! structural property the tree maintains incrementally and panics with a
//! descriptive message on the first mismatch. The test suite calls it
//! after mutations; with the `unittest` feature enabled, every mutating
//! operation calls it on itself before returning.

use std::cmp::Ordering;

use super::{RedBlackTree, link_size};
use crate::aggregate::Aggregate;
use crate::arena::NodeKey;
use crate::node::{LEFT, Link, RIGHT};

impl<K: Ord, V, A: Aggregate<K, V>> RedBlackTree<K, V, A> {
    /// Verify all structural invariants of the tree.
    ///
    /// Checked, with a panic on the first violation:
    ///
    /// 1. the in-order key sequence is sorted (strictly for unique-key
    ///    trees);
    /// 2. no red node has a red child;
    /// 3. every root-to-leaf path passes the same number of black nodes,
    ///    and that number equals the tracked black-height;
    /// 4. the tracked size equals the node count, subtree sizes are
    ///    consistent, and the arena holds no unreachable nodes;
    /// 5. parent/child links are mutually consistent, the cached extremes
    ///    are the leftmost/rightmost nodes, the ordered-end links sit
    ///    exactly there, and stepping across the end position wraps to the
    ///    extremes.
    pub fn check_tree_invariants(&self) {
        let Link::Node(root) = self.root else {
            assert_eq!(
                self.root,
                Link::Bottom,
                "an empty tree's root must be the missing-child sentinel"
            );
            assert_eq!(self.size, 0, "an empty tree must have size zero");
            assert_eq!(
                self.black_height, 0,
                "an empty tree must have black-height zero"
            );
            assert_eq!(
                self.min,
                Link::End,
                "an empty tree's minimum must be the end sentinel"
            );
            assert_eq!(
                self.max,
                Link::End,
                "an empty tree's maximum must be the end sentinel"
            );
            assert_eq!(
                self.nodes.len(),
                0,
                "an empty tree's arena must hold no nodes"
            );
            return;
        };

        assert!(!self.nodes[root].red, "the root must be black");
        assert_eq!(
            self.nodes[root].parent,
            Link::End,
            "the root's parent must be the end sentinel"
        );

        // cached extremes and ordered-end links
        let mut min = root;
        while let Link::Node(child) = self.nodes[min].child(LEFT) {
            min = child;
        }
        let mut max = root;
        while let Link::Node(child) = self.nodes[max].child(RIGHT) {
            max = child;
        }
        assert_eq!(
            self.min,
            Link::Node(min),
            "the cached minimum is not the leftmost node"
        );
        assert_eq!(
            self.max,
            Link::Node(max),
            "the cached maximum is not the rightmost node"
        );
        assert_eq!(
            self.nodes[min].child(LEFT),
            Link::End,
            "the minimum's left child must be the end sentinel"
        );
        assert_eq!(
            self.nodes[max].child(RIGHT),
            Link::End,
            "the maximum's right child must be the end sentinel"
        );

        // stepping across the end position
        assert_eq!(
            self.next_link(Link::End),
            self.min,
            "the successor of the end position must be the minimum"
        );
        assert_eq!(
            self.prev_link(Link::End),
            self.max,
            "the predecessor of the end position must be the maximum"
        );
        assert_eq!(
            self.next_link(self.max),
            Link::End,
            "the successor of the maximum must be the end position"
        );
        assert_eq!(
            self.prev_link(self.min),
            Link::End,
            "the predecessor of the minimum must be the end position"
        );

        let black_height = self.check_node_invariants(root);
        assert_eq!(
            black_height, self.black_height,
            "the tracked black-height does not match the structure"
        );

        // size and ordering via a full in-order walk
        let mut count = 0;
        let mut previous: Option<NodeKey> = None;
        let mut current = self.min;
        while let Link::Node(node) = current {
            count += 1;
            if let Some(prev) = previous {
                let ordering = self.nodes[prev].key.cmp(&self.nodes[node].key);
                if self.multiple_keys {
                    assert!(
                        ordering != Ordering::Greater,
                        "the in-order key sequence is not sorted"
                    );
                } else {
                    assert!(
                        ordering == Ordering::Less,
                        "the in-order key sequence is not strictly increasing"
                    );
                }
            }
            previous = Some(node);
            current = self.next_link(current);
        }
        assert_eq!(count, self.size, "the tracked size does not match an in-order walk");
        assert_eq!(
            self.nodes.len(),
            self.size,
            "the arena holds nodes unreachable from the root"
        );
    }

    /// Check the subtree rooted at `node`; returns its black-height.
    fn check_node_invariants(&self, node: NodeKey) -> u32 {
        let n = &self.nodes[node];

        for side in [LEFT, RIGHT] {
            match n.child(side) {
                Link::Node(child) => {
                    assert_eq!(
                        self.nodes[child].parent,
                        Link::Node(node),
                        "a child's parent link does not point back at its parent"
                    );
                    if n.red {
                        assert!(!self.nodes[child].red, "a red node has a red child");
                    }
                    let ordering = self.nodes[child].key.cmp(&n.key);
                    if side == LEFT {
                        if self.multiple_keys {
                            assert!(
                                ordering != Ordering::Greater,
                                "a left child's key exceeds its parent's"
                            );
                        } else {
                            assert!(
                                ordering == Ordering::Less,
                                "a left child's key is not below its parent's"
                            );
                        }
                    } else if self.multiple_keys {
                        assert!(
                            ordering != Ordering::Less,
                            "a right child's key is below its parent's"
                        );
                    } else {
                        assert!(
                            ordering == Ordering::Greater,
                            "a right child's key is not above its parent's"
                        );
                    }
                }
                Link::End => {
                    let at_min = Link::Node(node) == self.min && side == LEFT;
                    let at_max = Link::Node(node) == self.max && side == RIGHT;
                    assert!(
                        at_min || at_max,
                        "an ordered-end link occurs away from the extremes"
                    );
                }
                Link::Bottom => {}
            }
        }

        let left_height = match n.child(LEFT) {
            Link::Node(child) => self.check_node_invariants(child),
            Link::Bottom | Link::End => 0,
        };
        let right_height = match n.child(RIGHT) {
            Link::Node(child) => self.check_node_invariants(child),
            Link::Bottom | Link::End => 0,
        };
        assert_eq!(
            left_height, right_height,
            "the black count differs between two paths"
        );

        let n = &self.nodes[node];
        let expected_size =
            link_size(&self.nodes, n.child(LEFT)) + 1 + link_size(&self.nodes, n.child(RIGHT));
        assert_eq!(n.size, expected_size, "a subtree size is stale");

        left_height + u32::from(!n.red)
    }
}
