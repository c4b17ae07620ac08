/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Moving single elements between trees.
//!
//! A splice is a detach followed by an attach, reusing the structural
//! steps of erase and insert without destroying or re-creating the
//! element: the node keeps its key and value while its slot moves from one
//! tree's arena to the other's. This is what lets a consumer organize many
//! trees into a larger ordered structure and move elements across them in
//! O(log n) structural work.

use std::cmp::Ordering;

use super::RedBlackTree;
use crate::aggregate::Aggregate;
use crate::cursor::Cursor;
use crate::node::{LEFT, Link, RIGHT};

impl<K: Ord, V, A: Aggregate<K, V>> RedBlackTree<K, V, A> {
    /// Move the element under `cursor` from `other` into this tree,
    /// returning its cursor in this tree.
    ///
    /// The element is placed by this tree's ordering; its key and value
    /// are moved, not cloned. The original cursor is invalidated.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` is the end position or no longer valid in
    /// `other`, or if the key is already present in a unique-key tree.
    pub fn splice(&mut self, other: &mut Self, cursor: Cursor) -> Cursor {
        let key = cursor.expect_node();
        assert!(
            other.nodes.contains(key),
            "stale or foreign cursor passed to splice"
        );
        if !self.multiple_keys {
            assert!(
                !self.contains(&other.nodes[key].key),
                "splice would duplicate a key in a unique-key tree"
            );
        }

        other.detach(key);
        other.size -= 1;
        let mut node = other.nodes.remove(key);
        node.isolate();

        // descend to the insertion point, equal keys appending after the
        // existing run as in insert
        let mut parent = Link::End;
        let mut side = LEFT;
        let mut current = self.root;
        while let Link::Node(n) = current {
            side = match node.key.cmp(&self.nodes[n].key) {
                Ordering::Less => LEFT,
                Ordering::Greater | Ordering::Equal => RIGHT,
            };
            parent = current;
            current = self.nodes[n].child(side);
        }

        let new_key = self.nodes.insert(node);
        self.attach(new_key, parent, side);
        self.size += 1;

        self.debug_check();
        other.debug_check();
        Cursor(Link::Node(new_key))
    }
}
