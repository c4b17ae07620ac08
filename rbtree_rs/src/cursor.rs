/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Positions in a tree.

use crate::arena::NodeKey;
use crate::node::Link;

/// A position in a [`RedBlackTree`](crate::RedBlackTree): either an element
/// or the one-past-the-last *end* position.
///
/// A cursor is a lightweight `Copy` handle; navigation and dereferencing go
/// through the owning tree (`tree.next(c)`, `tree.key(c)`, ...). A cursor
/// stays valid across mutations of its tree until the element it denotes is
/// erased or moved to another tree by split/join/splice; using it after that
/// is detected and panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor(pub(crate) Link);

impl Cursor {
    /// The end position, shared by all trees.
    pub(crate) const END: Cursor = Cursor(Link::End);

    /// Whether this is the end position.
    pub fn is_end(self) -> bool {
        self.0.is_sentinel()
    }

    pub(crate) fn node(self) -> Option<NodeKey> {
        self.0.node()
    }

    /// The node behind this cursor.
    ///
    /// # Panics
    ///
    /// Panics if this is the end position.
    #[track_caller]
    pub(crate) fn expect_node(self) -> NodeKey {
        match self.0 {
            Link::Node(key) => key,
            Link::Bottom | Link::End => panic!("dereferenced the end cursor"),
        }
    }
}
