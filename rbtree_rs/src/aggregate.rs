/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Per-node aggregate data.
//!
//! An aggregate summarizes the subtree rooted at a node and is recomputed
//! bottom-up after every structural change, so it is never observable in a
//! stale state. The tree engine assumes nothing about the aggregate beyond
//! [`Aggregate::combine`]; subtree sizes are maintained separately by the
//! engine itself.
//!
//! # Example
//!
//! An aggregate that tracks whether any element of a subtree is marked,
//! which is what makes marked-subset traversal (see
//! [`DownFilter`](crate::DownFilter)) logarithmic:
//!
//! ```
//! use rbtree_rs::{Aggregate, NodeContext};
//!
//! #[derive(Clone, Copy, Default, PartialEq, Debug)]
//! struct AnyMarked(bool);
//!
//! impl Aggregate<i32, bool> for AnyMarked {
//!     fn combine(left: &Self, right: &Self, node: NodeContext<'_, i32, bool>) -> Self {
//!         AnyMarked(left.0 || right.0 || *node.value)
//!     }
//! }
//! ```

/// Borrowed view of a node, handed to [`Aggregate::combine`].
#[derive(Debug)]
pub struct NodeContext<'a, K, V> {
    /// The node's key.
    pub key: &'a K,
    /// The node's value.
    pub value: &'a V,
    /// Whether the node is black. Exposed because some aggregates (e.g. a
    /// per-subtree black-height) depend on node color.
    pub black: bool,
}

/// Caller-defined aggregate data attached to every node.
///
/// The value for a sentinel (missing child) is [`Default::default`]; it must
/// act as the identity of `combine`.
pub trait Aggregate<K, V>: Clone + Default {
    /// Compute this node's aggregate from its children's aggregates and its
    /// own key, value, and color.
    ///
    /// Called by the tree engine after every structural change to the
    /// subtree, children first. Must be O(1) for the tree operations to keep
    /// their logarithmic complexity.
    fn combine(left: &Self, right: &Self, node: NodeContext<'_, K, V>) -> Self;
}

/// The trivial aggregate for trees that don't use augmentation.
impl<K, V> Aggregate<K, V> for () {
    fn combine(_left: &Self, _right: &Self, _node: NodeContext<'_, K, V>) -> Self {}
}
