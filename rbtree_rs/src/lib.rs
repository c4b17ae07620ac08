/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! An augmented, order-preserving red-black tree.
//!
//! This crate provides [`RedBlackTree`], an ordered dictionary on a
//! self-balancing binary search tree that adds three things to the usual
//! sorted-map operations:
//!
//! - **Pluggable per-node aggregates** ([`Aggregate`]): caller-defined
//!   subtree summaries, recomputed bottom-up after every structural change
//!   and never observable stale. Subtree sizes are built in, which yields
//!   `select`/`rank`/`count`/`quantile` in O(log n).
//! - **Split and join** of whole trees in logarithmic structural time:
//!   divide a tree at a key, or merge two trees with non-interleaving key
//!   ranges, plus `splice` to move single elements between trees without
//!   touching their payloads.
//! - **Filtered traversal** ([`DownFilter`]): `next`/`prev` and the bound
//!   searches can be steered by a subtree-admission predicate, visiting
//!   only a marked subset of the elements in O(log n) per step without
//!   materializing the subset.
//!
//! # Example
//!
//! ```
//! use rbtree_rs::RedBlackTree;
//!
//! let mut tree: RedBlackTree<i32, &str> = RedBlackTree::new(false);
//! tree.insert(2, "two");
//! tree.insert(1, "one");
//! let (_cursor, inserted) = tree.insert(3, "three");
//! assert!(inserted);
//!
//! let keys: Vec<i32> = tree.keys().copied().collect();
//! assert_eq!(keys, vec![1, 2, 3]);
//!
//! let upper = tree.split(&3);
//! assert_eq!(tree.len(), 2);
//! assert_eq!(upper.len(), 1);
//! ```
//!
//! # Marked-subset traversal
//!
//! ```
//! use rbtree_rs::{Aggregate, FilterNode, NodeContext, RedBlackTree, down_filter};
//!
//! /// Tracks whether any element of the subtree is marked.
//! #[derive(Clone, Copy, Default, Debug)]
//! struct AnyMarked(bool);
//!
//! impl Aggregate<i32, bool> for AnyMarked {
//!     fn combine(left: &Self, right: &Self, node: NodeContext<'_, i32, bool>) -> Self {
//!         AnyMarked(left.0 || right.0 || *node.value)
//!     }
//! }
//!
//! let mut tree: RedBlackTree<i32, bool, AnyMarked> = RedBlackTree::new(false);
//! for (key, marked) in [(2, false), (5, true), (9, false), (14, true)] {
//!     tree.insert(key, marked);
//! }
//!
//! let only_marked = down_filter(
//!     |node: FilterNode<'_, i32, bool, AnyMarked>| *node.value,
//!     |node: FilterNode<'_, i32, bool, AnyMarked>| node.aggregate.0,
//! );
//! let marked: Vec<i32> = tree.iter_filtered(&only_marked).map(|(k, _)| *k).collect();
//! assert_eq!(marked, vec![5, 14]);
//! ```
//!
//! # Handles
//!
//! Positions are [`Cursor`]s: generational arena keys resolved through the
//! owning tree. A cursor survives unrelated mutations of its tree; erasing
//! its element or moving it to another tree (split, join, splice)
//! invalidates it, and later use panics instead of aliasing another
//! element.

mod aggregate;
mod arena;
mod cursor;
mod filter;
mod iter;
mod node;
mod tree;

pub use aggregate::{Aggregate, NodeContext};
pub use cursor::Cursor;
pub use filter::{DownFilter, FilterNode, FnDownFilter, VisitAll, down_filter};
pub use iter::{FilteredIter, Iter};
pub use tree::RedBlackTree;
