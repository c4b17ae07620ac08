/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Ordered traversal.
//!
//! The successor/predecessor walk is a single generalized routine steered
//! by a [`DownFilter`]: stepping into a child subtree is allowed only when
//! the filter admits it, and the walk toward the root probes each ancestor
//! and its far subtree the same way. With [`VisitAll`] this degenerates to
//! plain in-order traversal; with a real filter it visits exactly the
//! marked subset, skipping unmarked regions without ever expanding them.
//!
//! Stepping from the end position wraps to the first element in the step
//! direction, and stepping off either ordered end lands on the end
//! position, mirroring how the end anchors both extremes.

use crate::RedBlackTree;
use crate::cursor::Cursor;
use crate::filter::{DownFilter, VisitAll};
use crate::node::{Link, Side, LEFT, RIGHT};

impl<K, V, A> RedBlackTree<K, V, A> {
    /// Cursor to the successor of `cursor`; wraps from the end position to
    /// the first element.
    pub fn next(&self, cursor: Cursor) -> Cursor {
        self.next_filtered(cursor, &VisitAll)
    }

    /// Cursor to the predecessor of `cursor`; wraps from the end position
    /// to the last element.
    pub fn prev(&self, cursor: Cursor) -> Cursor {
        self.prev_filtered(cursor, &VisitAll)
    }

    /// Cursor to the next element of the subset selected by `filter`.
    ///
    /// O(log n); the filter's subtree predicate prunes everything between
    /// `cursor` and the next subset member.
    pub fn next_filtered<F: DownFilter<K, V, A>>(&self, cursor: Cursor, filter: &F) -> Cursor {
        Cursor(self.step(cursor.0, RIGHT, filter))
    }

    /// Cursor to the previous element of the subset selected by `filter`.
    pub fn prev_filtered<F: DownFilter<K, V, A>>(&self, cursor: Cursor, filter: &F) -> Cursor {
        Cursor(self.step(cursor.0, LEFT, filter))
    }

    pub(crate) fn next_link(&self, link: Link) -> Link {
        self.step(link, RIGHT, &VisitAll)
    }

    pub(crate) fn prev_link(&self, link: Link) -> Link {
        self.step(link, LEFT, &VisitAll)
    }

    /// Whether the subtree behind `link` may hold a subset element.
    fn admissible<F: DownFilter<K, V, A>>(&self, link: Link, filter: &F) -> bool {
        match link {
            Link::Node(node) => filter.subtree_may_match(self.filter_node(node)),
            Link::Bottom | Link::End => false,
        }
    }

    /// One in-order step in direction `dir`, restricted to the filtered
    /// subset.
    fn step<F: DownFilter<K, V, A>>(&self, from: Link, dir: Side, filter: &F) -> Link {
        let Link::Node(start) = from else {
            // from the end position, wrap to the subset's first element
            // in the step direction
            return if self.admissible(self.root, filter) {
                self.first_below(self.root, dir, filter)
            } else {
                Link::End
            };
        };

        let child = self.nodes[start].child(dir);
        if self.admissible(child, filter) {
            return self.first_below(child, dir, filter);
        }

        // no admissible subtree on the step side: walk up until arriving
        // at an ancestor from the opposite side, probing each such
        // ancestor and its far subtree
        let mut prev = Link::Node(start);
        let mut node = self.nodes[start].parent;
        while let Link::Node(n) = node {
            if prev != self.nodes[n].child(!dir) {
                prev = node;
                node = self.nodes[n].parent;
                continue;
            }
            if filter.matches(self.filter_node(n)) {
                return node;
            }
            let child = self.nodes[n].child(dir);
            if self.admissible(child, filter) {
                return self.first_below(child, dir, filter);
            }
            prev = node;
            node = self.nodes[n].parent;
        }
        Link::End
    }

    /// The subset element of `subtree` that comes first when traversing in
    /// direction `dir`. The subtree must be admissible.
    ///
    /// # Panics
    ///
    /// Panics if the filter's subtree predicate admitted a subtree with no
    /// matching element; that is a violation of the filter's consistency
    /// contract.
    fn first_below<F: DownFilter<K, V, A>>(&self, subtree: Link, dir: Side, filter: &F) -> Link {
        debug_assert!(self.admissible(subtree, filter));
        let mut node = subtree;
        while let Link::Node(n) = node {
            let opposite = self.nodes[n].child(!dir);
            let step = self.admissible(opposite, filter) == !dir;
            if step == dir && filter.matches(self.filter_node(n)) {
                return node;
            }
            node = self.nodes[n].child(step);
        }
        panic!(
            "inconsistent down-filter: an admitted subtree contains no element \
             matching the filter"
        );
    }

    /// In-order iterator over `(key, value)` pairs.
    pub fn iter(&self) -> Iter<'_, K, V, A> {
        Iter {
            tree: self,
            front: self.min,
            back: self.max,
            remaining: self.size,
        }
    }

    /// In-order iterator over the keys.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// In-order iterator over the values.
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }

    /// In-order iterator over the subset selected by `filter`.
    pub fn iter_filtered<'a, F: DownFilter<K, V, A>>(
        &'a self,
        filter: &'a F,
    ) -> FilteredIter<'a, K, V, A, F> {
        FilteredIter {
            tree: self,
            filter,
            cursor: self.step(Link::End, RIGHT, filter),
        }
    }
}

/// In-order iterator over a tree's `(key, value)` pairs.
///
/// Double-ended; returned by [`RedBlackTree::iter`].
#[derive(Debug)]
pub struct Iter<'a, K, V, A> {
    tree: &'a RedBlackTree<K, V, A>,
    front: Link,
    back: Link,
    remaining: usize,
}

impl<'a, K, V, A> Iterator for Iter<'a, K, V, A> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.tree.nodes[self.front.expect_node()];
        self.front = self.tree.next_link(self.front);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V, A> DoubleEndedIterator for Iter<'_, K, V, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = &self.tree.nodes[self.back.expect_node()];
        self.back = self.tree.prev_link(self.back);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V, A> ExactSizeIterator for Iter<'_, K, V, A> {}

impl<'a, K, V, A> IntoIterator for &'a RedBlackTree<K, V, A> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over the subset selected by a [`DownFilter`].
///
/// Returned by [`RedBlackTree::iter_filtered`].
#[derive(Debug)]
pub struct FilteredIter<'a, K, V, A, F> {
    tree: &'a RedBlackTree<K, V, A>,
    filter: &'a F,
    cursor: Link,
}

impl<'a, K, V, A, F: DownFilter<K, V, A>> Iterator for FilteredIter<'a, K, V, A, F> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let key = self.cursor.node()?;
        let node = &self.tree.nodes[key];
        self.cursor = self.tree.step(self.cursor, RIGHT, self.filter);
        Some((&node.key, &node.value))
    }
}
