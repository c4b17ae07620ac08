/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Read path: ordered search, bounds, and order statistics.
//!
//! The order statistics (`select`, `rank`, `count`, `quantile`) ride on the
//! subtree sizes that every node maintains as built-in propagation data.
//!
//! Each bound search also has a down-filtered variant that restricts the
//! result to the subset selected by a [`DownFilter`](crate::DownFilter):
//! the plain bound is located first and the filtered successor walk then
//! advances to the nearest subset member, so the filtered searches stay
//! logarithmic.

use std::cmp::Ordering;

use super::{RedBlackTree, link_size};
use crate::aggregate::Aggregate;
use crate::cursor::Cursor;
use crate::filter::DownFilter;
use crate::node::{LEFT, Link, RIGHT};

impl<K: Ord, V, A: Aggregate<K, V>> RedBlackTree<K, V, A> {
    /// Find an element with a key equal to `key`, or the end position.
    ///
    /// In a multi-key tree this is the topmost element of the equal run;
    /// use [`Self::equal_range`] to visit all of them.
    pub fn find(&self, key: &K) -> Cursor {
        let mut current = self.root;
        while let Link::Node(node) = current {
            match key.cmp(&self.nodes[node].key) {
                Ordering::Less => current = self.nodes[node].child(LEFT),
                Ordering::Greater => current = self.nodes[node].child(RIGHT),
                Ordering::Equal => return Cursor(current),
            }
        }
        Cursor::END
    }

    /// Whether an element with a key equal to `key` exists.
    pub fn contains(&self, key: &K) -> bool {
        !self.find(key).is_end()
    }

    /// The value of an element with a key equal to `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        let node = self.find(key).node()?;
        Some(&self.nodes[node].value)
    }

    /// Mutable access to the value of an element with a key equal to `key`.
    ///
    /// See [`Self::value_mut`] for the caveat about value-derived
    /// aggregates.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let node = self.find(key).node()?;
        Some(&mut self.nodes[node].value)
    }

    /// The first element whose key is not less than `key`, or the end
    /// position.
    pub fn lower_bound(&self, key: &K) -> Cursor {
        let mut bound = Link::End;
        let mut current = self.root;
        while let Link::Node(node) = current {
            if self.nodes[node].key.cmp(key) == Ordering::Less {
                current = self.nodes[node].child(RIGHT);
            } else {
                bound = current;
                current = self.nodes[node].child(LEFT);
            }
        }
        Cursor(bound)
    }

    /// The first element whose key is greater than `key`, or the end
    /// position.
    pub fn upper_bound(&self, key: &K) -> Cursor {
        let mut bound = Link::End;
        let mut current = self.root;
        while let Link::Node(node) = current {
            if key.cmp(&self.nodes[node].key) == Ordering::Less {
                bound = current;
                current = self.nodes[node].child(LEFT);
            } else {
                current = self.nodes[node].child(RIGHT);
            }
        }
        Cursor(bound)
    }

    /// The run of elements with keys equal to `key`, as
    /// `(lower_bound, upper_bound)`.
    pub fn equal_range(&self, key: &K) -> (Cursor, Cursor) {
        (self.lower_bound(key), self.upper_bound(key))
    }

    /// Number of elements with keys equal to `key`, in O(log n).
    pub fn count(&self, key: &K) -> usize {
        let (low, high) = self.equal_range(key);
        self.rank(high) - self.rank(low)
    }

    /// The element at `index` in the in-order sequence (zero-based), or the
    /// end position when `index >= len()`.
    pub fn select(&self, index: usize) -> Cursor {
        if index >= self.size {
            return Cursor::END;
        }
        let mut index = index;
        let mut current = self.root;
        while let Link::Node(node) = current {
            let left = self.nodes[node].child(LEFT);
            let left_size = link_size(&self.nodes, left);
            match index.cmp(&left_size) {
                Ordering::Less => current = left,
                Ordering::Equal => return Cursor(current),
                Ordering::Greater => {
                    index -= left_size + 1;
                    current = self.nodes[node].child(RIGHT);
                }
            }
        }
        unreachable!("subtree size propagation is inconsistent with len()");
    }

    /// Number of elements before `cursor` in the in-order sequence;
    /// `len()` for the end position.
    pub fn rank(&self, cursor: Cursor) -> usize {
        let Some(node) = cursor.node() else {
            return self.size;
        };
        let mut rank = link_size(&self.nodes, self.nodes[node].child(LEFT));
        let mut child = node;
        let mut parent = self.nodes[node].parent;
        while let Link::Node(p) = parent {
            if self.nodes[p].child(RIGHT) == Link::Node(child) {
                rank += link_size(&self.nodes, self.nodes[p].child(LEFT)) + 1;
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        rank
    }

    /// The element at the `alpha`-quantile of the in-order sequence, with
    /// `alpha` clamped to the valid range; the end position only when the
    /// tree is empty.
    pub fn quantile(&self, alpha: f64) -> Cursor {
        if self.size == 0 {
            return Cursor::END;
        }
        let raw = (alpha * self.size as f64).floor();
        let index = if raw < 0.0 {
            0
        } else if raw >= (self.size - 1) as f64 {
            self.size - 1
        } else {
            raw as usize
        };
        self.select(index)
    }

    /// Like [`Self::find`], restricted to the subset selected by `filter`.
    pub fn find_filtered<F: DownFilter<K, V, A>>(&self, key: &K, filter: &F) -> Cursor {
        let cursor = self.lower_bound_filtered(key, filter);
        match cursor.node() {
            Some(node) if self.nodes[node].key.cmp(key) == Ordering::Equal => cursor,
            _ => Cursor::END,
        }
    }

    /// Whether the subset selected by `filter` contains a key equal to
    /// `key`.
    pub fn contains_filtered<F: DownFilter<K, V, A>>(&self, key: &K, filter: &F) -> bool {
        !self.find_filtered(key, filter).is_end()
    }

    /// The first subset element whose key is not less than `key`, or the
    /// end position.
    pub fn lower_bound_filtered<F: DownFilter<K, V, A>>(&self, key: &K, filter: &F) -> Cursor {
        let bound = self.lower_bound(key);
        let Some(node) = bound.node() else {
            return Cursor::END;
        };
        if filter.matches(self.filter_node(node)) {
            bound
        } else {
            self.next_filtered(bound, filter)
        }
    }

    /// The first subset element whose key is greater than `key`, or the
    /// end position.
    pub fn upper_bound_filtered<F: DownFilter<K, V, A>>(&self, key: &K, filter: &F) -> Cursor {
        let bound = self.upper_bound(key);
        let Some(node) = bound.node() else {
            return Cursor::END;
        };
        if filter.matches(self.filter_node(node)) {
            bound
        } else {
            self.next_filtered(bound, filter)
        }
    }
}
