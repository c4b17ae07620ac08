/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Whole-tree split and join.
//!
//! Both ride on one primitive: joining two order-disjoint tree fragments
//! around a pivot node. The pivot is grafted into the taller fragment at
//! the depth where the black heights match, exactly like an insertion, so
//! the red-violation repair from the insert path finishes the job.
//!
//! Join detaches an extreme element of the taller tree to serve as the
//! pivot. Split walks from the split point to the root, peeling off each
//! ancestor's far subtree and folding it into a left or right accumulator
//! with the ancestor itself as the pivot.
//!
//! A tree fragment is a subtree cut loose from its parent together with
//! its black height; fragment roots are kept black, which costs at most
//! one recoloring per cut and keeps the graft arithmetic simple.

use std::collections::HashMap;

use super::erase::rebalance_black_loss;
use super::insert::rebalance_red_violation;
use super::{RedBlackTree, is_red, link, link_size, update, update_to_root};
use crate::aggregate::Aggregate;
use crate::arena::{NodeArena, NodeKey};
use crate::cursor::Cursor;
use crate::node::{LEFT, Link, Node, RIGHT, Side};

/// A subtree cut loose from a tree, with its black height.
///
/// The root is black (or the fragment is empty) and its parent link is the
/// end sentinel.
#[derive(Debug, Clone, Copy)]
struct Frag {
    root: Link,
    black_height: u32,
}

impl Frag {
    const EMPTY: Frag = Frag {
        root: Link::Bottom,
        black_height: 0,
    };
}

/// Bring a freshly cut subtree into fragment form: detach its parent link
/// and recolor a red root black, which raises the fragment's black height
/// by one.
fn normalize<K, V, A: Aggregate<K, V>>(nodes: &mut NodeArena<Node<K, V, A>>, frag: &mut Frag) {
    match frag.root {
        Link::Node(root) => {
            nodes[root].parent = Link::End;
            if nodes[root].red {
                nodes[root].red = false;
                frag.black_height += 1;
                update(nodes, root);
            }
        }
        Link::Bottom | Link::End => {
            frag.root = Link::Bottom;
            frag.black_height = 0;
        }
    }
}

/// Join two order-disjoint fragments around a detached pivot node, with
/// every key of `left` at most the pivot's and every key of `right` at
/// least the pivot's.
///
/// The pivot is grafted red at the depth of the taller fragment where the
/// black heights match, replacing the node found there and adopting it and
/// the shorter fragment as children; the insertion repair then restores
/// the red-black invariants. O(difference of the black heights).
fn join_frags<K, V, A: Aggregate<K, V>>(
    nodes: &mut NodeArena<Node<K, V, A>>,
    mut left: Frag,
    pivot: NodeKey,
    mut right: Frag,
) -> Frag {
    normalize(nodes, &mut left);
    normalize(nodes, &mut right);
    nodes[pivot].isolate();

    if left.black_height == right.black_height {
        // the pivot tops both fragments as a new black root
        let mut root = Link::Node(pivot);
        link(nodes, &mut root, Link::Node(pivot), left.root, LEFT);
        link(nodes, &mut root, Link::Node(pivot), right.root, RIGHT);
        nodes[pivot].red = false;
        update(nodes, pivot);
        return Frag {
            root,
            black_height: left.black_height + 1,
        };
    }

    let left_taller = left.black_height > right.black_height;
    let (mut tall, short) = if left_taller {
        (left, right)
    } else {
        (right, left)
    };
    // the spine facing the shorter fragment
    let dir = left_taller;

    // descend to the first black position whose black height matches the
    // shorter fragment; a red node at matching height steps once more,
    // onto its necessarily black child
    let mut graft = tall.root;
    let mut graft_parent = Link::End;
    let mut height = tall.black_height;
    loop {
        let black = !is_red(nodes, graft);
        if black && height == short.black_height {
            break;
        }
        if black {
            height -= 1;
        }
        graft_parent = graft;
        graft = nodes[graft.expect_node()].child(dir);
    }

    // the pivot takes the found position, adopting the found subtree on
    // its taller flank and the shorter fragment on the other
    link(nodes, &mut tall.root, graft_parent, Link::Node(pivot), dir);
    let (pivot_left, pivot_right) = if left_taller {
        (graft, short.root)
    } else {
        (short.root, graft)
    };
    link(nodes, &mut tall.root, Link::Node(pivot), pivot_left, LEFT);
    link(nodes, &mut tall.root, Link::Node(pivot), pivot_right, RIGHT);
    update(nodes, pivot);

    // the pivot is red: both flanks keep their black counts, and the only
    // possible violation is red-on-red at the graft point
    let from = rebalance_red_violation(nodes, &mut tall.root, &mut tall.black_height, pivot);
    update_to_root(nodes, from);

    Frag {
        root: tall.root,
        black_height: tall.black_height,
    }
}

/// Detach the extreme node of a fragment in direction `dir` and restore
/// the fragment's invariants, returning the detached node.
fn detach_extreme<K, V, A: Aggregate<K, V>>(
    nodes: &mut NodeArena<Node<K, V, A>>,
    frag: &mut Frag,
    dir: Side,
) -> NodeKey {
    let mut extreme = frag.root.expect_node();
    while let Link::Node(child) = nodes[extreme].child(dir) {
        extreme = child;
    }
    let child = nodes[extreme].child(!dir);
    let parent = nodes[extreme].parent;
    let was_root = Link::Node(extreme) == frag.root;
    let was_red = nodes[extreme].red;

    link(nodes, &mut frag.root, parent, child, dir);

    if was_root {
        if is_red(nodes, child) {
            nodes[child.expect_node()].red = false;
        } else {
            frag.black_height -= 1;
        }
        if frag.root.is_sentinel() {
            frag.root = Link::Bottom;
        }
        update_to_root(nodes, child);
    } else if was_red {
        update_to_root(nodes, parent);
    } else if is_red(nodes, child) {
        nodes[child.expect_node()].red = false;
        update_to_root(nodes, child);
    } else {
        rebalance_black_loss(nodes, &mut frag.root, &mut frag.black_height, parent, dir);
    }

    extreme
}

/// Move the subtree rooted at `root` from `src` into `dst`, returning its
/// root link in `dst`. The subtree root's parent must be the end sentinel
/// and the subtree must not contain ordered-end links.
fn adopt<K, V, A>(
    dst: &mut NodeArena<Node<K, V, A>>,
    src: &mut NodeArena<Node<K, V, A>>,
    root: Link,
) -> Link {
    fn remap(mapping: &HashMap<NodeKey, NodeKey>, link: Link) -> Link {
        match link {
            Link::Node(key) => Link::Node(
                *mapping
                    .get(&key)
                    .expect("adopted subtree refers to a node outside itself"),
            ),
            Link::Bottom | Link::End => link,
        }
    }

    let Link::Node(src_root) = root else {
        return Link::Bottom;
    };

    let mut mapping = HashMap::new();
    let mut moved = Vec::new();
    let mut stack = vec![src_root];
    while let Some(key) = stack.pop() {
        let node = src.remove(key);
        if let Link::Node(child) = node.child(LEFT) {
            stack.push(child);
        }
        if let Link::Node(child) = node.child(RIGHT) {
            stack.push(child);
        }
        let new_key = dst.insert(node);
        mapping.insert(key, new_key);
        moved.push(new_key);
    }

    for &key in &moved {
        let node = &mut dst[key];
        node.parent = remap(&mapping, node.parent);
        node.child[0] = remap(&mapping, node.child[0]);
        node.child[1] = remap(&mapping, node.child[1]);
    }

    remap(&mapping, Link::Node(src_root))
}

impl<K: Ord, V, A: Aggregate<K, V>> RedBlackTree<K, V, A> {
    /// Split off the elements from `cursor` (inclusive) to the end into a
    /// new tree, keeping the elements before `cursor` in this one.
    ///
    /// Splitting at the end position returns an empty tree and leaves this
    /// one untouched. Cursors to the moved elements are invalidated.
    ///
    /// O(log² n) structural work, plus relocation of the moved elements'
    /// node storage into the new tree.
    ///
    /// # Panics
    ///
    /// Panics if `cursor` refers to an element that was erased or moved to
    /// another tree.
    pub fn split_at(&mut self, cursor: Cursor) -> Self {
        let mut right_tree = Self::new(self.multiple_keys);
        let Some(split_node) = cursor.node() else {
            return right_tree;
        };
        assert!(
            self.nodes.contains(split_node),
            "stale or foreign cursor passed to split_at"
        );

        self.sanitize_extremes();

        // record the ancestor path before the joins below tear it apart,
        // and count the black nodes above the split point to seed the
        // black-height bookkeeping
        let mut path = Vec::new();
        let mut blacks_above = 0;
        let mut child = split_node;
        let mut parent = self.nodes[child].parent;
        while let Link::Node(p) = parent {
            let from_right = self.nodes[p].child(RIGHT) == Link::Node(child);
            path.push((p, from_right));
            if !self.nodes[p].red {
                blacks_above += 1;
            }
            child = p;
            parent = self.nodes[p].parent;
        }

        // height = black height of the subtree rooted at the current path
        // position, counting the position itself when black
        let mut height = self.black_height - blacks_above;
        let node_black = !self.nodes[split_node].red;
        let child_height = height - u32::from(node_black);

        let mut left = Frag {
            root: self.nodes[split_node].child(LEFT),
            black_height: child_height,
        };
        let right_sub = Frag {
            root: self.nodes[split_node].child(RIGHT),
            black_height: child_height,
        };
        // the split node itself is the least element of the right part
        let mut right = join_frags(&mut self.nodes, Frag::EMPTY, split_node, right_sub);

        for (ancestor, from_right) in path {
            let ancestor_black = !self.nodes[ancestor].red;
            height += u32::from(ancestor_black);
            let sub_height = height - u32::from(ancestor_black);
            if from_right {
                // the ancestor and its left subtree precede the split point
                let sub = Frag {
                    root: self.nodes[ancestor].child(LEFT),
                    black_height: sub_height,
                };
                left = join_frags(&mut self.nodes, sub, ancestor, left);
            } else {
                let sub = Frag {
                    root: self.nodes[ancestor].child(RIGHT),
                    black_height: sub_height,
                };
                right = join_frags(&mut self.nodes, right, ancestor, sub);
            }
        }

        normalize(&mut self.nodes, &mut left);
        self.root = left.root;
        self.black_height = left.black_height;
        self.size = link_size(&self.nodes, self.root);
        self.refresh_extremes();

        right_tree.root = adopt(&mut right_tree.nodes, &mut self.nodes, right.root);
        right_tree.black_height = right.black_height;
        right_tree.size = link_size(&right_tree.nodes, right_tree.root);
        right_tree.refresh_extremes();

        self.debug_check();
        right_tree.debug_check();
        right_tree
    }

    /// Split off the elements with keys not less than `key` into a new
    /// tree, keeping the elements with smaller keys in this one.
    ///
    /// See [`Self::split_at`].
    pub fn split(&mut self, key: &K) -> Self {
        let cursor = self.lower_bound(key);
        self.split_at(cursor)
    }

    /// Move every element of `other` into this tree, leaving `other`
    /// empty.
    ///
    /// The key ranges must not interleave: one tree's keys must all come
    /// before the other's. Equal boundary keys are allowed only for
    /// multi-key trees. Cursors into `other` are invalidated.
    ///
    /// O(log n) structural work, plus relocation of `other`'s node storage
    /// into this tree.
    ///
    /// # Panics
    ///
    /// Panics if the key ranges overlap, or if the trees disagree on the
    /// duplicate-key configuration.
    pub fn join(&mut self, other: &mut Self) {
        assert_eq!(
            self.multiple_keys, other.multiple_keys,
            "join requires the same duplicate-key configuration on both trees"
        );
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            std::mem::swap(self, other);
            return;
        }

        let other_on_right = {
            let self_max = &self.nodes[self.max.expect_node()].key;
            let other_min = &other.nodes[other.min.expect_node()].key;
            if self.multiple_keys {
                self_max <= other_min
            } else {
                self_max < other_min
            }
        };
        let other_on_left = {
            let self_min = &self.nodes[self.min.expect_node()].key;
            let other_max = &other.nodes[other.max.expect_node()].key;
            if self.multiple_keys {
                other_max <= self_min
            } else {
                other_max < self_min
            }
        };
        assert!(
            other_on_right || other_on_left,
            "join precondition violated: the key ranges overlap"
        );

        self.sanitize_extremes();
        other.sanitize_extremes();

        let adopted = adopt(&mut self.nodes, &mut other.nodes, other.root);
        let other_frag = Frag {
            root: adopted,
            black_height: other.black_height,
        };
        let self_frag = Frag {
            root: self.root,
            black_height: self.black_height,
        };
        let (mut left, mut right) = if other_on_right {
            (self_frag, other_frag)
        } else {
            (other_frag, self_frag)
        };

        // the pivot comes off the taller side, so detaching it cannot
        // make that side shorter than the other by more than its repair
        // already accounts for
        let pivot = if left.black_height >= right.black_height {
            detach_extreme(&mut self.nodes, &mut left, RIGHT)
        } else {
            detach_extreme(&mut self.nodes, &mut right, LEFT)
        };
        let joined = join_frags(&mut self.nodes, left, pivot, right);

        self.root = joined.root;
        self.black_height = joined.black_height;
        self.size = link_size(&self.nodes, self.root);
        self.refresh_extremes();

        other.clear();

        self.debug_check();
        other.debug_check();
    }
}
