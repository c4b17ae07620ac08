/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Ordered traversal, plain and filtered.

use crate::helpers::{keys_of, only_marked, sample_marked_map, set_of};
use rbtree_rs::RedBlackTree;

#[test]
fn in_order_iteration() {
    let tree = set_of(&[5, 3, 8, 1, 4, 7, 9]);
    assert_eq!(keys_of(&tree), vec![1, 3, 4, 5, 7, 8, 9]);
    assert_eq!(tree.iter().len(), 7);

    let reversed: Vec<i32> = tree.keys().rev().copied().collect();
    assert_eq!(reversed, vec![9, 8, 7, 5, 4, 3, 1]);
}

#[test]
fn iteration_can_meet_in_the_middle() {
    let tree = set_of(&[1, 2, 3, 4]);
    let mut iter = tree.keys();
    assert_eq!(iter.next(), Some(&1));
    assert_eq!(iter.next_back(), Some(&4));
    assert_eq!(iter.next(), Some(&2));
    assert_eq!(iter.next_back(), Some(&3));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);
}

#[test]
fn values_follow_key_order() {
    let mut tree: RedBlackTree<i32, &str> = RedBlackTree::new(false);
    tree.insert(2, "two");
    tree.insert(1, "one");
    tree.insert(3, "three");
    let values: Vec<&str> = tree.values().copied().collect();
    assert_eq!(values, vec!["one", "two", "three"]);
    for (key, value) in &tree {
        assert_eq!(tree.get(key), Some(value));
    }
}

#[test]
fn cursor_walk_wraps_at_the_end() {
    let tree = set_of(&[1, 2, 3, 4]);

    // the successor of the end position is the first element
    let mut cursor = tree.end();
    cursor = tree.next(cursor);
    assert_eq!(*tree.key(cursor), 1);

    // the predecessor of the first element is the end position
    cursor = tree.prev(cursor);
    assert_eq!(cursor, tree.end());

    // the predecessor of the end position is the last element
    cursor = tree.prev(cursor);
    assert_eq!(*tree.key(cursor), 4);

    // the successor of the last element is the end position
    cursor = tree.next(cursor);
    assert_eq!(cursor, tree.end());
}

#[test]
fn cursor_walk_visits_everything() {
    let tree = set_of(&[5, 3, 8, 1, 4, 7, 9]);
    let mut collected = Vec::new();
    let mut cursor = tree.begin();
    while !cursor.is_end() {
        collected.push(*tree.key(cursor));
        cursor = tree.next(cursor);
    }
    assert_eq!(collected, vec![1, 3, 4, 5, 7, 8, 9]);

    let mut reversed = Vec::new();
    let mut cursor = tree.last();
    while !cursor.is_end() {
        reversed.push(*tree.key(cursor));
        cursor = tree.prev(cursor);
    }
    assert_eq!(reversed, vec![9, 8, 7, 5, 4, 3, 1]);
}

#[test]
fn filtered_walk_visits_only_the_marked_subset() {
    let map = sample_marked_map();
    let filter = only_marked();

    let mut cursor = map.begin();
    assert_eq!(*map.key(cursor), 2);

    for expected in [5, 10, 14, 20] {
        cursor = map.next_filtered(cursor, &filter);
        assert!(!cursor.is_end());
        assert_eq!(*map.key(cursor), expected);
    }
    cursor = map.next_filtered(cursor, &filter);
    assert!(cursor.is_end());

    // and back down again
    for expected in [20, 14, 10, 5] {
        cursor = map.prev_filtered(cursor, &filter);
        assert!(!cursor.is_end());
        assert_eq!(*map.key(cursor), expected);
    }
    // no marked element precedes 5
    cursor = map.prev_filtered(cursor, &filter);
    assert!(cursor.is_end());
}

#[test]
fn plain_walk_is_unaffected_by_marks() {
    let map = sample_marked_map();
    let keys: Vec<i32> = map.keys().copied().collect();
    assert_eq!(keys, vec![2, 4, 5, 6, 9, 10, 14, 16, 19, 20]);
}

#[test]
fn filtered_iterator_collects_the_subset() {
    let map = sample_marked_map();
    let filter = only_marked();
    let marked: Vec<i32> = map.iter_filtered(&filter).map(|(k, _)| *k).collect();
    assert_eq!(marked, vec![5, 10, 14, 20]);
}

#[test]
fn filtered_iteration_without_matches_is_empty() {
    let filter = only_marked();

    let empty = crate::helpers::marked_map(&[]);
    assert_eq!(empty.iter_filtered(&filter).count(), 0);

    let unmarked = crate::helpers::marked_map(&[(1, false), (2, false), (3, false)]);
    assert_eq!(unmarked.iter_filtered(&filter).count(), 0);
    assert!(unmarked.next_filtered(unmarked.begin(), &filter).is_end());
}

#[test]
fn marks_survive_rebalancing_churn() {
    // aggregates must stay correct through rotations and recolorings
    let mut map = crate::helpers::marked_map(&[]);
    for key in 0..200 {
        map.insert(key, key % 17 == 3);
    }
    for key in (0..200).step_by(3) {
        map.erase_key(&key);
    }
    map.check_tree_invariants();

    let filter = only_marked();
    let expected: Vec<i32> = (0..200)
        .filter(|k| k % 17 == 3 && k % 3 != 0)
        .collect();
    let marked: Vec<i32> = map.iter_filtered(&filter).map(|(k, _)| *k).collect();
    assert_eq!(marked, expected);
}
