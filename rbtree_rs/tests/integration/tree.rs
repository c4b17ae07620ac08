/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Construction, insertion, and erasure.

use crate::helpers::{IntSet, keys_of, multi_of, set_of};
use rbtree_rs::RedBlackTree;

#[test]
fn new_tree_is_empty() {
    let tree = IntSet::new(false);
    tree.check_tree_invariants();
    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.begin(), tree.end());
    assert_eq!(tree.last(), tree.end());
    assert_eq!(tree.height(), 0);
    assert_eq!(tree.black_height(), 0);
}

#[test]
fn insert_sequence() {
    let mut tree = IntSet::new(false);
    let mut expected = Vec::new();
    for key in [5, 3, 8, 1, 4, 7, 9] {
        let (cursor, inserted) = tree.insert(key, ());
        assert!(inserted);
        assert_eq!(*tree.key(cursor), key);
        assert_eq!(tree.find(&key), cursor);
        assert_eq!(tree.lower_bound(&key), cursor);
        expected.push(key);
        expected.sort_unstable();
        // validates root color, red-red freedom, and black-height balance
        tree.check_tree_invariants();
        assert_eq!(keys_of(&tree), expected);
    }
    assert_eq!(keys_of(&tree), vec![1, 3, 4, 5, 7, 8, 9]);
}

#[test]
fn duplicate_insert_returns_existing() {
    let mut tree = set_of(&[1, 5, 3]);
    let (cursor, inserted) = tree.insert(1, ());
    assert!(!inserted);
    assert_eq!(*tree.key(cursor), 1);
    assert_eq!(tree.len(), 3);
    tree.check_tree_invariants();
}

#[test]
fn construction_from_iterator_dedups() {
    let tree: IntSet = [4, 2, 1, 1, 1, 3].into_iter().map(|k| (k, ())).collect();
    tree.check_tree_invariants();
    assert_eq!(tree.len(), 4);
    assert_eq!(keys_of(&tree), vec![1, 2, 3, 4]);
}

#[test]
fn multi_key_insert_appends_after_equals() {
    let mut tree = IntSet::new(true);
    for key in [1, 1, 1, 5, 5, 5] {
        let (cursor, inserted) = tree.insert(key, ());
        assert!(inserted);
        // an equal key lands after all existing equals, so right before
        // the current end of its run; for the max that is the last slot
        assert_eq!(cursor, tree.prev(tree.upper_bound(&key)));
        tree.check_tree_invariants();
    }
    assert_eq!(tree.len(), 6);
    assert_eq!(keys_of(&tree), vec![1, 1, 1, 5, 5, 5]);
}

#[test]
fn ascending_build_stays_balanced() {
    let mut tree = RedBlackTree::<u32>::new(false);
    for key in 1..=1000 {
        tree.insert(key, ());
    }
    tree.check_tree_invariants();
    assert_eq!(tree.len(), 1000);
    assert!(
        tree.height() <= 20,
        "height {} exceeds the red-black bound",
        tree.height()
    );
}

#[test]
fn erase_scenarios() {
    let mut tree = set_of(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);

    // erasing an absent key leaves the tree unchanged
    assert_eq!(tree.erase_key(&0), 0);
    assert_eq!(keys_of(&tree), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    tree.check_tree_invariants();

    let steps: &[(i32, &[i32])] = &[
        (4, &[1, 2, 3, 5, 6, 7, 8, 9]),
        (7, &[1, 2, 3, 5, 6, 8, 9]),
        (1, &[2, 3, 5, 6, 8, 9]),
        (9, &[2, 3, 5, 6, 8]),
        (5, &[2, 3, 6, 8]),
        (3, &[2, 6, 8]),
        (2, &[6, 8]),
        (6, &[8]),
        (8, &[]),
    ];
    for &(key, expected) in steps {
        assert_eq!(tree.erase_key(&key), 1);
        tree.check_tree_invariants();
        assert_eq!(keys_of(&tree), expected);
    }
    assert!(tree.is_empty());
}

#[test]
fn erase_returns_successor() {
    let mut tree = set_of(&[1, 3, 5, 7]);
    let successor = tree.erase(tree.find(&3));
    assert_eq!(*tree.key(successor), 5);
    let successor = tree.erase(tree.find(&7));
    assert!(successor.is_end());
    tree.check_tree_invariants();
    assert_eq!(keys_of(&tree), vec![1, 5]);
}

#[test]
fn erase_at_end_is_noop() {
    let mut tree = set_of(&[1, 2, 3]);
    let cursor = tree.erase(tree.find(&42));
    assert!(cursor.is_end());
    assert_eq!(tree.len(), 3);
}

#[test]
#[should_panic(expected = "stale or foreign cursor")]
fn erase_with_stale_cursor_panics() {
    let mut tree = set_of(&[1, 2, 3]);
    let cursor = tree.find(&2);
    tree.erase(cursor);
    tree.erase(cursor);
}

#[test]
fn erase_key_removes_all_equals() {
    let mut tree = multi_of(&[3, 4, 5, 5, 5, 5, 5, 5, 5, 6, 7]);
    assert_eq!(tree.erase_key(&5), 7);
    tree.check_tree_invariants();
    assert_eq!(keys_of(&tree), vec![3, 4, 6, 7]);
}

#[test]
fn random_churn_keeps_invariants() {
    // a deterministic pseudo-random insert/erase churn over a bounded
    // working set, exercising both rebalancing paths repeatedly
    let mut tree = IntSet::new(false);
    let mut queue = std::collections::VecDeque::new();
    let mut state = 0x2545_f491u64;
    for bound in [1usize, 2, 3, 7, 20, 100] {
        tree.clear();
        queue.clear();
        for _ in 0..4 * bound {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let key = (state >> 33) as i32 % 100;
            if tree.insert(key, ()).1 {
                queue.push_back(key);
            }
            if tree.len() > bound {
                let victim = queue.pop_front().unwrap();
                assert_eq!(tree.erase_key(&victim), 1);
            }
            tree.check_tree_invariants();
        }
    }
}

#[test]
fn clear_resets_the_tree() {
    let mut tree = set_of(&[1, 2, 3, 4, 5]);
    tree.clear();
    tree.check_tree_invariants();
    assert!(tree.is_empty());
    assert_eq!(tree.begin(), tree.end());
    tree.insert(7, ());
    assert_eq!(keys_of(&tree), vec![7]);
}

#[test]
fn clone_is_a_deep_copy() {
    let original = set_of(&[1, 2, 3, 4, 5, 6, 7]);
    let mut copy = original.clone();
    copy.check_tree_invariants();
    assert_eq!(keys_of(&copy), keys_of(&original));

    copy.erase_key(&4);
    copy.insert(42, ());
    assert_eq!(keys_of(&original), vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(keys_of(&copy), vec![1, 2, 3, 5, 6, 7, 42]);
}

#[test]
fn swap_exchanges_contents() {
    let mut a = set_of(&[1, 2, 3]);
    let mut b = set_of(&[7, 8]);
    a.swap(&mut b);
    assert_eq!(keys_of(&a), vec![7, 8]);
    assert_eq!(keys_of(&b), vec![1, 2, 3]);
}

#[test]
fn values_are_mutable() {
    let mut tree: RedBlackTree<i32, i32> = RedBlackTree::new(false);
    tree.insert(1, 10);
    tree.insert(2, 20);

    *tree.get_mut(&1).unwrap() += 5;
    assert_eq!(tree.get(&1), Some(&15));

    let cursor = tree.find(&2);
    *tree.value_mut(cursor) = 7;
    assert_eq!(*tree.value(cursor), 7);
    assert_eq!(tree.get(&3), None);
}

#[test]
fn subtree_sizes_are_maintained() {
    let tree = set_of(&[1, 2, 3, 4, 5, 6, 7]);
    // the root subtree covers the whole tree, and the end position
    // reports the tree size
    assert_eq!(tree.subtree_size(tree.end()), 7);
    let begin = tree.begin();
    assert!(tree.subtree_size(begin) >= 1);
    assert_eq!(tree.entry(begin), Some((&1, &())));
    assert_eq!(tree.entry(tree.end()), None);
}
