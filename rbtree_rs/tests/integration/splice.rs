/*
 * Copyright (c) 2006-Present, Redis Ltd.
 * All rights reserved.
 *
 * Licensed under your choice of the Redis Source Available License 2.0
 * (RSALv2); or (b) the Server Side Public License v1 (SSPLv1); or (c) the
 * GNU Affero General Public License v3 (AGPLv3).
*/

//! Moving single elements between trees.

use crate::helpers::{keys_of, multi_of, set_of};
use rbtree_rs::RedBlackTree;

#[test]
fn splice_moves_one_element() {
    let mut a = set_of(&[0, 1, 4, 5, 9, 15, 20]);
    let mut b = set_of(&[2, 6, 7, 8, 10, 11, 12]);

    let six = b.find(&6);
    let cursor = a.splice(&mut b, six);
    a.check_tree_invariants();
    b.check_tree_invariants();
    assert_eq!(*a.key(cursor), 6);
    assert_eq!(a.len(), 8);
    assert_eq!(keys_of(&a), vec![0, 1, 4, 5, 6, 9, 15, 20]);
    assert_eq!(b.len(), 6);
    assert_eq!(keys_of(&b), vec![2, 7, 8, 10, 11, 12]);

    let ten = b.find(&10);
    let cursor = a.splice(&mut b, ten);
    a.check_tree_invariants();
    b.check_tree_invariants();
    assert_eq!(*a.key(cursor), 10);
    assert_eq!(keys_of(&a), vec![0, 1, 4, 5, 6, 9, 10, 15, 20]);
    assert_eq!(keys_of(&b), vec![2, 7, 8, 11, 12]);
}

#[test]
fn splice_preserves_the_value() {
    let mut a: RedBlackTree<i32, String> = RedBlackTree::new(false);
    a.insert(1, "one".to_owned());
    let mut b: RedBlackTree<i32, String> = RedBlackTree::new(false);
    b.insert(2, "two".to_owned());

    let begin = b.begin();
    let cursor = a.splice(&mut b, begin);
    assert_eq!(a.value(cursor), "two");
    assert!(b.is_empty());
    assert_eq!(keys_of_str(&a), vec![1, 2]);
}

fn keys_of_str(tree: &RedBlackTree<i32, String>) -> Vec<i32> {
    tree.keys().copied().collect()
}

#[test]
fn splice_into_a_multiset_with_equal_keys() {
    let mut a = multi_of(&[1, 5, 5, 9]);
    let mut b = multi_of(&[5, 7]);
    let five = b.find(&5);
    let cursor = a.splice(&mut b, five);
    a.check_tree_invariants();
    b.check_tree_invariants();
    assert_eq!(*a.key(cursor), 5);
    assert_eq!(keys_of(&a), vec![1, 5, 5, 5, 9]);
    assert_eq!(keys_of(&b), vec![7]);
    // an equal key appends after the existing run
    assert_eq!(a.rank(cursor), 3);
}

#[test]
fn splice_emptying_the_source() {
    let mut a = set_of(&[1]);
    let mut b = set_of(&[2]);
    let begin = b.begin();
    a.splice(&mut b, begin);
    assert!(b.is_empty());
    assert_eq!(b.begin(), b.end());
    assert_eq!(keys_of(&a), vec![1, 2]);

    b.insert(3, ());
    assert_eq!(keys_of(&b), vec![3]);
}

#[test]
#[should_panic(expected = "duplicate a key")]
fn splice_rejects_duplicates_in_unique_trees() {
    let mut a = set_of(&[1, 2, 3]);
    let mut b = set_of(&[2, 4]);
    let two = b.find(&2);
    a.splice(&mut b, two);
}

#[test]
#[should_panic(expected = "dereferenced the end cursor")]
fn splice_rejects_the_end_cursor() {
    let mut a = set_of(&[1]);
    let mut b = set_of(&[2]);
    let end = b.end();
    a.splice(&mut b, end);
}
