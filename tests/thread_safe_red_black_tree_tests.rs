//! Integration tests for sharing RedBlackTree between threads.
//!
//! These tests verify that trees work correctly with the `arc` feature
//! enabled: versions can be read and extended from many threads at once.

#![cfg(feature = "arc")]

use persistent_rbtree::persistent::RedBlackTree;
use rstest::rstest;
use std::sync::Arc;
use std::thread;

#[rstest]
fn test_tree_cross_thread_structural_sharing() {
    let original: Arc<RedBlackTree<i32>> = Arc::new((0..10).map(|index| index * 10).collect());

    let handles: Vec<_> = (0..4)
        .map(|index| {
            let tree_clone = Arc::clone(&original);
            thread::spawn(move || {
                // Each thread creates a new version
                let extended = tree_clone.insert(index * 10 + 5);
                assert_eq!(extended.len(), 11);
                // Original should be unchanged
                assert_eq!(tree_clone.len(), 10);
                extended
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("Thread panicked"))
        .collect();

    for (index, tree) in (0..).zip(&results) {
        assert!(tree.contains(&(index * 10 + 5)));
        assert!(tree.validate().is_ok());
    }

    assert_eq!(
        original.flatten(),
        (0..10).map(|index| index * 10).collect::<Vec<_>>()
    );
}

#[rstest]
fn test_tree_moved_into_thread() {
    let tree: RedBlackTree<String> = ["delta", "alpha", "charlie"]
        .into_iter()
        .map(String::from)
        .collect();

    let handle = thread::spawn(move || tree.insert("bravo".to_string()).flatten());
    let flattened = handle.join().expect("Thread panicked");

    assert_eq!(flattened, vec!["alpha", "bravo", "charlie", "delta"]);
}

#[rstest]
fn test_tree_built_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|chunk| {
            let range = chunk * 250..(chunk + 1) * 250;
            thread::spawn(move || range.collect::<RedBlackTree<i32>>())
        })
        .collect();

    let mut merged = RedBlackTree::empty();
    for handle in handles {
        let part = handle.join().expect("Thread panicked");
        for &element in &part {
            merged = merged.insert(element);
        }
    }

    assert_eq!(merged.len(), 1000);
    assert_eq!(merged.flatten(), (0..1000).collect::<Vec<_>>());
    assert!(merged.validate().is_ok());
}
