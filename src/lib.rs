//! A height-balanced (AVL) search tree for Rust.
//!
//! This crate provides [`AvlTreeSet`], an ordered set that keeps itself balanced
//! under arbitrary insertion/removal sequences, guaranteeing O(log n) operations:
//!
//! - [`insert`](AvlTreeSet::insert) / [`remove`](AvlTreeSet::remove) - O(log n) mutation
//!   with local rotations restoring balance on the way back to the root
//! - [`contains`](AvlTreeSet::contains) - O(log n) lookup
//! - [`height`](AvlTreeSet::height) - O(1) cached tree height
//! - [`iter`](AvlTreeSet::iter) - in-order (sorted) traversal
//!
//! # Example
//!
//! ```
//! use avl_tree::AvlTreeSet;
//!
//! let mut set = AvlTreeSet::new();
//!
//! // Ten ascending inserts would degenerate a naive BST to a height-9 chain;
//! // rotations keep the tree at the minimum possible height instead.
//! for i in 0..10 {
//!     set.insert(i);
//! }
//! assert_eq!(set.len(), 10);
//! assert_eq!(set.height(), 3);
//!
//! set.remove(&1);
//! set.remove(&2);
//! assert_eq!(set.len(), 8);
//! assert!(set.contains(&9));
//! assert!(!set.contains(&1));
//!
//! // In-order iteration yields the elements in sorted order.
//! let sorted: Vec<_> = set.iter().copied().collect();
//! assert_eq!(sorted, [0, 3, 4, 5, 6, 7, 8, 9]);
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Familiar API** - Mirrors `std::collections::BTreeSet` where the operations overlap
//! - **O(1) height queries** - Every node caches its subtree height (the same
//!   bookkeeping that drives rebalancing)
//! - **Arena storage** - Nodes live in a contiguous slot arena and link to each other
//!   by index handles, so rotations are plain handle reassignment
//!
//! # Implementation
//!
//! The set is an AVL tree: for every node, the heights of its two subtrees differ
//! by at most one. Each mutation descends from the root recording its path, applies
//! the structural change at the bottom, then unwinds the path recomputing cached
//! heights and rotating wherever a node's balance factor leaves {-1, 0, 1}. This
//! bounds the height at ~1.44 log2(n), so every operation is O(log n).

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: Unlike a B-tree, an AVL tree needs no unsafe code: all links are arena
// handles and all traversal state is index-based.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod raw;

pub mod avl_tree_set;

pub use avl_tree_set::AvlTreeSet;
