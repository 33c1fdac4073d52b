#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A self-balancing AVL search tree.
///
/// This module provides an `AvlTree` ordered by a comparator closure, with
/// in-order, pre-order and post-order traversals.
pub mod avl_tree;

pub mod compare;

mod error;

pub mod hash;

/// A HashMap implementation using linear probing.
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers.
pub mod hash_map;

/// The open-addressing storage engine behind [`HashMap`].
///
/// A `HashTable` stores values of a single type and leaves hashing and
/// equality to the caller, who passes a precomputed hash and an equality
/// closure to every lookup.
pub mod hash_table;

/// A first-in, first-out queue.
pub mod queue;

pub use avl_tree::AvlTree;
pub use error::Error;
pub use hash::HashKind;
pub use hash_map::Entry;
#[cfg(feature = "foldhash")]
pub use hash_map::FoldHashMap;
pub use hash_map::HashMap;
pub use hash_table::HashTable;
pub use queue::Queue;
