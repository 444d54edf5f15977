//! An AVL-tree ordered map for Rust.
//!
//! This crate provides [`AvlTreeMap`], a sorted associative container in the mould of the
//! standard library's `BTreeMap`, built on a height-balanced binary search tree. On top of the
//! familiar map API it offers stable [`Position`]s with two positions outside the ordering
//! (one before the first entry, one past the last), bidirectional cursors, and
//! `lower_bound`/`upper_bound`/`equal_range` queries:
//!
//! - [`find`](AvlTreeMap::find) - Position of a key, or [`end`](AvlTreeMap::end)
//! - [`lower_bound`](AvlTreeMap::lower_bound) - First entry not ordered before a key
//! - [`upper_bound`](AvlTreeMap::upper_bound) - First entry ordered after a key
//! - [`next_position`](AvlTreeMap::next_position) / [`prev_position`](AvlTreeMap::prev_position) -
//!   Step through the map in either direction
//!
//! # Example
//!
//! ```
//! use wabi_avl::AvlTreeMap;
//!
//! let mut scores = AvlTreeMap::new();
//! scores.insert("Alice", 100);
//! scores.insert("Bob", 85);
//! scores.insert("Carol", 92);
//!
//! // Standard map operations work as expected
//! assert_eq!(scores.get(&"Bob"), Some(&85));
//! assert_eq!(scores.len(), 3);
//!
//! // Inserting an existing key keeps the stored value
//! let (_, inserted) = scores.insert("Bob", 0);
//! assert!(!inserted);
//! assert_eq!(scores[&"Bob"], 85);
//!
//! // Positions walk the map in key order
//! let bob = scores.find(&"Bob");
//! let carol = scores.next_position(bob);
//! assert_eq!(scores.get_at(carol), Some((&"Carol", &92)));
//! assert_eq!(scores.next_position(carol), scores.end());
//! ```
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Pluggable ordering** - Any strict weak order through the [`Compare`] trait
//! - **Stable positions** - Positions survive rotations and removal of other entries
//!
//! # Implementation
//!
//! Nodes live in a slot arena and are linked by 32-bit handles, with parent links so that
//! iterators and cursors step to the in-order successor or predecessor without a stack. Every
//! insertion and removal rebalances the path back to the root with single or double rotations,
//! keeping the height within about 1.44 log<sub>2</sub>(n + 2).

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
// NOTE: Mutable iteration hands out disjoint `&mut V` from one arena, which needs unsafe code.
// #![forbid(unsafe_code)]
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

pub mod avl_tree_map;
pub mod compare;

pub use avl_tree_map::{AvlTreeMap, Position};
pub use compare::{Compare, Less};
