#![deny(unused_imports)]
#![deny(missing_docs)]
#![cfg_attr(all(feature = "bench", test), feature(test))]

//! Addressable binomial and Fibonacci heaps for Rust.
//!
//! Addressable heaps return handles to stored elements that make it possible
//! to query and edit them. For example this allows for the `decrease_key(h: Handle, k: Key)`
//! method that decreases the key (priority) of the element that is associated with the
//! given handle, and for `delete(h: Handle)` that removes an arbitrary element.
//!
//! Both heaps are mergeable: `union` moves all elements of another heap of the same
//! kind into this one.
//!
//! - [`BinomialHeap`](binomial/struct.BinomialHeap.html) keeps a root list of binomial
//!   trees sorted by strictly increasing degree. Insert, extract-min, decrease-key
//!   and delete are O(log n).
//! - [`FibonacciHeap`](fibonacci/struct.FibonacciHeap.html) keeps a lazy ring of
//!   heap-ordered trees. Insert and decrease-key are O(1) amortized,
//!   extract-min and delete O(log n) amortized.
//!
//! Every heap owns the arena its nodes live in, so `union` has to move the nodes
//! of the absorbed heap over. It costs O(m) for an absorbed heap of `m` elements
//! on top of the structural meld, and the absorbed heap's handles change: they
//! have to be translated through the returned [`Remap`](struct.Remap.html).
//!
//! Both implementations store their nodes within a `Stash` that allocates them
//! densely within an array; all structural links are indices into it.
//!
//! It is possible to use custom types as the underlying `Key` type by implementing
//! the `Key` trait.
//!
//! # Example
//!
//! ```rust
//! use mergeable_heaps::{BinomialHeap, MergeableHeap};
//!
//! let mut fst = BinomialHeap::new();
//! fst.insert("seven", 7);
//! let three = fst.insert("three", 3);
//!
//! let mut snd = BinomialHeap::new();
//! let five = snd.insert("five", 5);
//!
//! let remap = fst.union(snd);
//! let five = remap.get(five).unwrap();
//! fst.decrease_key(five, 1).unwrap();
//! fst.delete(three).unwrap();
//!
//! assert_eq!(fst.extract_min(), Some((1, "five")));
//! assert_eq!(fst.extract_min(), Some((7, "seven")));
//! assert_eq!(fst.extract_min(), None);
//! ```

#[cfg(all(feature = "bench", test))]
extern crate test;

pub mod binomial;
mod error;
pub mod fibonacci;
mod handle;
mod traits;

pub use crate::binomial::BinomialHeap;
pub use crate::error::{Error, Result};
pub use crate::fibonacci::FibonacciHeap;
pub use crate::handle::{Handle, Remap};
pub use crate::traits::MergeableHeap;

/// Represents a trait for keys within an addressable heap.
///
/// A user can use custom type for the key type by implementing this trait.
///
/// This trait is implicitely implemented already for all types that
/// are `Copy`, `PartialOrd` and `Ord`.
pub trait Key: Copy + PartialOrd + Ord {}
impl<T> Key for T where T: Copy + PartialOrd + Ord {}
