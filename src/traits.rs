//! The priority-queue contract shared by the heaps of this crate.

use crate::{Handle, Key, Remap, Result};

/// An addressable, mergeable min-heap.
///
/// Every element is stored together with a key. Inserting returns a
/// [`Handle`](struct.Handle.html) that stays valid until the element is
/// extracted or deleted, and that is required by `decrease_key` and `delete`.
///
/// # Example
///
/// ```rust
/// use mergeable_heaps::{FibonacciHeap, MergeableHeap};
///
/// let mut heap = FibonacciHeap::new();
/// let a = heap.insert('a', 10);
/// heap.insert('b', 5);
/// heap.decrease_key(a, 1).unwrap();
/// assert_eq!(heap.extract_min(), Some((1, 'a')));
/// ```
pub trait MergeableHeap<T, K>: Sized
where
	K: Key,
{
	/// Creates a new empty heap.
	fn new() -> Self;

	/// Returns the number of elements stored in the heap.
	fn len(&self) -> usize;

	/// Returns true if the heap is empty.
	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Inserts `elem` with the associated `key` and returns a handle to it.
	fn insert(&mut self, elem: T, key: K) -> Handle;

	/// Returns the handle of an element with the minimum key.
	fn minimum(&self) -> Option<Handle>;

	/// Returns a reference to the element with the minimum key.
	fn peek(&self) -> Option<&T>;

	/// Returns the current key of the element addressed by `handle`.
	fn key(&self, handle: Handle) -> Option<K>;

	/// Removes the element with the minimum key and returns it with its key.
	fn extract_min(&mut self) -> Option<(K, T)>;

	/// Lowers the key of the element addressed by `handle` to `new_key`.
	///
	/// # Errors
	///
	/// - `Error::InvalidDecreaseKey` if `new_key` is greater than the current key.
	/// - `Error::InvalidHandle` if `handle` does not address a live element.
	fn decrease_key(&mut self, handle: Handle, new_key: K) -> Result<()>;

	/// Removes the element addressed by `handle` and returns it with its key.
	fn delete(&mut self, handle: Handle) -> Result<(K, T)>;

	/// Moves all elements of `other` into this heap.
	///
	/// The nodes of `other` are moved into the arena of `self`, which costs O(m)
	/// for an `other` of `m` elements. Handles of `self` stay valid, the returned
	/// `Remap` translates handles of `other` into handles of `self`.
	fn union(&mut self, other: Self) -> Remap;
}
