//! An addressable Fibonacci heap.
//!
//! The heap is a collection of heap-ordered trees whose roots are linked in a
//! circular doubly linked ring. Every child list is such a ring, too. The heap
//! keeps a handle to the root with the minimum key.
//!
//! Work is deferred as long as possible: `insert` and `union` only splice rings
//! (`union` first has to move the absorbed nodes into this heap's arena), and the roots are consolidated into at most one tree per degree only when the
//! minimum is extracted. A node that loses its second child to `decrease_key` is
//! cut from its parent as well (cascading cut), which bounds the degree of every
//! node by `log_φ(n)`.
//!
//! All nodes are stored within a `Stash`, links are handles into it.

use std::mem;
use std::ops::{Index, IndexMut};

use log::{debug, trace};
use stash::Stash;

use crate::{Error, Handle, Key, MergeableHeap, Remap, Result};

/// The golden ratio, the growth rate of the minimum tree size per degree.
const PHI: f64 = 1.618_033_988_749_895;

/// Returns the largest degree a node can have within a heap of `len` elements.
fn max_degree(len: usize) -> usize {
	if len < 2 {
		return 0;
	}
	((len as f64).ln() / PHI.ln()).floor() as usize
}

/// An entry within an addressable Fibonacci heap.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<T, K>
where
	K: Key,
{
	key : K,
	elem: T,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Node<T, K>
where
	K: Key,
{
	parent: Option<Handle>,
	/// Any member of the child ring.
	child : Option<Handle>,
	left  : Handle,
	right : Handle,
	degree: usize,
	/// Whether this node lost a child since it became a child itself.
	mark  : bool,
	entry : Entry<T, K>,
}

impl<T, K> Node<T, K>
where
	K: Key,
{
	#[inline]
	fn new(key: K, elem: T) -> Self {
		Node {
			parent: None,
			child : None,
			left  : Handle::undef(),
			right : Handle::undef(),
			degree: 0,
			mark  : false,
			entry : Entry { key, elem },
		}
	}

	#[inline]
	fn is_root(&self) -> bool {
		self.parent.is_none()
	}
}

/// An addressable Fibonacci heap.
///
/// Stores elements with an associated key.
/// The key can be thought of as the priority of the element that is associated to it.
///
/// Inserting elements into this data structure provides the caller with handles
/// that makes accessing the elements possible - this is called "addressable".
/// Handles are always local to the associated heap instance and thus should not be
/// exchanged throughout various instances of heaps.
#[derive(Debug, Clone)]
pub struct FibonacciHeap<T, K>
where
	K: Key,
{
	/// Handle to the root with the minimum key within the heap.
	min : Handle,
	data: Stash<Node<T, K>, Handle>,
}

/// Iterator over the handles of a ring of siblings.
struct Ring<'a, T, K>
where
	K: Key + 'a,
	T: 'a,
{
	heap    : &'a FibonacciHeap<T, K>,
	sentinel: Handle,
	current : Handle,
	done    : bool,
}

impl<'a, T, K> Ring<'a, T, K>
where
	K: Key + 'a,
	T: 'a,
{
	/// Iterator over the ring that contains `start`, beginning with `start`.
	fn siblings(heap: &'a FibonacciHeap<T, K>, start: Handle) -> Ring<'a, T, K> {
		Ring {
			heap,
			sentinel: start,
			current : start,
			done    : start.is_undef(),
		}
	}

	/// Iterator over the children of the given parent node.
	fn children(heap: &'a FibonacciHeap<T, K>, parent: Handle) -> Ring<'a, T, K> {
		let start = heap
			.data
			.get(parent)
			.and_then(|node| node.child)
			.unwrap_or_else(Handle::undef);
		Ring::siblings(heap, start)
	}
}

impl<'a, T, K> Iterator for Ring<'a, T, K>
where
	K: Key + 'a,
	T: 'a,
{
	type Item = Handle;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}
		let cur = self.current;
		self.current = self.heap.node(cur).right;
		if self.current == self.sentinel {
			self.done = true;
		}
		Some(cur)
	}
}

impl<T, K> FibonacciHeap<T, K>
where
	K: Key,
{
	/// Creates a new instance of a `FibonacciHeap`.
	#[inline]
	pub fn new() -> Self {
		FibonacciHeap {
			min : Handle::undef(),
			data: Stash::default(),
		}
	}

	/// Returns the number of elements stored in this `FibonacciHeap`.
	#[inline]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Returns true if this `FibonacciHeap` is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns true if the given handle addresses an element of this heap.
	#[inline]
	pub fn contains(&self, handle: Handle) -> bool {
		self.data.get(handle).is_some()
	}

	/// Returns a reference to the `Node` that is associated with the given handle.
	/// Note that this won't fail on usage for a correct implementation of `FibonacciHeap`.
	#[inline]
	fn node(&self, handle: Handle) -> &Node<T, K> {
		unsafe { self.data.get_unchecked(handle) }
	}

	/// Returns a mutable reference to the `Node` that is associated with the given handle.
	/// Note that this won't fail on usage for a correct implementation of `FibonacciHeap`.
	#[inline]
	fn node_mut(&mut self, handle: Handle) -> &mut Node<T, K> {
		unsafe { self.data.get_unchecked_mut(handle) }
	}

	#[inline]
	fn key_of(&self, handle: Handle) -> K {
		self.node(handle).entry.key
	}

	/// Collects the ring that contains `start`, beginning with `start`.
	fn ring(&self, start: Handle) -> Vec<Handle> {
		Ring::siblings(self, start).collect()
	}

	/// Makes the given node a ring of its own.
	#[inline]
	fn isolate(&mut self, handle: Handle) {
		let node = self.node_mut(handle);
		node.left = handle;
		node.right = handle;
	}

	/// Inserts the isolated node `new` into the ring of `at`, directly right of it.
	#[inline]
	fn splice_right(&mut self, at: Handle, new: Handle) {
		let right = self.node(at).right;
		self.node_mut(new).left = at;
		self.node_mut(new).right = right;
		self.node_mut(at).right = new;
		self.node_mut(right).left = new;
	}

	/// Joins the ring of `other` into the ring of `at`, directly left of `at`.
	fn concat(&mut self, at: Handle, other: Handle) {
		let tail = self.node(at).left;
		let other_tail = self.node(other).left;
		self.node_mut(at).left = other_tail;
		self.node_mut(other_tail).right = at;
		self.node_mut(tail).right = other;
		self.node_mut(other).left = tail;
	}

	/// Detaches the given node from its siblings, leaving it as a ring of its own.
	#[inline]
	fn detach(&mut self, handle: Handle) {
		let right = self.node(handle).right;
		let left = self.node(handle).left;

		self.node_mut(right).left = left;
		self.node_mut(left).right = right;
		self.isolate(handle);
	}

	/// Updates the internal pointer to the current minimum element by hinting
	/// to a new possible min element within the heap.
	#[inline]
	fn update_min(&mut self, may_new_min: Handle) {
		if self.min.is_undef() || self.key_of(may_new_min) < self.key_of(self.min) {
			self.min = may_new_min;
		}
	}

	/// Adds the given isolated node as a new root into the heap.
	#[inline]
	fn insert_root(&mut self, new_root: Handle) {
		debug_assert!(self.node(new_root).is_root());
		let min = self.min;
		if min.is_undef() {
			self.min = new_root;
		} else {
			self.splice_right(min, new_root);
			self.update_min(new_root);
		}
	}

	/// Links the root `child` under the root `parent`.
	fn link(&mut self, child: Handle, parent: Handle) {
		debug_assert!(child != parent, "cannot link to self!");
		debug_assert!(self.node(child).is_root(), "child cannot have multiple parents!");

		self.detach(child);
		match self.node(parent).child {
			None => self.node_mut(parent).child = Some(child),
			Some(first) => self.splice_right(first, child),
		}
		{
			let node = self.node_mut(child);
			node.parent = Some(parent);
			node.mark = false;
		}
		self.node_mut(parent).degree += 1;
	}

	/// Links all roots of equal degree until every degree is left with one root,
	/// then rebuilds the root ring and finds the new minimum.
	fn consolidate(&mut self, seed: Handle) {
		let roots = self.ring(seed);
		let mut table: Vec<Option<Handle>> = vec![None; max_degree(self.len()) + 1];
		for &root in &roots {
			let mut x = root;
			let mut degree = self.node(x).degree;
			while let Some(mut y) = table[degree].take() {
				if self.key_of(x) > self.key_of(y) {
					mem::swap(&mut x, &mut y);
				}
				self.link(y, x);
				degree += 1;
			}
			table[degree] = Some(x);
		}

		self.min = Handle::undef();
		let mut head = Handle::undef();
		let mut count = 0;
		for root in table.into_iter().rev().flatten() {
			self.isolate(root);
			if head.is_undef() {
				head = root;
			} else {
				self.concat(head, root);
			}
			self.update_min(root);
			count += 1;
		}
		trace!("fibonacci: consolidated {} roots into {}", roots.len(), count);
	}

	/// Removes the given root, moves its children into the root ring and
	/// consolidates the remaining roots.
	fn remove_root(&mut self, root: Handle) -> (K, T) {
		debug_assert!(self.node(root).is_root());

		if let Some(child) = self.node_mut(root).child.take() {
			for handle in self.ring(child) {
				let node = self.node_mut(handle);
				node.parent = None;
				node.mark = false;
			}
			self.concat(root, child);
		}
		let seed = self.node(root).right;
		self.detach(root);
		let node = unsafe { self.data.take_unchecked(root) };
		if seed == root {
			self.min = Handle::undef();
		} else {
			self.consolidate(seed);
		}
		(node.entry.key, node.entry.elem)
	}

	/// Cuts `handle` from the child ring of `parent` and makes it a root.
	fn cut(&mut self, handle: Handle, parent: Handle) {
		debug_assert_eq!(self.node(handle).parent, Some(parent));

		if self.node(parent).child == Some(handle) {
			let right = self.node(handle).right;
			self.node_mut(parent).child = if right == handle { None } else { Some(right) };
		}
		self.detach(handle);
		self.node_mut(parent).degree -= 1;
		{
			let node = self.node_mut(handle);
			node.parent = None;
			node.mark = false;
		}
		self.insert_root(handle);
	}

	/// Walks up from a node that just lost a child: marked nodes are cut as well,
	/// the first unmarked non-root gets marked.
	fn cascading_cut(&mut self, mut handle: Handle) {
		let mut cuts = 0;
		while let Some(parent) = self.node(handle).parent {
			if !self.node(handle).mark {
				self.node_mut(handle).mark = true;
				break;
			}
			self.cut(handle, parent);
			handle = parent;
			cuts += 1;
		}
		if cuts > 0 {
			trace!("fibonacci: cascading cut promoted {} nodes", cuts);
		}
	}

	/// Inserts the given element into the `FibonacciHeap` with its associated key
	/// and returns a `Handle` to it that allows to directly address it.
	///
	/// The handle is for example required in order to use methods like `decrease_key`.
	#[inline]
	pub fn insert(&mut self, elem: T, key: K) -> Handle {
		let handle = self.data.put(Node::new(key, elem));
		self.isolate(handle);
		self.insert_root(handle);
		handle
	}

	/// Returns the handle of the element with the minimum key if not empty.
	#[inline]
	pub fn minimum(&self) -> Option<Handle> {
		if self.min.is_undef() {
			None
		} else {
			Some(self.min)
		}
	}

	/// Returns a reference to the current minimum element if not empty.
	#[inline]
	pub fn peek(&self) -> Option<&T> {
		self.get(self.min)
	}

	/// Returns a mutable reference to the current minimum element if not empty.
	#[inline]
	pub fn peek_mut(&mut self) -> Option<&mut T> {
		let min = self.min;
		self.get_mut(min)
	}

	/// Returns a reference to the element associated with the given handle.
	#[inline]
	pub fn get(&self, handle: Handle) -> Option<&T> {
		self.data.get(handle).map(|node| &node.entry.elem)
	}

	/// Returns a mutable reference to the element associated with the given handle.
	#[inline]
	pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
		self.data.get_mut(handle).map(|node| &mut node.entry.elem)
	}

	/// Returns the current key of the element associated with the given handle.
	#[inline]
	pub fn key(&self, handle: Handle) -> Option<K> {
		self.data.get(handle).map(|node| node.entry.key)
	}

	/// Removes the element associated with the minimum key within this `FibonacciHeap`
	/// and returns it together with its key.
	pub fn extract_min(&mut self) -> Option<(K, T)> {
		let min = self.minimum()?;
		Some(self.remove_root(min))
	}

	/// Decreases the key of the element with the associated given `handle`.
	///
	/// Fails with `Error::InvalidDecreaseKey` if the new key is greater than the
	/// current key; the heap is left unmodified in that case.
	pub fn decrease_key(&mut self, handle: Handle, new_key: K) -> Result<()> {
		let current = self.data.get(handle).ok_or(Error::InvalidHandle)?.entry.key;
		if new_key > current {
			return Err(Error::InvalidDecreaseKey);
		}

		self.node_mut(handle).entry.key = new_key;
		if let Some(parent) = self.node(handle).parent {
			if new_key < self.key_of(parent) {
				self.cut(handle, parent);
				self.cascading_cut(parent);
			}
		}
		self.update_min(handle);
		Ok(())
	}

	/// Removes the element associated with the given handle and returns it
	/// together with its key.
	///
	/// The node is cut into the root ring if necessary, then removed the way
	/// `extract_min` removes the minimum.
	pub fn delete(&mut self, handle: Handle) -> Result<(K, T)> {
		if !self.contains(handle) {
			return Err(Error::InvalidHandle);
		}

		if let Some(parent) = self.node(handle).parent {
			self.cut(handle, parent);
			self.cascading_cut(parent);
		}
		Ok(self.remove_root(handle))
	}

	/// Moves all elements of `other` into this `FibonacciHeap`.
	///
	/// Runs in O(m) for an `other` of `m` elements: its nodes are moved into the
	/// arena of this heap one by one, then splices the two root rings, O(1).
	/// Handles of this heap stay valid. Handles of `other` do not, they have to be
	/// translated through the returned `Remap`.
	pub fn union(&mut self, other: Self) -> Remap {
		let FibonacciHeap {
			min: other_min,
			data,
		} = other;

		let mut remap = Remap::with_capacity(data.len());
		let mut moved = Vec::with_capacity(data.len());
		for (old, node) in data {
			let new = self.data.put(node);
			remap.insert(old, new);
			moved.push(new);
		}
		for &handle in &moved {
			let node = self.node_mut(handle);
			unsafe {
				node.parent = node.parent.map(|parent| remap.translate(parent));
				node.child = node.child.map(|child| remap.translate(child));
				node.left = remap.translate(node.left);
				node.right = remap.translate(node.right);
			}
		}

		if !other_min.is_undef() {
			let other_min = unsafe { remap.translate(other_min) };
			let min = self.min;
			if min.is_undef() {
				self.min = other_min;
			} else {
				self.concat(min, other_min);
				self.update_min(other_min);
			}
		}
		debug!(
			"fibonacci: union absorbs {} elements into {}",
			moved.len(),
			self.len() - moved.len()
		);
		remap
	}

	/// Iterates over the handles of the roots in ring order, beginning with the minimum.
	pub fn roots<'a>(&'a self) -> impl Iterator<Item = Handle> + 'a {
		Ring::siblings(self, self.min)
	}

	/// Iterates over the handles of the children of the given element in ring order.
	pub fn children<'a>(&'a self, handle: Handle) -> impl Iterator<Item = Handle> + 'a {
		Ring::children(self, handle)
	}

	/// Returns the number of children of the given element.
	pub fn degree(&self, handle: Handle) -> Option<usize> {
		self.data.get(handle).map(|node| node.degree)
	}

	/// Returns whether the given element lost a child since it became a child itself.
	pub fn is_marked(&self, handle: Handle) -> Option<bool> {
		self.data.get(handle).map(|node| node.mark)
	}

	/// Iterate over the values in this `FibonacciHeap` by reference in unspecified order.
	#[inline]
	pub fn values<'a>(&'a self) -> impl Iterator<Item = &'a T> + 'a {
		self.data.values().map(|node| &node.entry.elem)
	}

	/// Iterate over the values in this `FibonacciHeap` by mutable reference in unspecified order.
	#[inline]
	pub fn values_mut<'a>(&'a mut self) -> impl Iterator<Item = &'a mut T> + 'a {
		self.data.values_mut().map(|node| &mut node.entry.elem)
	}

	/// Iterate over keys and values in a sorted-by-min order. Drains the heap.
	#[inline]
	pub fn drain_min(self) -> DrainMin<T, K> {
		DrainMin { heap: self }
	}
}

impl<T, K> Default for FibonacciHeap<T, K>
where
	K: Key,
{
	fn default() -> Self {
		FibonacciHeap::new()
	}
}

impl<T, K> Index<Handle> for FibonacciHeap<T, K>
where
	K: Key,
{
	type Output = T;

	fn index(&self, handle: Handle) -> &Self::Output {
		self.get(handle).expect("no node found for given handle")
	}
}

impl<T, K> IndexMut<Handle> for FibonacciHeap<T, K>
where
	K: Key,
{
	fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
		self.get_mut(handle).expect("no node found for given handle")
	}
}

impl<T, K> Extend<(T, K)> for FibonacciHeap<T, K>
where
	K: Key,
{
	fn extend<I: IntoIterator<Item = (T, K)>>(&mut self, iter: I) {
		for (elem, key) in iter {
			self.insert(elem, key);
		}
	}
}

impl<T, K> ::std::iter::FromIterator<(T, K)> for FibonacciHeap<T, K>
where
	K: Key,
{
	fn from_iter<I: IntoIterator<Item = (T, K)>>(iter: I) -> Self {
		let mut heap = FibonacciHeap::new();
		heap.extend(iter);
		heap
	}
}

impl<T, K> MergeableHeap<T, K> for FibonacciHeap<T, K>
where
	K: Key,
{
	fn new() -> Self {
		FibonacciHeap::new()
	}

	fn len(&self) -> usize {
		self.len()
	}

	fn insert(&mut self, elem: T, key: K) -> Handle {
		self.insert(elem, key)
	}

	fn minimum(&self) -> Option<Handle> {
		self.minimum()
	}

	fn peek(&self) -> Option<&T> {
		self.peek()
	}

	fn key(&self, handle: Handle) -> Option<K> {
		self.key(handle)
	}

	fn extract_min(&mut self) -> Option<(K, T)> {
		self.extract_min()
	}

	fn decrease_key(&mut self, handle: Handle, new_key: K) -> Result<()> {
		self.decrease_key(handle, new_key)
	}

	fn delete(&mut self, handle: Handle) -> Result<(K, T)> {
		self.delete(handle)
	}

	fn union(&mut self, other: Self) -> Remap {
		self.union(other)
	}
}

/// Iterator over keys and values stored within a `FibonacciHeap` in a sorted-by-min order.
/// Drains the heap.
pub struct DrainMin<T, K: Key> {
	heap: FibonacciHeap<T, K>,
}

impl<T, K: Key> Iterator for DrainMin<T, K> {
	type Item = (K, T);

	#[inline]
	fn next(&mut self) -> Option<Self::Item> {
		self.heap.extract_min()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.heap.len(), Some(self.heap.len()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};
	use std::collections::HashSet;

	/// Checks the ring of `start` and every tree hanging from it, returns the total size.
	fn check_ring<T, K: Key>(heap: &FibonacciHeap<T, K>, start: Handle, parent: Option<Handle>) -> usize {
		let mut size = 0;
		for handle in heap.ring(start) {
			let node = heap.node(handle);
			assert_eq!(heap.node(node.right).left, handle, "ring is not closed");
			assert_eq!(heap.node(node.left).right, handle, "ring is not closed");
			assert_eq!(node.parent, parent);
			if let Some(parent) = parent {
				assert!(heap.key_of(parent) <= heap.key_of(handle));
			} else {
				assert!(!node.mark, "roots are never marked");
			}
			assert_eq!(heap.children(handle).count(), node.degree);
			assert!(node.degree <= max_degree(heap.len()));
			size += 1;
			if let Some(child) = node.child {
				size += check_ring(heap, child, Some(handle));
			}
		}
		size
	}

	fn check_invariants<T, K: Key>(heap: &FibonacciHeap<T, K>) {
		match heap.minimum() {
			None => assert!(heap.is_empty()),
			Some(min) => {
				assert_eq!(check_ring(heap, min, None), heap.len());
				assert!(heap.roots().all(|root| heap.key_of(min) <= heap.key_of(root)));
			}
		}
	}

	fn check_distinct_root_degrees<T, K: Key>(heap: &FibonacciHeap<T, K>) {
		let mut degrees = HashSet::new();
		for root in heap.roots() {
			assert!(degrees.insert(heap.node(root).degree), "two roots share a degree");
		}
	}

	#[test]
	fn take_min() {
		let mut fh = FibonacciHeap::new();
		fh.insert(0, 6);
		fh.insert(1, 10);
		fh.insert(2, -42);
		fh.insert(3, 1337);
		fh.insert(4, -1);
		fh.insert(5, 1);
		fh.insert(6, 2);
		fh.insert(7, 3);
		fh.insert(8, 4);
		fh.insert(9, 5);
		assert_eq!(fh.roots().count(), 10);
		assert_eq!(Some((-42, 2)), fh.extract_min());
		check_invariants(&fh);
		check_distinct_root_degrees(&fh);
		assert_eq!(Some((-1, 4)), fh.extract_min());
		assert_eq!(Some((1, 5)), fh.extract_min());
		assert_eq!(Some((2, 6)), fh.extract_min());
		assert_eq!(Some((3, 7)), fh.extract_min());
		assert_eq!(Some((4, 8)), fh.extract_min());
		assert_eq!(Some((5, 9)), fh.extract_min());
		assert_eq!(Some((6, 0)), fh.extract_min());
		assert_eq!(Some((10, 1)), fh.extract_min());
		assert_eq!(Some((1337, 3)), fh.extract_min());
		assert_eq!(None, fh.extract_min());
		assert!(fh.is_empty());
	}

	#[test]
	fn decrease_key() {
		let mut fh = FibonacciHeap::new();
		let a = fh.insert(0, 0);
		let b = fh.insert(1, 50);
		let c = fh.insert(2, 100);
		let d = fh.insert(3, 150);
		let e = fh.insert(4, 200);
		let f = fh.insert(5, 250);
		assert_eq!(Some(&0), fh.peek());
		assert_eq!(Ok(()), fh.decrease_key(f, -50));
		assert_eq!(Some(&5), fh.peek());
		assert_eq!(Ok(()), fh.decrease_key(e, -100));
		assert_eq!(Some(&4), fh.peek());
		assert_eq!(Ok(()), fh.decrease_key(d, -99));
		assert_eq!(Some(&4), fh.peek());
		assert_eq!(Err(Error::InvalidDecreaseKey), fh.decrease_key(c, 1000));
		assert_eq!(Some(100), fh.key(c));
		assert_eq!(Some(&4), fh.peek());
		assert_eq!(Ok(()), fh.decrease_key(b, -1000));
		assert_eq!(Some(&1), fh.peek());
		assert_eq!(Err(Error::InvalidDecreaseKey), fh.decrease_key(a, 100));
		assert_eq!(Some(&1), fh.peek());
		check_invariants(&fh);
	}

	#[test]
	fn empty_take() {
		let mut fh = FibonacciHeap::<usize, usize>::new();
		assert_eq!(None, fh.extract_min());
		assert_eq!(None, fh.minimum());
		assert_eq!(None, fh.peek());
		assert_eq!(fh.roots().count(), 0);
	}

	#[test]
	fn insert_then_extract() {
		let mut fh = FibonacciHeap::new();
		let handle = fh.insert('x', 42);
		assert_eq!(Some(handle), fh.minimum());
		assert_eq!(Some((42, 'x')), fh.extract_min());
		assert!(fh.is_empty());
		assert_eq!(None, fh.minimum());
		assert_eq!(Err(Error::InvalidHandle), fh.delete(handle));
	}

	fn setup() -> FibonacciHeap<char, i64> {
		let mut fh = FibonacciHeap::new();
		fh.insert('a', 100);
		fh.insert('b', 50);
		fh.insert('c', 150);
		fh.insert('d', -25);
		fh.insert('e', 999);
		fh.insert('f', 42);
		fh.insert('g', 43);
		fh.insert('i', 41);
		fh.insert('j', -100);
		fh.insert('k', -77);
		fh.insert('l', 123);
		fh.insert('m', -123);
		fh.insert('n', 0);
		fh.insert('o', -1);
		fh.insert('p', 2);
		fh.insert('q', -3);
		fh.insert('r', 4);
		fh.insert('s', -5);
		fh
	}

	#[test]
	fn drain_min() {
		let fh = setup();
		let drained = fh.drain_min().map(|(_, elem)| elem).collect::<String>();
		assert_eq!(drained, "mjkdsqonprifgbalce");
	}

	#[test]
	fn values() {
		let fh = setup();
		// cannot test order of values since it is unspecified!
		assert_eq!(fh.values().count(), 18);
	}

	#[test]
	fn insert_keeps_ring() {
		let mut fh = FibonacciHeap::new();
		fh.insert(1, 1);
		fh.insert(2, 2);
		fh.insert(3, 3);
		assert_eq!(fh.roots().count(), 3);
		assert!(fh.roots().any(|root| fh[root] == 3));

		let mut snd = FibonacciHeap::new();
		snd.insert(5, 5);
		snd.insert(4, 4);
		assert_eq!(snd.peek(), Some(&4));
		check_invariants(&fh);
		check_invariants(&snd);
	}

	#[test]
	fn union() {
		let mut fst = FibonacciHeap::new();
		fst.insert(1, 1);
		fst.insert(2, 2);
		fst.insert(3, 3);
		let mut snd = FibonacciHeap::new();
		let four = snd.insert(4, 4);
		let five = snd.insert(5, 5);

		let remap = fst.union(snd);
		assert_eq!(fst.len(), 5);
		assert_eq!(fst.roots().count(), 5);
		assert_eq!(fst[remap.get(four).unwrap()], 4);
		assert_eq!(fst[remap.get(five).unwrap()], 5);
		assert_eq!(fst.peek(), Some(&1));
		check_invariants(&fst);
	}

	#[test]
	fn union_takes_smaller_minimum() {
		let mut fst = setup();
		fst.extract_min();
		let mut snd = FibonacciHeap::new();
		let low = snd.insert('z', -1_000);
		snd.insert('y', 7);

		let remap = fst.union(snd);
		assert_eq!(fst.minimum(), remap.get(low));
		assert_eq!(fst.len(), 19);
		check_invariants(&fst);

		let mut empty = FibonacciHeap::new();
		empty.union(fst);
		assert_eq!(empty.peek(), Some(&'z'));
		check_invariants(&empty);
	}

	/// Builds the consolidation example of Cormen et al.
	///
	/// The root ring reads 23, 7, 21, 3, 17, 24 where 3 owns 18, 52, 38 and
	/// 18, 39 and 26 are marked.
	fn clrs_heap() -> (FibonacciHeap<u32, u32>, Vec<Handle>) {
		let mut fh = FibonacciHeap::new();
		let mut h = vec![Handle::undef(); 53];
		// inserted right of the minimum 3, thus in reverse ring order
		for &key in &[3, 21, 7, 23, 24, 17] {
			h[key as usize] = fh.insert(key, key);
		}
		for &key in &[18, 52, 38, 39, 41, 30, 26, 46, 35] {
			h[key as usize] = fh.insert(key, key);
		}
		fh.link(h[39], h[18]);
		fh.link(h[41], h[38]);
		fh.link(h[18], h[3]);
		fh.link(h[38], h[3]);
		fh.link(h[52], h[3]);
		fh.link(h[30], h[17]);
		fh.link(h[35], h[26]);
		fh.link(h[26], h[24]);
		fh.link(h[46], h[24]);
		for &key in &[18, 39, 26] {
			fh.node_mut(h[key]).mark = true;
		}
		(fh, h)
	}

	fn keys<T, K: Key>(fh: &FibonacciHeap<T, K>, handles: impl Iterator<Item = Handle>) -> Vec<K> {
		handles.map(|handle| fh.key_of(handle)).collect()
	}

	#[test]
	fn clrs_layout() {
		let (fh, h) = clrs_heap();
		assert_eq!(fh.len(), 15);
		assert_eq!(keys(&fh, fh.roots()), vec![3, 17, 24, 23, 7, 21]);
		assert_eq!(keys(&fh, fh.children(h[3])), vec![18, 52, 38]);
		assert_eq!(fh.degree(h[3]), Some(3));
		assert_eq!(fh.degree(h[24]), Some(2));
		assert_eq!(fh.is_marked(h[26]), Some(true));
		check_invariants(&fh);
	}

	#[test]
	fn clrs_extract_min() {
		let (mut fh, h) = clrs_heap();
		assert_eq!(Some((3, 3)), fh.extract_min());
		assert_eq!(fh.len(), 14);
		check_invariants(&fh);
		check_distinct_root_degrees(&fh);

		assert_eq!(fh.minimum(), Some(h[7]));
		let degrees = fh
			.roots()
			.map(|root| fh.degree(root).unwrap())
			.collect::<Vec<_>>();
		assert_eq!(degrees, vec![3, 2, 1]);
		assert_eq!(keys(&fh, fh.roots()), vec![7, 18, 38]);
		assert_eq!(fh.is_marked(h[18]), Some(false));
	}

	#[test]
	fn clrs_decrease_key() {
		let (mut fh, h) = clrs_heap();
		fh.extract_min();

		// 46 is cut, its parent 24 becomes marked
		assert_eq!(fh.node(h[46]).parent, Some(h[24]));
		assert_eq!(Ok(()), fh.decrease_key(h[46], 15));
		assert!(fh.node(h[46]).is_root());
		assert_eq!(fh.is_marked(h[24]), Some(true));

		// 35 is cut, then its marked ancestors 26 and 24 follow
		assert_eq!(Ok(()), fh.decrease_key(h[35], 5));
		assert_eq!(fh.minimum(), Some(h[35]));
		for &key in &[35, 26, 24] {
			assert!(fh.node(h[key]).is_root());
			assert_eq!(fh.is_marked(h[key]), Some(false));
		}
		assert_eq!(fh.is_marked(h[7]), Some(false));
		check_invariants(&fh);
	}

	#[test]
	fn cascading_cut_chain() {
		let mut fh = FibonacciHeap::new();
		let a = fh.insert('a', 1);
		let b = fh.insert('b', 2);
		let c = fh.insert('c', 3);
		let d = fh.insert('d', 4);
		let e = fh.insert('e', 5);
		fh.link(e, c);
		fh.link(d, c);
		fh.link(c, b);
		fh.link(b, a);

		assert_eq!(Ok(()), fh.decrease_key(e, 4));
		assert_eq!(fh.node(e).parent, Some(c));
		assert_eq!(fh.is_marked(c), Some(false));

		assert_eq!(Ok(()), fh.decrease_key(e, 0));
		assert!(fh.node(e).is_root());
		assert_eq!(fh.is_marked(c), Some(true));
		assert_eq!(fh.is_marked(b), Some(false));

		assert_eq!(Ok(()), fh.decrease_key(d, 0));
		assert!(fh.node(c).is_root());
		assert_eq!(fh.is_marked(b), Some(true));
		assert_eq!(fh.degree(a), Some(1));
		assert_eq!(fh.degree(b), Some(0));
		assert_eq!(fh.roots().count(), 4);
		check_invariants(&fh);
	}

	#[test]
	fn equal_keys_keep_placed_root_as_parent() {
		let mut fh = FibonacciHeap::new();
		let a = fh.insert('a', 1);
		let b = fh.insert('b', 1);
		let c = fh.insert('c', 1);
		assert_eq!(fh.minimum(), Some(a));
		let d = fh.insert('d', 0);
		assert_eq!(fh.roots().collect::<Vec<_>>(), vec![d, c, b, a]);

		// consolidation walks c, b, a: b meets c in slot 0 and stays the parent
		assert_eq!(fh.extract_min(), Some((0, 'd')));
		assert_eq!(fh.roots().collect::<Vec<_>>(), vec![b, a]);
		assert_eq!(fh.children(b).collect::<Vec<_>>(), vec![c]);
		assert_eq!(fh.node(c).parent, Some(b));
		assert_eq!(fh.minimum(), Some(b));
		check_invariants(&fh);
	}

	#[test]
	fn minimum_keeps_first_of_equal_keys() {
		let mut fh = FibonacciHeap::new();
		let a = fh.insert('a', 5);
		let b = fh.insert('b', 5);
		assert_eq!(fh.minimum(), Some(a));
		assert_eq!(Ok(()), fh.decrease_key(b, 5));
		assert_eq!(fh.minimum(), Some(a));

		let mut snd = FibonacciHeap::new();
		snd.insert('c', 5);
		fh.union(snd);
		assert_eq!(fh.minimum(), Some(a));
		check_invariants(&fh);
	}

	#[test]
	fn duplicate_keys() {
		let mut fh = FibonacciHeap::new();
		let keys = [3, 1, 3, 1, 2, 2, 1, 3, 2, 1, 1];
		for (elem, &key) in keys.iter().enumerate() {
			fh.insert(elem, key);
		}
		let mut drained = Vec::new();
		while let Some((key, elem)) = fh.extract_min() {
			assert_eq!(keys[elem], key);
			drained.push(key);
			check_invariants(&fh);
			check_distinct_root_degrees(&fh);
		}
		let mut sorted = keys.to_vec();
		sorted.sort();
		assert_eq!(drained, sorted);
	}

	#[test]
	fn union_translates_absorbed_handles() {
		let mut fst = FibonacciHeap::new();
		let own = (0..5).map(|key| fst.insert(key, key)).collect::<Vec<_>>();
		let mut snd = FibonacciHeap::new();
		let absorbed = (10..17).map(|key| snd.insert(key, key)).collect::<Vec<_>>();
		assert_eq!(snd.extract_min(), Some((10, 10)));

		let remap = fst.union(snd);
		assert_eq!(remap.len(), 6);
		assert_eq!(remap.get(absorbed[0]), None);
		for (key, &handle) in (0..5).zip(own.iter()) {
			assert_eq!(fst.key(handle), Some(key));
		}
		for (key, &handle) in (11..17).zip(absorbed.iter().skip(1)) {
			let handle = remap.get(handle).unwrap();
			assert_eq!(fst.key(handle), Some(key));
			assert_eq!(fst[handle], key);
		}
		assert_eq!(fst.len(), 11);
		assert_eq!(fst.minimum(), Some(own[0]));
		check_invariants(&fst);
	}

	#[test]
	fn delete() {
		let mut fh = FibonacciHeap::new();
		let handles = (0..64).map(|i| fh.insert(i, (i * 5) % 64)).collect::<Vec<_>>();
		let mut expected = (0..64).map(|i| ((i * 5) % 64, i)).collect::<Vec<_>>();
		fh.extract_min();
		expected.retain(|&(key, _)| key != 0);
		for &handle in handles.iter().skip(1).step_by(4) {
			let (key, elem) = fh.delete(handle).unwrap();
			assert_eq!(key, (elem * 5) % 64);
			expected.retain(|&(_, e)| e != elem);
			check_invariants(&fh);
		}
		assert_eq!(Err(Error::InvalidHandle), fh.delete(handles[1]));
		expected.sort();
		assert_eq!(fh.drain_min().collect::<Vec<_>>(), expected);
	}

	#[test]
	fn max_degree_bound() {
		assert_eq!(max_degree(0), 0);
		assert_eq!(max_degree(1), 0);
		assert_eq!(max_degree(2), 1);
		assert_eq!(max_degree(15), 5);
		assert_eq!(max_degree(1_000_000), 28);
	}

	#[test]
	fn random_operations() {
		let mut rng = StdRng::seed_from_u64(0xf1b);
		let mut fh = FibonacciHeap::new();
		let mut live: Vec<(Handle, i32)> = Vec::new();
		for round in 0..3_000 {
			match rng.gen_range(0..10) {
				0..=4 => {
					let key = rng.gen_range(-1_000..1_000);
					live.push((fh.insert(round, key), key));
				}
				5 | 6 if !live.is_empty() => {
					let idx = rng.gen_range(0..live.len());
					let (handle, key) = live[idx];
					let new_key = key - rng.gen_range(0..500);
					assert_eq!(Ok(()), fh.decrease_key(handle, new_key));
					live[idx].1 = new_key;
				}
				7 if !live.is_empty() => {
					let (handle, key) = live.swap_remove(rng.gen_range(0..live.len()));
					assert_eq!(fh.delete(handle).map(|(k, _)| k), Ok(key));
					check_distinct_root_degrees(&fh);
				}
				_ => {
					let min = live.iter().map(|&(_, key)| key).min();
					let extracted = fh.extract_min().map(|(key, _)| key);
					assert_eq!(extracted, min);
					if let Some(key) = extracted {
						let idx = live.iter().position(|&(h, k)| k == key && !fh.contains(h)).unwrap();
						live.swap_remove(idx);
						check_distinct_root_degrees(&fh);
					}
				}
			}
			assert_eq!(fh.len(), live.len());
		}
		check_invariants(&fh);
	}
}

#[cfg(all(feature = "bench", test))]
mod bench {
	use super::*;
	use rand::rngs::StdRng;
	use rand::seq::SliceRandom;
	use rand::SeedableRng;
	use test::{black_box, Bencher};

	fn setup_sample() -> Vec<i64> {
		let mut sample = (1..100_000).collect::<Vec<i64>>();
		sample.shuffle(&mut StdRng::seed_from_u64(42));
		sample
	}

	#[bench]
	fn fibonacci_heap_insert(bencher: &mut Bencher) {
		let sample = setup_sample();
		bencher.iter(|| {
			let mut fh = FibonacciHeap::new();
			for &key in sample.iter() {
				black_box(fh.insert((), key));
			}
		});
	}

	#[bench]
	fn fibonacci_heap_extract_min(bencher: &mut Bencher) {
		let fh = setup_sample()
			.into_iter()
			.map(|key| ((), key))
			.collect::<FibonacciHeap<_, _>>();
		bencher.iter(|| {
			let mut fh = fh.clone();
			while let Some(_) = black_box(fh.extract_min()) {}
		});
	}

	#[bench]
	fn fibonacci_heap_decrease_key(bencher: &mut Bencher) {
		let mut fh = FibonacciHeap::new();
		let handles = setup_sample()
			.into_iter()
			.map(|key| fh.insert((), key))
			.collect::<Vec<_>>();
		fh.extract_min();
		bencher.iter(|| {
			let mut fh = fh.clone();
			for &handle in handles.iter().skip(1) {
				if let Some(key) = fh.key(handle) {
					black_box(fh.decrease_key(handle, key - 100_000)).unwrap();
				}
			}
		});
	}
}
