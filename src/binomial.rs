//! An addressable binomial heap.
//!
//! The heap is a list of binomial trees, linked through their roots and sorted by
//! strictly increasing degree. A binomial tree of degree `d` holds exactly `2^d`
//! elements, so a heap of `n` elements is shaped like the binary representation of
//! `n` and unions work like binary addition with carries.
//!
//! Nodes and entries live in two separate `Stash`es. A `Handle` addresses an entry,
//! and every entry knows the node currently holding it. When `decrease_key` bubbles
//! an entry towards the root only the node-to-entry assignment changes, thus a
//! handle always refers to the same element.

use std::mem;
use std::ops::{Index, IndexMut};

use itertools::Itertools;
use log::{debug, trace};
use stash::Stash;
use unreachable::UncheckedOptionExt;

use crate::{Error, Handle, Key, MergeableHeap, Remap, Result};

/// Index of a tree node, local to the heap.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct NodeId(usize);

impl From<usize> for NodeId {
	fn from(val: usize) -> NodeId {
		NodeId(val)
	}
}

impl From<NodeId> for usize {
	fn from(id: NodeId) -> usize {
		id.0
	}
}

/// An entry within an addressable binomial heap.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry<T, K>
where
	K: Key,
{
	key : K,
	elem: T,
	/// The node that currently holds this entry.
	node: NodeId,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Node {
	entry  : Handle,
	parent : Option<NodeId>,
	/// Head of the child list, ordered by decreasing degree.
	child  : Option<NodeId>,
	/// Next root in the root list, or next child in the parent's child list.
	sibling: Option<NodeId>,
	degree : usize,
}

impl Node {
	#[inline]
	fn new(entry: Handle) -> Self {
		Node {
			entry,
			parent : None,
			child  : None,
			sibling: None,
			degree : 0,
		}
	}
}

/// An addressable binomial heap.
///
/// Stores elements with an associated key.
/// The key can be thought of as the priority of the element that is associated to it.
///
/// Inserting elements into this data structure provides the caller with handles
/// that makes accessing the elements possible - this is called "addressable".
/// Handles are always local to the associated heap instance and thus should not be
/// exchanged throughout various instances of heaps.
#[derive(Debug, Clone)]
pub struct BinomialHeap<T, K>
where
	K: Key,
{
	/// First root of the root list which is sorted by increasing degree.
	head   : Option<NodeId>,
	nodes  : Stash<Node, NodeId>,
	entries: Stash<Entry<T, K>, Handle>,
}

impl<T, K> BinomialHeap<T, K>
where
	K: Key,
{
	/// Creates a new instance of a `BinomialHeap`.
	#[inline]
	pub fn new() -> Self {
		BinomialHeap {
			head   : None,
			nodes  : Stash::default(),
			entries: Stash::default(),
		}
	}

	/// Returns the number of elements stored in this `BinomialHeap`.
	#[inline]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if this `BinomialHeap` is empty.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns true if the given handle addresses an element of this heap.
	#[inline]
	pub fn contains(&self, handle: Handle) -> bool {
		self.entries.get(handle).is_some()
	}

	/// Returns a reference to the `Node` that is associated with the given id.
	/// Note that this won't fail on usage for a correct implementation of `BinomialHeap`.
	#[inline]
	fn node(&self, id: NodeId) -> &Node {
		unsafe { self.nodes.get_unchecked(id) }
	}

	#[inline]
	fn node_mut(&mut self, id: NodeId) -> &mut Node {
		unsafe { self.nodes.get_unchecked_mut(id) }
	}

	#[inline]
	fn entry(&self, handle: Handle) -> &Entry<T, K> {
		unsafe { self.entries.get_unchecked(handle) }
	}

	#[inline]
	fn entry_mut(&mut self, handle: Handle) -> &mut Entry<T, K> {
		unsafe { self.entries.get_unchecked_mut(handle) }
	}

	#[inline]
	fn key_of(&self, id: NodeId) -> K {
		self.entry(self.node(id).entry).key
	}

	/// Iterates over a sibling chain beginning with `first`.
	fn siblings<'a>(&'a self, first: Option<NodeId>) -> impl Iterator<Item = NodeId> + 'a {
		::std::iter::successors(first, move |&id| self.node(id).sibling)
	}

	/// Allocates a fresh node of degree zero holding a new entry.
	fn make_entry(&mut self, elem: T, key: K) -> (Handle, NodeId) {
		let node = self.nodes.put(Node::new(Handle::undef()));
		let handle = self.entries.put(Entry { key, elem, node });
		self.node_mut(node).entry = handle;
		(handle, node)
	}

	/// Exchanges the entries held by the two given nodes.
	fn swap_entries(&mut self, a: NodeId, b: NodeId) {
		let fst = self.node(a).entry;
		let snd = self.node(b).entry;
		self.node_mut(a).entry = snd;
		self.node_mut(b).entry = fst;
		self.entry_mut(fst).node = b;
		self.entry_mut(snd).node = a;
	}

	/// Makes the root `child` the new head of the child list of the root `parent`.
	///
	/// Both must be roots of equal degree.
	fn link(&mut self, child: NodeId, parent: NodeId) {
		debug_assert!(child != parent, "cannot link to self!");
		debug_assert_eq!(self.node(child).degree, self.node(parent).degree);

		let first = self.node(parent).child;
		{
			let node = self.node_mut(child);
			node.parent = Some(parent);
			node.sibling = first;
		}
		let node = self.node_mut(parent);
		node.child = Some(child);
		node.degree += 1;
	}

	/// Merges two root lists sorted by ascending degree into one.
	///
	/// On equal degrees the root of `snd` is placed first.
	fn merge(&mut self, fst: Option<NodeId>, snd: Option<NodeId>) -> Option<NodeId> {
		let merged = self
			.siblings(fst)
			.merge_by(self.siblings(snd), |&a, &b| {
				self.node(a).degree < self.node(b).degree
			})
			.collect::<Vec<_>>();
		for (&left, &right) in merged.iter().tuple_windows() {
			self.node_mut(left).sibling = Some(right);
		}
		if let Some(&last) = merged.last() {
			self.node_mut(last).sibling = None;
		}
		merged.first().cloned()
	}

	/// Unites the root list starting at `other` with the root list of this heap.
	///
	/// Afterwards at most one tree of every degree remains.
	fn union_roots(&mut self, other: Option<NodeId>) {
		let head = self.head;
		self.head = self.merge(head, other);

		let mut prev: Option<NodeId> = None;
		let mut x = match self.head {
			Some(x) => x,
			None => return,
		};
		while let Some(next) = self.node(x).sibling {
			let degree = self.node(x).degree;
			let after = self.node(next).sibling;
			if degree != self.node(next).degree
				|| after.map_or(false, |after| self.node(after).degree == degree)
			{
				prev = Some(x);
				x = next;
			} else if self.key_of(x) <= self.key_of(next) {
				self.node_mut(x).sibling = after;
				self.link(next, x);
			} else {
				match prev {
					None => self.head = Some(next),
					Some(prev) => self.node_mut(prev).sibling = Some(next),
				}
				self.link(x, next);
				x = next;
			}
		}
	}

	/// Returns the root with the minimum key together with its predecessor in the root list.
	fn min_root(&self) -> Option<(Option<NodeId>, NodeId)> {
		let mut min: Option<(Option<NodeId>, NodeId)> = None;
		let mut prev = None;
		for root in self.siblings(self.head) {
			match min {
				Some((_, cur)) if self.key_of(cur) <= self.key_of(root) => (),
				_ => min = Some((prev, root)),
			}
			prev = Some(root);
		}
		min
	}

	/// Returns the predecessor of the given root within the root list.
	fn root_predecessor(&self, root: NodeId) -> Option<NodeId> {
		let mut prev = None;
		for cur in self.siblings(self.head) {
			if cur == root {
				return prev;
			}
			prev = Some(cur);
		}
		unsafe { ::unreachable::unreachable() }
	}

	/// Detaches the children of `parent` and returns them as a root list
	/// in increasing degree order.
	fn reverse_children(&mut self, parent: NodeId) -> Option<NodeId> {
		let mut reversed = None;
		let mut cur = self.node_mut(parent).child.take();
		while let Some(child) = cur {
			let node = self.node_mut(child);
			cur = mem::replace(&mut node.sibling, reversed);
			node.parent = None;
			reversed = Some(child);
		}
		reversed
	}

	/// Removes the given root from the root list, unites its children
	/// back into the heap and returns its entry.
	fn remove_root(&mut self, prev: Option<NodeId>, root: NodeId) -> (K, T) {
		debug_assert!(self.node(root).parent.is_none());

		let next = self.node(root).sibling;
		match prev {
			None => self.head = next,
			Some(prev) => self.node_mut(prev).sibling = next,
		}
		let children = self.reverse_children(root);
		self.union_roots(children);

		let node = unsafe { self.nodes.take_unchecked(root) };
		let entry = unsafe { self.entries.take_unchecked(node.entry) };
		trace!("binomial: removed root of degree {}", node.degree);
		(entry.key, entry.elem)
	}

	/// Inserts the given element into the `BinomialHeap` with its associated key
	/// and returns a `Handle` to it that allows to directly address it.
	///
	/// The handle is for example required in order to use methods like `decrease_key`.
	pub fn insert(&mut self, elem: T, key: K) -> Handle {
		let (handle, node) = self.make_entry(elem, key);
		self.union_roots(Some(node));
		handle
	}

	/// Returns the handle of the element with the minimum key if not empty.
	///
	/// Of several roots with the minimum key the first one in the root list wins.
	pub fn minimum(&self) -> Option<Handle> {
		self.min_root().map(|(_, root)| self.node(root).entry)
	}

	/// Returns a reference to the current minimum element if not empty.
	#[inline]
	pub fn peek(&self) -> Option<&T> {
		self.minimum().map(|handle| &self.entry(handle).elem)
	}

	/// Returns a mutable reference to the current minimum element if not empty.
	#[inline]
	pub fn peek_mut(&mut self) -> Option<&mut T> {
		match self.minimum() {
			Some(handle) => Some(&mut self.entry_mut(handle).elem),
			None => None,
		}
	}

	/// Returns a reference to the element associated with the given handle.
	#[inline]
	pub fn get(&self, handle: Handle) -> Option<&T> {
		self.entries.get(handle).map(|entry| &entry.elem)
	}

	/// Returns a mutable reference to the element associated with the given handle.
	#[inline]
	pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
		self.entries.get_mut(handle).map(|entry| &mut entry.elem)
	}

	/// Returns the current key of the element associated with the given handle.
	#[inline]
	pub fn key(&self, handle: Handle) -> Option<K> {
		self.entries.get(handle).map(|entry| entry.key)
	}

	/// Removes the element associated with the minimum key within this `BinomialHeap`
	/// and returns it together with its key.
	pub fn extract_min(&mut self) -> Option<(K, T)> {
		let (prev, root) = self.min_root()?;
		Some(self.remove_root(prev, root))
	}

	/// Decreases the key of the element with the associated given `handle`.
	///
	/// Fails with `Error::InvalidDecreaseKey` if the new key is greater than the
	/// current key; the heap is left unmodified in that case.
	pub fn decrease_key(&mut self, handle: Handle, new_key: K) -> Result<()> {
		let current = self.entries.get(handle).ok_or(Error::InvalidHandle)?.key;
		if new_key > current {
			return Err(Error::InvalidDecreaseKey);
		}

		self.entry_mut(handle).key = new_key;
		let mut node = self.entry(handle).node;
		while let Some(parent) = self.node(node).parent {
			if self.key_of(parent) <= new_key {
				break;
			}
			self.swap_entries(node, parent);
			node = parent;
		}
		Ok(())
	}

	/// Removes the element associated with the given handle and returns it
	/// together with its key.
	///
	/// The entry is moved up to the root of its tree regardless of keys, then that
	/// root is removed the way `extract_min` removes the minimum.
	pub fn delete(&mut self, handle: Handle) -> Result<(K, T)> {
		if !self.contains(handle) {
			return Err(Error::InvalidHandle);
		}

		let mut node = self.entry(handle).node;
		while let Some(parent) = self.node(node).parent {
			self.swap_entries(node, parent);
			node = parent;
		}
		let prev = self.root_predecessor(node);
		Ok(self.remove_root(prev, node))
	}

	/// Moves all elements of `other` into this `BinomialHeap`.
	///
	/// Runs in O(m) for an `other` of `m` elements: its nodes are moved into the
	/// arena of this heap one by one, then unites the root lists like binary addition, O(log n).
	/// Handles of this heap stay valid. Handles of `other` do not, they have to be
	/// translated through the returned `Remap`.
	pub fn union(&mut self, other: Self) -> Remap {
		let BinomialHeap {
			head,
			nodes,
			entries,
		} = other;

		let mut ids: Vec<Option<NodeId>> = Vec::with_capacity(nodes.len());
		let mut moved = Vec::with_capacity(nodes.len());
		for (old, node) in nodes {
			let new = self.nodes.put(node);
			let idx = usize::from(old);
			if idx >= ids.len() {
				ids.resize(idx + 1, None);
			}
			ids[idx] = Some(new);
			moved.push(new);
		}
		let mut remap = Remap::with_capacity(entries.len());
		for (old, entry) in entries {
			remap.insert(old, self.entries.put(entry));
		}

		let relink = |id: Option<NodeId>| {
			id.map(|id| unsafe { ids[usize::from(id)].unchecked_unwrap() })
		};
		for &id in &moved {
			let entry = {
				let node = self.node_mut(id);
				node.parent = relink(node.parent);
				node.child = relink(node.child);
				node.sibling = relink(node.sibling);
				node.entry = unsafe { remap.translate(node.entry) };
				node.entry
			};
			self.entry_mut(entry).node = id;
		}

		debug!(
			"binomial: union absorbs {} elements into {}",
			moved.len(),
			self.len() - moved.len()
		);
		self.union_roots(relink(head));
		remap
	}

	/// Iterates over the handles of the roots in root list order.
	pub fn roots<'a>(&'a self) -> impl Iterator<Item = Handle> + 'a {
		self.siblings(self.head).map(move |id| self.node(id).entry)
	}

	/// Iterates over the handles of the children of the given element,
	/// starting with the child of highest degree.
	pub fn children<'a>(&'a self, handle: Handle) -> impl Iterator<Item = Handle> + 'a {
		let first = self
			.entries
			.get(handle)
			.and_then(|entry| self.node(entry.node).child);
		self.siblings(first).map(move |id| self.node(id).entry)
	}

	/// Returns the number of children of the given element.
	pub fn degree(&self, handle: Handle) -> Option<usize> {
		self.entries
			.get(handle)
			.map(|entry| self.node(entry.node).degree)
	}

	/// Iterate over the values in this `BinomialHeap` by reference in unspecified order.
	#[inline]
	pub fn values<'a>(&'a self) -> impl Iterator<Item = &'a T> + 'a {
		self.entries.values().map(|entry| &entry.elem)
	}

	/// Iterate over the values in this `BinomialHeap` by mutable reference in unspecified order.
	#[inline]
	pub fn values_mut<'a>(&'a mut self) -> impl Iterator<Item = &'a mut T> + 'a {
		self.entries.values_mut().map(|entry| &mut entry.elem)
	}

	/// Iterate over keys and values in a sorted-by-min order. Drains the heap.
	#[inline]
	pub fn drain_min(self) -> DrainMin<T, K> {
		DrainMin { heap: self }
	}
}

impl<T, K> Default for BinomialHeap<T, K>
where
	K: Key,
{
	fn default() -> Self {
		BinomialHeap::new()
	}
}

impl<T, K> Index<Handle> for BinomialHeap<T, K>
where
	K: Key,
{
	type Output = T;

	fn index(&self, handle: Handle) -> &Self::Output {
		self.get(handle).expect("no element found for given handle")
	}
}

impl<T, K> IndexMut<Handle> for BinomialHeap<T, K>
where
	K: Key,
{
	fn index_mut(&mut self, handle: Handle) -> &mut Self::Output {
		self.get_mut(handle)
			.expect("no element found for given handle")
	}
}

impl<T, K> Extend<(T, K)> for BinomialHeap<T, K>
where
	K: Key,
{
	fn extend<I: IntoIterator<Item = (T, K)>>(&mut self, iter: I) {
		for (elem, key) in iter {
			self.insert(elem, key);
		}
	}
}

impl<T, K> ::std::iter::FromIterator<(T, K)> for BinomialHeap<T, K>
where
	K: Key,
{
	fn from_iter<I: IntoIterator<Item = (T, K)>>(iter: I) -> Self {
		let mut heap = BinomialHeap::new();
		heap.extend(iter);
		heap
	}
}

impl<T, K> MergeableHeap<T, K> for BinomialHeap<T, K>
where
	K: Key,
{
	fn new() -> Self {
		BinomialHeap::new()
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

/// Iterator over keys and values stored within a `BinomialHeap` in a sorted-by-min order.
/// Drains the heap.
pub struct DrainMin<T, K: Key> {
	heap: BinomialHeap<T, K>,
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
	fn binomial_heap_insert(bencher: &mut Bencher) {
		let sample = setup_sample();
		bencher.iter(|| {
			let mut bh = BinomialHeap::new();
			for &key in sample.iter() {
				black_box(bh.insert((), key));
			}
		});
	}

	#[bench]
	fn binomial_heap_extract_min(bencher: &mut Bencher) {
		let bh = setup_sample()
			.into_iter()
			.map(|key| ((), key))
			.collect::<BinomialHeap<_, _>>();
		bencher.iter(|| {
			let mut bh = bh.clone();
			while let Some(_) = black_box(bh.extract_min()) {}
		});
	}

	#[bench]
	fn binomial_heap_decrease_key(bencher: &mut Bencher) {
		let mut bh = BinomialHeap::new();
		let handles = setup_sample()
			.into_iter()
			.map(|key| bh.insert((), key))
			.collect::<Vec<_>>();
		bencher.iter(|| {
			let mut bh = bh.clone();
			for &handle in handles.iter() {
				let key = bh.key(handle).unwrap();
				black_box(bh.decrease_key(handle, key - 100_000)).unwrap();
			}
		});
	}
}
