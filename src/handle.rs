//! Handles addressing elements stored within a heap.

use unreachable::UncheckedOptionExt;

/// A handle to access stored elements within an addressable heap.
///
/// Handles are local to the heap that returned them. After a `union` the
/// handles of the absorbed heap have to be translated through the returned
/// [`Remap`](struct.Remap.html).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Handle(usize);

impl Handle {
	#[inline]
	pub(crate) fn undef() -> Self {
		Handle(usize::max_value())
	}

	#[inline]
	pub(crate) fn is_undef(self) -> bool {
		self == Handle::undef()
	}
}

impl From<usize> for Handle {
	fn from(val: usize) -> Handle {
		Handle(val)
	}
}

impl From<Handle> for usize {
	fn from(handle: Handle) -> usize {
		handle.0
	}
}

/// Translates the handles of a heap absorbed by `union` into handles
/// of the heap that absorbed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remap {
	table: Vec<Handle>,
}

impl Remap {
	pub(crate) fn with_capacity(cap: usize) -> Self {
		Remap {
			table: Vec::with_capacity(cap),
		}
	}

	pub(crate) fn insert(&mut self, old: Handle, new: Handle) {
		let idx = usize::from(old);
		if idx >= self.table.len() {
			self.table.resize(idx + 1, Handle::undef());
		}
		self.table[idx] = new;
	}

	/// Returns the handle within the merged heap for the given handle of
	/// the absorbed heap, or `None` if it did not address a live element.
	pub fn get(&self, old: Handle) -> Option<Handle> {
		self.table
			.get(usize::from(old))
			.cloned()
			.filter(|handle| !handle.is_undef())
	}

	/// Translates a handle that is known to have been moved.
	#[inline]
	pub(crate) unsafe fn translate(&self, old: Handle) -> Handle {
		self.get(old).unchecked_unwrap()
	}

	/// Returns the number of translated handles.
	pub fn len(&self) -> usize {
		self.table.iter().filter(|handle| !handle.is_undef()).count()
	}

	/// Returns true if no handle was translated.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}
