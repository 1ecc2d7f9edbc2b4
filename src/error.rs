use std::fmt;

/// Errors that can be caused while using the heaps of this crate.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
	/// Caused when using `decrease_key` method with a `new_key` that is greater than the old one.
	InvalidDecreaseKey,
	/// Caused when a handle does not address a live element of the heap.
	InvalidHandle,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match *self {
			Error::InvalidDecreaseKey => write!(f, "new key is greater than current key"),
			Error::InvalidHandle => write!(f, "handle does not address a live element"),
		}
	}
}

impl ::std::error::Error for Error {}

/// Generic `Result` type for heap methods.
pub type Result<T> = ::std::result::Result<T, Error>;
