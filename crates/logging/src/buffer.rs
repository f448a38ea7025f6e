// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Fixed-capacity byte buffer exchanged between producers and the consumer

/// A fixed-capacity, append-only byte buffer.
///
/// The buffer is owned exclusively by whichever component currently holds
/// it (the current slot of the engine, one of the two [`BufferQueue`]s, or
/// the consumer thread). There is no internal locking; callers must hold
/// external synchronization before touching a buffer they do not
/// exclusively own.
///
/// Appends past capacity are truncated to the remaining space and the
/// excess is dropped silently. Callers check the return value of
/// [`append`](FixedBuffer::append) or structure appends to stay within
/// capacity per call.
///
/// [`BufferQueue`]: crate::queue::BufferQueue
#[derive(Debug)]
pub struct FixedBuffer {
	storage: Box<[u8]>,
	used: usize,
}

impl FixedBuffer {
	/// Create a buffer with the given fixed capacity.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			storage: vec![0u8; capacity].into_boxed_slice(),
			used: 0,
		}
	}

	/// Copy `min(data.len(), remaining)` bytes into the buffer and
	/// advance the used length. Returns the number of bytes accepted;
	/// bytes beyond the remaining capacity are dropped.
	pub fn append(&mut self, data: &[u8]) -> usize {
		let accepted = data.len().min(self.remaining());
		self.storage[self.used..self.used + accepted]
			.copy_from_slice(&data[..accepted]);
		self.used += accepted;
		accepted
	}

	/// Set the used length back to zero. The storage is not zeroed;
	/// previous content is logically absent.
	pub fn reset(&mut self) {
		self.used = 0;
	}

	/// Read view of the buffered bytes, valid until the next mutation.
	#[inline]
	pub fn as_slice(&self) -> &[u8] {
		&self.storage[..self.used]
	}

	/// Fixed capacity chosen at construction.
	#[inline]
	pub fn capacity(&self) -> usize {
		self.storage.len()
	}

	/// Number of bytes currently buffered.
	#[inline]
	pub fn len(&self) -> usize {
		self.used
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.used == 0
	}

	/// Space left before appends start truncating.
	#[inline]
	pub fn remaining(&self) -> usize {
		self.storage.len() - self.used
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_append_within_capacity() {
		let mut buffer = FixedBuffer::with_capacity(16);
		assert_eq!(buffer.append(b"hello"), 5);
		assert_eq!(buffer.append(b" world"), 6);
		assert_eq!(buffer.len(), 11);
		assert_eq!(buffer.as_slice(), b"hello world");
		assert_eq!(buffer.remaining(), 5);
	}

	#[test]
	fn test_append_past_capacity_truncates() {
		let mut buffer = FixedBuffer::with_capacity(8);
		assert_eq!(buffer.append(b"12345"), 5);
		// only three bytes fit, the rest is dropped
		assert_eq!(buffer.append(b"67890"), 3);
		assert_eq!(buffer.len(), 8);
		assert_eq!(buffer.as_slice(), b"12345678");
		assert_eq!(buffer.remaining(), 0);
		// a full buffer accepts nothing
		assert_eq!(buffer.append(b"x"), 0);
		assert_eq!(buffer.len(), 8);
	}

	#[test]
	fn test_reset_is_idempotent() {
		let mut buffer = FixedBuffer::with_capacity(8);
		buffer.reset();
		assert_eq!(buffer.len(), 0);

		buffer.append(b"12345678");
		buffer.reset();
		assert_eq!(buffer.len(), 0);
		assert!(buffer.is_empty());
		buffer.reset();
		assert_eq!(buffer.len(), 0);

		// appends after reset start from offset zero
		buffer.append(b"ab");
		assert_eq!(buffer.as_slice(), b"ab");
	}

	#[test]
	fn test_capacity_is_fixed() {
		let buffer = FixedBuffer::with_capacity(32);
		assert_eq!(buffer.capacity(), 32);
		assert_eq!(buffer.remaining(), 32);
	}
}
