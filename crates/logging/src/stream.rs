// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Growable per-thread staging buffer for one formatted log line

use std::fmt;

/// Initial capacity of a staging buffer; one short line fits without
/// reallocation.
const INITIAL_CAPACITY: usize = 128;

/// Growable byte buffer used to assemble one formatted line before the
/// bytes are handed to the engine.
///
/// Owned per thread by the [`Logger`] façade; grows as needed and keeps
/// its allocation across [`reset`] so the steady state allocates
/// nothing. Implements [`fmt::Write`] for stream-style appends via
/// `write!`.
///
/// [`Logger`]: crate::logger::Logger
/// [`reset`]: LineBuffer::reset
#[derive(Debug)]
pub struct LineBuffer {
	bytes: Vec<u8>,
}

impl LineBuffer {
	pub fn new() -> Self {
		Self {
			bytes: Vec::with_capacity(INITIAL_CAPACITY),
		}
	}

	/// Append raw bytes, growing if needed.
	pub fn append(&mut self, data: &[u8]) {
		self.bytes.extend_from_slice(data);
	}

	/// Clear the content, keeping the allocation for reuse.
	pub fn reset(&mut self) {
		self.bytes.clear();
	}

	#[inline]
	pub fn as_slice(&self) -> &[u8] {
		&self.bytes
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}
}

impl Default for LineBuffer {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Write for LineBuffer {
	fn write_str(&mut self, s: &str) -> fmt::Result {
		self.bytes.extend_from_slice(s.as_bytes());
		Ok(())
	}
}
