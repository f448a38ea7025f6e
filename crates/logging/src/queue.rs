// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Thread-safe mailbox of buffer ownership tokens

use std::{
	collections::VecDeque,
	time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};

use crate::buffer::FixedBuffer;

/// Thread-safe FIFO of owned [`FixedBuffer`]s.
///
/// Pushing transfers ownership into the queue and wakes one waiter;
/// popping transfers ownership out. Together with the engine's current
/// slot this is the sole synchronization point between producers and the
/// consumer; a buffer is never referenced by two owners at once.
#[derive(Debug)]
pub struct BufferQueue {
	buffers: Mutex<VecDeque<FixedBuffer>>,
	available: Condvar,
}

impl BufferQueue {
	/// Create an empty queue.
	pub fn new() -> Self {
		Self {
			buffers: Mutex::new(VecDeque::new()),
			available: Condvar::new(),
		}
	}

	/// Create a queue pre-populated with `count` buffers of `capacity`
	/// bytes each.
	pub fn with_buffers(count: usize, capacity: usize) -> Self {
		let queue = Self::new();
		{
			let mut buffers = queue.buffers.lock();
			for _ in 0..count {
				buffers.push_back(FixedBuffer::with_capacity(
					capacity,
				));
			}
		}
		queue
	}

	/// Enqueue a buffer and wake one waiter. Always succeeds.
	pub fn push(&self, buffer: FixedBuffer) {
		{
			let mut buffers = self.buffers.lock();
			buffers.push_back(buffer);
		}
		self.available.notify_one();
	}

	/// Dequeue a buffer, blocking until one is available or `timeout`
	/// elapses. `None` as timeout waits indefinitely.
	///
	/// Returns `None` once the timeout elapses with the queue still
	/// empty. That is a normal "nothing ready yet" signal, not an
	/// error; callers are expected to handle it.
	pub fn pop(&self, timeout: Option<Duration>) -> Option<FixedBuffer> {
		let mut buffers = self.buffers.lock();
		match timeout {
			None => {
				while buffers.is_empty() {
					self.available.wait(&mut buffers);
				}
			}
			Some(timeout) => {
				let deadline = Instant::now() + timeout;
				while buffers.is_empty() {
					let result = self.available.wait_until(
						&mut buffers,
						deadline,
					);
					if result.timed_out()
						&& buffers.is_empty()
					{
						return None;
					}
				}
			}
		}
		buffers.pop_front()
	}

	/// Point-in-time emptiness snapshot. Racy by design; used only for
	/// best-effort draining during shutdown, never for correctness.
	pub fn is_empty(&self) -> bool {
		self.buffers.lock().is_empty()
	}

	/// Point-in-time length snapshot, as racy as [`is_empty`].
	///
	/// [`is_empty`]: BufferQueue::is_empty
	pub fn len(&self) -> usize {
		self.buffers.lock().len()
	}
}

impl Default for BufferQueue {
	fn default() -> Self {
		Self::new()
	}
}
