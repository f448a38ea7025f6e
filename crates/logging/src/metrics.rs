// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Counters observing engine throughput and degradation

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by the engine.
///
/// Producer overload is deliberately observable rather than fatal:
/// every dropped payload shows up in `dropped_appends`/`dropped_bytes`.
#[derive(Debug, Default)]
pub struct EngineMetrics {
	/// Append calls that placed their payload into a buffer
	pub appends: AtomicU64,
	/// Bytes accepted into buffers
	pub bytes_appended: AtomicU64,
	/// Append calls dropped because no free buffer arrived in time
	pub dropped_appends: AtomicU64,
	/// Bytes dropped by overloaded appends
	pub dropped_bytes: AtomicU64,
	/// Full or swapped-out buffers written to the file
	pub buffers_written: AtomicU64,
	/// Bytes handed to the rolling file
	pub bytes_written: AtomicU64,
	/// Writes aborted by an unrecoverable I/O error
	pub write_errors: AtomicU64,
	/// Completed file rotations
	pub rolls: AtomicU64,
	/// Rotations where the rename or reopen failed
	pub roll_errors: AtomicU64,
}

impl EngineMetrics {
	pub const fn new() -> Self {
		Self {
			appends: AtomicU64::new(0),
			bytes_appended: AtomicU64::new(0),
			dropped_appends: AtomicU64::new(0),
			dropped_bytes: AtomicU64::new(0),
			buffers_written: AtomicU64::new(0),
			bytes_written: AtomicU64::new(0),
			write_errors: AtomicU64::new(0),
			rolls: AtomicU64::new(0),
			roll_errors: AtomicU64::new(0),
		}
	}

	#[inline]
	pub fn record_append(&self, bytes: u64) {
		self.appends.fetch_add(1, Ordering::Relaxed);
		self.bytes_appended.fetch_add(bytes, Ordering::Relaxed);
	}

	#[inline]
	pub fn record_drop(&self, bytes: u64) {
		self.dropped_appends.fetch_add(1, Ordering::Relaxed);
		self.dropped_bytes.fetch_add(bytes, Ordering::Relaxed);
	}

	#[inline]
	pub fn record_write(&self, bytes: u64) {
		self.buffers_written.fetch_add(1, Ordering::Relaxed);
		self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
	}

	#[inline]
	pub fn record_write_error(&self) {
		self.write_errors.fetch_add(1, Ordering::Relaxed);
	}

	#[inline]
	pub fn record_roll(&self) {
		self.rolls.fetch_add(1, Ordering::Relaxed);
	}

	#[inline]
	pub fn record_roll_error(&self) {
		self.roll_errors.fetch_add(1, Ordering::Relaxed);
	}

	/// Point-in-time snapshot of all counters.
	pub fn snapshot(&self) -> MetricsSnapshot {
		MetricsSnapshot {
			appends: self.appends.load(Ordering::Relaxed),
			bytes_appended: self
				.bytes_appended
				.load(Ordering::Relaxed),
			dropped_appends: self
				.dropped_appends
				.load(Ordering::Relaxed),
			dropped_bytes: self
				.dropped_bytes
				.load(Ordering::Relaxed),
			buffers_written: self
				.buffers_written
				.load(Ordering::Relaxed),
			bytes_written: self
				.bytes_written
				.load(Ordering::Relaxed),
			write_errors: self.write_errors.load(Ordering::Relaxed),
			rolls: self.rolls.load(Ordering::Relaxed),
			roll_errors: self.roll_errors.load(Ordering::Relaxed),
		}
	}
}

/// Plain copy of the engine counters at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
	pub appends: u64,
	pub bytes_appended: u64,
	pub dropped_appends: u64,
	pub dropped_bytes: u64,
	pub buffers_written: u64,
	pub bytes_written: u64,
	pub write_errors: u64,
	pub rolls: u64,
	pub roll_errors: u64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_snapshot_reflects_counters() {
		let metrics = EngineMetrics::new();
		metrics.record_append(10);
		metrics.record_append(5);
		metrics.record_drop(7);
		metrics.record_write(15);
		metrics.record_roll();

		let snapshot = metrics.snapshot();
		assert_eq!(snapshot.appends, 2);
		assert_eq!(snapshot.bytes_appended, 15);
		assert_eq!(snapshot.dropped_appends, 1);
		assert_eq!(snapshot.dropped_bytes, 7);
		assert_eq!(snapshot.buffers_written, 1);
		assert_eq!(snapshot.bytes_written, 15);
		assert_eq!(snapshot.rolls, 1);
		assert_eq!(snapshot.write_errors, 0);
	}
}
