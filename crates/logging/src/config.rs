// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Engine and façade configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::level::LogLevel;

/// Default capacity of one exchange buffer (1 MiB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024 * 1024;

/// Default number of free buffers in the input queue. One more buffer
/// exists as the initial current buffer, so the pool totals
/// `DEFAULT_POOL_BUFFERS + 1`.
pub const DEFAULT_POOL_BUFFERS: usize = 10;

/// Configuration consumed by the engine and the [`Logger`] façade.
///
/// A value of `0` for either roll parameter disables that roll trigger.
///
/// [`Logger`]: crate::logger::Logger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
	/// Minimum severity the façade lets through.
	pub level: LogLevel,
	/// Path of the active log file.
	pub logfile: PathBuf,
	/// Roll the file every this many minutes; 0 disables time rolling.
	pub roll_cycle_minutes: u64,
	/// Roll the file once it holds this many bytes; 0 disables size
	/// rolling.
	pub roll_size_bytes: u64,
	/// Millisecond precision in header timestamps.
	pub use_millis: bool,
	/// Include `file:line` in the header.
	pub show_location: bool,
	/// Include the module path in the header. The module path stands in
	/// for a function name; Rust has no stable macro naming the
	/// enclosing function.
	pub show_module: bool,
	/// Free buffers handed to the input queue at initialization.
	pub pool_buffers: usize,
	/// Capacity of each exchange buffer in bytes.
	pub buffer_capacity: usize,
}

impl LogConfig {
	/// Configuration with defaults for everything but the file path.
	pub fn new(logfile: impl Into<PathBuf>) -> Self {
		Self {
			level: LogLevel::Info,
			logfile: logfile.into(),
			roll_cycle_minutes: 0,
			roll_size_bytes: 0,
			use_millis: false,
			show_location: false,
			show_module: false,
			pool_buffers: DEFAULT_POOL_BUFFERS,
			buffer_capacity: DEFAULT_BUFFER_CAPACITY,
		}
	}

	pub fn with_level(mut self, level: LogLevel) -> Self {
		self.level = level;
		self
	}

	pub fn with_roll_cycle_minutes(mut self, minutes: u64) -> Self {
		self.roll_cycle_minutes = minutes;
		self
	}

	pub fn with_roll_size_bytes(mut self, bytes: u64) -> Self {
		self.roll_size_bytes = bytes;
		self
	}

	pub fn with_millis(mut self, use_millis: bool) -> Self {
		self.use_millis = use_millis;
		self
	}

	pub fn with_location(mut self, show_location: bool) -> Self {
		self.show_location = show_location;
		self
	}

	pub fn with_module(mut self, show_module: bool) -> Self {
		self.show_module = show_module;
		self
	}

	pub fn with_pool_buffers(mut self, count: usize) -> Self {
		self.pool_buffers = count;
		self
	}

	pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
		self.buffer_capacity = capacity;
		self
	}
}
