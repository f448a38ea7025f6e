// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Call-site façade: level filtering and header formatting

use std::{cell::RefCell, fmt, sync::Arc};

use crate::{
	config::LogConfig, engine::AsyncLogEngine, level::LogLevel,
	stream::LineBuffer,
};

thread_local! {
	/// Per-thread staging buffer; lives for the thread's lifetime so
	/// the hot path never allocates once the buffer has grown to its
	/// working size.
	static STAGING: RefCell<LineBuffer> = RefCell::new(LineBuffer::new());
}

/// Façade over the engine that formats one line per log call.
///
/// Holds a shared handle to an explicitly constructed
/// [`AsyncLogEngine`]; there is no ambient global. Each call stages its
/// line in a thread-local [`LineBuffer`], prepends the configured
/// header fields and hands the bytes to the engine in a single append,
/// which keeps the line contiguous in the output stream.
pub struct Logger {
	engine: Arc<AsyncLogEngine>,
	level: LogLevel,
	use_millis: bool,
	show_location: bool,
	show_module: bool,
}

impl Logger {
	pub fn new(engine: Arc<AsyncLogEngine>, config: &LogConfig) -> Self {
		Self {
			engine,
			level: config.level,
			use_millis: config.use_millis,
			show_location: config.show_location,
			show_module: config.show_module,
		}
	}

	/// Whether `level` passes the configured filter.
	#[inline]
	pub fn enabled(&self, level: LogLevel) -> bool {
		level >= self.level
	}

	/// Shared handle to the engine behind this façade.
	pub fn engine(&self) -> &Arc<AsyncLogEngine> {
		&self.engine
	}

	/// Format a line with header and hand it to the engine. Called by
	/// the logging macros, which capture location and module.
	pub fn log(
		&self,
		level: LogLevel,
		module: &str,
		file: &str,
		line: u32,
		args: fmt::Arguments<'_>,
	) {
		if !self.enabled(level) {
			return;
		}

		STAGING.with(|staging| {
			let mut staging = staging.borrow_mut();
			staging.reset();
			self.format_header(&mut staging, level, module, file, line);
			let _ = fmt::Write::write_fmt(&mut *staging, args);
			staging.append(b"\n");

			self.engine.append(staging.as_slice());
			staging.reset();
		});
	}

	/// Hand a message to the engine without any header.
	pub fn log_raw(&self, level: LogLevel, args: fmt::Arguments<'_>) {
		if !self.enabled(level) {
			return;
		}

		STAGING.with(|staging| {
			let mut staging = staging.borrow_mut();
			staging.reset();
			let _ = fmt::Write::write_fmt(&mut *staging, args);
			staging.append(b"\n");

			self.engine.append(staging.as_slice());
			staging.reset();
		});
	}

	fn format_header(
		&self,
		staging: &mut LineBuffer,
		level: LogLevel,
		module: &str,
		file: &str,
		line: u32,
	) {
		use fmt::Write;

		let now = chrono::Local::now();
		let _ = if self.use_millis {
			write!(
				staging,
				"{} ",
				now.format("%Y-%m-%d %H:%M:%S%.3f")
			)
		} else {
			write!(staging, "{} ", now.format("%Y-%m-%d %H:%M:%S"))
		};

		let _ = write!(staging, "{} ", level.as_str());

		if self.show_location {
			let _ = write!(staging, "[{file}:{line}] ");
		}
		if self.show_module {
			let _ = write!(staging, "[{module}] ");
		}
	}
}
