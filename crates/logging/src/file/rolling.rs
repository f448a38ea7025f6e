// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Size and time based log file rotation

use std::{
	path::PathBuf,
	sync::{
		Arc,
		atomic::{AtomicU64, Ordering},
	},
};

use chrono::{DateTime, Local};

use crate::{
	error::{Error, Result},
	file::DurableFile,
	metrics::EngineMetrics,
};

/// Process-lifetime counter disambiguating rolls within the same second.
static ROLL_INDEX: AtomicU64 = AtomicU64::new(0);

/// Owns one [`DurableFile`] and rotates it by elapsed minutes and/or
/// accumulated bytes.
///
/// Roll conditions are evaluated after each write, so a triggering write
/// is never split across two files. The time check compares minute
/// buckets (`floor(now / 60) - floor(created / 60)`), which can fire up
/// to ~59 seconds off the nominal boundary; that skew is a documented,
/// deliberately cheap approximation and downstream tooling relies on the
/// resulting cadence.
///
/// Single-threaded by contract: only the consumer thread calls in here.
#[derive(Debug)]
pub struct RollingFile {
	path: PathBuf,
	roll_cycle_minutes: u64,
	roll_size_bytes: u64,
	file: Option<DurableFile>,
	created: DateTime<Local>,
	metrics: Arc<EngineMetrics>,
}

impl RollingFile {
	/// Open the active file at `path`. A value of `0` for either roll
	/// parameter disables that trigger.
	pub fn new(
		path: impl Into<PathBuf>,
		roll_cycle_minutes: u64,
		roll_size_bytes: u64,
		metrics: Arc<EngineMetrics>,
	) -> Result<Self> {
		let path = path.into();
		let file =
			DurableFile::open(&path).map_err(|source| {
				Error::Open {
					path: path.clone(),
					source,
				}
			})?;
		Ok(Self {
			path,
			roll_cycle_minutes,
			roll_size_bytes,
			file: Some(file),
			created: Local::now(),
			metrics,
		})
	}

	/// Write through to the underlying file, then evaluate the roll
	/// conditions. Failures are counted and reported; they never
	/// propagate.
	pub fn write(&mut self, data: &[u8], flush_now: bool) {
		if data.is_empty() {
			return;
		}

		if self.file.is_none() {
			// a previous roll failed to reopen; retry here so
			// logging can resume
			match DurableFile::open(&self.path) {
				Ok(file) => {
					self.file = Some(file);
					self.created = Local::now();
				}
				Err(e) => {
					eprintln!(
						"[scrawl::rolling] cannot reopen {}: {e}",
						self.path.display()
					);
					self.metrics.record_write_error();
					return;
				}
			}
		}

		let file = self.file.as_mut().expect("file reopened above");
		match file.write(data, flush_now) {
			Ok(written) => {
				self.metrics.record_write(written as u64);
			}
			Err(e) => {
				eprintln!(
					"[scrawl::rolling] write to {} failed: {e}",
					self.path.display()
				);
				self.metrics.record_write_error();
			}
		}

		if self.needs_roll() {
			self.roll();
		}
	}

	/// Forward a flush to the underlying file.
	pub fn flush(&mut self) {
		if let Some(file) = self.file.as_mut() {
			if let Err(e) = file.flush() {
				eprintln!(
					"[scrawl::rolling] flush of {} failed: {e}",
					self.path.display()
				);
				self.metrics.record_write_error();
			}
		}
	}

	fn needs_roll(&self) -> bool {
		let Some(file) = self.file.as_ref() else {
			return false;
		};

		if self.roll_size_bytes != 0
			&& file.written_bytes() >= self.roll_size_bytes
		{
			return true;
		}

		if self.roll_cycle_minutes != 0 {
			let created_minute =
				self.created.timestamp().div_euclid(60);
			let now_minute =
				Local::now().timestamp().div_euclid(60);
			// a backwards clock step makes this negative; that
			// must not count as elapsed time
			let elapsed = now_minute - created_minute;
			if elapsed >= 0
				&& elapsed as u64 >= self.roll_cycle_minutes
			{
				return true;
			}
		}

		false
	}

	/// Flush and close the active file, rename it to
	/// `<path>.<YYYYMMDDHHMMSS>_<index>`, open a fresh file at the
	/// original path and reset the byte counter and creation time.
	fn roll(&mut self) {
		if let Some(mut file) = self.file.take() {
			if let Err(e) = file.close() {
				eprintln!(
					"[scrawl::rolling] close of {} failed: {e}",
					self.path.display()
				);
			}

			let index = ROLL_INDEX.fetch_add(1, Ordering::Relaxed);
			let rolled = PathBuf::from(format!(
				"{}.{}_{}",
				self.path.display(),
				self.created.format("%Y%m%d%H%M%S"),
				index
			));
			if let Err(e) = file.rename(&rolled) {
				// keep logging into a fresh file anyway; the
				// old content stays at the original path and
				// may be partially overwritten
				eprintln!(
					"[scrawl::rolling] rename {} -> {} failed: {e}",
					self.path.display(),
					rolled.display()
				);
				self.metrics.record_roll_error();
			}
		}

		match DurableFile::open(&self.path) {
			Ok(file) => {
				self.file = Some(file);
				self.created = Local::now();
				self.metrics.record_roll();
			}
			Err(e) => {
				eprintln!(
					"[scrawl::rolling] reopen of {} failed: {e}",
					self.path.display()
				);
				self.metrics.record_roll_error();
			}
		}
	}

	/// Bytes accepted by the active file since it was created.
	pub fn written_bytes(&self) -> u64 {
		self.file.as_ref().map(DurableFile::written_bytes).unwrap_or(0)
	}

	/// Shift the recorded creation time back (forward for negative
	/// `minutes`), so time based rolling can be exercised without
	/// waiting for a real minute boundary.
	#[cfg(test)]
	pub(crate) fn backdate(&mut self, minutes: i64) {
		self.created = self.created - chrono::Duration::minutes(minutes);
	}
}
