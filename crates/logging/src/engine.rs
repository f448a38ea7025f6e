// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Asynchronous logging engine with a dedicated consumer thread

use std::{
	sync::{
		Arc,
		atomic::{AtomicBool, AtomicU64, Ordering},
	},
	thread::{self, JoinHandle},
	time::Duration,
};

use crossbeam_channel::bounded;
use parking_lot::Mutex;

use crate::{
	buffer::FixedBuffer,
	config::LogConfig,
	error::{Error, Result},
	file::RollingFile,
	metrics::{EngineMetrics, MetricsSnapshot},
	queue::BufferQueue,
};

/// Upper bound on how long a producer waits for a free buffer. A
/// producer must never block indefinitely because the consumer is slow
/// or stalled; past this bound the payload is dropped.
const PRODUCER_WAIT: Duration = Duration::from_millis(1);

/// How long the consumer waits for a full buffer before flushing the
/// current one. This bounds worst-case end-to-end visibility latency
/// to about one second under low log volume.
const CONSUMER_POLL: Duration = Duration::from_millis(1000);

/// Per-pop timeout of the bounded shutdown drain.
const DRAIN_WAIT: Duration = Duration::from_millis(1);

/// State shared between producers and the consumer thread.
struct Shared {
	/// The buffer producers currently append into. `None` only in the
	/// window after an exchange failed to pop a replacement.
	current: Mutex<Option<FixedBuffer>>,
	/// Free buffers waiting to become current.
	input: BufferQueue,
	/// Full buffers awaiting a write to the file.
	output: BufferQueue,
	running: AtomicBool,
	metrics: Arc<EngineMetrics>,
	/// Unix second of the last starvation report, for rate limiting.
	last_starvation_report: AtomicU64,
}

impl Shared {
	/// Report producer overload at most once per second; every
	/// occurrence is counted regardless.
	fn report_starvation(&self, context: &str) {
		let now = chrono::Utc::now().timestamp() as u64;
		let last = self.last_starvation_report.load(Ordering::Relaxed);
		if now > last
			&& self.last_starvation_report
				.compare_exchange(
					last,
					now,
					Ordering::Relaxed,
					Ordering::Relaxed,
				)
				.is_ok()
		{
			eprintln!(
				"[scrawl::engine] no free buffer within {:?} ({context}); payload dropped",
				PRODUCER_WAIT
			);
		}
	}
}

/// Asynchronous logging engine.
///
/// Producer threads hand byte payloads to [`append`] without blocking on
/// disk I/O; a single background consumer thread persists them through a
/// [`RollingFile`]. Exactly `pool_buffers + 1` buffers circulate between
/// the current slot, the two queues and the consumer for the engine's
/// lifetime; ownership hand-off over the queues is the only
/// synchronization between the two sides.
///
/// Overload degrades by dropping: when all buffers are full and the
/// consumer cannot keep up, an append call loses its payload after a
/// bounded wait instead of stalling the caller. Drops are observable
/// through [`metrics`].
///
/// [`append`]: AsyncLogEngine::append
/// [`metrics`]: AsyncLogEngine::metrics
pub struct AsyncLogEngine {
	shared: Arc<Shared>,
	/// The rolling file until `start` moves it into the consumer
	/// thread.
	file: Mutex<Option<RollingFile>>,
	consumer: Mutex<Option<JoinHandle<()>>>,
}

impl AsyncLogEngine {
	/// Create the engine: open the log file and allocate the buffer
	/// pool. The consumer thread is not spawned until [`start`].
	///
	/// [`start`]: AsyncLogEngine::start
	pub fn new(config: &LogConfig) -> Result<Self> {
		let metrics = Arc::new(EngineMetrics::new());
		let file = RollingFile::new(
			&config.logfile,
			config.roll_cycle_minutes,
			config.roll_size_bytes,
			Arc::clone(&metrics),
		)?;

		let shared = Arc::new(Shared {
			current: Mutex::new(Some(FixedBuffer::with_capacity(
				config.buffer_capacity,
			))),
			input: BufferQueue::with_buffers(
				config.pool_buffers,
				config.buffer_capacity,
			),
			output: BufferQueue::new(),
			running: AtomicBool::new(false),
			metrics,
			last_starvation_report: AtomicU64::new(0),
		});

		Ok(Self {
			shared,
			file: Mutex::new(Some(file)),
			consumer: Mutex::new(None),
		})
	}

	/// Append a payload. Callable concurrently from any number of
	/// producer threads; blocks for at most [`PRODUCER_WAIT`] when the
	/// current buffer needs exchanging, otherwise returns immediately.
	///
	/// Under overload (no free buffer in time) the payload of this
	/// call is dropped by design and accounted in the metrics; the
	/// caller continues unaffected.
	pub fn append(&self, data: &[u8]) {
		if data.is_empty() {
			return;
		}

		let mut slot = self.shared.current.lock();

		// a full current buffer is handed to the consumer and a free
		// one taken, with a bounded wait
		if let Some(current) = slot.as_ref() {
			if !current.is_empty()
				&& current.len() + data.len()
					> current.capacity()
			{
				let full = slot.take().expect("checked above");
				self.shared.output.push(full);
			}
		}

		if slot.is_none() {
			match self.shared.input.pop(Some(PRODUCER_WAIT)) {
				Some(fresh) => *slot = Some(fresh),
				None => {
					self.shared
						.metrics
						.record_drop(data.len() as u64);
					self.shared.report_starvation("append");
					return;
				}
			}
		}

		let current = slot.as_mut().expect("replenished above");
		let accepted = current.append(data);
		self.shared.metrics.record_append(accepted as u64);
		if accepted < data.len() {
			// oversized payloads truncate to buffer capacity
			self.shared
				.metrics
				.record_drop((data.len() - accepted) as u64);
		}
	}

	/// Spawn the background consumer thread. Returns once the thread
	/// is confirmed alive. Calling `start` again after it succeeded
	/// has no effect.
	pub fn start(&self) -> Result<()> {
		if self.shared
			.running
			.compare_exchange(
				false,
				true,
				Ordering::AcqRel,
				Ordering::Acquire,
			)
			.is_err()
		{
			// already running
			return Ok(());
		}

		let Some(file) = self.file.lock().take() else {
			// stopped engines cannot be restarted
			self.shared.running.store(false, Ordering::Release);
			return Ok(());
		};

		let shared = Arc::clone(&self.shared);
		let (file_tx, file_rx) = bounded::<RollingFile>(1);
		let (ready_tx, ready_rx) = bounded::<()>(1);

		let spawned = thread::Builder::new()
			.name("log-consumer".to_string())
			.spawn(move || {
				let Ok(file) = file_rx.recv() else {
					return;
				};
				let _ = ready_tx.send(());
				consume(shared, file);
			});

		let handle = match spawned {
			Ok(handle) => handle,
			Err(source) => {
				// the file stays with the engine so a later
				// stop still drains buffered appends inline
				*self.file.lock() = Some(file);
				self.shared
					.running
					.store(false, Ordering::Release);
				return Err(Error::Spawn {
					source,
				});
			}
		};

		*self.consumer.lock() = Some(handle);
		let _ = file_tx.send(file);

		// one-shot handshake instead of polling for liveness
		let _ = ready_rx.recv();
		Ok(())
	}

	/// Stop the engine: flag the consumer down, let it drain every
	/// remaining full buffer plus the current one to the file, and
	/// join it. Bounded by the consumer's poll timeout. No buffered
	/// data is lost on a clean shutdown.
	pub fn stop(&self) {
		if self.shared
			.running
			.compare_exchange(
				true,
				false,
				Ordering::AcqRel,
				Ordering::Acquire,
			)
			.is_ok()
		{
			// the consumer performs the terminal drain on its way
			// out
			if let Some(handle) = self.consumer.lock().take() {
				let _ = handle.join();
			}
			return;
		}

		// never started (or start failed): the file is still here,
		// drain inline
		if let Some(mut file) = self.file.lock().take() {
			drain(&self.shared, &mut file);
			file.flush();
		}
	}

	/// Whether the consumer thread is running.
	pub fn is_running(&self) -> bool {
		self.shared.running.load(Ordering::Acquire)
	}

	/// Snapshot of the engine counters.
	pub fn metrics(&self) -> MetricsSnapshot {
		self.shared.metrics.snapshot()
	}

	/// Free buffers currently waiting in the input queue. Racy
	/// point-in-time value, useful for observation only.
	pub fn free_buffers(&self) -> usize {
		self.shared.input.len()
	}

	/// Full buffers currently awaiting the consumer. Racy
	/// point-in-time value.
	pub fn pending_buffers(&self) -> usize {
		self.shared.output.len()
	}

	/// Whether a current buffer is installed. Racy point-in-time
	/// value.
	pub fn has_current(&self) -> bool {
		self.shared.current.lock().is_some()
	}
}

impl Drop for AsyncLogEngine {
	fn drop(&mut self) {
		self.stop();
	}
}

/// Consumer loop: the only code path that touches the rolling file.
fn consume(shared: Arc<Shared>, mut file: RollingFile) {
	while shared.running.load(Ordering::Acquire) {
		match shared.output.pop(Some(CONSUMER_POLL)) {
			Some(mut buffer) => {
				file.write(buffer.as_slice(), false);
				buffer.reset();

				// adopt the drained buffer as current if the
				// slot is empty, shrinking the window where
				// producers wait for the input queue
				let mut slot = shared.current.lock();
				if slot.is_none() {
					*slot = Some(buffer);
				} else {
					drop(slot);
					shared.input.push(buffer);
				}
			}
			None => {
				// nothing arrived within the poll window; push
				// whatever sits in the current buffer out to
				// the file so low-volume logs become visible
				let swapped = {
					let mut slot = shared.current.lock();
					let has_data = slot
						.as_ref()
						.is_some_and(|buffer| {
							!buffer.is_empty()
						});
					if !has_data {
						None
					} else {
						let previous = slot.take();
						*slot = shared
							.input
							.pop(Some(DRAIN_WAIT));
						if slot.is_none() {
							shared.report_starvation(
								"flush swap",
							);
						}
						previous
					}
				};

				if let Some(mut buffer) = swapped {
					file.write(buffer.as_slice(), true);
					buffer.reset();
					shared.input.push(buffer);
				}
			}
		}
	}

	// terminal drain before the thread exits
	drain(&shared, &mut file);
	file.flush();
}

/// Write every remaining full buffer, then the current buffer, to the
/// file. Bounded: each pop waits at most [`DRAIN_WAIT`], the loop stops
/// once the output queue reads empty.
fn drain(shared: &Shared, file: &mut RollingFile) {
	loop {
		match shared.output.pop(Some(DRAIN_WAIT)) {
			Some(mut buffer) => {
				file.write(buffer.as_slice(), false);
				buffer.reset();
				shared.input.push(buffer);
			}
			None => {
				if shared.output.is_empty() {
					break;
				}
			}
		}
	}

	// the current buffer may hold data that never filled up
	let mut slot = shared.current.lock();
	if let Some(buffer) = slot.as_mut() {
		if !buffer.is_empty() {
			file.write(buffer.as_slice(), true);
			buffer.reset();
		}
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use scrawl_testing::tempdir::temp_dir;

	use super::*;
	use crate::level::LogLevel;

	fn config(dir: &std::path::Path) -> LogConfig {
		LogConfig::new(dir.join("engine.log"))
			.with_level(LogLevel::Trace)
	}

	#[test]
	fn test_append_before_start_is_buffered() {
		temp_dir(|dir| {
			let engine = AsyncLogEngine::new(&config(dir)).unwrap();
			engine.append(b"early\n");
			assert!(!engine.is_running());
			assert_eq!(engine.metrics().appends, 1);

			// drop-time shutdown flushes the buffered line
			drop(engine);
			assert_eq!(
				fs::read_to_string(dir.join("engine.log"))?,
				"early\n"
			);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_start_stop_lifecycle() {
		temp_dir(|dir| {
			let engine = AsyncLogEngine::new(&config(dir)).unwrap();
			engine.start().unwrap();
			assert!(engine.is_running());
			// second start has no effect
			engine.start().unwrap();

			engine.append(b"line\n");
			engine.stop();
			assert!(!engine.is_running());
			// second stop has no effect either
			engine.stop();

			assert_eq!(
				fs::read_to_string(dir.join("engine.log"))?,
				"line\n"
			);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_stop_without_consumer_drains_inline() {
		temp_dir(|dir| {
			// several full buffers plus a partial current one,
			// all drained by stop while no consumer exists
			let config = config(dir)
				.with_pool_buffers(4)
				.with_buffer_capacity(8);
			let engine = AsyncLogEngine::new(&config).unwrap();

			for chunk in [b"aaaaaaaa", b"bbbbbbbb", b"cccccccc"] {
				engine.append(chunk);
			}
			engine.append(b"tail");
			engine.stop();

			assert_eq!(
				fs::read_to_string(dir.join("engine.log"))?,
				"aaaaaaaabbbbbbbbcccccccctail"
			);
			// the pool survived the drain intact
			assert_eq!(
				engine.free_buffers()
					+ engine.pending_buffers()
					+ usize::from(engine.has_current()),
				5
			);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_empty_append_is_ignored() {
		temp_dir(|dir| {
			let engine = AsyncLogEngine::new(&config(dir)).unwrap();
			engine.append(b"");
			assert_eq!(engine.metrics().appends, 0);
			Ok(())
		})
		.unwrap();
	}

	#[test]
	fn test_full_buffer_is_exchanged() {
		temp_dir(|dir| {
			let config = config(dir)
				.with_buffer_capacity(16)
				.with_pool_buffers(4);
			let engine = AsyncLogEngine::new(&config).unwrap();

			engine.append(b"0123456789"); // 10 of 16
			assert_eq!(engine.pending_buffers(), 0);
			engine.append(b"0123456789"); // forces the exchange
			assert_eq!(engine.pending_buffers(), 1);
			assert_eq!(engine.free_buffers(), 3);

			drop(engine);
			let written = fs::read_to_string(
				dir.join("engine.log"),
			)?;
			assert_eq!(written, "01234567890123456789");
			Ok(())
		})
		.unwrap();
	}
}
