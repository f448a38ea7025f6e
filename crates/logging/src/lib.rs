// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! In-process asynchronous logging engine.
//!
//! Application threads hand formatted log lines to the engine without
//! blocking on disk I/O; a single background consumer thread persists
//! them to rolling files. A fixed pool of buffers circulates between
//! the producers' current buffer, an input queue of free buffers and an
//! output queue of full ones, so memory stays bounded under any
//! producer rate. When producers outrun the consumer, appends drop
//! their payload after a bounded wait instead of stalling the caller;
//! drops are counted and reported.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use scrawl_logging::{AsyncLogEngine, LogConfig, LogLevel, Logger, info};
//!
//! # fn main() -> scrawl_logging::Result<()> {
//! let config = LogConfig::new("app.log")
//! 	.with_level(LogLevel::Debug)
//! 	.with_roll_size_bytes(64 * 1024 * 1024);
//! let engine = Arc::new(AsyncLogEngine::new(&config)?);
//! engine.start()?;
//!
//! let logger = Logger::new(Arc::clone(&engine), &config);
//! info!(logger, "service listening on {}", 8080);
//! # Ok(())
//! # }
//! ```

pub use buffer::FixedBuffer;
pub use config::{DEFAULT_BUFFER_CAPACITY, DEFAULT_POOL_BUFFERS, LogConfig};
pub use engine::AsyncLogEngine;
pub use error::{Error, Result};
pub use file::{DurableFile, RollingFile};
pub use level::LogLevel;
pub use logger::Logger;
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use queue::BufferQueue;
pub use stream::LineBuffer;

mod buffer;
mod config;
mod engine;
mod error;
mod file;
mod level;
mod logger;
mod macros;
mod metrics;
mod queue;
mod stream;
