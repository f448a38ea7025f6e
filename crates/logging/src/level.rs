// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Log severity levels

use std::fmt;

use serde::{Deserialize, Serialize};

/// Log severity levels, ordered from most to least verbose.
///
/// Filtering against the configured level happens in the [`Logger`]
/// façade; the engine persists whatever bytes it is handed.
///
/// [`Logger`]: crate::logger::Logger
#[derive(
	Debug,
	Clone,
	Copy,
	PartialEq,
	Eq,
	PartialOrd,
	Ord,
	Serialize,
	Deserialize,
)]
pub enum LogLevel {
	Trace = 0,
	Debug = 1,
	Info = 2,
	Warn = 3,
	Error = 4,
}

impl LogLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			LogLevel::Trace => "TRACE",
			LogLevel::Debug => "DEBUG",
			LogLevel::Info => "INFO",
			LogLevel::Warn => "WARN",
			LogLevel::Error => "ERROR",
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}
