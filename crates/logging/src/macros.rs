// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Logging macros for convenient usage

/// Main logging macro; captures the call site's file, line and module.
///
/// The level check happens before any formatting work, so disabled
/// levels cost one comparison.
#[macro_export]
macro_rules! log {
	($logger:expr, $level:expr, $($arg:tt)+) => {{
		let logger = &$logger;
		if logger.enabled($level) {
			logger.log(
				$level,
				module_path!(),
				file!(),
				line!(),
				format_args!($($arg)+),
			);
		}
	}};
}

/// Trace level logging
#[macro_export]
macro_rules! trace {
	($logger:expr, $($arg:tt)*) => {
		$crate::log!($logger, $crate::LogLevel::Trace, $($arg)*)
	};
}

/// Debug level logging
#[macro_export]
macro_rules! debug {
	($logger:expr, $($arg:tt)*) => {
		$crate::log!($logger, $crate::LogLevel::Debug, $($arg)*)
	};
}

/// Info level logging
#[macro_export]
macro_rules! info {
	($logger:expr, $($arg:tt)*) => {
		$crate::log!($logger, $crate::LogLevel::Info, $($arg)*)
	};
}

/// Warning level logging
#[macro_export]
macro_rules! warn {
	($logger:expr, $($arg:tt)*) => {
		$crate::log!($logger, $crate::LogLevel::Warn, $($arg)*)
	};
}

/// Error level logging
#[macro_export]
macro_rules! error {
	($logger:expr, $($arg:tt)*) => {
		$crate::log!($logger, $crate::LogLevel::Error, $($arg)*)
	};
}

/// Header-less logging, for continuation lines and pre-formatted output
#[macro_export]
macro_rules! log_raw {
	($logger:expr, $level:expr, $($arg:tt)+) => {{
		let logger = &$logger;
		if logger.enabled($level) {
			logger.log_raw($level, format_args!($($arg)+));
		}
	}};
}
