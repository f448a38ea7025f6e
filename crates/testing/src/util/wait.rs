// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Wait utilities for testing
//!
//! Provides utilities for waiting on conditions in tests without using
//! fixed sleeps, making tests both faster and more reliable.

use std::{
	thread::sleep,
	time::{Duration, Instant},
};

/// Default timeout for wait operations (5 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default poll interval (1 millisecond)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Wait for a condition to become true, polling at regular intervals.
///
/// # Panics
/// Panics if the condition doesn't become true within the timeout
/// period.
pub fn wait_for_condition<F>(
	condition: F,
	timeout: Duration,
	poll_interval: Duration,
	timeout_message: &str,
) where
	F: Fn() -> bool,
{
	let start = Instant::now();

	while !condition() {
		if start.elapsed() > timeout {
			panic!(
				"Timeout after {:?}: {}",
				timeout, timeout_message
			);
		}
		sleep(poll_interval);
	}
}

/// Wait for a condition with the default timeout and poll interval.
pub fn wait_for<F>(condition: F, message: &str)
where
	F: Fn() -> bool,
{
	wait_for_condition(
		condition,
		DEFAULT_TIMEOUT,
		DEFAULT_POLL_INTERVAL,
		message,
	);
}
