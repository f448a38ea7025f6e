// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Error type for fallible engine construction

use std::{io, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the engine.
///
/// Only initialization is fallible. Once the engine is running, failures
/// are local, counted in [`EngineMetrics`] and reported on stderr; they
/// never propagate to producers.
///
/// [`EngineMetrics`]: crate::metrics::EngineMetrics
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// The log file could not be created or opened for appending.
	#[error("failed to open log file {path}")]
	Open {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// The background consumer thread could not be spawned.
	#[error("failed to spawn log consumer thread")]
	Spawn {
		#[source]
		source: io::Error,
	},
}
