// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! File persistence: append-only writing and size/time based rotation

mod durable;
mod rolling;

pub use durable::DurableFile;
pub use rolling::RollingFile;
