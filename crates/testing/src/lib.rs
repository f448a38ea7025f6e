// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

//! Test support utilities: scratch directories and condition waits

pub mod tempdir;
pub mod util;

pub use tempdir::temp_dir;
pub use util::{wait_for, wait_for_condition};
