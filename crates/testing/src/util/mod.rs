// Copyright (c) scrawl.dev 2025
// This file is licensed under the AGPL-3.0-or-later, see license.md file

mod wait;

pub use wait::{wait_for, wait_for_condition};
