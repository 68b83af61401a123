// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

//! Configuration shared by the arithmetic crates.
//!
//! Nothing in here is global: every setting is a plain value that callers hand to
//! `PAdicContext` or `Rationaliser` explicitly.

mod arithmetic_config;
pub mod load_config;

pub use arithmetic_config::*;
pub use load_config::{load_config, DEFAULT_CONFIG_NAME, ENV_PREFIX};
