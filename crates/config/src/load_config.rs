// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use tracing::debug;

use crate::ArithmeticConfig;

pub const DEFAULT_CONFIG_NAME: &str = "ffs.config.yaml";
pub const ENV_PREFIX: &str = "FFS_";

/// Walk from `start` towards the filesystem root looking for `filename`.
pub fn find_in_parent(start: &Path, filename: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(filename))
        .find(|candidate| candidate.is_file())
}

/// An explicit path wins (relative paths are taken from `cwd`), otherwise the
/// nearest `ffs.config.yaml` above `cwd` is used, if any.
pub fn resolve_config_path(cwd: &Path, explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(file) if file.is_absolute() => Some(file.to_path_buf()),
        Some(file) => Some(cwd.join(file)),
        None => find_in_parent(cwd, DEFAULT_CONFIG_NAME),
    }
}

/// Layer the configuration: built-in defaults, then the YAML file, then
/// `FFS_` environment variables (`__` separates nested keys, e.g.
/// `FFS_RECONSTRUCTION__ALGORITHM=lgrr`).
pub fn load_config(path: Option<&Path>) -> Result<ArithmeticConfig> {
    let cwd = env::current_dir()?;
    let mut figment = Figment::from(Serialized::defaults(ArithmeticConfig::default()));

    if let Some(file) = resolve_config_path(&cwd, path) {
        let yaml = fs::read_to_string(&file)
            .with_context(|| format!("Configuration file not found: {}", file.display()))?;
        debug!("Loading arithmetic configuration from {}", file.display());
        figment = figment.merge(Yaml::string(&yaml));
    }

    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .context("Could not parse configuration")
}
