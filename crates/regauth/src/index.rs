// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Default registry index and well-known config file locations

use std::path::PathBuf;

use tracing::debug;

/// Hostname of the public Docker index.
pub const INDEX_NAME: &str = "index.docker.io";

/// Legacy URL of the public Docker index, as written by old clients.
pub const INDEX_URL: &str = "https://index.docker.io/v1/";

/// Config file used by current Docker clients, relative to the home directory.
pub const DOCKER_CONFIG_FILENAME: &str = ".docker/config.json";

/// Config file used by pre-1.7 Docker clients, relative to the home directory.
pub const LEGACY_DOCKER_CONFIG_FILENAME: &str = ".dockercfg";

/// Environment variable naming the directory that holds `config.json`.
pub const DOCKER_CONFIG_ENV: &str = "DOCKER_CONFIG";

/// The registry used when a reference does not name one explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryIndex {
    /// Bare hostname, used as the store key and the default lookup target.
    pub name: String,
    /// Full URL, recorded as the server address for legacy plain-text entries.
    pub url: String,
}

impl RegistryIndex {
    /// Describe a custom default index.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl Default for RegistryIndex {
    fn default() -> Self {
        Self::new(INDEX_NAME, INDEX_URL)
    }
}

/// Location of the modern config file.
///
/// `$DOCKER_CONFIG/config.json` wins over `~/.docker/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(DOCKER_CONFIG_ENV).filter(|dir| !dir.is_empty()) {
        return Some(PathBuf::from(dir).join("config.json"));
    }
    home_dir().map(|home| home.join(DOCKER_CONFIG_FILENAME))
}

/// Location of the legacy `~/.dockercfg` file.
pub fn default_legacy_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(LEGACY_DOCKER_CONFIG_FILENAME))
}

fn home_dir() -> Option<PathBuf> {
    match etcetera::home_dir() {
        Ok(home) => Some(home),
        Err(e) => {
            debug!("Cannot determine home directory: {}", e);
            None
        }
    }
}
