// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Docker config loading
//!
//! Credentials have been stored in three formats over the life of the Docker
//! client. The loader tries them in order:
//!
//! 1. `~/.docker/config.json`, a JSON object with an `auths` section
//! 2. `~/.dockercfg`, a bare JSON `auths` mapping
//! 3. `~/.dockercfg`, two `key = value` lines holding an auth token and an email
//!
//! Errors in any attempt are logged at debug level and the next format is
//! tried. Loading never fails; the worst case is an empty store.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::codec::decode_auth;
use crate::error::{Error, Result};
use crate::index::{default_config_path, default_legacy_config_path, RegistryIndex};
use crate::parser::{parse_auths, parse_auths_json, RawAuthEntry};
use crate::store::{CredentialRecord, CredentialStore};

/// On-disk credential formats, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `config.json` with a top-level `auths` object
    Modern,
    /// `.dockercfg` holding a bare `auths` mapping
    LegacyJson,
    /// `.dockercfg` holding `auth = ...` and `email = ...` lines
    LegacyPlain,
}

/// Result of one load attempt.
#[derive(Debug)]
enum Attempt {
    /// Credentials were found; stop here.
    Loaded(CredentialStore),
    /// This format did not apply; try the next one.
    Next,
    /// Give up and return an empty store.
    Stop,
}

#[derive(Deserialize)]
struct ModernConfigFile {
    #[serde(default)]
    auths: Option<BTreeMap<String, RawAuthEntry>>,
}

impl ConfigFormat {
    /// Every format, in fallback order.
    pub const ORDER: [ConfigFormat; 3] = [
        ConfigFormat::Modern,
        ConfigFormat::LegacyJson,
        ConfigFormat::LegacyPlain,
    ];

    /// Parse file contents in this format.
    ///
    /// `Ok(None)` means the contents are well-formed but hold no credentials
    /// (a modern config without an `auths` section).
    pub fn parse(self, contents: &str, index: &RegistryIndex) -> Result<Option<CredentialStore>> {
        match self {
            ConfigFormat::Modern => {
                let config: ModernConfigFile = serde_json::from_str(contents)?;
                config.auths.map(parse_auths).transpose()
            }
            ConfigFormat::LegacyJson => parse_auths_json(contents).map(Some),
            ConfigFormat::LegacyPlain => parse_legacy_plain(contents, index).map(Some),
        }
    }

    /// What to do when this format's file does not exist.
    fn on_missing(self) -> Attempt {
        match self {
            ConfigFormat::Modern => Attempt::Next,
            ConfigFormat::LegacyJson | ConfigFormat::LegacyPlain => Attempt::Stop,
        }
    }
}

/// Parse the pre-JSON `.dockercfg` format.
///
/// The first usable line carries the auth token and the second the email.
/// The single record is keyed by the index hostname but its server address is
/// the index URL, matching what the oldest clients wrote.
fn parse_legacy_plain(contents: &str, index: &RegistryIndex) -> Result<CredentialStore> {
    let values: Vec<&str> = contents
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(_, value)| value.trim())
        .collect();

    let [auth, email, ..] = values.as_slice() else {
        return Err(Error::InvalidConfigFile(
            "Invalid or empty configuration file!".to_string(),
        ));
    };

    let (username, password) = decode_auth(auth)?;
    let mut store = CredentialStore::new();
    store.insert(
        index.name.clone(),
        CredentialRecord {
            username,
            password,
            email: Some(email.to_string()),
            server_address: index.url.clone(),
        },
    );
    Ok(store)
}

/// Loads credentials from Docker config files.
///
/// Paths and the default index are fixed at construction so tests and
/// embedders can point the loader anywhere without touching `$HOME`.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    index: RegistryIndex,
    config_path: Option<PathBuf>,
    legacy_config_path: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a loader for the current user's default config locations.
    pub fn new() -> Self {
        Self {
            index: RegistryIndex::default(),
            config_path: default_config_path(),
            legacy_config_path: default_legacy_config_path(),
        }
    }

    /// Use a different default index for legacy plain-text entries.
    pub fn with_index(mut self, index: RegistryIndex) -> Self {
        self.index = index;
        self
    }

    /// Override the modern config location.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Override the legacy config location.
    pub fn with_legacy_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.legacy_config_path = Some(path.into());
        self
    }

    /// The index this loader attributes legacy entries to.
    pub fn index(&self) -> &RegistryIndex {
        &self.index
    }

    /// Load credentials, trying each format in turn.
    ///
    /// `explicit_path` replaces both default locations. Never fails: missing
    /// or unreadable files yield an empty store.
    pub fn load(&self, explicit_path: Option<&Path>) -> CredentialStore {
        for format in ConfigFormat::ORDER {
            let path = explicit_path.or(match format {
                ConfigFormat::Modern => self.config_path.as_deref(),
                ConfigFormat::LegacyJson | ConfigFormat::LegacyPlain => {
                    self.legacy_config_path.as_deref()
                }
            });
            let Some(path) = path else {
                debug!("No location for {:?} config, skipping", format);
                continue;
            };

            match self.attempt(format, path) {
                Attempt::Loaded(store) => return store,
                Attempt::Next => continue,
                Attempt::Stop => return CredentialStore::new(),
            }
        }

        debug!("All parsing attempts failed - returning empty config");
        CredentialStore::new()
    }

    fn attempt(&self, format: ConfigFormat, path: &Path) -> Attempt {
        debug!("Trying {} as {:?}", path.display(), format);

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("File doesn't exist: {}", path.display());
                return format.on_missing();
            }
            Err(e) => {
                debug!("Failed to read {}: {}", path.display(), e);
                return Attempt::Next;
            }
        };

        match format.parse(&contents, &self.index) {
            Ok(Some(store)) => {
                debug!(
                    "Loaded {} credential(s) from {}",
                    store.len(),
                    path.display()
                );
                Attempt::Loaded(store)
            }
            Ok(None) => {
                debug!("Couldn't find 'auths' section in {}", path.display());
                Attempt::Next
            }
            Err(e) => {
                debug!("Failed to parse {} as {:?}: {}", path.display(), format, e);
                Attempt::Next
            }
        }
    }
}

/// Load credentials from `explicit_path`, or from the current user's default
/// Docker config locations.
pub fn load_config(explicit_path: Option<&Path>) -> CredentialStore {
    ConfigLoader::new().load(explicit_path)
}
