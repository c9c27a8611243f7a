// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Credential records and registry lookup
//!
//! Stores are keyed exactly as the config file spelled the registry, which may
//! be a bare hostname (`ghcr.io`) or a legacy URL (`https://index.docker.io/v1/`).
//! Lookups compare hostnames, so either spelling finds the entry.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::{encode_auth, encode_header};
use crate::error::Result;
use crate::index::RegistryIndex;

/// Credentials stored for one registry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Registry username
    pub username: String,
    /// Registry password or token
    pub password: String,
    /// Email recorded alongside the credentials, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Registry address the credentials were stored for
    #[serde(rename = "serveraddress")]
    pub server_address: String,
}

impl CredentialRecord {
    /// Basic auth token (`base64(username:password)`) for these credentials.
    pub fn auth_token(&self) -> String {
        encode_auth(&self.username, &self.password)
    }

    /// Base64 JSON form of the record, as sent in an `X-Registry-Auth` header.
    pub fn auth_header(&self) -> Result<String> {
        encode_header(self)
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("server_address", &self.server_address)
            .finish()
    }
}

/// Credentials keyed by registry, as loaded from a config file.
///
/// Iteration is in ascending key order, which also fixes which entry wins
/// when several keys share a hostname.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CredentialStore {
    entries: BTreeMap<String, CredentialRecord>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any previous record under the same key.
    pub fn insert(&mut self, registry: impl Into<String>, record: CredentialRecord) {
        self.entries.insert(registry.into(), record);
    }

    /// Get the record stored under exactly `registry`.
    pub fn get(&self, registry: &str) -> Option<&CredentialRecord> {
        self.entries.get(registry)
    }

    /// Number of registries with credentials.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no credentials.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registry keys in iteration order.
    pub fn registries(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over `(registry, record)` pairs.
    pub fn iter(&self) -> btree_map::Iter<'_, String, CredentialRecord> {
        self.entries.iter()
    }

    /// Find the credentials that apply to `registry`, defaulting to the public
    /// Docker index.
    pub fn resolve(&self, registry: Option<&str>) -> Option<&CredentialRecord> {
        self.resolve_with_index(registry, &RegistryIndex::default())
    }

    /// Find the credentials that apply to `registry`.
    ///
    /// An absent or empty `registry` means `index`. Both the query and the
    /// stored keys are reduced with [`convert_to_hostname`]; an exact key hit
    /// wins, otherwise the first key in iteration order with the same
    /// hostname. Returns `None` when nothing matches, meaning anonymous access.
    pub fn resolve_with_index(
        &self,
        registry: Option<&str>,
        index: &RegistryIndex,
    ) -> Option<&CredentialRecord> {
        let registry = match registry.filter(|registry| !registry.is_empty()) {
            Some(registry) => convert_to_hostname(registry),
            None => index.name.as_str(),
        };
        debug!("Looking for auth entry for {:?}", registry);

        if let Some(record) = self.entries.get(registry) {
            debug!("Found {:?}", registry);
            return Some(record);
        }

        let found = self
            .entries
            .iter()
            .find(|(key, _)| convert_to_hostname(key) == registry);
        match found {
            Some((key, record)) => {
                debug!("Found {:?}", key);
                Some(record)
            }
            None => {
                debug!("No entry found");
                None
            }
        }
    }
}

impl FromIterator<(String, CredentialRecord)> for CredentialStore {
    fn from_iter<I: IntoIterator<Item = (String, CredentialRecord)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for CredentialStore {
    type Item = (String, CredentialRecord);
    type IntoIter = btree_map::IntoIter<String, CredentialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a CredentialStore {
    type Item = (&'a String, &'a CredentialRecord);
    type IntoIter = btree_map::Iter<'a, String, CredentialRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Find the credentials for `registry` in `store`, defaulting to the public
/// Docker index.
pub fn resolve_authconfig<'a>(
    store: &'a CredentialStore,
    registry: Option<&str>,
) -> Option<&'a CredentialRecord> {
    store.resolve(registry)
}

/// Reduce a registry key or URL to its hostname.
///
/// Strips a leading `http://` or `https://` and drops everything from the
/// first `/`, so `https://index.docker.io/v1/` becomes `index.docker.io`.
pub fn convert_to_hostname(url: &str) -> &str {
    let url = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url);
    url.split('/').next().unwrap_or(url)
}
