// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Parsing of `auths` mappings into credential records

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::decode_auth;
use crate::error::{Error, Result};
use crate::store::{CredentialRecord, CredentialStore};

/// One registry entry as written in a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAuthEntry {
    /// Base64-encoded "username:password"
    #[serde(default)]
    pub auth: Option<String>,
    /// Email address stored by old clients
    #[serde(default)]
    pub email: Option<String>,
}

/// Decode every entry of an `auths` mapping.
///
/// Each record's server address is the key it was stored under. The first
/// entry that cannot be decoded fails the whole mapping.
pub fn parse_auths<I>(entries: I) -> Result<CredentialStore>
where
    I: IntoIterator<Item = (String, RawAuthEntry)>,
{
    let mut store = CredentialStore::new();

    for (registry, entry) in entries {
        let Some(auth) = entry.auth.as_deref() else {
            return Err(Error::malformed_entry(&registry, "missing 'auth' field"));
        };
        let (username, password) =
            decode_auth(auth).map_err(|e| Error::malformed_entry(&registry, e.to_string()))?;
        debug!(
            "Found entry (registry={:?}, username={:?})",
            registry, username
        );

        let record = CredentialRecord {
            username,
            password,
            email: entry.email,
            server_address: registry.clone(),
        };
        store.insert(registry, record);
    }

    Ok(store)
}

/// Decode an `auths` mapping given as JSON text.
pub fn parse_auths_json(contents: &str) -> Result<CredentialStore> {
    let entries: BTreeMap<String, RawAuthEntry> = serde_json::from_str(contents)?;
    parse_auths(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(auth: Option<&str>, email: Option<&str>) -> RawAuthEntry {
        RawAuthEntry {
            auth: auth.map(str::to_string),
            email: email.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_auths() {
        let entries = vec![
            (
                "https://index.docker.io/v1/".to_string(),
                entry(Some("dXNlcm5hbWU6cGFzc3dvcmQ="), Some("user@example.com")),
            ),
            ("ghcr.io".to_string(), entry(Some("Z2g6dG9rZW4="), None)),
        ];

        let store = parse_auths(entries).unwrap();
        assert_eq!(store.len(), 2);

        let hub = store.get("https://index.docker.io/v1/").unwrap();
        assert_eq!(hub.username, "username");
        assert_eq!(hub.password, "password");
        assert_eq!(hub.email.as_deref(), Some("user@example.com"));
        assert_eq!(hub.server_address, "https://index.docker.io/v1/");

        let ghcr = store.get("ghcr.io").unwrap();
        assert_eq!(ghcr.username, "gh");
        assert_eq!(ghcr.password, "token");
        assert_eq!(ghcr.email, None);
    }

    #[test]
    fn test_server_address_matches_key() {
        let store = parse_auths_json(
            r#"{
                "a.example.com": {"auth": "dXNlcm5hbWU6cGFzc3dvcmQ="},
                "http://b.example.com/v1/": {"auth": "dXNlcm5hbWU6cGFzc3dvcmQ="}
            }"#,
        )
        .unwrap();

        for (key, record) in &store {
            assert_eq!(key, &record.server_address);
        }
    }

    #[test]
    fn test_later_entry_overwrites() {
        let entries = vec![
            ("ghcr.io".to_string(), entry(Some("dXNlcm5hbWU6cGFzc3dvcmQ="), None)),
            ("ghcr.io".to_string(), entry(Some("Z2g6dG9rZW4="), None)),
        ];

        let store = parse_auths(entries).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("ghcr.io").unwrap().username, "gh");
    }

    #[test]
    fn test_missing_auth_field() {
        let entries = vec![("ghcr.io".to_string(), entry(None, Some("a@b.c")))];

        match parse_auths(entries) {
            Err(Error::MalformedEntry { registry, reason }) => {
                assert_eq!(registry, "ghcr.io");
                assert!(reason.contains("auth"), "reason: {reason}");
            }
            other => panic!("Expected MalformedEntry, got: {other:?}"),
        }
    }

    #[test]
    fn test_undecodable_token() {
        let entries = vec![("ghcr.io".to_string(), entry(Some("bm9jb2xvbg=="), None))];

        assert!(matches!(
            parse_auths(entries),
            Err(Error::MalformedEntry { .. })
        ));
    }

    #[test]
    fn test_unknown_entry_fields_are_ignored() {
        let store = parse_auths_json(
            r#"{"ghcr.io": {"auth": "Z2g6dG9rZW4=", "identitytoken": "ignored"}}"#,
        )
        .unwrap();
        assert_eq!(store.get("ghcr.io").unwrap().username, "gh");
    }

    #[test]
    fn test_non_object_json_rejected() {
        assert!(matches!(parse_auths_json("[]"), Err(Error::Json(_))));
        assert!(matches!(
            parse_auths_json(r#"{"ghcr.io": "token"}"#),
            Err(Error::Json(_))
        ));
    }
}
