// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Command implementations for the `regauth` binary
//!
//! Each command returns the text to print so it can be exercised without
//! spawning the binary.

use std::path::Path;

use anyhow::{bail, Context, Result};
use regauth::{ConfigLoader, CredentialRecord, RegistryIndex};
use serde::Serialize;
use tracing::{debug, info};

/// What `lookup` should find credentials for.
#[derive(Debug, Clone)]
pub enum LookupTarget {
    /// A registry hostname or URL; `None` means the default index.
    Registry(Option<String>),
    /// A repository name, resolved to its registry first.
    Repository(String),
}

/// Output switches for `lookup`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupOptions {
    /// Include the password in the JSON output
    pub show_password: bool,
    /// Print the base64 header instead of JSON
    pub header: bool,
}

#[derive(Serialize)]
struct LookupOutput<'a> {
    registry: &'a str,
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    serveraddress: &'a str,
}

impl<'a> LookupOutput<'a> {
    fn new(registry: &'a str, record: &'a CredentialRecord, show_password: bool) -> Self {
        Self {
            registry,
            username: &record.username,
            password: show_password.then_some(record.password.as_str()),
            email: record.email.as_deref(),
            serveraddress: &record.server_address,
        }
    }
}

/// Split a repository name and render it as JSON.
pub fn resolve(index: &RegistryIndex, repository: &str) -> Result<String> {
    let reference = index
        .resolve_repository_name(repository)
        .with_context(|| format!("Failed to resolve repository '{repository}'"))?;
    serde_json::to_string_pretty(&reference).context("Failed to serialize repository reference")
}

/// Find the credentials for a registry or repository.
pub fn lookup(
    loader: &ConfigLoader,
    config: Option<&Path>,
    target: &LookupTarget,
    options: LookupOptions,
) -> Result<String> {
    let registry = match target {
        LookupTarget::Registry(registry) => registry
            .clone()
            .unwrap_or_else(|| loader.index().name.clone()),
        LookupTarget::Repository(repository) => {
            loader
                .index()
                .resolve_repository_name(repository)
                .with_context(|| format!("Failed to resolve repository '{repository}'"))?
                .registry
        }
    };
    debug!("Looking up credentials for registry: {}", registry);

    let store = loader.load(config);
    let Some(record) = store.resolve_with_index(Some(registry.as_str()), loader.index()) else {
        bail!("No credentials found for registry {registry}");
    };
    info!("Found credentials for registry: {}", registry);

    if options.header {
        return record
            .auth_header()
            .context("Failed to encode registry auth header");
    }

    let output = LookupOutput::new(&registry, record, options.show_password);
    serde_json::to_string_pretty(&output).context("Failed to serialize credentials")
}

/// List the registry keys found in the loaded config.
pub fn list(loader: &ConfigLoader, config: Option<&Path>) -> Result<String> {
    let store = loader.load(config);
    let registries: Vec<&str> = store.registries().collect();
    serde_json::to_string_pretty(&registries).context("Failed to serialize registry list")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::Value;
    use tempfile::TempDir;

    use super::*;

    fn loader_with_config(dir: &TempDir, contents: &str) -> ConfigLoader {
        let config = dir.path().join("config.json");
        fs::write(&config, contents).unwrap();
        ConfigLoader::new()
            .with_config_path(config)
            .with_legacy_config_path(dir.path().join(".dockercfg"))
    }

    const CONFIG: &str = r#"{
        "auths": {
            "https://index.docker.io/v1/": {"auth": "aHViOmh1YnBhc3M=", "email": "hub@example.com"},
            "ghcr.io": {"auth": "dGVzdHVzZXI6dGVzdHBhc3M="}
        }
    }"#;

    #[test]
    fn test_resolve_command() {
        let output = resolve(&RegistryIndex::default(), "myregistry.io/foo").unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["registry"], "myregistry.io");
        assert_eq!(value["repository"], "foo");

        assert!(resolve(&RegistryIndex::default(), "index.docker.io/foo").is_err());
    }

    #[test]
    fn test_lookup_hides_password_by_default() {
        let dir = TempDir::new().unwrap();
        let loader = loader_with_config(&dir, CONFIG);

        let target = LookupTarget::Registry(Some("ghcr.io".to_string()));
        let output = lookup(&loader, None, &target, LookupOptions::default()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["username"], "testuser");
        assert!(value.get("password").is_none());

        let options = LookupOptions {
            show_password: true,
            header: false,
        };
        let output = lookup(&loader, None, &target, options).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["password"], "testpass");
    }

    #[test]
    fn test_lookup_default_index() {
        let dir = TempDir::new().unwrap();
        let loader = loader_with_config(&dir, CONFIG);

        let target = LookupTarget::Registry(None);
        let output = lookup(&loader, None, &target, LookupOptions::default()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["username"], "hub");
        assert_eq!(value["serveraddress"], "https://index.docker.io/v1/");
    }

    #[test]
    fn test_lookup_by_repository() {
        let dir = TempDir::new().unwrap();
        let loader = loader_with_config(&dir, CONFIG);

        let target = LookupTarget::Repository("ghcr.io/owner/image".to_string());
        let output = lookup(&loader, None, &target, LookupOptions::default()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["registry"], "ghcr.io");

        let target = LookupTarget::Repository("library/ubuntu".to_string());
        let output = lookup(&loader, None, &target, LookupOptions::default()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["username"], "hub");
    }

    #[test]
    fn test_lookup_not_found() {
        let dir = TempDir::new().unwrap();
        let loader = loader_with_config(&dir, CONFIG);

        let target = LookupTarget::Registry(Some("quay.io".to_string()));
        let err = lookup(&loader, None, &target, LookupOptions::default()).unwrap_err();
        assert!(err.to_string().contains("No credentials found"));
    }

    #[test]
    fn test_lookup_header() {
        let dir = TempDir::new().unwrap();
        let loader = loader_with_config(&dir, CONFIG);

        let target = LookupTarget::Registry(Some("ghcr.io".to_string()));
        let options = LookupOptions {
            show_password: false,
            header: true,
        };
        let output = lookup(&loader, None, &target, options).unwrap();
        let expected = loader
            .load(None)
            .get("ghcr.io")
            .unwrap()
            .auth_header()
            .unwrap();
        assert_eq!(output, expected);
    }

    #[test]
    fn test_list_command() {
        let dir = TempDir::new().unwrap();
        let loader = loader_with_config(&dir, CONFIG);

        let output = list(&loader, None).unwrap();
        let registries: Vec<String> = serde_json::from_str(&output).unwrap();
        assert_eq!(registries, vec!["ghcr.io", "https://index.docker.io/v1/"]);
    }

    #[test]
    fn test_list_with_explicit_missing_config() {
        let dir = TempDir::new().unwrap();
        let loader = loader_with_config(&dir, CONFIG);

        let output = list(&loader, Some(&dir.path().join("missing.json"))).unwrap();
        let registries: Vec<String> = serde_json::from_str(&output).unwrap();
        assert!(registries.is_empty());
    }
}
