// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Repository name resolution
//!
//! Splits a user-supplied repository into the registry host that serves it and
//! the path under that host. A first segment counts as a host only if it
//! contains a `.` or a `:`, or is exactly `localhost`; anything else is a
//! path on the default index. Docker clients use the same rule.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::index::RegistryIndex;

/// A repository split into its registry host and path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryReference {
    /// Hostname (with optional port) of the registry.
    pub registry: String,
    /// Repository path under the registry.
    pub repository: String,
}

impl RepositoryReference {
    /// Consume the reference, returning `(registry, repository)`.
    pub fn into_parts(self) -> (String, String) {
        (self.registry, self.repository)
    }
}

/// Resolve a repository name against the public Docker index.
pub fn resolve_repository_name(repo_name: &str) -> Result<RepositoryReference> {
    RegistryIndex::default().resolve_repository_name(repo_name)
}

impl RegistryIndex {
    /// Resolve a repository name, treating `self` as the default registry.
    pub fn resolve_repository_name(&self, repo_name: &str) -> Result<RepositoryReference> {
        if repo_name.contains("://") {
            return Err(Error::invalid_repository(format!(
                "Repository name cannot contain a scheme ({repo_name})"
            )));
        }

        let (first, rest) = match repo_name.split_once('/') {
            Some((first, rest)) => (first, Some(rest)),
            None => (repo_name, None),
        };

        if !first.contains('.') && !first.contains(':') && first != "localhost" {
            debug!("Resolved {:?} to the default index", repo_name);
            return Ok(RepositoryReference {
                registry: self.name.clone(),
                repository: repo_name.to_string(),
            });
        }

        let Some(rest) = rest else {
            return Err(Error::invalid_repository(format!(
                "Invalid repository name ({repo_name})"
            )));
        };

        if first.contains(self.name.as_str()) {
            return Err(Error::invalid_repository(format!(
                "Invalid repository name, try \"{rest}\" instead"
            )));
        }

        Ok(RepositoryReference {
            registry: first.to_string(),
            repository: rest.to_string(),
        })
    }
}
