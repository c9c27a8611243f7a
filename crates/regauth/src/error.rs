// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Error types for credential loading and repository resolution.

use thiserror::Error;

/// Result type for registry auth operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while resolving repositories or decoding credentials.
///
/// Only [`Error::InvalidRepository`] is meant to reach callers of the
/// repository resolver. Everything raised while reading config files is
/// logged and swallowed by [`crate::ConfigLoader`].
#[derive(Error, Debug)]
pub enum Error {
    /// The repository reference is malformed.
    #[error("{0}")]
    InvalidRepository(String),

    /// An auth token is not base64 of `username:password`.
    #[error("Malformed auth token: {0}")]
    MalformedToken(String),

    /// An entry in an auths mapping could not be turned into credentials.
    #[error("Malformed auth entry for registry '{registry}': {reason}")]
    MalformedEntry {
        /// Key of the offending entry.
        registry: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The legacy plain-text config did not hold an auth and an email line.
    #[error("Invalid config file: {0}")]
    InvalidConfigFile(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn invalid_repository(message: impl Into<String>) -> Self {
        Self::InvalidRepository(message.into())
    }

    pub(crate) fn malformed_entry(registry: &str, reason: impl Into<String>) -> Self {
        Self::MalformedEntry {
            registry: registry.to_string(),
            reason: reason.into(),
        }
    }
}
