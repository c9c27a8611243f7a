// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Auth token encoding
//!
//! Registry credentials travel as base64 of `username:password`. The same
//! base64 step wraps a JSON document to build the `X-Registry-Auth` header.

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::error::{Error, Result};

/// Encode a username and password as a basic auth token.
pub fn encode_auth(username: &str, password: &str) -> String {
    BASE64_STANDARD.encode(format!("{username}:{password}"))
}

/// Decode a basic auth token into `(username, password)`.
///
/// The decoded text is split on the first colon only, so passwords may
/// contain colons but usernames may not.
pub fn decode_auth(token: &str) -> Result<(String, String)> {
    let bytes = BASE64_STANDARD
        .decode(token.trim())
        .map_err(|e| Error::MalformedToken(format!("invalid base64: {e}")))?;
    let decoded = String::from_utf8(bytes)
        .map_err(|e| Error::MalformedToken(format!("invalid UTF-8: {e}")))?;

    decoded
        .split_once(':')
        .map(|(username, password)| (username.to_string(), password.to_string()))
        .ok_or_else(|| Error::MalformedToken("missing ':' separator".to_string()))
}

/// Serialize `auth` to JSON and base64 it for use as a transport auth header.
pub fn encode_header<T: Serialize + ?Sized>(auth: &T) -> Result<String> {
    let json = serde_json::to_vec(auth)?;
    Ok(BASE64_STANDARD.encode(json))
}
