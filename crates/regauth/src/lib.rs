// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

//! Registry credential resolution for container registry clients
//!
//! Reads the credentials Docker clients store on disk and answers which
//! credentials, if any, apply to a given registry.
//!
//! ```no_run
//! use regauth::{load_config, resolve_repository_name};
//!
//! let reference = resolve_repository_name("myregistry.io/team/app")?;
//! let store = load_config(None);
//! match store.resolve(Some(reference.registry.as_str())) {
//!     Some(creds) => println!("pulling as {}", creds.username),
//!     None => println!("pulling anonymously"),
//! }
//! # Ok::<(), regauth::Error>(())
//! ```

pub mod codec;
pub mod error;
pub mod index;
pub mod loader;
pub mod parser;
pub mod repository;
pub mod store;

pub use codec::{decode_auth, encode_auth, encode_header};
pub use error::{Error, Result};
pub use index::{RegistryIndex, INDEX_NAME, INDEX_URL};
pub use loader::{load_config, ConfigFormat, ConfigLoader};
pub use parser::{parse_auths, parse_auths_json, RawAuthEntry};
pub use repository::{resolve_repository_name, RepositoryReference};
pub use store::{convert_to_hostname, resolve_authconfig, CredentialRecord, CredentialStore};
