//! JSON Web Key representations for JOSE and JWT toolkits.
//!
//! Symmetric keys can be built from a JWK attribute map, JWK JSON, or the raw
//! secret as base64url, base64 or bytes:
//!
//! ```
//! use jose_keys::{KeyMaterial, SymmetricKey};
//!
//! let key = SymmetricKey::decode(b"AAECAw", "base64url").unwrap();
//! assert_eq!(key.to_binary().unwrap().as_bytes(), &[0, 1, 2, 3]);
//! assert!(key.is_public());
//! ```

pub mod config;
pub mod error;
pub mod jwk;

pub use config::{KeyConfig, Validation};
pub use error::{Error, ErrorKind, Result};
pub use jwk::*;
