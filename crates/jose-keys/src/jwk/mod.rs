//! This module provides types and utilities for handling JSON Web Keys (JWKs).
//!
//! It includes the attribute store shared by all keys, secure handling of
//! secret material, and the symmetric (`oct`) key type.

mod attributes;
mod bytes;
mod format;
mod key;
mod oct;
mod prm;
mod secret;
mod thumbprint;

// Re-exports
pub use attributes::Attributes;
pub use format::{Format, KeyInput};
pub use key::{Key, KeyMaterial};
pub use oct::SymmetricKey;
pub use prm::{Algorithm, Class, KeyManagement, Operations, Parameters, Signing};
pub use secret::Secret;
