use std::collections::BTreeSet;

use core::fmt;
use serde::{Deserialize, Serialize};

/// JWK parameters unrelated to the key material
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    /// The algorithm used with this key.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub alg: Option<Algorithm>,

    /// The key identifier.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub kid: Option<String>,

    /// The key class (called `use` in the RFC).
    #[serde(skip_serializing_if = "Option::is_none", default, rename = "use")]
    pub cls: Option<Class>,

    /// The key operations (called `key_ops` in the RFC).
    #[serde(skip_serializing_if = "Option::is_none", default, rename = "key_ops")]
    pub ops: Option<BTreeSet<Operations>>,
}

impl<T: Into<Algorithm>> From<T> for Parameters {
    fn from(value: T) -> Self {
        let alg = value.into();

        let cls = match alg {
            Algorithm::Signing(..) => Class::Signing,
            Algorithm::KeyManagement(..) => Class::Encryption,
        };

        Self {
            alg: Some(alg),
            cls: Some(cls),
            ..Default::default()
        }
    }
}

/// Key Class (i.e. `use` in the RFC)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum Class {
    #[serde(rename = "enc")]
    Encryption,

    #[serde(rename = "sig")]
    Signing,
}

/// Key operations (i.e. `key_ops` in the RFC)
// NOTE: Keep in lexicographical order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
#[non_exhaustive]
pub enum Operations {
    Decrypt,
    DeriveBits,
    DeriveKey,
    Encrypt,
    Sign,
    UnwrapKey,
    Verify,
    WrapKey,
}

/// Algorithms a symmetric key can be declared for in its "alg" descriptor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[non_exhaustive]
pub enum Algorithm {
    /// MAC algorithms
    Signing(Signing),

    /// Key wrapping and direct encryption algorithms
    KeyManagement(KeyManagement),
}

impl From<Signing> for Algorithm {
    #[inline(always)]
    fn from(alg: Signing) -> Self {
        Self::Signing(alg)
    }
}

impl From<KeyManagement> for Algorithm {
    #[inline(always)]
    fn from(alg: KeyManagement) -> Self {
        Self::KeyManagement(alg)
    }
}

/// MAC algorithms, as defined in [RFC7518] section 3.1.
///
/// [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signing {
    /// HMAC using SHA-256 (Required)
    Hs256,

    /// HMAC using SHA-384 (Optional)
    Hs384,

    /// HMAC using SHA-512 (Optional)
    Hs512,
}

/// Symmetric key management algorithms, as defined in [RFC7518] section 4.1.
///
/// [RFC7518]: https://www.rfc-editor.org/rfc/rfc7518
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyManagement {
    /// AES Key Wrap using 128-bit key
    #[serde(rename = "A128KW")]
    A128Kw,

    /// AES Key Wrap using 192-bit key
    #[serde(rename = "A192KW")]
    A192Kw,

    /// AES Key Wrap using 256-bit key
    #[serde(rename = "A256KW")]
    A256Kw,

    /// Key wrapping with AES GCM using 128-bit key
    #[serde(rename = "A128GCMKW")]
    A128GcmKw,

    /// Key wrapping with AES GCM using 192-bit key
    #[serde(rename = "A192GCMKW")]
    A192GcmKw,

    /// Key wrapping with AES GCM using 256-bit key
    #[serde(rename = "A256GCMKW")]
    A256GcmKw,

    /// Direct use of a shared symmetric key
    #[serde(rename = "dir")]
    Direct,
}

impl fmt::Display for Signing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.serialize(f)
    }
}

impl fmt::Display for KeyManagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.serialize(f)
    }
}
