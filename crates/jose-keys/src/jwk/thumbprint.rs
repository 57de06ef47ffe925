//! JWK thumbprints as defined in [RFC7638].
//!
//! [RFC7638]: https://www.rfc-editor.org/rfc/rfc7638

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::bytes::encode_url;
use crate::error::Result;

/// Compute the SHA256 hash of a given input.
pub(crate) fn sha256_hash(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&hasher.finalize());
    hash
}

/// Hashes the canonical JSON form of the given members and returns the
/// digest as unpadded base64url.
pub(crate) fn thumbprint(members: Map<String, Value>) -> Result<String> {
    let canonical = json_canon::to_string(&Value::Object(members))?;
    Ok(encode_url(&sha256_hash(canonical.as_bytes())))
}
