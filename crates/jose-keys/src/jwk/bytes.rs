//! Base64 helpers for key material.
//!
//! JOSE values are written as unpadded base64url. Inputs are read leniently:
//! the padded form of either alphabet is tolerated.

use base64ct::{Base64, Base64Unpadded, Base64Url, Base64UrlUnpadded, Encoding};
use zeroize::Zeroizing;

use crate::error::Result;

/// Encodes bytes as unpadded base64url.
pub(crate) fn encode_url(bytes: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(bytes)
}

/// Decodes unpadded (or padded) base64url.
pub(crate) fn decode_url(text: &str) -> Result<Zeroizing<Vec<u8>>> {
    match Base64UrlUnpadded::decode_vec(text) {
        Ok(bytes) => Ok(Zeroizing::new(bytes)),
        Err(_) if text.ends_with('=') => Ok(Zeroizing::new(Base64Url::decode_vec(text)?)),
        Err(err) => Err(err.into()),
    }
}

/// Decodes standard base64, padded or not.
pub(crate) fn decode_std(text: &str) -> Result<Zeroizing<Vec<u8>>> {
    let text = text.trim();
    match Base64::decode_vec(text) {
        Ok(bytes) => Ok(Zeroizing::new(bytes)),
        Err(_) if !text.ends_with('=') => Ok(Zeroizing::new(Base64Unpadded::decode_vec(text)?)),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_encode_url_is_unpadded_and_url_safe() {
        assert_eq!(encode_url(&[0xfb, 0xff]), "-_8");
        assert_eq!(encode_url(b"hello"), "aGVsbG8");
    }

    #[test]
    fn test_decode_url_tolerates_padding() {
        assert_eq!(decode_url("aGVsbG8").unwrap().as_slice(), b"hello");
        assert_eq!(decode_url("aGVsbG8=").unwrap().as_slice(), b"hello");
    }

    #[test]
    fn test_decode_url_rejects_standard_alphabet() {
        let err = decode_url("+/8").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedKey);
    }

    #[test]
    fn test_decode_std() {
        assert_eq!(decode_std("+/8=").unwrap().as_slice(), &[0xfb, 0xff]);
        assert_eq!(decode_std("+/8").unwrap().as_slice(), &[0xfb, 0xff]);
        assert!(decode_std("-_8=").is_err());
    }
}
