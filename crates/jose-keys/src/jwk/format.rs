use core::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{Error, ErrorKind, Result};

/// The encodings a symmetric key can be built from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    /// A JWK already held as an attribute map.
    Php,
    /// A JWK as JSON text.
    Json,
    /// The raw key, unpadded base64url.
    Base64Url,
    /// The raw key, standard base64.
    Base64,
    /// The raw key bytes.
    Bin,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Php => "php",
            Format::Json => "json",
            Format::Base64Url => "base64url",
            Format::Base64 => "base64",
            Format::Bin => "bin",
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "php" => Ok(Format::Php),
            "json" => Ok(Format::Json),
            "base64url" => Ok(Format::Base64Url),
            "base64" => Ok(Format::Base64),
            "bin" => Ok(Format::Bin),
            other => Err(Error::msg(
                ErrorKind::KeyFormat,
                format!("unknown key format `{other}`"),
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key data paired with its encoding.
#[derive(Clone, Debug, PartialEq)]
pub enum KeyInput<'a> {
    Php(Map<String, Value>),
    Json(&'a str),
    Base64Url(&'a str),
    Base64(&'a str),
    Bin(&'a [u8]),
}

impl<'a> KeyInput<'a> {
    pub fn format(&self) -> Format {
        match self {
            KeyInput::Php(_) => Format::Php,
            KeyInput::Json(_) => Format::Json,
            KeyInput::Base64Url(_) => Format::Base64Url,
            KeyInput::Base64(_) => Format::Base64,
            KeyInput::Bin(_) => Format::Bin,
        }
    }

    /// Pairs encoded data with a format.
    ///
    /// Text formats require UTF-8 data. `Php` is rejected: an attribute map
    /// cannot be carried by a byte string.
    pub fn from_encoded(format: Format, data: &'a [u8]) -> Result<Self> {
        let text = || {
            core::str::from_utf8(data).map_err(|err| {
                Error::msg(ErrorKind::KeyFormat, format!("{format} data is not UTF-8: {err}"))
            })
        };

        match format {
            Format::Php => Err(Error::msg(
                ErrorKind::KeyFormat,
                "php keys are built from an attribute map",
            )),
            Format::Json => Ok(KeyInput::Json(text()?)),
            Format::Base64Url => Ok(KeyInput::Base64Url(text()?)),
            Format::Base64 => Ok(KeyInput::Base64(text()?)),
            Format::Bin => Ok(KeyInput::Bin(data)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        for format in [Format::Php, Format::Json, Format::Base64Url, Format::Base64, Format::Bin] {
            assert_eq!(format.as_str().parse::<Format>().unwrap(), format);
        }
    }

    #[test]
    fn test_unknown_tags_are_rejected() {
        for tag in ["", "pem", "JSON", "base64 ", "binary"] {
            let err = tag.parse::<Format>().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::KeyFormat);
        }
    }

    #[test]
    fn test_from_encoded() {
        let input = KeyInput::from_encoded(Format::Base64Url, b"AAEC").unwrap();
        assert_eq!(input, KeyInput::Base64Url("AAEC"));
        assert_eq!(input.format(), Format::Base64Url);

        let input = KeyInput::from_encoded(Format::Bin, &[0xff, 0x00]).unwrap();
        assert_eq!(input, KeyInput::Bin(&[0xff, 0x00]));

        let err = KeyInput::from_encoded(Format::Json, &[0xff, 0x00]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyFormat);

        let err = KeyInput::from_encoded(Format::Php, b"{}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::KeyFormat);
    }
}
