use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use super::{oct::SymmetricKey, thumbprint::thumbprint, Attributes, Secret};
use crate::config::DEFAULT_KID_LENGTH;
use crate::error::{Error, ErrorKind, Result};

/// Operations shared by every kind of JSON Web Key.
pub trait KeyMaterial {
    /// Returns the key type (`kty`), if it is a string.
    fn kty(&self) -> Option<&str>;

    /// Returns the full attribute set, secret members included.
    fn attributes(&self) -> &Attributes;

    /// Whether the key is reported as public.
    fn is_public(&self) -> bool;

    /// Returns the key material in binary form.
    fn to_binary(&self) -> Result<Secret>;

    /// Returns the key as a PEM document.
    fn to_pem(&self) -> Result<String>;

    /// The attribute names that identify the key, in order. Other attributes
    /// never take part in comparisons or thumbprints.
    fn signature_keys(&self) -> &'static [&'static str];

    /// Number of thumbprint characters used for a generated key id.
    fn kid_length(&self) -> usize {
        DEFAULT_KID_LENGTH
    }

    /// Returns the [RFC7638] thumbprint of the key: the SHA-256 digest of the
    /// canonical JSON of its signature keys, as unpadded base64url.
    ///
    /// [RFC7638]: https://www.rfc-editor.org/rfc/rfc7638
    fn thumbprint(&self) -> Result<String> {
        let names = self.signature_keys();
        let members = self.attributes().project(names);

        if let Some(missing) = names.iter().find(|name| !members.contains_key(**name)) {
            return Err(Error::msg(
                ErrorKind::MissingField,
                format!("`{missing}` is required to compute a thumbprint"),
            ));
        }

        thumbprint(members)
    }

    /// Returns the key id (`kid`).
    ///
    /// When the key has none and `generate` is set, an id is derived from the
    /// leading characters of the thumbprint.
    fn key_id(&self, generate: bool) -> Result<Option<String>> {
        if let Some(kid) = self.attributes().get_str("kid") {
            return Ok(Some(kid.to_owned()));
        }

        if !generate {
            return Ok(None);
        }

        let mut kid = self.thumbprint()?;
        kid.truncate(self.kid_length().min(kid.len()));
        Ok(Some(kid))
    }
}

/// A key of any supported type, selected by its `kty`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Key {
    /// A symmetric key.
    Oct(SymmetricKey),
}

impl Key {
    /// Builds the key variant named by the `kty` attribute.
    pub fn from_attributes(map: Map<String, Value>) -> Result<Self> {
        let kty = match map.get("kty") {
            Some(Value::String(kty)) => kty.clone(),
            Some(_) => {
                return Err(Error::msg(ErrorKind::MalformedKey, "`kty` must be a string"));
            }
            None => {
                return Err(Error::msg(ErrorKind::MissingField, "`kty` is required"));
            }
        };

        match kty.as_str() {
            SymmetricKey::KTY => Ok(Self::Oct(SymmetricKey::from_attributes(map)?)),
            other => Err(Error::msg(
                ErrorKind::UnsupportedKeyType,
                format!("no key type `{other}`"),
            )),
        }
    }

    /// Parses a JWK from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_attributes(Attributes::from_json(text)?.into_map())
    }

    fn inner(&self) -> &dyn KeyMaterial {
        match self {
            Key::Oct(key) => key,
        }
    }
}

impl KeyMaterial for Key {
    fn kty(&self) -> Option<&str> {
        self.inner().kty()
    }

    fn attributes(&self) -> &Attributes {
        self.inner().attributes()
    }

    fn is_public(&self) -> bool {
        self.inner().is_public()
    }

    fn to_binary(&self) -> Result<Secret> {
        self.inner().to_binary()
    }

    fn to_pem(&self) -> Result<String> {
        self.inner().to_pem()
    }

    fn signature_keys(&self) -> &'static [&'static str] {
        self.inner().signature_keys()
    }

    fn kid_length(&self) -> usize {
        self.inner().kid_length()
    }
}

impl From<SymmetricKey> for Key {
    #[inline(always)]
    fn from(key: SymmetricKey) -> Self {
        Self::Oct(key)
    }
}

impl Serialize for Key {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Key::Oct(key) => key.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = Map::deserialize(deserializer)?;
        Self::from_attributes(map).map_err(serde::de::Error::custom)
    }
}
