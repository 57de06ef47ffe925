use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use subtle::ConstantTimeEq;
use tracing::{debug, trace};
use zeroize::Zeroize;

use super::bytes::{decode_std, decode_url, encode_url};
use super::{Attributes, Format, KeyInput, KeyMaterial, Parameters, Secret};
use crate::config::{KeyConfig, Validation};
use crate::error::{Error, ErrorKind, Result};

const SIGNATURE_KEYS: [&str; 2] = ["kty", "k"];
const PARAMETER_KEYS: [&str; 4] = ["alg", "kid", "use", "key_ops"];

/// A symmetric (octet sequence) key.
///
/// The secret is held as unpadded base64url in the `k` attribute and decoded
/// on demand. `k` and `kty` cannot change once the key is built, and `k` is
/// wiped from memory when the key is dropped.
#[derive(Clone)]
pub struct SymmetricKey {
    attrs: Attributes,
    kid_length: usize,
}

impl SymmetricKey {
    /// The key type of symmetric keys.
    pub const KTY: &'static str = "oct";

    /// Builds a key with the default settings.
    pub fn new(input: KeyInput<'_>) -> Result<Self> {
        Self::with_config(input, &KeyConfig::default())
    }

    /// Builds a key from any of the supported encodings.
    ///
    /// A missing `kty` is filled in with `"oct"`; a supplied one is kept as is.
    /// With [`Validation::Strict`] the key must carry a `k` attribute that
    /// decodes as base64url. With [`Validation::Lazy`] attribute maps and
    /// base64url text are taken as given and errors show up in
    /// [`to_binary`](KeyMaterial::to_binary).
    pub fn with_config(input: KeyInput<'_>, config: &KeyConfig) -> Result<Self> {
        let format = input.format();

        let attrs = match input {
            KeyInput::Php(map) => Attributes::from(map),
            KeyInput::Json(text) => Attributes::from_json(text)?,
            KeyInput::Base64Url(text) => Self::wrap(text.to_owned()),
            KeyInput::Base64(text) => Self::wrap(encode_url(&decode_std(text)?)),
            KeyInput::Bin(bytes) => Self::wrap(encode_url(bytes)),
        };

        let mut key = Self {
            attrs,
            kid_length: config.kid_length,
        };

        if !key.attrs.contains("kty") {
            trace!(%format, "defaulting kty to {}", Self::KTY);
            key.attrs.set("kty", Self::KTY);
        }

        match config.validation {
            Validation::Strict => key.validate()?,
            Validation::Lazy => debug!(%format, "key material not validated"),
        }

        debug!(%format, "built symmetric key");
        Ok(key)
    }

    /// Builds a key from a JWK attribute map.
    pub fn from_attributes(map: Map<String, Value>) -> Result<Self> {
        Self::new(KeyInput::Php(map))
    }

    /// Builds a key from JWK JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Self::new(KeyInput::Json(text))
    }

    /// Builds a key from the secret encoded as unpadded base64url.
    pub fn from_base64url(text: &str) -> Result<Self> {
        Self::new(KeyInput::Base64Url(text))
    }

    /// Builds a key from the secret encoded as standard base64.
    pub fn from_base64(text: &str) -> Result<Self> {
        Self::new(KeyInput::Base64(text))
    }

    /// Builds a key from the raw secret.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::new(KeyInput::Bin(bytes))
    }

    /// Builds a key from encoded data and a format tag (`json`, `base64url`,
    /// `base64` or `bin`).
    ///
    /// The tag is checked before the data is looked at.
    pub fn decode(data: &[u8], format: &str) -> Result<Self> {
        let format: Format = format.parse()?;
        Self::new(KeyInput::from_encoded(format, data)?)
    }

    fn wrap(k: String) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.set("kty", Self::KTY);
        attrs.set("k", k);
        attrs
    }

    fn validate(&self) -> Result<()> {
        if !matches!(self.attrs.get("kty"), Some(Value::String(_))) {
            return Err(Error::msg(ErrorKind::MalformedKey, "`kty` must be a string"));
        }

        self.to_binary().map(drop)
    }

    /// Returns an attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// Sets a metadata attribute, returning the previous value.
    ///
    /// `k` and `kty` are fixed at construction.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<Option<Value>> {
        Self::check_mutable(name)?;
        Ok(self.attrs.set(name, value))
    }

    /// Removes a metadata attribute.
    pub fn remove(&mut self, name: &str) -> Result<Option<Value>> {
        Self::check_mutable(name)?;
        Ok(self.attrs.remove(name))
    }

    /// Returns the key with a metadata attribute set.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    fn check_mutable(name: &str) -> Result<()> {
        if SIGNATURE_KEYS.contains(&name) {
            return Err(Error::msg(
                ErrorKind::ImmutableField,
                format!("`{name}` cannot be changed"),
            ));
        }
        Ok(())
    }

    /// Returns the typed `alg`, `kid`, `use` and `key_ops` parameters.
    pub fn parameters(&self) -> Result<Parameters> {
        let members = self.attrs.project(&PARAMETER_KEYS);
        Ok(serde_json::from_value(Value::Object(members))?)
    }

    /// Serializes the full attribute set as JSON.
    pub fn to_json(&self) -> Result<String> {
        self.attrs.to_json()
    }
}

impl KeyMaterial for SymmetricKey {
    fn kty(&self) -> Option<&str> {
        self.attrs.get_str("kty")
    }

    fn attributes(&self) -> &Attributes {
        &self.attrs
    }

    /// A symmetric key is reported as public unless it carries a `p`
    /// attribute. The secret is not inspected.
    fn is_public(&self) -> bool {
        !self.attrs.contains("p")
    }

    fn to_binary(&self) -> Result<Secret> {
        match self.attrs.get("k") {
            Some(Value::String(k)) => Ok(decode_url(k)?.into()),
            Some(_) => Err(Error::msg(ErrorKind::MalformedKey, "`k` must be a string")),
            None => Err(Error::msg(ErrorKind::MissingField, "`k` is required")),
        }
    }

    /// Symmetric keys have no PEM form.
    fn to_pem(&self) -> Result<String> {
        Err(Error::msg(
            ErrorKind::UnsupportedFormat,
            "symmetric keys cannot be written as PEM",
        ))
    }

    fn signature_keys(&self) -> &'static [&'static str] {
        &SIGNATURE_KEYS
    }

    fn kid_length(&self) -> usize {
        self.kid_length
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        if self.attrs.get("kty") != other.attrs.get("kty") {
            return false;
        }

        match (self.attrs.get("k"), other.attrs.get("k")) {
            (Some(Value::String(a)), Some(Value::String(b))) => a.as_bytes().ct_eq(b.as_bytes()).into(),
            (a, b) => a == b,
        }
    }
}

impl Eq for SymmetricKey {}

impl Drop for SymmetricKey {
    fn drop(&mut self) {
        if let Some(Value::String(mut k)) = self.attrs.remove("k") {
            k.zeroize();
        }
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in &self.attrs {
            if name == "k" {
                map.entry(name, &"[REDACTED]");
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

impl Serialize for SymmetricKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.attrs.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SymmetricKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let map = Map::deserialize(deserializer)?;
        Self::from_attributes(map).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lazy() -> KeyConfig {
        KeyConfig {
            validation: Validation::Lazy,
            ..Default::default()
        }
    }

    #[test]
    fn test_bin_is_wrapped_as_base64url() {
        let key = SymmetricKey::from_bytes(&[0xfb, 0xff, 0x00]).unwrap();
        assert_eq!(key.get("kty"), Some(&json!("oct")));
        assert_eq!(key.get("k"), Some(&json!("-_8A")));
        assert_eq!(key.attributes().len(), 2);
    }

    #[test]
    fn test_base64_is_reencoded() {
        let key = SymmetricKey::from_base64("+/8A").unwrap();
        assert_eq!(key.get("k"), Some(&json!("-_8A")));
        assert_eq!(key.to_binary().unwrap().as_bytes(), &[0xfb, 0xff, 0x00]);
    }

    #[test]
    fn test_base64url_is_kept_verbatim() {
        let key = SymmetricKey::from_base64url("AAECAw").unwrap();
        assert_eq!(key.get("k"), Some(&json!("AAECAw")));
    }

    #[test]
    fn test_missing_kty_is_defaulted() {
        let key = SymmetricKey::from_json(r#"{"k":"AAECAw"}"#).unwrap();
        assert_eq!(key.kty(), Some("oct"));
    }

    #[test]
    fn test_supplied_kty_is_kept() {
        let key = SymmetricKey::from_json(r#"{"kty":"RSA","k":"AAECAw"}"#).unwrap();
        assert_eq!(key.kty(), Some("RSA"));
    }

    #[test]
    fn test_strict_validation_fails_fast() {
        let err = SymmetricKey::from_base64url("not base64url!").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedKey);

        let err = SymmetricKey::from_json(r#"{"kty":"oct"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingField);

        let err = SymmetricKey::from_json(r#"{"kty":"oct","k":42}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedKey);

        let err = SymmetricKey::from_json(r#"{"kty":null,"k":"AAECAw"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedKey);
    }

    #[test]
    fn test_lazy_validation_defers_errors() {
        let key = SymmetricKey::with_config(KeyInput::Base64Url("not base64url!"), &lazy()).unwrap();
        assert_eq!(key.to_binary().unwrap_err().kind(), ErrorKind::MalformedKey);

        let key = SymmetricKey::with_config(KeyInput::Json(r#"{"kty":"oct"}"#), &lazy()).unwrap();
        assert_eq!(key.to_binary().unwrap_err().kind(), ErrorKind::MissingField);
    }

    #[test]
    fn test_lazy_validation_still_decodes_base64() {
        let err = SymmetricKey::with_config(KeyInput::Base64("***"), &lazy()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedKey);

        let err = SymmetricKey::with_config(KeyInput::Json("{"), &lazy()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedKey);
    }

    #[test]
    fn test_k_and_kty_are_immutable() {
        let mut key = SymmetricKey::from_base64url("AAECAw").unwrap();

        assert_eq!(key.set("k", "BAUG").unwrap_err().kind(), ErrorKind::ImmutableField);
        assert_eq!(key.set("kty", "RSA").unwrap_err().kind(), ErrorKind::ImmutableField);
        assert_eq!(key.remove("k").unwrap_err().kind(), ErrorKind::ImmutableField);
        assert_eq!(key.get("k"), Some(&json!("AAECAw")));

        assert_eq!(key.set("kid", "a").unwrap(), None);
        assert_eq!(key.set("kid", "b").unwrap(), Some(json!("a")));
        assert_eq!(key.remove("kid").unwrap(), Some(json!("b")));
    }

    #[test]
    fn test_equality_ignores_metadata() {
        let a = SymmetricKey::from_bytes(&[1, 2, 3]).unwrap();
        let b = SymmetricKey::from_base64url("AQID")
            .unwrap()
            .with("kid", "other")
            .unwrap()
            .with("p", true)
            .unwrap();
        let c = SymmetricKey::from_bytes(&[1, 2, 4]).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_parameters() {
        let key = SymmetricKey::from_json(r#"{"kty":"oct","k":"AQID","alg":"HS256","use":"sig"}"#).unwrap();
        let prm = key.parameters().unwrap();
        assert_eq!(prm, Parameters::from(crate::jwk::Signing::Hs256));

        let key = SymmetricKey::from_json(r#"{"kty":"oct","k":"AQID","alg":"XX"}"#).unwrap();
        assert_eq!(key.parameters().unwrap_err().kind(), ErrorKind::MalformedKey);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let key = SymmetricKey::from_base64url("AAECAw").unwrap();
        let debug = format!("{key:?}");
        assert!(!debug.contains("AAECAw"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_kid_length_follows_config() {
        let config = KeyConfig {
            kid_length: 12,
            ..Default::default()
        };
        let key = SymmetricKey::with_config(KeyInput::Bin(b"secret"), &config).unwrap();
        assert_eq!(key.key_id(true).unwrap().unwrap().len(), 12);
    }
}
