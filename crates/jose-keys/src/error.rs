use core::fmt::{Debug, Display};
use std::error::Error as StdError;

/// Result type returned by key operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of error that can occur while building or reading a key.
#[derive(thiserror::Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum ErrorKind {
    /// The requested input format is not recognized, or the data does not fit it.
    #[error("Incorrect format")]
    KeyFormat,
    /// The key cannot be exported in the requested representation.
    #[error("Unsupported key format")]
    UnsupportedFormat,
    /// The key data could not be parsed or decoded.
    #[error("The key is malformed")]
    MalformedKey,
    /// A required attribute is absent.
    #[error("Missing key attribute")]
    MissingField,
    /// The attribute cannot be changed once the key is built.
    #[error("Immutable key attribute")]
    ImmutableField,
    /// No key variant exists for the given `kty`.
    #[error("Unsupported key type")]
    UnsupportedKeyType,
}

/// Represents all possible errors that can occur during key operations.
pub struct Error {
    kind: ErrorKind,
    source: eyre::Report,
}

impl Error {
    /// Returns the kind of the error that occurred.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the lowest level error that caused this error.
    pub fn source(&self) -> &(dyn StdError + 'static) {
        self.source.root_cause()
    }

    /// Returns the context of the error.
    pub fn context(&self) -> &(dyn StdError) {
        self.source.as_ref()
    }

    pub(crate) fn new<E>(kind: ErrorKind, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Error {
            kind,
            source: eyre::Report::new(source),
        }
    }

    pub(crate) fn msg<M>(kind: ErrorKind, msg: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Error {
            kind,
            source: eyre::Report::msg(msg),
        }
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("context", &self.context())
            .field("source", &self.source())
            .finish()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.context())
    }
}

impl StdError for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorKind::MalformedKey, err)
    }
}

impl From<base64ct::Error> for Error {
    fn from(err: base64ct::Error) -> Self {
        Error::new(ErrorKind::MalformedKey, err)
    }
}
