use thiserror::Error;

/// Errors raised by the split-key encryption core and its components.
///
/// Each variant corresponds to one of the error kinds the core's callers
/// are expected to distinguish: bad arguments, a failed integrity check,
/// a UTF-8 decode failure, use of a handle after it has been destroyed,
/// and an (expected-never) failure inside a cryptographic primitive.
#[derive(Error, Debug)]
pub enum Error {
    /// Null/missing input, an out-of-range length, a malformed token, an
    /// invalid Base32 character, or an out-of-range packed integer.
    #[error("{0}")]
    Argument(String),

    /// MAC verification failed, or a blinded wrapper / packed length was
    /// internally inconsistent with the bytes carrying it.
    #[error("{0}")]
    DataIntegrity(String),

    /// Decrypted bytes were not valid UTF-8 when decoding as text.
    #[error("decrypted bytes are not valid UTF-8: {0}")]
    CharacterEncoding(#[from] std::string::FromUtf8Error),

    /// The key handle or core instance has already been closed.
    #[error("handle has been destroyed")]
    Destroyed,

    /// The underlying AES or HMAC primitive failed. Never expected to
    /// occur with the fixed algorithms this crate uses, but must be
    /// reported without leaking any partial plaintext.
    #[error("invalid cryptographic parameter")]
    CryptoPrimitive,
}

impl Error {
    pub(crate) fn argument(msg: impl Into<String>) -> Self {
        Error::Argument(msg.into())
    }

    pub(crate) fn data_integrity(msg: impl Into<String>) -> Self {
        Error::DataIntegrity(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
