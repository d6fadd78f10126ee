use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use thiserror::Error;
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

/// Hash keys shorter than or equal to this are rejected by [`validate_hash_key`].
const MIN_HASH_KEY_LENGTH: usize = 20;

/// Errors produced by the common-crypto helpers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("value to sign must not be empty")]
    EmptyValue,
    #[error("signing key must not be empty")]
    EmptyKey,
    #[error("invalid HMAC key length")]
    InvalidMacKey,
}

/// Secret string material (passwords, hash keys) wiped from memory on drop.
#[derive(Clone)]
pub struct SecretString(Zeroizing<String>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// Borrow the underlying secret. Callers must not log the result.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for SecretString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Debug for SecretString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("\"***redacted***\"")
    }
}

/// Compute the base64-encoded HMAC-SHA512 of `value` keyed with the UTF-8 bytes of `key`.
///
/// The output is deterministic: the gateway recomputes the same hash on its side to
/// authenticate the request, so identical inputs always yield identical signatures.
pub fn sign(value: &str, key: &str) -> Result<String, CryptoError> {
    if value.is_empty() {
        return Err(CryptoError::EmptyValue);
    }
    if key.is_empty() {
        return Err(CryptoError::EmptyKey);
    }
    let mut mac = <HmacSha512 as Mac>::new_from_slice(key.as_bytes())
        .map_err(|_| CryptoError::InvalidMacKey)?;
    mac.update(value.as_bytes());
    Ok(BASE64_STANDARD.encode(mac.finalize().into_bytes()))
}

/// Shape check for gateway-issued hash keys: non-empty, base64 alphabet, longer than 20 chars.
pub fn validate_hash_key(key: &str) -> bool {
    key.len() > MIN_HASH_KEY_LENGTH
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
}
