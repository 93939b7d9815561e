//! Encrypted-but-searchable column codec.
//!
//! Sensitive text columns are stored as a pair: an XChaCha20-Poly1305
//! ciphertext with a fresh random nonce (so equal plaintexts never produce
//! equal ciphertexts) and a keyed BLAKE3 fingerprint of the plaintext that
//! carries the unique index and serves exact-match lookups.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use thiserror::Error;

const NONCE_LEN: usize = 24;
const TAG_LEN: usize = 16;

/// Minimum length of the process-wide secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

const CIPHER_CONTEXT: &str = "geoportal 2026-01 field encryption";
const FINGERPRINT_CONTEXT: &str = "geoportal 2026-01 field fingerprint";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("secret key must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,

    #[error("stored value is not valid base64")]
    Encoding,

    #[error("stored value is truncated")]
    Truncated,

    #[error("stored value failed authentication")]
    Authentication,

    #[error("decrypted value is not valid UTF-8")]
    Utf8,

    #[error("encryption failed")]
    Encrypt,
}

/// Ciphertext and fingerprint for one plaintext value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedField {
    pub ciphertext: String,
    pub fingerprint: String,
}

#[derive(Clone)]
pub struct FieldCipher {
    cipher: XChaCha20Poly1305,
    fingerprint_key: [u8; 32],
}

impl std::fmt::Debug for FieldCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher").finish_non_exhaustive()
    }
}

impl FieldCipher {
    /// Derives the encryption and fingerprint keys from the process secret.
    pub fn from_secret(secret: &str) -> Result<Self, CodecError> {
        let secret = secret.as_bytes();
        if secret.len() < MIN_SECRET_LEN {
            return Err(CodecError::WeakSecret);
        }

        let cipher_key = blake3::derive_key(CIPHER_CONTEXT, secret);
        let fingerprint_key = blake3::derive_key(FINGERPRINT_CONTEXT, secret);

        Ok(Self {
            cipher: XChaCha20Poly1305::new(Key::from_slice(&cipher_key)),
            fingerprint_key,
        })
    }

    pub fn encode(&self, plaintext: &str) -> Result<SealedField, CodecError> {
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let sealed = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CodecError::Encrypt)?;

        let mut raw = Vec::with_capacity(NONCE_LEN + sealed.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&sealed);

        Ok(SealedField {
            ciphertext: BASE64.encode(raw),
            fingerprint: self.fingerprint(plaintext),
        })
    }

    pub fn decode(&self, ciphertext: &str) -> Result<String, CodecError> {
        let raw = BASE64
            .decode(ciphertext.trim())
            .map_err(|_| CodecError::Encoding)?;

        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(CodecError::Truncated);
        }

        let (nonce, sealed) = raw.split_at(NONCE_LEN);
        let plain = self
            .cipher
            .decrypt(XNonce::from_slice(nonce), sealed)
            .map_err(|_| CodecError::Authentication)?;

        String::from_utf8(plain).map_err(|_| CodecError::Utf8)
    }

    /// Deterministic lookup key for `plaintext`.
    #[must_use]
    pub fn fingerprint(&self, plaintext: &str) -> String {
        blake3::keyed_hash(&self.fingerprint_key, plaintext.as_bytes())
            .to_hex()
            .to_string()
    }

    /// Empty and missing values are stored as NULL and never reach the cipher.
    pub fn encode_optional(
        &self,
        plaintext: Option<&str>,
    ) -> Result<Option<SealedField>, CodecError> {
        match plaintext {
            Some(value) if !value.is_empty() => self.encode(value).map(Some),
            _ => Ok(None),
        }
    }

    pub fn decode_optional(
        &self,
        ciphertext: Option<&str>,
    ) -> Result<Option<String>, CodecError> {
        match ciphertext {
            Some(value) if !value.is_empty() => self.decode(value).map(Some),
            _ => Ok(None),
        }
    }
}
