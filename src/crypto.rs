//! Sealed-box encryption of secret values.
//!
//! GitHub-compatible APIs accept Actions secrets only as libsodium sealed
//! boxes addressed to the repository's Curve25519 public key. Keys and
//! ciphertexts travel base64-encoded.

use base64::{Engine, engine::general_purpose};
use sodoken::crypto_box::{XSALSA_PUBLICKEYBYTES, XSALSA_SEALBYTES, xsalsa_seal};

use crate::errors::SealError;

/// Anonymous public-key encryption primitive.
pub trait Sealer: Send + Sync {
    /// Seal `plaintext` for the holder of `recipient_key` (base64).
    /// Returns the base64-encoded ciphertext.
    fn seal(&self, plaintext: &str, recipient_key: &str) -> Result<String, SealError>;
}

/// [`Sealer`] backed by libsodium's `crypto_box_seal` through sodoken.
#[derive(Debug, Clone, Copy, Default)]
pub struct SodiumSealer;

impl Sealer for SodiumSealer {
    fn seal(&self, plaintext: &str, recipient_key: &str) -> Result<String, SealError> {
        let key = decode_public_key(recipient_key)?;

        // Output is [ephemeral public key][mac][ciphertext].
        let mut cipher = vec![0u8; plaintext.len() + XSALSA_SEALBYTES];
        xsalsa_seal(&mut cipher, plaintext.as_bytes(), &key)
            .map_err(|e| SealError::Encryption(e.to_string()))?;

        Ok(general_purpose::STANDARD.encode(&cipher))
    }
}

/// Decode a base64 public key and check its length.
pub fn decode_public_key(encoded: &str) -> Result<[u8; XSALSA_PUBLICKEYBYTES], SealError> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| SealError::InvalidPublicKey(e.to_string()))?;

    let actual = bytes.len();
    bytes.try_into().map_err(|_| SealError::InvalidKeyLength {
        expected: XSALSA_PUBLICKEYBYTES,
        actual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sodoken::crypto_box::{XSALSA_SECRETKEYBYTES, xsalsa_keypair, xsalsa_seal_open};

    fn keypair() -> ([u8; XSALSA_PUBLICKEYBYTES], [u8; XSALSA_SECRETKEYBYTES]) {
        let mut public_key = [0u8; XSALSA_PUBLICKEYBYTES];
        let mut secret_key = [0u8; XSALSA_SECRETKEYBYTES];
        xsalsa_keypair(&mut public_key, &mut secret_key).unwrap();
        (public_key, secret_key)
    }

    #[test]
    fn test_seal_round_trip() {
        let (public_key, secret_key) = keypair();
        let encoded_key = general_purpose::STANDARD.encode(public_key);

        let sealed = SodiumSealer.seal("hunter2", &encoded_key).unwrap();
        let cipher = general_purpose::STANDARD.decode(sealed).unwrap();
        assert_eq!(cipher.len(), "hunter2".len() + XSALSA_SEALBYTES);

        let mut message = vec![0u8; cipher.len() - XSALSA_SEALBYTES];
        xsalsa_seal_open(&mut message, &cipher, &public_key, &secret_key).unwrap();
        assert_eq!(message, b"hunter2");
    }

    #[test]
    fn test_seal_is_randomized() {
        let (public_key, _) = keypair();
        let encoded_key = general_purpose::STANDARD.encode(public_key);
        let a = SodiumSealer.seal("same", &encoded_key).unwrap();
        let b = SodiumSealer.seal("same", &encoded_key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_invalid_base64_key() {
        let err = SodiumSealer.seal("secret", "invalid-base64!!!").unwrap_err();
        assert!(matches!(err, SealError::InvalidPublicKey(_)));
    }

    #[test]
    fn test_wrong_key_length() {
        let short_key = general_purpose::STANDARD.encode([0u8; 16]);
        let err = SodiumSealer.seal("secret", &short_key).unwrap_err();
        assert_eq!(
            err,
            SealError::InvalidKeyLength {
                expected: 32,
                actual: 16
            }
        );
    }
}
