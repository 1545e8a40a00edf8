//! AES-256-GCM sealing of cookie values

use crate::utils::error::{Result, ShortenerError};
use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit},
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// 96-bit nonce, as recommended for GCM
const NONCE_SIZE: usize = 12;
const TAG_SIZE: usize = 16;

/// Seals and opens cookie values with a key derived from the configured secret.
///
/// Output layout is `base64url(nonce || ciphertext || tag)` with a fresh random
/// nonce per value, so sealing the same plaintext twice gives different cookies.
#[derive(Clone)]
pub struct CookieCipher {
    cipher: Aes256Gcm,
}

impl CookieCipher {
    pub fn new(secret: &[u8]) -> Self {
        let derived: [u8; 32] = Sha256::digest(secret).into();
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&derived)),
        }
    }

    pub fn seal(&self, plaintext: &str) -> Result<String> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|e| ShortenerError::crypto(format!("Encryption failed: {}", e)))?;

        let mut output = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        output.extend_from_slice(&nonce_bytes);
        output.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(output))
    }

    /// Fails on bad encoding, truncated input, a wrong key or tampering
    pub fn open(&self, sealed: &str) -> Result<String> {
        let bytes = URL_SAFE_NO_PAD
            .decode(sealed)
            .map_err(|e| ShortenerError::crypto(format!("Malformed cookie value: {}", e)))?;
        if bytes.len() < NONCE_SIZE + TAG_SIZE {
            return Err(ShortenerError::crypto("Cookie value too short"));
        }

        let (nonce, ciphertext) = bytes.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| ShortenerError::crypto("Cookie value failed authentication"))?;

        String::from_utf8(plaintext)
            .map_err(|e| ShortenerError::crypto(format!("Cookie value is not UTF-8: {}", e)))
    }
}

impl std::fmt::Debug for CookieCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CookieCipher { .. }")
    }
}
