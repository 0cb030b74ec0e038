// slip39-core/src/stream/cipher.rs
//
// Record encryption: XChaCha20-Poly1305 under an Argon2id password key.
//
// Nonces: a random 24-byte base, read as a big-endian integer, plus the
// record index (mod 2^192). The base itself travels once, sealed under the
// all-zero bootstrap nonce.

use crate::config::KdfParams;
use crate::error::{StreamError, WalletError, WalletResult};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const NONCE_LEN: usize = 24;

/// Fixed nonce used only to seal the nonce record.
pub const BOOTSTRAP_NONCE: [u8; NONCE_LEN] = [0u8; NONCE_LEN];

const KDF_SALT: &[u8] = b"slip39-stream-v1";

// ---------------------------------------------------------------------------
// StreamKey
// ---------------------------------------------------------------------------

/// 256-bit stream key. No `Clone`/`Debug`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct StreamKey([u8; 32]);

impl StreamKey {
    /// Argon2id(password, fixed salt, params).
    ///
    /// The salt is fixed so both ends derive the same key from the password alone.
    pub fn derive(password: &str, params: &KdfParams) -> WalletResult<Self> {
        let argon2 = argon2::Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params.to_argon2()?,
        );

        let mut output = [0u8; 32];
        argon2
            .hash_password_into(password.as_bytes(), KDF_SALT, &mut output)
            .map_err(|e| StreamError::Encryption(format!("Argon2id derivation failed: {}", e)))?;
        Ok(Self(output))
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new(Key::from_slice(&self.0))
    }

    pub fn seal(&self, nonce: &[u8; NONCE_LEN], plaintext: &[u8]) -> WalletResult<Vec<u8>> {
        self.cipher()
            .encrypt(XNonce::from_slice(nonce), plaintext)
            .map_err(|e| StreamError::Encryption(format!("XChaCha20-Poly1305 encryption failed: {}", e)).into())
    }

    /// # Errors
    /// `RecordAuthenticationFailure` on a tag mismatch (wrong key, wrong
    /// nonce, or tampered ciphertext).
    pub fn open(&self, nonce: &[u8; NONCE_LEN], ciphertext: &[u8]) -> WalletResult<Vec<u8>> {
        self.cipher()
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|_| -> WalletError {
                StreamError::RecordAuthenticationFailure(hex::encode(&nonce[NONCE_LEN - 4..])).into()
            })
    }
}

// ---------------------------------------------------------------------------
// NonceState
// ---------------------------------------------------------------------------

/// Base nonce of one generator run.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct NonceState {
    base: [u8; NONCE_LEN],
}

impl NonceState {
    /// A fresh base from OS entropy. Every generator must call this itself.
    pub fn random() -> Self {
        let mut base = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut base);
        Self { base }
    }

    pub fn from_bytes(base: [u8; NONCE_LEN]) -> Self {
        Self { base }
    }

    pub fn from_slice(bytes: &[u8]) -> WalletResult<Self> {
        let base: [u8; NONCE_LEN] = bytes.try_into().map_err(|_| {
            StreamError::RecordMalformed(format!("nonce record of {} bytes", bytes.len()))
        })?;
        Ok(Self { base })
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.base
    }

    /// `(base + index) mod 2^192`, big-endian.
    pub fn nonce_for(&self, index: u64) -> [u8; NONCE_LEN] {
        let mut nonce = self.base;
        let mut carry = index as u128;
        for byte in nonce.iter_mut().rev() {
            if carry == 0 {
                break;
            }
            let sum = *byte as u128 + (carry & 0xff);
            *byte = sum as u8;
            carry = (carry >> 8) + (sum >> 8);
        }
        nonce
    }
}

impl std::fmt::Debug for NonceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("NonceState([REDACTED])")
    }
}
