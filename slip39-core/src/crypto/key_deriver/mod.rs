// slip39-core/src/crypto/key_deriver/mod.rs
//
// Key Derivation Engine
//
// ┌─────────────────────────────────────────────────┐
// │  KeySource                                      │
// │   ├─ Seed (Native 16/32/64B, BIP-39 64B)        │
// │   │     └─ BIP-32 master → private walk         │
// │   └─ Extended public key (xpub)                 │
// │         └─ public walk, non-hardened only       │
// │                    │                            │
// │                    ▼                            │
// │  DerivedKey { path, xpub, private key? }        │
// └─────────────────────────────────────────────────┘

pub mod secp256k1;

pub use secp256k1::Secp256k1Deriver;

use crate::crypto::path_range::ConcretePath;
use crate::crypto::seed::Seed;
use crate::error::{CryptoError, WalletError, WalletResult};
use bip32::{Prefix, XPub};
use k256::ecdsa::VerifyingKey;
use std::fmt;
use std::str::FromStr;
use zeroize::Zeroizing;

/// Default limit on path depth (BIP-32 stores depth in one byte).
pub const MAX_PATH_DEPTH: usize = 255;

// =============================================================================
// COMMON TYPES
// =============================================================================

/// Where derivation starts.
pub enum KeySource<'a> {
    Seed(&'a Seed),
    ExtendedPublic(XPub),
}

impl KeySource<'_> {
    /// Parses an `xpub...` string.
    pub fn xpub(encoded: &str) -> WalletResult<KeySource<'static>> {
        let xpub = XPub::from_str(encoded.trim()).map_err(|e| {
            WalletError::Crypto(CryptoError::InvalidKeyFormat(format!(
                "Invalid extended public key: {}",
                e
            )))
        })?;
        Ok(KeySource::ExtendedPublic(xpub))
    }

    pub fn is_public(&self) -> bool {
        matches!(self, KeySource::ExtendedPublic(_))
    }
}

impl fmt::Debug for KeySource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::Seed(seed) => f.debug_tuple("Seed").field(seed).finish(),
            KeySource::ExtendedPublic(xpub) => f
                .debug_tuple("ExtendedPublic")
                .field(&xpub.to_string(Prefix::XPUB))
                .finish(),
        }
    }
}

/// Derivation result: public key material, plus the private key when asked for.
pub struct DerivedKey {
    pub path: ConcretePath,
    pub xpub: XPub,
    /// 32 bytes, zeroized on drop
    pub private_key: Option<Zeroizing<[u8; 32]>>,
}

impl DerivedKey {
    #[inline]
    pub fn public_key(&self) -> &VerifyingKey {
        self.xpub.public_key()
    }

    pub fn xpub_string(&self) -> String {
        self.xpub.to_string(Prefix::XPUB)
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("path", &self.path.to_string())
            .field("xpub", &self.xpub_string())
            .field("private_key", &self.private_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// =============================================================================
// UNIFIED DERIVER
// =============================================================================

/// Entry point for key derivation.
///
/// Each call walks from the source; no intermediate key is cached.
pub struct KeyDeriver;

impl KeyDeriver {
    /// # Errors
    /// - `PathTooDeep` when `path` has more than `max_depth` levels
    /// - `HardenedFromPublic` for a hardened index below an xpub source
    pub fn derive(
        source: &KeySource<'_>,
        path: &ConcretePath,
        max_depth: usize,
        include_private: bool,
    ) -> WalletResult<DerivedKey> {
        Self::validate_depth(path, max_depth)?;

        match source {
            KeySource::Seed(seed) => {
                let xprv = Secp256k1Deriver::derive_xprv(seed.as_bytes(), path)?;
                let private_key = include_private
                    .then(|| Zeroizing::new(<[u8; 32]>::from(xprv.private_key().to_bytes())));
                Ok(DerivedKey {
                    path: path.clone(),
                    xpub: xprv.public_key(),
                    private_key,
                })
            }
            KeySource::ExtendedPublic(parent) => Ok(DerivedKey {
                path: path.clone(),
                xpub: Secp256k1Deriver::derive_xpub(parent, path)?,
                private_key: None,
            }),
        }
    }

    #[inline]
    fn validate_depth(path: &ConcretePath, max_depth: usize) -> WalletResult<()> {
        let limit = max_depth.min(MAX_PATH_DEPTH);
        if path.depth() > limit {
            return Err(CryptoError::PathTooDeep {
                path: path.to_string(),
                depth: path.depth(),
                max: limit,
            }
            .into());
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
