// slip39-core/src/crypto/key_deriver/secp256k1.rs
//
// secp256k1 Key Derivation - BIP-32
//
// Used by: Bitcoin, Litecoin, Dogecoin, Ethereum/EVM, XRP
// Algorithm: HMAC-SHA512 hierarchical deterministic derivation (in `bip32`)
// Reference: https://github.com/bitcoin/bips/blob/master/bip-0032.mediawiki

use crate::crypto::path_range::{ChildIndex, ConcretePath};
use crate::error::{CryptoError, WalletError, WalletResult};
use bip32::{ChildNumber, XPrv, XPub};

/// secp256k1 Key Deriver - BIP-32 Standard
///
/// # Security
/// - Intermediate extended keys are dropped (and zeroized by `bip32`) as the
///   walk proceeds
/// - Nothing is cached between calls
pub struct Secp256k1Deriver;

impl Secp256k1Deriver {
    /// Master key → child at `path`, one level at a time.
    ///
    /// # Arguments
    /// * `seed` - 16, 32 or 64 bytes
    /// * `path` - concrete path; its root is always the master key
    pub fn derive_xprv(seed: &[u8], path: &ConcretePath) -> WalletResult<XPrv> {
        let root_xprv = XPrv::new(seed).map_err(|e| {
            WalletError::Crypto(CryptoError::DerivationFailed(format!(
                "Failed to create master key: {}",
                e
            )))
        })?;

        path.indices().iter().try_fold(root_xprv, |parent, index| {
            parent.derive_child(Self::child_number(index)?).map_err(|e| {
                WalletError::Crypto(CryptoError::DerivationFailed(format!(
                    "Child derivation failed at '{}': {}",
                    path, e
                )))
            })
        })
    }

    /// Public-only derivation below `parent`.
    ///
    /// # Errors
    /// `HardenedFromPublic` if any index of `path` is hardened.
    pub fn derive_xpub(parent: &XPub, path: &ConcretePath) -> WalletResult<XPub> {
        if path.has_hardened() {
            return Err(CryptoError::HardenedFromPublic(path.to_string()).into());
        }
        path.indices()
            .iter()
            .try_fold(parent.clone(), |parent, index| {
                parent.derive_child(Self::child_number(index)?).map_err(|e| {
                    WalletError::Crypto(CryptoError::DerivationFailed(format!(
                        "Child derivation failed at '{}': {}",
                        path, e
                    )))
                })
            })
    }

    fn child_number(index: &ChildIndex) -> WalletResult<ChildNumber> {
        ChildNumber::new(index.value(), index.is_hardened()).map_err(|e| {
            WalletError::Crypto(CryptoError::DerivationFailed(format!(
                "Invalid index {}: {}",
                index, e
            )))
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::paths::DerivationPaths;
    use bip32::Prefix;

    const TEST_SEED: &str = "16270f7b026afe7a3746efbfcf43e083500951db9e2699d1e4f372515dabcc80459b9181c3937b5faa4b8f7602f886553d2c32c5f12f3331cef40153aead4de6";

    // BIP-32 test vector 1
    const TV1_SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn path(s: &str) -> ConcretePath {
        s.parse().unwrap()
    }

    #[test]
    fn test_bip32_vector_1() {
        let seed = hex::decode(TV1_SEED).unwrap();
        let master = Secp256k1Deriver::derive_xprv(&seed, &path("m")).unwrap();
        assert_eq!(
            master.public_key().to_string(Prefix::XPUB),
            "xpub661MyMwAqRbcFtXgS5sYJABqqG9YLmC4Q1Rdap9gSE8NqtwybGhePY2gZ29ESFjqJoCu1Rupje8YtGqsefD265TMg7usUDFdp6W1EGMcet8"
        );

        let child = Secp256k1Deriver::derive_xprv(&seed, &path("m/0'")).unwrap();
        assert_eq!(
            child.public_key().to_string(Prefix::XPUB),
            "xpub68Gmy5EdvgibQVfPdqkBBCHxA5htiqg55crXYuXoQRKfDBFA1WEjWgP6LHhwBZeNK1VTsfTFUHCdrfp1bgwQ9xv5ski8PX9rL2dZXvgGDnw"
        );
    }

    #[test]
    fn test_consistency() {
        let seed = hex::decode(TEST_SEED).unwrap();
        let evm = path(DerivationPaths::EVM_0);
        let k1 = Secp256k1Deriver::derive_xprv(&seed, &evm).unwrap();
        let k2 = Secp256k1Deriver::derive_xprv(&seed, &evm).unwrap();
        assert_eq!(k1.private_key().to_bytes(), k2.private_key().to_bytes());
    }

    #[test]
    fn test_different_paths_different_keys() {
        let seed = hex::decode(TEST_SEED).unwrap();
        let eth = Secp256k1Deriver::derive_xprv(&seed, &path(DerivationPaths::EVM_0)).unwrap();
        let btc =
            Secp256k1Deriver::derive_xprv(&seed, &path(DerivationPaths::BTC_NATIVE_SEGWIT_0)).unwrap();
        assert_ne!(eth.private_key().to_bytes(), btc.private_key().to_bytes());
    }

    #[test]
    fn test_public_derivation_matches_private() {
        let seed = hex::decode(TEST_SEED).unwrap();
        let account = Secp256k1Deriver::derive_xprv(&seed, &path("m/44'/60'/0'")).unwrap();
        let via_private = Secp256k1Deriver::derive_xprv(&seed, &path("m/44'/60'/0'/0/5")).unwrap();
        let via_public =
            Secp256k1Deriver::derive_xpub(&account.public_key(), &path("../0/5")).unwrap();
        assert_eq!(via_private.public_key().to_bytes(), via_public.to_bytes());
    }

    #[test]
    fn test_hardened_from_public() {
        let seed = hex::decode(TEST_SEED).unwrap();
        let account = Secp256k1Deriver::derive_xprv(&seed, &path("m/44'/60'/0'")).unwrap();
        assert!(matches!(
            Secp256k1Deriver::derive_xpub(&account.public_key(), &path("../0'/1")),
            Err(WalletError::Crypto(CryptoError::HardenedFromPublic(_)))
        ));
    }

    #[test]
    fn test_invalid_seed_length() {
        assert!(Secp256k1Deriver::derive_xprv(&[0u8; 8], &path("m/0")).is_err());
    }
}
