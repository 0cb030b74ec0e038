// slip39-core/src/chains/evm/address.rs
//
// EVM Address Module
// EIP-55 (Checksum), Keccak-256, secp256k1

use crate::error::{CryptoError, WalletError, WalletResult};
use alloy::primitives::Address;
use k256::{ecdsa::VerifyingKey, SecretKey};
use tiny_keccak::{Hasher, Keccak};
use zeroize::Zeroize;

/// EVM Address Generator
///
/// # Flow:  Public Key (64B) → Keccak256 → Address (20B) → EIP-55
///
/// Used for every chain sharing Ethereum's account model (ETH, BSC).
pub struct EvmAddress;

impl EvmAddress {
    // =========================================================================
    // CORE: Public Key → Address Bytes (20 bytes)
    // =========================================================================

    /// # Algorithm (Ethereum Yellow Paper)
    /// 1. `pub_key` → uncompressed SEC1 (65B)
    /// 2. drop the 0x04 prefix → 64B
    /// 3. Keccak-256 → 32B
    /// 4. `hash[12..32]` → address (20B)
    pub fn bytes_from_public_key(public_key: &VerifyingKey) -> [u8; 20] {
        let encoded = public_key.to_encoded_point(false);
        let pub_key_raw = &encoded.as_bytes()[1..];

        let mut hasher = Keccak::v256();
        let mut hash = [0u8; 32];
        hasher.update(pub_key_raw);
        hasher.finalize(&mut hash);

        let mut address = [0u8; 20];
        address.copy_from_slice(&hash[12..]);
        hash.zeroize();
        address
    }

    /// EIP-55 checksummed address, e.g. `"0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B"`
    #[inline]
    pub fn from_public_key(public_key: &VerifyingKey) -> String {
        Address::from_slice(&Self::bytes_from_public_key(public_key)).to_checksum(None)
    }

    /// Address of a raw 32-byte private key.
    ///
    /// # ⚠ Security Note
    /// The caller is responsible for zeroing `priv_key` after this call.
    pub fn from_private_key(priv_key: &[u8]) -> WalletResult<String> {
        let secret_key = SecretKey::from_slice(priv_key).map_err(|e| {
            WalletError::Crypto(CryptoError::InvalidKeyFormat(format!(
                "Invalid secp256k1 private key: {}",
                e
            )))
        })?;
        let public_key = VerifyingKey::from(secret_key.public_key());
        Ok(Self::from_public_key(&public_key))
    }
}

// =============================================================================
// TESTS
// =============================================================================
