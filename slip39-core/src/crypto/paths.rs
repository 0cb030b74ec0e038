// slip39-core/src/crypto/paths.rs
//
// Derivation Paths Module - default path per chain and address format
// BIP-44 (Purpose), SLIP-44 (Coin Types), BIP-49/84 (Bitcoin SegWit)

use crate::chains::{AddressFormat, Chain};
use crate::crypto::path_range::PathTemplate;
use crate::error::WalletResult;

// =============================================================================
// SLIP-44 COIN TYPES
// =============================================================================
/// SLIP-44 Registered Coin Types
/// Ref: https://github.com/satoshilabs/slips/blob/master/slip-0044.md
pub mod coin_type {
    pub const BITCOIN: u32 = 0;
    pub const LITECOIN: u32 = 2;
    pub const DOGECOIN: u32 = 3;
    pub const ETHEREUM: u32 = 60; // EVM chains share coin_type 60
    pub const RIPPLE: u32 = 144;
}

/// BIP-43 purpose levels
pub mod purpose {
    pub const BIP44: u32 = 44;
    pub const BIP49: u32 = 49;
    pub const BIP84: u32 = 84;
}

// =============================================================================
// DERIVATION PATHS
// =============================================================================
/// Default derivation paths
///
/// # Conventions
/// - BIP-44: `m/44'/coin'/account'/change/index` (legacy, and every account-model chain)
/// - BIP-49: `m/49'/coin'/account'/change/index` (P2SH-wrapped SegWit)
/// - BIP-84: `m/84'/coin'/account'/change/index` (native SegWit)
///
/// An `xpub` request uses the path of the chain's default address format;
/// the deriver trims its non-hardened tail.
pub struct DerivationPaths;

impl DerivationPaths {
    pub const EVM_0: &'static str = "m/44'/60'/0'/0/0";
    pub const BTC_LEGACY_0: &'static str = "m/44'/0'/0'/0/0";
    pub const BTC_NESTED_SEGWIT_0: &'static str = "m/49'/0'/0'/0/0";
    pub const BTC_NATIVE_SEGWIT_0: &'static str = "m/84'/0'/0'/0/0";

    pub fn purpose(chain: Chain, format: AddressFormat) -> u32 {
        match format {
            AddressFormat::Segwit => purpose::BIP49,
            AddressFormat::Bech32 => purpose::BIP84,
            AddressFormat::Legacy => purpose::BIP44,
            AddressFormat::Xpub => match chain.default_format() {
                AddressFormat::Xpub => purpose::BIP44,
                default => Self::purpose(chain, default),
            },
        }
    }

    /// First account of `chain` in `format`, e.g. `m/84'/0'/0'/0/0`.
    pub fn default_path(chain: Chain, format: AddressFormat) -> String {
        Self::bip44(Self::purpose(chain, format), chain.coin_type(), 0, 0, 0)
    }

    pub fn default_template(chain: Chain, format: AddressFormat) -> WalletResult<PathTemplate> {
        chain.check_format(format)?;
        PathTemplate::parse(&Self::default_path(chain, format))
    }

    // =========================================================================
    // CUSTOM PATH BUILDER
    // =========================================================================
    /// # Arguments
    /// * `purpose` - 44 (BIP-44), 49 (BIP-49), 84 (BIP-84)
    /// * `coin_type` - SLIP-44 coin type (constants in `coin_type::*`)
    /// * `account` - Account index (usually 0)
    /// * `change` - 0 = external (receive), 1 = internal (change)
    /// * `index` - Address index
    #[inline]
    pub fn bip44(purpose: u32, coin_type: u32, account: u32, change: u32, index: u32) -> String {
        format!(
            "m/{}'/{}'/{}'/{}/{}",
            purpose, coin_type, account, change, index
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
