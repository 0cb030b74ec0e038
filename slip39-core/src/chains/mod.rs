// slip39-core/src/chains/mod.rs
//
// Supported cryptocurrencies and their address formats.
//
// ┌──────────┬──────────┬─────────────────────────────────────────┐
// │ Chain    │ SLIP-44  │ Formats                                 │
// ├──────────┼──────────┼─────────────────────────────────────────┤
// │ BTC      │ 0        │ legacy, segwit, bech32 (default), xpub  │
// │ LTC      │ 2        │ legacy, segwit, bech32 (default), xpub  │
// │ DOGE     │ 3        │ legacy (default), xpub                  │
// │ ETH, BSC │ 60       │ legacy (EIP-55, default), xpub          │
// │ XRP      │ 144      │ legacy (Ripple base58, default), xpub   │
// └──────────┴──────────┴─────────────────────────────────────────┘

pub mod evm;
pub mod utxo;
pub mod xrp;

pub use evm::EvmAddress;
pub use utxo::{UtxoAddress, UtxoParams};
pub use xrp::XrpAddress;

use crate::crypto::paths::coin_type;
use crate::error::{CryptoError, WalletError, WalletResult};
use k256::ecdsa::VerifyingKey;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// ADDRESS FORMAT
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFormat {
    /// Base58Check P2PKH (or the chain's native account address)
    Legacy,
    /// P2SH-wrapped P2WPKH
    Segwit,
    /// Native witness v0
    Bech32,
    /// Serialized extended public key
    Xpub,
}

impl AddressFormat {
    pub const ALL: [AddressFormat; 4] = [
        AddressFormat::Legacy,
        AddressFormat::Segwit,
        AddressFormat::Bech32,
        AddressFormat::Xpub,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AddressFormat::Legacy => "legacy",
            AddressFormat::Segwit => "segwit",
            AddressFormat::Bech32 => "bech32",
            AddressFormat::Xpub => "xpub",
        }
    }
}

impl fmt::Display for AddressFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AddressFormat {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AddressFormat::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                CryptoError::InvalidKeyFormat(format!("unknown address format '{}'", s)).into()
            })
    }
}

// =============================================================================
// CHAIN
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chain {
    Bitcoin,
    Litecoin,
    Dogecoin,
    Ethereum,
    BinanceSmartChain,
    Ripple,
}

impl Chain {
    pub const ALL: [Chain; 6] = [
        Chain::Bitcoin,
        Chain::Litecoin,
        Chain::Dogecoin,
        Chain::Ethereum,
        Chain::BinanceSmartChain,
        Chain::Ripple,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Chain::Bitcoin => "BTC",
            Chain::Litecoin => "LTC",
            Chain::Dogecoin => "DOGE",
            Chain::Ethereum => "ETH",
            Chain::BinanceSmartChain => "BSC",
            Chain::Ripple => "XRP",
        }
    }

    /// SLIP-44 coin type
    pub fn coin_type(self) -> u32 {
        match self {
            Chain::Bitcoin => coin_type::BITCOIN,
            Chain::Litecoin => coin_type::LITECOIN,
            Chain::Dogecoin => coin_type::DOGECOIN,
            Chain::Ethereum | Chain::BinanceSmartChain => coin_type::ETHEREUM,
            Chain::Ripple => coin_type::RIPPLE,
        }
    }

    pub fn default_format(self) -> AddressFormat {
        match self {
            Chain::Bitcoin | Chain::Litecoin => AddressFormat::Bech32,
            _ => AddressFormat::Legacy,
        }
    }

    pub fn supports(self, format: AddressFormat) -> bool {
        match format {
            AddressFormat::Legacy | AddressFormat::Xpub => true,
            AddressFormat::Segwit | AddressFormat::Bech32 => self
                .utxo_params()
                .map_or(false, |params| params.bech32_hrp.is_some()),
        }
    }

    pub fn check_format(self, format: AddressFormat) -> WalletResult<()> {
        if !self.supports(format) {
            return Err(CryptoError::UnsupportedFormat {
                chain: self.symbol().to_string(),
                format: format.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Encodes a public key as an address of this chain.
    ///
    /// `Xpub` is not an address encoding; it is serialized by the deriver.
    pub fn address(self, public_key: &VerifyingKey, format: AddressFormat) -> WalletResult<String> {
        self.check_format(format)?;
        match (self, format) {
            (_, AddressFormat::Xpub) => Err(CryptoError::UnsupportedFormat {
                chain: self.symbol().to_string(),
                format: "xpub address".to_string(),
            }
            .into()),
            (Chain::Ethereum | Chain::BinanceSmartChain, _) => {
                Ok(EvmAddress::from_public_key(public_key))
            }
            (Chain::Ripple, _) => Ok(XrpAddress::from_public_key(public_key)),
            (chain, format) => {
                let params = chain.utxo_params().ok_or_else(|| CryptoError::UnsupportedFormat {
                    chain: chain.symbol().to_string(),
                    format: format.to_string(),
                })?;
                UtxoAddress::encode(&params, public_key, format)
            }
        }
    }

    fn utxo_params(self) -> Option<UtxoParams> {
        match self {
            Chain::Bitcoin => Some(UtxoParams::BITCOIN),
            Chain::Litecoin => Some(UtxoParams::LITECOIN),
            Chain::Dogecoin => Some(UtxoParams::DOGECOIN),
            _ => None,
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Chain {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbol = s.trim();
        Chain::ALL
            .into_iter()
            .find(|chain| chain.symbol().eq_ignore_ascii_case(symbol))
            .ok_or_else(|| CryptoError::UnsupportedChain(symbol.to_string()).into())
    }
}
