// slip39-core/src/chains/utxo.rs
//
// Bitcoin-family address encoding: P2PKH, P2SH-P2WPKH, bech32 P2WPKH
// Base58Check (version || payload || sha256d[..4]), BIP-173 witness v0

use super::AddressFormat;
use crate::crypto::hash::{hash160, sha256d};
use crate::error::{CryptoError, WalletResult};
use bech32::{ToBase32, Variant};
use k256::ecdsa::VerifyingKey;

/// Network version bytes of a Bitcoin-family chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtxoParams {
    pub p2pkh_version: u8,
    pub p2sh_version: u8,
    /// `None` for chains without segwit.
    pub bech32_hrp: Option<&'static str>,
}

impl UtxoParams {
    pub const BITCOIN: UtxoParams = UtxoParams {
        p2pkh_version: 0x00,
        p2sh_version: 0x05,
        bech32_hrp: Some("bc"),
    };

    pub const LITECOIN: UtxoParams = UtxoParams {
        p2pkh_version: 0x30,
        p2sh_version: 0x32,
        bech32_hrp: Some("ltc"),
    };

    pub const DOGECOIN: UtxoParams = UtxoParams {
        p2pkh_version: 0x1e,
        p2sh_version: 0x16,
        bech32_hrp: None,
    };
}

pub struct UtxoAddress;

impl UtxoAddress {
    pub fn encode(
        params: &UtxoParams,
        public_key: &VerifyingKey,
        format: AddressFormat,
    ) -> WalletResult<String> {
        let compressed = public_key.to_encoded_point(true);
        let key_hash = hash160(compressed.as_bytes());

        match format {
            AddressFormat::Legacy => Ok(Self::p2pkh(params, &key_hash)),
            AddressFormat::Segwit => Ok(Self::p2sh_p2wpkh(params, &key_hash)),
            AddressFormat::Bech32 => {
                let hrp = params.bech32_hrp.ok_or_else(|| CryptoError::UnsupportedFormat {
                    chain: format!("version {:#04x}", params.p2pkh_version),
                    format: format.to_string(),
                })?;
                Self::p2wpkh(hrp, &key_hash)
            }
            AddressFormat::Xpub => Err(CryptoError::UnsupportedFormat {
                chain: format!("version {:#04x}", params.p2pkh_version),
                format: format.to_string(),
            }
            .into()),
        }
    }

    /// `1...` / `L...` / `D...`
    pub fn p2pkh(params: &UtxoParams, key_hash: &[u8; 20]) -> String {
        base58check(params.p2pkh_version, key_hash, bs58::Alphabet::BITCOIN)
    }

    /// `3...` / `M...`: P2SH over the redeem script `OP_0 <20-byte key hash>`.
    pub fn p2sh_p2wpkh(params: &UtxoParams, key_hash: &[u8; 20]) -> String {
        let mut redeem_script = [0u8; 22];
        redeem_script[0] = 0x00;
        redeem_script[1] = 0x14;
        redeem_script[2..].copy_from_slice(key_hash);
        base58check(params.p2sh_version, &hash160(&redeem_script), bs58::Alphabet::BITCOIN)
    }

    /// `bc1q...` / `ltc1q...`
    pub fn p2wpkh(hrp: &str, key_hash: &[u8; 20]) -> WalletResult<String> {
        let version = bech32::u5::try_from_u8(0)
            .map_err(|e| CryptoError::InvalidKeyFormat(format!("witness version: {}", e)))?;
        let mut data = vec![version];
        data.extend(key_hash.to_base32());
        bech32::encode(hrp, data, Variant::Bech32)
            .map_err(|e| CryptoError::InvalidKeyFormat(format!("bech32 encoding failed: {}", e)).into())
    }
}

/// Base58Check with the checksum computed here rather than by `bs58`.
pub(crate) fn base58check(version: u8, payload: &[u8], alphabet: &bs58::Alphabet) -> String {
    let mut data = Vec::with_capacity(1 + payload.len() + 4);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = sha256d(&data);
    data.extend_from_slice(&checksum[..4]);
    bs58::encode(data).with_alphabet(alphabet).into_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Private key 1: the generator point
    const G_COMPRESSED: &str = "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";

    fn generator() -> VerifyingKey {
        VerifyingKey::from_sec1_bytes(&hex::decode(G_COMPRESSED).unwrap()).unwrap()
    }

    #[test]
    fn test_bitcoin_formats() {
        let key = generator();
        let params = UtxoParams::BITCOIN;
        assert_eq!(
            UtxoAddress::encode(&params, &key, AddressFormat::Legacy).unwrap(),
            "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH"
        );
        assert_eq!(
            UtxoAddress::encode(&params, &key, AddressFormat::Segwit).unwrap(),
            "3JvL6Ymt8MVWiCNHC7oWU6nLeHNJKLZGLN"
        );
        assert_eq!(
            UtxoAddress::encode(&params, &key, AddressFormat::Bech32).unwrap(),
            "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"
        );
    }

    #[test]
    fn test_bip84_vector() {
        // BIP-84 m/84'/0'/0'/0/0 for "abandon ... about"
        let key = VerifyingKey::from_sec1_bytes(
            &hex::decode("0330d54fd0dd420a6e5f8d3624f5f3482cae350f79d5f0753bf5beef9c2d91af3c").unwrap(),
        )
        .unwrap();
        assert_eq!(
            UtxoAddress::encode(&UtxoParams::BITCOIN, &key, AddressFormat::Bech32).unwrap(),
            "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu"
        );
    }

    #[test]
    fn test_version_prefixes() {
        let key = generator();
        let ltc = UtxoAddress::encode(&UtxoParams::LITECOIN, &key, AddressFormat::Legacy).unwrap();
        assert!(ltc.starts_with('L'));
        let ltc_segwit =
            UtxoAddress::encode(&UtxoParams::LITECOIN, &key, AddressFormat::Segwit).unwrap();
        assert!(ltc_segwit.starts_with('M'));
        let ltc_bech32 =
            UtxoAddress::encode(&UtxoParams::LITECOIN, &key, AddressFormat::Bech32).unwrap();
        assert!(ltc_bech32.starts_with("ltc1q"));
        let doge = UtxoAddress::encode(&UtxoParams::DOGECOIN, &key, AddressFormat::Legacy).unwrap();
        assert!(doge.starts_with('D'));
    }

    #[test]
    fn test_doge_has_no_bech32() {
        assert!(UtxoAddress::encode(&UtxoParams::DOGECOIN, &generator(), AddressFormat::Bech32).is_err());
    }

    #[test]
    fn test_base58check_checksum() {
        let encoded = base58check(0x00, &[0u8; 20], bs58::Alphabet::BITCOIN);
        assert_eq!(encoded, "1111111111111111111114oLvT2");
    }
}
