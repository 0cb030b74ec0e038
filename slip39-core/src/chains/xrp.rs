// slip39-core/src/chains/xrp.rs
//
// XRP Ledger classic address: base58check(0x00 || hash160(pubkey33)) in the
// Ripple alphabet (`rpshnaf39wBUDNEGHJKLM4PQRST7VWXYZ2bcdeCg65jkm8oFqi1tuvAxyz`).

use super::utxo::base58check;
use crate::crypto::hash::hash160;
use k256::ecdsa::VerifyingKey;

const ACCOUNT_ID_VERSION: u8 = 0x00;

pub struct XrpAddress;

impl XrpAddress {
    pub fn from_public_key(public_key: &VerifyingKey) -> String {
        let compressed = public_key.to_encoded_point(true);
        Self::from_account_id(&hash160(compressed.as_bytes()))
    }

    pub fn from_account_id(account_id: &[u8; 20]) -> String {
        base58check(ACCOUNT_ID_VERSION, account_id, bs58::Alphabet::RIPPLE)
    }
}
