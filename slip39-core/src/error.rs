// slip39-core/src/error.rs

use thiserror::Error;

pub type WalletResult<T> = std::result::Result<T, WalletError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Mnemonic Error: {0}")]
    Mnemonic(#[from] MnemonicError),

    #[error("Seed Error: {0}")]
    Seed(#[from] SeedError),

    #[error("Path Error: {0}")]
    Path(#[from] PathError),

    #[error("Cryptography Error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Stream Error: {0}")]
    Stream(#[from] StreamError),

    #[error("Config Error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    Io(String),
}

impl From<std::io::Error> for WalletError {
    fn from(e: std::io::Error) -> Self {
        WalletError::Io(e.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("Invalid word count: {0}. Expected 12, 15, 18, 21 or 24 words.")]
    InvalidWordCount(usize),

    #[error("Word '{0}' not found in the BIP39 wordlist.")]
    UnknownWord(String),

    #[error("Checksum validation failed.")]
    InvalidChecksum,

    /// Group or member threshold not met; the caller should ask for more shares.
    #[error("Insufficient SLIP39 shares: {0}")]
    InsufficientShares(String),

    #[error("SLIP39 error: {0}")]
    Slip39(String),

    #[error("BIP39 internal error: {0}")]
    Bip39Error(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("Invalid entropy length: {0} bytes. Expected 16, 32 or 64.")]
    InvalidEntropyLength(usize),

    #[error("Invalid hex secret: {0}")]
    InvalidHex(String),

    #[error("{0}-byte entropy cannot be encoded as a BIP39 mnemonic")]
    NotBip39Encodable(usize),

    /// A seed produced under one semantics was requested under the other.
    /// Not reachable through the public API.
    #[error("Seed semantics mismatch: seed is {actual}, requested {requested}")]
    SemanticsMismatch { actual: String, requested: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("Empty derivation path template")]
    EmptyTemplate,

    #[error("Invalid path segment '{0}'")]
    InvalidSegment(String),

    #[error("Inverted range {start}-{end}")]
    InvertedRange { start: u32, end: u32 },

    #[error("Index {0} exceeds the hardened derivation limit")]
    IndexOutOfRange(u64),

    #[error("Empty count range '-0'")]
    EmptyCount,

    #[error("Edit of {edit} segments does not fit a {len}-segment path")]
    EditTooLong { edit: usize, len: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Unsupported cryptocurrency '{0}'")]
    UnsupportedChain(String),

    #[error("{chain} does not support the {format} address format")]
    UnsupportedFormat { chain: String, format: String },

    #[error("Hardened derivation requested from a public key at '{0}'")]
    HardenedFromPublic(String),

    #[error("Path '{path}' is {depth} levels deep, maximum is {max}")]
    PathTooDeep { path: String, depth: usize, max: usize },

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid key format: {0}")]
    InvalidKeyFormat(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreamError {
    #[error("Record {0} failed authentication")]
    RecordAuthenticationFailure(String),

    #[error("Malformed record: {0}")]
    RecordMalformed(String),

    #[error("Record {0} arrived before a usable nonce record")]
    MissingNonce(u64),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Record serialization failed: {0}")]
    Serialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_error_converts() {
        let err: WalletError = StreamError::Serialization("key must be a string".into()).into();
        assert_eq!(
            err,
            WalletError::Stream(StreamError::Serialization("key must be a string".into()))
        );
        assert!(err.to_string().contains("Record serialization failed: key must be a string"));
    }
}
