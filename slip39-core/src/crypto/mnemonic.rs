// slip39-core/src/crypto/mnemonic.rs
//
// Mnemonic Module - BIP-39 phrases
// BIP-39 (Mnemonic), PBKDF2-HMAC-SHA512 (Seed Derivation)

use crate::error::{MnemonicError, SeedError, WalletError, WalletResult};
use bip39::Mnemonic;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Supported word counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCount {
    /// 12 words (128-bit entropy)
    Twelve = 12,
    /// 15 words (160-bit entropy)
    Fifteen = 15,
    /// 18 words (192-bit entropy)
    Eighteen = 18,
    /// 21 words (224-bit entropy)
    TwentyOne = 21,
    /// 24 words (256-bit entropy)
    TwentyFour = 24,
}

impl WordCount {
    pub fn from_words(count: usize) -> Option<Self> {
        match count {
            12 => Some(WordCount::Twelve),
            15 => Some(WordCount::Fifteen),
            18 => Some(WordCount::Eighteen),
            21 => Some(WordCount::TwentyOne),
            24 => Some(WordCount::TwentyFour),
            _ => None,
        }
    }

    /// Number of entropy bytes encoded by this many words
    #[inline]
    pub const fn entropy_bytes(self) -> usize {
        match self {
            WordCount::Twelve => 16,
            WordCount::Fifteen => 20,
            WordCount::Eighteen => 24,
            WordCount::TwentyOne => 28,
            WordCount::TwentyFour => 32,
        }
    }
}

/// A checksum-validated BIP-39 phrase.
///
/// # Security Architecture
/// - **ZeroizeOnDrop**: the phrase is overwritten when dropped
/// - **No Debug Leak**: custom Debug never prints the phrase
///
/// The phrase is stored normalized (lowercase, single spaces); that text is
/// what PBKDF2 stretches, so two spellings of the same words give one seed.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WalletMnemonic {
    phrase: String,
    word_count: usize,
}

impl std::fmt::Debug for WalletMnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletMnemonic")
            .field("word_count", &self.word_count)
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

impl WalletMnemonic {
    // =========================================================================
    // CONSTRUCTORS
    // =========================================================================

    /// Parses and validates an existing phrase
    ///
    /// # Validation
    /// - word count (12, 15, 18, 21, 24)
    /// - every word is in the BIP-39 English wordlist
    /// - checksum (last `words * 11 / 33` bits over SHA-256 of the entropy)
    pub fn from_phrase(phrase: &str) -> WalletResult<Self> {
        let normalized = Self::normalize(phrase);
        let count = normalized.split(' ').filter(|w| !w.is_empty()).count();

        if WordCount::from_words(count).is_none() {
            return Err(MnemonicError::InvalidWordCount(count).into());
        }

        Self::parse(&normalized)?;

        Ok(Self {
            phrase: normalized,
            word_count: count,
        })
    }

    /// Encodes raw entropy (16, 20, 24, 28 or 32 bytes) as a phrase
    pub fn from_entropy(entropy: &[u8]) -> WalletResult<Self> {
        let mnemonic = Mnemonic::from_entropy(entropy)
            .map_err(|_| WalletError::Seed(SeedError::NotBip39Encodable(entropy.len())))?;

        Ok(Self {
            word_count: mnemonic.word_count(),
            phrase: mnemonic.to_string(),
        })
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    /// The normalized phrase
    ///
    /// # Warning
    /// Secret material, never log it.
    #[inline]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    #[inline]
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn words(&self) -> Vec<&str> {
        self.phrase.split(' ').collect()
    }

    pub fn strength_bits(&self) -> usize {
        WordCount::from_words(self.word_count).map_or(0, |wc| wc.entropy_bytes() * 8)
    }

    // =========================================================================
    // ENTROPY & SEED
    // =========================================================================

    /// Recovers the entropy by stripping the checksum bits
    pub fn to_entropy(&self) -> WalletResult<Zeroizing<Vec<u8>>> {
        Ok(Zeroizing::new(Self::parse(&self.phrase)?.to_entropy()))
    }

    /// PBKDF2-HMAC-SHA512(password = phrase, salt = "mnemonic" + passphrase, 2048 rounds)
    ///
    /// # Returns
    /// 64-byte seed wrapped in `Zeroizing`
    pub fn to_seed(&self, passphrase: &str) -> WalletResult<Zeroizing<[u8; 64]>> {
        Ok(Zeroizing::new(Self::parse(&self.phrase)?.to_seed(passphrase)))
    }

    // =========================================================================
    // INTERNAL
    // =========================================================================

    fn normalize(phrase: &str) -> String {
        phrase
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn parse(normalized: &str) -> WalletResult<Mnemonic> {
        Mnemonic::parse_normalized(normalized).map_err(|e| match e {
            bip39::Error::BadWordCount(n) => MnemonicError::InvalidWordCount(n).into(),
            bip39::Error::UnknownWord(i) => {
                let word = normalized.split(' ').nth(i).unwrap_or_default();
                MnemonicError::UnknownWord(word.to_string()).into()
            }
            bip39::Error::InvalidChecksum => MnemonicError::InvalidChecksum.into(),
            other => MnemonicError::Bip39Error(other.to_string()).into(),
        })
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // BIP-39 test vectors (TREZOR python-mnemonic)
    const TEST_MNEMONIC_12: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const TEST_MNEMONIC_24: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon art";
    const ZOO_MNEMONIC: &str = "zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo zoo wrong";

    #[test]
    fn test_from_phrase_valid() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        assert_eq!(mnemonic.word_count(), 12);
        assert_eq!(mnemonic.strength_bits(), 128);

        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_24).unwrap();
        assert_eq!(mnemonic.word_count(), 24);
        assert_eq!(mnemonic.strength_bits(), 256);
    }

    #[test]
    fn test_from_phrase_normalizes() {
        let messy = "  Abandon  abandon   abandon abandon abandon abandon abandon abandon abandon abandon abandon ABOUT  ";
        let mnemonic = WalletMnemonic::from_phrase(messy).unwrap();
        assert_eq!(mnemonic.phrase(), TEST_MNEMONIC_12);
    }

    #[test]
    fn test_from_phrase_invalid_word_count() {
        let result = WalletMnemonic::from_phrase("abandon abandon abandon");
        assert!(matches!(
            result,
            Err(WalletError::Mnemonic(MnemonicError::InvalidWordCount(3)))
        ));
    }

    #[test]
    fn test_from_phrase_invalid_word() {
        let invalid = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon NotAWord";
        let result = WalletMnemonic::from_phrase(invalid);
        assert_eq!(
            result.unwrap_err(),
            WalletError::Mnemonic(MnemonicError::UnknownWord("notaword".to_string()))
        );
    }

    #[test]
    fn test_from_phrase_bad_checksum() {
        let bad = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon";
        assert!(matches!(
            WalletMnemonic::from_phrase(bad),
            Err(WalletError::Mnemonic(MnemonicError::InvalidChecksum))
        ));
    }

    #[test]
    fn test_entropy_roundtrip() {
        let mnemonic = WalletMnemonic::from_phrase(ZOO_MNEMONIC).unwrap();
        assert_eq!(mnemonic.to_entropy().unwrap().as_slice(), &[0xFF; 16]);

        let encoded = WalletMnemonic::from_entropy(&[0xFF; 16]).unwrap();
        assert_eq!(encoded.phrase(), ZOO_MNEMONIC);
    }

    #[test]
    fn test_from_entropy_rejects_512_bits() {
        assert!(matches!(
            WalletMnemonic::from_entropy(&[0u8; 64]),
            Err(WalletError::Seed(SeedError::NotBip39Encodable(64)))
        ));
    }

    #[test]
    fn test_to_seed_vector() {
        // TREZOR vector: entropy 00..00, passphrase "TREZOR"
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        let seed = mnemonic.to_seed("TREZOR").unwrap();
        assert_eq!(
            hex::encode(&*seed),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e53495531f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_to_seed_with_passphrase() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        let seed_no_pass = mnemonic.to_seed("").unwrap();
        let seed_with_pass = mnemonic.to_seed("TREZOR").unwrap();
        assert_ne!(&*seed_no_pass, &*seed_with_pass);
    }

    #[test]
    fn test_words() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        let words = mnemonic.words();
        assert_eq!(words.len(), 12);
        assert_eq!(words[0], "abandon");
        assert_eq!(words[11], "about");
    }

    #[test]
    fn test_debug_does_not_leak_phrase() {
        let mnemonic = WalletMnemonic::from_phrase(TEST_MNEMONIC_12).unwrap();
        let debug_output = format!("{:?}", mnemonic);

        assert!(!debug_output.contains("abandon"));
        assert!(debug_output.contains("REDACTED"));
        assert!(debug_output.contains("word_count: 12"));
    }
}
