// slip39-core/src/crypto/seed.rs
//
// Seed Entropy Resolver
//
// ┌──────────────────────────────────────────────────────────────┐
// │  RawSecretInput                                              │
// │   ├─ HexEntropy ─────────────┐                               │
// │   ├─ Bip39Mnemonic ─ checksum┼─► Entropy ──┬─ Native ──► Seed = Entropy
// │   └─ Slip39MnemonicSet ─ combine ┘          └─ Bip39Compatible
// │                                                ──► BIP-39 phrase(Entropy)
// │                                                ──► PBKDF2 ──► Seed (64B)
// └──────────────────────────────────────────────────────────────┘
//
// The passphrase is routed by semantics and never reaches both steps:
//   Native          -> SLIP-39 decryption (or the BIP-39 seed it backs up)
//   Bip39Compatible -> PBKDF2 salt; SLIP-39 shares use the empty passphrase

use crate::crypto::mnemonic::WalletMnemonic;
use crate::crypto::slip39::{self, GroupPlan, ShareGroup};
use crate::error::{SeedError, WalletResult};
use rand::{rngs::OsRng, RngCore};
use std::fmt;
use zeroize::Zeroizing;

// =============================================================================
// SEMANTICS
// =============================================================================

/// How entropy becomes a seed. Deliberately has no `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedSemantics {
    /// SLIP-39: the seed is the entropy itself.
    Native,
    /// BIP-39: the seed is PBKDF2 over the BIP-39 phrase encoding the entropy.
    Bip39Compatible,
}

impl fmt::Display for SeedSemantics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeedSemantics::Native => "SLIP-39 native",
            SeedSemantics::Bip39Compatible => "BIP-39 compatible",
        })
    }
}

// =============================================================================
// ENTROPY
// =============================================================================

/// 128, 256 or 512 bits of secret entropy.
#[derive(Clone, PartialEq, Eq)]
pub struct Entropy(Zeroizing<Vec<u8>>);

impl Entropy {
    pub const VALID_LENGTHS: [usize; 3] = [16, 32, 64];

    pub fn new(bytes: &[u8]) -> WalletResult<Self> {
        if !Self::VALID_LENGTHS.contains(&bytes.len()) {
            return Err(SeedError::InvalidEntropyLength(bytes.len()).into());
        }
        Ok(Self(Zeroizing::new(bytes.to_vec())))
    }

    /// Fresh entropy from the OS CSPRNG.
    pub fn random(bits: usize) -> WalletResult<Self> {
        let len = bits / 8;
        if bits % 8 != 0 || !Self::VALID_LENGTHS.contains(&len) {
            return Err(SeedError::InvalidEntropyLength(len).into());
        }
        let mut bytes = Zeroizing::new(vec![0u8; len]);
        OsRng.fill_bytes(&mut bytes);
        Ok(Self(bytes))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[inline]
    pub fn bits(&self) -> usize {
        self.0.len() * 8
    }
}

impl fmt::Debug for Entropy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entropy")
            .field("bits", &self.bits())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// SEED
// =============================================================================

/// The bytes handed to BIP-32, tagged with the semantics that produced them.
///
/// Not `Clone`: each resolution yields one exclusively owned seed.
pub enum Seed {
    Native(Zeroizing<Vec<u8>>),
    Bip39Compatible(Zeroizing<[u8; 64]>),
}

impl Seed {
    pub fn semantics(&self) -> SeedSemantics {
        match self {
            Seed::Native(_) => SeedSemantics::Native,
            Seed::Bip39Compatible(_) => SeedSemantics::Bip39Compatible,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Seed::Native(bytes) => &bytes[..],
            Seed::Bip39Compatible(bytes) => &bytes[..],
        }
    }

    /// The seed bytes, provided they were produced under `semantics`.
    pub fn bytes_under(&self, semantics: SeedSemantics) -> WalletResult<&[u8]> {
        if self.semantics() != semantics {
            return Err(SeedError::SemanticsMismatch {
                actual: self.semantics().to_string(),
                requested: semantics.to_string(),
            }
            .into());
        }
        Ok(self.as_bytes())
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Seed")
            .field("semantics", &self.semantics())
            .field("len", &self.as_bytes().len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

// =============================================================================
// RAW INPUT
// =============================================================================

/// A secret as supplied by the user.
#[derive(Clone)]
pub enum RawSecretInput {
    HexEntropy(Zeroizing<Vec<u8>>),
    Bip39Mnemonic {
        phrase: Zeroizing<String>,
        /// Recover the entropy instead of backing up the 512-bit PBKDF2 seed
        /// (only meaningful under Native semantics).
        as_entropy: bool,
    },
    Slip39MnemonicSet(Vec<Zeroizing<String>>),
}

impl RawSecretInput {
    /// Decodes hex entropy, with or without a `0x` prefix.
    pub fn hex(text: &str) -> WalletResult<Self> {
        let text = text.trim();
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .unwrap_or(text);
        let bytes = hex::decode(digits).map_err(|e| SeedError::InvalidHex(e.to_string()))?;
        if !Entropy::VALID_LENGTHS.contains(&bytes.len()) {
            return Err(SeedError::InvalidEntropyLength(bytes.len()).into());
        }
        Ok(RawSecretInput::HexEntropy(Zeroizing::new(bytes)))
    }

    pub fn bip39(phrase: &str, as_entropy: bool) -> Self {
        RawSecretInput::Bip39Mnemonic {
            phrase: Zeroizing::new(phrase.to_string()),
            as_entropy,
        }
    }

    pub fn slip39<S: AsRef<str>>(mnemonics: &[S]) -> Self {
        RawSecretInput::Slip39MnemonicSet(
            mnemonics
                .iter()
                .map(|m| Zeroizing::new(m.as_ref().to_string()))
                .collect(),
        )
    }

    /// Hex when every character is a hex digit, otherwise a BIP-39 phrase.
    pub fn classify(text: &str, as_entropy: bool) -> WalletResult<Self> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Self::hex(trimmed)
        } else {
            Ok(Self::bip39(trimmed, as_entropy))
        }
    }
}

impl fmt::Debug for RawSecretInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawSecretInput::HexEntropy(bytes) => write!(f, "HexEntropy([REDACTED; {}])", bytes.len()),
            RawSecretInput::Bip39Mnemonic { as_entropy, .. } => f
                .debug_struct("Bip39Mnemonic")
                .field("phrase", &"[REDACTED]")
                .field("as_entropy", as_entropy)
                .finish(),
            RawSecretInput::Slip39MnemonicSet(set) => {
                write!(f, "Slip39MnemonicSet([REDACTED; {}])", set.len())
            }
        }
    }
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Result of resolving a secret: the entropy and the seed derived from it.
#[derive(Debug)]
pub struct ResolvedSeed {
    pub entropy: Entropy,
    pub seed: Seed,
}

pub struct SeedResolver;

impl SeedResolver {
    /// Resolves `secret` to `(Entropy, Seed)` under `semantics`.
    ///
    /// # Errors
    /// - `InsufficientShares` when a SLIP-39 set misses its thresholds
    /// - `InvalidChecksum` / `UnknownWord` / `InvalidWordCount` for bad BIP-39 phrases
    /// - `NotBip39Encodable` for 512-bit entropy under `Bip39Compatible`
    pub fn resolve(
        secret: &RawSecretInput,
        semantics: SeedSemantics,
        passphrase: &str,
    ) -> WalletResult<ResolvedSeed> {
        let entropy = Self::recover_entropy(secret, semantics, passphrase)?;
        let seed = Self::seed_from_entropy(&entropy, semantics, passphrase)?;
        tracing::debug!(
            semantics = %semantics,
            entropy_bits = entropy.bits(),
            seed_len = seed.as_bytes().len(),
            "resolved seed"
        );
        Ok(ResolvedSeed { entropy, seed })
    }

    /// Turns entropy into the seed for `semantics`.
    ///
    /// Under `Bip39Compatible` the entropy is first re-encoded as a BIP-39
    /// phrase and that text is stretched, never the entropy bytes.
    pub fn seed_from_entropy(
        entropy: &Entropy,
        semantics: SeedSemantics,
        passphrase: &str,
    ) -> WalletResult<Seed> {
        let seed = match semantics {
            SeedSemantics::Native => Seed::Native(Zeroizing::new(entropy.as_bytes().to_vec())),
            SeedSemantics::Bip39Compatible => {
                let mnemonic = WalletMnemonic::from_entropy(entropy.as_bytes())?;
                Seed::Bip39Compatible(mnemonic.to_seed(passphrase)?)
            }
        };
        Ok(seed)
    }

    /// Encodes entropy as a BIP-39 phrase (128/256-bit entropy only).
    pub fn encode_bip39(entropy: &Entropy) -> WalletResult<WalletMnemonic> {
        WalletMnemonic::from_entropy(entropy.as_bytes())
    }

    /// Splits entropy into SLIP-39 share groups.
    ///
    /// `passphrase` encrypts the shares only under `Native`; under
    /// `Bip39Compatible` it belongs to the PBKDF2 salt, so the shares are
    /// produced with the empty passphrase.
    pub fn encode_slip39(
        entropy: &Entropy,
        semantics: SeedSemantics,
        plan: &GroupPlan,
        passphrase: &str,
    ) -> WalletResult<Vec<ShareGroup>> {
        if semantics == SeedSemantics::Bip39Compatible {
            // Must stay BIP-39 encodable so the phrase can be regenerated.
            Self::encode_bip39(entropy)?;
        }
        slip39::split(entropy.as_bytes(), plan, Self::slip39_passphrase(semantics, passphrase))
    }

    fn slip39_passphrase(semantics: SeedSemantics, passphrase: &str) -> &str {
        match semantics {
            SeedSemantics::Native => passphrase,
            SeedSemantics::Bip39Compatible => "",
        }
    }

    fn recover_entropy(
        secret: &RawSecretInput,
        semantics: SeedSemantics,
        passphrase: &str,
    ) -> WalletResult<Entropy> {
        match secret {
            RawSecretInput::HexEntropy(bytes) => Entropy::new(bytes),
            RawSecretInput::Bip39Mnemonic { phrase, as_entropy } => {
                let mnemonic = WalletMnemonic::from_phrase(phrase)?;
                match semantics {
                    // Back up the BIP-39 seed itself; it derives the same wallets.
                    SeedSemantics::Native if !as_entropy => {
                        Entropy::new(&mnemonic.to_seed(passphrase)?[..])
                    }
                    _ => Entropy::new(&mnemonic.to_entropy()?),
                }
            }
            RawSecretInput::Slip39MnemonicSet(mnemonics) => {
                let phrases: Vec<&str> = mnemonics.iter().map(|m| m.as_str()).collect();
                let secret = slip39::combine(&phrases, Self::slip39_passphrase(semantics, passphrase))?;
                Entropy::new(&secret)
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
