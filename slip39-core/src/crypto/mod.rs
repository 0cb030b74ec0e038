// slip39-core/src/crypto/mod.rs

//! Core Cryptography Module
//!
//! - **Seed resolution**: hex entropy, BIP-39 phrases and SLIP-39 share sets
//!   become an [`Entropy`] and a semantics-tagged [`Seed`] via [`SeedResolver`].
//! - **Mnemonics**: BIP-39 phrases via [`WalletMnemonic`], SLIP-39 share
//!   groups via [`slip39`].
//! - **Path Range Algebra**: ranged derivation path templates via [`PathTemplate`].
//! - **Key Derivation**: BIP-32 secp256k1 derivation via [`KeyDeriver`].

pub mod hash;
pub mod key_deriver;
pub mod mnemonic;
pub mod path_range;
pub mod paths;
pub mod seed;
pub mod slip39;

// Re-exports for cleaner API access
pub use key_deriver::{DerivedKey, KeyDeriver, KeySource};
pub use mnemonic::{WalletMnemonic, WordCount};
pub use path_range::{ChildIndex, ConcretePath, PathRange, PathRoot, PathTemplate, Segment};
pub use paths::DerivationPaths;
pub use seed::{Entropy, RawSecretInput, ResolvedSeed, Seed, SeedResolver, SeedSemantics};
pub use slip39::{GroupPlan, GroupSpec, ShareGroup};
