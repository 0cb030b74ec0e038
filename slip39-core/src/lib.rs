// slip39-core/src/lib.rs

//! SLIP-39 / BIP-39 seed resolution and multi-chain account derivation
//!
//! ```text
//! RawSecretInput ──► SeedResolver ──► Seed (Native | Bip39Compatible)
//!                                       │
//!          AccountRequest("ETH:../-3") ─┼─► AccountDeriver ──► AccountGroup*
//!                                       │                         │
//!                                       │        Generator ──► transport ──► Receiver
//! ```
//!
//! - [`crypto`]: entropy/seed resolution, BIP-39 and SLIP-39 mnemonics, the
//!   path range algebra and BIP-32 key derivation.
//! - [`chains`]: address encoders for BTC, LTC, DOGE, ETH, BSC and XRP.
//! - [`accounts`]: lazy, zipped multi-chain account derivation.
//! - [`stream`]: the line-oriented (optionally encrypted) account stream.
//! - [`config`]: TOML/JSON runtime configuration.

pub mod accounts;
pub mod chains;
pub mod config;
pub mod crypto;
pub mod error;
pub mod stream;

pub use accounts::{Account, AccountDeriver, AccountGroup, AccountRequest, WireAccount};
pub use chains::{AddressFormat, Chain};
pub use config::{Config, DeriverConfig, KdfParams, StreamConfig};
pub use crypto::{
    Entropy, GroupPlan, KeySource, PathTemplate, RawSecretInput, ResolvedSeed, Seed, SeedResolver,
    SeedSemantics,
};
pub use error::{WalletError, WalletResult};
