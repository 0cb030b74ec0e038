// slip39-core/src/chains/evm/mod.rs

//! Ethereum Virtual Machine (EVM) chains
//!
//! ETH and BSC share SLIP-44 coin type 60 and the EIP-55 checksummed
//! Keccak-256 address derived via [`EvmAddress`].

pub mod address;

pub use address::EvmAddress;
