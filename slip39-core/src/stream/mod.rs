// slip39-core/src/stream/mod.rs

//! Encrypted account stream
//!
//! A line-oriented transport for [`AccountGroup`](crate::accounts::AccountGroup)s
//! over pipes or serial lines:
//!
//! - [`Generator`] writes `<index>: <json>` records, or with a password,
//!   `nonce: <hex>` followed by XChaCha20-Poly1305 sealed `<index>: <hex>` records.
//! - [`Receiver`] reads them back, skipping anything that fails to parse or
//!   authenticate.
//! - [`Corruptor`] injects symbol noise for exercising the receiver.

pub mod cipher;
pub mod corrupt;
pub mod generator;
pub mod receiver;
pub mod record;

pub use cipher::{NonceState, StreamKey};
pub use corrupt::Corruptor;
pub use generator::Generator;
pub use receiver::{ReceivedGroup, Receiver, ReceiverStats};
pub use record::{RecordLabel, StreamRecord};
