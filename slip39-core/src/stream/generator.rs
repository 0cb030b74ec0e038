// slip39-core/src/stream/generator.rs
//
// Account-stream generator: Idle → Streaming.
//
// Encrypted streams open with the sealed base nonce, then every AccountGroup
// becomes `<index>: <hex(seal(base + index, json))>`. Plain streams emit
// `<index>: <json>` (or bare JSON when not enumerated).

use super::cipher::{NonceState, StreamKey, BOOTSTRAP_NONCE};
use super::record::{RecordLabel, StreamRecord};
use crate::accounts::AccountGroup;
use crate::error::{StreamError, WalletResult};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Streaming,
}

pub struct Generator<W: Write> {
    out: W,
    cipher: Option<(StreamKey, NonceState)>,
    enumerated: bool,
    state: State,
    next_index: u64,
}

impl<W: Write> Generator<W> {
    pub fn plain(out: W, enumerated: bool) -> Self {
        Self {
            out,
            cipher: None,
            enumerated,
            state: State::Idle,
            next_index: 0,
        }
    }

    /// Encrypted stream with a fresh random base nonce. Always enumerated.
    pub fn encrypted(out: W, key: StreamKey) -> Self {
        Self::with_nonce(out, key, NonceState::random())
    }

    pub(crate) fn with_nonce(out: W, key: StreamKey, nonce: NonceState) -> Self {
        Self {
            out,
            cipher: Some((key, nonce)),
            enumerated: true,
            state: State::Idle,
            next_index: 0,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.cipher.is_some()
    }

    /// Records emitted so far (excluding the nonce record).
    pub fn emitted(&self) -> u64 {
        self.next_index
    }

    /// Writes one record; returns the index it was assigned.
    ///
    /// The index is consumed once the record is built, so a failed write
    /// leaves a gap rather than reusing its nonce.
    pub fn emit(&mut self, group: &AccountGroup) -> WalletResult<u64> {
        if self.state == State::Idle {
            self.start()?;
        }

        let index = self.next_index;
        let json = serde_json::to_string(&group.to_wire())
            .map_err(|e| StreamError::Serialization(e.to_string()))?;

        let record = match &self.cipher {
            Some((key, nonce)) => {
                let sealed = key.seal(&nonce.nonce_for(index), json.as_bytes())?;
                StreamRecord::new(RecordLabel::Index(index), hex::encode(sealed))
            }
            None if self.enumerated => StreamRecord::new(RecordLabel::Index(index), json),
            None => StreamRecord::new(RecordLabel::None, json),
        };

        self.next_index += 1;
        writeln!(self.out, "{}", record)?;
        tracing::debug!(index, accounts = group.accounts.len(), "emitted record");
        Ok(index)
    }

    /// Emits every group, stopping at the first derivation or write error.
    pub fn emit_all<I>(&mut self, groups: I) -> WalletResult<u64>
    where
        I: IntoIterator<Item = WalletResult<AccountGroup>>,
    {
        for group in groups {
            self.emit(&group?)?;
        }
        self.out.flush()?;
        Ok(self.next_index)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn start(&mut self) -> WalletResult<()> {
        tracing::info!(
            encrypted = self.is_encrypted(),
            enumerated = self.enumerated,
            "account stream started"
        );
        if let Some((key, nonce)) = &self.cipher {
            let sealed = key.seal(&BOOTSTRAP_NONCE, nonce.as_bytes())?;
            writeln!(
                self.out,
                "{}",
                StreamRecord::new(RecordLabel::Nonce, hex::encode(sealed))
            )?;
        }
        self.state = State::Streaming;
        Ok(())
    }
}
