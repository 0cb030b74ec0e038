// slip39-core/src/stream/receiver.rs
//
// Account-stream receiver: a per-line decode-or-skip loop.
//
// Records that fail to parse or authenticate are logged and dropped; the
// stream never aborts on them. Indices only select the nonce, so gaps and
// duplicates are tolerated.

use super::cipher::{NonceState, StreamKey, BOOTSTRAP_NONCE};
use super::record::{RecordLabel, StreamRecord};
use crate::accounts::WireAccount;
use crate::error::{StreamError, WalletError, WalletResult};
use std::io::{BufRead, Lines};

/// A record that decoded and (when encrypted) authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedGroup {
    pub index: Option<u64>,
    pub accounts: Vec<WireAccount>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    pub accepted: u64,
    pub nonces: u64,
    pub auth_failed: u64,
    pub malformed: u64,
    pub missing_nonce: u64,
}

impl ReceiverStats {
    pub fn skipped(&self) -> u64 {
        self.auth_failed + self.malformed + self.missing_nonce
    }
}

/// Iterator of [`ReceivedGroup`]s over a line-oriented reader.
///
/// Only I/O errors are yielded as `Err`; iteration ends after one.
pub struct Receiver<R: BufRead> {
    lines: Lines<R>,
    key: Option<StreamKey>,
    nonce: Option<NonceState>,
    stats: ReceiverStats,
    line_no: u64,
    done: bool,
}

impl<R: BufRead> Receiver<R> {
    pub fn plain(input: R) -> Self {
        Self::new(input, None)
    }

    pub fn encrypted(input: R, key: StreamKey) -> Self {
        Self::new(input, Some(key))
    }

    fn new(input: R, key: Option<StreamKey>) -> Self {
        Self {
            lines: input.lines(),
            key,
            nonce: None,
            stats: ReceiverStats::default(),
            line_no: 0,
            done: false,
        }
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// Decodes one line. `Ok(None)` for lines that carry no group (nonce records).
    fn decode(&mut self, line: &str) -> WalletResult<Option<ReceivedGroup>> {
        let record = StreamRecord::parse(line)?;

        let Some(key) = &self.key else {
            return match record.label {
                RecordLabel::Nonce => Err(StreamError::RecordMalformed(
                    "nonce record in a plaintext stream".to_string(),
                )
                .into()),
                RecordLabel::Index(index) => Self::parse_group(Some(index), record.payload.as_bytes()),
                RecordLabel::None => Self::parse_group(None, record.payload.as_bytes()),
            };
        };

        match record.label {
            RecordLabel::Nonce => {
                let base = key.open(&BOOTSTRAP_NONCE, &record.payload_bytes()?)?;
                self.nonce = Some(NonceState::from_slice(&base)?);
                self.stats.nonces += 1;
                tracing::debug!(line = self.line_no, "accepted nonce record");
                Ok(None)
            }
            RecordLabel::Index(index) => {
                let nonce = self.nonce.ok_or(StreamError::MissingNonce(index))?;
                let plaintext = key.open(&nonce.nonce_for(index), &record.payload_bytes()?)?;
                Self::parse_group(Some(index), &plaintext)
            }
            RecordLabel::None => Err(StreamError::RecordMalformed(
                "unenumerated record in an encrypted stream".to_string(),
            )
            .into()),
        }
    }

    fn parse_group(index: Option<u64>, json: &[u8]) -> WalletResult<Option<ReceivedGroup>> {
        let accounts: Vec<WireAccount> = serde_json::from_slice(json)
            .map_err(|e| StreamError::RecordMalformed(format!("bad JSON: {}", e)))?;
        Ok(Some(ReceivedGroup { index, accounts }))
    }

    fn skip(&mut self, error: WalletError) {
        match &error {
            WalletError::Stream(StreamError::RecordAuthenticationFailure(_)) => {
                self.stats.auth_failed += 1
            }
            WalletError::Stream(StreamError::MissingNonce(_)) => self.stats.missing_nonce += 1,
            _ => self.stats.malformed += 1,
        }
        tracing::warn!(line = self.line_no, reason = %error, "skipping record");
    }
}

impl<R: BufRead> Iterator for Receiver<R> {
    type Item = WalletResult<ReceivedGroup>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    // Corruption can produce invalid UTF-8; that is just another bad record.
                    self.line_no += 1;
                    self.skip(StreamError::RecordMalformed("invalid UTF-8".to_string()).into());
                    continue;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
            };
            self.line_no += 1;
            if line.trim().is_empty() {
                continue;
            }

            match self.decode(&line) {
                Ok(Some(group)) => {
                    self.stats.accepted += 1;
                    return Some(Ok(group));
                }
                Ok(None) => {}
                Err(e) => self.skip(e),
            }
        }
        None
    }
}
