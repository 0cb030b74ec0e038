// slip39-core/src/stream/record.rs
//
// One line of the account stream:
//
//   nonce: <hex>          sealed base nonce (encrypted streams, first line)
//   <index>: <payload>    enumerated record; payload is JSON or hex ciphertext
//   <payload>             unenumerated plaintext record

use crate::error::{StreamError, WalletResult};
use std::fmt;

const NONCE_LABEL: &str = "nonce";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLabel {
    Nonce,
    Index(u64),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    pub label: RecordLabel,
    pub payload: String,
}

impl StreamRecord {
    pub fn new(label: RecordLabel, payload: impl Into<String>) -> Self {
        Self {
            label,
            payload: payload.into(),
        }
    }

    /// Parses one line (without its newline).
    ///
    /// A line starting with `[` is an unlabeled JSON payload; anything else
    /// must be `<label>: <payload>`.
    pub fn parse(line: &str) -> WalletResult<Self> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.starts_with('[') {
            return Ok(Self::new(RecordLabel::None, line));
        }

        let (label, payload) = line
            .split_once(": ")
            .ok_or_else(|| StreamError::RecordMalformed(truncate(line)))?;

        let label = if label == NONCE_LABEL {
            RecordLabel::Nonce
        } else {
            let index = label
                .parse::<u64>()
                .map_err(|_| StreamError::RecordMalformed(format!("bad label '{}'", truncate(label))))?;
            RecordLabel::Index(index)
        };

        if payload.is_empty() {
            return Err(StreamError::RecordMalformed("empty payload".to_string()).into());
        }
        Ok(Self::new(label, payload))
    }

    /// Hex payload as bytes.
    pub fn payload_bytes(&self) -> WalletResult<Vec<u8>> {
        hex::decode(&self.payload)
            .map_err(|e| StreamError::RecordMalformed(format!("bad hex payload: {}", e)).into())
    }
}

impl fmt::Display for StreamRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            RecordLabel::Nonce => write!(f, "{}: {}", NONCE_LABEL, self.payload),
            RecordLabel::Index(index) => write!(f, "{}: {}", index, self.payload),
            RecordLabel::None => f.write_str(&self.payload),
        }
    }
}

/// Keeps log lines short when a corrupted record is reported.
fn truncate(text: &str) -> String {
    const MAX: usize = 32;
    match text.char_indices().nth(MAX) {
        Some((at, _)) => format!("{}...", &text[..at]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WalletError;

    #[test]
    fn test_parse_labels() {
        let record = StreamRecord::parse("nonce: 00ff").unwrap();
        assert_eq!(record.label, RecordLabel::Nonce);
        assert_eq!(record.payload_bytes().unwrap(), vec![0x00, 0xff]);

        let record = StreamRecord::parse("12: [[\"ETH\",\"m/0\",\"0x00\"]]\n").unwrap();
        assert_eq!(record.label, RecordLabel::Index(12));
        assert_eq!(record.payload, "[[\"ETH\",\"m/0\",\"0x00\"]]");

        let record = StreamRecord::parse("[]").unwrap();
        assert_eq!(record.label, RecordLabel::None);
    }

    #[test]
    fn test_display_roundtrip() {
        for line in ["nonce: abcd", "3: 0011", "[[\"BTC\",\"m\",\"1x\"]]"] {
            assert_eq!(StreamRecord::parse(line).unwrap().to_string(), line);
        }
    }

    #[test]
    fn test_malformed() {
        for line in ["", "garbage", "x1: 00", "-1: 00", "4:00", "5: "] {
            assert!(
                matches!(
                    StreamRecord::parse(line),
                    Err(WalletError::Stream(StreamError::RecordMalformed(_)))
                ),
                "{:?}",
                line
            );
        }
        assert!(StreamRecord::parse("1: zz").unwrap().payload_bytes().is_err());
    }
}
