// slip39-core/src/stream/corrupt.rs
//
// Test-only channel noise: replaces a percentage of written symbols with
// other printable symbols. Newlines pass through, so record framing survives.

use crate::error::{WalletError, WalletResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::io::{self, Write};

const SYMBOLS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ:[]\",' /-";

/// `Write` adapter that corrupts `percent`% of the bytes passing through.
pub struct Corruptor<W: Write> {
    inner: W,
    probability: f64,
    rng: StdRng,
    corrupted: u64,
}

impl<W: Write> Corruptor<W> {
    /// # Errors
    /// `Config` when `percent` is NaN or outside `0..=100`.
    pub fn new(inner: W, percent: f64) -> WalletResult<Self> {
        Self::with_rng(inner, percent, StdRng::from_entropy())
    }

    /// Reproducible corruption for tests.
    pub fn seeded(inner: W, percent: f64, seed: u64) -> WalletResult<Self> {
        Self::with_rng(inner, percent, StdRng::seed_from_u64(seed))
    }

    fn with_rng(inner: W, percent: f64, rng: StdRng) -> WalletResult<Self> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(WalletError::Config(format!(
                "corrupt percent must be within 0..=100, got {}",
                percent
            )));
        }
        Ok(Self {
            inner,
            probability: percent / 100.0,
            rng,
            corrupted: 0,
        })
    }

    /// Number of symbols altered so far.
    pub fn corrupted(&self) -> u64 {
        self.corrupted
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    fn corrupt_byte(&mut self, byte: u8) -> u8 {
        if byte == b'\n' || !self.rng.gen_bool(self.probability) {
            return byte;
        }
        loop {
            let replacement = SYMBOLS[self.rng.gen_range(0..SYMBOLS.len())];
            if replacement != byte {
                self.corrupted += 1;
                return replacement;
            }
        }
    }
}

impl<W: Write> Write for Corruptor<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let noisy: Vec<u8> = buf.iter().map(|&b| self.corrupt_byte(b)).collect();
        self.inner.write_all(&noisy)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_percent_is_transparent() {
        let mut out = Corruptor::seeded(Vec::new(), 0.0, 1).unwrap();
        out.write_all(b"0: abcdef\n1: 012345\n").unwrap();
        assert_eq!(out.corrupted(), 0);
        assert_eq!(out.into_inner(), b"0: abcdef\n1: 012345\n");
    }

    #[test]
    fn test_newlines_survive() {
        let input = b"aaaaaaaaaa\nbbbbbbbbbb\ncccccccccc\n".repeat(20);
        let mut out = Corruptor::seeded(Vec::new(), 100.0, 7).unwrap();
        out.write_all(&input).unwrap();
        let corrupted = out.corrupted();
        let output = out.into_inner();

        assert_eq!(output.len(), input.len());
        assert_eq!(corrupted as usize, input.iter().filter(|&&b| b != b'\n').count());
        for (a, b) in input.iter().zip(&output) {
            assert_eq!(*a == b'\n', *b == b'\n');
        }
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let run = || {
            let mut out = Corruptor::seeded(Vec::new(), 25.0, 42).unwrap();
            out.write_all(&b"0123456789".repeat(50)).unwrap();
            out.into_inner()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_invalid_percent_rejected() {
        for percent in [f64::NAN, -1.0, 100.5, f64::INFINITY] {
            assert!(matches!(
                Corruptor::seeded(Vec::new(), percent, 1),
                Err(WalletError::Config(_))
            ));
        }
        assert!(Corruptor::new(Vec::new(), 100.0).is_ok());
    }
}
