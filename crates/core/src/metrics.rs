//! Per-transfer statistics.
//!
//! Records how large each stage of one transfer was: the source text, the
//! codebook, the payload, and the whole frame. The summary goes out through
//! the `log` facade.

use crate::codec::Encoded;
use log::info;
use std::time::{Duration, Instant};

/// Statistics for one encode or decode.
#[derive(Debug, Clone)]
pub struct TransferStats {
    /// When the transfer started
    pub start_time: Instant,

    /// When the transfer ended (set on completion)
    pub end_time: Option<Instant>,

    /// Length of the source text
    pub input_bytes: u64,

    /// Distinct symbols in the codebook
    pub distinct_symbols: usize,

    /// Exact payload length in bits
    pub payload_bits: u64,

    /// Packed payload length in bytes
    pub payload_bytes: u64,

    /// Serialized codebook length in bytes
    pub codebook_bytes: u64,

    /// Whole frame length in bytes
    pub frame_bytes: u64,
}

impl TransferStats {
    /// Create empty statistics with start time set to now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            distinct_symbols: 0,
            payload_bits: 0,
            payload_bytes: 0,
            codebook_bytes: 0,
            frame_bytes: 0,
        }
    }

    /// Record the sizes of an encoded text and its frame.
    pub fn record(&mut self, text_len: usize, encoded: &Encoded, frame_len: usize) {
        self.input_bytes = text_len as u64;
        self.distinct_symbols = encoded.codebook.len();
        self.payload_bits = encoded.payload.bit_len as u64;
        self.payload_bytes = encoded.payload.bytes.len() as u64;
        self.codebook_bytes = encoded.codebook.serialized_len() as u64;
        self.frame_bytes = frame_len as u64;
    }

    /// Mark the transfer as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compute compression ratio (frame / input).
    ///
    /// Returns 0.0 for empty input.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.frame_bytes as f64 / self.input_bytes as f64
        }
    }

    /// Average code length over the input.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.input_bytes as f64
        }
    }

    /// Log a human-readable summary at info level.
    pub fn log_summary(&self) {
        info!(
            "text: {} bytes, {} distinct symbols",
            self.input_bytes, self.distinct_symbols
        );
        info!(
            "frame: {} bytes (codebook {}, payload {} bytes / {} bits)",
            self.frame_bytes, self.codebook_bytes, self.payload_bytes, self.payload_bits
        );
        info!(
            "ratio: {:.1}%, {:.3} bits/symbol, {} ms",
            self.compression_ratio() * 100.0,
            self.bits_per_symbol(),
            self.duration().as_millis()
        );
    }
}

impl Default for TransferStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::framing::serialize_frame;

    #[test]
    fn test_creation() {
        let stats = TransferStats::new();
        assert!(stats.end_time.is_none());
        assert_eq!(stats.compression_ratio(), 0.0);
        assert_eq!(stats.bits_per_symbol(), 0.0);
    }

    #[test]
    fn test_record() {
        let text = b"aaabbc";
        let encoded = encode(text).unwrap();
        let frame = serialize_frame(&encoded).unwrap();

        let mut stats = TransferStats::new();
        stats.record(text.len(), &encoded, frame.len());
        stats.complete();

        assert_eq!(stats.input_bytes, 6);
        assert_eq!(stats.distinct_symbols, 3);
        assert_eq!(stats.payload_bits, 9);
        assert_eq!(stats.payload_bytes, 2);
        assert_eq!(stats.codebook_bytes, 13);
        assert_eq!(stats.frame_bytes, 13 + 8 + 2);
        assert_eq!(stats.bits_per_symbol(), 1.5);
        assert!(stats.end_time.is_some());
    }

    #[test]
    fn test_compression_ratio() {
        let mut stats = TransferStats::new();
        stats.input_bytes = 1000;
        stats.frame_bytes = 750;

        assert_eq!(stats.compression_ratio(), 0.75);
    }
}
