//! Bit-level packing and unpacking of Huffman code streams.
//!
//! `BitWriter` packs a sequence of bits into bytes and `BitReader` reads them
//! back. Both operate MSB-first: bit `i` of the logical stream is bit
//! `7 - i % 8` of byte `i / 8`.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with trailing zeros
//! - BitReader: stops at the exact bit length it was given; padding bits are
//!   never returned, whatever their value
//!
//! # Example
//! ```
//! use huffwire_core::bitio::{pack, unpack};
//!
//! let bits = [true, false, true, true, true];
//! let bytes = pack(&bits);
//! assert_eq!(bytes, vec![0b1011_1000]);
//! assert_eq!(unpack(&bytes, bits.len()).unwrap(), bits);
//! ```

use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
/// - unused low bits of `bit_buffer` are zero
#[derive(Debug, Clone)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    /// Create a new BitWriter with empty output.
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Create a writer with room for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    /// Append one bit.
    pub fn push_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Append bits in order.
    pub fn push_bits(&mut self, bits: &[bool]) {
        for &bit in bits {
            self.push_bit(bit);
        }
    }

    /// Finish writing and return the output bytes.
    ///
    /// Remaining bits are flushed as a final byte whose unused low bits are
    /// zero. The caller keeps [`BitWriter::bit_len`] separately, since the
    /// padding cannot be told apart from data.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        self.bytes
    }

    /// Return the total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Return true if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.bit_len() == 0
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads bits MSB-first from a byte buffer, up to an exact bit length.
///
/// # Invariants
/// - `bit_len <= data.len() * 8`
/// - `bit_position <= bit_len`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data
    data: &'a [u8],
    /// Number of meaningful bits in `data`
    bit_len: usize,
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    /// Create a reader over the first `bit_len` bits of `data`.
    ///
    /// # Errors
    /// `BitIoError::InsufficientBits` if `data` holds fewer than `bit_len` bits.
    pub fn new(data: &'a [u8], bit_len: usize) -> Result<Self> {
        let available = data.len() * 8;
        if bit_len > available {
            return Err(BitIoError::InsufficientBits {
                requested: bit_len,
                available,
            }
            .into());
        }

        Ok(Self {
            data,
            bit_len,
            bit_position: 0,
        })
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` once `bit_len` bits have been read.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.bit_position >= self.bit_len {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let byte = self.data[self.bit_position / 8];
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Ok(bit)
    }

    /// Return the number of bits left before `bit_len`.
    pub fn bits_remaining(&self) -> usize {
        self.bit_len - self.bit_position
    }

    /// Return the current bit position.
    pub fn position(&self) -> usize {
        self.bit_position
    }

    /// Check if every meaningful bit has been read.
    pub fn is_empty(&self) -> bool {
        self.bit_position >= self.bit_len
    }
}

impl Iterator for BitReader<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.read_bit().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bits_remaining();
        (remaining, Some(remaining))
    }
}

/// Pack bits MSB-first into `ceil(bits.len() / 8)` bytes.
pub fn pack(bits: &[bool]) -> Vec<u8> {
    let mut writer = BitWriter::with_capacity(bits.len());
    writer.push_bits(bits);
    writer.finish()
}

/// Unpack the first `bit_len` bits of `bytes`, ignoring any padding.
pub fn unpack(bytes: &[u8], bit_len: usize) -> Result<Vec<bool>> {
    Ok(BitReader::new(bytes, bit_len)?.collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn bits(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn test_write_single_byte() {
        let bytes = pack(&bits("10110011"));
        assert_eq!(bytes, vec![0b10110011]);
    }

    #[test]
    fn test_padding() {
        let mut writer = BitWriter::new();
        writer.push_bit(true);
        assert_eq!(writer.bit_len(), 1);

        // Should be padded to 10000000
        assert_eq!(writer.finish(), vec![0b10000000]);
    }

    #[test]
    fn test_multi_byte() {
        let stream = bits("1010101111110000101");
        let bytes = pack(&stream);
        assert_eq!(bytes, vec![0b10101011, 0b11110000, 0b10100000]);
        assert_eq!(unpack(&bytes, stream.len()).unwrap(), stream);
    }

    #[test]
    fn test_empty() {
        let writer = BitWriter::new();
        assert!(writer.is_empty());
        assert!(writer.finish().is_empty());
        assert!(unpack(&[], 0).unwrap().is_empty());
    }

    #[test]
    fn test_padding_bits_ignored() {
        // Low five bits are garbage, not zero padding
        let data = [0b1011_0111];
        assert_eq!(unpack(&data, 3).unwrap(), bits("101"));
    }

    #[test]
    fn test_read_past_bit_len() {
        let data = [0b1010_1010];
        let mut reader = BitReader::new(&data, 2).unwrap();

        assert!(reader.read_bit().unwrap());
        assert!(!reader.read_bit().unwrap());
        assert!(reader.is_empty());
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));
    }

    #[test]
    fn test_bit_len_exceeds_buffer() {
        let result = BitReader::new(&[0xFF], 9);
        assert!(matches!(
            result,
            Err(Error::BitIo(BitIoError::InsufficientBits {
                requested: 9,
                available: 8
            }))
        ));
    }

    #[test]
    fn test_bits_remaining() {
        let data = vec![0xFF, 0xFF];
        let mut reader = BitReader::new(&data, 13).unwrap();

        assert_eq!(reader.bits_remaining(), 13);
        for _ in 0..5 {
            reader.read_bit().unwrap();
        }
        assert_eq!(reader.position(), 5);
        assert_eq!(reader.bits_remaining(), 8);
        assert_eq!(reader.count(), 8);
    }

    #[test]
    fn test_round_trip_every_length() {
        // Every length around the byte boundaries, alternating pattern
        for len in 0..=33usize {
            let stream: Vec<bool> = (0..len).map(|i| i % 3 == 0).collect();
            let bytes = pack(&stream);
            assert_eq!(bytes.len(), len.div_ceil(8));
            assert_eq!(unpack(&bytes, len).unwrap(), stream, "len {len}");
        }
    }
}
