//! Codebook representation, wire serialization, and decode tree rebuild.
//!
//! # Wire Format
//!
//! ```text
//! +----------------------+
//! | symbol_count (4)     |  u32 little-endian
//! +----------------------+
//! | symbol (1)           |  \
//! | code_bit_length (1)  |   } repeated symbol_count times,
//! | code_bytes (var)     |  /  ascending symbol order
//! +----------------------+
//! ```
//!
//! `code_bytes` holds `ceil(code_bit_length / 8)` bytes, MSB-first, with the
//! unused low bits of the last byte zero.
//!
//! Frequencies are never transmitted. The receiver rebuilds a decode tree
//! directly from the codes, inserting each one as a root-to-leaf path.

use crate::bitio::{pack, unpack};
use crate::error::{FramingError, HuffmanError, Result};
use crate::framing::{read_u32, take};
use std::collections::BTreeMap;
use std::fmt;

/// Longest code the one-byte length field can describe.
pub const MAX_CODE_LEN: usize = 255;

/// A non-empty bit string; `false` is a left edge, `true` a right edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `self` is a proper prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len() < other.len() && other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Mapping from symbol to code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codebook {
    codes: BTreeMap<u8, Code>,
}

impl Codebook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the code for `symbol`, returning the previous one.
    pub fn insert(&mut self, symbol: u8, code: Code) -> Option<Code> {
        self.codes.insert(symbol, code)
    }

    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterate `(symbol, code)` in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    /// Check that no code is a prefix of (or equal to) another.
    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.codes.values().collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .skip(i + 1)
                .all(|b| a != b && !a.is_prefix_of(b) && !b.is_prefix_of(a))
        })
    }

    /// Serialized size in bytes.
    pub fn serialized_len(&self) -> usize {
        4 + self
            .codes
            .values()
            .map(|code| 2 + code.len().div_ceil(8))
            .sum::<usize>()
    }

    /// Serialize into the wire format.
    ///
    /// # Errors
    /// - `HuffmanError::EmptyCode` for a zero-length code
    /// - `HuffmanError::CodeLengthTooLong` for a code over 255 bits
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.serialized_len());
        // At most 256 entries, one per byte value
        bytes.extend_from_slice(&(self.codes.len() as u32).to_le_bytes());

        for (&symbol, code) in &self.codes {
            if code.is_empty() {
                return Err(HuffmanError::EmptyCode { symbol }.into());
            }
            if code.len() > MAX_CODE_LEN {
                return Err(HuffmanError::CodeLengthTooLong {
                    symbol,
                    length: code.len(),
                }
                .into());
            }

            bytes.push(symbol);
            bytes.push(code.len() as u8);
            bytes.extend_from_slice(&pack(code.bits()));
        }

        Ok(bytes)
    }

    /// Parse a codebook that occupies all of `bytes`.
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let (codebook, consumed) = Self::read_prefix(bytes)?;
        if consumed != bytes.len() {
            return Err(FramingError::TrailingBytes {
                count: bytes.len() - consumed,
            }
            .into());
        }
        Ok(codebook)
    }

    /// Parse a codebook from the front of `bytes`.
    ///
    /// Returns the codebook and the number of bytes it occupied.
    ///
    /// # Errors
    /// - `FramingError::FrameTooShort` if an entry is cut off
    /// - `FramingError::SymbolCountTooLarge` if more than 256 entries are declared
    /// - `HuffmanError::EmptyCode` for a zero-length code
    /// - `HuffmanError::MalformedCodebook` for a repeated symbol
    pub fn read_prefix(bytes: &[u8]) -> Result<(Self, usize)> {
        let count = read_u32(bytes, 0)?;
        if count > 256 {
            return Err(FramingError::SymbolCountTooLarge { count }.into());
        }

        let mut codebook = Codebook::new();
        let mut offset = 4;

        for _ in 0..count {
            let header = take(bytes, offset, 2)?;
            let (symbol, bit_len) = (header[0], header[1] as usize);
            offset += 2;

            if bit_len == 0 {
                return Err(HuffmanError::EmptyCode { symbol }.into());
            }

            let packed = take(bytes, offset, bit_len.div_ceil(8))?;
            offset += packed.len();

            let code = Code::from_bits(unpack(packed, bit_len)?);
            if codebook.insert(symbol, code).is_some() {
                return Err(HuffmanError::MalformedCodebook {
                    symbol,
                    reason: "symbol listed twice",
                }
                .into());
            }
        }

        Ok((codebook, offset))
    }

    /// Rebuild a decode tree from the codes alone.
    ///
    /// # Errors
    /// `HuffmanError::MalformedCodebook` if two codes collide: one is a
    /// prefix of the other, or they are identical.
    pub fn decode_tree(&self) -> Result<DecodeTree> {
        let mut tree = DecodeTree::new();
        for (symbol, code) in self.iter() {
            tree.insert(symbol, code)?;
        }
        Ok(tree)
    }
}

/// Node of a [`DecodeTree`]. Children are arena indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeNode {
    Leaf(u8),
    Branch {
        zero: Option<usize>,
        one: Option<usize>,
    },
}

/// Binary tree rebuilt from a codebook, stored as an arena.
///
/// Unlike the encoder's tree a branch may have a missing child; a
/// single-symbol codebook `{x: "0"}` has no right subtree at all.
#[derive(Debug, Clone)]
pub struct DecodeTree {
    nodes: Vec<DecodeNode>,
}

impl DecodeTree {
    pub const ROOT: usize = 0;

    fn new() -> Self {
        Self {
            nodes: vec![DecodeNode::Branch {
                zero: None,
                one: None,
            }],
        }
    }

    /// Node at `index`, or `None` if no such node exists.
    pub fn node(&self, index: usize) -> Option<DecodeNode> {
        self.nodes.get(index).copied()
    }

    /// Follow the edge labelled `bit` out of `index`, if present.
    pub fn child(&self, index: usize, bit: bool) -> Option<usize> {
        match *self.nodes.get(index)? {
            DecodeNode::Leaf(_) => None,
            DecodeNode::Branch { zero, one } => {
                if bit {
                    one
                } else {
                    zero
                }
            }
        }
    }

    /// True if the tree holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn insert(&mut self, symbol: u8, code: &Code) -> Result<()> {
        let malformed = |reason| HuffmanError::MalformedCodebook { symbol, reason };

        let Some((&last, path)) = code.bits().split_last() else {
            return Err(HuffmanError::EmptyCode { symbol }.into());
        };

        let mut current = Self::ROOT;
        for &bit in path {
            current = match self.child(current, bit) {
                Some(next) => {
                    if let DecodeNode::Leaf(_) = self.nodes[next] {
                        return Err(malformed("code passes through another symbol's leaf").into());
                    }
                    next
                }
                None => self.attach(
                    current,
                    bit,
                    DecodeNode::Branch {
                        zero: None,
                        one: None,
                    },
                ),
            };
        }

        match self.child(current, last) {
            Some(existing) => match self.nodes[existing] {
                DecodeNode::Leaf(_) => Err(malformed("code duplicates another symbol's code").into()),
                DecodeNode::Branch { .. } => Err(malformed("code is a prefix of another code").into()),
            },
            None => {
                self.attach(current, last, DecodeNode::Leaf(symbol));
                Ok(())
            }
        }
    }

    fn attach(&mut self, parent: usize, bit: bool, node: DecodeNode) -> usize {
        let index = self.nodes.len();
        self.nodes.push(node);
        if let DecodeNode::Branch { zero, one } = &mut self.nodes[parent] {
            if bit {
                *one = Some(index);
            } else {
                *zero = Some(index);
            }
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn code(s: &str) -> Code {
        Code::from_bits(s.chars().map(|c| c == '1').collect())
    }

    fn codebook(entries: &[(u8, &str)]) -> Codebook {
        let mut codebook = Codebook::new();
        for &(symbol, bits) in entries {
            codebook.insert(symbol, code(bits));
        }
        codebook
    }

    #[test]
    fn test_code_display_and_prefix() {
        assert_eq!(code("0110").to_string(), "0110");
        assert!(code("01").is_prefix_of(&code("011")));
        assert!(!code("011").is_prefix_of(&code("01")));
        assert!(!code("01").is_prefix_of(&code("01")));
        assert!(!code("10").is_prefix_of(&code("011")));
    }

    #[test]
    fn test_serialize_layout() {
        let cb = codebook(&[(b'a', "0"), (b'b', "11"), (b'c', "10")]);
        let bytes = cb.serialize().unwrap();

        assert_eq!(
            bytes,
            vec![
                3, 0, 0, 0, // symbol_count
                b'a', 1, 0b0000_0000, //
                b'b', 2, 0b1100_0000, //
                b'c', 2, 0b1000_0000,
            ]
        );
        assert_eq!(bytes.len(), cb.serialized_len());
    }

    #[test]
    fn test_wire_round_trip() {
        let long: String = (0..255).map(|i| if i % 7 == 0 { '0' } else { '1' }).collect();
        let cb = codebook(&[
            (0x00, "00"),
            (0x7f, "010"),
            (0x80, "0110"),
            (0xfe, "0111"),
            (0xff, "10"),
            (b'x', long.as_str()),
        ]);
        let bytes = cb.serialize().unwrap();
        assert_eq!(Codebook::deserialize(&bytes).unwrap(), cb);
    }

    #[test]
    fn test_empty_codebook_round_trip() {
        let bytes = Codebook::new().serialize().unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0]);
        assert!(Codebook::deserialize(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_serialize_rejects_long_code() {
        let long = "1".repeat(256);
        let cb = codebook(&[(b'a', long.as_str())]);
        assert!(matches!(
            cb.serialize(),
            Err(Error::Huffman(HuffmanError::CodeLengthTooLong { length: 256, .. }))
        ));
    }

    #[test]
    fn test_serialize_rejects_empty_code() {
        let cb = codebook(&[(b'a', "")]);
        assert!(matches!(
            cb.serialize(),
            Err(Error::Huffman(HuffmanError::EmptyCode { symbol: b'a' }))
        ));
    }

    #[test]
    fn test_parse_ignores_pad_bits() {
        // Code "10" followed by non-zero garbage in the pad bits
        let bytes = [1, 0, 0, 0, b'q', 2, 0b1011_1111];
        let cb = Codebook::deserialize(&bytes).unwrap();
        assert_eq!(cb.get(b'q').unwrap().to_string(), "10");
    }

    #[test]
    fn test_parse_truncated_entry() {
        let bytes = [2, 0, 0, 0, b'a', 1, 0x00, b'b', 9, 0xff];
        assert!(matches!(
            Codebook::deserialize(&bytes),
            Err(Error::Framing(FramingError::FrameTooShort { required: 11, actual: 10 }))
        ));
    }

    #[test]
    fn test_parse_zero_length_code() {
        let bytes = [1, 0, 0, 0, b'a', 0];
        assert!(matches!(
            Codebook::deserialize(&bytes),
            Err(Error::Huffman(HuffmanError::EmptyCode { symbol: b'a' }))
        ));
    }

    #[test]
    fn test_parse_duplicate_symbol() {
        let bytes = [2, 0, 0, 0, b'a', 1, 0x00, b'a', 1, 0x80];
        assert!(matches!(
            Codebook::deserialize(&bytes),
            Err(Error::Huffman(HuffmanError::MalformedCodebook { symbol: b'a', .. }))
        ));
    }

    #[test]
    fn test_parse_too_many_symbols() {
        let bytes = 257u32.to_le_bytes();
        assert!(matches!(
            Codebook::deserialize(&bytes),
            Err(Error::Framing(FramingError::SymbolCountTooLarge { count: 257 }))
        ));
    }

    #[test]
    fn test_read_prefix_reports_consumed() {
        let cb = codebook(&[(b'a', "0"), (b'b', "1")]);
        let mut bytes = cb.serialize().unwrap();
        let len = bytes.len();
        bytes.extend_from_slice(&[0xAA, 0xBB]);

        let (parsed, consumed) = Codebook::read_prefix(&bytes).unwrap();
        assert_eq!(parsed, cb);
        assert_eq!(consumed, len);
        assert!(matches!(
            Codebook::deserialize(&bytes),
            Err(Error::Framing(FramingError::TrailingBytes { count: 2 }))
        ));
    }

    #[test]
    fn test_decode_tree_paths() {
        let cb = codebook(&[(b'a', "0"), (b'b', "11"), (b'c', "10")]);
        let tree = cb.decode_tree().unwrap();

        let a = tree.child(DecodeTree::ROOT, false).unwrap();
        assert_eq!(tree.node(a), Some(DecodeNode::Leaf(b'a')));

        let inner = tree.child(DecodeTree::ROOT, true).unwrap();
        let c = tree.child(inner, false).unwrap();
        let b = tree.child(inner, true).unwrap();
        assert_eq!(tree.node(c), Some(DecodeNode::Leaf(b'c')));
        assert_eq!(tree.node(b), Some(DecodeNode::Leaf(b'b')));
        assert_eq!(tree.child(a, true), None);
    }

    #[test]
    fn test_decode_tree_single_symbol_is_partial() {
        let tree = codebook(&[(b'z', "0")]).decode_tree().unwrap();
        assert!(tree.child(DecodeTree::ROOT, false).is_some());
        assert!(tree.child(DecodeTree::ROOT, true).is_none());
    }

    #[test]
    fn test_decode_tree_out_of_range_index() {
        let tree = codebook(&[(b'a', "0"), (b'b', "1")]).decode_tree().unwrap();
        assert_eq!(tree.node(3), None);
        assert_eq!(tree.node(usize::MAX), None);
        assert_eq!(tree.child(3, false), None);
        assert_eq!(tree.child(usize::MAX, true), None);
    }

    #[test]
    fn test_decode_tree_empty() {
        let tree = Codebook::new().decode_tree().unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_prefix_conflict_short_code_first() {
        // 'x' = "0" inserted before 'y' = "01": y's path runs through x's leaf
        let cb = codebook(&[(b'x', "0"), (b'y', "01")]);
        assert!(!cb.is_prefix_free());
        assert!(matches!(
            cb.decode_tree(),
            Err(Error::Huffman(HuffmanError::MalformedCodebook { symbol: b'y', .. }))
        ));
    }

    #[test]
    fn test_prefix_conflict_long_code_first() {
        // 'a' = "01" inserted before 'b' = "0": b would land on a's branch
        let cb = codebook(&[(b'a', "01"), (b'b', "0")]);
        assert!(matches!(
            cb.decode_tree(),
            Err(Error::Huffman(HuffmanError::MalformedCodebook { symbol: b'b', .. }))
        ));
    }

    #[test]
    fn test_identical_codes_rejected() {
        let cb = codebook(&[(b'a', "10"), (b'b', "10")]);
        assert!(!cb.is_prefix_free());
        assert!(matches!(
            cb.decode_tree(),
            Err(Error::Huffman(HuffmanError::MalformedCodebook { symbol: b'b', .. }))
        ));
    }
}
