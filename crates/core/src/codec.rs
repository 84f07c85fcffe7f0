//! Text compression and decompression.
//!
//! `encode` runs the full pipeline: count frequencies, build the tree,
//! assign codes, then concatenate each symbol's code in input order and pack
//! the bits. `decode` rebuilds a tree from the codebook alone and walks it
//! bit by bit, emitting a symbol every time a leaf is reached.
//!
//! # Degenerate inputs
//!
//! - Empty text encodes to an empty codebook and a zero-bit payload.
//! - Text with one distinct symbol gets the one-bit code `0`, so the
//!   payload is exactly one bit per symbol.

use crate::bitio::{BitReader, BitWriter};
use crate::codebook::{Codebook, DecodeNode, DecodeTree};
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;
use log::{debug, warn};

/// Packed code stream plus its exact length in bits.
///
/// The bit length is carried separately because the last byte may be
/// zero-padded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedPayload {
    pub bytes: Vec<u8>,
    pub bit_len: usize,
}

/// Output of [`encode`]: everything the receiver needs to rebuild the text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Encoded {
    pub codebook: Codebook,
    pub payload: EncodedPayload,
}

/// Compress `text` with a Huffman code built from its own frequencies.
///
/// # Errors
/// `HuffmanError::UnknownSymbol` if a symbol has no code. The codebook is
/// built from the same text, so this indicates an internal bug.
pub fn encode(text: &[u8]) -> Result<Encoded> {
    let frequencies = FrequencyTable::from_bytes(text);
    let Some(tree) = HuffmanTree::from_frequencies(&frequencies) else {
        debug!("empty input, nothing to encode");
        return Ok(Encoded::default());
    };

    let codebook = tree.codebook();
    let payload = encode_with(&codebook, text)?;

    debug!(
        "encoded {} bytes ({} distinct symbols) into {} bits",
        text.len(),
        codebook.len(),
        payload.bit_len
    );

    Ok(Encoded { codebook, payload })
}

/// Encode `text` with an existing codebook.
pub fn encode_with(codebook: &Codebook, text: &[u8]) -> Result<EncodedPayload> {
    // Indexed by symbol
    let mut table = [None; 256];
    for (symbol, code) in codebook.iter() {
        table[symbol as usize] = Some(code.bits());
    }

    let bit_len = text
        .iter()
        .map(|&s| table[s as usize].map_or(0, <[bool]>::len))
        .sum::<usize>();
    let mut writer = BitWriter::with_capacity(bit_len);

    for &symbol in text {
        let bits = table[symbol as usize].ok_or(HuffmanError::UnknownSymbol { symbol })?;
        writer.push_bits(bits);
    }

    let bit_len = writer.bit_len();
    Ok(EncodedPayload {
        bytes: writer.finish(),
        bit_len,
    })
}

/// Rebuild the original text from a codebook and payload.
///
/// Exactly `payload.bit_len` bits are consumed; padding is ignored.
///
/// # Errors
/// - `HuffmanError::MalformedCodebook` if the codes are not prefix-free
/// - `HuffmanError::InvalidCode` if a bit leads where no code goes
/// - `HuffmanError::TruncatedStream` if the bits run out between root and leaf
/// - `BitIoError::InsufficientBits` if `bit_len` exceeds the payload bytes
pub fn decode(codebook: &Codebook, payload: &EncodedPayload) -> Result<Vec<u8>> {
    let tree = codebook.decode_tree().inspect_err(|e| warn!("rejecting codebook: {e}"))?;
    let reader = BitReader::new(&payload.bytes, payload.bit_len)?;

    walk(&tree, reader).inspect_err(|e| warn!("rejecting payload: {e}"))
}

fn walk(tree: &DecodeTree, reader: BitReader<'_>) -> Result<Vec<u8>> {
    let bit_length = reader.bits_remaining();

    if tree.is_empty() {
        if bit_length > 0 {
            return Err(HuffmanError::TruncatedStream {
                bit_length,
                code_start: 0,
            }
            .into());
        }
        return Ok(Vec::new());
    }

    let mut text = Vec::new();
    let mut node = DecodeTree::ROOT;
    let mut code_start = 0;

    for (position, bit) in reader.enumerate() {
        let next = tree
            .child(node, bit)
            .ok_or(HuffmanError::InvalidCode { position })?;

        match tree.node(next) {
            Some(DecodeNode::Leaf(symbol)) => {
                text.push(symbol);
                node = DecodeTree::ROOT;
                code_start = position + 1;
            }
            Some(DecodeNode::Branch { .. }) => node = next,
            None => return Err(HuffmanError::InvalidCode { position }.into()),
        }
    }

    if node != DecodeTree::ROOT {
        return Err(HuffmanError::TruncatedStream {
            bit_length,
            code_start,
        }
        .into());
    }

    debug!("decoded {} bits into {} bytes", bit_length, text.len());
    Ok(text)
}
