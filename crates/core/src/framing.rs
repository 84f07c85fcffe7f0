//! Payload frame serialization and parsing.
//!
//! A frame packages a codebook with the compressed payload. It is the unit
//! handed to the transport, which treats it as opaque bytes.
//!
//! # Frame Format
//!
//! ```text
//! +----------------------+
//! | codebook (variable)  |  see `codebook` module: u32 symbol_count + entries
//! +----------------------+
//! | bit_length (4)       |  u32 exact number of payload bits
//! +----------------------+
//! | payload_len (4)      |  u32 payload bytes, always ceil(bit_length / 8)
//! +----------------------+
//! | payload (variable)   |  packed code stream, MSB-first
//! +----------------------+
//! ```
//!
//! All integers are little-endian. A frame is parsed whole: trailing bytes
//! and inconsistent lengths are rejected before any decoding starts.

use crate::codebook::Codebook;
use crate::codec::{self, Encoded, EncodedPayload};
use crate::error::{FramingError, Result};
use log::debug;

/// Size of the two u32 length fields between codebook and payload
const PAYLOAD_HEADER_SIZE: usize = 8;

/// Serialize an encoded text into a frame.
///
/// # Errors
/// - Propagates codebook serialization errors
/// - `FramingError::LengthOverflow` if the payload exceeds u32 lengths
pub fn serialize_frame(encoded: &Encoded) -> Result<Vec<u8>> {
    let codebook = encoded.codebook.serialize()?;
    let payload = &encoded.payload;

    let bit_length = to_u32("bit_length", payload.bit_len)?;
    let payload_len = to_u32("payload_len", payload.bytes.len())?;

    let mut frame = Vec::with_capacity(codebook.len() + PAYLOAD_HEADER_SIZE + payload.bytes.len());
    frame.extend_from_slice(&codebook);
    frame.extend_from_slice(&bit_length.to_le_bytes());
    frame.extend_from_slice(&payload_len.to_le_bytes());
    frame.extend_from_slice(&payload.bytes);

    debug!(
        "framed {} codebook bytes and {} payload bytes",
        codebook.len(),
        payload.bytes.len()
    );

    Ok(frame)
}

/// Parse a complete frame.
///
/// # Errors
/// - `FramingError::FrameTooShort` if any declared field is cut off
/// - `FramingError::BitLengthExceedsPayload` if bit_length > 8 * payload_len
/// - `FramingError::PayloadLengthMismatch` if payload_len != ceil(bit_length / 8)
/// - `FramingError::TrailingBytes` if bytes follow the payload
/// - Propagates codebook parsing errors
pub fn parse_frame(bytes: &[u8]) -> Result<Encoded> {
    let (codebook, offset) = Codebook::read_prefix(bytes)?;

    let bit_length = read_u32(bytes, offset)?;
    let payload_len = read_u32(bytes, offset + 4)?;

    if bit_length as u64 > payload_len as u64 * 8 {
        return Err(FramingError::BitLengthExceedsPayload {
            bit_length,
            payload_bytes: payload_len,
        }
        .into());
    }

    let expected = (bit_length as usize).div_ceil(8);
    if payload_len as usize != expected {
        return Err(FramingError::PayloadLengthMismatch {
            expected,
            actual: payload_len as usize,
        }
        .into());
    }

    let payload_start = offset + PAYLOAD_HEADER_SIZE;
    let payload_end = payload_start + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(FramingError::FrameTooShort {
            required: payload_end,
            actual: bytes.len(),
        }
        .into());
    }
    if bytes.len() > payload_end {
        return Err(FramingError::TrailingBytes {
            count: bytes.len() - payload_end,
        }
        .into());
    }

    Ok(Encoded {
        codebook,
        payload: EncodedPayload {
            bytes: bytes[payload_start..payload_end].to_vec(),
            bit_len: bit_length as usize,
        },
    })
}

/// Compress text and build a frame.
pub fn compress_and_frame(text: &[u8]) -> Result<Vec<u8>> {
    serialize_frame(&codec::encode(text)?)
}

/// Decompress a parsed frame.
///
/// # Returns
/// The original text.
pub fn decompress_frame(frame: &Encoded) -> Result<Vec<u8>> {
    codec::decode(&frame.codebook, &frame.payload)
}

/// Borrow `len` bytes at `offset`.
///
/// # Errors
/// `FramingError::FrameTooShort` if the range runs past the end of `bytes`.
pub(crate) fn take(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    bytes.get(offset..offset + len).ok_or_else(|| {
        FramingError::FrameTooShort {
            required: offset + len,
            actual: bytes.len(),
        }
        .into()
    })
}

/// Read a little-endian u32 at `offset`.
pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> Result<u32> {
    let mut raw = [0u8; 4];
    raw.copy_from_slice(take(bytes, offset, 4)?);
    Ok(u32::from_le_bytes(raw))
}

fn to_u32(field: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| FramingError::LengthOverflow { field, value }.into())
}
