//! Stream envelope for moving one frame across a byte stream.
//!
//! A byte stream has no message boundaries, so each frame is wrapped in a
//! small header carrying its length and a checksum. The receiver reads the
//! whole frame into memory before anything is decoded.
//!
//! # Envelope Format
//!
//! ```text
//! +------------------+
//! | Magic (4 bytes)  |  0x48 0x46 0x57 0x52 ("HFWR")
//! +------------------+
//! | frame_len (4)    |  u32 little-endian
//! +------------------+
//! | crc32 (4)        |  u32 checksum of the frame bytes
//! +------------------+
//! | frame            |  frame_len bytes, opaque
//! | (variable)       |
//! +------------------+
//! ```
//!
//! Works over anything implementing `Read`/`Write`: a `TcpStream`, a file,
//! or an in-memory buffer in tests.

use crate::error::{Error, FramingError, Result, TransportError};
use log::debug;
use std::io::{Read, Write};

/// Magic number for envelopes: "HFWR" (Huffman wire)
pub const MAGIC: [u8; 4] = [0x48, 0x46, 0x57, 0x52];

/// Size of the envelope header in bytes
pub const HEADER_SIZE: usize = 12;

/// Default upper bound on accepted frame size (64 MiB)
pub const DEFAULT_MAX_FRAME_BYTES: usize = 64 * 1024 * 1024;

/// Write one frame wrapped in an envelope and flush.
///
/// # Errors
/// - `FramingError::LengthOverflow` if the frame exceeds u32::MAX bytes
/// - `Error::Io` on write failure
pub fn write_envelope<W: Write>(writer: &mut W, frame: &[u8]) -> Result<()> {
    let frame_len = u32::try_from(frame.len()).map_err(|_| FramingError::LengthOverflow {
        field: "frame_len",
        value: frame.len(),
    })?;
    let crc32 = crc32fast::hash(frame);

    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(&MAGIC);
    header[4..8].copy_from_slice(&frame_len.to_le_bytes());
    header[8..12].copy_from_slice(&crc32.to_le_bytes());

    writer.write_all(&header)?;
    writer.write_all(frame)?;
    writer.flush()?;

    debug!("sent envelope: {} frame bytes, crc {:#010x}", frame.len(), crc32);
    Ok(())
}

/// Read one envelope and return the frame it carries.
///
/// # Errors
/// - `TransportError::InvalidMagic` if the header magic doesn't match
/// - `TransportError::FrameTooLarge` if frame_len exceeds `max_frame_bytes`
/// - `Error::Crc` if the checksum doesn't match
/// - `Error::Io` on short read or read failure
pub fn read_envelope<R: Read>(reader: &mut R, max_frame_bytes: usize) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let mut magic = [0u8; 4];
    magic.copy_from_slice(&header[0..4]);
    if magic != MAGIC {
        return Err(TransportError::InvalidMagic {
            expected: MAGIC,
            actual: magic,
        }
        .into());
    }

    let frame_len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;
    let expected = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);

    if frame_len > max_frame_bytes {
        return Err(TransportError::FrameTooLarge {
            size: frame_len,
            max: max_frame_bytes,
        }
        .into());
    }

    let mut frame = vec![0u8; frame_len];
    reader.read_exact(&mut frame)?;

    let actual = crc32fast::hash(&frame);
    if actual != expected {
        return Err(Error::Crc { expected, actual });
    }

    debug!("received envelope: {} frame bytes", frame_len);
    Ok(frame)
}
