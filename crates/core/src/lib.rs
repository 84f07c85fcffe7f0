//! huffwire-core: Huffman text compression with a self-describing wire format
//!
//! This library provides the core components for sending a block of text
//! between two processes:
//! - Compresses text with a Huffman prefix code built from its own frequencies
//! - Serializes the codebook and bit-packed payload into a single frame
//! - Rebuilds a decode tree from the codes alone and decompresses
//! - Wraps frames in a checksummed envelope for byte-stream transports
//!
//! # Architecture
//!
//! - `bitio`: MSB-first bit packing and unpacking
//! - `frequency`: Symbol counting
//! - `tree`: Huffman tree construction and code assignment
//! - `codebook`: Codebook wire format and decode tree rebuild
//! - `codec`: Encode / decode orchestration
//! - `framing`: Frame serialization
//! - `transport`: Stream envelope
//! - `metrics`: Per-transfer statistics
//!
//! # Example
//! ```
//! use huffwire_core::framing::{compress_and_frame, decompress_frame, parse_frame};
//!
//! let frame = compress_and_frame(b"aaabbc").unwrap();
//! let parsed = parse_frame(&frame).unwrap();
//! assert_eq!(decompress_frame(&parsed).unwrap(), b"aaabbc");
//! ```
//!
//! Symbols are bytes. Text in a multi-byte encoding is compressed as its
//! code units and comes back byte-for-byte identical.

pub mod bitio;
pub mod codebook;
pub mod codec;
pub mod error;
pub mod framing;
pub mod frequency;
pub mod metrics;
pub mod transport;
pub mod tree;

// Re-export commonly used types
pub use codebook::{Code, Codebook};
pub use codec::{decode, encode, Encoded, EncodedPayload};
pub use error::{Error, Result};
