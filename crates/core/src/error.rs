//! Error types for the huffwire system.
//!
//! Every encode, decode and transport operation returns a structured error
//! instead of panicking. A failed decode never yields partial text.

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Bit I/O: reading bits from a packed buffer
/// - Huffman: codebook construction, encode or decode failures
/// - Framing: payload frame serialization/parsing
/// - Transport: stream envelope validation
/// - CRC: envelope corruption detected
/// - I/O: socket and file operations
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past end of buffer)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Huffman codec error (e.g., malformed codebook, truncated stream)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Payload frame error (e.g., length fields disagree with the buffer)
    #[error("framing error: {0}")]
    Framing(#[from] FramingError),

    /// Stream envelope error
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// CRC validation failed, indicating data corruption in transit
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// Socket or file I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Bit-level I/O errors.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Attempted to read past the declared bit length
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Declared bit length does not fit in the buffer
    #[error("insufficient bits: requested {requested}, available {available}")]
    InsufficientBits { requested: usize, available: usize },
}

/// Huffman codec errors.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// A symbol of the input has no code in the codebook
    #[error("symbol {symbol:#04x} has no code")]
    UnknownSymbol { symbol: u8 },

    /// Two codes conflict in the decode tree, or an entry is invalid
    #[error("malformed codebook at symbol {symbol:#04x}: {reason}")]
    MalformedCodebook { symbol: u8, reason: &'static str },

    /// The bit stream ended between the root and a leaf
    #[error("bit stream truncated: {bit_length} bits end mid-code (code started at bit {code_start})")]
    TruncatedStream { bit_length: usize, code_start: usize },

    /// A bit led into a branch that no code occupies
    #[error("invalid huffman code at bit position {position}")]
    InvalidCode { position: usize },

    /// Code length exceeds the one-byte length field
    #[error("code for symbol {symbol:#04x} has length {length}, maximum is 255")]
    CodeLengthTooLong { symbol: u8, length: usize },

    /// A code with no bits
    #[error("empty code for symbol {symbol:#04x}")]
    EmptyCode { symbol: u8 },
}

/// Payload frame errors.
#[derive(Debug, Error)]
pub enum FramingError {
    /// Frame ended before a declared field was complete
    #[error("frame too short: need at least {required} bytes, got {actual}")]
    FrameTooShort { required: usize, actual: usize },

    /// Bytes left over after the payload
    #[error("{count} trailing bytes after payload")]
    TrailingBytes { count: usize },

    /// Declared bit length cannot fit in the declared payload
    #[error("bit length {bit_length} exceeds payload of {payload_bytes} bytes")]
    BitLengthExceedsPayload { bit_length: u32, payload_bytes: u32 },

    /// Payload byte length disagrees with the bit length
    #[error("payload length mismatch: bit length implies {expected} bytes, header says {actual}")]
    PayloadLengthMismatch { expected: usize, actual: usize },

    /// More codebook entries than there are byte values
    #[error("symbol count {count} exceeds 256")]
    SymbolCountTooLarge { count: u32 },

    /// A length does not fit its fixed-width field
    #[error("{field} of {value} does not fit in a u32")]
    LengthOverflow { field: &'static str, value: usize },
}

/// Stream envelope errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Invalid magic number in envelope header
    #[error("invalid envelope magic: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Envelope announces a frame above the configured limit
    #[error("frame size {size} exceeds limit {max}")]
    FrameTooLarge { size: usize, max: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
