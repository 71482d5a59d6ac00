//! Error types for OxiHuff operations.
//!
//! One error type covers the whole engine: failures to open or read the
//! source, malformed containers found while decompressing, and internal
//! consistency checks of the code table.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for OxiHuff operations.
#[derive(Debug, Error)]
pub enum OxiHuffError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The source path could not be opened.
    #[error("Source not found or unreadable: {}", path.display())]
    SourceNotFound {
        /// Path that failed to open.
        path: PathBuf,
        /// Error reported by the filesystem.
        #[source]
        source: io::Error,
    },

    /// The source was opened but holds zero bytes.
    #[error("Source is empty: {}", path.display())]
    SourceEmpty {
        /// Path of the empty source.
        path: PathBuf,
    },

    /// A tree was requested for input without any symbols.
    #[error("Cannot build a Huffman tree from empty input")]
    EmptyInput,

    /// Container does not start with the expected magic bytes.
    #[error("Invalid magic number: expected {expected:02x?}, found {found:02x?}")]
    InvalidMagic {
        /// Expected magic bytes.
        expected: Vec<u8>,
        /// Actual magic bytes found.
        found: Vec<u8>,
    },

    /// Container version this build cannot read.
    #[error("Unsupported container version: {version}")]
    UnsupportedVersion {
        /// Version byte found in the header.
        version: u8,
    },

    /// CRC checksum mismatch.
    #[error("CRC mismatch: expected {expected:#x}, computed {computed:#x}")]
    CrcMismatch {
        /// Expected CRC value stored in the container.
        expected: u32,
        /// CRC computed over the decoded data.
        computed: u32,
    },

    /// Serialized tree is malformed.
    #[error("Invalid Huffman tree at byte {offset}: {message}")]
    InvalidTree {
        /// Offset into the serialized tree.
        offset: u64,
        /// Description of the problem.
        message: String,
    },

    /// Corrupted data in the container.
    #[error("Corrupted data at offset {offset}: {message}")]
    CorruptedData {
        /// Byte offset where corruption was detected.
        offset: u64,
        /// Description of the corruption.
        message: String,
    },

    /// Ran out of bits while decoding.
    #[error("Unexpected end of bitstream at bit position {position}")]
    UnexpectedEof {
        /// Bit position where the stream ended.
        position: u64,
    },

    /// A code path grew past the representable width.
    #[error("Code for symbol {symbol:#04x} is {length} bits long (max {max})")]
    CodeTooLong {
        /// Symbol whose code overflowed.
        symbol: u8,
        /// Length of the offending path.
        length: usize,
        /// Maximum supported code length.
        max: usize,
    },

    /// The encoder met a byte that has no code.
    #[error("Symbol {symbol:#04x} has no code in the table")]
    SymbolNotInTable {
        /// The byte without a code.
        symbol: u8,
    },
}

/// Result type alias for OxiHuff operations.
pub type Result<T> = std::result::Result<T, OxiHuffError>;

impl OxiHuffError {
    /// Create a source-not-found error.
    pub fn source_not_found(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::SourceNotFound {
            path: path.into(),
            source,
        }
    }

    /// Create a source-empty error.
    pub fn source_empty(path: impl Into<PathBuf>) -> Self {
        Self::SourceEmpty { path: path.into() }
    }

    /// Create an invalid magic error.
    pub fn invalid_magic(expected: impl Into<Vec<u8>>, found: impl Into<Vec<u8>>) -> Self {
        Self::InvalidMagic {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a CRC mismatch error.
    pub fn crc_mismatch(expected: u32, computed: u32) -> Self {
        Self::CrcMismatch { expected, computed }
    }

    /// Create an invalid tree error.
    pub fn invalid_tree(offset: u64, message: impl Into<String>) -> Self {
        Self::InvalidTree {
            offset,
            message: message.into(),
        }
    }

    /// Create a corrupted data error.
    pub fn corrupted(offset: u64, message: impl Into<String>) -> Self {
        Self::CorruptedData {
            offset,
            message: message.into(),
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(position: u64) -> Self {
        Self::UnexpectedEof { position }
    }

    /// Whether this error means the container itself is malformed.
    ///
    /// A truncated file surfaces from `read_exact` as an I/O error of kind
    /// `UnexpectedEof`; that counts as corrupt input too.
    pub fn is_corrupt_input(&self) -> bool {
        match self {
            Self::InvalidMagic { .. }
            | Self::UnsupportedVersion { .. }
            | Self::CrcMismatch { .. }
            | Self::InvalidTree { .. }
            | Self::CorruptedData { .. }
            | Self::UnexpectedEof { .. } => true,
            Self::Io(e) => e.kind() == io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}
