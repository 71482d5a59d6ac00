//! # OxiHuff Core
//!
//! Core components for the OxiHuff compressor.
//!
//! This crate provides the building blocks shared by the Huffman engine:
//!
//! - [`bitstream`]: MSB-first bit-level I/O for variable-length codes
//! - [`crc`]: CRC-32 checksum for the container integrity trailer
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Entry points                                        │
//! │     compress(path) / decompress(path)                   │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec + Container                                   │
//! │     Huffman tree, code table, tree codec, payload       │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     BitReader/BitWriter, CRC-32, errors                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxihuff_core::bitstream::{BitReader, BitWriter};
//! use oxihuff_core::crc::Crc32;
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b0001, 4);
//! let bytes = writer.finish();
//! assert_eq!(bytes, vec![0b0001_0000]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b0001);
//!
//! assert_eq!(Crc32::compute(b"Hello, World!"), 0xEC4AC3D0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream;
pub mod crc;
pub mod error;

// Re-exports for convenience
pub use bitstream::{BitReader, BitWriter};
pub use crc::Crc32;
pub use error::{OxiHuffError, Result};
