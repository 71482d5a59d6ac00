//! # OxiHuff: Pure Rust Static Huffman Compression
//!
//! This crate compresses a file into a sibling container file using a
//! static Huffman code built from the file's own byte frequencies, and
//! restores the original bytes from that container.
//!
//! ## Features
//!
//! - **Pure Rust**: No C dependencies, 100% safe Rust
//! - **Self-describing**: The container carries the serialized tree, so no
//!   side channel is needed to decode
//! - **Deterministic**: Equal frequencies are ordered by last occurrence, so
//!   the same input always produces the same container
//! - **Integrity**: The default layout carries a magic header, a version
//!   byte, an explicit payload length and a CRC-32 of the original bytes
//! - **Legacy layout**: The bare `numLeaf | numChar | tree | payload` layout
//!   can still be written and is read transparently
//!
//! ## Pipeline
//!
//! ```text
//! bytes ─► SymbolFrequencyTable ─► NodeQueue ─► HuffmanTree ─► CodeTable
//!                                                    │              │
//!                                                    ▼              ▼
//!                                              tree_codec    bitstream_codec
//!                                                    └──── Container ────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxihuff::{decode, encode};
//!
//! let original = b"she sells sea shells by the sea shore";
//!
//! let compressed = encode(original).unwrap();
//! let decompressed = decode(&compressed).unwrap();
//!
//! assert_eq!(decompressed, original);
//! ```
//!
//! ## Files
//!
//! ```rust,no_run
//! use oxihuff::{compress, decompress};
//!
//! // Writes notes.txt.compressed.huffman next to notes.txt
//! assert!(compress("notes.txt"));
//!
//! // Writes notes.txt.compressed.huffman.decompressed.txt
//! assert!(decompress("notes.txt.compressed.huffman"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod bitstream_codec;
pub mod code_table;
pub mod config;
pub mod container;
mod engine;
pub mod frequency;
pub mod queue;
pub mod tree;
pub mod tree_codec;

pub use code_table::{Code, CodeTable, MAX_CODE_LENGTH};
pub use config::HuffmanConfig;
pub use container::{Container, ContainerFormat};
pub use engine::{
    CompressStats, compress, compress_file, compress_to, decode, decompress, decompress_file,
    decompress_to, encode, encode_with,
};
pub use frequency::SymbolFrequencyTable;
pub use oxihuff_core::{OxiHuffError, Result};
pub use queue::NodeQueue;
pub use tree::{HuffmanTree, Node, NodeId};
