//! Compressed container format.
//!
//! ## Legacy layout
//!
//! ```text
//! +----------------+----------------+------------------+-----------------+
//! | numLeaf u64 LE | numChar u64 LE | serialized tree  | packed payload  |
//! +----------------+----------------+------------------+-----------------+
//! ```
//!
//! The tree is `3 * numLeaf - 1` bytes and the payload runs to the end of the
//! file. Nothing identifies or protects the data, so any similar byte stream
//! is accepted.
//!
//! ## Checked layout
//!
//! ```text
//! +--------+-----+---------+---------+------+----------------+---------+-------+
//! | "OXHF" | ver | numLeaf | numChar | tree | payload_len u64| payload | crc32 |
//! +--------+-----+---------+---------+------+----------------+---------+-------+
//! ```
//!
//! The CRC-32 covers the original (decompressed) bytes. A legacy container
//! starts with `numLeaf <= 256` as a little-endian u64, so its first four
//! bytes can never spell the magic and the two layouts are told apart by
//! the first four bytes alone.

use crate::bitstream_codec;
use crate::code_table::CodeTable;
use crate::tree::HuffmanTree;
use crate::tree_codec::{self, MAX_LEAVES};
use oxihuff_core::crc::Crc32;
use oxihuff_core::error::{OxiHuffError, Result};
use std::io::{Cursor, Read, Write};
use tracing::debug;

/// Magic bytes opening a checked container.
pub const MAGIC: [u8; 4] = *b"OXHF";
/// Checked container version written by this build.
pub const VERSION: u8 = 1;

/// On-disk layout of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerFormat {
    /// Magic, version, explicit payload length and CRC-32 trailer.
    #[default]
    Checked,
    /// Counters, tree and payload only.
    Legacy,
}

/// A compressed record: tree, payload and the counts to decode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    leaf_count: usize,
    symbol_count: u64,
    tree: Vec<u8>,
    payload: Vec<u8>,
    /// CRC-32 of the original bytes; present exactly for checked containers.
    checksum: Option<u32>,
}

impl Container {
    /// Compress `data` into a container of the given layout.
    pub fn encode(data: &[u8], format: ContainerFormat) -> Result<Self> {
        Self::encode_counting_bits(data, format).map(|(container, _)| container)
    }

    /// Like [`Container::encode`], also returning the payload length in bits
    /// before padding.
    pub(crate) fn encode_counting_bits(
        data: &[u8],
        format: ContainerFormat,
    ) -> Result<(Self, u64)> {
        let tree = HuffmanTree::from_bytes(data)?;
        let table = CodeTable::from_tree(&tree)?;
        let serialized = tree_codec::serialize(&tree);
        let packed = bitstream_codec::pack(data, &table)?;

        debug!(
            symbols = packed.symbol_count,
            leaves = serialized.leaf_count(),
            bits = packed.bit_len,
            padding = packed.padding_bits(),
            "packed payload"
        );

        let checksum = match format {
            ContainerFormat::Checked => Some(Crc32::compute(data)),
            ContainerFormat::Legacy => None,
        };

        let container = Self {
            leaf_count: serialized.leaf_count(),
            symbol_count: packed.symbol_count,
            tree: serialized.into_bytes(),
            payload: packed.bytes,
            checksum,
        };
        Ok((container, packed.bit_len))
    }

    /// Rebuild the tree and decode the original bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let tree = tree_codec::deserialize(&self.tree, self.leaf_count)?;
        let data = bitstream_codec::decode(&tree, &self.payload, self.symbol_count)?;

        if let Some(expected) = self.checksum {
            let computed = Crc32::compute(&data);
            if computed != expected {
                return Err(OxiHuffError::crc_mismatch(expected, computed));
            }
        }

        Ok(data)
    }

    /// Layout this container is written in.
    pub fn format(&self) -> ContainerFormat {
        if self.checksum.is_some() {
            ContainerFormat::Checked
        } else {
            ContainerFormat::Legacy
        }
    }

    /// Number of leaves in the stored tree (`numLeaf`).
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Number of encoded symbols (`numChar`).
    pub fn symbol_count(&self) -> u64 {
        self.symbol_count
    }

    /// Serialized tree bytes.
    pub fn tree_bytes(&self) -> &[u8] {
        &self.tree
    }

    /// Packed payload bytes, including padding.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Stored CRC-32 of the original bytes, for checked containers.
    pub fn checksum(&self) -> Option<u32> {
        self.checksum
    }

    /// Size of the container once written.
    pub fn encoded_len(&self) -> usize {
        let body = 16 + self.tree.len() + self.payload.len();
        match self.format() {
            ContainerFormat::Checked => MAGIC.len() + 1 + body + 8 + 4,
            ContainerFormat::Legacy => body,
        }
    }

    /// Write the container in its layout.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        if self.checksum.is_some() {
            writer.write_all(&MAGIC)?;
            writer.write_all(&[VERSION])?;
        }

        writer.write_all(&(self.leaf_count as u64).to_le_bytes())?;
        writer.write_all(&self.symbol_count.to_le_bytes())?;
        writer.write_all(&self.tree)?;

        match self.checksum {
            Some(crc) => {
                writer.write_all(&(self.payload.len() as u64).to_le_bytes())?;
                writer.write_all(&self.payload)?;
                writer.write_all(&crc.to_le_bytes())?;
            }
            None => writer.write_all(&self.payload)?,
        }

        Ok(())
    }

    /// Serialize into a new byte vector.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut out);
        out
    }

    /// Read a container of either layout.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut head = [0u8; 4];
        reader.read_exact(&mut head)?;

        if head == MAGIC {
            debug!("detected checked container");
            return Self::read_checked_body(reader);
        }

        let mut rest = [0u8; 4];
        reader.read_exact(&mut rest)?;
        let mut raw = [0u8; 8];
        raw[..4].copy_from_slice(&head);
        raw[4..].copy_from_slice(&rest);
        debug!("no magic, reading legacy container");
        Self::read_legacy_body(reader, u64::from_le_bytes(raw))
    }

    /// Read a checked container, refusing the legacy layout.
    pub fn read_checked<R: Read>(reader: &mut R) -> Result<Self> {
        let mut head = [0u8; 4];
        reader.read_exact(&mut head)?;
        if head != MAGIC {
            return Err(OxiHuffError::invalid_magic(MAGIC, head));
        }
        Self::read_checked_body(reader)
    }

    /// Parse a container of either layout from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(&mut Cursor::new(bytes))
    }

    fn read_legacy_body<R: Read>(reader: &mut R, raw_leaf_count: u64) -> Result<Self> {
        let leaf_count = checked_leaf_count(raw_leaf_count)?;
        let symbol_count = read_u64(reader)?;
        let tree = tree_codec::read_serialized(reader, leaf_count)?;

        let mut payload = Vec::new();
        reader.read_to_end(&mut payload)?;

        Ok(Self {
            leaf_count,
            symbol_count,
            tree,
            payload,
            checksum: None,
        })
    }

    fn read_checked_body<R: Read>(reader: &mut R) -> Result<Self> {
        let mut version = [0u8; 1];
        reader.read_exact(&mut version)?;
        if version[0] != VERSION {
            return Err(OxiHuffError::UnsupportedVersion {
                version: version[0],
            });
        }

        let leaf_count = checked_leaf_count(read_u64(reader)?)?;
        let symbol_count = read_u64(reader)?;
        let tree = tree_codec::read_serialized(reader, leaf_count)?;

        let payload_offset = (MAGIC.len() + 1 + 16 + tree.len() + 8) as u64;
        let payload_len = read_u64(reader)?;
        let mut payload = Vec::new();
        reader.by_ref().take(payload_len).read_to_end(&mut payload)?;
        if (payload.len() as u64) < payload_len {
            return Err(OxiHuffError::corrupted(
                payload_offset + payload.len() as u64,
                format!("payload truncated: {} of {payload_len} bytes", payload.len()),
            ));
        }

        let mut crc = [0u8; 4];
        reader.read_exact(&mut crc)?;

        let mut extra = [0u8; 1];
        if reader.read(&mut extra)? != 0 {
            return Err(OxiHuffError::corrupted(
                payload_offset + payload_len + 4,
                "trailing bytes after checksum",
            ));
        }

        Ok(Self {
            leaf_count,
            symbol_count,
            tree,
            payload,
            checksum: Some(u32::from_le_bytes(crc)),
        })
    }
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut bytes = [0u8; 8];
    reader.read_exact(&mut bytes)?;
    Ok(u64::from_le_bytes(bytes))
}

fn checked_leaf_count(raw: u64) -> Result<usize> {
    match usize::try_from(raw) {
        Ok(n) if (1..=MAX_LEAVES).contains(&n) => Ok(n),
        _ => Err(OxiHuffError::invalid_tree(
            0,
            format!("leaf count {raw} outside 1..={MAX_LEAVES}"),
        )),
    }
}
