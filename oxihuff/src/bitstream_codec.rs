//! Payload packing and tree-walk decoding.

use crate::code_table::{Code, CodeTable};
use crate::tree::{HuffmanTree, Node};
use oxihuff_core::bitstream::{BitReader, BitWriter};
use oxihuff_core::error::{OxiHuffError, Result};

/// Widest chunk `BitWriter::write_bits` accepts.
const WRITE_CHUNK: usize = 56;

/// Encoded payload bytes and the counts needed to decode them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBits {
    /// Code bits packed MSB-first, zero-padded to a whole byte.
    pub bytes: Vec<u8>,
    /// Number of code bits, excluding padding.
    pub bit_len: u64,
    /// Number of symbols encoded.
    pub symbol_count: u64,
}

impl PackedBits {
    /// Number of zero bits appended after the last code.
    pub fn padding_bits(&self) -> u64 {
        self.bytes.len() as u64 * 8 - self.bit_len
    }
}

/// Append each byte's code and pad the result to a byte boundary.
pub fn pack(data: &[u8], table: &CodeTable) -> Result<PackedBits> {
    let mut writer = BitWriter::with_capacity(data.len() / 2 + 1);
    for &symbol in data {
        let code = table
            .get(symbol)
            .ok_or(OxiHuffError::SymbolNotInTable { symbol })?;
        write_code(&mut writer, code);
    }

    let bit_len = writer.bits_written();
    Ok(PackedBits {
        bytes: writer.finish(),
        bit_len,
        symbol_count: data.len() as u64,
    })
}

fn write_code(writer: &mut BitWriter, code: Code) {
    let mut remaining = code.len();
    while remaining > 0 {
        let take = remaining.min(WRITE_CHUNK);
        let shift = remaining - take;
        let chunk = (code.value() >> shift) as u64 & ((1u64 << take) - 1);
        writer.write_bits(chunk, take as u8);
        remaining = shift;
    }
}

/// Expand bytes into their bits, most significant bit first.
pub fn unpack_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
        .collect()
}

/// Decode exactly `symbol_count` symbols by walking `tree` from the root.
///
/// The count, not the end of `payload`, ends decoding, so padding bits are
/// never read as a path even when they happen to spell one.
pub fn decode(tree: &HuffmanTree, payload: &[u8], symbol_count: u64) -> Result<Vec<u8>> {
    // Every symbol costs at least one bit.
    let available = payload.len() as u64 * 8;
    if symbol_count > available {
        return Err(OxiHuffError::corrupted(
            0,
            format!("{symbol_count} symbols cannot fit in {available} payload bits"),
        ));
    }

    let mut reader = BitReader::new(payload);
    let mut output = Vec::with_capacity(symbol_count as usize);
    let root = tree.root();

    if let Node::Leaf { symbol, .. } = *tree.node(root) {
        for _ in 0..symbol_count {
            reader.read_bit()?;
            output.push(symbol);
        }
        return Ok(output);
    }

    for _ in 0..symbol_count {
        let mut id = root;
        loop {
            match *tree.node(id) {
                Node::Leaf { symbol, .. } => {
                    output.push(symbol);
                    break;
                }
                Node::Internal { left, right, .. } => {
                    id = if reader.read_bit()? { right } else { left };
                }
            }
        }
    }

    Ok(output)
}
