//! Preorder tree serialization.
//!
//! A leaf is written as the flag byte `b'1'` followed by its symbol; an
//! internal node is the flag byte `b'0'` followed by its left and then its
//! right subtree. There is no end marker. A symbol byte may itself equal
//! either flag, so a reader must count leaves to know where the tree ends:
//! a full binary tree with `n` leaves serializes to exactly `3n - 1` bytes.

use crate::tree::{HuffmanTree, Node, NodeId, TreeBuilder};
use oxihuff_core::error::{OxiHuffError, Result};
use std::io::{self, Read};

/// Flag byte for an internal node.
pub const INTERNAL_FLAG: u8 = b'0';
/// Flag byte for a leaf; the symbol byte follows.
pub const LEAF_FLAG: u8 = b'1';
/// Most leaves a byte alphabet can produce.
pub const MAX_LEAVES: usize = 256;

/// Serialized form of a tree plus the number of leaves it holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializedTree {
    bytes: Vec<u8>,
    leaf_count: usize,
}

impl SerializedTree {
    /// Flag and symbol bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume and return the flag and symbol bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Number of leaf markers written.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }
}

/// Serialized size of a tree with `leaf_count` leaves.
pub fn serialized_len(leaf_count: usize) -> usize {
    3 * leaf_count - 1
}

fn check_leaf_count(leaf_count: usize) -> Result<()> {
    if leaf_count == 0 || leaf_count > MAX_LEAVES {
        return Err(OxiHuffError::invalid_tree(
            0,
            format!("leaf count {leaf_count} outside 1..={MAX_LEAVES}"),
        ));
    }
    Ok(())
}

/// Serialize `tree` in preorder, counting leaves on the way.
pub fn serialize(tree: &HuffmanTree) -> SerializedTree {
    let mut out = SerializedTree {
        bytes: Vec::with_capacity(tree.node_count() + tree.leaf_count()),
        leaf_count: 0,
    };
    write_node(tree, tree.root(), &mut out);
    out
}

fn write_node(tree: &HuffmanTree, id: NodeId, out: &mut SerializedTree) {
    match *tree.node(id) {
        Node::Leaf { symbol, .. } => {
            out.bytes.push(LEAF_FLAG);
            out.bytes.push(symbol);
            out.leaf_count += 1;
        }
        Node::Internal { left, right, .. } => {
            out.bytes.push(INTERNAL_FLAG);
            write_node(tree, left, out);
            write_node(tree, right, out);
        }
    }
}

/// Read a serialized tree of `leaf_count` leaves from storage.
///
/// Stops right after the last leaf's symbol byte, leaving the reader at the
/// start of whatever follows the tree.
pub fn read_serialized<R: Read>(reader: &mut R, leaf_count: usize) -> Result<Vec<u8>> {
    check_leaf_count(leaf_count)?;

    let mut bytes = Vec::with_capacity(serialized_len(leaf_count));
    let mut leaves = 0;
    let mut internals = 0;

    while leaves < leaf_count {
        let offset = bytes.len() as u64;
        let flag = read_byte(reader, offset)?;
        bytes.push(flag);
        match flag {
            LEAF_FLAG => {
                bytes.push(read_byte(reader, offset + 1)?);
                leaves += 1;
            }
            INTERNAL_FLAG => {
                internals += 1;
                if internals >= leaf_count {
                    return Err(OxiHuffError::invalid_tree(
                        offset,
                        format!("more than {} internal nodes", leaf_count - 1),
                    ));
                }
            }
            other => {
                return Err(OxiHuffError::invalid_tree(
                    offset,
                    format!("unknown node flag {other:#04x}"),
                ));
            }
        }
    }

    Ok(bytes)
}

fn read_byte<R: Read>(reader: &mut R, offset: u64) -> Result<u8> {
    let mut byte = [0u8; 1];
    reader.read_exact(&mut byte).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            OxiHuffError::invalid_tree(offset, "tree truncated")
        } else {
            e.into()
        }
    })?;
    Ok(byte[0])
}

/// Rebuild a tree from its serialized form.
///
/// Every structural problem is reported as [`OxiHuffError::InvalidTree`]:
/// wrong length, unknown flags, duplicate symbols, or a preorder walk that
/// does not end exactly at the last byte.
pub fn deserialize(bytes: &[u8], leaf_count: usize) -> Result<HuffmanTree> {
    check_leaf_count(leaf_count)?;

    let expected = serialized_len(leaf_count);
    if bytes.len() != expected {
        return Err(OxiHuffError::invalid_tree(
            bytes.len().min(expected) as u64,
            format!(
                "{} bytes for {leaf_count} leaves, expected {expected}",
                bytes.len()
            ),
        ));
    }

    let mut parser = TreeParser::new(bytes, leaf_count);
    let root = parser.parse_node()?;
    if parser.pos != bytes.len() {
        return Err(OxiHuffError::invalid_tree(
            parser.pos as u64,
            "trailing bytes after root subtree",
        ));
    }
    if parser.leaves != leaf_count {
        return Err(OxiHuffError::invalid_tree(
            parser.pos as u64,
            format!("found {} leaves, expected {leaf_count}", parser.leaves),
        ));
    }

    Ok(parser.builder.finish(root))
}

/// Cursor over serialized bytes; the position is shared by both subtrees.
struct TreeParser<'a> {
    bytes: &'a [u8],
    pos: usize,
    leaf_count: usize,
    leaves: usize,
    internals: usize,
    seen: [bool; 256],
    builder: TreeBuilder,
}

impl<'a> TreeParser<'a> {
    fn new(bytes: &'a [u8], leaf_count: usize) -> Self {
        Self {
            bytes,
            pos: 0,
            leaf_count,
            leaves: 0,
            internals: 0,
            seen: [false; 256],
            builder: TreeBuilder::with_capacity(2 * leaf_count - 1),
        }
    }

    fn next_byte(&mut self) -> Result<u8> {
        let byte = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| OxiHuffError::invalid_tree(self.pos as u64, "tree truncated"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn parse_node(&mut self) -> Result<NodeId> {
        let offset = self.pos as u64;
        match self.next_byte()? {
            LEAF_FLAG => {
                let symbol = self.next_byte()?;
                if std::mem::replace(&mut self.seen[symbol as usize], true) {
                    return Err(OxiHuffError::invalid_tree(
                        offset,
                        format!("symbol {symbol:#04x} appears in two leaves"),
                    ));
                }
                self.leaves += 1;
                if self.leaves > self.leaf_count {
                    return Err(OxiHuffError::invalid_tree(offset, "too many leaves"));
                }
                Ok(self.builder.push(Node::Leaf {
                    symbol,
                    frequency: 0,
                }))
            }
            INTERNAL_FLAG => {
                self.internals += 1;
                if self.internals >= self.leaf_count {
                    return Err(OxiHuffError::invalid_tree(offset, "too many internal nodes"));
                }
                let left = self.parse_node()?;
                let right = self.parse_node()?;
                Ok(self.builder.push(Node::Internal {
                    frequency: 0,
                    left,
                    right,
                }))
            }
            other => Err(OxiHuffError::invalid_tree(
                offset,
                format!("unknown node flag {other:#04x}"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_serialize_two_leaves() {
        let tree = HuffmanTree::from_bytes(b"aaab").unwrap();
        let serialized = serialize(&tree);
        assert_eq!(serialized.as_bytes(), b"01b1a");
        assert_eq!(serialized.leaf_count(), 2);
    }

    #[test]
    fn test_serialize_single_leaf() {
        let tree = HuffmanTree::from_bytes(b"xxx").unwrap();
        let serialized = serialize(&tree);
        assert_eq!(serialized.as_bytes(), b"1x");
        assert_eq!(serialized.leaf_count(), 1);

        let rebuilt = deserialize(serialized.as_bytes(), 1).unwrap();
        assert!(rebuilt.root_is_leaf());
    }

    #[test]
    fn test_structure_survives_roundtrip() {
        let tree = HuffmanTree::from_bytes(b"she sells sea shells by the sea shore").unwrap();
        let serialized = serialize(&tree);
        assert_eq!(serialized.as_bytes().len(), serialized_len(tree.leaf_count()));

        let rebuilt = deserialize(serialized.as_bytes(), serialized.leaf_count()).unwrap();
        assert_eq!(rebuilt.leaf_count(), tree.leaf_count());
        assert_eq!(rebuilt.depth(), tree.depth());
        assert_eq!(serialize(&rebuilt), serialized);
    }

    #[test]
    fn test_symbols_that_look_like_flags() {
        // '0' and '1' as symbols must not confuse the leaf-bounded reader
        let tree = HuffmanTree::from_bytes(b"0001111011").unwrap();
        let serialized = serialize(&tree);
        let mut stream = serialized.as_bytes().to_vec();
        stream.extend_from_slice(b"\xFFpayload");

        let mut cursor = Cursor::new(&stream);
        let read = read_serialized(&mut cursor, serialized.leaf_count()).unwrap();
        assert_eq!(read, serialized.as_bytes());
        assert_eq!(cursor.position() as usize, serialized.as_bytes().len());
    }

    #[test]
    fn test_read_rejects_unknown_flag() {
        let mut cursor = Cursor::new(b"0x1a1b".to_vec());
        let err = read_serialized(&mut cursor, 2).unwrap_err();
        assert!(matches!(err, OxiHuffError::InvalidTree { offset: 1, .. }));
    }

    #[test]
    fn test_read_bounds_internal_nodes() {
        let mut cursor = Cursor::new(b"00000000".to_vec());
        let err = read_serialized(&mut cursor, 3).unwrap_err();
        assert!(matches!(err, OxiHuffError::InvalidTree { .. }));
    }

    #[test]
    fn test_read_truncated() {
        let mut cursor = Cursor::new(b"01a1".to_vec());
        let err = read_serialized(&mut cursor, 2).unwrap_err();
        assert!(err.is_corrupt_input());
    }

    #[test]
    fn test_leaf_count_bounds() {
        assert!(deserialize(b"", 0).is_err());
        let mut cursor = Cursor::new(Vec::new());
        assert!(read_serialized(&mut cursor, 257).is_err());
    }

    #[test]
    fn test_deserialize_rejects_duplicate_symbol() {
        let err = deserialize(b"01a1a", 2).unwrap_err();
        assert!(matches!(err, OxiHuffError::InvalidTree { offset: 3, .. }));
    }

    #[test]
    fn test_deserialize_rejects_trailing_leaf() {
        // root leaf followed by more bytes of the right total length
        let err = deserialize(b"1a1b0", 2).unwrap_err();
        assert!(matches!(err, OxiHuffError::InvalidTree { .. }));
    }

    #[test]
    fn test_deserialize_rejects_wrong_length() {
        let err = deserialize(b"01a1b1c", 2).unwrap_err();
        assert!(matches!(err, OxiHuffError::InvalidTree { .. }));
    }
}
