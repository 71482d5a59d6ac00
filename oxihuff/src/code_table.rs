//! Symbol to code mapping derived from a tree.

use crate::tree::{HuffmanTree, Node, NodeId};
use oxihuff_core::error::{OxiHuffError, Result};
use std::fmt;

/// Maximum code length in bits.
///
/// A leaf at depth `d` needs a total frequency of at least Fib(d + 1), so
/// any input whose length fits in a `u64` stays well below this.
pub const MAX_CODE_LENGTH: usize = 128;

/// A root-to-leaf path: `0` for left, `1` for right.
///
/// The first step of the path is the most significant of the `len` low bits
/// of `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    value: u128,
    len: u8,
}

impl Code {
    /// Path bits packed MSB-first in the low `len()` bits.
    pub fn value(&self) -> u128 {
        self.value
    }

    /// Number of bits in the code.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the code has no bits (never true for a table entry).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate the path bits from root to leaf.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).rev().map(move |i| (self.value >> i) & 1 == 1)
    }

    /// Whether `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len == 0 {
            return true;
        }
        self.len <= other.len && (other.value >> (other.len - self.len)) == self.value
    }

    /// Render as a string of `'0'` and `'1'`.
    pub fn to_bit_string(&self) -> String {
        self.bits().map(|b| if b { '1' } else { '0' }).collect()
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_string())
    }
}

/// Codes for every symbol present in a tree.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: [Option<Code>; 256],
    len: usize,
}

impl CodeTable {
    /// Walk the tree depth-first and record each leaf's path.
    ///
    /// A tree whose root is a leaf gives its only symbol the code `0`, so
    /// every encoded symbol still occupies one bit.
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        let mut table = Self {
            codes: [None; 256],
            len: 0,
        };

        if let Node::Leaf { symbol, .. } = *tree.node(tree.root()) {
            table.insert(symbol, Code { value: 0, len: 1 });
            return Ok(table);
        }

        table.assign(tree, tree.root(), 0, 0)?;
        Ok(table)
    }

    fn assign(&mut self, tree: &HuffmanTree, id: NodeId, value: u128, depth: usize) -> Result<()> {
        match *tree.node(id) {
            Node::Leaf { symbol, .. } => {
                if depth > MAX_CODE_LENGTH {
                    return Err(OxiHuffError::CodeTooLong {
                        symbol,
                        length: depth,
                        max: MAX_CODE_LENGTH,
                    });
                }
                self.insert(
                    symbol,
                    Code {
                        value,
                        len: depth as u8,
                    },
                );
                Ok(())
            }
            Node::Internal { left, right, .. } => {
                self.assign(tree, left, value << 1, depth + 1)?;
                self.assign(tree, right, (value << 1) | 1, depth + 1)
            }
        }
    }

    fn insert(&mut self, symbol: u8, code: Code) {
        if self.codes[symbol as usize].replace(code).is_none() {
            self.len += 1;
        }
    }

    /// Code for `symbol`, if it occurs in the tree.
    pub fn get(&self, symbol: u8) -> Option<Code> {
        self.codes[symbol as usize]
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate `(symbol, code)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(s, c)| c.map(|c| (s as u8, c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(data: &[u8]) -> CodeTable {
        CodeTable::from_tree(&HuffmanTree::from_bytes(data).unwrap()).unwrap()
    }

    #[test]
    fn test_two_symbol_codes() {
        let table = table_for(b"aaab");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(b'b').unwrap().to_bit_string(), "0");
        assert_eq!(table.get(b'a').unwrap().to_bit_string(), "1");
        assert!(table.get(b'c').is_none());
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let table = table_for(b"qqqq");
        let code = table.get(b'q').unwrap();
        assert_eq!(code.len(), 1);
        assert_eq!(code.to_string(), "0");
    }

    #[test]
    fn test_codes_follow_tree_paths() {
        // root = (c, (a, b))
        let table = table_for(b"abcc");
        assert_eq!(table.get(b'c').unwrap().to_string(), "0");
        assert_eq!(table.get(b'a').unwrap().to_string(), "10");
        assert_eq!(table.get(b'b').unwrap().to_string(), "11");
    }

    #[test]
    fn test_prefix_free() {
        let table = table_for(b"this is an example of a huffman tree");
        let codes: Vec<(u8, Code)> = table.iter().collect();
        for (i, (a, ca)) in codes.iter().enumerate() {
            for (b, cb) in &codes[i + 1..] {
                assert!(!ca.is_prefix_of(cb), "{} prefixes {}", *a as char, *b as char);
                assert!(!cb.is_prefix_of(ca), "{} prefixes {}", *b as char, *a as char);
            }
        }
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let mut data = vec![b'e'; 100];
        data.extend_from_slice(b"xyz");
        let table = table_for(&data);
        let e = table.get(b'e').unwrap().len();
        for s in *b"xyz" {
            assert!(table.get(s).unwrap().len() > e);
        }
    }

    #[test]
    fn test_is_prefix_of() {
        let short = Code { value: 0b10, len: 2 };
        let long = Code {
            value: 0b1011,
            len: 4,
        };
        assert!(short.is_prefix_of(&long));
        assert!(!long.is_prefix_of(&short));
        assert!(short.is_prefix_of(&short));
        assert_eq!(long.bits().collect::<Vec<_>>(), vec![true, false, true, true]);
    }
}
