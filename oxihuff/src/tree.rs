//! Huffman tree stored in an index arena.
//!
//! Every node lives in one `Vec` owned by the tree and is addressed by a
//! [`NodeId`]. An internal node owns its two children by holding their ids;
//! each id appears as a child at most once, so the structure stays a tree.

use crate::frequency::SymbolFrequencyTable;
use crate::queue::NodeQueue;
use crate::tree_codec;
use oxihuff_core::error::{OxiHuffError, Result};
use tracing::debug;

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A leaf holding one symbol, or an internal merge node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// One input symbol.
    Leaf {
        /// The byte value.
        symbol: u8,
        /// Occurrence count (0 for trees rebuilt from a container).
        frequency: u64,
    },
    /// Merge of two subtrees.
    Internal {
        /// Sum of the children's frequencies.
        frequency: u64,
        /// Subtree reached by a `0` bit.
        left: NodeId,
        /// Subtree reached by a `1` bit.
        right: NodeId,
    },
}

impl Node {
    /// Frequency carried by this node.
    pub fn frequency(&self) -> u64 {
        match *self {
            Node::Leaf { frequency, .. } | Node::Internal { frequency, .. } => frequency,
        }
    }

    /// Whether this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A complete Huffman tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Build the tree for `data`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_frequencies(&SymbolFrequencyTable::from_bytes(data))
    }

    /// Build the tree by repeatedly merging the two lowest-frequency nodes.
    ///
    /// The first node removed becomes the left child and the second the
    /// right child; the merged node re-enters the queue behind every node of
    /// equal frequency. With a single distinct symbol the leaf is the root.
    pub fn from_frequencies(table: &SymbolFrequencyTable) -> Result<Self> {
        let symbols = table.in_settle_order();
        if symbols.is_empty() {
            return Err(OxiHuffError::EmptyInput);
        }

        let mut builder = TreeBuilder::with_capacity(2 * symbols.len() - 1);
        let mut queue = NodeQueue::with_capacity(symbols.len());
        for (symbol, frequency) in symbols {
            let id = builder.push(Node::Leaf { symbol, frequency });
            queue.insert(id, frequency);
        }

        let root = loop {
            let first = queue.pop_front().ok_or(OxiHuffError::EmptyInput)?;
            let Some(second) = queue.pop_front() else {
                break first.node;
            };
            let frequency = first.frequency + second.frequency;
            let id = builder.push(Node::Internal {
                frequency,
                left: first.node,
                right: second.node,
            });
            queue.insert(id, frequency);
        };

        let tree = builder.finish(root);
        debug!(
            leaves = tree.leaf_count(),
            nodes = tree.node_count(),
            total = tree.frequency(),
            "built Huffman tree from frequencies"
        );
        Ok(tree)
    }

    /// Rebuild a tree from its serialized preorder form.
    pub fn from_serialized(bytes: &[u8], leaf_count: usize) -> Result<Self> {
        tree_codec::deserialize(bytes, leaf_count)
    }

    /// Id of the root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Whether the root itself is a leaf (single distinct symbol).
    pub fn root_is_leaf(&self) -> bool {
        self.node(self.root).is_leaf()
    }

    /// Frequency of the root, i.e. total symbols for a frequency-built tree.
    pub fn frequency(&self) -> u64 {
        self.node(self.root).frequency()
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match *self.node(id) {
                Node::Leaf { .. } => max = max.max(depth),
                Node::Internal { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max
    }
}

/// Arena under construction; hands out ids for pushed nodes.
#[derive(Debug, Default)]
pub(crate) struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub(crate) fn finish(self, root: NodeId) -> HuffmanTree {
        HuffmanTree {
            nodes: self.nodes,
            root,
        }
    }
}
