//! Frequency-ordered work queue for tree construction.

use crate::tree::NodeId;
use std::collections::VecDeque;

/// A node waiting to be merged, with the frequency it is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    /// Arena id of the node.
    pub node: NodeId,
    /// Frequency of the node (sum of its leaves).
    pub frequency: u64,
}

/// Nodes sorted ascending by frequency.
///
/// An inserted node goes immediately before the first entry with a strictly
/// greater frequency, so equal frequencies keep insertion order. The tree
/// shape, and therefore the exact output bytes, depend on that tie-break.
#[derive(Debug, Clone, Default)]
pub struct NodeQueue {
    entries: VecDeque<QueueEntry>,
}

impl NodeQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty queue with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Insert `node` behind every entry whose frequency is `<= frequency`.
    pub fn insert(&mut self, node: NodeId, frequency: u64) {
        let index = self.entries.partition_point(|e| e.frequency <= frequency);
        self.entries.insert(index, QueueEntry { node, frequency });
    }

    /// Remove the lowest-frequency entry.
    pub fn pop_front(&mut self) -> Option<QueueEntry> {
        self.entries.pop_front()
    }

    /// Number of queued nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries front to back.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::SymbolFrequencyTable;

    /// Literal per-byte model: look the symbol up, detach it, bump its count
    /// and re-insert it before the first strictly greater entry.
    fn register_per_byte(data: &[u8]) -> Vec<(u8, u64)> {
        let mut list: Vec<(u8, u64)> = Vec::new();
        for &byte in data {
            let entry = match list.iter().position(|&(s, _)| s == byte) {
                Some(pos) => {
                    let (s, f) = list.remove(pos);
                    (s, f + 1)
                }
                None => (byte, 1),
            };
            let index = list
                .iter()
                .position(|&(_, f)| f > entry.1)
                .unwrap_or(list.len());
            list.insert(index, entry);
        }
        list
    }

    fn queue_order(data: &[u8]) -> Vec<(u8, u64)> {
        let symbols = SymbolFrequencyTable::from_bytes(data).in_settle_order();
        let mut queue = NodeQueue::with_capacity(symbols.len());
        for (i, &(_, count)) in symbols.iter().enumerate() {
            queue.insert(NodeId::new(i), count);
        }
        let mut order = Vec::new();
        while let Some(entry) = queue.pop_front() {
            order.push((symbols[entry.node.index()].0, entry.frequency));
        }
        order
    }

    #[test]
    fn test_sorted_with_stable_ties() {
        let mut queue = NodeQueue::new();
        queue.insert(NodeId::new(0), 5);
        queue.insert(NodeId::new(1), 2);
        queue.insert(NodeId::new(2), 5);
        queue.insert(NodeId::new(3), 1);
        queue.insert(NodeId::new(4), 2);

        let order: Vec<usize> = queue.iter().map(|e| e.node.index()).collect();
        assert_eq!(order, vec![3, 1, 4, 0, 2]);
        assert_eq!(queue.len(), 5);
    }

    #[test]
    fn test_pop_front() {
        let mut queue = NodeQueue::new();
        assert!(queue.pop_front().is_none());
        queue.insert(NodeId::new(7), 3);
        let entry = queue.pop_front().unwrap();
        assert_eq!(entry.node, NodeId::new(7));
        assert_eq!(entry.frequency, 3);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_matches_per_byte_registration() {
        let samples: [&[u8]; 6] = [
            b"aaab",
            b"abba",
            b"abracadabra",
            b"mississippi river",
            b"The quick brown fox jumps over the lazy dog",
            &[0, 1, 2, 0, 1, 0, 255, 255, 2, 2],
        ];
        for sample in samples {
            assert_eq!(queue_order(sample), register_per_byte(sample), "{sample:?}");
        }
    }

    #[test]
    fn test_reinsertion_moves_symbol_behind_peers() {
        // 'a' reaches count 2 after 'b' does, so it settles behind it
        assert_eq!(queue_order(b"abba"), vec![(b'b', 2), (b'a', 2)]);
    }
}
