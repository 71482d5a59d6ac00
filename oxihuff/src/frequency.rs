//! Byte frequency collection.

/// Occurrence counts for every byte value seen in a source.
///
/// Besides the count, the table remembers where each symbol last occurred.
/// The queue uses that position to order symbols of equal frequency: a
/// symbol reaches its final count at its last occurrence, and that is the
/// moment it settles behind its equal-frequency peers.
#[derive(Debug, Clone)]
pub struct SymbolFrequencyTable {
    counts: [u64; 256],
    last_seen: [u64; 256],
    total: u64,
}

impl SymbolFrequencyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            counts: [0; 256],
            last_seen: [0; 256],
            total: 0,
        }
    }

    /// Count every byte of `data` in a single pass.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.update(data);
        table
    }

    /// Count more bytes, continuing positions from earlier updates.
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[byte as usize] += 1;
            self.last_seen[byte as usize] = self.total;
            self.total += 1;
        }
    }

    /// Occurrence count of `symbol`.
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct byte values seen.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    /// Whether no symbol has been counted.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Present symbols with their counts, ordered by last occurrence.
    pub fn in_settle_order(&self) -> Vec<(u8, u64)> {
        let mut symbols: Vec<(u8, u64)> = (0..=255u8)
            .filter(|&s| self.counts[s as usize] > 0)
            .map(|s| (s, self.counts[s as usize]))
            .collect();
        symbols.sort_by_key(|&(s, _)| self.last_seen[s as usize]);
        symbols
    }
}

impl Default for SymbolFrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let table = SymbolFrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(table.count(b'a'), 5);
        assert_eq!(table.count(b'b'), 2);
        assert_eq!(table.count(b'r'), 2);
        assert_eq!(table.count(b'c'), 1);
        assert_eq!(table.count(b'd'), 1);
        assert_eq!(table.count(b'z'), 0);
        assert_eq!(table.total(), 11);
        assert_eq!(table.distinct(), 5);
    }

    #[test]
    fn test_settle_order() {
        // last occurrences: c@4, d@6, b@8, r@9, a@10
        let table = SymbolFrequencyTable::from_bytes(b"abracadabra");
        let order: Vec<u8> = table.in_settle_order().iter().map(|&(s, _)| s).collect();
        assert_eq!(order, b"cdbra".to_vec());
    }

    #[test]
    fn test_incremental_update_matches_single_pass() {
        let mut table = SymbolFrequencyTable::new();
        table.update(b"abra");
        table.update(b"cadabra");
        let single = SymbolFrequencyTable::from_bytes(b"abracadabra");
        assert_eq!(table.in_settle_order(), single.in_settle_order());
        assert_eq!(table.total(), single.total());
    }

    #[test]
    fn test_empty() {
        let table = SymbolFrequencyTable::default();
        assert!(table.is_empty());
        assert_eq!(table.distinct(), 0);
        assert!(table.in_settle_order().is_empty());
    }

    #[test]
    fn test_null_byte_is_a_symbol() {
        let table = SymbolFrequencyTable::from_bytes(&[0, 0, 1]);
        assert_eq!(table.count(0), 2);
        assert_eq!(table.distinct(), 2);
    }
}
