//! Symbol frequency counting.
//!
//! Symbols are single bytes. Multi-byte text encodings are treated as
//! their individual code units.

/// Occurrence count of every byte value present in an input.
///
/// Only symbols with a non-zero count are reported by [`FrequencyTable::iter`],
/// always in ascending symbol order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; 256],
    distinct: usize,
}

impl FrequencyTable {
    /// Count every byte of `data`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut counts = [0u64; 256];
        for &byte in data {
            counts[byte as usize] += 1;
        }
        let distinct = counts.iter().filter(|&&c| c > 0).count();

        Self { counts, distinct }
    }

    /// Number of occurrences of `symbol` (0 if absent).
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.distinct
    }

    pub fn is_empty(&self) -> bool {
        self.distinct == 0
    }

    /// Sum of all counts, equal to the input length.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Iterate `(symbol, count)` pairs with non-zero counts.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0u8..=255)
            .zip(self.counts.iter().copied())
            .filter(|&(_, count)| count > 0)
    }
}
