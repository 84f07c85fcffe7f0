//! Huffman tree construction and code assignment.
//!
//! The tree is built greedily from a [`FrequencyTable`]: the two lightest
//! nodes are merged until one root remains. Codes are read off root-to-leaf
//! paths, `0` for a left edge and `1` for a right edge.
//!
//! # Tie-breaking
//!
//! Nodes of equal weight are ordered by creation sequence: leaves in
//! ascending symbol order first, then merged nodes in the order they were
//! made. The same input therefore always yields the same tree. The decoder
//! never rebuilds this tree; it rebuilds its own from the transmitted codes,
//! so the tie-break is not part of the wire contract.

use crate::codebook::{Code, Codebook};
use crate::frequency::FrequencyTable;
use log::trace;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// A node of a Huffman tree.
///
/// Internal nodes always have exactly two children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        left: Box<HuffmanNode>,
        right: Box<HuffmanNode>,
        weight: u64,
    },
}

impl HuffmanNode {
    /// Sum of the leaf frequencies below this node.
    pub fn weight(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { weight, .. } | HuffmanNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    fn merge(left: HuffmanNode, right: HuffmanNode) -> Self {
        let weight = left.weight() + right.weight();
        HuffmanNode::Internal {
            left: Box::new(left),
            right: Box::new(right),
            weight,
        }
    }
}

/// Heap entry ordered by `(weight, sequence)`.
#[derive(Debug)]
struct Pending {
    weight: u64,
    sequence: usize,
    node: HuffmanNode,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .cmp(&other.weight)
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// A Huffman tree built from symbol frequencies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffmanNode,
}

impl HuffmanTree {
    /// Build the tree for `frequencies`.
    ///
    /// Returns `None` for an empty table: there is nothing to code.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Option<Self> {
        // Min-heap via Reverse
        let mut heap: BinaryHeap<Reverse<Pending>> = frequencies
            .iter()
            .enumerate()
            .map(|(sequence, (symbol, weight))| {
                Reverse(Pending {
                    weight,
                    sequence,
                    node: HuffmanNode::Leaf { symbol, weight },
                })
            })
            .collect();

        let mut sequence = heap.len();

        loop {
            let Reverse(first) = heap.pop()?;
            let Some(Reverse(second)) = heap.pop() else {
                return Some(Self { root: first.node });
            };

            trace!(
                "merging nodes of weight {} and {} (seq {})",
                first.weight,
                second.weight,
                sequence
            );

            let node = HuffmanNode::merge(first.node, second.node);
            heap.push(Reverse(Pending {
                weight: node.weight(),
                sequence,
                node,
            }));
            sequence += 1;
        }
    }

    pub fn root(&self) -> &HuffmanNode {
        &self.root
    }

    /// Walk the tree and assign every leaf its path as a code.
    ///
    /// A tree that is a single leaf (one distinct symbol) gets the one-bit
    /// code `0`, as if the leaf hung off the left of a synthetic root.
    ///
    /// The walk uses an explicit stack, so heavily skewed trees cannot
    /// exhaust the call stack.
    pub fn codebook(&self) -> Codebook {
        let mut codebook = Codebook::new();

        if let HuffmanNode::Leaf { symbol, .. } = self.root {
            codebook.insert(symbol, Code::from_bits(vec![false]));
            return codebook;
        }

        let mut stack: Vec<(&HuffmanNode, Vec<bool>)> = vec![(&self.root, Vec::new())];
        while let Some((node, path)) = stack.pop() {
            match node {
                HuffmanNode::Leaf { symbol, .. } => {
                    codebook.insert(*symbol, Code::from_bits(path));
                }
                HuffmanNode::Internal { left, right, .. } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    let mut left_path = path;
                    left_path.push(false);

                    stack.push((right.as_ref(), right_path));
                    stack.push((left.as_ref(), left_path));
                }
            }
        }

        codebook
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_len(codebook: &Codebook, symbol: u8) -> usize {
        codebook.get(symbol).map(Code::len).unwrap_or(0)
    }

    #[test]
    fn test_empty_table_has_no_tree() {
        let table = FrequencyTable::from_bytes(b"");
        assert!(HuffmanTree::from_frequencies(&table).is_none());
    }

    #[test]
    fn test_root_weight_is_input_length() {
        let data = b"the quick brown fox";
        let table = FrequencyTable::from_bytes(data);
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        assert_eq!(tree.root().weight(), data.len() as u64);
    }

    #[test]
    fn test_aaabbc_code_lengths() {
        let table = FrequencyTable::from_bytes(b"aaabbc");
        let codebook = HuffmanTree::from_frequencies(&table).unwrap().codebook();

        assert_eq!(codebook.len(), 3);
        assert_eq!(code_len(&codebook, b'a'), 1);
        assert_eq!(code_len(&codebook, b'b'), 2);
        assert_eq!(code_len(&codebook, b'c'), 2);

        let total_bits: u64 = table
            .iter()
            .map(|(s, n)| n * code_len(&codebook, s) as u64)
            .sum();
        assert_eq!(total_bits, 9);
        assert!(codebook.is_prefix_free());
    }

    #[test]
    fn test_aaabbc_exact_assignment() {
        // c(1) and b(2) merge first, c on the left; then a(3) joins the
        // merged node (3) and wins the tie by sequence.
        let table = FrequencyTable::from_bytes(b"aaabbc");
        let codebook = HuffmanTree::from_frequencies(&table).unwrap().codebook();

        assert_eq!(codebook.get(b'a').unwrap().to_string(), "0");
        assert_eq!(codebook.get(b'c').unwrap().to_string(), "10");
        assert_eq!(codebook.get(b'b').unwrap().to_string(), "11");
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let table = FrequencyTable::from_bytes(b"zzzz");
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        assert!(tree.root().is_leaf());

        let codebook = tree.codebook();
        assert_eq!(codebook.len(), 1);
        assert_eq!(codebook.get(b'z').unwrap().to_string(), "0");
    }

    #[test]
    fn test_deterministic() {
        let data = b"abracadabra alakazam";
        let table = FrequencyTable::from_bytes(data);
        let first = HuffmanTree::from_frequencies(&table).unwrap();
        let second = HuffmanTree::from_frequencies(&table).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.codebook(), second.codebook());
    }

    #[test]
    fn test_full_alphabet_prefix_free() {
        let data: Vec<u8> = (0..=255u8).chain(0..=40u8).collect();
        let table = FrequencyTable::from_bytes(&data);
        let codebook = HuffmanTree::from_frequencies(&table).unwrap().codebook();

        assert_eq!(codebook.len(), 256);
        assert!(codebook.is_prefix_free());
    }

    #[test]
    fn test_skewed_frequencies_deep_tree() {
        // Fibonacci-like weights produce a maximally deep tree
        let mut data = Vec::new();
        let (mut a, mut b) = (1usize, 1usize);
        for symbol in 0..20u8 {
            data.extend(std::iter::repeat(symbol).take(a));
            (a, b) = (b, a + b);
        }
        let table = FrequencyTable::from_bytes(&data);
        let codebook = HuffmanTree::from_frequencies(&table).unwrap().codebook();

        assert_eq!(codebook.len(), 20);
        assert_eq!(code_len(&codebook, 0), 19);
        assert_eq!(code_len(&codebook, 19), 1);
        assert!(codebook.is_prefix_free());
    }
}
