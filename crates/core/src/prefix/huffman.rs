//! Huffman code construction.
//!
//! Classic minimum-weight merge over a binary min-heap. Every node pushed into
//! the heap gets a strictly increasing sequence number; when two weights tie,
//! the node with the smaller sequence number (the older one) pops first. Leaves
//! are pushed in PMF order, so the resulting tree is reproducible for a given
//! PMF regardless of how symbols compare.
//!
//! The first node popped in a merge becomes the `0` branch and the second the
//! `1` branch.

use super::CodeTable;
use crate::bitio::BitString;
use crate::error::Result;
use crate::model::{Pmf, Symbol};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Huffman tree node.
#[derive(Debug)]
enum Node {
    Leaf { index: usize },
    Internal { zero: Box<Node>, one: Box<Node> },
}

/// A node waiting in the merge queue.
#[derive(Debug)]
struct QueuedNode {
    weight: f64,
    sequence: u64,
    node: Node,
}

// Ordering for the heap (min-heap: lightest first, then oldest first)
impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .total_cmp(&self.weight)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Build a Huffman code for `pmf`.
///
/// A single-symbol alphabet gets the code `"0"`. The average length `L` of the
/// result satisfies `H <= L < H + 1`.
pub fn build_huffman_code<S: Symbol>(pmf: &Pmf<S>) -> Result<CodeTable<S>> {
    let entries = pmf.entries();
    let mut heap = BinaryHeap::with_capacity(entries.len());
    let mut sequence = 0u64;

    for (index, entry) in entries.iter().enumerate() {
        heap.push(QueuedNode {
            weight: entry.probability,
            sequence,
            node: Node::Leaf { index },
        });
        sequence += 1;
    }

    let mut codes = vec![BitString::new(); entries.len()];

    while heap.len() > 1 {
        let (Some(zero), Some(one)) = (heap.pop(), heap.pop()) else {
            break;
        };
        heap.push(QueuedNode {
            weight: zero.weight + one.weight,
            sequence,
            node: Node::Internal {
                zero: Box::new(zero.node),
                one: Box::new(one.node),
            },
        });
        sequence += 1;
    }

    if let Some(root) = heap.pop() {
        assign_codes(&root.node, BitString::new(), &mut codes);
    }

    let table: Vec<(S, BitString)> = entries
        .iter()
        .zip(codes)
        .map(|(entry, code)| (entry.symbol.clone(), code))
        .collect();

    tracing::debug!(
        symbols = table.len(),
        max_length = table.iter().map(|(_, c)| c.len()).max().unwrap_or(0),
        "built huffman code"
    );
    Ok(CodeTable::from_trusted(table))
}

fn assign_codes(node: &Node, prefix: BitString, codes: &mut [BitString]) {
    match node {
        Node::Leaf { index } => {
            codes[*index] = if prefix.is_empty() {
                BitString::from(vec![false])
            } else {
                prefix
            };
        }
        Node::Internal { zero, one } => {
            let mut zero_prefix = prefix.clone();
            zero_prefix.push(false);
            assign_codes(zero, zero_prefix, codes);

            let mut one_prefix = prefix;
            one_prefix.push(true);
            assign_codes(one, one_prefix, codes);
        }
    }
}
