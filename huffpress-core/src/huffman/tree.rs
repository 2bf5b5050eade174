//! Huffman tree and its construction

use super::FrequencyTable;
use crate::Symbol;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use tracing::debug;

/// Node of a full binary coding tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    /// Codeword-bearing node
    Leaf { symbol: Symbol },
    /// Branch with exactly two children (left = 0, right = 1)
    Internal {
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

impl TreeNode {
    /// Create a leaf
    pub fn leaf(symbol: Symbol) -> Self {
        TreeNode::Leaf { symbol }
    }

    /// Create an internal node owning both children
    pub fn internal(left: TreeNode, right: TreeNode) -> Self {
        TreeNode::Internal {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Check if this node is a leaf
    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    /// Number of leaves below (and including) this node
    pub fn leaf_count(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 1,
            TreeNode::Internal { left, right } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        match self {
            TreeNode::Leaf { .. } => 0,
            TreeNode::Internal { left, right } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Collect leaf symbols in pre-order
    pub fn collect_symbols(&self, out: &mut Vec<Symbol>) {
        match self {
            TreeNode::Leaf { symbol } => out.push(*symbol),
            TreeNode::Internal { left, right } => {
                left.collect_symbols(out);
                right.collect_symbols(out);
            }
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize, label: &str) -> fmt::Result {
        let indent = "  ".repeat(depth);
        match self {
            TreeNode::Leaf { symbol } => writeln!(f, "{}{}-> Leaf {}", indent, label, symbol),
            TreeNode::Internal { left, right } => {
                writeln!(f, "{}{}-> Internal", indent, label)?;
                left.fmt_indented(f, depth + 1, "0")?;
                right.fmt_indented(f, depth + 1, "1")
            }
        }
    }
}

/// Heap entry ordered by weight, then by insertion sequence
#[derive(Debug)]
struct Weighted {
    weight: u64,
    seq: u64,
    node: TreeNode,
}

impl PartialEq for Weighted {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Weighted {}

impl PartialOrd for Weighted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weighted {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.weight, self.seq).cmp(&(other.weight, other.seq))
    }
}

/// Prefix-code tree built from symbol weights
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    pub root: TreeNode,
}

impl HuffmanTree {
    /// Wrap an existing root
    pub fn new(root: TreeNode) -> Self {
        Self { root }
    }

    /// Build the optimal tree for `frequencies`.
    ///
    /// Leaves enter the queue in ascending symbol order and every node gets a
    /// sequence number, so equal weights always merge in the same order and
    /// the resulting tree is reproducible. The first node popped becomes the
    /// left child.
    ///
    /// When the sentinel is the only weighted symbol (empty input) the lone
    /// leaf is placed under a synthetic root with a dummy leaf for byte 0 on
    /// the right, so the sentinel still gets a one-bit code.
    pub fn build(frequencies: &FrequencyTable) -> Self {
        let mut heap = BinaryHeap::new();
        let mut seq = 0u64;

        for (symbol, weight) in frequencies.iter() {
            heap.push(Reverse(Weighted {
                weight,
                seq,
                node: TreeNode::leaf(symbol),
            }));
            seq += 1;
        }

        while heap.len() > 1 {
            if let (Some(Reverse(first)), Some(Reverse(second))) = (heap.pop(), heap.pop()) {
                heap.push(Reverse(Weighted {
                    weight: first.weight + second.weight,
                    seq,
                    node: TreeNode::internal(first.node, second.node),
                }));
                seq += 1;
            }
        }

        let root = match heap.pop() {
            Some(Reverse(Weighted {
                node: TreeNode::Leaf { symbol },
                ..
            })) => {
                debug!("Single-symbol alphabet, adding dummy sibling for {}", symbol);
                TreeNode::internal(TreeNode::leaf(symbol), TreeNode::leaf(Symbol::from_byte(0)))
            }
            Some(Reverse(entry)) => entry.node,
            None => TreeNode::internal(
                TreeNode::leaf(Symbol::EOF),
                TreeNode::leaf(Symbol::from_byte(0)),
            ),
        };

        let tree = Self { root };
        debug!(
            "Built tree with {} leaves, depth {}",
            tree.leaf_count(),
            tree.depth()
        );
        tree
    }

    /// Number of leaves
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Longest code length
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Leaf symbols in pre-order
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut out = Vec::with_capacity(self.leaf_count());
        self.root.collect_symbols(&mut out);
        out
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt_indented(f, 0, "root")
    }
}
