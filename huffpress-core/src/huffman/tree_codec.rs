//! Pre-order tree serialization for the stream header
//!
//! An internal node is written as a `0` bit followed by its left and right
//! subtrees; a leaf as a `1` bit followed by its symbol in
//! [`LEAF_VALUE_BITS`] bits.

use super::{HuffmanTree, TreeNode};
use crate::bitstream::{BitSink, BitSource};
use crate::config::{ALPH_SIZE, LEAF_VALUE_BITS, MAX_TREE_DEPTH};
use crate::{HuffError, Result, Symbol};

/// Write `tree` in pre-order
pub fn serialize_tree<W: BitSink + ?Sized>(tree: &HuffmanTree, sink: &mut W) -> Result<()> {
    write_node(&tree.root, sink)
}

fn write_node<W: BitSink + ?Sized>(node: &TreeNode, sink: &mut W) -> Result<()> {
    match node {
        TreeNode::Internal { left, right } => {
            sink.write_bit(false)?;
            write_node(left, sink)?;
            write_node(right, sink)
        }
        TreeNode::Leaf { symbol } => {
            sink.write_bit(true)?;
            sink.write_bits(LEAF_VALUE_BITS, symbol.value() as u32)
        }
    }
}

/// Read a tree written by [`serialize_tree`].
///
/// Fails with [`HuffError::Truncated`] when the source ends mid-tree, and with
/// [`HuffError::InvalidFormat`] when a leaf value is out of range, a symbol
/// appears twice, the sentinel is missing, or nesting exceeds [`MAX_TREE_DEPTH`].
pub fn deserialize_tree<S: BitSource + ?Sized>(source: &mut S) -> Result<HuffmanTree> {
    let mut seen = [false; ALPH_SIZE + 1];
    let root = read_node(source, 0, &mut seen)?;

    if !seen[Symbol::EOF.index()] {
        return Err(HuffError::InvalidFormat(
            "tree has no end-of-stream leaf".into(),
        ));
    }
    Ok(HuffmanTree::new(root))
}

fn read_node<S: BitSource + ?Sized>(
    source: &mut S,
    depth: usize,
    seen: &mut [bool; ALPH_SIZE + 1],
) -> Result<TreeNode> {
    let is_leaf = source
        .read_bit()?
        .ok_or_else(|| HuffError::Truncated(format!("tree ended at depth {}", depth)))?;

    if !is_leaf {
        if depth >= MAX_TREE_DEPTH {
            return Err(HuffError::InvalidFormat(format!(
                "tree deeper than {} levels",
                MAX_TREE_DEPTH
            )));
        }
        let left = read_node(source, depth + 1, seen)?;
        let right = read_node(source, depth + 1, seen)?;
        return Ok(TreeNode::internal(left, right));
    }

    let value = source
        .read_bits(LEAF_VALUE_BITS)?
        .ok_or_else(|| HuffError::Truncated("tree ended inside a leaf value".into()))?;
    let symbol = u16::try_from(value)
        .ok()
        .and_then(Symbol::new)
        .ok_or_else(|| HuffError::InvalidFormat(format!("leaf value {} out of range", value)))?;

    if std::mem::replace(&mut seen[symbol.index()], true) {
        return Err(HuffError::InvalidFormat(format!(
            "symbol {} appears in more than one leaf",
            symbol
        )));
    }
    Ok(TreeNode::leaf(symbol))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::{BitReader, BitWriter};
    use crate::huffman::FrequencyTable;

    fn serialize(tree: &HuffmanTree) -> (Vec<u8>, u64) {
        let mut writer = BitWriter::new();
        serialize_tree(tree, &mut writer).unwrap();
        let bits = writer.bits_written();
        (writer.finish(), bits)
    }

    #[test]
    fn test_tree_roundtrip() {
        let freqs = FrequencyTable::from_bytes(b"she sells sea shells by the sea shore");
        let tree = HuffmanTree::build(&freqs);
        let (data, bits) = serialize(&tree);

        // one bit per node plus nine per leaf
        let leaves = tree.leaf_count() as u64;
        assert_eq!(bits, (2 * leaves - 1) + 9 * leaves);

        let mut reader = BitReader::new(&data);
        let decoded = deserialize_tree(&mut reader).unwrap();
        assert_eq!(decoded, tree);
    }

    #[test]
    fn test_empty_input_tree_layout() {
        let tree = HuffmanTree::build(&FrequencyTable::new());
        let mut writer = BitWriter::new();
        serialize_tree(&tree, &mut writer).unwrap();

        let mut expected = BitWriter::new();
        expected.write_bit(false).unwrap();
        expected.write_bit(true).unwrap();
        expected.write_bits(9, 256).unwrap();
        expected.write_bit(true).unwrap();
        expected.write_bits(9, 0).unwrap();

        assert_eq!(writer.finish(), expected.finish());
    }

    #[test]
    fn test_truncated_tree() {
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(b"abcdef"));
        let (data, _) = serialize(&tree);

        let mut reader = BitReader::new(&data[..data.len() / 2]);
        let err = deserialize_tree(&mut reader).unwrap_err();
        assert!(matches!(err, HuffError::Truncated(_)), "got {:?}", err);
    }

    #[test]
    fn test_leaf_value_out_of_range() {
        let mut writer = BitWriter::new();
        writer.write_bit(false).unwrap();
        writer.write_bit(true).unwrap();
        writer.write_bits(9, 300).unwrap();
        let data = writer.finish();

        let err = deserialize_tree(&mut BitReader::new(&data)).unwrap_err();
        assert!(matches!(err, HuffError::InvalidFormat(_)), "got {:?}", err);
    }

    #[test]
    fn test_duplicate_leaf_rejected() {
        let tree = HuffmanTree::new(TreeNode::internal(
            TreeNode::leaf(Symbol::EOF),
            TreeNode::leaf(Symbol::EOF),
        ));
        let (data, _) = serialize(&tree);

        let err = deserialize_tree(&mut BitReader::new(&data)).unwrap_err();
        assert!(matches!(err, HuffError::InvalidFormat(_)), "got {:?}", err);
    }

    #[test]
    fn test_missing_sentinel_rejected() {
        let tree = HuffmanTree::new(TreeNode::internal(
            TreeNode::leaf(Symbol::from_byte(1)),
            TreeNode::leaf(Symbol::from_byte(2)),
        ));
        let (data, _) = serialize(&tree);

        let err = deserialize_tree(&mut BitReader::new(&data)).unwrap_err();
        assert!(matches!(err, HuffError::InvalidFormat(_)), "got {:?}", err);
    }

    #[test]
    fn test_runaway_nesting_rejected() {
        let data = vec![0u8; 64];
        let err = deserialize_tree(&mut BitReader::new(&data)).unwrap_err();
        assert!(matches!(err, HuffError::InvalidFormat(_)), "got {:?}", err);
    }
}
