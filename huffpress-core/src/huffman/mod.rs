//! Static Huffman coding with the tree stored in the stream header
//!
//! Stream layout:
//!
//! ```text
//! +-------------+---------------------------+------------------+---------+---------+
//! | magic (32b) | tree, pre-order           | codes, one per   | EOF     | zero    |
//! | 0xFACE8201  | 0 = internal, 1 + 9b leaf | input byte       | code    | padding |
//! +-------------+---------------------------+------------------+---------+---------+
//! ```

mod codes;
mod decoder;
mod encoder;
mod frequency;
mod tree;
mod tree_codec;

pub use codes::{write_code, CodeTable};
pub use decoder::{read_header, HuffDecoder};
pub use encoder::HuffEncoder;
pub use frequency::FrequencyTable;
pub use tree::{HuffmanTree, TreeNode};
pub use tree_codec::{deserialize_tree, serialize_tree};

use crate::bitstream::BitSource;
use crate::config::HUFF_TREE;
use crate::{Result, Symbol};
use serde::Serialize;

/// Code length of one symbol as recorded in a stream header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolCode {
    pub symbol: Symbol,
    pub code: String,
}

/// Description of a compressed stream's header
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderInfo {
    /// Magic number found at the start of the stream
    pub magic: u32,
    /// Bits taken by magic number and tree
    pub header_bits: u64,
    /// Leaves in the stored tree
    pub leaf_count: usize,
    /// Longest code length
    pub depth: usize,
    /// Code of every leaf, in ascending symbol order
    pub codes: Vec<SymbolCode>,
}

impl HeaderInfo {
    /// Length of the longest and shortest byte code, ignoring the sentinel
    pub fn code_length_range(&self) -> Option<(usize, usize)> {
        let lengths = self
            .codes
            .iter()
            .filter(|c| !c.symbol.is_eof())
            .map(|c| c.code.len());
        let min = lengths.clone().min()?;
        let max = lengths.max()?;
        Some((min, max))
    }
}

/// Read only the header of a compressed stream
pub fn inspect<S: BitSource + ?Sized>(input: &mut S) -> Result<HeaderInfo> {
    let tree = read_header(input)?;
    let codes = CodeTable::from_tree(&tree)
        .iter()
        .map(|(symbol, code)| SymbolCode {
            symbol,
            code: code.to_string(),
        })
        .collect();

    Ok(HeaderInfo {
        magic: HUFF_TREE,
        header_bits: input.bits_read(),
        leaf_count: tree.leaf_count(),
        depth: tree.depth(),
        codes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::{BitReader, BitWriter};

    #[test]
    fn test_inspect_reports_tree() {
        let mut writer = BitWriter::new();
        HuffEncoder::new()
            .encode(&mut BitReader::new(b"AAAAB"), &mut writer)
            .unwrap();
        let stream = writer.finish();

        let info = inspect(&mut BitReader::new(&stream)).unwrap();
        assert_eq!(info.magic, HUFF_TREE);
        assert_eq!(info.header_bits, 64);
        assert_eq!(info.leaf_count, 3);
        assert_eq!(info.depth, 2);
        assert_eq!(info.codes.len(), 3);
        assert_eq!(info.codes[0].symbol, Symbol::from_byte(b'A'));
        assert_eq!(info.codes[2].symbol, Symbol::EOF);
        assert_eq!(info.code_length_range(), Some((1, 2)));
    }

    #[test]
    fn test_inspect_empty_stream_has_no_byte_codes() {
        let mut writer = BitWriter::new();
        HuffEncoder::new()
            .encode(&mut BitReader::new(b""), &mut writer)
            .unwrap();
        let stream = writer.finish();

        let info = inspect(&mut BitReader::new(&stream)).unwrap();
        // the dummy byte-0 leaf is still listed
        assert_eq!(info.leaf_count, 2);
        assert_eq!(info.code_length_range(), Some((1, 1)));
    }
}
