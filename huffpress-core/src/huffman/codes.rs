//! Symbol to bit-code mapping

use super::{FrequencyTable, HuffmanTree, TreeNode};
use crate::bitstream::BitSink;
use crate::config::ALPH_SIZE;
use crate::{Code, Result, Symbol};

/// Code of every leaf in a tree, indexed by symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Walk `tree` depth-first, recording each leaf's path
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = vec![None; ALPH_SIZE + 1];
        assign(&tree.root, Code::new(), &mut codes);
        Self { codes }
    }

    /// Code for a symbol, `None` if it has no leaf
    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes[symbol.index()].as_ref()
    }

    /// Symbols with a code, in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        Symbol::all()
            .zip(self.codes.iter())
            .filter_map(|(symbol, code)| code.as_ref().map(|c| (symbol, c)))
    }

    /// Number of symbols with a code
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Payload size in bits for the given weights, sentinel included
    pub fn encoded_bits(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .filter_map(|(symbol, weight)| self.get(symbol).map(|c| c.len() as u64 * weight))
            .sum()
    }
}

fn assign(node: &TreeNode, path: Code, codes: &mut [Option<Code>]) {
    match node {
        TreeNode::Leaf { symbol } => codes[symbol.index()] = Some(path),
        TreeNode::Internal { left, right } => {
            assign(left, path.child(false), codes);
            assign(right, path.child(true), codes);
        }
    }
}

/// Write `code` to `sink`, packing up to 32 bits per call
pub fn write_code<W: BitSink + ?Sized>(sink: &mut W, code: &Code) -> Result<()> {
    for chunk in code.bits().chunks(32) {
        let value = chunk
            .iter()
            .fold(0u32, |acc, &bit| (acc << 1) | bit as u32);
        sink.write_bits(chunk.len() as u32, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::{BitReader, BitSource, BitWriter};

    fn table_for(data: &[u8]) -> (FrequencyTable, CodeTable) {
        let freqs = FrequencyTable::from_bytes(data);
        let codes = CodeTable::from_tree(&HuffmanTree::build(&freqs));
        (freqs, codes)
    }

    #[test]
    fn test_aaaab_codes() {
        let (_, codes) = table_for(b"AAAAB");
        assert_eq!(codes.len(), 3);
        assert_eq!(codes.get(Symbol::from_byte(b'A')).unwrap().len(), 1);

        let b = codes.get(Symbol::from_byte(b'B')).unwrap();
        let eof = codes.get(Symbol::EOF).unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(eof.len(), 2);
        assert_eq!(b.bits()[0], eof.bits()[0]);
        assert_ne!(b, eof);
        assert!(codes.get(Symbol::from_byte(b'C')).is_none());
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let (_, codes) = table_for(b"mississippi river banks, sassafras and syzygy");
        let all: Vec<&Code> = codes.iter().map(|(_, c)| c).collect();
        for (i, a) in all.iter().enumerate() {
            assert!(!a.is_empty());
            for (j, b) in all.iter().enumerate() {
                if i != j {
                    assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let mut data = vec![b'e'; 500];
        data.extend_from_slice(b"xyz");
        let (freqs, codes) = table_for(&data);

        let e = codes.get(Symbol::from_byte(b'e')).unwrap().len();
        let x = codes.get(Symbol::from_byte(b'x')).unwrap().len();
        assert!(e < x);
        assert_eq!(codes.encoded_bits(&freqs), 500 * e as u64 + 3 * x as u64 + 3);
    }

    #[test]
    fn test_write_code_packs_long_codes() {
        let mut code = Code::new();
        for i in 0..70 {
            code = code.child(i % 3 == 0);
        }

        let mut writer = BitWriter::new();
        write_code(&mut writer, &code).unwrap();
        assert_eq!(writer.bits_written(), 70);

        let data = writer.finish();
        let mut reader = BitReader::new(&data);
        for i in 0..70 {
            assert_eq!(reader.read_bit().unwrap(), Some(i % 3 == 0));
        }
    }
}
