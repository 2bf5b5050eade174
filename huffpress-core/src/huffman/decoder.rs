//! Huffman decoder: header validation and tree walk

use super::tree_codec::deserialize_tree;
use super::{HuffmanTree, TreeNode};
use crate::bitstream::{BitSink, BitSource};
use crate::config::{BITS_PER_INT, BITS_PER_WORD, HUFF_TREE};
use crate::{CompressionStats, HuffError, Result};
use tracing::debug;

/// Huffman decoder for streams written by [`HuffEncoder`](super::HuffEncoder)
#[derive(Debug, Clone, Copy, Default)]
pub struct HuffDecoder;

impl HuffDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Decompress `input` into `output` until the end-of-stream code.
    ///
    /// Nothing is written when the magic number is wrong. Bytes decoded before
    /// a truncation error stay in `output`. `output` is closed on success.
    pub fn decode<S, W>(&self, input: &mut S, output: &mut W) -> Result<CompressionStats>
    where
        S: BitSource + ?Sized,
        W: BitSink + ?Sized,
    {
        let tree = read_header(input)?;
        let header_bits = input.bits_read();

        let root = &tree.root;
        let mut node = root;
        let mut symbols = 0u64;

        loop {
            let bit = input.read_bit()?.ok_or_else(|| {
                HuffError::Truncated(format!(
                    "no end-of-stream code after {} decoded bytes",
                    symbols
                ))
            })?;

            let TreeNode::Internal { left, right } = node else {
                return Err(HuffError::InvalidFormat("tree root is a leaf".into()));
            };
            node = if bit { &**right } else { &**left };

            if let TreeNode::Leaf { symbol } = node {
                match symbol.as_byte() {
                    None => break,
                    Some(byte) => {
                        output.write_bits(BITS_PER_WORD, byte as u32)?;
                        symbols += 1;
                        node = root;
                    }
                }
            }
        }

        let bits_read = input.bits_read();
        let bits_written = output.bits_written();
        output.close()?;

        debug!(
            "Decoded {} bytes: header {} bits, payload {} bits",
            symbols,
            header_bits,
            bits_read - header_bits
        );

        Ok(CompressionStats {
            input_bytes: bits_read.div_ceil(8),
            output_bytes: symbols,
            bits_read,
            bits_written,
            leaf_count: tree.leaf_count(),
        })
    }
}

/// Validate the magic number and read the coding tree
pub fn read_header<S: BitSource + ?Sized>(input: &mut S) -> Result<HuffmanTree> {
    let magic = input
        .read_bits(BITS_PER_INT)?
        .ok_or_else(|| HuffError::Truncated("stream shorter than the magic number".into()))?;
    if magic != HUFF_TREE {
        return Err(HuffError::BadMagic {
            expected: HUFF_TREE,
            actual: magic,
        });
    }
    deserialize_tree(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::{BitReader, BitWriter};
    use crate::huffman::HuffEncoder;

    fn compress(data: &[u8]) -> Vec<u8> {
        let mut writer = BitWriter::new();
        HuffEncoder::new()
            .encode(&mut BitReader::new(data), &mut writer)
            .unwrap();
        writer.finish()
    }

    fn decompress(data: &[u8]) -> (Result<CompressionStats>, Vec<u8>) {
        let mut writer = BitWriter::new();
        let result = HuffDecoder::new().decode(&mut BitReader::new(data), &mut writer);
        (result, writer.finish())
    }

    #[test]
    fn test_aaaab_roundtrip() {
        let (result, output) = decompress(&compress(b"AAAAB"));
        let stats = result.unwrap();
        assert_eq!(output, b"AAAAB");
        assert_eq!(stats.output_bytes, 5);
        assert_eq!(stats.leaf_count, 3);
    }

    #[test]
    fn test_empty_roundtrip() {
        let (result, output) = decompress(&compress(b""));
        assert_eq!(result.unwrap().output_bytes, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_bad_magic_writes_nothing() {
        let mut stream = compress(b"some payload");
        stream[0] ^= 0xFF;

        let (result, output) = decompress(&stream);
        match result {
            Err(HuffError::BadMagic { expected, actual }) => {
                assert_eq!(expected, HUFF_TREE);
                assert_ne!(actual, HUFF_TREE);
            }
            other => panic!("expected BadMagic, got {:?}", other),
        }
        assert!(output.is_empty());
    }

    #[test]
    fn test_stream_shorter_than_magic() {
        let (result, _) = decompress(&[0xFA, 0xCE]);
        assert!(matches!(result, Err(HuffError::Truncated(_))));
    }

    #[test]
    fn test_truncated_payload_detected() {
        let original = b"a moderately long message that spans several bytes of payload";
        let stream = compress(original);

        let (result, output) = decompress(&stream[..stream.len() - 3]);
        assert!(matches!(result, Err(HuffError::Truncated(_))), "got {:?}", result);
        // whatever was emitted is a prefix of the original
        assert!(original.starts_with(&output));
        assert!(output.len() < original.len());
    }

    #[test]
    fn test_leaf_root_rejected() {
        let mut writer = BitWriter::new();
        writer.write_bits(32, HUFF_TREE).unwrap();
        writer.write_bit(true).unwrap();
        writer.write_bits(9, 256).unwrap();
        writer.write_bits(8, 0).unwrap();
        let stream = writer.finish();

        let (result, output) = decompress(&stream);
        assert!(matches!(result, Err(HuffError::InvalidFormat(_))), "got {:?}", result);
        assert!(output.is_empty());
    }
}
