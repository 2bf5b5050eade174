//! Two-pass Huffman encoder

use super::codes::write_code;
use super::tree_codec::serialize_tree;
use super::{CodeTable, FrequencyTable, HuffmanTree};
use crate::bitstream::{BitSink, BitSource};
use crate::config::{BITS_PER_INT, BITS_PER_WORD, HUFF_TREE};
use crate::{CompressionStats, HuffError, Result, Symbol};
use tracing::debug;

/// Huffman encoder for byte streams
#[derive(Debug, Clone, Default)]
pub struct HuffEncoder {
    log_codes: bool,
}

impl HuffEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Log every symbol's code at debug level while encoding
    pub fn with_code_logging(mut self, enabled: bool) -> Self {
        self.log_codes = enabled;
        self
    }

    /// Compress all of `input` into `output`.
    ///
    /// `input` is read to exhaustion twice: once to count, then again after
    /// [`BitSource::reset`] to emit codes. `output` is closed on success.
    pub fn encode<S, W>(&self, input: &mut S, output: &mut W) -> Result<CompressionStats>
    where
        S: BitSource + ?Sized,
        W: BitSink + ?Sized,
    {
        let frequencies = FrequencyTable::count(input)?;
        input.reset()?;

        let tree = HuffmanTree::build(&frequencies);
        output.write_bits(BITS_PER_INT, HUFF_TREE)?;
        serialize_tree(&tree, output)?;
        let header_bits = output.bits_written();

        let codes = CodeTable::from_tree(&tree);
        if self.log_codes {
            for (symbol, code) in codes.iter() {
                debug!(
                    "{} weight={} code={}",
                    symbol,
                    frequencies.weight(symbol),
                    code
                );
            }
        }

        let mut symbols = 0u64;
        while let Some(value) = input.read_bits(BITS_PER_WORD)? {
            let symbol = Symbol::new(value as u16).filter(|s| !s.is_eof());
            let code = symbol.and_then(|s| codes.get(s)).ok_or_else(|| {
                HuffError::Corruption(format!(
                    "byte {:#04x} was not seen while counting, input changed between passes",
                    value
                ))
            })?;
            write_code(output, code)?;
            symbols += 1;
        }

        if symbols != frequencies.total_bytes() {
            return Err(HuffError::Corruption(format!(
                "counted {} bytes but encoded {}, input changed between passes",
                frequencies.total_bytes(),
                symbols
            )));
        }

        let eof = codes
            .get(Symbol::EOF)
            .ok_or_else(|| HuffError::InvalidFormat("tree has no end-of-stream leaf".into()))?;
        write_code(output, eof)?;

        let bits_written = output.bits_written();
        output.close()?;

        debug!(
            "Encoded {} bytes: header {} bits, payload {} bits",
            symbols,
            header_bits,
            bits_written - header_bits
        );

        Ok(CompressionStats {
            input_bytes: symbols,
            output_bytes: bits_written.div_ceil(8),
            bits_read: input.bits_read(),
            bits_written,
            leaf_count: tree.leaf_count(),
        })
    }
}
