//! High-level compress/decompress entry points

use crate::bitstream::{BitInputStream, BitOutputStream, BitReader, BitSink, BitSource, BitWriter};
use crate::config::DEFAULT_BUFFER_SIZE;
use crate::huffman::{inspect, HeaderInfo, HuffDecoder, HuffEncoder};
use crate::{CompressionStats, HuffError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Processor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Buffer size for file readers and writers
    pub buffer_size: usize,
    /// Log every symbol's code at debug level when compressing
    pub log_code_table: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            log_code_table: false,
        }
    }
}

impl ProcessorConfig {
    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(HuffError::Config("buffer_size must be greater than 0".into()));
        }
        Ok(())
    }
}

/// Compressor/decompressor over bit streams, byte buffers and files
#[derive(Debug, Clone, Default)]
pub struct HuffProcessor {
    config: ProcessorConfig,
}

impl HuffProcessor {
    /// Create a processor with a validated configuration
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Compress `input` into `output`, closing `output` on success
    pub fn compress<S, W>(&self, input: &mut S, output: &mut W) -> Result<CompressionStats>
    where
        S: BitSource + ?Sized,
        W: BitSink + ?Sized,
    {
        HuffEncoder::new()
            .with_code_logging(self.config.log_code_table)
            .encode(input, output)
    }

    /// Decompress `input` into `output`, closing `output` on success
    pub fn decompress<S, W>(&self, input: &mut S, output: &mut W) -> Result<CompressionStats>
    where
        S: BitSource + ?Sized,
        W: BitSink + ?Sized,
    {
        HuffDecoder::new().decode(input, output)
    }

    /// Compress an in-memory buffer
    pub fn compress_bytes(&self, data: &[u8]) -> Result<(Vec<u8>, CompressionStats)> {
        let mut reader = BitReader::new(data);
        let mut writer = BitWriter::with_capacity(data.len() / 2 + 64);
        let stats = self.compress(&mut reader, &mut writer)?;
        Ok((writer.finish(), stats))
    }

    /// Decompress an in-memory buffer
    pub fn decompress_bytes(&self, data: &[u8]) -> Result<(Vec<u8>, CompressionStats)> {
        let mut reader = BitReader::new(data);
        let mut writer = BitWriter::with_capacity(data.len() * 2);
        let stats = self.decompress(&mut reader, &mut writer)?;
        Ok((writer.finish(), stats))
    }

    /// Compress the file at `src` into a new file at `dst`.
    ///
    /// Both files are released on every path; on failure `dst` keeps whatever
    /// was written before the error.
    pub fn compress_file(&self, src: &Path, dst: &Path) -> Result<CompressionStats> {
        ensure_distinct(src, dst)?;
        let mut input = BitInputStream::with_capacity(self.config.buffer_size, File::open(src)?);
        let mut output =
            BitOutputStream::with_capacity(self.config.buffer_size, File::create(dst)?);

        let stats = self.compress(&mut input, &mut output)?;
        info!(
            "Compressed {:?} -> {:?}: {} -> {} bytes ({:.1}% saved)",
            src,
            dst,
            stats.input_bytes,
            stats.output_bytes,
            stats.space_saving()
        );
        Ok(stats)
    }

    /// Decompress the file at `src` into a new file at `dst`
    pub fn decompress_file(&self, src: &Path, dst: &Path) -> Result<CompressionStats> {
        ensure_distinct(src, dst)?;
        let mut input = BitInputStream::with_capacity(self.config.buffer_size, File::open(src)?);
        let mut output =
            BitOutputStream::with_capacity(self.config.buffer_size, File::create(dst)?);

        let stats = self.decompress(&mut input, &mut output)?;
        info!(
            "Decompressed {:?} -> {:?}: {} -> {} bytes",
            src, dst, stats.input_bytes, stats.output_bytes
        );
        Ok(stats)
    }

    /// Read the header of the compressed file at `path`
    pub fn inspect_file(&self, path: &Path) -> Result<HeaderInfo> {
        let mut input = BitInputStream::with_capacity(self.config.buffer_size, File::open(path)?);
        inspect(&mut input)
    }
}

/// Reject a destination that resolves to the source file, since creating
/// `dst` truncates it before `src` is read
fn ensure_distinct(src: &Path, dst: &Path) -> Result<()> {
    if let (Ok(src), Ok(dst)) = (std::fs::canonicalize(src), std::fs::canonicalize(dst)) {
        if src == dst {
            return Err(HuffError::Config(format!(
                "input and output are the same file: {:?}",
                src
            )));
        }
    }
    Ok(())
}
