//! Core types for huffpress

use crate::config::{ALPH_SIZE, PSEUDO_EOF};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One element of the coding alphabet: a byte value or the end-of-stream sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Symbol(u16);

impl Symbol {
    /// End-of-stream sentinel, never a real byte
    pub const EOF: Symbol = Symbol(PSEUDO_EOF);

    /// Create a symbol from its numeric value, `None` if above the sentinel
    pub fn new(value: u16) -> Option<Self> {
        (value <= PSEUDO_EOF).then_some(Symbol(value))
    }

    /// Symbol for a literal byte
    pub fn from_byte(byte: u8) -> Self {
        Symbol(byte as u16)
    }

    /// Numeric value (0-256)
    pub fn value(self) -> u16 {
        self.0
    }

    /// Index into per-symbol tables
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is the end-of-stream sentinel
    pub fn is_eof(self) -> bool {
        self.0 == PSEUDO_EOF
    }

    /// The literal byte, `None` for the sentinel
    pub fn as_byte(self) -> Option<u8> {
        u8::try_from(self.0).ok()
    }

    /// Iterate over the whole alphabet in ascending order
    pub fn all() -> impl Iterator<Item = Symbol> {
        (0..=ALPH_SIZE as u16).map(Symbol)
    }
}

impl From<u8> for Symbol {
    fn from(byte: u8) -> Self {
        Symbol::from_byte(byte)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_byte() {
            None => write!(f, "EOF"),
            Some(b) if b.is_ascii_graphic() || b == b' ' => write!(f, "'{}'", b as char),
            Some(b) => write!(f, "0x{:02x}", b),
        }
    }
}

/// A prefix code: the path from the tree root to a leaf (left = 0, right = 1)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    /// Create an empty code (the root's path)
    pub fn new() -> Self {
        Self::default()
    }

    /// Path extended by one step
    pub fn child(&self, bit: bool) -> Self {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Self { bits }
    }

    /// Number of bits in the code
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Bits from the root downwards
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Check if `self` is a prefix of `other`
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Summary of a single compress or decompress run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompressionStats {
    /// Bytes consumed (original bytes when compressing, stream bytes when decompressing)
    pub input_bytes: u64,
    /// Bytes produced
    pub output_bytes: u64,
    /// Bits pulled from the input stream, both passes included
    pub bits_read: u64,
    /// Bits pushed to the output stream before padding
    pub bits_written: u64,
    /// Leaves in the coding tree
    pub leaf_count: usize,
}

impl CompressionStats {
    /// Get compression ratio (input over output)
    pub fn compression_ratio(&self) -> f64 {
        if self.output_bytes == 0 {
            return 0.0;
        }
        self.input_bytes as f64 / self.output_bytes as f64
    }

    /// Percentage of the input saved, negative when the output grew
    pub fn space_saving(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        (1.0 - self.output_bytes as f64 / self.input_bytes as f64) * 100.0
    }
}
