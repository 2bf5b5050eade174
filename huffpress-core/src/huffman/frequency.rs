//! First-pass symbol counting

use crate::bitstream::BitSource;
use crate::config::{ALPH_SIZE, BITS_PER_WORD};
use crate::{Result, Symbol};
use tracing::debug;

/// Weight of every symbol in the alphabet, sentinel included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    weights: [u64; ALPH_SIZE + 1],
}

impl FrequencyTable {
    /// Create a table where only the sentinel has weight (1)
    pub fn new() -> Self {
        let mut weights = [0u64; ALPH_SIZE + 1];
        weights[Symbol::EOF.index()] = 1;
        Self { weights }
    }

    /// Count every byte of `source` until it reports end-of-data.
    ///
    /// The source is left exhausted; rewinding it is up to the caller.
    pub fn count<S: BitSource + ?Sized>(source: &mut S) -> Result<Self> {
        let mut table = Self::new();
        while let Some(value) = source.read_bits(BITS_PER_WORD)? {
            table.weights[value as usize] += 1;
        }

        debug!(
            "Counted {} bytes, {} distinct symbols",
            table.total_bytes(),
            table.distinct_symbols()
        );
        Ok(table)
    }

    /// Build a table from an in-memory buffer
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut table = Self::new();
        for &byte in bytes {
            table.record(byte);
        }
        table
    }

    /// Count one occurrence of `byte`
    #[inline]
    pub fn record(&mut self, byte: u8) {
        self.weights[byte as usize] += 1;
    }

    /// Weight of a symbol
    pub fn weight(&self, symbol: Symbol) -> u64 {
        self.weights[symbol.index()]
    }

    /// Symbols with non-zero weight, in ascending symbol order
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        Symbol::all()
            .zip(self.weights.iter().copied())
            .filter(|&(_, weight)| weight > 0)
    }

    /// Number of symbols with non-zero weight, sentinel included
    pub fn distinct_symbols(&self) -> usize {
        self.weights.iter().filter(|&&w| w > 0).count()
    }

    /// Number of real bytes counted
    pub fn total_bytes(&self) -> u64 {
        self.weights[..ALPH_SIZE].iter().sum()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
