//! Bit-level I/O used by the Huffman engine
//!
//! The engine only talks to the [`BitSource`] and [`BitSink`] traits. Two
//! families of implementations are provided:
//!
//! - [`BitReader`] / [`BitWriter`]: over in-memory byte buffers
//! - [`BitInputStream`] / [`BitOutputStream`]: over any `std::io` reader or writer
//!
//! Bits are packed most-significant first; a final partial byte is padded
//! with zeros when the sink is closed.

mod memory;
mod stream;

pub use memory::{BitReader, BitWriter};
pub use stream::{BitInputStream, BitOutputStream};

use crate::Result;

/// Sequential source of bits, groupable into unsigned values
pub trait BitSource {
    /// Read the next `num_bits` (at most 32) as an unsigned value.
    ///
    /// Returns `Ok(None)` when fewer than `num_bits` bits remain, leaving
    /// those bits unread.
    fn read_bits(&mut self, num_bits: u32) -> Result<Option<u32>>;

    /// Rewind to the first bit so the input can be traversed again
    fn reset(&mut self) -> Result<()>;

    /// Total bits handed out since creation, across resets
    fn bits_read(&self) -> u64;

    /// Read a single bit
    #[inline]
    fn read_bit(&mut self) -> Result<Option<bool>> {
        Ok(self.read_bits(1)?.map(|bit| bit == 1))
    }
}

/// Sequential sink of bits
pub trait BitSink {
    /// Write the low-order `num_bits` (at most 32) of `value`, most significant first
    fn write_bits(&mut self, num_bits: u32, value: u32) -> Result<()>;

    /// Flush any partial trailing byte (zero padded) and release the target.
    /// Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Total bits accepted, excluding padding
    fn bits_written(&self) -> u64;

    /// Write a single bit
    #[inline]
    fn write_bit(&mut self, bit: bool) -> Result<()> {
        self.write_bits(1, bit as u32)
    }
}

impl<S: BitSource + ?Sized> BitSource for &mut S {
    fn read_bits(&mut self, num_bits: u32) -> Result<Option<u32>> {
        (**self).read_bits(num_bits)
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn bits_read(&self) -> u64 {
        (**self).bits_read()
    }
}

impl<S: BitSink + ?Sized> BitSink for &mut S {
    fn write_bits(&mut self, num_bits: u32, value: u32) -> Result<()> {
        (**self).write_bits(num_bits, value)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn bits_written(&self) -> u64 {
        (**self).bits_written()
    }
}

pub(crate) fn closed_error() -> crate::HuffError {
    std::io::Error::new(std::io::ErrorKind::Other, "write to a closed bit stream").into()
}
