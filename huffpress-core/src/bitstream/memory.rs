//! In-memory bit buffers

use super::{closed_error, BitSink, BitSource};
use crate::Result;

/// Bit writer collecting output into a byte vector
#[derive(Debug)]
pub struct BitWriter {
    buffer: Vec<u8>,
    current_byte: u8,
    bit_position: u8,
    bits_written: u64,
    closed: bool,
}

impl BitWriter {
    /// Create a new BitWriter
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create with capacity hint
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            current_byte: 0,
            bit_position: 0,
            bits_written: 0,
            closed: false,
        }
    }

    #[inline]
    fn push_bit(&mut self, bit: bool) {
        if bit {
            self.current_byte |= 1 << (7 - self.bit_position);
        }
        self.bit_position += 1;

        if self.bit_position == 8 {
            self.buffer.push(self.current_byte);
            self.current_byte = 0;
            self.bit_position = 0;
        }
    }

    /// Pad the final byte and return the buffer
    pub fn finish(mut self) -> Vec<u8> {
        self.pad();
        self.buffer
    }

    /// Bytes completed so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Get current size in bytes
    pub fn len(&self) -> usize {
        self.buffer.len() + if self.bit_position > 0 { 1 } else { 0 }
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.bit_position == 0
    }

    fn pad(&mut self) {
        if self.bit_position > 0 {
            self.buffer.push(self.current_byte);
            self.current_byte = 0;
            self.bit_position = 0;
        }
        self.closed = true;
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BitSink for BitWriter {
    #[inline]
    fn write_bits(&mut self, num_bits: u32, value: u32) -> Result<()> {
        debug_assert!(num_bits <= 32);
        if self.closed {
            return Err(closed_error());
        }

        for i in (0..num_bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        self.bits_written += num_bits as u64;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.pad();
        Ok(())
    }

    fn bits_written(&self) -> u64 {
        self.bits_written
    }
}

/// Bit reader over a borrowed byte slice
#[derive(Debug)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
    bits_read: u64,
}

impl<'a> BitReader<'a> {
    /// Create a new BitReader
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            bits_read: 0,
        }
    }

    /// Bits left before the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() * 8 - self.position
    }

    /// Check if there are more bits to read
    pub fn has_more(&self) -> bool {
        self.remaining() > 0
    }

    /// Get the current position in bits
    pub fn position(&self) -> usize {
        self.position
    }
}

impl BitSource for BitReader<'_> {
    #[inline]
    fn read_bits(&mut self, num_bits: u32) -> Result<Option<u32>> {
        debug_assert!(num_bits <= 32);
        if (num_bits as usize) > self.remaining() {
            return Ok(None);
        }

        let mut value = 0u32;
        for _ in 0..num_bits {
            let byte = self.data[self.position / 8];
            let bit = (byte >> (7 - self.position % 8)) & 1;
            value = (value << 1) | bit as u32;
            self.position += 1;
        }
        self.bits_read += num_bits as u64;
        Ok(Some(value))
    }

    fn reset(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }

    fn bits_read(&self) -> u64 {
        self.bits_read
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_writer_reader() {
        let mut writer = BitWriter::new();

        writer.write_bit(true).unwrap();
        writer.write_bit(false).unwrap();
        writer.write_bit(true).unwrap();
        writer.write_bits(8, 0b1010_1010).unwrap();
        writer.write_bits(8, 0xFF).unwrap();
        assert_eq!(writer.bits_written(), 19);

        let data = writer.finish();
        assert_eq!(data.len(), 3);

        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        assert_eq!(reader.read_bit().unwrap(), Some(false));
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        assert_eq!(reader.read_bits(8).unwrap(), Some(0b1010_1010));
        assert_eq!(reader.read_bits(8).unwrap(), Some(0xFF));
        // five zero padding bits remain
        assert_eq!(reader.read_bits(5).unwrap(), Some(0));
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_write_read_various_sizes() {
        let mut writer = BitWriter::new();

        writer.write_bits(3, 0b111).unwrap();
        writer.write_bits(5, 0b10101).unwrap();
        writer.write_bits(9, 256).unwrap();
        writer.write_bits(32, 0xDEADBEEF).unwrap();

        let data = writer.finish();

        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(3).unwrap(), Some(0b111));
        assert_eq!(reader.read_bits(5).unwrap(), Some(0b10101));
        assert_eq!(reader.read_bits(9).unwrap(), Some(256));
        assert_eq!(reader.read_bits(32).unwrap(), Some(0xDEADBEEF));
    }

    #[test]
    fn test_short_read_returns_none() {
        let data = [0xAB];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(9).unwrap(), None);
        assert_eq!(reader.read_bits(8).unwrap(), Some(0xAB));
        assert!(!reader.has_more());
    }

    #[test]
    fn test_reset_rewinds_but_keeps_count() {
        let data = [0x12, 0x34];
        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(16).unwrap(), Some(0x1234));
        reader.reset().unwrap();
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_bits(8).unwrap(), Some(0x12));
        assert_eq!(reader.bits_read(), 24);
    }

    #[test]
    fn test_write_after_close_fails() {
        let mut writer = BitWriter::new();
        writer.write_bits(4, 0xF).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
        assert_eq!(writer.as_bytes(), &[0xF0]);
        assert!(writer.write_bit(true).is_err());
    }
}
