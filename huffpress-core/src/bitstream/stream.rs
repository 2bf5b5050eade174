//! Bit streams over `std::io` readers and writers

use super::{closed_error, BitSink, BitSource};
use crate::config::DEFAULT_BUFFER_SIZE;
use crate::Result;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use tracing::warn;

/// Buffered bit reader over any byte reader
#[derive(Debug)]
pub struct BitInputStream<R: Read> {
    inner: BufReader<R>,
    // unread bits, right-aligned
    pending: u64,
    pending_bits: u32,
    bits_read: u64,
}

impl<R: Read> BitInputStream<R> {
    /// Create a new stream with the default buffer size
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    /// Create with an explicit buffer size
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner: BufReader::with_capacity(capacity, inner),
            pending: 0,
            pending_bits: 0,
            bits_read: 0,
        }
    }

    /// Unwrap the underlying reader, discarding buffered input
    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read + Seek> BitSource for BitInputStream<R> {
    fn read_bits(&mut self, num_bits: u32) -> Result<Option<u32>> {
        debug_assert!(num_bits <= 32);

        while self.pending_bits < num_bits {
            match self.next_byte()? {
                Some(byte) => {
                    self.pending = (self.pending << 8) | byte as u64;
                    self.pending_bits += 8;
                }
                // buffered bits stay available for a shorter read
                None => return Ok(None),
            }
        }

        self.pending_bits -= num_bits;
        let value = (self.pending >> self.pending_bits) & ((1u64 << num_bits) - 1);
        self.pending &= (1u64 << self.pending_bits) - 1;
        self.bits_read += num_bits as u64;
        Ok(Some(value as u32))
    }

    fn reset(&mut self) -> Result<()> {
        self.inner.seek(SeekFrom::Start(0))?;
        self.pending = 0;
        self.pending_bits = 0;
        Ok(())
    }

    fn bits_read(&self) -> u64 {
        self.bits_read
    }
}

/// Buffered bit writer over any byte writer.
///
/// The partial trailing byte is flushed by [`BitSink::close`]; a stream
/// dropped without being closed is closed on a best-effort basis.
#[derive(Debug)]
pub struct BitOutputStream<W: Write> {
    inner: Option<BufWriter<W>>,
    current_byte: u8,
    bit_position: u8,
    bits_written: u64,
    closed: bool,
}

impl<W: Write> BitOutputStream<W> {
    /// Create a new stream with the default buffer size
    pub fn new(inner: W) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    /// Create with an explicit buffer size
    pub fn with_capacity(capacity: usize, inner: W) -> Self {
        Self {
            inner: Some(BufWriter::with_capacity(capacity, inner)),
            current_byte: 0,
            bit_position: 0,
            bits_written: 0,
            closed: false,
        }
    }

    /// Close the stream and return the underlying writer
    pub fn into_inner(mut self) -> Result<W> {
        self.close()?;
        let writer = self.inner.take().ok_or_else(closed_error)?;
        writer.into_inner().map_err(|e| e.into_error().into())
    }

    /// Check if the stream has been closed
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn writer(&mut self) -> Result<&mut BufWriter<W>> {
        if self.closed {
            return Err(closed_error());
        }
        self.inner.as_mut().ok_or_else(closed_error)
    }
}

impl<W: Write> BitSink for BitOutputStream<W> {
    fn write_bits(&mut self, num_bits: u32, value: u32) -> Result<()> {
        debug_assert!(num_bits <= 32);
        self.writer()?;

        for i in (0..num_bits).rev() {
            if (value >> i) & 1 == 1 {
                self.current_byte |= 1 << (7 - self.bit_position);
            }
            self.bit_position += 1;

            if self.bit_position == 8 {
                let byte = self.current_byte;
                self.writer()?.write_all(&[byte])?;
                self.current_byte = 0;
                self.bit_position = 0;
            }
        }
        self.bits_written += num_bits as u64;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        let Some(writer) = self.inner.as_mut() else {
            return Ok(());
        };
        if self.bit_position > 0 {
            writer.write_all(&[self.current_byte])?;
            self.current_byte = 0;
            self.bit_position = 0;
        }
        writer.flush()?;
        self.closed = true;
        Ok(())
    }

    fn bits_written(&self) -> u64 {
        self.bits_written
    }
}

impl<W: Write> Drop for BitOutputStream<W> {
    fn drop(&mut self) {
        if !self.closed && self.inner.is_some() {
            if let Err(e) = self.close() {
                warn!("Failed to flush bit stream on drop: {}", e);
            }
        }
    }
}
