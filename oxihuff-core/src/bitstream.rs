//! MSB-first bit stream operations.
//!
//! Huffman payloads are packed most significant bit first: the first code bit
//! written lands in bit 7 of the first byte. A partial final byte is padded
//! with zero bits, so `0001` becomes the byte `0b0001_0000`.
//!
//! # Example
//!
//! ```
//! use oxihuff_core::bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3);
//! writer.write_bits(0b1100, 4);
//! let data = writer.finish();
//!
//! let mut reader = BitReader::new(&data);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(4).unwrap(), 0b1100);
//! ```

use crate::error::{OxiHuffError, Result};

/// MSB-first bit reader over an in-memory byte slice.
#[derive(Debug)]
pub struct BitReader<'a> {
    /// Input data.
    data: &'a [u8],
    /// Current byte position.
    byte_pos: usize,
    /// Bit buffer (MSB-first).
    buffer: u64,
    /// Number of valid bits in buffer.
    bits_in_buffer: u8,
    /// Total bits read (for error reporting).
    total_bits_read: u64,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            byte_pos: 0,
            buffer: 0,
            bits_in_buffer: 0,
            total_bits_read: 0,
        }
    }

    /// Fill buffer with at least `count` bits.
    #[inline]
    fn fill_buffer(&mut self, count: u8) -> Result<()> {
        while self.bits_in_buffer < count && self.byte_pos < self.data.len() {
            let byte = self.data[self.byte_pos];
            self.byte_pos += 1;

            self.buffer = (self.buffer << 8) | (byte as u64);
            self.bits_in_buffer += 8;
        }

        if self.bits_in_buffer < count {
            return Err(OxiHuffError::unexpected_eof(self.total_bits_read));
        }

        Ok(())
    }

    /// Read up to 32 bits, first bit read in the most significant position.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        if count == 0 {
            return Ok(0);
        }

        self.fill_buffer(count)?;

        let shift = self.bits_in_buffer - count;
        let mask = (1u64 << count) - 1;
        let value = (self.buffer >> shift) & mask;

        self.bits_in_buffer -= count;
        self.total_bits_read += count as u64;

        Ok(value as u32)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        Ok(self.read_bits(1)? != 0)
    }

    /// Total bits read so far.
    pub fn bit_position(&self) -> u64 {
        self.total_bits_read
    }

    /// Bits not yet consumed, including any zero padding in the last byte.
    pub fn bits_remaining(&self) -> u64 {
        (self.data.len() - self.byte_pos) as u64 * 8 + self.bits_in_buffer as u64
    }
}

/// MSB-first bit writer that packs into an owned byte vector.
#[derive(Debug, Default)]
pub struct BitWriter {
    /// Output buffer.
    output: Vec<u8>,
    /// Bit buffer (MSB-first).
    buffer: u64,
    /// Number of bits in buffer; always below 8 between calls.
    bits_in_buffer: u8,
    /// Total bits written, excluding padding.
    total_bits_written: u64,
}

impl BitWriter {
    /// Create a new bit writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer whose output buffer can hold `bytes` without growing.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            output: Vec::with_capacity(bytes),
            ..Self::default()
        }
    }

    /// Write the low `count` bits of `value`, most significant first.
    ///
    /// `count` may be at most 56.
    #[inline]
    pub fn write_bits(&mut self, value: u64, count: u8) {
        debug_assert!(count <= 56, "Cannot write more than 56 bits at once");

        if count == 0 {
            return;
        }

        let mask = (1u64 << count) - 1;
        self.buffer = (self.buffer << count) | (value & mask);
        self.bits_in_buffer += count;
        self.total_bits_written += count as u64;

        while self.bits_in_buffer >= 8 {
            let byte = (self.buffer >> (self.bits_in_buffer - 8)) as u8;
            self.output.push(byte);
            self.bits_in_buffer -= 8;
        }
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.write_bits(bit as u64, 1);
    }

    /// Total bits written so far, excluding padding.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Number of zero bits `finish` will append to reach a byte boundary.
    pub fn padding_bits(&self) -> u8 {
        if self.bits_in_buffer == 0 {
            0
        } else {
            8 - self.bits_in_buffer
        }
    }

    /// Pad the final partial byte with zeros and return the packed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bits_in_buffer > 0 {
            let remaining = 8 - self.bits_in_buffer;
            let byte = ((self.buffer << remaining) & 0xFF) as u8;
            self.output.push(byte);
            self.buffer = 0;
            self.bits_in_buffer = 0;
        }
        self.output
    }
}
