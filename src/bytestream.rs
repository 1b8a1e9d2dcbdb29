use super::*;

extern crate byteorder;
use self::byteorder::{ByteOrder, BigEndian, LittleEndian};

///A bounded cursor over a borrowed byte buffer.
///
///All reads advance the position and signal an under-run explicitly with
///[`ReadError::UnexpectedEndOfSlice`] carrying the minimum buffer length that
///would have been required for the read to succeed.
#[derive(Clone, Debug)]
pub struct ByteReader<'a> {
    slice: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {

    ///Creates a reader over the given slice, positioned at its start.
    pub fn new(slice: &'a [u8]) -> ByteReader<'a> {
        ByteReader {
            slice,
            pos: 0
        }
    }

    ///Returns the current position of the reader.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    ///Returns the number of bytes that can still be read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.slice.len() - self.pos
    }

    ///Returns true if at least `size` more bytes can be read.
    #[inline]
    pub fn can_read(&self, size: usize) -> bool {
        size <= self.remaining()
    }

    ///Returns the not yet consumed part of the underlying slice.
    #[inline]
    pub fn pointer(&self) -> &'a [u8] {
        &self.slice[self.pos..]
    }

    fn take(&mut self, size: usize) -> Result<&'a [u8], ReadError> {
        if self.can_read(size) {
            let result = &self.slice[self.pos..self.pos + size];
            self.pos += size;
            Ok(result)
        } else {
            Err(ReadError::UnexpectedEndOfSlice(self.pos + size))
        }
    }

    ///Advances the position by `size` bytes without interpreting them.
    pub fn skip(&mut self, size: usize) -> Result<(), ReadError> {
        self.take(size).map(|_| ())
    }

    ///Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        self.take(1).map(|s| s[0])
    }

    ///Reads a big endian encoded u16.
    pub fn read_u16_be(&mut self) -> Result<u16, ReadError> {
        self.take(2).map(BigEndian::read_u16)
    }

    ///Reads a little endian encoded u16.
    pub fn read_u16_le(&mut self) -> Result<u16, ReadError> {
        self.take(2).map(LittleEndian::read_u16)
    }

    ///Reads a big endian encoded u32.
    pub fn read_u32_be(&mut self) -> Result<u32, ReadError> {
        self.take(4).map(BigEndian::read_u32)
    }

    ///Reads a little endian encoded u32.
    pub fn read_u32_le(&mut self) -> Result<u32, ReadError> {
        self.take(4).map(LittleEndian::read_u32)
    }

    ///Reads a big endian encoded u64.
    pub fn read_u64_be(&mut self) -> Result<u64, ReadError> {
        self.take(8).map(BigEndian::read_u64)
    }

    ///Reads a little endian encoded u64.
    pub fn read_u64_le(&mut self) -> Result<u64, ReadError> {
        self.take(8).map(LittleEndian::read_u64)
    }

    ///Reads `size` bytes and returns them as a subslice of the input.
    pub fn read_slice(&mut self, size: usize) -> Result<&'a [u8], ReadError> {
        self.take(size)
    }

    ///Copies bytes into the given buffer, filling it entirely.
    pub fn read_exact(&mut self, target: &mut [u8]) -> Result<(), ReadError> {
        let source = self.take(target.len())?;
        target.copy_from_slice(source);
        Ok(())
    }
}

///Mirror of [`ByteReader`] that writes into a borrowed mutable buffer.
///
///The writer is used to fill buffers that were pre-sized via `header_size()`,
///so running past the end of the buffer is a contract violation by the caller
///and panics (like any out of bounds slice access).
#[derive(Debug)]
pub struct ByteWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ByteWriter<'a> {

    ///Creates a writer over the given buffer, positioned at its start.
    pub fn new(buf: &'a mut [u8]) -> ByteWriter<'a> {
        ByteWriter {
            buf,
            pos: 0
        }
    }

    ///Returns the number of bytes written so far.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    ///Writes a single byte.
    pub fn write_u8(&mut self, value: u8) {
        self.buf[self.pos] = value;
        self.pos += 1;
    }

    ///Writes a u16 in big endian byte order.
    pub fn write_u16_be(&mut self, value: u16) {
        BigEndian::write_u16(&mut self.buf[self.pos..self.pos + 2], value);
        self.pos += 2;
    }

    ///Writes a u16 in little endian byte order.
    pub fn write_u16_le(&mut self, value: u16) {
        LittleEndian::write_u16(&mut self.buf[self.pos..self.pos + 2], value);
        self.pos += 2;
    }

    ///Writes a u32 in big endian byte order.
    pub fn write_u32_be(&mut self, value: u32) {
        BigEndian::write_u32(&mut self.buf[self.pos..self.pos + 4], value);
        self.pos += 4;
    }

    ///Writes a u32 in little endian byte order.
    pub fn write_u32_le(&mut self, value: u32) {
        LittleEndian::write_u32(&mut self.buf[self.pos..self.pos + 4], value);
        self.pos += 4;
    }

    ///Writes a u64 in little endian byte order.
    pub fn write_u64_le(&mut self, value: u64) {
        LittleEndian::write_u64(&mut self.buf[self.pos..self.pos + 8], value);
        self.pos += 8;
    }

    ///Copies the given bytes into the buffer.
    pub fn write_slice(&mut self, value: &[u8]) {
        self.buf[self.pos..self.pos + value.len()].copy_from_slice(value);
        self.pos += value.len();
    }
}
