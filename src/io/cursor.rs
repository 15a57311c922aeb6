// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Little-endian primitive reader over a blocking byte source.
//!
//! [`ByteCursor`] is the only thing in the crate that touches the underlying
//! [`Read`] implementation. It counts every byte it consumes so errors can
//! report where in the stream decoding stopped.

use std::io::{self, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::{BagError, Result};

/// Forward-only cursor decoding little-endian primitives from a byte source.
///
/// Every read either consumes exactly the requested number of bytes or fails
/// with [`BagError::UnexpectedEof`]. The source is borrowed or owned as `R`
/// and never closed by the cursor.
///
/// # Example
///
/// ```
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use bagstream::io::ByteCursor;
///
/// let data = [0x2A, 0x00, 0x00, 0x00];
/// let mut cursor = ByteCursor::new(&data[..]);
/// assert_eq!(cursor.read_i32()?, 42);
/// assert_eq!(cursor.position(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ByteCursor<R: ?Sized> {
    /// Bytes consumed so far
    position: u64,
    /// Underlying byte source
    inner: R,
}

impl<R: Read> ByteCursor<R> {
    /// Wrap a byte source.
    pub fn new(inner: R) -> Self {
        Self { position: 0, inner }
    }

    /// Return the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + ?Sized> ByteCursor<R> {
    /// Bytes consumed from the source so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    fn map_err(&self, err: io::Error, context: &str) -> BagError {
        BagError::from_io(err, context, self.position)
    }

    /// Read one unsigned byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        let value = self
            .inner
            .read_u8()
            .map_err(|e| self.map_err(e, "u8"))?;
        self.position += 1;
        Ok(value)
    }

    /// Read a little-endian unsigned 16-bit integer.
    pub fn read_u16(&mut self) -> Result<u16> {
        let value = self
            .inner
            .read_u16::<LittleEndian>()
            .map_err(|e| self.map_err(e, "u16"))?;
        self.position += 2;
        Ok(value)
    }

    /// Read a little-endian unsigned 32-bit integer.
    pub fn read_u32(&mut self) -> Result<u32> {
        let value = self
            .inner
            .read_u32::<LittleEndian>()
            .map_err(|e| self.map_err(e, "u32"))?;
        self.position += 4;
        Ok(value)
    }

    /// Read a little-endian signed 32-bit integer.
    pub fn read_i32(&mut self) -> Result<i32> {
        let value = self
            .inner
            .read_i32::<LittleEndian>()
            .map_err(|e| self.map_err(e, "i32"))?;
        self.position += 4;
        Ok(value)
    }

    /// Read a little-endian signed 64-bit integer.
    pub fn read_i64(&mut self) -> Result<i64> {
        let value = self
            .inner
            .read_i64::<LittleEndian>()
            .map_err(|e| self.map_err(e, "i64"))?;
        self.position += 8;
        Ok(value)
    }

    /// Read a little-endian IEEE-754 single.
    pub fn read_f32(&mut self) -> Result<f32> {
        let value = self
            .inner
            .read_f32::<LittleEndian>()
            .map_err(|e| self.map_err(e, "f32"))?;
        self.position += 4;
        Ok(value)
    }

    /// Read a little-endian IEEE-754 double.
    pub fn read_f64(&mut self) -> Result<f64> {
        let value = self
            .inner
            .read_f64::<LittleEndian>()
            .map_err(|e| self.map_err(e, "f64"))?;
        self.position += 8;
        Ok(value)
    }

    /// Fill `buf` completely from the source.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        self.inner
            .read_exact(buf)
            .map_err(|e| self.map_err(e, "raw bytes"))?;
        self.position += buf.len() as u64;
        Ok(())
    }

    /// Read exactly `count` raw bytes.
    ///
    /// The buffer grows with the data actually delivered, so a bogus length
    /// near the end of the source fails without a large up-front allocation.
    pub fn read_bytes(&mut self, count: u64) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let result = (&mut self.inner).take(count).read_to_end(&mut buf);
        let read = result.map_err(|e| self.map_err(e, "raw bytes"))?;
        self.position += read as u64;
        if (read as u64) < count {
            return Err(BagError::unexpected_eof("raw bytes", self.position));
        }
        Ok(buf)
    }

    /// Consume exactly `count` bytes, blocking until all of them arrived.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        let mut limited = (&mut self.inner).take(count);
        let result = io::copy(&mut limited, &mut io::sink());
        let skipped = result.map_err(|e| self.map_err(e, "skipped bytes"))?;
        self.position += skipped;
        if skipped < count {
            return Err(BagError::unexpected_eof("skipped bytes", self.position));
        }
        Ok(())
    }

    /// Read a little-endian `u32`, or `None` if the source is already exhausted.
    ///
    /// Running out after the first byte of the integer is an
    /// [`BagError::UnexpectedEof`], not a clean end.
    pub fn try_read_u32(&mut self) -> Result<Option<u32>> {
        let mut first = [0u8; 1];
        loop {
            match self.inner.read(&mut first) {
                Ok(0) => return Ok(None),
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(self.map_err(e, "record length")),
            }
        }
        self.position += 1;

        let mut rest = [0u8; 3];
        self.inner
            .read_exact(&mut rest)
            .map_err(|e| self.map_err(e, "record length"))?;
        self.position += 3;

        Ok(Some(u32::from_le_bytes([first[0], rest[0], rest[1], rest[2]])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_read_i32_one() {
        let mut cursor = ByteCursor::new(&[1u8, 0, 0, 0][..]);
        assert_eq!(cursor.read_i32().unwrap(), 1);
    }

    #[test]
    fn test_read_i32_max() {
        let mut cursor = ByteCursor::new(&[0xFF, 0xFF, 0xFF, 0x7F][..]);
        assert_eq!(cursor.read_i32().unwrap(), i32::MAX);
    }

    #[test]
    fn test_read_i64_max() {
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x7F];
        let mut cursor = ByteCursor::new(&data[..]);
        assert_eq!(cursor.read_i64().unwrap(), i64::MAX);
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_read_u16() {
        let mut cursor = ByteCursor::new(&[0x34u8, 0x12, 0xFF][..]);
        assert_eq!(cursor.read_u16().unwrap(), 0x1234);
        assert!(cursor.read_u16().unwrap_err().is_unexpected_eof());
    }

    #[test]
    fn test_read_past_end_is_unexpected_eof() {
        let mut cursor = ByteCursor::new(&[1u8, 2][..]);
        let err = cursor.read_u32().unwrap_err();
        assert!(err.is_unexpected_eof());
    }

    #[test]
    fn test_read_bytes_short() {
        let mut cursor = ByteCursor::new(&[1u8, 2, 3][..]);
        let err = cursor.read_bytes(5).unwrap_err();
        assert!(matches!(err, BagError::UnexpectedEof { position: Some(3), .. }));
    }

    #[test]
    fn test_skip_exact() {
        let data = [0u8, 1, 2, 3, 4, 5];
        let mut cursor = ByteCursor::new(&data[..]);
        cursor.skip(4).unwrap();
        assert_eq!(cursor.read_u8().unwrap(), 4);
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_skip_past_end() {
        let mut cursor = ByteCursor::new(&[0u8; 3][..]);
        assert!(cursor.skip(4).unwrap_err().is_unexpected_eof());
    }

    /// A source that hands out one byte per `read` call, like a slow pipe.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.0.is_empty() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.0[0];
            self.0 = &self.0[1..];
            Ok(1)
        }
    }

    #[test]
    fn test_skip_does_not_stop_at_short_reads() {
        let data: Vec<u8> = (0..100).collect();
        let mut cursor = ByteCursor::new(Trickle(&data));
        cursor.skip(99).unwrap();
        assert_eq!(cursor.read_u8().unwrap(), 99);
    }

    #[test]
    fn test_try_read_u32_clean_end() {
        let mut cursor = ByteCursor::new(&[][..]);
        assert!(cursor.try_read_u32().unwrap().is_none());
    }

    #[test]
    fn test_try_read_u32_partial() {
        let mut cursor = ByteCursor::new(&[7u8, 0][..]);
        assert!(cursor.try_read_u32().unwrap_err().is_unexpected_eof());
    }

    #[test]
    fn test_try_read_u32_value() {
        let mut cursor = ByteCursor::new(Trickle(&[0x78, 0x56, 0x34, 0x12]));
        assert_eq!(cursor.try_read_u32().unwrap(), Some(0x1234_5678));
        assert!(cursor.try_read_u32().unwrap().is_none());
    }

    proptest! {
        #[test]
        fn prop_primitives_decode_their_le_encoding(
            a in any::<i32>(),
            b in any::<i64>(),
            c in any::<f32>(),
            d in any::<f64>(),
        ) {
            let mut data = Vec::new();
            data.extend_from_slice(&a.to_le_bytes());
            data.extend_from_slice(&b.to_le_bytes());
            data.extend_from_slice(&c.to_le_bytes());
            data.extend_from_slice(&d.to_le_bytes());

            let mut cursor = ByteCursor::new(&data[..]);
            prop_assert_eq!(cursor.read_i32().unwrap(), a);
            prop_assert_eq!(cursor.read_i64().unwrap(), b);
            prop_assert_eq!(cursor.read_f32().unwrap().to_bits(), c.to_bits());
            prop_assert_eq!(cursor.read_f64().unwrap().to_bits(), d.to_bits());
            prop_assert_eq!(cursor.position(), 24);
        }
    }
}
