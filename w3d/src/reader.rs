//! Little-endian primitive reads over an in-memory byte slice.
//!
//! The reader is IO-free and never mutates the slice, so several readers may decode the same
//! buffer concurrently.

use crate::{Error, Quaternion, Rgba, Vector2, Vector3};
use byteorder::{ByteOrder, LittleEndian};

/// Width of a short fixed string slot (names).
pub const NAME_LEN: usize = 16;
/// Width of a long fixed string slot (`container.name` style names).
pub const LONG_NAME_LEN: usize = 32;

/// Knobs for reading whole files.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ReadOptions {
    /// Log skipped unknown chunks at `warn` instead of `debug` level.
    pub warn_unknown_chunks: bool,
    /// Fail on recoverable errors instead of skipping the offending top-level chunk.
    pub strict: bool,
}

#[derive(Clone, Debug)]
pub struct ChunkReader<'a> {
    bytes: &'a [u8],
    cursor: usize,
    options: ReadOptions,
}

impl<'a> ChunkReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self::with_options(bytes, ReadOptions::default())
    }

    pub fn with_options(bytes: &'a [u8], options: ReadOptions) -> Self {
        Self {
            bytes,
            cursor: 0,
            options,
        }
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.cursor)
    }

    /// Moves the cursor to an absolute offset. Seeking to the end of the buffer is allowed.
    pub fn seek(&mut self, offset: usize) -> Result<(), Error> {
        if offset > self.bytes.len() {
            return Err(Error::UnexpectedEof {
                offset: self.cursor,
                needed: offset - self.cursor,
                available: self.remaining(),
            });
        }
        self.cursor = offset;
        Ok(())
    }

    /// Fails unless `count` records of `size` bytes each are left to read.
    ///
    /// Call before reserving storage for a count taken from the wire.
    pub fn check_count(&self, count: usize, size: usize) -> Result<usize, Error> {
        match count.checked_mul(size) {
            Some(needed) if needed <= self.remaining() => Ok(count),
            needed => Err(Error::UnexpectedEof {
                offset: self.cursor,
                needed: needed.unwrap_or(usize::MAX),
                available: self.remaining(),
            }),
        }
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < needed {
            return Err(Error::UnexpectedEof {
                offset: self.cursor,
                needed,
                available: self.remaining(),
            });
        }
        let out = &self.bytes[self.cursor..self.cursor + needed];
        self.cursor += needed;
        Ok(out)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], Error> {
        self.take(len)
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, Error> {
        Ok(self.read_u8()? as i8)
    }

    pub fn read_u16(&mut self) -> Result<u16, Error> {
        Ok(LittleEndian::read_u16(self.take(2)?))
    }

    pub fn read_i16(&mut self) -> Result<i16, Error> {
        Ok(LittleEndian::read_i16(self.take(2)?))
    }

    pub fn read_u32(&mut self) -> Result<u32, Error> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    pub fn read_i32(&mut self) -> Result<i32, Error> {
        Ok(LittleEndian::read_i32(self.take(4)?))
    }

    pub fn read_f32(&mut self) -> Result<f32, Error> {
        Ok(LittleEndian::read_f32(self.take(4)?))
    }

    pub fn read_vector2(&mut self) -> Result<Vector2, Error> {
        Ok(Vector2 {
            x: self.read_f32()?,
            y: self.read_f32()?,
        })
    }

    pub fn read_vector3(&mut self) -> Result<Vector3, Error> {
        Ok(Vector3 {
            x: self.read_f32()?,
            y: self.read_f32()?,
            z: self.read_f32()?,
        })
    }

    /// Reads `(x, y, z, w)` from the wire into a scalar-first quaternion.
    pub fn read_quaternion(&mut self) -> Result<Quaternion, Error> {
        let x = self.read_f32()?;
        let y = self.read_f32()?;
        let z = self.read_f32()?;
        let w = self.read_f32()?;
        Ok(Quaternion { w, x, y, z })
    }

    pub fn read_rgba(&mut self) -> Result<Rgba, Error> {
        Ok(Rgba {
            r: self.read_u8()?,
            g: self.read_u8()?,
            b: self.read_u8()?,
            a: self.read_u8()?,
        })
    }

    /// Reads a 16-byte NUL-padded name.
    pub fn read_name(&mut self) -> Result<String, Error> {
        self.read_fixed_string(NAME_LEN)
    }

    /// Reads a 32-byte NUL-padded name.
    pub fn read_long_name(&mut self) -> Result<String, Error> {
        self.read_fixed_string(LONG_NAME_LEN)
    }

    /// Reads a NUL-padded string occupying exactly `len` bytes.
    ///
    /// The value also ends at the first backslash: old exporters leaked directory separators
    /// into name slots.
    pub fn read_fixed_string(&mut self, len: usize) -> Result<String, Error> {
        let raw = self.take(len)?;
        let end = raw
            .iter()
            .position(|&b| b == 0 || b == b'\\')
            .unwrap_or(raw.len());
        Ok(String::from_utf8_lossy(&raw[..end]).into_owned())
    }

    /// Reads a NUL-terminated string, consuming the terminator.
    ///
    /// A string running into `end` without a terminator ends there.
    pub fn read_string(&mut self, end: usize) -> Result<String, Error> {
        let end = end.min(self.bytes.len());
        let start = self.cursor.min(end);
        let raw = &self.bytes[start..end];
        let (len, consumed) = match raw.iter().position(|&b| b == 0) {
            Some(nul) => (nul, nul + 1),
            None => (raw.len(), raw.len()),
        };
        let s = String::from_utf8_lossy(&raw[..len]).into_owned();
        self.cursor = start + consumed;
        Ok(s)
    }
}
