//! Little-endian primitive writes into an owned buffer.

use crate::chunk::{Chunk, HAS_CHILDREN_FLAG, framed_body_size};
use crate::reader::{LONG_NAME_LEN, NAME_LEN};
use crate::{Error, Quaternion, Rgba, Vector2, Vector3};
use byteorder::{ByteOrder, LittleEndian};

#[derive(Clone, Debug, Default)]
pub struct ChunkWriter {
    buf: Vec<u8>,
}

impl ChunkWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_zeros(&mut self, count: usize) {
        self.buf.resize(self.buf.len() + count, 0);
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_i8(&mut self, v: i8) {
        self.buf.push(v as u8);
    }

    pub fn write_u16(&mut self, v: u16) {
        let mut b = [0u8; 2];
        LittleEndian::write_u16(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_i16(&mut self, v: i16) {
        let mut b = [0u8; 2];
        LittleEndian::write_i16(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_u32(&mut self, v: u32) {
        let mut b = [0u8; 4];
        LittleEndian::write_u32(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_i32(&mut self, v: i32) {
        let mut b = [0u8; 4];
        LittleEndian::write_i32(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_f32(&mut self, v: f32) {
        let mut b = [0u8; 4];
        LittleEndian::write_f32(&mut b, v);
        self.buf.extend_from_slice(&b);
    }

    pub fn write_vector2(&mut self, v: Vector2) {
        self.write_f32(v.x);
        self.write_f32(v.y);
    }

    pub fn write_vector3(&mut self, v: Vector3) {
        self.write_f32(v.x);
        self.write_f32(v.y);
        self.write_f32(v.z);
    }

    /// Writes a scalar-first quaternion in `(x, y, z, w)` wire order.
    pub fn write_quaternion(&mut self, q: Quaternion) {
        self.write_f32(q.x);
        self.write_f32(q.y);
        self.write_f32(q.z);
        self.write_f32(q.w);
    }

    pub fn write_rgba(&mut self, c: Rgba) {
        self.buf.extend_from_slice(&[c.r, c.g, c.b, c.a]);
    }

    pub fn write_name(&mut self, s: &str) {
        self.write_fixed_string(s, NAME_LEN);
    }

    pub fn write_long_name(&mut self, s: &str) {
        self.write_fixed_string(s, LONG_NAME_LEN);
    }

    /// Writes `s` NUL-padded into a slot of exactly `len` bytes.
    ///
    /// At least one NUL always terminates the slot; longer values are truncated with a warning.
    pub fn write_fixed_string(&mut self, s: &str, len: usize) {
        let max = len.saturating_sub(1);
        let mut end = s.len();
        if end > max {
            end = max;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            log::warn!(
                "string {s:?} is longer than {max} bytes; truncated to {:?}",
                &s[..end]
            );
        }
        self.buf.extend_from_slice(&s.as_bytes()[..end]);
        self.write_zeros(len - end);
    }

    /// Writes `s` followed by a single NUL.
    pub fn write_string(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
    }

    pub fn write_chunk_header(&mut self, tag: u32, size: u32, has_children: bool) {
        self.write_u32(tag);
        let flag = if has_children { HAS_CHILDREN_FLAG } else { 0 };
        self.write_u32(size | flag);
    }

    /// Writes `value` as a complete chunk: header, then body.
    ///
    /// The size is computed before anything is written and checked against the bytes the body
    /// actually produced. Bodies too large for the 31-bit size field are refused up front.
    pub fn write_chunk<T: Chunk>(&mut self, tag: u32, value: &T) -> Result<(), Error> {
        let declared = framed_body_size(tag, value)?;
        self.write_chunk_header(tag, declared, T::HAS_CHILDREN);
        let start = self.position();
        value.write_body(self)?;
        let written = self.position() - start;
        if written != declared as usize {
            return Err(Error::SizeMismatch {
                tag,
                declared,
                written,
            });
        }
        Ok(())
    }
}

impl From<ChunkWriter> for Vec<u8> {
    fn from(w: ChunkWriter) -> Self {
        w.into_bytes()
    }
}
