//! Chunk framing, the size model and the skip-unknown dispatch loop.
//!
//! Every chunk starts with an 8-byte header: a `u32` type tag and a `u32` size whose bit 31
//! hints that the body holds child chunks. Readers bound their scan on the masked size only.

use crate::{ChunkReader, ChunkWriter, Error};

pub const HEADER_SIZE: u32 = 8;
pub const HAS_CHILDREN_FLAG: u32 = 0x8000_0000;
pub const SIZE_MASK: u32 = 0x7FFF_FFFF;

/// Known chunk type tags.
pub mod tags {
    pub const MESH: u32 = 0x0000;
    pub const VERTICES: u32 = 0x0002;
    pub const VERTEX_NORMALS: u32 = 0x0003;
    pub const MESH_USER_TEXT: u32 = 0x000C;
    pub const VERTEX_INFLUENCES: u32 = 0x000E;
    pub const MESH_HEADER: u32 = 0x001F;
    pub const TRIANGLES: u32 = 0x0020;

    pub const HIERARCHY: u32 = 0x0100;
    pub const HIERARCHY_HEADER: u32 = 0x0101;
    pub const PIVOTS: u32 = 0x0102;
    pub const PIVOT_FIXUPS: u32 = 0x0103;

    pub const ANIMATION: u32 = 0x0200;
    pub const ANIMATION_HEADER: u32 = 0x0201;
    pub const ANIMATION_CHANNEL: u32 = 0x0202;
    pub const BIT_CHANNEL: u32 = 0x0203;

    pub const COMPRESSED_ANIMATION: u32 = 0x0280;
    pub const COMPRESSED_ANIMATION_HEADER: u32 = 0x0281;
    pub const COMPRESSED_ANIMATION_CHANNEL: u32 = 0x0282;
    pub const COMPRESSED_BIT_CHANNEL: u32 = 0x0283;
    pub const COMPRESSED_ANIMATION_MOTION_CHANNEL: u32 = 0x0284;

    pub const HLOD: u32 = 0x0700;
    pub const HLOD_HEADER: u32 = 0x0701;
    pub const HLOD_LOD_ARRAY: u32 = 0x0702;
    pub const HLOD_SUB_OBJECT_ARRAY_HEADER: u32 = 0x0703;
    pub const HLOD_SUB_OBJECT: u32 = 0x0704;
    pub const HLOD_AGGREGATE_ARRAY: u32 = 0x0705;
    pub const HLOD_PROXY_ARRAY: u32 = 0x0706;

    pub const BOX: u32 = 0x0740;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ChunkHeader {
    pub tag: u32,
    /// Body length with the has-children bit masked off.
    pub size: u32,
    pub has_children: bool,
    pub body_start: usize,
    pub body_end: usize,
}

impl ChunkHeader {
    /// Offset of the header itself.
    pub fn offset(&self) -> usize {
        self.body_start - HEADER_SIZE as usize
    }
}

/// A value with a fixed binary layout that can be framed as a chunk body.
///
/// `body_size` must equal the number of bytes `write_body` produces; `ChunkWriter::write_chunk`
/// rejects any disagreement with `Error::SizeMismatch`.
pub trait Chunk: Sized {
    const HAS_CHILDREN: bool = false;

    /// Serialized body length, excluding this chunk's own header.
    fn body_size(&self) -> u32;

    fn serialized_size(&self, include_header: bool) -> u32 {
        let header = if include_header { HEADER_SIZE } else { 0 };
        header.saturating_add(self.body_size())
    }

    /// Reads the body described by `header`. The reader is positioned at `header.body_start`.
    fn read_body(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, Error>;

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error>;
}

/// Size of a child chunk including its header, or zero when absent.
pub fn child_size<T: Chunk>(child: Option<&T>) -> u32 {
    child.map_or(0, |c| c.serialized_size(true))
}

/// Size of a list of sibling chunks, each with its own header.
pub fn children_size<T: Chunk>(children: &[T]) -> u32 {
    sum_sizes(children.iter().map(|c| c.serialized_size(true)))
}

/// Adds body parts, saturating at `u32::MAX`.
///
/// A saturated total is above `SIZE_MASK`, so the writer refuses to frame it.
pub fn sum_sizes(parts: impl IntoIterator<Item = u32>) -> u32 {
    parts.into_iter().fold(0, u32::saturating_add)
}

/// Size of `count` records of `size` bytes each, saturating at `u32::MAX`.
pub fn array_size(count: usize, size: u32) -> u32 {
    u32::try_from(count)
        .ok()
        .and_then(|n| n.checked_mul(size))
        .unwrap_or(u32::MAX)
}

/// Body size of `value`, or an error when it does not fit the 31-bit size field.
pub(crate) fn framed_body_size<T: Chunk>(tag: u32, value: &T) -> Result<u32, Error> {
    let size = value.body_size();
    if size > SIZE_MASK {
        return Err(Error::invalid_value(format!(
            "chunk {tag:#06x} body of {size} bytes exceeds the {SIZE_MASK} byte limit"
        )));
    }
    Ok(size)
}

/// A fixed-width record stored back to back inside an array chunk.
pub trait FixedElement: Sized {
    const SIZE: u32;

    fn read(reader: &mut ChunkReader<'_>) -> Result<Self, Error>;

    fn write(&self, writer: &mut ChunkWriter);
}

impl<T: FixedElement> Chunk for Vec<T> {
    fn body_size(&self) -> u32 {
        array_size(self.len(), T::SIZE)
    }

    fn read_body(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, Error> {
        let count = header.size / T::SIZE;
        if header.size % T::SIZE != 0 {
            log::warn!(
                "chunk {:#06x} size {} is not a multiple of {}; ignoring trailing bytes",
                header.tag,
                header.size,
                T::SIZE
            );
        }
        let mut out = Vec::with_capacity(reader.check_count(count as usize, T::SIZE as usize)?);
        for _ in 0..count {
            out.push(T::read(reader)?);
        }
        Ok(out)
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        for element in self {
            element.write(writer);
        }
        Ok(())
    }
}

impl FixedElement for crate::Vector3 {
    const SIZE: u32 = 12;

    fn read(reader: &mut ChunkReader<'_>) -> Result<Self, Error> {
        reader.read_vector3()
    }

    fn write(&self, writer: &mut ChunkWriter) {
        writer.write_vector3(*self);
    }
}

impl ChunkReader<'_> {
    pub fn read_chunk_header(&mut self) -> Result<ChunkHeader, Error> {
        let tag = self.read_u32()?;
        let raw = self.read_u32()?;
        let size = raw & SIZE_MASK;
        let body_start = self.position();
        let body_end = body_start + size as usize;
        if body_end > self.len() {
            return Err(Error::UnexpectedEof {
                offset: body_start,
                needed: size as usize,
                available: self.remaining(),
            });
        }
        log::trace!("chunk {tag:#06x} at {}: {size} bytes", body_start - 8);
        Ok(ChunkHeader {
            tag,
            size,
            has_children: raw & HAS_CHILDREN_FLAG != 0,
            body_start,
            body_end,
        })
    }

    /// Reads the body of an already-parsed header and leaves the cursor at `header.body_end`.
    pub fn read_chunk<T: Chunk>(&mut self, header: &ChunkHeader) -> Result<T, Error> {
        let value =
            T::read_body(self, header).map_err(|e| e.in_chunk(header.tag, header.offset()))?;
        self.resync(header)?;
        Ok(value)
    }

    /// Seeks to `header.body_end`, warning when the body reader stopped elsewhere.
    fn resync(&mut self, header: &ChunkHeader) -> Result<(), Error> {
        let position = self.position();
        if position != header.body_end {
            log::warn!(
                "chunk {:#06x} at {} declared {} bytes but its reader consumed {}",
                header.tag,
                header.offset(),
                header.size,
                position as isize - header.body_start as isize
            );
        }
        self.seek(header.body_end)
    }
}

/// Reads sibling chunks until `end`, handing each header to `dispatch`.
///
/// `dispatch` returns `Ok(true)` when it recognised the tag. Unrecognised chunks are skipped by
/// their declared size. After every chunk the cursor is moved to the declared end, whatever the
/// reader consumed.
pub fn read_chunks<'a, F>(
    reader: &mut ChunkReader<'a>,
    end: usize,
    mut dispatch: F,
) -> Result<(), Error>
where
    F: FnMut(&mut ChunkReader<'a>, &ChunkHeader) -> Result<bool, Error>,
{
    while reader.position() < end {
        let header = reader.read_chunk_header()?;
        if header.body_end > end {
            return Err(Error::UnexpectedEof {
                offset: header.body_start,
                needed: header.size as usize,
                available: end - header.body_start,
            });
        }
        let handled =
            dispatch(reader, &header).map_err(|e| e.in_chunk(header.tag, header.offset()))?;
        if handled {
            reader.resync(&header)?;
        } else {
            if reader.options().warn_unknown_chunks {
                log::warn!(
                    "skipping unknown chunk {:#06x} at {} ({} bytes)",
                    header.tag,
                    header.offset(),
                    header.size
                );
            } else {
                log::debug!(
                    "skipping unknown chunk {:#06x} at {} ({} bytes)",
                    header.tag,
                    header.offset(),
                    header.size
                );
            }
            reader.seek(header.body_end)?;
        }
    }
    Ok(())
}

/// Decodes a single framed chunk of type `tag` from `bytes`.
pub fn decode_chunk<T: Chunk>(tag: u32, bytes: &[u8]) -> Result<T, Error> {
    let mut reader = ChunkReader::new(bytes);
    let header = reader.read_chunk_header()?;
    if header.tag != tag {
        return Err(Error::InvalidDiscriminant {
            field: "chunk tag",
            value: header.tag,
            offset: 0,
        });
    }
    reader.read_chunk(&header)
}

/// Encodes `value` as a single framed chunk of type `tag`.
pub fn encode_chunk<T: Chunk>(tag: u32, value: &T) -> Result<Vec<u8>, Error> {
    let body = framed_body_size(tag, value)?;
    let mut writer = ChunkWriter::with_capacity((HEADER_SIZE + body) as usize);
    writer.write_chunk(tag, value)?;
    Ok(writer.into_bytes())
}
