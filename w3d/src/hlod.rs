//! Hierarchical level-of-detail description: which render objects hang off which pivots.

use crate::chunk::{Chunk, ChunkHeader, child_size, children_size, read_chunks, sum_sizes, tags};
use crate::version::HLOD_VERSION;
use crate::{ChunkReader, ChunkWriter, Error, Version};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HlodHeader {
    pub version: Version,
    pub lod_count: u32,
    pub model_name: String,
    pub hierarchy_name: String,
}

impl Default for HlodHeader {
    fn default() -> Self {
        Self {
            version: HLOD_VERSION,
            lod_count: 1,
            model_name: String::new(),
            hierarchy_name: String::new(),
        }
    }
}

impl Chunk for HlodHeader {
    fn body_size(&self) -> u32 {
        40
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        Ok(Self {
            version: Version::read(reader)?,
            lod_count: reader.read_u32()?,
            model_name: reader.read_name()?,
            hierarchy_name: reader.read_name()?,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        self.version.write(writer);
        writer.write_u32(self.lod_count);
        writer.write_name(&self.model_name);
        writer.write_name(&self.hierarchy_name);
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HlodArrayHeader {
    pub model_count: u32,
    pub max_screen_size: f32,
}

impl Chunk for HlodArrayHeader {
    fn body_size(&self) -> u32 {
        8
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        Ok(Self {
            model_count: reader.read_u32()?,
            max_screen_size: reader.read_f32()?,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        writer.write_u32(self.model_count);
        writer.write_f32(self.max_screen_size);
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HlodSubObject {
    pub bone_index: u32,
    /// `container.object` name of the render object.
    pub name: String,
}

/// Each sub object is framed as its own chunk.
impl Chunk for HlodSubObject {
    fn body_size(&self) -> u32 {
        36
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        Ok(Self {
            bone_index: reader.read_u32()?,
            name: reader.read_long_name()?,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        writer.write_u32(self.bone_index);
        writer.write_long_name(&self.name);
        Ok(())
    }
}

/// A LOD, aggregate or proxy array: a header followed by sub-object chunks.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HlodArray {
    pub header: HlodArrayHeader,
    pub sub_objects: Vec<HlodSubObject>,
}

impl HlodArray {
    pub fn new(max_screen_size: f32, sub_objects: Vec<HlodSubObject>) -> Self {
        Self {
            header: HlodArrayHeader {
                model_count: sub_objects.len() as u32,
                max_screen_size,
            },
            sub_objects,
        }
    }
}

impl Chunk for HlodArray {
    const HAS_CHILDREN: bool = true;

    fn body_size(&self) -> u32 {
        sum_sizes([
            self.header.serialized_size(true),
            children_size(&self.sub_objects),
        ])
    }

    fn read_body(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, Error> {
        let mut array_header: Option<HlodArrayHeader> = None;
        let mut sub_objects: Vec<HlodSubObject> = Vec::new();
        read_chunks(reader, header.body_end, |reader, child| {
            match child.tag {
                tags::HLOD_SUB_OBJECT_ARRAY_HEADER => {
                    array_header = Some(reader.read_chunk(child)?)
                }
                tags::HLOD_SUB_OBJECT => sub_objects.push(reader.read_chunk(child)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(Self {
            header: array_header.ok_or(Error::MissingChunk {
                container: header.tag,
                tag: tags::HLOD_SUB_OBJECT_ARRAY_HEADER,
            })?,
            sub_objects,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        writer.write_chunk(tags::HLOD_SUB_OBJECT_ARRAY_HEADER, &self.header)?;
        for sub_object in &self.sub_objects {
            writer.write_chunk(tags::HLOD_SUB_OBJECT, sub_object)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hlod {
    pub header: HlodHeader,
    pub lod_arrays: Vec<HlodArray>,
    pub aggregate_array: Option<HlodArray>,
    pub proxy_array: Option<HlodArray>,
}

impl Chunk for Hlod {
    const HAS_CHILDREN: bool = true;

    fn body_size(&self) -> u32 {
        sum_sizes([
            self.header.serialized_size(true),
            children_size(&self.lod_arrays),
            child_size(self.aggregate_array.as_ref()),
            child_size(self.proxy_array.as_ref()),
        ])
    }

    fn read_body(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, Error> {
        let mut hlod_header: Option<HlodHeader> = None;
        let mut lod_arrays: Vec<HlodArray> = Vec::new();
        let mut aggregate_array: Option<HlodArray> = None;
        let mut proxy_array: Option<HlodArray> = None;
        read_chunks(reader, header.body_end, |reader, child| {
            match child.tag {
                tags::HLOD_HEADER => hlod_header = Some(reader.read_chunk(child)?),
                tags::HLOD_LOD_ARRAY => lod_arrays.push(reader.read_chunk(child)?),
                tags::HLOD_AGGREGATE_ARRAY => aggregate_array = Some(reader.read_chunk(child)?),
                tags::HLOD_PROXY_ARRAY => proxy_array = Some(reader.read_chunk(child)?),
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        Ok(Self {
            header: hlod_header.ok_or(Error::MissingChunk {
                container: tags::HLOD,
                tag: tags::HLOD_HEADER,
            })?,
            lod_arrays,
            aggregate_array,
            proxy_array,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        writer.write_chunk(tags::HLOD_HEADER, &self.header)?;
        for lod in &self.lod_arrays {
            writer.write_chunk(tags::HLOD_LOD_ARRAY, lod)?;
        }
        if let Some(aggregate) = &self.aggregate_array {
            writer.write_chunk(tags::HLOD_AGGREGATE_ARRAY, aggregate)?;
        }
        if let Some(proxy) = &self.proxy_array {
            writer.write_chunk(tags::HLOD_PROXY_ARRAY, proxy)?;
        }
        Ok(())
    }
}
