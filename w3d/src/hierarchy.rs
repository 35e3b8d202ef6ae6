//! Skeleton hierarchy: named pivots with parent links and rest transforms.

use crate::chunk::{Chunk, ChunkHeader, FixedElement, child_size, read_chunks, sum_sizes, tags};
use crate::version::HIERARCHY_VERSION;
use crate::{ChunkReader, ChunkWriter, Error, Quaternion, Vector3, Version};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HierarchyHeader {
    pub version: Version,
    pub name: String,
    pub num_pivots: u32,
    pub center_pos: Vector3,
}

impl Default for HierarchyHeader {
    fn default() -> Self {
        Self {
            version: HIERARCHY_VERSION,
            name: String::new(),
            num_pivots: 0,
            center_pos: Vector3::ZERO,
        }
    }
}

impl Chunk for HierarchyHeader {
    fn body_size(&self) -> u32 {
        36
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        Ok(Self {
            version: Version::read(reader)?,
            name: reader.read_name()?,
            num_pivots: reader.read_u32()?,
            center_pos: reader.read_vector3()?,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        self.version.write(writer);
        writer.write_name(&self.name);
        writer.write_u32(self.num_pivots);
        writer.write_vector3(self.center_pos);
        Ok(())
    }
}

/// Parent index of the root pivot.
pub const NO_PARENT: i32 = -1;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pivot {
    pub name: String,
    /// Index of the parent pivot, or [`NO_PARENT`].
    pub parent_id: i32,
    pub translation: Vector3,
    pub euler_angles: Vector3,
    pub rotation: Quaternion,
}

impl Default for Pivot {
    fn default() -> Self {
        Self {
            name: String::new(),
            parent_id: NO_PARENT,
            translation: Vector3::ZERO,
            euler_angles: Vector3::ZERO,
            rotation: Quaternion::IDENTITY,
        }
    }
}

impl FixedElement for Pivot {
    const SIZE: u32 = 60;

    fn read(reader: &mut ChunkReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            name: reader.read_name()?,
            parent_id: reader.read_i32()?,
            translation: reader.read_vector3()?,
            euler_angles: reader.read_vector3()?,
            rotation: reader.read_quaternion()?,
        })
    }

    fn write(&self, writer: &mut ChunkWriter) {
        writer.write_name(&self.name);
        writer.write_i32(self.parent_id);
        writer.write_vector3(self.translation);
        writer.write_vector3(self.euler_angles);
        writer.write_quaternion(self.rotation);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Hierarchy {
    pub header: HierarchyHeader,
    pub pivots: Vec<Pivot>,
    pub pivot_fixups: Vec<Vector3>,
}

impl Hierarchy {
    pub fn pivot_index(&self, name: &str) -> Option<usize> {
        self.pivots.iter().position(|p| p.name == name)
    }
}

impl Chunk for Hierarchy {
    const HAS_CHILDREN: bool = true;

    fn body_size(&self) -> u32 {
        let fixups = (!self.pivot_fixups.is_empty()).then_some(&self.pivot_fixups);
        sum_sizes([
            self.header.serialized_size(true),
            self.pivots.serialized_size(true),
            child_size(fixups),
        ])
    }

    fn read_body(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, Error> {
        let mut hierarchy_header: Option<HierarchyHeader> = None;
        let mut pivots: Vec<Pivot> = Vec::new();
        let mut pivot_fixups: Vec<Vector3> = Vec::new();
        read_chunks(reader, header.body_end, |reader, child| {
            match child.tag {
                tags::HIERARCHY_HEADER => hierarchy_header = Some(reader.read_chunk(child)?),
                tags::PIVOTS => pivots = reader.read_chunk(child)?,
                tags::PIVOT_FIXUPS => pivot_fixups = reader.read_chunk(child)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        let hierarchy_header = hierarchy_header.ok_or(Error::MissingChunk {
            container: tags::HIERARCHY,
            tag: tags::HIERARCHY_HEADER,
        })?;
        if hierarchy_header.num_pivots as usize != pivots.len() {
            log::warn!(
                "hierarchy {:?} declares {} pivots but stores {}",
                hierarchy_header.name,
                hierarchy_header.num_pivots,
                pivots.len()
            );
        }
        Ok(Self {
            header: hierarchy_header,
            pivots,
            pivot_fixups,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        writer.write_chunk(tags::HIERARCHY_HEADER, &self.header)?;
        writer.write_chunk(tags::PIVOTS, &self.pivots)?;
        if !self.pivot_fixups.is_empty() {
            writer.write_chunk(tags::PIVOT_FIXUPS, &self.pivot_fixups)?;
        }
        Ok(())
    }
}
