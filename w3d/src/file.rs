//! Whole-file reading and writing.

use crate::chunk::{Chunk, ChunkHeader, child_size, children_size, read_chunks, sum_sizes, tags};
use crate::{
    Animation, BoundingBox, ChunkReader, ChunkWriter, CompressedAnimation, Error, Hierarchy, Hlod,
    Mesh, ReadOptions,
};
use std::path::Path;

/// Every top-level chunk this crate understands, in file order on write.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct W3dFile {
    pub hierarchy: Option<Hierarchy>,
    pub meshes: Vec<Mesh>,
    pub boxes: Vec<BoundingBox>,
    pub hlod: Option<Hlod>,
    pub animation: Option<Animation>,
    pub compressed_animation: Option<CompressedAnimation>,
}

impl W3dFile {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        Self::from_bytes_with_options(bytes, &ReadOptions::default())
    }

    /// Parses a whole file.
    ///
    /// A top-level chunk failing with a recoverable error is skipped with a warning unless
    /// `options.strict` is set.
    pub fn from_bytes_with_options(bytes: &[u8], options: &ReadOptions) -> Result<Self, Error> {
        let mut reader = ChunkReader::with_options(bytes, *options);
        let mut file = Self::default();
        let strict = options.strict;
        read_chunks(&mut reader, bytes.len(), |reader, header| {
            match file.read_top_level(reader, header) {
                Err(e) if !strict && e.is_recoverable() => {
                    log::warn!(
                        "skipping chunk {:#06x} at {}: {e}",
                        header.tag,
                        header.offset()
                    );
                    Ok(true)
                }
                other => other,
            }
        })?;
        Ok(file)
    }

    fn read_top_level(
        &mut self,
        reader: &mut ChunkReader<'_>,
        header: &ChunkHeader,
    ) -> Result<bool, Error> {
        match header.tag {
            tags::HIERARCHY => {
                replace_once(&mut self.hierarchy, reader.read_chunk(header)?, header)
            }
            tags::MESH => self.meshes.push(reader.read_chunk(header)?),
            tags::BOX => self.boxes.push(reader.read_chunk(header)?),
            tags::HLOD => replace_once(&mut self.hlod, reader.read_chunk(header)?, header),
            tags::ANIMATION => {
                replace_once(&mut self.animation, reader.read_chunk(header)?, header)
            }
            tags::COMPRESSED_ANIMATION => replace_once(
                &mut self.compressed_animation,
                reader.read_chunk(header)?,
                header,
            ),
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Total encoded length.
    pub fn serialized_size(&self) -> u32 {
        sum_sizes([
            child_size(self.hierarchy.as_ref()),
            children_size(&self.meshes),
            children_size(&self.boxes),
            child_size(self.hlod.as_ref()),
            child_size(self.animation.as_ref()),
            child_size(self.compressed_animation.as_ref()),
        ])
    }

    pub fn write_to(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        if let Some(hierarchy) = &self.hierarchy {
            writer.write_chunk(tags::HIERARCHY, hierarchy)?;
        }
        for mesh in &self.meshes {
            writer.write_chunk(tags::MESH, mesh)?;
        }
        for bounding_box in &self.boxes {
            writer.write_chunk(tags::BOX, bounding_box)?;
        }
        if let Some(hlod) = &self.hlod {
            writer.write_chunk(tags::HLOD, hlod)?;
        }
        if let Some(animation) = &self.animation {
            writer.write_chunk(tags::ANIMATION, animation)?;
        }
        if let Some(animation) = &self.compressed_animation {
            writer.write_chunk(tags::COMPRESSED_ANIMATION, animation)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut writer = ChunkWriter::with_capacity(self.serialized_size() as usize);
        self.write_to(&mut writer)?;
        Ok(writer.into_bytes())
    }

    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::read_file_with_options(path, &ReadOptions::default())
    }

    pub fn read_file_with_options(
        path: impl AsRef<Path>,
        options: &ReadOptions,
    ) -> Result<Self, Error> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes_with_options(&bytes, options)
    }

    pub fn write_file(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }
}

fn replace_once<T: Chunk>(slot: &mut Option<T>, value: T, header: &ChunkHeader) {
    if slot.is_some() {
        log::warn!(
            "duplicate top-level chunk {:#06x} at {}; keeping the last one",
            header.tag,
            header.offset()
        );
    }
    *slot = Some(value);
}
