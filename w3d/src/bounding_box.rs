use crate::chunk::{Chunk, ChunkHeader};
use crate::version::BOX_VERSION;
use crate::{ChunkReader, ChunkWriter, Error, Rgba, Vector3, Version};

/// Collision attribute bits of a [`BoundingBox`].
pub mod collision {
    pub const ORIENTED: u32 = 0x0000_0001;
    pub const ALIGNED: u32 = 0x0000_0002;
    pub const PHYSICAL: u32 = 0x0000_0010;
    pub const PROJECTILE: u32 = 0x0000_0020;
    pub const VIS: u32 = 0x0000_0040;
    pub const CAMERA: u32 = 0x0000_0080;
    pub const VEHICLE: u32 = 0x0000_0100;
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    pub version: Version,
    pub attributes: u32,
    /// `container.box` name.
    pub name: String,
    pub color: Rgba,
    pub center: Vector3,
    /// Half extents along each axis.
    pub extend: Vector3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            version: BOX_VERSION,
            attributes: collision::ORIENTED,
            name: String::new(),
            color: Rgba::default(),
            center: Vector3::ZERO,
            extend: Vector3::ZERO,
        }
    }
}

impl Chunk for BoundingBox {
    fn body_size(&self) -> u32 {
        68
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        Ok(Self {
            version: Version::read(reader)?,
            attributes: reader.read_u32()?,
            name: reader.read_long_name()?,
            color: reader.read_rgba()?,
            center: reader.read_vector3()?,
            extend: reader.read_vector3()?,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        self.version.write(writer);
        writer.write_u32(self.attributes);
        writer.write_long_name(&self.name);
        writer.write_rgba(self.color);
        writer.write_vector3(self.center);
        writer.write_vector3(self.extend);
        Ok(())
    }
}
