//! Packed `major.minor` chunk versions.

use crate::{ChunkReader, ChunkWriter, Error};

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}

impl Version {
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    pub const fn from_u32(raw: u32) -> Self {
        Self {
            major: (raw >> 16) as u16,
            minor: (raw & 0xFFFF) as u16,
        }
    }

    pub const fn to_u32(self) -> u32 {
        ((self.major as u32) << 16) | self.minor as u32
    }

    pub(crate) fn read(reader: &mut ChunkReader<'_>) -> Result<Self, Error> {
        Ok(Self::from_u32(reader.read_u32()?))
    }

    pub(crate) fn write(self, writer: &mut ChunkWriter) {
        writer.write_u32(self.to_u32());
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Version written by exporters for mesh headers.
pub const MESH_VERSION: Version = Version::new(4, 2);
/// Version written by exporters for hierarchy and animation headers.
pub const HIERARCHY_VERSION: Version = Version::new(4, 1);
pub const ANIMATION_VERSION: Version = Version::new(4, 1);
pub const COMPRESSED_ANIMATION_VERSION: Version = Version::new(4, 1);
pub const HLOD_VERSION: Version = Version::new(1, 0);
pub const BOX_VERSION: Version = Version::new(1, 0);
