//! Mesh geometry subset: header, vertices, normals, triangles, user text and bone influences.

use crate::chunk::{
    Chunk, ChunkHeader, FixedElement, HEADER_SIZE, array_size, read_chunks, sum_sizes, tags,
};
use crate::version::MESH_VERSION;
use crate::{ChunkReader, ChunkWriter, Error, Vector3, Version};

/// Mesh attribute bits.
pub mod attributes {
    pub const GEOMETRY_TYPE_NORMAL: u32 = 0x0000_0000;
    pub const GEOMETRY_TYPE_CAMERA_ALIGNED: u32 = 0x0001_0000;
    pub const GEOMETRY_TYPE_SKIN: u32 = 0x0002_0000;
    pub const GEOMETRY_TYPE_MASK: u32 = 0x00FF_0000;
    pub const HIDDEN: u32 = 0x0000_1000;
    pub const TWO_SIDED: u32 = 0x0000_2000;
    pub const CAST_SHADOW: u32 = 0x0000_8000;
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshHeader {
    pub version: Version,
    pub attrs: u32,
    pub mesh_name: String,
    pub container_name: String,
    pub num_tris: u32,
    pub num_verts: u32,
    pub num_materials: u32,
    pub num_damage_stages: u32,
    pub sort_level: i32,
    pub prelit_version: u32,
    pub future_counts: u32,
    pub vert_channel_flags: u32,
    pub face_channel_flags: u32,
    pub min_corner: Vector3,
    pub max_corner: Vector3,
    pub sph_center: Vector3,
    pub sph_radius: f32,
}

impl Default for MeshHeader {
    fn default() -> Self {
        Self {
            version: MESH_VERSION,
            attrs: attributes::GEOMETRY_TYPE_NORMAL,
            mesh_name: String::new(),
            container_name: String::new(),
            num_tris: 0,
            num_verts: 0,
            num_materials: 0,
            num_damage_stages: 0,
            sort_level: 0,
            prelit_version: 0,
            future_counts: 1,
            vert_channel_flags: 0,
            face_channel_flags: 1,
            min_corner: Vector3::ZERO,
            max_corner: Vector3::ZERO,
            sph_center: Vector3::ZERO,
            sph_radius: 0.0,
        }
    }
}

impl Chunk for MeshHeader {
    fn body_size(&self) -> u32 {
        116
    }

    fn read_body(reader: &mut ChunkReader<'_>, _header: &ChunkHeader) -> Result<Self, Error> {
        Ok(Self {
            version: Version::read(reader)?,
            attrs: reader.read_u32()?,
            mesh_name: reader.read_name()?,
            container_name: reader.read_name()?,
            num_tris: reader.read_u32()?,
            num_verts: reader.read_u32()?,
            num_materials: reader.read_u32()?,
            num_damage_stages: reader.read_u32()?,
            sort_level: reader.read_i32()?,
            prelit_version: reader.read_u32()?,
            future_counts: reader.read_u32()?,
            vert_channel_flags: reader.read_u32()?,
            face_channel_flags: reader.read_u32()?,
            min_corner: reader.read_vector3()?,
            max_corner: reader.read_vector3()?,
            sph_center: reader.read_vector3()?,
            sph_radius: reader.read_f32()?,
        })
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        self.version.write(writer);
        writer.write_u32(self.attrs);
        writer.write_name(&self.mesh_name);
        writer.write_name(&self.container_name);
        writer.write_u32(self.num_tris);
        writer.write_u32(self.num_verts);
        writer.write_u32(self.num_materials);
        writer.write_u32(self.num_damage_stages);
        writer.write_i32(self.sort_level);
        writer.write_u32(self.prelit_version);
        writer.write_u32(self.future_counts);
        writer.write_u32(self.vert_channel_flags);
        writer.write_u32(self.face_channel_flags);
        writer.write_vector3(self.min_corner);
        writer.write_vector3(self.max_corner);
        writer.write_vector3(self.sph_center);
        writer.write_f32(self.sph_radius);
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub vert_ids: [u32; 3],
    pub surface_type: u32,
    pub normal: Vector3,
    pub distance: f32,
}

impl FixedElement for Triangle {
    const SIZE: u32 = 32;

    fn read(reader: &mut ChunkReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            vert_ids: [reader.read_u32()?, reader.read_u32()?, reader.read_u32()?],
            surface_type: reader.read_u32()?,
            normal: reader.read_vector3()?,
            distance: reader.read_f32()?,
        })
    }

    fn write(&self, writer: &mut ChunkWriter) {
        for id in self.vert_ids {
            writer.write_u32(id);
        }
        writer.write_u32(self.surface_type);
        writer.write_vector3(self.normal);
        writer.write_f32(self.distance);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexInfluence {
    pub bone_idx: u16,
    pub xtra_idx: u16,
    /// Weights in hundredths.
    pub bone_inf: u16,
    pub xtra_inf: u16,
}

impl FixedElement for VertexInfluence {
    const SIZE: u32 = 8;

    fn read(reader: &mut ChunkReader<'_>) -> Result<Self, Error> {
        Ok(Self {
            bone_idx: reader.read_u16()?,
            xtra_idx: reader.read_u16()?,
            bone_inf: reader.read_u16()?,
            xtra_inf: reader.read_u16()?,
        })
    }

    fn write(&self, writer: &mut ChunkWriter) {
        writer.write_u16(self.bone_idx);
        writer.write_u16(self.xtra_idx);
        writer.write_u16(self.bone_inf);
        writer.write_u16(self.xtra_inf);
    }
}

/// NUL-terminated text bodies such as `MESH_USER_TEXT`.
impl Chunk for String {
    fn body_size(&self) -> u32 {
        array_size(self.len(), 1).saturating_add(1)
    }

    fn read_body(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, Error> {
        reader.read_string(header.body_end)
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        if self.contains('\0') {
            return Err(Error::invalid_value("text chunks cannot hold an embedded NUL"));
        }
        writer.write_string(self);
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mesh {
    pub header: MeshHeader,
    pub user_text: Option<String>,
    pub vertices: Vec<Vector3>,
    pub normals: Vec<Vector3>,
    pub triangles: Vec<Triangle>,
    pub influences: Vec<VertexInfluence>,
}

impl Mesh {
    pub fn is_skinned(&self) -> bool {
        self.header.attrs & attributes::GEOMETRY_TYPE_MASK == attributes::GEOMETRY_TYPE_SKIN
    }

    /// Refreshes the header's counts and bounds from the geometry.
    pub fn update_header(&mut self) {
        self.header.num_verts = self.vertices.len() as u32;
        self.header.num_tris = self.triangles.len() as u32;
        let Some(first) = self.vertices.first().copied() else {
            self.header.min_corner = Vector3::ZERO;
            self.header.max_corner = Vector3::ZERO;
            self.header.sph_center = Vector3::ZERO;
            self.header.sph_radius = 0.0;
            return;
        };
        let (min, max) = self.vertices.iter().fold((first, first), |(lo, hi), v| {
            (
                Vector3::new(lo.x.min(v.x), lo.y.min(v.y), lo.z.min(v.z)),
                Vector3::new(hi.x.max(v.x), hi.y.max(v.y), hi.z.max(v.z)),
            )
        });
        let center = Vector3::new(
            (min.x + max.x) * 0.5,
            (min.y + max.y) * 0.5,
            (min.z + max.z) * 0.5,
        );
        let radius = self
            .vertices
            .iter()
            .map(|v| {
                let (dx, dy, dz) = (v.x - center.x, v.y - center.y, v.z - center.z);
                (dx * dx + dy * dy + dz * dz).sqrt()
            })
            .fold(0.0f32, f32::max);
        self.header.min_corner = min;
        self.header.max_corner = max;
        self.header.sph_center = center;
        self.header.sph_radius = radius;
    }
}

/// Arrays that are omitted from the file when empty.
fn optional_array_size<T: FixedElement>(items: &[T]) -> u32 {
    if items.is_empty() {
        0
    } else {
        array_size(items.len(), T::SIZE).saturating_add(HEADER_SIZE)
    }
}

impl Chunk for Mesh {
    const HAS_CHILDREN: bool = true;

    fn body_size(&self) -> u32 {
        let user_text = self
            .user_text
            .as_ref()
            .map_or(0, |t| t.serialized_size(true));
        sum_sizes([
            self.header.serialized_size(true),
            user_text,
            self.vertices.serialized_size(true),
            optional_array_size(&self.normals),
            self.triangles.serialized_size(true),
            optional_array_size(&self.influences),
        ])
    }

    fn read_body(reader: &mut ChunkReader<'_>, header: &ChunkHeader) -> Result<Self, Error> {
        let mut mesh_header: Option<MeshHeader> = None;
        let mut mesh = Mesh::default();
        read_chunks(reader, header.body_end, |reader, child| {
            match child.tag {
                tags::MESH_HEADER => mesh_header = Some(reader.read_chunk(child)?),
                tags::MESH_USER_TEXT => mesh.user_text = Some(reader.read_chunk(child)?),
                tags::VERTICES => mesh.vertices = reader.read_chunk(child)?,
                tags::VERTEX_NORMALS => mesh.normals = reader.read_chunk(child)?,
                tags::TRIANGLES => mesh.triangles = reader.read_chunk(child)?,
                tags::VERTEX_INFLUENCES => mesh.influences = reader.read_chunk(child)?,
                _ => return Ok(false),
            }
            Ok(true)
        })?;
        mesh.header = mesh_header.ok_or(Error::MissingChunk {
            container: tags::MESH,
            tag: tags::MESH_HEADER,
        })?;
        Ok(mesh)
    }

    fn write_body(&self, writer: &mut ChunkWriter) -> Result<(), Error> {
        writer.write_chunk(tags::MESH_HEADER, &self.header)?;
        if let Some(text) = &self.user_text {
            writer.write_chunk(tags::MESH_USER_TEXT, text)?;
        }
        writer.write_chunk(tags::VERTICES, &self.vertices)?;
        if !self.normals.is_empty() {
            writer.write_chunk(tags::VERTEX_NORMALS, &self.normals)?;
        }
        writer.write_chunk(tags::TRIANGLES, &self.triangles)?;
        if !self.influences.is_empty() {
            writer.write_chunk(tags::VERTEX_INFLUENCES, &self.influences)?;
        }
        Ok(())
    }
}
