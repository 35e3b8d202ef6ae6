use crate::chunk::tags;
use crate::{
    BoundingBox, Chunk, Error, Hierarchy, HierarchyHeader, Hlod, HlodArray, HlodHeader,
    HlodSubObject, Mesh, MeshHeader, NO_PARENT, Pivot, Quaternion, Rgba, Triangle, Vector3,
    VertexInfluence, Version, attributes, collision, decode_chunk, encode_chunk,
};

fn assert_approx(actual: f32, expected: f32) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= 1e-3,
        "expected {expected}, got {actual} (diff {diff})"
    );
}

fn skeleton() -> Hierarchy {
    Hierarchy {
        header: HierarchyHeader {
            name: "soldier".to_string(),
            num_pivots: 2,
            ..HierarchyHeader::default()
        },
        pivots: vec![
            Pivot {
                name: "ROOTTRANSFORM".to_string(),
                ..Pivot::default()
            },
            Pivot {
                name: "bone_head".to_string(),
                parent_id: 0,
                translation: Vector3::new(0.0, 0.0, 1.8),
                euler_angles: Vector3::new(0.0, 0.0, 0.5),
                rotation: Quaternion::new(0.968_912_4, 0.0, 0.0, 0.247_403_96),
            },
        ],
        pivot_fixups: Vec::new(),
    }
}

fn triangle_mesh() -> Mesh {
    let mut mesh = Mesh {
        header: MeshHeader {
            mesh_name: "hull".to_string(),
            container_name: "tank".to_string(),
            attrs: attributes::GEOMETRY_TYPE_SKIN | attributes::CAST_SHADOW,
            ..MeshHeader::default()
        },
        user_text: Some("prelit=false".to_string()),
        vertices: vec![
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(2.0, 0.0, 0.0),
            Vector3::new(0.0, 2.0, 0.0),
        ],
        normals: vec![Vector3::new(0.0, 0.0, 1.0); 3],
        triangles: vec![Triangle {
            vert_ids: [0, 1, 2],
            surface_type: 13,
            normal: Vector3::new(0.0, 0.0, 1.0),
            distance: 0.0,
        }],
        influences: vec![
            VertexInfluence {
                bone_idx: 1,
                bone_inf: 100,
                ..VertexInfluence::default()
            };
            3
        ],
    };
    mesh.update_header();
    mesh
}

#[test]
fn hierarchy_round_trips() {
    let hierarchy = skeleton();
    // header chunk + pivots chunk, no fixups chunk
    assert_eq!(hierarchy.body_size(), (8 + 36) + (8 + 2 * 60));

    let bytes = encode_chunk(tags::HIERARCHY, &hierarchy).unwrap();
    assert_eq!(bytes.len(), 8 + 44 + 128);
    let decoded: Hierarchy = decode_chunk(tags::HIERARCHY, &bytes).unwrap();
    assert_eq!(decoded, hierarchy);
    assert_eq!(decoded.pivots[0].parent_id, NO_PARENT);
    assert_eq!(decoded.pivot_index("bone_head"), Some(1));
    assert_eq!(decoded.pivot_index("missing"), None);
}

#[test]
fn hierarchy_fixups_are_optional() {
    let mut hierarchy = skeleton();
    hierarchy.pivot_fixups = vec![Vector3::new(1.0, 2.0, 3.0), Vector3::ZERO];
    let bytes = encode_chunk(tags::HIERARCHY, &hierarchy).unwrap();
    assert_eq!(bytes.len(), 8 + 44 + 128 + 8 + 24);
    let decoded: Hierarchy = decode_chunk(tags::HIERARCHY, &bytes).unwrap();
    assert_eq!(decoded.pivot_fixups, hierarchy.pivot_fixups);
}

#[test]
fn hierarchy_header_layout() {
    let header = HierarchyHeader {
        version: Version::new(4, 1),
        name: "h".to_string(),
        num_pivots: 7,
        center_pos: Vector3::new(1.0, 2.0, 3.0),
    };
    let bytes = encode_chunk(tags::HIERARCHY_HEADER, &header).unwrap();
    assert_eq!(bytes.len(), 8 + 36);
    assert_eq!(&bytes[8..12], &0x0004_0001u32.to_le_bytes());
    assert_eq!(&bytes[28..32], &7u32.to_le_bytes());
}

#[test]
fn mesh_round_trips() {
    let mesh = triangle_mesh();
    assert!(mesh.is_skinned());
    assert_eq!(mesh.header.num_verts, 3);
    assert_eq!(mesh.header.num_tris, 1);

    let bytes = encode_chunk(tags::MESH, &mesh).unwrap();
    assert_eq!(bytes.len(), mesh.serialized_size(true) as usize);
    let decoded: Mesh = decode_chunk(tags::MESH, &bytes).unwrap();
    assert_eq!(decoded, mesh);
}

#[test]
fn mesh_header_bounds_follow_vertices() {
    let mesh = triangle_mesh();
    let header = &mesh.header;
    assert_eq!(header.min_corner, Vector3::new(0.0, 0.0, 0.0));
    assert_eq!(header.max_corner, Vector3::new(2.0, 2.0, 0.0));
    assert_eq!(header.sph_center, Vector3::new(1.0, 1.0, 0.0));
    assert_approx(header.sph_radius, 2f32.sqrt());
}

#[test]
fn mesh_omits_empty_optional_arrays() {
    let mut mesh = triangle_mesh();
    mesh.user_text = None;
    mesh.normals.clear();
    mesh.influences.clear();
    let expected = (8 + 116) + (8 + 3 * 12) + (8 + 32);
    assert_eq!(mesh.body_size(), expected);

    let bytes = encode_chunk(tags::MESH, &mesh).unwrap();
    let decoded: Mesh = decode_chunk(tags::MESH, &bytes).unwrap();
    assert_eq!(decoded, mesh);
    assert!(decoded.normals.is_empty());
}

#[test]
fn mesh_user_text_is_nul_terminated() {
    let text = "LOD=2".to_string();
    let bytes = encode_chunk(tags::MESH_USER_TEXT, &text).unwrap();
    assert_eq!(bytes.len(), 8 + 6);
    assert_eq!(bytes[13], 0);
    assert_eq!(
        decode_chunk::<String>(tags::MESH_USER_TEXT, &bytes).unwrap(),
        text
    );
}

#[test]
fn mesh_user_text_refuses_embedded_nul() {
    let text = "prelit\0false".to_string();
    let err = encode_chunk(tags::MESH_USER_TEXT, &text).unwrap_err();
    assert!(matches!(err, Error::InvalidValue { .. }), "{err:?}");

    let mut mesh = triangle_mesh();
    mesh.user_text = Some(text);
    assert!(matches!(
        encode_chunk(tags::MESH, &mesh),
        Err(Error::InvalidValue { .. })
    ));
}

#[test]
fn mesh_requires_header() {
    let mut mesh = triangle_mesh();
    mesh.user_text = None;
    let bytes = encode_chunk(tags::MESH, &mesh).unwrap();
    // Retag the header chunk so the mesh reader skips it as unknown.
    let mut patched = bytes;
    patched[8..12].copy_from_slice(&0x7777u32.to_le_bytes());
    let err = decode_chunk::<Mesh>(tags::MESH, &patched).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        Error::MissingChunk {
            container: tags::MESH,
            tag: tags::MESH_HEADER
        }
    ));
}

fn sub(bone_index: u32, name: &str) -> HlodSubObject {
    HlodSubObject {
        bone_index,
        name: name.to_string(),
    }
}

#[test]
fn hlod_round_trips() {
    let hlod = Hlod {
        header: HlodHeader {
            model_name: "tank".to_string(),
            hierarchy_name: "tank".to_string(),
            lod_count: 2,
            ..HlodHeader::default()
        },
        lod_arrays: vec![
            HlodArray::new(0.0, vec![sub(1, "tank.hull"), sub(2, "tank.turret")]),
            HlodArray::new(0.25, vec![sub(1, "tank.hull_lo")]),
        ],
        aggregate_array: Some(HlodArray::new(0.0, vec![sub(0, "tank.shadow")])),
        proxy_array: None,
    };
    assert_eq!(hlod.lod_arrays[0].header.model_count, 2);

    let bytes = encode_chunk(tags::HLOD, &hlod).unwrap();
    let header_part = 8 + 40;
    let array = |subs: u32| 8 + (8 + 8) + subs * (8 + 36);
    assert_eq!(
        bytes.len() as u32,
        8 + header_part + array(2) + array(1) + array(1)
    );
    let decoded: Hlod = decode_chunk(tags::HLOD, &bytes).unwrap();
    assert_eq!(decoded, hlod);
}

#[test]
fn hlod_array_requires_header() {
    let array = HlodArray::new(1.0, vec![sub(3, "x.y")]);
    let mut bytes = encode_chunk(tags::HLOD_LOD_ARRAY, &array).unwrap();
    bytes[8..12].copy_from_slice(&0x7777u32.to_le_bytes());
    let err = decode_chunk::<HlodArray>(tags::HLOD_LOD_ARRAY, &bytes).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        Error::MissingChunk {
            container: tags::HLOD_LOD_ARRAY,
            tag: tags::HLOD_SUB_OBJECT_ARRAY_HEADER
        }
    ));
}

#[test]
fn bounding_box_round_trips() {
    let bounds = BoundingBox {
        attributes: collision::ALIGNED | collision::PHYSICAL | collision::PROJECTILE,
        name: "tank.bounds".to_string(),
        color: Rgba::new(0, 255, 0, 0),
        center: Vector3::new(0.0, 0.0, 1.0),
        extend: Vector3::new(3.0, 1.5, 1.0),
        ..BoundingBox::default()
    };
    let bytes = encode_chunk(tags::BOX, &bounds).unwrap();
    assert_eq!(bytes.len(), 8 + 68);
    assert_eq!(&bytes[12..16], &0x32u32.to_le_bytes());
    let decoded: BoundingBox = decode_chunk(tags::BOX, &bytes).unwrap();
    assert_eq!(decoded, bounds);
}
