use crate::chunk::tags;
use crate::{
    AdaptiveDeltaAnimationChannel, Animation, AnimationChannel, AnimationFlavor, AnimationHeader,
    BitWidth, BoundingBox, ChannelType, ChannelValue, Chunk, ChunkWriter, CompressedAnimation,
    CompressedAnimationChannel, CompressedAnimationHeader, Error, Hierarchy, HierarchyHeader,
    Hlod, HlodArray, HlodSubObject, Mesh, Pivot, ReadOptions, Vector3, W3dFile, encode_chunk,
};

fn hierarchy(name: &str) -> Hierarchy {
    Hierarchy {
        header: HierarchyHeader {
            name: name.to_string(),
            num_pivots: 1,
            ..HierarchyHeader::default()
        },
        pivots: vec![Pivot {
            name: "ROOTTRANSFORM".to_string(),
            ..Pivot::default()
        }],
        pivot_fixups: Vec::new(),
    }
}

fn bounds(name: &str) -> BoundingBox {
    BoundingBox {
        name: name.to_string(),
        extend: Vector3::new(1.0, 1.0, 1.0),
        ..BoundingBox::default()
    }
}

fn animation() -> Animation {
    Animation {
        header: AnimationHeader {
            name: "walk".to_string(),
            hierarchy_name: "soldier".to_string(),
            num_frames: 2,
            ..AnimationHeader::default()
        },
        channels: vec![AnimationChannel::new(
            0,
            ChannelType::X,
            0,
            vec![ChannelValue::Scalar(0.0), ChannelValue::Scalar(1.0)],
        )
        .unwrap()],
        bit_channels: Vec::new(),
    }
}

fn full_file() -> W3dFile {
    let samples: Vec<ChannelValue> = (0..24)
        .map(|i| ChannelValue::Scalar((i as f32 * 0.3).sin()))
        .collect();
    let mut mesh = Mesh {
        vertices: vec![Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0)],
        ..Mesh::default()
    };
    mesh.header.mesh_name = "hull".to_string();
    mesh.update_header();

    W3dFile {
        hierarchy: Some(hierarchy("soldier")),
        meshes: vec![mesh],
        boxes: vec![bounds("soldier.bounds")],
        hlod: Some(Hlod {
            lod_arrays: vec![HlodArray::new(
                0.0,
                vec![HlodSubObject {
                    bone_index: 0,
                    name: "soldier.hull".to_string(),
                }],
            )],
            ..Hlod::default()
        }),
        animation: Some(animation()),
        compressed_animation: Some(CompressedAnimation {
            header: CompressedAnimationHeader {
                name: "run".to_string(),
                num_frames: 24,
                flavor: AnimationFlavor::AdaptiveDelta4,
                ..CompressedAnimationHeader::default()
            },
            channels: vec![CompressedAnimationChannel::AdaptiveDelta(
                AdaptiveDeltaAnimationChannel::from_samples(
                    ChannelType::Z,
                    0,
                    &samples,
                    BitWidth::Four,
                )
                .unwrap(),
            )],
            bit_channels: Vec::new(),
            motion_channels: Vec::new(),
        }),
    }
}

#[test]
fn whole_file_round_trips() {
    let file = full_file();
    let bytes = file.to_bytes().unwrap();
    assert_eq!(bytes.len(), file.serialized_size() as usize);
    let decoded = W3dFile::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, file);
    assert_eq!(decoded.to_bytes().unwrap(), bytes);
}

#[test]
fn empty_input_is_an_empty_file() {
    let decoded = W3dFile::from_bytes(&[]).unwrap();
    assert_eq!(decoded, W3dFile::default());
    assert!(W3dFile::default().to_bytes().unwrap().is_empty());
}

#[test]
fn unknown_top_level_chunks_are_skipped() {
    let mut writer = ChunkWriter::new();
    writer.write_chunk_header(0x0300, 12, true);
    writer.write_zeros(12);
    writer.write_chunk(tags::BOX, &bounds("a")).unwrap();
    writer.write_chunk_header(0x0999, 3, false);
    writer.write_bytes(&[1, 2, 3]);
    writer.write_chunk(tags::BOX, &bounds("b")).unwrap();
    let bytes = writer.into_bytes();

    let options = ReadOptions {
        warn_unknown_chunks: true,
        ..ReadOptions::default()
    };
    let decoded = W3dFile::from_bytes_with_options(&bytes, &options).unwrap();
    assert_eq!(decoded.boxes, vec![bounds("a"), bounds("b")]);
    assert!(decoded.hierarchy.is_none());
}

#[test]
fn duplicate_singletons_keep_the_last() {
    let mut writer = ChunkWriter::new();
    writer.write_chunk(tags::HIERARCHY, &hierarchy("first")).unwrap();
    writer.write_chunk(tags::HIERARCHY, &hierarchy("second")).unwrap();
    let decoded = W3dFile::from_bytes(&writer.into_bytes()).unwrap();
    assert_eq!(decoded.hierarchy.unwrap().header.name, "second");
}

/// A file whose animation chunk holds a channel with an unknown type.
fn file_with_bad_channel() -> Vec<u8> {
    let mut anim = encode_chunk(tags::ANIMATION, &animation()).unwrap();
    // animation header (8) + animation header chunk (8 + 44) + channel header (8) + type field (6)
    let type_offset = 8 + 52 + 8 + 6;
    assert_eq!(anim[type_offset], ChannelType::X.to_raw());
    anim[type_offset] = 42;

    let mut writer = ChunkWriter::new();
    writer.write_chunk(tags::HIERARCHY, &hierarchy("soldier")).unwrap();
    writer.write_bytes(&anim);
    writer.write_chunk(tags::BOX, &bounds("after")).unwrap();
    writer.into_bytes()
}

#[test]
fn recoverable_errors_skip_the_top_level_chunk() {
    let bytes = file_with_bad_channel();
    let decoded = W3dFile::from_bytes(&bytes).unwrap();
    assert!(decoded.animation.is_none());
    assert_eq!(decoded.hierarchy, Some(hierarchy("soldier")));
    assert_eq!(decoded.boxes, vec![bounds("after")]);
}

#[test]
fn strict_reading_reports_recoverable_errors() {
    let bytes = file_with_bad_channel();
    let options = ReadOptions {
        strict: true,
        ..ReadOptions::default()
    };
    let err = W3dFile::from_bytes_with_options(&bytes, &options).unwrap_err();
    assert!(err.is_recoverable());
    match &err {
        Error::Chunk { tag, .. } => assert_eq!(*tag, tags::ANIMATION_CHANNEL),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(
        err.root_cause(),
        Error::InvalidDiscriminant { value: 42, .. }
    ));
}

#[test]
fn truncated_file_is_fatal() {
    let bytes = full_file().to_bytes().unwrap();
    let err = W3dFile::from_bytes(&bytes[..bytes.len() - 5]).unwrap_err();
    assert!(!err.is_recoverable());
    assert!(matches!(err.root_cause(), Error::UnexpectedEof { .. }));
}

/// A compressed animation whose only channel claims `u32::MAX` keys in an 8-byte body.
fn file_with_huge_key_count(flavor: AnimationFlavor) -> Vec<u8> {
    let header = CompressedAnimationHeader {
        name: "run".to_string(),
        flavor,
        ..CompressedAnimationHeader::default()
    };
    let mut writer = ChunkWriter::new();
    writer.write_chunk_header(
        tags::COMPRESSED_ANIMATION,
        header.serialized_size(true) + 8 + 8,
        true,
    );
    writer
        .write_chunk(tags::COMPRESSED_ANIMATION_HEADER, &header)
        .unwrap();
    writer.write_chunk_header(tags::COMPRESSED_ANIMATION_CHANNEL, 8, false);
    writer.write_u32(u32::MAX);
    writer.write_u16(0);
    writer.write_u8(4);
    writer.write_u8(ChannelType::Quaternion.to_raw());
    writer.write_chunk(tags::BOX, &bounds("after")).unwrap();
    writer.into_bytes()
}

#[test]
fn huge_key_counts_fail_without_allocating() {
    for flavor in [
        AnimationFlavor::TimeCoded,
        AnimationFlavor::AdaptiveDelta4,
        AnimationFlavor::AdaptiveDelta8,
    ] {
        let bytes = file_with_huge_key_count(flavor);
        let err = W3dFile::from_bytes(&bytes).unwrap_err();
        assert!(!err.is_recoverable(), "{flavor:?}");
        assert!(
            matches!(err.root_cause(), Error::UnexpectedEof { .. }),
            "{flavor:?}: {err:?}"
        );
    }
}

#[test]
fn files_round_trip_through_disk() {
    let path = std::env::temp_dir().join(format!("w3d-file-test-{}.w3d", std::process::id()));
    let file = full_file();
    file.write_file(&path).unwrap();
    let decoded = W3dFile::read_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(decoded, file);

    assert!(matches!(
        W3dFile::read_file(path.with_extension("missing")),
        Err(Error::Io(_))
    ));
}
