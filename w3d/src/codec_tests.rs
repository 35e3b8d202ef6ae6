use crate::{ChunkReader, ChunkWriter, Error, Quaternion, Rgba, Vector2, Vector3};

#[test]
fn primitives_are_little_endian() {
    let mut writer = ChunkWriter::new();
    writer.write_u8(0xAB);
    writer.write_i8(-2);
    writer.write_u16(0x1234);
    writer.write_i16(-3);
    writer.write_u32(0xDEAD_BEEF);
    writer.write_i32(-4);
    writer.write_f32(1.5);
    let bytes = writer.into_bytes();
    assert_eq!(
        bytes,
        vec![
            0xAB, 0xFE, 0x34, 0x12, 0xFD, 0xFF, 0xEF, 0xBE, 0xAD, 0xDE, 0xFC, 0xFF, 0xFF, 0xFF,
            0x00, 0x00, 0xC0, 0x3F,
        ]
    );

    let mut reader = ChunkReader::new(&bytes);
    assert_eq!(reader.read_u8().unwrap(), 0xAB);
    assert_eq!(reader.read_i8().unwrap(), -2);
    assert_eq!(reader.read_u16().unwrap(), 0x1234);
    assert_eq!(reader.read_i16().unwrap(), -3);
    assert_eq!(reader.read_u32().unwrap(), 0xDEAD_BEEF);
    assert_eq!(reader.read_i32().unwrap(), -4);
    assert_eq!(reader.read_f32().unwrap(), 1.5);
    assert_eq!(reader.remaining(), 0);
}

#[test]
fn quaternion_is_swapped_to_xyzw_on_the_wire() {
    let mut writer = ChunkWriter::new();
    writer.write_quaternion(Quaternion::new(1.0, 0.0, 0.0, 0.0));
    let bytes = writer.into_bytes();

    let mut expected = Vec::new();
    for v in [0.0f32, 0.0, 0.0, 1.0] {
        expected.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(bytes, expected);

    let mut reader = ChunkReader::new(&bytes);
    assert_eq!(
        reader.read_quaternion().unwrap(),
        Quaternion::new(1.0, 0.0, 0.0, 0.0)
    );
}

#[test]
fn quaternion_components_keep_their_axes() {
    let q = Quaternion::new(0.1, 0.2, 0.3, 0.4);
    let mut writer = ChunkWriter::new();
    writer.write_quaternion(q);
    let bytes = writer.into_bytes();

    let mut raw = ChunkReader::new(&bytes);
    let wire: Vec<f32> = (0..4).map(|_| raw.read_f32().unwrap()).collect();
    assert_eq!(wire, vec![0.2, 0.3, 0.4, 0.1]);

    let mut reader = ChunkReader::new(&bytes);
    assert_eq!(reader.read_quaternion().unwrap(), q);
}

#[test]
fn vectors_and_colors_round_trip() {
    let mut writer = ChunkWriter::new();
    writer.write_vector2(Vector2::new(1.0, -2.0));
    writer.write_vector3(Vector3::new(3.0, 4.0, -5.5));
    writer.write_rgba(Rgba::new(1, 2, 3, 255));
    let bytes = writer.into_bytes();
    assert_eq!(bytes.len(), 8 + 12 + 4);

    let mut reader = ChunkReader::new(&bytes);
    assert_eq!(reader.read_vector2().unwrap(), Vector2::new(1.0, -2.0));
    assert_eq!(reader.read_vector3().unwrap(), Vector3::new(3.0, 4.0, -5.5));
    assert_eq!(reader.read_rgba().unwrap(), Rgba::new(1, 2, 3, 255));
}

#[test]
fn short_buffer_is_unexpected_eof() {
    let bytes = [1u8, 2, 3];
    let mut reader = ChunkReader::new(&bytes);
    let err = reader.read_u32().unwrap_err();
    assert!(
        matches!(
            err,
            Error::UnexpectedEof {
                offset: 0,
                needed: 4,
                available: 3
            }
        ),
        "{err:?}"
    );
    // A failed read does not advance the cursor.
    assert_eq!(reader.position(), 0);
    assert_eq!(reader.read_u16().unwrap(), 0x0201);
    assert!(matches!(
        reader.read_vector3(),
        Err(Error::UnexpectedEof { .. })
    ));
}

#[test]
fn record_counts_are_checked_against_remaining_bytes() {
    let bytes = [0u8; 12];
    let mut reader = ChunkReader::new(&bytes);
    reader.read_u32().unwrap();
    assert_eq!(reader.check_count(2, 4).unwrap(), 2);
    assert_eq!(reader.check_count(0, 16).unwrap(), 0);
    assert!(matches!(
        reader.check_count(3, 4),
        Err(Error::UnexpectedEof {
            offset: 4,
            needed: 12,
            available: 8
        })
    ));
    assert!(matches!(
        reader.check_count(usize::MAX, 2),
        Err(Error::UnexpectedEof {
            needed: usize::MAX,
            ..
        })
    ));
    assert_eq!(reader.position(), 4);
}

#[test]
fn fixed_name_is_nul_padded() {
    let mut writer = ChunkWriter::new();
    writer.write_name("Bone01");
    let bytes = writer.into_bytes();
    assert_eq!(bytes.len(), 16);
    assert_eq!(&bytes[..6], b"Bone01");
    assert!(bytes[6..].iter().all(|&b| b == 0));

    let mut reader = ChunkReader::new(&bytes);
    assert_eq!(reader.read_name().unwrap(), "Bone01");
    assert_eq!(reader.position(), 16);
}

#[test]
fn long_fixed_string_is_truncated_not_rejected() {
    let mut writer = ChunkWriter::new();
    writer.write_name("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    writer.write_long_name("short.name");
    let bytes = writer.into_bytes();
    assert_eq!(bytes.len(), 16 + 32);
    assert_eq!(bytes[15], 0);

    let mut reader = ChunkReader::new(&bytes);
    assert_eq!(reader.read_name().unwrap(), "ABCDEFGHIJKLMNO");
    assert_eq!(reader.read_long_name().unwrap(), "short.name");
}

#[test]
fn truncation_respects_char_boundaries() {
    let mut writer = ChunkWriter::new();
    // 14 ASCII bytes followed by a two-byte character straddling the 15-byte limit.
    writer.write_name("abcdefghijklmné");
    let bytes = writer.into_bytes();
    let mut reader = ChunkReader::new(&bytes);
    assert_eq!(reader.read_name().unwrap(), "abcdefghijklmn");
}

#[test]
fn fixed_string_read_stops_at_backslash() {
    let mut slot = [0u8; 16];
    slot[..13].copy_from_slice(b"art\\tex.tga\0x");
    let mut reader = ChunkReader::new(&slot);
    assert_eq!(reader.read_name().unwrap(), "art");
    assert_eq!(reader.position(), 16);

    // The writer stores backslashes untouched.
    let mut writer = ChunkWriter::new();
    writer.write_name("a\\b");
    assert_eq!(&writer.as_bytes()[..3], b"a\\b");
}

#[test]
fn variable_string_consumes_terminator() {
    let mut writer = ChunkWriter::new();
    writer.write_string("user text");
    writer.write_u8(0x7F);
    let bytes = writer.into_bytes();
    assert_eq!(bytes.len(), 9 + 1 + 1);

    let mut reader = ChunkReader::new(&bytes);
    assert_eq!(reader.read_string(bytes.len()).unwrap(), "user text");
    assert_eq!(reader.read_u8().unwrap(), 0x7F);
}

#[test]
fn unterminated_variable_string_stops_at_bound() {
    let bytes = b"abcdef";
    let mut reader = ChunkReader::new(bytes);
    assert_eq!(reader.read_string(4).unwrap(), "abcd");
    assert_eq!(reader.position(), 4);
}

#[test]
fn seek_past_end_fails() {
    let bytes = [0u8; 4];
    let mut reader = ChunkReader::new(&bytes);
    reader.seek(4).unwrap();
    assert!(matches!(reader.seek(5), Err(Error::UnexpectedEof { .. })));
}
