use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::ZlibDecoder;
use glam::Vec3;
use strata_dump::format::{self, HeaderInfo};
use strata_dump::{dump_to, dump_to_file, DumpError, DumpOptions};
use strata_scene::animation::{Animation, NodeAnim, VectorKey};
use strata_scene::camera::Camera;
use strata_scene::light::{Light, LightKind};
use strata_scene::material::{Material, MaterialProperty};
use strata_scene::mesh::{Bone, Face, Mesh, PrimitiveTypes, VertexWeight};
use strata_scene::metadata::{MetadataEntry, MetadataValue};
use strata_scene::texture::Texture;
use strata_scene::{Node, Scene};

fn triangle_mesh() -> Mesh {
    Mesh {
        primitive_types: PrimitiveTypes::TRIANGLE,
        positions: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        faces: vec![Face::triangle(0, 1, 2)],
        ..Default::default()
    }
}

fn triangle_scene() -> Scene {
    let mut root = Node::new("root");
    root.meshes.push(0);

    Scene {
        root,
        meshes: vec![triangle_mesh()],
        ..Default::default()
    }
}

fn dump_bytes(scene: &Scene, options: DumpOptions) -> Vec<u8> {
    let mut out = Vec::new();
    dump_to(&mut out, "scene.sbd", "test-dump", scene, options).unwrap();
    out
}

fn read_u32(cursor: &mut Cursor<&[u8]>) -> u32 {
    cursor.read_u32::<LittleEndian>().unwrap()
}

#[test]
fn header_layout() {
    let bytes = dump_bytes(&triangle_scene(), DumpOptions::default());
    assert!(bytes.len() > format::HEADER_LENGTH);

    assert!(bytes.starts_with(format::SIGNATURE_PREFIX.as_bytes()));

    // Flag words at their fixed offsets.
    assert_eq!(&bytes[60..62], &0u16.to_le_bytes());
    assert_eq!(&bytes[62..64], &0u16.to_le_bytes());

    // Zero-padded path and command fields, 0xCD reserved tail.
    assert_eq!(&bytes[64..73], b"scene.sbd");
    assert!(bytes[73..320].iter().all(|&b| b == 0));
    assert_eq!(&bytes[320..329], b"test-dump");
    assert!(bytes[329..448].iter().all(|&b| b == 0));
    assert!(bytes[448..512].iter().all(|&b| b == format::RESERVED_FILL));

    let header = HeaderInfo::parse(&mut Cursor::new(&bytes[..])).unwrap();
    assert_eq!(header.version_major, format::VERSION_MAJOR);
    assert_eq!(header.version_minor, format::VERSION_MINOR);
    assert_eq!(header.build_revision, format::build_revision());
    assert_eq!(header.compile_flags, format::compile_flags());
    assert!(!header.shortened);
    assert!(!header.compressed);
    assert_eq!(header.path, "scene.sbd");
    assert_eq!(header.command, "test-dump");
}

#[test]
fn single_mesh_body_structure() {
    let bytes = dump_bytes(&triangle_scene(), DumpOptions::default());
    let body = &bytes[format::HEADER_LENGTH..];
    let mut cursor = Cursor::new(body);

    assert_eq!(read_u32(&mut cursor), format::CHUNK_SCENE);
    assert_eq!(read_u32(&mut cursor), 200);

    // Scene header: flags + six collection counts.
    assert_eq!(read_u32(&mut cursor), 0);
    assert_eq!(read_u32(&mut cursor), 1); // meshes
    for _ in 0..5 {
        assert_eq!(read_u32(&mut cursor), 0);
    }

    // Root node chunk.
    assert_eq!(read_u32(&mut cursor), format::CHUNK_NODE);
    assert_eq!(read_u32(&mut cursor), 88);
    assert_eq!(read_u32(&mut cursor), 4);
    let mut name = [0u8; 4];
    cursor.read_exact(&mut name).unwrap();
    assert_eq!(&name, b"root");
    cursor.set_position(cursor.position() + 64); // transform
    assert_eq!(read_u32(&mut cursor), 0); // children
    assert_eq!(read_u32(&mut cursor), 1); // mesh refs
    assert_eq!(read_u32(&mut cursor), 0); // metadata
    assert_eq!(read_u32(&mut cursor), 0); // mesh index

    // Mesh chunk.
    assert_eq!(read_u32(&mut cursor), format::CHUNK_MESH);
    assert_eq!(read_u32(&mut cursor), 68);
    assert_eq!(read_u32(&mut cursor), PrimitiveTypes::TRIANGLE.bits());
    assert_eq!(read_u32(&mut cursor), 3); // vertices
    assert_eq!(read_u32(&mut cursor), 1); // faces
    assert_eq!(read_u32(&mut cursor), 0); // bones
    assert_eq!(read_u32(&mut cursor), 0); // material index
    assert_eq!(read_u32(&mut cursor), format::MESH_HAS_POSITIONS);

    for expected in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
        assert_eq!(cursor.read_f32::<LittleEndian>().unwrap(), expected);
    }

    // Three vertices fit 16 bit indices.
    assert_eq!(cursor.read_u16::<LittleEndian>().unwrap(), 3);
    for expected in [0u16, 1, 2] {
        assert_eq!(cursor.read_u16::<LittleEndian>().unwrap(), expected);
    }

    assert_eq!(cursor.position() as usize, body.len());
}

#[test]
fn full_scene_chunk_sequence() {
    let mut root = Node::new("root");
    root.meshes.push(0);
    root.metadata
        .push(MetadataEntry::new("author", MetadataValue::Str("strata".to_owned())));
    // A value type the format cannot carry: key and tag only.
    root.metadata
        .push(MetadataEntry::new("frame", MetadataValue::Int64(42)));

    let mut boned = triangle_mesh();
    boned.bones.push(Bone {
        name: "b".to_owned(),
        offset: glam::Mat4::IDENTITY,
        weights: vec![VertexWeight {
            vertex_id: 0,
            weight: 1.0,
        }],
    });

    let scene = Scene {
        root,
        meshes: vec![triangle_mesh(), boned],
        materials: vec![Material {
            properties: vec![MaterialProperty::string("?mat.name", "demo")],
        }],
        animations: vec![Animation {
            name: "spin".to_owned(),
            duration: 10.0,
            ticks_per_second: 24.0,
            channels: vec![NodeAnim {
                node_name: "root".to_owned(),
                position_keys: vec![VectorKey {
                    time: 0.0,
                    value: Vec3::ZERO,
                }],
                ..Default::default()
            }],
        }],
        textures: vec![Texture {
            width: 2,
            height: 0,
            format_hint: "png".to_owned(),
            data: vec![0xab, 0xcd],
        }],
        lights: vec![Light {
            name: "sun".to_owned(),
            kind: LightKind::Directional,
            ..Default::default()
        }],
        cameras: vec![Camera {
            name: "cam".to_owned(),
            ..Default::default()
        }],
        ..Default::default()
    };

    let bytes = dump_bytes(&scene, DumpOptions::default());
    let body = &bytes[format::HEADER_LENGTH..];
    let mut cursor = Cursor::new(body);

    assert_eq!(read_u32(&mut cursor), format::CHUNK_SCENE);
    let scene_len = read_u32(&mut cursor);

    assert_eq!(read_u32(&mut cursor), 0); // flags
    for expected in [2u32, 1, 1, 1, 1, 1] {
        assert_eq!(read_u32(&mut cursor), expected);
    }

    // Fixed traversal order, one chunk per structural unit. The node
    // chunk length proves the Int64 metadata value was dropped (key and
    // tag written, no payload).
    let expected = [
        (format::CHUNK_NODE, 121),
        (format::CHUNK_MESH, 68),
        (format::CHUNK_MESH, 157),
        (format::CHUNK_MATERIAL, 50),
        (format::CHUNK_ANIMATION, 84),
        (format::CHUNK_TEXTURE, 18),
        (format::CHUNK_LIGHT, 83),
        (format::CHUNK_CAMERA, 59),
    ];
    for (magic, length) in expected {
        assert_eq!(read_u32(&mut cursor), magic);
        assert_eq!(read_u32(&mut cursor), length);
        cursor.set_position(cursor.position() + u64::from(length));
    }

    assert_eq!(cursor.position() as usize, body.len());
    assert_eq!(scene_len as usize + 8, body.len());
}

#[test]
fn dumps_are_deterministic_outside_the_signature() {
    let scene = triangle_scene();
    let options = DumpOptions {
        shortened: true,
        compressed: false,
    };

    let a = dump_bytes(&scene, options);
    let b = dump_bytes(&scene, options);

    assert_eq!(a.len(), b.len());
    assert_eq!(a[format::SIGNATURE_LEN..], b[format::SIGNATURE_LEN..]);
}

#[test]
fn shortened_attributes_become_envelopes() {
    let mesh = Mesh {
        primitive_types: PrimitiveTypes::TRIANGLE,
        positions: (0..9)
            .map(|i| Vec3::new(i as f32, -(i as f32), i as f32 * 0.5))
            .collect(),
        faces: vec![
            Face::triangle(0, 1, 2),
            Face::triangle(2, 3, 4),
            Face::triangle(4, 5, 6),
        ],
        ..Default::default()
    };
    let mut root = Node::new("root");
    root.meshes.push(0);
    let scene = Scene {
        root,
        meshes: vec![mesh],
        ..Default::default()
    };

    let bytes = dump_bytes(
        &scene,
        DumpOptions {
            shortened: true,
            compressed: false,
        },
    );
    assert_eq!(&bytes[60..62], &1u16.to_le_bytes());

    let body = &bytes[format::HEADER_LENGTH..];
    let mut cursor = Cursor::new(body);

    assert_eq!(read_u32(&mut cursor), format::CHUNK_SCENE);
    read_u32(&mut cursor);
    cursor.set_position(cursor.position() + 28); // flags + counts

    assert_eq!(read_u32(&mut cursor), format::CHUNK_NODE);
    let node_len = read_u32(&mut cursor);
    cursor.set_position(cursor.position() + u64::from(node_len));

    // Nine positions collapse to a two-element envelope; three faces
    // collapse to a single hash word.
    assert_eq!(read_u32(&mut cursor), format::CHUNK_MESH);
    assert_eq!(read_u32(&mut cursor), 52);
    cursor.set_position(cursor.position() + 20); // counts
    assert_eq!(read_u32(&mut cursor), format::MESH_HAS_POSITIONS);

    let mut read_vec3 = |cursor: &mut Cursor<&[u8]>| {
        Vec3::new(
            cursor.read_f32::<LittleEndian>().unwrap(),
            cursor.read_f32::<LittleEndian>().unwrap(),
            cursor.read_f32::<LittleEndian>().unwrap(),
        )
    };
    assert_eq!(read_vec3(&mut cursor), Vec3::new(0.0, -8.0, 0.0));
    assert_eq!(read_vec3(&mut cursor), Vec3::new(8.0, 0.0, 4.0));

    read_u32(&mut cursor); // face hash word
    assert_eq!(cursor.position() as usize, body.len());
}

#[test]
fn compressed_body_inflates_to_the_uncompressed_body() {
    let scene = triangle_scene();

    let plain = dump_bytes(&scene, DumpOptions::default());
    let compressed = dump_bytes(
        &scene,
        DumpOptions {
            shortened: false,
            compressed: true,
        },
    );
    assert_eq!(&compressed[62..64], &1u16.to_le_bytes());

    let plain_body = &plain[format::HEADER_LENGTH..];
    let mut cursor = Cursor::new(&compressed[format::HEADER_LENGTH..]);
    let recorded = cursor.read_u32::<LittleEndian>().unwrap();
    assert_eq!(recorded as usize, plain_body.len());

    let mut inflated = Vec::new();
    ZlibDecoder::new(&compressed[format::HEADER_LENGTH + 4..])
        .read_to_end(&mut inflated)
        .unwrap();
    assert_eq!(inflated, plain_body);
}

#[test]
fn compression_shrinks_a_real_mesh() {
    let mesh = Mesh {
        primitive_types: PrimitiveTypes::TRIANGLE,
        positions: (0..512)
            .map(|i| Vec3::new((i % 8) as f32, (i / 8) as f32, 0.0))
            .collect(),
        faces: (0..510).map(|i| Face::triangle(i, i + 1, i + 2)).collect(),
        ..Default::default()
    };
    let mut root = Node::new("grid");
    root.meshes.push(0);
    let scene = Scene {
        root,
        meshes: vec![mesh],
        ..Default::default()
    };

    let plain = dump_bytes(&scene, DumpOptions::default());
    let compressed = dump_bytes(
        &scene,
        DumpOptions {
            shortened: false,
            compressed: true,
        },
    );

    let plain_body = plain.len() - format::HEADER_LENGTH;
    let compressed_body = compressed.len() - format::HEADER_LENGTH;
    assert!(compressed_body <= plain_body);
}

#[test]
fn empty_scene_compresses_to_a_valid_dump() {
    let bytes = dump_bytes(
        &Scene::default(),
        DumpOptions {
            shortened: false,
            compressed: true,
        },
    );

    let header = HeaderInfo::parse(&mut Cursor::new(&bytes[..])).unwrap();
    assert!(header.compressed);

    let mut cursor = Cursor::new(&bytes[format::HEADER_LENGTH..]);
    let uncompressed_size = cursor.read_u32::<LittleEndian>().unwrap();

    let mut inflated = Vec::new();
    ZlibDecoder::new(&bytes[format::HEADER_LENGTH + 4..])
        .read_to_end(&mut inflated)
        .unwrap();
    assert_eq!(inflated.len(), uncompressed_size as usize);

    let mut cursor = Cursor::new(&inflated[..]);
    assert_eq!(read_u32(&mut cursor), format::CHUNK_SCENE);
    assert_eq!(read_u32(&mut cursor), 116);
    assert_eq!(read_u32(&mut cursor), 0); // flags
    for _ in 0..6 {
        assert_eq!(read_u32(&mut cursor), 0); // all collections empty
    }

    // The root node chunk is still present.
    assert_eq!(read_u32(&mut cursor), format::CHUNK_NODE);
    assert_eq!(read_u32(&mut cursor), 80);
}

#[test]
fn dump_to_file_writes_and_closes() {
    let path = std::env::temp_dir().join(format!("strata-dump-test-{}.sbd", std::process::id()));

    dump_to_file(&path, "integration-test", &triangle_scene(), DumpOptions::default()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let header = HeaderInfo::parse(&mut Cursor::new(&bytes[..])).unwrap();
    assert_eq!(header.command, "integration-test");
    assert_eq!(bytes.len(), format::HEADER_LENGTH + 208);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn unopenable_path_reports_open_failure() {
    let path = std::env::temp_dir()
        .join("strata-dump-missing-dir")
        .join("out.sbd");

    let result = dump_to_file(&path, "", &triangle_scene(), DumpOptions::default());
    assert!(matches!(result, Err(DumpError::Open { .. })));
}
