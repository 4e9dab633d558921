//! IMDL Format Tests
//!
//! Tests for:
//! - Encode / decode round trip through the chunk container
//! - Header checks (magic, version)
//! - Decode overruns on truncated or oversized data
//! - Unknown chunk policy
//! - Referential validation of every cross-table index
//! - Renderer hand-off (resource registration, buffer views)

use std::sync::Arc;

use glam::{Quat, Vec3, Vec4};

use imdl::animation::clip::{AnimationChannel, AnimationClip};
use imdl::assets::chunk::{ChunkTag, ChunkWriter, FileHeader};
use imdl::assets::format::{
    MaterialInfo, MeshGroupInfo, NodeInfo, SubMeshInfo, TextureEntry, TextureKind, Vertex,
};
use imdl::assets::io::{AssetReaderVariant, MemoryAssetReader};
use imdl::assets::record::Record;
use imdl::assets::writer::BinaryWriter;
use imdl::assets::{ImdlLoader, ImdlWriter, LoaderSettings, ModelData, UnknownChunkPolicy};
use imdl::errors::ImdlError;
use imdl::renderer::RecordingRegistry;

// ============================================================================
// Helpers
// ============================================================================

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn vertex(x: f32, y: f32) -> Vertex {
    Vertex {
        position: [x, y, 0.0],
        normal: [0.0, 0.0, 1.0],
        texcoord: [x, y],
        tangent: [1.0, 0.0, 0.0, 1.0],
    }
}

/// Two textures, one material, a quad split over two sub-meshes, three
/// nodes (root, mesh node, leaf) and one clip.
fn sample_data() -> ModelData {
    let clip = AnimationClip::from_channels(
        "wave",
        vec![AnimationChannel::new(
            1,
            vec![0.0, 1.0],
            vec![Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0)],
        )],
        vec![AnimationChannel::new(
            2,
            vec![0.0, 0.5, 1.0],
            vec![
                Quat::IDENTITY,
                Quat::from_rotation_z(0.5),
                Quat::from_rotation_z(1.0),
            ],
        )],
        vec![],
    );

    ModelData {
        textures: vec![
            TextureEntry {
                kind: TextureKind::BaseColor,
                data: vec![0x89, b'P', b'N', b'G', 1, 2, 3],
            },
            TextureEntry {
                kind: TextureKind::Normal,
                data: vec![b'D', b'D', b'S', b' '],
            },
        ],
        materials: vec![MaterialInfo {
            base_color: Vec4::new(1.0, 0.5, 0.25, 1.0),
            metallic_factor: 0.8,
            roughness_factor: 0.3,
            emissive_color: Vec3::new(0.1, 0.0, 0.0),
            base_color_texture: 0,
            normal_texture: 1,
            ..MaterialInfo::default()
        }],
        sub_meshes: vec![
            SubMeshInfo {
                start_index: 0,
                index_count: 3,
                material_index: 0,
            },
            SubMeshInfo {
                start_index: 3,
                index_count: 3,
                material_index: 0,
            },
        ],
        mesh_groups: vec![MeshGroupInfo {
            sub_mesh_start: 0,
            sub_mesh_count: 2,
        }],
        nodes: vec![
            NodeInfo::default(),
            NodeInfo {
                mesh_group_index: 0,
                parent_index: 0,
                default_translation: Vec3::new(1.0, 0.0, 0.0),
                ..NodeInfo::default()
            },
            NodeInfo {
                parent_index: 1,
                default_scale: Vec3::splat(2.0),
                ..NodeInfo::default()
            },
        ],
        animations: vec![clip],
        vertices: vec![
            vertex(0.0, 0.0),
            vertex(1.0, 0.0),
            vertex(1.0, 1.0),
            vertex(0.0, 1.0),
        ],
        indices: vec![0, 1, 2, 0, 2, 3],
    }
}

fn load(bytes: &[u8]) -> imdl::Result<imdl::Model> {
    ImdlLoader::default().load_from_bytes(bytes)
}

fn load_data(data: &ModelData) -> imdl::Result<imdl::Model> {
    load(&ImdlWriter::encode(data))
}

fn assert_dangling(data: &ModelData, expected_context: &str) {
    match load_data(data) {
        Err(ImdlError::DanglingIndex { context, .. }) => {
            assert!(
                context.contains(expected_context),
                "Expected context containing '{expected_context}', got '{context}'"
            );
        }
        other => panic!("Expected DanglingIndex for {expected_context}, got {other:?}"),
    }
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn round_trip_preserves_every_table() -> anyhow::Result<()> {
    init_logging();
    let data = sample_data();
    let model = load_data(&data)?;
    assert_eq!(model.data(), &data);
    Ok(())
}

#[test]
fn round_trip_of_empty_model() {
    let model = load_data(&ModelData::default()).unwrap();
    assert!(model.nodes().is_empty());
    assert!(model.hierarchy().is_empty());
}

#[test]
fn chunk_order_is_not_significant() {
    let data = sample_data();

    // Nodes and sub-meshes before the tables they reference.
    let mut chunks = ChunkWriter::new();
    let mut w = BinaryWriter::new();
    w.write_counted(&data.nodes);
    chunks.push(ChunkTag::NODE, w.into_inner());
    let mut w = BinaryWriter::new();
    w.write_counted(&data.sub_meshes);
    chunks.push(ChunkTag::SUB_MESH, w.into_inner());
    let mut w = BinaryWriter::new();
    w.write_counted(&data.indices);
    chunks.push(ChunkTag::INDEX, w.into_inner());
    let mut w = BinaryWriter::new();
    w.write_counted(&data.vertices);
    chunks.push(ChunkTag::VERTEX, w.into_inner());
    let mut w = BinaryWriter::new();
    w.write_counted(&data.mesh_groups);
    chunks.push(ChunkTag::MESH_GROUP, w.into_inner());
    let mut w = BinaryWriter::new();
    w.write_counted(&data.materials);
    chunks.push(ChunkTag::MATERIAL, w.into_inner());
    let mut w = BinaryWriter::new();
    w.write_count(data.textures.len());
    for texture in &data.textures {
        texture.write_to(&mut w);
    }
    chunks.push(ChunkTag::TEXTURE, w.into_inner());

    let model = load(&chunks.finish()).unwrap();
    assert_eq!(model.nodes(), data.nodes.as_slice());
    assert_eq!(model.materials(), data.materials.as_slice());
    assert_eq!(model.textures(), data.textures.as_slice());
}

#[test]
fn trailing_bytes_after_last_chunk_are_ignored() {
    let data = sample_data();
    let mut bytes = ImdlWriter::encode(&data);
    bytes.extend_from_slice(&[0xAB; 7]);
    assert_eq!(load(&bytes).unwrap().data(), &data);
}

// ============================================================================
// Header
// ============================================================================

#[test]
fn wrong_magic_is_rejected() {
    let mut bytes = ImdlWriter::encode(&sample_data());
    bytes[..4].copy_from_slice(b"GLTF");
    assert!(matches!(load(&bytes), Err(ImdlError::InvalidMagic { .. })));
}

#[test]
fn newer_version_is_rejected() {
    let mut bytes = ImdlWriter::encode(&sample_data());
    bytes[4..8].copy_from_slice(&2_u32.to_le_bytes());
    assert!(matches!(
        load(&bytes),
        Err(ImdlError::UnsupportedVersion { version: 2, supported: 1 })
    ));
}

#[test]
fn file_shorter_than_header() {
    assert!(matches!(load(b"IMDL"), Err(ImdlError::UnexpectedEof { .. })));
}

// ============================================================================
// Decode Overruns
// ============================================================================

#[test]
fn chunk_size_beyond_file_end() {
    let mut bytes = ImdlWriter::encode(&sample_data());
    let size_offset = FileHeader::SIZE + 4;
    bytes[size_offset..size_offset + 4].copy_from_slice(&u32::MAX.to_le_bytes());
    assert!(matches!(load(&bytes), Err(ImdlError::UnexpectedEof { .. })));
}

#[test]
fn missing_chunks_fail() {
    let mut bytes = ImdlWriter::encode(&sample_data());
    bytes[8..12].copy_from_slice(&100_u32.to_le_bytes());
    assert!(matches!(load(&bytes), Err(ImdlError::UnexpectedEof { .. })));
}

#[test]
fn record_count_beyond_payload() {
    let mut w = BinaryWriter::new();
    w.write_u32(2);
    NodeInfo::default().write_to(&mut w);
    let mut chunks = ChunkWriter::new();
    chunks.push(ChunkTag::NODE, w.into_inner());

    assert!(matches!(
        load(&chunks.finish()),
        Err(ImdlError::UnexpectedEof { .. })
    ));
}

#[test]
fn invalid_texture_kind() {
    let mut w = BinaryWriter::new();
    w.write_u32(1);
    w.write_u32(9);
    w.write_u32(0);
    let mut chunks = ChunkWriter::new();
    chunks.push(ChunkTag::TEXTURE, w.into_inner());

    assert!(matches!(
        load(&chunks.finish()),
        Err(ImdlError::InvalidTextureKind(9))
    ));
}

#[test]
fn clip_name_must_be_utf8() {
    let mut w = BinaryWriter::new();
    w.write_u32(1);
    w.write_u32(2);
    w.write_bytes(&[0xFF, 0xFE]);
    w.write_f32(1.0);
    for _ in 0..3 {
        w.write_u32(0);
    }
    let mut chunks = ChunkWriter::new();
    chunks.push(ChunkTag::ANIMATION, w.into_inner());

    assert!(matches!(
        load(&chunks.finish()),
        Err(ImdlError::InvalidString(_))
    ));
}

// ============================================================================
// Unknown Chunks
// ============================================================================

fn with_unknown_chunk() -> Vec<u8> {
    let mut chunks = ChunkWriter::new();
    chunks.push(ChunkTag::from_fourcc(*b"XTRA"), vec![1, 2, 3, 4, 5]);
    let mut w = BinaryWriter::new();
    w.write_counted(&[NodeInfo::default()]);
    chunks.push(ChunkTag::NODE, w.into_inner());
    chunks.finish()
}

#[test]
fn unknown_chunk_is_skipped_by_default() {
    init_logging();
    let model = load(&with_unknown_chunk()).unwrap();
    assert_eq!(model.nodes().len(), 1);
}

#[test]
fn unknown_chunk_is_rejected_when_configured() {
    let loader = ImdlLoader::new(LoaderSettings {
        unknown_chunks: UnknownChunkPolicy::Reject,
        ..LoaderSettings::default()
    });
    match loader.load_from_bytes(&with_unknown_chunk()) {
        Err(ImdlError::UnknownChunk { tag }) => assert_eq!(tag.to_string(), "XTRA"),
        other => panic!("Expected UnknownChunk, got {other:?}"),
    }
}

// ============================================================================
// Referential Validation
// ============================================================================

#[test]
fn dangling_material_texture() {
    let mut data = sample_data();
    data.materials[0].emissive_texture = 2;
    assert_dangling(&data, "emissive texture");
}

#[test]
fn dangling_sub_mesh_material() {
    let mut data = sample_data();
    data.sub_meshes[1].material_index = 1;
    assert_dangling(&data, "sub-mesh 1 material");
}

#[test]
fn sub_mesh_index_range_out_of_bounds() {
    let mut data = sample_data();
    data.sub_meshes[1].index_count = 4;
    assert!(matches!(
        load_data(&data),
        Err(ImdlError::IndexRangeOutOfBounds { start: 3, end: 7, len: 6, .. })
    ));
}

#[test]
fn mesh_group_range_out_of_bounds() {
    let mut data = sample_data();
    data.mesh_groups[0].sub_mesh_count = 3;
    let err = load_data(&data).unwrap_err();
    assert!(err.is_referential());
    assert!(matches!(err, ImdlError::IndexRangeOutOfBounds { .. }));
}

#[test]
fn dangling_node_mesh_group() {
    let mut data = sample_data();
    data.nodes[2].mesh_group_index = 1;
    assert_dangling(&data, "node 2 mesh group");
}

#[test]
fn dangling_node_parent() {
    let mut data = sample_data();
    data.nodes[2].parent_index = 3;
    assert_dangling(&data, "node 2 parent");
}

#[test]
fn dangling_channel_target() {
    let mut data = sample_data();
    data.animations[0].rotations[0].node_index = 3;
    assert_dangling(&data, "channel target");
}

#[test]
fn index_buffer_beyond_vertices() {
    let mut data = sample_data();
    data.indices[4] = 4;
    assert_dangling(&data, "index buffer entry 4");
}

#[test]
fn keyframe_count_mismatch() {
    let mut data = sample_data();
    data.animations[0].rotations[0].track.times.pop();
    assert!(matches!(
        load_data(&data),
        Err(ImdlError::KeyframeCountMismatch { node: 2, times: 2, values: 3, .. })
    ));
}

#[test]
fn decreasing_key_times() {
    let mut data = sample_data();
    data.animations[0].rotations[0].track.times = vec![0.0, 1.0, 0.5];
    assert!(matches!(
        load_data(&data),
        Err(ImdlError::UnsortedKeyframes { node: 2, .. })
    ));
}

#[test]
fn validation_can_be_disabled() {
    let mut data = sample_data();
    data.materials[0].emissive_texture = 7;
    let loader = ImdlLoader::new(LoaderSettings {
        validate_references: false,
        ..LoaderSettings::default()
    });
    let model = loader.load_from_bytes(&ImdlWriter::encode(&data)).unwrap();
    assert_eq!(model.materials()[0].emissive_texture, 7);
}

// ============================================================================
// Renderer Hand-off
// ============================================================================

#[test]
fn resources_register_in_table_order() {
    let model = load_data(&sample_data()).unwrap();
    let mut registry = RecordingRegistry::default();
    model.register_resources(&mut registry);

    let texture_indices: Vec<_> = registry.textures.iter().map(|(i, _)| *i).collect();
    assert_eq!(texture_indices, vec![0, 1]);
    assert_eq!(registry.textures[1].1.kind, TextureKind::Normal);
    assert_eq!(registry.materials.len(), 1);
    assert_eq!(registry.materials[0].1.normal_texture, 1);
}

#[test]
fn texture_data_can_be_released() {
    let mut model = load_data(&sample_data()).unwrap();
    model.release_texture_data();
    assert_eq!(model.textures().len(), 2);
    assert!(model.textures().iter().all(|t| t.data.is_empty()));
    assert_eq!(model.textures()[0].kind, TextureKind::BaseColor);
}

#[test]
fn gpu_byte_views() {
    let model = load_data(&sample_data()).unwrap();
    assert_eq!(model.vertex_bytes().len(), 4 * 48);
    assert_eq!(model.index_bytes().len(), 6 * 4);
    assert_eq!(&model.index_bytes()[4..8], &1_u32.to_ne_bytes());
}

#[test]
fn node_sub_meshes() {
    let model = load_data(&sample_data()).unwrap();
    assert!(model.node_sub_meshes(0).is_empty());
    assert_eq!(model.node_sub_meshes(1).len(), 2);
    assert!(model.node_sub_meshes(99).is_empty());
}

// ============================================================================
// Sources
// ============================================================================

#[test]
fn load_through_asset_reader() -> anyhow::Result<()> {
    init_logging();
    let mut reader = MemoryAssetReader::new();
    reader.insert("robot.imdl", ImdlWriter::encode(&sample_data()));
    let model = ImdlLoader::default().load_with(&reader, "robot.imdl")?;
    assert_eq!(model.animations()[0].name, "wave");
    assert_eq!(model.find_animation("wave"), Some(0));
    assert!(ImdlLoader::default().load_with(&reader, "missing.imdl").is_err());

    // The enum dispatch is accepted wherever a reader is.
    let variant = AssetReaderVariant::Memory(Arc::new(reader));
    let model = ImdlLoader::default().load_with(&variant, "robot.imdl")?;
    assert_eq!(model.nodes().len(), 3);
    Ok(())
}

#[test]
fn load_from_file() -> anyhow::Result<()> {
    init_logging();
    let dir = std::env::temp_dir().join(format!("imdl_format_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("robot.imdl");
    std::fs::write(&path, ImdlWriter::encode(&sample_data()))?;

    let loaded = ImdlLoader::default().load_file(&path);
    std::fs::remove_dir_all(&dir)?;
    let model = Arc::new(loaded?);
    assert_eq!(model.nodes().len(), 3);

    assert!(matches!(
        ImdlLoader::default().load_file(&path),
        Err(ImdlError::IoError(_))
    ));
    Ok(())
}
