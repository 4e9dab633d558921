//! IMDL decoder and encoder.
//!
//! Decoding is two-phase: every chunk is decoded into its table in file
//! order, then [`Model::new`] validates cross-table references against the
//! final table sizes. A table referenced before it was decoded is therefore
//! not an error; only indices that are still dangling at the end are.

use std::path::Path;

use glam::{Quat, Vec3};

use crate::animation::clip::{AnimationChannel, AnimationClip};
use crate::animation::values::Interpolatable;
use crate::assets::chunk::{Chunk, ChunkReader, ChunkTag, ChunkWriter};
use crate::assets::format::{
    MaterialInfo, MeshGroupInfo, NodeInfo, SubMeshInfo, TextureEntry, Vertex,
};
use crate::assets::io::{AssetReader, AssetReaderVariant};
use crate::assets::model::{Model, ModelData};
use crate::assets::reader::BinaryReader;
use crate::assets::record::Record;
use crate::assets::settings::{LoaderSettings, UnknownChunkPolicy};
use crate::assets::writer::BinaryWriter;
use crate::errors::{ImdlError, Result};

/// `u32 name length` + `f32 duration` + three `u32` channel counts.
const MIN_CLIP_SIZE: usize = 20;
/// `u32 node` + two `u32` counts.
const MIN_CHANNEL_SIZE: usize = 12;

#[derive(Debug, Clone, Default)]
pub struct ImdlLoader {
    settings: LoaderSettings,
}

impl ImdlLoader {
    #[must_use]
    pub fn new(settings: LoaderSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &LoaderSettings {
        &self.settings
    }

    /// Reads a file and builds a validated model.
    ///
    /// The file is fetched through a [`FileAssetReader`](crate::assets::io::FileAssetReader)
    /// rooted at its directory.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Model> {
        let path = path.as_ref();
        let reader = AssetReaderVariant::from_source(path);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        self.load_with(&reader, &file_name)
    }

    /// Fetches `uri` through `reader` and builds a validated model.
    pub fn load_with(&self, reader: &impl AssetReader, uri: &str) -> Result<Model> {
        let bytes = reader.read_bytes(uri)?;
        log::info!("Loading IMDL model {uri}");
        self.load_from_bytes(&bytes)
    }

    /// Decodes and validates an in-memory file.
    pub fn load_from_bytes(&self, bytes: &[u8]) -> Result<Model> {
        let data = self.decode(bytes)?;
        let model = Model::new(data, &self.settings)?;

        log::info!(
            "IMDL model loaded: {} nodes, {} vertices, {} indices, {} materials, {} textures, {} clips",
            model.nodes().len(),
            model.vertices().len(),
            model.indices().len(),
            model.materials().len(),
            model.textures().len(),
            model.animations().len(),
        );
        Ok(model)
    }

    /// Decodes every chunk into raw tables without validating references.
    pub fn decode(&self, bytes: &[u8]) -> Result<ModelData> {
        let mut chunks = ChunkReader::new(bytes)?;
        let mut data = ModelData::default();

        for chunk in chunks.by_ref() {
            self.decode_chunk(&chunk?, &mut data)?;
        }

        let trailing = chunks.unread_bytes();
        if trailing > 0 {
            log::debug!("Ignoring {trailing} bytes after the last chunk");
        }

        Ok(data)
    }

    fn decode_chunk(&self, chunk: &Chunk<'_>, data: &mut ModelData) -> Result<()> {
        let mut reader = chunk.reader();

        // Repeated chunks of one kind append to the same table.
        match chunk.tag {
            ChunkTag::TEXTURE => {
                let count = reader.read_count(TextureEntry::MIN_SIZE)?;
                data.textures.reserve(count);
                for _ in 0..count {
                    data.textures.push(TextureEntry::read_from(&mut reader)?);
                }
            }
            ChunkTag::MATERIAL => data.materials.extend(reader.read_counted::<MaterialInfo>()?),
            ChunkTag::SUB_MESH | ChunkTag::LEGACY_MESH => {
                data.sub_meshes.extend(reader.read_counted::<SubMeshInfo>()?);
            }
            ChunkTag::MESH_GROUP => {
                data.mesh_groups.extend(reader.read_counted::<MeshGroupInfo>()?);
            }
            ChunkTag::NODE => data.nodes.extend(reader.read_counted::<NodeInfo>()?),
            ChunkTag::VERTEX => data.vertices.extend(reader.read_counted::<Vertex>()?),
            ChunkTag::INDEX => data.indices.extend(reader.read_counted::<u32>()?),
            ChunkTag::ANIMATION => {
                let count = reader.read_count(MIN_CLIP_SIZE)?;
                data.animations.reserve(count);
                for _ in 0..count {
                    data.animations.push(read_clip(&mut reader)?);
                }
            }
            tag => {
                return match self.settings.unknown_chunks {
                    UnknownChunkPolicy::Skip => {
                        log::warn!(
                            "Skipping unknown chunk '{tag}' ({} bytes at offset {})",
                            chunk.payload.len(),
                            chunk.offset
                        );
                        Ok(())
                    }
                    UnknownChunkPolicy::Reject => Err(ImdlError::UnknownChunk { tag }),
                };
            }
        }

        if !reader.is_at_end() {
            log::debug!(
                "Chunk '{}' at offset {}: {} unread payload bytes",
                chunk.tag,
                chunk.offset,
                reader.remaining()
            );
        }
        Ok(())
    }
}

fn read_channel<T>(reader: &mut BinaryReader<'_>) -> Result<AnimationChannel<T>>
where
    T: Interpolatable + Record,
{
    let node_index = reader.read_u32()?;
    let times = reader.read_counted::<f32>()?;
    let values = reader.read_counted::<T>()?;
    Ok(AnimationChannel::new(node_index, times, values))
}

fn read_channels<T>(reader: &mut BinaryReader<'_>) -> Result<Vec<AnimationChannel<T>>>
where
    T: Interpolatable + Record,
{
    let count = reader.read_count(MIN_CHANNEL_SIZE)?;
    let mut channels = Vec::with_capacity(count);
    for _ in 0..count {
        channels.push(read_channel(reader)?);
    }
    Ok(channels)
}

fn read_clip(reader: &mut BinaryReader<'_>) -> Result<AnimationClip> {
    let name = reader.read_string()?;
    let duration = reader.read_f32()?;
    let translations = read_channels::<Vec3>(reader)?;
    let rotations = read_channels::<Quat>(reader)?;
    let scales = read_channels::<Vec3>(reader)?;

    Ok(AnimationClip {
        name,
        duration,
        translations,
        rotations,
        scales,
    })
}

/// Serializes model tables into an IMDL file.
///
/// Empty tables are omitted; decoding the output yields equal tables.
#[derive(Debug, Default)]
pub struct ImdlWriter;

impl ImdlWriter {
    #[must_use]
    pub fn encode(data: &ModelData) -> Vec<u8> {
        let mut chunks = ChunkWriter::new();

        if !data.textures.is_empty() {
            let mut w = BinaryWriter::new();
            w.write_count(data.textures.len());
            for texture in &data.textures {
                texture.write_to(&mut w);
            }
            chunks.push(ChunkTag::TEXTURE, w.into_inner());
        }

        push_table(&mut chunks, ChunkTag::MATERIAL, &data.materials);
        push_table(&mut chunks, ChunkTag::SUB_MESH, &data.sub_meshes);
        push_table(&mut chunks, ChunkTag::MESH_GROUP, &data.mesh_groups);
        push_table(&mut chunks, ChunkTag::NODE, &data.nodes);
        push_table(&mut chunks, ChunkTag::VERTEX, &data.vertices);
        push_table(&mut chunks, ChunkTag::INDEX, &data.indices);

        if !data.animations.is_empty() {
            let mut w = BinaryWriter::new();
            w.write_count(data.animations.len());
            for clip in &data.animations {
                write_clip(&mut w, clip);
            }
            chunks.push(ChunkTag::ANIMATION, w.into_inner());
        }

        chunks.finish()
    }
}

fn push_table<T: Record>(chunks: &mut ChunkWriter, tag: ChunkTag, items: &[T]) {
    if items.is_empty() {
        return;
    }
    let mut w = BinaryWriter::with_capacity(4 + items.len() * T::SIZE);
    w.write_counted(items);
    chunks.push(tag, w.into_inner());
}

fn write_channels<T>(w: &mut BinaryWriter, channels: &[AnimationChannel<T>])
where
    T: Interpolatable + Record,
{
    w.write_count(channels.len());
    for channel in channels {
        w.write_u32(channel.node_index);
        w.write_counted(&channel.track.times);
        w.write_counted(&channel.track.values);
    }
}

fn write_clip(w: &mut BinaryWriter, clip: &AnimationClip) {
    w.write_string(&clip.name);
    w.write_f32(clip.duration);
    write_channels(w, &clip.translations);
    write_channels(w, &clip.rotations);
    write_channels(w, &clip.scales);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::format::TextureKind;

    #[test]
    fn legacy_mesh_tag_decodes_as_sub_meshes() {
        let mut w = BinaryWriter::new();
        w.write_u32(1);
        w.write_u32(0);
        w.write_u32(3);
        w.write_u32(0);

        let mut chunks = ChunkWriter::new();
        chunks.push(ChunkTag::LEGACY_MESH, w.into_inner());
        let data = ImdlLoader::default().decode(&chunks.finish()).unwrap();

        assert_eq!(data.sub_meshes.len(), 1);
        assert_eq!(data.sub_meshes[0].index_count, 3);
    }

    #[test]
    fn repeated_chunks_append() {
        let node = NodeInfo::default();
        let mut chunks = ChunkWriter::new();
        for _ in 0..2 {
            let mut w = BinaryWriter::new();
            w.write_counted(&[node]);
            chunks.push(ChunkTag::NODE, w.into_inner());
        }
        let data = ImdlLoader::default().decode(&chunks.finish()).unwrap();
        assert_eq!(data.nodes.len(), 2);
    }

    #[test]
    fn texture_count_larger_than_payload_fails_before_allocating() {
        let mut w = BinaryWriter::new();
        w.write_u32(u32::MAX);
        let mut chunks = ChunkWriter::new();
        chunks.push(ChunkTag::TEXTURE, w.into_inner());

        let err = ImdlLoader::default().decode(&chunks.finish()).unwrap_err();
        assert!(matches!(err, ImdlError::UnexpectedEof { .. }));
    }

    #[test]
    fn texture_bytes_survive_encoding() {
        let data = ModelData {
            textures: vec![TextureEntry {
                kind: TextureKind::Normal,
                data: b"\x89PNG fake".to_vec(),
            }],
            ..ModelData::default()
        };
        let decoded = ImdlLoader::default()
            .decode(&ImdlWriter::encode(&data))
            .unwrap();
        assert_eq!(decoded, data);
    }
}
