//! Decoded model tables and the validated [`Model`].
//!
//! [`ModelData`] is exactly what the chunks contain. [`Model`] is built from
//! it after the referential-integrity pass and owns the resolved node
//! hierarchy; it is immutable and meant to be shared (`Arc<Model>`) by every
//! animator that plays it.

use glam::Affine3A;

use crate::animation::clip::AnimationClip;
use crate::assets::format::{
    MaterialInfo, MeshGroupInfo, NodeInfo, SubMeshInfo, TextureEntry, Vertex,
};
use crate::assets::settings::LoaderSettings;
use crate::errors::{ImdlError, Result};
use crate::renderer::registry::ResourceRegistry;
use crate::scene::hierarchy::Hierarchy;
use crate::scene::transform_system;

/// Raw tables in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelData {
    pub textures: Vec<TextureEntry>,
    pub materials: Vec<MaterialInfo>,
    pub sub_meshes: Vec<SubMeshInfo>,
    pub mesh_groups: Vec<MeshGroupInfo>,
    pub nodes: Vec<NodeInfo>,
    pub animations: Vec<AnimationClip>,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl ModelData {
    /// Checks every cross-table index against the final table sizes.
    ///
    /// Chunks may arrive in any order, so this runs once after decoding.
    /// Parent indices are checked by [`Hierarchy::from_nodes`].
    pub fn validate(&self) -> Result<()> {
        self.validate_materials()?;
        self.validate_geometry()?;
        self.validate_nodes()?;
        self.validate_animations()
    }

    fn validate_materials(&self) -> Result<()> {
        let len = self.textures.len();
        for (i, material) in self.materials.iter().enumerate() {
            for (slot, index) in material.texture_slots() {
                if index < -1 || usize::try_from(index).is_ok_and(|t| t >= len) {
                    return Err(ImdlError::DanglingIndex {
                        context: format!("material {i} {slot} texture"),
                        index: i64::from(index),
                        len,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_geometry(&self) -> Result<()> {
        for (i, sub_mesh) in self.sub_meshes.iter().enumerate() {
            if sub_mesh.material_index as usize >= self.materials.len() {
                return Err(ImdlError::DanglingIndex {
                    context: format!("sub-mesh {i} material"),
                    index: i64::from(sub_mesh.material_index),
                    len: self.materials.len(),
                });
            }
            check_range(
                || format!("sub-mesh {i} indices"),
                sub_mesh.start_index,
                sub_mesh.index_count,
                self.indices.len(),
            )?;
        }

        for (i, group) in self.mesh_groups.iter().enumerate() {
            check_range(
                || format!("mesh group {i} sub-meshes"),
                group.sub_mesh_start,
                group.sub_mesh_count,
                self.sub_meshes.len(),
            )?;
        }

        if let Some((i, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|&(_, &v)| v as usize >= self.vertices.len())
        {
            return Err(ImdlError::DanglingIndex {
                context: format!("index buffer entry {i}"),
                index: i64::from(index),
                len: self.vertices.len(),
            });
        }

        Ok(())
    }

    fn validate_nodes(&self) -> Result<()> {
        let len = self.mesh_groups.len();
        for (i, node) in self.nodes.iter().enumerate() {
            let index = node.mesh_group_index;
            if index < -1 || usize::try_from(index).is_ok_and(|g| g >= len) {
                return Err(ImdlError::DanglingIndex {
                    context: format!("node {i} mesh group"),
                    index: i64::from(index),
                    len,
                });
            }
        }
        Ok(())
    }

    fn validate_animations(&self) -> Result<()> {
        for clip in &self.animations {
            for node in clip.target_nodes() {
                if node as usize >= self.nodes.len() {
                    return Err(ImdlError::DanglingIndex {
                        context: format!("clip '{}' channel target", clip.name),
                        index: i64::from(node),
                        len: self.nodes.len(),
                    });
                }
            }

            let tracks = clip
                .translations
                .iter()
                .map(|c| (c.node_index, c.track.times.len(), c.track.values.len(), c.track.is_sorted()))
                .chain(clip.rotations.iter().map(|c| {
                    (c.node_index, c.track.times.len(), c.track.values.len(), c.track.is_sorted())
                }))
                .chain(clip.scales.iter().map(|c| {
                    (c.node_index, c.track.times.len(), c.track.values.len(), c.track.is_sorted())
                }));

            for (node, times, values, sorted) in tracks {
                if times != values {
                    return Err(ImdlError::KeyframeCountMismatch {
                        clip: clip.name.clone(),
                        node,
                        times,
                        values,
                    });
                }
                if !sorted {
                    return Err(ImdlError::UnsortedKeyframes {
                        clip: clip.name.clone(),
                        node,
                    });
                }
            }
        }
        Ok(())
    }
}

fn check_range(
    context: impl FnOnce() -> String,
    start: u32,
    count: u32,
    len: usize,
) -> Result<()> {
    let end = u64::from(start) + u64::from(count);
    if end > len as u64 {
        return Err(ImdlError::IndexRangeOutOfBounds {
            context: context(),
            start: u64::from(start),
            end,
            len,
        });
    }
    Ok(())
}

/// A validated, immutable model.
#[derive(Debug, Clone)]
pub struct Model {
    data: ModelData,
    hierarchy: Hierarchy,
}

impl Model {
    pub fn new(data: ModelData, settings: &LoaderSettings) -> Result<Self> {
        if settings.validate_references {
            data.validate()?;
        }
        let hierarchy = Hierarchy::from_nodes(&data.nodes, settings.hierarchy)?;
        Ok(Self { data, hierarchy })
    }

    /// Builds a model with the default settings.
    pub fn from_data(data: ModelData) -> Result<Self> {
        Self::new(data, &LoaderSettings::default())
    }

    #[must_use]
    pub fn data(&self) -> &ModelData {
        &self.data
    }

    #[must_use]
    pub fn into_data(self) -> ModelData {
        self.data
    }

    #[must_use]
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    #[must_use]
    pub fn textures(&self) -> &[TextureEntry] {
        &self.data.textures
    }

    #[must_use]
    pub fn materials(&self) -> &[MaterialInfo] {
        &self.data.materials
    }

    #[must_use]
    pub fn sub_meshes(&self) -> &[SubMeshInfo] {
        &self.data.sub_meshes
    }

    #[must_use]
    pub fn mesh_groups(&self) -> &[MeshGroupInfo] {
        &self.data.mesh_groups
    }

    #[must_use]
    pub fn nodes(&self) -> &[NodeInfo] {
        &self.data.nodes
    }

    #[must_use]
    pub fn animations(&self) -> &[AnimationClip] {
        &self.data.animations
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.data.vertices
    }

    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.data.indices
    }

    /// The clip at `index`, or `None` for an invalid index.
    #[inline]
    #[must_use]
    pub fn animation(&self, index: usize) -> Option<&AnimationClip> {
        self.data.animations.get(index)
    }

    /// Index of the first clip named `name`.
    #[must_use]
    pub fn find_animation(&self, name: &str) -> Option<usize> {
        self.data.animations.iter().position(|c| c.name == name)
    }

    /// Sub-meshes drawn at `node`; empty for nodes without a mesh group.
    #[must_use]
    pub fn node_sub_meshes(&self, node: usize) -> &[SubMeshInfo] {
        self.data
            .nodes
            .get(node)
            .and_then(NodeInfo::mesh_group)
            .and_then(|g| self.data.mesh_groups.get(g))
            .and_then(|group| self.data.sub_meshes.get(group.sub_mesh_range()))
            .unwrap_or(&[])
    }

    /// Vertex buffer contents, ready for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data.vertices)
    }

    /// 32-bit index buffer contents, ready for upload.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data.indices)
    }

    /// World matrices of the bind pose.
    #[must_use]
    pub fn bind_pose_world_matrices(&self) -> Vec<Affine3A> {
        let mut locals = Vec::new();
        let mut world = Vec::new();
        transform_system::compute_world_matrices_with(
            &self.data.nodes,
            &self.hierarchy,
            &mut locals,
            &mut world,
        );
        world
    }

    /// Hands every texture and material to the renderer's resource table.
    ///
    /// Registration order matches table order, so the indices already stored
    /// in materials and sub-meshes stay valid on the renderer side.
    pub fn register_resources(&self, registry: &mut impl ResourceRegistry) {
        for (i, texture) in self.data.textures.iter().enumerate() {
            registry.register_texture(i, texture);
        }
        for (i, material) in self.data.materials.iter().enumerate() {
            registry.register_material(i, material);
        }
    }

    /// Drops the encoded texture bytes once the renderer owns GPU copies.
    ///
    /// Texture kinds and table positions are kept.
    pub fn release_texture_data(&mut self) {
        for texture in &mut self.data.textures {
            texture.data = Vec::new();
        }
    }
}
