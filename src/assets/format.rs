//! Record types stored in IMDL chunks.
//!
//! Field order is a strict positional contract shared with the converter:
//! vectors and quaternions float-by-float, then integer indices.

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3, Vec4};

use crate::assets::reader::BinaryReader;
use crate::assets::record::Record;
use crate::assets::writer::BinaryWriter;
use crate::errors::{ImdlError, Result};

/// Sentinel for "no texture / no mesh group / no parent".
pub const NO_INDEX: i32 = -1;

/// Converts a `-1`-sentinel index into an `Option<usize>`.
///
/// Any negative value is treated as absent.
#[inline]
#[must_use]
pub fn optional_index(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}

// ============================================================================
// Textures
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    BaseColor,
    Normal,
    MetalRough,
    Emissive,
}

impl TryFrom<u32> for TextureKind {
    type Error = ImdlError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::BaseColor),
            1 => Ok(Self::Normal),
            2 => Ok(Self::MetalRough),
            3 => Ok(Self::Emissive),
            other => Err(ImdlError::InvalidTextureKind(other)),
        }
    }
}

impl From<TextureKind> for u32 {
    fn from(kind: TextureKind) -> Self {
        match kind {
            TextureKind::BaseColor => 0,
            TextureKind::Normal => 1,
            TextureKind::MetalRough => 2,
            TextureKind::Emissive => 3,
        }
    }
}

/// An embedded texture: its role and the raw encoded file bytes.
///
/// The bytes are opaque to this crate; the renderer decodes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureEntry {
    pub kind: TextureKind,
    pub data: Vec<u8>,
}

impl TextureEntry {
    /// Smallest possible encoding: `u32 kind` + `u32 size`.
    pub const MIN_SIZE: usize = 8;

    pub fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let kind = TextureKind::try_from(reader.read_u32()?)?;
        let size = reader.read_u32()? as usize;
        let data = reader.read_bytes(size)?.to_vec();
        Ok(Self { kind, data })
    }

    pub fn write_to(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.kind.into());
        writer.write_count(self.data.len());
        writer.write_bytes(&self.data);
    }
}

// ============================================================================
// Materials
// ============================================================================

/// PBR material parameters with texture table references.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialInfo {
    pub base_color: Vec4,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub emissive_color: Vec3,

    /// Texture table indices, `-1` when unused.
    pub base_color_texture: i32,
    pub normal_texture: i32,
    pub metal_rough_texture: i32,
    pub emissive_texture: i32,
}

impl MaterialInfo {
    /// Texture indices paired with the slot name, for validation and registration.
    #[must_use]
    pub fn texture_slots(&self) -> [(&'static str, i32); 4] {
        [
            ("base color", self.base_color_texture),
            ("normal", self.normal_texture),
            ("metal/rough", self.metal_rough_texture),
            ("emissive", self.emissive_texture),
        ]
    }
}

impl Default for MaterialInfo {
    fn default() -> Self {
        Self {
            base_color: Vec4::ONE,
            metallic_factor: 0.0,
            roughness_factor: 1.0,
            emissive_color: Vec3::ZERO,
            base_color_texture: NO_INDEX,
            normal_texture: NO_INDEX,
            metal_rough_texture: NO_INDEX,
            emissive_texture: NO_INDEX,
        }
    }
}

impl Record for MaterialInfo {
    const SIZE: usize = 9 * 4 + 4 * 4;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            base_color: Vec4::from_array(<[f32; 4]>::read_from(reader)?),
            metallic_factor: reader.read_f32()?,
            roughness_factor: reader.read_f32()?,
            emissive_color: Vec3::read_from(reader)?,
            base_color_texture: reader.read_i32()?,
            normal_texture: reader.read_i32()?,
            metal_rough_texture: reader.read_i32()?,
            emissive_texture: reader.read_i32()?,
        })
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        self.base_color.to_array().write_to(writer);
        writer.write_f32(self.metallic_factor);
        writer.write_f32(self.roughness_factor);
        self.emissive_color.write_to(writer);
        writer.write_i32(self.base_color_texture);
        writer.write_i32(self.normal_texture);
        writer.write_i32(self.metal_rough_texture);
        writer.write_i32(self.emissive_texture);
    }
}

// ============================================================================
// Geometry ranges
// ============================================================================

/// A contiguous index-buffer range drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubMeshInfo {
    pub start_index: u32,
    pub index_count: u32,
    pub material_index: u32,
}

impl Record for SubMeshInfo {
    const SIZE: usize = 12;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            start_index: reader.read_u32()?,
            index_count: reader.read_u32()?,
            material_index: reader.read_u32()?,
        })
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.start_index);
        writer.write_u32(self.index_count);
        writer.write_u32(self.material_index);
    }
}

/// A contiguous run of sub-meshes owned by one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeshGroupInfo {
    pub sub_mesh_start: u32,
    pub sub_mesh_count: u32,
}

impl MeshGroupInfo {
    #[must_use]
    pub fn sub_mesh_range(&self) -> std::ops::Range<usize> {
        let start = self.sub_mesh_start as usize;
        start..start + self.sub_mesh_count as usize
    }
}

impl Record for MeshGroupInfo {
    const SIZE: usize = 8;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            sub_mesh_start: reader.read_u32()?,
            sub_mesh_count: reader.read_u32()?,
        })
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        writer.write_u32(self.sub_mesh_start);
        writer.write_u32(self.sub_mesh_count);
    }
}

// ============================================================================
// Nodes
// ============================================================================

/// A scene node as stored in the file.
///
/// Nodes are immutable after load; only the world matrices derived from
/// them change per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeInfo {
    /// Mesh group drawn at this node, `-1` for none.
    pub mesh_group_index: i32,
    /// Parent node, `-1` for roots. Producers store parents first.
    pub parent_index: i32,

    pub default_translation: Vec3,
    pub default_rotation: Quat,
    pub default_scale: Vec3,
}

impl NodeInfo {
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<usize> {
        optional_index(self.parent_index)
    }

    #[inline]
    #[must_use]
    pub fn mesh_group(&self) -> Option<usize> {
        optional_index(self.mesh_group_index)
    }
}

impl Default for NodeInfo {
    fn default() -> Self {
        Self {
            mesh_group_index: NO_INDEX,
            parent_index: NO_INDEX,
            default_translation: Vec3::ZERO,
            default_rotation: Quat::IDENTITY,
            default_scale: Vec3::ONE,
        }
    }
}

impl Record for NodeInfo {
    const SIZE: usize = 8 + 10 * 4;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            mesh_group_index: reader.read_i32()?,
            parent_index: reader.read_i32()?,
            default_translation: Vec3::read_from(reader)?,
            default_rotation: Quat::read_from(reader)?,
            default_scale: Vec3::read_from(reader)?,
        })
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        writer.write_i32(self.mesh_group_index);
        writer.write_i32(self.parent_index);
        self.default_translation.write_to(writer);
        self.default_rotation.write_to(writer);
        self.default_scale.write_to(writer);
    }
}

// ============================================================================
// Vertices
// ============================================================================

/// Position / normal / texcoord / tangent vertex, laid out for direct upload.
///
/// `tangent.w` holds the handedness sign (mirrored UVs).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub texcoord: [f32; 2],
    pub tangent: [f32; 4],
}

const _: () = assert!(std::mem::size_of::<Vertex>() == 48);

impl Record for Vertex {
    const SIZE: usize = 48;

    fn read_from(reader: &mut BinaryReader<'_>) -> Result<Self> {
        Ok(Self {
            position: Record::read_from(reader)?,
            normal: Record::read_from(reader)?,
            texcoord: Record::read_from(reader)?,
            tangent: Record::read_from(reader)?,
        })
    }

    fn write_to(&self, writer: &mut BinaryWriter) {
        self.position.write_to(writer);
        self.normal.write_to(writer);
        self.texcoord.write_to(writer);
        self.tangent.write_to(writer);
    }
}
