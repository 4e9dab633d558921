//! Construction-time hand-off of textures and materials to a renderer.

use crate::assets::format::{MaterialInfo, TextureEntry};

/// Receives the model's resource tables once, in table order.
///
/// `index` is the entry's position in its table; materials refer to
/// textures and sub-meshes refer to materials by these indices, so an
/// implementation that stores resources densely by `index` can resolve every
/// reference without a lookup table.
pub trait ResourceRegistry {
    /// `texture.data` holds the encoded image file (PNG, DDS, ...).
    fn register_texture(&mut self, index: usize, texture: &TextureEntry);

    fn register_material(&mut self, index: usize, material: &MaterialInfo);
}

/// Keeps copies of everything registered. Used by tools and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingRegistry {
    pub textures: Vec<(usize, TextureEntry)>,
    pub materials: Vec<(usize, MaterialInfo)>,
}

impl ResourceRegistry for RecordingRegistry {
    fn register_texture(&mut self, index: usize, texture: &TextureEntry) {
        self.textures.push((index, texture.clone()));
    }

    fn register_material(&mut self, index: usize, material: &MaterialInfo) {
        self.materials.push((index, *material));
    }
}
