/// Surface description of a primitive.
///
/// Pure data: texture references are keys into the scene graph's texture
/// and sampler pools, factors follow the metallic-roughness model.

use std::collections::BTreeMap;
use glam::{Vec3, Vec4};
use super::scene_graph::{SamplerKey, TextureKey};

/// How the alpha channel of the base color is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaMode {
    #[default]
    Opaque,
    /// Fragments below `alpha_cutoff` are discarded
    Mask,
    /// Alpha blended, no depth write
    Blend,
}

impl AlphaMode {
    /// Value written to the per-draw uniform block
    pub fn as_u32(self) -> u32 {
        match self {
            AlphaMode::Opaque => 0,
            AlphaMode::Mask => 1,
            AlphaMode::Blend => 2,
        }
    }
}

/// Texture + sampler pair bound to a material slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialTexture {
    pub texture: TextureKey,
    pub sampler: SamplerKey,
}

#[derive(Debug, Clone)]
pub struct Material {
    name: String,
    textures: BTreeMap<String, MaterialTexture>,
    pub base_color_factor: Vec4,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub emissive_factor: Vec3,
    pub alpha_cutoff: f32,
    pub alpha_mode: AlphaMode,
    pub double_sided: bool,
}

impl Material {
    /// Untextured white, fully metallic and rough, opaque, single-sided
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            textures: BTreeMap::new(),
            base_color_factor: Vec4::ONE,
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            emissive_factor: Vec3::ZERO,
            alpha_cutoff: 0.5,
            alpha_mode: AlphaMode::Opaque,
            double_sided: false,
        }
    }

    /// Bind `texture`/`sampler` to the slot called `name` (replaces any previous binding)
    pub fn with_texture(mut self, name: &str, texture: TextureKey, sampler: SamplerKey) -> Self {
        self.textures.insert(name.to_string(), MaterialTexture { texture, sampler });
        self
    }

    pub fn with_alpha_mode(mut self, alpha_mode: AlphaMode) -> Self {
        self.alpha_mode = alpha_mode;
        self
    }

    pub fn with_double_sided(mut self, double_sided: bool) -> Self {
        self.double_sided = double_sided;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn texture(&self, name: &str) -> Option<&MaterialTexture> {
        self.textures.get(name)
    }

    /// Texture slots ordered by name
    pub fn textures(&self) -> &BTreeMap<String, MaterialTexture> {
        &self.textures
    }
}
