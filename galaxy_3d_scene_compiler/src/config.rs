/// Scene compiler configuration

use rustc_hash::FxHashSet;
use crate::error::{Error, Result};
use crate::scene::POSITION_ATTRIBUTE;
use crate::shader::PermutationKey;

/// Maximum number of bindless texture indices carried by one draw element
pub const MAX_DRAW_TEXTURES: usize = 8;

/// Scene compiler configuration
#[derive(Debug, Clone)]
pub struct CompilerConfig {
    /// Shader family requested from the shader source for every primitive
    pub shader_id: String,
    /// Number of frames the renderer keeps in flight
    pub frames_in_flight: u32,
    /// Number of slots in the bindless texture array
    pub bindless_capacity: u32,
    /// Material texture names the shaders know how to sample, in uniform order
    ///
    /// Their permutation flags must differ from every vertex attribute's.
    pub wanted_textures: Vec<String>,
    /// Reuse the bindless slot of an already-bound (texture, sampler) pair
    pub dedupe_bindless_slots: bool,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            shader_id: "pbr".to_string(),
            frames_in_flight: 2,
            bindless_capacity: 1024,
            wanted_textures: vec![
                "baseColorTexture".to_string(),
                "metallicRoughnessTexture".to_string(),
                "normalTexture".to_string(),
                "occlusionTexture".to_string(),
                "emissiveTexture".to_string(),
            ],
            dedupe_bindless_slots: false,
        }
    }
}

impl CompilerConfig {
    /// Check the configuration before any GPU object is created
    pub fn validate(&self) -> Result<()> {
        if self.shader_id.is_empty() {
            return Err(failed("Shader id must not be empty".to_string()));
        }
        if self.frames_in_flight == 0 {
            return Err(failed("At least one frame in flight is required".to_string()));
        }
        if self.bindless_capacity == 0 {
            return Err(failed("Bindless capacity must be greater than zero".to_string()));
        }
        if self.wanted_textures.len() > MAX_DRAW_TEXTURES {
            return Err(failed(format!(
                "{} wanted textures requested, at most {} fit in the draw uniforms",
                self.wanted_textures.len(),
                MAX_DRAW_TEXTURES
            )));
        }
        let mut seen = FxHashSet::default();
        for name in &self.wanted_textures {
            if !seen.insert(PermutationKey::flag_for(name)) {
                return Err(failed(format!("Duplicate wanted texture '{}'", name)));
            }
            if PermutationKey::flag_for(name) == PermutationKey::flag_for(POSITION_ATTRIBUTE) {
                return Err(failed(format!(
                    "Wanted texture '{}' collides with the '{}' attribute",
                    name, POSITION_ATTRIBUTE
                )));
            }
        }
        Ok(())
    }
}

fn failed(message: String) -> Error {
    crate::engine_error!("galaxy3d::CompilerConfig", "{}", message);
    Error::InitializationFailed(message)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
