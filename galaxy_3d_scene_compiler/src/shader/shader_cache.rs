/// Shader variant cache
///
/// Sits in front of the external shader compiler (`ShaderSource`) and
/// memoizes variants by (shader id, permutation, stage). Reflection data and
/// content hashes are taken as reported by the source.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::engine_bail;
use crate::graphics_device::{PipelineShaderStage, ShaderStage};
use crate::shader::{PermutationKey, ShaderReflection};

// ===== SHADER VARIANT =====

/// One compiled stage of one shader permutation
#[derive(Debug, Clone)]
pub struct ShaderVariant {
    pub stage: ShaderStage,
    /// SPIR-V words
    pub binary: Arc<Vec<u32>>,
    pub entry_point: String,
    pub reflection: ShaderReflection,
    /// Identity of `binary`; equal hashes mean interchangeable modules
    pub content_hash: u64,
}

impl ShaderVariant {
    /// Stage description consumed by the pipeline factory
    pub fn pipeline_stage(&self) -> PipelineShaderStage {
        PipelineShaderStage {
            stage: self.stage,
            code: Arc::clone(&self.binary),
            entry_point: self.entry_point.clone(),
            content_hash: self.content_hash,
        }
    }
}

// ===== SHADER SOURCE =====

/// External shader compiler/reflector
///
/// Compiles (or loads) the requested variant and reflects it.
pub trait ShaderSource: Send + Sync {
    fn request_shader_variant(
        &mut self,
        shader_id: &str,
        features: &PermutationKey,
        stage: ShaderStage,
    ) -> Result<ShaderVariant>;
}

// ===== SHADER CACHE =====

type VariantKey = (String, PermutationKey, ShaderStage);

/// Memoizing front-end for a `ShaderSource`
pub struct ShaderCache {
    source: Box<dyn ShaderSource>,
    variants: FxHashMap<VariantKey, Arc<ShaderVariant>>,
}

impl ShaderCache {
    pub fn new(source: Box<dyn ShaderSource>) -> Self {
        Self {
            source,
            variants: FxHashMap::default(),
        }
    }

    /// Fetch a variant, compiling it through the source on first request
    pub fn request(
        &mut self,
        shader_id: &str,
        features: &PermutationKey,
        stage: ShaderStage,
    ) -> Result<Arc<ShaderVariant>> {
        let key = (shader_id.to_string(), features.clone(), stage);
        if let Some(variant) = self.variants.get(&key) {
            return Ok(Arc::clone(variant));
        }

        let variant = self.source.request_shader_variant(shader_id, features, stage)?;
        if variant.stage != stage {
            engine_bail!("galaxy3d::ShaderCache",
                "Shader '{}' {}: requested {:?} stage, source returned {:?}",
                shader_id, features, stage, variant.stage);
        }

        crate::engine_debug!("galaxy3d::ShaderCache",
            "Compiled '{}' {:?} variant {} (hash {:016x})",
            shader_id, stage, features, variant.content_hash);

        let variant = Arc::new(variant);
        self.variants.insert(key, Arc::clone(&variant));
        Ok(variant)
    }

    /// Number of cached variants
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Drop every cached variant
    pub fn clear(&mut self) {
        self.variants.clear();
    }
}

#[cfg(test)]
#[path = "shader_cache_tests.rs"]
mod tests;
