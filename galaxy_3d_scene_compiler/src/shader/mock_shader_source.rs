/// Mock ShaderSource for unit tests
///
/// Returns fixed reflection tables shaped like a small PBR shader and counts
/// how many variants were requested.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use rustc_hash::FxHasher;
use crate::error::Result;
use crate::graphics_device::{BufferFormat, ShaderStage, ShaderStageFlags};
use crate::shader::{
    PermutationKey, ShaderInput, ShaderReflection, ShaderResource, ShaderResourceKind,
    ShaderSource, ShaderVariant,
};

pub(crate) struct MockShaderSource {
    pub requests: Arc<AtomicUsize>,
    /// Report the same content hash for every permutation
    pub ignore_features: bool,
    pub vertex: ShaderReflection,
    pub fragment: ShaderReflection,
}

pub(crate) fn input(name: &str, location: u32, format: BufferFormat) -> ShaderInput {
    ShaderInput { name: name.to_string(), location, format }
}

pub(crate) fn uniform(name: &str, set: u32, binding: u32, stages: ShaderStageFlags) -> ShaderResource {
    ShaderResource {
        name: name.to_string(),
        set,
        binding,
        kind: ShaderResourceKind::UniformBuffer,
        stages,
        array_size: 1,
        offset: 0,
        size: 160,
    }
}

pub(crate) fn sampler_array(name: &str, set: u32, binding: u32, count: u32) -> ShaderResource {
    ShaderResource {
        name: name.to_string(),
        set,
        binding,
        kind: ShaderResourceKind::CombinedImageSampler,
        stages: ShaderStageFlags::FRAGMENT,
        array_size: count,
        offset: 0,
        size: 0,
    }
}

pub(crate) fn push_constant(name: &str, stages: ShaderStageFlags, offset: u32, size: u32) -> ShaderResource {
    ShaderResource {
        name: name.to_string(),
        set: 0,
        binding: 0,
        kind: ShaderResourceKind::PushConstant,
        stages,
        array_size: 1,
        offset,
        size,
    }
}

impl MockShaderSource {
    /// Vertex stage: position/normal/texcoord0 inputs, draw UBO at set 1, push block.
    /// Fragment stage: same UBO and push block, bindless array at set 0.
    pub fn pbr() -> Self {
        Self {
            requests: Arc::new(AtomicUsize::new(0)),
            ignore_features: false,
            vertex: ShaderReflection {
                resources: vec![
                    uniform("DrawUniforms", 1, 0, ShaderStageFlags::VERTEX),
                    push_constant("PushData", ShaderStageFlags::VERTEX, 0, 64),
                ],
                inputs: vec![
                    input("position", 0, BufferFormat::R32G32B32_SFLOAT),
                    input("normal", 1, BufferFormat::R32G32B32_SFLOAT),
                    input("texcoord0", 2, BufferFormat::R32G32_SFLOAT),
                ],
            },
            fragment: ShaderReflection {
                resources: vec![
                    uniform("DrawUniforms", 1, 0, ShaderStageFlags::FRAGMENT),
                    sampler_array("textures", 0, 0, 1024),
                    push_constant("PushData", ShaderStageFlags::FRAGMENT, 0, 64),
                ],
                inputs: vec![],
            },
        }
    }

    pub fn ignoring_features(mut self) -> Self {
        self.ignore_features = true;
        self
    }
}

impl ShaderSource for MockShaderSource {
    fn request_shader_variant(
        &mut self,
        shader_id: &str,
        features: &PermutationKey,
        stage: ShaderStage,
    ) -> Result<ShaderVariant> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let mut hasher = FxHasher::default();
        shader_id.hash(&mut hasher);
        stage.hash(&mut hasher);
        if !self.ignore_features {
            features.hash(&mut hasher);
        }

        let reflection = match stage {
            ShaderStage::Vertex => self.vertex.clone(),
            ShaderStage::Fragment => self.fragment.clone(),
        };

        Ok(ShaderVariant {
            stage,
            binary: Arc::new(vec![0x0723_0203, hasher.finish() as u32]),
            entry_point: "main".to_string(),
            reflection,
            content_hash: hasher.finish(),
        })
    }
}
