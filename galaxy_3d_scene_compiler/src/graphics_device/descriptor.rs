/// Descriptor set layout descriptions and descriptor writes
///
/// Layout descriptions are plain data with structural equality and hashing,
/// so two descriptions built independently compare equal when they declare
/// the same bindings in the same order.

use std::sync::Arc;
use bitflags::bitflags;
use crate::graphics_device::{Buffer, DescriptorSet, Sampler, ShaderStageFlags, Texture};

// ============================================================================
// Layout descriptions
// ============================================================================

/// Type of resource bound at a given slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptorType {
    /// Uniform buffer (read-only structured data)
    UniformBuffer,
    /// Combined image sampler (texture + sampler in one binding)
    CombinedImageSampler,
}

/// Description of a single binding slot within a descriptor set layout
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DescriptorBinding {
    /// Binding number (`layout(binding = N)` in GLSL)
    pub binding: u32,
    /// Type of resource at this binding
    pub descriptor_type: DescriptorType,
    /// Number of descriptors at this binding (>1 for arrays)
    pub count: u32,
    /// Shader stages that access this binding
    pub stages: ShaderStageFlags,
}

bitflags! {
    /// Descriptor set layout creation flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DescriptorSetLayoutFlags: u32 {
        /// Bindings may be updated after the set is bound
        const UPDATE_AFTER_BIND = 0x01;
        /// Array elements may be left unbound if never accessed
        const PARTIALLY_BOUND = 0x02;
    }
}

/// Structural description of a descriptor set layout
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DescriptorSetLayoutDesc {
    /// Bindings, ordered by binding index
    pub bindings: Vec<DescriptorBinding>,
    /// Creation flags
    pub flags: DescriptorSetLayoutFlags,
}

impl Default for DescriptorSetLayoutFlags {
    fn default() -> Self {
        Self::empty()
    }
}

impl DescriptorSetLayoutDesc {
    /// Layout with no bindings (fills unused set indices of a pipeline layout)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the layout declares no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Push constant range descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PushConstantRange {
    /// Shader stages that can access these push constants
    pub stages: ShaderStageFlags,
    /// Offset in bytes
    pub offset: u32,
    /// Size in bytes
    pub size: u32,
}

/// Structural description of a pipeline layout
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PipelineLayoutDesc {
    /// Set layouts, index in the vector = set index
    pub set_layouts: Vec<DescriptorSetLayoutDesc>,
    /// Push constant ranges
    pub push_constant_ranges: Vec<PushConstantRange>,
}

// ============================================================================
// Descriptor writes
// ============================================================================

/// A concrete resource written into a descriptor
#[derive(Clone)]
pub enum DescriptorResource {
    /// Uniform buffer range
    UniformBuffer {
        buffer: Arc<dyn Buffer>,
        offset: u64,
        range: u64,
    },
    /// Texture + sampler pair
    CombinedImageSampler {
        texture: Arc<dyn Texture>,
        sampler: Arc<dyn Sampler>,
    },
}

/// One descriptor update: `resource` goes to `set[binding][array_element]`
#[derive(Clone)]
pub struct DescriptorWrite {
    pub set: Arc<dyn DescriptorSet>,
    pub binding: u32,
    pub array_element: u32,
    pub resource: DescriptorResource,
}
