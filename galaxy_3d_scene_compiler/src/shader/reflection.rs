/// Shader reflection types
///
/// One `ShaderReflection` per compiled stage. Resources are reported once per
/// (resource, stage) pair; merging across stages is done by the compiler.

use crate::graphics_device::{BufferFormat, ShaderStageFlags};

/// Kind of a reflected shader resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderResourceKind {
    /// Uniform buffer block
    UniformBuffer,
    /// Combined image sampler (alone or as an array)
    CombinedImageSampler,
    /// Push constant block
    PushConstant,
}

/// A resource declared by one shader stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderResource {
    pub name: String,
    /// Descriptor set index (unused for push constants)
    pub set: u32,
    /// Binding index within the set (unused for push constants)
    pub binding: u32,
    pub kind: ShaderResourceKind,
    /// Stages referencing the resource
    pub stages: ShaderStageFlags,
    /// Number of array elements (1 for non-arrays)
    pub array_size: u32,
    /// Byte offset (push constants)
    pub offset: u32,
    /// Byte size of the block (0 when unknown, e.g. samplers)
    pub size: u32,
}

/// A vertex-stage input variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderInput {
    /// Input name, matched against primitive attribute names
    pub name: String,
    pub location: u32,
    pub format: BufferFormat,
}

/// Reflection table of one compiled stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderReflection {
    pub resources: Vec<ShaderResource>,
    /// Stage inputs (only meaningful for vertex shaders)
    pub inputs: Vec<ShaderInput>,
}
