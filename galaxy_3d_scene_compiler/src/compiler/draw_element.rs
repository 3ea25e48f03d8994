/// Draw elements: the flattened, GPU-ready output of scene compilation.
///
/// A DrawElement carries everything a frame renderer needs to record one
/// draw call without looking at the scene graph again: pipeline, bindings per
/// frame in flight, vertex/index buffers and counts.

use std::sync::Arc;
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use crate::config::MAX_DRAW_TEXTURES;
use crate::graphics_device::{Buffer, DescriptorSet, IndexType, Pipeline, PipelineLayout};
use crate::scene::Material;
use super::bindless::INVALID_BINDLESS_INDEX;

// ===== UNIFORM DATA =====

/// Per-draw uniform block (std140-compatible layout)
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DrawUniforms {
    pub world: Mat4,
    pub base_color_factor: Vec4,
    /// xyz = emissive factor, w unused
    pub emissive_factor: Vec4,
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub alpha_cutoff: f32,
    /// 0 = opaque, 1 = mask, 2 = blend
    pub alpha_mode: u32,
    /// Bindless slot per wanted texture, `INVALID_BINDLESS_INDEX` when absent
    pub texture_indices: [u32; MAX_DRAW_TEXTURES],
}

impl DrawUniforms {
    pub fn new(world: Mat4, material: &Material, texture_indices: [u32; MAX_DRAW_TEXTURES]) -> Self {
        Self {
            world,
            base_color_factor: material.base_color_factor,
            emissive_factor: material.emissive_factor.extend(0.0),
            metallic_factor: material.metallic_factor,
            roughness_factor: material.roughness_factor,
            alpha_cutoff: material.alpha_cutoff,
            alpha_mode: material.alpha_mode.as_u32(),
            texture_indices,
        }
    }

    /// Texture index array with every entry unbound
    pub fn no_textures() -> [u32; MAX_DRAW_TEXTURES] {
        [INVALID_BINDLESS_INDEX; MAX_DRAW_TEXTURES]
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

// ===== BINDINGS =====

/// Resources bound for one frame in flight
#[derive(Clone)]
pub struct FrameBindings {
    /// Per-material descriptor sets with their set index (set 0 is the bindless set)
    pub descriptor_sets: Vec<(u32, Arc<dyn DescriptorSet>)>,
    /// Buffer holding this draw's `DrawUniforms`
    pub uniform_buffer: Arc<dyn Buffer>,
}

#[derive(Clone)]
pub struct VertexBufferBinding {
    pub binding: u32,
    pub buffer: Arc<dyn Buffer>,
    pub offset: u64,
}

#[derive(Clone)]
pub struct IndexBufferBinding {
    pub buffer: Arc<dyn Buffer>,
    pub offset: u64,
    pub count: u32,
    pub index_type: IndexType,
}

// ===== DRAW ELEMENT =====

/// One compiled primitive
#[derive(Clone)]
pub struct DrawElement {
    /// "mesh#index" of the source primitive
    pub label: String,
    pub pipeline: Arc<dyn Pipeline>,
    pub pipeline_layout: Arc<dyn PipelineLayout>,
    /// Content hash the pipeline is cached under
    pub pipeline_hash: u64,
    /// One entry per frame in flight
    pub frames: Vec<FrameBindings>,
    /// Ordered by binding index
    pub vertex_buffers: Vec<VertexBufferBinding>,
    pub index_buffer: Option<IndexBufferBinding>,
    pub vertex_count: u32,
    pub world_transform: Mat4,
    pub texture_indices: [u32; MAX_DRAW_TEXTURES],
}

impl DrawElement {
    /// Bindings for `frame_index`, wrapping around the frames in flight
    pub fn frame(&self, frame_index: usize) -> &FrameBindings {
        &self.frames[frame_index % self.frames.len()]
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }

    /// Vertices (or indices, when indexed) consumed by the draw call
    pub fn element_count(&self) -> u32 {
        self.index_buffer.as_ref().map_or(self.vertex_count, |indices| indices.count)
    }
}

/// Output of one compilation
pub struct CompiledScene {
    pub draw_elements: Vec<DrawElement>,
    /// Set 0 of every draw element's pipeline layout
    pub bindless_set: Arc<dyn DescriptorSet>,
}

impl CompiledScene {
    pub fn len(&self) -> usize {
        self.draw_elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draw_elements.is_empty()
    }
}
