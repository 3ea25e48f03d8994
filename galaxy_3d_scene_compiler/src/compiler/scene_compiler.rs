/// Scene compiler.
///
/// Turns a scene graph into a flat list of draw elements. For every
/// primitive reached by the traversal:
/// 1. derive the permutation from its vertex attributes and material textures
/// 2. fetch and merge the shader reflection, match streams to shader inputs
/// 3. build (or reuse) the per-material set layouts and the pipeline layout
/// 4. build (or reuse) the pipeline
/// 5. bind textures into the bindless table, then create per-frame uniform
///    buffers and descriptor sets
/// 6. emit the draw element
///
/// Shader variants, layouts and pipelines are cached on the compiler and
/// survive across `compile()` calls; `reset()` drops them together with the
/// bindless table. Bindless slots are handed out again by every compilation.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use crate::config::{CompilerConfig, MAX_DRAW_TEXTURES};
use crate::error::{Error, Result};
use crate::engine_err;
use crate::graphics_device::{
    Buffer, BufferDesc, BufferUsage, ColorBlendState, CullMode, DescriptorBinding, DescriptorResource,
    DescriptorSetLayoutDesc, DescriptorSetLayoutFlags, DescriptorType, DescriptorWrite,
    FixedFunctionState, GraphicsDevice, GraphicsPipelineDesc, PipelineLayoutDesc,
    VertexAttribute, VertexBinding, VertexInputRate, VertexLayout,
};
use crate::scene::{AlphaMode, Material, Primitive, SceneGraph, VisitedPrimitive, POSITION_ATTRIBUTE};
use crate::shader::{
    PermutationKey, ShaderCache, ShaderInput, ShaderResourceKind, ShaderSource,
};
use super::bindless::BindlessTextureTable;
use super::draw_element::{
    CompiledScene, DrawElement, DrawUniforms, FrameBindings, IndexBufferBinding,
    VertexBufferBinding,
};
use super::layout_cache::LayoutCache;
use super::pipeline_cache::PipelineCache;
use super::shader_resources::{MergedShaderResources, BINDLESS_SET};

const DRAW_UNIFORMS_SIZE: u64 = std::mem::size_of::<DrawUniforms>() as u64;

/// Vertex input matched against a primitive's streams
struct VertexInput {
    layout: VertexLayout,
    buffers: Vec<VertexBufferBinding>,
    vertex_count: u32,
}

pub struct SceneCompiler {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    config: CompilerConfig,
    shader_cache: ShaderCache,
    layout_cache: LayoutCache,
    pipeline_cache: PipelineCache,
    /// Created by the first compilation after construction or reset
    bindless: Option<BindlessTextureTable>,
}

impl SceneCompiler {
    /// Create a compiler; no GPU object is created until the first `compile()`
    pub fn new(
        device: Arc<Mutex<dyn GraphicsDevice>>,
        shader_source: Box<dyn ShaderSource>,
        config: CompilerConfig,
    ) -> Result<Self> {
        config.validate()?;
        crate::engine_info!("galaxy3d::SceneCompiler",
            "Scene compiler created (shader '{}', {} frame(s) in flight, {} bindless slots)",
            config.shader_id, config.frames_in_flight, config.bindless_capacity);

        Ok(Self {
            device,
            config,
            shader_cache: ShaderCache::new(shader_source),
            layout_cache: LayoutCache::new(),
            pipeline_cache: PipelineCache::new(),
            bindless: None,
        })
    }

    /// Compile every primitive reachable in `scene`
    ///
    /// The scene is validated as a whole first: a primitive without a
    /// position stream (or with dangling material/texture keys) fails the
    /// compilation before any GPU object is created.
    pub fn compile(&mut self, scene: &SceneGraph) -> Result<CompiledScene> {
        self.validate(scene)?;

        let device = Arc::clone(&self.device);
        let mut device = device.lock()
            .map_err(|_| engine_err!("galaxy3d::SceneCompiler", "Graphics device lock poisoned"))?;
        let device: &mut dyn GraphicsDevice = &mut *device;

        match self.bindless.as_mut() {
            Some(bindless) => bindless.release_slots(),
            None => {
                self.bindless = Some(BindlessTextureTable::new(
                    device,
                    &mut self.layout_cache,
                    self.config.bindless_capacity,
                    self.config.dedupe_bindless_slots,
                )?);
            }
        }

        let mut draw_elements = Vec::new();
        for visited in scene.traverse_primitives() {
            draw_elements.push(self.compile_primitive(device, scene, &visited)?);
        }

        let bindless = self.bindless_table_mut()?;
        let bindless_set = Arc::clone(bindless.descriptor_set());
        let slot_count = bindless.slot_count();

        crate::engine_info!("galaxy3d::SceneCompiler",
            "Compiled {} draw element(s): {} pipeline(s), {} set layout(s), {} pipeline layout(s), {} bindless slot(s)",
            draw_elements.len(), self.pipeline_cache.len(),
            self.layout_cache.descriptor_set_layout_count(),
            self.layout_cache.pipeline_layout_count(), slot_count);

        Ok(CompiledScene { draw_elements, bindless_set })
    }

    /// Drop every cache and the bindless table (scene or asset reload)
    pub fn reset(&mut self) {
        self.shader_cache.clear();
        self.layout_cache.clear();
        self.pipeline_cache.clear();
        self.bindless = None;
        crate::engine_info!("galaxy3d::SceneCompiler", "Scene compiler caches reset");
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    pub fn shader_cache(&self) -> &ShaderCache {
        &self.shader_cache
    }

    pub fn layout_cache(&self) -> &LayoutCache {
        &self.layout_cache
    }

    pub fn pipeline_cache(&self) -> &PipelineCache {
        &self.pipeline_cache
    }

    /// None before the first compilation and after `reset()`
    pub fn bindless_table(&self) -> Option<&BindlessTextureTable> {
        self.bindless.as_ref()
    }

    fn bindless_table_mut(&mut self) -> Result<&mut BindlessTextureTable> {
        self.bindless.as_mut()
            .ok_or_else(|| engine_err!("galaxy3d::SceneCompiler", "Bindless table not created"))
    }

    // ===== VALIDATION =====

    fn validate(&self, scene: &SceneGraph) -> Result<()> {
        for visited in scene.traverse_primitives() {
            let primitive = visited.primitive;
            if !primitive.has_attribute(POSITION_ATTRIBUTE) {
                crate::engine_error!("galaxy3d::SceneCompiler",
                    "Primitive '{}' has no '{}' attribute", visited.label(), POSITION_ATTRIBUTE);
                return Err(Error::MissingVertexAttribute {
                    primitive: visited.label(),
                    attribute: POSITION_ATTRIBUTE.to_string(),
                });
            }

            let material = scene.material(primitive.material())
                .ok_or_else(|| invalid(format!(
                    "Primitive '{}' references an unknown material", visited.label())))?;
            for name in &self.config.wanted_textures {
                if let Some(slot) = material.texture(name) {
                    if scene.texture(slot.texture).is_none() || scene.sampler(slot.sampler).is_none() {
                        return Err(invalid(format!(
                            "Material '{}' texture '{}' references an unknown texture or sampler",
                            material.name(), name)));
                    }
                    // Both would select the same permutation flag
                    let flag = PermutationKey::flag_for(name);
                    if let Some(attribute) = primitive.attributes().keys()
                        .find(|attribute| PermutationKey::flag_for(attribute) == flag)
                    {
                        return Err(invalid(format!(
                            "Primitive '{}': attribute '{}' and texture '{}' both map to {}",
                            visited.label(), attribute, name, flag)));
                    }
                }
            }
        }
        Ok(())
    }

    // ===== PER PRIMITIVE =====

    fn compile_primitive(
        &mut self,
        device: &mut dyn GraphicsDevice,
        scene: &SceneGraph,
        visited: &VisitedPrimitive,
    ) -> Result<DrawElement> {
        let primitive = visited.primitive;
        let label = visited.label();
        let material = scene.material(primitive.material())
            .ok_or_else(|| invalid(format!("Primitive '{}' references an unknown material", label)))?;

        // 1. Permutation
        let features = self.permutation(primitive, material);

        // 2. Shader resources and vertex input
        let merged = MergedShaderResources::aggregate(
            &mut self.shader_cache, &self.config.shader_id, &features, &label)?;
        let vertex_input = build_vertex_input(primitive, &merged.vertex_inputs, &label)?;

        // 3. Layouts
        let material_sets = material_set_layouts(&merged, &label);
        let uniform_size = uniform_buffer_size(&merged);
        let pipeline_layout_desc = PipelineLayoutDesc {
            set_layouts: self.pipeline_set_layouts(&material_sets),
            push_constant_ranges: merged.push_constant_ranges.clone(),
        };
        let pipeline_layout = self.layout_cache.request_pipeline_layout(device, &pipeline_layout_desc)?;

        // 4. Pipeline
        let pipeline_desc = GraphicsPipelineDesc {
            stages: vec![merged.vertex.pipeline_stage(), merged.fragment.pipeline_stage()],
            vertex_layout: vertex_input.layout,
            layout: Arc::clone(&pipeline_layout),
            state: fixed_function_state(primitive, material),
        };
        let pipeline_hash = pipeline_desc.content_hash();
        let pipeline = self.pipeline_cache.request_pipeline(device, &pipeline_desc, pipeline_hash)?;

        // 5. Textures, uniforms and per-frame descriptor sets
        let texture_indices = self.bind_textures(device, scene, material, &label)?;
        let uniforms = DrawUniforms::new(visited.world_transform, material, texture_indices);
        let mut frames = Vec::with_capacity(self.config.frames_in_flight as usize);
        for frame_index in 0..self.config.frames_in_flight {
            frames.push(self.frame_bindings(
                device, &material_sets, &uniforms, uniform_size, &label, frame_index)?);
        }

        // 6. Draw element
        let index_buffer = primitive.indices().map(|indices| IndexBufferBinding {
            buffer: Arc::clone(&indices.buffer),
            offset: indices.offset,
            count: indices.count,
            index_type: indices.index_type,
        });

        crate::engine_debug!("galaxy3d::SceneCompiler",
            "Primitive '{}': permutation {}, {} vertex binding(s), {} material set(s), pipeline {:016x}",
            label, features, vertex_input.buffers.len(), material_sets.len(), pipeline_hash);

        Ok(DrawElement {
            label,
            pipeline,
            pipeline_layout,
            pipeline_hash,
            frames,
            vertex_buffers: vertex_input.buffers,
            index_buffer,
            vertex_count: vertex_input.vertex_count,
            world_transform: visited.world_transform,
            texture_indices,
        })
    }

    /// `HAS_<NAME>` for every vertex attribute and every present wanted texture
    fn permutation(&self, primitive: &Primitive, material: &Material) -> PermutationKey {
        let mut features = PermutationKey::new();
        for name in primitive.attributes().keys() {
            features.insert_feature(name);
        }
        for name in &self.config.wanted_textures {
            if material.texture(name).is_some() {
                features.insert_feature(name);
            }
        }
        features
    }

    /// Bindless layout at set 0, then one layout per set up to the highest
    /// material set, empty where the shader declares nothing
    fn pipeline_set_layouts(
        &self,
        material_sets: &BTreeMap<u32, DescriptorSetLayoutDesc>,
    ) -> Vec<DescriptorSetLayoutDesc> {
        let mut set_layouts = vec![BindlessTextureTable::layout_desc(self.config.bindless_capacity)];
        if let Some(&highest) = material_sets.keys().next_back() {
            for set in (BINDLESS_SET + 1)..=highest {
                set_layouts.push(material_sets.get(&set).cloned().unwrap_or_default());
            }
        }
        set_layouts
    }

    /// Bindless slot per wanted texture, in `wanted_textures` order
    fn bind_textures(
        &mut self,
        device: &mut dyn GraphicsDevice,
        scene: &SceneGraph,
        material: &Material,
        label: &str,
    ) -> Result<[u32; MAX_DRAW_TEXTURES]> {
        let mut indices = DrawUniforms::no_textures();
        let bindless = self.bindless.as_mut()
            .ok_or_else(|| engine_err!("galaxy3d::SceneCompiler", "Bindless table not created"))?;

        for (index, name) in self.config.wanted_textures.iter().enumerate() {
            let Some(slot) = material.texture(name) else {
                crate::engine_trace!("galaxy3d::SceneCompiler",
                    "Primitive '{}': material '{}' has no '{}' texture", label, material.name(), name);
                continue;
            };
            let texture = scene.texture(slot.texture)
                .ok_or_else(|| invalid(format!("Unknown texture for '{}' in '{}'", name, material.name())))?;
            let sampler = scene.sampler(slot.sampler)
                .ok_or_else(|| invalid(format!("Unknown sampler for '{}' in '{}'", name, material.name())))?;
            indices[index] = bindless.allocate_slot(device, texture, sampler)?;
        }
        Ok(indices)
    }

    /// Uniform buffer plus one descriptor set per material set for one frame in flight
    ///
    /// The buffer is `size` bytes: `DrawUniforms` followed by zeros.
    fn frame_bindings(
        &mut self,
        device: &mut dyn GraphicsDevice,
        material_sets: &BTreeMap<u32, DescriptorSetLayoutDesc>,
        uniforms: &DrawUniforms,
        size: u64,
        label: &str,
        frame_index: u32,
    ) -> Result<FrameBindings> {
        let mut bytes = vec![0u8; size as usize];
        bytes[..DRAW_UNIFORMS_SIZE as usize].copy_from_slice(uniforms.as_bytes());
        let uniform_buffer: Arc<dyn Buffer> = device.create_buffer(
            &BufferDesc {
                name: format!("{}/draw[{}]", label, frame_index),
                size,
                usage: BufferUsage::Uniform,
            },
            Some(&bytes),
        )?;

        let mut descriptor_sets = Vec::with_capacity(material_sets.len());
        let mut writes = Vec::new();
        for (&set_index, layout_desc) in material_sets {
            let layout = self.layout_cache.request_descriptor_set_layout(device, layout_desc)?;
            let set = device.allocate_descriptor_sets(&layout, 1)?
                .into_iter()
                .next()
                .ok_or_else(|| engine_err!("galaxy3d::SceneCompiler",
                    "Device returned no descriptor set for set {} of '{}'", set_index, label))?;

            for binding in &layout_desc.bindings {
                for array_element in 0..binding.count {
                    writes.push(DescriptorWrite {
                        set: Arc::clone(&set),
                        binding: binding.binding,
                        array_element,
                        resource: DescriptorResource::UniformBuffer {
                            buffer: Arc::clone(&uniform_buffer),
                            offset: 0,
                            range: size,
                        },
                    });
                }
            }
            descriptor_sets.push((set_index, set));
        }

        if !writes.is_empty() {
            device.update_descriptor_sets(&writes)?;
        }

        Ok(FrameBindings { descriptor_sets, uniform_buffer })
    }
}

fn invalid(message: String) -> Error {
    crate::engine_error!("galaxy3d::SceneCompiler", "{}", message);
    Error::InvalidResource(message)
}

/// One vertex binding per shader input that has a matching stream, in location order
fn build_vertex_input(
    primitive: &Primitive,
    inputs: &[ShaderInput],
    label: &str,
) -> Result<VertexInput> {
    let mut layout = VertexLayout::default();
    let mut buffers = Vec::new();
    let mut vertex_count = None;

    for input in inputs {
        let Some(stream) = primitive.attribute(&input.name) else {
            crate::engine_trace!("galaxy3d::SceneCompiler",
                "Primitive '{}': shader input '{}' has no stream", label, input.name);
            continue;
        };
        let binding = layout.bindings.len() as u32;
        layout.bindings.push(VertexBinding {
            binding,
            stride: stream.stride,
            input_rate: VertexInputRate::Vertex,
        });
        layout.attributes.push(VertexAttribute {
            location: input.location,
            binding,
            format: stream.format,
            offset: 0,
        });
        buffers.push(VertexBufferBinding {
            binding,
            buffer: Arc::clone(&stream.buffer),
            offset: stream.offset,
        });
        vertex_count.get_or_insert(stream.count);
    }

    for name in primitive.attributes().keys() {
        if !inputs.iter().any(|input| &input.name == name) {
            crate::engine_trace!("galaxy3d::SceneCompiler",
                "Primitive '{}': stream '{}' not consumed by the shader", label, name);
        }
    }

    // Shaders without a position input still draw the position stream's vertex count
    let vertex_count = match vertex_count {
        Some(count) => count,
        None => primitive.attribute(POSITION_ATTRIBUTE)
            .map(|stream| stream.count)
            .ok_or_else(|| Error::MissingVertexAttribute {
                primitive: label.to_string(),
                attribute: POSITION_ATTRIBUTE.to_string(),
            })?,
    };

    Ok(VertexInput { layout, buffers, vertex_count })
}

/// Largest uniform block any material set declares, never less than `DrawUniforms`
fn uniform_buffer_size(merged: &MergedShaderResources) -> u64 {
    merged.sets.values()
        .flatten()
        .filter(|resource| resource.kind == ShaderResourceKind::UniformBuffer)
        .map(|resource| resource.size as u64)
        .fold(DRAW_UNIFORMS_SIZE, u64::max)
}

/// Uniform-buffer-only layout per material set; samplers are left to the bindless table
fn material_set_layouts(
    merged: &MergedShaderResources,
    label: &str,
) -> BTreeMap<u32, DescriptorSetLayoutDesc> {
    let mut layouts = BTreeMap::new();
    for (&set, resources) in &merged.sets {
        let mut bindings = Vec::new();
        for resource in resources {
            if resource.kind != ShaderResourceKind::UniformBuffer {
                crate::engine_trace!("galaxy3d::SceneCompiler",
                    "Primitive '{}': '{}' (set={}, binding={}) is not a uniform buffer, not bound",
                    label, resource.name, set, resource.binding);
                continue;
            }
            bindings.push(DescriptorBinding {
                binding: resource.binding,
                descriptor_type: DescriptorType::UniformBuffer,
                count: resource.array_size,
                stages: resource.stages,
            });
        }
        if !bindings.is_empty() {
            layouts.insert(set, DescriptorSetLayoutDesc {
                bindings,
                flags: DescriptorSetLayoutFlags::empty(),
            });
        }
    }
    layouts
}

/// Default state with the material's overrides applied
fn fixed_function_state(primitive: &Primitive, material: &Material) -> FixedFunctionState {
    let mut state = FixedFunctionState {
        topology: primitive.topology(),
        ..FixedFunctionState::default()
    };
    if material.double_sided {
        state.rasterization.cull_mode = CullMode::None;
    }
    if material.alpha_mode == AlphaMode::Blend {
        state.color_blend = ColorBlendState::alpha_blending();
        state.depth.depth_write_enable = false;
    }
    state
}

#[cfg(test)]
#[path = "scene_compiler_tests.rs"]
mod tests;
