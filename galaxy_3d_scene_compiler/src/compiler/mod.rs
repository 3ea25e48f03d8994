//! Compiler module
//!
//! Turns a scene graph into draw elements: shader resource aggregation,
//! layout and pipeline caches, the bindless texture table and the scene
//! compiler that drives them.

mod shader_resources;
mod layout_cache;
mod bindless;
mod pipeline_cache;
mod draw_element;
mod scene_compiler;

pub use shader_resources::{MergedShaderResources, BINDLESS_SET};
pub use layout_cache::LayoutCache;
pub use bindless::{BindlessTextureTable, BINDLESS_BINDING, INVALID_BINDLESS_INDEX};
pub use pipeline_cache::PipelineCache;
pub use draw_element::{
    CompiledScene, DrawElement, DrawUniforms, FrameBindings,
    IndexBufferBinding, VertexBufferBinding,
};
pub use scene_compiler::SceneCompiler;
