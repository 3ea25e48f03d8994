/// Graphics pipeline descriptor and fixed-function state
///
/// Every type that takes part in a pipeline's identity implements `Hash`,
/// so `GraphicsPipelineDesc::content_hash()` can fold shader identities,
/// vertex input and fixed-function state into one cache key.

use std::hash::{Hash, Hasher};
use std::sync::Arc;
use bitflags::bitflags;
use rustc_hash::FxHasher;
use crate::graphics_device::{BufferFormat, PipelineLayout, ShaderStage};

/// Primitive topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveTopology {
    TriangleList,
    TriangleStrip,
    LineList,
    PointList,
}

// ===== VERTEX INPUT =====

/// Vertex input rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexInputRate {
    /// Data is per-vertex
    Vertex,
    /// Data is per-instance
    Instance,
}

/// Vertex attribute description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Attribute location in shader
    pub location: u32,
    /// Binding index
    pub binding: u32,
    /// Format of the attribute (data type and component count)
    pub format: BufferFormat,
    /// Offset in bytes from the start of the vertex
    pub offset: u32,
}

/// Vertex binding description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexBinding {
    /// Binding index
    pub binding: u32,
    /// Stride in bytes between consecutive elements
    pub stride: u32,
    /// Input rate (per-vertex or per-instance)
    pub input_rate: VertexInputRate,
}

/// Vertex input layout
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct VertexLayout {
    /// Vertex bindings
    pub bindings: Vec<VertexBinding>,
    /// Vertex attributes
    pub attributes: Vec<VertexAttribute>,
}

// ===== RASTERIZATION =====

/// Face culling mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullMode {
    None,
    Front,
    Back,
}

/// Front face winding order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontFace {
    CounterClockwise,
    Clockwise,
}

/// Polygon rendering mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonMode {
    Fill,
    Line,
    Point,
}

/// Depth bias parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBias {
    /// Constant depth offset
    pub constant_factor: f32,
    /// Slope-based depth offset
    pub slope_factor: f32,
    /// Maximum depth bias clamp
    pub clamp: f32,
}

impl Hash for DepthBias {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.constant_factor.to_bits().hash(state);
        self.slope_factor.to_bits().hash(state);
        self.clamp.to_bits().hash(state);
    }
}

/// Rasterization fixed-function state
#[derive(Debug, Clone, Copy, PartialEq, Hash)]
pub struct RasterizationState {
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
    pub polygon_mode: PolygonMode,
    /// Depth bias (None = disabled)
    pub depth_bias: Option<DepthBias>,
}

impl Default for RasterizationState {
    fn default() -> Self {
        Self {
            cull_mode: CullMode::Back,
            front_face: FrontFace::CounterClockwise,
            polygon_mode: PolygonMode::Fill,
            depth_bias: None,
        }
    }
}

// ===== DEPTH =====

/// Comparison operator for depth tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

/// Depth testing state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DepthState {
    pub depth_test_enable: bool,
    pub depth_write_enable: bool,
    pub depth_compare_op: CompareOp,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            depth_test_enable: true,
            depth_write_enable: true,
            depth_compare_op: CompareOp::Less,
        }
    }
}

// ===== COLOR BLEND =====

/// Blend factor for color blending equations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Blend operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendOp {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Color blending state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorBlendState {
    pub blend_enable: bool,
    pub src_color_factor: BlendFactor,
    pub dst_color_factor: BlendFactor,
    pub color_blend_op: BlendOp,
    pub src_alpha_factor: BlendFactor,
    pub dst_alpha_factor: BlendFactor,
    pub alpha_blend_op: BlendOp,
}

impl ColorBlendState {
    /// Standard "over" alpha blending
    pub fn alpha_blending() -> Self {
        Self {
            blend_enable: true,
            src_color_factor: BlendFactor::SrcAlpha,
            dst_color_factor: BlendFactor::OneMinusSrcAlpha,
            color_blend_op: BlendOp::Add,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::OneMinusSrcAlpha,
            alpha_blend_op: BlendOp::Add,
        }
    }
}

impl Default for ColorBlendState {
    fn default() -> Self {
        Self {
            blend_enable: false,
            src_color_factor: BlendFactor::One,
            dst_color_factor: BlendFactor::Zero,
            color_blend_op: BlendOp::Add,
            src_alpha_factor: BlendFactor::One,
            dst_alpha_factor: BlendFactor::Zero,
            alpha_blend_op: BlendOp::Add,
        }
    }
}

// ===== MULTISAMPLE =====

/// Multisample count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleCount {
    S1,
    S2,
    S4,
    S8,
}

/// Multisampling state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MultisampleState {
    pub sample_count: SampleCount,
    pub alpha_to_coverage: bool,
}

impl Default for MultisampleState {
    fn default() -> Self {
        Self {
            sample_count: SampleCount::S1,
            alpha_to_coverage: false,
        }
    }
}

// ===== DYNAMIC STATE =====

bitflags! {
    /// Pipeline state set by the renderer at record time instead of baked in
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DynamicStateFlags: u32 {
        const VIEWPORT = 0x01;
        const SCISSOR = 0x02;
        const DEPTH_BIAS = 0x04;
    }
}

// ===== FIXED-FUNCTION STATE =====

/// All fixed-function state of a graphics pipeline
#[derive(Debug, Clone, Copy, PartialEq, Hash)]
pub struct FixedFunctionState {
    pub topology: PrimitiveTopology,
    pub rasterization: RasterizationState,
    pub depth: DepthState,
    pub color_blend: ColorBlendState,
    pub multisample: MultisampleState,
    pub dynamic_state: DynamicStateFlags,
}

impl Default for FixedFunctionState {
    fn default() -> Self {
        Self {
            topology: PrimitiveTopology::TriangleList,
            rasterization: RasterizationState::default(),
            depth: DepthState::default(),
            color_blend: ColorBlendState::default(),
            multisample: MultisampleState::default(),
            dynamic_state: DynamicStateFlags::VIEWPORT | DynamicStateFlags::SCISSOR,
        }
    }
}

// ===== PIPELINE DESCRIPTOR =====

/// One programmable stage of a pipeline
#[derive(Debug, Clone)]
pub struct PipelineShaderStage {
    pub stage: ShaderStage,
    /// SPIR-V words
    pub code: Arc<Vec<u32>>,
    pub entry_point: String,
    /// Identity of `code`, as reported by the shader source
    pub content_hash: u64,
}

/// Descriptor for creating a graphics pipeline
#[derive(Clone)]
pub struct GraphicsPipelineDesc {
    /// Shader stages, ordered by stage
    pub stages: Vec<PipelineShaderStage>,
    /// Vertex input layout
    pub vertex_layout: VertexLayout,
    /// Pipeline layout the pipeline is created against
    pub layout: Arc<dyn PipelineLayout>,
    /// Fixed-function state
    pub state: FixedFunctionState,
}

impl GraphicsPipelineDesc {
    /// Hash of shader identities, vertex input and fixed-function state
    ///
    /// The pipeline layout is not part of the hash: it is derived from the
    /// same shader variants.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.stages.len().hash(&mut hasher);
        for stage in &self.stages {
            stage.stage.hash(&mut hasher);
            stage.content_hash.hash(&mut hasher);
            stage.entry_point.hash(&mut hasher);
        }
        self.vertex_layout.hash(&mut hasher);
        self.state.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
