/// GraphicsDevice trait - factory interface for every GPU object the compiler needs

use std::sync::Arc;
use crate::error::Result;
use crate::graphics_device::{
    Buffer, BufferDesc, DescriptorSetLayoutDesc, DescriptorWrite,
    GraphicsPipelineDesc, PushConstantRange,
};

// ============================================================================
// GPU object handles
// ============================================================================

/// Descriptor set layout handle (schema of one descriptor set)
///
/// The layout is destroyed when the last reference is dropped.
pub trait DescriptorSetLayout: Send + Sync {
    /// Number of bindings declared by this layout
    fn binding_count(&self) -> u32;
}

/// Pipeline layout handle (ordered set layouts + push constant ranges)
pub trait PipelineLayout: Send + Sync {
    /// Number of descriptor set layouts in this pipeline layout
    fn set_layout_count(&self) -> u32;
}

/// Compiled graphics pipeline handle
pub trait Pipeline: Send + Sync {}

/// Descriptor set handle allocated from a layout
///
/// Contents are changed through `GraphicsDevice::update_descriptor_sets`.
pub trait DescriptorSet: Send + Sync {}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// GPU device abstraction
///
/// Implemented by backend-specific devices. Every created object is returned
/// as a shared handle; the backend destroys it when the last handle is dropped.
pub trait GraphicsDevice: Send + Sync {
    /// Create a descriptor set layout
    ///
    /// # Arguments
    ///
    /// * `desc` - Ordered bindings and layout flags
    fn create_descriptor_set_layout(
        &mut self,
        desc: &DescriptorSetLayoutDesc,
    ) -> Result<Arc<dyn DescriptorSetLayout>>;

    /// Create a pipeline layout
    ///
    /// # Arguments
    ///
    /// * `set_layouts` - Set layouts ordered by set index
    /// * `push_constant_ranges` - Push constant ranges
    fn create_pipeline_layout(
        &mut self,
        set_layouts: &[Arc<dyn DescriptorSetLayout>],
        push_constant_ranges: &[PushConstantRange],
    ) -> Result<Arc<dyn PipelineLayout>>;

    /// Create a graphics pipeline
    fn create_graphics_pipeline(&mut self, desc: &GraphicsPipelineDesc) -> Result<Arc<dyn Pipeline>>;

    /// Allocate `count` descriptor sets from a layout
    fn allocate_descriptor_sets(
        &mut self,
        layout: &Arc<dyn DescriptorSetLayout>,
        count: u32,
    ) -> Result<Vec<Arc<dyn DescriptorSet>>>;

    /// Apply descriptor writes
    fn update_descriptor_sets(&mut self, writes: &[DescriptorWrite]) -> Result<()>;

    /// Create a buffer, optionally filled with `initial_data`
    fn create_buffer(&mut self, desc: &BufferDesc, initial_data: Option<&[u8]>) -> Result<Arc<dyn Buffer>>;
}
