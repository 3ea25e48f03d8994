/// Descriptor set layout and pipeline layout cache.
///
/// Layouts are keyed by their structural description: two descriptions with
/// the same bindings (index, type, count, stage mask), in the same order and
/// with the same flags, share one device object. Callers normalize binding
/// order. Entries live until `clear()`.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::graphics_device::{
    DescriptorSetLayout, DescriptorSetLayoutDesc, GraphicsDevice, PipelineLayout,
    PipelineLayoutDesc,
};

pub struct LayoutCache {
    set_layouts: FxHashMap<DescriptorSetLayoutDesc, Arc<dyn DescriptorSetLayout>>,
    pipeline_layouts: FxHashMap<PipelineLayoutDesc, Arc<dyn PipelineLayout>>,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            set_layouts: FxHashMap::default(),
            pipeline_layouts: FxHashMap::default(),
        }
    }

    /// Shared layout for `desc`, created on first request
    pub fn request_descriptor_set_layout(
        &mut self,
        device: &mut dyn GraphicsDevice,
        desc: &DescriptorSetLayoutDesc,
    ) -> Result<Arc<dyn DescriptorSetLayout>> {
        if let Some(layout) = self.set_layouts.get(desc) {
            return Ok(Arc::clone(layout));
        }

        let layout = device.create_descriptor_set_layout(desc)?;
        crate::engine_trace!("galaxy3d::LayoutCache",
            "Created descriptor set layout with {} binding(s)", desc.bindings.len());
        self.set_layouts.insert(desc.clone(), Arc::clone(&layout));
        Ok(layout)
    }

    /// Shared pipeline layout for `desc`; its set layouts go through the same cache
    pub fn request_pipeline_layout(
        &mut self,
        device: &mut dyn GraphicsDevice,
        desc: &PipelineLayoutDesc,
    ) -> Result<Arc<dyn PipelineLayout>> {
        if let Some(layout) = self.pipeline_layouts.get(desc) {
            return Ok(Arc::clone(layout));
        }

        let mut set_layouts = Vec::with_capacity(desc.set_layouts.len());
        for set_desc in &desc.set_layouts {
            set_layouts.push(self.request_descriptor_set_layout(device, set_desc)?);
        }

        let layout = device.create_pipeline_layout(&set_layouts, &desc.push_constant_ranges)?;
        crate::engine_trace!("galaxy3d::LayoutCache",
            "Created pipeline layout with {} set(s), {} push constant range(s)",
            set_layouts.len(), desc.push_constant_ranges.len());
        self.pipeline_layouts.insert(desc.clone(), Arc::clone(&layout));
        Ok(layout)
    }

    pub fn descriptor_set_layout_count(&self) -> usize {
        self.set_layouts.len()
    }

    pub fn pipeline_layout_count(&self) -> usize {
        self.pipeline_layouts.len()
    }

    /// Drop every cached layout
    pub fn clear(&mut self) {
        self.set_layouts.clear();
        self.pipeline_layouts.clear();
    }
}

#[cfg(test)]
#[path = "layout_cache_tests.rs"]
mod tests;
