/// Graphics pipeline cache.
///
/// Pipelines are keyed by `GraphicsPipelineDesc::content_hash()`: shader
/// content hashes, vertex layout and fixed-function state. A hit returns the
/// shared handle, a miss creates the pipeline on the device.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, GraphicsPipelineDesc, Pipeline};

pub struct PipelineCache {
    pipelines: FxHashMap<u64, Arc<dyn Pipeline>>,
}

impl Default for PipelineCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineCache {
    pub fn new() -> Self {
        Self { pipelines: FxHashMap::default() }
    }

    /// Shared pipeline for `desc`, created on first request
    ///
    /// `content_hash` must be `desc.content_hash()`; callers that already
    /// computed it pass it in.
    pub fn request_pipeline(
        &mut self,
        device: &mut dyn GraphicsDevice,
        desc: &GraphicsPipelineDesc,
        content_hash: u64,
    ) -> Result<Arc<dyn Pipeline>> {
        if let Some(pipeline) = self.pipelines.get(&content_hash) {
            return Ok(Arc::clone(pipeline));
        }

        let pipeline = device.create_graphics_pipeline(desc)?;
        crate::engine_debug!("galaxy3d::PipelineCache",
            "Created pipeline {:016x} ({} vertex binding(s))",
            content_hash, desc.vertex_layout.bindings.len());
        self.pipelines.insert(content_hash, Arc::clone(&pipeline));
        Ok(pipeline)
    }

    pub fn contains(&self, content_hash: u64) -> bool {
        self.pipelines.contains_key(&content_hash)
    }

    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }

    /// Drop every cached pipeline
    pub fn clear(&mut self) {
        self.pipelines.clear();
    }
}

#[cfg(test)]
#[path = "pipeline_cache_tests.rs"]
mod tests;
