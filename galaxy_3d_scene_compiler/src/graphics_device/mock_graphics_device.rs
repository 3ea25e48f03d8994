/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Every created object and descriptor write is recorded so tests can assert
/// how many GPU objects a compilation produced.

use std::sync::{Arc, Mutex};
use crate::error::{Error, Result};
use crate::graphics_device::{
    Buffer, BufferDesc, DescriptorSet, DescriptorSetLayout, DescriptorSetLayoutDesc,
    DescriptorWrite, GraphicsDevice, GraphicsPipelineDesc, Pipeline, PipelineLayout,
    PushConstantRange, Sampler, Texture,
};

// ============================================================================
// Mock handles
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub name: String,
    pub data: Mutex<Vec<u8>>,
}

impl MockBuffer {
    /// Zero-filled buffer of `size` bytes
    pub fn new(name: &str, size: usize) -> Self {
        Self { name: name.to_string(), data: Mutex::new(vec![0u8; size]) }
    }
}

impl Buffer for MockBuffer {
    fn size(&self) -> u64 {
        self.data.lock().unwrap().len() as u64
    }

    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        let mut contents = self.data.lock().unwrap();
        let start = offset as usize;
        let end = start + data.len();
        if end > contents.len() {
            return Err(Error::InvalidResource(format!(
                "write of {} bytes at {} overflows buffer '{}'",
                data.len(), offset, self.name
            )));
        }
        contents[start..end].copy_from_slice(data);
        Ok(())
    }
}

#[derive(Debug)]
pub struct MockTexture {
    pub name: String,
}

impl MockTexture {
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

impl Texture for MockTexture {}

#[derive(Debug)]
pub struct MockSampler;

impl Sampler for MockSampler {}

#[derive(Debug)]
pub struct MockDescriptorSetLayout {
    pub desc: DescriptorSetLayoutDesc,
}

impl DescriptorSetLayout for MockDescriptorSetLayout {
    fn binding_count(&self) -> u32 {
        self.desc.bindings.len() as u32
    }
}

#[derive(Debug)]
pub struct MockPipelineLayout {
    pub set_layout_count: u32,
    pub push_constant_ranges: Vec<PushConstantRange>,
}

impl PipelineLayout for MockPipelineLayout {
    fn set_layout_count(&self) -> u32 {
        self.set_layout_count
    }
}

#[derive(Debug)]
pub struct MockPipeline {
    pub id: usize,
}

impl Pipeline for MockPipeline {}

#[derive(Debug)]
pub struct MockDescriptorSet {
    pub id: usize,
}

impl DescriptorSet for MockDescriptorSet {}

// ============================================================================
// Mock device
// ============================================================================

/// Counters of objects created by a MockGraphicsDevice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MockDeviceStats {
    pub descriptor_set_layouts: usize,
    pub pipeline_layouts: usize,
    pub pipelines: usize,
    pub descriptor_sets: usize,
    pub buffers: usize,
    pub descriptor_writes: usize,
}

#[derive(Default)]
pub struct MockGraphicsDevice {
    pub stats: MockDeviceStats,
    /// Every layout description passed to create_descriptor_set_layout
    pub layout_descs: Vec<DescriptorSetLayoutDesc>,
    /// Every pipeline description passed to create_graphics_pipeline
    pub pipeline_descs: Vec<GraphicsPipelineDesc>,
    /// Every descriptor write applied
    pub writes: Vec<DescriptorWrite>,
    /// (desc, initial data) of every created buffer
    pub buffer_uploads: Vec<(BufferDesc, Vec<u8>)>,
    /// Make create_graphics_pipeline fail
    pub fail_pipeline_creation: bool,
}

impl MockGraphicsDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a device wrapped the way the compiler consumes it, plus a typed handle
    pub fn shared() -> (Arc<Mutex<MockGraphicsDevice>>, Arc<Mutex<dyn GraphicsDevice>>) {
        let typed = Arc::new(Mutex::new(MockGraphicsDevice::new()));
        let erased: Arc<Mutex<dyn GraphicsDevice>> = typed.clone();
        (typed, erased)
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_descriptor_set_layout(
        &mut self,
        desc: &DescriptorSetLayoutDesc,
    ) -> Result<Arc<dyn DescriptorSetLayout>> {
        self.stats.descriptor_set_layouts += 1;
        self.layout_descs.push(desc.clone());
        Ok(Arc::new(MockDescriptorSetLayout { desc: desc.clone() }))
    }

    fn create_pipeline_layout(
        &mut self,
        set_layouts: &[Arc<dyn DescriptorSetLayout>],
        push_constant_ranges: &[PushConstantRange],
    ) -> Result<Arc<dyn PipelineLayout>> {
        self.stats.pipeline_layouts += 1;
        Ok(Arc::new(MockPipelineLayout {
            set_layout_count: set_layouts.len() as u32,
            push_constant_ranges: push_constant_ranges.to_vec(),
        }))
    }

    fn create_graphics_pipeline(&mut self, desc: &GraphicsPipelineDesc) -> Result<Arc<dyn Pipeline>> {
        if self.fail_pipeline_creation {
            return Err(Error::BackendError("mock pipeline creation failure".to_string()));
        }
        self.stats.pipelines += 1;
        self.pipeline_descs.push(desc.clone());
        Ok(Arc::new(MockPipeline { id: self.stats.pipelines }))
    }

    fn allocate_descriptor_sets(
        &mut self,
        _layout: &Arc<dyn DescriptorSetLayout>,
        count: u32,
    ) -> Result<Vec<Arc<dyn DescriptorSet>>> {
        let mut sets: Vec<Arc<dyn DescriptorSet>> = Vec::with_capacity(count as usize);
        for _ in 0..count {
            self.stats.descriptor_sets += 1;
            sets.push(Arc::new(MockDescriptorSet { id: self.stats.descriptor_sets }));
        }
        Ok(sets)
    }

    fn update_descriptor_sets(&mut self, writes: &[DescriptorWrite]) -> Result<()> {
        self.stats.descriptor_writes += writes.len();
        self.writes.extend_from_slice(writes);
        Ok(())
    }

    fn create_buffer(&mut self, desc: &BufferDesc, initial_data: Option<&[u8]>) -> Result<Arc<dyn Buffer>> {
        self.stats.buffers += 1;
        let mut data = vec![0u8; desc.size as usize];
        if let Some(initial) = initial_data {
            data[..initial.len()].copy_from_slice(initial);
        }
        self.buffer_uploads.push((desc.clone(), data.clone()));
        Ok(Arc::new(MockBuffer { name: desc.name.clone(), data: Mutex::new(data) }))
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
