/// Bindless texture table.
///
/// One descriptor set holding a large combined-image-sampler array at set 0,
/// binding 0. Every texture the compiler binds gets the next free array
/// element; draws refer to textures by that index. Slots are handed out in
/// increasing order and only start over when a new compilation begins.
///
/// With deduplication enabled, a (texture, sampler) pair already in the table
/// returns its existing slot. Identity is the handle's allocation, so the
/// table keeps every bound pair alive.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::graphics_device::{
    DescriptorBinding, DescriptorResource, DescriptorSet, DescriptorSetLayout,
    DescriptorSetLayoutDesc, DescriptorSetLayoutFlags, DescriptorType, DescriptorWrite,
    GraphicsDevice, Sampler, ShaderStageFlags, Texture,
};
use super::layout_cache::LayoutCache;

/// Texture index meaning "no texture bound"
pub const INVALID_BINDLESS_INDEX: u32 = u32::MAX;

/// Binding of the texture array inside the bindless set
pub const BINDLESS_BINDING: u32 = 0;

type PairIdentity = (usize, usize);

fn pair_identity(texture: &Arc<dyn Texture>, sampler: &Arc<dyn Sampler>) -> PairIdentity {
    (
        Arc::as_ptr(texture) as *const () as usize,
        Arc::as_ptr(sampler) as *const () as usize,
    )
}

pub struct BindlessTextureTable {
    layout: Arc<dyn DescriptorSetLayout>,
    set: Arc<dyn DescriptorSet>,
    capacity: u32,
    next_slot: u32,
    dedupe: bool,
    /// Slot of each bound pair (only filled when deduplicating)
    slots: FxHashMap<PairIdentity, u32>,
    /// Pairs whose identity is recorded in `slots`
    bound: Vec<(Arc<dyn Texture>, Arc<dyn Sampler>)>,
}

impl BindlessTextureTable {
    /// Layout description of the bindless set for a given array size
    pub fn layout_desc(capacity: u32) -> DescriptorSetLayoutDesc {
        DescriptorSetLayoutDesc {
            bindings: vec![DescriptorBinding {
                binding: BINDLESS_BINDING,
                descriptor_type: DescriptorType::CombinedImageSampler,
                count: capacity,
                stages: ShaderStageFlags::FRAGMENT,
            }],
            flags: DescriptorSetLayoutFlags::UPDATE_AFTER_BIND
                | DescriptorSetLayoutFlags::PARTIALLY_BOUND,
        }
    }

    /// Create the layout (through `layout_cache`) and allocate the single set
    pub fn new(
        device: &mut dyn GraphicsDevice,
        layout_cache: &mut LayoutCache,
        capacity: u32,
        dedupe: bool,
    ) -> Result<Self> {
        let layout = layout_cache.request_descriptor_set_layout(
            device, &Self::layout_desc(capacity))?;
        let set = device.allocate_descriptor_sets(&layout, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| crate::engine_err!("galaxy3d::BindlessTextureTable",
                "Device returned no descriptor set for the bindless layout"))?;

        crate::engine_debug!("galaxy3d::BindlessTextureTable",
            "Created bindless table with {} slots (dedupe: {})", capacity, dedupe);

        Ok(Self {
            layout,
            set,
            capacity,
            next_slot: 0,
            dedupe,
            slots: FxHashMap::default(),
            bound: Vec::new(),
        })
    }

    /// Bind `texture`/`sampler` to a slot and return its index
    pub fn allocate_slot(
        &mut self,
        device: &mut dyn GraphicsDevice,
        texture: &Arc<dyn Texture>,
        sampler: &Arc<dyn Sampler>,
    ) -> Result<u32> {
        let identity = pair_identity(texture, sampler);
        if self.dedupe {
            if let Some(&slot) = self.slots.get(&identity) {
                return Ok(slot);
            }
        }

        if self.next_slot >= self.capacity {
            crate::engine_error!("galaxy3d::BindlessTextureTable",
                "Bindless table full ({} slots)", self.capacity);
            return Err(Error::BindlessTableFull { capacity: self.capacity });
        }

        let slot = self.next_slot;
        device.update_descriptor_sets(&[DescriptorWrite {
            set: Arc::clone(&self.set),
            binding: BINDLESS_BINDING,
            array_element: slot,
            resource: DescriptorResource::CombinedImageSampler {
                texture: Arc::clone(texture),
                sampler: Arc::clone(sampler),
            },
        }])?;
        self.next_slot += 1;

        if self.dedupe {
            self.slots.insert(identity, slot);
            self.bound.push((Arc::clone(texture), Arc::clone(sampler)));
        }

        crate::engine_trace!("galaxy3d::BindlessTextureTable", "Bound texture at slot {}", slot);
        Ok(slot)
    }

    /// Forget every slot, keeping the layout and descriptor set
    ///
    /// Draw elements compiled before the call must no longer be used: their
    /// indices will be overwritten by the next allocations.
    pub fn release_slots(&mut self) {
        crate::engine_trace!("galaxy3d::BindlessTextureTable",
            "Released {} slot(s)", self.next_slot);
        self.next_slot = 0;
        self.slots.clear();
        self.bound.clear();
    }

    pub fn layout(&self) -> &Arc<dyn DescriptorSetLayout> {
        &self.layout
    }

    /// The descriptor set to bind at set 0
    pub fn descriptor_set(&self) -> &Arc<dyn DescriptorSet> {
        &self.set
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of slots handed out so far
    pub fn slot_count(&self) -> u32 {
        self.next_slot
    }
}

#[cfg(test)]
#[path = "bindless_tests.rs"]
mod tests;
