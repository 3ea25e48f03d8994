use super::*;
use crate::graphics_device::mock_graphics_device::{MockGraphicsDevice, MockSampler, MockTexture};

fn texture(name: &str) -> Arc<dyn Texture> {
    Arc::new(MockTexture::new(name))
}

fn sampler() -> Arc<dyn Sampler> {
    Arc::new(MockSampler)
}

fn table(device: &mut MockGraphicsDevice, capacity: u32, dedupe: bool) -> BindlessTextureTable {
    let mut layouts = LayoutCache::new();
    BindlessTextureTable::new(device, &mut layouts, capacity, dedupe).unwrap()
}

#[test]
fn test_creates_one_layout_and_one_set() {
    let mut device = MockGraphicsDevice::new();
    let table = table(&mut device, 1024, false);

    assert_eq!(device.stats.descriptor_set_layouts, 1);
    assert_eq!(device.stats.descriptor_sets, 1);
    assert_eq!(device.layout_descs[0], BindlessTextureTable::layout_desc(1024));
    assert_eq!(table.layout().binding_count(), 1);
    assert_eq!(table.capacity(), 1024);
    assert_eq!(table.slot_count(), 0);
}

#[test]
fn test_layout_desc_flags() {
    let desc = BindlessTextureTable::layout_desc(16);
    assert_eq!(desc.bindings[0].count, 16);
    assert_eq!(desc.bindings[0].descriptor_type, DescriptorType::CombinedImageSampler);
    assert!(desc.flags.contains(DescriptorSetLayoutFlags::UPDATE_AFTER_BIND));
    assert!(desc.flags.contains(DescriptorSetLayoutFlags::PARTIALLY_BOUND));
}

#[test]
fn test_slots_are_sequential_and_written() {
    let mut device = MockGraphicsDevice::new();
    let mut table = table(&mut device, 8, false);
    let s = sampler();

    let a = table.allocate_slot(&mut device, &texture("a"), &s).unwrap();
    let b = table.allocate_slot(&mut device, &texture("b"), &s).unwrap();

    assert_eq!((a, b), (0, 1));
    assert_eq!(device.writes.len(), 2);
    assert_eq!(device.writes[1].array_element, 1);
    assert_eq!(device.writes[1].binding, BINDLESS_BINDING);
    assert!(Arc::ptr_eq(&device.writes[1].set, table.descriptor_set()));
}

#[test]
fn test_same_pair_gets_new_slot_without_dedupe() {
    let mut device = MockGraphicsDevice::new();
    let mut table = table(&mut device, 8, false);
    let (t, s) = (texture("shared"), sampler());

    let first = table.allocate_slot(&mut device, &t, &s).unwrap();
    let second = table.allocate_slot(&mut device, &t, &s).unwrap();

    assert_ne!(first, second);
    assert_eq!(table.slot_count(), 2);
}

#[test]
fn test_same_pair_shares_slot_with_dedupe() {
    let mut device = MockGraphicsDevice::new();
    let mut table = table(&mut device, 8, true);
    let (t, s) = (texture("shared"), sampler());

    let first = table.allocate_slot(&mut device, &t, &s).unwrap();
    let second = table.allocate_slot(&mut device, &t, &s).unwrap();
    let other_sampler = table.allocate_slot(&mut device, &t, &sampler()).unwrap();

    assert_eq!(first, second);
    assert_ne!(first, other_sampler);
    assert_eq!(table.slot_count(), 2);
    assert_eq!(device.writes.len(), 2);
}

#[test]
fn test_full_table_is_an_error() {
    let mut device = MockGraphicsDevice::new();
    let mut table = table(&mut device, 2, false);
    let s = sampler();

    table.allocate_slot(&mut device, &texture("a"), &s).unwrap();
    table.allocate_slot(&mut device, &texture("b"), &s).unwrap();
    let result = table.allocate_slot(&mut device, &texture("c"), &s);

    assert!(matches!(result, Err(Error::BindlessTableFull { capacity: 2 })));
    assert_eq!(table.slot_count(), 2);
    assert_eq!(device.writes.len(), 2);
}

#[test]
fn test_release_slots_restarts_numbering() {
    let mut device = MockGraphicsDevice::new();
    let mut table = table(&mut device, 2, true);
    let (t, s) = (texture("albedo"), sampler());

    table.allocate_slot(&mut device, &t, &s).unwrap();
    table.allocate_slot(&mut device, &texture("normal"), &s).unwrap();
    table.release_slots();

    assert_eq!(table.slot_count(), 0);
    // Released pairs are written again rather than deduplicated
    assert_eq!(table.allocate_slot(&mut device, &t, &s).unwrap(), 0);
    assert_eq!(device.writes.len(), 3);
    assert_eq!(device.stats.descriptor_sets, 1);
}
