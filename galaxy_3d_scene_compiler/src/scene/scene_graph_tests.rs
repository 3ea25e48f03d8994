/// Tests for SceneGraph
///
/// Node linking rules, component attachment and asset pools.

use super::*;
use crate::graphics_device::mock_graphics_device::{MockBuffer, MockSampler, MockTexture};
use crate::graphics_device::{BufferFormat, PrimitiveTopology};
use crate::scene::{AlphaMode, MaterialTexture, Primitive, VertexAttributeStream, POSITION_ATTRIBUTE};

// ============================================================================
// Helper Functions
// ============================================================================

fn graph_with_material() -> (SceneGraph, MaterialKey) {
    let mut graph = SceneGraph::new();
    let material = graph.add_material(Material::new("default"));
    (graph, material)
}

fn triangle(material: MaterialKey) -> Primitive {
    let buffer = Arc::new(MockBuffer::new("positions", 36));
    Primitive::new(material).with_attribute(
        POSITION_ATTRIBUTE,
        VertexAttributeStream::packed(buffer, BufferFormat::R32G32B32_SFLOAT, 3),
    )
}

// ============================================================================
// Node linking
// ============================================================================

#[test]
fn test_new_nodes_are_roots() {
    let mut graph = SceneGraph::new();
    let a = graph.add_node("a", Mat4::IDENTITY);
    let b = graph.add_node("b", Mat4::IDENTITY);

    assert_eq!(graph.roots(), &[a, b]);
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.node(a).unwrap().name(), "a");
    assert!(graph.node(a).unwrap().parent().is_none());
}

#[test]
fn test_add_child_links_both_ways() {
    let mut graph = SceneGraph::new();
    let parent = graph.add_node("parent", Mat4::IDENTITY);
    let child = graph.add_node("child", Mat4::IDENTITY);

    graph.add_child(parent, child).unwrap();

    assert_eq!(graph.node(child).unwrap().parent(), Some(parent));
    assert_eq!(graph.node(parent).unwrap().children(), &[child]);
    assert_eq!(graph.roots(), &[parent]);
}

#[test]
fn test_add_child_rejects_reparenting() {
    let mut graph = SceneGraph::new();
    let a = graph.add_node("a", Mat4::IDENTITY);
    let b = graph.add_node("b", Mat4::IDENTITY);
    let child = graph.add_node("child", Mat4::IDENTITY);

    graph.add_child(a, child).unwrap();
    let result = graph.add_child(b, child);

    assert!(matches!(result, Err(Error::InvalidResource(_))));
    assert_eq!(graph.node(child).unwrap().parent(), Some(a));
    assert!(graph.node(b).unwrap().children().is_empty());
}

#[test]
fn test_add_child_rejects_self_link() {
    let mut graph = SceneGraph::new();
    let a = graph.add_node("a", Mat4::IDENTITY);
    assert!(graph.add_child(a, a).is_err());
    assert_eq!(graph.roots(), &[a]);
}

#[test]
fn test_add_child_rejects_cycle() {
    let mut graph = SceneGraph::new();
    let a = graph.add_node("a", Mat4::IDENTITY);
    let b = graph.add_node("b", Mat4::IDENTITY);
    let c = graph.add_node("c", Mat4::IDENTITY);
    graph.add_child(a, b).unwrap();
    graph.add_child(b, c).unwrap();

    // a is a root (no parent) but is an ancestor of c
    assert!(graph.add_child(c, a).is_err());
    assert!(graph.node(a).unwrap().parent().is_none());
    assert_eq!(graph.roots(), &[a]);
}

#[test]
fn test_add_child_rejects_unknown_keys() {
    let mut graph = SceneGraph::new();
    let a = graph.add_node("a", Mat4::IDENTITY);
    let mut other = SceneGraph::new();
    let _ = other.add_node("x", Mat4::IDENTITY);
    let stale = other.add_node("y", Mat4::IDENTITY);

    assert!(graph.add_child(a, stale).is_err());
    assert!(graph.add_child(stale, a).is_err());
}

#[test]
fn test_set_local_transform() {
    let mut graph = SceneGraph::new();
    let a = graph.add_node("a", Mat4::IDENTITY);
    let moved = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));

    assert!(graph.set_local_transform(a, moved));
    assert_eq!(graph.node(a).unwrap().local_transform(), moved);
}

// ============================================================================
// Components
// ============================================================================

#[test]
fn test_component_kind() {
    assert_eq!(SceneComponent::Camera(Camera::default()).kind(), ComponentKind::Camera);
    let light = Light { light_type: LightType::Point, color: Vec3::ONE, intensity: 10.0 };
    assert_eq!(SceneComponent::Light(light).kind(), ComponentKind::Light);
}

#[test]
fn test_attach_mesh_component() {
    let (mut graph, material) = graph_with_material();
    let mesh = graph.add_mesh(Mesh::new("tri", vec![triangle(material)]));
    let node = graph.add_node("node", Mat4::IDENTITY);

    graph.attach_component(node, SceneComponent::Camera(Camera::default())).unwrap();
    graph.attach_component(node, SceneComponent::Mesh(mesh)).unwrap();

    let node_ref = graph.node(node).unwrap();
    assert_eq!(node_ref.mesh(), Some(mesh));
    assert!(node_ref.has_component(ComponentKind::Camera));
    assert!(!node_ref.has_component(ComponentKind::Light));
    assert_eq!(node_ref.components().len(), 2);
}

#[test]
fn test_second_mesh_component_rejected() {
    let (mut graph, material) = graph_with_material();
    let first = graph.add_mesh(Mesh::new("first", vec![triangle(material)]));
    let second = graph.add_mesh(Mesh::new("second", vec![triangle(material)]));
    let node = graph.add_node("node", Mat4::IDENTITY);

    graph.attach_component(node, SceneComponent::Mesh(first)).unwrap();
    assert!(graph.attach_component(node, SceneComponent::Mesh(second)).is_err());
    assert_eq!(graph.node(node).unwrap().mesh(), Some(first));
}

#[test]
fn test_attach_unknown_mesh_rejected() {
    let (mut graph, material) = graph_with_material();
    let mut other = SceneGraph::new();
    let foreign = other.add_mesh(Mesh::new("foreign", vec![triangle(material)]));
    let node = graph.add_node("node", Mat4::IDENTITY);

    assert!(graph.attach_component(node, SceneComponent::Mesh(foreign)).is_err());
}

// ============================================================================
// Assets
// ============================================================================

#[test]
fn test_asset_pools() {
    let mut graph = SceneGraph::new();
    let texture = graph.add_texture(Arc::new(MockTexture::new("albedo")));
    let sampler = graph.add_sampler(Arc::new(MockSampler));
    let material = graph.add_material(
        Material::new("painted")
            .with_texture("baseColor", texture, sampler)
            .with_alpha_mode(AlphaMode::Mask)
            .with_double_sided(true),
    );

    assert!(graph.texture(texture).is_some());
    assert!(graph.sampler(sampler).is_some());

    let stored = graph.material(material).unwrap();
    assert_eq!(stored.name(), "painted");
    assert_eq!(stored.texture("baseColor"), Some(&MaterialTexture { texture, sampler }));
    assert!(stored.texture("normal").is_none());
    assert_eq!(stored.alpha_mode, AlphaMode::Mask);
    assert!(stored.double_sided);

    graph.material_mut(material).unwrap().roughness_factor = 0.25;
    assert_eq!(graph.material(material).unwrap().roughness_factor, 0.25);
}

#[test]
fn test_material_defaults() {
    let material = Material::new("plain");
    assert_eq!(material.base_color_factor, glam::Vec4::ONE);
    assert_eq!(material.metallic_factor, 1.0);
    assert_eq!(material.roughness_factor, 1.0);
    assert_eq!(material.alpha_cutoff, 0.5);
    assert_eq!(material.alpha_mode, AlphaMode::Opaque);
    assert!(!material.double_sided);
    assert!(material.textures().is_empty());
}

#[test]
fn test_primitive_builder() {
    let (_, material) = graph_with_material();
    let primitive = triangle(material).with_topology(PrimitiveTopology::LineList);

    assert!(primitive.has_attribute(POSITION_ATTRIBUTE));
    assert!(!primitive.has_attribute("normal"));
    assert_eq!(primitive.attribute(POSITION_ATTRIBUTE).unwrap().stride, 12);
    assert_eq!(primitive.topology(), PrimitiveTopology::LineList);
    assert_eq!(primitive.material(), material);
    assert!(primitive.indices().is_none());
}
