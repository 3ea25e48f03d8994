/// Scene graph: an arena of nodes plus the asset pools they reference.
///
/// Nodes live in a SlotMap and point at each other through `NodeKey`s.
/// Every node has at most one parent; `add_child` refuses any link that
/// would break the forest shape (re-parenting, self links, cycles).
///
/// Meshes and materials are owned by the graph. Textures and samplers are
/// GPU handles owned by the asset layer; the graph only keeps them reachable
/// under stable keys.

use std::sync::Arc;
use glam::{Mat4, Vec3};
use slotmap::{new_key_type, SlotMap};
use crate::error::{Error, Result};
use crate::graphics_device::{Sampler, Texture};
use super::material::Material;
use super::mesh::Mesh;

new_key_type! {
    /// Stable key of a node within a SceneGraph
    pub struct NodeKey;
    /// Stable key of a mesh within a SceneGraph
    pub struct MeshKey;
    /// Stable key of a material within a SceneGraph
    pub struct MaterialKey;
    /// Stable key of a texture within a SceneGraph
    pub struct TextureKey;
    /// Stable key of a sampler within a SceneGraph
    pub struct SamplerKey;
}

// ===== COMPONENTS =====

/// Perspective camera attached to a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians
    pub yfov: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self { yfov: std::f32::consts::FRAC_PI_4, znear: 0.1, zfar: 1000.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    Directional,
    Point,
    Spot,
}

/// Punctual light attached to a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub light_type: LightType,
    pub color: Vec3,
    pub intensity: f32,
}

/// Discriminant of a `SceneComponent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Camera,
    Light,
    Mesh,
}

/// Data attached to a node
#[derive(Debug, Clone, PartialEq)]
pub enum SceneComponent {
    Camera(Camera),
    Light(Light),
    Mesh(MeshKey),
}

impl SceneComponent {
    pub fn kind(&self) -> ComponentKind {
        match self {
            SceneComponent::Camera(_) => ComponentKind::Camera,
            SceneComponent::Light(_) => ComponentKind::Light,
            SceneComponent::Mesh(_) => ComponentKind::Mesh,
        }
    }
}

// ===== NODE =====

#[derive(Debug, Clone)]
pub struct SceneNode {
    name: String,
    local_transform: Mat4,
    components: Vec<SceneComponent>,
    children: Vec<NodeKey>,
    parent: Option<NodeKey>,
}

impl SceneNode {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transform relative to the parent node
    pub fn local_transform(&self) -> Mat4 {
        self.local_transform
    }

    pub fn components(&self) -> &[SceneComponent] {
        &self.components
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    /// Key of the attached mesh, if any
    pub fn mesh(&self) -> Option<MeshKey> {
        self.components.iter().find_map(|component| match component {
            SceneComponent::Mesh(key) => Some(*key),
            _ => None,
        })
    }

    pub fn has_component(&self, kind: ComponentKind) -> bool {
        self.components.iter().any(|component| component.kind() == kind)
    }
}

// ===== SCENE GRAPH =====

pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    /// Parentless nodes in insertion order
    roots: Vec<NodeKey>,
    meshes: SlotMap<MeshKey, Mesh>,
    materials: SlotMap<MaterialKey, Material>,
    textures: SlotMap<TextureKey, Arc<dyn Texture>>,
    samplers: SlotMap<SamplerKey, Arc<dyn Sampler>>,
}

fn invalid(message: String) -> Error {
    crate::engine_error!("galaxy3d::SceneGraph", "{}", message);
    Error::InvalidResource(message)
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            roots: Vec::new(),
            meshes: SlotMap::with_key(),
            materials: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            samplers: SlotMap::with_key(),
        }
    }

    // ----- Nodes -----

    /// Create a parentless node
    pub fn add_node(&mut self, name: &str, local_transform: Mat4) -> NodeKey {
        let key = self.nodes.insert(SceneNode {
            name: name.to_string(),
            local_transform,
            components: Vec::new(),
            children: Vec::new(),
            parent: None,
        });
        self.roots.push(key);
        key
    }

    /// Make `child` a child of `parent`
    ///
    /// Fails if either key is unknown, if `child` already has a parent, or if
    /// `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        if !self.nodes.contains_key(parent) {
            return Err(invalid(format!("Unknown parent node {:?}", parent)));
        }
        let child_node = self.nodes.get(child)
            .ok_or_else(|| invalid(format!("Unknown child node {:?}", child)))?;
        if let Some(current) = child_node.parent {
            return Err(invalid(format!(
                "Node '{}' already has parent '{}'",
                child_node.name, self.nodes[current].name)));
        }

        // Walk up from parent: reaching child means the link closes a cycle
        let mut cursor = Some(parent);
        while let Some(key) = cursor {
            if key == child {
                return Err(invalid(format!(
                    "Linking '{}' under '{}' would create a cycle",
                    self.nodes[child].name, self.nodes[parent].name)));
            }
            cursor = self.nodes[key].parent;
        }

        self.nodes[child].parent = Some(parent);
        self.nodes[parent].children.push(child);
        self.roots.retain(|&root| root != child);
        Ok(())
    }

    /// Attach a component to `node` (at most one mesh per node)
    pub fn attach_component(&mut self, node: NodeKey, component: SceneComponent) -> Result<()> {
        if let SceneComponent::Mesh(mesh) = &component {
            if !self.meshes.contains_key(*mesh) {
                return Err(invalid(format!("Unknown mesh {:?}", mesh)));
            }
        }
        let target = self.nodes.get_mut(node)
            .ok_or_else(|| invalid(format!("Unknown node {:?}", node)))?;
        if component.kind() == ComponentKind::Mesh && target.has_component(ComponentKind::Mesh) {
            let message = format!("Node '{}' already carries a mesh", target.name);
            return Err(invalid(message));
        }
        target.components.push(component);
        Ok(())
    }

    /// Replace the local transform of `node`. Returns false if the key is invalid.
    pub fn set_local_transform(&mut self, node: NodeKey, local_transform: Mat4) -> bool {
        match self.nodes.get_mut(node) {
            Some(target) => {
                target.local_transform = local_transform;
                true
            }
            None => false,
        }
    }

    pub fn node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ----- Assets -----

    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.meshes.insert(mesh)
    }

    pub fn mesh(&self, key: MeshKey) -> Option<&Mesh> {
        self.meshes.get(key)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    pub fn material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    pub fn material_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.materials.get_mut(key)
    }

    pub fn add_texture(&mut self, texture: Arc<dyn Texture>) -> TextureKey {
        self.textures.insert(texture)
    }

    pub fn texture(&self, key: TextureKey) -> Option<&Arc<dyn Texture>> {
        self.textures.get(key)
    }

    pub fn add_sampler(&mut self, sampler: Arc<dyn Sampler>) -> SamplerKey {
        self.samplers.insert(sampler)
    }

    pub fn sampler(&self, key: SamplerKey) -> Option<&Arc<dyn Sampler>> {
        self.samplers.get(key)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "scene_graph_tests.rs"]
mod tests;
