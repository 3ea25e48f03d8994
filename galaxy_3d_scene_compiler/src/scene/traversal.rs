/// Breadth-first scene traversal.
///
/// Walks the forest from its roots, composing world transforms as
/// `parent_world * local`, and yields every primitive of every reachable
/// mesh. Nodes without a mesh produce nothing but their children are still
/// visited. The graph is only read.

use std::collections::VecDeque;
use glam::Mat4;
use super::mesh::{Mesh, Primitive};
use super::scene_graph::{NodeKey, SceneGraph};

/// A primitive reached by the traversal, with its placement in the world
#[derive(Clone, Copy)]
pub struct VisitedPrimitive<'a> {
    pub world_transform: Mat4,
    pub node: NodeKey,
    pub mesh: &'a Mesh,
    /// Position of `primitive` within `mesh`
    pub primitive_index: usize,
    pub primitive: &'a Primitive,
}

impl VisitedPrimitive<'_> {
    /// Human-readable identifier ("mesh#index") used in diagnostics
    pub fn label(&self) -> String {
        format!("{}#{}", self.mesh.name(), self.primitive_index)
    }
}

/// Lazy breadth-first iterator over the primitives of a scene graph
pub struct SceneTraversal<'a> {
    graph: &'a SceneGraph,
    queue: VecDeque<(NodeKey, Mat4)>,
    /// Mesh being emitted: (node, world transform, mesh, next primitive index)
    current: Option<(NodeKey, Mat4, &'a Mesh, usize)>,
}

impl<'a> SceneTraversal<'a> {
    pub fn new(graph: &'a SceneGraph) -> Self {
        let queue = graph.roots().iter().map(|&root| (root, Mat4::IDENTITY)).collect();
        Self { graph, queue, current: None }
    }
}

impl<'a> Iterator for SceneTraversal<'a> {
    type Item = VisitedPrimitive<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((node, world_transform, mesh, index)) = self.current {
                if let Some(primitive) = mesh.primitives().get(index) {
                    self.current = Some((node, world_transform, mesh, index + 1));
                    return Some(VisitedPrimitive {
                        world_transform,
                        node,
                        mesh,
                        primitive_index: index,
                        primitive,
                    });
                }
                self.current = None;
            }

            let (key, parent_world) = self.queue.pop_front()?;
            let Some(node) = self.graph.node(key) else {
                continue;
            };
            let world_transform = parent_world * node.local_transform();
            for &child in node.children() {
                self.queue.push_back((child, world_transform));
            }
            if let Some(mesh) = node.mesh().and_then(|mesh_key| self.graph.mesh(mesh_key)) {
                self.current = Some((key, world_transform, mesh, 0));
            }
        }
    }
}

impl SceneGraph {
    /// Every reachable primitive with its world transform, breadth-first
    pub fn traverse(&self) -> impl Iterator<Item = (Mat4, &Primitive)> + '_ {
        self.traverse_primitives()
            .map(|visited| (visited.world_transform, visited.primitive))
    }

    /// Same walk as `traverse`, with node/mesh provenance for each primitive
    pub fn traverse_primitives(&self) -> SceneTraversal<'_> {
        SceneTraversal::new(self)
    }
}

#[cfg(test)]
#[path = "traversal_tests.rs"]
mod tests;
