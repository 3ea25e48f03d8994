//! Scene module
//!
//! Arena-based scene graph, mesh/material data and the breadth-first
//! traversal feeding the scene compiler.

mod scene_graph;
mod mesh;
mod material;
mod traversal;

pub use scene_graph::{
    SceneGraph, SceneNode, SceneComponent, ComponentKind,
    Camera, Light, LightType,
    NodeKey, MeshKey, MaterialKey, TextureKey, SamplerKey,
};
pub use mesh::{Mesh, Primitive, VertexAttributeStream, IndexStream, POSITION_ATTRIBUTE};
pub use material::{Material, MaterialTexture, AlphaMode};
pub use traversal::{SceneTraversal, VisitedPrimitive};
