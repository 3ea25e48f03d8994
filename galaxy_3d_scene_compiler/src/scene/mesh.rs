/// Mesh and primitive data.
///
/// A primitive is a set of named vertex attribute streams, an optional index
/// stream, a topology and a material. Streams reference GPU buffers owned by
/// the asset layer; the compiler never copies vertex data.

use std::collections::BTreeMap;
use std::sync::Arc;
use crate::graphics_device::{Buffer, BufferFormat, IndexType, PrimitiveTopology};
use super::scene_graph::MaterialKey;

/// Attribute every drawable primitive must provide
pub const POSITION_ATTRIBUTE: &str = "position";

// ===== STREAMS =====

/// One vertex attribute stored in a GPU buffer
#[derive(Clone)]
pub struct VertexAttributeStream {
    pub buffer: Arc<dyn Buffer>,
    pub format: BufferFormat,
    /// Distance in bytes between two consecutive elements
    pub stride: u32,
    /// Byte offset of the first element in `buffer`
    pub offset: u64,
    /// Number of elements
    pub count: u32,
}

impl VertexAttributeStream {
    /// Tightly packed stream starting at the beginning of `buffer`
    pub fn packed(buffer: Arc<dyn Buffer>, format: BufferFormat, count: u32) -> Self {
        Self {
            buffer,
            format,
            stride: format.size_bytes(),
            offset: 0,
            count,
        }
    }
}

/// Index data stored in a GPU buffer
#[derive(Clone)]
pub struct IndexStream {
    pub buffer: Arc<dyn Buffer>,
    pub offset: u64,
    pub count: u32,
    pub index_type: IndexType,
}

// ===== PRIMITIVE =====

/// Smallest drawable unit: geometry plus one material
#[derive(Clone)]
pub struct Primitive {
    attributes: BTreeMap<String, VertexAttributeStream>,
    indices: Option<IndexStream>,
    topology: PrimitiveTopology,
    material: MaterialKey,
}

impl Primitive {
    /// Empty triangle-list primitive drawn with `material`
    pub fn new(material: MaterialKey) -> Self {
        Self {
            attributes: BTreeMap::new(),
            indices: None,
            topology: PrimitiveTopology::TriangleList,
            material,
        }
    }

    /// Add (or replace) the stream for attribute `name`
    pub fn with_attribute(mut self, name: &str, stream: VertexAttributeStream) -> Self {
        self.attributes.insert(name.to_string(), stream);
        self
    }

    pub fn with_indices(mut self, indices: IndexStream) -> Self {
        self.indices = Some(indices);
        self
    }

    pub fn with_topology(mut self, topology: PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Attribute streams, ordered by name
    pub fn attributes(&self) -> &BTreeMap<String, VertexAttributeStream> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&VertexAttributeStream> {
        self.attributes.get(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn indices(&self) -> Option<&IndexStream> {
        self.indices.as_ref()
    }

    pub fn topology(&self) -> PrimitiveTopology {
        self.topology
    }

    pub fn material(&self) -> MaterialKey {
        self.material
    }
}

// ===== MESH =====

/// Named, ordered list of primitives
#[derive(Clone)]
pub struct Mesh {
    name: String,
    primitives: Vec<Primitive>,
}

impl Mesh {
    pub fn new(name: &str, primitives: Vec<Primitive>) -> Self {
        Self { name: name.to_string(), primitives }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }
}
