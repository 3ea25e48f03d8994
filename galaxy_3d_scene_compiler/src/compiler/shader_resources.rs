/// Shader resource aggregation.
///
/// Fetches the vertex and fragment variants of one permutation and merges
/// their reflection tables into a single per-pipeline view:
/// - resources keyed by name, stage masks OR-ed across stages
/// - per-set binding lists for every set except 0 (owned by the bindless table)
/// - push constant ranges
/// - vertex inputs ordered by location

use std::collections::BTreeMap;
use std::sync::Arc;
use crate::error::{Error, Result};
use crate::graphics_device::{PushConstantRange, ShaderStage};
use crate::scene::POSITION_ATTRIBUTE;
use crate::shader::{
    PermutationKey, ShaderCache, ShaderInput, ShaderResource, ShaderResourceKind, ShaderVariant,
};

/// Descriptor set reserved for the bindless texture table
pub const BINDLESS_SET: u32 = 0;

/// Reflection of both stages of one permutation, merged
#[derive(Debug, Clone)]
pub struct MergedShaderResources {
    pub vertex: Arc<ShaderVariant>,
    pub fragment: Arc<ShaderVariant>,
    /// Every resource by name, stage masks merged
    pub resources: BTreeMap<String, ShaderResource>,
    /// Uniform-buffer and sampler bindings per set (set 0 excluded), sorted by binding
    pub sets: BTreeMap<u32, Vec<ShaderResource>>,
    pub push_constant_ranges: Vec<PushConstantRange>,
    /// Vertex stage inputs sorted by location
    pub vertex_inputs: Vec<ShaderInput>,
}

fn conflict(message: String) -> Error {
    crate::engine_error!("galaxy3d::ShaderResourceAggregator", "{}", message);
    Error::ShaderResourceConflict(message)
}

impl MergedShaderResources {
    /// Request both stages of `features` and merge their reflection
    ///
    /// Fails with `MissingVertexAttribute` before touching the shader source
    /// when the permutation lacks a position stream.
    pub fn aggregate(
        cache: &mut ShaderCache,
        shader_id: &str,
        features: &PermutationKey,
        primitive_label: &str,
    ) -> Result<Self> {
        if !features.has_feature(POSITION_ATTRIBUTE) {
            return Err(Error::MissingVertexAttribute {
                primitive: primitive_label.to_string(),
                attribute: POSITION_ATTRIBUTE.to_string(),
            });
        }

        let vertex = cache.request(shader_id, features, ShaderStage::Vertex)?;
        let fragment = cache.request(shader_id, features, ShaderStage::Fragment)?;
        Self::merge(vertex, fragment)
    }

    /// Merge the reflection of two already-compiled stages
    pub fn merge(vertex: Arc<ShaderVariant>, fragment: Arc<ShaderVariant>) -> Result<Self> {
        let mut resources: BTreeMap<String, ShaderResource> = BTreeMap::new();

        for resource in vertex.reflection.resources.iter()
            .chain(fragment.reflection.resources.iter())
        {
            match resources.get_mut(&resource.name) {
                Some(existing) => {
                    let same_slot = existing.kind == resource.kind
                        && existing.set == resource.set
                        && existing.binding == resource.binding;
                    if !same_slot {
                        return Err(conflict(format!(
                            "Resource '{}' declared as {:?} (set={}, binding={}) and {:?} (set={}, binding={})",
                            resource.name, existing.kind, existing.set, existing.binding,
                            resource.kind, resource.set, resource.binding)));
                    }
                    if existing.kind != ShaderResourceKind::PushConstant
                        && existing.array_size != resource.array_size
                    {
                        return Err(conflict(format!(
                            "Resource '{}' declared with array sizes {} and {}",
                            resource.name, existing.array_size, resource.array_size)));
                    }
                    existing.stages |= resource.stages;
                    existing.size = existing.size.max(resource.size);
                }
                None => {
                    resources.insert(resource.name.clone(), resource.clone());
                }
            }
        }

        // Partition by set, merging distinct names that share a slot
        let mut sets: BTreeMap<u32, BTreeMap<u32, ShaderResource>> = BTreeMap::new();
        let mut push_constant_ranges = Vec::new();
        for resource in resources.values() {
            if resource.kind == ShaderResourceKind::PushConstant {
                push_constant_ranges.push(PushConstantRange {
                    stages: resource.stages,
                    offset: resource.offset,
                    size: resource.size,
                });
                continue;
            }
            if resource.set == BINDLESS_SET {
                continue;
            }
            let bindings = sets.entry(resource.set).or_default();
            match bindings.get_mut(&resource.binding) {
                Some(existing) if existing.kind != resource.kind => {
                    return Err(conflict(format!(
                        "Binding (set={}, binding={}) used as {:?} by '{}' and {:?} by '{}'",
                        resource.set, resource.binding,
                        existing.kind, existing.name, resource.kind, resource.name)));
                }
                Some(existing) => existing.stages |= resource.stages,
                None => {
                    bindings.insert(resource.binding, resource.clone());
                }
            }
        }
        push_constant_ranges.sort_by_key(|range| range.offset);

        let mut vertex_inputs = vertex.reflection.inputs.clone();
        vertex_inputs.sort_by_key(|input| input.location);

        Ok(Self {
            vertex,
            fragment,
            resources,
            sets: sets.into_iter()
                .map(|(set, bindings)| (set, bindings.into_values().collect()))
                .collect(),
            push_constant_ranges,
            vertex_inputs,
        })
    }

    /// Highest set index used by per-material resources
    pub fn max_set(&self) -> Option<u32> {
        self.sets.keys().next_back().copied()
    }
}

#[cfg(test)]
#[path = "shader_resources_tests.rs"]
mod tests;
