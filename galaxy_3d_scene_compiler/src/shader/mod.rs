//! Shader module
//!
//! Reflection data produced by the external shader compiler, the permutation
//! key used to select a variant, and the cache that fetches variants from
//! a `ShaderSource`.

mod reflection;
mod permutation;
mod shader_cache;

pub use reflection::{ShaderInput, ShaderReflection, ShaderResource, ShaderResourceKind};
pub use permutation::PermutationKey;
pub use shader_cache::{ShaderCache, ShaderSource, ShaderVariant};

#[cfg(test)]
pub(crate) mod mock_shader_source;
