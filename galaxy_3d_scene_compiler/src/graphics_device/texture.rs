/// Texture and sampler handles
///
/// Textures and samplers are created by the asset layer; the compiler only
/// binds them into the bindless array.

/// Sampled image resource
pub trait Texture: Send + Sync {}

/// Sampler state object
pub trait Sampler: Send + Sync {}
