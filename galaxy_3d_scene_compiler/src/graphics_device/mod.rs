/// Graphics device module - the GPU abstraction consumed by the scene compiler
///
/// Backends (Vulkan, ...) implement these traits; the compiler only composes
/// descriptions and hands them to the device.

// Module declarations
pub mod graphics_device;
pub mod buffer;
pub mod texture;
pub mod shader_stage;
pub mod descriptor;
pub mod pipeline;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use buffer::*;
pub use texture::*;
pub use shader_stage::*;
pub use descriptor::*;
pub use pipeline::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
