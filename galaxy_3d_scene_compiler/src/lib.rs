/*!
# Galaxy 3D Scene Compiler

Compiles a scene graph into GPU-ready draw elements.

The crate walks a node hierarchy, selects a shader permutation for every
primitive, and builds (or reuses) the descriptor set layouts, pipeline
layouts and pipelines it needs through a `GraphicsDevice` trait object.
Textures are bound into a single bindless array; each draw element carries
its texture indices and one set of bindings per frame in flight.

## Architecture

- **GraphicsDevice**: GPU factory trait implemented by backends
- **ShaderSource**: external shader compiler/reflector
- **SceneGraph**: arena of nodes, meshes, materials and asset handles
- **SceneCompiler**: owns the caches and produces a `CompiledScene`
*/

// Internal modules
mod error;
pub mod log;
pub mod config;
pub mod graphics_device;
pub mod shader;
pub mod scene;
pub mod compiler;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Entry points
    pub use crate::compiler::{SceneCompiler, CompiledScene, DrawElement};
    pub use crate::config::CompilerConfig;
    pub use crate::graphics_device::GraphicsDevice;
    pub use crate::shader::ShaderSource;
    pub use crate::scene::SceneGraph;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger, set_logger, reset_logger};
    }

    // GPU abstraction sub-module
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Shader sub-module
    pub mod shader {
        pub use crate::shader::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Compiler sub-module
    pub mod compiler {
        pub use crate::compiler::*;
        pub use crate::config::{CompilerConfig, MAX_DRAW_TEXTURES};
    }
}

// Re-export math library at crate root
pub use glam;
