//! Error types for the Galaxy3D scene compiler
//!
//! This module defines the error type shared by every compilation stage,
//! plus the `engine_err!` / `engine_bail!` helpers that log an error at
//! the point where it is raised.

use std::fmt;

/// Result type for scene compiler operations
pub type Result<T> = std::result::Result<T, Error>;

/// Scene compiler errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (device, shader source, lock poisoning)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (dangling key, malformed description)
    InvalidResource(String),

    /// Initialization failed (invalid configuration, missing collaborator)
    InitializationFailed(String),

    /// A primitive lacks a vertex attribute every draw element requires
    MissingVertexAttribute {
        /// Name of the mesh owning the primitive and its index in that mesh
        primitive: String,
        /// Name of the missing attribute stream
        attribute: String,
    },

    /// Every slot of the bindless texture array is in use
    BindlessTableFull {
        /// Capacity of the bindless array
        capacity: u32,
    },

    /// Two shader stages declare the same resource name with different shapes
    ShaderResourceConflict(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::MissingVertexAttribute { primitive, attribute } => write!(
                f,
                "Primitive '{}' is missing required vertex attribute '{}'",
                primitive, attribute
            ),
            Error::BindlessTableFull { capacity } => write!(
                f,
                "Bindless texture table is full ({} slots)",
                capacity
            ),
            Error::ShaderResourceConflict(msg) => write!(f, "Shader resource conflict: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an error message and build an `Error::BackendError` from it
///
/// # Example
///
/// ```ignore
/// let layout = layouts.get(index)
///     .ok_or_else(|| engine_err!("galaxy3d::LayoutCache", "Layout {} not found", index))?;
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::log::log_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!(),
        );
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an error message and return early with an `Error::BackendError`
///
/// # Example
///
/// ```ignore
/// if frames == 0 {
///     engine_bail!("galaxy3d::SceneCompiler", "At least one frame in flight is required");
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
