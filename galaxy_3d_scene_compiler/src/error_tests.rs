//! Unit tests for error.rs
//!
//! Covers Display output of every variant and the engine_err!/engine_bail! macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("descriptor pool exhausted".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("descriptor pool exhausted"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_missing_vertex_attribute_display() {
    let err = Error::MissingVertexAttribute {
        primitive: "helmet[0]".to_string(),
        attribute: "position".to_string(),
    };
    let display = format!("{}", err);
    assert!(display.contains("helmet[0]"));
    assert!(display.contains("position"));
}

#[test]
fn test_bindless_table_full_display() {
    let err = Error::BindlessTableFull { capacity: 1024 };
    assert!(format!("{}", err).contains("1024"));
}

#[test]
fn test_shader_resource_conflict_display() {
    let err = Error::ShaderResourceConflict("'material' set 1 vs set 2".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Shader resource conflict"));
    assert!(display.contains("'material'"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_clone() {
    let err1 = Error::InvalidResource("node".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// MACROS
// ============================================================================

fn bail_when(fail: bool) -> Result<u32> {
    if fail {
        crate::engine_bail!("galaxy3d::Test", "failed with code {}", 7);
    }
    Ok(1)
}

#[test]
fn test_engine_err_builds_backend_error() {
    let err = crate::engine_err!("galaxy3d::Test", "value {} out of range", 42);
    match err {
        Error::BackendError(msg) => assert_eq!(msg, "value 42 out of range"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_engine_bail_returns_early() {
    assert_eq!(bail_when(false).unwrap(), 1);
    let err = bail_when(true).unwrap_err();
    assert!(format!("{}", err).contains("failed with code 7"));
}
