//! Integration tests for the `#[derive(Params)]` macro.
//!
//! These tests use the derived implementations from outside the crate, the
//! way a downstream family definition would.

use glimmer::{ParamValue, Params, Registry};

// ============================================================================
// Plain fields
// ============================================================================

#[derive(Params, Clone)]
struct Plain {
    amplitude: f32,
    rows: usize,
    frames: u32,
    enabled: bool,
}

#[test]
fn test_plain_fields_in_declaration_order() {
    let p = Plain { amplitude: 2.5, rows: 4, frames: 10, enabled: true };
    let names: Vec<&str> = p.entries().iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["amplitude", "rows", "frames", "enabled"]);
}

#[test]
fn test_plain_values_convert() {
    let p = Plain { amplitude: 2.5, rows: 4, frames: 10, enabled: false };
    let entries = p.entries();
    assert_eq!(entries[0].1, ParamValue::Number(2.5));
    assert_eq!(entries[1].1, ParamValue::Number(4.0));
    assert_eq!(entries[2].1, ParamValue::Number(10.0));
    assert_eq!(entries[3].1, ParamValue::Flag(false));
}

// ============================================================================
// Attributes
// ============================================================================

#[derive(Params, Clone)]
struct Inner {
    radius: f32,
}

#[derive(Params, Clone)]
struct Outer {
    count: usize,
    #[param(nested)]
    inner: Inner,
    #[param(skip)]
    #[allow(dead_code)]
    scratch: Vec<u8>,
    #[param(rename = "hue")]
    base_hue: f32,
    speeds: Vec<f32>,
    cap: Option<usize>,
}

#[test]
fn test_nested_skip_rename() {
    let o = Outer {
        count: 3,
        inner: Inner { radius: 8.0 },
        scratch: vec![1, 2, 3],
        base_hue: 120.0,
        speeds: vec![0.5, 1.0],
        cap: None,
    };
    let entries = o.entries();
    let names: Vec<&str> = entries.iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["count", "radius", "hue", "speeds", "cap"]);
    assert_eq!(entries[3].1, ParamValue::List(vec![0.5, 1.0]));
    assert_eq!(entries[4].1, ParamValue::Text("none".into()));
}

#[test]
fn test_option_some_unwraps() {
    let o = Outer {
        count: 0,
        inner: Inner { radius: 1.0 },
        scratch: Vec::new(),
        base_hue: 0.0,
        speeds: Vec::new(),
        cap: Some(30),
    };
    assert_eq!(o.entries()[4].1, ParamValue::Number(30.0));
}

#[derive(Params, Clone)]
struct Generic<T: Into<ParamValue> + Clone> {
    value: T,
}

#[test]
fn test_generic_struct() {
    let g = Generic { value: 7u32 };
    assert_eq!(g.entries(), vec![("value", ParamValue::Number(7.0))]);
}

// ============================================================================
// Built-in simulations
// ============================================================================

#[test]
fn test_every_builtin_lists_parameters() {
    let registry = Registry::builtin();
    for d in registry.iter() {
        let entries = d.kind.entries();
        assert!(!entries.is_empty(), "{} lists no parameters", d.name);
        assert!(entries.iter().any(|(n, _)| *n == "base_hue"), "{} has no base hue", d.name);
    }
}

#[test]
fn test_param_value_display() {
    assert_eq!(ParamValue::Number(1.5).to_string(), "1.5");
    assert_eq!(ParamValue::List(vec![1.0, 2.0]).to_string(), "[1, 2]");
    assert_eq!(ParamValue::Flag(true).to_string(), "true");
}
