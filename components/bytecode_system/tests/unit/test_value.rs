//! Tests for value kinds, pointers and primitives

use bytecode_system::{Primitive, ValueKind, ValuePointer};

#[test]
fn test_value_kind_type_names() {
    assert_eq!(ValueKind::Raw.type_name(), "raw");
    assert_eq!(ValueKind::String.type_name(), "str");
    assert_eq!(ValueKind::Function.to_string(), "fn");
}

#[test]
fn test_value_pointer_constructors() {
    let p = ValuePointer::new(0, ValueKind::Function);
    assert_eq!(p.length, None);
    let q = ValuePointer::with_length(0xff, 1, ValueKind::Raw);
    assert_eq!(q.length, Some(1));
    assert_eq!(q.address, 0xff);
}

#[test]
fn test_primitive_raw_byte() {
    let p = Primitive::raw_byte(7);
    assert_eq!(p.kind, ValueKind::Raw);
    assert_eq!(p.bytes, vec![7]);
}

#[test]
fn test_primitive_pointer_kind() {
    assert_eq!(Primitive::pointer(3).kind, ValueKind::Pointer);
}
