//! Value kinds, pointers and materialized primitives
//!
//! The VM has no typed memory: every value is a binary sequence, and the
//! [`ValueKind`] records how the compiler intends it to be read.

use serde::Serialize;
use std::fmt;

/// How a binary sequence is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueKind {
    /// Raw binary sequence (integers, booleans, other binary data)
    Raw,
    /// IEEE floating-point number
    Float,
    /// Sequence of unicode characters
    String,
    /// Pointer to a function
    Function,
    /// Pointer to a list
    List,
    /// Pointer to a dictionary
    Dictionary,
    /// Pointer to a pointer
    Pointer,
}

impl ValueKind {
    /// Name the kind is bound to in the root type scope
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::Raw => "raw",
            ValueKind::Float => "float",
            ValueKind::String => "str",
            ValueKind::Function => "fn",
            ValueKind::List => "list",
            ValueKind::Dictionary => "dict",
            ValueKind::Pointer => "ptr",
        }
    }

    /// Every kind, in declaration order
    pub fn all() -> [ValueKind; 7] {
        [
            ValueKind::Raw,
            ValueKind::Float,
            ValueKind::String,
            ValueKind::Function,
            ValueKind::List,
            ValueKind::Dictionary,
            ValueKind::Pointer,
        ]
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A resolved storage location
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuePointer {
    /// Address of the first byte
    pub address: u32,
    /// Length in bytes, when known
    pub length: Option<u32>,
    /// How the bytes are interpreted
    pub kind: ValueKind,
}

impl ValuePointer {
    /// Pointer with unknown length
    pub fn new(address: u32, kind: ValueKind) -> Self {
        Self {
            address,
            length: None,
            kind,
        }
    }

    /// Pointer with a known length
    pub fn with_length(address: u32, length: u32, kind: ValueKind) -> Self {
        Self {
            address,
            length: Some(length),
            kind,
        }
    }
}

/// A literal value lowered to bytes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Primitive {
    /// How the bytes are interpreted
    pub kind: ValueKind,
    /// The encoded value
    pub bytes: Vec<u8>,
}

impl Primitive {
    /// One-byte raw value
    pub fn raw_byte(byte: u8) -> Self {
        Self {
            kind: ValueKind::Raw,
            bytes: vec![byte],
        }
    }

    /// UTF-8 string value
    pub fn string(text: &str) -> Self {
        Self {
            kind: ValueKind::String,
            bytes: text.as_bytes().to_vec(),
        }
    }

    /// Pointer value holding a one-byte address.
    ///
    /// Addresses wider than a byte are stored little-endian with trailing
    /// zero bytes trimmed.
    pub fn pointer(address: u32) -> Self {
        let mut bytes = address.to_le_bytes().to_vec();
        while bytes.len() > 1 && bytes.last() == Some(&0) {
            bytes.pop();
        }
        Self {
            kind: ValueKind::Pointer,
            bytes,
        }
    }
}
