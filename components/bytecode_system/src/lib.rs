//! Instruction model for the stack VM
//!
//! This crate provides the instruction records the code generator emits and
//! the seam through which they reach an assembler.
//!
//! # Features
//!
//! - Typed operands (register, numeral, address, label)
//! - Nested emission trees flattened once into a chunk
//! - Value kinds, pointers and materialized primitives
//! - [`Assembler`] trait with a text [`ListingAssembler`]
//!
//! # Example
//!
//! ```
//! use bytecode_system::{Assembler, BytecodeChunk, Emission, Instruction, ListingAssembler};
//!
//! let tree = Emission::Block(vec![
//!     Emission::from(Instruction::label("fn-0")),
//!     Emission::sequence([Instruction::load(0, "addr"), Instruction::sum("addr", 1)]),
//! ]);
//!
//! let chunk = BytecodeChunk::from_emission(tree);
//! assert_eq!(chunk.instruction_count(), 3);
//!
//! let bytes = ListingAssembler::new().assemble(&chunk).unwrap();
//! assert!(String::from_utf8(bytes).unwrap().starts_with("::fn-0"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod assembler;
pub mod chunk;
pub mod instruction;
pub mod opcode;
pub mod value;

// Re-export main types at crate root
pub use assembler::{Assembler, ListingAssembler};
pub use chunk::{BytecodeChunk, Emission};
pub use instruction::{Instruction, Operand};
pub use opcode::Opcode;
pub use value::{Primitive, ValueKind, ValuePointer};
