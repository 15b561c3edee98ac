//! Assembler seam
//!
//! Turning an instruction list into a VM binary belongs to the assembler,
//! which lives outside this workspace. [`ListingAssembler`] is the stand-in
//! used by the CLI and tests: it checks the list and renders it as text.

use crate::chunk::BytecodeChunk;
use crate::instruction::Instruction;
use core_types::{CompileError, CompileResult, ErrorKind};
use std::collections::HashSet;

/// Instruction list → binary
pub trait Assembler {
    /// Assemble a flattened instruction list
    fn assemble(&self, chunk: &BytecodeChunk) -> CompileResult<Vec<u8>>;
}

/// Renders the instruction list as UTF-8 assembly text
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingAssembler;

impl ListingAssembler {
    /// Create a listing assembler
    pub fn new() -> Self {
        Self
    }

    fn check(chunk: &BytecodeChunk) -> CompileResult<()> {
        let mut seen = HashSet::new();
        for inst in &chunk.instructions {
            match inst {
                Instruction::Op { opcode, operands } => {
                    if operands.len() != opcode.operand_count() {
                        return Err(CompileError::new(
                            ErrorKind::AssemblyError,
                            format!(
                                "`{}` takes {} operand(s), got {}",
                                opcode,
                                opcode.operand_count(),
                                operands.len()
                            ),
                        ));
                    }
                }
                Instruction::Label(name) => {
                    if !seen.insert(name.as_str()) {
                        return Err(CompileError::new(
                            ErrorKind::AssemblyError,
                            format!("Label `::{}` is defined more than once", name),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

impl Assembler for ListingAssembler {
    fn assemble(&self, chunk: &BytecodeChunk) -> CompileResult<Vec<u8>> {
        Self::check(chunk)?;
        Ok(chunk.listing().into_bytes())
    }
}
