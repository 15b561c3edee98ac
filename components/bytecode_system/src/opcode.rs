//! VM opcodes
//!
//! Only the instructions the code generator emits today are listed. The
//! mnemonics are the ones the assembler expects.

use serde::Serialize;
use std::fmt;

/// Instruction opcodes for the stack VM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Opcode {
    /// Load the value at an address into a register
    Load,
    /// Add a numeral to a register in place
    Sum,
    /// Unconditional jump to an address or label
    Jump,
}

impl Opcode {
    /// Assembler mnemonic
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Load => "load",
            Opcode::Sum => "sum",
            Opcode::Jump => "jump",
        }
    }

    /// Number of operands the assembler requires
    pub fn operand_count(&self) -> usize {
        match self {
            Opcode::Load | Opcode::Sum => 2,
            Opcode::Jump => 1,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_operand_count() {
        assert_eq!(Opcode::Load.operand_count(), 2);
        assert_eq!(Opcode::Sum.operand_count(), 2);
        assert_eq!(Opcode::Jump.operand_count(), 1);
    }

    #[test]
    fn test_opcode_display() {
        assert_eq!(Opcode::Jump.to_string(), "jump");
    }
}
