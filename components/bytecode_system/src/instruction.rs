//! Instruction records
//!
//! An instruction is either an opcode with at most two typed operands, or a
//! label-only record that introduces a jump target.

use crate::opcode::Opcode;
use arrayvec::ArrayVec;
use serde::Serialize;
use std::fmt;

/// A typed instruction operand
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Operand {
    /// Named register (`$addr`)
    Register(String),
    /// Immediate number
    Numeral(i64),
    /// Memory address (`%ff`)
    Address(u32),
    /// Symbolic jump target (`::fn-0`)
    Label(String),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(name) => write!(f, "${}", name),
            Operand::Numeral(n) => write!(f, "{}", n),
            Operand::Address(addr) => write!(f, "%{:x}", addr),
            Operand::Label(name) => write!(f, "::{}", name),
        }
    }
}

/// A single instruction record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Instruction {
    /// Opcode with its operand list
    Op {
        /// The opcode
        opcode: Opcode,
        /// Operands, in assembler order
        operands: ArrayVec<Operand, 2>,
    },
    /// Label-only record marking a jump target
    Label(String),
}

impl Instruction {
    /// `load <address> <register>`
    pub fn load(address: u32, register: impl Into<String>) -> Self {
        Self::with_operands(
            Opcode::Load,
            [Operand::Address(address), Operand::Register(register.into())],
        )
    }

    /// `sum <register> <numeral>`
    pub fn sum(register: impl Into<String>, amount: i64) -> Self {
        Self::with_operands(
            Opcode::Sum,
            [Operand::Register(register.into()), Operand::Numeral(amount)],
        )
    }

    /// `jump <address>`
    pub fn jump(address: u32) -> Self {
        let mut operands = ArrayVec::new();
        operands.push(Operand::Address(address));
        Instruction::Op {
            opcode: Opcode::Jump,
            operands,
        }
    }

    /// Label record introducing a jump target
    pub fn label(name: impl Into<String>) -> Self {
        Instruction::Label(name.into())
    }

    fn with_operands(opcode: Opcode, operands: [Operand; 2]) -> Self {
        Instruction::Op {
            opcode,
            operands: ArrayVec::from(operands),
        }
    }

    /// The opcode, or `None` for a label record
    pub fn opcode(&self) -> Option<Opcode> {
        match self {
            Instruction::Op { opcode, .. } => Some(*opcode),
            Instruction::Label(_) => None,
        }
    }

    /// Check if this is a label-only record
    pub fn is_label(&self) -> bool {
        matches!(self, Instruction::Label(_))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Op { opcode, operands } => {
                write!(f, "{}", opcode)?;
                for operand in operands {
                    write!(f, " {}", operand)?;
                }
                Ok(())
            }
            Instruction::Label(name) => write!(f, "::{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instruction_load() {
        let inst = Instruction::load(0, "addr");
        assert_eq!(inst.opcode(), Some(Opcode::Load));
        assert_eq!(inst.to_string(), "load %0 $addr");
    }

    #[test]
    fn test_instruction_label() {
        let inst = Instruction::label("fn-0");
        assert!(inst.is_label());
        assert_eq!(inst.opcode(), None);
        assert_eq!(inst.to_string(), "::fn-0");
    }

    #[test]
    fn test_operand_address_is_hex() {
        assert_eq!(Operand::Address(255).to_string(), "%ff");
    }
}
