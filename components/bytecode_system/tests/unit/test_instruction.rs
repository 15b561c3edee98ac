//! Tests for Instruction and Operand

use bytecode_system::{Instruction, Opcode, Operand};

#[test]
fn test_instruction_sum_operands() {
    match Instruction::sum("addr", 1) {
        Instruction::Op { opcode, operands } => {
            assert_eq!(opcode, Opcode::Sum);
            assert_eq!(operands[0], Operand::Register("addr".to_string()));
            assert_eq!(operands[1], Operand::Numeral(1));
        }
        Instruction::Label(_) => panic!("Expected an opcode record"),
    }
}

#[test]
fn test_instruction_jump_single_operand() {
    match Instruction::jump(0) {
        Instruction::Op { operands, .. } => assert_eq!(operands.len(), 1),
        Instruction::Label(_) => panic!("Expected an opcode record"),
    }
}

#[test]
fn test_instruction_display() {
    assert_eq!(Instruction::sum("addr", 1).to_string(), "sum $addr 1");
    assert_eq!(Instruction::jump(0xab).to_string(), "jump %ab");
}

#[test]
fn test_operand_display() {
    assert_eq!(Operand::Register("r0".into()).to_string(), "$r0");
    assert_eq!(Operand::Numeral(-3).to_string(), "-3");
    assert_eq!(Operand::Label("fn-2".into()).to_string(), "::fn-2");
}

#[test]
fn test_instruction_serializes() {
    let json = serde_json::to_string(&Instruction::label("fn-0")).unwrap();
    assert_eq!(json, r#"{"Label":"fn-0"}"#);
}

#[test]
fn test_instruction_clone_eq() {
    let inst = Instruction::load(4, "addr");
    assert_eq!(inst.clone(), inst);
}
