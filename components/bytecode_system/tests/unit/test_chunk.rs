//! Tests for Emission flattening and BytecodeChunk

use bytecode_system::{Assembler, BytecodeChunk, Emission, Instruction, ListingAssembler};

fn call_sequence() -> Emission {
    Emission::from(vec![
        Emission::sequence([Instruction::load(0, "addr"), Instruction::sum("addr", 1)]),
        Emission::from(Instruction::jump(0)),
    ])
}

#[test]
fn test_chunk_creation() {
    let chunk = BytecodeChunk::new();
    assert_eq!(chunk.instruction_count(), 0);
    assert!(chunk.labels().is_empty());
}

#[test]
fn test_deeply_nested_flatten() {
    let mut tree = Emission::from(Instruction::jump(1));
    for _ in 0..64 {
        tree = Emission::Block(vec![Emission::Empty, tree]);
    }
    assert_eq!(tree.flatten(), vec![Instruction::jump(1)]);
}

#[test]
fn test_from_emission() {
    let chunk = BytecodeChunk::from_emission(Emission::Block(vec![
        Emission::from(Instruction::label("fn-0")),
        call_sequence(),
        call_sequence(),
    ]));
    assert_eq!(chunk.instruction_count(), 7);
    assert_eq!(chunk.labels(), vec!["fn-0"]);
}

#[test]
fn test_listing_round_text() {
    let chunk = BytecodeChunk::from_emission(call_sequence());
    assert_eq!(
        chunk.listing(),
        "    load %0 $addr\n    sum $addr 1\n    jump %0\n"
    );
}

#[test]
fn test_assemble_empty_chunk() {
    let bytes = ListingAssembler::new().assemble(&BytecodeChunk::new()).unwrap();
    assert!(bytes.is_empty());
}
