//! Instruction containers
//!
//! Converters return nested [`Emission`] trees so each construct can hand
//! back its children's output without copying; the tree is flattened once
//! into a [`BytecodeChunk`] before it reaches the assembler.

use crate::instruction::Instruction;
use serde::Serialize;

/// A possibly nested list of instructions produced by a converter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Emission {
    /// Nothing was emitted
    #[default]
    Empty,
    /// A single instruction
    Instruction(Instruction),
    /// Children in emission order
    Block(Vec<Emission>),
}

impl Emission {
    /// Emission with no instructions
    pub fn empty() -> Self {
        Emission::Empty
    }

    /// Wrap a sequence of instructions
    pub fn sequence(instructions: impl IntoIterator<Item = Instruction>) -> Self {
        Emission::Block(
            instructions
                .into_iter()
                .map(Emission::Instruction)
                .collect(),
        )
    }

    /// Count the instructions contained at any depth
    pub fn instruction_count(&self) -> usize {
        match self {
            Emission::Empty => 0,
            Emission::Instruction(_) => 1,
            Emission::Block(children) => children.iter().map(Emission::instruction_count).sum(),
        }
    }

    /// True when no instruction is contained at any depth
    pub fn is_empty(&self) -> bool {
        self.instruction_count() == 0
    }

    /// Flatten the tree in emission order
    pub fn flatten(self) -> Vec<Instruction> {
        let mut out = Vec::with_capacity(self.instruction_count());
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<Instruction>) {
        match self {
            Emission::Empty => {}
            Emission::Instruction(inst) => out.push(inst),
            Emission::Block(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

impl From<Instruction> for Emission {
    fn from(inst: Instruction) -> Self {
        Emission::Instruction(inst)
    }
}

impl From<Vec<Emission>> for Emission {
    fn from(children: Vec<Emission>) -> Self {
        Emission::Block(children)
    }
}

/// A flat instruction list ready for the assembler
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BytecodeChunk {
    /// Sequence of instructions
    pub instructions: Vec<Instruction>,
}

impl BytecodeChunk {
    /// Create a new empty chunk
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten an emission tree into a chunk
    pub fn from_emission(emission: Emission) -> Self {
        Self {
            instructions: emission.flatten(),
        }
    }

    /// Append one instruction
    pub fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Get the number of instructions
    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    /// Names of every label record, in order
    pub fn labels(&self) -> Vec<&str> {
        self.instructions
            .iter()
            .filter_map(|inst| match inst {
                Instruction::Label(name) => Some(name.as_str()),
                Instruction::Op { .. } => None,
            })
            .collect()
    }

    /// Human-readable assembly, one instruction per line
    pub fn listing(&self) -> String {
        let mut out = String::new();
        for inst in &self.instructions {
            if !inst.is_label() {
                out.push_str("    ");
            }
            out.push_str(&inst.to_string());
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_preserves_order() {
        let tree = Emission::Block(vec![
            Emission::Instruction(Instruction::label("fn-0")),
            Emission::Block(vec![
                Emission::Empty,
                Emission::sequence([Instruction::load(0, "addr"), Instruction::sum("addr", 1)]),
            ]),
            Emission::Instruction(Instruction::jump(0)),
        ]);
        assert_eq!(tree.instruction_count(), 4);
        let flat = tree.flatten();
        assert!(flat[0].is_label());
        assert_eq!(flat[3], Instruction::jump(0));
    }

    #[test]
    fn test_empty_emission() {
        assert!(Emission::empty().is_empty());
        assert!(Emission::Block(vec![Emission::Empty, Emission::Block(vec![])]).is_empty());
    }

    #[test]
    fn test_chunk_listing() {
        let mut chunk = BytecodeChunk::new();
        chunk.emit(Instruction::label("fn-0"));
        chunk.emit(Instruction::jump(16));
        assert_eq!(chunk.listing(), "::fn-0\n    jump %10\n");
        assert_eq!(chunk.labels(), vec!["fn-0"]);
    }
}
