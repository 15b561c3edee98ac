//! Unit test runner for the instruction model

mod test_chunk;
mod test_instruction;
mod test_value;
