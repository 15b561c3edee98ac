//! Script compiler front end
//!
//! Provides the lexer, grammar combinators, construct builders, precedence
//! resolution, scope resolution and code generation for the scripting
//! language.
//!
//! # Overview
//!
//! - [`Lexer`] - Maximal-munch tokenizer
//! - [`Token`] - Tokens with source text, offset and origin
//! - [`Parser`] - Builds a [`ScriptRoot`] or [`Module`] from tokens
//! - [`Construct`] - Sum type over every construct
//! - [`to_postfix`] - Shunting-yard precedence resolution
//! - [`Context`] - Scope chain for symbol and type lookup
//! - [`BytecodeGenerator`] - Lowers constructs to instructions
//! - [`Compiler`] - Runs the whole pipeline
//!
//! # Example
//!
//! ```
//! use parser::{parse, BytecodeGenerator};
//!
//! let script = parse("id(x) => x\nid(1)", "main").unwrap();
//!
//! let mut gen = BytecodeGenerator::new();
//! let chunk = gen.generate(&script).unwrap();
//! assert_eq!(chunk.labels(), vec!["fn-0"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod bytecode_gen;
pub mod compiler;
pub mod context;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod operators;
pub mod parser;
pub mod precedence;
pub mod reconstruct;
pub mod resolver;

pub use ast::{Construct, ConstructKind, Expression, Module, ScriptRoot, Statement, Value};
pub use bytecode_gen::{materialize, BytecodeGenerator};
pub use compiler::{compile, Compilation, Compiler};
pub use context::{Context, ContextBuilder};
pub use grammar::{Optional, Presence, Repeat, RuleItem, Select, Selection};
pub use lexer::{lex, Keyword, Lexer, Punctuator, Token, TokenKind};
pub use operators::{Associativity, Operator, OperatorClass, OperatorDescriptor};
pub use parser::{build, match_expression_list, parse, Parser};
pub use precedence::{to_postfix, PostfixTerm};
pub use resolver::{EmptyModuleResolver, MapModuleResolver, ModuleResolver};
