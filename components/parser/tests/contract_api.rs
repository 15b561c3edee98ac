//! Contract tests for parser API
//!
//! These tests verify the parser component implements its contract correctly.

use core_types::{CompileError, ErrorKind};
use parser::ast::{Construct, ValuePart};
use parser::lexer::tokens_to_source;
use parser::{
    lex, match_expression_list, parse, to_postfix, BytecodeGenerator, Context, ContextBuilder, Lexer, Operator,
    Parser, PostfixTerm, Token, TokenKind,
};
use bytecode_system::{ValueKind, ValuePointer};

fn postfix_order(src: &str) -> Vec<String> {
    let script = parse(src, "contract").unwrap();
    let expression = match script.statements[0].inner.as_ref() {
        Construct::Expression(e) => e.clone(),
        other => panic!("expected expression, got {:?}", other.kind()),
    };
    to_postfix(&expression)
        .unwrap()
        .into_iter()
        .map(|term| match term {
            PostfixTerm::Operand(value) => value.to_string(),
            PostfixTerm::Operator(op, _) => op.to_string(),
        })
        .collect()
}

// =============================================================================
// Lexer Contract Tests
// =============================================================================

#[test]
fn test_lexer_new_creates_lexer() {
    let lexer = Lexer::new("x + 1", "contract");
    assert!(!lexer.is_at_end());
}

#[test]
fn test_lexer_next_token_returns_result() {
    let mut lexer = Lexer::new("x + 1", "contract");
    let result: Result<Option<Token>, CompileError> = lexer.next_token();
    let token = result.unwrap().unwrap();
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(lexer.position, 1);
}

#[test]
fn test_lexer_next_token_none_at_end() {
    let mut lexer = Lexer::new("", "contract");
    assert!(lexer.next_token().unwrap().is_none());
}

#[test]
fn test_token_stream_opens_with_space() {
    let tokens = lex("x", "contract").unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Space);
    assert!(tokens[0].source.is_empty());
}

#[test]
fn test_every_newline_preceded_by_space() {
    let tokens = lex("a\nb # c\n\nd \n", "contract").unwrap();
    for (index, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::Newline {
            assert_eq!(tokens[index - 1].kind, TokenKind::Space);
        }
    }
}

#[test]
fn test_token_text_reconstructs_input() {
    let sources = [
        "import 'io'\nio.println_out('hi')",
        "add(a: raw, b: raw): raw => a + b\n\n# done\n",
        "\tx=>x**2 mod 3\r\n",
    ];
    for src in sources {
        assert_eq!(tokens_to_source(&lex(src, "contract").unwrap()), src);
    }
}

#[test]
fn test_unrecognised_token_offset() {
    let err = lex("~", "contract").unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
    assert_eq!(err.position.as_ref().unwrap().offset, 0);

    let err = lex("a + ~", "contract").unwrap_err();
    assert_eq!(err.position.unwrap().offset, 4);
}

#[test]
fn test_token_carries_origin() {
    let tokens = lex("x", "lib/io").unwrap();
    assert_eq!(tokens[1].origin.as_ref(), "lib/io");
    assert_eq!(tokens[1].position().length, 1);
}

// =============================================================================
// Parser Contract Tests
// =============================================================================

#[test]
fn test_parser_new_from_tokens() {
    let tokens = lex("x", "contract").unwrap();
    let parser = Parser::new(tokens);
    assert_eq!(parser.tokens().len(), 2);
}

#[test]
fn test_parser_parse_script_returns_result() {
    let parser = Parser::from_source("x + 1", "contract").unwrap();
    let result: Result<parser::ScriptRoot, CompileError> = parser.parse_script();
    assert_eq!(result.unwrap().statements.len(), 1);
}

#[test]
fn test_import_then_call_structure() {
    let script = parse("import 'io'\nio.println_out('hi')", "contract").unwrap();
    assert_eq!(script.statements.len(), 2);

    match script.statements[0].inner.as_ref() {
        Construct::Import(import) => {
            assert_eq!(import.specifiers.len(), 1);
            assert_eq!(import.specifiers[0].kind, TokenKind::String);
        }
        other => panic!("expected import, got {:?}", other.kind()),
    }

    let expression = match script.statements[1].inner.as_ref() {
        Construct::Expression(e) => e,
        other => panic!("expected expression, got {:?}", other.kind()),
    };
    let value = expression.as_single().expect("single operand");
    match value.parts.as_slice() {
        [ValuePart::Construct(call)] => match call.as_ref() {
            Construct::Call(call) => {
                assert_eq!(call.callee.path_name().as_deref(), Some("io.println_out"));
                assert_eq!(call.arguments.len(), 1);
            }
            other => panic!("expected call, got {:?}", other.kind()),
        },
        _ => panic!("expected a single nested construct"),
    }
}

#[test]
fn test_reconstruct_reparse_shape() {
    for src in ["import 'io'", "a(1, 2)", "x => x + 1"] {
        let first = parse(src, "first").unwrap();
        let rendered = first.to_string();
        let second = parse(&rendered, "second").unwrap();
        assert_eq!(first.shape(), second.shape(), "shape changed for `{}`", src);
    }
}

#[test]
fn test_match_expression_list_segments() {
    let tokens = lex("f(a, g(b, c), [d, e])", "contract").unwrap();
    let open = tokens
        .iter()
        .position(|t| t.source == "(")
        .unwrap();
    let interior = &tokens[open + 1..tokens.len() - 1];
    let segments = match_expression_list(interior, &tokens).unwrap();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[1].len(), 6);
}

#[test]
fn test_match_expression_list_negative_depth() {
    let tokens = lex("a), b", "contract").unwrap();
    let err = match_expression_list(&tokens, &tokens).unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}

#[test]
fn test_syntax_error_names_construct() {
    let err = parse("f(1", "contract").unwrap_err();
    assert_eq!(err.kind, ErrorKind::SyntaxError);
    assert!(err.construct.is_some());
}

// =============================================================================
// Precedence Contract Tests
// =============================================================================

#[test]
fn test_postfix_binary() {
    assert_eq!(postfix_order("A * B"), ["A", "B", "*"]);
}

#[test]
fn test_postfix_left_associative() {
    assert_eq!(postfix_order("a + b - c"), ["a", "b", "+", "c", "-"]);
}

#[test]
fn test_postfix_right_associative() {
    assert_eq!(postfix_order("a ^ b ^ c"), ["a", "b", "c", "^", "^"]);
}

#[test]
fn test_operator_identification() {
    assert_eq!(Operator::identify("**"), Some(Operator::Exponent));
    assert_eq!(Operator::identify("not"), Some(Operator::Not));
    assert_eq!(Operator::identify("=>"), None);
}

// =============================================================================
// Context Contract Tests
// =============================================================================

#[test]
fn test_context_three_level_shadowing() {
    let token = |name: &str| lex(name, "contract").unwrap().remove(1);

    let root = ContextBuilder::new()
        .symbol("x", ValuePointer::new(1, ValueKind::Raw))
        .build();
    let middle = ContextBuilder::new()
        .symbol("x", ValuePointer::new(2, ValueKind::Raw))
        .build_child(&root);
    let leaf = ContextBuilder::new()
        .symbol("x", ValuePointer::new(3, ValueKind::Raw))
        .build_child(&middle);

    assert_eq!(leaf.resolve_symbol(&token("x")).unwrap().address, 3);
    assert_eq!(middle.resolve_symbol(&token("x")).unwrap().address, 2);
    assert_eq!(root.resolve_symbol(&token("x")).unwrap().address, 1);

    let err = leaf.resolve_symbol(&token("y")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::ReferenceError);
}

#[test]
fn test_root_context_types() {
    let root = Context::root();
    for kind in ValueKind::all() {
        assert_eq!(root.lookup_type(kind.type_name()), Some(kind));
    }
}

// =============================================================================
// BytecodeGenerator Contract Tests
// =============================================================================

#[test]
fn test_bytecode_generator_new() {
    let _gen = BytecodeGenerator::new();
}

#[test]
fn test_bytecode_generator_generate_returns_result() {
    let script = parse("f(x) => x\nf(2)", "contract").unwrap();
    let mut gen = BytecodeGenerator::new();
    let chunk = gen.generate(&script).unwrap();
    assert_eq!(chunk.instruction_count(), 4);
    assert_eq!(chunk.labels(), vec!["fn-0"]);
}
