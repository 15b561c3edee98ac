//! Expression precedence resolution
//!
//! Converts an expression's infix operand/operator sequence into postfix
//! order with the shunting-yard algorithm.

use crate::ast::{Expression, InfixTerm, Value};
use crate::error::syntax_error;
use crate::lexer::Token;
use crate::operators::{Associativity, Operator};
use core_types::CompileResult;

/// One element of a postfix sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PostfixTerm<'a> {
    /// Operand value
    Operand(&'a Value),
    /// Operator with the token it was read from
    Operator(Operator, &'a Token),
}

/// True when `top` must leave the hold stack before `incoming` is pushed
fn yields_to(top: Operator, incoming: Operator) -> bool {
    match top.associativity() {
        Associativity::Left => top.precedence() >= incoming.precedence(),
        Associativity::Right => top.precedence() > incoming.precedence(),
    }
}

/// Reorder `expression` into postfix order.
///
/// # Examples
///
/// ```
/// use parser::{parse, to_postfix, PostfixTerm};
/// use parser::ast::Construct;
///
/// let script = parse("a + b * c", "doc").unwrap();
/// let expression = match script.statements[0].inner.as_ref() {
///     Construct::Expression(e) => e,
///     _ => unreachable!(),
/// };
/// let order: Vec<String> = to_postfix(expression)
///     .unwrap()
///     .iter()
///     .map(|term| match term {
///         PostfixTerm::Operand(v) => v.path_name().unwrap_or_default(),
///         PostfixTerm::Operator(op, _) => op.to_string(),
///     })
///     .collect();
/// assert_eq!(order, ["a", "b", "c", "*", "+"]);
/// ```
pub fn to_postfix(expression: &Expression) -> CompileResult<Vec<PostfixTerm<'_>>> {
    let terms = expression.infix_terms();
    let mut output = Vec::with_capacity(terms.len());
    let mut held: Vec<(Operator, &Token)> = Vec::new();

    for term in terms {
        match term {
            InfixTerm::Operand(value) => output.push(PostfixTerm::Operand(value)),
            InfixTerm::Operator(token) => {
                let incoming = Operator::identify(&token.source).ok_or_else(|| {
                    syntax_error(
                        format!("Unknown operator `{}`", token.source),
                        Some(token.position()),
                    )
                })?;
                // A prefix operator has no left operand to close off
                if !incoming.is_prefix() {
                    while let Some(&(top, top_token)) = held.last() {
                        if !yields_to(top, incoming) {
                            break;
                        }
                        held.pop();
                        output.push(PostfixTerm::Operator(top, top_token));
                    }
                }
                held.push((incoming, token));
            }
        }
    }

    while let Some((op, token)) = held.pop() {
        output.push(PostfixTerm::Operator(op, token));
    }
    Ok(output)
}
