//! Abstract Syntax Tree node definitions
//!
//! Constructs are built bottom-up by the builders in [`crate::parser`] and
//! never mutated afterwards. [`Construct`] is the sum over every node type;
//! each node owns its child tokens and constructs.

use crate::lexer::{Token, TokenKind};
use serde::Serialize;
use std::fmt;

/// Construct type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConstructKind {
    /// Whole script
    ScriptRoot,
    /// One line of a script or module
    Statement,
    /// `import 'a', 'b'`
    Import,
    /// `export a, b`
    Export,
    /// `module name` followed by statements
    Module,
    /// Arrow function
    Function,
    /// Function call
    Call,
    /// Bracket index on a value
    PropertyAccessor,
    /// List literal
    List,
    /// Dictionary literal
    Dictionary,
    /// Operator expression
    Expression,
    /// Literal, identifier, dot-path or nested construct
    Value,
}

impl fmt::Display for ConstructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Any construct
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Construct {
    /// Whole script
    ScriptRoot(ScriptRoot),
    /// Statement
    Statement(Statement),
    /// Import
    Import(Import),
    /// Export
    Export(Export),
    /// Module
    Module(Module),
    /// Function
    Function(Function),
    /// Call
    Call(Call),
    /// Property accessor
    PropertyAccessor(PropertyAccessor),
    /// List
    List(List),
    /// Dictionary
    Dictionary(Dictionary),
    /// Expression
    Expression(Expression),
    /// Value
    Value(Value),
}

impl Construct {
    /// Type tag of this construct
    pub fn kind(&self) -> ConstructKind {
        match self {
            Construct::ScriptRoot(_) => ConstructKind::ScriptRoot,
            Construct::Statement(_) => ConstructKind::Statement,
            Construct::Import(_) => ConstructKind::Import,
            Construct::Export(_) => ConstructKind::Export,
            Construct::Module(_) => ConstructKind::Module,
            Construct::Function(_) => ConstructKind::Function,
            Construct::Call(_) => ConstructKind::Call,
            Construct::PropertyAccessor(_) => ConstructKind::PropertyAccessor,
            Construct::List(_) => ConstructKind::List,
            Construct::Dictionary(_) => ConstructKind::Dictionary,
            Construct::Expression(_) => ConstructKind::Expression,
            Construct::Value(_) => ConstructKind::Value,
        }
    }

    /// Structural dump that ignores token offsets and origins.
    ///
    /// Two trees parsed from differently spaced sources have equal shapes.
    pub fn shape(&self) -> String {
        let mut out = String::new();
        self.write_shape(&mut out);
        out
    }

    fn write_shape(&self, out: &mut String) {
        match self {
            Construct::ScriptRoot(n) => n.write_shape(out),
            Construct::Statement(n) => n.write_shape(out),
            Construct::Import(n) => n.write_shape(out),
            Construct::Export(n) => n.write_shape(out),
            Construct::Module(n) => n.write_shape(out),
            Construct::Function(n) => n.write_shape(out),
            Construct::Call(n) => n.write_shape(out),
            Construct::PropertyAccessor(n) => n.write_shape(out),
            Construct::List(n) => n.write_shape(out),
            Construct::Dictionary(n) => n.write_shape(out),
            Construct::Expression(n) => n.write_shape(out),
            Construct::Value(n) => n.write_shape(out),
        }
    }
}

fn open(out: &mut String, kind: ConstructKind) {
    out.push('(');
    out.push_str(&kind.to_string());
}

fn write_token(out: &mut String, token: &Token) {
    out.push(' ');
    out.push_str(&token.source);
}

/// Whole script: one statement per line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScriptRoot {
    /// Statements in source order
    pub statements: Vec<Statement>,
}

impl ScriptRoot {
    /// Named functions declared at the top level
    pub fn named_functions(&self) -> impl Iterator<Item = &Token> {
        self.statements.iter().filter_map(|s| match s.inner.as_ref() {
            Construct::Function(f) => f.signature.name.as_ref(),
            _ => None,
        })
    }

    /// Structural dump, see [`Construct::shape`]
    pub fn shape(&self) -> String {
        let mut out = String::new();
        self.write_shape(&mut out);
        out
    }

    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::ScriptRoot);
        for statement in &self.statements {
            out.push(' ');
            statement.write_shape(out);
        }
        out.push(')');
    }
}

/// A single statement wrapping an import, export, function or expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    /// The wrapped construct
    pub inner: Box<Construct>,
}

impl Statement {
    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::Statement);
        out.push(' ');
        self.inner.write_shape(out);
        out.push(')');
    }
}

/// `import` with one or more string specifiers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Import {
    /// String tokens naming the imported scripts
    pub specifiers: Vec<Token>,
}

impl Import {
    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::Import);
        for specifier in &self.specifiers {
            write_token(out, specifier);
        }
        out.push(')');
    }
}

/// `export` with one or more expressions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Export {
    /// Exported expressions
    pub expressions: Vec<Expression>,
}

impl Export {
    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::Export);
        for expression in &self.expressions {
            out.push(' ');
            expression.write_shape(out);
        }
        out.push(')');
    }
}

/// Named module with its own statements
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Module {
    /// Module name
    pub name: Token,
    /// Statements after the header line
    pub statements: Vec<Statement>,
}

impl Module {
    /// Structural dump, see [`Construct::shape`]
    pub fn shape(&self) -> String {
        let mut out = String::new();
        self.write_shape(&mut out);
        out
    }

    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::Module);
        write_token(out, &self.name);
        for statement in &self.statements {
            out.push(' ');
            statement.write_shape(out);
        }
        out.push(')');
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    /// Parameter name
    pub name: Token,
    /// Declared type name, if typed
    pub type_ref: Option<Token>,
}

/// Function declarator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signature {
    /// Name of a named function
    pub name: Option<Token>,
    /// Parameters in order
    pub params: Vec<Parameter>,
    /// Declared return type
    pub return_type: Option<Token>,
}

impl Signature {
    /// True when parameters carry type annotations
    pub fn is_typed(&self) -> bool {
        self.params.iter().any(|p| p.type_ref.is_some())
    }
}

/// Arrow function: declarator `=>` expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    /// Declarator
    pub signature: Signature,
    /// Function body
    pub body: Box<Expression>,
}

impl Function {
    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::Function);
        if let Some(name) = &self.signature.name {
            write_token(out, name);
        }
        out.push_str(" (params");
        for param in &self.signature.params {
            write_token(out, &param.name);
            if let Some(ty) = &param.type_ref {
                out.push(':');
                out.push_str(&ty.source);
            }
        }
        out.push(')');
        if let Some(ty) = &self.signature.return_type {
            out.push_str(" ->");
            out.push_str(&ty.source);
        }
        out.push(' ');
        self.body.write_shape(out);
        out.push(')');
    }
}

/// Function call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Call {
    /// Value being called
    pub callee: Box<Value>,
    /// Argument expressions
    pub arguments: Vec<Expression>,
}

impl Call {
    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::Call);
        out.push(' ');
        self.callee.write_shape(out);
        for argument in &self.arguments {
            out.push(' ');
            argument.write_shape(out);
        }
        out.push(')');
    }
}

/// `target[index]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyAccessor {
    /// Indexed value
    pub target: Box<Value>,
    /// Index expression
    pub index: Box<Expression>,
}

impl PropertyAccessor {
    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::PropertyAccessor);
        out.push(' ');
        self.target.write_shape(out);
        out.push(' ');
        self.index.write_shape(out);
        out.push(')');
    }
}

/// `[a, b, c]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct List {
    /// Element expressions
    pub elements: Vec<Expression>,
}

impl List {
    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::List);
        for element in &self.elements {
            out.push(' ');
            element.write_shape(out);
        }
        out.push(')');
    }
}

/// `{key: value}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dictionary {
    /// Key/value pairs in source order
    pub entries: Vec<(Token, Expression)>,
}

impl Dictionary {
    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::Dictionary);
        for (key, value) in &self.entries {
            write_token(out, key);
            out.push(' ');
            value.write_shape(out);
        }
        out.push(')');
    }
}

/// Operands and operators in source order.
///
/// `operators[i]` follows `operands[i]`; the last operator slot is always
/// `None`. An operand slot is `None` only next to a unary operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expression {
    /// Operand slots
    pub operands: Vec<Option<Value>>,
    /// Operator following each operand slot
    pub operators: Vec<Option<Token>>,
}

/// One element of an infix sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InfixTerm<'a> {
    /// Operand
    Operand(&'a Value),
    /// Operator token
    Operator(&'a Token),
}

impl Expression {
    /// Expression holding a single operand
    pub fn single(value: Value) -> Self {
        Self {
            operands: vec![Some(value)],
            operators: vec![None],
        }
    }

    /// (operand, following operator) pairs, sentinel included
    pub fn pairs(&self) -> impl Iterator<Item = (Option<&Value>, Option<&Token>)> {
        self.operands
            .iter()
            .zip(self.operators.iter())
            .map(|(value, op)| (value.as_ref(), op.as_ref()))
    }

    /// Strict infix sequence with empty slots and the sentinel removed
    pub fn infix_terms(&self) -> Vec<InfixTerm<'_>> {
        let mut terms = Vec::with_capacity(self.operands.len() * 2);
        for (value, op) in self.pairs() {
            if let Some(v) = value {
                terms.push(InfixTerm::Operand(v));
            }
            if let Some(t) = op {
                terms.push(InfixTerm::Operator(t));
            }
        }
        terms
    }

    /// The only operand, when the expression has no operators
    pub fn as_single(&self) -> Option<&Value> {
        match (self.operands.as_slice(), self.operators.as_slice()) {
            ([Some(value)], [None]) => Some(value),
            _ => None,
        }
    }

    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::Expression);
        for (value, op) in self.pairs() {
            match value {
                Some(v) => {
                    out.push(' ');
                    v.write_shape(out);
                }
                None => out.push_str(" _"),
            }
            if let Some(t) = op {
                write_token(out, t);
            }
        }
        out.push(')');
    }
}

/// One segment of a value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ValuePart {
    /// Literal or identifier token
    Token(Token),
    /// Nested construct
    Construct(Box<Construct>),
}

/// Literal, identifier, dot-path or nested construct
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    /// Dot-separated parts; a plain value has exactly one
    pub parts: Vec<ValuePart>,
}

impl Value {
    /// Value made of one token
    pub fn token(token: Token) -> Self {
        Self {
            parts: vec![ValuePart::Token(token)],
        }
    }

    /// Value wrapping one construct
    pub fn construct(construct: Construct) -> Self {
        Self {
            parts: vec![ValuePart::Construct(Box::new(construct))],
        }
    }

    /// The wrapped construct, when this value is a single nested construct
    pub fn as_construct(&self) -> Option<&Construct> {
        match self.parts.as_slice() {
            [ValuePart::Construct(c)] => Some(c),
            _ => None,
        }
    }

    /// Dot-joined name when every part is an identifier
    pub fn path_name(&self) -> Option<String> {
        let mut segments = Vec::with_capacity(self.parts.len());
        for part in &self.parts {
            match part {
                ValuePart::Token(t) if t.kind == TokenKind::Identifier => segments.push(t.source.as_str()),
                _ => return None,
            }
        }
        Some(segments.join("."))
    }

    /// First token of the value, for diagnostics
    pub fn first_token(&self) -> Option<&Token> {
        match self.parts.first()? {
            ValuePart::Token(t) => Some(t),
            ValuePart::Construct(_) => None,
        }
    }

    fn write_shape(&self, out: &mut String) {
        open(out, ConstructKind::Value);
        for part in &self.parts {
            match part {
                ValuePart::Token(t) => write_token(out, t),
                ValuePart::Construct(c) => {
                    out.push(' ');
                    c.write_shape(out);
                }
            }
        }
        out.push(')');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn tok(kind: TokenKind, src: &str) -> Token {
        Token::new(kind, src, 0, Arc::from("t"))
    }

    #[test]
    fn test_path_name() {
        let value = Value {
            parts: vec![
                ValuePart::Token(tok(TokenKind::Identifier, "io")),
                ValuePart::Token(tok(TokenKind::Identifier, "println_out")),
            ],
        };
        assert_eq!(value.path_name().as_deref(), Some("io.println_out"));
        assert_eq!(Value::token(tok(TokenKind::Integer, "1")).path_name(), None);
    }

    #[test]
    fn test_infix_terms_skip_sentinel() {
        let expr = Expression {
            operands: vec![Some(Value::token(tok(TokenKind::Identifier, "a"))), None],
            operators: vec![Some(tok(TokenKind::Operator, "!")), None],
        };
        let terms = expr.infix_terms();
        assert_eq!(terms.len(), 2);
        assert!(matches!(terms[1], InfixTerm::Operator(t) if t.source == "!"));
    }

    #[test]
    fn test_shape_ignores_offsets() {
        let a = Expression::single(Value::token(Token::new(TokenKind::Identifier, "x", 0, Arc::from("a"))));
        let b = Expression::single(Value::token(Token::new(TokenKind::Identifier, "x", 9, Arc::from("b"))));
        assert_ne!(a, b);
        assert_eq!(
            Construct::Expression(a).shape(),
            Construct::Expression(b).shape()
        );
    }

    #[test]
    fn test_construct_kind_display() {
        assert_eq!(ConstructKind::PropertyAccessor.to_string(), "PropertyAccessor");
    }
}
