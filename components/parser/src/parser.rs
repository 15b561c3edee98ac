//! Construct builders and parser entry points
//!
//! Every builder takes a token run, discards trivia and returns its
//! construct or a syntax error naming the construct kind and the offending
//! tokens. Builders recurse through [`build`], which is also what the
//! grammar combinators call for nested constructs.

use crate::ast::*;
use crate::error::{construct_error, invalid_syntax, positions, unexpected_eof, unexpected_token};
use crate::grammar::{BracketDepth, Optional, Presence, Repeat, RuleItem, Select, Selection};
use crate::lexer::{lex, Keyword, Punctuator, Token, TokenKind};
use crate::operators::Operator;
use core_types::{CompileError, CompileResult, ErrorKind};
use std::sync::Arc;
use tracing::trace;

const COMMA: TokenKind = TokenKind::Punctuator(Punctuator::Comma);

/// Build the construct of `kind` from `tokens`
pub fn build(kind: ConstructKind, tokens: &[Token]) -> CompileResult<Construct> {
    trace!(construct = %kind, tokens = tokens.len(), "build");
    match kind {
        ConstructKind::ScriptRoot => build_script_root(tokens).map(Construct::ScriptRoot),
        ConstructKind::Statement => build_statement(tokens).map(Construct::Statement),
        ConstructKind::Import => build_import(tokens).map(Construct::Import),
        ConstructKind::Export => build_export(tokens).map(Construct::Export),
        ConstructKind::Module => build_module(tokens).map(Construct::Module),
        ConstructKind::Function => build_function(tokens).map(Construct::Function),
        ConstructKind::Call => build_call(tokens).map(Construct::Call),
        ConstructKind::PropertyAccessor => build_property_accessor(tokens).map(Construct::PropertyAccessor),
        ConstructKind::List => build_list(tokens).map(Construct::List),
        ConstructKind::Dictionary => build_dictionary(tokens).map(Construct::Dictionary),
        ConstructKind::Expression => build_expression(tokens).map(Construct::Expression),
        ConstructKind::Value => build_value(tokens).map(Construct::Value),
    }
}

/// Drop every token with no meaning inside a statement
fn significant(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::Newline)
        .cloned()
        .collect()
}

/// Index of the first top-level token satisfying `predicate`
fn find_top_level(tokens: &[Token], predicate: impl Fn(&Token) -> bool) -> CompileResult<Option<usize>> {
    let mut depth = BracketDepth::new();
    for (index, token) in tokens.iter().enumerate() {
        if depth.is_top_level() && predicate(token) {
            return Ok(Some(index));
        }
        depth.track(token)?;
    }
    Ok(None)
}

/// Split at top-level tokens satisfying `predicate`, dropping the splitters
fn split_top_level(tokens: &[Token], predicate: impl Fn(&Token) -> bool) -> CompileResult<Vec<Vec<Token>>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    let mut depth = BracketDepth::new();
    for token in tokens {
        if depth.is_top_level() && predicate(token) {
            segments.push(std::mem::take(&mut current));
            continue;
        }
        depth.track(token)?;
        current.push(token.clone());
    }
    segments.push(current);
    Ok(segments)
}

/// Scan backwards from the last token to the opener matching it
fn find_opening(tokens: &[Token], open: Punctuator, close: Punctuator) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().rev() {
        if token.is_punctuator(close) {
            depth += 1;
        } else if token.is_punctuator(open) {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

/// Scan forwards from an opener at `start` to its closer
fn find_closing(tokens: &[Token], start: usize, open: Punctuator, close: Punctuator) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(start) {
        if token.is_punctuator(open) {
            depth += 1;
        } else if token.is_punctuator(close) {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(index);
            }
        }
    }
    None
}

fn describe(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.source.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_separator(group: &[Token], separator: TokenKind) -> &[Token] {
    match group.last() {
        Some(last) if last.kind == separator => &group[..group.len() - 1],
        _ => group,
    }
}

fn split_expression_list(tokens: &[Token]) -> CompileResult<Vec<Vec<Token>>> {
    let mut segments = split_top_level(tokens, |t| t.kind == COMMA)?;
    if segments.last().map(Vec::is_empty).unwrap_or(false) {
        segments.pop();
    }
    Ok(segments)
}

fn build_expression_list(tokens: &[Token], call_site: &[Token]) -> CompileResult<Vec<Expression>> {
    split_expression_list(tokens)?
        .iter()
        .map(|segment| {
            build_expression(segment).map_err(|err| {
                let blamed = if segment.is_empty() { call_site } else { segment };
                CompileError::new(
                    ErrorKind::SyntaxError,
                    format!(
                        "Invalid expression `{}` in `{}`: {}",
                        describe(segment),
                        describe(call_site),
                        err.message
                    ),
                )
                .in_construct(ConstructKind::Expression.to_string())
                .with_tokens(positions(blamed))
            })
        })
        .collect()
}

/// Split a comma-separated list at top level and check every entry.
///
/// `call_site` is the whole construct the list belongs to and is named in
/// the error when an entry is not a valid expression.
pub fn match_expression_list(tokens: &[Token], call_site: &[Token]) -> CompileResult<Vec<Vec<Token>>> {
    let tokens = significant(tokens);
    let call_site = significant(call_site);
    build_expression_list(&tokens, &call_site)?;
    split_expression_list(&tokens)
}

fn build_script_root(tokens: &[Token]) -> CompileResult<ScriptRoot> {
    Ok(ScriptRoot {
        statements: build_statements(tokens)?,
    })
}

/// One statement per newline-separated group
fn build_statements(tokens: &[Token]) -> CompileResult<Vec<Statement>> {
    let repeat = Repeat::new(
        vec![RuleItem::Construct(ConstructKind::Statement)],
        TokenKind::Newline,
    )?;
    let mut statements = Vec::new();
    for group in repeat.split(tokens)? {
        let body = strip_separator(&group, TokenKind::Newline);
        if body.is_empty() {
            continue;
        }
        statements.push(build_statement(body)?);
    }
    Ok(statements)
}

fn build_statement(tokens: &[Token]) -> CompileResult<Statement> {
    let tokens = significant(tokens);
    let select = Select::new(vec![
        RuleItem::Construct(ConstructKind::Import),
        RuleItem::Construct(ConstructKind::Export),
        RuleItem::Construct(ConstructKind::Function),
        RuleItem::Construct(ConstructKind::Expression),
    ]);
    match select.select(&tokens) {
        Some(Selection::Construct(construct)) => Ok(Statement {
            inner: Box::new(construct),
        }),
        _ => Err(invalid_syntax(ConstructKind::Statement, &tokens)),
    }
}

fn build_import(tokens: &[Token]) -> CompileResult<Import> {
    let tokens = significant(tokens);
    let (first, rest) = tokens
        .split_first()
        .ok_or_else(|| unexpected_eof(ConstructKind::Import, &tokens))?;
    if !first.is_keyword(Keyword::Import) {
        return Err(unexpected_token("`import`", first));
    }
    if rest.is_empty() {
        return Err(construct_error(
            ConstructKind::Import,
            "Expected at least one module specifier",
            &tokens,
        ));
    }
    let groups = Repeat::new(vec![RuleItem::Token(TokenKind::String)], COMMA)?.split(rest)?;
    Ok(Import {
        specifiers: groups.into_iter().filter_map(|g| g.into_iter().next()).collect(),
    })
}

fn build_export(tokens: &[Token]) -> CompileResult<Export> {
    let tokens = significant(tokens);
    let (first, rest) = tokens
        .split_first()
        .ok_or_else(|| unexpected_eof(ConstructKind::Export, &tokens))?;
    if !first.is_keyword(Keyword::Export) {
        return Err(unexpected_token("`export`", first));
    }
    if rest.is_empty() {
        return Err(construct_error(
            ConstructKind::Export,
            "Expected at least one exported expression",
            &tokens,
        ));
    }
    let repeat = Repeat::new(vec![RuleItem::Construct(ConstructKind::Expression)], COMMA)?;
    let expressions = repeat
        .split(rest)?
        .iter()
        .map(|group| build_expression(strip_separator(group, COMMA)))
        .collect::<CompileResult<Vec<_>>>()?;
    Ok(Export { expressions })
}

fn build_module(tokens: &[Token]) -> CompileResult<Module> {
    let tokens: Vec<Token> = tokens.iter().filter(|t| !t.kind.is_trivia()).cloned().collect();
    let start = tokens
        .iter()
        .position(|t| t.kind != TokenKind::Newline)
        .ok_or_else(|| unexpected_eof(ConstructKind::Module, &tokens))?;
    let header_end = tokens[start..]
        .iter()
        .position(|t| t.kind == TokenKind::Newline)
        .map(|i| start + i)
        .unwrap_or(tokens.len());
    let header = &tokens[start..header_end];

    let name = match header {
        [keyword, name] if keyword.is_keyword(Keyword::Module) && name.kind == TokenKind::Identifier => name.clone(),
        [keyword, ..] if !keyword.is_keyword(Keyword::Module) => {
            return Err(unexpected_token("`module`", keyword));
        }
        _ => {
            return Err(construct_error(
                ConstructKind::Module,
                "Expected `module <name>` on the first line",
                header,
            ))
        }
    };

    let body = tokens.get(header_end + 1..).unwrap_or(&[]);
    Ok(Module {
        name,
        statements: build_statements(body)?,
    })
}

fn build_function(tokens: &[Token]) -> CompileResult<Function> {
    let tokens = significant(tokens);
    let arrow = find_top_level(&tokens, |t| t.is_punctuator(Punctuator::Arrow))?
        .ok_or_else(|| construct_error(ConstructKind::Function, "Expected `=>`", &tokens))?;
    let (declarator, body) = (&tokens[..arrow], &tokens[arrow + 1..]);
    if body.is_empty() {
        return Err(construct_error(ConstructKind::Function, "Function body is empty", &tokens));
    }
    let signature = build_signature(declarator, &tokens)?;
    Ok(Function {
        signature,
        body: Box::new(build_expression(body)?),
    })
}

fn build_signature(declarator: &[Token], function: &[Token]) -> CompileResult<Signature> {
    let malformed = |message: &str| construct_error(ConstructKind::Function, message, function);

    if let [param] = declarator {
        if param.kind != TokenKind::Identifier {
            return Err(malformed("Malformed function declarator"));
        }
        return Ok(Signature {
            name: None,
            params: vec![Parameter {
                name: param.clone(),
                type_ref: None,
            }],
            return_type: None,
        });
    }

    let (name, rest) = match declarator {
        [name, paren, ..] if name.kind == TokenKind::Identifier && paren.is_punctuator(Punctuator::LParen) => {
            (Some(name.clone()), &declarator[1..])
        }
        [paren, ..] if paren.is_punctuator(Punctuator::LParen) => (None, declarator),
        _ => return Err(malformed("Malformed function declarator")),
    };

    let close = find_closing(rest, 0, Punctuator::LParen, Punctuator::RParen)
        .ok_or_else(|| malformed("Unbalanced parentheses in function declarator"))?;
    let params = build_parameters(&rest[1..close], function)?;

    let after = &rest[close + 1..];
    let return_type = if after.is_empty() {
        None
    } else {
        let optional = Optional::new(vec![
            RuleItem::Token(TokenKind::Punctuator(Punctuator::Colon)),
            RuleItem::Token(TokenKind::Identifier),
        ])?;
        match optional.check(after) {
            Presence::Present(_) => Some(after[1].clone()),
            Presence::Omitted => return Err(malformed("Malformed return type")),
        }
    };

    Ok(Signature {
        name,
        params,
        return_type,
    })
}

fn build_parameters(tokens: &[Token], function: &[Token]) -> CompileResult<Vec<Parameter>> {
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    let typed = tokens.iter().any(|t| t.is_punctuator(Punctuator::Colon));
    let rule = if typed {
        vec![
            RuleItem::Token(TokenKind::Identifier),
            RuleItem::Token(TokenKind::Punctuator(Punctuator::Colon)),
            RuleItem::Token(TokenKind::Identifier),
        ]
    } else {
        vec![RuleItem::Token(TokenKind::Identifier)]
    };
    let groups = Repeat::new(rule, COMMA)?.split(tokens).map_err(|err| {
        construct_error(
            ConstructKind::Function,
            format!("Malformed parameter list: {}", err.message),
            function,
        )
    })?;

    Ok(groups
        .into_iter()
        .filter_map(|group| {
            let mut parts = group.into_iter();
            let name = parts.next()?;
            let type_ref = if typed { parts.nth(1) } else { None };
            Some(Parameter { name, type_ref })
        })
        .collect())
}

fn build_call(tokens: &[Token]) -> CompileResult<Call> {
    let tokens = significant(tokens);
    match tokens.last() {
        Some(last) if last.is_punctuator(Punctuator::RParen) => {}
        _ => return Err(invalid_syntax(ConstructKind::Call, &tokens)),
    }
    let open = find_opening(&tokens, Punctuator::LParen, Punctuator::RParen)
        .ok_or_else(|| construct_error(ConstructKind::Call, "Unbalanced parentheses", &tokens))?;
    if open == 0 {
        return Err(invalid_syntax(ConstructKind::Call, &tokens));
    }
    let callee = build_value(&tokens[..open])?;
    let arguments = build_expression_list(&tokens[open + 1..tokens.len() - 1], &tokens)?;
    Ok(Call {
        callee: Box::new(callee),
        arguments,
    })
}

fn build_property_accessor(tokens: &[Token]) -> CompileResult<PropertyAccessor> {
    let tokens = significant(tokens);
    match tokens.last() {
        Some(last) if last.is_punctuator(Punctuator::RBracket) => {}
        _ => return Err(invalid_syntax(ConstructKind::PropertyAccessor, &tokens)),
    }
    let open = find_opening(&tokens, Punctuator::LBracket, Punctuator::RBracket)
        .ok_or_else(|| construct_error(ConstructKind::PropertyAccessor, "Unbalanced brackets", &tokens))?;
    let index = &tokens[open + 1..tokens.len() - 1];
    if open == 0 || index.is_empty() {
        return Err(invalid_syntax(ConstructKind::PropertyAccessor, &tokens));
    }
    Ok(PropertyAccessor {
        target: Box::new(build_value(&tokens[..open])?),
        index: Box::new(build_expression(index)?),
    })
}

fn build_list(tokens: &[Token]) -> CompileResult<List> {
    let tokens = significant(tokens);
    match tokens.last() {
        Some(last) if last.is_punctuator(Punctuator::RBracket) => {}
        _ => return Err(invalid_syntax(ConstructKind::List, &tokens)),
    }
    if find_opening(&tokens, Punctuator::LBracket, Punctuator::RBracket) != Some(0) {
        return Err(invalid_syntax(ConstructKind::List, &tokens));
    }
    Ok(List {
        elements: build_expression_list(&tokens[1..tokens.len() - 1], &tokens)?,
    })
}

fn build_dictionary(tokens: &[Token]) -> CompileResult<Dictionary> {
    let tokens = significant(tokens);
    let enclosed = matches!(
        (tokens.first(), tokens.last()),
        (Some(first), Some(last))
            if tokens.len() >= 2
                && first.is_punctuator(Punctuator::LBrace)
                && last.is_punctuator(Punctuator::RBrace)
    );
    if !enclosed {
        return Err(invalid_syntax(ConstructKind::Dictionary, &tokens));
    }
    let entries = Repeat::new(
        vec![
            RuleItem::Token(TokenKind::Identifier),
            RuleItem::Token(TokenKind::Punctuator(Punctuator::Colon)),
            RuleItem::Construct(ConstructKind::Expression),
        ],
        COMMA,
    )?
    .split(&tokens[1..tokens.len() - 1])?;
    trace!(entries = entries.len(), "dictionary literal rejected");
    Err(construct_error(
        ConstructKind::Dictionary,
        "Dictionary literals are not yet supported",
        &tokens,
    ))
}

fn operator_of(token: Option<&Token>) -> Option<Operator> {
    token.and_then(|t| Operator::identify(&t.source))
}

fn build_expression(tokens: &[Token]) -> CompileResult<Expression> {
    let tokens = significant(tokens);
    if tokens.is_empty() {
        return Err(unexpected_eof(ConstructKind::Expression, &tokens));
    }
    // An arrow binds looser than every operator
    if find_top_level(&tokens, |t| t.is_punctuator(Punctuator::Arrow))?.is_some() {
        return Ok(Expression::single(build_value(&tokens)?));
    }

    let repeat = Repeat::new(
        vec![RuleItem::Construct(ConstructKind::Value)],
        TokenKind::Operator,
    )?;
    let mut operands = Vec::new();
    let mut operators = Vec::new();
    for group in repeat.split(&tokens)? {
        let operand = strip_separator(&group, TokenKind::Operator);
        let operator = group.get(operand.len()).cloned();
        operands.push(if operand.is_empty() {
            None
        } else {
            Some(build_value(operand)?)
        });
        operators.push(operator);
    }
    if let Some(Some(_)) = operators.last() {
        operands.push(None);
        operators.push(None);
    }

    for index in 0..operands.len() {
        let next = operator_of(operators[index].as_ref());
        let previous = index
            .checked_sub(1)
            .and_then(|i| operator_of(operators[i].as_ref()));
        let unary_slot = next.map(|op| op.is_prefix()).unwrap_or(false)
            || previous.map(|op| op.is_postfix()).unwrap_or(false);
        match (&operands[index], unary_slot) {
            (None, false) => {
                return Err(construct_error(ConstructKind::Expression, "Missing operand", &tokens));
            }
            (Some(_), true) => {
                return Err(construct_error(
                    ConstructKind::Expression,
                    "Unexpected operand next to a unary operator",
                    &tokens,
                ));
            }
            _ => {}
        }
    }

    Ok(Expression { operands, operators })
}

fn build_value(tokens: &[Token]) -> CompileResult<Value> {
    let tokens = significant(tokens);
    let (first, last) = match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(unexpected_eof(ConstructKind::Value, &tokens)),
    };

    if tokens.len() == 1 {
        return match first.kind {
            TokenKind::Integer | TokenKind::Boolean | TokenKind::String | TokenKind::Identifier => {
                Ok(Value::token(first.clone()))
            }
            _ => Err(invalid_syntax(ConstructKind::Value, &tokens)),
        };
    }

    if find_top_level(&tokens, |t| t.is_punctuator(Punctuator::Arrow))?.is_some() {
        return Ok(Value::construct(Construct::Function(build_function(&tokens)?)));
    }

    if last.is_punctuator(Punctuator::RParen) {
        return match find_opening(&tokens, Punctuator::LParen, Punctuator::RParen) {
            Some(0) => {
                let group = build_expression(&tokens[1..tokens.len() - 1])?;
                Ok(Value::construct(Construct::Expression(group)))
            }
            Some(_) => Ok(Value::construct(Construct::Call(build_call(&tokens)?))),
            None => Err(construct_error(ConstructKind::Value, "Unbalanced parentheses", &tokens)),
        };
    }

    if last.is_punctuator(Punctuator::RBracket) {
        return match find_opening(&tokens, Punctuator::LBracket, Punctuator::RBracket) {
            Some(0) => Ok(Value::construct(Construct::List(build_list(&tokens)?))),
            Some(_) => Ok(Value::construct(Construct::PropertyAccessor(
                build_property_accessor(&tokens)?,
            ))),
            None => Err(construct_error(ConstructKind::Value, "Unbalanced brackets", &tokens)),
        };
    }

    if first.is_punctuator(Punctuator::LBrace) && last.is_punctuator(Punctuator::RBrace) {
        return Ok(Value::construct(Construct::Dictionary(build_dictionary(&tokens)?)));
    }

    build_dot_path(&tokens)
}

fn build_dot_path(tokens: &[Token]) -> CompileResult<Value> {
    let segments = split_top_level(tokens, |t| t.is_punctuator(Punctuator::Dot))?;
    if segments.len() < 2 {
        return Err(invalid_syntax(ConstructKind::Value, tokens));
    }

    let mut parts = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment.as_slice() {
            [] => return Err(construct_error(ConstructKind::Value, "Empty segment in dotted path", tokens)),
            [single] if single.kind == TokenKind::Identifier => parts.push(ValuePart::Token(single.clone())),
            [_] => return Err(invalid_syntax(ConstructKind::Value, tokens)),
            multiple => {
                let nested = build_value(multiple)?;
                parts.extend(nested.parts);
            }
        }
    }
    Ok(Value { parts })
}

/// Parser over a lexed token stream
pub struct Parser {
    tokens: Vec<Token>,
}

impl Parser {
    /// Create a parser over already lexed tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Lex `source` and create a parser over its tokens
    pub fn from_source(source: &str, origin: impl Into<Arc<str>>) -> CompileResult<Self> {
        Ok(Self::new(lex(source, origin)?))
    }

    /// Tokens this parser was created with
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Give back the token stream
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Parse the stream as a script
    pub fn parse_script(&self) -> CompileResult<ScriptRoot> {
        build_script_root(&self.tokens)
    }

    /// Parse the stream as a module (`module <name>` header line first)
    pub fn parse_module(&self) -> CompileResult<Module> {
        build_module(&self.tokens)
    }
}

/// Lex and parse `source` as a script
pub fn parse(source: &str, origin: impl Into<Arc<str>>) -> CompileResult<ScriptRoot> {
    Parser::from_source(source, origin)?.parse_script()
}
