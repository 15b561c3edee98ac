//! Script lexer - tokenizes source text by maximal munch
//!
//! At every position the candidate text grows one character at a time and
//! is tested against every token predicate; the longest candidate that
//! any predicate accepted becomes the token. Ties at equal length go to the
//! predicate listed first in [`MATCHERS`].

use crate::error::unrecognised_token;
use crate::operators::Operator;
use core_types::{CompileResult, SourcePosition};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Reserved words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Keyword {
    /// import keyword
    Import,
    /// export keyword
    Export,
    /// module keyword
    Module,
    /// return keyword
    Return,
    /// if keyword
    If,
    /// each keyword
    Each,
    /// loop keyword
    Loop,
}

impl Keyword {
    /// Look up a keyword by its source text
    pub fn from_source(text: &str) -> Option<Self> {
        match text {
            "import" => Some(Keyword::Import),
            "export" => Some(Keyword::Export),
            "module" => Some(Keyword::Module),
            "return" => Some(Keyword::Return),
            "if" => Some(Keyword::If),
            "each" => Some(Keyword::Each),
            "loop" => Some(Keyword::Loop),
            _ => None,
        }
    }

    /// Source text of the keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Import => "import",
            Keyword::Export => "export",
            Keyword::Module => "module",
            Keyword::Return => "return",
            Keyword::If => "if",
            Keyword::Each => "each",
            Keyword::Loop => "loop",
        }
    }
}

/// Fixed punctuation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Punctuator {
    /// Comma
    Comma,
    /// Dot
    Dot,
    /// Colon
    Colon,
    /// Semicolon
    Semicolon,
    /// Opening parenthesis
    LParen,
    /// Closing parenthesis
    RParen,
    /// Opening bracket
    LBracket,
    /// Closing bracket
    RBracket,
    /// Opening brace
    LBrace,
    /// Closing brace
    RBrace,
    /// Lambda arrow
    Arrow,
}

impl Punctuator {
    /// Look up a punctuator by its source text
    pub fn from_source(text: &str) -> Option<Self> {
        match text {
            "," => Some(Punctuator::Comma),
            "." => Some(Punctuator::Dot),
            ":" => Some(Punctuator::Colon),
            ";" => Some(Punctuator::Semicolon),
            "(" => Some(Punctuator::LParen),
            ")" => Some(Punctuator::RParen),
            "[" => Some(Punctuator::LBracket),
            "]" => Some(Punctuator::RBracket),
            "{" => Some(Punctuator::LBrace),
            "}" => Some(Punctuator::RBrace),
            "=>" => Some(Punctuator::Arrow),
            _ => None,
        }
    }
}

/// Token type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Run of spaces/tabs (or an empty synthesized marker)
    Space,
    /// Run of line breaks
    Newline,
    /// `#` to end of line
    Comment,
    /// Integer literal, optionally negative
    Integer,
    /// `true` or `false`
    Boolean,
    /// Single or double quoted string literal
    String,
    /// Reserved word
    Keyword(Keyword),
    /// Operator from the operator table
    Operator,
    /// Fixed punctuation
    Punctuator(Punctuator),
    /// Identifier
    Identifier,
}

impl TokenKind {
    /// Tokens that carry no meaning for the grammar
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Space | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Keyword(k) => write!(f, "Keyword({})", k.as_str()),
            TokenKind::Punctuator(p) => write!(f, "{:?}", p),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Token produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Type tag
    pub kind: TokenKind,
    /// Exact source text (empty for synthesized tokens)
    pub source: String,
    /// Character offset of the first character
    pub offset: usize,
    /// Origin id of the source
    pub origin: Arc<str>,
}

impl Token {
    /// Create a token
    pub fn new(kind: TokenKind, source: impl Into<String>, offset: usize, origin: Arc<str>) -> Self {
        Self {
            kind,
            source: source.into(),
            offset,
            origin,
        }
    }

    /// Empty-source space token inserted by normalization
    pub fn synthetic_space(offset: usize, origin: Arc<str>) -> Self {
        Self::new(TokenKind::Space, "", offset, origin)
    }

    /// Position of this token, for diagnostics
    pub fn position(&self) -> SourcePosition {
        SourcePosition::new(self.origin.clone(), self.offset, self.source.chars().count())
    }

    /// Check the token's punctuator
    pub fn is_punctuator(&self, punctuator: Punctuator) -> bool {
        self.kind == TokenKind::Punctuator(punctuator)
    }

    /// Check the token's keyword
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

type Matcher = fn(&str) -> Option<TokenKind>;

/// Token predicates in priority order
const MATCHERS: [Matcher; 10] = [
    match_space,
    match_newline,
    match_comment,
    match_integer,
    match_boolean,
    match_string,
    match_keyword,
    match_operator,
    match_punctuator,
    match_identifier,
];

fn match_space(text: &str) -> Option<TokenKind> {
    (!text.is_empty() && text.chars().all(|c| c == ' ' || c == '\t')).then_some(TokenKind::Space)
}

fn match_newline(text: &str) -> Option<TokenKind> {
    let mut has_newline = false;
    for c in text.chars() {
        match c {
            '\n' => has_newline = true,
            '\r' => {}
            _ => return None,
        }
    }
    has_newline.then_some(TokenKind::Newline)
}

fn match_comment(text: &str) -> Option<TokenKind> {
    (text.starts_with('#') && !text.contains('\n')).then_some(TokenKind::Comment)
}

fn match_integer(text: &str) -> Option<TokenKind> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    (!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())).then_some(TokenKind::Integer)
}

fn match_boolean(text: &str) -> Option<TokenKind> {
    matches!(text, "true" | "false").then_some(TokenKind::Boolean)
}

fn match_string(text: &str) -> Option<TokenKind> {
    let mut chars = text.chars();
    let quote = chars.next().filter(|q| *q == '\'' || *q == '"')?;
    let mut escaped = false;
    let mut closed = false;
    for ch in chars {
        if closed || ch == '\n' {
            return None;
        }
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == quote {
            closed = true;
        }
    }
    closed.then_some(TokenKind::String)
}

fn match_keyword(text: &str) -> Option<TokenKind> {
    Keyword::from_source(text).map(TokenKind::Keyword)
}

fn match_operator(text: &str) -> Option<TokenKind> {
    Operator::identify(text).map(|_| TokenKind::Operator)
}

fn match_punctuator(text: &str) -> Option<TokenKind> {
    Punctuator::from_source(text).map(TokenKind::Punctuator)
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '_' | '$' | '@')
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '@')
}

/// Words an identifier may never spell
pub fn is_reserved(text: &str) -> bool {
    Keyword::from_source(text).is_some()
        || match_boolean(text).is_some()
        || Operator::identify(text).is_some()
}

fn match_identifier(text: &str) -> Option<TokenKind> {
    let mut chars = text.chars();
    let first = chars.next()?;
    (is_identifier_start(first) && chars.all(is_identifier_continue) && !is_reserved(text))
        .then_some(TokenKind::Identifier)
}

/// Whether a longer candidate starting with `text` could still match.
///
/// Once this is false no extension is accepted by any predicate, so
/// growth stops and lexing cost is bounded by token length.
fn can_extend(text: &str) -> bool {
    let mut chars = text.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return true,
    };
    match first {
        ' ' | '\t' => chars.all(|c| c == ' ' || c == '\t'),
        '\n' | '\r' => chars.all(|c| c == '\n' || c == '\r'),
        '#' => chars.all(|c| c != '\n'),
        '\'' | '"' => match_string(text).is_none() && chars.all(|c| c != '\n'),
        '-' => chars.all(|c| c.is_ascii_digit()),
        // `**`, `==` and `=>`
        '*' | '=' => chars.next().is_none(),
        c if c.is_ascii_digit() => chars.all(|c| c.is_ascii_digit()),
        c if is_identifier_start(c) => chars.all(is_identifier_continue),
        _ => false,
    }
}

/// Classify a complete candidate against every predicate
pub fn classify(text: &str) -> Option<TokenKind> {
    MATCHERS.iter().find_map(|matcher| matcher(text))
}

/// Lexer for script source text
pub struct Lexer {
    chars: Vec<char>,
    origin: Arc<str>,
    /// Character offset of the next token
    pub position: usize,
}

impl Lexer {
    /// Create a new lexer for the given source text
    pub fn new(source: &str, origin: impl Into<Arc<str>>) -> Self {
        Self {
            chars: source.chars().collect(),
            origin: origin.into(),
            position: 0,
        }
    }

    /// True once every character has been consumed
    pub fn is_at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    /// Scan the next raw token, or `None` at end of input.
    ///
    /// Raw tokens are not normalized; see [`Lexer::tokenize`].
    pub fn next_token(&mut self) -> CompileResult<Option<Token>> {
        if self.is_at_end() {
            return Ok(None);
        }

        let rest = &self.chars[self.position..];
        let mut candidate = String::new();
        let mut longest: Option<(TokenKind, usize)> = None;

        for (index, ch) in rest.iter().enumerate() {
            candidate.push(*ch);
            if let Some(kind) = classify(&candidate) {
                longest = Some((kind, index + 1));
            }
            if !can_extend(&candidate) {
                break;
            }
        }

        let (kind, length) = match longest {
            Some(found) => found,
            None => {
                let offending: String = rest.iter().take(1).collect();
                return Err(unrecognised_token(
                    &offending,
                    SourcePosition::new(self.origin.clone(), self.position, 1),
                ));
            }
        };

        let source: String = rest.iter().take(length).collect();
        let token = Token::new(kind, source, self.position, self.origin.clone());
        self.position += length;
        Ok(Some(token))
    }

    /// Tokenize the whole input and normalize the stream.
    ///
    /// The result opens with an empty space token, and every newline is
    /// immediately preceded by a space token.
    pub fn tokenize(mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = vec![Token::synthetic_space(0, self.origin.clone())];

        while let Some(token) = self.next_token()? {
            let preceded_by_space = tokens.last().map(|t| t.kind == TokenKind::Space).unwrap_or(false);
            if token.kind == TokenKind::Newline && !preceded_by_space {
                tokens.push(Token::synthetic_space(token.offset, self.origin.clone()));
            }
            tokens.push(token);
        }

        Ok(tokens)
    }
}

/// Lex `text` into a normalized token stream
pub fn lex(text: &str, origin: impl Into<Arc<str>>) -> CompileResult<Vec<Token>> {
    Lexer::new(text, origin).tokenize()
}

/// Contents of a string literal with quotes removed and escapes applied
pub fn string_value(source: &str) -> String {
    let mut chars = source.chars();
    let quote = chars.next();
    let mut body: Vec<char> = chars.collect();
    if quote.is_some() && body.last() == quote.as_ref() {
        body.pop();
    }

    let mut out = String::with_capacity(body.len());
    let mut escaped = false;
    for ch in body {
        if escaped {
            out.push(match ch {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '0' => '\0',
                other => other,
            });
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Concatenate the source text of a token run
pub fn tokens_to_source(tokens: &[Token]) -> String {
    tokens.iter().map(|t| t.source.as_str()).collect()
}
