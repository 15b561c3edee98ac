//! Grammar combinators
//!
//! [`Repeat`], [`Select`] and [`Optional`] are the reusable pieces the
//! construct builders are assembled from. A rule is a short sequence of
//! [`RuleItem`]s holding at most one nested construct; the token items
//! before it anchor the head of a group and the items after it anchor
//! the tail.

use crate::ast::{Construct, ConstructKind};
use crate::error::{match_error, syntax_error};
use crate::lexer::{tokens_to_source, Punctuator, Token, TokenKind};
use crate::parser::build;
use core_types::CompileResult;
use tracing::trace;

/// One element of a grammar rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleItem {
    /// A single token of this kind
    Token(TokenKind),
    /// A nested construct spanning the remaining tokens
    Construct(ConstructKind),
}

/// Bracket depth counters for paren, bracket and brace nesting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BracketDepth {
    paren: i32,
    bracket: i32,
    brace: i32,
}

impl BracketDepth {
    /// Fresh counter at top level
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the counters for `token`.
    ///
    /// A closing bracket with no matching opener is a syntax error.
    pub fn track(&mut self, token: &Token) -> CompileResult<()> {
        let counter = match token.kind {
            TokenKind::Punctuator(Punctuator::LParen) | TokenKind::Punctuator(Punctuator::RParen) => {
                &mut self.paren
            }
            TokenKind::Punctuator(Punctuator::LBracket) | TokenKind::Punctuator(Punctuator::RBracket) => {
                &mut self.bracket
            }
            TokenKind::Punctuator(Punctuator::LBrace) | TokenKind::Punctuator(Punctuator::RBrace) => {
                &mut self.brace
            }
            _ => return Ok(()),
        };
        let opening = matches!(
            token.kind,
            TokenKind::Punctuator(Punctuator::LParen | Punctuator::LBracket | Punctuator::LBrace)
        );
        *counter += if opening { 1 } else { -1 };
        if *counter < 0 {
            return Err(syntax_error(
                format!("Unbalanced closing `{}`", token.source),
                Some(token.position()),
            ));
        }
        Ok(())
    }

    /// True when outside every bracket pair
    pub fn is_top_level(&self) -> bool {
        self.paren == 0 && self.bracket == 0 && self.brace == 0
    }
}

/// Drop space and comment tokens
pub fn strip_trivia(tokens: &[Token]) -> Vec<Token> {
    tokens.iter().filter(|t| !t.kind.is_trivia()).cloned().collect()
}

fn count_constructs(rule: &[RuleItem]) -> usize {
    rule.iter().filter(|item| matches!(item, RuleItem::Construct(_))).count()
}

/// Token items before and after the nested construct
fn anchors(rule: &[RuleItem]) -> (Vec<TokenKind>, Vec<TokenKind>, bool) {
    let mut head = Vec::new();
    let mut tail = Vec::new();
    let mut nested = false;
    for item in rule {
        match item {
            RuleItem::Token(kind) if nested => tail.push(*kind),
            RuleItem::Token(kind) => head.push(*kind),
            RuleItem::Construct(_) => nested = true,
        }
    }
    (head, tail, nested)
}

/// Check the head forward and the tail in reverse
fn anchors_match(tokens: &[Token], head: &[TokenKind], tail: &[TokenKind], nested: bool) -> bool {
    if nested {
        if tokens.len() < head.len() + tail.len() {
            return false;
        }
    } else if tokens.len() != head.len() + tail.len() {
        return false;
    }
    let head_ok = head.iter().zip(tokens).all(|(kind, t)| t.kind == *kind);
    let tail_ok = tail
        .iter()
        .rev()
        .zip(tokens.iter().rev())
        .all(|(kind, t)| t.kind == *kind);
    head_ok && tail_ok
}

/// A rule repeated over separator-delimited groups
#[derive(Debug, Clone)]
pub struct Repeat {
    rule: Vec<RuleItem>,
    separator: TokenKind,
}

impl Repeat {
    /// Create a repeat combinator.
    ///
    /// A rule may hold at most one nested construct.
    pub fn new(rule: Vec<RuleItem>, separator: TokenKind) -> CompileResult<Self> {
        if count_constructs(&rule) > 1 {
            return Err(match_error(
                "Repeat rule may contain at most one nested construct",
                &[],
            ));
        }
        Ok(Self { rule, separator })
    }

    fn keeps_space(&self) -> bool {
        self.rule.contains(&RuleItem::Token(TokenKind::Space))
    }

    /// Split `tokens` into groups at top-level separators.
    ///
    /// Each group keeps its trailing separator; the last may have none. An
    /// empty last group is dropped.
    pub fn split(&self, tokens: &[Token]) -> CompileResult<Vec<Vec<Token>>> {
        let tokens = if self.keeps_space() {
            tokens.to_vec()
        } else {
            strip_trivia(tokens)
        };

        let mut groups = Vec::new();
        let mut current = Vec::new();
        let mut depth = BracketDepth::new();
        for token in tokens {
            depth.track(&token)?;
            let splits = depth.is_top_level() && token.kind == self.separator;
            current.push(token);
            if splits {
                groups.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            groups.push(current);
        }

        let (head, tail, nested) = anchors(&self.rule);
        for group in &groups {
            let body = match group.last() {
                Some(last) if last.kind == self.separator => &group[..group.len() - 1],
                _ => &group[..],
            };
            if !anchors_match(body, &head, &tail, nested) {
                return Err(match_error(
                    format!("Group `{}` does not match the repeated rule", tokens_to_source(group)),
                    group,
                ));
            }
        }

        trace!(groups = groups.len(), separator = %self.separator, "repeat split");
        Ok(groups)
    }
}

/// Result of a successful [`Select`]
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// A construct candidate built successfully
    Construct(Construct),
    /// The single remaining token matched a token candidate
    Token(Token),
}

impl Selection {
    /// Which candidate was selected
    pub fn item(&self) -> RuleItem {
        match self {
            Selection::Construct(c) => RuleItem::Construct(c.kind()),
            Selection::Token(t) => RuleItem::Token(t.kind),
        }
    }
}

/// Ordered choice between candidates
#[derive(Debug, Clone)]
pub struct Select {
    candidates: Vec<RuleItem>,
}

impl Select {
    /// Create a select combinator
    pub fn new(candidates: Vec<RuleItem>) -> Self {
        Self { candidates }
    }

    /// First construct candidate that builds, else a matching single token
    pub fn select(&self, tokens: &[Token]) -> Option<Selection> {
        for candidate in &self.candidates {
            if let RuleItem::Construct(kind) = candidate {
                match build(*kind, tokens) {
                    Ok(construct) => return Some(Selection::Construct(construct)),
                    Err(err) => trace!(candidate = %kind, error = %err, "select candidate rejected"),
                }
            }
        }

        if let [token] = tokens {
            let matched = self
                .candidates
                .iter()
                .any(|c| *c == RuleItem::Token(token.kind));
            if matched {
                return Some(Selection::Token(token.clone()));
            }
        }
        None
    }
}

/// Outcome of [`Optional::check`]
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    /// The optional rule is absent
    Omitted,
    /// The rule matched, with its nested construct if it has one
    Present(Option<Construct>),
}

/// A rule that may be absent
#[derive(Debug, Clone)]
pub struct Optional {
    rule: Vec<RuleItem>,
}

impl Optional {
    /// Create an optional combinator.
    ///
    /// A rule may hold at most one nested construct.
    pub fn new(rule: Vec<RuleItem>) -> CompileResult<Self> {
        if count_constructs(&rule) > 1 {
            return Err(match_error(
                "Optional rule may contain at most one nested construct",
                &[],
            ));
        }
        Ok(Self { rule })
    }

    /// Check whether `tokens` hold the optional rule
    pub fn check(&self, tokens: &[Token]) -> Presence {
        if tokens.is_empty() {
            return Presence::Omitted;
        }
        let (head, tail, nested) = anchors(&self.rule);
        if !anchors_match(tokens, &head, &tail, nested) {
            return Presence::Omitted;
        }

        let nested_kind = self.rule.iter().find_map(|item| match item {
            RuleItem::Construct(kind) => Some(*kind),
            RuleItem::Token(_) => None,
        });
        match nested_kind {
            None => Presence::Present(None),
            Some(kind) => {
                let inner = &tokens[head.len()..tokens.len() - tail.len()];
                match build(kind, inner) {
                    Ok(construct) => Presence::Present(Some(construct)),
                    Err(_) => Presence::Omitted,
                }
            }
        }
    }
}
