//! Recursive descent parser for Python source
//!
//! Builds a rowan GreenNode tree from layout-processed tokens.
//! Supports error recovery and produces a lossless CST.

use super::grammar::{self, ExpressionParser, StatementParser};
use super::layout::layout;
use super::lexer::{Token, describe_error_token, tokenize};
use super::syntax_kind::SyntaxKind;
use crate::base::LineIndex;
use crate::diagnostics::ExtractError;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The first syntax error, positioned for reporting.
    pub fn first_error(&self, index: &LineIndex) -> Option<ExtractError> {
        self.errors
            .first()
            .map(|e| ExtractError::syntax(index.line_col(e.range.start()), e.message.clone()))
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse a module into a CST
pub fn parse(input: &str) -> Parse {
    let (tokens, layout_errors) = layout(tokenize(input), TextSize::of(input));
    let mut parser = Parser::new(&tokens, TextSize::of(input));
    grammar::parse_file(&mut parser);
    parser.finish_with(layout_errors)
}

/// Parse a single expression, as found inside a string annotation.
///
/// Surrounding whitespace is ignored, the way `eval` ignores it.
pub fn parse_expression(input: &str) -> Parse {
    let input = input.trim_matches([' ', '\t', '\n', '\r']);
    let (tokens, layout_errors) = layout(tokenize(input), TextSize::of(input));
    let mut parser = Parser::new(&tokens, TextSize::of(input));
    grammar::parse_expression_root(&mut parser);
    parser.finish_with(layout_errors)
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
    /// Number of currently open nodes; leading trivia is only flushed inside a node.
    depth: usize,
    source_len: TextSize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], source_len: TextSize) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            depth: 0,
            source_len,
        }
    }

    fn finish_with(self, mut errors: Vec<SyntaxError>) -> Parse {
        errors.extend(self.errors);
        errors.sort_by_key(|e| e.range.start());
        Parse {
            green: self.builder.finish(),
            errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    /// The nth significant (non-trivia) token from the current position.
    fn significant(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
    }

    fn current(&self) -> Option<&Token<'a>> {
        self.significant(0)
    }

    fn current_range(&self) -> TextRange {
        match self.current() {
            Some(token) => TextRange::at(token.offset, TextSize::of(token.text)),
            None => TextRange::empty(self.source_len),
        }
    }

    fn push_error(&mut self, message: String, range: TextRange) {
        // One error per position; recovery tends to report the same spot twice.
        if self
            .errors
            .last()
            .is_some_and(|e| e.range.start() == range.start())
        {
            return;
        }
        self.errors.push(SyntaxError::new(message, range));
    }
}

impl<'a> ExpressionParser for Parser<'a> {
    fn current_kind(&self) -> SyntaxKind {
        self.current().map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn current_text(&self) -> &str {
        self.current().map(|t| t.text).unwrap_or("")
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current().is_some_and(|t| t.kind == kind)
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        self.current().is_some_and(|t| kinds.contains(&t.kind))
    }

    fn at_eof(&self) -> bool {
        self.current().is_none()
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.significant(n).map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn nth_text(&self, n: usize) -> &str {
        self.significant(n).map(|t| t.text).unwrap_or("")
    }

    fn get_pos(&self) -> usize {
        self.pos
    }

    fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {}", kind.display_name()));
            false
        }
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        if self.depth > 0 {
            self.skip_trivia();
        }
        self.depth += 1;
        self.builder.start_node(kind.into());
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.depth += 1;
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish_node(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.builder.finish_node();
    }

    fn error(&mut self, message: impl Into<String>) {
        let range = self.current_range();
        let message = match self.current() {
            Some(token) if token.kind == SyntaxKind::ERROR => {
                describe_error_token(token.text).to_string()
            }
            _ => message.into(),
        };
        self.push_error(message, range);
    }

    fn error_and_bump(&mut self, message: impl Into<String>) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        self.bump();
        self.finish_node();
    }
}

impl<'a> StatementParser for Parser<'a> {
    fn recover_line(&mut self) {
        self.start_node(SyntaxKind::ERROR);
        while !self.at_eof()
            && !self.at_any(&[SyntaxKind::NEWLINE, SyntaxKind::INDENT, SyntaxKind::DEDENT])
        {
            self.bump();
        }
        self.finish_node();
        self.eat(SyntaxKind::NEWLINE);
    }
}
