//! Layout pass: converts physical lines into logical-line tokens.
//!
//! The lexer reports every physical newline as `NEWLINE`. This pass keeps only
//! the ones that end a logical line, demotes the rest (blank lines, comment-only
//! lines, newlines inside brackets) to `NL` trivia, and synthesizes zero-width
//! `INDENT`/`DEDENT` tokens from leading whitespace.

use super::lexer::Token;
use super::parser::SyntaxError;
use super::syntax_kind::SyntaxKind;
use rowan::{TextRange, TextSize};

/// Tab stops used when measuring indentation.
const TAB_SIZE: usize = 8;

/// Insert layout tokens into a raw token stream.
pub fn layout<'a>(raw: Vec<Token<'a>>, source_len: TextSize) -> (Vec<Token<'a>>, Vec<SyntaxError>) {
    let mut out = Vec::with_capacity(raw.len() + 8);
    let mut errors = Vec::new();
    let mut indents: Vec<usize> = vec![0];
    let mut bracket_depth = 0usize;
    let mut at_line_start = true;
    let mut line_indent = 0usize;

    for token in raw {
        match token.kind {
            SyntaxKind::NEWLINE => {
                let logical = bracket_depth == 0 && !at_line_start;
                let kind = if logical { SyntaxKind::NEWLINE } else { SyntaxKind::NL };
                out.push(Token { kind, ..token });
                if logical {
                    at_line_start = true;
                }
                line_indent = 0;
            }
            SyntaxKind::WHITESPACE => {
                if at_line_start && bracket_depth == 0 {
                    line_indent = measure_indent(token.text, line_indent);
                }
                out.push(token);
            }
            SyntaxKind::COMMENT | SyntaxKind::LINE_CONTINUATION => out.push(token),
            _ => {
                if at_line_start && bracket_depth == 0 {
                    at_line_start = false;
                    let top = indents.last().copied().unwrap_or(0);
                    if line_indent > top {
                        indents.push(line_indent);
                        out.push(Token::synthetic(SyntaxKind::INDENT, token.offset));
                    } else if line_indent < top {
                        while indents.last().is_some_and(|&level| level > line_indent) {
                            indents.pop();
                            out.push(Token::synthetic(SyntaxKind::DEDENT, token.offset));
                        }
                        if indents.last().copied().unwrap_or(0) != line_indent {
                            errors.push(SyntaxError::new(
                                "unindent does not match any outer indentation level",
                                TextRange::empty(token.offset),
                            ));
                            indents.push(line_indent);
                        }
                    }
                }
                match token.kind {
                    SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => {
                        bracket_depth += 1;
                    }
                    SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                        bracket_depth = bracket_depth.saturating_sub(1);
                    }
                    _ => {}
                }
                out.push(token);
            }
        }
    }

    if !at_line_start {
        out.push(Token::synthetic(SyntaxKind::NEWLINE, source_len));
    }
    for _ in 1..indents.len() {
        out.push(Token::synthetic(SyntaxKind::DEDENT, source_len));
    }

    (out, errors)
}

/// Width of leading whitespace, continuing from `start` columns already consumed.
fn measure_indent(text: &str, start: usize) -> usize {
    text.chars().fold(start, |width, c| match c {
        '\t' => (width / TAB_SIZE + 1) * TAB_SIZE,
        // Form feed resets the column count.
        '\x0C' => 0,
        _ => width + 1,
    })
}
