//! `match` statement patterns
//!
//! Patterns never contribute declarations, so the tree is kept shallow: every
//! pattern is a PATTERN node holding its tokens, nested PATTERN nodes for
//! sub-patterns, and expression nodes for literal values.
//!
//! ```text
//! patterns     = open_pattern (',' open_pattern)* [',']
//! open_pattern = '*' IDENT | or_pattern ['as' IDENT]
//! or_pattern   = closed ('|' closed)*
//! closed       = literal | dotted_name ['(' class_args ')'] | '(' patterns ')'
//!              | '[' patterns ']' | '{' mapping_items '}'
//! ```

use super::expressions::{ExpressionParser, parse_sum};
use crate::parser::syntax_kind::SyntaxKind;

/// Patterns after `case`, up to the guard or the `:`.
pub fn parse_case_patterns<P: ExpressionParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    if !parse_open_pattern(p) {
        p.error("expected pattern");
        return;
    }
    if p.at(SyntaxKind::COMMA) {
        p.start_node_at(checkpoint, SyntaxKind::PATTERN);
        while p.eat(SyntaxKind::COMMA) {
            if at_pattern_end(p) {
                break;
            }
            if !parse_open_pattern(p) {
                p.error("expected pattern after ','");
                break;
            }
        }
        p.finish_node();
    }
}

fn at_pattern_end<P: ExpressionParser>(p: &P) -> bool {
    p.at_any(&[
        SyntaxKind::COLON,
        SyntaxKind::IF_KW,
        SyntaxKind::R_PAREN,
        SyntaxKind::R_BRACKET,
        SyntaxKind::R_BRACE,
    ]) || p.at_eof()
}

fn parse_open_pattern<P: ExpressionParser>(p: &mut P) -> bool {
    if p.at(SyntaxKind::STAR) {
        p.start_node(SyntaxKind::PATTERN);
        p.bump(); // *
        p.expect(SyntaxKind::IDENT);
        p.finish_node();
        return true;
    }
    let checkpoint = p.checkpoint();
    if !parse_closed_pattern(p) {
        return false;
    }
    if p.at(SyntaxKind::PIPE) {
        p.start_node_at(checkpoint, SyntaxKind::PATTERN);
        while p.eat(SyntaxKind::PIPE) {
            if !parse_closed_pattern(p) {
                p.error("expected pattern after '|'");
                break;
            }
        }
        p.finish_node();
    }
    if p.at(SyntaxKind::AS_KW) {
        p.start_node_at(checkpoint, SyntaxKind::PATTERN);
        p.bump(); // as
        p.expect(SyntaxKind::IDENT);
        p.finish_node();
    }
    true
}

fn parse_closed_pattern<P: ExpressionParser>(p: &mut P) -> bool {
    match p.current_kind() {
        SyntaxKind::IDENT => {
            p.start_node(SyntaxKind::PATTERN);
            p.bump();
            while p.at(SyntaxKind::DOT) && p.nth(1) == SyntaxKind::IDENT {
                p.bump();
                p.bump();
            }
            if p.at(SyntaxKind::L_PAREN) {
                p.bump(); // (
                parse_class_arguments(p);
                p.expect(SyntaxKind::R_PAREN);
            }
            p.finish_node();
        }
        SyntaxKind::L_PAREN => {
            p.start_node(SyntaxKind::PATTERN);
            p.bump();
            parse_pattern_sequence(p, SyntaxKind::R_PAREN);
            p.expect(SyntaxKind::R_PAREN);
            p.finish_node();
        }
        SyntaxKind::L_BRACKET => {
            p.start_node(SyntaxKind::PATTERN);
            p.bump();
            parse_pattern_sequence(p, SyntaxKind::R_BRACKET);
            p.expect(SyntaxKind::R_BRACKET);
            p.finish_node();
        }
        SyntaxKind::L_BRACE => parse_mapping_pattern(p),
        SyntaxKind::STRING
        | SyntaxKind::INT_NUMBER
        | SyntaxKind::FLOAT_NUMBER
        | SyntaxKind::IMAG_NUMBER
        | SyntaxKind::NONE_KW
        | SyntaxKind::TRUE_KW
        | SyntaxKind::FALSE_KW
        | SyntaxKind::MINUS => {
            p.start_node(SyntaxKind::PATTERN);
            parse_sum(p);
            p.finish_node();
        }
        _ => return false,
    }
    true
}

fn parse_pattern_sequence<P: ExpressionParser>(p: &mut P, close: SyntaxKind) {
    while !p.at(close) && !p.at_eof() {
        if !parse_open_pattern(p) {
            p.error("expected pattern");
            return;
        }
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
}

/// `Point(0, y=1)`
fn parse_class_arguments<P: ExpressionParser>(p: &mut P) {
    while !p.at(SyntaxKind::R_PAREN) && !p.at_eof() {
        if p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::EQ {
            p.start_node(SyntaxKind::PATTERN);
            p.bump(); // keyword
            p.bump(); // =
            if !parse_open_pattern(p) {
                p.error("expected pattern after '='");
            }
            p.finish_node();
        } else if !parse_open_pattern(p) {
            p.error("expected pattern");
            return;
        }
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
}

/// `{"key": pattern, **rest}`
fn parse_mapping_pattern<P: ExpressionParser>(p: &mut P) {
    p.start_node(SyntaxKind::PATTERN);
    p.bump(); // {
    while !p.at(SyntaxKind::R_BRACE) && !p.at_eof() {
        if p.eat(SyntaxKind::STAR_STAR) {
            p.expect(SyntaxKind::IDENT);
        } else {
            if !parse_closed_pattern(p) {
                p.error("expected mapping key");
                break;
            }
            if p.expect(SyntaxKind::COLON) && !parse_open_pattern(p) {
                p.error("expected pattern after ':'");
            }
        }
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}
