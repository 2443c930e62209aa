//! Statement parsing for Python
//!
//! ```text
//! file        = statement* EOF
//! statement   = compound_stmt | simple_stmts
//! simple_stmts = simple_stmt (';' simple_stmt)* [';'] NEWLINE
//! block       = NEWLINE INDENT statement+ DEDENT | simple_stmts
//! ```
//!
//! Soft keywords (`match`, `case`, `type`) arrive as IDENT tokens and are
//! recognized here by lookahead.

use super::expressions::{
    ExpressionParser, at_expression_start, parse_annotation, parse_arg_list, parse_expression,
    parse_named_expression, parse_parameters, parse_star_expressions, parse_target,
    parse_target_list, parse_yield_expression,
};
use super::patterns::parse_case_patterns;
use crate::parser::syntax_kind::SyntaxKind;
use rowan::Checkpoint;

/// Statement-level parser operations on top of [`ExpressionParser`].
pub trait StatementParser: ExpressionParser {
    /// Skip to the end of the logical line inside an ERROR node.
    fn recover_line(&mut self);
}

/// SOURCE_FILE root for a module
pub fn parse_file<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::SOURCE_FILE);
    while !p.at_eof() {
        parse_statement_with_progress(p);
    }
    p.skip_trivia();
    p.finish_node();
}

/// SOURCE_FILE root holding exactly one expression
pub fn parse_expression_root<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::SOURCE_FILE);
    if !parse_expression(p) {
        p.error("expected expression");
    }
    p.eat(SyntaxKind::NEWLINE);
    if !p.at_eof() {
        p.error("unexpected token after expression");
        while !p.at_eof() {
            p.bump();
        }
    }
    p.skip_trivia();
    p.finish_node();
}

fn parse_statement_with_progress<P: StatementParser>(p: &mut P) {
    let before = p.get_pos();
    parse_statement(p);
    if p.get_pos() == before && !p.at_eof() {
        p.error_and_bump("invalid syntax");
    }
}

fn parse_statement<P: StatementParser>(p: &mut P) {
    match p.current_kind() {
        SyntaxKind::NEWLINE => p.bump(),
        SyntaxKind::INDENT => {
            p.error("unexpected indent");
            p.start_node(SyntaxKind::ERROR);
            p.bump();
            while !p.at(SyntaxKind::DEDENT) && !p.at_eof() {
                parse_statement_with_progress(p);
            }
            p.eat(SyntaxKind::DEDENT);
            p.finish_node();
        }
        SyntaxKind::DEDENT => p.error_and_bump("unexpected dedent"),
        SyntaxKind::AT => parse_decorated(p),
        SyntaxKind::DEF_KW => {
            let checkpoint = p.checkpoint();
            parse_function_def(p, checkpoint);
        }
        SyntaxKind::CLASS_KW => {
            let checkpoint = p.checkpoint();
            parse_class_def(p, checkpoint);
        }
        SyntaxKind::ASYNC_KW => match p.nth(1) {
            SyntaxKind::DEF_KW => {
                let checkpoint = p.checkpoint();
                parse_function_def(p, checkpoint);
            }
            SyntaxKind::FOR_KW => parse_for(p),
            SyntaxKind::WITH_KW => parse_with(p),
            _ => {
                p.error("expected 'def', 'for' or 'with' after 'async'");
                p.recover_line();
            }
        },
        SyntaxKind::IF_KW => parse_if(p),
        SyntaxKind::WHILE_KW => parse_while(p),
        SyntaxKind::FOR_KW => parse_for(p),
        SyntaxKind::TRY_KW => parse_try(p),
        SyntaxKind::WITH_KW => parse_with(p),
        SyntaxKind::IDENT if p.current_text() == "match" && at_match_statement(p) => parse_match(p),
        _ => parse_simple_statements(p),
    }
}

/// simple_stmt (';' simple_stmt)* [';'] NEWLINE
fn parse_simple_statements<P: StatementParser>(p: &mut P) {
    loop {
        if !parse_simple_statement(p) {
            p.error("invalid syntax");
            p.recover_line();
            return;
        }
        if !p.eat(SyntaxKind::SEMICOLON) {
            break;
        }
        if p.at(SyntaxKind::NEWLINE) || p.at_eof() {
            break;
        }
    }
    if !p.eat(SyntaxKind::NEWLINE) && !p.at_eof() {
        p.error("invalid syntax");
        p.recover_line();
    }
}

fn parse_simple_statement<P: StatementParser>(p: &mut P) -> bool {
    match p.current_kind() {
        SyntaxKind::PASS_KW => keyword_statement(p, SyntaxKind::PASS_STMT),
        SyntaxKind::BREAK_KW => keyword_statement(p, SyntaxKind::BREAK_STMT),
        SyntaxKind::CONTINUE_KW => keyword_statement(p, SyntaxKind::CONTINUE_STMT),
        SyntaxKind::RETURN_KW => {
            p.start_node(SyntaxKind::RETURN_STMT);
            p.bump();
            if at_expression_start(p) {
                parse_star_expressions(p);
            }
            p.finish_node();
        }
        SyntaxKind::RAISE_KW => {
            p.start_node(SyntaxKind::RAISE_STMT);
            p.bump();
            if at_expression_start(p) {
                parse_expression(p);
                if p.eat(SyntaxKind::FROM_KW) && !parse_expression(p) {
                    p.error("expected expression after 'from'");
                }
            }
            p.finish_node();
        }
        SyntaxKind::DEL_KW => {
            p.start_node(SyntaxKind::DEL_STMT);
            p.bump();
            if !parse_target_list(p) {
                p.error("expected target after 'del'");
            }
            p.finish_node();
        }
        SyntaxKind::GLOBAL_KW => name_list_statement(p, SyntaxKind::GLOBAL_STMT),
        SyntaxKind::NONLOCAL_KW => name_list_statement(p, SyntaxKind::NONLOCAL_STMT),
        SyntaxKind::ASSERT_KW => {
            p.start_node(SyntaxKind::ASSERT_STMT);
            p.bump();
            if !parse_expression(p) {
                p.error("expected expression after 'assert'");
            }
            if p.eat(SyntaxKind::COMMA) && !parse_expression(p) {
                p.error("expected message after ','");
            }
            p.finish_node();
        }
        SyntaxKind::IMPORT_KW => parse_import(p),
        SyntaxKind::FROM_KW => parse_import_from(p),
        SyntaxKind::IDENT if p.current_text() == "type" && at_type_alias(p) => parse_type_alias(p),
        SyntaxKind::YIELD_KW => parse_expression_statement(p),
        _ if at_expression_start(p) => parse_expression_statement(p),
        _ => return false,
    }
    true
}

fn keyword_statement<P: StatementParser>(p: &mut P, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump();
    p.finish_node();
}

fn name_list_statement<P: StatementParser>(p: &mut P, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump();
    p.expect(SyntaxKind::IDENT);
    while p.eat(SyntaxKind::COMMA) {
        p.expect(SyntaxKind::IDENT);
    }
    p.finish_node();
}

/// Right-hand side of an assignment: a yield expression or star_expressions.
fn parse_assignment_value<P: StatementParser>(p: &mut P) {
    if p.at(SyntaxKind::YIELD_KW) {
        parse_yield_expression(p);
    } else if !parse_star_expressions(p) {
        p.error("expected expression");
    }
}

/// EXPR_STMT, ASSIGN_STMT, ANN_ASSIGN_STMT or AUG_ASSIGN_STMT, decided after the first expression.
fn parse_expression_statement<P: StatementParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    if p.at(SyntaxKind::YIELD_KW) {
        parse_yield_expression(p);
    } else {
        parse_star_expressions(p);
    }

    if p.at(SyntaxKind::COLON) {
        p.start_node_at(checkpoint, SyntaxKind::ANN_ASSIGN_STMT);
        parse_annotation(p);
        if p.eat(SyntaxKind::EQ) {
            parse_assignment_value(p);
        }
        p.finish_node();
    } else if p.current_kind().is_augmented_assign() {
        p.start_node_at(checkpoint, SyntaxKind::AUG_ASSIGN_STMT);
        p.bump();
        parse_assignment_value(p);
        p.finish_node();
    } else if p.at(SyntaxKind::EQ) {
        p.start_node_at(checkpoint, SyntaxKind::ASSIGN_STMT);
        while p.eat(SyntaxKind::EQ) {
            parse_assignment_value(p);
        }
        p.finish_node();
    } else {
        p.start_node_at(checkpoint, SyntaxKind::EXPR_STMT);
        p.finish_node();
    }
}

// =============================================================================
// Imports
// =============================================================================

/// `import a.b as c, d`
fn parse_import<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::IMPORT_STMT);
    p.bump(); // import
    parse_import_alias(p, true);
    while p.eat(SyntaxKind::COMMA) {
        parse_import_alias(p, true);
    }
    p.finish_node();
}

/// `from ..pkg.mod import a as b, c`, `from . import (a, b,)`, `from m import *`
fn parse_import_from<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::IMPORT_FROM_STMT);
    p.bump(); // from
    let mut has_dots = false;
    while p.at_any(&[SyntaxKind::DOT, SyntaxKind::ELLIPSIS]) {
        p.bump();
        has_dots = true;
    }
    if p.at(SyntaxKind::IDENT) {
        parse_dotted_name(p);
    } else if !has_dots {
        p.error("expected module name");
    }
    if p.expect(SyntaxKind::IMPORT_KW) {
        if p.at(SyntaxKind::STAR) {
            p.bump();
        } else if p.eat(SyntaxKind::L_PAREN) {
            parse_import_alias(p, false);
            while p.eat(SyntaxKind::COMMA) {
                if p.at(SyntaxKind::R_PAREN) {
                    break;
                }
                parse_import_alias(p, false);
            }
            p.expect(SyntaxKind::R_PAREN);
        } else {
            parse_import_alias(p, false);
            while p.eat(SyntaxKind::COMMA) {
                parse_import_alias(p, false);
            }
        }
    }
    p.finish_node();
}

fn parse_import_alias<P: StatementParser>(p: &mut P, dotted: bool) {
    p.start_node(SyntaxKind::IMPORT_ALIAS);
    if !p.at(SyntaxKind::IDENT) {
        p.error("expected name to import");
    } else if dotted {
        parse_dotted_name(p);
    } else {
        p.start_node(SyntaxKind::DOTTED_NAME);
        p.bump();
        p.finish_node();
    }
    if p.eat(SyntaxKind::AS_KW) {
        p.expect(SyntaxKind::IDENT);
    }
    p.finish_node();
}

fn parse_dotted_name<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::DOTTED_NAME);
    p.expect(SyntaxKind::IDENT);
    while p.at(SyntaxKind::DOT) && p.nth(1) == SyntaxKind::IDENT {
        p.bump();
        p.bump();
    }
    p.finish_node();
}

// =============================================================================
// Type aliases and type parameters
// =============================================================================

/// `type X = ...` / `type X[T] = ...` (soft keyword)
fn at_type_alias<P: StatementParser>(p: &P) -> bool {
    p.nth(1) == SyntaxKind::IDENT && matches!(p.nth(2), SyntaxKind::EQ | SyntaxKind::L_BRACKET)
}

fn parse_type_alias<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::TYPE_ALIAS_STMT);
    p.bump(); // type
    p.expect(SyntaxKind::IDENT);
    if p.at(SyntaxKind::L_BRACKET) {
        parse_type_params(p);
    }
    if p.expect(SyntaxKind::EQ) && !parse_expression(p) {
        p.error("expected type expression");
    }
    p.finish_node();
}

/// TYPE_PARAM_LIST: `[T, *Ts, **P, U: int = str]`
fn parse_type_params<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::TYPE_PARAM_LIST);
    p.bump(); // [
    while !p.at(SyntaxKind::R_BRACKET) && !p.at_eof() {
        p.start_node(SyntaxKind::TYPE_PARAM);
        if !p.eat(SyntaxKind::STAR) {
            p.eat(SyntaxKind::STAR_STAR);
        }
        if p.expect(SyntaxKind::IDENT) {
            if p.at(SyntaxKind::COLON) {
                parse_annotation(p);
            }
            if p.at(SyntaxKind::EQ) {
                p.start_node(SyntaxKind::DEFAULT_VALUE);
                p.bump();
                if !parse_expression(p) {
                    p.error("expected default type");
                }
                p.finish_node();
            }
        }
        p.finish_node();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.finish_node();
}

// =============================================================================
// Blocks and compound statements
// =============================================================================

/// BLOCK after a `:`: an indented suite or statements on the same line.
fn parse_block<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::BLOCK);
    if p.eat(SyntaxKind::NEWLINE) {
        if p.eat(SyntaxKind::INDENT) {
            while !p.at(SyntaxKind::DEDENT) && !p.at_eof() {
                parse_statement_with_progress(p);
            }
            p.eat(SyntaxKind::DEDENT);
        } else {
            p.error("expected an indented block");
        }
    } else if p.at_eof() {
        p.error("expected an indented block");
    } else {
        parse_simple_statements(p);
    }
    p.finish_node();
}

/// `:` followed by a block
fn parse_suite<P: StatementParser>(p: &mut P) {
    if p.expect(SyntaxKind::COLON) {
        parse_block(p);
    } else {
        p.recover_line();
    }
}

fn parse_decorated<P: StatementParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    while p.at(SyntaxKind::AT) {
        p.start_node(SyntaxKind::DECORATOR);
        p.bump(); // @
        if !parse_named_expression(p) {
            p.error("expected decorator expression");
        }
        if !p.eat(SyntaxKind::NEWLINE) {
            p.error("expected newline after decorator");
            p.recover_line();
        }
        p.finish_node();
    }
    match p.current_kind() {
        SyntaxKind::DEF_KW => parse_function_def(p, checkpoint),
        SyntaxKind::ASYNC_KW if p.nth(1) == SyntaxKind::DEF_KW => parse_function_def(p, checkpoint),
        SyntaxKind::CLASS_KW => parse_class_def(p, checkpoint),
        _ => {
            p.error("expected function or class definition after decorator");
            p.start_node_at(checkpoint, SyntaxKind::ERROR);
            p.finish_node();
        }
    }
}

/// FUNCTION_DEF: decorators, `async`, `def NAME[T](params) -> ret:` block
fn parse_function_def<P: StatementParser>(p: &mut P, checkpoint: Checkpoint) {
    p.start_node_at(checkpoint, SyntaxKind::FUNCTION_DEF);
    p.eat(SyntaxKind::ASYNC_KW);
    p.bump(); // def
    p.expect(SyntaxKind::IDENT);
    if p.at(SyntaxKind::L_BRACKET) {
        parse_type_params(p);
    }
    if p.at(SyntaxKind::L_PAREN) {
        p.start_node(SyntaxKind::PARAM_LIST);
        p.bump(); // (
        parse_parameters(p, SyntaxKind::R_PAREN, true);
        p.expect(SyntaxKind::R_PAREN);
        p.finish_node();
    } else {
        p.error("expected '('");
    }
    if p.at(SyntaxKind::ARROW) {
        p.start_node(SyntaxKind::RETURN_TYPE);
        p.bump(); // ->
        if !parse_expression(p) {
            p.error("expected return annotation");
        }
        p.finish_node();
    }
    parse_suite(p);
    p.finish_node();
}

/// CLASS_DEF: decorators, `class NAME[T](bases, kw=v):` block
fn parse_class_def<P: StatementParser>(p: &mut P, checkpoint: Checkpoint) {
    p.start_node_at(checkpoint, SyntaxKind::CLASS_DEF);
    p.bump(); // class
    p.expect(SyntaxKind::IDENT);
    if p.at(SyntaxKind::L_BRACKET) {
        parse_type_params(p);
    }
    if p.at(SyntaxKind::L_PAREN) {
        parse_arg_list(p);
    }
    parse_suite(p);
    p.finish_node();
}

fn parse_if<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::IF_STMT);
    p.bump(); // if
    condition(p);
    parse_suite(p);
    while p.at(SyntaxKind::ELIF_KW) {
        p.start_node(SyntaxKind::ELIF_CLAUSE);
        p.bump();
        condition(p);
        parse_suite(p);
        p.finish_node();
    }
    parse_else_clause(p);
    p.finish_node();
}

fn condition<P: StatementParser>(p: &mut P) {
    if !parse_named_expression(p) {
        p.error("expected condition");
    }
}

fn parse_else_clause<P: StatementParser>(p: &mut P) {
    if p.at(SyntaxKind::ELSE_KW) {
        p.start_node(SyntaxKind::ELSE_CLAUSE);
        p.bump();
        parse_suite(p);
        p.finish_node();
    }
}

fn parse_while<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::WHILE_STMT);
    p.bump(); // while
    condition(p);
    parse_suite(p);
    parse_else_clause(p);
    p.finish_node();
}

fn parse_for<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::FOR_STMT);
    p.eat(SyntaxKind::ASYNC_KW);
    p.bump(); // for
    if !parse_target_list(p) {
        p.error("expected loop target");
    }
    if p.expect(SyntaxKind::IN_KW) && !parse_star_expressions(p) {
        p.error("expected iterable");
    }
    parse_suite(p);
    parse_else_clause(p);
    p.finish_node();
}

fn parse_try<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::TRY_STMT);
    p.bump(); // try
    parse_suite(p);
    let mut handlers = 0;
    while p.at(SyntaxKind::EXCEPT_KW) {
        handlers += 1;
        p.start_node(SyntaxKind::EXCEPT_CLAUSE);
        p.bump(); // except
        p.eat(SyntaxKind::STAR);
        if !p.at(SyntaxKind::COLON) {
            if !parse_expression(p) {
                p.error("expected exception type");
            }
            while p.eat(SyntaxKind::COMMA) {
                parse_expression(p);
            }
            if p.eat(SyntaxKind::AS_KW) {
                p.expect(SyntaxKind::IDENT);
            }
        }
        parse_suite(p);
        p.finish_node();
    }
    parse_else_clause(p);
    let has_finally = p.at(SyntaxKind::FINALLY_KW);
    if has_finally {
        p.start_node(SyntaxKind::FINALLY_CLAUSE);
        p.bump();
        parse_suite(p);
        p.finish_node();
    }
    if handlers == 0 && !has_finally {
        p.error("expected 'except' or 'finally' block");
    }
    p.finish_node();
}

fn parse_with<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::WITH_STMT);
    p.eat(SyntaxKind::ASYNC_KW);
    p.bump(); // with
    if p.at(SyntaxKind::L_PAREN) && at_parenthesized_with_items(p) {
        p.bump(); // (
        while !p.at(SyntaxKind::R_PAREN) && !p.at_eof() {
            parse_with_item(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        p.expect(SyntaxKind::R_PAREN);
    } else {
        parse_with_item(p);
        while p.eat(SyntaxKind::COMMA) {
            parse_with_item(p);
        }
    }
    parse_suite(p);
    p.finish_node();
}

/// `with (a as b, c):` groups items; `with (a) as b:` is an ordinary expression.
fn at_parenthesized_with_items<P: StatementParser>(p: &P) -> bool {
    let mut depth = 0usize;
    let mut n = 0;
    loop {
        match p.nth(n) {
            SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
            SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return p.nth(n + 1) == SyntaxKind::COLON;
                }
            }
            SyntaxKind::NEWLINE | SyntaxKind::ERROR => return false,
            _ => {}
        }
        n += 1;
    }
}

fn parse_with_item<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::WITH_ITEM);
    if !parse_expression(p) {
        p.error("expected context manager");
    }
    if p.eat(SyntaxKind::AS_KW) && !parse_target(p) {
        p.error("expected target after 'as'");
    }
    p.finish_node();
}

// =============================================================================
// match statement
// =============================================================================

/// `match` is a statement when its logical line ends in `:` and the indented
/// block starts with `case`.
fn at_match_statement<P: StatementParser>(p: &P) -> bool {
    if matches!(
        p.nth(1),
        SyntaxKind::EQ | SyntaxKind::DOT | SyntaxKind::COLON | SyntaxKind::NEWLINE
    ) || p.nth(1).is_augmented_assign()
    {
        return false;
    }
    let mut n = 1;
    loop {
        match p.nth(n) {
            SyntaxKind::NEWLINE => {
                return p.nth(n - 1) == SyntaxKind::COLON
                    && p.nth(n + 1) == SyntaxKind::INDENT
                    && p.nth(n + 2) == SyntaxKind::IDENT
                    && p.nth_text(n + 2) == "case";
            }
            SyntaxKind::ERROR => return false,
            _ => n += 1,
        }
    }
}

fn parse_match<P: StatementParser>(p: &mut P) {
    p.start_node(SyntaxKind::MATCH_STMT);
    p.bump(); // match
    if !parse_star_expressions(p) {
        p.error("expected match subject");
    }
    p.expect(SyntaxKind::COLON);
    p.expect(SyntaxKind::NEWLINE);
    p.expect(SyntaxKind::INDENT);
    while p.at(SyntaxKind::IDENT) && p.current_text() == "case" {
        p.start_node(SyntaxKind::CASE_CLAUSE);
        p.bump(); // case
        parse_case_patterns(p);
        if p.at(SyntaxKind::IF_KW) {
            p.start_node(SyntaxKind::GUARD);
            p.bump();
            condition(p);
            p.finish_node();
        }
        parse_suite(p);
        p.finish_node();
    }
    if !p.eat(SyntaxKind::DEDENT) && !p.at_eof() {
        p.error("expected 'case' block");
        while !p.at(SyntaxKind::DEDENT) && !p.at_eof() {
            parse_statement_with_progress(p);
        }
        p.eat(SyntaxKind::DEDENT);
    }
    p.finish_node();
}
