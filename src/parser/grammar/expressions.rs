//! Expression parsing for Python
//!
//! This module implements the expression precedence chain:
//!
//! ```text
//! expression → lambda | disjunction ['if' disjunction 'else' expression]
//!     → disjunction ('or') → conjunction ('and') → inversion ('not')
//!     → comparison → bitwise_or → bitwise_xor → bitwise_and → shift
//!     → sum → term → factor (unary) → power → await_primary
//!     → primary (attribute, call, subscript trailers) → atom
//! ```
//!
//! Binary levels are left-associative and built with rowan checkpoints, so
//! `a | b | c` nests as `BIN_EXPR(BIN_EXPR(a | b) | c)`.

use crate::parser::syntax_kind::SyntaxKind;
use rowan::Checkpoint;

/// Trait for expression parsing operations
///
/// This trait defines the interface between the expression parser and the main parser.
/// The main parser implements this trait to provide the necessary infrastructure.
/// Inspection methods look past trivia; consumption methods attach pending
/// trivia to the currently open node first.
pub trait ExpressionParser {
    // Token inspection
    fn current_kind(&self) -> SyntaxKind;
    fn current_text(&self) -> &str;
    fn at(&self, kind: SyntaxKind) -> bool;
    fn at_any(&self, kinds: &[SyntaxKind]) -> bool;
    fn at_eof(&self) -> bool;

    /// Peek at the kind of the nth token ahead (skipping trivia)
    fn nth(&self, n: usize) -> SyntaxKind;
    fn nth_text(&self, n: usize) -> &str;

    // Position tracking
    fn get_pos(&self) -> usize;

    // Token consumption
    fn skip_trivia(&mut self);
    fn bump(&mut self);
    fn eat(&mut self, kind: SyntaxKind) -> bool;
    fn expect(&mut self, kind: SyntaxKind) -> bool;

    // Node building
    fn checkpoint(&mut self) -> Checkpoint;
    fn start_node(&mut self, kind: SyntaxKind);
    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind);
    fn finish_node(&mut self);

    // Errors
    fn error(&mut self, message: impl Into<String>);
    fn error_and_bump(&mut self, message: impl Into<String>);
}

const COMPARE_OPS: &[SyntaxKind] = &[
    SyntaxKind::LT,
    SyntaxKind::GT,
    SyntaxKind::EQ_EQ,
    SyntaxKind::LT_EQ,
    SyntaxKind::GT_EQ,
    SyntaxKind::BANG_EQ,
    SyntaxKind::IN_KW,
    SyntaxKind::IS_KW,
];

const LITERAL_TOKENS: &[SyntaxKind] = &[
    SyntaxKind::INT_NUMBER,
    SyntaxKind::FLOAT_NUMBER,
    SyntaxKind::IMAG_NUMBER,
    SyntaxKind::NONE_KW,
    SyntaxKind::TRUE_KW,
    SyntaxKind::FALSE_KW,
    SyntaxKind::ELLIPSIS,
];

/// Can an expression start at the current token?
pub fn at_expression_start<P: ExpressionParser>(p: &P) -> bool {
    p.at_any(&[
        SyntaxKind::IDENT,
        SyntaxKind::STRING,
        SyntaxKind::L_PAREN,
        SyntaxKind::L_BRACKET,
        SyntaxKind::L_BRACE,
        SyntaxKind::MINUS,
        SyntaxKind::PLUS,
        SyntaxKind::TILDE,
        SyntaxKind::NOT_KW,
        SyntaxKind::LAMBDA_KW,
        SyntaxKind::AWAIT_KW,
        SyntaxKind::STAR,
    ]) || p.at_any(LITERAL_TOKENS)
}

fn at_comprehension<P: ExpressionParser>(p: &P) -> bool {
    p.at(SyntaxKind::FOR_KW) || (p.at(SyntaxKind::ASYNC_KW) && p.nth(1) == SyntaxKind::FOR_KW)
}

/// Parse an expression, returning true if any tokens were consumed
/// expression = lambda | disjunction ['if' disjunction 'else' expression]
pub fn parse_expression<P: ExpressionParser>(p: &mut P) -> bool {
    if p.at(SyntaxKind::LAMBDA_KW) {
        parse_lambda(p);
        return true;
    }
    let checkpoint = p.checkpoint();
    if !parse_disjunction(p) {
        return false;
    }
    if p.at(SyntaxKind::IF_KW) {
        p.start_node_at(checkpoint, SyntaxKind::TERNARY_EXPR);
        p.bump(); // if
        if !parse_disjunction(p) {
            p.error("expected condition after 'if'");
        }
        if p.expect(SyntaxKind::ELSE_KW) && !parse_expression(p) {
            p.error("expected expression after 'else'");
        }
        p.finish_node();
    }
    true
}

/// named_expression = IDENT ':=' expression | expression
pub fn parse_named_expression<P: ExpressionParser>(p: &mut P) -> bool {
    if p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::COLON_EQ {
        p.start_node(SyntaxKind::NAMED_EXPR);
        p.start_node(SyntaxKind::NAME_EXPR);
        p.bump();
        p.finish_node();
        p.bump(); // :=
        if !parse_expression(p) {
            p.error("expected expression after ':='");
        }
        p.finish_node();
        return true;
    }
    parse_expression(p)
}

/// star_named_expression = '*' bitwise_or | named_expression
pub fn parse_star_named_expression<P: ExpressionParser>(p: &mut P) -> bool {
    if p.at(SyntaxKind::STAR) {
        parse_starred(p);
        return true;
    }
    parse_named_expression(p)
}

fn parse_star_expression<P: ExpressionParser>(p: &mut P) -> bool {
    if p.at(SyntaxKind::STAR) {
        parse_starred(p);
        return true;
    }
    parse_expression(p)
}

fn parse_starred<P: ExpressionParser>(p: &mut P) {
    p.start_node(SyntaxKind::STARRED_EXPR);
    p.bump(); // *
    if !parse_bitwise_or(p) {
        p.error("expected expression after '*'");
    }
    p.finish_node();
}

/// star_expressions = star_expression (',' star_expression)* [',']
///
/// A comma turns the sequence into an unparenthesized TUPLE_EXPR.
pub fn parse_star_expressions<P: ExpressionParser>(p: &mut P) -> bool {
    let checkpoint = p.checkpoint();
    if !parse_star_expression(p) {
        return false;
    }
    if p.at(SyntaxKind::COMMA) {
        p.start_node_at(checkpoint, SyntaxKind::TUPLE_EXPR);
        while p.eat(SyntaxKind::COMMA) {
            if !at_expression_start(p) {
                break;
            }
            parse_star_expression(p);
        }
        p.finish_node();
    }
    true
}

/// Assignment and loop targets: `a`, `a.b`, `a[0]`, `*rest`, `a, (b, c)`.
///
/// Parsed at bitwise-or level so that `for x in xs` does not read `x in xs`
/// as a comparison.
pub fn parse_target_list<P: ExpressionParser>(p: &mut P) -> bool {
    let checkpoint = p.checkpoint();
    if !parse_target(p) {
        return false;
    }
    if p.at(SyntaxKind::COMMA) {
        p.start_node_at(checkpoint, SyntaxKind::TUPLE_EXPR);
        while p.eat(SyntaxKind::COMMA) {
            if !p.at_any(&[
                SyntaxKind::IDENT,
                SyntaxKind::L_PAREN,
                SyntaxKind::L_BRACKET,
                SyntaxKind::STAR,
            ]) {
                break;
            }
            parse_target(p);
        }
        p.finish_node();
    }
    true
}

/// A single star-target; stops before a top-level comma.
pub fn parse_target<P: ExpressionParser>(p: &mut P) -> bool {
    if p.at(SyntaxKind::STAR) {
        parse_starred(p);
        return true;
    }
    parse_bitwise_or(p)
}

/// yield_expr = 'yield' 'from' expression | 'yield' [star_expressions]
pub fn parse_yield_expression<P: ExpressionParser>(p: &mut P) {
    p.start_node(SyntaxKind::YIELD_EXPR);
    p.bump(); // yield
    if p.eat(SyntaxKind::FROM_KW) {
        if !parse_expression(p) {
            p.error("expected expression after 'yield from'");
        }
    } else if at_expression_start(p) {
        parse_star_expressions(p);
    }
    p.finish_node();
}

fn parse_lambda<P: ExpressionParser>(p: &mut P) {
    p.start_node(SyntaxKind::LAMBDA_EXPR);
    p.bump(); // lambda
    p.start_node(SyntaxKind::PARAM_LIST);
    if !p.at(SyntaxKind::COLON) {
        parse_parameters(p, SyntaxKind::COLON, false);
    }
    p.finish_node();
    if p.expect(SyntaxKind::COLON) && !parse_expression(p) {
        p.error("expected expression in lambda body");
    }
    p.finish_node();
}

// =============================================================================
// Boolean and comparison levels
// =============================================================================

fn parse_disjunction<P: ExpressionParser>(p: &mut P) -> bool {
    parse_bool_chain(p, SyntaxKind::OR_KW, parse_conjunction)
}

fn parse_conjunction<P: ExpressionParser>(p: &mut P) -> bool {
    parse_bool_chain(p, SyntaxKind::AND_KW, parse_inversion)
}

fn parse_bool_chain<P: ExpressionParser>(
    p: &mut P,
    op: SyntaxKind,
    operand: fn(&mut P) -> bool,
) -> bool {
    let checkpoint = p.checkpoint();
    if !operand(p) {
        return false;
    }
    if p.at(op) {
        p.start_node_at(checkpoint, SyntaxKind::BOOL_EXPR);
        while p.eat(op) {
            if !operand(p) {
                p.error("expected expression after boolean operator");
                break;
            }
        }
        p.finish_node();
    }
    true
}

fn parse_inversion<P: ExpressionParser>(p: &mut P) -> bool {
    if p.at(SyntaxKind::NOT_KW) {
        p.start_node(SyntaxKind::UNARY_EXPR);
        p.bump();
        if !parse_inversion(p) {
            p.error("expected expression after 'not'");
        }
        p.finish_node();
        return true;
    }
    parse_comparison(p)
}

fn at_compare_op<P: ExpressionParser>(p: &P) -> bool {
    p.at_any(COMPARE_OPS) || (p.at(SyntaxKind::NOT_KW) && p.nth(1) == SyntaxKind::IN_KW)
}

fn parse_comparison<P: ExpressionParser>(p: &mut P) -> bool {
    let checkpoint = p.checkpoint();
    if !parse_bitwise_or(p) {
        return false;
    }
    if at_compare_op(p) {
        p.start_node_at(checkpoint, SyntaxKind::COMPARE_EXPR);
        while at_compare_op(p) {
            if p.at(SyntaxKind::NOT_KW) {
                p.bump(); // not
                p.bump(); // in
            } else if p.eat(SyntaxKind::IS_KW) {
                p.eat(SyntaxKind::NOT_KW);
            } else {
                p.bump();
            }
            if !parse_bitwise_or(p) {
                p.error("expected expression after comparison operator");
                break;
            }
        }
        p.finish_node();
    }
    true
}

// =============================================================================
// Binary operator levels
// =============================================================================

/// bitwise_or = bitwise_xor ('|' bitwise_xor)*
pub fn parse_bitwise_or<P: ExpressionParser>(p: &mut P) -> bool {
    parse_left_assoc(p, &[SyntaxKind::PIPE], parse_bitwise_xor)
}

fn parse_bitwise_xor<P: ExpressionParser>(p: &mut P) -> bool {
    parse_left_assoc(p, &[SyntaxKind::CARET], parse_bitwise_and)
}

fn parse_bitwise_and<P: ExpressionParser>(p: &mut P) -> bool {
    parse_left_assoc(p, &[SyntaxKind::AMP], parse_shift)
}

fn parse_shift<P: ExpressionParser>(p: &mut P) -> bool {
    parse_left_assoc(p, &[SyntaxKind::LT_LT, SyntaxKind::GT_GT], parse_sum)
}

/// sum = term (('+' | '-') term)*
///
/// Also the entry point for literal values in `match` patterns (`-1`, `1 + 2j`).
pub fn parse_sum<P: ExpressionParser>(p: &mut P) -> bool {
    parse_left_assoc(p, &[SyntaxKind::PLUS, SyntaxKind::MINUS], parse_term)
}

fn parse_term<P: ExpressionParser>(p: &mut P) -> bool {
    parse_left_assoc(
        p,
        &[
            SyntaxKind::STAR,
            SyntaxKind::SLASH,
            SyntaxKind::SLASH_SLASH,
            SyntaxKind::PERCENT,
            SyntaxKind::AT,
        ],
        parse_factor,
    )
}

fn parse_left_assoc<P: ExpressionParser>(
    p: &mut P,
    ops: &[SyntaxKind],
    operand: fn(&mut P) -> bool,
) -> bool {
    let checkpoint = p.checkpoint();
    if !operand(p) {
        return false;
    }
    while p.at_any(ops) {
        p.start_node_at(checkpoint, SyntaxKind::BIN_EXPR);
        p.bump(); // operator
        if !operand(p) {
            p.error("expected expression after operator");
        }
        p.finish_node();
    }
    true
}

fn parse_factor<P: ExpressionParser>(p: &mut P) -> bool {
    if p.at_any(&[SyntaxKind::PLUS, SyntaxKind::MINUS, SyntaxKind::TILDE]) {
        p.start_node(SyntaxKind::UNARY_EXPR);
        p.bump();
        if !parse_factor(p) {
            p.error("expected expression after unary operator");
        }
        p.finish_node();
        return true;
    }
    parse_power(p)
}

/// power = await_primary ['**' factor]
fn parse_power<P: ExpressionParser>(p: &mut P) -> bool {
    let checkpoint = p.checkpoint();
    if !parse_await_primary(p) {
        return false;
    }
    if p.at(SyntaxKind::STAR_STAR) {
        p.start_node_at(checkpoint, SyntaxKind::BIN_EXPR);
        p.bump();
        if !parse_factor(p) {
            p.error("expected expression after '**'");
        }
        p.finish_node();
    }
    true
}

fn parse_await_primary<P: ExpressionParser>(p: &mut P) -> bool {
    if p.at(SyntaxKind::AWAIT_KW) {
        p.start_node(SyntaxKind::AWAIT_EXPR);
        p.bump();
        if !parse_primary(p) {
            p.error("expected expression after 'await'");
        }
        p.finish_node();
        return true;
    }
    parse_primary(p)
}

// =============================================================================
// Primaries and atoms
// =============================================================================

/// primary = atom ('.' IDENT | '(' arguments ')' | '[' slices ']')*
pub fn parse_primary<P: ExpressionParser>(p: &mut P) -> bool {
    let checkpoint = p.checkpoint();
    if !parse_atom(p) {
        return false;
    }
    loop {
        match p.current_kind() {
            SyntaxKind::DOT => {
                p.start_node_at(checkpoint, SyntaxKind::ATTRIBUTE_EXPR);
                p.bump(); // .
                if !p.eat(SyntaxKind::IDENT) {
                    p.error("expected attribute name after '.'");
                }
                p.finish_node();
            }
            SyntaxKind::L_PAREN => {
                p.start_node_at(checkpoint, SyntaxKind::CALL_EXPR);
                parse_arg_list(p);
                p.finish_node();
            }
            SyntaxKind::L_BRACKET => {
                p.start_node_at(checkpoint, SyntaxKind::SUBSCRIPT_EXPR);
                parse_subscript(p);
                p.finish_node();
            }
            _ => break,
        }
    }
    true
}

fn parse_atom<P: ExpressionParser>(p: &mut P) -> bool {
    if p.at_eof() {
        return false;
    }
    match p.current_kind() {
        SyntaxKind::IDENT => {
            p.start_node(SyntaxKind::NAME_EXPR);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::STRING => {
            p.start_node(SyntaxKind::STRING_EXPR);
            while p.at(SyntaxKind::STRING) {
                p.bump();
            }
            p.finish_node();
        }
        kind if LITERAL_TOKENS.contains(&kind) => {
            p.start_node(SyntaxKind::LITERAL_EXPR);
            p.bump();
            p.finish_node();
        }
        SyntaxKind::L_PAREN => parse_paren(p),
        SyntaxKind::L_BRACKET => parse_list(p),
        SyntaxKind::L_BRACE => parse_dict_or_set(p),
        _ => return false,
    }
    true
}

/// `()`, `(x)`, `(x,)`, `(x for x in y)`, `(yield x)`
fn parse_paren<P: ExpressionParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    p.bump(); // (
    let kind = if p.at(SyntaxKind::R_PAREN) {
        SyntaxKind::TUPLE_EXPR
    } else if p.at(SyntaxKind::YIELD_KW) {
        parse_yield_expression(p);
        SyntaxKind::PAREN_EXPR
    } else {
        if !parse_star_named_expression(p) {
            p.error("expected expression");
        }
        if at_comprehension(p) {
            parse_comp_clauses(p);
            SyntaxKind::PAREN_EXPR
        } else if p.at(SyntaxKind::COMMA) {
            parse_trailing_elements(p, SyntaxKind::R_PAREN);
            SyntaxKind::TUPLE_EXPR
        } else {
            SyntaxKind::PAREN_EXPR
        }
    };
    p.expect(SyntaxKind::R_PAREN);
    p.start_node_at(checkpoint, kind);
    p.finish_node();
}

/// `[]`, `[a, b]`, `[x for x in y]`
fn parse_list<P: ExpressionParser>(p: &mut P) {
    p.start_node(SyntaxKind::LIST_EXPR);
    p.bump(); // [
    if !p.at(SyntaxKind::R_BRACKET) {
        if !parse_star_named_expression(p) {
            p.error("expected expression");
        }
        if at_comprehension(p) {
            parse_comp_clauses(p);
        } else {
            parse_trailing_elements(p, SyntaxKind::R_BRACKET);
        }
    }
    p.expect(SyntaxKind::R_BRACKET);
    p.finish_node();
}

/// Remaining `, elem` items of a display, allowing a trailing comma.
fn parse_trailing_elements<P: ExpressionParser>(p: &mut P, close: SyntaxKind) {
    while p.eat(SyntaxKind::COMMA) {
        if p.at(close) || p.at_eof() {
            break;
        }
        if !parse_star_named_expression(p) {
            p.error("expected expression");
            break;
        }
    }
}

/// `{}`, `{k: v, **m}`, `{a, b}`, and their comprehension forms
fn parse_dict_or_set<P: ExpressionParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    p.bump(); // {
    let kind = if p.at(SyntaxKind::R_BRACE) {
        SyntaxKind::DICT_EXPR
    } else if parse_dict_item(p) {
        if at_comprehension(p) {
            parse_comp_clauses(p);
        } else {
            while p.eat(SyntaxKind::COMMA) {
                if p.at(SyntaxKind::R_BRACE) || p.at_eof() {
                    break;
                }
                if !parse_dict_item(p) {
                    p.error("expected ':' in dictionary entry");
                    break;
                }
            }
        }
        SyntaxKind::DICT_EXPR
    } else {
        if at_comprehension(p) {
            parse_comp_clauses(p);
        } else {
            parse_trailing_elements(p, SyntaxKind::R_BRACE);
        }
        SyntaxKind::SET_EXPR
    };
    p.expect(SyntaxKind::R_BRACE);
    p.start_node_at(checkpoint, kind);
    p.finish_node();
}

/// Parse `**m` or `k: v`; returns false (after parsing a set element) when no `:` follows.
fn parse_dict_item<P: ExpressionParser>(p: &mut P) -> bool {
    if p.at(SyntaxKind::STAR_STAR) {
        p.start_node(SyntaxKind::DOUBLE_STARRED_EXPR);
        p.bump();
        if !parse_bitwise_or(p) {
            p.error("expected expression after '**'");
        }
        p.finish_node();
        return true;
    }
    let checkpoint = p.checkpoint();
    if !parse_star_named_expression(p) {
        p.error("expected expression");
        return false;
    }
    if !p.at(SyntaxKind::COLON) {
        return false;
    }
    p.start_node_at(checkpoint, SyntaxKind::DICT_ENTRY);
    p.bump(); // :
    if !parse_expression(p) {
        p.error("expected expression after ':'");
    }
    p.finish_node();
    true
}

/// comp_for = ['async'] 'for' targets 'in' disjunction ('if' disjunction)*
fn parse_comp_clauses<P: ExpressionParser>(p: &mut P) {
    while at_comprehension(p) {
        p.start_node(SyntaxKind::COMP_CLAUSE);
        p.eat(SyntaxKind::ASYNC_KW);
        p.bump(); // for
        if !parse_target_list(p) {
            p.error("expected target in comprehension");
        }
        if p.expect(SyntaxKind::IN_KW) && !parse_disjunction(p) {
            p.error("expected iterable in comprehension");
        }
        while p.eat(SyntaxKind::IF_KW) {
            if !parse_disjunction(p) {
                p.error("expected condition in comprehension");
                break;
            }
        }
        p.finish_node();
    }
}

/// `[` slices `]`; multiple comma-separated items become a TUPLE_EXPR.
fn parse_subscript<P: ExpressionParser>(p: &mut P) {
    p.bump(); // [
    let checkpoint = p.checkpoint();
    parse_slice_item(p);
    if p.at(SyntaxKind::COMMA) {
        p.start_node_at(checkpoint, SyntaxKind::TUPLE_EXPR);
        while p.eat(SyntaxKind::COMMA) {
            if p.at(SyntaxKind::R_BRACKET) || p.at_eof() {
                break;
            }
            parse_slice_item(p);
        }
        p.finish_node();
    }
    p.expect(SyntaxKind::R_BRACKET);
}

fn parse_slice_item<P: ExpressionParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    let has_lower = !p.at(SyntaxKind::COLON) && parse_star_named_expression(p);
    if p.at(SyntaxKind::COLON) {
        p.start_node_at(checkpoint, SyntaxKind::SLICE_EXPR);
        p.bump(); // :
        let bound_end = [SyntaxKind::COLON, SyntaxKind::COMMA, SyntaxKind::R_BRACKET];
        if !p.at_any(&bound_end) {
            parse_expression(p);
        }
        if p.eat(SyntaxKind::COLON) && !p.at_any(&bound_end[1..]) {
            parse_expression(p);
        }
        p.finish_node();
    } else if !has_lower {
        p.error("expected subscript");
    }
}

/// ARG_LIST: `(` argument (`,` argument)* [`,`] `)`
pub fn parse_arg_list<P: ExpressionParser>(p: &mut P) {
    p.start_node(SyntaxKind::ARG_LIST);
    p.bump(); // (
    while !p.at(SyntaxKind::R_PAREN) && !p.at_eof() {
        let before = p.get_pos();
        parse_argument(p);
        if p.get_pos() == before {
            break;
        }
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

/// ARG: `expr`, `*expr`, `**expr`, `name=expr`, or a bare generator `x for x in y`
fn parse_argument<P: ExpressionParser>(p: &mut P) {
    p.start_node(SyntaxKind::ARG);
    if p.at_any(&[SyntaxKind::STAR, SyntaxKind::STAR_STAR]) {
        p.bump();
        if !parse_expression(p) {
            p.error("expected expression after unpacking operator");
        }
    } else if p.at(SyntaxKind::IDENT) && p.nth(1) == SyntaxKind::EQ {
        p.bump(); // name
        p.bump(); // =
        if !parse_expression(p) {
            p.error("expected expression after '='");
        }
    } else if parse_named_expression(p) {
        if at_comprehension(p) {
            parse_comp_clauses(p);
        }
    } else {
        p.error("expected argument");
    }
    p.finish_node();
}

// =============================================================================
// Parameters (shared by `def` and `lambda`)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParamShape {
    Slash,
    BareStar,
    Star,
    DoubleStar,
    Plain { has_default: bool },
    Invalid,
}

/// Parse PARAM nodes up to (not including) `terminator`, validating ordering
/// rules the way the language does at parse time.
pub fn parse_parameters<P: ExpressionParser>(p: &mut P, terminator: SyntaxKind, annotated: bool) {
    let mut seen_slash = false;
    let mut seen_star = false;
    let mut bare_star_pending = false;
    let mut seen_double_star = false;
    let mut seen_default = false;
    let mut seen_plain = false;

    while !p.at(terminator) && !p.at_eof() {
        if seen_double_star {
            p.error("arguments cannot follow var-keyword argument");
        }
        let shape = parse_param(p, annotated);
        match shape {
            ParamShape::Slash => {
                if seen_slash {
                    p.error("/ may appear only once");
                } else if seen_star {
                    p.error("/ must be ahead of *");
                } else if !seen_plain {
                    p.error("at least one argument must precede /");
                }
                seen_slash = true;
            }
            ParamShape::BareStar | ParamShape::Star => {
                if seen_star {
                    p.error("* argument may appear only once");
                }
                seen_star = true;
                bare_star_pending = shape == ParamShape::BareStar;
            }
            ParamShape::DoubleStar => {
                if bare_star_pending {
                    p.error("named arguments must follow bare *");
                }
                seen_double_star = true;
            }
            ParamShape::Plain { has_default } => {
                seen_plain = true;
                bare_star_pending = false;
                if has_default {
                    seen_default = true;
                } else if seen_default && !seen_star {
                    p.error("parameter without a default follows parameter with a default");
                }
            }
            ParamShape::Invalid => break,
        }
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    if bare_star_pending {
        p.error("named arguments must follow bare *");
    }
}

fn parse_param<P: ExpressionParser>(p: &mut P, annotated: bool) -> ParamShape {
    p.start_node(SyntaxKind::PARAM);
    let shape = match p.current_kind() {
        SyntaxKind::SLASH => {
            p.bump();
            ParamShape::Slash
        }
        SyntaxKind::STAR => {
            p.bump();
            if p.eat(SyntaxKind::IDENT) {
                if annotated && p.at(SyntaxKind::COLON) {
                    // `*args: *Ts` is allowed here
                    parse_annotation_with(p, parse_star_expression);
                }
                ParamShape::Star
            } else {
                ParamShape::BareStar
            }
        }
        SyntaxKind::STAR_STAR => {
            p.bump();
            p.expect(SyntaxKind::IDENT);
            if annotated && p.at(SyntaxKind::COLON) {
                parse_annotation(p);
            }
            ParamShape::DoubleStar
        }
        SyntaxKind::IDENT => {
            p.bump();
            if annotated && p.at(SyntaxKind::COLON) {
                parse_annotation(p);
            }
            let has_default = p.at(SyntaxKind::EQ);
            if has_default {
                p.start_node(SyntaxKind::DEFAULT_VALUE);
                p.bump(); // =
                if !parse_expression(p) {
                    p.error("expected default value");
                }
                p.finish_node();
            }
            ParamShape::Plain { has_default }
        }
        _ => {
            p.error("expected parameter");
            ParamShape::Invalid
        }
    };
    p.finish_node();
    shape
}

/// ANNOTATION: `:` expression
pub fn parse_annotation<P: ExpressionParser>(p: &mut P) {
    parse_annotation_with(p, parse_expression);
}

fn parse_annotation_with<P: ExpressionParser>(p: &mut P, expr: fn(&mut P) -> bool) {
    p.start_node(SyntaxKind::ANNOTATION);
    p.bump(); // :
    if !expr(p) {
        p.error("expected annotation");
    }
    p.finish_node();
}
