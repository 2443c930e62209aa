//! Conversion of expression syntax into raw annotations and literal kinds.

use crate::model::{Constant, LiteralKind, RawExpr};
use crate::parser::{AstNode, AstToken, Expr, SyntaxKind, TupleExpr, parse_expression};

/// Capture an expression verbatim for later normalization.
pub fn raw_expr(expr: &Expr) -> RawExpr {
    match expr {
        Expr::Name(name) => match name.text() {
            Some(text) => RawExpr::Name(text.into()),
            None => RawExpr::Unsupported("name"),
        },
        Expr::Attribute(attr) => match (attr.base(), attr.attr()) {
            (Some(base), Some(name)) => RawExpr::Attribute(Box::new(raw_expr(&base)), name.text().into()),
            _ => RawExpr::Unsupported("attribute"),
        },
        Expr::Subscript(sub) => {
            let Some(base) = sub.base() else {
                return RawExpr::Unsupported("subscript");
            };
            let items = match sub.index() {
                Some(Expr::Tuple(tuple)) => tuple_items(&tuple),
                Some(index) => vec![raw_expr(&index)],
                None => return RawExpr::Unsupported("subscript"),
            };
            RawExpr::Subscript(Box::new(raw_expr(&base)), items)
        }
        Expr::String(s) => {
            if s.is_bytes() {
                let text: Vec<String> = s.pieces().iter().map(|t| t.text().to_string()).collect();
                RawExpr::Bytes(text.join(" "))
            } else {
                match s.value() {
                    Some(value) => RawExpr::Str(value),
                    None => RawExpr::Unsupported("f-string"),
                }
            }
        }
        Expr::Literal(lit) => match lit.kind() {
            Some(SyntaxKind::NONE_KW) => RawExpr::Const(Constant::None),
            Some(SyntaxKind::TRUE_KW) => RawExpr::Const(Constant::True),
            Some(SyntaxKind::FALSE_KW) => RawExpr::Const(Constant::False),
            Some(SyntaxKind::ELLIPSIS) => RawExpr::Const(Constant::Ellipsis),
            Some(kind) if kind.is_number() => RawExpr::Number(lit.text()),
            _ => RawExpr::Unsupported("literal"),
        },
        Expr::Unary(unary) if unary.op() == Some(SyntaxKind::MINUS) => match unary.operand() {
            Some(Expr::Literal(lit)) if lit.kind().is_some_and(|k| k.is_number()) => {
                RawExpr::Number(format!("-{}", lit.text()))
            }
            _ => RawExpr::Unsupported("unary expression"),
        },
        Expr::Bin(bin) if bin.op() == Some(SyntaxKind::PIPE) => match (bin.lhs(), bin.rhs()) {
            (Some(lhs), Some(rhs)) => RawExpr::BitOr(Box::new(raw_expr(&lhs)), Box::new(raw_expr(&rhs))),
            _ => RawExpr::Unsupported("binary expression"),
        },
        Expr::List(list) if !list.is_comprehension() => {
            RawExpr::List(list.elements().iter().map(raw_expr).collect())
        }
        Expr::Tuple(tuple) => RawExpr::Tuple(tuple.elements().iter().map(raw_expr).collect()),
        Expr::Paren(paren) if !paren.is_generator() => match paren.inner() {
            Some(inner) => raw_expr(&inner),
            None => RawExpr::Tuple(Vec::new()),
        },
        Expr::Call(_) => RawExpr::Unsupported("call"),
        Expr::Starred(_) => RawExpr::Unsupported("starred expression"),
        Expr::List(_) | Expr::Paren(_) => RawExpr::Unsupported("comprehension"),
        Expr::Bin(_) | Expr::Unary(_) => RawExpr::Unsupported("operator expression"),
        Expr::Other(node) => RawExpr::Unsupported(describe(node.kind())),
    }
}

/// Parse the contents of a string annotation; `None` when it is not a
/// single valid expression.
pub fn parse_annotation(text: &str) -> Option<RawExpr> {
    let parse = parse_expression(text);
    if !parse.ok() {
        return None;
    }
    let expr = parse.syntax().children().find_map(Expr::cast)?;
    Some(raw_expr(&expr))
}

/// Items of a subscript index; `X[()]` keeps its empty tuple.
fn tuple_items(tuple: &TupleExpr) -> Vec<RawExpr> {
    let elements = tuple.elements();
    if elements.is_empty() {
        vec![RawExpr::Tuple(Vec::new())]
    } else {
        elements.iter().map(raw_expr).collect()
    }
}

fn describe(kind: SyntaxKind) -> &'static str {
    match kind {
        SyntaxKind::LAMBDA_EXPR => "lambda",
        SyntaxKind::TERNARY_EXPR => "conditional expression",
        SyntaxKind::BOOL_EXPR => "boolean expression",
        SyntaxKind::COMPARE_EXPR => "comparison",
        SyntaxKind::DICT_EXPR => "dict display",
        SyntaxKind::SET_EXPR => "set display",
        SyntaxKind::SLICE_EXPR => "slice",
        SyntaxKind::AWAIT_EXPR => "await",
        SyntaxKind::YIELD_EXPR => "yield",
        SyntaxKind::NAMED_EXPR => "assignment expression",
        _ => "expression",
    }
}

/// The type of a value whose type is evident from its syntax.
pub fn literal_kind(expr: &Expr) -> Option<LiteralKind> {
    match expr {
        Expr::Literal(lit) => match lit.kind()? {
            SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => Some(LiteralKind::Bool),
            SyntaxKind::NONE_KW => Some(LiteralKind::None),
            SyntaxKind::INT_NUMBER => Some(LiteralKind::Int),
            _ => None,
        },
        Expr::String(s) if !s.is_bytes() => Some(LiteralKind::Str),
        Expr::Unary(unary) if matches!(unary.op(), Some(SyntaxKind::MINUS | SyntaxKind::PLUS)) => {
            match unary.operand()? {
                Expr::Literal(lit) if lit.kind() == Some(SyntaxKind::INT_NUMBER) => Some(LiteralKind::Int),
                _ => None,
            }
        }
        Expr::Paren(paren) => literal_kind(&paren.inner()?),
        _ => None,
    }
}

/// Render a literal constant as it would appear in a decorator call or a
/// keyword argument.
pub fn literal_text(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Literal(lit) => {
            let kind = lit.kind()?;
            (kind.is_number() || matches!(kind, SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW | SyntaxKind::NONE_KW))
                .then(|| lit.text())
        }
        Expr::String(s) => s.value().map(|v| crate::model::quote_str(&v)),
        Expr::Unary(unary) if unary.op() == Some(SyntaxKind::MINUS) => {
            let inner = literal_text(&unary.operand()?)?;
            inner.starts_with(|c: char| c.is_ascii_digit()).then(|| format!("-{inner}"))
        }
        _ => None,
    }
}

/// Is this the syntax of a type expression rather than a runtime value?
///
/// Module-level `X = <expr>` is an alias when `<expr>` looks like a type.
pub fn looks_like_type(expr: &Expr) -> bool {
    match expr {
        Expr::Name(_) | Expr::Attribute(_) => true,
        Expr::Subscript(sub) => sub.base().is_some_and(|b| b.dotted_path().is_some()),
        Expr::Bin(bin) if bin.op() == Some(SyntaxKind::PIPE) => {
            bin.lhs().is_some_and(|e| looks_like_type(&e) || is_none(&e))
                && bin.rhs().is_some_and(|e| looks_like_type(&e) || is_none(&e))
        }
        Expr::Paren(paren) => paren.inner().is_some_and(|e| looks_like_type(&e)),
        _ => false,
    }
}

fn is_none(expr: &Expr) -> bool {
    matches!(expr, Expr::Literal(lit) if lit.kind() == Some(SyntaxKind::NONE_KW))
}

/// Does a simple statement carry a `# type:` comment?
pub fn has_type_comment(node: &crate::parser::SyntaxNode) -> bool {
    let is_type_comment = |text: &str| {
        let body = text.trim_start_matches('#').trim_start();
        body.starts_with("type:") && !body["type:".len()..].trim_start().starts_with("ignore")
    };
    let inside = node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::COMMENT)
        .any(|t| is_type_comment(t.text()));
    if inside {
        return true;
    }
    let mut next = node.last_token().and_then(|t| t.next_token());
    while let Some(token) = next {
        match token.kind() {
            SyntaxKind::WHITESPACE => {}
            SyntaxKind::COMMENT => return is_type_comment(token.text()),
            _ => return false,
        }
        next = token.next_token();
    }
    false
}

