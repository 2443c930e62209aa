//! Raw annotation → [`TypeExpr`].

use crate::diagnostics::DiagnosticCode;
use crate::model::{Constant, RawExpr, TypeExpr, quote_str};
use crate::walk::parse_annotation;

use super::NormalizeContext;

/// Subscripted forms with their own rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Union,
    Optional,
    Literal,
    Annotated,
    Callable,
    Generic,
}

impl Form {
    fn of(canonical: &str) -> Form {
        if canonical == "collections.abc.Callable" {
            return Form::Callable;
        }
        let name = canonical
            .strip_prefix("typing.")
            .or_else(|| canonical.strip_prefix("typing_extensions."));
        match name {
            Some("Union") => Form::Union,
            Some("Optional") => Form::Optional,
            Some("Literal") => Form::Literal,
            Some("Annotated") => Form::Annotated,
            Some("Callable") => Form::Callable,
            _ => Form::Generic,
        }
    }
}

/// Normalize one annotation; `None` means the type is unknown, with a
/// warning already recorded.
pub fn normalize(expr: &RawExpr, ctx: &mut NormalizeContext<'_>) -> Option<TypeExpr> {
    match expr {
        RawExpr::Name(_) | RawExpr::Attribute(..) => match expr.dotted_path() {
            Some(path) => Some(ctx.resolve_path(&path)),
            None => unsupported(ctx, "attribute of a computed value"),
        },
        RawExpr::Subscript(base, items) => subscript(base, items, ctx),
        RawExpr::BitOr(..) => {
            let mut alternatives = Vec::new();
            bit_or_operands(expr, &mut alternatives);
            union(alternatives, ctx)
        }
        RawExpr::Str(text) => match parse_annotation(text) {
            Some(parsed) => normalize(&parsed, ctx),
            None => unsupported(ctx, "string annotation that is not an expression"),
        },
        RawExpr::Const(Constant::None) => Some(TypeExpr::none()),
        RawExpr::Const(Constant::Ellipsis) => Some(TypeExpr::Ellipsis),
        RawExpr::List(items) => all(items, ctx).map(TypeExpr::List),
        RawExpr::Tuple(items) => all(items, ctx).map(TypeExpr::Tuple),
        RawExpr::Const(_) | RawExpr::Number(_) | RawExpr::Bytes(_) => {
            unsupported(ctx, "literal value outside of Literal[...]")
        }
        RawExpr::Unsupported(what) => unsupported(ctx, what),
    }
}

fn unsupported(ctx: &mut NormalizeContext<'_>, what: &str) -> Option<TypeExpr> {
    ctx.warn(
        DiagnosticCode::Unsupported,
        format!("{what} cannot be used as a type; the type is omitted"),
    );
    None
}

fn all(items: &[RawExpr], ctx: &mut NormalizeContext<'_>) -> Option<Vec<TypeExpr>> {
    items.iter().map(|item| normalize(item, ctx)).collect()
}

fn bit_or_operands<'e>(expr: &'e RawExpr, out: &mut Vec<&'e RawExpr>) {
    match expr {
        RawExpr::BitOr(lhs, rhs) => {
            bit_or_operands(lhs, out);
            bit_or_operands(rhs, out);
        }
        other => out.push(other),
    }
}

/// Flattened, duplicate-free union; one alternative collapses to itself.
fn union<'e>(alternatives: impl IntoIterator<Item = &'e RawExpr>, ctx: &mut NormalizeContext<'_>) -> Option<TypeExpr> {
    let mut flat: Vec<TypeExpr> = Vec::new();
    for alternative in alternatives {
        let members = match normalize(alternative, ctx)? {
            TypeExpr::Union(members) => members,
            single => vec![single],
        };
        for member in members {
            if !flat.contains(&member) {
                flat.push(member);
            }
        }
    }
    match flat.len() {
        0 => unsupported(ctx, "empty union"),
        1 => flat.pop(),
        _ => Some(TypeExpr::Union(flat)),
    }
}

fn subscript(base: &RawExpr, items: &[RawExpr], ctx: &mut NormalizeContext<'_>) -> Option<TypeExpr> {
    let Some(path) = base.dotted_path() else {
        return unsupported(ctx, "subscript of a computed value");
    };
    let form = Form::of(&ctx.canonical(&path));
    match (form, items) {
        (Form::Union, _) => return union(items, ctx),
        (Form::Optional, [item]) => return union([item, &RawExpr::Const(Constant::None)], ctx),
        (Form::Annotated, [first, ..]) => return normalize(first, ctx),
        (Form::Optional | Form::Annotated, _) => return unsupported(ctx, "malformed Optional or Annotated"),
        _ => {}
    }

    let base = match ctx.resolve_path(&path) {
        TypeExpr::Name(base) => base,
        // `"Foo[int]"` as a whole when `Foo` cannot be resolved.
        _ => {
            let args = all(items, ctx)?;
            let args: Vec<String> = args.iter().map(TypeExpr::unquoted).collect();
            return Some(TypeExpr::ForwardRef(format!("{path}[{}]", args.join(", "))));
        }
    };
    match (form, items) {
        (Form::Literal, _) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                literal_values(item, ctx, &mut values)?;
            }
            Some(TypeExpr::Literal { base, values })
        }
        (Form::Callable, [RawExpr::List(params), returns]) => Some(TypeExpr::Callable {
            base,
            params: Some(all(params, ctx)?),
            returns: Box::new(normalize(returns, ctx)?),
        }),
        (Form::Callable, [RawExpr::Const(Constant::Ellipsis), returns]) => Some(TypeExpr::Callable {
            base,
            params: None,
            returns: Box::new(normalize(returns, ctx)?),
        }),
        // `Callable[P, R]` and everything else keeps its arguments as written.
        _ => Some(TypeExpr::Generic {
            base,
            args: all(items, ctx)?,
        }),
    }
}

/// Values of `Literal[...]`; nested literals are flattened.
fn literal_values(item: &RawExpr, ctx: &mut NormalizeContext<'_>, out: &mut Vec<String>) -> Option<()> {
    match item {
        RawExpr::Str(value) => out.push(quote_str(value)),
        RawExpr::Number(text) | RawExpr::Bytes(text) => out.push(text.clone()),
        RawExpr::Const(constant @ (Constant::None | Constant::True | Constant::False)) => {
            out.push(constant.as_str().to_string())
        }
        // Enum members: `Literal[Color.RED]`.
        RawExpr::Attribute(..) => match ctx.resolve_path(&item.dotted_path()?) {
            TypeExpr::Name(path) => out.push(path),
            _ => {
                unsupported(ctx, "unresolvable Literal value");
                return None;
            }
        },
        RawExpr::Subscript(..) => match normalize(item, ctx)? {
            TypeExpr::Literal { values, .. } => out.extend(values),
            _ => {
                unsupported(ctx, "non-literal value inside Literal[...]");
                return None;
            }
        },
        _ => {
            unsupported(ctx, "non-literal value inside Literal[...]");
            return None;
        }
    }
    Some(())
}
