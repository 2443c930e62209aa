//! Parameter lists, type parameter lists and types as text.

use crate::model::{Decorator, ParamKind, Parameter, TypeParam, TypeParamKind, TypeSlot};

/// The written type of a slot; `None` when absent or unknown.
pub fn slot_text(slot: &TypeSlot) -> Option<String> {
    match slot {
        TypeSlot::Resolved(ty) => Some(ty.to_string()),
        TypeSlot::Inferred(kind) => Some(kind.type_name().to_string()),
        TypeSlot::Absent | TypeSlot::Raw(_) | TypeSlot::Unknown => None,
    }
}

/// Like [`slot_text`], with forward references unquoted, for positions where
/// a string is not a type (`X = Foo`, class bases).
pub fn slot_text_unquoted(slot: &TypeSlot) -> Option<String> {
    match slot {
        TypeSlot::Resolved(ty) => Some(ty.unquoted()),
        other => slot_text(other),
    }
}

pub fn decorator_line(decorator: &Decorator) -> String {
    match &decorator.args {
        Some(args) => format!("@{}({args})", decorator.path),
        None => format!("@{}", decorator.path),
    }
}

/// `[T: int, *Ts, **P]`, or nothing.
pub fn type_params(params: &[TypeParam]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = params
        .iter()
        .map(|param| {
            let prefix = match param.kind {
                TypeParamKind::TypeVar => "",
                TypeParamKind::TypeVarTuple => "*",
                TypeParamKind::ParamSpec => "**",
            };
            let mut text = format!("{prefix}{}", param.name);
            if let Some(bound) = slot_text(&param.bound) {
                text.push_str(": ");
                text.push_str(&bound);
            }
            if let Some(default) = slot_text(&param.default) {
                text.push_str(" = ");
                text.push_str(&default);
            }
            text
        })
        .collect();
    format!("[{}]", rendered.join(", "))
}

/// A parameter list with `/` after the positional-only parameters and a
/// bare `*` before keyword-only ones when there is no `*args`.
pub fn params(params: &[Parameter]) -> String {
    let last_positional_only = params.iter().rposition(|p| p.kind == ParamKind::PositionalOnly);
    let mut star_written = params.iter().any(|p| p.kind == ParamKind::VarPositional);
    let mut parts: Vec<String> = Vec::with_capacity(params.len() + 2);
    for (i, param) in params.iter().enumerate() {
        if param.kind == ParamKind::KeywordOnly && !star_written {
            parts.push("*".to_string());
            star_written = true;
        }
        parts.push(self::param(param));
        if Some(i) == last_positional_only {
            parts.push("/".to_string());
        }
    }
    parts.join(", ")
}

fn param(param: &Parameter) -> String {
    let prefix = match param.kind {
        ParamKind::VarPositional => "*",
        ParamKind::VarKeyword => "**",
        _ => "",
    };
    let name = &param.name;
    match (slot_text(&param.annotation), param.has_default) {
        (Some(ty), true) => format!("{prefix}{name}: {ty} = ..."),
        (Some(ty), false) => format!("{prefix}{name}: {ty}"),
        (None, true) => format!("{prefix}{name}=..."),
        (None, false) => format!("{prefix}{name}"),
    }
}
