//! Functions, classes, and their signatures.

use smol_str::SmolStr;
use tracing::debug;

use crate::diagnostics::DiagnosticCode;
use crate::model::{
    ClassDecl, Declaration, DeclarationKind, Decorator, FunctionDecl, Keyword, ParamKind, Parameter, Role,
    TypeExpr, TypeParam, TypeParamKind, TypeSlot,
};
use crate::parser::{self, AstNode, AstToken, CallExpr, ClassDef, Expr, FunctionDef, ParamList, ParamMarker, SyntaxKind, TypeParamList};

use super::context::{Scope, WalkContext};
use super::raw::{literal_text, raw_expr};

fn raw_slot(expr: Option<Expr>) -> TypeSlot {
    expr.map_or(TypeSlot::Absent, |e| TypeSlot::Raw(raw_expr(&e)))
}

impl WalkContext<'_> {
    pub(super) fn function(&mut self, func: &FunctionDef, order: usize) -> Option<Declaration> {
        let name = func.name()?.text().to_string();
        let (decorators, role) = self.decorators(&name, func.decorators());
        let function = FunctionDecl {
            is_async: func.is_async(),
            decorators,
            type_params: self.type_params(func.type_params()),
            params: func.param_list().map(|list| self.params(&list)).unwrap_or_default(),
            returns: raw_slot(func.return_type()),
        };
        let visibility = self.options.policy.visibility(&name);
        Some(
            Declaration::new(name, order, DeclarationKind::Function(function), func.syntax().text_range())
                .with_visibility(visibility)
                .with_role(role),
        )
    }

    pub(super) fn class(&mut self, class: &ClassDef, order: usize) -> Option<Declaration> {
        let name = class.name()?.text().to_string();
        let (decorators, _) = self.decorators(&name, class.decorators());
        let mut decl = ClassDecl {
            decorators,
            type_params: self.type_params(class.type_params()),
            ..ClassDecl::default()
        };

        for arg in class.arg_list().map(|l| l.args().collect::<Vec<_>>()).unwrap_or_default() {
            let Some(value) = arg.value() else { continue };
            if arg.unpack().is_some() {
                self.warn(
                    DiagnosticCode::Unsupported,
                    format!("unpacked arguments in the header of class '{name}' are not supported"),
                    arg.syntax().text_range(),
                );
                continue;
            }
            match arg.keyword() {
                Some(keyword) => decl.keywords.push(Keyword {
                    name: keyword.text().into(),
                    value: keyword_value(&value),
                }),
                None => decl.bases.push(TypeSlot::Raw(raw_expr(&value))),
            }
        }

        if let Some(body) = class.body() {
            let statements = self.visible(body.statements(), false);
            decl.members = self.declarations(&statements, Scope::Class);
        }

        let visibility = self.options.policy.visibility(&name);
        Some(
            Declaration::new(name, order, DeclarationKind::Class(decl), class.syntax().text_range())
                .with_visibility(visibility),
        )
    }

    /// Parameters with kinds; a bare `*` and `/` only change the kinds of
    /// their neighbours.
    fn params(&self, list: &ParamList) -> Vec<Parameter> {
        let mut params: Vec<Parameter> = Vec::new();
        let mut keyword_only = false;
        for param in list.params() {
            let name = param.name().map(|n| SmolStr::new(n.text()));
            let kind = match param.marker() {
                Some(ParamMarker::Slash) => {
                    for earlier in params.iter_mut().filter(|p| p.kind == ParamKind::Positional) {
                        earlier.kind = ParamKind::PositionalOnly;
                    }
                    continue;
                }
                Some(ParamMarker::Star) => {
                    keyword_only = true;
                    ParamKind::VarPositional
                }
                Some(ParamMarker::DoubleStar) => ParamKind::VarKeyword,
                None if keyword_only => ParamKind::KeywordOnly,
                None => ParamKind::Positional,
            };
            let Some(name) = name else { continue };
            params.push(Parameter {
                name,
                kind,
                annotation: raw_slot(param.annotation()),
                has_default: param.has_default(),
            });
        }
        params
    }

    pub(super) fn type_params(&self, list: Option<TypeParamList>) -> Vec<TypeParam> {
        let Some(list) = list else {
            return Vec::new();
        };
        list.params()
            .into_iter()
            .filter_map(|param| {
                let kind = match param.marker() {
                    Some(SyntaxKind::STAR) => TypeParamKind::TypeVarTuple,
                    Some(SyntaxKind::STAR_STAR) => TypeParamKind::ParamSpec,
                    _ => TypeParamKind::TypeVar,
                };
                Some(TypeParam {
                    name: param.name()?.text().into(),
                    kind,
                    bound: raw_slot(param.bound()),
                    default: raw_slot(param.default()),
                })
            })
            .collect()
    }

    /// Keep the decorators the stub needs and classify the role they imply.
    ///
    /// Accessor decorators (`@x.setter`) only set the role; the serializer
    /// writes them back for merged properties.
    pub(super) fn decorators(&mut self, owner: &str, decorators: Vec<parser::Decorator>) -> (Vec<Decorator>, Role) {
        let options = self.options;
        let policy = &options.policy;
        let mut kept: Vec<Decorator> = Vec::new();
        let mut role = Role::Plain;

        for decorator in decorators {
            let range = decorator.syntax().text_range();
            let Some(expr) = decorator.expr() else { continue };
            let (path, call) = match &expr {
                Expr::Call(call) => (call.callee().and_then(|c| c.dotted_path()), Some(call)),
                other => (other.dotted_path(), None),
            };
            let Some(path) = path else {
                self.warn(
                    DiagnosticCode::Unsupported,
                    format!("decorator expression on '{owner}' is not supported"),
                    range,
                );
                continue;
            };
            let canonical = self.canonicalize(&path);

            let implied = policy.decorator_role(owner, &canonical);
            if role == Role::Plain {
                role = implied.unwrap_or(Role::Plain);
            }
            let accessor = matches!(implied, Some(Role::Getter | Role::Setter | Role::Deleter))
                && !policy.property_decorators.contains(canonical.as_str());
            if accessor {
                continue;
            }
            if !policy.preserves_decorator(owner, &canonical) {
                debug!(decorator = %path, owner, "dropping decorator");
                continue;
            }
            if kept.iter().any(|d| d.path == path) {
                continue;
            }
            let args = call.and_then(|call| decorator_args(call, &path));
            kept.push(Decorator { path, canonical, args });
        }

        (kept, role)
    }
}

/// Literal-only call arguments, rendered; `None` drops the call.
fn decorator_args(call: &CallExpr, path: &str) -> Option<String> {
    let mut rendered = Vec::new();
    for arg in call.args() {
        let value = arg.value()?;
        let Some(text) = literal_text(&value) else {
            debug!(decorator = path, "dropping non-literal decorator arguments");
            return None;
        };
        match arg.keyword() {
            Some(keyword) => rendered.push(format!("{}={text}", keyword.text())),
            None if arg.unpack().is_none() => rendered.push(text),
            None => return None,
        }
    }
    Some(rendered.join(", "))
}

/// Keyword values are kept verbatim when literal, and as annotations otherwise
/// (`metaclass=ABCMeta`).
pub(super) fn keyword_value(value: &Expr) -> TypeSlot {
    match literal_text(value) {
        Some(text) => TypeSlot::Resolved(TypeExpr::Constant(text)),
        None => TypeSlot::Raw(raw_expr(value)),
    }
}
