//! Assignments: variables, aliases, type variables, and `__all__`.

use smol_str::SmolStr;
use text_size::TextRange;

use crate::diagnostics::DiagnosticCode;
use crate::model::{AliasDecl, AliasForm, Declaration, DeclarationKind, Keyword, TypeSlot, TypeVarDecl, VariableDecl};
use crate::parser::{
    AnnAssignStmt, AssignStmt, AstNode, AstToken, AugAssignStmt, CallExpr, Expr, ExprStmt, SyntaxKind, TypeAliasStmt,
};

use super::context::{Scope, WalkContext};
use super::declarations::keyword_value;
use super::raw::{has_type_comment, literal_kind, looks_like_type, raw_expr};

const EXPORTS: &str = "__all__";

impl WalkContext<'_> {
    pub(super) fn assignment(&mut self, assign: &AssignStmt, scope: Scope, out: &mut Vec<Declaration>) {
        let range = assign.syntax().text_range();
        let Some(value) = assign.value() else { return };
        if has_type_comment(assign.syntax()) {
            self.warn(DiagnosticCode::Unsupported, "type comments are not supported", range);
        }
        for target in assign.targets() {
            self.bind_target(target, Some(&value), scope, range, out);
        }
    }

    /// Bind one assignment target; tuple targets are matched pairwise against
    /// a tuple value of the same length.
    fn bind_target(
        &mut self,
        target: Expr,
        value: Option<&Expr>,
        scope: Scope,
        range: TextRange,
        out: &mut Vec<Declaration>,
    ) {
        let Some(target) = target.unparenthesized() else { return };
        let elements = match &target {
            Expr::Name(name) => {
                if let Some(name) = name.text() {
                    self.bind_name(name, value, scope, range, out);
                }
                return;
            }
            Expr::Tuple(tuple) => tuple.elements(),
            Expr::List(list) => list.elements(),
            Expr::Starred(starred) => {
                if let Some(inner) = starred.inner() {
                    self.bind_target(inner, None, scope, range, out);
                }
                return;
            }
            _ => {
                self.ignore("assignment to an attribute or subscript", range);
                return;
            }
        };
        let values = match value.cloned().and_then(Expr::unparenthesized) {
            Some(Expr::Tuple(tuple)) => tuple.elements(),
            Some(Expr::List(list)) => list.elements(),
            _ => Vec::new(),
        };
        let pairwise = values.len() == elements.len();
        for (i, element) in elements.into_iter().enumerate() {
            let value = if pairwise { values.get(i) } else { None };
            self.bind_target(element, value, scope, range, out);
        }
    }

    fn bind_name(&mut self, name: String, value: Option<&Expr>, scope: Scope, range: TextRange, out: &mut Vec<Declaration>) {
        if scope == Scope::Module && name == EXPORTS {
            self.assign_exports(value, range);
            return;
        }

        let type_var = match value {
            Some(Expr::Call(call)) => self.type_var(&name, call),
            _ => None,
        };
        let kind = match (type_var, value) {
            (Some(type_var), _) => DeclarationKind::TypeVar(type_var),
            (None, Some(value)) if looks_like_type(value) => DeclarationKind::Alias(AliasDecl {
                value: TypeSlot::Raw(raw_expr(value)),
                form: AliasForm::Assignment,
                type_params: Vec::new(),
            }),
            (None, value) => DeclarationKind::Variable(VariableDecl {
                annotation: value
                    .and_then(literal_kind)
                    .map_or(TypeSlot::Unknown, TypeSlot::Inferred),
            }),
        };
        let visibility = self.options.policy.visibility(&name);
        out.push(Declaration::new(name, out.len(), kind, range).with_visibility(visibility));
    }

    pub(super) fn annotated_assignment(&mut self, assign: &AnnAssignStmt, scope: Scope, out: &mut Vec<Declaration>) {
        let range = assign.syntax().text_range();
        let name = match assign.target().and_then(Expr::unparenthesized) {
            Some(Expr::Name(name)) => name.text(),
            _ => None,
        };
        let Some(name) = name else {
            self.ignore("annotation of an attribute or subscript", range);
            return;
        };
        let value = assign.value();

        if scope == Scope::Module && name == EXPORTS {
            self.assign_exports(value.as_ref(), range);
            return;
        }

        let annotation = assign.annotation();
        let is_alias = annotation
            .as_ref()
            .and_then(Expr::dotted_path)
            .is_some_and(|path| self.options.policy.is_type_alias_marker(&self.canonicalize(&path)));
        let kind = match (annotation, value) {
            (Some(marker), Some(value)) if is_alias => DeclarationKind::Alias(AliasDecl {
                value: TypeSlot::Raw(raw_expr(&value)),
                form: AliasForm::Annotated(TypeSlot::Raw(raw_expr(&marker))),
                type_params: Vec::new(),
            }),
            (annotation, _) => DeclarationKind::Variable(VariableDecl {
                annotation: annotation.map_or(TypeSlot::Absent, |a| TypeSlot::Raw(raw_expr(&a))),
            }),
        };
        let visibility = self.options.policy.visibility(&name);
        out.push(Declaration::new(name, out.len(), kind, range).with_visibility(visibility));
    }

    pub(super) fn augmented_assignment(&mut self, assign: &AugAssignStmt, scope: Scope) {
        let range = assign.syntax().text_range();
        let is_exports = assign.target().and_then(|t| t.dotted_path()).as_deref() == Some(EXPORTS);
        if scope != Scope::Module || !is_exports {
            self.ignore("augmented assignment", range);
            return;
        }
        if assign.op() != Some(SyntaxKind::PLUS_EQ) {
            self.warn(DiagnosticCode::ExportList, "unsupported operation on __all__", range);
            return;
        }
        if let Some(names) = assign.value().and_then(|v| self.export_names(&v, range)) {
            self.exports.get_or_insert_with(Vec::new).extend(names);
        }
    }

    pub(super) fn type_alias(&mut self, alias: &TypeAliasStmt, order: usize) -> Option<Declaration> {
        let name = alias.name()?.text().to_string();
        let decl = AliasDecl {
            value: alias.value().map_or(TypeSlot::Absent, |v| TypeSlot::Raw(raw_expr(&v))),
            form: AliasForm::Statement,
            type_params: self.type_params(alias.type_params()),
        };
        let visibility = self.options.policy.visibility(&name);
        Some(
            Declaration::new(name, order, DeclarationKind::Alias(decl), alias.syntax().text_range())
                .with_visibility(visibility),
        )
    }

    /// Docstrings and `...` are silent; `__all__.extend(...)` and
    /// `__all__.append(...)` update the export list.
    pub(super) fn expression_statement(&mut self, stmt: &ExprStmt, scope: Scope) {
        let range = stmt.syntax().text_range();
        match stmt.expr() {
            Some(Expr::String(_)) => {}
            Some(Expr::Literal(lit)) if lit.kind() == Some(SyntaxKind::ELLIPSIS) => {}
            Some(Expr::Call(call)) if scope == Scope::Module && self.export_call(&call, range) => {}
            _ => self.ignore("expression statement", range),
        }
    }

    /// Returns false when the call is not an `__all__` method call.
    fn export_call(&mut self, call: &CallExpr, range: TextRange) -> bool {
        let Some(Expr::Attribute(attr)) = call.callee() else {
            return false;
        };
        if attr.base().and_then(|b| b.dotted_path()).as_deref() != Some(EXPORTS) {
            return false;
        }
        let method = attr.attr().map(|a| a.text().to_string()).unwrap_or_default();
        let args = call.args();
        let value = match args.as_slice() {
            [arg] if arg.keyword().is_none() && arg.unpack().is_none() => arg.value(),
            _ => None,
        };
        let names = match (method.as_str(), value) {
            ("extend", Some(value)) => self.export_names(&value, range),
            ("append", Some(Expr::String(s))) => s.value().map(|v| vec![SmolStr::new(v)]),
            _ => None,
        };
        match names {
            Some(names) => self.exports.get_or_insert_with(Vec::new).extend(names),
            None => self.warn(DiagnosticCode::ExportList, format!("unsupported __all__.{method}() call"), range),
        }
        true
    }

    /// String literals of a list or tuple display.
    fn assign_exports(&mut self, value: Option<&Expr>, range: TextRange) {
        let Some(value) = value else {
            self.warn(DiagnosticCode::ExportList, "__all__ must be assigned a list of strings", range);
            return;
        };
        if let Some(names) = self.export_names(value, range) {
            self.exports = Some(names);
        }
    }

    fn export_names(&mut self, value: &Expr, range: TextRange) -> Option<Vec<SmolStr>> {
        let elements = match value.clone().unparenthesized() {
            Some(Expr::List(list)) if !list.is_comprehension() => list.elements(),
            Some(Expr::Tuple(tuple)) => tuple.elements(),
            _ => {
                self.warn(DiagnosticCode::ExportList, "__all__ must be a list or tuple of string literals", range);
                return None;
            }
        };
        let mut names = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                Expr::String(s) if s.value().is_some() => names.extend(s.value().map(SmolStr::new)),
                _ => {
                    self.warn(DiagnosticCode::ExportList, "__all__ entries must be string literals", range);
                    return None;
                }
            }
        }
        Some(names)
    }

    /// `T = TypeVar("T", ...)` and the other recognized factories.
    fn type_var(&self, name: &str, call: &CallExpr) -> Option<TypeVarDecl> {
        let callee = call.callee()?;
        let path = callee.dotted_path()?;
        if !self.options.policy.is_type_var_factory(&self.canonicalize(&path)) {
            return None;
        }
        let mut decl = TypeVarDecl {
            factory: TypeSlot::Raw(raw_expr(&callee)),
            name_arg: name.to_string(),
            args: Vec::new(),
            keywords: Vec::new(),
        };
        for (i, arg) in call.args().into_iter().enumerate() {
            let Some(value) = arg.value() else { continue };
            if arg.unpack().is_some() {
                continue;
            }
            match (arg.keyword(), &value) {
                (Some(keyword), _) => decl.keywords.push(Keyword {
                    name: keyword.text().into(),
                    value: keyword_value(&value),
                }),
                (None, Expr::String(s)) if i == 0 => {
                    if let Some(text) = s.value() {
                        decl.name_arg = text;
                    }
                }
                (None, _) => decl.args.push(TypeSlot::Raw(raw_expr(&value))),
            }
        }
        Some(decl)
    }
}
