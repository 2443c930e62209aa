//! Walking the declaration tree with the right name scopes.

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::diagnostics::DiagnosticCode;
use crate::model::{
    AliasForm, Declaration, DeclarationKind, Decorator, FunctionDecl, Keyword, ParamKind, PropertyDecl, TypeParam,
    TypeSlot,
};

use super::{NormalizeContext, normalize};

fn names_of(params: &[TypeParam]) -> FxHashSet<SmolStr> {
    params.iter().map(|p| p.name.clone()).collect()
}

impl NormalizeContext<'_> {
    pub(super) fn declaration(&mut self, declaration: &mut Declaration) {
        self.range = declaration.range;
        match &mut declaration.kind {
            DeclarationKind::Class(class) => {
                self.decorators(&class.decorators);
                let members: FxHashSet<SmolStr> = class.members.iter().map(|m| m.name.clone()).collect();
                self.with_scope(names_of(&class.type_params), |ctx| {
                    ctx.type_params(&mut class.type_params);
                    class.bases.iter_mut().for_each(|base| ctx.slot(base));
                    ctx.keywords(&mut class.keywords);
                    ctx.with_scope(members, |ctx| {
                        for member in &mut class.members {
                            ctx.declaration(member);
                        }
                    });
                });
            }
            DeclarationKind::Function(function) => self.function(function),
            DeclarationKind::Variable(variable) => self.slot(&mut variable.annotation),
            DeclarationKind::Property(property) => {
                self.function(&mut property.getter);
                if let Some(setter) = &mut property.setter {
                    self.function(setter);
                }
                if let Some(deleter) = &mut property.deleter {
                    self.function(deleter);
                }
                self.check_setter(&declaration.name, property);
            }
            DeclarationKind::Alias(alias) => {
                self.with_scope(names_of(&alias.type_params), |ctx| {
                    ctx.type_params(&mut alias.type_params);
                    ctx.slot(&mut alias.value);
                });
                if let AliasForm::Annotated(marker) = &mut alias.form {
                    self.slot(marker);
                }
            }
            DeclarationKind::TypeVar(type_var) => {
                self.slot(&mut type_var.factory);
                type_var.args.iter_mut().for_each(|arg| self.slot(arg));
                self.keywords(&mut type_var.keywords);
            }
            DeclarationKind::Overloads(group) => {
                for signature in &mut group.signatures {
                    self.function(signature);
                }
            }
        }
    }

    fn function(&mut self, function: &mut FunctionDecl) {
        self.decorators(&function.decorators);
        self.with_scope(names_of(&function.type_params), |ctx| {
            ctx.type_params(&mut function.type_params);
            for param in &mut function.params {
                ctx.slot(&mut param.annotation);
            }
            ctx.slot(&mut function.returns);
        });
    }

    fn type_params(&mut self, params: &mut [TypeParam]) {
        for param in params {
            self.slot(&mut param.bound);
            self.slot(&mut param.default);
        }
    }

    fn keywords(&mut self, keywords: &mut [Keyword]) {
        for keyword in keywords {
            self.slot(&mut keyword.value);
        }
    }

    /// Decorators render as written, so their roots need imports.
    fn decorators(&mut self, decorators: &[Decorator]) {
        for decorator in decorators {
            self.resolve_path(&decorator.path);
        }
    }

    fn slot(&mut self, slot: &mut TypeSlot) {
        let TypeSlot::Raw(expr) = &*slot else {
            return;
        };
        // Imports required by a partially normalized expression are dropped.
        let snapshot = self.requirements.clone();
        *slot = match normalize(expr, self) {
            Some(ty) => TypeSlot::Resolved(ty),
            None => {
                self.requirements = snapshot;
                TypeSlot::Unknown
            }
        };
    }

    /// The stub types a setter's value like the getter's return; say so when
    /// the source disagrees.
    fn check_setter(&mut self, name: &str, property: &PropertyDecl) {
        let Some(setter) = &property.setter else {
            return;
        };
        let value = setter
            .params
            .iter()
            .filter(|p| p.kind.is_positional() || p.kind == ParamKind::KeywordOnly)
            .nth(1);
        let (Some(getter), Some(value)) = (
            property.getter.returns.resolved(),
            value.and_then(|p| p.annotation.resolved()),
        ) else {
            return;
        };
        if getter != value {
            self.warn(
                DiagnosticCode::SetterTypeMismatch,
                format!("setter of property '{name}' accepts `{value}` but the getter returns `{getter}`"),
            );
        }
    }
}
