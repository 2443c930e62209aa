//! Merging of same-named declarations in one scope.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::model::{Declaration, DeclarationKind, OverloadGroup, PropertyDecl, Role};

/// Merge the declarations of one scope, then each class body below it.
///
/// Declarations are grouped by name in source order:
/// - overload candidates collect into one [`OverloadGroup`]; the first plain
///   function after them is its implementation and is absorbed,
/// - a getter starts a property that later setters and deleters attach to,
/// - an unannotated reassignment of an annotated variable keeps the
///   annotation,
/// - anything else shadows the earlier binding.
pub fn merge_scope(declarations: Vec<Declaration>) -> Vec<Declaration> {
    let mut merged: IndexMap<SmolStr, Declaration> = IndexMap::with_capacity(declarations.len());
    for declaration in declarations {
        let leftover = match merged.get_mut(&declaration.name) {
            Some(existing) => absorb(existing, declaration),
            None => Some(declaration),
        };
        if let Some(declaration) = leftover {
            merged.shift_remove(&declaration.name);
            merged.insert(declaration.name.clone(), start(declaration));
        }
    }

    merged
        .into_values()
        .map(|mut declaration| {
            if let DeclarationKind::Class(class) = &mut declaration.kind {
                class.members = merge_scope(std::mem::take(&mut class.members));
            }
            declaration
        })
        .collect()
}

/// The first declaration of a name; accessors become their merged forms.
fn start(mut declaration: Declaration) -> Declaration {
    let role = declaration.role;
    let DeclarationKind::Function(function) = declaration.kind else {
        return declaration;
    };
    declaration.kind = match role {
        Role::OverloadCandidate => DeclarationKind::Overloads(OverloadGroup {
            signatures: vec![function],
            has_implementation: false,
        }),
        Role::Getter => DeclarationKind::Property(PropertyDecl {
            getter: function,
            setter: None,
            deleter: None,
        }),
        // A setter or deleter of nothing is an ordinary function.
        Role::Setter | Role::Deleter => {
            declaration.role = Role::Plain;
            DeclarationKind::Function(function)
        }
        Role::Plain => DeclarationKind::Function(function),
    };
    declaration
}

/// Fold `next` into `existing`; returns it back when it shadows instead.
fn absorb(existing: &mut Declaration, next: Declaration) -> Option<Declaration> {
    let role = next.role;
    match (&mut existing.kind, next.kind) {
        (DeclarationKind::Overloads(group), DeclarationKind::Function(function)) if !group.has_implementation => {
            match role {
                Role::OverloadCandidate => group.signatures.push(function),
                Role::Plain => group.has_implementation = true,
                _ => return Some(Declaration { kind: DeclarationKind::Function(function), ..next }),
            }
            None
        }
        (DeclarationKind::Property(property), DeclarationKind::Function(function))
            if matches!(role, Role::Setter | Role::Deleter) =>
        {
            if role == Role::Setter {
                property.setter = Some(function);
            } else {
                property.deleter = Some(function);
            }
            None
        }
        (DeclarationKind::Variable(earlier), DeclarationKind::Variable(later))
            if earlier.annotation.is_declared() && !later.annotation.is_declared() =>
        {
            None
        }
        (_, kind) => Some(Declaration { kind, ..next }),
    }
}
