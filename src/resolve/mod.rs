//! Visibility and overload resolution.
//!
//! Turns the walked model into the public surface:
//!
//! 1. [`merge_scope`] folds overload groups, property accessors, shadowed
//!    bindings and reassigned variables into one declaration per name.
//! 2. `__all__` marks declarations exported and imports re-exported.
//! 3. Declarations that are neither public by convention nor exported are
//!    dropped, unless something kept refers to them.
//! 4. The survivors are ordered: values first, then definitions, each group
//!    in source order.

mod merge;
mod references;

pub use merge::merge_scope;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;
use tracing::trace;

use crate::diagnostics::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::model::{Declaration, DeclarationKind, SourceUnit, Visibility};
use crate::options::ExtractOptions;

pub fn resolve(mut unit: SourceUnit, options: &ExtractOptions) -> (SourceUnit, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    unit.declarations = merge_scope(std::mem::take(&mut unit.declarations));

    if let Some(exports) = unit.export_list.take() {
        let exports = dedup(exports);
        apply_exports(&mut unit, &exports, &mut diagnostics);
        unit.export_list = Some(exports);
    }

    filter_scope(&mut unit.declarations, options);
    order_scope(&mut unit.declarations);

    (unit, diagnostics)
}

fn dedup(names: Vec<SmolStr>) -> Vec<SmolStr> {
    let mut seen = FxHashSet::default();
    names.into_iter().filter(|name| seen.insert(name.clone())).collect()
}

fn apply_exports(unit: &mut SourceUnit, exports: &[SmolStr], diagnostics: &mut Diagnostics) {
    for name in exports {
        let mut bound = false;
        for declaration in unit.declarations.iter_mut().filter(|d| d.name == *name) {
            declaration.visibility = Visibility::Exported;
            bound = true;
        }
        for binding in unit.imports.iter_mut().filter(|b| b.local == *name) {
            binding.reexported = true;
            bound = true;
        }
        // A star import may bind anything.
        if !bound && unit.star_imports.is_empty() {
            diagnostics.push(Diagnostic::warning(
                DiagnosticCode::ExportList,
                format!("'{name}' is listed in __all__ but never defined or imported"),
            ));
        }
    }
}

/// Drop private declarations of one scope; class bodies are filtered first.
/// With `retain_referenced`, privates the kept surface refers to stay.
fn filter_scope(declarations: &mut Vec<Declaration>, options: &ExtractOptions) {
    for declaration in declarations.iter_mut() {
        if let DeclarationKind::Class(class) = &mut declaration.kind {
            filter_scope(&mut class.members, options);
        }
    }
    if options.include_private {
        return;
    }

    if options.retain_referenced {
        retain_referenced(declarations);
    }
    declarations.retain(|declaration| {
        let kept = declaration.visibility.is_kept();
        if !kept {
            trace!(name = %declaration.name, kind = declaration.kind.describe(), "dropping private declaration");
        }
        kept
    });
}

/// Mark private declarations referenced from kept ones as retained, until
/// nothing changes.
fn retain_referenced(declarations: &mut [Declaration]) {
    let mut referenced: FxHashSet<SmolStr> = FxHashSet::default();
    let mut scanned = vec![false; declarations.len()];
    loop {
        let mut changed = false;
        for (declaration, scanned) in declarations.iter().zip(scanned.iter_mut()) {
            if !*scanned && declaration.visibility.is_kept() {
                references::collect(declaration, &mut referenced);
                *scanned = true;
            }
        }
        for declaration in declarations.iter_mut() {
            if declaration.visibility == Visibility::Private && referenced.contains(&declaration.name) {
                declaration.visibility = Visibility::Retained;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
}

fn order_scope(declarations: &mut [Declaration]) {
    declarations.sort_by_key(|declaration| (!declaration.is_value(), declaration.order));
    for declaration in declarations.iter_mut() {
        if let DeclarationKind::Class(class) = &mut declaration.kind {
            order_scope(&mut class.members);
        }
    }
}

#[cfg(test)]
mod tests;
